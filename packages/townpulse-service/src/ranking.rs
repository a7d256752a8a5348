use time::OffsetDateTime;

use townpulse_domain::RankedArea;

use crate::{ServiceError, ServiceResult, TownPulseService, cache};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RankingRequest {
	pub flat_type: String,
	pub budget: f64,
	pub window_months: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RankingResponse {
	pub rows: Vec<RankedArea>,
	/// True when the document store could not be reached and the ranking
	/// carries no sentiment contribution. Never silently complete-looking.
	pub degraded: bool,
}

impl TownPulseService {
	/// Rank areas by the hybrid affordability/sentiment score, descending.
	/// An empty result means no area met the minimum-sample threshold, not
	/// a failure. A relational outage is fatal; a document outage degrades
	/// to relational-only rows.
	pub async fn rank_by_affordability(
		&self,
		req: RankingRequest,
	) -> ServiceResult<RankingResponse> {
		let flat_type = req.flat_type.trim();

		if flat_type.is_empty() {
			return Err(ServiceError::InvalidArgument {
				message: "flat_type is required.".to_string(),
			});
		}
		if !req.budget.is_finite() || req.budget <= 0.0 {
			return Err(ServiceError::InvalidArgument {
				message: "budget must be a positive number.".to_string(),
			});
		}

		let window_months = self.resolve_window(req.window_months)?;
		let now = OffsetDateTime::now_utc();
		let key = cache::build_ranking_cache_key(flat_type, req.budget, window_months);

		if let Some(cached) = self.caches.ranking.get(&key, now) {
			tracing::debug!(flat_type, "Serving ranking from snapshot cache.");

			return Ok(cached);
		}

		let price_rows = self
			.call_relational(self.sources.price.affordability_aggregates(
				flat_type,
				window_months,
				self.cfg.ranking.min_sample_threshold,
				now,
			))
			.await?;

		if price_rows.is_empty() {
			// Insufficient data, nothing to rank.
			let response = RankingResponse { rows: Vec::new(), degraded: false };

			self.caches.ranking.insert(key, response.clone(), now);

			return Ok(response);
		}

		let (sentiment_rows, degraded) =
			match self.call_document(self.sources.sentiment.area_aggregates(now)).await {
				Ok(rows) => (rows, false),
				Err(err) => {
					tracing::warn!(
						error = %err,
						"Document store unavailable; ranking degrades to relational-only."
					);

					(Vec::new(), true)
				},
			};
		let rows =
			townpulse_domain::rank_areas(&self.cfg.ranking, req.budget, price_rows, sentiment_rows);
		let response = RankingResponse { rows, degraded };

		// Degraded output is never cached, so recovery shows up on the next
		// call rather than after the TTL.
		if !degraded {
			self.caches.ranking.insert(key, response.clone(), now);
		}

		Ok(response)
	}
}
