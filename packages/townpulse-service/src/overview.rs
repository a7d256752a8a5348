use time::OffsetDateTime;

use townpulse_domain::GlobalSentiment;

use crate::{ServiceResult, TownPulseService, cache};

/// Headline tiles: instantaneous market figures plus collection-wide
/// sentiment. Not used for ranking.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverviewSnapshot {
	pub tx_this_month: i64,
	pub avg_price_all: Option<f64>,
	pub avg_rating: Option<f64>,
	pub most_reviewed_area: Option<String>,
	pub most_reviewed_count: i64,
	pub degraded: bool,
}

impl TownPulseService {
	pub async fn overview(&self) -> ServiceResult<OverviewSnapshot> {
		let now = OffsetDateTime::now_utc();
		let key = cache::build_overview_cache_key();

		if let Some(cached) = self.caches.overview.get(&key, now) {
			tracing::debug!("Serving overview from snapshot cache.");

			return Ok(cached);
		}

		let market = self.call_relational(self.sources.price.market_snapshot(now)).await?;
		let (sentiment, degraded) =
			match self.call_document(self.sources.sentiment.global_summary()).await {
				Ok(sentiment) => (sentiment, false),
				Err(err) => {
					tracing::warn!(
						error = %err,
						"Document store unavailable; overview degrades to market-only."
					);

					(GlobalSentiment::default(), true)
				},
			};
		let response = OverviewSnapshot {
			tx_this_month: market.tx_this_month,
			avg_price_all: market.avg_price_all,
			avg_rating: sentiment.avg_rating,
			most_reviewed_area: sentiment.most_reviewed_area,
			most_reviewed_count: sentiment.most_reviewed_count,
			degraded,
		};

		if !degraded {
			self.caches.overview.insert(key, response.clone(), now);
		}

		Ok(response)
	}
}
