use time::OffsetDateTime;

use townpulse_domain::{ReviewSummary, normalize_area_name};

use crate::{ServiceError, ServiceResult, TownPulseService, cache};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProfileRequest {
	pub area: String,
	pub flat_type: Option<String>,
	pub window_months: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AreaProfileResponse {
	pub area: String,
	/// `None` means no transactions in the window, which is distinct from a
	/// zero price.
	pub median_price: Option<f64>,
	pub p25: Option<f64>,
	pub p75: Option<f64>,
	pub txn_count: i64,
	pub avg_rating: Option<f64>,
	pub review_count: i64,
	pub latest_reviews: Vec<ReviewSummary>,
	pub degraded: bool,
}

impl TownPulseService {
	/// Hybrid profile for one area: windowed price percentiles from the
	/// relational store, sentiment and the latest reviews from the document
	/// store. Sentiment degrades to absent values if that store is down.
	pub async fn area_profile(&self, req: ProfileRequest) -> ServiceResult<AreaProfileResponse> {
		if req.area.trim().is_empty() {
			return Err(ServiceError::InvalidArgument { message: "area is required.".to_string() });
		}

		let flat_type = match req.flat_type.as_deref().map(str::trim) {
			Some("") => {
				return Err(ServiceError::InvalidArgument {
					message: "flat_type must not be empty when provided.".to_string(),
				});
			},
			other => other,
		};
		let area = normalize_area_name(&req.area);
		let window_months = self.resolve_window(req.window_months)?;
		let now = OffsetDateTime::now_utc();
		let key = cache::build_profile_cache_key(&area, flat_type, window_months);

		if let Some(cached) = self.caches.profile.get(&key, now) {
			tracing::debug!(%area, "Serving area profile from snapshot cache.");

			return Ok(cached);
		}

		let price = self
			.call_relational(self.sources.price.area_price_profile(
				&area,
				flat_type,
				window_months,
				now,
			))
			.await?;
		let (detail, degraded) =
			match self.call_document(self.sources.sentiment.area_detail(&area, now)).await {
				Ok(detail) => (detail, false),
				Err(err) => {
					tracing::warn!(
						error = %err,
						%area,
						"Document store unavailable; profile degrades to price-only."
					);

					(townpulse_domain::AreaSentimentDetail {
						aggregate: None,
						latest_reviews: Vec::new(),
					}, true)
				},
			};
		let response = AreaProfileResponse {
			area,
			median_price: price.median_price,
			p25: price.p25,
			p75: price.p75,
			txn_count: price.txn_count,
			avg_rating: detail.aggregate.as_ref().and_then(|aggregate| aggregate.avg_rating),
			review_count: detail
				.aggregate
				.as_ref()
				.map(|aggregate| aggregate.review_count)
				.unwrap_or(0),
			latest_reviews: detail.latest_reviews,
			degraded,
		};

		if !degraded {
			self.caches.profile.insert(key, response.clone(), now);
		}

		Ok(response)
	}
}
