use time::OffsetDateTime;

/// Per-area price aggregate over one trailing window. Only produced for
/// areas that met the minimum-sample threshold, so the percentiles are
/// always defined.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PriceAggregateRow {
	pub area: String,
	pub median_price: f64,
	pub p25: f64,
	pub p75: f64,
	pub txn_count: i64,
}

/// Single-area price profile. Percentiles are `None` when the window holds
/// no transactions; zero and "no data" stay distinguishable downstream.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AreaPriceProfile {
	pub median_price: Option<f64>,
	pub p25: Option<f64>,
	pub p75: Option<f64>,
	pub txn_count: i64,
}

/// Instantaneous headline figures, not windowed by the caller.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarketSnapshot {
	pub tx_this_month: i64,
	pub avg_price_all: Option<f64>,
}

/// Per-area sentiment aggregate. A review with a missing rating still
/// counts toward `review_count` but not toward `avg_rating`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SentimentAggregateRow {
	pub area: String,
	pub avg_rating: Option<f64>,
	pub review_count: i64,
	pub recent_review_count: i64,
	#[serde(with = "crate::time_serde::option")]
	pub last_review_at: Option<OffsetDateTime>,
}

/// The only place raw review documents cross the boundary, capped at a
/// small fixed count for display lists.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReviewSummary {
	pub author: String,
	pub rating: Option<i32>,
	pub text: String,
	#[serde(with = "crate::time_serde::option")]
	pub created_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AreaSentimentDetail {
	pub aggregate: Option<SentimentAggregateRow>,
	pub latest_reviews: Vec<ReviewSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlobalSentiment {
	pub avg_rating: Option<f64>,
	pub most_reviewed_area: Option<String>,
	pub most_reviewed_count: i64,
}

/// One row of the composite ranking.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RankedArea {
	pub area: String,
	pub median_price: f64,
	pub txn_count: i64,
	pub avg_rating: Option<f64>,
	pub review_count: i64,
	pub hybrid_score: f64,
}
