pub mod area;
pub mod rank;
pub mod score;
pub mod time_serde;
pub mod types;
pub mod window;

pub use area::normalize_area_name;
pub use rank::rank_areas;
pub use types::{
	AreaPriceProfile, AreaSentimentDetail, GlobalSentiment, MarketSnapshot, PriceAggregateRow,
	RankedArea, ReviewSummary, SentimentAggregateRow,
};
