use std::{cmp::Ordering, collections::HashMap};

use townpulse_config::Ranking;

use crate::{
	area::normalize_area_name,
	score,
	types::{PriceAggregateRow, RankedArea, SentimentAggregateRow},
};

/// Left-outer join of relational price rows with document sentiment rows on
/// normalized area name, scored and ordered. Areas with transactions but no
/// reviews still appear; areas without qualifying transactions never do,
/// because the price rows were threshold-filtered at the source.
///
/// Output is sorted by hybrid score descending, ties broken by area name
/// ascending.
pub fn rank_areas(
	cfg: &Ranking,
	budget: f64,
	price_rows: Vec<PriceAggregateRow>,
	sentiment_rows: Vec<SentimentAggregateRow>,
) -> Vec<RankedArea> {
	let mut sentiment_by_area = HashMap::with_capacity(sentiment_rows.len());

	for row in sentiment_rows {
		sentiment_by_area.insert(normalize_area_name(&row.area), row);
	}

	let mut ranked = Vec::with_capacity(price_rows.len());

	for row in price_rows {
		let sentiment = sentiment_by_area.get(&normalize_area_name(&row.area));
		let price_index = score::price_index(row.median_price, budget);
		let rating_index = match sentiment {
			Some(sentiment) => score::rating_index(
				sentiment.avg_rating,
				sentiment.review_count,
				sentiment.recent_review_count,
			),
			None => 0.0,
		};

		ranked.push(RankedArea {
			area: row.area,
			median_price: row.median_price,
			txn_count: row.txn_count,
			avg_rating: sentiment.and_then(|sentiment| sentiment.avg_rating),
			review_count: sentiment.map(|sentiment| sentiment.review_count).unwrap_or(0),
			hybrid_score: score::hybrid_score(cfg, price_index, rating_index),
		});
	}

	ranked.sort_by(|a, b| {
		b.hybrid_score
			.partial_cmp(&a.hybrid_score)
			.unwrap_or(Ordering::Equal)
			.then_with(|| a.area.cmp(&b.area))
	});

	ranked
}
