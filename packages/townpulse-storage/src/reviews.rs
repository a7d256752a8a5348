//! Group-aggregate pipelines over the community review collection. Only
//! aggregates cross this boundary, except for the capped "latest N" list
//! used by display surfaces.

use std::time::Duration;

use futures::TryStreamExt;
use mongodb::{
	Client, Collection,
	bson::{Bson, DateTime as BsonDateTime, Document, doc},
	options::ClientOptions,
};
use time::OffsetDateTime;

use townpulse_domain::{
	AreaSentimentDetail, GlobalSentiment, ReviewSummary, SentimentAggregateRow,
	normalize_area_name,
};

use crate::Result;

/// Reviews created within this many days of call time count as recent.
pub const RECENT_WINDOW_DAYS: i64 = 365;
/// Hard cap on raw documents returned per area, to bound payload size.
pub const LATEST_REVIEWS_LIMIT: i64 = 3;

/// Long-lived, shared handle to the review collection.
pub struct ReviewStore {
	pub collection: Collection<Document>,
}
impl ReviewStore {
	pub async fn connect(cfg: &townpulse_config::Mongo) -> Result<Self> {
		let mut options = ClientOptions::parse(&cfg.uri).await?;

		options.server_selection_timeout = Some(Duration::from_millis(cfg.timeout_ms));
		options.connect_timeout = Some(Duration::from_millis(cfg.timeout_ms));

		let client = Client::with_options(options)?;

		Ok(Self { collection: client.database(&cfg.database).collection(&cfg.collection) })
	}
}

/// One sentiment aggregate row per area present in the collection.
/// Documents with a missing rating still count toward `review_count`;
/// `$avg` skips them for the average. Documents without a town are skipped.
pub async fn area_aggregates(
	store: &ReviewStore,
	now: OffsetDateTime,
) -> Result<Vec<SentimentAggregateRow>> {
	let pipeline = vec![group_by_area_stage(recency_floor(now))];
	let mut cursor = store.collection.aggregate(pipeline).await?;
	let mut rows = Vec::new();

	while let Some(doc) = cursor.try_next().await? {
		if let Some(row) = parse_aggregate_row(&doc) {
			rows.push(row);
		}
	}

	Ok(rows)
}

/// Sentiment aggregate for one area plus its latest review documents,
/// capped at [`LATEST_REVIEWS_LIMIT`]. `area` must already be normalized.
pub async fn area_detail(
	store: &ReviewStore,
	area: &str,
	now: OffsetDateTime,
) -> Result<AreaSentimentDetail> {
	let pipeline =
		vec![doc! { "$match": { "town": area } }, group_by_area_stage(recency_floor(now))];
	let mut cursor = store.collection.aggregate(pipeline).await?;
	let aggregate = match cursor.try_next().await? {
		Some(doc) => parse_aggregate_row(&doc),
		None => None,
	};

	let mut latest_cursor = store
		.collection
		.find(doc! { "town": area })
		.sort(doc! { "created_at": -1 })
		.limit(LATEST_REVIEWS_LIMIT)
		.await?;
	let mut latest_reviews = Vec::new();

	while let Some(doc) = latest_cursor.try_next().await? {
		latest_reviews.push(parse_review_summary(&doc));
	}

	Ok(AreaSentimentDetail { aggregate, latest_reviews })
}

/// Collection-wide average rating and the single most-reviewed area.
/// Ties break by area name ascending; insertion order across areas carries
/// no meaning.
pub async fn global_summary(store: &ReviewStore) -> Result<GlobalSentiment> {
	let mut avg_cursor = store
		.collection
		.aggregate(vec![doc! {
			"$group": { "_id": Bson::Null, "avg_rating": { "$avg": "$rating" } }
		}])
		.await?;
	let avg_rating = match avg_cursor.try_next().await? {
		Some(doc) => doc_f64(&doc, "avg_rating"),
		None => None,
	};

	let mut top_cursor = store
		.collection
		.aggregate(vec![
			doc! { "$group": { "_id": "$town", "count": { "$sum": 1 } } },
			doc! { "$sort": { "count": -1, "_id": 1 } },
			doc! { "$limit": 1 },
		])
		.await?;
	let (most_reviewed_area, most_reviewed_count) = match top_cursor.try_next().await? {
		Some(doc) => (
			doc.get_str("_id").ok().map(normalize_area_name),
			doc_i64(&doc, "count").unwrap_or(0),
		),
		None => (None, 0),
	};

	Ok(GlobalSentiment { avg_rating, most_reviewed_area, most_reviewed_count })
}

fn group_by_area_stage(since: BsonDateTime) -> Document {
	doc! {
		"$group": {
			"_id": "$town",
			"avg_rating": { "$avg": "$rating" },
			"review_count": { "$sum": 1 },
			"recent_review_count": {
				"$sum": { "$cond": [{ "$gte": ["$created_at", since] }, 1, 0] }
			},
			"last_review_at": { "$max": "$created_at" },
		}
	}
}

fn recency_floor(now: OffsetDateTime) -> BsonDateTime {
	let since = now - time::Duration::days(RECENT_WINDOW_DAYS);

	BsonDateTime::from_millis((since.unix_timestamp_nanos() / 1_000_000) as i64)
}

fn parse_aggregate_row(doc: &Document) -> Option<SentimentAggregateRow> {
	let area = doc.get_str("_id").ok()?;

	Some(SentimentAggregateRow {
		area: normalize_area_name(area),
		avg_rating: doc_f64(doc, "avg_rating"),
		review_count: doc_i64(doc, "review_count").unwrap_or(0),
		recent_review_count: doc_i64(doc, "recent_review_count").unwrap_or(0),
		last_review_at: doc_datetime(doc, "last_review_at"),
	})
}

fn parse_review_summary(doc: &Document) -> ReviewSummary {
	ReviewSummary {
		author: doc.get_str("username").unwrap_or_default().to_string(),
		rating: doc_i64(doc, "rating").and_then(|value| i32::try_from(value).ok()),
		text: doc.get_str("review_text").unwrap_or_default().to_string(),
		created_at: doc_datetime(doc, "created_at"),
	}
}

fn doc_f64(doc: &Document, key: &str) -> Option<f64> {
	match doc.get(key) {
		Some(Bson::Double(value)) => Some(*value),
		Some(Bson::Int32(value)) => Some(f64::from(*value)),
		Some(Bson::Int64(value)) => Some(*value as f64),
		_ => None,
	}
}

fn doc_i64(doc: &Document, key: &str) -> Option<i64> {
	match doc.get(key) {
		Some(Bson::Int32(value)) => Some(i64::from(*value)),
		Some(Bson::Int64(value)) => Some(*value),
		Some(Bson::Double(value)) => Some(*value as i64),
		_ => None,
	}
}

fn doc_datetime(doc: &Document, key: &str) -> Option<OffsetDateTime> {
	match doc.get(key) {
		Some(Bson::DateTime(value)) =>
			OffsetDateTime::from_unix_timestamp_nanos(
				i128::from(value.timestamp_millis()) * 1_000_000,
			)
			.ok(),
		_ => None,
	}
}
