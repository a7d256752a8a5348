use mongodb::bson::{DateTime as BsonDateTime, doc};
use time::OffsetDateTime;

use townpulse_domain::window;
use townpulse_storage::{db::Db, resale, reviews, reviews::ReviewStore};
use townpulse_testkit::TestDatabase;

const SCHEMA_SQL: &str = "\
CREATE TABLE towns (
	town_id SERIAL PRIMARY KEY,
	town_name TEXT NOT NULL UNIQUE
);
CREATE TABLE flats (
	flat_id SERIAL PRIMARY KEY,
	town_id INT NOT NULL REFERENCES towns(town_id),
	flat_type TEXT NOT NULL,
	floor_area_sqm DOUBLE PRECISION
);
CREATE TABLE transactions (
	txn_id SERIAL PRIMARY KEY,
	flat_id INT NOT NULL REFERENCES flats(flat_id),
	flat_type TEXT NOT NULL,
	txn_price NUMERIC NOT NULL,
	txn_month DATE NOT NULL,
	remaining_lease_months INT
)";

async fn seed_resale(db: &Db, now: OffsetDateTime) {
	for statement in SCHEMA_SQL.split(';') {
		sqlx::query(statement).execute(&db.pool).await.expect("Failed to create schema.");
	}

	sqlx::query(
		"INSERT INTO towns (town_id, town_name) VALUES (1, 'BEDOK'), (2, 'PUNGGOL')",
	)
	.execute(&db.pool)
	.await
	.expect("Failed to seed towns.");
	sqlx::query(
		"\
INSERT INTO flats (flat_id, town_id, flat_type, floor_area_sqm)
VALUES (1, 1, '4 ROOM', 93.0), (2, 2, '4 ROOM', 95.0)",
	)
	.execute(&db.pool)
	.await
	.expect("Failed to seed flats.");

	let this_month = window::month_start(now);

	// Twelve qualifying transactions for BEDOK, two for PUNGGOL.
	for i in 0..12 {
		sqlx::query(
			"\
INSERT INTO transactions (flat_id, flat_type, txn_price, txn_month)
VALUES (1, '4 ROOM', $1, $2)",
		)
		.bind(480_000.0 + f64::from(i) * 5_000.0)
		.bind(this_month)
		.execute(&db.pool)
		.await
		.expect("Failed to seed transactions.");
	}
	for _ in 0..2 {
		sqlx::query(
			"\
INSERT INTO transactions (flat_id, flat_type, txn_price, txn_month)
VALUES (2, '4 ROOM', $1, $2)",
		)
		.bind(430_000.0)
		.bind(this_month)
		.execute(&db.pool)
		.await
		.expect("Failed to seed transactions.");
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TOWNPULSE_PG_DSN to run."]
async fn resale_reader_filters_threshold_and_orders_by_area() {
	let Some(base_dsn) = townpulse_testkit::env_pg_dsn() else {
		eprintln!("Skipping resale_reader_filters_threshold_and_orders_by_area; set TOWNPULSE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = townpulse_config::Postgres {
		dsn: test_db.dsn().to_string(),
		pool_max_conns: 1,
		timeout_ms: 5_000,
	};
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");
	let now = OffsetDateTime::now_utc();

	seed_resale(&db, now).await;

	let rows = resale::affordability_aggregates(&db, "4 ROOM", 12, 10, now)
		.await
		.expect("Failed to query affordability aggregates.");

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].area, "BEDOK");
	assert_eq!(rows[0].txn_count, 12);
	assert!(rows[0].p25 <= rows[0].median_price && rows[0].median_price <= rows[0].p75);

	let profile = resale::area_price_profile(&db, "BEDOK", Some("4 ROOM"), 12, now)
		.await
		.expect("Failed to query area profile.");

	assert_eq!(profile.txn_count, 12);
	assert!(profile.median_price.is_some());

	let empty = resale::area_price_profile(&db, "PUNGGOL", Some("5 ROOM"), 12, now)
		.await
		.expect("Failed to query empty profile.");

	assert_eq!(empty.txn_count, 0);
	assert_eq!(empty.median_price, None);
	assert_eq!(empty.p25, None);
	assert_eq!(empty.p75, None);

	let snapshot =
		resale::market_snapshot(&db, now).await.expect("Failed to query market snapshot.");

	assert_eq!(snapshot.tx_this_month, 14);
	assert!(snapshot.avg_price_all.is_some());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MongoDB. Set TOWNPULSE_MONGO_URI to run."]
async fn review_reader_aggregates_by_area() {
	let Some(uri) = townpulse_testkit::env_mongo_uri() else {
		eprintln!("Skipping review_reader_aggregates_by_area; set TOWNPULSE_MONGO_URI to run.");

		return;
	};
	let cfg = townpulse_config::Mongo {
		uri,
		database: "townpulse_tests".to_string(),
		collection: townpulse_testkit::unique_collection("reviews"),
		timeout_ms: 5_000,
	};
	let store = ReviewStore::connect(&cfg).await.expect("Failed to connect to MongoDB.");
	let now = OffsetDateTime::now_utc();
	let recent = BsonDateTime::from_millis((now.unix_timestamp_nanos() / 1_000_000) as i64);
	let stale = BsonDateTime::from_millis(
		((now - time::Duration::days(400)).unix_timestamp_nanos() / 1_000_000) as i64,
	);

	store
		.collection
		.insert_many(vec![
			doc! { "town": "BEDOK", "username": "ann", "rating": 5, "review_text": "Great hawkers.", "created_at": recent },
			doc! { "town": "BEDOK", "username": "ben", "rating": 3, "review_text": "Crowded.", "created_at": stale },
			// Rating missing: counts as a review, not toward the average.
			doc! { "town": "BEDOK", "username": "cho", "review_text": "No comment.", "created_at": recent },
			doc! { "town": "PUNGGOL", "username": "dee", "rating": 4, "review_text": "New estate.", "created_at": recent },
		])
		.await
		.expect("Failed to seed reviews.");

	let rows = reviews::area_aggregates(&store, now).await.expect("Failed to aggregate.");
	let bedok = rows.iter().find(|row| row.area == "BEDOK").expect("Expected BEDOK row.");

	assert_eq!(bedok.review_count, 3);
	assert_eq!(bedok.recent_review_count, 2);
	assert_eq!(bedok.avg_rating, Some(4.0));
	assert!(bedok.last_review_at.is_some());

	let detail =
		reviews::area_detail(&store, "BEDOK", now).await.expect("Failed to fetch detail.");

	assert_eq!(detail.latest_reviews.len(), 3);
	assert!(detail.aggregate.is_some());

	let global = reviews::global_summary(&store).await.expect("Failed to fetch summary.");

	assert_eq!(global.most_reviewed_area.as_deref(), Some("BEDOK"));
	assert_eq!(global.most_reviewed_count, 3);

	store.collection.drop().await.expect("Failed to drop test collection.");
}
