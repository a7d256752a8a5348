//! Read-only analytical queries against the resale transaction schema:
//! `transactions` → `flats` → `towns`. All trailing windows are computed
//! from the caller-supplied `now`, never pre-materialized.

use time::OffsetDateTime;

use townpulse_domain::{AreaPriceProfile, MarketSnapshot, PriceAggregateRow, window};

use crate::{Result, db::Db};

/// Per-area price percentiles and volume over the trailing window,
/// restricted to one unit category and to areas meeting the minimum-sample
/// threshold. Groups under threshold are dropped in SQL, not post-filtered.
pub async fn affordability_aggregates(
	db: &Db,
	flat_type: &str,
	window_months: i32,
	min_sample: i64,
	now: OffsetDateTime,
) -> Result<Vec<PriceAggregateRow>> {
	let window_start = window::trailing_window_start(now, window_months);
	let rows: Vec<(String, f64, f64, f64, i64)> = sqlx::query_as(
		"\
SELECT
	tn.town_name AS area,
	percentile_cont(0.5) WITHIN GROUP (ORDER BY t.txn_price::double precision) AS median_price,
	percentile_cont(0.25) WITHIN GROUP (ORDER BY t.txn_price::double precision) AS p25,
	percentile_cont(0.75) WITHIN GROUP (ORDER BY t.txn_price::double precision) AS p75,
	COUNT(*) AS txn_count
FROM transactions t
JOIN flats f ON f.flat_id = t.flat_id
JOIN towns tn ON tn.town_id = f.town_id
WHERE t.flat_type = $1
	AND t.txn_month >= $2
GROUP BY tn.town_name
HAVING COUNT(*) >= $3
ORDER BY tn.town_name",
	)
	.bind(flat_type)
	.bind(window_start)
	.bind(min_sample)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows
		.into_iter()
		.map(|(area, median_price, p25, p75, txn_count)| PriceAggregateRow {
			area,
			median_price,
			p25,
			p75,
			txn_count,
		})
		.collect())
}

/// Price profile for exactly one area. An empty window yields `None`
/// percentiles with a zero count; "no data" is not reported as zero.
pub async fn area_price_profile(
	db: &Db,
	area: &str,
	flat_type: Option<&str>,
	window_months: i32,
	now: OffsetDateTime,
) -> Result<AreaPriceProfile> {
	let window_start = window::trailing_window_start(now, window_months);
	let (median_price, p25, p75, txn_count): (Option<f64>, Option<f64>, Option<f64>, i64) =
		sqlx::query_as(
			"\
SELECT
	percentile_cont(0.5) WITHIN GROUP (ORDER BY t.txn_price::double precision) AS median_price,
	percentile_cont(0.25) WITHIN GROUP (ORDER BY t.txn_price::double precision) AS p25,
	percentile_cont(0.75) WITHIN GROUP (ORDER BY t.txn_price::double precision) AS p75,
	COUNT(*) AS txn_count
FROM transactions t
JOIN flats f ON f.flat_id = t.flat_id
JOIN towns tn ON tn.town_id = f.town_id
WHERE tn.town_name = $1
	AND t.txn_month >= $2
	AND ($3::text IS NULL OR t.flat_type = $3)",
		)
		.bind(area)
		.bind(window_start)
		.bind(flat_type)
		.fetch_one(&db.pool)
		.await?;

	Ok(AreaPriceProfile { median_price, p25, p75, txn_count })
}

/// Headline tiles only: current-calendar-month volume plus the unwindowed
/// average price. Never used for ranking.
pub async fn market_snapshot(db: &Db, now: OffsetDateTime) -> Result<MarketSnapshot> {
	let month_start = window::month_start(now);
	let next_month_start = window::next_month_start(now);
	let (tx_this_month, avg_price_all): (i64, Option<f64>) = sqlx::query_as(
		"\
SELECT
	COUNT(*) FILTER (WHERE t.txn_month >= $1 AND t.txn_month < $2) AS tx_this_month,
	AVG(t.txn_price)::double precision AS avg_price_all
FROM transactions t",
	)
	.bind(month_start)
	.bind(next_month_start)
	.fetch_one(&db.pool)
	.await?;

	Ok(MarketSnapshot { tx_this_month, avg_price_all })
}
