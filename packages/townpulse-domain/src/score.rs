//! Pure arithmetic transforms that put relational and document aggregates
//! onto comparable unit-less scales. No I/O, no learned weights; the only
//! tunables are the two composite weights carried by [`Ranking`].

use townpulse_config::Ranking;

pub const RATING_SCALE: f64 = 5.0;
/// One point of volume boost per hundred reviews, capped at +30%.
pub const VOLUME_BOOST_CAP: f64 = 0.30;
pub const VOLUME_BOOST_PER_REVIEW: f64 = 1.0 / 100.0;
/// Share of recent reviews, capped at +20%.
pub const RECENCY_BOOST_CAP: f64 = 0.20;

/// Median price relative to the caller's budget. Below 1.0 means affordable.
/// Callers invert this, so scored rows must have a positive median and a
/// positive budget; both are enforced upstream.
pub fn price_index(median_price: f64, budget: f64) -> f64 {
	median_price / budget
}

/// Rating scaled to [0, 1] with multiplicative volume and recency boosts.
/// An absent rating contributes zero, it does not exclude the area.
pub fn rating_index(avg_rating: Option<f64>, review_count: i64, recent_review_count: i64) -> f64 {
	let rating_scaled = avg_rating.unwrap_or(0.0) / RATING_SCALE;
	let volume_boost =
		(review_count.max(0) as f64 * VOLUME_BOOST_PER_REVIEW).min(VOLUME_BOOST_CAP);
	let recent_share =
		(recent_review_count.max(0) as f64 / review_count.max(1) as f64).clamp(0.0, 1.0);
	let recency_boost = recent_share * RECENCY_BOOST_CAP;

	rating_scaled * (1.0 + volume_boost + recency_boost)
}

pub fn hybrid_score(cfg: &Ranking, price_index: f64, rating_index: f64) -> f64 {
	cfg.weight_price * (1.0 / price_index) + cfg.weight_rating * rating_index
}

#[cfg(test)]
mod tests {
	use townpulse_config::Ranking;

	use super::{hybrid_score, price_index, rating_index};

	#[test]
	fn price_index_is_budget_relative() {
		assert_eq!(price_index(450_000.0, 500_000.0), 0.9);
		assert_eq!(price_index(500_000.0, 500_000.0), 1.0);
	}

	#[test]
	fn absent_rating_contributes_zero_without_excluding() {
		assert_eq!(rating_index(None, 0, 0), 0.0);
		assert_eq!(rating_index(None, 500, 500), 0.0);
	}

	#[test]
	fn volume_boost_caps_at_thirty_percent() {
		let uncapped = rating_index(Some(5.0), 20, 0);
		let capped = rating_index(Some(5.0), 200, 0);

		assert!((uncapped - 1.2).abs() < 1e-12);
		assert!((capped - 1.3).abs() < 1e-12);
		assert_eq!(capped, rating_index(Some(5.0), 10_000, 0));
	}

	#[test]
	fn recency_boost_caps_at_twenty_percent() {
		let all_recent = rating_index(Some(5.0), 1, 1);

		assert!((all_recent - 1.21).abs() < 1e-12);
		// recent_review_count can never exceed review_count, but the share is
		// clamped regardless.
		assert_eq!(rating_index(Some(5.0), 1, 5), all_recent);
	}

	#[test]
	fn hybrid_score_follows_documented_formula() {
		let cfg = Ranking::default();
		// AREA_B from the reference scenario: median 450k against a 500k
		// budget, rating 4.5 with 200 reviews of which 150 are recent.
		let pi = price_index(450_000.0, 500_000.0);
		let ri = rating_index(Some(4.5), 200, 150);
		let expected = 0.60 * (1.0 / 0.9) + 0.40 * (4.5 / 5.0) * (1.0 + 0.30 + 0.15);

		assert!((hybrid_score(&cfg, pi, ri) - expected).abs() < 1e-12);
	}
}
