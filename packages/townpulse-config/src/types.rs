use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub cache: Cache,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default = "default_bind_localhost_only")]
	pub bind_localhost_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub mongodb: Mongo,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_store_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Mongo {
	pub uri: String,
	pub database: String,
	pub collection: String,
	#[serde(default = "default_store_timeout_ms")]
	pub timeout_ms: u64,
}

/// Weights and thresholds for the hybrid affordability ranking. The defaults
/// are the canonical values; anything else is a deliberate retuning.
#[derive(Debug, Deserialize)]
pub struct Ranking {
	#[serde(default = "default_weight_price")]
	pub weight_price: f64,
	#[serde(default = "default_weight_rating")]
	pub weight_rating: f64,
	#[serde(default = "default_min_sample_threshold")]
	pub min_sample_threshold: i64,
	#[serde(default = "default_window_months")]
	pub default_window_months: i32,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
	#[serde(default = "default_overview_ttl_minutes")]
	pub overview_ttl_minutes: i64,
	#[serde(default = "default_ranking_ttl_minutes")]
	pub ranking_ttl_minutes: i64,
	#[serde(default = "default_profile_ttl_minutes")]
	pub profile_ttl_minutes: i64,
}

impl Default for Ranking {
	fn default() -> Self {
		Self {
			weight_price: default_weight_price(),
			weight_rating: default_weight_rating(),
			min_sample_threshold: default_min_sample_threshold(),
			default_window_months: default_window_months(),
		}
	}
}

impl Default for Cache {
	fn default() -> Self {
		Self {
			overview_ttl_minutes: default_overview_ttl_minutes(),
			ranking_ttl_minutes: default_ranking_ttl_minutes(),
			profile_ttl_minutes: default_profile_ttl_minutes(),
		}
	}
}

fn default_bind_localhost_only() -> bool {
	true
}

fn default_store_timeout_ms() -> u64 {
	5_000
}

fn default_weight_price() -> f64 {
	0.60
}

fn default_weight_rating() -> f64 {
	0.40
}

fn default_min_sample_threshold() -> i64 {
	10
}

fn default_window_months() -> i32 {
	12
}

fn default_overview_ttl_minutes() -> i64 {
	5
}

fn default_ranking_ttl_minutes() -> i64 {
	15
}

fn default_profile_ttl_minutes() -> i64 {
	10
}
