use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::Result;

/// Long-lived, shared handle to the read-only analytical Postgres database.
/// Constructed once at process start and injected where needed.
pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &townpulse_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.acquire_timeout(Duration::from_millis(cfg.timeout_ms))
			.connect(&cfg.dsn)
			.await?;

		Ok(Self { pool })
	}
}
