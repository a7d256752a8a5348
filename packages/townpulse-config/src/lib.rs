mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Cache, Config, Mongo, Postgres, Ranking, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.postgres.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("storage.mongodb.uri", &cfg.storage.mongodb.uri),
		("storage.mongodb.database", &cfg.storage.mongodb.database),
		("storage.mongodb.collection", &cfg.storage.mongodb.collection),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.mongodb.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.mongodb.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, weight) in [
		("ranking.weight_price", cfg.ranking.weight_price),
		("ranking.weight_rating", cfg.ranking.weight_rating),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&weight) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	if cfg.ranking.weight_price + cfg.ranking.weight_rating <= 0.0 {
		return Err(Error::Validation {
			message: "ranking weights must not both be zero.".to_string(),
		});
	}
	if cfg.ranking.min_sample_threshold < 1 {
		return Err(Error::Validation {
			message: "ranking.min_sample_threshold must be at least one.".to_string(),
		});
	}
	if cfg.ranking.default_window_months < 1 {
		return Err(Error::Validation {
			message: "ranking.default_window_months must be at least one.".to_string(),
		});
	}

	for (label, ttl) in [
		("cache.overview_ttl_minutes", cfg.cache.overview_ttl_minutes),
		("cache.ranking_ttl_minutes", cfg.cache.ranking_ttl_minutes),
		("cache.profile_ttl_minutes", cfg.cache.profile_ttl_minutes),
	] {
		if ttl <= 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
