//! Time-bucketed memoization of cross-store calls. An explicit
//! key → (value, expiry) map behind one mutex; expired entries are dropped
//! lazily on the next access, never refreshed proactively. Duplicate
//! recomputation on a miss race is tolerated, last writer wins.

use std::{collections::HashMap, sync::Mutex};

use serde_json::Value;
use time::{Duration, OffsetDateTime};

const SNAPSHOT_CACHE_SCHEMA_VERSION: i32 = 1;

pub(crate) struct SnapshotCache<T> {
	ttl: Duration,
	entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

struct CacheEntry<T> {
	value: T,
	expires_at: OffsetDateTime,
}

impl<T> SnapshotCache<T>
where
	T: Clone,
{
	pub(crate) fn new(ttl_minutes: i64) -> Self {
		Self { ttl: Duration::minutes(ttl_minutes), entries: Mutex::new(HashMap::new()) }
	}

	pub(crate) fn get(&self, key: &str, now: OffsetDateTime) -> Option<T> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		match entries.get(key) {
			Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
			Some(_) => {
				entries.remove(key);

				None
			},
			None => None,
		}
	}

	pub(crate) fn insert(&self, key: String, value: T, now: OffsetDateTime) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.insert(key, CacheEntry { value, expires_at: now + self.ttl });
	}
}

pub(crate) fn hash_cache_key(payload: &Value) -> String {
	blake3::hash(payload.to_string().as_bytes()).to_hex().to_string()
}

pub(crate) fn build_overview_cache_key() -> String {
	hash_cache_key(&serde_json::json!({
		"kind": "overview",
		"schema_version": SNAPSHOT_CACHE_SCHEMA_VERSION,
	}))
}

pub(crate) fn build_ranking_cache_key(flat_type: &str, budget: f64, window_months: i32) -> String {
	hash_cache_key(&serde_json::json!({
		"kind": "ranking",
		"schema_version": SNAPSHOT_CACHE_SCHEMA_VERSION,
		"flat_type": flat_type,
		"budget": budget,
		"window_months": window_months,
	}))
}

pub(crate) fn build_profile_cache_key(
	area: &str,
	flat_type: Option<&str>,
	window_months: i32,
) -> String {
	hash_cache_key(&serde_json::json!({
		"kind": "profile",
		"schema_version": SNAPSHOT_CACHE_SCHEMA_VERSION,
		"area": area,
		"flat_type": flat_type,
		"window_months": window_months,
	}))
}
