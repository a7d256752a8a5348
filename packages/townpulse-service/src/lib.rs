mod cache;

pub mod overview;
pub mod profile;
pub mod ranking;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use time::OffsetDateTime;

pub use overview::OverviewSnapshot;
pub use profile::{AreaProfileResponse, ProfileRequest};
pub use ranking::{RankingRequest, RankingResponse};

use cache::SnapshotCache;
use townpulse_config::Config;
use townpulse_domain::{
	AreaPriceProfile, AreaSentimentDetail, GlobalSentiment, MarketSnapshot, PriceAggregateRow,
	SentimentAggregateRow,
};
use townpulse_storage::{db::Db, resale, reviews, reviews::ReviewStore};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type SourceResult<T> = Result<T, SourceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreKind {
	Relational,
	Document,
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidArgument { message: String },
	DataSourceUnavailable { store: StoreKind, message: String },
}

/// Failure surfaced by an aggregate source. Every source-level failure is an
/// availability problem from this subsystem's perspective; argument
/// validation happens before any query is issued.
#[derive(Debug)]
pub enum SourceError {
	Unavailable { message: String },
}

/// Narrow capability over the relational analytical store. The ranking
/// logic never sees SQL, only normalized row shapes.
pub trait PriceSource
where
	Self: Send + Sync,
{
	fn affordability_aggregates<'a>(
		&'a self,
		flat_type: &'a str,
		window_months: i32,
		min_sample: i64,
		now: OffsetDateTime,
	) -> BoxFuture<'a, SourceResult<Vec<PriceAggregateRow>>>;

	fn area_price_profile<'a>(
		&'a self,
		area: &'a str,
		flat_type: Option<&'a str>,
		window_months: i32,
		now: OffsetDateTime,
	) -> BoxFuture<'a, SourceResult<AreaPriceProfile>>;

	fn market_snapshot<'a>(&'a self, now: OffsetDateTime)
	-> BoxFuture<'a, SourceResult<MarketSnapshot>>;
}

/// Narrow capability over the document review store.
pub trait SentimentSource
where
	Self: Send + Sync,
{
	fn area_aggregates<'a>(
		&'a self,
		now: OffsetDateTime,
	) -> BoxFuture<'a, SourceResult<Vec<SentimentAggregateRow>>>;

	fn area_detail<'a>(
		&'a self,
		area: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, SourceResult<AreaSentimentDetail>>;

	fn global_summary<'a>(&'a self) -> BoxFuture<'a, SourceResult<GlobalSentiment>>;
}

#[derive(Clone)]
pub struct Sources {
	pub price: Arc<dyn PriceSource>,
	pub sentiment: Arc<dyn SentimentSource>,
}

pub struct TownPulseService {
	pub cfg: Config,
	pub sources: Sources,
	caches: Caches,
}

struct Caches {
	overview: SnapshotCache<OverviewSnapshot>,
	ranking: SnapshotCache<RankingResponse>,
	profile: SnapshotCache<AreaProfileResponse>,
}

struct PgPriceSource {
	db: Db,
}

struct MongoSentimentSource {
	store: ReviewStore,
}

impl StoreKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Relational => "relational",
			Self::Document => "document",
		}
	}
}

impl std::fmt::Display for StoreKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidArgument { message } => write!(f, "Invalid argument: {message}"),
			Self::DataSourceUnavailable { store, message } => {
				write!(f, "{store} store unavailable: {message}")
			},
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<townpulse_storage::Error> for SourceError {
	fn from(err: townpulse_storage::Error) -> Self {
		Self::Unavailable { message: err.to_string() }
	}
}

impl Sources {
	pub fn new(price: Arc<dyn PriceSource>, sentiment: Arc<dyn SentimentSource>) -> Self {
		Self { price, sentiment }
	}
}

impl PriceSource for PgPriceSource {
	fn affordability_aggregates<'a>(
		&'a self,
		flat_type: &'a str,
		window_months: i32,
		min_sample: i64,
		now: OffsetDateTime,
	) -> BoxFuture<'a, SourceResult<Vec<PriceAggregateRow>>> {
		Box::pin(async move {
			Ok(resale::affordability_aggregates(&self.db, flat_type, window_months, min_sample, now)
				.await?)
		})
	}

	fn area_price_profile<'a>(
		&'a self,
		area: &'a str,
		flat_type: Option<&'a str>,
		window_months: i32,
		now: OffsetDateTime,
	) -> BoxFuture<'a, SourceResult<AreaPriceProfile>> {
		Box::pin(async move {
			Ok(resale::area_price_profile(&self.db, area, flat_type, window_months, now).await?)
		})
	}

	fn market_snapshot<'a>(
		&'a self,
		now: OffsetDateTime,
	) -> BoxFuture<'a, SourceResult<MarketSnapshot>> {
		Box::pin(async move { Ok(resale::market_snapshot(&self.db, now).await?) })
	}
}

impl SentimentSource for MongoSentimentSource {
	fn area_aggregates<'a>(
		&'a self,
		now: OffsetDateTime,
	) -> BoxFuture<'a, SourceResult<Vec<SentimentAggregateRow>>> {
		Box::pin(async move { Ok(reviews::area_aggregates(&self.store, now).await?) })
	}

	fn area_detail<'a>(
		&'a self,
		area: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, SourceResult<AreaSentimentDetail>> {
		Box::pin(async move { Ok(reviews::area_detail(&self.store, area, now).await?) })
	}

	fn global_summary<'a>(&'a self) -> BoxFuture<'a, SourceResult<GlobalSentiment>> {
		Box::pin(async move { Ok(reviews::global_summary(&self.store).await?) })
	}
}

impl TownPulseService {
	pub fn new(cfg: Config, db: Db, reviews: ReviewStore) -> Self {
		let sources = Sources::new(
			Arc::new(PgPriceSource { db }),
			Arc::new(MongoSentimentSource { store: reviews }),
		);

		Self::with_sources(cfg, sources)
	}

	pub fn with_sources(cfg: Config, sources: Sources) -> Self {
		let caches = Caches {
			overview: SnapshotCache::new(cfg.cache.overview_ttl_minutes),
			ranking: SnapshotCache::new(cfg.cache.ranking_ttl_minutes),
			profile: SnapshotCache::new(cfg.cache.profile_ttl_minutes),
		};

		Self { cfg, sources, caches }
	}

	pub(crate) async fn call_relational<T>(
		&self,
		fut: BoxFuture<'_, SourceResult<T>>,
	) -> ServiceResult<T> {
		call_store(StoreKind::Relational, self.cfg.storage.postgres.timeout_ms, fut).await
	}

	pub(crate) async fn call_document<T>(
		&self,
		fut: BoxFuture<'_, SourceResult<T>>,
	) -> ServiceResult<T> {
		call_store(StoreKind::Document, self.cfg.storage.mongodb.timeout_ms, fut).await
	}

	pub(crate) fn resolve_window(&self, window_months: Option<i32>) -> ServiceResult<i32> {
		let window = window_months.unwrap_or(self.cfg.ranking.default_window_months);

		if window < 1 {
			return Err(ServiceError::InvalidArgument {
				message: "window_months must be at least one.".to_string(),
			});
		}

		Ok(window)
	}
}

async fn call_store<T>(
	store: StoreKind,
	timeout_ms: u64,
	fut: BoxFuture<'_, SourceResult<T>>,
) -> ServiceResult<T> {
	match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
		Ok(Ok(value)) => Ok(value),
		Ok(Err(SourceError::Unavailable { message })) => {
			Err(ServiceError::DataSourceUnavailable { store, message })
		},
		Err(_) => Err(ServiceError::DataSourceUnavailable {
			store,
			message: format!("Query timed out after {timeout_ms}ms."),
		}),
	}
}
