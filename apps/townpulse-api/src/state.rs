use std::sync::Arc;

use townpulse_service::TownPulseService;
use townpulse_storage::{db::Db, reviews::ReviewStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TownPulseService>,
}
impl AppState {
	pub async fn new(config: townpulse_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;
		let reviews = ReviewStore::connect(&config.storage.mongodb).await?;
		let service = TownPulseService::new(config, db, reviews);

		Ok(Self { service: Arc::new(service) })
	}

	pub fn from_service(service: TownPulseService) -> Self {
		Self { service: Arc::new(service) }
	}
}
