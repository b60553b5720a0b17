use std::sync::Arc;

use dialog_service::DialogService;
use dialog_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DialogService>,
}

impl AppState {
	pub async fn new(config: dialog_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = DialogService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
