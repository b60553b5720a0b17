pub mod access;
pub mod cache;
pub mod create;
pub mod delete;
pub mod get;
pub mod reindex;
pub mod search;
pub mod update;

mod error;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

pub use create::{CreateDialogRequest, CreateDialogResponse};
pub use delete::{DeleteDialogRequest, DeleteDialogResponse};
pub use error::{Error, Result};
pub use reindex::ReindexReport;
pub use search::{DialogOrderField, DialogSummary, SearchDialogsRequest};
pub use update::{UpdateDialogRequest, UpdateDialogResponse};

use dialog_config::Config;
use dialog_domain::{Actor, AuthorizedParty, DialogSearchAuthorizationResult};
use dialog_providers::{authorized_parties, decision, decision::DecisionRequest};
use dialog_storage::db::Db;

use crate::{access::AccessKey, cache::TtlCache};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait AuthorizedPartiesProvider
where
	Self: Send + Sync,
{
	fn authorized_parties<'a>(
		&'a self,
		cfg: &'a dialog_config::Authorization,
		actor: &'a Actor,
	) -> BoxFuture<'a, color_eyre::Result<Vec<AuthorizedParty>>>;
}

pub trait DecisionProvider
where
	Self: Send + Sync,
{
	fn authorize<'a>(
		&'a self,
		cfg: &'a dialog_config::Authorization,
		request: DecisionRequest<'a>,
	) -> BoxFuture<'a, color_eyre::Result<bool>>;
}

#[derive(Clone)]
pub struct Providers {
	pub authorized_parties: Arc<dyn AuthorizedPartiesProvider>,
	pub decision: Arc<dyn DecisionProvider>,
}

struct DefaultProviders;

impl AuthorizedPartiesProvider for DefaultProviders {
	fn authorized_parties<'a>(
		&'a self,
		cfg: &'a dialog_config::Authorization,
		actor: &'a Actor,
	) -> BoxFuture<'a, color_eyre::Result<Vec<AuthorizedParty>>> {
		Box::pin(authorized_parties::fetch(cfg, actor))
	}
}

impl DecisionProvider for DefaultProviders {
	fn authorize<'a>(
		&'a self,
		cfg: &'a dialog_config::Authorization,
		request: DecisionRequest<'a>,
	) -> BoxFuture<'a, color_eyre::Result<bool>> {
		Box::pin(decision::authorize(cfg, request))
	}
}

impl Providers {
	pub fn new(
		authorized_parties: Arc<dyn AuthorizedPartiesProvider>,
		decision: Arc<dyn DecisionProvider>,
	) -> Self {
		Self { authorized_parties, decision }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { authorized_parties: provider.clone(), decision: provider }
	}
}

pub struct DialogService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	pub(crate) access_cache: TtlCache<AccessKey, DialogSearchAuthorizationResult>,
}

impl DialogService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, db, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		let access_cache =
			TtlCache::new(Duration::from_secs(cfg.authorization.cache_ttl_secs));

		Self { cfg, db, providers, access_cache }
	}
}
