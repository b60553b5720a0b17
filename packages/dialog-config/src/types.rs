use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub authorization: Authorization,
	pub search: Search,
	pub worker: Worker,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Authorization {
	pub api_base: String,
	pub authorized_parties_path: String,
	pub decision_path: String,
	pub timeout_ms: u64,
	#[serde(default = "default_cache_ttl_secs")]
	pub cache_ttl_secs: u64,
	/// Resolved authorization results for actors with more parties than this are not cached.
	#[serde(default = "default_max_parties_caching_threshold")]
	pub max_parties_caching_threshold: usize,
	/// Pruning is skipped when the resolved result spans this many distinct resources or fewer.
	#[serde(default = "default_min_resources_pruning_threshold")]
	pub min_resources_pruning_threshold: usize,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_page_size")]
	pub default_page_size: u32,
	#[serde(default = "default_max_page_size")]
	pub max_page_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct Worker {
	pub poll_interval_ms: u64,
	pub rebuild_batch_size: u32,
}

fn default_cache_ttl_secs() -> u64 {
	300
}

fn default_max_parties_caching_threshold() -> usize {
	1_500
}

fn default_min_resources_pruning_threshold() -> usize {
	5
}

fn default_page_size() -> u32 {
	100
}

fn default_max_page_size() -> u32 {
	1_000
}
