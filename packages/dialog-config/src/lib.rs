mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Authorization, Config, Postgres, Search, Service, Storage, Worker};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty"));
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::invalid("service.admin_bind", "must be non-empty"));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::invalid("storage.postgres.dsn", "must be non-empty"));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns", "must be greater than zero"));
	}
	if cfg.authorization.api_base.trim().is_empty() {
		return Err(Error::invalid("authorization.api_base", "must be non-empty"));
	}
	if cfg.authorization.timeout_ms == 0 {
		return Err(Error::invalid("authorization.timeout_ms", "must be greater than zero"));
	}
	if cfg.search.default_page_size == 0 {
		return Err(Error::invalid("search.default_page_size", "must be greater than zero"));
	}
	if cfg.search.default_page_size > cfg.search.max_page_size {
		return Err(Error::invalid(
			"search.default_page_size",
			"must not exceed search.max_page_size",
		));
	}
	if cfg.worker.poll_interval_ms == 0 {
		return Err(Error::invalid("worker.poll_interval_ms", "must be greater than zero"));
	}
	if cfg.worker.rebuild_batch_size == 0 {
		return Err(Error::invalid("worker.rebuild_batch_size", "must be greater than zero"));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let api_base = cfg.authorization.api_base.trim_end_matches('/').to_string();

	cfg.authorization.api_base = api_base;

	for path in
		[&mut cfg.authorization.authorized_parties_path, &mut cfg.authorization.decision_path]
	{
		if !path.starts_with('/') {
			*path = format!("/{path}");
		}
	}
}
