pub mod authorized_parties;
pub mod decision;

use std::time::Duration as StdDuration;

use color_eyre::Result;
use reqwest::Client;

pub(crate) fn client(cfg: &dialog_config::Authorization) -> Result<Client> {
	Ok(Client::builder().timeout(StdDuration::from_millis(cfg.timeout_ms)).build()?)
}
