use serde::{Deserialize, Serialize};

use dialog_storage::search_index;

use crate::{DialogService, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReindexReport {
	pub queued: u64,
}

impl DialogService {
	/// Queues every dialog for a search vector rebuild. The worker drains the
	/// queue batch by batch; rows queued twice collapse into one entry.
	pub async fn reindex_search(&self) -> Result<ReindexReport> {
		let queued = search_index::enqueue_rebuild_all(&self.db.pool).await?;

		tracing::info!(queued, "Queued dialogs for search reindexing.");

		Ok(ReindexReport { queued })
	}
}
