use std::time::Duration;

use tokio::time;

use dialog_storage::{db::Db, search_index};

/// Drains the search rebuild queue. Each pass claims one batch and refreshes
/// the vectors; dialogs whose rebuild fails are requeued, and an empty claim
/// backs off for the configured poll interval.
pub async fn run_worker(db: Db, cfg: dialog_config::Worker) -> color_eyre::Result<()> {
	let poll_interval = Duration::from_millis(cfg.poll_interval_ms);

	loop {
		match search_index::claim_rebuild_batch(&db.pool, i64::from(cfg.rebuild_batch_size))
			.await
		{
			Ok(batch) if batch.is_empty() => {
				time::sleep(poll_interval).await;
			},
			Ok(batch) => {
				let claimed = batch.len();
				let mut failed = 0_usize;

				for id in batch {
					if let Err(err) = search_index::rebuild_one(&db.pool, id).await {
						failed += 1;

						tracing::error!(dialog = %id, error = %err, "Search vector rebuild failed.");

						// Failed dialogs go back on the queue for the next pass.
						if let Err(err) = search_index::requeue_rebuild(&db.pool, id).await {
							tracing::error!(dialog = %id, error = %err, "Requeueing dialog for rebuild failed.");
						}
					}
				}

				tracing::info!(claimed, failed, "Processed search rebuild batch.");
			},
			Err(err) => {
				tracing::error!(error = %err, "Claiming search rebuild batch failed.");

				time::sleep(poll_interval).await;
			},
		}
	}
}
