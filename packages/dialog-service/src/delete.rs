use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use dialog_storage::{queries, search_index};

use crate::{DialogService, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDialogRequest {
	pub id: Uuid,
	pub if_match: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDialogResponse {
	pub id: Uuid,
	pub revision: Uuid,
}

impl DialogService {
	/// Soft-deletes a dialog. Deleting an already deleted dialog is a no-op
	/// that reports the stored revision.
	pub async fn delete_dialog(
		&self,
		req: DeleteDialogRequest,
	) -> Result<DeleteDialogResponse> {
		let dialog = queries::fetch_dialog(&self.db.pool, req.id)
			.await?
			.ok_or_else(|| Error::not_found(format!("Dialog {} does not exist.", req.id)))?;

		if dialog.is_deleted() {
			return Ok(DeleteDialogResponse { id: dialog.id, revision: dialog.revision });
		}
		if dialog.revision != req.if_match {
			return Err(Error::conflict(format!(
				"Revision {} is stale for dialog {}.",
				req.if_match, req.id
			)));
		}

		let new_revision = Uuid::new_v4();
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let deleted =
			queries::soft_delete_dialog(&mut *tx, req.id, req.if_match, new_revision, now)
				.await?;

		if !deleted {
			return Err(Error::conflict(format!(
				"Dialog {} was modified concurrently.",
				req.id
			)));
		}

		search_index::delete_search_vector(&mut *tx, req.id).await?;

		tx.commit().await?;

		tracing::info!(dialog = %req.id, "Soft-deleted dialog.");

		Ok(DeleteDialogResponse { id: req.id, revision: new_revision })
	}
}
