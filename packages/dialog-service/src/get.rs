use uuid::Uuid;

use dialog_domain::{Actor, Dialog};
use dialog_storage::queries;

use crate::{DialogService, Error, Result};

impl DialogService {
	/// Fetches one dialog for an end user. Soft-deleted dialogs read as
	/// [`Error::NotFound`]; denied access as [`Error::Forbidden`].
	pub async fn get_dialog(&self, actor: &Actor, id: Uuid) -> Result<Dialog> {
		let dialog = queries::fetch_dialog(&self.db.pool, id)
			.await?
			.filter(|dialog| !dialog.is_deleted())
			.ok_or_else(|| Error::not_found(format!("Dialog {id} does not exist.")))?;

		self.authorize_dialog_read(actor, &dialog).await?;

		Ok(dialog)
	}
}
