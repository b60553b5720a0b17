use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use dialog_domain::{
	ApiAction, Attachment, DeleteBehavior, Dialog, DialogActivity, DialogContent, DialogStatus,
	DialogTransmission, GuiAction, MergeDelegates, SystemLabel, ValidationIssue,
	append_children, merge_children, merge_children_with, time_serde,
};
use dialog_storage::{queries, search_index};

use crate::{DialogService, Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDialogRequest {
	pub status: Option<DialogStatus>,
	pub extended_status: Option<String>,
	pub external_reference: Option<String>,
	pub process: Option<String>,
	pub system_label: Option<SystemLabel>,
	pub api_only: Option<bool>,
	#[serde(with = "time_serde::option")]
	pub due_at: Option<OffsetDateTime>,
	#[serde(with = "time_serde::option")]
	pub expires_at: Option<OffsetDateTime>,
	pub content: Option<DialogContent>,
	pub attachments: Option<Vec<Attachment>>,
	pub api_actions: Option<Vec<ApiAction>>,
	pub gui_actions: Option<Vec<GuiAction>>,
	pub activities: Vec<DialogActivity>,
	pub transmissions: Vec<DialogTransmission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDialogResponse {
	pub id: Uuid,
	pub revision: Uuid,
}

impl DialogService {
	pub async fn update_dialog(
		&self,
		id: Uuid,
		if_match: Uuid,
		req: UpdateDialogRequest,
	) -> Result<UpdateDialogResponse> {
		let mut dialog = queries::fetch_dialog(&self.db.pool, id)
			.await?
			.filter(|dialog| !dialog.is_deleted())
			.ok_or_else(|| Error::not_found(format!("Dialog {id} does not exist.")))?;

		if dialog.revision != if_match {
			return Err(Error::conflict(format!(
				"Revision {if_match} is stale for dialog {id}."
			)));
		}

		let expected_revision = dialog.revision;
		let content_changed = apply(&mut dialog, req)?;
		let now = OffsetDateTime::now_utc();

		dialog.revision = Uuid::new_v4();
		dialog.updated_at = now;
		if content_changed {
			dialog.content_updated_at = now;
		}

		let mut tx = self.db.pool.begin().await?;

		if !queries::update_dialog(&mut *tx, &dialog, expected_revision).await? {
			return Err(Error::conflict(format!("Dialog {id} was modified concurrently.")));
		}

		search_index::upsert_search_vector(&mut *tx, &dialog).await?;

		tx.commit().await?;

		tracing::info!(dialog = %dialog.id, revision = %dialog.revision, "Updated dialog.");

		Ok(UpdateDialogResponse { id: dialog.id, revision: dialog.revision })
	}
}

/// Applies the snapshot onto the stored aggregate. Returns true when the
/// user-visible content changed and `contentUpdatedAt` must advance.
fn apply(dialog: &mut Dialog, req: UpdateDialogRequest) -> Result<bool> {
	let mut issues = Vec::new();
	let mut content_changed = false;

	if let Some(status) = req.status {
		dialog.status = status;
	}
	if req.extended_status.is_some() {
		dialog.extended_status = req.extended_status;
	}
	if req.external_reference.is_some() {
		dialog.external_reference = req.external_reference;
	}
	if req.process.is_some() {
		dialog.process = req.process;
	}
	if let Some(label) = req.system_label {
		dialog.system_label = label;
	}
	if let Some(api_only) = req.api_only {
		dialog.api_only = api_only;
	}
	if req.due_at.is_some() {
		dialog.due_at = req.due_at;
	}
	if req.expires_at.is_some() {
		dialog.expires_at = req.expires_at;
	}
	if let Some(content) = req.content {
		if content.title.is_empty() {
			issues.push(ValidationIssue::new(
				"content.title",
				"At least one value is required.",
			));
		} else if dialog.content != content {
			dialog.content = content;
			content_changed = true;
		}
	}

	if let Some(attachments) = req.attachments {
		let before = dialog.attachments.clone();

		merge_children_with(
			"attachments",
			&mut dialog.attachments,
			attachments,
			MergeDelegates::default(),
			&mut issues,
			|slot, snapshot, issues| {
				let urls = std::mem::take(&mut slot.urls);

				*slot = snapshot;

				let incoming = std::mem::replace(&mut slot.urls, urls);

				merge_children(
					"attachments.urls",
					&mut slot.urls,
					incoming,
					MergeDelegates::default(),
					issues,
				);
			},
		);

		if dialog.attachments != before {
			content_changed = true;
		}
	}
	if let Some(api_actions) = req.api_actions {
		merge_children_with(
			"apiActions",
			&mut dialog.api_actions,
			api_actions,
			MergeDelegates::default(),
			&mut issues,
			|slot, snapshot, issues| {
				let endpoints = std::mem::take(&mut slot.endpoints);

				*slot = snapshot;

				let incoming = std::mem::replace(&mut slot.endpoints, endpoints);

				merge_children(
					"apiActions.endpoints",
					&mut slot.endpoints,
					incoming,
					MergeDelegates::default(),
					issues,
				);
			},
		);
	}
	if let Some(gui_actions) = req.gui_actions {
		merge_children(
			"guiActions",
			&mut dialog.gui_actions,
			gui_actions,
			MergeDelegates { delete: DeleteBehavior::Remove, ..MergeDelegates::default() },
			&mut issues,
		);
	}

	append_children("activities", &mut dialog.activities, req.activities, &mut issues);
	append_children("transmissions", &mut dialog.transmissions, req.transmissions, &mut issues);

	if !issues.is_empty() {
		return Err(Error::from_issues(issues));
	}

	Ok(content_changed)
}
