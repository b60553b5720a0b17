use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use dialog_domain::{
	ApiAction, Attachment, Dialog, DialogActivity, DialogContent, DialogStatus,
	DialogTransmission, GuiAction, SystemLabel, ValidationIssue, ensure_ids, time_serde,
};
use dialog_storage::{queries, search_index};

use crate::{DialogService, Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDialogRequest {
	pub id: Option<Uuid>,
	pub org: String,
	pub service_resource: String,
	pub party: String,
	pub status: Option<DialogStatus>,
	pub extended_status: Option<String>,
	pub external_reference: Option<String>,
	pub process: Option<String>,
	pub api_only: bool,
	#[serde(with = "time_serde::option")]
	pub due_at: Option<OffsetDateTime>,
	#[serde(with = "time_serde::option")]
	pub expires_at: Option<OffsetDateTime>,
	pub content: DialogContent,
	pub attachments: Vec<Attachment>,
	pub api_actions: Vec<ApiAction>,
	pub gui_actions: Vec<GuiAction>,
	pub activities: Vec<DialogActivity>,
	pub transmissions: Vec<DialogTransmission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDialogResponse {
	pub id: Uuid,
	pub revision: Uuid,
}

impl DialogService {
	pub async fn create_dialog(
		&self,
		req: CreateDialogRequest,
	) -> Result<CreateDialogResponse> {
		let mut dialog = build_dialog(req)?;

		ensure_ids(&mut dialog.attachments);
		for attachment in &mut dialog.attachments {
			ensure_ids(&mut attachment.urls);
		}
		ensure_ids(&mut dialog.api_actions);
		for action in &mut dialog.api_actions {
			ensure_ids(&mut action.endpoints);
		}
		ensure_ids(&mut dialog.gui_actions);
		ensure_ids(&mut dialog.activities);
		ensure_ids(&mut dialog.transmissions);

		let mut tx = self.db.pool.begin().await?;

		queries::insert_dialog(&mut *tx, &dialog).await?;
		search_index::upsert_search_vector(&mut *tx, &dialog).await?;

		tx.commit().await?;

		tracing::info!(dialog = %dialog.id, party = %dialog.party, "Created dialog.");

		Ok(CreateDialogResponse { id: dialog.id, revision: dialog.revision })
	}
}

fn build_dialog(req: CreateDialogRequest) -> Result<Dialog> {
	let mut issues = Vec::new();

	if req.org.trim().is_empty() {
		issues.push(ValidationIssue::new("org", "Must not be empty."));
	}
	if req.service_resource.trim().is_empty() {
		issues.push(ValidationIssue::new("serviceResource", "Must not be empty."));
	}
	if req.party.trim().is_empty() {
		issues.push(ValidationIssue::new("party", "Must not be empty."));
	}
	if req.content.title.is_empty() {
		issues.push(ValidationIssue::new("content.title", "At least one value is required."));
	}

	check_duplicate_ids("attachments", &req.attachments, &mut issues);
	check_duplicate_ids("apiActions", &req.api_actions, &mut issues);
	check_duplicate_ids("guiActions", &req.gui_actions, &mut issues);
	check_duplicate_ids("activities", &req.activities, &mut issues);
	check_duplicate_ids("transmissions", &req.transmissions, &mut issues);

	if !issues.is_empty() {
		return Err(Error::from_issues(issues));
	}

	let now = OffsetDateTime::now_utc();

	Ok(Dialog {
		id: req.id.unwrap_or_else(Uuid::now_v7),
		revision: Uuid::new_v4(),
		org: req.org,
		service_resource: req.service_resource,
		party: req.party,
		status: req.status.unwrap_or(DialogStatus::NotApplicable),
		extended_status: req.extended_status,
		external_reference: req.external_reference,
		process: req.process,
		system_label: SystemLabel::Default,
		api_only: req.api_only,
		created_at: now,
		updated_at: now,
		content_updated_at: now,
		due_at: req.due_at,
		expires_at: req.expires_at,
		deleted_at: None,
		content: req.content,
		attachments: req.attachments,
		api_actions: req.api_actions,
		gui_actions: req.gui_actions,
		activities: req.activities,
		transmissions: req.transmissions,
	})
}

fn check_duplicate_ids<T: dialog_domain::MergeChild>(
	field: &str,
	children: &[T],
	issues: &mut Vec<ValidationIssue>,
) {
	let mut seen = std::collections::HashSet::new();

	for (index, child) in children.iter().enumerate() {
		if let Some(id) = child.merge_id()
			&& !seen.insert(id)
		{
			issues.push(ValidationIssue::new(
				format!("{field}[{index}].id"),
				format!("Duplicate id {id}."),
			));
		}
	}
}
