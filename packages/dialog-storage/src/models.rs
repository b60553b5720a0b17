use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use dialog_domain::{Dialog, DialogStatus, SystemLabel};

use crate::{Error, Result};

/// The persisted shape of a dialog: filterable scalars as columns, the child
/// collections as JSONB documents.
#[derive(Debug, sqlx::FromRow)]
pub struct DialogRow {
	pub id: Uuid,
	pub revision: Uuid,
	pub org: String,
	pub service_resource: String,
	pub party: String,
	pub status: String,
	pub extended_status: Option<String>,
	pub external_reference: Option<String>,
	pub process: Option<String>,
	pub system_label: String,
	pub api_only: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub content_updated_at: OffsetDateTime,
	pub due_at: Option<OffsetDateTime>,
	pub expires_at: Option<OffsetDateTime>,
	pub deleted_at: Option<OffsetDateTime>,
	pub content: Value,
	pub attachments: Value,
	pub api_actions: Value,
	pub gui_actions: Value,
	pub activities: Value,
	pub transmissions: Value,
}

impl DialogRow {
	pub fn into_dialog(self) -> Result<Dialog> {
		let status = DialogStatus::parse(&self.status).ok_or_else(|| {
			Error::InvalidArgument(format!("Unknown dialog status {:?}.", self.status))
		})?;
		let system_label = SystemLabel::parse(&self.system_label).ok_or_else(|| {
			Error::InvalidArgument(format!("Unknown system label {:?}.", self.system_label))
		})?;

		Ok(Dialog {
			id: self.id,
			revision: self.revision,
			org: self.org,
			service_resource: self.service_resource,
			party: self.party,
			status,
			extended_status: self.extended_status,
			external_reference: self.external_reference,
			process: self.process,
			system_label,
			api_only: self.api_only,
			created_at: self.created_at,
			updated_at: self.updated_at,
			content_updated_at: self.content_updated_at,
			due_at: self.due_at,
			expires_at: self.expires_at,
			deleted_at: self.deleted_at,
			content: serde_json::from_value(self.content)?,
			attachments: serde_json::from_value(self.attachments)?,
			api_actions: serde_json::from_value(self.api_actions)?,
			gui_actions: serde_json::from_value(self.gui_actions)?,
			activities: serde_json::from_value(self.activities)?,
			transmissions: serde_json::from_value(self.transmissions)?,
		})
	}
}

/// JSONB payloads of a dialog's document-valued columns, ready to bind.
pub struct DialogDocuments {
	pub content: Value,
	pub attachments: Value,
	pub api_actions: Value,
	pub gui_actions: Value,
	pub activities: Value,
	pub transmissions: Value,
}

impl DialogDocuments {
	pub fn render(dialog: &Dialog) -> Result<Self> {
		Ok(Self {
			content: serde_json::to_value(&dialog.content)?,
			attachments: serde_json::to_value(&dialog.attachments)?,
			api_actions: serde_json::to_value(&dialog.api_actions)?,
			gui_actions: serde_json::to_value(&dialog.gui_actions)?,
			activities: serde_json::to_value(&dialog.activities)?,
			transmissions: serde_json::to_value(&dialog.transmissions)?,
		})
	}
}
