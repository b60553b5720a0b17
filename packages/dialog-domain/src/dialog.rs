use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{merge::MergeChild, time_serde};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogStatus {
	NotApplicable,
	InProgress,
	Draft,
	Sent,
	RequiresAttention,
	Completed,
}

impl DialogStatus {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.to_ascii_lowercase().as_str() {
			"notapplicable" => Some(Self::NotApplicable),
			"inprogress" => Some(Self::InProgress),
			"draft" => Some(Self::Draft),
			"sent" => Some(Self::Sent),
			"requiresattention" => Some(Self::RequiresAttention),
			"completed" => Some(Self::Completed),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::NotApplicable => "notApplicable",
			Self::InProgress => "inProgress",
			Self::Draft => "draft",
			Self::Sent => "sent",
			Self::RequiresAttention => "requiresAttention",
			Self::Completed => "completed",
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemLabel {
	#[default]
	Default,
	Bin,
	Archive,
}

impl SystemLabel {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.to_ascii_lowercase().as_str() {
			"default" => Some(Self::Default),
			"bin" => Some(Self::Bin),
			"archive" => Some(Self::Archive),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Default => "default",
			Self::Bin => "bin",
			Self::Archive => "archive",
		}
	}
}

/// One localized value, keyed by an ISO 639-1 language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedValue {
	pub language_code: String,
	pub value: String,
}

impl LocalizedValue {
	pub fn new(language_code: impl Into<String>, value: impl Into<String>) -> Self {
		Self { language_code: language_code.into(), value: value.into() }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogContent {
	#[serde(default)]
	pub title: Vec<LocalizedValue>,
	#[serde(default)]
	pub summary: Vec<LocalizedValue>,
	#[serde(default)]
	pub sender_name: Vec<LocalizedValue>,
	#[serde(default)]
	pub additional_info: Vec<LocalizedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentUrl {
	#[serde(default)]
	pub id: Option<Uuid>,
	pub url: String,
	#[serde(default)]
	pub media_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
	#[serde(default)]
	pub id: Option<Uuid>,
	#[serde(default)]
	pub display_name: Vec<LocalizedValue>,
	#[serde(default)]
	pub urls: Vec<AttachmentUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiActionEndpoint {
	#[serde(default)]
	pub id: Option<Uuid>,
	pub url: String,
	pub http_method: String,
	#[serde(default)]
	pub version: Option<String>,
	#[serde(default)]
	pub deprecated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAction {
	#[serde(default)]
	pub id: Option<Uuid>,
	pub action: String,
	#[serde(default)]
	pub authorization_attribute: Option<String>,
	#[serde(default)]
	pub endpoints: Vec<ApiActionEndpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuiAction {
	#[serde(default)]
	pub id: Option<Uuid>,
	pub action: String,
	pub url: String,
	pub priority: String,
	#[serde(default)]
	pub title: Vec<LocalizedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogActivity {
	#[serde(default)]
	pub id: Option<Uuid>,
	pub activity_type: String,
	#[serde(default, with = "time_serde::option")]
	pub created_at: Option<OffsetDateTime>,
	#[serde(default)]
	pub performed_by: Option<String>,
	#[serde(default)]
	pub description: Vec<LocalizedValue>,
	#[serde(default)]
	pub transmission_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogTransmission {
	#[serde(default)]
	pub id: Option<Uuid>,
	pub transmission_type: String,
	#[serde(default, with = "time_serde::option")]
	pub created_at: Option<OffsetDateTime>,
	#[serde(default)]
	pub sender: Option<String>,
	#[serde(default)]
	pub title: Vec<LocalizedValue>,
	#[serde(default)]
	pub summary: Vec<LocalizedValue>,
	#[serde(default)]
	pub attachments: Vec<Attachment>,
}

/// The dialog aggregate. Children are owned by the aggregate and persisted with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
	pub id: Uuid,
	/// Rotated on every mutation; compared against `If-Match` for optimistic concurrency.
	pub revision: Uuid,
	pub org: String,
	pub service_resource: String,
	pub party: String,
	pub status: DialogStatus,
	#[serde(default)]
	pub extended_status: Option<String>,
	#[serde(default)]
	pub external_reference: Option<String>,
	#[serde(default)]
	pub process: Option<String>,
	#[serde(default)]
	pub system_label: SystemLabel,
	#[serde(default)]
	pub api_only: bool,
	#[serde(with = "time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time_serde")]
	pub updated_at: OffsetDateTime,
	#[serde(with = "time_serde")]
	pub content_updated_at: OffsetDateTime,
	#[serde(default, with = "time_serde::option")]
	pub due_at: Option<OffsetDateTime>,
	#[serde(default, with = "time_serde::option")]
	pub expires_at: Option<OffsetDateTime>,
	#[serde(default, with = "time_serde::option")]
	pub deleted_at: Option<OffsetDateTime>,
	pub content: DialogContent,
	#[serde(default)]
	pub attachments: Vec<Attachment>,
	#[serde(default)]
	pub api_actions: Vec<ApiAction>,
	#[serde(default)]
	pub gui_actions: Vec<GuiAction>,
	#[serde(default)]
	pub activities: Vec<DialogActivity>,
	#[serde(default)]
	pub transmissions: Vec<DialogTransmission>,
}

impl Dialog {
	pub fn is_deleted(&self) -> bool {
		self.deleted_at.is_some()
	}
}

macro_rules! impl_merge_child {
	($($ty:ty),+ $(,)?) => {
		$(impl MergeChild for $ty {
			fn merge_id(&self) -> Option<Uuid> {
				self.id
			}

			fn set_merge_id(&mut self, id: Uuid) {
				self.id = Some(id);
			}
		})+
	};
}

impl_merge_child!(
	ApiAction,
	ApiActionEndpoint,
	Attachment,
	AttachmentUrl,
	DialogActivity,
	DialogTransmission,
	GuiAction,
);
