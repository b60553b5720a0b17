use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use dialog_domain::{
	Actor, Dialog, DialogStatus, LocalizedValue, SystemLabel, ValidationIssue, time_serde,
};
use dialog_pagination::{
	ContinuationToken, FieldKind, KeysetEntry, OrderSet, PaginatedList, SortField, paginate,
	parse_key_value, push_keyset_predicate, render_timestamp,
};
use dialog_storage::{models::DialogRow, queries::DIALOG_COLUMNS, search_index};

use crate::{DialogService, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOrderField {
	CreatedAt,
	UpdatedAt,
	ContentUpdatedAt,
	DueAt,
	Id,
}

impl SortField for DialogOrderField {
	const TIEBREAKER: Self = Self::Id;

	fn parse(name: &str) -> Option<Self> {
		match name {
			"createdat" => Some(Self::CreatedAt),
			"updatedat" => Some(Self::UpdatedAt),
			"contentupdatedat" => Some(Self::ContentUpdatedAt),
			"dueat" => Some(Self::DueAt),
			"id" => Some(Self::Id),
			_ => None,
		}
	}

	fn name(self) -> &'static str {
		match self {
			Self::CreatedAt => "createdAt",
			Self::UpdatedAt => "updatedAt",
			Self::ContentUpdatedAt => "contentUpdatedAt",
			Self::DueAt => "dueAt",
			Self::Id => "id",
		}
	}

	fn column(self) -> &'static str {
		match self {
			Self::CreatedAt => "created_at",
			Self::UpdatedAt => "updated_at",
			Self::ContentUpdatedAt => "content_updated_at",
			Self::DueAt => "due_at",
			Self::Id => "id",
		}
	}

	fn kind(self) -> FieldKind {
		match self {
			Self::Id => FieldKind::Uuid,
			_ => FieldKind::Timestamp,
		}
	}

	fn nullable(self) -> bool {
		matches!(self, Self::DueAt)
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchDialogsRequest {
	pub org: Vec<String>,
	pub service_resource: Vec<String>,
	pub party: Vec<String>,
	pub extended_status: Vec<String>,
	pub external_reference: Option<String>,
	pub status: Vec<String>,
	pub process: Option<String>,
	pub system_label: Vec<String>,
	pub exclude_api_only: bool,
	#[serde(with = "time_serde::option")]
	pub created_after: Option<OffsetDateTime>,
	#[serde(with = "time_serde::option")]
	pub created_before: Option<OffsetDateTime>,
	#[serde(with = "time_serde::option")]
	pub updated_after: Option<OffsetDateTime>,
	#[serde(with = "time_serde::option")]
	pub updated_before: Option<OffsetDateTime>,
	#[serde(with = "time_serde::option")]
	pub content_updated_after: Option<OffsetDateTime>,
	#[serde(with = "time_serde::option")]
	pub content_updated_before: Option<OffsetDateTime>,
	#[serde(with = "time_serde::option")]
	pub due_after: Option<OffsetDateTime>,
	#[serde(with = "time_serde::option")]
	pub due_before: Option<OffsetDateTime>,
	pub search: Option<String>,
	pub search_language_code: Option<String>,
	pub order_by: Option<String>,
	pub limit: Option<u32>,
	pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogSummary {
	pub id: Uuid,
	pub revision: Uuid,
	pub org: String,
	pub service_resource: String,
	pub party: String,
	pub status: DialogStatus,
	pub extended_status: Option<String>,
	pub external_reference: Option<String>,
	pub process: Option<String>,
	pub system_label: SystemLabel,
	pub api_only: bool,
	#[serde(with = "time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time_serde")]
	pub updated_at: OffsetDateTime,
	#[serde(with = "time_serde")]
	pub content_updated_at: OffsetDateTime,
	#[serde(default, with = "time_serde::option")]
	pub due_at: Option<OffsetDateTime>,
	pub title: Vec<LocalizedValue>,
	pub summary: Vec<LocalizedValue>,
}

impl DialogService {
	pub async fn search_dialogs(
		&self,
		actor: &Actor,
		req: SearchDialogsRequest,
	) -> Result<PaginatedList<DialogSummary>> {
		let limit = req.limit.unwrap_or(self.cfg.search.default_page_size);

		if limit == 0 || limit > self.cfg.search.max_page_size {
			return Err(Error::invalid(format!(
				"limit must be between 1 and {}.",
				self.cfg.search.max_page_size
			)));
		}

		let statuses = parse_statuses(&req.status)?;
		let system_labels = parse_system_labels(&req.system_label)?;
		let order: OrderSet<DialogOrderField> =
			OrderSet::parse(req.order_by.as_deref().unwrap_or("createdAt_desc"))?;
		let keyset = match req.continuation_token.as_deref() {
			Some(raw) => Some(decode_keyset(raw, &order)?),
			None => None,
		};
		let scope =
			self.resolve_search_scope(actor, &req.party, &req.service_resource).await?;

		if scope.is_empty() {
			return Ok(PaginatedList::empty());
		}

		let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
			"SELECT {DIALOG_COLUMNS} FROM dialog WHERE deleted_at IS NULL"
		));

		builder.push(" AND (");

		let mut first = true;

		for party in scope.parties() {
			let resources = scope
				.resources_by_party
				.get(party)
				.map(|resources| {
					let mut resources =
						resources.iter().cloned().collect::<Vec<_>>();

					resources.sort_unstable();

					resources
				})
				.unwrap_or_default();

			if !first {
				builder.push(" OR ");
			}

			first = false;

			builder.push("(party = ");
			builder.push_bind(party.to_string());
			builder.push(" AND service_resource = ANY(");
			builder.push_bind(resources);
			builder.push("))");
		}

		if !scope.dialog_ids.is_empty() {
			if !first {
				builder.push(" OR ");
			}

			builder.push("id = ANY(");
			builder.push_bind(scope.dialog_ids.clone());
			builder.push(")");
		}

		builder.push(")");

		if !req.org.is_empty() {
			builder.push(" AND org = ANY(");
			builder.push_bind(req.org.clone());
			builder.push(")");
		}
		if !req.extended_status.is_empty() {
			builder.push(" AND extended_status = ANY(");
			builder.push_bind(req.extended_status.clone());
			builder.push(")");
		}
		if let Some(reference) = req.external_reference.as_deref() {
			builder.push(" AND external_reference = ");
			builder.push_bind(reference.to_string());
		}
		if !statuses.is_empty() {
			let statuses =
				statuses.iter().map(|status| status.as_str().to_string()).collect::<Vec<_>>();

			builder.push(" AND status = ANY(");
			builder.push_bind(statuses);
			builder.push(")");
		}
		if let Some(process) = req.process.as_deref() {
			builder.push(" AND process = ");
			builder.push_bind(process.to_string());
		}
		if !system_labels.is_empty() {
			let labels = system_labels
				.iter()
				.map(|label| label.as_str().to_string())
				.collect::<Vec<_>>();

			builder.push(" AND system_label = ANY(");
			builder.push_bind(labels);
			builder.push(")");
		}
		if req.exclude_api_only {
			builder.push(" AND api_only = FALSE");
		}

		push_time_bound(&mut builder, "created_at", ">=", req.created_after);
		push_time_bound(&mut builder, "created_at", "<=", req.created_before);
		push_time_bound(&mut builder, "updated_at", ">=", req.updated_after);
		push_time_bound(&mut builder, "updated_at", "<=", req.updated_before);
		push_time_bound(&mut builder, "content_updated_at", ">=", req.content_updated_after);
		push_time_bound(&mut builder, "content_updated_at", "<=", req.content_updated_before);
		push_time_bound(&mut builder, "due_at", ">=", req.due_after);
		push_time_bound(&mut builder, "due_at", "<=", req.due_before);

		if let Some(search) = req.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
			let regconfig = req
				.search_language_code
				.as_deref()
				.map(search_index::regconfig_for)
				.unwrap_or("simple");

			builder.push(
				" AND EXISTS (SELECT 1 FROM dialog_search WHERE dialog_search.dialog_id = dialog.id AND dialog_search.search_vector @@ websearch_to_tsquery(",
			);
			builder.push_bind(regconfig);
			builder.push("::regconfig, ");
			builder.push_bind(search.to_string());
			builder.push("))");
		}

		if let Some(entries) = &keyset {
			builder.push(" AND ");
			push_keyset_predicate(&mut builder, entries);
		}

		builder.push(" ORDER BY ");

		for (index, key) in order.keys().iter().enumerate() {
			if index > 0 {
				builder.push(", ");
			}

			builder.push(key.field.column());
			builder.push(" ");
			builder.push(key.dir.as_sql());
		}

		builder.push(" LIMIT ");
		builder.push_bind(i64::from(limit) + 1);

		let rows: Vec<DialogRow> = builder.build_query_as().fetch_all(&self.db.pool).await?;
		let summaries = rows
			.into_iter()
			.map(|row| row.into_dialog().map(summarize))
			.collect::<Result<Vec<_>, dialog_storage::Error>>()?;

		Ok(paginate(summaries, limit as usize, &order, summary_key))
	}
}

fn summarize(dialog: Dialog) -> DialogSummary {
	DialogSummary {
		id: dialog.id,
		revision: dialog.revision,
		org: dialog.org,
		service_resource: dialog.service_resource,
		party: dialog.party,
		status: dialog.status,
		extended_status: dialog.extended_status,
		external_reference: dialog.external_reference,
		process: dialog.process,
		system_label: dialog.system_label,
		api_only: dialog.api_only,
		created_at: dialog.created_at,
		updated_at: dialog.updated_at,
		content_updated_at: dialog.content_updated_at,
		due_at: dialog.due_at,
		title: dialog.content.title,
		summary: dialog.content.summary,
	}
}

fn summary_key(summary: &DialogSummary, field: DialogOrderField) -> Option<String> {
	match field {
		DialogOrderField::CreatedAt => render_timestamp(summary.created_at),
		DialogOrderField::UpdatedAt => render_timestamp(summary.updated_at),
		DialogOrderField::ContentUpdatedAt => render_timestamp(summary.content_updated_at),
		DialogOrderField::DueAt => summary.due_at.and_then(render_timestamp),
		DialogOrderField::Id => Some(summary.id.to_string()),
	}
}

fn decode_keyset(
	raw: &str,
	order: &OrderSet<DialogOrderField>,
) -> Result<Vec<KeysetEntry>> {
	let token = ContinuationToken::decode(raw)?;

	token.validate_against(order)?;

	order
		.keys()
		.iter()
		.zip(token.keys.iter())
		.enumerate()
		.map(|(index, (key, raw))| {
			if raw.is_none() && !key.field.nullable() {
				return Err(Error::invalid(format!(
					"Continuation token key {index} must not be null for {}.",
					key.field.name()
				)));
			}

			let value = parse_key_value(key.field.kind(), raw.as_deref(), index)?;

			Ok(KeysetEntry { column: key.field.column(), dir: key.dir, value })
		})
		.collect()
}

fn parse_statuses(raw: &[String]) -> Result<Vec<DialogStatus>> {
	let mut statuses = Vec::with_capacity(raw.len());
	let mut issues = Vec::new();

	for (index, value) in raw.iter().enumerate() {
		match DialogStatus::parse(value) {
			Some(status) => statuses.push(status),
			None => issues.push(ValidationIssue::new(
				format!("status[{index}]"),
				format!("Unknown status {value:?}."),
			)),
		}
	}

	if !issues.is_empty() {
		return Err(Error::from_issues(issues));
	}

	Ok(statuses)
}

fn parse_system_labels(raw: &[String]) -> Result<Vec<SystemLabel>> {
	let mut labels = Vec::with_capacity(raw.len());
	let mut issues = Vec::new();

	for (index, value) in raw.iter().enumerate() {
		match SystemLabel::parse(value) {
			Some(label) => labels.push(label),
			None => issues.push(ValidationIssue::new(
				format!("systemLabel[{index}]"),
				format!("Unknown system label {value:?}."),
			)),
		}
	}

	if !issues.is_empty() {
		return Err(Error::from_issues(issues));
	}

	Ok(labels)
}

fn push_time_bound(
	builder: &mut QueryBuilder<'_, Postgres>,
	column: &str,
	op: &str,
	bound: Option<OffsetDateTime>,
) {
	if let Some(bound) = bound {
		builder.push(format!(" AND {column} {op} "));
		builder.push_bind(bound);
	}
}
