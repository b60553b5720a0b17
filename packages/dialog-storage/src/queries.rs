use std::collections::HashSet;

use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use dialog_domain::{Dialog, SubjectResource};

use crate::{
	Error, Result,
	models::{DialogDocuments, DialogRow},
};

pub const DIALOG_COLUMNS: &str = "\
id, revision, org, service_resource, party, status, extended_status, external_reference, \
process, system_label, api_only, created_at, updated_at, content_updated_at, due_at, \
expires_at, deleted_at, content, attachments, api_actions, gui_actions, activities, \
transmissions";

pub async fn insert_dialog(executor: impl PgExecutor<'_>, dialog: &Dialog) -> Result<()> {
	let documents = DialogDocuments::render(dialog)?;
	let result = sqlx::query(
		"\
INSERT INTO dialog (
	id, revision, org, service_resource, party, status, extended_status, external_reference,
	process, system_label, api_only, created_at, updated_at, content_updated_at, due_at,
	expires_at, deleted_at, content, attachments, api_actions, gui_actions, activities,
	transmissions
)
VALUES (
	$1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19,
	$20, $21, $22, $23
)
ON CONFLICT (id) DO NOTHING",
	)
	.bind(dialog.id)
	.bind(dialog.revision)
	.bind(&dialog.org)
	.bind(&dialog.service_resource)
	.bind(&dialog.party)
	.bind(dialog.status.as_str())
	.bind(&dialog.extended_status)
	.bind(&dialog.external_reference)
	.bind(&dialog.process)
	.bind(dialog.system_label.as_str())
	.bind(dialog.api_only)
	.bind(dialog.created_at)
	.bind(dialog.updated_at)
	.bind(dialog.content_updated_at)
	.bind(dialog.due_at)
	.bind(dialog.expires_at)
	.bind(dialog.deleted_at)
	.bind(documents.content)
	.bind(documents.attachments)
	.bind(documents.api_actions)
	.bind(documents.gui_actions)
	.bind(documents.activities)
	.bind(documents.transmissions)
	.execute(executor)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::Conflict(format!("Dialog {} already exists.", dialog.id)));
	}

	Ok(())
}

pub async fn fetch_dialog(
	executor: impl PgExecutor<'_>,
	id: Uuid,
) -> Result<Option<Dialog>> {
	let row: Option<DialogRow> =
		sqlx::query_as(&format!("SELECT {DIALOG_COLUMNS} FROM dialog WHERE id = $1"))
			.bind(id)
			.fetch_optional(executor)
			.await?;

	row.map(DialogRow::into_dialog).transpose()
}

/// Writes the full aggregate back, guarded by the expected revision. Returns
/// false when the revision no longer matches.
pub async fn update_dialog(
	executor: impl PgExecutor<'_>,
	dialog: &Dialog,
	expected_revision: Uuid,
) -> Result<bool> {
	let documents = DialogDocuments::render(dialog)?;
	let result = sqlx::query(
		"\
UPDATE dialog
SET revision = $3, status = $4, extended_status = $5, external_reference = $6, process = $7,
	system_label = $8, api_only = $9, updated_at = $10, content_updated_at = $11, due_at = $12,
	expires_at = $13, deleted_at = $14, content = $15, attachments = $16, api_actions = $17,
	gui_actions = $18, activities = $19, transmissions = $20
WHERE id = $1 AND revision = $2",
	)
	.bind(dialog.id)
	.bind(expected_revision)
	.bind(dialog.revision)
	.bind(dialog.status.as_str())
	.bind(&dialog.extended_status)
	.bind(&dialog.external_reference)
	.bind(&dialog.process)
	.bind(dialog.system_label.as_str())
	.bind(dialog.api_only)
	.bind(dialog.updated_at)
	.bind(dialog.content_updated_at)
	.bind(dialog.due_at)
	.bind(dialog.expires_at)
	.bind(dialog.deleted_at)
	.bind(documents.content)
	.bind(documents.attachments)
	.bind(documents.api_actions)
	.bind(documents.gui_actions)
	.bind(documents.activities)
	.bind(documents.transmissions)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn soft_delete_dialog(
	executor: impl PgExecutor<'_>,
	id: Uuid,
	expected_revision: Uuid,
	new_revision: Uuid,
	now: OffsetDateTime,
) -> Result<bool> {
	let result = sqlx::query(
		"\
UPDATE dialog
SET deleted_at = $4, updated_at = $4, revision = $3
WHERE id = $1 AND revision = $2 AND deleted_at IS NULL",
	)
	.bind(id)
	.bind(expected_revision)
	.bind(new_revision)
	.bind(now)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn subject_resources(
	executor: impl PgExecutor<'_>,
	subjects: &[String],
) -> Result<Vec<SubjectResource>> {
	let rows: Vec<(String, String)> = sqlx::query_as(
		"SELECT subject, resource FROM subject_resource WHERE subject = ANY($1)",
	)
	.bind(subjects)
	.fetch_all(executor)
	.await?;

	Ok(rows
		.into_iter()
		.map(|(subject, resource)| SubjectResource { subject, resource })
		.collect())
}

pub async fn upsert_subject_resource(
	executor: impl PgExecutor<'_>,
	subject: &str,
	resource: &str,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO subject_resource (subject, resource)
VALUES ($1, $2)
ON CONFLICT (subject, resource) DO NOTHING",
	)
	.bind(subject)
	.bind(resource)
	.execute(executor)
	.await?;

	Ok(())
}

/// The pruning lookup: which of the candidate (party, resource) pairs have at
/// least one live dialog. One round trip over both distinct lists.
pub async fn existing_party_resource_pairs(
	executor: impl PgExecutor<'_>,
	parties: &[String],
	resources: &[String],
) -> Result<HashSet<(String, String)>> {
	let rows: Vec<(String, String)> = sqlx::query_as(
		"\
SELECT DISTINCT party, service_resource
FROM dialog
WHERE deleted_at IS NULL AND party = ANY($1) AND service_resource = ANY($2)",
	)
	.bind(parties)
	.bind(resources)
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().collect())
}
