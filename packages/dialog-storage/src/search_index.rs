use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use dialog_domain::{Dialog, LocalizedValue};

use crate::{Result, models::DialogRow, queries::DIALOG_COLUMNS};

/// Maps an ISO 639-1 code to the Postgres text search configuration used for
/// both indexing and querying. Unknown codes fall back to `simple` so they
/// still match verbatim.
pub fn regconfig_for(language_code: &str) -> &'static str {
	match language_code.to_ascii_lowercase().as_str() {
		"nb" | "nn" | "no" => "norwegian",
		"en" => "english",
		"da" => "danish",
		"sv" => "swedish",
		"de" => "german",
		"fi" => "finnish",
		"fr" => "french",
		"it" => "italian",
		"nl" => "dutch",
		"es" => "spanish",
		"pt" => "portuguese",
		"ru" => "russian",
		_ => "simple",
	}
}

/// Rebuilds one dialog's weighted search vector. Title carries weight A; all
/// remaining searchable text carries weight B. Idempotent.
pub async fn upsert_search_vector(
	executor: impl PgExecutor<'_>,
	dialog: &Dialog,
) -> Result<()> {
	let mut builder: QueryBuilder<'_, Postgres> =
		QueryBuilder::new("INSERT INTO dialog_search (dialog_id, search_vector) VALUES (");

	builder.push_bind(dialog.id);
	builder.push(", ");

	let mut any = false;
	{
		let mut push_values = |values: &[LocalizedValue], weight: char| {
			for value in values {
				if value.value.trim().is_empty() {
					continue;
				}
				if any {
					builder.push(" || ");
				}

				any = true;

				builder.push("setweight(to_tsvector(");
				builder.push_bind(regconfig_for(&value.language_code));
				builder.push("::regconfig, ");
				builder.push_bind(value.value.clone());
				builder.push(format!("), '{weight}')"));
			}
		};

		push_values(&dialog.content.title, 'A');
		push_values(&dialog.content.summary, 'B');
		push_values(&dialog.content.sender_name, 'B');
		push_values(&dialog.content.additional_info, 'B');

		for attachment in &dialog.attachments {
			push_values(&attachment.display_name, 'B');
		}
		for activity in &dialog.activities {
			push_values(&activity.description, 'B');
		}
		for transmission in &dialog.transmissions {
			push_values(&transmission.title, 'B');
			push_values(&transmission.summary, 'B');

			for attachment in &transmission.attachments {
				push_values(&attachment.display_name, 'B');
			}
		}
	}

	if !any {
		builder.push("''::tsvector");
	}

	builder.push(
		") ON CONFLICT (dialog_id) DO UPDATE SET search_vector = EXCLUDED.search_vector",
	);

	builder.build().execute(executor).await?;

	Ok(())
}

pub async fn delete_search_vector(executor: impl PgExecutor<'_>, id: Uuid) -> Result<()> {
	sqlx::query("DELETE FROM dialog_search WHERE dialog_id = $1")
		.bind(id)
		.execute(executor)
		.await?;

	Ok(())
}

/// Seeds the rebuild queue with every live dialog. Returns the number of newly
/// queued dialogs.
pub async fn enqueue_rebuild_all(executor: impl PgExecutor<'_>) -> Result<u64> {
	let result = sqlx::query(
		"\
INSERT INTO dialog_search_rebuild_queue (dialog_id)
SELECT id FROM dialog WHERE deleted_at IS NULL
ON CONFLICT (dialog_id) DO NOTHING",
	)
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

/// Puts a claimed dialog back on the rebuild queue. Used when its rebuild
/// fails, so the next claim picks it up again.
pub async fn requeue_rebuild(executor: impl PgExecutor<'_>, id: Uuid) -> Result<()> {
	sqlx::query(
		"INSERT INTO dialog_search_rebuild_queue (dialog_id) VALUES ($1) ON CONFLICT (dialog_id) DO NOTHING",
	)
	.bind(id)
	.execute(executor)
	.await?;

	Ok(())
}

/// Claims up to `limit` queued dialogs, removing them from the queue. Rows
/// locked by concurrent workers are skipped.
pub async fn claim_rebuild_batch(pool: &PgPool, limit: i64) -> Result<Vec<Uuid>> {
	let rows: Vec<(Uuid,)> = sqlx::query_as(
		"\
DELETE FROM dialog_search_rebuild_queue
WHERE dialog_id IN (
	SELECT dialog_id
	FROM dialog_search_rebuild_queue
	ORDER BY enqueued_at
	LIMIT $1
	FOR UPDATE SKIP LOCKED
)
RETURNING dialog_id",
	)
	.bind(limit)
	.fetch_all(pool)
	.await?;

	Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Re-indexes one claimed dialog: live dialogs get a fresh vector, deleted or
/// missing ones leave the index.
pub async fn rebuild_one(pool: &PgPool, id: Uuid) -> Result<()> {
	let row: Option<DialogRow> =
		sqlx::query_as(&format!("SELECT {DIALOG_COLUMNS} FROM dialog WHERE id = $1"))
			.bind(id)
			.fetch_optional(pool)
			.await?;

	match row {
		Some(row) if row.deleted_at.is_none() => {
			let dialog = row.into_dialog()?;

			upsert_search_vector(pool, &dialog).await
		},
		_ => delete_search_vector(pool, id).await,
	}
}
