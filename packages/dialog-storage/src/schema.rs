/// Idempotent schema, applied statement by statement inside one transaction.
/// Statements must not contain embedded semicolons.
pub const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS dialog (
	id UUID PRIMARY KEY,
	revision UUID NOT NULL,
	org TEXT NOT NULL,
	service_resource TEXT NOT NULL,
	party TEXT NOT NULL,
	status TEXT NOT NULL,
	extended_status TEXT,
	external_reference TEXT,
	process TEXT,
	system_label TEXT NOT NULL DEFAULT 'default',
	api_only BOOLEAN NOT NULL DEFAULT FALSE,
	created_at TIMESTAMPTZ NOT NULL,
	updated_at TIMESTAMPTZ NOT NULL,
	content_updated_at TIMESTAMPTZ NOT NULL,
	due_at TIMESTAMPTZ,
	expires_at TIMESTAMPTZ,
	deleted_at TIMESTAMPTZ,
	content JSONB NOT NULL DEFAULT '{}'::jsonb,
	attachments JSONB NOT NULL DEFAULT '[]'::jsonb,
	api_actions JSONB NOT NULL DEFAULT '[]'::jsonb,
	gui_actions JSONB NOT NULL DEFAULT '[]'::jsonb,
	activities JSONB NOT NULL DEFAULT '[]'::jsonb,
	transmissions JSONB NOT NULL DEFAULT '[]'::jsonb
);

CREATE INDEX IF NOT EXISTS idx_dialog_party_resource
	ON dialog (party, service_resource)
	WHERE deleted_at IS NULL;

CREATE INDEX IF NOT EXISTS idx_dialog_created_at ON dialog (created_at, id);

CREATE INDEX IF NOT EXISTS idx_dialog_updated_at ON dialog (updated_at, id);

CREATE INDEX IF NOT EXISTS idx_dialog_due_at ON dialog (due_at, id);

CREATE TABLE IF NOT EXISTS subject_resource (
	subject TEXT NOT NULL,
	resource TEXT NOT NULL,
	PRIMARY KEY (subject, resource)
);

CREATE TABLE IF NOT EXISTS dialog_search (
	dialog_id UUID PRIMARY KEY REFERENCES dialog (id) ON DELETE CASCADE,
	search_vector TSVECTOR NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_dialog_search_vector
	ON dialog_search
	USING GIN (search_vector);

CREATE TABLE IF NOT EXISTS dialog_search_rebuild_queue (
	dialog_id UUID PRIMARY KEY,
	enqueued_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";
