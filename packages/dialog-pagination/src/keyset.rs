use sqlx::{Postgres, QueryBuilder};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use crate::{
	Error, Result,
	order::{FieldKind, SortDir},
};

/// A typed key value carried over from a continuation token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyValue {
	Timestamp(OffsetDateTime),
	Uuid(Uuid),
	Null,
}

/// One column of the keyset position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeysetEntry {
	pub column: &'static str,
	pub dir: SortDir,
	pub value: KeyValue,
}

pub fn parse_key_value(
	kind: FieldKind,
	raw: Option<&str>,
	index: usize,
) -> Result<KeyValue> {
	let Some(raw) = raw else {
		return Ok(KeyValue::Null);
	};

	match kind {
		FieldKind::Timestamp => OffsetDateTime::parse(raw, &Rfc3339)
			.map(KeyValue::Timestamp)
			.map_err(|_| Error::TokenKeyValue { index, expected: kind.label() }),
		FieldKind::Uuid => Uuid::parse_str(raw)
			.map(KeyValue::Uuid)
			.map_err(|_| Error::TokenKeyValue { index, expected: kind.label() }),
	}
}

pub fn render_timestamp(value: OffsetDateTime) -> Option<String> {
	value.format(&Rfc3339).ok()
}

/// Appends the keyset position predicate, wrapped in parentheses, to an open
/// WHERE clause.
///
/// Nulls order the way Postgres defaults do: last under ASC, first under DESC.
/// The predicate is the lexicographic "rows after this position" condition:
/// one OR branch per order field, each branch equality-matching every earlier
/// field and strictly advancing on its own.
pub fn push_keyset_predicate(
	builder: &mut QueryBuilder<'_, Postgres>,
	entries: &[KeysetEntry],
) {
	builder.push("(");

	let mut first_branch = true;

	for (index, entry) in entries.iter().enumerate() {
		if !has_strict_branch(entry) {
			// Ascending from a null key: nothing sorts after null, so rows
			// only advance through the remaining fields.
			continue;
		}
		if !first_branch {
			builder.push(" OR ");
		}

		first_branch = false;

		builder.push("(");

		for earlier in &entries[..index] {
			push_equality(builder, earlier);
			builder.push(" AND ");
		}

		push_strict(builder, entry);
		builder.push(")");
	}

	if first_branch {
		// Every field was an ascending null; no row sorts after this position.
		builder.push("FALSE");
	}

	builder.push(")");
}

fn has_strict_branch(entry: &KeysetEntry) -> bool {
	!(entry.dir == SortDir::Asc && entry.value == KeyValue::Null)
}

fn push_equality(builder: &mut QueryBuilder<'_, Postgres>, entry: &KeysetEntry) {
	match entry.value {
		KeyValue::Null => {
			builder.push(entry.column).push(" IS NULL");
		},
		value => {
			builder.push(entry.column).push(" = ");
			push_bind_value(builder, value);
		},
	}
}

fn push_strict(builder: &mut QueryBuilder<'_, Postgres>, entry: &KeysetEntry) {
	match (entry.dir, entry.value) {
		(SortDir::Asc, KeyValue::Null) => {},
		(SortDir::Asc, value) => {
			builder.push("(").push(entry.column).push(" > ");
			push_bind_value(builder, value);
			builder.push(" OR ").push(entry.column).push(" IS NULL)");
		},
		(SortDir::Desc, KeyValue::Null) => {
			builder.push(entry.column).push(" IS NOT NULL");
		},
		(SortDir::Desc, value) => {
			builder.push(entry.column).push(" < ");
			push_bind_value(builder, value);
		},
	}
}

fn push_bind_value(builder: &mut QueryBuilder<'_, Postgres>, value: KeyValue) {
	match value {
		KeyValue::Timestamp(value) => {
			builder.push_bind(value);
		},
		KeyValue::Uuid(value) => {
			builder.push_bind(value);
		},
		KeyValue::Null => {},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sql_for(entries: &[KeysetEntry]) -> String {
		let mut builder = QueryBuilder::new("");

		push_keyset_predicate(&mut builder, entries);

		builder.sql().to_string()
	}

	fn ts() -> OffsetDateTime {
		OffsetDateTime::UNIX_EPOCH
	}

	#[test]
	fn descending_with_value_advances_strictly() {
		let sql = sql_for(&[
			KeysetEntry {
				column: "created_at",
				dir: SortDir::Desc,
				value: KeyValue::Timestamp(ts()),
			},
			KeysetEntry {
				column: "id",
				dir: SortDir::Asc,
				value: KeyValue::Uuid(Uuid::nil()),
			},
		]);

		assert_eq!(
			sql,
			"((created_at < $1) OR (created_at = $2 AND (id > $3 OR id IS NULL)))"
		);
	}

	#[test]
	fn ascending_null_key_skips_its_own_branch() {
		let sql = sql_for(&[
			KeysetEntry { column: "due_at", dir: SortDir::Asc, value: KeyValue::Null },
			KeysetEntry {
				column: "id",
				dir: SortDir::Asc,
				value: KeyValue::Uuid(Uuid::nil()),
			},
		]);

		assert_eq!(sql, "((due_at IS NULL AND (id > $1 OR id IS NULL)))");
	}

	#[test]
	fn ascending_non_null_key_includes_null_tail() {
		let sql = sql_for(&[KeysetEntry {
			column: "due_at",
			dir: SortDir::Asc,
			value: KeyValue::Timestamp(ts()),
		}]);

		assert_eq!(sql, "(((due_at > $1 OR due_at IS NULL)))");
	}

	#[test]
	fn descending_null_key_advances_into_non_nulls() {
		let sql = sql_for(&[
			KeysetEntry { column: "due_at", dir: SortDir::Desc, value: KeyValue::Null },
			KeysetEntry {
				column: "id",
				dir: SortDir::Asc,
				value: KeyValue::Uuid(Uuid::nil()),
			},
		]);

		assert_eq!(
			sql,
			"((due_at IS NOT NULL) OR (due_at IS NULL AND (id > $1 OR id IS NULL)))"
		);
	}

	#[test]
	fn all_ascending_nulls_match_nothing() {
		let sql = sql_for(&[KeysetEntry {
			column: "due_at",
			dir: SortDir::Asc,
			value: KeyValue::Null,
		}]);

		assert_eq!(sql, "(FALSE)");
	}

	#[test]
	fn parses_typed_key_values() {
		let parsed = parse_key_value(FieldKind::Timestamp, Some("1970-01-01T00:00:00Z"), 0)
			.expect("parse failed");

		assert_eq!(parsed, KeyValue::Timestamp(ts()));

		let parsed = parse_key_value(FieldKind::Uuid, None, 1).expect("parse failed");

		assert_eq!(parsed, KeyValue::Null);

		let err = parse_key_value(FieldKind::Uuid, Some("not-a-uuid"), 2)
			.expect_err("should fail");

		assert!(matches!(err, Error::TokenKeyValue { index: 2, .. }));
	}
}
