use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
	Asc,
	Desc,
}

impl SortDir {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}

	pub fn sign(self) -> char {
		match self {
			Self::Asc => '+',
			Self::Desc => '-',
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	Timestamp,
	Uuid,
}

impl FieldKind {
	pub fn label(self) -> &'static str {
		match self {
			Self::Timestamp => "RFC 3339 timestamp",
			Self::Uuid => "UUID",
		}
	}
}

/// A sortable field of the paged entity. The tiebreaker must be non-null and
/// unique so every keyset position is total.
pub trait SortField: Copy + Eq + Sized {
	const TIEBREAKER: Self;

	/// Case-insensitive lookup by the field's wire name.
	fn parse(name: &str) -> Option<Self>;
	fn name(self) -> &'static str;
	fn column(self) -> &'static str;
	fn kind(self) -> FieldKind;
	fn nullable(self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey<F> {
	pub field: F,
	pub dir: SortDir,
}

/// A validated order set, always terminated by the tiebreaker field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSet<F>(Vec<OrderKey<F>>);

impl<F: SortField> OrderSet<F> {
	pub fn new(keys: Vec<OrderKey<F>>) -> Result<Self> {
		let mut set = Self(Vec::with_capacity(keys.len() + 1));

		for key in keys {
			if set.0.iter().any(|existing| existing.field == key.field) {
				return Err(Error::DuplicateField { name: key.field.name().to_string() });
			}

			set.0.push(key);
		}

		set.ensure_tiebreaker();

		Ok(set)
	}

	/// Parses `"createdAt_desc,dueAt_asc"`. A segment without a direction
	/// suffix sorts ascending.
	pub fn parse(raw: &str) -> Result<Self> {
		let mut keys = Vec::new();

		for segment in raw.split(',') {
			let segment = segment.trim();

			if segment.is_empty() {
				return Err(Error::InvalidSegment { raw: segment.to_string() });
			}

			let lowered = segment.to_ascii_lowercase();
			let (name, dir) = if let Some(name) = lowered.strip_suffix("_desc") {
				(name, SortDir::Desc)
			} else if let Some(name) = lowered.strip_suffix("_asc") {
				(name, SortDir::Asc)
			} else {
				(lowered.as_str(), SortDir::Asc)
			};
			let field = F::parse(name)
				.ok_or_else(|| Error::UnknownField { name: name.to_string() })?;

			keys.push(OrderKey { field, dir });
		}

		Self::new(keys)
	}

	pub fn keys(&self) -> &[OrderKey<F>] {
		&self.0
	}

	/// Signed tokens like `-createdAt,+id`, used to pin the order inside
	/// continuation tokens.
	pub fn signed_tokens(&self) -> Vec<String> {
		self.0.iter().map(|key| format!("{}{}", key.dir.sign(), key.field.name())).collect()
	}

	pub fn matches_signed_tokens(&self, tokens: &[String]) -> bool {
		let own = self.signed_tokens();

		own.len() == tokens.len()
			&& own.iter().zip(tokens).all(|(a, b)| a.eq_ignore_ascii_case(b))
	}

	fn ensure_tiebreaker(&mut self) {
		if self.0.iter().any(|key| key.field == F::TIEBREAKER) {
			return;
		}

		self.0.push(OrderKey { field: F::TIEBREAKER, dir: SortDir::Asc });
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	enum Field {
		CreatedAt,
		DueAt,
		Id,
	}

	impl SortField for Field {
		const TIEBREAKER: Self = Self::Id;

		fn parse(name: &str) -> Option<Self> {
			match name {
				"createdat" => Some(Self::CreatedAt),
				"dueat" => Some(Self::DueAt),
				"id" => Some(Self::Id),
				_ => None,
			}
		}

		fn name(self) -> &'static str {
			match self {
				Self::CreatedAt => "createdAt",
				Self::DueAt => "dueAt",
				Self::Id => "id",
			}
		}

		fn column(self) -> &'static str {
			match self {
				Self::CreatedAt => "created_at",
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

	#[test]
	fn parse_is_case_insensitive_and_appends_tiebreaker() {
		let order: OrderSet<Field> = OrderSet::parse("CreatedAt_DESC").expect("parse failed");

		assert_eq!(order.keys().len(), 2);
		assert_eq!(order.keys()[0].field, Field::CreatedAt);
		assert_eq!(order.keys()[0].dir, SortDir::Desc);
		assert_eq!(order.keys()[1].field, Field::Id);
		assert_eq!(order.keys()[1].dir, SortDir::Asc);
	}

	#[test]
	fn segment_without_suffix_sorts_ascending() {
		let order: OrderSet<Field> = OrderSet::parse("dueAt").expect("parse failed");

		assert_eq!(order.keys()[0].dir, SortDir::Asc);
	}

	#[test]
	fn explicit_tiebreaker_is_not_duplicated() {
		let order: OrderSet<Field> = OrderSet::parse("id_desc").expect("parse failed");

		assert_eq!(order.keys().len(), 1);
		assert_eq!(order.keys()[0].dir, SortDir::Desc);
	}

	#[test]
	fn duplicate_fields_are_rejected() {
		let err = OrderSet::<Field>::parse("createdAt,createdAt_desc").expect_err("should fail");

		assert_eq!(err, Error::DuplicateField { name: "createdAt".to_string() });
	}

	#[test]
	fn unknown_fields_are_rejected() {
		let err = OrderSet::<Field>::parse("priority_desc").expect_err("should fail");

		assert!(matches!(err, Error::UnknownField { .. }));
	}

	#[test]
	fn signed_tokens_round_trip() {
		let order: OrderSet<Field> =
			OrderSet::parse("createdAt_desc,dueAt").expect("parse failed");
		let tokens = order.signed_tokens();

		assert_eq!(tokens, vec!["-createdAt", "+dueAt", "+id"]);
		assert!(order.matches_signed_tokens(&tokens));

		let other: OrderSet<Field> = OrderSet::parse("createdAt_asc").expect("parse failed");

		assert!(!other.matches_signed_tokens(&tokens));
	}
}
