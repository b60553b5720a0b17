pub mod cursor;
pub mod keyset;
pub mod order;

mod error;

pub use cursor::ContinuationToken;
pub use error::{Error, Result};
pub use keyset::{KeyValue, KeysetEntry, parse_key_value, push_keyset_predicate, render_timestamp};
pub use order::{FieldKind, OrderKey, OrderSet, SortDir, SortField};

/// One page of results with the token that continues it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedList<T> {
	pub items: Vec<T>,
	pub has_next: bool,
	#[serde(default)]
	pub continuation_token: Option<String>,
}

impl<T> PaginatedList<T> {
	pub fn empty() -> Self {
		Self { items: Vec::new(), has_next: false, continuation_token: None }
	}
}

/// Turns an overfetched row set (`limit + 1` rows requested) into a page.
/// `key_of` renders one order field of a row into its token string form.
pub fn paginate<T, F, K>(
	mut rows: Vec<T>,
	limit: usize,
	order: &OrderSet<F>,
	key_of: K,
) -> PaginatedList<T>
where
	F: SortField,
	K: Fn(&T, F) -> Option<String>,
{
	let has_next = rows.len() > limit;

	rows.truncate(limit);

	let continuation_token = if has_next {
		rows.last().map(|last| {
			let keys =
				order.keys().iter().map(|key| key_of(last, key.field)).collect::<Vec<_>>();

			ContinuationToken::new(keys, order.signed_tokens()).encode()
		})
	} else {
		None
	};

	PaginatedList { items: rows, has_next, continuation_token }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	enum Field {
		Rank,
		Id,
	}

	impl SortField for Field {
		const TIEBREAKER: Self = Self::Id;

		fn parse(name: &str) -> Option<Self> {
			match name {
				"rank" => Some(Self::Rank),
				"id" => Some(Self::Id),
				_ => None,
			}
		}

		fn name(self) -> &'static str {
			match self {
				Self::Rank => "rank",
				Self::Id => "id",
			}
		}

		fn column(self) -> &'static str {
			self.name()
		}

		fn kind(self) -> FieldKind {
			FieldKind::Uuid
		}

		fn nullable(self) -> bool {
			false
		}
	}

	#[test]
	fn overfetched_rows_produce_a_token_from_the_last_kept_row() {
		let order: OrderSet<Field> = OrderSet::parse("rank").expect("parse failed");
		let page = paginate(vec!["a", "b", "c"], 2, &order, |row, field| {
			Some(format!("{row}-{}", field.name()))
		});

		assert_eq!(page.items, vec!["a", "b"]);
		assert!(page.has_next);

		let token = page.continuation_token.expect("token missing");
		let decoded = ContinuationToken::decode(&token).expect("decode failed");

		assert_eq!(
			decoded.keys,
			vec![Some("b-rank".to_string()), Some("b-id".to_string())]
		);
		assert!(decoded.validate_against(&order).is_ok());
	}

	#[test]
	fn exact_fit_pages_carry_no_token() {
		let order: OrderSet<Field> = OrderSet::parse("rank").expect("parse failed");
		let page = paginate(vec!["a", "b"], 2, &order, |_, _| None);

		assert_eq!(page.items.len(), 2);
		assert!(!page.has_next);
		assert!(page.continuation_token.is_none());
	}

	#[test]
	fn token_from_one_order_fails_validation_under_another() {
		let produced: OrderSet<Field> = OrderSet::parse("rank_desc").expect("parse failed");
		let replayed: OrderSet<Field> = OrderSet::parse("rank_asc").expect("parse failed");
		let page = paginate(vec!["a", "b", "c"], 2, &produced, |_, _| None);
		let token = page.continuation_token.expect("token missing");
		let decoded = ContinuationToken::decode(&token).expect("decode failed");

		assert_eq!(decoded.validate_against(&replayed), Err(Error::OrderMismatch));
	}
}
