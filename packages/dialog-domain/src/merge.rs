use std::collections::HashSet;

use uuid::Uuid;

/// An id-keyed child of the dialog aggregate.
pub trait MergeChild {
	fn merge_id(&self) -> Option<Uuid>;
	fn set_merge_id(&mut self, id: Uuid);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateBehavior {
	Deny,
	Allow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateBehavior {
	Deny,
	Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteBehavior {
	Deny,
	/// Children missing from the incoming snapshot are kept untouched.
	NoOp,
	Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeDelegates {
	pub create: CreateBehavior,
	pub update: UpdateBehavior,
	pub delete: DeleteBehavior,
}

impl Default for MergeDelegates {
	fn default() -> Self {
		Self {
			create: CreateBehavior::Allow,
			update: UpdateBehavior::Replace,
			delete: DeleteBehavior::NoOp,
		}
	}
}

/// One accumulated validation failure. Merging collects issues instead of
/// stopping at the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
	pub field: String,
	pub message: String,
}

impl ValidationIssue {
	pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self { field: field.into(), message: message.into() }
	}
}

/// Assigns time-ordered ids to children that arrived without one.
pub fn ensure_ids<T: MergeChild>(children: &mut [T]) {
	for child in children {
		if child.merge_id().is_none() {
			child.set_merge_id(Uuid::now_v7());
		}
	}
}

/// Merges an incoming snapshot into an existing collection. Plain field
/// replacement on update; see [`merge_children_with`] for collections with
/// nested merge-managed children.
pub fn merge_children<T: MergeChild>(
	field: &str,
	existing: &mut Vec<T>,
	incoming: Vec<T>,
	delegates: MergeDelegates,
	issues: &mut Vec<ValidationIssue>,
) {
	merge_children_with(field, existing, incoming, delegates, issues, |slot, snapshot, _| {
		*slot = snapshot;
	});
}

/// Merges an incoming snapshot into an existing collection, delegating the
/// update step so callers can recurse into nested collections.
///
/// Existing order is preserved; created children append in incoming order.
/// The `apply_update` callback receives the matched existing child with its id
/// already fixed, the incoming snapshot, and the issue collector.
pub fn merge_children_with<T, F>(
	field: &str,
	existing: &mut Vec<T>,
	incoming: Vec<T>,
	delegates: MergeDelegates,
	issues: &mut Vec<ValidationIssue>,
	mut apply_update: F,
) where
	T: MergeChild,
	F: FnMut(&mut T, T, &mut Vec<ValidationIssue>),
{
	let existing_ids: HashSet<Uuid> =
		existing.iter().filter_map(MergeChild::merge_id).collect();
	let mut incoming_ids = HashSet::new();
	let mut creates = Vec::new();

	for (index, mut child) in incoming.into_iter().enumerate() {
		match child.merge_id() {
			Some(id) if existing_ids.contains(&id) => {
				if !incoming_ids.insert(id) {
					issues.push(ValidationIssue::new(
						format!("{field}[{index}].id"),
						format!("Duplicate id {id} in incoming collection."),
					));

					continue;
				}
				match delegates.update {
					UpdateBehavior::Deny => {
						issues.push(ValidationIssue::new(
							format!("{field}[{index}].id"),
							"Updating existing entries is not allowed here.",
						));
					},
					UpdateBehavior::Replace => {
						let slot = existing
							.iter_mut()
							.find(|entry| entry.merge_id() == Some(id));

						if let Some(slot) = slot {
							let mut snapshot = child;

							snapshot.set_merge_id(id);
							apply_update(slot, snapshot, issues);
						}
					},
				}
			},
			merge_id => match delegates.create {
				CreateBehavior::Deny => {
					issues.push(ValidationIssue::new(
						format!("{field}[{index}]"),
						"Creating new entries is not allowed here.",
					));
				},
				CreateBehavior::Allow => {
					if let Some(id) = merge_id {
						if !incoming_ids.insert(id) {
							issues.push(ValidationIssue::new(
								format!("{field}[{index}].id"),
								format!("Duplicate id {id} in incoming collection."),
							));

							continue;
						}
					} else {
						child.set_merge_id(Uuid::now_v7());
					}

					creates.push(child);
				},
			},
		}
	}

	match delegates.delete {
		DeleteBehavior::NoOp => {},
		DeleteBehavior::Remove => {
			existing.retain(|entry| {
				entry.merge_id().is_none_or(|id| incoming_ids.contains(&id))
			});
		},
		DeleteBehavior::Deny => {
			for entry in existing.iter() {
				if let Some(id) = entry.merge_id()
					&& !incoming_ids.contains(&id)
				{
					issues.push(ValidationIssue::new(
						field,
						format!("Entry {id} cannot be removed from this collection."),
					));
				}
			}
		},
	}

	existing.extend(creates);
}

/// Appends incoming entries to an append-only collection. Ids already present,
/// in the stored collection or earlier in the incoming batch, are rejected;
/// existing entries are never modified or removed.
pub fn append_children<T: MergeChild>(
	field: &str,
	existing: &mut Vec<T>,
	incoming: Vec<T>,
	issues: &mut Vec<ValidationIssue>,
) {
	let mut seen: HashSet<Uuid> = existing.iter().filter_map(MergeChild::merge_id).collect();

	for (index, mut child) in incoming.into_iter().enumerate() {
		match child.merge_id() {
			Some(id) if !seen.insert(id) => {
				issues.push(ValidationIssue::new(
					format!("{field}[{index}].id"),
					format!("Entry {id} already exists."),
				));
			},
			Some(_) => existing.push(child),
			None => {
				child.set_merge_id(Uuid::now_v7());
				existing.push(child);
			},
		}
	}
}
