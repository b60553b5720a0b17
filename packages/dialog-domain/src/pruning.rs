use std::collections::HashSet;

use crate::authorization::DialogSearchAuthorizationResult;

/// Whether a resolved set is wide enough to prune. Results without parties,
/// or spanning at most `min_resources_threshold` distinct resources, are
/// used as-is.
pub fn should_prune(
	result: &DialogSearchAuthorizationResult,
	min_resources_threshold: usize,
) -> bool {
	if result.resources_by_party.is_empty() {
		return false;
	}

	result.distinct_resources().len() > min_resources_threshold
}

/// Intersects the resolved set with the (party, resource) pairs that actually
/// have dialogs, dropping parties left without any resource. Instance-delegated
/// dialog ids are never pruned.
pub fn retain_existing_pairs(
	result: &mut DialogSearchAuthorizationResult,
	existing: &HashSet<(String, String)>,
) {
	for (party, resources) in result.resources_by_party.iter_mut() {
		resources
			.retain(|resource| existing.contains(&(party.clone(), resource.clone())));
	}

	result.resources_by_party.retain(|_, resources| !resources.is_empty());
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use uuid::Uuid;

	use super::*;

	fn result_with(pairs: &[(&str, &[&str])]) -> DialogSearchAuthorizationResult {
		let mut resources_by_party = HashMap::new();

		for (party, resources) in pairs {
			resources_by_party.insert(
				party.to_string(),
				resources.iter().map(|resource| resource.to_string()).collect(),
			);
		}

		DialogSearchAuthorizationResult { resources_by_party, dialog_ids: Vec::new() }
	}

	#[test]
	fn skips_pruning_without_parties() {
		let result = DialogSearchAuthorizationResult::default();

		assert!(!should_prune(&result, 0));
	}

	#[test]
	fn skips_pruning_at_or_below_threshold() {
		let result = result_with(&[("p1", &["r1", "r2"]), ("p2", &["r2", "r3"])]);

		assert!(!should_prune(&result, 3));
		assert!(should_prune(&result, 2));
	}

	#[test]
	fn retains_only_pairs_with_dialogs() {
		let mut result = result_with(&[("p1", &["r1", "r2"]), ("p2", &["r1"])]);
		let existing = HashSet::from([("p1".to_string(), "r2".to_string())]);

		retain_existing_pairs(&mut result, &existing);

		assert_eq!(result.resources_by_party.len(), 1);
		assert_eq!(
			result.resources_by_party.get("p1").map(|resources| resources.len()),
			Some(1)
		);
		assert!(result.resources_by_party.get("p1").is_some_and(|r| r.contains("r2")));
	}

	#[test]
	fn pruning_keeps_instance_dialog_ids() {
		let instance = Uuid::new_v4();
		let mut result = result_with(&[("p1", &["r1"])]);

		result.dialog_ids.push(instance);

		retain_existing_pairs(&mut result, &HashSet::new());

		assert!(result.resources_by_party.is_empty());
		assert_eq!(result.dialog_ids, vec![instance]);
	}
}
