use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One node of the upstream authorized-parties response, mapped to domain terms.
///
/// The provider layer strips URN prefixes before this type is built: roles are
/// lowercased role codes, resources are bare resource ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedParty {
	pub party: String,
	pub name: String,
	#[serde(default)]
	pub authorized_roles: Vec<String>,
	#[serde(default)]
	pub authorized_resources: Vec<String>,
	#[serde(default)]
	pub authorized_instances: Vec<InstanceDelegation>,
	#[serde(default)]
	pub sub_parties: Vec<AuthorizedParty>,
	/// Set on flattened copies only; the owning tree keeps `None`.
	#[serde(default)]
	pub parent_party: Option<String>,
}

/// A dialog delegated at instance level rather than through a party resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceDelegation {
	pub resource_id: String,
	pub instance_id: Uuid,
}

/// A role-code-to-resource mapping row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectResource {
	pub subject: String,
	pub resource: String,
}

/// Request-level filters that narrow which authorizations count.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchAuthorizationConstraints<'a> {
	pub parties: &'a [String],
	pub resources: &'a [String],
}

/// The flat authorization set that scopes an end-user search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogSearchAuthorizationResult {
	pub resources_by_party: HashMap<String, HashSet<String>>,
	/// Instance-delegated dialog ids, authorized regardless of party resources.
	pub dialog_ids: Vec<Uuid>,
}

impl DialogSearchAuthorizationResult {
	pub fn is_empty(&self) -> bool {
		self.resources_by_party.is_empty() && self.dialog_ids.is_empty()
	}

	pub fn parties(&self) -> Vec<&str> {
		let mut parties = self.resources_by_party.keys().map(String::as_str).collect::<Vec<_>>();

		parties.sort_unstable();

		parties
	}

	pub fn distinct_resources(&self) -> HashSet<&str> {
		self.resources_by_party.values().flatten().map(String::as_str).collect()
	}
}

/// Flattens the party tree into one list covering every depth. Each flattened
/// party carries a `parent_party` back-reference to its immediate parent and an
/// emptied `sub_parties`; top-level parties keep `parent_party = None`.
pub fn flatten(parties: Vec<AuthorizedParty>) -> Vec<AuthorizedParty> {
	let mut flat = Vec::with_capacity(parties.len());

	for party in parties {
		flatten_into(party, None, &mut flat);
	}

	flat
}

fn flatten_into(
	mut party: AuthorizedParty,
	parent: Option<String>,
	flat: &mut Vec<AuthorizedParty>,
) {
	let sub_parties = std::mem::take(&mut party.sub_parties);
	let own = party.party.clone();

	party.parent_party = parent;

	flat.push(party);

	for sub_party in sub_parties {
		flatten_into(sub_party, Some(own.clone()), flat);
	}
}

/// Resolves the flat (party, resource) authorization set for a search.
///
/// Per party, the authorized resources are the union of role-derived resources
/// and directly delegated resources. Parties with no remaining resources are
/// dropped. Instance delegations surface as result-level dialog ids.
pub fn resolve_search_authorization(
	parties: &[AuthorizedParty],
	subject_resources: &[SubjectResource],
	constraints: SearchAuthorizationConstraints<'_>,
) -> DialogSearchAuthorizationResult {
	let mut by_subject: HashMap<&str, Vec<&str>> = HashMap::new();

	for row in subject_resources {
		by_subject.entry(row.subject.as_str()).or_default().push(row.resource.as_str());
	}

	let mut result = DialogSearchAuthorizationResult::default();
	let mut seen_dialog_ids = HashSet::new();

	for party in parties {
		if !constraints.parties.is_empty() && !constraints.parties.contains(&party.party) {
			continue;
		}

		let mut resources = HashSet::new();

		for role in &party.authorized_roles {
			if let Some(derived) = by_subject.get(role.as_str()) {
				resources.extend(derived.iter().map(|resource| resource.to_string()));
			}
		}

		resources.extend(party.authorized_resources.iter().cloned());

		if !constraints.resources.is_empty() {
			resources.retain(|resource| constraints.resources.contains(resource));
		}

		for instance in &party.authorized_instances {
			if !constraints.resources.is_empty()
				&& !constraints.resources.contains(&instance.resource_id)
			{
				continue;
			}
			if seen_dialog_ids.insert(instance.instance_id) {
				result.dialog_ids.push(instance.instance_id);
			}
		}

		if !resources.is_empty() {
			match result.resources_by_party.entry(party.party.clone()) {
				std::collections::hash_map::Entry::Occupied(mut entry) => {
					entry.get_mut().extend(resources);
				},
				std::collections::hash_map::Entry::Vacant(entry) => {
					entry.insert(resources);
				},
			}
		}
	}

	result
}
