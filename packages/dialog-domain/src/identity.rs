/// The authenticated caller, resolved by the gateway and passed through explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Actor {
	/// Party URN of the caller, e.g. `urn:altinn:person:identifier-no:...`.
	pub party_uri: String,
	/// System users may legitimately have no authorized parties.
	pub is_system_user: bool,
}

impl Actor {
	pub fn new(party_uri: impl Into<String>) -> Self {
		Self { party_uri: party_uri.into(), is_system_user: false }
	}

	pub fn system_user(party_uri: impl Into<String>) -> Self {
		Self { party_uri: party_uri.into(), is_system_user: true }
	}
}
