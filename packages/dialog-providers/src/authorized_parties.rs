use color_eyre::Result;
use serde::Deserialize;
use uuid::Uuid;

use dialog_domain::{Actor, AuthorizedParty, InstanceDelegation};

const ROLE_PREFIX: &str = "urn:altinn:rolecode:";
const RESOURCE_PREFIX: &str = "urn:altinn:resource:";
const APP_INSTANCE_PREFIX: &str = "app_";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedPartyDto {
	pub party: String,
	pub name: String,
	#[serde(default)]
	pub authorized_roles: Vec<String>,
	#[serde(default)]
	pub authorized_resources: Vec<String>,
	#[serde(default)]
	pub authorized_instances: Vec<AuthorizedInstanceDto>,
	#[serde(default)]
	pub subunits: Vec<AuthorizedPartyDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedInstanceDto {
	pub resource_id: String,
	pub instance_id: String,
}

/// Fetches the caller's authorized-party tree from the upstream access
/// management API.
pub async fn fetch(
	cfg: &dialog_config::Authorization,
	actor: &Actor,
) -> Result<Vec<AuthorizedParty>> {
	let client = crate::client(cfg)?;
	let url = format!("{}{}", cfg.api_base, cfg.authorized_parties_path);
	let body = serde_json::json!({
		"type": "urn:altinn:person:identifier-no",
		"value": actor.party_uri,
	});
	let response = client.post(url).json(&body).send().await?;
	let parties: Vec<AuthorizedPartyDto> = response.error_for_status()?.json().await?;

	Ok(parties.into_iter().map(map_party).collect())
}

/// Maps one upstream node to domain terms: roles are lowercased bare codes,
/// resources are bare ids, and only app instances with UUID ids survive as
/// instance delegations.
pub fn map_party(dto: AuthorizedPartyDto) -> AuthorizedParty {
	let authorized_roles = dto
		.authorized_roles
		.iter()
		.map(|role| {
			role.strip_prefix(ROLE_PREFIX).unwrap_or(role).to_ascii_lowercase()
		})
		.collect();
	let authorized_resources = dto
		.authorized_resources
		.iter()
		.filter_map(|resource| {
			let bare = resource.strip_prefix(RESOURCE_PREFIX).unwrap_or(resource);

			(!bare.is_empty()).then(|| bare.to_string())
		})
		.collect();
	let authorized_instances =
		dto.authorized_instances.iter().filter_map(map_instance).collect();

	AuthorizedParty {
		party: dto.party,
		name: dto.name,
		authorized_roles,
		authorized_resources,
		authorized_instances,
		sub_parties: dto.subunits.into_iter().map(map_party).collect(),
		parent_party: None,
	}
}

fn map_instance(dto: &AuthorizedInstanceDto) -> Option<InstanceDelegation> {
	if !dto.resource_id.starts_with(APP_INSTANCE_PREFIX) {
		return None;
	}

	// Instance ids arrive either bare or as "<party>/<instance>".
	let raw_id = dto.instance_id.rsplit('/').next()?;
	let instance_id = Uuid::parse_str(raw_id).ok()?;

	Some(InstanceDelegation { resource_id: dto.resource_id.clone(), instance_id })
}
