use color_eyre::{Result, eyre};
use serde_json::Value;
use uuid::Uuid;

use dialog_domain::Actor;

/// Arguments for a single-dialog access decision.
#[derive(Debug, Clone)]
pub struct DecisionRequest<'a> {
	pub actor: &'a Actor,
	pub party: &'a str,
	pub service_resource: &'a str,
	pub dialog_id: Uuid,
}

/// Asks the upstream decision endpoint whether the actor may read one dialog.
pub async fn authorize(
	cfg: &dialog_config::Authorization,
	request: DecisionRequest<'_>,
) -> Result<bool> {
	let client = crate::client(cfg)?;
	let url = format!("{}{}", cfg.api_base, cfg.decision_path);
	let body = serde_json::json!({
		"subject": request.actor.party_uri,
		"party": request.party,
		"resource": format!("urn:altinn:resource:{}", request.service_resource),
		"dialogId": request.dialog_id,
		"action": "read",
	});
	let response = client.post(url).json(&body).send().await?;
	let json: Value = response.error_for_status()?.json().await?;

	parse_decision(&json)
}

pub fn parse_decision(json: &Value) -> Result<bool> {
	let decision = json
		.get("decision")
		.and_then(Value::as_str)
		.ok_or_else(|| eyre::eyre!("Decision response is missing the decision field."))?;

	Ok(decision.eq_ignore_ascii_case("permit"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn permit_is_case_insensitive() {
		let json = serde_json::json!({ "decision": "Permit" });

		assert!(parse_decision(&json).expect("parse failed"));

		let json = serde_json::json!({ "decision": "Deny" });

		assert!(!parse_decision(&json).expect("parse failed"));
	}

	#[test]
	fn missing_decision_field_is_an_error() {
		let json = serde_json::json!({ "status": "ok" });

		assert!(parse_decision(&json).is_err());
	}
}
