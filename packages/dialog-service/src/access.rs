use std::collections::BTreeSet;

use dialog_domain::{
	Actor, Dialog, DialogSearchAuthorizationResult, SearchAuthorizationConstraints, flatten,
	pruning, resolve_search_authorization,
};
use dialog_providers::decision::DecisionRequest;
use dialog_storage::queries;

use crate::{DialogService, Error, Result};

/// Cache key for resolved search authorizations: the actor plus the request's
/// constraint sets, order-normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct AccessKey {
	actor: Actor,
	parties: Vec<String>,
	resources: Vec<String>,
}

impl AccessKey {
	fn new(actor: &Actor, parties: &[String], resources: &[String]) -> Self {
		let normalize = |values: &[String]| {
			values.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect::<Vec<_>>()
		};

		Self {
			actor: actor.clone(),
			parties: normalize(parties),
			resources: normalize(resources),
		}
	}
}

impl DialogService {
	/// Fetches, flattens, and resolves the actor's authorizations without
	/// pruning or caching.
	pub(crate) async fn resolve_authorization(
		&self,
		actor: &Actor,
		constraint_parties: &[String],
		constraint_resources: &[String],
	) -> Result<(DialogSearchAuthorizationResult, usize)> {
		let parties = self
			.providers
			.authorized_parties
			.authorized_parties(&self.cfg.authorization, actor)
			.await?;

		if parties.is_empty() && !actor.is_system_user {
			return Err(Error::Upstream {
				message: "Authorized-parties upstream returned no parties.".to_string(),
			});
		}

		let flat = flatten(parties);
		let roles = flat
			.iter()
			.flat_map(|party| party.authorized_roles.iter().cloned())
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect::<Vec<_>>();
		let subject_resources = queries::subject_resources(&self.db.pool, &roles).await?;
		let result = resolve_search_authorization(
			&flat,
			&subject_resources,
			SearchAuthorizationConstraints {
				parties: constraint_parties,
				resources: constraint_resources,
			},
		);

		Ok((result, flat.len()))
	}

	/// The search-scoping resolution: resolve, prune against stored dialogs,
	/// and cache the outcome for actors below the caching threshold.
	pub(crate) async fn resolve_search_scope(
		&self,
		actor: &Actor,
		constraint_parties: &[String],
		constraint_resources: &[String],
	) -> Result<DialogSearchAuthorizationResult> {
		let key = AccessKey::new(actor, constraint_parties, constraint_resources);

		if let Some(cached) = self.access_cache.get(&key) {
			return Ok(cached);
		}

		let (mut result, party_count) = self
			.resolve_authorization(actor, constraint_parties, constraint_resources)
			.await?;

		if pruning::should_prune(
			&result,
			self.cfg.authorization.min_resources_pruning_threshold,
		) {
			let parties =
				result.parties().iter().map(|party| party.to_string()).collect::<Vec<_>>();
			let resources = result
				.distinct_resources()
				.iter()
				.map(|resource| resource.to_string())
				.collect::<Vec<_>>();
			let existing =
				queries::existing_party_resource_pairs(&self.db.pool, &parties, &resources)
					.await?;

			pruning::retain_existing_pairs(&mut result, &existing);
		}

		if party_count <= self.cfg.authorization.max_parties_caching_threshold {
			self.access_cache.set(key, result.clone());
		}

		Ok(result)
	}

	/// Per-dialog read authorization: the resolved set decides when it can,
	/// the upstream decision endpoint settles the rest.
	pub(crate) async fn authorize_dialog_read(
		&self,
		actor: &Actor,
		dialog: &Dialog,
	) -> Result<()> {
		let constraint_parties = vec![dialog.party.clone()];
		let constraint_resources = vec![dialog.service_resource.clone()];
		let (result, _) = self
			.resolve_authorization(actor, &constraint_parties, &constraint_resources)
			.await?;

		if authorizes_dialog(&result, dialog) {
			return Ok(());
		}

		let permitted = self
			.providers
			.decision
			.authorize(
				&self.cfg.authorization,
				DecisionRequest {
					actor,
					party: &dialog.party,
					service_resource: &dialog.service_resource,
					dialog_id: dialog.id,
				},
			)
			.await?;

		if !permitted {
			tracing::debug!(dialog_id = %dialog.id, "Dialog read denied.");

			return Err(Error::Forbidden {
				message: "Not authorized for this dialog.".to_string(),
			});
		}

		Ok(())
	}
}

fn authorizes_dialog(result: &DialogSearchAuthorizationResult, dialog: &Dialog) -> bool {
	if result.dialog_ids.contains(&dialog.id) {
		return true;
	}

	result
		.resources_by_party
		.get(&dialog.party)
		.is_some_and(|resources| resources.contains(&dialog.service_resource))
}
