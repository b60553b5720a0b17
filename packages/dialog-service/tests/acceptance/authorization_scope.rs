use std::sync::Arc;

use dialog_domain::Actor;
use dialog_service::{Error, Providers, SearchDialogsRequest};

use super::{PARTY, RESOURCE, StubDecision, StubParties};

const OTHER_PARTY: &str = "urn:altinn:organization:identifier-no:910569178";
const OTHER_RESOURCE: &str = "another-service";

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn search_only_returns_authorized_pairs() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping search_only_returns_authorized_pairs; set DIALOG_TEST_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(vec![super::full_access_party(PARTY, &[RESOURCE])]);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let visible = super::seed_dialog(&service, PARTY, RESOURCE, "Synlig dialog").await;

	super::seed_dialog(&service, OTHER_PARTY, RESOURCE, "Annen part").await;
	super::seed_dialog(&service, PARTY, OTHER_RESOURCE, "Annen tjeneste").await;

	let actor = super::end_user();
	let page = service
		.search_dialogs(&actor, SearchDialogsRequest::default())
		.await
		.expect("search_dialogs failed.");

	assert_eq!(page.items.len(), 1);
	assert_eq!(page.items[0].id, visible.id);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn empty_upstream_response_fails_for_end_users() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping empty_upstream_response_fails_for_end_users; set DIALOG_TEST_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(Vec::new());
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let err = service
		.search_dialogs(&super::end_user(), SearchDialogsRequest::default())
		.await
		.expect_err("An empty party set for an end user must fail.");

	assert!(matches!(err, Error::Upstream { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn system_users_without_authorizations_get_an_empty_page() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping system_users_without_authorizations_get_an_empty_page; set DIALOG_TEST_PG_DSN."
		);

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(Vec::new());
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");
	super::seed_dialog(&service, PARTY, RESOURCE, "En tittel").await;

	let system_user = Actor::system_user("urn:altinn:systemuser:deadbeef");
	let page = service
		.search_dialogs(&system_user, SearchDialogsRequest::default())
		.await
		.expect("search_dialogs failed.");

	assert!(page.items.is_empty());
	assert!(!page.has_next);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn single_dialog_read_falls_back_to_the_decision_point() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping single_dialog_read_falls_back_to_the_decision_point; set DIALOG_TEST_PG_DSN."
		);

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let decision = Arc::new(StubDecision::denying());
	let calls = decision.calls.clone();
	let providers = Providers::new(
		Arc::new(StubParties { parties: vec![super::full_access_party(PARTY, &[RESOURCE])] }),
		decision,
	);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let foreign = super::seed_dialog(&service, OTHER_PARTY, OTHER_RESOURCE, "Fremmed").await;
	let err = service
		.get_dialog(&super::end_user(), foreign.id)
		.await
		.expect_err("A denied decision must read as forbidden.");

	assert!(matches!(err, Error::Forbidden { .. }));
	assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
