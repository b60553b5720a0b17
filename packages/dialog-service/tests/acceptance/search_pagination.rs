use std::collections::HashSet;

use dialog_service::SearchDialogsRequest;

use super::{PARTY, RESOURCE};

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn keyset_pages_are_disjoint_and_complete() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping keyset_pages_are_disjoint_and_complete; set DIALOG_TEST_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(vec![super::full_access_party(PARTY, &[RESOURCE])]);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let mut expected = HashSet::new();

	for index in 0..5 {
		let created =
			super::seed_dialog(&service, PARTY, RESOURCE, &format!("Dialog {index}")).await;

		expected.insert(created.id);
	}

	let actor = super::end_user();
	let mut seen = HashSet::new();
	let mut token = None;
	let mut pages = 0;

	loop {
		let page = service
			.search_dialogs(
				&actor,
				SearchDialogsRequest {
					limit: Some(2),
					continuation_token: token.clone(),
					..SearchDialogsRequest::default()
				},
			)
			.await
			.expect("search_dialogs failed.");

		pages += 1;

		for item in &page.items {
			assert!(seen.insert(item.id), "Dialog {} appeared on two pages.", item.id);
		}

		if !page.has_next {
			assert!(page.continuation_token.is_none());

			break;
		}

		token = page.continuation_token.clone();

		assert!(token.is_some());
	}

	assert_eq!(pages, 3);
	assert_eq!(seen, expected);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn stale_order_tokens_are_rejected() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping stale_order_tokens_are_rejected; set DIALOG_TEST_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(vec![super::full_access_party(PARTY, &[RESOURCE])]);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	for index in 0..3 {
		super::seed_dialog(&service, PARTY, RESOURCE, &format!("Dialog {index}")).await;
	}

	let actor = super::end_user();
	let first = service
		.search_dialogs(
			&actor,
			SearchDialogsRequest { limit: Some(1), ..SearchDialogsRequest::default() },
		)
		.await
		.expect("search_dialogs failed.");
	let token = first.continuation_token.expect("Expected a continuation token.");
	let err = service
		.search_dialogs(
			&actor,
			SearchDialogsRequest {
				limit: Some(1),
				order_by: Some("updatedAt_asc".to_string()),
				continuation_token: Some(token),
				..SearchDialogsRequest::default()
			},
		)
		.await
		.expect_err("A token minted under another order must be rejected.");

	assert!(matches!(err, dialog_service::Error::InvalidRequest { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
