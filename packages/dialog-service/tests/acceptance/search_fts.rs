use dialog_service::SearchDialogsRequest;

use super::{PARTY, RESOURCE};

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn full_text_search_matches_title_words() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping full_text_search_matches_title_words; set DIALOG_TEST_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(vec![super::full_access_party(PARTY, &[RESOURCE])]);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let skattemelding =
		super::seed_dialog(&service, PARTY, RESOURCE, "Skattemelding for 2025").await;

	super::seed_dialog(&service, PARTY, RESOURCE, "Byggetillatelse for garasje").await;

	let actor = super::end_user();
	let hits = service
		.search_dialogs(
			&actor,
			SearchDialogsRequest {
				search: Some("skattemelding".to_string()),
				search_language_code: Some("nb".to_string()),
				..SearchDialogsRequest::default()
			},
		)
		.await
		.expect("search_dialogs failed.");

	assert_eq!(hits.items.len(), 1);
	assert_eq!(hits.items[0].id, skattemelding.id);

	let misses = service
		.search_dialogs(
			&actor,
			SearchDialogsRequest {
				search: Some("flyttemelding".to_string()),
				search_language_code: Some("nb".to_string()),
				..SearchDialogsRequest::default()
			},
		)
		.await
		.expect("search_dialogs failed.");

	assert!(misses.items.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn full_text_search_covers_activities_and_transmission_attachments() {
	use dialog_domain::{
		Attachment, DialogActivity, DialogTransmission, LocalizedValue,
	};
	use dialog_service::CreateDialogRequest;

	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping full_text_search_covers_activities_and_transmission_attachments; set DIALOG_TEST_PG_DSN."
		);

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(vec![super::full_access_party(PARTY, &[RESOURCE])]);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let created = service
		.create_dialog(CreateDialogRequest {
			org: "digdir".to_string(),
			service_resource: RESOURCE.to_string(),
			party: PARTY.to_string(),
			content: dialog_domain::DialogContent {
				title: vec![LocalizedValue::new("nb", "Byggesak")],
				..dialog_domain::DialogContent::default()
			},
			activities: vec![DialogActivity {
				activity_type: "information".to_string(),
				description: vec![LocalizedValue::new("nb", "Nabovarsel sendt")],
				..DialogActivity::default()
			}],
			transmissions: vec![DialogTransmission {
				transmission_type: "submission".to_string(),
				attachments: vec![Attachment {
					display_name: vec![LocalizedValue::new("nb", "Situasjonskart")],
					..Attachment::default()
				}],
				..DialogTransmission::default()
			}],
			..CreateDialogRequest::default()
		})
		.await
		.expect("create_dialog failed.");

	let actor = super::end_user();

	for term in ["nabovarsel", "situasjonskart"] {
		let hits = service
			.search_dialogs(
				&actor,
				SearchDialogsRequest {
					search: Some(term.to_string()),
					search_language_code: Some("nb".to_string()),
					..SearchDialogsRequest::default()
				},
			)
			.await
			.expect("search_dialogs failed.");

		assert_eq!(hits.items.len(), 1, "no hit for {term}");
		assert_eq!(hits.items[0].id, created.id);
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn requeued_dialogs_are_claimed_again() {
	use dialog_storage::search_index;

	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping requeued_dialogs_are_claimed_again; set DIALOG_TEST_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(vec![super::full_access_party(PARTY, &[RESOURCE])]);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let created = super::seed_dialog(&service, PARTY, RESOURCE, "Skattemelding for 2025").await;

	search_index::enqueue_rebuild_all(&service.db.pool)
		.await
		.expect("enqueue_rebuild_all failed.");

	let claimed =
		search_index::claim_rebuild_batch(&service.db.pool, 10).await.expect("claim failed.");

	assert_eq!(claimed, vec![created.id]);

	let drained =
		search_index::claim_rebuild_batch(&service.db.pool, 10).await.expect("claim failed.");

	assert!(drained.is_empty());

	search_index::requeue_rebuild(&service.db.pool, created.id)
		.await
		.expect("requeue_rebuild failed.");

	let reclaimed =
		search_index::claim_rebuild_batch(&service.db.pool, 10).await.expect("claim failed.");

	assert_eq!(reclaimed, vec![created.id]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn deleted_dialogs_leave_the_search_index() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping deleted_dialogs_leave_the_search_index; set DIALOG_TEST_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(vec![super::full_access_party(PARTY, &[RESOURCE])]);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let created = super::seed_dialog(&service, PARTY, RESOURCE, "Skattemelding for 2025").await;

	service
		.delete_dialog(dialog_service::DeleteDialogRequest {
			id: created.id,
			if_match: created.revision,
		})
		.await
		.expect("delete_dialog failed.");

	let actor = super::end_user();
	let hits = service
		.search_dialogs(
			&actor,
			SearchDialogsRequest {
				search: Some("skattemelding".to_string()),
				search_language_code: Some("nb".to_string()),
				..SearchDialogsRequest::default()
			},
		)
		.await
		.expect("search_dialogs failed.");

	assert!(hits.items.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
