use uuid::Uuid;

use dialog_domain::{DialogContent, DialogStatus, LocalizedValue};
use dialog_service::{DeleteDialogRequest, Error, UpdateDialogRequest};

use super::{PARTY, RESOURCE};

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn create_get_update_delete_round_trip() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping create_get_update_delete_round_trip; set DIALOG_TEST_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(vec![super::full_access_party(PARTY, &[RESOURCE])]);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let created = super::seed_dialog(&service, PARTY, RESOURCE, "En tittel").await;
	let actor = super::end_user();
	let fetched = service.get_dialog(&actor, created.id).await.expect("get_dialog failed.");

	assert_eq!(fetched.revision, created.revision);
	assert_eq!(fetched.content.title[0].value, "En tittel");
	assert_eq!(fetched.status, DialogStatus::NotApplicable);

	let stale = service
		.update_dialog(
			created.id,
			Uuid::new_v4(),
			UpdateDialogRequest {
				status: Some(DialogStatus::Completed),
				..UpdateDialogRequest::default()
			},
		)
		.await
		.expect_err("Stale revision must be rejected.");

	assert!(matches!(stale, Error::Conflict { .. }));

	let updated = service
		.update_dialog(
			created.id,
			created.revision,
			UpdateDialogRequest {
				status: Some(DialogStatus::Completed),
				content: Some(DialogContent {
					title: vec![LocalizedValue::new("nb", "Ny tittel")],
					..DialogContent::default()
				}),
				..UpdateDialogRequest::default()
			},
		)
		.await
		.expect("update_dialog failed.");

	assert_ne!(updated.revision, created.revision);

	let fetched = service.get_dialog(&actor, created.id).await.expect("get_dialog failed.");

	assert_eq!(fetched.status, DialogStatus::Completed);
	assert_eq!(fetched.content.title[0].value, "Ny tittel");
	assert!(fetched.content_updated_at > fetched.created_at);

	let deleted = service
		.delete_dialog(DeleteDialogRequest { id: created.id, if_match: updated.revision })
		.await
		.expect("delete_dialog failed.");
	let again = service
		.delete_dialog(DeleteDialogRequest { id: created.id, if_match: Uuid::new_v4() })
		.await
		.expect("Repeated delete must be a no-op.");

	assert_eq!(again.revision, deleted.revision);

	let missing = service
		.get_dialog(&actor, created.id)
		.await
		.expect_err("Deleted dialog must read as missing.");

	assert!(matches!(missing, Error::NotFound { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DIALOG_TEST_PG_DSN to run."]
async fn duplicate_dialog_id_is_a_conflict() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping duplicate_dialog_id_is_a_conflict; set DIALOG_TEST_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let providers = super::providers_for(vec![super::full_access_party(PARTY, &[RESOURCE])]);
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::reset_db(&service.db.pool).await.expect("Failed to reset test database.");

	let id = Uuid::now_v7();
	let mut request = dialog_service::CreateDialogRequest {
		id: Some(id),
		org: "digdir".to_string(),
		service_resource: RESOURCE.to_string(),
		party: PARTY.to_string(),
		content: DialogContent {
			title: vec![LocalizedValue::new("nb", "En tittel")],
			..DialogContent::default()
		},
		..dialog_service::CreateDialogRequest::default()
	};

	service.create_dialog(request.clone()).await.expect("First create failed.");

	request.id = Some(id);

	let err = service.create_dialog(request).await.expect_err("Duplicate id must conflict.");

	assert!(matches!(err, Error::Conflict { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
