//! Integration tests for sharing and permission evaluation.

mod common;

use scribehub_core::error::ErrorKind;
use scribehub_entity::document::model::Document;
use scribehub_entity::document::permission::{AccessLevel, EffectiveAccess};

#[tokio::test]
async fn test_owner_shares_and_revokes_access() {
    let app = common::TestApp::new();
    let owner = app.create_test_user("Owner");
    let viewer = app.create_test_user("Viewer");

    let doc = app
        .document_service
        .create(&owner, Some("Roadmap".into()), None)
        .expect("create");

    // Before the grant the viewer sees nothing.
    let err = app.document_service.get(&viewer, doc.id).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    app.document_service
        .share(&owner, doc.id, viewer.user_id, AccessLevel::ReadOnly)
        .expect("share");
    assert_eq!(
        app.document_service.get(&viewer, doc.id).unwrap().id,
        doc.id
    );

    // Re-sharing the same user updates the entry instead of duplicating it.
    let updated = app
        .document_service
        .share(&owner, doc.id, viewer.user_id, AccessLevel::ReadWrite)
        .expect("upgrade");
    assert_eq!(updated.permissions.len(), 1);
    assert_eq!(
        updated.permission_for(viewer.user_id),
        Some(AccessLevel::ReadWrite)
    );

    app.document_service
        .remove_access(&owner, doc.id, viewer.user_id)
        .expect("revoke");
    let err = app.document_service.get(&viewer, doc.id).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_allow_to_all_grants_visibility_not_write() {
    let app = common::TestApp::new();
    let owner = app.create_test_user("Owner");
    let stranger = app.create_test_user("Stranger");

    let mut doc = Document::new(owner.user_id, Some("Public notes".into()), None);
    doc.allow_to_all = true;
    let doc = app.documents.insert(doc);

    // Visible to everyone...
    assert!(app.document_service.get(&stranger, doc.id).is_ok());
    assert_eq!(app.document_service.list_visible(&stranger).len(), 1);

    // ...but the flag never confers write access.
    assert_eq!(
        doc.effective_access(stranger.user_id),
        EffectiveAccess::None
    );
    let err = app
        .document_service
        .update_content(&stranger, doc.id, "graffiti".into())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert_eq!(app.documents.get(doc.id).unwrap().content, "");
}

#[tokio::test]
async fn test_only_owner_mutates_permissions_or_deletes() {
    let app = common::TestApp::new();
    let owner = app.create_test_user("Owner");
    let editor = app.create_test_user("Editor");
    let outsider = app.create_test_user("Outsider");

    let doc = app
        .document_service
        .create(&owner, None, None)
        .expect("create");
    app.document_service
        .share(&owner, doc.id, editor.user_id, AccessLevel::ReadWrite)
        .expect("share");

    // Even a read-write grantee may not manage permissions.
    let err = app
        .document_service
        .share(&editor, doc.id, outsider.user_id, AccessLevel::ReadOnly)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    let err = app
        .document_service
        .remove_access(&editor, doc.id, editor.user_id)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    let err = app.document_service.delete(&editor, doc.id).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    app.document_service.delete(&owner, doc.id).expect("delete");
    assert_eq!(
        app.documents.get(doc.id).unwrap_err().kind,
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_revoked_grant_loses_write_immediately() {
    let app = common::TestApp::new();
    let owner = app.create_test_user("Owner");
    let editor = app.create_test_user("Editor");

    let doc = app
        .document_service
        .create(&owner, None, Some("v1".into()))
        .expect("create");
    app.document_service
        .share(&owner, doc.id, editor.user_id, AccessLevel::ReadWrite)
        .expect("share");

    app.document_service
        .update_content(&editor, doc.id, "v2".into())
        .expect("write while granted");

    app.document_service
        .remove_access(&owner, doc.id, editor.user_id)
        .expect("revoke");

    // Access is resolved per call, so the revocation bites at once.
    let err = app
        .document_service
        .update_content(&editor, doc.id, "v3".into())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert_eq!(app.documents.get(doc.id).unwrap().content, "v2");
}
