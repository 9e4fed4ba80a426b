//! Integration tests for edit fan-out over document rooms.

mod common;

use scribehub_core::error::ErrorKind;
use scribehub_entity::document::permission::AccessLevel;
use scribehub_realtime::message::ServerMessage;

#[tokio::test]
async fn test_edit_broadcast_excludes_editor_and_persists_first() {
    let app = common::TestApp::new();
    let owner = app.create_test_user("Owner");
    let editor = app.create_test_user("U1");

    let doc = app
        .document_service
        .create(&owner, Some("Draft".into()), None)
        .expect("create");
    app.document_service
        .share(&owner, doc.id, editor.user_id, AccessLevel::ReadWrite)
        .expect("share");

    let (owner_conn, mut owner_rx) = app.connect(&owner);
    let (editor_conn, mut editor_rx) = app.connect(&editor);
    app.broker.join_document_room(&owner_conn, doc.id);
    app.broker.join_document_room(&editor_conn, doc.id);

    let ack = app
        .broker
        .submit_edit(
            &editor_conn,
            doc.id,
            serde_json::json!({ "ops": [{ "insert": "Hello" }] }),
            "Hello".to_string(),
        )
        .await
        .expect("edit");
    assert_eq!(ack.document_id, doc.id);

    // Content is durable regardless of who was listening.
    assert_eq!(app.documents.get(doc.id).unwrap().content, "Hello");

    match owner_rx.try_recv().expect("broadcast") {
        ServerMessage::EditBroadcast {
            content,
            editor_name,
            ..
        } => {
            assert_eq!(content, "Hello");
            assert_eq!(editor_name, "U1");
        }
        other => panic!("unexpected message: {:?}", other),
    }
    // The editor never echoes their own edit back.
    assert!(editor_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_unauthorized_edit_is_rejected_without_side_effects() {
    let app = common::TestApp::new();
    let owner = app.create_test_user("Owner");
    let lurker = app.create_test_user("U2");

    let doc = app
        .document_service
        .create(&owner, None, Some("original".into()))
        .expect("create");

    let (owner_conn, mut owner_rx) = app.connect(&owner);
    let (lurker_conn, mut lurker_rx) = app.connect(&lurker);
    app.broker.join_document_room(&owner_conn, doc.id);
    app.broker.join_document_room(&lurker_conn, doc.id);

    let err = app
        .broker
        .submit_edit(
            &lurker_conn,
            doc.id,
            serde_json::json!({}),
            "tampered".to_string(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // The submitter gets a rejection event; nobody else hears anything.
    match lurker_rx.try_recv().expect("rejection") {
        ServerMessage::EditRejected { code, .. } => assert_eq!(code, "FORBIDDEN"),
        other => panic!("unexpected message: {:?}", other),
    }
    assert!(owner_rx.try_recv().is_err());
    assert_eq!(app.documents.get(doc.id).unwrap().content, "original");
}

#[tokio::test]
async fn test_read_only_grant_cannot_write() {
    let app = common::TestApp::new();
    let owner = app.create_test_user("Owner");
    let reader = app.create_test_user("Reader");

    let doc = app
        .document_service
        .create(&owner, None, Some("v1".into()))
        .expect("create");
    app.document_service
        .share(&owner, doc.id, reader.user_id, AccessLevel::ReadOnly)
        .expect("share");

    let (reader_conn, mut reader_rx) = app.connect(&reader);
    app.broker.join_document_room(&reader_conn, doc.id);

    let err = app
        .broker
        .submit_edit(&reader_conn, doc.id, serde_json::json!({}), "v2".into())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert!(matches!(
        reader_rx.try_recv(),
        Ok(ServerMessage::EditRejected { .. })
    ));
    assert_eq!(app.documents.get(doc.id).unwrap().content, "v1");
}

#[tokio::test]
async fn test_connection_limit_per_user() {
    let app = common::TestApp::new();
    let user = app.create_test_user("Busy");

    // Default limit is five concurrent connections per user.
    let mut held = Vec::new();
    for _ in 0..5 {
        held.push(app.broker.connect(&user.principal()).expect("connect"));
    }

    let err = app.broker.connect(&user.principal()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Closing one frees a slot.
    let (conn, _rx) = held.pop().expect("held connection");
    app.broker.disconnect(conn.id);
    app.broker
        .connect(&user.principal())
        .expect("reconnect after disconnect");
}

#[tokio::test]
async fn test_disconnect_stops_delivery() {
    let app = common::TestApp::new();
    let owner = app.create_test_user("Owner");
    let editor = app.create_test_user("Editor");

    let doc = app
        .document_service
        .create(&owner, None, None)
        .expect("create");
    app.document_service
        .share(&owner, doc.id, editor.user_id, AccessLevel::ReadWrite)
        .expect("share");

    let (owner_conn, mut owner_rx) = app.connect(&owner);
    let (editor_conn, _editor_rx) = app.connect(&editor);
    app.broker.join_document_room(&owner_conn, doc.id);
    app.broker.join_document_room(&editor_conn, doc.id);

    app.broker.disconnect(owner_conn.id);

    app.broker
        .submit_edit(&editor_conn, doc.id, serde_json::json!({}), "later".into())
        .await
        .expect("edit");

    // Departed connections fall out of the room entirely.
    assert!(owner_rx.try_recv().is_err());
    assert_eq!(app.documents.get(doc.id).unwrap().content, "later");
}
