mod common;

use axum::http::StatusCode;
use bulletin::domain::types::ContactStatus;
use common::{MemoryStore, admin_router, contact, post_form};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use tower::ServiceExt;

#[tokio::test]
async fn repeated_delete_counts_one_transition() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let store = MemoryStore::new();
    let id = store.insert_contact(contact("Alice", ContactStatus::Read, 0));
    let router = admin_router(&store, 20);

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(post_form(&format!("/contacts/{id}/delete"), ""))
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    assert_eq!(store.status_of(id), ContactStatus::Deleted);
    assert_eq!(
        store.audit_actions(),
        vec!["contact.delete".to_string(), "contact.delete".to_string()]
    );

    let deleted_transitions: u64 = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(key, _, _, _)| {
            let key = key.key();
            key.name() == "bulletin_contact_status_transitions_total"
                && key
                    .labels()
                    .any(|label| label.key() == "to" && label.value() == "deleted")
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => count,
            other => panic!("unexpected metric value: {other:?}"),
        })
        .sum();
    assert_eq!(deleted_transitions, 1);
}
