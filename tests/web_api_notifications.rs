//! Web API Notification Tests

mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn test_notifications_empty() {
    let app = TestApp::new().await;
    let alice = app.signup("alice").await;

    let response = app.get(&alice, "/notifications").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"], json!([]));
}

#[tokio::test]
async fn test_notifications_newest_first_and_scoped() {
    let app = TestApp::new().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let carol = app.signup("carol").await;
    let post_id = app.create_post(&alice, "hello").await;

    app.post(&bob, &format!("/posts/{post_id}/like"))
        .await
        .assert_status_ok();
    app.post(&carol, &format!("/posts/{post_id}/comment"))
        .json(&json!({ "content": "hi alice" }))
        .await
        .assert_status_ok();

    let notifications = app.notifications(&alice).await;
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0]["type"], "comment");
    assert_eq!(notifications[0]["relatedUser"]["username"], "carol");
    assert_eq!(notifications[1]["type"], "like");
    assert_eq!(notifications[1]["relatedUser"]["username"], "bob");
    assert_eq!(notifications[1]["relatedPost"]["content"], "hello");
    assert!(notifications[1]["relatedPost"].get("image").is_none());
    assert!(notifications[1]["createdAt"].is_string());

    // Other users only see their own
    assert!(app.notifications(&bob).await.is_empty());
    assert!(app.notifications(&carol).await.is_empty());
}

#[tokio::test]
async fn test_notification_survives_post_deletion() {
    let app = TestApp::new().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let post_id = app.create_post(&alice, "short-lived").await;

    app.post(&bob, &format!("/posts/{post_id}/like"))
        .await
        .assert_status_ok();
    app.delete(&alice, &format!("/posts/delete/{post_id}"))
        .await
        .assert_status_ok();

    let notifications = app.notifications(&alice).await;
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0]["relatedPost"].is_null());
    assert_eq!(notifications[0]["relatedUser"]["id"], bob.id);
}
