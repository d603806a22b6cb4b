mod common;

use assistant_service::services::MockPushProvider;
use common::{Mocks, TestApp};
use reqwest::Client;
use serde_json::json;

#[tokio::test]
async fn notify_sends_through_onesignal_for_a_stored_token() {
    let app = TestApp::spawn().await;
    app.seed_user("user-1", Some("player-id-1"), "free");
    let client = Client::new();

    let response = client
        .post(format!("{}/api/notificar", app.address))
        .json(&json!({ "title": "Aviso", "body": "Tu pedido salió", "uid": "user-1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "ok": true }));

    assert_eq!(app.onesignal.send_count(), 1);
    assert_eq!(app.fcm.send_count(), 0);

    let push = app.onesignal.last_message().expect("Missing push message");
    assert_eq!(push.device_token, "player-id-1");
    assert_eq!(push.title, "Aviso");
    assert_eq!(push.body, "Tu pedido salió");
}

#[tokio::test]
async fn notify_with_unknown_uid_returns_400_and_makes_no_call() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/notificar", app.address))
        .json(&json!({ "title": "Aviso", "body": "Hola", "uid": "ghost" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], false);
    assert_eq!(app.onesignal.send_count(), 0);
}

#[tokio::test]
async fn notify_for_user_without_token_returns_400_and_makes_no_call() {
    let app = TestApp::spawn().await;
    app.seed_user("user-1", None, "pro");
    let client = Client::new();

    let response = client
        .post(format!("{}/api/notificar", app.address))
        .json(&json!({ "title": "Aviso", "body": "Hola", "uid": "user-1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Este usuario no tiene pushToken");
    assert_eq!(app.onesignal.send_count(), 0);
}

#[tokio::test]
async fn notify_without_uid_returns_400() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/notificar", app.address))
        .json(&json!({ "title": "Aviso", "body": "Hola" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], false);
    assert_eq!(app.onesignal.send_count(), 0);
}

#[tokio::test]
async fn notify_provider_failure_returns_500_with_ok_false() {
    let mocks = Mocks {
        onesignal: MockPushProvider::failing("invalid player id"),
        ..Default::default()
    };
    let app = TestApp::spawn_with(mocks).await;
    app.seed_user("user-1", Some("player-id-1"), "pro");
    let client = Client::new();

    let response = client
        .post(format!("{}/api/notificar", app.address))
        .json(&json!({ "title": "Aviso", "body": "Hola", "uid": "user-1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("invalid player id"),
        "error should carry the provider message: {}",
        body
    );
}
