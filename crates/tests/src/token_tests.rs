use crate::fixtures::{seed::SeededOperator, test_app::TestApp};
use serde_json::Value;

/// A confirmed stay for 2025-03-02..2025-03-05, ready for token issuance.
async fn confirmed_booking(app: &TestApp, op: &SeededOperator, unit_name: &str) -> String {
    let unit_id = app.seed_unit(unit_name, 4, 10_000).await;
    let guest_id = app.seed_guest("Token Guest").await;

    let (status, booking) = app
        .create_booking(&op.access_token, &unit_id, &guest_id, "2025-03-02", "2025-03-05", 2)
        .await;
    assert_eq!(status, 200);
    let id = booking["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_post(&format!("/api/booking/{id}/confirm"), &op.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    id
}

async fn issue_token(app: &TestApp, op: &SeededOperator, booking_id: &str, body: Value) -> (u16, Value) {
    let resp = app
        .auth_post(&format!("/api/booking/{booking_id}/token"), &op.access_token)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let json: Value = resp.json().await.unwrap_or(Value::Null);
    (status, json)
}

async fn redeem(app: &TestApp, op: &SeededOperator, token_id: &str, presented_at: &str) -> (u16, Value) {
    let resp = app
        .auth_post(&format!("/api/token/{token_id}/redeem"), &op.access_token)
        .json(&serde_json::json!({ "presented_at": presented_at }))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let json: Value = resp.json().await.unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn pending_booking_is_not_eligible_for_tokens() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok1");
    let unit_id = app.seed_unit("Pending Unit", 4, 10_000).await;
    let guest_id = app.seed_guest("May Guest").await;

    let (_, booking) = app
        .create_booking(&op.access_token, &unit_id, &guest_id, "2025-03-02", "2025-03-05", 2)
        .await;
    let id = booking["id"].as_str().unwrap();

    let (status, json) = issue_token(&app, &op, id, serde_json::json!({ "kind": "gate" })).await;
    assert_eq!(status, 422);
    assert_eq!(json["error"], "validation");
}

#[tokio::test]
async fn issue_defaults_window_to_day_before_checkin() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok2");
    let id = confirmed_booking(&app, &op, "Default Window Unit").await;

    let (status, token) = issue_token(
        &app,
        &op,
        &id,
        serde_json::json!({ "kind": "gate", "label": "Front gate" }),
    )
    .await;
    assert_eq!(status, 200);

    assert_eq!(token["status"], "active");
    assert_eq!(token["times_used"], 0);
    assert_eq!(token["kind"], "gate");
    assert_eq!(token["label"], "Front gate");
    // Day before check-in through the end of the check-out day
    assert!(token["valid_from"].as_str().unwrap().starts_with("2025-03-01T00:00:00"));
    assert!(token["valid_until"].as_str().unwrap().starts_with("2025-03-05T23:59:59"));
    assert!(token["payload_ref"].as_str().unwrap().starts_with("qr-"));
}

#[tokio::test]
async fn unknown_token_kind_collapses_to_amenity() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok3");
    let id = confirmed_booking(&app, &op, "Sauna Unit").await;

    let (status, token) =
        issue_token(&app, &op, &id, serde_json::json!({ "kind": "sauna" })).await;
    assert_eq!(status, 200);
    assert_eq!(token["kind"], "amenity");
}

#[tokio::test]
async fn inverted_validity_window_is_rejected() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok4");
    let id = confirmed_booking(&app, &op, "Window Unit").await;

    let (status, _) = issue_token(
        &app,
        &op,
        &id,
        serde_json::json!({
            "kind": "access",
            "valid_from": "2025-03-05T12:00:00Z",
            "valid_until": "2025-03-01T00:00:00Z",
        }),
    )
    .await;
    assert_eq!(status, 422);
}

#[tokio::test]
async fn usage_limit_consumed_once_per_redemption() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok5");
    let id = confirmed_booking(&app, &op, "Parking Unit").await;

    let (_, token) = issue_token(
        &app,
        &op,
        &id,
        serde_json::json!({
            "kind": "parking",
            "usage_limit": 2,
            "valid_from": "2025-03-01T00:00:00Z",
            "valid_until": "2025-03-05T12:00:00Z",
        }),
    )
    .await;
    let token_id = token["id"].as_str().unwrap();

    let (status, json) = redeem(&app, &op, token_id, "2025-03-01T08:00:00Z").await;
    assert_eq!(status, 200);
    assert_eq!(json["authorized"], true);
    assert_eq!(json["times_used"], 1);

    let (_, json) = redeem(&app, &op, token_id, "2025-03-01T18:00:00Z").await;
    assert_eq!(json["authorized"], true);
    assert_eq!(json["times_used"], 2);

    // Third swipe: cap is spent
    let (status, json) = redeem(&app, &op, token_id, "2025-03-02T08:00:00Z").await;
    assert_eq!(status, 200);
    assert_eq!(json["authorized"], false);
    assert_eq!(json["reason"], "usage_exceeded");
}

#[tokio::test]
async fn redemption_respects_the_validity_window() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok6");
    let id = confirmed_booking(&app, &op, "Pool Unit").await;

    let (_, token) = issue_token(
        &app,
        &op,
        &id,
        serde_json::json!({
            "kind": "pool",
            "valid_from": "2025-03-02T00:00:00Z",
            "valid_until": "2025-03-05T12:00:00Z",
        }),
    )
    .await;
    let token_id = token["id"].as_str().unwrap();

    let (_, json) = redeem(&app, &op, token_id, "2025-03-01T08:00:00Z").await;
    assert_eq!(json["authorized"], false);
    assert_eq!(json["reason"], "not_yet_valid");

    let (_, json) = redeem(&app, &op, token_id, "2025-03-06T08:00:00Z").await;
    assert_eq!(json["authorized"], false);
    assert_eq!(json["reason"], "expired");

    // Inside the window it still works
    let (_, json) = redeem(&app, &op, token_id, "2025-03-03T08:00:00Z").await;
    assert_eq!(json["authorized"], true);
}

#[tokio::test]
async fn revoke_is_idempotent_and_blocks_redemption() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok7");
    let id = confirmed_booking(&app, &op, "Gym Unit").await;

    let (_, token) = issue_token(&app, &op, &id, serde_json::json!({ "kind": "gym" })).await;
    let token_id = token["id"].as_str().unwrap();

    for _ in 0..2 {
        let resp = app
            .auth_post(&format!("/api/token/{token_id}/revoke"), &op.access_token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "revoked");
    }

    let (_, json) = redeem(&app, &op, token_id, "2025-03-03T08:00:00Z").await;
    assert_eq!(json["authorized"], false);
    assert_eq!(json["reason"], "revoked");
}

#[tokio::test]
async fn cancelling_a_booking_revokes_every_token() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok8");
    let id = confirmed_booking(&app, &op, "Cascade Unit").await;

    for kind in ["gate", "parking", "pool"] {
        let (status, _) = issue_token(&app, &op, &id, serde_json::json!({ "kind": kind })).await;
        assert_eq!(status, 200);
    }

    let resp = app
        .auth_post(&format!("/api/booking/{id}/cancel"), &op.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(&format!("/api/booking/{id}/token"), &op.access_token)
        .send()
        .await
        .unwrap();
    let tokens: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(tokens.len(), 3);
    for token in &tokens {
        assert_eq!(token["status"], "revoked");
    }

    let (_, json) = redeem(&app, &op, tokens[0]["id"].as_str().unwrap(), "2025-03-03T08:00:00Z").await;
    assert_eq!(json["authorized"], false);
    assert_eq!(json["reason"], "revoked");
}

#[tokio::test]
async fn parallel_redeems_grant_a_single_use() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok11");
    let id = confirmed_booking(&app, &op, "Race Gate Unit").await;

    let (_, token) = issue_token(
        &app,
        &op,
        &id,
        serde_json::json!({
            "kind": "gate",
            "usage_limit": 1,
            "valid_from": "2025-03-01T00:00:00Z",
            "valid_until": "2025-03-05T12:00:00Z",
        }),
    )
    .await;
    let token_id = token["id"].as_str().unwrap();

    let (first, second) = tokio::join!(
        redeem(&app, &op, token_id, "2025-03-02T08:00:00Z"),
        redeem(&app, &op, token_id, "2025-03-02T08:00:00Z"),
    );

    let outcomes = [&first.1, &second.1];
    let granted = outcomes.iter().filter(|o| o["authorized"] == true).count();
    assert_eq!(granted, 1, "exactly one of two racing swipes may pass");
    for outcome in outcomes {
        if outcome["authorized"] == false {
            assert_eq!(outcome["reason"], "usage_exceeded");
        } else {
            assert_eq!(outcome["times_used"], 1);
        }
    }
}

#[tokio::test]
async fn cancelled_stay_never_authorizes_even_with_a_stale_active_token() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok12");
    let id = confirmed_booking(&app, &op, "Stale Token Unit").await;

    let (_, token) = issue_token(&app, &op, &id, serde_json::json!({ "kind": "gate" })).await;
    let token_id = token["id"].as_str().unwrap();

    let resp = app
        .auth_post(&format!("/api/booking/{id}/cancel"), &op.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Flip the token back to active directly, as if the cancellation's
    // revoke sweep had been interrupted before reaching it
    app.db
        .collection::<bson::Document>("access_tokens")
        .update_one(
            bson::doc! { "_id": bson::oid::ObjectId::parse_str(token_id).unwrap() },
            bson::doc! { "$set": { "status": "active" } },
        )
        .await
        .unwrap();

    let (status, json) = redeem(&app, &op, token_id, "2025-03-03T08:00:00Z").await;
    assert_eq!(status, 200);
    assert_eq!(json["authorized"], false);
    assert_eq!(json["reason"], "revoked");

    // The sweep re-ran on presentation: the token is revoked in storage
    let resp = app
        .auth_get(&format!("/api/booking/{id}/token"), &op.access_token)
        .send()
        .await
        .unwrap();
    let tokens: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(tokens[0]["status"], "revoked");
}

#[tokio::test]
async fn expired_tokens_read_as_expired_without_a_write() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok9");
    let id = confirmed_booking(&app, &op, "Lazy Expiry Unit").await;

    // Window entirely in the past relative to the listing read
    let (_, _token) = issue_token(
        &app,
        &op,
        &id,
        serde_json::json!({
            "kind": "access",
            "valid_from": "2020-01-01T00:00:00Z",
            "valid_until": "2020-01-05T00:00:00Z",
        }),
    )
    .await;

    let resp = app
        .auth_get(&format!("/api/booking/{id}/token"), &op.access_token)
        .send()
        .await
        .unwrap();
    let tokens: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(tokens[0]["status"], "expired");
}

#[tokio::test]
async fn redeeming_a_missing_token_is_a_fault_not_a_denial() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("tok10");

    let missing = bson::oid::ObjectId::new().to_hex();
    let (status, json) = redeem(&app, &op, &missing, "2025-03-03T08:00:00Z").await;
    assert_eq!(status, 404);
    assert_eq!(json["error"], "not_found");
}
