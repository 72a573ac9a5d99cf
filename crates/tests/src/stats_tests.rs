use crate::fixtures::test_app::TestApp;
use serde_json::Value;

async fn fetch_stats(app: &TestApp, token: &str, unit_id: Option<&str>) -> Value {
    let path = match unit_id {
        Some(id) => format!("/api/stats/booking?unit_id={id}"),
        None => "/api/stats/booking".to_string(),
    };
    let resp = app.auth_get(&path, token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn empty_portfolio_reports_zero_aggregates() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("stats1");

    let stats = fetch_stats(&app, &op.access_token, None).await;
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["paid_revenue"], 0);
    assert_eq!(stats["average_nightly_rate"], 0.0);
    assert_eq!(stats["by_status"]["pending"], 0);
}

#[tokio::test]
async fn aggregates_track_status_and_settled_revenue() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("stats2");
    let unit_id = app.seed_unit("Stats Unit", 4, 10_000).await;
    let guest_id = app.seed_guest("Stats Guest").await;

    // Two stays on the same unit: one confirmed and paid, one left pending
    let (_, paid) = app
        .create_booking(&op.access_token, &unit_id, &guest_id, "2025-04-01", "2025-04-04", 2)
        .await;
    let paid_id = paid["id"].as_str().unwrap();
    let resp = app
        .auth_post(&format!("/api/booking/{paid_id}/confirm"), &op.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let resp = app
        .auth_put(&format!("/api/booking/{paid_id}/payment"), &op.access_token)
        .json(&serde_json::json!({ "payment_status": "paid", "payment_ref": "pay_stats" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let (status, _) = app
        .create_booking(&op.access_token, &unit_id, &guest_id, "2025-04-10", "2025-04-12", 2)
        .await;
    assert_eq!(status, 200);

    let stats = fetch_stats(&app, &op.access_token, Some(&unit_id)).await;
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["by_status"]["confirmed"], 1);
    assert_eq!(stats["by_status"]["pending"], 1);
    // 3 paid nights at 10_000; the pending stay contributes nothing
    assert_eq!(stats["paid_revenue"], 30_000);
    assert_eq!(stats["average_nightly_rate"], 10_000.0);
}

#[tokio::test]
async fn unit_filter_narrows_the_portfolio_view() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("stats3");
    let loft = app.seed_unit("Loft", 2, 8_000).await;
    let villa = app.seed_unit("Villa", 6, 24_000).await;
    let guest_id = app.seed_guest("Filter Guest").await;

    let (status, _) = app
        .create_booking(&op.access_token, &loft, &guest_id, "2025-05-01", "2025-05-03", 2)
        .await;
    assert_eq!(status, 200);
    let (status, _) = app
        .create_booking(&op.access_token, &villa, &guest_id, "2025-05-01", "2025-05-03", 4)
        .await;
    assert_eq!(status, 200);

    let portfolio = fetch_stats(&app, &op.access_token, None).await;
    assert_eq!(portfolio["total"], 2);
    assert_eq!(portfolio["average_nightly_rate"], 16_000.0);

    let loft_only = fetch_stats(&app, &op.access_token, Some(&loft)).await;
    assert_eq!(loft_only["total"], 1);
    assert_eq!(loft_only["average_nightly_rate"], 8_000.0);
}

#[tokio::test]
async fn cancelled_bookings_stay_visible_in_the_counts() {
    let app = TestApp::spawn().await;
    let op = app.seed_operator("stats4");
    let unit_id = app.seed_unit("Cancel Stats Unit", 4, 10_000).await;
    let guest_id = app.seed_guest("Cancel Guest").await;

    let (_, booking) = app
        .create_booking(&op.access_token, &unit_id, &guest_id, "2025-06-01", "2025-06-03", 2)
        .await;
    let id = booking["id"].as_str().unwrap();
    let resp = app
        .auth_post(&format!("/api/booking/{id}/cancel"), &op.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let stats = fetch_stats(&app, &op.access_token, Some(&unit_id)).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["by_status"]["cancelled"], 1);
    assert_eq!(stats["paid_revenue"], 0);
}
