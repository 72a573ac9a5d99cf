use bson::oid::ObjectId;
use rentora_config::NotificationSettings;
use tracing::{info, warn};

/// Fire-and-forget event dispatch to the platform's notification
/// component. Delivery failures are logged and swallowed: a missed
/// notification must never roll back a booking or token state change.
#[derive(Clone)]
pub struct NotificationService {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl NotificationService {
    pub fn new(settings: &NotificationSettings) -> Self {
        Self {
            webhook_url: settings.webhook_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub fn notify(&self, booking_id: ObjectId, event_type: &'static str) {
        info!(%booking_id, event_type, "Booking event");

        let Some(url) = self.webhook_url.clone() else {
            return;
        };
        let client = self.client.clone();
        let body = serde_json::json!({
            "booking_id": booking_id.to_hex(),
            "event_type": event_type,
        });

        tokio::spawn(async move {
            if let Err(err) = client.post(&url).json(&body).send().await {
                warn!(%err, event_type, "Notification dispatch failed");
            }
        });
    }
}
