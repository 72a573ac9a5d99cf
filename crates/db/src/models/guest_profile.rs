use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Identity-component document, read here only to enrich booking
/// responses with a display name and photo. Never used for
/// authorization decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl GuestProfile {
    pub const COLLECTION: &'static str = "guest_profiles";
}
