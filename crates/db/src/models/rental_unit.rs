use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Catalog entry for a bookable property. Owned by the listing component;
/// the booking core only reads identity, capacity and rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalUnit {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub max_guests: u32,
    /// Minor currency units per night.
    pub nightly_rate: i64,
    pub monthly_rate: Option<i64>,
    pub yearly_rate: Option<i64>,
    #[serde(default = "bool_true")]
    pub active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl RentalUnit {
    pub const COLLECTION: &'static str = "rental_units";
}
