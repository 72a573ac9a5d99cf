use bson::oid::ObjectId;
use mongodb::Database;
use rentora_db::models::GuestProfile;

use super::base::{BaseDao, DaoResult};

/// Read-only lookup against the identity component's profiles, used to
/// enrich booking responses with a display name and photo. Never part of
/// an authorization decision.
pub struct GuestDao {
    pub base: BaseDao<GuestProfile>,
}

impl GuestDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, GuestProfile::COLLECTION),
        }
    }

    /// A missing profile is not an error; responses simply omit the
    /// enrichment.
    pub async fn get_profile(&self, guest_id: ObjectId) -> DaoResult<Option<GuestProfile>> {
        self.base.find_one(bson::doc! { "_id": guest_id }).await
    }
}
