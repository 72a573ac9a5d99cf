use bson::oid::ObjectId;
use mongodb::Database;
use rentora_db::models::RentalUnit;

use super::base::{BaseDao, DaoResult};

/// Read-only view of the listing catalog. Unit management belongs to the
/// surrounding platform; the booking core only needs capacity and rates.
pub struct RentalUnitDao {
    pub base: BaseDao<RentalUnit>,
}

impl RentalUnitDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, RentalUnit::COLLECTION),
        }
    }

    pub async fn get(&self, unit_id: ObjectId) -> DaoResult<RentalUnit> {
        self.base.find_by_id(unit_id).await
    }
}
