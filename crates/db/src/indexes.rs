use mongodb::{Database, IndexModel};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Rental units (catalog, read-only here)
    create_indexes(
        db,
        "rental_units",
        vec![index(bson::doc! { "active": 1, "name": 1 })],
    )
    .await?;

    // Guest profiles
    create_indexes(
        db,
        "guest_profiles",
        vec![index(bson::doc! { "email": 1 })],
    )
    .await?;

    // Bookings: the overlap scan filters on unit + status and ranges on
    // the stay window
    create_indexes(
        db,
        "bookings",
        vec![
            index(bson::doc! { "unit_id": 1, "status": 1, "check_in": 1 }),
            index(bson::doc! { "unit_id": 1, "created_at": -1 }),
            index(bson::doc! { "guest_id": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Access tokens: cascade revoke and listing hit booking + status
    create_indexes(
        db,
        "access_tokens",
        vec![
            index(bson::doc! { "booking_id": 1, "status": 1 }),
            index(bson::doc! { "booking_id": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Booking events (append-only audit trail)
    create_indexes(
        db,
        "booking_events",
        vec![index(bson::doc! { "booking_id": 1, "created_at": 1 })],
    )
    .await?;

    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
