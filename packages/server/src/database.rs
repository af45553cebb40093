use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.max_connections(50)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(60))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;
    ensure_constraints(&db).await?;

    Ok(db)
}

/// Constraints the entity definitions cannot express.
///
/// Failures are logged rather than returned; the schema stays usable without them.
pub async fn ensure_constraints(db: &DatabaseConnection) -> Result<(), DbErr> {
    // A media row belongs to exactly one complaint table.
    let owner_check = r#"
        DO $$
        BEGIN
            IF NOT EXISTS (
                SELECT 1 FROM pg_constraint WHERE conname = 'complaint_image_single_owner'
            ) THEN
                ALTER TABLE complaint_image
                    ADD CONSTRAINT complaint_image_single_owner
                    CHECK (num_nonnulls(worker_complaint_id, customer_complaint_id) = 1);
            END IF;
        END
        $$;
    "#;
    match db.execute_unprepared(owner_check).await {
        Ok(_) => info!("Ensured constraint complaint_image_single_owner exists"),
        Err(e) => warn!("Failed to add constraint complaint_image_single_owner: {}", e),
    }

    Ok(())
}
