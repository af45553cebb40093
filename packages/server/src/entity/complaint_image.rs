use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reference to a complaint photo held in the object store.
///
/// Exactly one of the two owner columns is non-null; startup adds a CHECK
/// constraint for it (see `database::ensure_constraints`).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaint_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub worker_complaint_id: Option<i32>,
    #[sea_orm(belongs_to, from = "worker_complaint_id", to = "id")]
    pub worker_complaint: HasOne<super::worker_complaint::Entity>,

    #[sea_orm(indexed)]
    pub customer_complaint_id: Option<i32>,
    #[sea_orm(belongs_to, from = "customer_complaint_id", to = "id")]
    pub customer_complaint: HasOne<super::customer_complaint::Entity>,

    pub image_url: String,

    /// Object store key used for deletion.
    #[sea_orm(unique)]
    pub object_id: String,

    /// Original upload filename.
    pub file_name: String,

    pub file_size_bytes: i64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
