use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Work order, owned by the maintenance module.
///
/// Only read here: a back-reference to a complaint blocks that complaint's deletion.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_order")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub status: String,

    #[sea_orm(indexed)]
    pub worker_complaint_id: Option<i32>,
    #[sea_orm(belongs_to, from = "worker_complaint_id", to = "id")]
    pub worker_complaint: HasOne<super::worker_complaint::Entity>,

    #[sea_orm(indexed)]
    pub customer_complaint_id: Option<i32>,
    #[sea_orm(belongs_to, from = "customer_complaint_id", to = "id")]
    pub customer_complaint: HasOne<super::customer_complaint::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
