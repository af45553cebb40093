use common::{ComplaintPriority, ComplaintStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Complaint raised by an employee.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "worker_complaint")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// `WC-yyyyMMdd-nnnn`; immutable once assigned.
    #[sea_orm(unique)]
    pub number: String,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(indexed)]
    pub status: ComplaintStatus,
    pub priority: ComplaintPriority,
    pub category: String,
    pub location: Option<String>,
    pub assigned_to_user_id: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    #[sea_orm(indexed)]
    pub submitted_by_user_id: i32,

    #[sea_orm(has_many)]
    pub images: HasMany<super::complaint_image::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
