use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-kind, per-day counter behind complaint numbers.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaint_sequence")]
pub struct Model {
    /// "WC" or "CC".
    #[sea_orm(primary_key, auto_increment = false)]
    pub prefix: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub day: Date,

    /// Last sequence value handed out for this prefix and day.
    pub last_value: i32,
}

impl ActiveModelBehavior for ActiveModel {}
