#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two complaint tables a record lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintKind {
    /// Raised by an employee about an internal problem.
    Worker,
    /// Raised on behalf of a guest.
    Customer,
}

impl ComplaintKind {
    pub const ALL: &'static [ComplaintKind] = &[Self::Worker, Self::Customer];

    /// Lowercase form used in URLs and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Customer => "customer",
        }
    }

    /// Prefix of the human-readable complaint number.
    pub fn number_prefix(&self) -> &'static str {
        match self {
            Self::Worker => "WC",
            Self::Customer => "CC",
        }
    }
}

impl fmt::Display for ComplaintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "worker" => Ok(Self::Worker),
            "customer" => Ok(Self::Customer),
            _ => Err(ParseEnumError::new("complaint type", s, &["worker", "customer"])),
        }
    }
}

/// Lifecycle status of a complaint.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum ComplaintStatus {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Open"))]
    Open,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "InProgress"))]
    InProgress,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Resolved"))]
    Resolved,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Closed"))]
    Closed,
}

impl ComplaintStatus {
    pub const ALL: &'static [ComplaintStatus] =
        &[Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    /// Returns the string representation (PascalCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "InProgress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }
}

impl Default for ComplaintStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ParseEnumError::new(
                    "status",
                    s,
                    &Self::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
                )
            })
    }
}

/// How urgently a complaint needs attention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum ComplaintPriority {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Low"))]
    Low,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Medium"))]
    Medium,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "High"))]
    High,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Urgent"))]
    Urgent,
}

impl ComplaintPriority {
    pub const ALL: &'static [ComplaintPriority] =
        &[Self::Low, Self::Medium, Self::High, Self::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl Default for ComplaintPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for ComplaintPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| {
                ParseEnumError::new(
                    "priority",
                    s,
                    &Self::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                )
            })
    }
}

/// Error when parsing an invalid enum string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    field: &'static str,
    invalid: String,
    valid: String,
}

impl ParseEnumError {
    fn new(field: &'static str, invalid: &str, valid: &[&str]) -> Self {
        Self {
            field,
            invalid: invalid.to_string(),
            valid: valid.join(", "),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Valid values: {}",
            self.field, self.invalid, self.valid
        )
    }
}

impl std::error::Error for ParseEnumError {}
