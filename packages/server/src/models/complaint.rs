use chrono::{DateTime, Utc};
use common::{ComplaintKind, ComplaintPriority, ComplaintStatus};
use serde::{Deserialize, Serialize};

use crate::complaint::model::{ComplaintParty, ComplaintRecord, MediaAsset, StatusChange};

/// A photo attached to a complaint.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaAssetResponse {
    #[schema(example = 12)]
    pub id: i32,
    /// Public URL of the stored image.
    #[schema(example = "/media/complaints/01936f0e-1234-7abc-8000-000000000001-leak.jpg")]
    pub image_url: String,
    /// Original upload filename.
    #[schema(example = "leak.jpg")]
    pub file_name: String,
    #[schema(example = 142857)]
    pub file_size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

impl From<MediaAsset> for MediaAssetResponse {
    fn from(asset: MediaAsset) -> Self {
        Self {
            id: asset.id,
            image_url: asset.remote_url,
            file_name: asset.file_name,
            file_size_bytes: asset.file_size_bytes,
            created_at: asset.created_at,
        }
    }
}

/// A worker or customer complaint with its photos.
///
/// `submitted_by_user_id` is only present on worker complaints, the
/// `customer_*` and `room_number` fields only on customer complaints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ComplaintResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "worker")]
    pub kind: ComplaintKind,
    /// Human-readable number, `{WC|CC}-{yyyyMMdd}-{sequence}`.
    #[schema(example = "CC-20250315-0012")]
    pub number: String,
    #[schema(example = "Leaking tap")]
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub priority: ComplaintPriority,
    #[schema(example = "Plumbing")]
    pub category: String,
    pub location: Option<String>,
    pub assigned_to_user_id: Option<i32>,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by_user_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    pub images: Vec<MediaAssetResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComplaintRecord> for ComplaintResponse {
    fn from(record: ComplaintRecord) -> Self {
        let kind = record.kind();
        let details = record.details;
        let mut response = Self {
            id: record.id,
            kind,
            number: record.number,
            title: details.fields.title,
            description: details.fields.description,
            status: details.status,
            priority: details.fields.priority,
            category: details.fields.category,
            location: details.fields.location,
            assigned_to_user_id: details.fields.assigned_to_user_id,
            resolution: details.resolution,
            resolved_at: details.resolved_at,
            notes: details.fields.notes,
            submitted_by_user_id: None,
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            room_number: None,
            images: record.images.into_iter().map(Into::into).collect(),
            created_at: details.created_at,
            updated_at: details.updated_at,
        };

        match record.party {
            ComplaintParty::Worker {
                submitted_by_user_id,
            } => response.submitted_by_user_id = Some(submitted_by_user_id),
            ComplaintParty::Customer {
                customer_name,
                customer_email,
                customer_phone,
                room_number,
            } => {
                response.customer_name = Some(customer_name);
                response.customer_email = Some(customer_email);
                response.customer_phone = customer_phone;
                response.room_number = room_number;
            }
        }

        response
    }
}

/// Request body for changing a complaint's status.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status: ComplaintStatus,
    /// Only accepted together with `status = "Resolved"`.
    #[schema(example = "Replaced the washer")]
    pub resolution: Option<String>,
}

impl From<UpdateStatusRequest> for StatusChange {
    fn from(req: UpdateStatusRequest) -> Self {
        Self {
            status: req.status,
            resolution: req.resolution,
        }
    }
}
