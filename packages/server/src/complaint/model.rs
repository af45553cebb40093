use chrono::{DateTime, Utc};
use common::{ComplaintKind, ComplaintPriority, ComplaintStatus};

use super::error::ComplaintError;
use crate::utils::filename::validate_image_filename;

/// Variant-specific part of a complaint. A record is exactly one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComplaintParty {
    Worker {
        submitted_by_user_id: i32,
    },
    Customer {
        customer_name: String,
        customer_email: String,
        customer_phone: Option<String>,
        room_number: Option<String>,
    },
}

impl ComplaintParty {
    pub fn kind(&self) -> ComplaintKind {
        match self {
            Self::Worker { .. } => ComplaintKind::Worker,
            Self::Customer { .. } => ComplaintKind::Customer,
        }
    }
}

/// Caller-editable fields shared by both complaint kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplaintFields {
    pub title: String,
    pub description: String,
    pub priority: ComplaintPriority,
    pub category: String,
    pub location: Option<String>,
    pub assigned_to_user_id: Option<i32>,
    pub notes: Option<String>,
}

/// Fields shared by both complaint kinds, as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplaintDetails {
    pub fields: ComplaintFields,
    pub status: ComplaintStatus,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A photo attached to a complaint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaAsset {
    pub id: i32,
    pub remote_url: String,
    /// Object store key. Internal; never serialized to clients.
    pub object_id: String,
    pub file_name: String,
    pub file_size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplaintRecord {
    pub id: i32,
    pub number: String,
    pub details: ComplaintDetails,
    pub party: ComplaintParty,
    pub images: Vec<MediaAsset>,
}

impl ComplaintRecord {
    pub fn kind(&self) -> ComplaintKind {
        self.party.kind()
    }
}

/// The complaint a media row belongs to.
///
/// Holding one of these is the only way to address media rows, so a row can
/// never be linked to both complaint tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaOwner {
    Worker(i32),
    Customer(i32),
}

impl MediaOwner {
    pub fn new(kind: ComplaintKind, complaint_id: i32) -> Self {
        match kind {
            ComplaintKind::Worker => Self::Worker(complaint_id),
            ComplaintKind::Customer => Self::Customer(complaint_id),
        }
    }

    pub fn worker_complaint_id(&self) -> Option<i32> {
        match self {
            Self::Worker(id) => Some(*id),
            Self::Customer(_) => None,
        }
    }

    pub fn customer_complaint_id(&self) -> Option<i32> {
        match self {
            Self::Worker(_) => None,
            Self::Customer(id) => Some(*id),
        }
    }
}

/// Raw image bytes received from the caller.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// An image that is durably stored remotely but not yet referenced by a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedImage {
    pub remote_url: String,
    pub object_id: String,
    pub file_name: String,
    pub file_size_bytes: i64,
}

/// Request to create a complaint, as assembled by the HTTP layer.
///
/// Variant-specific fields are all optional here; `validate` decides which
/// ones `kind` requires.
#[derive(Clone, Debug)]
pub struct CreateComplaint {
    pub kind: ComplaintKind,
    pub title: String,
    pub description: String,
    pub priority: Option<ComplaintPriority>,
    pub category: String,
    pub location: Option<String>,
    pub assigned_to_user_id: Option<i32>,
    pub notes: Option<String>,
    pub submitted_by_user_id: Option<i32>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub room_number: Option<String>,
    pub images: Vec<ImageUpload>,
}

/// A validated `CreateComplaint`.
#[derive(Clone, Debug)]
pub struct ComplaintDraft {
    pub fields: ComplaintFields,
    pub party: ComplaintParty,
    pub images: Vec<ImageUpload>,
}

/// Everything the repository needs to insert a complaint row.
#[derive(Clone, Debug)]
pub struct NewComplaint {
    pub number: String,
    pub fields: ComplaintFields,
    pub party: ComplaintParty,
    pub created_at: DateTime<Utc>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, message: &str) -> Result<String, ComplaintError> {
    non_blank(value).ok_or_else(|| ComplaintError::Validation(message.into()))
}

impl CreateComplaint {
    /// Enforce the per-kind required fields and basic field rules.
    pub fn validate(self) -> Result<ComplaintDraft, ComplaintError> {
        let title = self.title.trim().to_string();
        if title.is_empty() || title.chars().count() > 256 {
            return Err(ComplaintError::Validation(
                "Title must be 1-256 characters".into(),
            ));
        }

        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(ComplaintError::Validation("Category is required".into()));
        }

        let party = match self.kind {
            ComplaintKind::Worker => {
                if self.customer_name.is_some() || self.customer_email.is_some() {
                    return Err(ComplaintError::Validation(
                        "Worker complaints cannot carry customer details".into(),
                    ));
                }
                let submitted_by_user_id = self.submitted_by_user_id.ok_or_else(|| {
                    ComplaintError::Validation("submitted_by_user_id is required".into())
                })?;
                ComplaintParty::Worker {
                    submitted_by_user_id,
                }
            }
            ComplaintKind::Customer => {
                if self.submitted_by_user_id.is_some() {
                    return Err(ComplaintError::Validation(
                        "Customer complaints cannot carry submitted_by_user_id".into(),
                    ));
                }
                let customer_name = required(self.customer_name, "customer_name is required")?;
                let customer_email = required(self.customer_email, "customer_email is required")?;
                if !is_plausible_email(&customer_email) {
                    return Err(ComplaintError::Validation(
                        "customer_email is not a valid email address".into(),
                    ));
                }
                ComplaintParty::Customer {
                    customer_name,
                    customer_email,
                    customer_phone: non_blank(self.customer_phone),
                    room_number: non_blank(self.room_number),
                }
            }
        };

        let mut images = Vec::with_capacity(self.images.len());
        for image in self.images {
            let file_name = validate_image_filename(&image.file_name)
                .map_err(|e| {
                    ComplaintError::Validation(format!("{}: {}", e.message(), image.file_name))
                })?
                .to_string();
            if image.bytes.is_empty() {
                return Err(ComplaintError::Validation(format!(
                    "Image '{file_name}' is empty"
                )));
            }
            images.push(ImageUpload {
                file_name,
                bytes: image.bytes,
            });
        }

        Ok(ComplaintDraft {
            fields: ComplaintFields {
                title,
                description: self.description.trim().to_string(),
                priority: self.priority.unwrap_or_default(),
                category,
                location: non_blank(self.location),
                assigned_to_user_id: self.assigned_to_user_id,
                notes: non_blank(self.notes),
            },
            party,
            images,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(' ')
        }
        None => false,
    }
}

/// Requested move of a complaint to another status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ComplaintStatus,
    pub resolution: Option<String>,
}

impl StatusChange {
    pub fn validate(self) -> Result<Self, ComplaintError> {
        let resolution = non_blank(self.resolution);
        if resolution.is_some() && self.status != ComplaintStatus::Resolved {
            return Err(ComplaintError::Validation(
                "A resolution can only be recorded when resolving a complaint".into(),
            ));
        }
        Ok(Self {
            status: self.status,
            resolution,
        })
    }
}

impl ComplaintDetails {
    /// Apply a status change.
    ///
    /// `resolved_at` is stamped on the first move into `Resolved` only, and
    /// neither it nor `resolution` is cleared when the complaint later moves
    /// to another status.
    pub fn apply_status_change(&mut self, change: StatusChange, now: DateTime<Utc>) {
        if change.status == ComplaintStatus::Resolved {
            if self.resolved_at.is_none() {
                self.resolved_at = Some(now);
            }
            if change.resolution.is_some() {
                self.resolution = change.resolution;
            }
        }
        self.status = change.status;
        self.updated_at = now;
    }
}
