use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{ComplaintKind, ComplaintPriority};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::complaint::model::{CreateComplaint, ImageUpload, StatusChange};
use crate::config::ComplaintConfig;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::complaint::{ComplaintResponse, UpdateStatusRequest};
use crate::state::AppState;

pub fn complaint_upload_body_limit(config: &ComplaintConfig) -> DefaultBodyLimit {
    DefaultBodyLimit::max(config.body_limit())
}

#[utoipa::path(
    post,
    path = "/worker",
    tag = "Complaints",
    operation_id = "createWorkerComplaint",
    summary = "Create a worker complaint",
    description = "Creates a complaint raised by an employee. Text fields are sent as multipart \
        fields; each photo is sent as a repeated `images` file part. `submitted_by_user_id` \
        is required. Photos are uploaded before the complaint is saved and are deleted again \
        if saving fails.",
    request_body(content_type = "multipart/form-data", description = "Complaint fields and images"),
    responses(
        (status = 201, description = "Complaint created", body = ComplaintResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Upload or save failed (UPLOAD_FAILED, PERSISTENCE_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_worker_complaint(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    create_complaint(state, ComplaintKind::Worker, multipart).await
}

#[utoipa::path(
    post,
    path = "/customer",
    tag = "Complaints",
    operation_id = "createCustomerComplaint",
    summary = "Create a customer complaint",
    description = "Creates a complaint raised on behalf of a guest. `customer_name` and \
        `customer_email` are required. Photos are sent as repeated `images` file parts.",
    request_body(content_type = "multipart/form-data", description = "Complaint fields and images"),
    responses(
        (status = 201, description = "Complaint created", body = ComplaintResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Upload or save failed (UPLOAD_FAILED, PERSISTENCE_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_customer_complaint(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    create_complaint(state, ComplaintKind::Customer, multipart).await
}

async fn create_complaint(
    state: AppState,
    kind: ComplaintKind,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ComplaintResponse>), AppError> {
    let command = read_create_command(kind, multipart, &state.config.complaint).await?;
    let saga = state.creation_saga();

    // Detached: if the client goes away the guard cancels the token and the
    // saga compensates at its next checkpoint.
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    let task =
        tokio::spawn(async move { saga.create_with_cancellation(command, &token).await });
    let result = task
        .await
        .map_err(|e| AppError::Internal(format!("Complaint task failed: {e}")))?;
    guard.disarm();

    let record = result?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

fn blank_to_none(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_id(field: &str, value: &str) -> Result<Option<i32>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("{field} must be an integer")))
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))
}

/// Read a file part, refusing to buffer more than `limit` bytes.
async fn read_image(mut field: Field<'_>, limit: usize) -> Result<ImageUpload, AppError> {
    let file_name = field
        .file_name()
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::Validation("Image parts must have a filename".into()))?;

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read image '{file_name}': {e}")))?
    {
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::Validation(format!(
                "Image '{file_name}' exceeds the maximum size of {limit} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(ImageUpload { file_name, bytes })
}

async fn read_create_command(
    kind: ComplaintKind,
    mut multipart: Multipart,
    limits: &ComplaintConfig,
) -> Result<CreateComplaint, AppError> {
    let mut command = CreateComplaint {
        kind,
        title: String::new(),
        description: String::new(),
        priority: None,
        category: String::new(),
        location: None,
        assigned_to_user_id: None,
        notes: None,
        submitted_by_user_id: None,
        customer_name: None,
        customer_email: None,
        customer_phone: None,
        room_number: None,
        images: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                if command.images.len() >= limits.max_images {
                    return Err(AppError::Validation(format!(
                        "At most {} images can be attached",
                        limits.max_images
                    )));
                }
                command
                    .images
                    .push(read_image(field, limits.max_image_size).await?);
            }
            "title" => command.title = read_text(field).await?,
            "description" => command.description = read_text(field).await?,
            "category" => command.category = read_text(field).await?,
            "priority" => {
                command.priority = blank_to_none(read_text(field).await?)
                    .map(|p| p.trim().parse::<ComplaintPriority>())
                    .transpose()
                    .map_err(|e| AppError::Validation(e.to_string()))?;
            }
            "location" => command.location = blank_to_none(read_text(field).await?),
            "notes" => command.notes = blank_to_none(read_text(field).await?),
            "assigned_to_user_id" => {
                command.assigned_to_user_id = parse_id(&name, &read_text(field).await?)?
            }
            "submitted_by_user_id" => {
                command.submitted_by_user_id = parse_id(&name, &read_text(field).await?)?
            }
            "customer_name" => command.customer_name = blank_to_none(read_text(field).await?),
            "customer_email" => command.customer_email = blank_to_none(read_text(field).await?),
            "customer_phone" => command.customer_phone = blank_to_none(read_text(field).await?),
            "room_number" => command.room_number = blank_to_none(read_text(field).await?),
            _ => {} // Ignore unknown fields.
        }
    }

    Ok(command)
}

fn parse_kind(kind: &str) -> Result<ComplaintKind, AppError> {
    kind.parse::<ComplaintKind>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

fn not_found(kind: ComplaintKind, id: i32) -> AppError {
    AppError::NotFound(format!("{kind} complaint {id} not found"))
}

#[utoipa::path(
    get,
    path = "/{kind}/{id}",
    tag = "Complaints",
    operation_id = "getComplaint",
    summary = "Get a complaint",
    params(
        ("kind" = String, Path, description = "`worker` or `customer`"),
        ("id" = i32, Path, description = "Complaint ID"),
    ),
    responses(
        (status = 200, description = "Complaint with its images", body = ComplaintResponse),
        (status = 400, description = "Unknown complaint type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Complaint not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_complaint(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
) -> Result<Json<ComplaintResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    let record = state
        .complaints
        .find(kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;

    Ok(Json(record.into()))
}

#[utoipa::path(
    patch,
    path = "/{kind}/{id}/status",
    tag = "Complaints",
    operation_id = "updateComplaintStatus",
    summary = "Change a complaint's status",
    description = "Moves a complaint to another status. `resolved_at` is stamped the first time \
        the complaint becomes `Resolved` and is kept on later transitions, as is `resolution`.",
    params(
        ("kind" = String, Path, description = "`worker` or `customer`"),
        ("id" = i32, Path, description = "Complaint ID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Complaint not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_complaint_status(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<Json<ComplaintResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    let change = StatusChange::from(payload).validate()?;

    let record = state
        .complaints
        .update_status(kind, id, change)
        .await?
        .ok_or_else(|| not_found(kind, id))?;

    Ok(Json(record.into()))
}

#[utoipa::path(
    delete,
    path = "/{kind}/{id}",
    tag = "Complaints",
    operation_id = "deleteComplaint",
    summary = "Delete a complaint",
    description = "Deletes a complaint, its images and their stored objects. Refused while a \
        work order references the complaint. Failures to delete stored objects are logged and \
        do not prevent deletion.",
    params(
        ("kind" = String, Path, description = "`worker` or `customer`"),
        ("id" = i32, Path, description = "Complaint ID"),
    ),
    responses(
        (status = 204, description = "Complaint deleted"),
        (status = 404, description = "Complaint not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Referenced by a work order (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_complaint(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
) -> Result<StatusCode, AppError> {
    let kind = parse_kind(&kind)?;

    if state.deletion_saga().delete(kind, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(kind, id))
    }
}
