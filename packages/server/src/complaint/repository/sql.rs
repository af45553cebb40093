use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::ComplaintKind;
use sea_orm::sea_query::{Expr, LockType, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{ComplaintRepository, RowDeletion};
use crate::complaint::model::{
    ComplaintDetails, ComplaintFields, ComplaintParty, ComplaintRecord, MediaAsset, MediaOwner,
    NewComplaint, StatusChange, UploadedImage,
};
use crate::entity::{
    complaint_image, complaint_sequence, customer_complaint, work_order, worker_complaint,
};

/// PostgreSQL-backed complaint repository.
#[derive(Clone)]
pub struct SeaOrmComplaintRepository {
    db: DatabaseConnection,
}

impl SeaOrmComplaintRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn owner_filter(owner: MediaOwner) -> sea_orm::Condition {
    match owner {
        MediaOwner::Worker(id) => {
            sea_orm::Condition::all().add(complaint_image::Column::WorkerComplaintId.eq(id))
        }
        MediaOwner::Customer(id) => {
            sea_orm::Condition::all().add(complaint_image::Column::CustomerComplaintId.eq(id))
        }
    }
}

async fn images_of<C: ConnectionTrait>(db: &C, owner: MediaOwner) -> Result<Vec<MediaAsset>, DbErr> {
    let rows = complaint_image::Entity::find()
        .filter(owner_filter(owner))
        .order_by_asc(complaint_image::Column::Id)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(media_asset).collect())
}

fn media_asset(model: complaint_image::Model) -> MediaAsset {
    MediaAsset {
        id: model.id,
        remote_url: model.image_url,
        object_id: model.object_id,
        file_name: model.file_name,
        file_size_bytes: model.file_size_bytes,
        created_at: model.created_at,
    }
}

fn worker_record(model: worker_complaint::Model, images: Vec<MediaAsset>) -> ComplaintRecord {
    ComplaintRecord {
        id: model.id,
        number: model.number,
        details: ComplaintDetails {
            fields: ComplaintFields {
                title: model.title,
                description: model.description,
                priority: model.priority,
                category: model.category,
                location: model.location,
                assigned_to_user_id: model.assigned_to_user_id,
                notes: model.notes,
            },
            status: model.status,
            resolution: model.resolution,
            resolved_at: model.resolved_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        },
        party: ComplaintParty::Worker {
            submitted_by_user_id: model.submitted_by_user_id,
        },
        images,
    }
}

fn customer_record(model: customer_complaint::Model, images: Vec<MediaAsset>) -> ComplaintRecord {
    ComplaintRecord {
        id: model.id,
        number: model.number,
        details: ComplaintDetails {
            fields: ComplaintFields {
                title: model.title,
                description: model.description,
                priority: model.priority,
                category: model.category,
                location: model.location,
                assigned_to_user_id: model.assigned_to_user_id,
                notes: model.notes,
            },
            status: model.status,
            resolution: model.resolution,
            resolved_at: model.resolved_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        },
        party: ComplaintParty::Customer {
            customer_name: model.customer_name,
            customer_email: model.customer_email,
            customer_phone: model.customer_phone,
            room_number: model.room_number,
        },
        images,
    }
}

async fn find_record<C: ConnectionTrait>(
    db: &C,
    kind: ComplaintKind,
    id: i32,
) -> Result<Option<ComplaintRecord>, DbErr> {
    match kind {
        ComplaintKind::Worker => {
            let Some(model) = worker_complaint::Entity::find_by_id(id).one(db).await? else {
                return Ok(None);
            };
            let images = images_of(db, MediaOwner::Worker(id)).await?;
            Ok(Some(worker_record(model, images)))
        }
        ComplaintKind::Customer => {
            let Some(model) = customer_complaint::Entity::find_by_id(id).one(db).await? else {
                return Ok(None);
            };
            let images = images_of(db, MediaOwner::Customer(id)).await?;
            Ok(Some(customer_record(model, images)))
        }
    }
}

async fn count_work_orders<C: ConnectionTrait>(
    db: &C,
    kind: ComplaintKind,
    id: i32,
) -> Result<u64, DbErr> {
    let query = match kind {
        ComplaintKind::Worker => {
            work_order::Entity::find().filter(work_order::Column::WorkerComplaintId.eq(id))
        }
        ComplaintKind::Customer => {
            work_order::Entity::find().filter(work_order::Column::CustomerComplaintId.eq(id))
        }
    };
    query.count(db).await
}

#[async_trait]
impl ComplaintRepository for SeaOrmComplaintRepository {
    async fn next_sequence(&self, kind: ComplaintKind, day: NaiveDate) -> Result<u32, DbErr> {
        let counter = complaint_sequence::ActiveModel {
            prefix: Set(kind.number_prefix().to_string()),
            day: Set(day),
            last_value: Set(1),
        };

        // Single statement, so concurrent callers serialize on the row lock.
        let row = complaint_sequence::Entity::insert(counter)
            .on_conflict(
                OnConflict::columns([
                    complaint_sequence::Column::Prefix,
                    complaint_sequence::Column::Day,
                ])
                .value(
                    complaint_sequence::Column::LastValue,
                    Expr::cust("\"complaint_sequence\".\"last_value\" + 1"),
                )
                .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        u32::try_from(row.last_value)
            .map_err(|_| DbErr::Custom(format!("invalid sequence value {}", row.last_value)))
    }

    async fn insert(
        &self,
        complaint: NewComplaint,
        images: &[UploadedImage],
    ) -> Result<i32, DbErr> {
        let NewComplaint {
            number,
            fields,
            party,
            created_at,
        } = complaint;
        let kind = party.kind();

        let txn = self.db.begin().await?;

        let complaint_id = match party {
            ComplaintParty::Worker {
                submitted_by_user_id,
            } => {
                worker_complaint::ActiveModel {
                    number: Set(number),
                    title: Set(fields.title),
                    description: Set(fields.description),
                    status: Set(Default::default()),
                    priority: Set(fields.priority),
                    category: Set(fields.category),
                    location: Set(fields.location),
                    assigned_to_user_id: Set(fields.assigned_to_user_id),
                    resolution: Set(None),
                    resolved_at: Set(None),
                    notes: Set(fields.notes),
                    submitted_by_user_id: Set(submitted_by_user_id),
                    created_at: Set(created_at),
                    updated_at: Set(created_at),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
                .id
            }
            ComplaintParty::Customer {
                customer_name,
                customer_email,
                customer_phone,
                room_number,
            } => {
                customer_complaint::ActiveModel {
                    number: Set(number),
                    title: Set(fields.title),
                    description: Set(fields.description),
                    status: Set(Default::default()),
                    priority: Set(fields.priority),
                    category: Set(fields.category),
                    location: Set(fields.location),
                    assigned_to_user_id: Set(fields.assigned_to_user_id),
                    resolution: Set(None),
                    resolved_at: Set(None),
                    notes: Set(fields.notes),
                    customer_name: Set(customer_name),
                    customer_email: Set(customer_email),
                    customer_phone: Set(customer_phone),
                    room_number: Set(room_number),
                    created_at: Set(created_at),
                    updated_at: Set(created_at),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
                .id
            }
        };

        let owner = MediaOwner::new(kind, complaint_id);
        for image in images {
            complaint_image::ActiveModel {
                worker_complaint_id: Set(owner.worker_complaint_id()),
                customer_complaint_id: Set(owner.customer_complaint_id()),
                image_url: Set(image.remote_url.clone()),
                object_id: Set(image.object_id.clone()),
                file_name: Set(image.file_name.clone()),
                file_size_bytes: Set(image.file_size_bytes),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(complaint_id)
    }

    async fn find(&self, kind: ComplaintKind, id: i32) -> Result<Option<ComplaintRecord>, DbErr> {
        find_record(&self.db, kind, id).await
    }

    async fn has_dependent_work_order(
        &self,
        kind: ComplaintKind,
        id: i32,
    ) -> Result<bool, DbErr> {
        Ok(count_work_orders(&self.db, kind, id).await? > 0)
    }

    async fn delete(&self, kind: ComplaintKind, id: i32) -> Result<RowDeletion, DbErr> {
        let txn = self.db.begin().await?;

        // FOR UPDATE conflicts with the key-share lock a referencing insert takes,
        // so no work order can appear between this check and the delete.
        let locked = match kind {
            ComplaintKind::Worker => worker_complaint::Entity::find_by_id(id)
                .lock(LockType::Update)
                .one(&txn)
                .await?
                .is_some(),
            ComplaintKind::Customer => customer_complaint::Entity::find_by_id(id)
                .lock(LockType::Update)
                .one(&txn)
                .await?
                .is_some(),
        };
        if !locked {
            return Ok(RowDeletion::Missing);
        }
        if count_work_orders(&txn, kind, id).await? > 0 {
            return Ok(RowDeletion::Referenced);
        }

        complaint_image::Entity::delete_many()
            .filter(owner_filter(MediaOwner::new(kind, id)))
            .exec(&txn)
            .await?;

        match kind {
            ComplaintKind::Worker => worker_complaint::Entity::delete_by_id(id).exec(&txn).await?,
            ComplaintKind::Customer => {
                customer_complaint::Entity::delete_by_id(id)
                    .exec(&txn)
                    .await?
            }
        };

        txn.commit().await?;
        Ok(RowDeletion::Deleted)
    }

    async fn update_status(
        &self,
        kind: ComplaintKind,
        id: i32,
        change: StatusChange,
    ) -> Result<Option<ComplaintRecord>, DbErr> {
        let txn = self.db.begin().await?;

        // Lock the row so concurrent transitions cannot both stamp resolved_at.
        let current = match kind {
            ComplaintKind::Worker => worker_complaint::Entity::find_by_id(id)
                .lock(LockType::Update)
                .one(&txn)
                .await?
                .map(|m| worker_record(m, Vec::new())),
            ComplaintKind::Customer => customer_complaint::Entity::find_by_id(id)
                .lock(LockType::Update)
                .one(&txn)
                .await?
                .map(|m| customer_record(m, Vec::new())),
        };
        let Some(mut record) = current else {
            return Ok(None);
        };

        record.details.apply_status_change(change, Utc::now());
        let details = &record.details;

        match kind {
            ComplaintKind::Worker => {
                worker_complaint::Entity::update_many()
                    .col_expr(
                        worker_complaint::Column::Status,
                        Expr::value(details.status.as_str()),
                    )
                    .col_expr(
                        worker_complaint::Column::Resolution,
                        Expr::value(details.resolution.clone()),
                    )
                    .col_expr(
                        worker_complaint::Column::ResolvedAt,
                        Expr::value(details.resolved_at),
                    )
                    .col_expr(
                        worker_complaint::Column::UpdatedAt,
                        Expr::value(details.updated_at),
                    )
                    .filter(worker_complaint::Column::Id.eq(id))
                    .exec(&txn)
                    .await?;
            }
            ComplaintKind::Customer => {
                customer_complaint::Entity::update_many()
                    .col_expr(
                        customer_complaint::Column::Status,
                        Expr::value(details.status.as_str()),
                    )
                    .col_expr(
                        customer_complaint::Column::Resolution,
                        Expr::value(details.resolution.clone()),
                    )
                    .col_expr(
                        customer_complaint::Column::ResolvedAt,
                        Expr::value(details.resolved_at),
                    )
                    .col_expr(
                        customer_complaint::Column::UpdatedAt,
                        Expr::value(details.updated_at),
                    )
                    .filter(customer_complaint::Column::Id.eq(id))
                    .exec(&txn)
                    .await?;
            }
        }

        let updated = find_record(&txn, kind, id).await?;
        txn.commit().await?;
        Ok(updated)
    }
}
