//! PostgreSQL-backed tests against the shared test container.

use chrono::{NaiveDate, Utc};
use common::{ComplaintKind, ComplaintPriority, ComplaintStatus};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbBackend, EntityTrait, Set, Statement};

use crate::common::{TestApp, fresh_database, routes};
use server::complaint::model::{
    ComplaintFields, ComplaintParty, NewComplaint, StatusChange, UploadedImage,
};
use server::complaint::{ComplaintRepository, RowDeletion, SeaOrmComplaintRepository};
use server::entity::{complaint_image, work_order};

fn fields(title: &str) -> ComplaintFields {
    ComplaintFields {
        title: title.into(),
        description: "Reported at reception".into(),
        priority: ComplaintPriority::Urgent,
        category: "Safety".into(),
        location: Some("Lobby".into()),
        assigned_to_user_id: None,
        notes: None,
    }
}

fn customer_complaint(number: &str) -> NewComplaint {
    NewComplaint {
        number: number.into(),
        fields: fields("Wet floor"),
        party: ComplaintParty::Customer {
            customer_name: "Ada Guest".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: None,
            room_number: Some("101".into()),
        },
        created_at: Utc::now(),
    }
}

fn uploaded(object_id: &str) -> UploadedImage {
    UploadedImage {
        remote_url: format!("memory://{object_id}"),
        object_id: object_id.into(),
        file_name: "floor.jpg".into(),
        file_size_bytes: 4,
    }
}

#[tokio::test]
async fn sequence_is_atomic_under_concurrency() {
    let repo = SeaOrmComplaintRepository::new(fresh_database().await);
    let day = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.next_sequence(ComplaintKind::Worker, day).await })
        })
        .collect();

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap().unwrap());
    }
    values.sort();
    assert_eq!(values, (1..=20).collect::<Vec<u32>>());

    assert_eq!(repo.next_sequence(ComplaintKind::Customer, day).await.unwrap(), 1);
    let next_day = day.succ_opt().unwrap();
    assert_eq!(repo.next_sequence(ComplaintKind::Worker, next_day).await.unwrap(), 1);
}

#[tokio::test]
async fn insert_and_find_round_trip_with_media() {
    let repo = SeaOrmComplaintRepository::new(fresh_database().await);

    let id = repo
        .insert(
            customer_complaint("CC-20250315-0001"),
            &[uploaded("complaints/a"), uploaded("complaints/b")],
        )
        .await
        .unwrap();
    let record = repo.find(ComplaintKind::Customer, id).await.unwrap().unwrap();

    assert_eq!(record.number, "CC-20250315-0001");
    assert_eq!(record.details.status, ComplaintStatus::Open);
    assert_eq!(record.details.fields.priority, ComplaintPriority::Urgent);
    let ids: Vec<_> = record.images.iter().map(|m| m.object_id.as_str()).collect();
    assert_eq!(ids, ["complaints/a", "complaints/b"]);
    assert!(repo.find(ComplaintKind::Worker, id).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_media_insert_rolls_back_complaint() {
    let repo = SeaOrmComplaintRepository::new(fresh_database().await);

    // The second row violates the unique object_id.
    let result = repo
        .insert(
            customer_complaint("CC-20250315-0001"),
            &[uploaded("complaints/dup"), uploaded("complaints/dup")],
        )
        .await;

    assert!(result.is_err());
    let id = repo
        .insert(customer_complaint("CC-20250315-0001"), &[])
        .await
        .expect("number must be free again after rollback");
    assert!(repo.find(ComplaintKind::Customer, id).await.unwrap().is_some());
}

#[tokio::test]
async fn media_row_with_two_owners_is_refused() {
    let db = fresh_database().await;
    let repo = SeaOrmComplaintRepository::new(db.clone());
    let worker_id = repo
        .insert(
            NewComplaint {
                number: "WC-20250315-0001".into(),
                fields: fields("Loose rail"),
                party: ComplaintParty::Worker {
                    submitted_by_user_id: 4,
                },
                created_at: Utc::now(),
            },
            &[],
        )
        .await
        .unwrap();
    let customer_id = repo
        .insert(customer_complaint("CC-20250315-0001"), &[])
        .await
        .unwrap();

    let both = complaint_image::ActiveModel {
        worker_complaint_id: Set(Some(worker_id)),
        customer_complaint_id: Set(Some(customer_id)),
        image_url: Set("memory://complaints/x".into()),
        object_id: Set("complaints/x".into()),
        file_name: Set("x.jpg".into()),
        file_size_bytes: Set(1),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    assert!(both.insert(&db).await.is_err());

    let orphan = db
        .execute_raw(Statement::from_string(
            DbBackend::Postgres,
            "INSERT INTO complaint_image (image_url, object_id, file_name, file_size_bytes, created_at) \
             VALUES ('u', 'complaints/y', 'y.jpg', 1, now())"
                .to_string(),
        ))
        .await;
    assert!(orphan.is_err());
}

#[tokio::test]
async fn work_order_reference_is_detected() {
    let db = fresh_database().await;
    let repo = SeaOrmComplaintRepository::new(db.clone());
    let id = repo
        .insert(customer_complaint("CC-20250315-0001"), &[])
        .await
        .unwrap();
    assert!(!repo.has_dependent_work_order(ComplaintKind::Customer, id).await.unwrap());

    work_order::ActiveModel {
        title: Set("Mop the lobby".into()),
        status: Set("Open".into()),
        worker_complaint_id: Set(None),
        customer_complaint_id: Set(Some(id)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    assert!(repo.has_dependent_work_order(ComplaintKind::Customer, id).await.unwrap());
    assert!(!repo.has_dependent_work_order(ComplaintKind::Worker, id).await.unwrap());
}

#[tokio::test]
async fn delete_refuses_referenced_complaint() {
    let db = fresh_database().await;
    let repo = SeaOrmComplaintRepository::new(db.clone());
    let id = repo
        .insert(customer_complaint("CC-20250315-0001"), &[uploaded("complaints/a")])
        .await
        .unwrap();
    work_order::ActiveModel {
        title: Set("Mop the lobby".into()),
        status: Set("Open".into()),
        worker_complaint_id: Set(None),
        customer_complaint_id: Set(Some(id)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    assert_eq!(
        repo.delete(ComplaintKind::Customer, id).await.unwrap(),
        RowDeletion::Referenced
    );
    assert!(repo.find(ComplaintKind::Customer, id).await.unwrap().is_some());
    let media = complaint_image::Entity::find().all(&db).await.unwrap();
    assert_eq!(media.len(), 1);
}

#[tokio::test]
async fn delete_removes_media_rows() {
    let db = fresh_database().await;
    let repo = SeaOrmComplaintRepository::new(db.clone());
    let id = repo
        .insert(customer_complaint("CC-20250315-0001"), &[uploaded("complaints/a")])
        .await
        .unwrap();

    assert_eq!(
        repo.delete(ComplaintKind::Customer, id).await.unwrap(),
        RowDeletion::Deleted
    );
    assert_eq!(
        repo.delete(ComplaintKind::Customer, id).await.unwrap(),
        RowDeletion::Missing
    );
    let remaining = complaint_image::Entity::find().all(&db).await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn status_update_keeps_first_resolution_time() {
    let repo = SeaOrmComplaintRepository::new(fresh_database().await);
    let id = repo
        .insert(customer_complaint("CC-20250315-0001"), &[])
        .await
        .unwrap();

    let resolved = repo
        .update_status(
            ComplaintKind::Customer,
            id,
            StatusChange {
                status: ComplaintStatus::Resolved,
                resolution: Some("Dried".into()),
            },
        )
        .await
        .unwrap()
        .unwrap();
    let reopened = repo
        .update_status(
            ComplaintKind::Customer,
            id,
            StatusChange {
                status: ComplaintStatus::Open,
                resolution: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert!(resolved.details.resolved_at.is_some());
    assert_eq!(reopened.details.status, ComplaintStatus::Open);
    assert_eq!(reopened.details.resolved_at, resolved.details.resolved_at);
    assert_eq!(reopened.details.resolution.as_deref(), Some("Dried"));
    assert!(
        repo.update_status(
            ComplaintKind::Worker,
            id,
            StatusChange {
                status: ComplaintStatus::Closed,
                resolution: None,
            },
        )
        .await
        .unwrap()
        .is_none()
    );
}

#[tokio::test]
async fn api_create_and_delete_against_postgres() {
    let app = TestApp::spawn_postgres().await;
    let id = app
        .create_worker_complaint(&[("a.jpg", b"A"), ("b.jpg", b"B")])
        .await;

    let res = app.get(&routes::complaint("worker", id)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["images"].as_array().unwrap().len(), 2);
    assert_eq!(app.store.len(), 2);

    work_order::ActiveModel {
        title: Set("Fix lift".into()),
        status: Set("Open".into()),
        worker_complaint_id: Set(Some(id)),
        customer_complaint_id: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(app.db())
    .await
    .unwrap();

    let res = app.delete(&routes::complaint("worker", id)).await;
    assert_eq!(res.status, 409);
    assert_eq!(app.store.len(), 2);

    work_order::Entity::delete_many().exec(app.db()).await.unwrap();
    let res = app.delete(&routes::complaint("worker", id)).await;
    assert_eq!(res.status, 204);
    assert!(app.store.is_empty());
}
