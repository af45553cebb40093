use chrono::Utc;
use common::ComplaintKind;
use serde_json::json;

use crate::common::{TestApp, routes};
use server::config::ComplaintConfig;

mod create_complaint {
    use super::*;

    #[tokio::test]
    async fn worker_complaint_without_images() {
        let app = TestApp::spawn().await;

        let res = app
            .post_complaint(
                routes::WORKER_COMPLAINTS,
                &[
                    ("title", "Broken lift"),
                    ("category", "Maintenance"),
                    ("priority", "High"),
                    ("submitted_by_user_id", "3"),
                ],
                &[],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let today = Utc::now().format("%Y%m%d").to_string();
        assert_eq!(res.body["number"], format!("WC-{today}-0001"));
        assert_eq!(res.body["kind"], "worker");
        assert_eq!(res.body["status"], "Open");
        assert_eq!(res.body["priority"], "High");
        assert_eq!(res.body["submitted_by_user_id"], 3);
        assert_eq!(res.body["images"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn customer_complaint_with_images() {
        let app = TestApp::spawn().await;

        let res = app
            .post_complaint(
                routes::CUSTOMER_COMPLAINTS,
                &[
                    ("title", "Stained carpet"),
                    ("category", "Housekeeping"),
                    ("customer_name", "Lin Guest"),
                    ("customer_email", "lin@example.com"),
                ],
                &[("stain.jpg", b"JPEG1"), ("stain2.png", b"PNG22")],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["file_name"], "stain.jpg");
        assert_eq!(images[0]["file_size_bytes"], 5);
        assert!(images[0]["id"].as_i64().is_some());
        assert!(images[0]["image_url"].as_str().unwrap().starts_with("memory://"));
        assert!(images[0].get("object_id").is_none());
        assert_eq!(app.store.len(), 2);
    }

    #[tokio::test]
    async fn customer_without_email_is_rejected_before_upload() {
        let app = TestApp::spawn().await;

        let res = app
            .post_complaint(
                routes::CUSTOMER_COMPLAINTS,
                &[
                    ("title", "Cold room"),
                    ("category", "HVAC"),
                    ("customer_name", "Lin Guest"),
                ],
                &[("room.jpg", b"JPEG")],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(app.store.upload_calls().is_empty());
    }

    #[tokio::test]
    async fn non_image_attachment_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_complaint(
                routes::WORKER_COMPLAINTS,
                &[
                    ("title", "Broken lift"),
                    ("category", "Maintenance"),
                    ("submitted_by_user_id", "3"),
                ],
                &[("script.sh", b"#!/bin/sh")],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn bad_user_id_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_complaint(
                routes::WORKER_COMPLAINTS,
                &[
                    ("title", "Broken lift"),
                    ("category", "Maintenance"),
                    ("submitted_by_user_id", "three"),
                ],
                &[],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "submitted_by_user_id must be an integer");
    }

    #[tokio::test]
    async fn too_many_images_are_rejected() {
        let app = TestApp::spawn_with(ComplaintConfig {
            max_images: 1,
            ..Default::default()
        })
        .await;

        let res = app
            .post_complaint(
                routes::WORKER_COMPLAINTS,
                &[
                    ("title", "Broken lift"),
                    ("category", "Maintenance"),
                    ("submitted_by_user_id", "3"),
                ],
                &[("a.jpg", b"A"), ("b.jpg", b"B")],
            )
            .await;

        assert_eq!(res.status, 400);
        assert!(app.store.upload_calls().is_empty());
    }

    #[tokio::test]
    async fn oversized_image_is_rejected() {
        let app = TestApp::spawn_with(ComplaintConfig {
            max_image_size: 4,
            ..Default::default()
        })
        .await;

        let res = app
            .post_complaint(
                routes::WORKER_COMPLAINTS,
                &[
                    ("title", "Broken lift"),
                    ("category", "Maintenance"),
                    ("submitted_by_user_id", "3"),
                ],
                &[("big.jpg", b"0123456789")],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn upload_failure_reports_upload_failed_and_cleans_up() {
        let app = TestApp::spawn().await;
        app.store.fail_upload_on(2);

        let res = app
            .post_complaint(
                routes::CUSTOMER_COMPLAINTS,
                &[
                    ("title", "Broken window"),
                    ("category", "Maintenance"),
                    ("customer_name", "Lin Guest"),
                    ("customer_email", "lin@example.com"),
                ],
                &[("one.jpg", b"1"), ("two.jpg", b"2")],
            )
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "UPLOAD_FAILED");
        assert_eq!(res.body["message"], "Could not upload images");
        assert_eq!(app.store.delete_calls().len(), 1);
        assert!(app.store.is_empty());
        assert_eq!(app.memory_repo().count(ComplaintKind::Customer), 0);
    }

    #[tokio::test]
    async fn save_failure_reports_persistence_failed_and_cleans_up() {
        let app = TestApp::spawn().await;
        app.memory_repo().fail_inserts(true);

        let res = app
            .post_complaint(
                routes::WORKER_COMPLAINTS,
                &[
                    ("title", "Broken lift"),
                    ("category", "Maintenance"),
                    ("submitted_by_user_id", "3"),
                ],
                &[("a.jpg", b"A"), ("b.jpg", b"B")],
            )
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "PERSISTENCE_FAILED");
        assert_eq!(res.body["message"], "Could not save complaint");
        assert_eq!(app.store.delete_calls().len(), 2);
        assert!(app.store.is_empty());
    }
}

mod get_complaint {
    use super::*;

    #[tokio::test]
    async fn returns_complaint_with_images() {
        let app = TestApp::spawn().await;
        let id = app.create_customer_complaint(&[("a.jpg", b"A")]).await;

        let res = app.get(&routes::complaint("customer", id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["customer_email"], "lin@example.com");
        assert_eq!(res.body["room_number"], "512");
        assert_eq!(res.body["images"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn wrong_kind_is_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_worker_complaint(&[]).await;

        let res = app.get(&routes::complaint("customer", id)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::complaint("vendor", 1)).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod update_status {
    use super::*;

    #[tokio::test]
    async fn resolving_stamps_resolved_at_once() {
        let app = TestApp::spawn().await;
        let id = app.create_worker_complaint(&[]).await;
        let path = routes::complaint_status("worker", id);

        let res = app
            .patch(&path, &json!({"status": "Resolved", "resolution": "Reset the lift"}))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "Resolved");
        assert_eq!(res.body["resolution"], "Reset the lift");
        let resolved_at = res.body["resolved_at"].clone();
        assert!(resolved_at.is_string());

        let res = app.patch(&path, &json!({"status": "InProgress"})).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "InProgress");
        assert_eq!(res.body["resolved_at"], resolved_at);
        assert_eq!(res.body["resolution"], "Reset the lift");
    }

    #[tokio::test]
    async fn resolution_without_resolving_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_worker_complaint(&[]).await;

        let res = app
            .patch(
                &routes::complaint_status("worker", id),
                &json!({"status": "Closed", "resolution": "n/a"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_status_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let id = app.create_worker_complaint(&[]).await;

        let res = app
            .patch(&routes::complaint_status("worker", id), &json!({"status": "Done"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_complaint_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(&routes::complaint_status("customer", 99), &json!({"status": "Closed"}))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod delete_complaint {
    use super::*;

    #[tokio::test]
    async fn deletes_complaint_and_objects() {
        let app = TestApp::spawn().await;
        let id = app
            .create_worker_complaint(&[("a.jpg", b"A"), ("b.jpg", b"B")])
            .await;

        let res = app.delete(&routes::complaint("worker", id)).await;

        assert_eq!(res.status, 204);
        assert!(app.store.is_empty());
        let res = app.get(&routes::complaint("worker", id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn missing_complaint_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::complaint("worker", 12)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn work_order_blocks_deletion() {
        let app = TestApp::spawn().await;
        let id = app.create_customer_complaint(&[("a.jpg", b"A")]).await;
        app.memory_repo()
            .add_work_order(ComplaintKind::Customer, id);

        let res = app.delete(&routes::complaint("customer", id)).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
        assert!(res.body["message"].as_str().unwrap().contains("work order"));
        assert_eq!(app.store.len(), 1);
        assert!(app.store.delete_calls().is_empty());
        assert_eq!(app.get(&routes::complaint("customer", id)).await.status, 200);
    }

    #[tokio::test]
    async fn remote_delete_failure_still_deletes_rows() {
        let app = TestApp::spawn().await;
        let id = app.create_customer_complaint(&[("a.jpg", b"A")]).await;
        app.store.fail_all_deletes();

        let res = app.delete(&routes::complaint("customer", id)).await;

        assert_eq!(res.status, 204);
        assert_eq!(app.get(&routes::complaint("customer", id)).await.status, 404);
        assert_eq!(app.store.len(), 1);
    }
}

#[tokio::test]
async fn openapi_document_lists_complaint_routes() {
    let app = TestApp::spawn().await;

    let res = app.get("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/v1/complaints/worker"));
    assert!(paths.contains_key("/api/v1/complaints/{kind}/{id}"));
    assert!(paths.contains_key("/api/v1/complaints/{kind}/{id}/status"));
}
