//! Defines routes for the dashboard JSON API.
//!
//! ## Structure
//! - **Auth**: `POST /api/auth/login`, `GET /api/auth/me`
//! - **Drives**: `GET|POST /api/drives`, `GET /api/drives/{id}`,
//!   `PATCH /api/drives/{id}/toggle`, `GET /api/drives/{id}/files`
//! - **Files**
//!   - `GET    /api/files`: active listing (optional `sort`, `direction`)
//!   - `POST   /api/files`: create
//!   - `GET    /api/files/deleted`: trash listing
//!   - `GET    /api/files/search?q=`: search active files
//!   - `GET    /api/files/{id}`: fetch (trashed files included)
//!   - `DELETE /api/files/{id}`: move to trash
//!   - `PATCH  /api/files/{id}/restore`: restore from trash
//!   - `DELETE /api/files/{id}/permanent`: purge from trash
//!   - `DELETE /api/files/trash/empty`, `POST /api/files/trash/restore|delete`: bulk trash
//! - **Uploads**: `GET|POST /api/uploads`, `GET /api/uploads/summary`
//! - **Stats**: `POST /api/stats`, `POST /api/visit`, `POST /api/preregister`
//!
//! Static segments (`deleted`, `search`, `trash`) win over `{id}`.

use crate::{
    handlers::{
        auth_handlers::{login, me},
        drive_handlers::{create_drive, get_drive, list_drives, toggle_drive},
        file_handlers::{
            create_file, empty_trash, get_file, list_deleted_files, list_drive_files, list_files,
            purge_file, purge_many, restore_file, restore_many, search_files, trash_file,
        },
        health_handlers::{healthz, readyz},
        stats_handlers::{get_stats, preregister, record_visit},
        upload_handlers::{create_upload, list_uploads, upload_summary},
    },
    services::AppState,
};
use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

/// Build and return the router for the whole API.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // auth
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        // drives
        .route("/api/drives", get(list_drives).post(create_drive))
        .route("/api/drives/{id}", get(get_drive))
        .route("/api/drives/{id}/toggle", patch(toggle_drive))
        .route("/api/drives/{id}/files", get(list_drive_files))
        // files
        .route("/api/files", get(list_files).post(create_file))
        .route("/api/files/deleted", get(list_deleted_files))
        .route("/api/files/search", get(search_files))
        .route("/api/files/trash/empty", delete(empty_trash))
        .route("/api/files/trash/restore", post(restore_many))
        .route("/api/files/trash/delete", post(purge_many))
        .route("/api/files/{id}", get(get_file).delete(trash_file))
        .route("/api/files/{id}/restore", patch(restore_file))
        .route("/api/files/{id}/permanent", delete(purge_file))
        // uploads
        .route("/api/uploads", get(list_uploads).post(create_upload))
        .route("/api/uploads/summary", get(upload_summary))
        // stats
        .route("/api/stats", post(get_stats).get(get_stats))
        .route("/api/visit", post(record_visit))
        .route("/api/preregister", post(preregister))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        seed,
        services::{
            auth_service::AuthService,
            entity_store::EntityStore,
            export_service::{ExportError, ExportRow, LogExporter, RegistrationExporter},
            stats_service::StatsService,
        },
    };
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingExporter {
        rows: Mutex<Vec<ExportRow>>,
    }

    #[async_trait]
    impl RegistrationExporter for RecordingExporter {
        async fn export(&self, row: &ExportRow) -> Result<(), ExportError> {
            self.rows.lock().unwrap().push(row.clone());
            Ok(())
        }
    }

    struct FailingExporter;

    #[async_trait]
    impl RegistrationExporter for FailingExporter {
        async fn export(&self, _row: &ExportRow) -> Result<(), ExportError> {
            Err(ExportError::Rejected(502))
        }
    }

    struct TestApp {
        app: Router,
        state: AppState,
        _dir: TempDir,
    }

    fn test_app_with(exporter: Arc<dyn RegistrationExporter>) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(EntityStore::new());
        let stats = StatsService::new(dir.path().join("stats.json"));
        let auth = AuthService::new(store.clone(), "test-secret".into(), 3600);
        let state = AppState::new(store, stats, auth, exporter);
        TestApp {
            app: routes().with_state(state.clone()),
            state,
            _dir: dir,
        }
    }

    fn test_app() -> TestApp {
        test_app_with(Arc::new(LogExporter))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    fn file_body(name: &str) -> Value {
        json!({
            "driveId": 1,
            "userId": 1,
            "name": name,
            "path": "/Projects/",
            "type": "pdf",
            "size": 2457,
            "lastModified": "2023-05-15"
        })
    }

    fn listed_ids(value: &Value) -> Vec<u64> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["id"].as_u64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn created_drive_is_listed_with_usage() {
        let t = test_app();
        let (status, drive) = send(
            &t.app,
            "POST",
            "/api/drives",
            Some(json!({
                "userId": 1,
                "name": "Google Drive",
                "type": "google",
                "email": "demo@gmail.com",
                "totalSpace": 15360,
                "usedSpace": 7372
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(drive["isConnected"], json!(true));

        let (status, drives) = send(&t.app, "GET", "/api/drives", None).await;
        assert_eq!(status, StatusCode::OK);
        let drives = drives.as_array().unwrap();
        assert_eq!(drives.len(), 1);
        let ratio = drives[0]["usedSpace"].as_f64().unwrap() / drives[0]["totalSpace"].as_f64().unwrap();
        assert!((ratio - 0.48).abs() < 0.01);
    }

    #[tokio::test]
    async fn drive_validation_and_toggle() {
        let t = test_app();
        let (status, _) = send(
            &t.app,
            "POST",
            "/api/drives",
            Some(json!({
                "userId": 1, "name": "Dropbox", "type": "dropbox", "email": "d@e.com",
                "totalSpace": 100, "usedSpace": 101
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &t.app,
            "POST",
            "/api/drives",
            Some(json!({
                "userId": 1, "name": "Box", "type": "box", "email": "d@e.com",
                "totalSpace": 100, "usedSpace": 1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&t.app, "GET", "/api/drives/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(
            &t.app,
            "PATCH",
            "/api/drives/1/toggle",
            Some(json!({ "isConnected": false })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        seed::demo_content(&t.state.store).await.unwrap();
        let (status, _) = send(
            &t.app,
            "PATCH",
            "/api/drives/1/toggle",
            Some(json!({ "isConnected": "no" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, drive) = send(
            &t.app,
            "PATCH",
            "/api/drives/1/toggle",
            Some(json!({ "isConnected": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(drive["isConnected"], json!(false));

        let (_, files) = send(&t.app, "GET", "/api/drives/1/files", None).await;
        assert_eq!(files.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn trash_and_restore_round_trip() {
        let t = test_app();
        let (status, file) = send(&t.app, "POST", "/api/files", Some(file_body("A.pdf"))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = file["id"].as_u64().unwrap();
        assert_eq!(file["deletedAt"], Value::Null);

        let (status, trashed) = send(&t.app, "DELETE", &format!("/api/files/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(trashed["deletedAt"].is_string());

        let (_, active) = send(&t.app, "GET", "/api/files", None).await;
        assert!(!listed_ids(&active).contains(&id));
        let (_, deleted) = send(&t.app, "GET", "/api/files/deleted", None).await;
        assert_eq!(listed_ids(&deleted), vec![id]);

        let (status, restored) =
            send(&t.app, "PATCH", &format!("/api/files/{id}/restore"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(restored, file);

        let (_, active) = send(&t.app, "GET", "/api/files", None).await;
        assert_eq!(listed_ids(&active), vec![id]);
        let (_, deleted) = send(&t.app, "GET", "/api/files/deleted", None).await;
        assert!(listed_ids(&deleted).is_empty());
    }

    #[tokio::test]
    async fn purge_requires_trash_and_is_final() {
        let t = test_app();
        let (_, file) = send(&t.app, "POST", "/api/files", Some(file_body("A.pdf"))).await;
        let id = file["id"].as_u64().unwrap();

        let (status, _) = send(&t.app, "DELETE", &format!("/api/files/{id}/permanent"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&t.app, "GET", &format!("/api/files/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        send(&t.app, "DELETE", &format!("/api/files/{id}"), None).await;
        let (status, body) =
            send(&t.app, "DELETE", &format!("/api/files/{id}/permanent"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, body) = send(&t.app, "GET", &format!("/api/files/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], json!(404));
        let (status, _) = send(&t.app, "PATCH", &format!("/api/files/{id}/restore"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_requires_term() {
        let t = test_app();
        send(&t.app, "POST", "/api/files", Some(file_body("Project Proposal.pdf"))).await;
        send(&t.app, "POST", "/api/files", Some(file_body("Budget.xlsx"))).await;

        let (status, _) = send(&t.app, "GET", "/api/files/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, hits) = send(&t.app, "GET", "/api/files/search?q=PROPOSAL", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed_ids(&hits), vec![1]);

        let (status, hits) = send(&t.app, "GET", "/api/files/search?q=zzz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hits, json!([]));
    }

    #[tokio::test]
    async fn listing_accepts_sort_options() {
        let t = test_app();
        send(&t.app, "POST", "/api/files", Some(file_body("b.pdf"))).await;
        send(&t.app, "POST", "/api/files", Some(file_body("a.pdf"))).await;

        let (_, files) = send(&t.app, "GET", "/api/files?sort=name", None).await;
        assert_eq!(listed_ids(&files), vec![2, 1]);
        let (_, files) = send(&t.app, "GET", "/api/files?sort=name&direction=desc", None).await;
        assert_eq!(listed_ids(&files), vec![1, 2]);
        let (status, _) = send(&t.app, "GET", "/api/files?sort=colour", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bulk_trash_endpoints_report_each_id() {
        let t = test_app();
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            send(&t.app, "POST", "/api/files", Some(file_body(name))).await;
        }
        send(&t.app, "DELETE", "/api/files/1", None).await;
        send(&t.app, "DELETE", "/api/files/2", None).await;

        let (status, body) = send(
            &t.app,
            "POST",
            "/api/files/trash/restore",
            Some(json!({ "fileIds": [1, 3, 99] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["results"][0]["id"], json!(1));
        assert_eq!(body["results"][1], Value::Null);
        assert_eq!(body["results"][2], Value::Null);

        let (_, body) = send(
            &t.app,
            "POST",
            "/api/files/trash/delete",
            Some(json!({ "fileIds": [2, 3] })),
        )
        .await;
        assert_eq!(body["results"], json!([true, false]));

        let (status, _) = send(
            &t.app,
            "POST",
            "/api/files/trash/delete",
            Some(json!({ "fileIds": "2" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(&t.app, "DELETE", "/api/files/3", None).await;
        let (_, body) = send(&t.app, "DELETE", "/api/files/trash/empty", None).await;
        assert_eq!(body, json!({ "success": true, "removed": 1 }));
        let (_, active) = send(&t.app, "GET", "/api/files", None).await;
        assert_eq!(listed_ids(&active), vec![1]);
    }

    #[rstest]
    #[case::file_id("GET", "/api/files/abc")]
    #[case::drive_id("GET", "/api/drives/abc")]
    #[case::drive_files("GET", "/api/drives/-1/files")]
    #[case::restore_id("PATCH", "/api/files/1.5/restore")]
    #[case::unknown_sort("GET", "/api/files?sort=bogus")]
    #[case::unknown_direction("GET", "/api/files?direction=sideways")]
    #[tokio::test]
    async fn malformed_path_or_query_is_bad_request(#[case] method: &str, #[case] uri: &str) {
        let t = test_app();
        let (status, body) = send(&t.app, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], json!(400));
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    }

    #[tokio::test]
    async fn login_issues_token_for_demo_user() {
        let t = test_app();
        seed::demo_user(&t.state.store).await.unwrap();

        let (status, body) = send(
            &t.app,
            "POST",
            "/api/auth/login",
            Some(json!({ "email": seed::DEMO_EMAIL, "password": seed::DEMO_PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some_and(|token| !token.is_empty()));

        let (status, _) = send(
            &t.app,
            "POST",
            "/api/auth/login",
            Some(json!({ "email": seed::DEMO_EMAIL, "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &t.app,
            "POST",
            "/api/auth/login",
            Some(json!({ "email": seed::DEMO_EMAIL })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bearer_token_resolves_to_profile() {
        let t = test_app();
        seed::demo_user(&t.state.store).await.unwrap();
        let token = t
            .state
            .auth
            .login(seed::DEMO_EMAIL, seed::DEMO_PASSWORD)
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/api/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = t.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let profile: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(profile["email"], json!(seed::DEMO_EMAIL));
        assert!(profile.get("passwordHash").is_none());
        assert!(profile.get("password_hash").is_none());

        let (status, body) = send(&t.app, "GET", "/api/auth/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], json!(401));
    }

    #[tokio::test]
    async fn uploads_are_recorded_and_summarized() {
        let t = test_app();
        let (status, upload) = send(
            &t.app,
            "POST",
            "/api/uploads",
            Some(json!({
                "userId": 1, "driveId": 2, "fileId": 1, "fileName": "notes.txt",
                "fileSize": 1024, "uploadTime": 1.8, "fileType": "txt"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(upload["uploadDate"].is_string());

        let (_, uploads) = send(&t.app, "GET", "/api/uploads", None).await;
        assert_eq!(uploads.as_array().unwrap().len(), 1);
        let (_, summary) = send(&t.app, "GET", "/api/uploads/summary", None).await;
        assert_eq!(summary[0]["driveId"], json!(2));
        assert_eq!(summary[0]["totalSize"], json!(1024));
    }

    #[tokio::test]
    async fn oversized_uploads_do_not_break_summary() {
        let t = test_app();
        for _ in 0..2 {
            let (status, _) = send(
                &t.app,
                "POST",
                "/api/uploads",
                Some(json!({
                    "userId": 1, "driveId": 1, "fileId": 1, "fileName": "huge.bin",
                    "fileSize": u64::MAX, "uploadTime": 2.0, "fileType": "bin"
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, summary) = send(&t.app, "GET", "/api/uploads/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary[0]["uploads"], json!(2));
        assert_eq!(summary[0]["totalSize"], json!(u64::MAX));
    }

    #[tokio::test]
    async fn visits_are_counted() {
        let t = test_app();
        let (_, before) = send(&t.app, "POST", "/api/stats", None).await;

        let (status, body) = send(&t.app, "POST", "/api/visit", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "visits": 1 }));
        send(&t.app, "POST", "/api/visit", None).await;

        let (_, after) = send(&t.app, "POST", "/api/stats", None).await;
        assert_eq!(after["visits"], json!(2));
        assert_eq!(after["registrations"], before["registrations"]);
        assert!(after["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn preregistration_is_exported_then_counted() {
        let exporter = Arc::new(RecordingExporter::default());
        let t = test_app_with(exporter.clone());

        let (status, _) = send(
            &t.app,
            "POST",
            "/api/preregister",
            Some(json!({ "email": "not-an-email" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &t.app,
            "POST",
            "/api/preregister",
            Some(json!({
                "email": "someone@example.com",
                "fullName": "Some One",
                "overallRating": 1,
                "feedback": {
                    "designAndUX": { "rating": 5, "feedback": "great" },
                    "features": { "rating": 5, "feedback": "" }
                }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "registrations": 1, "feedbacks": 1, "overallRating": 4.5 })
        );

        let rows = exporter.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["designAndUX_feedback"], json!("great"));
    }

    #[tokio::test]
    async fn failed_export_leaves_stats_untouched() {
        let t = test_app_with(Arc::new(FailingExporter));

        let (status, _) = send(
            &t.app,
            "POST",
            "/api/preregister",
            Some(json!({ "email": "someone@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let stats = t.state.stats.get_stats().await.unwrap();
        assert_eq!(stats.registrations, 0);
    }

    #[tokio::test]
    async fn health_probes_pass() {
        let t = test_app();
        let (status, _) = send(&t.app, "GET", "/healthz", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&t.app, "GET", "/readyz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
    }
}
