use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::get,
    Router,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use sbtc_backend::services::contractor_service::NewContractor;
use sbtc_backend::services::worker_service::NewWorker;

fn temp_path(tag: &str) -> String {
    std::env::temp_dir()
        .join(format!("sbtc-{}-{}", tag, uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

fn router(app_state: sbtc_backend::AppState) -> Router {
    Router::new()
        .route(
            "/api/documents",
            get(sbtc_backend::routes::document_routes::list_documents)
                .post(sbtc_backend::routes::document_routes::upload_document),
        )
        .route(
            "/api/documents/:id",
            get(sbtc_backend::routes::document_routes::get_document)
                .delete(sbtc_backend::routes::document_routes::delete_document),
        )
        .route(
            "/api/documents/:id/download",
            get(sbtc_backend::routes::document_routes::download_document),
        )
        .layer(from_fn(sbtc_backend::middleware::auth::require_staff))
        .with_state(app_state)
}

const BOUNDARY: &str = "sbtc-test-boundary";

fn multipart_body(personnel_id: &str, file_name: &str, file_bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in [
        ("personnel_id", personnel_id),
        ("document_type", "MCU"),
        ("description", "Annual medical check-up result"),
    ] {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn upload(app: &Router, auth: &str, personnel_id: &str, file_name: &str, bytes: &[u8]) -> (StatusCode, JsonValue) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/documents")
        .header("authorization", auth)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(personnel_id, file_name, bytes)))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&body_bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

#[tokio::test]
async fn document_vault_upload_download_delete() {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("DATA_DIR", temp_path("docs-data"));
    env::set_var("UPLOADS_DIR", temp_path("docs-uploads"));
    env::set_var("JWT_SECRET", "test_secret_key");
    sbtc_backend::config::init_config().expect("init config");

    let store = sbtc_backend::store::json_store::JsonStore::open(
        &sbtc_backend::config::get_config().data_dir,
    )
    .expect("store");
    let db = sbtc_backend::registry::Db::open(store).expect("db");
    let app_state = sbtc_backend::AppState::new(db);

    let root = app_state
        .user_service
        .bootstrap_superadmin("root@sbtc.example", "super-secret-pw")
        .await
        .expect("bootstrap")
        .expect("first user");
    let contractor = app_state
        .contractor_service
        .create(
            NewContractor {
                company_name: "PT Dok Sejahtera".into(),
                field: None,
                address: None,
                contact_person: None,
                email: "office@doksejahtera.example".into(),
                phone: None,
            },
            &root.id,
        )
        .await
        .expect("contractor");
    let worker = app_state
        .worker_service
        .create(
            NewWorker {
                contractor_id: contractor.id.clone(),
                name: "Siti Rahma".into(),
                national_id: "3174091201900201".to_string(),
                date_of_birth: None,
                position: None,
                phone: None,
                mcu_status: None,
            },
            &root.id,
        )
        .await
        .expect("worker");

    let app = router(app_state.clone());
    let auth = format!(
        "Bearer {}",
        sbtc_backend::utils::token::issue_token(&root).expect("token")
    );

    // happy path: a small PDF
    let (status, document) = upload(&app, &auth, &worker.id, "mcu-2026.pdf", b"%PDF-1.4 test body").await;
    assert_eq!(status, StatusCode::CREATED);
    let document_id = document["id"].as_str().expect("document id").to_string();
    assert_eq!(document["personnel_id"], worker.id.as_str());
    assert_eq!(document["file_name"], "mcu-2026.pdf");

    // disallowed extension and spoofed content are both rejected
    let (status, _) = upload(&app, &auth, &worker.id, "tool.exe", b"MZ binary").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = upload(&app, &auth, &worker.id, "fake.pdf", b"plain text").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // unknown worker
    let (status, _) = upload(&app, &auth, "WRK999", "mcu.pdf", b"%PDF-1.4 x").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // listing with filters and search
    let list_uri = format!(
        "/api/documents?personnel_id={}&document_type=MCU&search=mcu",
        worker.id
    );
    let request = Request::builder()
        .method("GET")
        .uri(&list_uri)
        .header("authorization", &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let listing: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["per_page"], 15);

    // download streams the original bytes under the original name
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/documents/{}/download", document_id))
        .header("authorization", &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("mcu-2026.pdf"));
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));

    // delete removes file and record
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/documents/{}", document_id))
        .header("authorization", &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for uri in [
        format!("/api/documents/{}", document_id),
        format!("/api/documents/{}/download", document_id),
    ] {
        let request = Request::builder()
            .method("GET")
            .uri(&uri)
            .header("authorization", &auth)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
