use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use sbtc_backend::models::user::Role;
use sbtc_backend::services::user_service::NewUser;

fn temp_path(tag: &str) -> String {
    std::env::temp_dir()
        .join(format!("sbtc-{}-{}", tag, uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

fn router(app_state: sbtc_backend::AppState) -> Router {
    let public_api = Router::new()
        .route("/api/auth/login", post(sbtc_backend::routes::auth_routes::login))
        .route(
            "/api/public/certificates/verify/:cert_number",
            get(sbtc_backend::routes::certificate_routes::verify_certificate),
        );

    let admin_api = Router::new()
        .route(
            "/api/contractors",
            post(sbtc_backend::routes::contractor_routes::create_contractor),
        )
        .route(
            "/api/workers",
            post(sbtc_backend::routes::worker_routes::create_worker),
        )
        .route(
            "/api/job-positions",
            post(sbtc_backend::routes::job_position_routes::create_job_position),
        )
        .route(
            "/api/applications",
            get(sbtc_backend::routes::application_routes::list_applications)
                .post(sbtc_backend::routes::application_routes::create_application),
        )
        .route(
            "/api/applications/:id",
            get(sbtc_backend::routes::application_routes::get_application)
                .delete(sbtc_backend::routes::application_routes::delete_application),
        )
        .route(
            "/api/applications/:id/actions",
            post(sbtc_backend::routes::application_routes::apply_workflow_action),
        )
        .route(
            "/api/interviews",
            get(sbtc_backend::routes::interview_routes::list_interviews)
                .post(sbtc_backend::routes::interview_routes::schedule_interview),
        )
        .route(
            "/api/interviews/:id/complete",
            post(sbtc_backend::routes::interview_routes::complete_interview),
        )
        .route(
            "/api/certificates",
            get(sbtc_backend::routes::certificate_routes::list_certificates),
        )
        .route(
            "/api/reviews",
            get(sbtc_backend::routes::application_routes::list_reviews),
        )
        .route(
            "/api/dashboard/stats",
            get(sbtc_backend::routes::application_routes::dashboard_stats),
        )
        .route(
            "/api/audit-log",
            get(sbtc_backend::routes::audit_routes::list_audit_log),
        )
        .layer(from_fn(sbtc_backend::middleware::auth::require_admin));

    public_api.merge(admin_api).with_state(app_state)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}

#[tokio::test]
async fn certification_workflow_end_to_end() {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("DATA_DIR", temp_path("workflow-data"));
    env::set_var("UPLOADS_DIR", temp_path("workflow-uploads"));
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
    let interviewer = app_state
        .user_service
        .create(
            NewUser {
                name: "Interviewer One".into(),
                email: "interviewer@sbtc.example".into(),
                password: "interview-pw-1".into(),
                role: Role::Admin,
                contractor_id: None,
                max_interviews: Some(2),
            },
            &root.id,
        )
        .await
        .expect("interviewer");

    let app = router(app_state.clone());

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "root@sbtc.example", "password": "super-secret-pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let auth = format!("Bearer {}", body["token"].as_str().expect("token"));

    // admin surface is closed to anonymous callers and to contractor tokens
    let (status, _) = send_json(&app, "GET", "/api/applications", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send_json(
        &app,
        "GET",
        "/api/applications",
        Some("Bearer not-a-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, contractor) = send_json(
        &app,
        "POST",
        "/api/contractors",
        Some(&auth),
        Some(json!({
            "company_name": "PT Maju Teknik",
            "field": "Mechanical",
            "email": "office@majuteknik.example",
            "contact_person": "Budi"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let contractor_id = contractor["id"].as_str().expect("contractor id").to_string();

    let portal_user = app_state
        .user_service
        .create(
            NewUser {
                name: "Portal User".into(),
                email: "portal@majuteknik.example".into(),
                password: "portal-pw-123".into(),
                role: Role::Contractor,
                contractor_id: Some(contractor_id.clone()),
                max_interviews: None,
            },
            &root.id,
        )
        .await
        .expect("portal user");
    let portal_auth = format!(
        "Bearer {}",
        sbtc_backend::utils::token::issue_token(&portal_user).expect("portal token")
    );
    let (status, _) = send_json(&app, "GET", "/api/applications", Some(&portal_auth), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, worker) = send_json(
        &app,
        "POST",
        "/api/workers",
        Some(&auth),
        Some(json!({
            "contractor_id": contractor_id,
            "name": "Andi Saputra",
            "national_id": "3174091201900001",
            "position": "Welder"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let worker_id = worker["id"].as_str().expect("worker id").to_string();

    let (status, position) = send_json(
        &app,
        "POST",
        "/api/job-positions",
        Some(&auth),
        Some(json!({"title": "Welder", "risk_level": "High"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, application) = send_json(
        &app,
        "POST",
        "/api/applications",
        Some(&auth),
        Some(json!({
            "contractor_id": contractor_id,
            "worker_id": worker_id,
            "job_position_id": position["id"],
            "notes": "Batch August"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let app_id = application["id"].as_str().expect("application id").to_string();
    assert_eq!(application["status"], "Diajukan");
    assert_eq!(application["status_history"].as_array().unwrap().len(), 1);

    // approve: Diajukan -> Disetujui, one more history entry
    let actions_uri = format!("/api/applications/{}/actions", app_id);
    let (status, approved) = send_json(
        &app,
        "POST",
        &actions_uri,
        Some(&auth),
        Some(json!({"action": "approve", "notes": "documents complete"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "Disetujui");
    assert_eq!(approved["status_history"].as_array().unwrap().len(), 2);

    // a second approve is rejected by the transition table
    let (status, _) = send_json(
        &app,
        "POST",
        &actions_uri,
        Some(&auth),
        Some(json!({"action": "approve"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // approve recorded one review
    let (status, reviews) = send_json(
        &app,
        "GET",
        &format!("/api/reviews?application_id={}", app_id),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 1);

    let (status, scheduled) = send_json(
        &app,
        "POST",
        &actions_uri,
        Some(&auth),
        Some(json!({"action": "schedule"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scheduled["status"], "Menunggu Interview");
    assert_eq!(scheduled["status_history"].as_array().unwrap().len(), 3);

    // book and pass both interview tracks
    let slot = (chrono::Utc::now() + chrono::Duration::days(1)).to_rfc3339();
    let (status, hsse) = send_json(
        &app,
        "POST",
        "/api/interviews",
        Some(&auth),
        Some(json!({
            "application_id": app_id,
            "interview_type": "HSSE",
            "interviewer_id": interviewer.id,
            "scheduled_date": slot
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let hsse_id = hsse["id"].as_str().expect("interview id").to_string();

    let (status, app_after) =
        send_json(&app, "GET", &format!("/api/applications/{}", app_id), Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app_after["status"], "Interview Terjadwal");

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/interviews/{}/complete", hsse_id),
        Some(&auth),
        Some(json!({"outcome": "pass", "score": 88})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, app_after) =
        send_json(&app, "GET", &format!("/api/applications/{}", app_id), Some(&auth), None).await;
    assert_eq!(app_after["status"], "Interview Selesai");

    let (status, engineering) = send_json(
        &app,
        "POST",
        "/api/interviews",
        Some(&auth),
        Some(json!({
            "application_id": app_id,
            "interview_type": "ENGINEERING",
            "interviewer_id": interviewer.id,
            "scheduled_date": slot
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let engineering_id = engineering["id"].as_str().expect("interview id").to_string();

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/interviews/{}/complete", engineering_id),
        Some(&auth),
        Some(json!({"outcome": "pass", "score": 91, "recommendation": "ready for site work"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, final_app) =
        send_json(&app, "GET", &format!("/api/applications/{}", app_id), Some(&auth), None).await;
    assert_eq!(final_app["status"], "Sertifikat Terbit");
    let history = final_app["status_history"].as_array().unwrap();
    assert_eq!(history.len(), 7);
    assert_eq!(history.last().unwrap()["status"], final_app["status"]);

    // exactly one certificate, numbered for this year, valid for one year
    let (status, certificates) =
        send_json(&app, "GET", "/api/certificates", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    let certificates = certificates.as_array().unwrap();
    assert_eq!(certificates.len(), 1);
    let certificate = &certificates[0];
    let cert_number = certificate["cert_number"].as_str().expect("cert number");
    assert!(cert_number.starts_with("SBTC-"));
    assert!(cert_number.ends_with("-0001"));
    let issued: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(certificate["issue_date"].clone()).expect("issue date");
    let expiry: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(certificate["expiry_date"].clone()).expect("expiry date");
    assert_eq!(
        expiry,
        issued
            .checked_add_months(chrono::Months::new(12))
            .expect("one year out")
    );

    // anyone can verify the printed number
    let (status, verification) = send_json(
        &app,
        "GET",
        &format!("/api/public/certificates/verify/{}", cert_number),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verification["worker_name"], "Andi Saputra");
    assert_eq!(verification["status"], "Active");

    let (status, _) = send_json(
        &app,
        "GET",
        "/api/public/certificates/verify/SBTC-1999-9999",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // delete is blocked while interviews and the certificate reference it
    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/applications/{}", app_id),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, stats) =
        send_json(&app, "GET", "/api/dashboard/stats", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["applications_total"], 1);
    assert_eq!(stats["applications_by_status"]["Sertifikat Terbit"], 1);
    assert_eq!(stats["certificates_active"], 1);

    // the whole story is on the audit log
    let (status, audit) = send_json(&app, "GET", "/api/audit-log", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(audit["total"].as_u64().unwrap() >= 8);
}
