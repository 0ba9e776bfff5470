use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use sbtc_backend::{
    config::{get_config, init_config},
    middleware::auth,
    registry::Db,
    routes,
    store::json_store::JsonStore,
    AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let store = JsonStore::open(&config.data_dir)?;
    let db = Db::open(store)?;
    let app_state = AppState::new(db);

    if let (Some(email), Some(password)) = (
        config.bootstrap_admin_email.as_deref(),
        config.bootstrap_admin_password.as_deref(),
    ) {
        app_state
            .user_service
            .bootstrap_superadmin(email, password)
            .await?;
    }

    {
        let certificate_service = app_state.certificate_service.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = certificate_service.sweep_expired().await {
                    tracing::error!("Certificate expiry sweep error: {:?}", e);
                }
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        });
    }

    let public_api = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/auth/login", post(routes::auth_routes::login))
        .route(
            "/api/public/certificates/verify/:cert_number",
            get(routes::certificate_routes::verify_certificate),
        );

    let admin_api = Router::new()
        .route(
            "/api/contractors",
            get(routes::contractor_routes::list_contractors)
                .post(routes::contractor_routes::create_contractor),
        )
        .route(
            "/api/contractors/:id",
            get(routes::contractor_routes::get_contractor)
                .patch(routes::contractor_routes::update_contractor)
                .delete(routes::contractor_routes::delete_contractor),
        )
        .route(
            "/api/workers",
            get(routes::worker_routes::list_workers).post(routes::worker_routes::create_worker),
        )
        .route(
            "/api/workers/:id",
            get(routes::worker_routes::get_worker)
                .patch(routes::worker_routes::update_worker)
                .delete(routes::worker_routes::delete_worker),
        )
        .route(
            "/api/job-positions",
            get(routes::job_position_routes::list_job_positions)
                .post(routes::job_position_routes::create_job_position),
        )
        .route(
            "/api/job-positions/:id",
            get(routes::job_position_routes::get_job_position)
                .delete(routes::job_position_routes::delete_job_position),
        )
        .route(
            "/api/applications",
            get(routes::application_routes::list_applications)
                .post(routes::application_routes::create_application),
        )
        .route(
            "/api/applications/:id",
            get(routes::application_routes::get_application)
                .delete(routes::application_routes::delete_application),
        )
        .route(
            "/api/applications/:id/actions",
            post(routes::application_routes::apply_workflow_action),
        )
        .route(
            "/api/interviews",
            get(routes::interview_routes::list_interviews)
                .post(routes::interview_routes::schedule_interview),
        )
        .route(
            "/api/interviews/:id",
            get(routes::interview_routes::get_interview),
        )
        .route(
            "/api/interviews/:id/complete",
            post(routes::interview_routes::complete_interview),
        )
        .route(
            "/api/interviews/:id/reschedule",
            post(routes::interview_routes::reschedule_interview),
        )
        .route(
            "/api/interviews/:id/cancel",
            post(routes::interview_routes::cancel_interview),
        )
        .route(
            "/api/interviewers/:id/quota",
            get(routes::interview_routes::interviewer_quota),
        )
        .route(
            "/api/certificates",
            get(routes::certificate_routes::list_certificates),
        )
        .route(
            "/api/certificates/:id",
            get(routes::certificate_routes::get_certificate),
        )
        .route(
            "/api/reviews",
            get(routes::application_routes::list_reviews),
        )
        .route(
            "/api/dashboard/stats",
            get(routes::application_routes::dashboard_stats),
        )
        .route("/api/audit-log", get(routes::audit_routes::list_audit_log))
        .layer(from_fn(auth::require_admin));

    let superadmin_api = Router::new()
        .route(
            "/api/users",
            get(routes::user_routes::list_users).post(routes::user_routes::create_user),
        )
        .route(
            "/api/users/:id",
            get(routes::user_routes::get_user)
                .patch(routes::user_routes::update_user)
                .delete(routes::user_routes::delete_user),
        )
        .layer(from_fn(auth::require_superadmin));

    let portal_api = Router::new()
        .route(
            "/api/portal/applications",
            get(routes::portal::list_applications).post(routes::portal::submit_application),
        )
        .route(
            "/api/portal/workers",
            get(routes::portal::list_workers).post(routes::portal::create_worker),
        )
        .route(
            "/api/portal/certificates",
            get(routes::portal::list_certificates),
        )
        .layer(from_fn(auth::require_contractor));

    let documents_api = Router::new()
        .route(
            "/api/documents",
            get(routes::document_routes::list_documents)
                .post(routes::document_routes::upload_document),
        )
        .route(
            "/api/documents/:id",
            get(routes::document_routes::get_document)
                .delete(routes::document_routes::delete_document),
        )
        .route(
            "/api/documents/:id/download",
            get(routes::document_routes::download_document),
        )
        .layer(from_fn(auth::require_staff));

    let app = public_api
        .merge(admin_api)
        .merge(superadmin_api)
        .merge(portal_api)
        .merge(documents_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
