use crate::dto::application_dto::{
    ApplicationQuery, Paginated, SubmitApplicationRequest, WorkflowActionRequest,
};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::application::{Application, ApplicationStatus, Reviewers};
use crate::services::application_service::{ApplicationFilter, SubmitApplication};
use crate::utils::validation::validate;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationQuery>,
) -> Result<impl IntoResponse> {
    let status = query
        .status
        .as_deref()
        .map(|raw| {
            ApplicationStatus::from_label(raw)
                .ok_or_else(|| Error::BadRequest(format!("Unknown status '{}'", raw)))
        })
        .transpose()?;
    let filter = ApplicationFilter {
        contractor_id: query.contractor_id,
        status,
        search: query.search,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };
    let (items, total) = state.application_service.list(&filter).await;
    Ok(Json(Paginated {
        items,
        total,
        page: filter.page,
        per_page: filter.per_page,
    }))
}

pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Application>> {
    Ok(Json(state.application_service.get(&id).await?))
}

pub async fn create_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitApplicationRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let application = state
        .application_service
        .submit(
            SubmitApplication {
                contractor_id: payload.contractor_id,
                worker_id: payload.worker_id,
                job_position_id: payload.job_position_id,
                notes: payload.notes,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn delete_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.application_service.delete(&id, &claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The single workflow entry point: the action arrives as a typed value in
/// the body, never inferred from anything presentational.
pub async fn apply_workflow_action(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<WorkflowActionRequest>,
) -> Result<Json<Application>> {
    let reviewers = payload.reviewers.map(|r| Reviewers {
        hsse: r.hsse,
        engineering: r.engineering,
    });
    let application = state
        .workflow_service
        .apply_action(&id, payload.action, &claims.sub, payload.notes, reviewers)
        .await?;
    Ok(Json(application))
}

pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.application_service.dashboard_stats().await))
}

#[derive(serde::Deserialize)]
pub struct ReviewQuery {
    pub application_id: Option<String>,
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<impl IntoResponse> {
    Ok(Json(
        state
            .application_service
            .reviews(query.application_id.as_deref())
            .await,
    ))
}
