use crate::dto::workforce_dto::CreateJobPositionRequest;
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::job_position::JobPosition;
use crate::services::job_position_service::NewJobPosition;
use crate::utils::validation::validate;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

pub async fn list_job_positions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.job_position_service.list().await))
}

pub async fn get_job_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobPosition>> {
    Ok(Json(state.job_position_service.get(&id).await?))
}

pub async fn create_job_position(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateJobPositionRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let position = state
        .job_position_service
        .create(
            NewJobPosition {
                title: payload.title,
                department: payload.department,
                risk_level: payload.risk_level,
                requirements: payload.requirements,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(position)))
}

pub async fn delete_job_position(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.job_position_service.delete(&id, &claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}
