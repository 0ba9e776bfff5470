use crate::dto::workforce_dto::{CreateWorkerRequest, UpdateWorkerRequest, WorkerQuery};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::worker::Worker;
use crate::services::worker_service::{NewWorker, WorkerUpdate};
use crate::utils::validation::validate;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

pub async fn list_workers(
    State(state): State<AppState>,
    Query(query): Query<WorkerQuery>,
) -> Result<impl IntoResponse> {
    Ok(Json(
        state.worker_service.list(query.contractor_id.as_deref()).await,
    ))
}

pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Worker>> {
    Ok(Json(state.worker_service.get(&id).await?))
}

pub async fn create_worker(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateWorkerRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let worker = state
        .worker_service
        .create(
            NewWorker {
                contractor_id: payload.contractor_id,
                name: payload.name,
                national_id: payload.national_id,
                date_of_birth: payload.date_of_birth,
                position: payload.position,
                phone: payload.phone,
                mcu_status: payload.mcu_status,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(worker)))
}

pub async fn update_worker(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateWorkerRequest>,
) -> Result<Json<Worker>> {
    let worker = state
        .worker_service
        .update(
            &id,
            WorkerUpdate {
                name: payload.name,
                date_of_birth: payload.date_of_birth,
                position: payload.position,
                phone: payload.phone,
                mcu_status: payload.mcu_status,
            },
            &claims.sub,
        )
        .await?;
    Ok(Json(worker))
}

pub async fn delete_worker(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.worker_service.delete(&id, &claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}
