use crate::dto::application_dto::{PageQuery, Paginated, PortalSubmitApplicationRequest};
use crate::dto::workforce_dto::PortalCreateWorkerRequest;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::services::application_service::{ApplicationFilter, SubmitApplication};
use crate::services::worker_service::NewWorker;
use crate::utils::validation::validate;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

/// Everything under the portal is scoped to the contractor on the token.
fn own_contractor_id(claims: &Claims) -> Result<String> {
    claims
        .contractor_id
        .clone()
        .ok_or_else(|| Error::Forbidden("Account is not linked to a contractor".to_string()))
}

pub async fn submit_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PortalSubmitApplicationRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let contractor_id = own_contractor_id(&claims)?;
    let application = state
        .application_service
        .submit(
            SubmitApplication {
                contractor_id,
                worker_id: payload.worker_id,
                job_position_id: payload.job_position_id,
                notes: payload.notes,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn list_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let contractor_id = own_contractor_id(&claims)?;
    let filter = ApplicationFilter {
        contractor_id: Some(contractor_id),
        status: None,
        search: None,
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

pub async fn list_workers(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let contractor_id = own_contractor_id(&claims)?;
    Ok(Json(state.worker_service.list(Some(&contractor_id)).await))
}

pub async fn create_worker(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PortalCreateWorkerRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let contractor_id = own_contractor_id(&claims)?;
    let worker = state
        .worker_service
        .create(
            NewWorker {
                contractor_id,
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

pub async fn list_certificates(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let contractor_id = own_contractor_id(&claims)?;
    Ok(Json(
        state.certificate_service.list(Some(&contractor_id)).await,
    ))
}
