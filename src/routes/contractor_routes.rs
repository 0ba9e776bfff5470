use crate::dto::workforce_dto::{CreateContractorRequest, UpdateContractorRequest};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::contractor::Contractor;
use crate::services::contractor_service::{ContractorUpdate, NewContractor};
use crate::utils::validation::validate;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

pub async fn list_contractors(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.contractor_service.list().await))
}

pub async fn get_contractor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contractor>> {
    Ok(Json(state.contractor_service.get(&id).await?))
}

pub async fn create_contractor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateContractorRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let contractor = state
        .contractor_service
        .create(
            NewContractor {
                company_name: payload.company_name,
                field: payload.field,
                address: payload.address,
                contact_person: payload.contact_person,
                email: payload.email,
                phone: payload.phone,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(contractor)))
}

pub async fn update_contractor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateContractorRequest>,
) -> Result<Json<Contractor>> {
    validate(&payload)?;
    let contractor = state
        .contractor_service
        .update(
            &id,
            ContractorUpdate {
                company_name: payload.company_name,
                field: payload.field,
                address: payload.address,
                contact_person: payload.contact_person,
                email: payload.email,
                phone: payload.phone,
            },
            &claims.sub,
        )
        .await?;
    Ok(Json(contractor))
}

pub async fn delete_contractor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.contractor_service.delete(&id, &claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}
