use crate::dto::certificate_dto::{CertificateQuery, CertificateVerification};
use crate::error::Result;
use crate::models::certificate::Certificate;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

pub async fn list_certificates(
    State(state): State<AppState>,
    Query(query): Query<CertificateQuery>,
) -> Result<impl IntoResponse> {
    let certificates = state
        .certificate_service
        .list(query.contractor_id.as_deref())
        .await;
    Ok(Json(certificates))
}

pub async fn get_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Certificate>> {
    Ok(Json(state.certificate_service.get(&id).await?))
}

/// Public validity lookup, e.g. for gate guards checking a badge number.
#[utoipa::path(
    get,
    path = "/api/public/certificates/verify/{cert_number}",
    params(("cert_number" = String, Path, description = "Printed certificate number")),
    responses(
        (status = 200, description = "Certificate found", body = CertificateVerification),
        (status = 404, description = "Unknown certificate number")
    )
)]
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(cert_number): Path<String>,
) -> Result<Json<CertificateVerification>> {
    Ok(Json(state.certificate_service.verify(&cert_number).await?))
}
