use crate::dto::application_dto::Paginated;
use crate::dto::document_dto::DocumentQuery;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::document::Document;
use crate::services::document_service::{DocumentFilter, NewDocument, DOCUMENTS_PAGE_SIZE};
use crate::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

#[utoipa::path(
    get,
    path = "/api/documents",
    params(DocumentQuery),
    responses((status = 200, description = "Paginated document metadata, 15 per page"))
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Result<impl IntoResponse> {
    let filter = DocumentFilter {
        personnel_id: query.personnel_id,
        document_type: query.document_type,
        search: query.search,
        page: query.page.unwrap_or(1),
    };
    let (items, total) = state.document_service.list(&filter).await;
    Ok(Json(Paginated {
        items,
        total,
        page: filter.page,
        per_page: DOCUMENTS_PAGE_SIZE,
    }))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>> {
    Ok(Json(state.document_service.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/documents",
    responses(
        (status = 201, description = "Document stored", body = Document),
        (status = 400, description = "Missing field, disallowed file type, or file too large")
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut personnel_id = String::new();
    let mut document_type = String::new();
    let mut description = None;
    let mut file_name = None;
    let mut data = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "personnel_id" => personnel_id = field.text().await.unwrap_or_default(),
            "document_type" => document_type = field.text().await.unwrap_or_default(),
            "description" => {
                let text = field.text().await.unwrap_or_default();
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            "file" => {
                file_name = Some(field.file_name().unwrap_or("upload.bin").to_string());
                data = Some(field.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read document upload: {}", e);
                    Error::BadRequest("Failed to read file upload".to_string())
                })?);
            }
            _ => {}
        }
    }

    if personnel_id.is_empty() {
        return Err(Error::BadRequest("personnel_id is required".to_string()));
    }
    if document_type.is_empty() {
        return Err(Error::BadRequest("document_type is required".to_string()));
    }
    let (file_name, data) = match (file_name, data) {
        (Some(name), Some(data)) if !data.is_empty() => (name, data),
        _ => return Err(Error::BadRequest("file is required".to_string())),
    };

    let document = state
        .document_service
        .upload(
            NewDocument {
                personnel_id,
                document_type,
                description,
                file_name,
                data,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let (document, data) = state.document_service.download(&id).await?;
    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name),
        ),
    ];
    Ok((headers, data))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.document_service.delete(&id, &claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}
