use crate::dto::application_dto::{PageQuery, Paginated};
use crate::error::Result;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

pub async fn list_audit_log(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(50);
    let (items, total) = state.audit_service.list(page, per_page).await;
    Ok(Json(Paginated {
        items,
        total,
        page,
        per_page,
    }))
}
