use crate::dto::user_dto::{LoginRequest, LoginResponse};
use crate::error::Result;
use crate::utils::{token, validation::validate};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = token::issue_token(&user)?;
    tracing::info!(user = %user.id, "login");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
