use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::services::user_service::{NewUser, UserUpdate};
use crate::utils::validation::validate;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users: Vec<UserResponse> = state
        .user_service
        .list()
        .await
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    Ok(Json(state.user_service.get(&id).await?.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let user = state
        .user_service
        .create(
            NewUser {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                role: payload.role,
                contractor_id: payload.contractor_id,
                max_interviews: payload.max_interviews,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    validate(&payload)?;
    let user = state
        .user_service
        .update(
            &id,
            UserUpdate {
                name: payload.name,
                password: payload.password,
                max_interviews: payload.max_interviews,
                is_active: payload.is_active,
            },
            &claims.sub,
        )
        .await?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.user_service.delete(&id, &claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}
