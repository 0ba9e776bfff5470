use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
    pub contractor_id: Option<String>,
}

fn unauthorized(reason: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": reason }))).into_response()
}

fn decode_claims(req: &Request) -> Result<Claims, Response> {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err(unauthorized("missing_authorization"));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(unauthorized("bad_authorization"));
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(unauthorized("unsupported_scheme"));
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| unauthorized("invalid_token"))
}

async fn authorize(mut req: Request, next: Next, allowed: &[&str]) -> Response {
    let claims = match decode_claims(&req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    if !allowed.is_empty() {
        let role = claims.role.clone().unwrap_or_default();
        if !allowed.iter().any(|r| r.eq_ignore_ascii_case(&role)) {
            return (StatusCode::FORBIDDEN, Json(json!({"error":"forbidden"}))).into_response();
        }
    }
    req.extensions_mut().insert(claims);
    next.run(req).await
}

/// Any valid token, any role.
pub async fn require_auth(req: Request, next: Next) -> Response {
    authorize(req, next, &[]).await
}

pub async fn require_admin(req: Request, next: Next) -> Response {
    authorize(req, next, &["admin", "superadmin"]).await
}

pub async fn require_superadmin(req: Request, next: Next) -> Response {
    authorize(req, next, &["superadmin"]).await
}

pub async fn require_contractor(req: Request, next: Next) -> Response {
    authorize(req, next, &["contractor"]).await
}

/// Staff and contractor users; guests are kept out of the document vault.
pub async fn require_staff(req: Request, next: Next) -> Response {
    authorize(req, next, &["admin", "superadmin", "contractor"]).await
}
