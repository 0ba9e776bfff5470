use crate::config::get_config;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::user::User;
use jsonwebtoken::{encode, EncodingKey, Header};

pub fn issue_token(user: &User) -> Result<String> {
    let config = get_config();
    let exp = (crate::utils::time::now() + chrono::Duration::hours(config.token_ttl_hours))
        .timestamp() as usize;
    let claims = Claims {
        sub: user.id.clone(),
        exp,
        role: Some(user.role.as_str().to_string()),
        contractor_id: user.contractor_id.clone(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}
