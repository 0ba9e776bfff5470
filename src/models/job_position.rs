use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct JobPosition {
    pub id: String,
    pub title: String,
    pub department: Option<String>,
    pub risk_level: Option<String>,
    pub requirements: Option<String>,
    pub created_at: DateTime<Utc>,
}
