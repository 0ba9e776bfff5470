use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    Hsse,
    Engineering,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
    OnHold,
}

/// Outcome of one review pass over an application.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Review {
    pub id: String,
    pub application_id: String,
    pub reviewer_id: String,
    pub review_type: ReviewType,
    pub decision: ReviewDecision,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
