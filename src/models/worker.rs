use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Worker {
    pub id: String,
    pub contractor_id: String,
    pub name: String,
    pub national_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub phone: Option<String>,
    /// Latest medical check-up result, e.g. "Fit" / "Fit with note".
    pub mcu_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
