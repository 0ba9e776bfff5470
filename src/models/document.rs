use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Personnel document metadata (MCU results, ID scans, training records).
/// The file body lives under the uploads directory at `stored_path`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Document {
    pub id: String,
    pub personnel_id: String,
    pub document_type: String,
    pub file_name: String,
    pub stored_path: String,
    pub file_size: u64,
    pub description: Option<String>,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}
