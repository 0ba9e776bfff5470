use crate::models::certificate::CertificateStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CertificateQuery {
    pub contractor_id: Option<String>,
}

/// Public lookup result for a certificate number.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CertificateVerification {
    pub cert_number: String,
    pub worker_name: String,
    pub contractor_name: String,
    pub status: CertificateStatus,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
}
