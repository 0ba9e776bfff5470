use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum CertificateStatus {
    Active,
    Expired,
}

/// A Safety Basic Training Certificate. Immutable after issuance except for
/// `status`, which is derived from `expiry_date`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Certificate {
    pub id: String,
    pub application_id: String,
    pub worker_id: String,
    pub contractor_id: String,
    pub certificate_type: String,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub status: CertificateStatus,
    pub cert_number: String,
    pub issued_by: String,
}

impl Certificate {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date < now
    }
}
