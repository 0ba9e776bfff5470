use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow stages of a certification application. The serialized labels are
/// the ones the compliance program uses on certificates and reports, so they
/// are kept verbatim on the wire and in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ApplicationStatus {
    #[serde(rename = "Diajukan")]
    Submitted,
    #[serde(rename = "Direview")]
    UnderReview,
    #[serde(rename = "Disetujui")]
    Approved,
    #[serde(rename = "Ditolak")]
    Rejected,
    #[serde(rename = "Menunggu Interview")]
    AwaitingInterview,
    #[serde(rename = "Interview Terjadwal")]
    InterviewScheduled,
    #[serde(rename = "Interview Selesai")]
    InterviewCompleted,
    #[serde(rename = "Interview Selesai - Bersyarat")]
    InterviewCompletedConditional,
    #[serde(rename = "Sertifikat Terbit")]
    CertificateIssued,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 10] = [
        Self::Submitted,
        Self::UnderReview,
        Self::Approved,
        Self::Rejected,
        Self::AwaitingInterview,
        Self::InterviewScheduled,
        Self::InterviewCompleted,
        Self::InterviewCompletedConditional,
        Self::CertificateIssued,
        Self::OnHold,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Diajukan",
            Self::UnderReview => "Direview",
            Self::Approved => "Disetujui",
            Self::Rejected => "Ditolak",
            Self::AwaitingInterview => "Menunggu Interview",
            Self::InterviewScheduled => "Interview Terjadwal",
            Self::InterviewCompleted => "Interview Selesai",
            Self::InterviewCompletedConditional => "Interview Selesai - Bersyarat",
            Self::CertificateIssued => "Sertifikat Terbit",
            Self::OnHold => "On Hold",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reviewer/admin actions on an application. Handlers receive these as typed
/// values; the workflow engine decides whether the current status permits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    StartReview,
    Approve,
    Reject,
    Hold,
    Schedule,
    IssueCertificate,
}

impl WorkflowAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartReview => "start_review",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Hold => "hold",
            Self::Schedule => "schedule",
            Self::IssueCertificate => "issue_certificate",
        }
    }
}

/// One entry of the append-only status audit trail. Entries are never
/// reordered or removed once pushed.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusHistoryEntry {
    pub status: ApplicationStatus,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Reviewers {
    pub hsse: Option<String>,
    pub engineering: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Application {
    pub id: String,
    pub contractor_id: String,
    pub worker_id: String,
    pub job_position_id: Option<String>,
    pub status: ApplicationStatus,
    pub status_history: Vec<StatusHistoryEntry>,
    pub submission_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub reviewers: Option<Reviewers>,
}

impl Application {
    pub fn current_history_entry(&self) -> Option<&StatusHistoryEntry> {
        self.status_history.last()
    }
}
