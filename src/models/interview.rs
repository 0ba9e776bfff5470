use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two interview tracks every applicant must clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum InterviewType {
    Hsse,
    Engineering,
}

impl InterviewType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hsse => "HSSE",
            Self::Engineering => "Engineering",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InterviewOutcome {
    Pass,
    Fail,
    Conditional,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct InterviewResults {
    pub outcome: InterviewOutcome,
    pub score: Option<i32>,
    pub notes: Option<String>,
    pub recommendation: Option<String>,
}

/// Append-only record of date moves for one interview.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RescheduleEntry {
    pub old_date: DateTime<Utc>,
    pub new_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Interview {
    pub id: String,
    pub application_id: String,
    pub worker_id: String,
    pub contractor_id: String,
    pub interview_type: InterviewType,
    pub scheduled_date: DateTime<Utc>,
    pub interviewer_id: String,
    pub status: InterviewStatus,
    pub results: Option<InterviewResults>,
    pub reschedule_history: Vec<RescheduleEntry>,
}

impl Interview {
    /// A cancelled interview no longer occupies its interviewer's quota.
    pub fn counts_against_quota(&self) -> bool {
        self.status != InterviewStatus::Cancelled
    }

    pub fn passed(&self) -> bool {
        self.status == InterviewStatus::Completed
            && matches!(
                self.results,
                Some(InterviewResults {
                    outcome: InterviewOutcome::Pass,
                    ..
                })
            )
    }
}
