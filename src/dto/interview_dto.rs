use crate::models::interview::{InterviewOutcome, InterviewType};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleInterviewRequest {
    #[validate(length(min = 1))]
    pub application_id: String,
    pub interview_type: InterviewType,
    #[validate(length(min = 1))]
    pub interviewer_id: String,
    pub scheduled_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteInterviewRequest {
    pub outcome: InterviewOutcome,
    #[validate(range(min = 0, max = 100))]
    pub score: Option<i32>,
    pub notes: Option<String>,
    pub recommendation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleInterviewRequest {
    pub new_date: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewQuery {
    pub application_id: Option<String>,
    pub interviewer_id: Option<String>,
}

/// Defaults to today when no date is given.
#[derive(Debug, Deserialize)]
pub struct QuotaQuery {
    pub date: Option<String>,
}
