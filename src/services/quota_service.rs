use crate::error::{Error, Result};
use crate::models::user::User;
use crate::registry::{Db, Registries};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Interviewers without an explicit capacity get this many slots per day.
pub const DEFAULT_MAX_INTERVIEWS: u32 = 5;

#[derive(Debug, Clone, Copy, Serialize, utoipa::ToSchema)]
pub struct QuotaUsage {
    pub max: u32,
    pub used: u32,
    pub available: u32,
}

/// Counts an interviewer's bookings against their daily capacity. The window
/// is the UTC calendar day of `scheduled_date`; cancelled interviews do not
/// count.
#[derive(Clone)]
pub struct QuotaService {
    db: Db,
}

impl QuotaService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub(crate) fn used_on_day(
        regs: &Registries,
        interviewer_id: &str,
        date: DateTime<Utc>,
        exclude: Option<&str>,
    ) -> u32 {
        let day = date.date_naive();
        regs.interviews
            .find_all_where(|i| {
                i.interviewer_id == interviewer_id
                    && i.counts_against_quota()
                    && i.scheduled_date.date_naive() == day
                    && exclude.map_or(true, |excluded| i.id != excluded)
            })
            .len() as u32
    }

    pub(crate) fn usage(regs: &Registries, interviewer: &User, date: DateTime<Utc>) -> QuotaUsage {
        let max = interviewer.max_interviews.unwrap_or(DEFAULT_MAX_INTERVIEWS);
        let used = Self::used_on_day(regs, &interviewer.id, date, None);
        QuotaUsage {
            max,
            used,
            available: max.saturating_sub(used),
        }
    }

    pub(crate) fn can_schedule(
        regs: &Registries,
        interviewer: &User,
        date: DateTime<Utc>,
        exclude: Option<&str>,
    ) -> bool {
        let max = interviewer.max_interviews.unwrap_or(DEFAULT_MAX_INTERVIEWS);
        Self::used_on_day(regs, &interviewer.id, date, exclude) < max
    }

    pub async fn quota_for(&self, interviewer_id: &str, date: DateTime<Utc>) -> Result<QuotaUsage> {
        let regs = self.db.read().await;
        let interviewer = regs
            .users
            .find_by_id(interviewer_id)
            .ok_or_else(|| Error::NotFound(format!("Interviewer {}", interviewer_id)))?;
        Ok(Self::usage(&regs, interviewer, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::{Interview, InterviewStatus, InterviewType};
    use crate::models::user::Role;
    use chrono::Duration;

    fn interviewer(id: &str, max_interviews: Option<u32>) -> User {
        User {
            id: id.into(),
            name: "Interviewer".into(),
            email: format!("{}@hsse.example", id.to_lowercase()),
            password_hash: None,
            role: Role::Admin,
            contractor_id: None,
            max_interviews,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn interview(
        id: &str,
        interviewer_id: &str,
        scheduled_date: DateTime<Utc>,
        status: InterviewStatus,
    ) -> Interview {
        Interview {
            id: id.into(),
            application_id: "APP001".into(),
            worker_id: "WRK001".into(),
            contractor_id: "CTR001".into(),
            interview_type: InterviewType::Hsse,
            scheduled_date,
            interviewer_id: interviewer_id.into(),
            status,
            results: None,
            reschedule_history: Vec::new(),
        }
    }

    #[test]
    fn default_capacity_applies_when_unset() {
        let regs = Registries::default();
        let usage = QuotaService::usage(&regs, &interviewer("USR001", None), Utc::now());
        assert_eq!(usage.max, DEFAULT_MAX_INTERVIEWS);
        assert_eq!(usage.used, 0);
        assert_eq!(usage.available, DEFAULT_MAX_INTERVIEWS);
    }

    #[test]
    fn only_same_day_bookings_count() {
        let mut regs = Registries::default();
        let today = Utc::now();
        let tomorrow = today + Duration::days(1);
        regs.interviews
            .add(interview("INT001", "USR001", today, InterviewStatus::Scheduled));
        regs.interviews
            .add(interview("INT002", "USR001", tomorrow, InterviewStatus::Scheduled));

        let user = interviewer("USR001", Some(2));
        assert_eq!(QuotaService::usage(&regs, &user, today).used, 1);
        assert_eq!(QuotaService::usage(&regs, &user, tomorrow).used, 1);
    }

    #[test]
    fn cancelled_interviews_release_their_slot() {
        let mut regs = Registries::default();
        let today = Utc::now();
        regs.interviews
            .add(interview("INT001", "USR001", today, InterviewStatus::Cancelled));

        let user = interviewer("USR001", Some(1));
        assert!(QuotaService::can_schedule(&regs, &user, today, None));
    }

    #[test]
    fn full_day_blocks_scheduling_but_excluded_booking_frees_it() {
        let mut regs = Registries::default();
        let today = Utc::now();
        regs.interviews
            .add(interview("INT001", "USR001", today, InterviewStatus::Scheduled));

        let user = interviewer("USR001", Some(1));
        assert!(!QuotaService::can_schedule(&regs, &user, today, None));
        // rescheduling INT001 within the same day must not trip on itself
        assert!(QuotaService::can_schedule(&regs, &user, today, Some("INT001")));
    }
}
