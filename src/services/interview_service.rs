use crate::error::{Error, Result};
use crate::models::interview::{
    Interview, InterviewResults, InterviewStatus, InterviewType, RescheduleEntry,
};
use crate::models::user::Role;
use crate::registry::Db;
use crate::services::audit_service::AuditService;
use crate::services::quota_service::QuotaService;
use crate::services::workflow_service::{WorkflowService, INTERVIEW_COMPLETABLE};
use crate::utils::time;
use chrono::{DateTime, Utc};
use serde_json::json;

/// Handler-assembled input for scheduling one interview track.
#[derive(Debug, Clone)]
pub struct ScheduleInterview {
    pub application_id: String,
    pub interview_type: InterviewType,
    pub interviewer_id: String,
    pub scheduled_date: DateTime<Utc>,
}

#[derive(Clone)]
pub struct InterviewService {
    db: Db,
}

impl InterviewService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Creates an interview record. The interviewer's quota for the target
    /// day is checked before anything is mutated; a full day rejects the
    /// request without creating a record.
    pub async fn schedule(&self, req: ScheduleInterview, actor_id: &str) -> Result<Interview> {
        let mut regs = self.db.write().await;

        let application = regs
            .applications
            .find_by_id(&req.application_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Application {}", req.application_id)))?;

        let interviewer = regs
            .users
            .find_by_id(&req.interviewer_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Interviewer {}", req.interviewer_id)))?;
        if !matches!(interviewer.role, Role::Admin | Role::Superadmin) {
            return Err(Error::BadRequest(
                "Assigned interviewer must be an admin user".to_string(),
            ));
        }

        let already_scheduled = regs.interviews.all().iter().any(|i| {
            i.application_id == application.id
                && i.interview_type == req.interview_type
                && i.status != InterviewStatus::Cancelled
        });
        if already_scheduled {
            return Err(Error::BadRequest(format!(
                "A {} interview already exists for application {}",
                req.interview_type.label(),
                application.id
            )));
        }

        if !QuotaService::can_schedule(&regs, &interviewer, req.scheduled_date, None) {
            return Err(Error::QuotaExceeded(format!(
                "{} has no interview slots left on {}",
                interviewer.name,
                req.scheduled_date.date_naive()
            )));
        }

        WorkflowService::on_interview_scheduled(&mut regs, &application.id, actor_id)?;

        let id = regs.interviews.next_id();
        let interview = Interview {
            id,
            application_id: application.id.clone(),
            worker_id: application.worker_id.clone(),
            contractor_id: application.contractor_id.clone(),
            interview_type: req.interview_type,
            scheduled_date: req.scheduled_date,
            interviewer_id: interviewer.id.clone(),
            status: InterviewStatus::Scheduled,
            results: None,
            reschedule_history: Vec::new(),
        };
        let interview = regs.interviews.add(interview).clone();

        AuditService::record(
            &mut regs,
            Some(actor_id),
            "schedule_interview",
            "interview",
            &interview.id,
            Some(json!({
                "application_id": application.id,
                "interviewer_id": interviewer.id,
                "interview_type": req.interview_type.label(),
            })),
        );

        self.db.flush(&regs.interviews)?;
        self.db.flush(&regs.applications)?;
        self.db.flush(&regs.audit_log)?;
        tracing::info!(
            interview = %interview.id,
            application = %application.id,
            interviewer = %interview.interviewer_id,
            "interview scheduled"
        );
        Ok(interview)
    }

    /// Records a result and lets the workflow engine advance the application.
    pub async fn complete(
        &self,
        interview_id: &str,
        results: InterviewResults,
        actor_id: &str,
    ) -> Result<Interview> {
        let mut regs = self.db.write().await;

        let mut interview = regs
            .interviews
            .find_by_id(interview_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Interview {}", interview_id)))?;
        if interview.status != InterviewStatus::Scheduled {
            return Err(Error::BadRequest(format!(
                "Interview {} is not awaiting completion",
                interview_id
            )));
        }

        // Validate the application can accept a result before the interview
        // record is touched, so a rejected transition leaves nothing behind.
        let application = regs
            .applications
            .find_by_id(&interview.application_id)
            .ok_or_else(|| Error::NotFound(format!("Application {}", interview.application_id)))?;
        if !INTERVIEW_COMPLETABLE.contains(&application.status) {
            return Err(Error::InvalidTransition {
                from: application.status.label().to_string(),
                action: "complete_interview".to_string(),
            });
        }

        interview.status = InterviewStatus::Completed;
        interview.results = Some(results);
        regs.interviews.update(interview.clone())?;

        let notes = interview.results.as_ref().and_then(|r| r.notes.clone());
        WorkflowService::on_interview_completed(&mut regs, &interview, actor_id, notes)?;

        AuditService::record(
            &mut regs,
            Some(actor_id),
            "complete_interview",
            "interview",
            &interview.id,
            interview
                .results
                .as_ref()
                .map(|r| json!({ "outcome": r.outcome, "score": r.score })),
        );

        self.db.flush(&regs.interviews)?;
        self.db.flush(&regs.applications)?;
        self.db.flush(&regs.reviews)?;
        self.db.flush(&regs.certificates)?;
        self.db.flush(&regs.audit_log)?;
        Ok(interview)
    }

    /// Moves an interview to a new date. The application status is left
    /// untouched; the move is recorded in the interview's own history.
    pub async fn reschedule(
        &self,
        interview_id: &str,
        new_date: DateTime<Utc>,
        reason: Option<String>,
        actor_id: &str,
    ) -> Result<Interview> {
        let mut regs = self.db.write().await;

        let mut interview = regs
            .interviews
            .find_by_id(interview_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Interview {}", interview_id)))?;
        if interview.status != InterviewStatus::Scheduled {
            return Err(Error::BadRequest(format!(
                "Interview {} cannot be rescheduled",
                interview_id
            )));
        }

        let interviewer = regs
            .users
            .find_by_id(&interview.interviewer_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Interviewer {}", interview.interviewer_id)))?;
        if !QuotaService::can_schedule(&regs, &interviewer, new_date, Some(&interview.id)) {
            return Err(Error::QuotaExceeded(format!(
                "{} has no interview slots left on {}",
                interviewer.name,
                new_date.date_naive()
            )));
        }

        let old_date = interview.scheduled_date;
        interview.reschedule_history.push(RescheduleEntry {
            old_date,
            new_date,
            reason,
            timestamp: time::now(),
            user_id: actor_id.to_string(),
        });
        interview.scheduled_date = new_date;
        regs.interviews.update(interview.clone())?;

        AuditService::record(
            &mut regs,
            Some(actor_id),
            "reschedule_interview",
            "interview",
            &interview.id,
            Some(json!({ "old_date": old_date, "new_date": new_date })),
        );

        self.db.flush(&regs.interviews)?;
        self.db.flush(&regs.audit_log)?;
        Ok(interview)
    }

    pub async fn cancel(&self, interview_id: &str, actor_id: &str) -> Result<Interview> {
        let mut regs = self.db.write().await;

        let mut interview = regs
            .interviews
            .find_by_id(interview_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Interview {}", interview_id)))?;
        if interview.status != InterviewStatus::Scheduled {
            return Err(Error::BadRequest(format!(
                "Interview {} is not scheduled",
                interview_id
            )));
        }

        interview.status = InterviewStatus::Cancelled;
        regs.interviews.update(interview.clone())?;

        AuditService::record(
            &mut regs,
            Some(actor_id),
            "cancel_interview",
            "interview",
            &interview.id,
            None,
        );

        self.db.flush(&regs.interviews)?;
        self.db.flush(&regs.audit_log)?;
        Ok(interview)
    }

    pub async fn list(
        &self,
        application_id: Option<&str>,
        interviewer_id: Option<&str>,
    ) -> Vec<Interview> {
        let regs = self.db.read().await;
        regs.interviews
            .find_all_where(|i| {
                application_id.map_or(true, |id| i.application_id == id)
                    && interviewer_id.map_or(true, |id| i.interviewer_id == id)
            })
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Interview> {
        let regs = self.db.read().await;
        regs.interviews
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Interview {}", id)))
    }
}
