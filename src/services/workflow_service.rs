use crate::error::{Error, Result};
use crate::models::application::{
    Application, ApplicationStatus, Reviewers, StatusHistoryEntry, WorkflowAction,
};
use crate::models::interview::{Interview, InterviewOutcome, InterviewType};
use crate::models::review::{Review, ReviewDecision, ReviewType};
use crate::registry::{Db, Registries};
use crate::services::audit_service::AuditService;
use crate::services::certificate_service::CertificateService;
use crate::utils::time;

/// Application statuses from which an interview result may be recorded. Both
/// tracks complete independently, so a second result can arrive after the
/// first already moved the application on.
pub(crate) const INTERVIEW_COMPLETABLE: &[ApplicationStatus] = &[
    ApplicationStatus::InterviewScheduled,
    ApplicationStatus::InterviewCompleted,
    ApplicationStatus::InterviewCompletedConditional,
];

/// Applies workflow actions to applications: validates the transition against
/// the central table, appends the history entry, and fires side effects
/// (review records, certificate issuance, audit trail).
#[derive(Clone)]
pub struct WorkflowService {
    db: Db,
}

impl WorkflowService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// The transition table. Any (status, action) pair not listed here is
    /// rejected with `InvalidTransition`.
    fn rule(action: WorkflowAction) -> (&'static [ApplicationStatus], ApplicationStatus) {
        use ApplicationStatus::*;
        match action {
            WorkflowAction::StartReview => (&[Submitted], UnderReview),
            WorkflowAction::Approve => (&[Submitted, UnderReview, OnHold], Approved),
            WorkflowAction::Reject => (
                &[
                    Submitted,
                    UnderReview,
                    OnHold,
                    AwaitingInterview,
                    InterviewScheduled,
                    InterviewCompleted,
                    InterviewCompletedConditional,
                ],
                Rejected,
            ),
            WorkflowAction::Hold => (&[Submitted, UnderReview, Approved, AwaitingInterview], OnHold),
            WorkflowAction::Schedule => (&[Approved], AwaitingInterview),
            WorkflowAction::IssueCertificate => (
                &[InterviewCompleted, InterviewCompletedConditional],
                CertificateIssued,
            ),
        }
    }

    /// Moves an application to `target` if its current status permits, and
    /// appends exactly one history entry.
    pub(crate) fn transition(
        regs: &mut Registries,
        application_id: &str,
        allowed_from: &[ApplicationStatus],
        target: ApplicationStatus,
        action_name: &str,
        actor_id: &str,
        notes: Option<String>,
    ) -> Result<Application> {
        let mut application = regs
            .applications
            .find_by_id(application_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Application {}", application_id)))?;

        if !allowed_from.contains(&application.status) {
            return Err(Error::InvalidTransition {
                from: application.status.label().to_string(),
                action: action_name.to_string(),
            });
        }

        application.status = target;
        application.status_history.push(StatusHistoryEntry {
            status: target,
            timestamp: time::now(),
            user_id: actor_id.to_string(),
            notes,
        });
        regs.applications.update(application.clone())?;
        Ok(application)
    }

    pub async fn apply_action(
        &self,
        application_id: &str,
        action: WorkflowAction,
        actor_id: &str,
        notes: Option<String>,
        reviewers: Option<Reviewers>,
    ) -> Result<Application> {
        let mut regs = self.db.write().await;
        let (allowed_from, target) = Self::rule(action);
        let mut application = Self::transition(
            &mut regs,
            application_id,
            allowed_from,
            target,
            action.as_str(),
            actor_id,
            notes.clone(),
        )?;

        match action {
            WorkflowAction::StartReview => {
                if reviewers.is_some() {
                    application.reviewers = reviewers;
                    regs.applications.update(application.clone())?;
                }
            }
            WorkflowAction::Approve => {
                Self::record_review(&mut regs, &application, actor_id, ReviewDecision::Approved, notes);
            }
            WorkflowAction::Reject => {
                Self::record_review(&mut regs, &application, actor_id, ReviewDecision::Rejected, notes);
            }
            WorkflowAction::Hold => {
                Self::record_review(&mut regs, &application, actor_id, ReviewDecision::OnHold, notes);
            }
            WorkflowAction::IssueCertificate => {
                let certificate = CertificateService::issue(&mut regs, &application, actor_id)?;
                tracing::info!(
                    application = %application.id,
                    cert_number = %certificate.cert_number,
                    "certificate issued"
                );
                self.db.flush(&regs.certificates)?;
            }
            WorkflowAction::Schedule => {}
        }

        AuditService::record(
            &mut regs,
            Some(actor_id),
            action.as_str(),
            "application",
            &application.id,
            None,
        );

        self.db.flush(&regs.applications)?;
        self.db.flush(&regs.reviews)?;
        self.db.flush(&regs.audit_log)?;
        tracing::info!(application = %application.id, status = %application.status, action = action.as_str(), "workflow action applied");
        Ok(application)
    }

    /// Called when an interview record is created for the application. One
    /// track may finish before the other is booked, so the completed labels
    /// are valid starting points too.
    pub(crate) fn on_interview_scheduled(
        regs: &mut Registries,
        application_id: &str,
        actor_id: &str,
    ) -> Result<Application> {
        use ApplicationStatus::*;
        Self::transition(
            regs,
            application_id,
            &[
                AwaitingInterview,
                InterviewScheduled,
                InterviewCompleted,
                InterviewCompletedConditional,
            ],
            InterviewScheduled,
            "schedule_interview",
            actor_id,
            None,
        )
    }

    /// Advances the application after one interview result lands. A failing
    /// track rejects; a conditional pass gets its own label; once both tracks
    /// have passed, the certificate is issued as part of the same change.
    pub(crate) fn on_interview_completed(
        regs: &mut Registries,
        interview: &Interview,
        actor_id: &str,
        notes: Option<String>,
    ) -> Result<Application> {
        use ApplicationStatus::*;
        let outcome = interview
            .results
            .as_ref()
            .map(|r| r.outcome)
            .ok_or_else(|| Error::Internal("interview completed without results".to_string()))?;

        match outcome {
            InterviewOutcome::Fail => Self::transition(
                regs,
                &interview.application_id,
                INTERVIEW_COMPLETABLE,
                Rejected,
                "complete_interview",
                actor_id,
                notes,
            ),
            InterviewOutcome::Conditional => Self::transition(
                regs,
                &interview.application_id,
                INTERVIEW_COMPLETABLE,
                InterviewCompletedConditional,
                "complete_interview",
                actor_id,
                notes,
            ),
            InterviewOutcome::Pass => {
                if Self::both_tracks_passed(regs, &interview.application_id) {
                    let application = Self::transition(
                        regs,
                        &interview.application_id,
                        INTERVIEW_COMPLETABLE,
                        CertificateIssued,
                        "complete_interview",
                        actor_id,
                        notes,
                    )?;
                    let certificate = CertificateService::issue(regs, &application, actor_id)?;
                    tracing::info!(
                        application = %application.id,
                        cert_number = %certificate.cert_number,
                        "both interview tracks passed, certificate issued"
                    );
                    Ok(application)
                } else {
                    Self::transition(
                        regs,
                        &interview.application_id,
                        INTERVIEW_COMPLETABLE,
                        InterviewCompleted,
                        "complete_interview",
                        actor_id,
                        notes,
                    )
                }
            }
        }
    }

    fn both_tracks_passed(regs: &Registries, application_id: &str) -> bool {
        let track_passed = |track: InterviewType| {
            regs.interviews
                .all()
                .iter()
                .any(|i| i.application_id == application_id && i.interview_type == track && i.passed())
        };
        track_passed(InterviewType::Hsse) && track_passed(InterviewType::Engineering)
    }

    fn record_review(
        regs: &mut Registries,
        application: &Application,
        reviewer_id: &str,
        decision: ReviewDecision,
        notes: Option<String>,
    ) {
        let review_type = match &application.reviewers {
            Some(r) if r.hsse.as_deref() == Some(reviewer_id) => ReviewType::Hsse,
            Some(r) if r.engineering.as_deref() == Some(reviewer_id) => ReviewType::Engineering,
            _ => ReviewType::Final,
        };
        let id = regs.reviews.next_id();
        regs.reviews.add(Review {
            id,
            application_id: application.id.clone(),
            reviewer_id: reviewer_id.to_string(),
            review_type,
            decision,
            notes,
            created_at: time::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::{InterviewResults, InterviewStatus};
    use crate::store::json_store::JsonStore;
    use chrono::{Datelike, Utc};

    async fn test_db() -> Db {
        let dir = std::env::temp_dir().join(format!("sbtc-workflow-{}", uuid::Uuid::new_v4()));
        Db::open(JsonStore::open(dir).expect("store")).expect("db")
    }

    fn submitted_application(id: &str) -> Application {
        let now = Utc::now();
        Application {
            id: id.into(),
            contractor_id: "CTR001".into(),
            worker_id: "WRK001".into(),
            job_position_id: None,
            status: ApplicationStatus::Submitted,
            status_history: vec![StatusHistoryEntry {
                status: ApplicationStatus::Submitted,
                timestamp: now,
                user_id: "USR010".into(),
                notes: None,
            }],
            submission_date: now,
            notes: None,
            reviewers: None,
        }
    }

    fn completed_interview(
        id: &str,
        application_id: &str,
        track: InterviewType,
        outcome: InterviewOutcome,
    ) -> Interview {
        Interview {
            id: id.into(),
            application_id: application_id.into(),
            worker_id: "WRK001".into(),
            contractor_id: "CTR001".into(),
            interview_type: track,
            scheduled_date: Utc::now(),
            interviewer_id: "USR002".into(),
            status: InterviewStatus::Completed,
            results: Some(InterviewResults {
                outcome,
                score: Some(80),
                notes: None,
                recommendation: None,
            }),
            reschedule_history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn approve_then_schedule_walks_the_documented_path() {
        let db = test_db().await;
        let service = WorkflowService::new(db.clone());
        {
            let mut regs = db.write().await;
            regs.applications.add(submitted_application("APP001"));
        }

        let app = service
            .apply_action("APP001", WorkflowAction::Approve, "USR001", None, None)
            .await
            .expect("approve");
        assert_eq!(app.status, ApplicationStatus::Approved);
        assert_eq!(app.status_history.len(), 2);

        let app = service
            .apply_action("APP001", WorkflowAction::Schedule, "USR001", None, None)
            .await
            .expect("schedule");
        assert_eq!(app.status, ApplicationStatus::AwaitingInterview);
        assert_eq!(app.status_history.len(), 3);
        assert_eq!(
            app.current_history_entry().expect("history").status,
            app.status
        );
    }

    #[tokio::test]
    async fn repeated_approve_is_rejected_and_leaves_status_unchanged() {
        let db = test_db().await;
        let service = WorkflowService::new(db.clone());
        {
            let mut regs = db.write().await;
            regs.applications.add(submitted_application("APP001"));
        }

        service
            .apply_action("APP001", WorkflowAction::Approve, "USR001", None, None)
            .await
            .expect("first approve");
        let err = service
            .apply_action("APP001", WorkflowAction::Approve, "USR001", None, None)
            .await
            .expect_err("second approve must fail");
        assert!(matches!(err, Error::InvalidTransition { .. }));

        let regs = db.read().await;
        let app = regs.applications.find_by_id("APP001").expect("app");
        assert_eq!(app.status, ApplicationStatus::Approved);
        assert_eq!(app.status_history.len(), 2);
    }

    #[tokio::test]
    async fn schedule_requires_prior_approval() {
        let db = test_db().await;
        let service = WorkflowService::new(db.clone());
        {
            let mut regs = db.write().await;
            regs.applications.add(submitted_application("APP001"));
        }

        let err = service
            .apply_action("APP001", WorkflowAction::Schedule, "USR001", None, None)
            .await
            .expect_err("schedule from Diajukan must fail");
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn unknown_application_reports_not_found() {
        let db = test_db().await;
        let service = WorkflowService::new(db);
        let err = service
            .apply_action("APP404", WorkflowAction::Approve, "USR001", None, None)
            .await
            .expect_err("missing application");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn approve_records_a_review() {
        let db = test_db().await;
        let service = WorkflowService::new(db.clone());
        {
            let mut regs = db.write().await;
            regs.applications.add(submitted_application("APP001"));
        }

        service
            .apply_action(
                "APP001",
                WorkflowAction::Approve,
                "USR001",
                Some("all documents in order".into()),
                None,
            )
            .await
            .expect("approve");

        let regs = db.read().await;
        let reviews = regs.reviews.find_all_where(|r| r.application_id == "APP001");
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].decision, ReviewDecision::Approved);
    }

    #[tokio::test]
    async fn dual_pass_issues_exactly_one_certificate_valid_one_year() {
        let db = test_db().await;
        {
            let mut regs = db.write().await;
            let mut app = submitted_application("APP001");
            app.status = ApplicationStatus::InterviewScheduled;
            regs.applications.add(app);
            regs.interviews.add(completed_interview(
                "INT001",
                "APP001",
                InterviewType::Hsse,
                InterviewOutcome::Pass,
            ));
        }

        // first pass: only HSSE is in, application keeps waiting for the
        // engineering track
        {
            let mut regs = db.write().await;
            let hsse = regs.interviews.find_by_id("INT001").cloned().expect("hsse");
            let app = WorkflowService::on_interview_completed(&mut regs, &hsse, "USR002", None)
                .expect("first completion");
            assert_eq!(app.status, ApplicationStatus::InterviewCompleted);
        }

        // second pass closes the loop
        {
            let mut regs = db.write().await;
            regs.interviews.add(completed_interview(
                "INT002",
                "APP001",
                InterviewType::Engineering,
                InterviewOutcome::Pass,
            ));
            let engineering = regs.interviews.find_by_id("INT002").cloned().expect("eng");
            let app =
                WorkflowService::on_interview_completed(&mut regs, &engineering, "USR002", None)
                    .expect("second completion");
            assert_eq!(app.status, ApplicationStatus::CertificateIssued);
        }

        let regs = db.read().await;
        let certs = regs
            .certificates
            .find_all_where(|c| c.application_id == "APP001");
        assert_eq!(certs.len(), 1);
        let cert = certs[0];
        assert!(cert.cert_number.starts_with(&format!("SBTC-{}-", cert.issue_date.year())));
        let expected_expiry = cert
            .issue_date
            .checked_add_months(chrono::Months::new(12))
            .expect("expiry");
        assert_eq!(cert.expiry_date, expected_expiry);
    }

    #[tokio::test]
    async fn failing_track_rejects_and_conditional_gets_its_own_label() {
        let db = test_db().await;
        {
            let mut regs = db.write().await;
            let mut app = submitted_application("APP001");
            app.status = ApplicationStatus::InterviewScheduled;
            regs.applications.add(app);
            let mut other = submitted_application("APP002");
            other.status = ApplicationStatus::InterviewScheduled;
            regs.applications.add(other);
        }

        {
            let mut regs = db.write().await;
            let failed = completed_interview(
                "INT001",
                "APP001",
                InterviewType::Hsse,
                InterviewOutcome::Fail,
            );
            regs.interviews.add(failed.clone());
            let app = WorkflowService::on_interview_completed(&mut regs, &failed, "USR002", None)
                .expect("fail completion");
            assert_eq!(app.status, ApplicationStatus::Rejected);

            let conditional = completed_interview(
                "INT002",
                "APP002",
                InterviewType::Engineering,
                InterviewOutcome::Conditional,
            );
            regs.interviews.add(conditional.clone());
            let app =
                WorkflowService::on_interview_completed(&mut regs, &conditional, "USR002", None)
                    .expect("conditional completion");
            assert_eq!(app.status, ApplicationStatus::InterviewCompletedConditional);
            assert_eq!(app.status.label(), "Interview Selesai - Bersyarat");
        }
    }

    #[tokio::test]
    async fn explicit_issue_does_not_duplicate_an_existing_certificate() {
        let db = test_db().await;
        let service = WorkflowService::new(db.clone());
        {
            let mut regs = db.write().await;
            let mut app = submitted_application("APP001");
            app.status = ApplicationStatus::InterviewCompleted;
            regs.applications.add(app.clone());
            CertificateService::issue(&mut regs, &app, "USR001").expect("pre-issued");
        }

        service
            .apply_action(
                "APP001",
                WorkflowAction::IssueCertificate,
                "USR001",
                None,
                None,
            )
            .await
            .expect("issue action");

        let regs = db.read().await;
        assert_eq!(
            regs.certificates
                .find_all_where(|c| c.application_id == "APP001")
                .len(),
            1
        );
    }
}
