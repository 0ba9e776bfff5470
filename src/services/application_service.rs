use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, StatusHistoryEntry};
use crate::registry::Db;
use crate::services::audit_service::AuditService;
use crate::utils::time;
use serde_json::json;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SubmitApplication {
    pub contractor_id: String,
    pub worker_id: String,
    pub job_position_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub contractor_id: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub search: Option<String>,
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardStats {
    pub applications_total: usize,
    pub applications_by_status: HashMap<String, usize>,
    pub contractors_total: usize,
    pub workers_total: usize,
    pub certificates_active: usize,
    pub interviews_scheduled: usize,
}

#[derive(Clone)]
pub struct ApplicationService {
    db: Db,
}

impl ApplicationService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Creates a new application in "Diajukan" with its history seeded, after
    /// checking the contractor/worker/position references resolve and the
    /// worker has no application already in flight.
    pub async fn submit(&self, req: SubmitApplication, actor_id: &str) -> Result<Application> {
        let mut regs = self.db.write().await;

        regs.contractors
            .find_by_id(&req.contractor_id)
            .ok_or_else(|| Error::NotFound(format!("Contractor {}", req.contractor_id)))?;
        let worker = regs
            .workers
            .find_by_id(&req.worker_id)
            .ok_or_else(|| Error::NotFound(format!("Worker {}", req.worker_id)))?;
        if worker.contractor_id != req.contractor_id {
            return Err(Error::BadRequest(
                "Worker does not belong to this contractor".to_string(),
            ));
        }
        if let Some(position_id) = &req.job_position_id {
            regs.job_positions
                .find_by_id(position_id)
                .ok_or_else(|| Error::NotFound(format!("Job position {}", position_id)))?;
        }

        let in_flight = regs.applications.all().iter().any(|a| {
            a.worker_id == req.worker_id
                && !matches!(
                    a.status,
                    ApplicationStatus::Rejected | ApplicationStatus::CertificateIssued
                )
        });
        if in_flight {
            return Err(Error::BadRequest(
                "Worker already has an application in progress".to_string(),
            ));
        }

        let now = time::now();
        let id = regs.applications.next_id();
        let application = Application {
            id,
            contractor_id: req.contractor_id,
            worker_id: req.worker_id,
            job_position_id: req.job_position_id,
            status: ApplicationStatus::Submitted,
            status_history: vec![StatusHistoryEntry {
                status: ApplicationStatus::Submitted,
                timestamp: now,
                user_id: actor_id.to_string(),
                notes: req.notes.clone(),
            }],
            submission_date: now,
            notes: req.notes,
            reviewers: None,
        };
        let application = regs.applications.add(application).clone();

        AuditService::record(
            &mut regs,
            Some(actor_id),
            "submit_application",
            "application",
            &application.id,
            Some(json!({ "worker_id": application.worker_id })),
        );

        self.db.flush(&regs.applications)?;
        self.db.flush(&regs.audit_log)?;
        tracing::info!(application = %application.id, worker = %application.worker_id, "application submitted");
        Ok(application)
    }

    /// Filtered, paginated listing. Search matches the application id, the
    /// worker id, or the worker's name.
    pub async fn list(&self, filter: &ApplicationFilter) -> (Vec<Application>, usize) {
        let regs = self.db.read().await;
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let matches: Vec<&Application> = regs
            .applications
            .find_all_where(|a| {
                if let Some(contractor_id) = &filter.contractor_id {
                    if &a.contractor_id != contractor_id {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if a.status != status {
                        return false;
                    }
                }
                if let Some(needle) = &needle {
                    let worker_name = regs
                        .workers
                        .find_by_id(&a.worker_id)
                        .map(|w| w.name.to_lowercase())
                        .unwrap_or_default();
                    return a.id.to_lowercase().contains(needle)
                        || a.worker_id.to_lowercase().contains(needle)
                        || worker_name.contains(needle);
                }
                true
            });

        let total = matches.len();
        let page = filter.page.max(1);
        let per_page = if filter.per_page == 0 { 20 } else { filter.per_page };
        let items = matches
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();
        (items, total)
    }

    pub async fn get(&self, id: &str) -> Result<Application> {
        let regs = self.db.read().await;
        regs.applications
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Application {}", id)))
    }

    /// Explicit admin delete. Blocked while interviews or certificates still
    /// reference the application; the application's review records go with it.
    pub async fn delete(&self, id: &str, actor_id: &str) -> Result<()> {
        let mut regs = self.db.write().await;

        regs.applications
            .find_by_id(id)
            .ok_or_else(|| Error::NotFound(format!("Application {}", id)))?;

        let interviews = regs
            .interviews
            .find_all_where(|i| i.application_id == id)
            .len();
        if interviews > 0 {
            return Err(Error::DependencyExists(format!(
                "Application {} has {} interview(s)",
                id, interviews
            )));
        }
        let certificates = regs
            .certificates
            .find_all_where(|c| c.application_id == id)
            .len();
        if certificates > 0 {
            return Err(Error::DependencyExists(format!(
                "Application {} has an issued certificate",
                id
            )));
        }

        regs.reviews.retain(|r| r.application_id != id);
        regs.applications.remove(id)?;
        AuditService::record(
            &mut regs,
            Some(actor_id),
            "delete_application",
            "application",
            id,
            None,
        );

        self.db.flush(&regs.applications)?;
        self.db.flush(&regs.reviews)?;
        self.db.flush(&regs.audit_log)?;
        Ok(())
    }

    pub async fn reviews(&self, application_id: Option<&str>) -> Vec<crate::models::review::Review> {
        let regs = self.db.read().await;
        regs.reviews
            .find_all_where(|r| application_id.map_or(true, |id| r.application_id == id))
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn dashboard_stats(&self) -> DashboardStats {
        let regs = self.db.read().await;
        let mut by_status: HashMap<String, usize> = HashMap::new();
        for application in regs.applications.all() {
            *by_status
                .entry(application.status.label().to_string())
                .or_insert(0) += 1;
        }
        DashboardStats {
            applications_total: regs.applications.len(),
            applications_by_status: by_status,
            contractors_total: regs.contractors.len(),
            workers_total: regs.workers.len(),
            certificates_active: regs
                .certificates
                .find_all_where(|c| {
                    c.status == crate::models::certificate::CertificateStatus::Active
                })
                .len(),
            interviews_scheduled: regs
                .interviews
                .find_all_where(|i| {
                    i.status == crate::models::interview::InterviewStatus::Scheduled
                })
                .len(),
        }
    }
}
