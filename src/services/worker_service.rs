use crate::error::{Error, Result};
use crate::models::worker::Worker;
use crate::registry::Db;
use crate::services::audit_service::AuditService;
use crate::utils::time;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct NewWorker {
    pub contractor_id: String,
    pub name: String,
    pub national_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub mcu_status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkerUpdate {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub mcu_status: Option<String>,
}

#[derive(Clone)]
pub struct WorkerService {
    db: Db,
}

impl WorkerService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewWorker, actor_id: &str) -> Result<Worker> {
        let mut regs = self.db.write().await;

        regs.contractors
            .find_by_id(&new.contractor_id)
            .ok_or_else(|| Error::NotFound(format!("Contractor {}", new.contractor_id)))?;

        let id_taken = regs
            .workers
            .all()
            .iter()
            .any(|w| w.national_id == new.national_id);
        if id_taken {
            return Err(Error::BadRequest(
                "A worker with this national id is already registered".to_string(),
            ));
        }

        let now = time::now();
        let id = regs.workers.next_id();
        let worker = Worker {
            id,
            contractor_id: new.contractor_id,
            name: new.name,
            national_id: new.national_id,
            date_of_birth: new.date_of_birth,
            position: new.position,
            phone: new.phone,
            mcu_status: new.mcu_status,
            created_at: now,
            updated_at: now,
        };
        let worker = regs.workers.add(worker).clone();

        AuditService::record(&mut regs, Some(actor_id), "create_worker", "worker", &worker.id, None);
        self.db.flush(&regs.workers)?;
        self.db.flush(&regs.audit_log)?;
        Ok(worker)
    }

    pub async fn update(&self, id: &str, update: WorkerUpdate, actor_id: &str) -> Result<Worker> {
        let mut regs = self.db.write().await;

        let mut worker = regs
            .workers
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Worker {}", id)))?;

        if let Some(name) = update.name {
            worker.name = name;
        }
        if let Some(date_of_birth) = update.date_of_birth {
            worker.date_of_birth = Some(date_of_birth);
        }
        if let Some(position) = update.position {
            worker.position = Some(position);
        }
        if let Some(phone) = update.phone {
            worker.phone = Some(phone);
        }
        if let Some(mcu_status) = update.mcu_status {
            worker.mcu_status = Some(mcu_status);
        }
        worker.updated_at = time::now();
        regs.workers.update(worker.clone())?;

        AuditService::record(&mut regs, Some(actor_id), "update_worker", "worker", id, None);
        self.db.flush(&regs.workers)?;
        self.db.flush(&regs.audit_log)?;
        Ok(worker)
    }

    /// Blocked while applications, interviews, certificates, or documents
    /// still reference the worker.
    pub async fn delete(&self, id: &str, actor_id: &str) -> Result<()> {
        let mut regs = self.db.write().await;

        regs.workers
            .find_by_id(id)
            .ok_or_else(|| Error::NotFound(format!("Worker {}", id)))?;

        let blockers = [
            (
                "application",
                regs.applications.find_all_where(|a| a.worker_id == id).len(),
            ),
            (
                "interview",
                regs.interviews.find_all_where(|i| i.worker_id == id).len(),
            ),
            (
                "certificate",
                regs.certificates.find_all_where(|c| c.worker_id == id).len(),
            ),
            (
                "document",
                regs.documents.find_all_where(|d| d.personnel_id == id).len(),
            ),
        ];
        if let Some((kind, count)) = blockers.iter().find(|(_, count)| *count > 0) {
            return Err(Error::DependencyExists(format!(
                "Worker {} is referenced by {} {} record(s)",
                id, count, kind
            )));
        }

        regs.workers.remove(id)?;
        AuditService::record(&mut regs, Some(actor_id), "delete_worker", "worker", id, None);
        self.db.flush(&regs.workers)?;
        self.db.flush(&regs.audit_log)?;
        Ok(())
    }

    pub async fn list(&self, contractor_id: Option<&str>) -> Vec<Worker> {
        let regs = self.db.read().await;
        regs.workers
            .find_all_where(|w| contractor_id.map_or(true, |id| w.contractor_id == id))
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Worker> {
        let regs = self.db.read().await;
        regs.workers
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Worker {}", id)))
    }
}
