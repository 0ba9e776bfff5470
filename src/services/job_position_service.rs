use crate::error::{Error, Result};
use crate::models::job_position::JobPosition;
use crate::registry::Db;
use crate::services::audit_service::AuditService;
use crate::utils::time;

#[derive(Debug, Clone)]
pub struct NewJobPosition {
    pub title: String,
    pub department: Option<String>,
    pub risk_level: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Clone)]
pub struct JobPositionService {
    db: Db,
}

impl JobPositionService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewJobPosition, actor_id: &str) -> Result<JobPosition> {
        let mut regs = self.db.write().await;
        let id = regs.job_positions.next_id();
        let position = JobPosition {
            id,
            title: new.title,
            department: new.department,
            risk_level: new.risk_level,
            requirements: new.requirements,
            created_at: time::now(),
        };
        let position = regs.job_positions.add(position).clone();

        AuditService::record(
            &mut regs,
            Some(actor_id),
            "create_job_position",
            "job_position",
            &position.id,
            None,
        );
        self.db.flush(&regs.job_positions)?;
        self.db.flush(&regs.audit_log)?;
        Ok(position)
    }

    pub async fn delete(&self, id: &str, actor_id: &str) -> Result<()> {
        let mut regs = self.db.write().await;

        regs.job_positions
            .find_by_id(id)
            .ok_or_else(|| Error::NotFound(format!("Job position {}", id)))?;

        let referencing = regs
            .applications
            .find_all_where(|a| a.job_position_id.as_deref() == Some(id))
            .len();
        if referencing > 0 {
            return Err(Error::DependencyExists(format!(
                "Job position {} is referenced by {} application(s)",
                id, referencing
            )));
        }

        regs.job_positions.remove(id)?;
        AuditService::record(
            &mut regs,
            Some(actor_id),
            "delete_job_position",
            "job_position",
            id,
            None,
        );
        self.db.flush(&regs.job_positions)?;
        self.db.flush(&regs.audit_log)?;
        Ok(())
    }

    pub async fn list(&self) -> Vec<JobPosition> {
        let regs = self.db.read().await;
        regs.job_positions.all().to_vec()
    }

    pub async fn get(&self, id: &str) -> Result<JobPosition> {
        let regs = self.db.read().await;
        regs.job_positions
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Job position {}", id)))
    }
}
