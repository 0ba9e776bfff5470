use crate::error::{Error, Result};
use crate::models::contractor::Contractor;
use crate::registry::Db;
use crate::services::audit_service::AuditService;
use crate::utils::time;

#[derive(Debug, Clone)]
pub struct NewContractor {
    pub company_name: String,
    pub field: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContractorUpdate {
    pub company_name: Option<String>,
    pub field: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone)]
pub struct ContractorService {
    db: Db,
}

impl ContractorService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewContractor, actor_id: &str) -> Result<Contractor> {
        let mut regs = self.db.write().await;

        let email_taken = regs
            .contractors
            .all()
            .iter()
            .any(|c| c.email.eq_ignore_ascii_case(&new.email));
        if email_taken {
            return Err(Error::BadRequest(
                "A contractor with this email already exists".to_string(),
            ));
        }

        let now = time::now();
        let id = regs.contractors.next_id();
        let contractor = Contractor {
            id,
            company_name: new.company_name,
            field: new.field,
            address: new.address,
            contact_person: new.contact_person,
            email: new.email,
            phone: new.phone,
            created_at: now,
            updated_at: now,
        };
        let contractor = regs.contractors.add(contractor).clone();

        AuditService::record(
            &mut regs,
            Some(actor_id),
            "create_contractor",
            "contractor",
            &contractor.id,
            None,
        );
        self.db.flush(&regs.contractors)?;
        self.db.flush(&regs.audit_log)?;
        Ok(contractor)
    }

    pub async fn update(
        &self,
        id: &str,
        update: ContractorUpdate,
        actor_id: &str,
    ) -> Result<Contractor> {
        let mut regs = self.db.write().await;

        let mut contractor = regs
            .contractors
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Contractor {}", id)))?;

        if let Some(company_name) = update.company_name {
            contractor.company_name = company_name;
        }
        if let Some(field) = update.field {
            contractor.field = Some(field);
        }
        if let Some(address) = update.address {
            contractor.address = Some(address);
        }
        if let Some(contact_person) = update.contact_person {
            contractor.contact_person = Some(contact_person);
        }
        if let Some(email) = update.email {
            contractor.email = email;
        }
        if let Some(phone) = update.phone {
            contractor.phone = Some(phone);
        }
        contractor.updated_at = time::now();
        regs.contractors.update(contractor.clone())?;

        AuditService::record(
            &mut regs,
            Some(actor_id),
            "update_contractor",
            "contractor",
            id,
            None,
        );
        self.db.flush(&regs.contractors)?;
        self.db.flush(&regs.audit_log)?;
        Ok(contractor)
    }

    /// Blocked while workers, applications, certificates, or portal users
    /// still reference the contractor.
    pub async fn delete(&self, id: &str, actor_id: &str) -> Result<()> {
        let mut regs = self.db.write().await;

        regs.contractors
            .find_by_id(id)
            .ok_or_else(|| Error::NotFound(format!("Contractor {}", id)))?;

        let blockers = [
            ("worker", regs.workers.find_all_where(|w| w.contractor_id == id).len()),
            (
                "application",
                regs.applications
                    .find_all_where(|a| a.contractor_id == id)
                    .len(),
            ),
            (
                "certificate",
                regs.certificates
                    .find_all_where(|c| c.contractor_id == id)
                    .len(),
            ),
            (
                "user account",
                regs.users
                    .find_all_where(|u| u.contractor_id.as_deref() == Some(id))
                    .len(),
            ),
        ];
        if let Some((kind, count)) = blockers.iter().find(|(_, count)| *count > 0) {
            return Err(Error::DependencyExists(format!(
                "Contractor {} is referenced by {} {} record(s)",
                id, count, kind
            )));
        }

        regs.contractors.remove(id)?;
        AuditService::record(
            &mut regs,
            Some(actor_id),
            "delete_contractor",
            "contractor",
            id,
            None,
        );
        self.db.flush(&regs.contractors)?;
        self.db.flush(&regs.audit_log)?;
        Ok(())
    }

    pub async fn list(&self) -> Vec<Contractor> {
        let regs = self.db.read().await;
        regs.contractors.all().to_vec()
    }

    pub async fn get(&self, id: &str) -> Result<Contractor> {
        let regs = self.db.read().await;
        regs.contractors
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Contractor {}", id)))
    }
}
