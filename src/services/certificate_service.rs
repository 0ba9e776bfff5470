use crate::dto::certificate_dto::CertificateVerification;
use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::models::certificate::{Certificate, CertificateStatus};
use crate::registry::{Db, Registries};
use crate::utils::time;
use chrono::{Datelike, Duration, Months};

#[derive(Clone)]
pub struct CertificateService {
    db: Db,
}

impl CertificateService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Issues the certificate for an application, or returns the existing one:
    /// an application never carries more than one certificate.
    pub(crate) fn issue(
        regs: &mut Registries,
        application: &Application,
        issued_by: &str,
    ) -> Result<Certificate> {
        if let Some(existing) = regs
            .certificates
            .all()
            .iter()
            .find(|c| c.application_id == application.id)
        {
            return Ok(existing.clone());
        }

        let issue_date = time::now();
        let expiry_date = issue_date
            .checked_add_months(Months::new(12))
            .unwrap_or(issue_date + Duration::days(365));
        let cert_number = Self::next_cert_number(regs, issue_date.year());
        let id = regs.certificates.next_id();
        let certificate = Certificate {
            id,
            application_id: application.id.clone(),
            worker_id: application.worker_id.clone(),
            contractor_id: application.contractor_id.clone(),
            certificate_type: "SBTC".to_string(),
            issue_date,
            expiry_date,
            status: CertificateStatus::Active,
            cert_number,
            issued_by: issued_by.to_string(),
        };
        Ok(regs.certificates.add(certificate).clone())
    }

    /// `SBTC-{year}-{seq}`, sequence restarting each year.
    fn next_cert_number(regs: &Registries, year: i32) -> String {
        let prefix = format!("SBTC-{}-", year);
        let max = regs
            .certificates
            .all()
            .iter()
            .filter_map(|c| c.cert_number.strip_prefix(&prefix))
            .filter_map(|seq| seq.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{}{:04}", prefix, max + 1)
    }

    pub async fn list(&self, contractor_id: Option<&str>) -> Vec<Certificate> {
        let regs = self.db.read().await;
        regs.certificates
            .find_all_where(|c| contractor_id.map_or(true, |id| c.contractor_id == id))
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Certificate> {
        let regs = self.db.read().await;
        regs.certificates
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Certificate {}", id)))
    }

    /// Public lookup by the printed certificate number.
    pub async fn verify(&self, cert_number: &str) -> Result<CertificateVerification> {
        let regs = self.db.read().await;
        let certificate = regs
            .certificates
            .all()
            .iter()
            .find(|c| c.cert_number == cert_number)
            .ok_or_else(|| Error::NotFound(format!("Certificate {}", cert_number)))?;
        let worker_name = regs
            .workers
            .find_by_id(&certificate.worker_id)
            .map(|w| w.name.clone())
            .unwrap_or_default();
        let contractor_name = regs
            .contractors
            .find_by_id(&certificate.contractor_id)
            .map(|c| c.company_name.clone())
            .unwrap_or_default();
        Ok(CertificateVerification {
            cert_number: certificate.cert_number.clone(),
            worker_name,
            contractor_name,
            status: certificate.status,
            issue_date: certificate.issue_date,
            expiry_date: certificate.expiry_date,
        })
    }

    /// Flips Active certificates past their expiry date to Expired. Returns
    /// how many were flipped.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let mut regs = self.db.write().await;
        let now = time::now();
        let expired: Vec<Certificate> = regs
            .certificates
            .all()
            .iter()
            .filter(|c| c.status == CertificateStatus::Active && c.is_expired_at(now))
            .cloned()
            .collect();
        for mut certificate in expired.iter().cloned() {
            certificate.status = CertificateStatus::Expired;
            regs.certificates.update(certificate)?;
        }
        if !expired.is_empty() {
            self.db.flush(&regs.certificates)?;
            tracing::info!(count = expired.len(), "certificates marked expired");
        }
        Ok(expired.len())
    }
}
