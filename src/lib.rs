pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod registry;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use crate::registry::Db;
use crate::services::{
    application_service::ApplicationService, audit_service::AuditService,
    certificate_service::CertificateService, contractor_service::ContractorService,
    document_service::DocumentService, interview_service::InterviewService,
    job_position_service::JobPositionService, quota_service::QuotaService,
    user_service::UserService, worker_service::WorkerService, workflow_service::WorkflowService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub workflow_service: WorkflowService,
    pub quota_service: QuotaService,
    pub interview_service: InterviewService,
    pub certificate_service: CertificateService,
    pub application_service: ApplicationService,
    pub contractor_service: ContractorService,
    pub worker_service: WorkerService,
    pub job_position_service: JobPositionService,
    pub user_service: UserService,
    pub document_service: DocumentService,
    pub audit_service: AuditService,
}

impl AppState {
    pub fn new(db: Db) -> Self {
        let config = crate::config::get_config();

        let workflow_service = WorkflowService::new(db.clone());
        let quota_service = QuotaService::new(db.clone());
        let interview_service = InterviewService::new(db.clone());
        let certificate_service = CertificateService::new(db.clone());
        let application_service = ApplicationService::new(db.clone());
        let contractor_service = ContractorService::new(db.clone());
        let worker_service = WorkerService::new(db.clone());
        let job_position_service = JobPositionService::new(db.clone());
        let user_service = UserService::new(db.clone());
        let document_service = DocumentService::new(db.clone(), config.uploads_dir.clone());
        let audit_service = AuditService::new(db.clone());

        Self {
            db,
            workflow_service,
            quota_service,
            interview_service,
            certificate_service,
            application_service,
            contractor_service,
            worker_service,
            job_position_service,
            user_service,
            document_service,
            audit_service,
        }
    }
}
