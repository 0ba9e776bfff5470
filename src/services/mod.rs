pub mod application_service;
pub mod audit_service;
pub mod certificate_service;
pub mod contractor_service;
pub mod document_service;
pub mod interview_service;
pub mod job_position_service;
pub mod quota_service;
pub mod user_service;
pub mod worker_service;
pub mod workflow_service;
