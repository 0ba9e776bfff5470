pub mod application_routes;
pub mod audit_routes;
pub mod auth_routes;
pub mod certificate_routes;
pub mod contractor_routes;
pub mod document_routes;
pub mod health;
pub mod interview_routes;
pub mod job_position_routes;
pub mod portal;
pub mod user_routes;
pub mod worker_routes;
