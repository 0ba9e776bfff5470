pub mod application;
pub mod audit_log;
pub mod certificate;
pub mod contractor;
pub mod document;
pub mod interview;
pub mod job_position;
pub mod review;
pub mod user;
pub mod worker;
