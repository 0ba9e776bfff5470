pub mod application_dto;
pub mod certificate_dto;
pub mod document_dto;
pub mod interview_dto;
pub mod user_dto;
pub mod workforce_dto;
