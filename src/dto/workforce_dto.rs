use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContractorRequest {
    #[validate(length(min = 1))]
    pub company_name: String,
    pub field: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContractorRequest {
    pub company_name: Option<String>,
    pub field: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkerRequest {
    #[validate(length(min = 1))]
    pub contractor_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 8))]
    pub national_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub mcu_status: Option<String>,
}

/// Portal worker registrations take the contractor from the caller's token.
#[derive(Debug, Deserialize, Validate)]
pub struct PortalCreateWorkerRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 8))]
    pub national_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub mcu_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkerRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub mcu_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WorkerQuery {
    pub contractor_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobPositionRequest {
    #[validate(length(min = 1))]
    pub title: String,
    pub department: Option<String>,
    pub risk_level: Option<String>,
    pub requirements: Option<String>,
}
