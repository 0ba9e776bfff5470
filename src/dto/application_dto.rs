use crate::models::application::WorkflowAction;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitApplicationRequest {
    #[validate(length(min = 1))]
    pub contractor_id: String,
    #[validate(length(min = 1))]
    pub worker_id: String,
    pub job_position_id: Option<String>,
    pub notes: Option<String>,
}

/// Portal submissions take the contractor from the caller's token.
#[derive(Debug, Deserialize, Validate)]
pub struct PortalSubmitApplicationRequest {
    #[validate(length(min = 1))]
    pub worker_id: String,
    pub job_position_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewersRequest {
    pub hsse: Option<String>,
    pub engineering: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WorkflowActionRequest {
    pub action: WorkflowAction,
    pub notes: Option<String>,
    pub reviewers: Option<ReviewersRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationQuery {
    pub contractor_id: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}
