use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DocumentQuery {
    pub personnel_id: Option<String>,
    pub document_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
}
