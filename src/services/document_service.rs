use crate::error::{Error, Result};
use crate::models::document::Document;
use crate::registry::Db;
use crate::services::audit_service::AuditService;
use crate::utils::time;
use bytes::Bytes;
use std::path::Path;

pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;
pub const DOCUMENTS_PAGE_SIZE: usize = 15;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png"];

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub personnel_id: String,
    pub document_type: String,
    pub description: Option<String>,
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub personnel_id: Option<String>,
    pub document_type: Option<String>,
    pub search: Option<String>,
    pub page: usize,
}

#[derive(Clone)]
pub struct DocumentService {
    db: Db,
    uploads_dir: String,
}

impl DocumentService {
    pub fn new(db: Db, uploads_dir: String) -> Self {
        Self { db, uploads_dir }
    }

    fn validate_file(file_name: &str, data: &Bytes) -> Result<String> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(Error::BadRequest(format!(
                "File type .{} is not allowed",
                ext
            )));
        }
        if data.len() > MAX_DOCUMENT_BYTES {
            return Err(Error::BadRequest(
                "File exceeds the 10MB upload limit".to_string(),
            ));
        }
        if ext == "pdf" && !data.starts_with(b"%PDF") {
            return Err(Error::BadRequest("Invalid PDF file content".into()));
        }
        if (ext == "jpg" || ext == "jpeg") && !data.starts_with(&[0xFF, 0xD8]) {
            return Err(Error::BadRequest("Invalid JPEG file content".into()));
        }
        if ext == "png" && !data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Err(Error::BadRequest("Invalid PNG file content".into()));
        }
        Ok(ext)
    }

    pub async fn upload(&self, new: NewDocument, actor_id: &str) -> Result<Document> {
        let ext = Self::validate_file(&new.file_name, &new.data)?;

        let mut regs = self.db.write().await;
        regs.workers
            .find_by_id(&new.personnel_id)
            .ok_or_else(|| Error::NotFound(format!("Worker {}", new.personnel_id)))?;

        let dir = Path::new(&self.uploads_dir).join("documents");
        tokio::fs::create_dir_all(&dir).await?;
        let stored_name = format!("{}.{}", uuid::Uuid::new_v4(), ext);
        let stored_path = dir.join(&stored_name);
        tokio::fs::write(&stored_path, &new.data).await.map_err(|e| {
            tracing::error!("Failed to write document file: {}", e);
            Error::Internal(format!("Failed to save file: {}", e))
        })?;

        let id = regs.documents.next_id();
        let document = Document {
            id,
            personnel_id: new.personnel_id,
            document_type: new.document_type,
            file_name: new.file_name,
            stored_path: stored_path.to_string_lossy().into_owned(),
            file_size: new.data.len() as u64,
            description: new.description,
            uploaded_by: actor_id.to_string(),
            created_at: time::now(),
        };
        let document = regs.documents.add(document).clone();

        AuditService::record(
            &mut regs,
            Some(actor_id),
            "upload_document",
            "document",
            &document.id,
            None,
        );
        self.db.flush(&regs.documents)?;
        self.db.flush(&regs.audit_log)?;
        Ok(document)
    }

    /// Fixed page size of 15, matching the admin document vault listing.
    pub async fn list(&self, filter: &DocumentFilter) -> (Vec<Document>, usize) {
        let regs = self.db.read().await;
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let matches: Vec<&Document> = regs.documents.find_all_where(|d| {
            if let Some(personnel_id) = &filter.personnel_id {
                if &d.personnel_id != personnel_id {
                    return false;
                }
            }
            if let Some(document_type) = &filter.document_type {
                if &d.document_type != document_type {
                    return false;
                }
            }
            if let Some(needle) = &needle {
                return d.file_name.to_lowercase().contains(needle)
                    || d.description
                        .as_deref()
                        .map(|desc| desc.to_lowercase().contains(needle))
                        .unwrap_or(false);
            }
            true
        });

        let total = matches.len();
        let page = filter.page.max(1);
        let items = matches
            .into_iter()
            .skip((page - 1) * DOCUMENTS_PAGE_SIZE)
            .take(DOCUMENTS_PAGE_SIZE)
            .cloned()
            .collect();
        (items, total)
    }

    pub async fn get(&self, id: &str) -> Result<Document> {
        let regs = self.db.read().await;
        regs.documents
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Document {}", id)))
    }

    /// Returns the metadata and the file body; a record whose file has gone
    /// missing from disk reads as not found.
    pub async fn download(&self, id: &str) -> Result<(Document, Vec<u8>)> {
        let document = self.get(id).await?;
        match tokio::fs::read(&document.stored_path).await {
            Ok(data) => Ok((document, data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotFound(format!(
                "File for document {} is missing from disk",
                id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the file first, then the record.
    pub async fn delete(&self, id: &str, actor_id: &str) -> Result<()> {
        let mut regs = self.db.write().await;

        let document = regs
            .documents
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Document {}", id)))?;

        if let Err(e) = tokio::fs::remove_file(&document.stored_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e.into());
            }
            tracing::warn!(document = %id, "file already missing from disk");
        }

        regs.documents.remove(id)?;
        AuditService::record(
            &mut regs,
            Some(actor_id),
            "delete_document",
            "document",
            id,
            None,
        );
        self.db.flush(&regs.documents)?;
        self.db.flush(&regs.audit_log)?;
        Ok(())
    }
}
