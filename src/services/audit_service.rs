use crate::models::audit_log::AuditEntry;
use crate::registry::{Db, Registries};
use serde_json::Value as JsonValue;

#[derive(Clone)]
pub struct AuditService {
    db: Db,
}

impl AuditService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Appends one audit entry. Callers hold the write guard and flush the
    /// audit collection together with whatever else they touched.
    pub(crate) fn record(
        regs: &mut Registries,
        user_id: Option<&str>,
        action: &str,
        entity_type: &str,
        entity_id: &str,
        details: Option<JsonValue>,
    ) {
        let id = regs.audit_log.next_id();
        regs.audit_log.add(AuditEntry {
            id,
            user_id: user_id.map(str::to_string),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            details,
            created_at: crate::utils::time::now(),
        });
    }

    /// Newest entries first.
    pub async fn list(&self, page: usize, per_page: usize) -> (Vec<AuditEntry>, usize) {
        let regs = self.db.read().await;
        let total = regs.audit_log.len();
        let start = page.saturating_sub(1).saturating_mul(per_page);
        let items = regs
            .audit_log
            .all()
            .iter()
            .rev()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();
        (items, total)
    }
}
