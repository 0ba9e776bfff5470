use crate::error::{Error, Result};
use crate::models::{
    application::Application, audit_log::AuditEntry, certificate::Certificate,
    contractor::Contractor, document::Document, interview::Interview, job_position::JobPosition,
    review::Review, user::User, worker::Worker,
};
use crate::store::json_store::JsonStore;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Anything that lives in a registry: a stable string id, a collection file
/// name, and an id prefix for sequence ids (`APP001`, `WRK002`, ...).
pub trait Entity: Clone + Serialize + DeserializeOwned {
    const COLLECTION: &'static str;
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
}

macro_rules! impl_entity {
    ($ty:ty, $collection:literal, $prefix:literal) => {
        impl Entity for $ty {
            const COLLECTION: &'static str = $collection;
            const ID_PREFIX: &'static str = $prefix;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

impl_entity!(User, "users", "USR");
impl_entity!(Contractor, "contractors", "CTR");
impl_entity!(Worker, "workers", "WRK");
impl_entity!(JobPosition, "job_positions", "POS");
impl_entity!(Application, "applications", "APP");
impl_entity!(Interview, "interviews", "INT");
impl_entity!(Review, "reviews", "RVW");
impl_entity!(Certificate, "certificates", "CERT");
impl_entity!(Document, "documents", "DOC");
impl_entity!(AuditEntry, "audit_log", "LOG");

/// In-memory collection with the CRUD surface the handlers need. Lookups are
/// linear scans; collections here are small and order matters for histories.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Registry<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_all_where<'a, P>(&'a self, predicate: P) -> Vec<&'a T>
    where
        P: Fn(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).collect()
    }

    pub fn add(&mut self, item: T) -> &T {
        self.items.push(item);
        self.items.last().expect("just pushed")
    }

    /// Replaces the stored record with the same id.
    pub fn update(&mut self, item: T) -> Result<()> {
        let slot = self
            .items
            .iter_mut()
            .find(|existing| existing.id() == item.id())
            .ok_or_else(|| Error::NotFound(format!("{} {}", T::COLLECTION, item.id())))?;
        *slot = item;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<T> {
        let idx = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| Error::NotFound(format!("{} {}", T::COLLECTION, id)))?;
        Ok(self.items.remove(idx))
    }

    pub fn retain<P>(&mut self, predicate: P)
    where
        P: FnMut(&T) -> bool,
    {
        self.items.retain(predicate);
    }

    /// Next sequence id for this collection: highest existing numeric suffix
    /// plus one, so ids stay unique across deletes.
    pub fn next_id(&self) -> String {
        let max = self
            .items
            .iter()
            .filter_map(|item| item.id().strip_prefix(T::ID_PREFIX))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{}{:03}", T::ID_PREFIX, max + 1)
    }
}

/// Every entity collection, loaded wholesale from the store at startup.
#[derive(Debug, Default)]
pub struct Registries {
    pub users: Registry<User>,
    pub contractors: Registry<Contractor>,
    pub workers: Registry<Worker>,
    pub job_positions: Registry<JobPosition>,
    pub applications: Registry<Application>,
    pub interviews: Registry<Interview>,
    pub reviews: Registry<Review>,
    pub certificates: Registry<Certificate>,
    pub documents: Registry<Document>,
    pub audit_log: Registry<AuditEntry>,
}

impl Registries {
    pub fn load(store: &JsonStore) -> Result<Self> {
        Ok(Self {
            users: Registry::from_items(store.load(User::COLLECTION)?),
            contractors: Registry::from_items(store.load(Contractor::COLLECTION)?),
            workers: Registry::from_items(store.load(Worker::COLLECTION)?),
            job_positions: Registry::from_items(store.load(JobPosition::COLLECTION)?),
            applications: Registry::from_items(store.load(Application::COLLECTION)?),
            interviews: Registry::from_items(store.load(Interview::COLLECTION)?),
            reviews: Registry::from_items(store.load(Review::COLLECTION)?),
            certificates: Registry::from_items(store.load(Certificate::COLLECTION)?),
            documents: Registry::from_items(store.load(Document::COLLECTION)?),
            audit_log: Registry::from_items(store.load(AuditEntry::COLLECTION)?),
        })
    }
}

/// The application context: all registries behind one lock, plus the store
/// they flush to. Cloned into every service; owned by the composition root.
#[derive(Clone)]
pub struct Db {
    registries: Arc<RwLock<Registries>>,
    store: JsonStore,
}

impl Db {
    pub fn open(store: JsonStore) -> Result<Self> {
        let registries = Registries::load(&store)?;
        Ok(Self {
            registries: Arc::new(RwLock::new(registries)),
            store,
        })
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Registries> {
        self.registries.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Registries> {
        self.registries.write().await
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Persists one collection. Called with the write guard still held so a
    /// concurrent mutation cannot interleave between change and flush.
    pub fn flush<T: Entity>(&self, registry: &Registry<T>) -> Result<()> {
        self.store.save(T::COLLECTION, registry.all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn contractor(id: &str) -> Contractor {
        Contractor {
            id: id.into(),
            company_name: format!("Company {}", id),
            field: None,
            address: None,
            contact_person: None,
            email: format!("{}@example.com", id.to_lowercase()),
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn next_id_skips_gaps_left_by_deletes() {
        let mut registry: Registry<Contractor> = Registry::default();
        assert_eq!(registry.next_id(), "CTR001");
        registry.add(contractor("CTR001"));
        registry.add(contractor("CTR002"));
        registry.remove("CTR001").expect("remove");
        assert_eq!(registry.next_id(), "CTR003");
    }

    #[test]
    fn update_and_remove_report_missing_ids() {
        let mut registry: Registry<Contractor> = Registry::default();
        assert!(matches!(
            registry.update(contractor("CTR009")),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(registry.remove("CTR009"), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn registries_round_trip_through_store() {
        let dir = std::env::temp_dir().join(format!("sbtc-db-{}", uuid::Uuid::new_v4()));
        let store = JsonStore::open(dir).expect("store");
        let db = Db::open(store.clone()).expect("db");

        {
            let mut regs = db.write().await;
            let id = regs.contractors.next_id();
            regs.contractors.add(contractor(&id));
            db.flush(&regs.contractors).expect("flush");
        }

        let reloaded = Registries::load(&store).expect("reload");
        assert_eq!(reloaded.contractors.len(), 1);
        assert!(reloaded.contractors.find_by_id("CTR001").is_some());
    }
}
