use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use crate::registry::Db;
use crate::services::audit_service::AuditService;
use crate::utils::{crypto, time};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub contractor_id: Option<String>,
    pub max_interviews: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
    pub max_interviews: Option<u32>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct UserService {
    db: Db,
}

impl UserService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewUser, actor_id: &str) -> Result<User> {
        let mut regs = self.db.write().await;

        let email_taken = regs
            .users
            .all()
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&new.email));
        if email_taken {
            return Err(Error::BadRequest(
                "A user with this email already exists".to_string(),
            ));
        }
        match new.role {
            Role::Contractor => {
                let contractor_id = new.contractor_id.as_deref().ok_or_else(|| {
                    Error::BadRequest("Contractor users must be linked to a contractor".to_string())
                })?;
                regs.contractors
                    .find_by_id(contractor_id)
                    .ok_or_else(|| Error::NotFound(format!("Contractor {}", contractor_id)))?;
            }
            _ if new.contractor_id.is_some() => {
                return Err(Error::BadRequest(
                    "Only contractor users may be linked to a contractor".to_string(),
                ));
            }
            _ => {}
        }

        let password_hash = crypto::hash_password(&new.password)?;
        let id = regs.users.next_id();
        let user = User {
            id,
            name: new.name,
            email: new.email,
            password_hash: Some(password_hash),
            role: new.role,
            contractor_id: new.contractor_id,
            max_interviews: new.max_interviews,
            is_active: true,
            created_at: time::now(),
        };
        let user = regs.users.add(user).clone();

        AuditService::record(&mut regs, Some(actor_id), "create_user", "user", &user.id, None);
        self.db.flush(&regs.users)?;
        self.db.flush(&regs.audit_log)?;
        Ok(user)
    }

    pub async fn update(&self, id: &str, update: UserUpdate, actor_id: &str) -> Result<User> {
        let mut regs = self.db.write().await;

        let mut user = regs
            .users
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(password) = update.password {
            user.password_hash = Some(crypto::hash_password(&password)?);
        }
        if let Some(max_interviews) = update.max_interviews {
            user.max_interviews = Some(max_interviews);
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        regs.users.update(user.clone())?;

        AuditService::record(&mut regs, Some(actor_id), "update_user", "user", id, None);
        self.db.flush(&regs.users)?;
        self.db.flush(&regs.audit_log)?;
        Ok(user)
    }

    /// Blocked while the user is still on record as an interviewer or
    /// reviewer.
    pub async fn delete(&self, id: &str, actor_id: &str) -> Result<()> {
        let mut regs = self.db.write().await;

        regs.users
            .find_by_id(id)
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))?;

        let interviews = regs
            .interviews
            .find_all_where(|i| i.interviewer_id == id)
            .len();
        if interviews > 0 {
            return Err(Error::DependencyExists(format!(
                "User {} is assigned to {} interview(s)",
                id, interviews
            )));
        }
        let reviews = regs.reviews.find_all_where(|r| r.reviewer_id == id).len();
        if reviews > 0 {
            return Err(Error::DependencyExists(format!(
                "User {} authored {} review(s)",
                id, reviews
            )));
        }

        regs.users.remove(id)?;
        AuditService::record(&mut regs, Some(actor_id), "delete_user", "user", id, None);
        self.db.flush(&regs.users)?;
        self.db.flush(&regs.audit_log)?;
        Ok(())
    }

    pub async fn list(&self) -> Vec<User> {
        let regs = self.db.read().await;
        regs.users.all().to_vec()
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        let regs = self.db.read().await;
        regs.users
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// Email + password check for login. The same error covers unknown email,
    /// wrong password, and deactivated accounts.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let regs = self.db.read().await;
        let user = regs
            .users
            .all()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| Error::Unauthorized("Invalid email or password".to_string()))?;
        if !user.is_active {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }
        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| Error::Unauthorized("Invalid email or password".to_string()))?;
        if !crypto::verify_password(password, hash)? {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }
        Ok(user)
    }

    /// Seeds the first superadmin on an empty user registry.
    pub async fn bootstrap_superadmin(&self, email: &str, password: &str) -> Result<Option<User>> {
        let mut regs = self.db.write().await;
        if !regs.users.is_empty() {
            return Ok(None);
        }
        let password_hash = crypto::hash_password(password)?;
        let id = regs.users.next_id();
        let user = User {
            id,
            name: "Superadmin".to_string(),
            email: email.to_string(),
            password_hash: Some(password_hash),
            role: Role::Superadmin,
            contractor_id: None,
            max_interviews: None,
            is_active: true,
            created_at: time::now(),
        };
        let user = regs.users.add(user).clone();
        self.db.flush(&regs.users)?;
        tracing::info!(user = %user.id, "bootstrap superadmin created");
        Ok(Some(user))
    }
}
