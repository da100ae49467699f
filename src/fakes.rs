//! In-memory stand-ins for the database and the name service.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
    gadgets::{
        repo::GadgetRepo,
        repo_types::{Gadget, GadgetChanges, GadgetStatus},
    },
    names::NameGenerator,
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    gadgets: Mutex<Vec<Gadget>>,
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new: NewUser<'_>) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new.email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new.email.to_string(),
            password_hash: new.password_hash.to_string(),
            name: new.name.map(str::to_string),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

#[async_trait]
impl GadgetRepo for MemoryStore {
    async fn list_by_owner(
        &self,
        owner: Uuid,
        status: Option<GadgetStatus>,
    ) -> anyhow::Result<Vec<Gadget>> {
        let gadgets = self.gadgets.lock().unwrap();
        Ok(gadgets
            .iter()
            .filter(|g| g.user_id == owner && status.map_or(true, |s| g.status == s))
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        owner: Uuid,
        name: &str,
        status: GadgetStatus,
    ) -> anyhow::Result<Option<Gadget>> {
        if !self.users.lock().unwrap().iter().any(|u| u.id == owner) {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let gadget = Gadget {
            id: Uuid::new_v4(),
            name: name.to_string(),
            status,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        self.gadgets.lock().unwrap().push(gadget.clone());
        Ok(Some(gadget))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: GadgetChanges,
    ) -> anyhow::Result<Option<Gadget>> {
        let mut gadgets = self.gadgets.lock().unwrap();
        let Some(gadget) = gadgets.iter_mut().find(|g| g.id == id && g.user_id == owner) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            gadget.name = name;
        }
        if let Some(status) = changes.status {
            gadget.status = status;
        }
        gadget.updated_at = OffsetDateTime::now_utc();
        Ok(Some(gadget.clone()))
    }
}

/// Name generator with a canned answer.
pub struct FixedNames(Option<String>);

impl FixedNames {
    pub fn ok(name: &str) -> Self {
        Self(Some(name.to_string()))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl NameGenerator for FixedNames {
    async fn generate(&self) -> anyhow::Result<String> {
        self.0
            .clone()
            .ok_or_else(|| anyhow::anyhow!("name service unavailable"))
    }
}
