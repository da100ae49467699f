use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Gadget, GadgetChanges, GadgetStatus};

/// Gadget persistence. Every read and write is scoped to an owner.
#[async_trait]
pub trait GadgetRepo: Send + Sync {
    async fn list_by_owner(
        &self,
        owner: Uuid,
        status: Option<GadgetStatus>,
    ) -> anyhow::Result<Vec<Gadget>>;

    /// `None` when `owner` is not a known user.
    async fn create(
        &self,
        owner: Uuid,
        name: &str,
        status: GadgetStatus,
    ) -> anyhow::Result<Option<Gadget>>;

    /// Applies `changes` to the gadget matching both `id` and `owner` in one
    /// step. `None` when no such gadget exists for that owner.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: GadgetChanges,
    ) -> anyhow::Result<Option<Gadget>>;
}

#[derive(Clone)]
pub struct PgGadgetRepo {
    db: PgPool,
}

impl PgGadgetRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GadgetRepo for PgGadgetRepo {
    async fn list_by_owner(
        &self,
        owner: Uuid,
        status: Option<GadgetStatus>,
    ) -> anyhow::Result<Vec<Gadget>> {
        let rows = sqlx::query_as::<_, Gadget>(
            r#"
            SELECT id, name, status, user_id, created_at, updated_at
              FROM gadgets
             WHERE user_id = $1
               AND ($2::gadget_status IS NULL OR status = $2)
             ORDER BY created_at ASC
            "#,
        )
        .bind(owner)
        .bind(status)
        .fetch_all(&self.db)
        .await
        .context("list gadgets by owner")?;
        Ok(rows)
    }

    async fn create(
        &self,
        owner: Uuid,
        name: &str,
        status: GadgetStatus,
    ) -> anyhow::Result<Option<Gadget>> {
        let gadget = sqlx::query_as::<_, Gadget>(
            r#"
            INSERT INTO gadgets (id, name, status, user_id)
            SELECT $1, $2, $3, u.id
              FROM users u
             WHERE u.id = $4
            RETURNING id, name, status, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(status)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("insert gadget")?;
        Ok(gadget)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: GadgetChanges,
    ) -> anyhow::Result<Option<Gadget>> {
        let gadget = sqlx::query_as::<_, Gadget>(
            r#"
            UPDATE gadgets
               SET name = COALESCE($3, name),
                   status = COALESCE($4, status),
                   updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING id, name, status, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(changes.name)
        .bind(changes.status)
        .fetch_optional(&self.db)
        .await
        .context("update owned gadget")?;
        Ok(gadget)
    }
}
