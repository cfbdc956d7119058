//! Storage ports for friend codes and sharing preferences.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::memory::MemoryStore;
use super::postgres::PgStore;
use super::types::{FriendCode, FriendCodeEntry, GuildCodeSummary, Identifier, UserPreference, Visibility};

/// Storage failures. Never caused by user input.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Identifier → code records, per owner.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Insert the code, or replace it if the owner already uses this identifier.
    async fn upsert(
        &self,
        owner: Uuid,
        identifier: &Identifier,
        code: &FriendCode,
    ) -> Result<(), StoreError>;

    /// Entries whose identifier contains `filter` (case-insensitive), by identifier.
    async fn list(
        &self,
        owner: Uuid,
        filter: Option<&str>,
    ) -> Result<Vec<FriendCodeEntry>, StoreError>;

    /// Delete one entry. Returns the number of rows removed.
    async fn remove(&self, owner: Uuid, identifier: &str) -> Result<u64, StoreError>;

    /// Codes of every user whose home guild is `guild_id`, grouped by owner.
    async fn list_by_home_guild(&self, guild_id: Uuid)
        -> Result<Vec<GuildCodeSummary>, StoreError>;
}

/// Per-user visibility and home guild.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, owner: Uuid) -> Result<Option<UserPreference>, StoreError>;

    /// Stored visibility, `None` if the user never set one.
    async fn get_visibility(&self, owner: Uuid) -> Result<Option<Visibility>, StoreError> {
        Ok(self.get(owner).await?.and_then(|p| p.visibility))
    }

    async fn set_visibility(&self, owner: Uuid, visibility: Visibility) -> Result<(), StoreError>;

    async fn set_home_guild(&self, owner: Uuid, guild_id: Uuid) -> Result<(), StoreError>;
}

/// The stores a command runs against.
#[derive(Clone)]
pub struct Stores {
    pub codes: Arc<dyn CodeStore>,
    pub preferences: Arc<dyn PreferenceStore>,
}

impl Stores {
    /// Both stores backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            codes: store.clone(),
            preferences: store,
        }
    }

    /// Both stores backed by process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            codes: store.clone(),
            preferences: store,
        }
    }
}
