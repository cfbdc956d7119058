//! `PostgreSQL` implementation of the friend code stores.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::store::{CodeStore, PreferenceStore, StoreError};
use super::types::{FriendCode, FriendCodeEntry, GuildCodeSummary, Identifier, UserPreference, Visibility};

/// Stores backed by the `friend_codes` and `user_preferences` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build an `ILIKE` pattern matching `filter` anywhere, with wildcards escaped.
fn contains_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl CodeStore for PgStore {
    async fn upsert(
        &self,
        owner: Uuid,
        identifier: &Identifier,
        code: &FriendCode,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"INSERT INTO friend_codes (user_id, identifier, code)
               VALUES ($1, $2, $3)
               ON CONFLICT (user_id, (lower(identifier)))
               DO UPDATE SET code = EXCLUDED.code, updated_at = NOW()",
        )
        .bind(owner)
        .bind(identifier.as_str())
        .bind(code.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(
        &self,
        owner: Uuid,
        filter: Option<&str>,
    ) -> Result<Vec<FriendCodeEntry>, StoreError> {
        let entries = sqlx::query_as::<_, FriendCodeEntry>(
            r"SELECT user_id, identifier, code
               FROM friend_codes
               WHERE user_id = $1
                 AND identifier ILIKE $2 ESCAPE '\'
               ORDER BY lower(identifier) ASC, identifier ASC",
        )
        .bind(owner)
        .bind(contains_pattern(filter.unwrap_or_default()))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn remove(&self, owner: Uuid, identifier: &str) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r"DELETE FROM friend_codes
               WHERE user_id = $1
                 AND lower(identifier) = lower($2)",
        )
        .bind(owner)
        .bind(identifier)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_by_home_guild(
        &self,
        guild_id: Uuid,
    ) -> Result<Vec<GuildCodeSummary>, StoreError> {
        let summaries = sqlx::query_as::<_, GuildCodeSummary>(
            r"SELECT
                fc.user_id,
                string_agg(
                    fc.identifier || ': ' || fc.code,
                    E'\n'
                    ORDER BY lower(fc.identifier), fc.identifier
                ) AS lines
               FROM friend_codes fc
               JOIN user_preferences up ON up.user_id = fc.user_id
               WHERE up.home_guild = $1
               GROUP BY fc.user_id
               ORDER BY min(lower(fc.identifier)) ASC, fc.user_id ASC",
        )
        .bind(guild_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }
}

#[async_trait]
impl PreferenceStore for PgStore {
    async fn get(&self, owner: Uuid) -> Result<Option<UserPreference>, StoreError> {
        let preference = sqlx::query_as::<_, UserPreference>(
            r"SELECT user_id, fc_visibility, home_guild, updated_at
               FROM user_preferences
               WHERE user_id = $1",
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(preference)
    }

    async fn set_visibility(&self, owner: Uuid, visibility: Visibility) -> Result<(), StoreError> {
        sqlx::query(
            r"INSERT INTO user_preferences (user_id, fc_visibility)
               VALUES ($1, $2)
               ON CONFLICT (user_id)
               DO UPDATE SET fc_visibility = EXCLUDED.fc_visibility, updated_at = NOW()",
        )
        .bind(owner)
        .bind(visibility)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_home_guild(&self, owner: Uuid, guild_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r"INSERT INTO user_preferences (user_id, home_guild)
               VALUES ($1, $2)
               ON CONFLICT (user_id)
               DO UPDATE SET home_guild = EXCLUDED.home_guild, updated_at = NOW()",
        )
        .bind(owner)
        .bind(guild_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
