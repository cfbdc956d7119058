//! In-process implementation of the friend code stores.
//!
//! Mirrors the `PostgreSQL` semantics (case-insensitive identifiers, ordering,
//! guild grouping) so command handling can run without a database.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::store::{CodeStore, PreferenceStore, StoreError};
use super::types::{
    summary_line, FriendCode, FriendCodeEntry, GuildCodeSummary, Identifier, UserPreference,
    Visibility,
};

#[derive(Default)]
pub struct MemoryStore {
    codes: DashMap<Uuid, Vec<FriendCodeEntry>>,
    preferences: DashMap<Uuid, UserPreference>,
}

fn sort_key(entry: &FriendCodeEntry) -> (String, String) {
    (entry.identifier.to_lowercase(), entry.identifier.clone())
}

fn sorted(mut entries: Vec<FriendCodeEntry>) -> Vec<FriendCodeEntry> {
    entries.sort_by_key(sort_key);
    entries
}

impl MemoryStore {
    fn update_preference(&self, owner: Uuid, apply: impl FnOnce(&mut UserPreference)) {
        let mut preference = self.preferences.entry(owner).or_insert_with(|| UserPreference {
            owner,
            visibility: None,
            home_guild: None,
            updated_at: Utc::now(),
        });
        apply(&mut preference);
        preference.updated_at = Utc::now();
    }
}

#[async_trait]
impl CodeStore for MemoryStore {
    async fn upsert(
        &self,
        owner: Uuid,
        identifier: &Identifier,
        code: &FriendCode,
    ) -> Result<(), StoreError> {
        let key = identifier.as_str().to_lowercase();
        let mut entries = self.codes.entry(owner).or_default();

        match entries
            .iter()
            .position(|e| e.identifier.to_lowercase() == key)
        {
            Some(index) => entries[index].code = code.as_str().to_string(),
            None => entries.push(FriendCodeEntry {
                owner,
                identifier: identifier.as_str().to_string(),
                code: code.as_str().to_string(),
            }),
        }

        Ok(())
    }

    async fn list(
        &self,
        owner: Uuid,
        filter: Option<&str>,
    ) -> Result<Vec<FriendCodeEntry>, StoreError> {
        let needle = filter.unwrap_or_default().to_lowercase();
        let entries: Vec<FriendCodeEntry> = self
            .codes
            .get(&owner)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.identifier.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(sorted(entries))
    }

    async fn remove(&self, owner: Uuid, identifier: &str) -> Result<u64, StoreError> {
        let key = identifier.to_lowercase();
        let Some(mut entries) = self.codes.get_mut(&owner) else {
            return Ok(0);
        };

        let before = entries.len();
        entries.retain(|e| e.identifier.to_lowercase() != key);
        Ok((before - entries.len()) as u64)
    }

    async fn list_by_home_guild(
        &self,
        guild_id: Uuid,
    ) -> Result<Vec<GuildCodeSummary>, StoreError> {
        let members: Vec<Uuid> = self
            .preferences
            .iter()
            .filter(|p| p.home_guild == Some(guild_id))
            .map(|p| p.owner)
            .collect();

        let mut groups: Vec<(String, GuildCodeSummary)> = members
            .into_iter()
            .filter_map(|owner| {
                let entries = sorted(self.codes.get(&owner)?.value().clone());
                let first = entries.first()?.identifier.to_lowercase();
                let lines = entries
                    .iter()
                    .map(|e| summary_line(&e.identifier, &e.code))
                    .collect::<Vec<_>>()
                    .join("\n");
                Some((first, GuildCodeSummary { owner, lines }))
            })
            .collect();

        groups.sort_by(|(a, sa), (b, sb)| a.cmp(b).then(sa.owner.cmp(&sb.owner)));
        Ok(groups.into_iter().map(|(_, summary)| summary).collect())
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, owner: Uuid) -> Result<Option<UserPreference>, StoreError> {
        Ok(self.preferences.get(&owner).map(|p| p.value().clone()))
    }

    async fn set_visibility(&self, owner: Uuid, visibility: Visibility) -> Result<(), StoreError> {
        self.update_preference(owner, |p| p.visibility = Some(visibility));
        Ok(())
    }

    async fn set_home_guild(&self, owner: Uuid, guild_id: Uuid) -> Result<(), StoreError> {
        self.update_preference(owner, |p| p.home_guild = Some(guild_id));
        Ok(())
    }
}
