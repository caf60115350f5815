//! In-memory preference store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use socialhub_core::result::AppResult;
use socialhub_core::types::id::UserId;
use socialhub_entity::notification::NotificationPreference;

use crate::repositories::PreferenceRepository;

/// Preference store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryPreferenceRepository {
    items: RwLock<HashMap<UserId, NotificationPreference>>,
}

impl MemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceRepository for MemoryPreferenceRepository {
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Option<NotificationPreference>> {
        Ok(self.items.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, prefs: &NotificationPreference) -> AppResult<()> {
        self.items
            .write()
            .await
            .insert(prefs.user_id, prefs.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_row() {
        let repo = MemoryPreferenceRepository::new();
        let user = UserId::new();
        assert!(repo.find_by_user(user).await.unwrap().is_none());

        let mut prefs = NotificationPreference::default_for_user(user);
        repo.upsert(&prefs).await.unwrap();
        prefs.push_likes = false;
        repo.upsert(&prefs).await.unwrap();

        let stored = repo.find_by_user(user).await.unwrap().unwrap();
        assert!(!stored.push_likes);
    }
}
