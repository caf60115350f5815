//! In-memory user store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use socialhub_core::result::AppResult;
use socialhub_core::types::id::UserId;
use socialhub_entity::user::User;

use crate::repositories::UserRepository;

/// User store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    items: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user. Test helper.
    pub async fn add(&self, user: User) {
        self.items.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}
