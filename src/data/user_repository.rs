use crate::domain::error::StoreError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User, UserChanges};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<u32, User>>>,
    next_id: Arc<AtomicU32>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU32::new(1)),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: NewUser) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        // Uniqueness check and insert stay under one write guard.
        if storage.values().any(|existing| existing.email == user.email) {
            debug!(email = %user.email, "Email already present in storage");
            return Err(StoreError::UniqueViolation("email").into());
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = User {
            id,
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
        };
        storage.insert(id, record.clone());
        debug!(
            user_id = record.id,
            email = %record.email,
            "User saved to memory storage"
        );
        Ok(record)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_by_id(&self, id: u32) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        trace!(user_id = id, "Looking up user by ID in storage");
        let user = storage.get(&id).cloned();
        match &user {
            Some(found) => {
                debug!(
                    user_id = found.id,
                    email = %found.email,
                    "User found in storage"
                );
            }
            None => {
                trace!(user_id = id, "User not found in storage");
            }
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        trace!(email = email, "Looking up user by email in storage");
        let user = storage.values().find(|u| u.email == email).cloned();
        match &user {
            Some(found) => {
                debug!(
                    user_id = found.id,
                    email = %found.email,
                    "User found in storage"
                );
            }
            None => {
                trace!(email = email, "User not found in storage");
            }
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let mut users: Vec<User> = storage.values().cloned().collect();
        users.sort_by_key(|user| user.id);
        debug!(count = users.len(), "Listed users from memory storage");
        Ok(users)
    }

    #[instrument(skip(self, changes), fields(user_id = id))]
    async fn update(&self, id: u32, changes: UserChanges) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        // A missing id fails before any uniqueness concern.
        if !storage.contains_key(&id) {
            return Err(StoreError::RecordNotFound.into());
        }
        if let Some(email) = &changes.email {
            if storage
                .values()
                .any(|other| other.id != id && other.email == *email)
            {
                debug!(email = %email, "Email already present in storage");
                return Err(StoreError::UniqueViolation("email").into());
            }
        }
        let user = storage.get_mut(&id).ok_or(StoreError::RecordNotFound)?;
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        debug!(user_id = user.id, email = %user.email, "User updated in memory storage");
        Ok(user.clone())
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn delete(&self, id: u32) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        let user = storage.remove(&id).ok_or(StoreError::RecordNotFound)?;
        debug!(user_id = user.id, email = %user.email, "User removed from memory storage");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(email: &str, name: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: name.to_string(),
            password_hash: "hash123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids_and_stores_fields() {
        let repo = InMemoryUserRepository::new();

        let alice = repo.create(sample("alice@example.com", "Alice")).await.unwrap();
        let bob = repo.create(sample("bob@example.com", "Bob")).await.unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);

        let retrieved = repo.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(retrieved.email, "alice@example.com");
        assert_eq!(retrieved.name, "Alice");
        assert_eq!(retrieved.password_hash, "hash123");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample("alice@example.com", "Alice")).await.unwrap();

        let err = repo
            .create(sample("alice@example.com", "Other Alice"))
            .await
            .unwrap_err();

        let store_err = err.downcast_ref::<StoreError>();
        assert!(matches!(store_err, Some(StoreError::UniqueViolation("email"))));
    }

    #[tokio::test]
    async fn test_find_by_email_finds_user_by_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample("alice@example.com", "Alice")).await.unwrap();

        let found = repo.find_by_email("alice@example.com").await.unwrap();

        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_find_by_email_returns_none_for_nonexistent_email() {
        let repo = InMemoryUserRepository::new();

        let found = repo.find_by_email("nonexistent@example.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample("Test@Example.com", "Tess")).await.unwrap();

        // Exact match should work
        let found = repo.find_by_email("Test@Example.com").await.unwrap();
        assert!(found.is_some());

        // Different case should not match
        let not_found = repo.find_by_email("test@example.com").await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_returns_none_for_nonexistent_id() {
        let repo = InMemoryUserRepository::new();

        let found = repo.find_by_id(99).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_all_returns_users_ordered_by_id() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample("carol@example.com", "Carol")).await.unwrap();
        repo.create(sample("alice@example.com", "Alice")).await.unwrap();
        repo.create(sample("bob@example.com", "Bob")).await.unwrap();

        let users = repo.find_all().await.unwrap();

        let ids: Vec<u32> = users.iter().map(|user| user.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_update_changes_only_provided_fields() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(sample("alice@example.com", "Alice")).await.unwrap();

        let changes = UserChanges {
            name: Some("Alice Cooper".to_string()),
            ..Default::default()
        };
        let updated = repo.update(created.id, changes).await.unwrap();

        assert_eq!(updated.name, "Alice Cooper");
        assert_eq!(updated.email, "alice@example.com");
        assert_eq!(updated.password_hash, "hash123");
    }

    #[tokio::test]
    async fn test_update_rejects_email_taken_by_another_user() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample("alice@example.com", "Alice")).await.unwrap();
        let bob = repo.create(sample("bob@example.com", "Bob")).await.unwrap();

        let changes = UserChanges {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };
        let err = repo.update(bob.id, changes).await.unwrap_err();

        let store_err = err.downcast_ref::<StoreError>();
        assert!(matches!(store_err, Some(StoreError::UniqueViolation("email"))));
    }

    #[tokio::test]
    async fn test_update_keeping_own_email_is_not_a_conflict() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(sample("alice@example.com", "Alice")).await.unwrap();

        let changes = UserChanges {
            email: Some("alice@example.com".to_string()),
            name: Some("Alice Cooper".to_string()),
            ..Default::default()
        };
        let updated = repo.update(created.id, changes).await.unwrap();

        assert_eq!(updated.name, "Alice Cooper");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_record_not_found() {
        let repo = InMemoryUserRepository::new();

        let err = repo.update(99, UserChanges::default()).await.unwrap_err();

        let store_err = err.downcast_ref::<StoreError>();
        assert!(matches!(store_err, Some(StoreError::RecordNotFound)));
    }

    #[tokio::test]
    async fn test_update_missing_user_with_taken_email_is_record_not_found() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample("alice@example.com", "Alice")).await.unwrap();

        let changes = UserChanges {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };
        let err = repo.update(999, changes).await.unwrap_err();

        let store_err = err.downcast_ref::<StoreError>();
        assert!(matches!(store_err, Some(StoreError::RecordNotFound)));
    }

    #[tokio::test]
    async fn test_delete_returns_the_removed_record() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(sample("alice@example.com", "Alice")).await.unwrap();

        let removed = repo.delete(created.id).await.unwrap();
        assert_eq!(removed.email, "alice@example.com");

        let err = repo.delete(created.id).await.unwrap_err();
        let store_err = err.downcast_ref::<StoreError>();
        assert!(matches!(store_err, Some(StoreError::RecordNotFound)));
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo_clone = repo.clone();
                let user = sample(&format!("user{}@example.com", i), &format!("User {}", i));
                tokio::spawn(async move { repo_clone.create(user).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }

        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn test_concurrent_reads() {
        let repo = InMemoryUserRepository::new();
        let created = repo
            .create(sample("concurrent@example.com", "Concurrent"))
            .await
            .unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let repo_clone = repo.clone();
                let id = created.id;
                tokio::spawn(async move { repo_clone.find_by_id(id).await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert!(result.is_some());
            assert_eq!(result.unwrap().email, "concurrent@example.com");
        }
    }
}
