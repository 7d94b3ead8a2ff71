use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserId};

/// Persistence boundary for user accounts.
///
/// Soft-deleted rows are invisible to every method: reads report them as
/// missing, and `update`/`delete` fail with `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account; the store assigns `id` and timestamps.
    /// A live account with the same email yields `DuplicateEmail`.
    async fn create(&self, user: NewUser) -> UserResult<User>;

    async fn get_by_id(&self, id: UserId) -> UserResult<User>;

    async fn get_by_email(&self, email: &str) -> UserResult<User>;

    /// Overwrite name, email, password hash and `updated_at`.
    async fn update(&self, user: User) -> UserResult<User>;

    /// Soft delete
    async fn delete(&self, id: UserId) -> UserResult<()>;

    /// Live accounts in id order
    async fn get_all(&self, limit: u64, offset: u64) -> UserResult<Vec<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &BTreeMap<UserId, User>, email: &str, except: Option<UserId>) -> bool {
    users
        .values()
        .any(|u| u.deleted_at.is_none() && u.email == email && Some(u.id) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if email_taken(&users, &user.email, None) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        // Ids are never reused, soft-deleted rows keep theirs.
        let id = users.keys().next_back().map_or(1, |last| last + 1);
        let now = Utc::now();
        let user = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.insert(id, user.clone());

        tracing::info!(user_id = %id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> UserResult<User> {
        let users = self.users.read().await;
        users
            .get(&id)
            .filter(|u| u.deleted_at.is_none())
            .cloned()
            .ok_or(UserError::NotFound(id))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.deleted_at.is_none() && u.email == email)
            .cloned()
            .ok_or_else(|| UserError::EmailNotFound(email.to_string()))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if email_taken(&users, &user.email, Some(user.id)) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let stored = users
            .get_mut(&user.id)
            .filter(|u| u.deleted_at.is_none())
            .ok_or(UserError::NotFound(user.id))?;

        stored.name = user.name;
        stored.email = user.email;
        stored.password_hash = user.password_hash;
        stored.updated_at = Utc::now();

        tracing::info!(user_id = %stored.id, "Updated user");
        Ok(stored.clone())
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        let mut users = self.users.write().await;

        let stored = users
            .get_mut(&id)
            .filter(|u| u.deleted_at.is_none())
            .ok_or(UserError::NotFound(id))?;
        stored.deleted_at = Some(Utc::now());

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    async fn get_all(&self, limit: u64, offset: u64) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.deleted_at.is_none())
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(new_user("One", "one@example.com")).await.unwrap();
        let second = repo.create(new_user("Two", "two@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
        assert!(first.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_and_email() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("Ada", "ada@example.com")).await.unwrap();

        assert_eq!(repo.get_by_id(created.id).await.unwrap(), created);
        assert_eq!(repo.get_by_email("ada@example.com").await.unwrap().id, created.id);

        assert!(matches!(repo.get_by_id(999).await, Err(UserError::NotFound(999))));
        assert!(matches!(
            repo.get_by_email("nobody@example.com").await,
            Err(UserError::EmailNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("One", "same@example.com")).await.unwrap();

        let result = repo.create(new_user("Two", "same@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_user_and_frees_email() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("Ada", "ada@example.com")).await.unwrap();

        repo.delete(created.id).await.unwrap();

        assert!(matches!(repo.get_by_id(created.id).await, Err(UserError::NotFound(_))));
        assert!(repo.get_by_email("ada@example.com").await.is_err());
        assert!(repo.get_all(10, 0).await.unwrap().is_empty());
        assert!(matches!(repo.delete(created.id).await, Err(UserError::NotFound(_))));

        let again = repo.create(new_user("Ada", "ada@example.com")).await.unwrap();
        assert_ne!(again.id, created.id);
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.create(new_user("Ada", "ada@example.com")).await.unwrap();

        user.name = "Ada King".to_string();
        user.email = "king@example.com".to_string();
        user.password_hash = "new-hash".to_string();
        let updated = repo.update(user.clone()).await.unwrap();

        assert_eq!(updated.name, "Ada King");
        assert_eq!(updated.email, "king@example.com");
        assert_eq!(updated.password_hash, "new-hash");
        assert_eq!(updated.created_at, user.created_at);
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_other_user() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("One", "one@example.com")).await.unwrap();
        let mut two = repo.create(new_user("Two", "two@example.com")).await.unwrap();

        two.email = "one@example.com".to_string();
        assert!(matches!(repo.update(two).await, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let mut ghost = repo.create(new_user("Ghost", "ghost@example.com")).await.unwrap();
        repo.delete(ghost.id).await.unwrap();

        ghost.name = "Still gone".to_string();
        assert!(matches!(repo.update(ghost).await, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_all_pages_in_id_order() {
        let repo = InMemoryUserRepository::new();
        for i in 1..=5 {
            repo.create(new_user("User", &format!("u{i}@example.com"))).await.unwrap();
        }
        repo.delete(2).await.unwrap();

        let page: Vec<UserId> = repo.get_all(2, 1).await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(page, vec![3, 4]);

        let all: Vec<UserId> = repo.get_all(10, 0).await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(all, vec![1, 3, 4, 5]);

        assert!(repo.get_all(10, 10).await.unwrap().is_empty());
    }
}
