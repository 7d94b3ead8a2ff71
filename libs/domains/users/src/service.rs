use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, DEFAULT_PAGE_SIZE, NewUser, UpdateUser, User, UserId};
use crate::repository::UserRepository;

/// Account rules on top of a [`UserRepository`].
///
/// Repository errors pass through unchanged; the service only adds the
/// email-uniqueness conflict on create.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register an account. The email pre-check is not atomic with the
    /// insert; a concurrent loser still gets `DuplicateEmail` from the store.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        match self.repository.get_by_email(&input.email).await {
            Ok(_) => return Err(UserError::DuplicateEmail(input.email)),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let password_hash = hash_password(&input.password)?;
        self.repository
            .create(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await
    }

    pub async fn get_user_by_id(&self, id: UserId) -> UserResult<User> {
        self.repository.get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> UserResult<User> {
        self.repository.get_by_email(email).await
    }

    /// Replace name and email; the password changes only when one is given.
    ///
    /// Email uniqueness is not re-checked here; a collision surfaces from
    /// the store as `DuplicateEmail`.
    pub async fn update_user(&self, id: UserId, input: UpdateUser) -> UserResult<User> {
        let mut user = self.repository.get_by_id(id).await?;

        user.name = input.name;
        user.email = input.email;
        if let Some(password) = input.password.as_deref() {
            user.password_hash = hash_password(password)?;
        }

        self.repository.update(user).await
    }

    pub async fn delete_user(&self, id: UserId) -> UserResult<()> {
        self.repository.get_by_id(id).await?;
        self.repository.delete(id).await
    }

    /// `limit <= 0` means [`DEFAULT_PAGE_SIZE`], `offset < 0` means 0.
    pub async fn get_all_users(&self, limit: i64, offset: i64) -> UserResult<Vec<User>> {
        let limit = u64::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = u64::try_from(offset).unwrap_or(0);

        self.repository.get_all(limit, offset).await
    }
}

/// Check `candidate` against the stored hash of `user`.
pub fn verify_password(user: &User, candidate: &str) -> UserResult<bool> {
    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}
