use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{NewUser, User, UserId},
    repository::UserRepository,
};

/// PostgreSQL-backed [`UserRepository`].
///
/// Relies on the partial unique index `users(email) WHERE deleted_at IS NULL`
/// to reject duplicate live emails.
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn persistence(e: DbErr) -> UserError {
    UserError::Persistence(e.to_string())
}

/// Unique violations on a write can only come from the email index.
fn write_error(e: DbErr, email: &str) -> UserError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => persistence(e),
    }
}

fn live() -> sea_orm::Select<entity::Entity> {
    entity::Entity::find().filter(entity::Column::DeletedAt.is_null())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, &email))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: UserId) -> UserResult<User> {
        live()
            .filter(entity::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(persistence)?
            .map(Into::into)
            .ok_or(UserError::NotFound(id))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<User> {
        live()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(persistence)?
            .map(Into::into)
            .ok_or_else(|| UserError::EmailNotFound(email.to_string()))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let now = Utc::now().fixed_offset();

        let mut updated = entity::Entity::update_many()
            .col_expr(entity::Column::Name, Expr::value(user.name.clone()))
            .col_expr(entity::Column::Email, Expr::value(user.email.clone()))
            .col_expr(entity::Column::Password, Expr::value(user.password_hash.clone()))
            .col_expr(entity::Column::UpdatedAt, Expr::value(now))
            .filter(entity::Column::Id.eq(user.id))
            .filter(entity::Column::DeletedAt.is_null())
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| write_error(e, &user.email))?;

        let model = updated.pop().ok_or(UserError::NotFound(user.id))?;

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(model.into())
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::DeletedAt, Expr::value(Some(Utc::now().fixed_offset())))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(persistence)?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    async fn get_all(&self, limit: u64, offset: u64) -> UserResult<Vec<User>> {
        let models = live()
            .order_by_asc(entity::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(persistence)?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
