//! # User Repository
//!
//! Users appear as the actor on stock transactions and activity logs.
//! Authentication lives outside this crate; only identity and role are kept.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{entities, validation, User, UserRole};

const USER_COLUMNS: &str = "user_id, username, full_name, role, is_active, created_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts an active user.
    ///
    /// ## Returns
    /// * `Ok(User)` - Inserted user
    /// * `Err(DbError::Validation)` - Username blank or too long
    /// * `Err(DbError::UniqueViolation)` - Username already taken
    pub async fn create(
        &self,
        username: &str,
        full_name: Option<&str>,
        role: UserRole,
    ) -> DbResult<User> {
        validation::validate_username(username)?;

        debug!(username = %username, role = %role, "Inserting user");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, full_name, role, is_active, created_at)
            VALUES (?1, ?2, ?3, 1, ?4)
            "#,
        )
        .bind(username)
        .bind(full_name)
        .bind(role)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, username),
            other => other,
        })?;

        Ok(User {
            user_id: result.last_insert_rowid(),
            username: username.to_string(),
            full_name: full_name.map(str::to_string),
            role,
            is_active: true,
            created_at: now,
        })
    }

    /// Gets a user by ID, active or not.
    pub async fn get_by_id(&self, user_id: i64) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE user_id = ?1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets an active user by username. Deactivated users are not returned.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE username = ?1 AND is_active = 1",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Marks a user inactive. History referencing the user is kept.
    pub async fn deactivate(&self, user_id: i64) -> DbResult<()> {
        debug!(user_id, "Deactivating user");

        let result = sqlx::query("UPDATE users SET is_active = 0 WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(entities::USER, user_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .create("jdoe", Some("Jane Doe"), UserRole::Admin)
            .await
            .unwrap();

        let by_id = repo.get_by_id(user.user_id).await.unwrap().unwrap();
        assert_eq!(by_id, user);

        let by_name = repo.get_by_username("jdoe").await.unwrap().unwrap();
        assert_eq!(by_name.role, UserRole::Admin);
        assert!(by_name.is_active);
    }

    #[tokio::test]
    async fn test_deactivated_user_hidden_from_username_lookup() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo.create("clerk", None, UserRole::Staff).await.unwrap();
        repo.deactivate(user.user_id).await.unwrap();

        assert!(repo.get_by_username("clerk").await.unwrap().is_none());
        let kept = repo.get_by_id(user.user_id).await.unwrap().unwrap();
        assert!(!kept.is_active);
    }

    #[tokio::test]
    async fn test_deactivate_unknown_user() {
        let db = test_db().await;
        let err = db.users().deactivate(404).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_blank_username_rejected() {
        let db = test_db().await;
        let err = db
            .users()
            .create("   ", None, UserRole::Viewer)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;
        let repo = db.users();

        repo.create("jdoe", None, UserRole::Staff).await.unwrap();
        let err = repo.create("jdoe", None, UserRole::Viewer).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
