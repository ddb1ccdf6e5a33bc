//! # Category Repository
//!
//! Categories group inventory items. Names are unique.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::Category;

const CATEGORY_COLUMNS: &str = "category_id, category_name, description, created_at";

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - Inserted category with its generated id
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    /// * `Err(DbError::ConstraintViolation)` - Name blank or over 100 chars
    pub async fn create(&self, name: &str, description: Option<&str>) -> DbResult<Category> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in_tx(&mut conn, name, description, Utc::now()).await
    }

    pub(crate) async fn insert_in_tx(
        conn: &mut SqliteConnection,
        name: &str,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> DbResult<Category> {
        debug!(name = %name, "Inserting category");

        let result = sqlx::query(
            r#"
            INSERT INTO categories (category_name, description, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
            other => other,
        })?;

        Ok(Category {
            category_id: result.last_insert_rowid(),
            category_name: name.to_string(),
            description: description.map(str::to_string),
            created_at: now,
        })
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, category_id: i64) -> DbResult<Option<Category>> {
        let sql = format!(
            "SELECT {} FROM categories WHERE category_id = ?1",
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Lists every category, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let sql = format!(
            "SELECT {} FROM categories ORDER BY category_name ASC, category_id ASC",
            CATEGORY_COLUMNS
        );
        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    /// Counts categories.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::repository::test_support::test_db;

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let repo = db.categories();

        let created = repo.create("Hardware", Some("Nuts and bolts")).await.unwrap();
        assert!(created.category_id > 0);

        let fetched = repo.get_by_id(created.category_id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let db = test_db().await;
        assert!(db.categories().get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        let repo = db.categories();

        repo.create("Hardware", None).await.unwrap();
        let err = repo.create("Hardware", None).await.unwrap_err();

        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "Hardware"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_name() {
        let db = test_db().await;
        let repo = db.categories();

        repo.create("Tools", None).await.unwrap();
        repo.create("Electrical", None).await.unwrap();
        repo.create("Paint", None).await.unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.category_name)
            .collect();
        assert_eq!(names, vec!["Electrical", "Paint", "Tools"]);
    }
}
