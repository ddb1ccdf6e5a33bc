//! # Activity Log Repository
//!
//! Audit trail of who did what. Entries are written once and never edited.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::order_by;
use crate::error::DbResult;
use stockroom_core::{validation, ActivityLog, ActivitySort, NewActivityLog, Page, PageRequest};

const LOG_COLUMNS: &str =
    "log_id, user_id, action, entity_type, entity_id, details, ip_address, created_at";

/// Repository for activity log database operations.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: SqlitePool,
}

impl ActivityLogRepository {
    /// Creates a new ActivityLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ActivityLogRepository { pool }
    }

    /// Appends an entry stamped with the current time.
    ///
    /// ## Returns
    /// * `Ok(ActivityLog)` - Recorded entry
    /// * `Err(DbError::Validation)` - Action blank or over 50 chars
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown user
    pub async fn record(&self, entry: &NewActivityLog) -> DbResult<ActivityLog> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in_tx(&mut conn, entry, Utc::now()).await
    }

    pub(crate) async fn insert_in_tx(
        conn: &mut SqliteConnection,
        entry: &NewActivityLog,
        at: DateTime<Utc>,
    ) -> DbResult<ActivityLog> {
        validation::validate_action(&entry.action)?;

        debug!(
            action = %entry.action,
            user_id = ?entry.user_id,
            entity_type = ?entry.entity_type,
            entity_id = ?entry.entity_id,
            "Recording activity"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO activity_logs (
                user_id, action, entity_type, entity_id, details, ip_address, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .bind(at)
        .execute(&mut *conn)
        .await?;

        Ok(ActivityLog {
            log_id: result.last_insert_rowid(),
            user_id: entry.user_id,
            action: entry.action.clone(),
            entity_type: entry.entity_type.clone(),
            entity_id: entry.entity_id,
            details: entry.details.clone(),
            ip_address: entry.ip_address.clone(),
            created_at: at,
        })
    }

    /// Entries made by one user. An unknown user yields an empty page.
    pub async fn find_page_by_user(
        &self,
        user_id: i64,
        request: PageRequest<ActivitySort>,
    ) -> DbResult<Page<ActivityLog>> {
        debug!(user_id, page = request.page(), "Finding activity by user");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM activity_logs WHERE user_id = ?1 {} LIMIT ?2 OFFSET ?3",
            LOG_COLUMNS,
            order_by(&request, None, "log_id", "log_id ASC")
        );
        let rows = sqlx::query_as::<_, ActivityLog>(&sql)
            .bind(user_id)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(rows, &request, total))
    }

    /// Entries whose action equals `action` exactly (case-sensitive).
    pub async fn find_page_by_action(
        &self,
        action: &str,
        request: PageRequest<ActivitySort>,
    ) -> DbResult<Page<ActivityLog>> {
        debug!(action = %action, page = request.page(), "Finding activity by action");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs WHERE action = ?1")
            .bind(action)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM activity_logs WHERE action = ?1 {} LIMIT ?2 OFFSET ?3",
            LOG_COLUMNS,
            order_by(&request, None, "log_id", "log_id ASC")
        );
        let rows = sqlx::query_as::<_, ActivityLog>(&sql)
            .bind(action)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(rows, &request, total))
    }

    /// All entries, newest first unless the request says otherwise.
    pub async fn recent(&self, request: PageRequest<ActivitySort>) -> DbResult<Page<ActivityLog>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM activity_logs {} LIMIT ?1 OFFSET ?2",
            LOG_COLUMNS,
            order_by(&request, None, "log_id", "created_at DESC, log_id DESC")
        );
        let rows = sqlx::query_as::<_, ActivityLog>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(rows, &request, total))
    }
}
