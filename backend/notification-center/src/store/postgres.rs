/// Postgres-backed notification store
///
/// Records live in the `notifications` table (see `migrations/`). A NULL
/// `target_id` means a broadcast record; a non-NULL value addresses one
/// member. Batch read-marking is a single UPDATE statement, so it applies
/// atomically and rolls back as a unit on failure.
use crate::error::Result;
use crate::models::{NewNotification, Notification, TargetScope};
use crate::scope::ScopeFilter;
use crate::store::{DeleteOutcome, NotificationStore};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

pub struct PgNotificationStore {
    db: PgPool,
}

impl PgNotificationStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Notification {
        let target = match row.get::<Option<Uuid>, _>("target_id") {
            Some(member_id) => TargetScope::Member(member_id),
            None => TargetScope::Broadcast,
        };

        Notification {
            id: row.get("id"),
            message: row.get("message"),
            target,
            image_url: row.get("image_url"),
            is_read: row.get("is_read"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn query(&self, filter: &ScopeFilter) -> Result<Vec<Notification>> {
        let rows = match filter {
            ScopeFilter::Nothing => return Ok(Vec::new()),
            ScopeFilter::All => {
                let query = r#"
                    SELECT id, message, target_id, image_url, is_read, created_at
                    FROM notifications
                    ORDER BY created_at DESC, id ASC
                "#;
                sqlx::query(query).fetch_all(&self.db).await?
            }
            ScopeFilter::MemberOnly(member_id) => {
                let query = r#"
                    SELECT id, message, target_id, image_url, is_read, created_at
                    FROM notifications
                    WHERE target_id = $1
                    ORDER BY created_at DESC, id ASC
                "#;
                sqlx::query(query)
                    .bind(member_id)
                    .fetch_all(&self.db)
                    .await?
            }
        };

        Ok(rows.iter().map(Self::from_row).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Notification>> {
        let query = r#"
            SELECT id, message, target_id, image_url, is_read, created_at
            FROM notifications
            WHERE id = $1
        "#;

        let row = sqlx::query(query).bind(id).fetch_optional(&self.db).await?;
        Ok(row.as_ref().map(Self::from_row))
    }

    async fn unread_ids(&self, filter: &ScopeFilter) -> Result<Vec<Uuid>> {
        let rows = match filter {
            ScopeFilter::Nothing => return Ok(Vec::new()),
            ScopeFilter::All => {
                let query = r#"
                    SELECT id FROM notifications
                    WHERE is_read = FALSE
                    ORDER BY created_at DESC, id ASC
                "#;
                sqlx::query(query).fetch_all(&self.db).await?
            }
            ScopeFilter::MemberOnly(member_id) => {
                let query = r#"
                    SELECT id FROM notifications
                    WHERE is_read = FALSE AND target_id = $1
                    ORDER BY created_at DESC, id ASC
                "#;
                sqlx::query(query)
                    .bind(member_id)
                    .fetch_all(&self.db)
                    .await?
            }
        };

        Ok(rows.iter().map(|row| row.get("id")).collect())
    }

    async fn count_unread(&self, filter: &ScopeFilter) -> Result<u64> {
        let count: i64 = match filter {
            ScopeFilter::Nothing => 0,
            ScopeFilter::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE is_read = FALSE")
                    .fetch_one(&self.db)
                    .await?
            }
            ScopeFilter::MemberOnly(member_id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM notifications WHERE is_read = FALSE AND target_id = $1",
                )
                .bind(member_id)
                .fetch_one(&self.db)
                .await?
            }
        };

        Ok(count as u64)
    }

    async fn mark_read(&self, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        // One statement: applies as an atomic unit, and ids deleted since the
        // snapshot was taken simply match no row instead of failing the batch.
        let query = r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = ANY($1) AND is_read = FALSE
        "#;

        let result = sqlx::query(query).bind(ids).execute(&self.db).await?;
        debug!(requested = ids.len(), updated = result.rows_affected(), "Marked notifications read");
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            Ok(DeleteOutcome::NotFound)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }

    async fn insert(&self, new: NewNotification) -> Result<Notification> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        let query = r#"
            INSERT INTO notifications (id, message, target_id, image_url, is_read, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(&new.message)
            .bind(new.target.member_id())
            .bind(&new.image_url)
            .bind(created_at)
            .execute(&self.db)
            .await?;

        Ok(Notification {
            id,
            message: new.message,
            target: new.target,
            image_url: new.image_url,
            is_read: false,
            created_at,
        })
    }
}
