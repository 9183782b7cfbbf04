//! Audit Log Repository

use sqlx::SqlitePool;

use super::entity::{AuditLog, StoredEvent};
use crate::shared::error::Result;

pub struct AuditLogRepository {
    pool: SqlitePool,
}

impl AuditLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Most recent first
    pub async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
        limit: i64,
    ) -> Result<Vec<AuditLog>> {
        let logs = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT * FROM audit_logs
            WHERE entity_type = ? AND entity_id = ?
            ORDER BY performed_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    /// Events for one aggregate, oldest first
    pub async fn find_events_by_subject(&self, subject: &str) -> Result<Vec<StoredEvent>> {
        let events = sqlx::query_as::<_, StoredEvent>(
            "SELECT * FROM events WHERE subject = ? ORDER BY time ASC, id ASC",
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}
