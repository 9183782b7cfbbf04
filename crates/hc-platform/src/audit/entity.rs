//! Event and Audit Log Rows
//!
//! Written by the unit of work in the same transaction as the change they
//! describe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::tsid::TsidGenerator;
use crate::usecase::{DomainEvent, SqliteQuery};

/// Split `holacracy.{aggregate}.{id}` into ("Aggregate", Some(id)).
fn parse_subject(subject: &str) -> (String, Option<String>) {
    let mut parts = subject.splitn(3, '.');
    let _prefix = parts.next();
    let aggregate = parts
        .next()
        .map(|s| {
            let mut chars = s.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .unwrap_or_else(|| "Unknown".to_string());
    (aggregate, parts.next().map(String::from))
}

/// Persisted domain event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub id: String,
    pub event_type: String,
    pub source: String,
    pub subject: String,
    pub time: DateTime<Utc>,
    pub spec_version: String,
    pub message_group: String,
    pub correlation_id: String,
    pub causation_id: Option<String>,
    pub execution_id: String,
    pub principal_id: String,
    /// Event payload as JSON text
    pub data: String,
}

impl StoredEvent {
    pub fn from_domain_event<E: DomainEvent>(event: &E) -> Self {
        Self {
            id: event.event_id().to_string(),
            event_type: event.event_type().to_string(),
            source: event.source().to_string(),
            subject: event.subject().to_string(),
            time: event.time(),
            spec_version: event.spec_version().to_string(),
            message_group: event.message_group().to_string(),
            correlation_id: event.correlation_id().to_string(),
            causation_id: event.causation_id().map(String::from),
            execution_id: event.execution_id().to_string(),
            principal_id: event.principal_id().to_string(),
            data: event.to_data_json(),
        }
    }

    pub(crate) fn insert(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO events (
                id, event_type, source, subject, time, spec_version, message_group,
                correlation_id, causation_id, execution_id, principal_id, data
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&self.id)
        .bind(&self.event_type)
        .bind(&self.source)
        .bind(&self.subject)
        .bind(self.time)
        .bind(&self.spec_version)
        .bind(&self.message_group)
        .bind(&self.correlation_id)
        .bind(&self.causation_id)
        .bind(&self.execution_id)
        .bind(&self.principal_id)
        .bind(&self.data)
    }
}

/// Audit log entry: who ran which command against which entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,

    /// Entity type affected, e.g. "Organization", "Invitation"
    pub entity_type: String,

    pub entity_id: Option<String>,

    /// Command type name, e.g. "CreateOrganizationCommand"
    pub operation: String,

    /// Full command payload as JSON
    pub operation_json: Option<String>,

    pub principal_id: Option<String>,

    pub performed_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn from_command<E: DomainEvent, C: Serialize>(event: &E, command: &C) -> Self {
        let operation = std::any::type_name::<C>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown")
            .to_string();
        let (entity_type, entity_id) = parse_subject(event.subject());

        Self {
            id: TsidGenerator::generate(),
            entity_type,
            entity_id,
            operation,
            operation_json: serde_json::to_string(command).ok(),
            principal_id: Some(event.principal_id().to_string()),
            performed_at: event.time(),
        }
    }

    pub(crate) fn insert(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id, entity_type, entity_id, operation, operation_json, principal_id, performed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&self.id)
        .bind(&self.entity_type)
        .bind(&self.entity_id)
        .bind(&self.operation)
        .bind(&self.operation_json)
        .bind(&self.principal_id)
        .bind(self.performed_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subject() {
        assert_eq!(
            parse_subject("holacracy.organization.0HZXEQ5Y8JY5Z"),
            ("Organization".to_string(), Some("0HZXEQ5Y8JY5Z".to_string()))
        );
        assert_eq!(parse_subject("holacracy"), ("Unknown".to_string(), None));
    }
}
