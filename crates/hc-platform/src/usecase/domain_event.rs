//! Domain Event Trait
//!
//! Base trait for all domain events. Events follow the CloudEvents structure
//! with additional fields for tracing and ordering.
//!
//! # Naming
//!
//! - Event type: `holacracy:{context}:{aggregate}:{action}`, e.g.
//!   `holacracy:governance:circle:created`
//! - Subject: `holacracy.{aggregate}.{id}`, e.g. `holacracy.circle.0HZXEQ5Y8JY5Z`
//! - Message group: `holacracy:{aggregate}:{id}`; events in one group are
//!   ordered

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::execution_context::ExecutionContext;
use crate::shared::tsid::TsidGenerator;

/// Base trait for all domain events (named in past tense).
pub trait DomainEvent: Send + Sync {
    fn event_id(&self) -> &str;

    /// `holacracy:{context}:{aggregate}:{action}`
    fn event_type(&self) -> &str;

    fn spec_version(&self) -> &str;

    fn source(&self) -> &str;

    /// `holacracy.{aggregate}.{id}`
    fn subject(&self) -> &str;

    fn time(&self) -> DateTime<Utc>;

    fn execution_id(&self) -> &str;

    fn correlation_id(&self) -> &str;

    fn causation_id(&self) -> Option<&str>;

    fn principal_id(&self) -> &str;

    fn message_group(&self) -> &str;

    /// Serialize the event-specific data payload to JSON.
    fn to_data_json(&self) -> String;
}

/// Common metadata for domain events.
///
/// Event structs embed this as a `metadata` field and use
/// [`impl_domain_event!`](crate::impl_domain_event) to delegate the trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub event_id: String,
    pub event_type: String,
    pub spec_version: String,
    pub source: String,
    pub subject: String,
    pub time: DateTime<Utc>,
    pub execution_id: String,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,
    pub principal_id: String,
    pub message_group: String,
}

impl EventMetadata {
    pub const SPEC_VERSION: &'static str = "1.0";

    /// Metadata for an event about `{aggregate}/{id}`, tracing fields copied
    /// from the execution context.
    pub fn for_aggregate(
        ctx: &ExecutionContext,
        event_type: &str,
        source: &str,
        aggregate: &str,
        aggregate_id: &str,
    ) -> Self {
        Self {
            event_id: TsidGenerator::generate(),
            event_type: event_type.to_string(),
            spec_version: Self::SPEC_VERSION.to_string(),
            source: source.to_string(),
            subject: format!("holacracy.{}.{}", aggregate, aggregate_id),
            time: Utc::now(),
            execution_id: ctx.execution_id.clone(),
            correlation_id: ctx.correlation_id.clone(),
            causation_id: ctx.causation_id.clone(),
            principal_id: ctx.principal_id.clone(),
            message_group: format!("holacracy:{}:{}", aggregate, aggregate_id),
        }
    }
}

/// Implements [`DomainEvent`] by delegating to a `metadata: EventMetadata`
/// field.
///
/// ```ignore
/// #[derive(Serialize)]
/// pub struct CircleCreated {
///     metadata: EventMetadata,
///     pub circle_id: String,
/// }
///
/// impl_domain_event!(CircleCreated);
/// ```
#[macro_export]
macro_rules! impl_domain_event {
    ($event_type:ty) => {
        impl $crate::usecase::DomainEvent for $event_type {
            fn event_id(&self) -> &str {
                &self.metadata.event_id
            }

            fn event_type(&self) -> &str {
                &self.metadata.event_type
            }

            fn spec_version(&self) -> &str {
                &self.metadata.spec_version
            }

            fn source(&self) -> &str {
                &self.metadata.source
            }

            fn subject(&self) -> &str {
                &self.metadata.subject
            }

            fn time(&self) -> chrono::DateTime<chrono::Utc> {
                self.metadata.time
            }

            fn execution_id(&self) -> &str {
                &self.metadata.execution_id
            }

            fn correlation_id(&self) -> &str {
                &self.metadata.correlation_id
            }

            fn causation_id(&self) -> Option<&str> {
                self.metadata.causation_id.as_deref()
            }

            fn principal_id(&self) -> &str {
                &self.metadata.principal_id
            }

            fn message_group(&self) -> &str {
                &self.metadata.message_group
            }

            fn to_data_json(&self) -> String {
                serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct TestEvent {
        metadata: EventMetadata,
        pub circle_id: String,
    }

    impl_domain_event!(TestEvent);

    #[test]
    fn test_for_aggregate_builds_subject_and_group() {
        let ctx = ExecutionContext::with_correlation("auth0|alice", "corr-1");
        let event = TestEvent {
            metadata: EventMetadata::for_aggregate(
                &ctx,
                "holacracy:governance:circle:created",
                "holacracy:governance",
                "circle",
                "C123",
            ),
            circle_id: "C123".to_string(),
        };

        assert_eq!(event.event_type(), "holacracy:governance:circle:created");
        assert_eq!(event.spec_version(), "1.0");
        assert_eq!(event.subject(), "holacracy.circle.C123");
        assert_eq!(event.message_group(), "holacracy:circle:C123");
        assert_eq!(event.correlation_id(), "corr-1");
        assert_eq!(event.principal_id(), "auth0|alice");
        assert_eq!(event.execution_id(), ctx.execution_id);
        assert!(event.causation_id().is_none());
    }

    #[test]
    fn test_to_data_json() {
        let ctx = ExecutionContext::create("auth0|alice");
        let event = TestEvent {
            metadata: EventMetadata::for_aggregate(&ctx, "t", "s", "circle", "C1"),
            circle_id: "C1".to_string(),
        };
        let json = event.to_data_json();
        assert!(json.contains("circle_id"));
        assert!(json.contains("C1"));
    }
}
