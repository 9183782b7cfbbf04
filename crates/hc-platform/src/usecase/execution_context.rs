//! Execution Context
//!
//! Tracing ids and the acting principal for one use case execution. The
//! principal is the caller's external identity id, which exists before the
//! caller has a User row (registration).

use chrono::{DateTime, Utc};

use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Unique id for this execution
    pub execution_id: String,
    /// Request-wide id for distributed tracing
    pub correlation_id: String,
    /// Event that caused this execution, if any
    pub causation_id: Option<String>,
    /// External identity id of the caller
    pub principal_id: String,
    pub initiated_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Fresh context; the correlation id starts as the execution id.
    pub fn create(principal_id: impl Into<String>) -> Self {
        let exec_id = format!("exec-{}", TsidGenerator::generate());
        Self {
            execution_id: exec_id.clone(),
            correlation_id: exec_id,
            causation_id: None,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Context continuing an upstream correlation id (e.g. `X-Correlation-ID`).
    pub fn with_correlation(
        principal_id: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            execution_id: format!("exec-{}", TsidGenerator::generate()),
            correlation_id: correlation_id.into(),
            causation_id: None,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        let ctx = ExecutionContext::create("auth0|alice");
        assert!(ctx.execution_id.starts_with("exec-"));
        assert_eq!(ctx.execution_id, ctx.correlation_id);
        assert!(ctx.causation_id.is_none());
        assert_eq!(ctx.principal_id, "auth0|alice");
    }

    #[test]
    fn test_with_correlation() {
        let ctx = ExecutionContext::with_correlation("auth0|alice", "req-42");
        assert_eq!(ctx.correlation_id, "req-42");
        assert_ne!(ctx.execution_id, ctx.correlation_id);
    }
}
