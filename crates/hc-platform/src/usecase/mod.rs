//! Use Case Infrastructure
//!
//! Foundational patterns for implementing use cases:
//! - `UseCaseResult<T>` - sealed result type for use case outcomes
//! - `UseCaseError` - categorized error types for consistent handling
//! - `DomainEvent` - trait for domain events with CloudEvents structure
//! - `ExecutionContext` - tracing and principal context for use case execution
//! - `UnitOfWork` - atomic commit of entity changes + event + audit log

pub mod result;
pub mod error;
pub mod domain_event;
pub mod execution_context;
pub mod unit_of_work;

pub use result::UseCaseResult;
pub use error::UseCaseError;
pub use domain_event::{DomainEvent, EventMetadata};
pub use execution_context::ExecutionContext;
pub use unit_of_work::{Aggregate, Change, Detachable, SqliteQuery, SqliteUnitOfWork, UnitOfWork};
