//! Audit Trail
//!
//! Domain events and audit log entries recorded by every committed use case.

pub mod entity;
pub mod repository;

pub use entity::{AuditLog, StoredEvent};
pub use repository::AuditLogRepository;
