//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod error;
pub mod tsid;
pub mod middleware;
pub mod api_common;
pub mod database;

pub use error::{PlatformError, Result};
pub use tsid::TsidGenerator;
pub use middleware::{AuthLayer, AuthState, Authenticated};
pub use api_common::{ErrorEnvelope, ErrorItem, SuccessResponse};
