//! Holacracy Common
//!
//! Plumbing shared by the platform crates and binaries.

pub mod logging;

pub use logging::{init_logging, LogFormat};
