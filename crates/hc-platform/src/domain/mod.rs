//! Domain Aggregate
//!
//! Things a role exclusively controls. Policies hang off a domain and are
//! removed with it.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::Domain;
pub use repository::DomainRepository;
pub use api::{domains_router, DomainListResponse, DomainResponse, DomainsState};
