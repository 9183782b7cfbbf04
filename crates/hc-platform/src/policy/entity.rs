//! Policy Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::tsid::TsidGenerator;

/// Rule granting or restricting access to a domain
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub domain_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    pub fn new(domain_id: &str, title: &str, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TsidGenerator::generate(),
            title: title.to_string(),
            description,
            domain_id: domain_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
