//! Domain Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub title: String,
    pub role_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Domain {
    pub fn new(role_id: &str, title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: TsidGenerator::generate(),
            title: title.to_string(),
            role_id: role_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn retitle(&mut self, title: &str) {
        self.title = title.to_string();
        self.updated_at = Utc::now();
    }
}
