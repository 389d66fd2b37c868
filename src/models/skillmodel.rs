use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry used both as post category and as user capability tag.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub active: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
