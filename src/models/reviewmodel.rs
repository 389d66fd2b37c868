use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Review {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub target_user_id: Uuid,
    pub post_id: Uuid,
    pub rating: f64,
    pub comment: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Review row joined with the reviewer's public fields.
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct ReviewWithAuthor {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub target_user_id: Uuid,
    pub post_id: Uuid,
    pub rating: f64,
    pub comment: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewer_image: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Aggregate review figures for one user, fetched in a single batched query
/// across a candidate set.
#[derive(Debug, Serialize, sqlx::FromRow, Clone, Copy)]
pub struct ReviewStats {
    pub target_user_id: Uuid,
    pub completed_repairs: i64,
    pub average_rating: Option<f64>,
}
