use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub maker_bio: Option<String>,
    pub maker: bool,
    pub lat: Option<f64>,
    pub long: Option<f64>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.lat, self.long) {
            (Some(lat), Some(long)) => Some((lat, long)),
            _ => None,
        }
    }
}

/// Experience tier derived from the number of completed repairs. Never stored.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MakerLevel {
    Novice,
    Handyman,
    Master,
}

impl MakerLevel {
    pub fn from_completed(completed_repairs: i64) -> Self {
        match completed_repairs {
            ..=5 => MakerLevel::Novice,
            6..=20 => MakerLevel::Handyman,
            _ => MakerLevel::Master,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            MakerLevel::Novice => "novice",
            MakerLevel::Handyman => "handyman",
            MakerLevel::Master => "master",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds() {
        assert_eq!(MakerLevel::from_completed(0), MakerLevel::Novice);
        assert_eq!(MakerLevel::from_completed(5), MakerLevel::Novice);
        assert_eq!(MakerLevel::from_completed(6), MakerLevel::Handyman);
        assert_eq!(MakerLevel::from_completed(20), MakerLevel::Handyman);
        assert_eq!(MakerLevel::from_completed(21), MakerLevel::Master);
        assert_eq!(MakerLevel::from_completed(1000), MakerLevel::Master);
    }
}
