use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "post_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Open,
    InProgress,
    Fixed,
    Closed,
}

impl PostStatus {
    pub fn to_str(&self) -> &str {
        match self {
            PostStatus::Open => "open",
            PostStatus::InProgress => "in_progress",
            PostStatus::Fixed => "fixed",
            PostStatus::Closed => "closed",
        }
    }

    /// The repair lifecycle: open -> in_progress -> fixed -> closed, with the
    /// single reverse edge in_progress -> open (maker unassignment) and the
    /// shortcut open -> closed (owner cancels).
    pub fn can_transition(self, to: PostStatus) -> bool {
        matches!(
            (self, to),
            (PostStatus::Open, PostStatus::InProgress)
                | (PostStatus::InProgress, PostStatus::Open)
                | (PostStatus::InProgress, PostStatus::Fixed)
                | (PostStatus::Fixed, PostStatus::Closed)
                | (PostStatus::Open, PostStatus::Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == PostStatus::Closed
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Option<Uuid>,
    pub target_price: Option<f64>,
    pub maker_id: Option<Uuid>,
    pub status: PostStatus,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub score: Option<f64>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.lat, self.long) {
            (Some(lat), Some(long)) => Some((lat, long)),
            _ => None,
        }
    }

    /// maker_id must be set exactly while the job is being worked on.
    pub fn maker_slot_consistent(&self) -> bool {
        match self.status {
            PostStatus::InProgress | PostStatus::Fixed => self.maker_id.is_some(),
            PostStatus::Open => self.maker_id.is_none(),
            PostStatus::Closed => true,
        }
    }
}

/// Post joined with the owner's public fields plus the computed great-circle
/// distance from the caller's origin. `distance_km` is NULL when either side
/// is missing coordinates.
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct RankedPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Option<Uuid>,
    pub target_price: Option<f64>,
    pub maker_id: Option<Uuid>,
    pub status: PostStatus,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub owner_name: Option<String>,
    pub owner_image: Option<String>,
    pub distance_km: Option<f64>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub message: String,
    pub image_url: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub message: String,
    pub image_url: Option<String>,
    pub user_name: Option<String>,
    pub user_image: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PostStatus; 4] = [
        PostStatus::Open,
        PostStatus::InProgress,
        PostStatus::Fixed,
        PostStatus::Closed,
    ];

    #[test]
    fn allowed_transitions() {
        assert!(PostStatus::Open.can_transition(PostStatus::InProgress));
        assert!(PostStatus::InProgress.can_transition(PostStatus::Open));
        assert!(PostStatus::InProgress.can_transition(PostStatus::Fixed));
        assert!(PostStatus::Fixed.can_transition(PostStatus::Closed));
        assert!(PostStatus::Open.can_transition(PostStatus::Closed));
    }

    #[test]
    fn maker_slot_follows_status() {
        fn post(status: PostStatus, maker_id: Option<Uuid>) -> Post {
            Post {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                title: "Wobbly chair".to_string(),
                description: None,
                image_url: None,
                r#type: None,
                target_price: None,
                maker_id,
                status,
                lat: None,
                long: None,
                score: None,
                created_at: Utc::now(),
            }
        }

        assert!(post(PostStatus::Open, None).maker_slot_consistent());
        assert!(!post(PostStatus::Open, Some(Uuid::new_v4())).maker_slot_consistent());
        assert!(post(PostStatus::InProgress, Some(Uuid::new_v4())).maker_slot_consistent());
        assert!(!post(PostStatus::InProgress, None).maker_slot_consistent());
        assert!(!post(PostStatus::Fixed, None).maker_slot_consistent());
        assert!(post(PostStatus::Closed, None).maker_slot_consistent());
        assert!(post(PostStatus::Closed, Some(Uuid::new_v4())).maker_slot_consistent());
    }

    #[test]
    fn disallowed_transitions() {
        assert!(!PostStatus::Open.can_transition(PostStatus::Fixed));
        assert!(!PostStatus::Fixed.can_transition(PostStatus::Open));
        assert!(!PostStatus::Fixed.can_transition(PostStatus::InProgress));
        for from in ALL {
            assert!(!from.can_transition(from));
            assert!(!PostStatus::Closed.can_transition(from));
        }
    }
}
