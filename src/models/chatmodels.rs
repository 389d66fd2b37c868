use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "message_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Image,
    SystemEvent,
}

impl MessageType {
    pub fn to_str(&self) -> &str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::SystemEvent => "system_event",
        }
    }
}

/// One conversation per unordered user pair; rows store the pair with
/// user_a_id < user_b_id and a unique index enforces it.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Conversation {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub user_a_last_read_at: DateTime<Utc>,
    pub user_b_last_read_at: DateTime<Utc>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn participants(&self) -> (Uuid, Uuid) {
        (self.user_a_id, self.user_b_id)
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.user_a_id == user_id || self.user_b_id == user_id
    }

    pub fn partner_of(&self, user_id: Uuid) -> Option<Uuid> {
        if self.user_a_id == user_id {
            Some(self.user_b_id)
        } else if self.user_b_id == user_id {
            Some(self.user_a_id)
        } else {
            None
        }
    }

    pub fn last_read_at(&self, user_id: Uuid) -> Option<DateTime<Utc>> {
        if self.user_a_id == user_id {
            Some(self.user_a_last_read_at)
        } else if self.user_b_id == user_id {
            Some(self.user_b_last_read_at)
        } else {
            None
        }
    }
}

/// Normalize a user pair to the stored (a, b) ordering.
pub fn ordered_pair(user_one: Uuid, user_two: Uuid) -> (Uuid, Uuid) {
    if user_one < user_two {
        (user_one, user_two)
    } else {
        (user_two, user_one)
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub r#type: MessageType,
    pub related_entity_id: Option<Uuid>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_ordering_is_symmetric() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(ordered_pair(a, b), ordered_pair(b, a));
        let (x, y) = ordered_pair(a, b);
        assert!(x < y);
    }
}
