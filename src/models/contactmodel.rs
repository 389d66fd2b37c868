use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "contact_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Pending,
    Accepted,
    Denied,
}

impl ContactStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ContactStatus::Pending => "pending",
            ContactStatus::Accepted => "accepted",
            ContactStatus::Denied => "denied",
        }
    }
}

/// Directed request (requester -> target) gating visibility of the target's
/// private contact fields.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct ContactRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub target_user_id: Uuid,
    pub status: ContactStatus,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// An accepted request in either direction unlocks mutual visibility.
pub fn mutual_visibility(
    a_to_b: Option<ContactStatus>,
    b_to_a: Option<ContactStatus>,
) -> bool {
    a_to_b == Some(ContactStatus::Accepted) || b_to_a == Some(ContactStatus::Accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_is_order_independent() {
        let accepted = Some(ContactStatus::Accepted);
        assert!(mutual_visibility(accepted, None));
        assert!(mutual_visibility(None, accepted));
        assert!(mutual_visibility(accepted, accepted));
    }

    #[test]
    fn pending_or_denied_stays_hidden() {
        assert!(!mutual_visibility(None, None));
        assert!(!mutual_visibility(Some(ContactStatus::Pending), None));
        assert!(!mutual_visibility(Some(ContactStatus::Denied), Some(ContactStatus::Pending)));
    }
}
