use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A maker's bid on a post. At most one row per (maker_id, post_id); the
/// database enforces this with a unique constraint and the offer path heals
/// any historical duplicates on write.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Offer {
    pub id: Uuid,
    pub post_id: Uuid,
    pub maker_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub price: Option<f64>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Offer joined with the bidding maker's public fields.
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct OfferWithMaker {
    pub id: Uuid,
    pub post_id: Uuid,
    pub maker_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub price: Option<f64>,
    pub maker_name: Option<String>,
    pub maker_image: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Given every offer a maker has on one post, pick the row that survives
/// duplicate healing: the newest one. Returns (survivor, doomed ids).
pub fn pick_survivor(mut offers: Vec<Offer>) -> Option<(Offer, Vec<Uuid>)> {
    if offers.is_empty() {
        return None;
    }
    offers.sort_by_key(|o| o.created_at);
    let survivor = offers.pop()?;
    let doomed = offers.into_iter().map(|o| o.id).collect();
    Some((survivor, doomed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn offer(created_at: DateTime<Utc>, message: &str) -> Offer {
        Offer {
            id: Uuid::new_v4(),
            post_id: Uuid::nil(),
            maker_id: Uuid::nil(),
            user_id: Uuid::nil(),
            message: message.to_string(),
            price: None,
            created_at,
        }
    }

    #[test]
    fn survivor_is_newest_row() {
        let now = Utc::now();
        let old = offer(now - Duration::hours(2), "m1");
        let mid = offer(now - Duration::hours(1), "m2");
        let new = offer(now, "m3");
        let doomed_ids = vec![old.id, mid.id];

        let (survivor, doomed) = pick_survivor(vec![mid, new.clone(), old]).unwrap();
        assert_eq!(survivor.id, new.id);
        assert_eq!(doomed.len(), 2);
        for id in doomed_ids {
            assert!(doomed.contains(&id));
        }
    }

    #[test]
    fn single_offer_heals_to_itself() {
        let only = offer(Utc::now(), "m1");
        let (survivor, doomed) = pick_survivor(vec![only.clone()]).unwrap();
        assert_eq!(survivor.id, only.id);
        assert!(doomed.is_empty());
    }

    #[test]
    fn no_offers_no_survivor() {
        assert!(pick_survivor(vec![]).is_none());
    }
}
