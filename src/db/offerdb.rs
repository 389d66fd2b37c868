// db/offerdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::offermodel::{pick_survivor, Offer, OfferWithMaker};

#[async_trait]
pub trait OfferExt {
    async fn get_offer(&self, offer_id: Uuid) -> Result<Option<Offer>, sqlx::Error>;

    async fn get_offers_by_post(&self, post_id: Uuid) -> Result<Vec<Offer>, sqlx::Error>;

    async fn get_offers_with_makers(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<OfferWithMaker>, sqlx::Error>;

    async fn get_offers_by_maker(&self, maker_id: Uuid) -> Result<Vec<Offer>, sqlx::Error>;

    /// Inserts the maker's offer on a post, or updates it when one already
    /// exists. Rows that predate the unique (maker_id, post_id) constraint
    /// are healed in the same transaction: the newest survives and absorbs
    /// the new message and price, the rest are deleted.
    async fn upsert_offer(
        &self,
        post_id: Uuid,
        maker_id: Uuid,
        owner_id: Uuid,
        message: &str,
        price: Option<f64>,
    ) -> Result<Offer, sqlx::Error>;

    async fn delete_offer(&self, offer_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl OfferExt for DBClient {
    async fn get_offer(&self, offer_id: Uuid) -> Result<Option<Offer>, sqlx::Error> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1")
            .bind(offer_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_offers_by_post(&self, post_id: Uuid) -> Result<Vec<Offer>, sqlx::Error> {
        sqlx::query_as::<_, Offer>(
            "SELECT * FROM offers WHERE post_id = $1 ORDER BY created_at DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_offers_with_makers(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<OfferWithMaker>, sqlx::Error> {
        sqlx::query_as::<_, OfferWithMaker>(
            r#"
            SELECT o.id, o.post_id, o.maker_id, o.user_id, o.message, o.price,
                   u.name AS maker_name, u.image AS maker_image, o.created_at
            FROM offers o
            JOIN users u ON u.id = o.maker_id
            WHERE o.post_id = $1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_offers_by_maker(&self, maker_id: Uuid) -> Result<Vec<Offer>, sqlx::Error> {
        sqlx::query_as::<_, Offer>(
            "SELECT * FROM offers WHERE maker_id = $1 ORDER BY created_at DESC",
        )
        .bind(maker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn upsert_offer(
        &self,
        post_id: Uuid,
        maker_id: Uuid,
        owner_id: Uuid,
        message: &str,
        price: Option<f64>,
    ) -> Result<Offer, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Offer>(
            "SELECT * FROM offers WHERE post_id = $1 AND maker_id = $2 FOR UPDATE",
        )
        .bind(post_id)
        .bind(maker_id)
        .fetch_all(&mut *tx)
        .await?;

        let offer = match pick_survivor(existing) {
            Some((survivor, doomed)) => {
                if !doomed.is_empty() {
                    sqlx::query("DELETE FROM offers WHERE id = ANY($1)")
                        .bind(&doomed)
                        .execute(&mut *tx)
                        .await?;
                }
                sqlx::query_as::<_, Offer>(
                    "UPDATE offers SET message = $2, price = $3 WHERE id = $1 RETURNING *",
                )
                .bind(survivor.id)
                .bind(message)
                .bind(price)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, Offer>(
                    r#"
                    INSERT INTO offers (post_id, maker_id, user_id, message, price)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING *
                    "#,
                )
                .bind(post_id)
                .bind(maker_id)
                .bind(owner_id)
                .bind(message)
                .bind(price)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        Ok(offer)
    }

    async fn delete_offer(&self, offer_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(offer_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
