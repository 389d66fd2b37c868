// db/reviewdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::postmodel::Post;
use crate::models::reviewmodel::{Review, ReviewStats, ReviewWithAuthor};

#[async_trait]
pub trait ReviewExt {
    /// Inserts the review and, when the reviewer is the post owner, closes
    /// the post in the same transaction. Returns the review and the post as
    /// it stands afterwards.
    async fn save_review(
        &self,
        reviewer_id: Uuid,
        target_user_id: Uuid,
        post_id: Uuid,
        rating: f64,
        comment: Option<&str>,
        close_post: bool,
    ) -> Result<(Review, Post), sqlx::Error>;

    async fn get_reviews_by_target(
        &self,
        target_user_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error>;

    async fn get_reviews_by_post(&self, post_id: Uuid) -> Result<Vec<Review>, sqlx::Error>;

    async fn has_reviewed(&self, reviewer_id: Uuid, post_id: Uuid)
        -> Result<bool, sqlx::Error>;

    /// One aggregate row per candidate: count and average rating of the
    /// reviews targeting them. Each finished job leaves one review per side,
    /// so the received-review count is the completed-repair tally.
    /// Candidates with no history come back with zero and a NULL average.
    async fn get_review_stats(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<ReviewStats>, sqlx::Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn save_review(
        &self,
        reviewer_id: Uuid,
        target_user_id: Uuid,
        post_id: Uuid,
        rating: f64,
        comment: Option<&str>,
        close_post: bool,
    ) -> Result<(Review, Post), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (reviewer_id, target_user_id, post_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(reviewer_id)
        .bind(target_user_id)
        .bind(post_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        let post = if close_post {
            sqlx::query_as::<_, Post>(
                "UPDATE posts SET status = 'closed'::post_status WHERE id = $1 RETURNING *",
            )
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await?
        };

        tx.commit().await?;
        Ok((review, post))
    }

    async fn get_reviews_by_target(
        &self,
        target_user_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            r#"
            SELECT r.id, r.reviewer_id, r.target_user_id, r.post_id, r.rating,
                   r.comment, u.name AS reviewer_name, u.image AS reviewer_image,
                   r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.reviewer_id
            WHERE r.target_user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(target_user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_reviews_by_post(&self, post_id: Uuid) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn has_reviewed(
        &self,
        reviewer_id: Uuid,
        post_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reviews WHERE reviewer_id = $1 AND post_id = $2",
        )
        .bind(reviewer_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    async fn get_review_stats(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<ReviewStats>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ReviewStats>(
            r#"
            SELECT u.id AS target_user_id,
                   COALESCE(r.completed, 0) AS completed_repairs,
                   r.average_rating
            FROM users u
            LEFT JOIN (
                SELECT target_user_id,
                       COUNT(*) AS completed,
                       AVG(rating) AS average_rating
                FROM reviews
                GROUP BY target_user_id
            ) r ON r.target_user_id = u.id
            WHERE u.id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
    }
}
