// db/postdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::postmodel::{Comment, CommentWithAuthor, Post, PostStatus, RankedPost};

/// Both ranking paths return at most this many rows so a caller cannot tell
/// from the page size whether an origin was supplied.
pub const FEED_LIMIT: i64 = 50;

#[async_trait]
pub trait PostExt {
    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn save_post(
        &self,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        image_url: Option<&str>,
        skill_id: Option<Uuid>,
        target_price: Option<f64>,
        lat: Option<f64>,
        long: Option<f64>,
    ) -> Result<Post, sqlx::Error>;

    /// Non-closed posts ordered by great-circle distance from the origin,
    /// closest first; posts without coordinates sort last and are dropped
    /// entirely when a radius is given.
    async fn get_posts_ranked(
        &self,
        origin: (f64, f64),
        radius_km: Option<f64>,
        skill_ids: Option<&[Uuid]>,
        search: Option<&str>,
    ) -> Result<Vec<RankedPost>, sqlx::Error>;

    /// Fallback feed when the caller has no usable origin: newest first,
    /// same filters, same cap. A radius filter would be meaningless here
    /// and is ignored by the caller.
    async fn get_posts_chronological(
        &self,
        skill_ids: Option<&[Uuid]>,
        search: Option<&str>,
    ) -> Result<Vec<RankedPost>, sqlx::Error>;

    /// Open posts that carry coordinates, for the map view.
    async fn get_open_posts_with_location(&self) -> Result<Vec<Post>, sqlx::Error>;

    async fn get_posts_by_owner(&self, user_id: Uuid) -> Result<Vec<Post>, sqlx::Error>;

    async fn get_posts_by_maker(&self, maker_id: Uuid) -> Result<Vec<Post>, sqlx::Error>;

    async fn update_post_status(
        &self,
        post_id: Uuid,
        status: PostStatus,
    ) -> Result<Post, sqlx::Error>;

    /// Atomically claims an open post for the maker: sets maker_id and moves
    /// the status to in_progress in one guarded update. Returns None when the
    /// post is no longer open (lost race).
    async fn assign_maker_and_start(
        &self,
        post_id: Uuid,
        maker_id: Uuid,
    ) -> Result<Option<Post>, sqlx::Error>;

    /// Reverse edge of the lifecycle: drops the maker and reopens the post.
    /// Returns None when the post is not currently in progress.
    async fn clear_maker(&self, post_id: Uuid) -> Result<Option<Post>, sqlx::Error>;

    async fn save_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        message: &str,
        image_url: Option<&str>,
    ) -> Result<Comment, sqlx::Error>;

    async fn get_comments_with_authors(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error>;
}

#[async_trait]
impl PostExt for DBClient {
    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn save_post(
        &self,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        image_url: Option<&str>,
        skill_id: Option<Uuid>,
        target_price: Option<f64>,
        lat: Option<f64>,
        long: Option<f64>,
    ) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, title, description, image_url, type, target_price, lat, long)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(image_url)
        .bind(skill_id)
        .bind(target_price)
        .bind(lat)
        .bind(long)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_posts_ranked(
        &self,
        origin: (f64, f64),
        radius_km: Option<f64>,
        skill_ids: Option<&[Uuid]>,
        search: Option<&str>,
    ) -> Result<Vec<RankedPost>, sqlx::Error> {
        let (origin_lat, origin_long) = origin;

        // Haversine pushed into SQL so the cap applies after ordering.
        // distance_km stays NULL for posts without coordinates; the radius
        // comparison then fails, and without a radius they sort last.
        sqlx::query_as::<_, RankedPost>(
            r#"
            SELECT id, user_id, title, description, image_url, type, target_price,
                   maker_id, status, lat, long, owner_name, owner_image,
                   distance_km, created_at
            FROM (
                SELECT p.*,
                       u.name AS owner_name,
                       u.image AS owner_image,
                       u.email AS owner_email,
                       2 * 6371 * atan2(
                           sqrt(
                               pow(sin(radians(p.lat - $1) / 2), 2)
                               + cos(radians($1)) * cos(radians(p.lat))
                               * pow(sin(radians(p.long - $2) / 2), 2)
                           ),
                           sqrt(1 - (
                               pow(sin(radians(p.lat - $1) / 2), 2)
                               + cos(radians($1)) * cos(radians(p.lat))
                               * pow(sin(radians(p.long - $2) / 2), 2)
                           ))
                       ) AS distance_km
                FROM posts p
                JOIN users u ON u.id = p.user_id
                WHERE p.status != 'closed'::post_status
            ) ranked
            WHERE ($3::float8 IS NULL OR distance_km <= $3)
              AND ($4::uuid[] IS NULL OR type = ANY($4))
              AND ($5::text IS NULL
                   OR title ILIKE '%' || $5 || '%'
                   OR description ILIKE '%' || $5 || '%'
                   OR owner_name ILIKE '%' || $5 || '%'
                   OR owner_email ILIKE '%' || $5 || '%')
            ORDER BY distance_km ASC NULLS LAST, created_at DESC
            LIMIT $6
            "#,
        )
        .bind(origin_lat)
        .bind(origin_long)
        .bind(radius_km)
        .bind(skill_ids)
        .bind(search)
        .bind(FEED_LIMIT)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_posts_chronological(
        &self,
        skill_ids: Option<&[Uuid]>,
        search: Option<&str>,
    ) -> Result<Vec<RankedPost>, sqlx::Error> {
        sqlx::query_as::<_, RankedPost>(
            r#"
            SELECT p.id, p.user_id, p.title, p.description, p.image_url, p.type,
                   p.target_price, p.maker_id, p.status, p.lat, p.long,
                   u.name AS owner_name, u.image AS owner_image,
                   NULL::float8 AS distance_km, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.status != 'closed'::post_status
              AND ($1::uuid[] IS NULL OR p.type = ANY($1))
              AND ($2::text IS NULL
                   OR p.title ILIKE '%' || $2 || '%'
                   OR p.description ILIKE '%' || $2 || '%'
                   OR u.name ILIKE '%' || $2 || '%'
                   OR u.email ILIKE '%' || $2 || '%')
            ORDER BY p.created_at DESC
            LIMIT $3
            "#,
        )
        .bind(skill_ids)
        .bind(search)
        .bind(FEED_LIMIT)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_open_posts_with_location(&self) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            WHERE status = 'open'::post_status
              AND lat IS NOT NULL AND long IS NOT NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_posts_by_owner(&self, user_id: Uuid) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_posts_by_maker(&self, maker_id: Uuid) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE maker_id = $1 ORDER BY created_at DESC",
        )
        .bind(maker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_post_status(
        &self,
        post_id: Uuid,
        status: PostStatus,
    ) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(post_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn assign_maker_and_start(
        &self,
        post_id: Uuid,
        maker_id: Uuid,
    ) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET maker_id = $2, status = 'in_progress'::post_status
            WHERE id = $1 AND status = 'open'::post_status
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(maker_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn clear_maker(&self, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET maker_id = NULL, status = 'open'::post_status
            WHERE id = $1 AND status = 'in_progress'::post_status
            RETURNING *
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        message: &str,
        image_url: Option<&str>,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (user_id, post_id, message, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .bind(message)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_comments_with_authors(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.user_id, c.post_id, c.message, c.image_url,
                   u.name AS user_name, u.image AS user_image, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
    }
}
