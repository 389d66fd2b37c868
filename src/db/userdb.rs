// db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::User;

const USER_COLUMNS: &str = r#"
    id, name, email, password_hash, phone_number, image, bio, maker_bio,
    maker, lat, long, created_at, updated_at
"#;

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> Result<Vec<User>, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password_hash: T,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        bio: Option<&str>,
        maker_bio: Option<&str>,
        phone_number: Option<&str>,
        lat: Option<f64>,
        long: Option<f64>,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_image(&self, user_id: Uuid, image: &str) -> Result<User, sqlx::Error>;

    async fn set_maker(&self, user_id: Uuid, maker: bool) -> Result<User, sqlx::Error>;

    /// All users with the maker flag, optionally restricted to those holding
    /// any of the given skills and/or matching a case-insensitive substring
    /// over name, email, bio or maker bio.
    async fn get_makers(
        &self,
        skill_ids: Option<&[Uuid]>,
        search: Option<&str>,
    ) -> Result<Vec<User>, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        if let Some(user_id) = user_id {
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
            ))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
        } else if let Some(email) = email {
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
        } else {
            Ok(None)
        }
    }

    async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> Result<Vec<User>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password_hash: T,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name.into())
        .bind(email.into())
        .bind(password_hash.into())
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        bio: Option<&str>,
        maker_bio: Option<&str>,
        phone_number: Option<&str>,
        lat: Option<f64>,
        long: Option<f64>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                maker_bio = COALESCE($4, maker_bio),
                phone_number = COALESCE($5, phone_number),
                lat = COALESCE($6, lat),
                long = COALESCE($7, long),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(name)
        .bind(bio)
        .bind(maker_bio)
        .bind(phone_number)
        .bind(lat)
        .bind(long)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_image(&self, user_id: Uuid, image: &str) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET image = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(image)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_maker(&self, user_id: Uuid, maker: bool) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET maker = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(maker)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_makers(
        &self,
        skill_ids: Option<&[Uuid]>,
        search: Option<&str>,
    ) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users u
            WHERE u.maker = TRUE
              AND ($1::uuid[] IS NULL OR EXISTS (
                    SELECT 1 FROM users_to_skills uts
                    WHERE uts.user_id = u.id AND uts.skill_id = ANY($1)
              ))
              AND ($2::text IS NULL
                   OR u.name ILIKE '%' || $2 || '%'
                   OR u.email ILIKE '%' || $2 || '%'
                   OR u.bio ILIKE '%' || $2 || '%'
                   OR u.maker_bio ILIKE '%' || $2 || '%')
            ORDER BY u.created_at DESC
            "#
        ))
        .bind(skill_ids)
        .bind(search)
        .fetch_all(&self.pool)
        .await
    }
}
