// db/skilldb.rs
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::skillmodel::Skill;

#[async_trait]
pub trait SkillExt {
    async fn get_skill(&self, skill_id: Uuid) -> Result<Option<Skill>, sqlx::Error>;

    /// Catalog entries offered to clients, in display order.
    async fn get_active_skills(&self) -> Result<Vec<Skill>, sqlx::Error>;

    /// Replaces the user's skill set wholesale inside one transaction.
    async fn set_user_skills(
        &self,
        user_id: Uuid,
        skill_ids: &[Uuid],
    ) -> Result<Vec<Skill>, sqlx::Error>;

    async fn get_user_skills(&self, user_id: Uuid) -> Result<Vec<Skill>, sqlx::Error>;

    /// Skills for many users in one query, keyed by user.
    async fn get_batch_user_skills(
        &self,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Skill>>, sqlx::Error>;
}

#[async_trait]
impl SkillExt for DBClient {
    async fn get_skill(&self, skill_id: Uuid) -> Result<Option<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE id = $1")
            .bind(skill_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_active_skills(&self) -> Result<Vec<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            r#"
            SELECT * FROM skills
            WHERE active = TRUE
            ORDER BY display_order ASC NULLS LAST, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn set_user_skills(
        &self,
        user_id: Uuid,
        skill_ids: &[Uuid],
    ) -> Result<Vec<Skill>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM users_to_skills WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if !skill_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO users_to_skills (user_id, skill_id)
                SELECT $1, id FROM skills WHERE id = ANY($2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(skill_ids)
            .execute(&mut *tx)
            .await?;
        }

        let skills = sqlx::query_as::<_, Skill>(
            r#"
            SELECT s.* FROM skills s
            JOIN users_to_skills uts ON uts.skill_id = s.id
            WHERE uts.user_id = $1
            ORDER BY s.display_order ASC NULLS LAST, s.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(skills)
    }

    async fn get_user_skills(&self, user_id: Uuid) -> Result<Vec<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            r#"
            SELECT s.* FROM skills s
            JOIN users_to_skills uts ON uts.skill_id = s.id
            WHERE uts.user_id = $1
            ORDER BY s.display_order ASC NULLS LAST, s.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_batch_user_skills(
        &self,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Skill>>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        #[derive(sqlx::FromRow)]
        struct UserSkillRow {
            user_id: Uuid,
            #[sqlx(flatten)]
            skill: Skill,
        }

        let rows = sqlx::query_as::<_, UserSkillRow>(
            r#"
            SELECT uts.user_id, s.id, s.name, s.category, s.description,
                   s.icon, s.display_order, s.active, s.created_at
            FROM skills s
            JOIN users_to_skills uts ON uts.skill_id = s.id
            WHERE uts.user_id = ANY($1)
            ORDER BY s.display_order ASC NULLS LAST, s.name ASC
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_user: HashMap<Uuid, Vec<Skill>> = HashMap::new();
        for row in rows {
            by_user.entry(row.user_id).or_default().push(row.skill);
        }
        Ok(by_user)
    }
}
