// db/contactdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::contactmodel::{mutual_visibility, ContactRequest, ContactStatus};

#[async_trait]
pub trait ContactExt {
    async fn get_contact_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<ContactRequest>, sqlx::Error>;

    /// The directed request requester -> target, if any.
    async fn get_directed_request(
        &self,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<Option<ContactRequest>, sqlx::Error>;

    async fn save_contact_request(
        &self,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<ContactRequest, sqlx::Error>;

    async fn update_contact_status(
        &self,
        request_id: Uuid,
        status: ContactStatus,
    ) -> Result<ContactRequest, sqlx::Error>;

    /// Pending requests addressed to the user, newest first.
    async fn get_incoming_requests(
        &self,
        target_user_id: Uuid,
    ) -> Result<Vec<ContactRequest>, sqlx::Error>;

    /// True when an accepted request exists in either direction. Acceptance
    /// unlocks contact details for both sides.
    async fn has_accepted_contact(
        &self,
        user_one: Uuid,
        user_two: Uuid,
    ) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl ContactExt for DBClient {
    async fn get_contact_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<ContactRequest>, sqlx::Error> {
        sqlx::query_as::<_, ContactRequest>("SELECT * FROM contact_requests WHERE id = $1")
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_directed_request(
        &self,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<Option<ContactRequest>, sqlx::Error> {
        sqlx::query_as::<_, ContactRequest>(
            r#"
            SELECT * FROM contact_requests
            WHERE requester_id = $1 AND target_user_id = $2
            ORDER BY (status = 'accepted'::contact_status) DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(requester_id)
        .bind(target_user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_contact_request(
        &self,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<ContactRequest, sqlx::Error> {
        sqlx::query_as::<_, ContactRequest>(
            r#"
            INSERT INTO contact_requests (requester_id, target_user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(target_user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_contact_status(
        &self,
        request_id: Uuid,
        status: ContactStatus,
    ) -> Result<ContactRequest, sqlx::Error> {
        sqlx::query_as::<_, ContactRequest>(
            "UPDATE contact_requests SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(request_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_incoming_requests(
        &self,
        target_user_id: Uuid,
    ) -> Result<Vec<ContactRequest>, sqlx::Error> {
        sqlx::query_as::<_, ContactRequest>(
            r#"
            SELECT * FROM contact_requests
            WHERE target_user_id = $1 AND status = 'pending'::contact_status
            ORDER BY created_at DESC
            "#,
        )
        .bind(target_user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn has_accepted_contact(
        &self,
        user_one: Uuid,
        user_two: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let a_to_b = self
            .get_directed_request(user_one, user_two)
            .await?
            .map(|r| r.status);
        let b_to_a = self
            .get_directed_request(user_two, user_one)
            .await?
            .map(|r| r.status);
        Ok(mutual_visibility(a_to_b, b_to_a))
    }
}
