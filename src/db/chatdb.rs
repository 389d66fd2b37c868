// db/chatdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::chatmodels::{ordered_pair, Conversation, Message, MessageType};
use crate::models::postmodel::Post;

const UNIQUE_VIOLATION: &str = "23505";

#[async_trait]
pub trait ChatExt {
    /// Finds or creates the single conversation for an unordered user pair.
    /// Two callers racing on first contact both end up with the same row:
    /// the loser's insert hits the pair index and re-reads.
    async fn get_or_create_conversation(
        &self,
        user_one: Uuid,
        user_two: Uuid,
    ) -> Result<Conversation, sqlx::Error>;

    async fn get_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Conversation>, sqlx::Error>;

    async fn get_conversation_between(
        &self,
        user_one: Uuid,
        user_two: Uuid,
    ) -> Result<Option<Conversation>, sqlx::Error>;

    /// The user's conversations, most recently active first.
    async fn get_user_conversations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Conversation>, sqlx::Error>;

    /// Inserts the message and bumps the conversation's activity timestamp
    /// in one transaction.
    async fn send_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: &str,
        message_type: MessageType,
        related_entity_id: Option<Uuid>,
    ) -> Result<Message, sqlx::Error>;

    async fn get_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>, sqlx::Error>;

    async fn get_last_message(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Message>, sqlx::Error>;

    /// Advances the reader's own cursor; the other side's is untouched.
    async fn mark_conversation_read(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Conversation, sqlx::Error>;

    /// Messages from others that arrived after the user's read cursor,
    /// summed over all their conversations.
    async fn unread_message_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    /// Posts the two users are currently working on together, in either
    /// owner/maker arrangement.
    async fn get_active_jobs_between(
        &self,
        user_one: Uuid,
        user_two: Uuid,
    ) -> Result<Vec<Post>, sqlx::Error>;
}

#[async_trait]
impl ChatExt for DBClient {
    async fn get_or_create_conversation(
        &self,
        user_one: Uuid,
        user_two: Uuid,
    ) -> Result<Conversation, sqlx::Error> {
        if let Some(conversation) = self.get_conversation_between(user_one, user_two).await? {
            return Ok(conversation);
        }

        let (user_a, user_b) = ordered_pair(user_one, user_two);
        let inserted = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (user_a_id, user_b_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(conversation) => Ok(conversation),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                // Lost the race; the other side's row is the one to use.
                self.get_conversation_between(user_one, user_two)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)
            }
            Err(err) => Err(err),
        }
    }

    async fn get_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
            .bind(conversation_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_conversation_between(
        &self,
        user_one: Uuid,
        user_two: Uuid,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        let (user_a, user_b) = ordered_pair(user_one, user_two);
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
            WHERE LEAST(user_a_id, user_b_id) = $1
              AND GREATEST(user_a_id, user_b_id) = $2
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_conversations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Conversation>, sqlx::Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
            WHERE user_a_id = $1 OR user_b_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn send_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: &str,
        message_type: MessageType,
        related_entity_id: Option<Uuid>,
    ) -> Result<Message, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, content, type, related_entity_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .bind(message_type)
        .bind(related_entity_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    async fn get_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY created_at ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_last_message(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_conversation_read(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Conversation, sqlx::Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            UPDATE conversations
            SET user_a_last_read_at = CASE WHEN user_a_id = $2 THEN NOW()
                                           ELSE user_a_last_read_at END,
                user_b_last_read_at = CASE WHEN user_b_id = $2 THEN NOW()
                                           ELSE user_b_last_read_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn unread_message_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM messages m
            JOIN conversations c ON c.id = m.conversation_id
            WHERE m.sender_id != $1
              AND ((c.user_a_id = $1 AND m.created_at > c.user_a_last_read_at)
                OR (c.user_b_id = $1 AND m.created_at > c.user_b_last_read_at))
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }

    async fn get_active_jobs_between(
        &self,
        user_one: Uuid,
        user_two: Uuid,
    ) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            WHERE status IN ('in_progress'::post_status, 'fixed'::post_status)
              AND ((user_id = $1 AND maker_id = $2)
                OR (user_id = $2 AND maker_id = $1))
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_one)
        .bind(user_two)
        .fetch_all(&self.pool)
        .await
    }
}
