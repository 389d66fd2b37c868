use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{chatdb::ChatExt, contactdb::ContactExt, userdb::UserExt},
    dtos::chatdtos::{
        ConversationListResponseDto, ConversationResponseDto, ConversationSummaryDto,
        MessageListResponseDto, MessageResponseDto, SendMessageDto, StartConversationDto,
        UnreadCountResponseDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::chatmodels::{Conversation, MessageType},
    AppState,
};

pub fn chat_handler() -> Router {
    Router::new()
        .route("/conversations", get(get_conversations).post(start_conversation))
        .route(
            "/conversations/:conversation_id/messages",
            get(get_messages).post(send_message),
        )
        .route("/conversations/:conversation_id/read", put(mark_read))
        .route("/unread-count", get(get_unread_count))
}

/// Chat is gated: two users can talk once either an accepted contact request
/// links them or they share an active job.
async fn ensure_can_chat(
    app_state: &AppState,
    user_one: Uuid,
    user_two: Uuid,
) -> Result<(), HttpError> {
    let contact = app_state
        .db_client
        .has_accepted_contact(user_one, user_two)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    if contact {
        return Ok(());
    }

    let active_jobs = app_state
        .db_client
        .get_active_jobs_between(user_one, user_two)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    if !active_jobs.is_empty() {
        return Ok(());
    }

    Err(HttpError::forbidden(
        "You need an accepted contact request or an active job to chat with this user",
    ))
}

async fn load_own_conversation(
    app_state: &AppState,
    conversation_id: Uuid,
    user_id: Uuid,
) -> Result<Conversation, HttpError> {
    let conversation = app_state
        .db_client
        .get_conversation(conversation_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Conversation not found"))?;

    if !conversation.has_participant(user_id) {
        return Err(HttpError::forbidden(
            "You are not part of this conversation",
        ));
    }
    Ok(conversation)
}

pub async fn start_conversation(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<StartConversationDto>,
) -> Result<impl IntoResponse, HttpError> {
    if body.user_id == auth.user.id {
        return Err(HttpError::bad_request(
            "You cannot start a conversation with yourself",
        ));
    }

    app_state
        .db_client
        .get_user(Some(body.user_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    ensure_can_chat(&app_state, auth.user.id, body.user_id).await?;

    let conversation = app_state
        .db_client
        .get_or_create_conversation(auth.user.id, body.user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ConversationResponseDto {
            status: "success".to_string(),
            conversation,
        }),
    ))
}

pub async fn get_conversations(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let conversations = app_state
        .db_client
        .get_user_conversations(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let partner_ids: Vec<Uuid> = conversations
        .iter()
        .filter_map(|c| c.partner_of(auth.user.id))
        .collect();
    let partners = app_state
        .db_client
        .get_users_by_ids(&partner_ids)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let mut summaries = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let partner_id = conversation
            .partner_of(auth.user.id)
            .ok_or_else(|| HttpError::server_error("Conversation without participant"))?;
        let partner = partners.iter().find(|u| u.id == partner_id);
        let last_message = app_state
            .db_client
            .get_last_message(conversation.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        let has_unread = match (&last_message, conversation.last_read_at(auth.user.id)) {
            (Some(message), Some(read_at)) => {
                message.sender_id != auth.user.id && message.created_at > read_at
            }
            _ => false,
        };

        summaries.push(ConversationSummaryDto {
            conversation,
            partner_id,
            partner_name: partner.map(|u| u.name.clone()),
            partner_image: partner.and_then(|u| u.image.clone()),
            last_message,
            has_unread,
        });
    }

    Ok(Json(ConversationListResponseDto {
        status: "success".to_string(),
        results: summaries.len() as i64,
        conversations: summaries,
    }))
}

pub async fn get_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let conversation = load_own_conversation(&app_state, conversation_id, auth.user.id).await?;

    let messages = app_state
        .db_client
        .get_messages(conversation_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let (user_a, user_b) = conversation.participants();
    let active_jobs = app_state
        .db_client
        .get_active_jobs_between(user_a, user_b)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(MessageListResponseDto {
        status: "success".to_string(),
        results: messages.len() as i64,
        messages,
        active_jobs,
    }))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(conversation_id): Path<Uuid>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let message_type = body.message_type.unwrap_or(MessageType::Text);
    if message_type == MessageType::SystemEvent {
        return Err(HttpError::bad_request(
            "System messages cannot be sent by clients",
        ));
    }

    load_own_conversation(&app_state, conversation_id, auth.user.id).await?;

    let message = app_state
        .db_client
        .send_message(conversation_id, auth.user.id, &body.content, message_type, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponseDto {
            status: "success".to_string(),
            message,
        }),
    ))
}

pub async fn mark_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    load_own_conversation(&app_state, conversation_id, auth.user.id).await?;

    let conversation = app_state
        .db_client
        .mark_conversation_read(conversation_id, auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ConversationResponseDto {
        status: "success".to_string(),
        conversation,
    }))
}

pub async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let unread = app_state
        .db_client
        .unread_message_count(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UnreadCountResponseDto {
        status: "success".to_string(),
        unread,
    }))
}
