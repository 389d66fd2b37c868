use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::chatmodels::{Conversation, Message, MessageType};
use crate::models::postmodel::Post;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StartConversationDto {
    pub user_id: Uuid,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageDto {
    #[validate(length(min = 1, max = 5000, message = "Message must be between 1-5000 characters"))]
    pub content: String,

    /// Clients may only send text or image; system lines are server-made.
    #[serde(rename = "type")]
    pub message_type: Option<MessageType>,
}

/// Conversation list entry: the other participant plus what the inbox view
/// needs without further round trips.
#[derive(Debug, Serialize)]
pub struct ConversationSummaryDto {
    pub conversation: Conversation,
    pub partner_id: Uuid,
    pub partner_name: Option<String>,
    pub partner_image: Option<String>,
    pub last_message: Option<Message>,
    /// Someone else wrote after the caller's read cursor.
    pub has_unread: bool,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponseDto {
    pub status: String,
    pub conversation: Conversation,
}

#[derive(Debug, Serialize)]
pub struct ConversationListResponseDto {
    pub status: String,
    pub conversations: Vec<ConversationSummaryDto>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponseDto {
    pub status: String,
    pub message: Message,
}

#[derive(Debug, Serialize)]
pub struct MessageListResponseDto {
    pub status: String,
    pub messages: Vec<Message>,
    pub results: i64,
    /// Jobs the two participants currently share, shown as chat context.
    pub active_jobs: Vec<Post>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponseDto {
    pub status: String,
    pub unread: i64,
}
