use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::contactmodel::ContactRequest;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateContactRequestDto {
    pub target_user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondContactRequestDto {
    pub accept: bool,
}

/// Incoming request joined with the requester's public fields, assembled in
/// the handler.
#[derive(Debug, Serialize)]
pub struct IncomingContactDto {
    pub request: ContactRequest,
    pub requester_name: Option<String>,
    pub requester_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactRequestResponseDto {
    pub status: String,
    pub request: ContactRequest,
}

#[derive(Debug, Serialize)]
pub struct ContactListResponseDto {
    pub status: String,
    pub requests: Vec<IncomingContactDto>,
    pub results: i64,
}
