use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    db::{contactdb::ContactExt, userdb::UserExt},
    dtos::contactdtos::{
        ContactListResponseDto, ContactRequestResponseDto, CreateContactRequestDto,
        IncomingContactDto, RespondContactRequestDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::{contactmodel::ContactStatus, notificationmodel::NotificationType},
    AppState,
};

pub fn contacts_handler() -> Router {
    Router::new()
        .route("/", post(create_contact_request))
        .route("/incoming", get(get_incoming_requests))
        .route("/:request_id/respond", put(respond_to_request))
}

pub async fn create_contact_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateContactRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    if body.target_user_id == auth.user.id {
        return Err(HttpError::bad_request(
            "You cannot send a contact request to yourself",
        ));
    }

    app_state
        .db_client
        .get_user(Some(body.target_user_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    // A still-pending or already-accepted request in this direction is
    // reused instead of duplicated; only a denied one may be retried.
    if let Some(existing) = app_state
        .db_client
        .get_directed_request(auth.user.id, body.target_user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
    {
        if existing.status != ContactStatus::Denied {
            return Ok((
                StatusCode::OK,
                Json(ContactRequestResponseDto {
                    status: "success".to_string(),
                    request: existing,
                }),
            ));
        }
    }

    let request = app_state
        .db_client
        .save_contact_request(auth.user.id, body.target_user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .notification_service
        .dispatch(
            body.target_user_id,
            NotificationType::ContactRequest,
            request.id,
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ContactRequestResponseDto {
            status: "success".to_string(),
            request,
        }),
    ))
}

pub async fn get_incoming_requests(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let requests = app_state
        .db_client
        .get_incoming_requests(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let requester_ids: Vec<Uuid> = requests.iter().map(|r| r.requester_id).collect();
    let requesters = app_state
        .db_client
        .get_users_by_ids(&requester_ids)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let requests: Vec<IncomingContactDto> = requests
        .into_iter()
        .map(|request| {
            let requester = requesters.iter().find(|u| u.id == request.requester_id);
            IncomingContactDto {
                requester_name: requester.map(|u| u.name.clone()),
                requester_image: requester.and_then(|u| u.image.clone()),
                request,
            }
        })
        .collect();

    Ok(Json(ContactListResponseDto {
        status: "success".to_string(),
        results: requests.len() as i64,
        requests,
    }))
}

pub async fn respond_to_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<RespondContactRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    let request = app_state
        .db_client
        .get_contact_request(request_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Contact request not found"))?;

    if request.target_user_id != auth.user.id {
        return Err(HttpError::forbidden(
            "Only the request's recipient can respond to it",
        ));
    }
    if request.status != ContactStatus::Pending {
        return Err(HttpError::conflict("Contact request was already answered"));
    }

    let status = if body.accept {
        ContactStatus::Accepted
    } else {
        ContactStatus::Denied
    };
    let request = app_state
        .db_client
        .update_contact_status(request_id, status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if request.status == ContactStatus::Accepted {
        app_state
            .notification_service
            .dispatch(
                request.requester_id,
                NotificationType::ContactRequest,
                request.id,
            )
            .await;
    }

    Ok(Json(ContactRequestResponseDto {
        status: "success".to_string(),
        request,
    }))
}
