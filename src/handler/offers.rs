use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        offerdtos::{CreateOfferDto, OfferResponseDto},
        postdtos::PostResponseDto,
        userdtos::Response,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn offers_handler() -> Router {
    Router::new()
        .route("/", post(create_offer))
        .route("/:offer_id/accept", put(accept_offer))
        .route("/:offer_id/decline", put(decline_offer))
        .route("/:offer_id", delete(withdraw_offer))
}

pub async fn create_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateOfferDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let offer = app_state
        .job_service
        .create_offer(&auth.user, body.post_id, &body.message, body.price)
        .await
        .map_err(HttpError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(OfferResponseDto {
            status: "success".to_string(),
            offer,
        }),
    ))
}

pub async fn accept_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(offer_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let post = app_state
        .job_service
        .accept_offer(auth.user.id, offer_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(PostResponseDto {
        status: "success".to_string(),
        post,
    }))
}

pub async fn decline_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(offer_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .job_service
        .decline_offer(auth.user.id, offer_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(Response {
        status: "success",
        message: "Offer declined".to_string(),
    }))
}

pub async fn withdraw_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(offer_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .job_service
        .withdraw_offer(auth.user.id, offer_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(Response {
        status: "success",
        message: "Offer withdrawn".to_string(),
    }))
}
