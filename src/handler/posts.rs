use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{offerdb::OfferExt, postdb::PostExt, skilldb::SkillExt},
    dtos::{
        offerdtos::OfferListResponseDto,
        postdtos::{
            CommentListResponseDto, CreateCommentDto, CreatePostDto, PostListResponseDto,
            PostResponseDto, RankQueryDto, RankedPostListResponseDto,
        },
        reviewdtos::{CreateReviewDto, ReviewResponseDto},
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

/// The ranked feed: nearest first with an origin, newest first without one.
pub async fn get_feed(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RankQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let skill_ids = query.skill_ids();
    let posts = app_state
        .ranking_service
        .rank_posts(
            query.origin(),
            query.radius_km,
            skill_ids.as_deref(),
            query.search_term(),
        )
        .await
        .map_err(HttpError::from)?;

    Ok(Json(RankedPostListResponseDto {
        status: "success".to_string(),
        results: posts.len() as i64,
        posts,
    }))
}

pub async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreatePostDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if let Some(skill_id) = body.r#type {
        app_state
            .db_client
            .get_skill(skill_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::bad_request("Unknown skill category"))?;
    }

    let post = app_state
        .db_client
        .save_post(
            auth.user.id,
            &body.title,
            body.description.as_deref(),
            body.image_url.as_deref(),
            body.r#type,
            body.target_price,
            body.lat,
            body.long,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(PostResponseDto {
            status: "success".to_string(),
            post,
        }),
    ))
}

/// Open posts with coordinates, for the map view. No cap: the client
/// clusters markers itself.
pub async fn get_map_posts(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let posts = app_state
        .db_client
        .get_open_posts_with_location()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(PostListResponseDto {
        status: "success".to_string(),
        results: posts.len() as i64,
        posts,
    }))
}

pub async fn get_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let post = app_state
        .db_client
        .get_post(post_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Post not found"))?;

    Ok(Json(PostResponseDto {
        status: "success".to_string(),
        post,
    }))
}

pub async fn get_comments(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let comments = app_state
        .db_client
        .get_comments_with_authors(post_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(CommentListResponseDto {
        status: "success".to_string(),
        results: comments.len() as i64,
        comments,
    }))
}

pub async fn create_comment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CreateCommentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let post = app_state
        .db_client
        .get_post(post_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Post not found"))?;

    if post.status.is_terminal() {
        return Err(HttpError::conflict("Post is closed"));
    }

    let comment = app_state
        .db_client
        .save_comment(auth.user.id, post_id, &body.message, body.image_url.as_deref())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// The post's offers, with bidder details. Owner only: bids are private
/// between each maker and the owner.
pub async fn get_post_offers(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let post = app_state
        .db_client
        .get_post(post_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Post not found"))?;

    if post.user_id != auth.user.id {
        return Err(HttpError::forbidden(
            "Only the post owner can see its offers",
        ));
    }

    let offers = app_state
        .db_client
        .get_offers_with_makers(post_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(OfferListResponseDto {
        status: "success".to_string(),
        results: offers.len() as i64,
        offers,
    }))
}

pub async fn mark_fixed(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let post = app_state
        .job_service
        .mark_fixed(auth.user.id, post_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(PostResponseDto {
        status: "success".to_string(),
        post,
    }))
}

pub async fn unassign_maker(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let post = app_state
        .job_service
        .unassign_maker(auth.user.id, post_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(PostResponseDto {
        status: "success".to_string(),
        post,
    }))
}

pub async fn cancel_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let post = app_state
        .job_service
        .cancel_post(auth.user.id, post_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(PostResponseDto {
        status: "success".to_string(),
        post,
    }))
}

pub async fn submit_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (review, post) = app_state
        .job_service
        .submit_review(auth.user.id, post_id, body.rating, body.comment.as_deref())
        .await
        .map_err(HttpError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponseDto {
            status: "success".to_string(),
            review,
            post,
        }),
    ))
}
