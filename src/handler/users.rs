use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        contactdb::ContactExt, offerdb::OfferExt, postdb::PostExt, reviewdb::ReviewExt,
        skilldb::SkillExt, userdb::UserExt,
    },
    dtos::{
        offerdtos::MyOfferListResponseDto,
        postdtos::{PostListResponseDto, RankQueryDto, RankedMakerListResponseDto},
        reviewdtos::ReviewListResponseDto,
        userdtos::{
            FilterUserDto, PublicUserDto, PublicUserResponseDto, SetMakerDto, SetSkillsDto,
            SkillListResponseDto, UpdateImageDto, UpdateProfileDto, UserData, UserResponseDto,
        },
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me).put(update_profile))
        .route("/me/image", put(update_image))
        .route("/me/maker", put(set_maker))
        .route("/me/skills", get(get_my_skills).put(set_skills))
        .route("/me/posts", get(get_my_posts))
        .route("/me/jobs", get(get_my_jobs))
        .route("/me/offers", get(get_my_offers))
        .route("/:user_id", get(get_public_profile))
        .route("/:user_id/reviews", get(get_user_reviews))
}

pub fn makers_handler() -> Router {
    Router::new().route("/", get(list_makers))
}

pub async fn get_me(
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let response = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&auth.user),
        },
    };
    Ok(Json(response))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .update_user_profile(
            auth.user.id,
            body.name.as_deref(),
            body.bio.as_deref(),
            body.maker_bio.as_deref(),
            body.phone_number.as_deref(),
            body.lat,
            body.long,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn update_image(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateImageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .update_user_image(auth.user.id, &body.image)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn set_maker(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SetMakerDto>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .set_maker(auth.user.id, body.maker)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn get_my_skills(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let skills = app_state
        .db_client
        .get_user_skills(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(SkillListResponseDto {
        status: "success".to_string(),
        results: skills.len() as i64,
        skills,
    }))
}

pub async fn set_skills(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SetSkillsDto>,
) -> Result<impl IntoResponse, HttpError> {
    let skills = app_state
        .db_client
        .set_user_skills(auth.user.id, &body.skill_ids)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(SkillListResponseDto {
        status: "success".to_string(),
        results: skills.len() as i64,
        skills,
    }))
}

pub async fn get_my_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let posts = app_state
        .db_client
        .get_posts_by_owner(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(PostListResponseDto {
        status: "success".to_string(),
        results: posts.len() as i64,
        posts,
    }))
}

/// Posts where the caller is the assigned maker.
pub async fn get_my_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let posts = app_state
        .db_client
        .get_posts_by_maker(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(PostListResponseDto {
        status: "success".to_string(),
        results: posts.len() as i64,
        posts,
    }))
}

pub async fn get_my_offers(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let offers = app_state
        .db_client
        .get_offers_by_maker(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(MyOfferListResponseDto {
        status: "success".to_string(),
        results: offers.len() as i64,
        offers,
    }))
}

/// Another user's profile. Contact details stay redacted until an accepted
/// contact request exists between the two users, in either direction.
pub async fn get_public_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    let contact_unlocked = auth.user.id == user_id
        || app_state
            .db_client
            .has_accepted_contact(auth.user.id, user_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

    let skills = app_state
        .db_client
        .get_user_skills(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(PublicUserResponseDto {
        status: "success".to_string(),
        user: PublicUserDto::filter_user(&user, contact_unlocked),
        skills,
    }))
}

pub async fn get_user_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state
        .db_client
        .get_reviews_by_target(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ReviewListResponseDto {
        status: "success".to_string(),
        results: reviews.len() as i64,
        reviews,
    }))
}

/// Ranked maker discovery: nearest first when an origin is supplied.
pub async fn list_makers(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RankQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let skill_ids = query.skill_ids();
    let makers = app_state
        .ranking_service
        .rank_makers(
            query.origin(),
            query.radius_km,
            skill_ids.as_deref(),
            query.search_term(),
        )
        .await
        .map_err(HttpError::from)?;

    Ok(Json(RankedMakerListResponseDto {
        status: "success".to_string(),
        results: makers.len() as i64,
        makers,
    }))
}
