use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Json, Router};

use crate::{
    db::skilldb::SkillExt, dtos::userdtos::SkillListResponseDto, error::HttpError, AppState,
};

pub fn skills_handler() -> Router {
    Router::new().route("/", get(get_skills))
}

pub async fn get_skills(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let skills = app_state
        .db_client
        .get_active_skills()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(SkillListResponseDto {
        status: "success".to_string(),
        results: skills.len() as i64,
        skills,
    }))
}
