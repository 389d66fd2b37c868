use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::postmodel::{CommentWithAuthor, Post, RankedPost};
use crate::service::ranking_service::RankedMaker;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreatePostDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub image_url: Option<String>,

    /// Skill id used as the post's category.
    #[serde(rename = "type")]
    pub r#type: Option<Uuid>,

    #[validate(range(min = 0.0, message = "Target price cannot be negative"))]
    pub target_price: Option<f64>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub long: Option<f64>,
}

/// Query string for the ranked feeds. `skills` is a comma-separated list of
/// skill ids; an origin needs both coordinates to count.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RankQueryDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub long: Option<f64>,

    #[validate(range(min = 0.0, message = "Radius cannot be negative"))]
    pub radius_km: Option<f64>,

    pub skills: Option<String>,

    #[validate(length(max = 200, message = "Search term must be at most 200 characters"))]
    pub search: Option<String>,
}

impl RankQueryDto {
    pub fn origin(&self) -> Option<(f64, f64)> {
        match (self.lat, self.long) {
            (Some(lat), Some(long)) => Some((lat, long)),
            _ => None,
        }
    }

    /// Parses the comma-separated skill list, dropping anything that is not
    /// a uuid. An empty result means no filter.
    pub fn skill_ids(&self) -> Option<Vec<Uuid>> {
        let ids: Vec<Uuid> = self
            .skills
            .as_deref()?
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        if ids.is_empty() {
            None
        } else {
            Some(ids)
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateCommentDto {
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1-2000 characters"))]
    pub message: String,

    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponseDto {
    pub status: String,
    pub post: Post,
}

#[derive(Debug, Serialize)]
pub struct PostListResponseDto {
    pub status: String,
    pub posts: Vec<Post>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct RankedPostListResponseDto {
    pub status: String,
    pub posts: Vec<RankedPost>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct RankedMakerListResponseDto {
    pub status: String,
    pub makers: Vec<RankedMaker>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct CommentListResponseDto {
    pub status: String,
    pub comments: Vec<CommentWithAuthor>,
    pub results: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_needs_both_coordinates() {
        let mut query = RankQueryDto {
            lat: Some(52.0),
            ..Default::default()
        };
        assert!(query.origin().is_none());
        query.long = Some(5.0);
        assert_eq!(query.origin(), Some((52.0, 5.0)));
    }

    #[test]
    fn skill_list_parses_and_skips_junk() {
        let id = Uuid::new_v4();
        let query = RankQueryDto {
            skills: Some(format!("{id}, not-a-uuid,")),
            ..Default::default()
        };
        assert_eq!(query.skill_ids(), Some(vec![id]));

        let empty = RankQueryDto {
            skills: Some("junk".to_string()),
            ..Default::default()
        };
        assert!(empty.skill_ids().is_none());
    }
}
