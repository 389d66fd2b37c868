use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::postmodel::Post;
use crate::models::reviewmodel::{Review, ReviewWithAuthor};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateReviewDto {
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub rating: f64,

    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponseDto {
    pub status: String,
    pub review: Review,
    /// The post after the review, so the client sees a closure immediately.
    pub post: Post,
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponseDto {
    pub status: String,
    pub reviews: Vec<ReviewWithAuthor>,
    pub results: i64,
}
