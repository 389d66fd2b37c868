use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::offermodel::{Offer, OfferWithMaker};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateOfferDto {
    pub post_id: Uuid,

    #[validate(length(min = 1, max = 2000, message = "Message must be between 1-2000 characters"))]
    pub message: String,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct OfferResponseDto {
    pub status: String,
    pub offer: Offer,
}

#[derive(Debug, Serialize)]
pub struct OfferListResponseDto {
    pub status: String,
    pub offers: Vec<OfferWithMaker>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct MyOfferListResponseDto {
    pub status: String,
    pub offers: Vec<Offer>,
    pub results: i64,
}
