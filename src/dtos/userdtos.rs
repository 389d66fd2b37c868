use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{skillmodel::Skill, usermodel::User};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 1000, message = "Maker bio must be at most 1000 characters"))]
    pub maker_bio: Option<String>,

    #[validate(length(min = 6, max = 20, message = "Phone number must be between 6-20 characters"))]
    pub phone_number: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub long: Option<f64>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateImageDto {
    #[validate(length(min = 1, max = 2000, message = "Image url must be between 1-2000 characters"))]
    pub image: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SetMakerDto {
    pub maker: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SetSkillsDto {
    pub skill_ids: Vec<Uuid>,
}

/// The caller's own profile: every field they stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub maker_bio: Option<String>,
    pub maker: bool,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            phone_number: user.phone_number.clone(),
            image: user.image.clone(),
            bio: user.bio.clone(),
            maker_bio: user.maker_bio.clone(),
            maker: user.maker,
            lat: user.lat,
            long: user.long,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Someone else's profile. Email and phone number stay None until an
/// accepted contact request exists between the two users.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicUserDto {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub maker_bio: Option<String>,
    pub maker: bool,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl PublicUserDto {
    pub fn filter_user(user: &User, contact_unlocked: bool) -> Self {
        PublicUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: contact_unlocked.then(|| user.email.to_owned()),
            phone_number: if contact_unlocked {
                user.phone_number.clone()
            } else {
                None
            },
            image: user.image.clone(),
            bio: user.bio.clone(),
            maker_bio: user.maker_bio.clone(),
            maker: user.maker,
            lat: user.lat,
            long: user.long,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicUserResponseDto {
    pub status: String,
    pub user: PublicUserDto,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SkillListResponseDto {
    pub status: String,
    pub skills: Vec<Skill>,
    pub results: i64,
}
