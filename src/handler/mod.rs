pub mod auth;
pub mod chat;
pub mod contacts;
pub mod notifications;
pub mod offers;
pub mod posts;
pub mod skills;
pub mod users;
