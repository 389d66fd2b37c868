pub mod chatdb;
pub mod contactdb;
pub mod db;
pub mod notificationdb;
pub mod offerdb;
pub mod postdb;
pub mod reviewdb;
pub mod skilldb;
pub mod userdb;
