pub mod chatmodels;
pub mod contactmodel;
pub mod notificationmodel;
pub mod offermodel;
pub mod postmodel;
pub mod reviewmodel;
pub mod skillmodel;
pub mod usermodel;
