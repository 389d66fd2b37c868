pub mod geo;
pub mod password;
pub mod token;
