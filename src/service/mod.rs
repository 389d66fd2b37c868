pub mod error;
pub mod job_service;
pub mod notification_service;
pub mod ranking_service;
