pub mod chatdtos;
pub mod contactdtos;
pub mod notificationdtos;
pub mod offerdtos;
pub mod postdtos;
pub mod reviewdtos;
pub mod userdtos;
