pub mod dashboard;
pub mod emails;
pub mod login;
pub mod send;
pub mod splash;
pub mod startups;
pub mod upload;
