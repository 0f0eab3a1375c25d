pub mod auth;
pub mod certificates;
pub mod dashboard;
pub mod sessions;
pub mod skills;
