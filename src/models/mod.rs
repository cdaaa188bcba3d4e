pub mod presentation;
pub mod user;
