pub mod auth_handlers;
pub mod presentation_handlers;
pub mod profile_handlers;
