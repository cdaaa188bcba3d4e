use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::require_user_id;
use crate::auth::{password, validate};
use crate::db::DbPool;
use crate::errors::{ApiErrorResponse, AppError};
use crate::models::user;

#[derive(Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

/// GET /api/profile
pub async fn show(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let conn = pool.get()?;
    let display = user::find_display_by_id(&conn, user_id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(display))
}

/// POST /api/profile — update name/email, and password when one is supplied.
pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<ProfileForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;

    let mut errors = Vec::new();
    errors.extend(validate::validate_name(&body.name));
    errors.extend(validate::validate_email(&body.email));
    if !body.password.is_empty() {
        errors.extend(validate::validate_password(&body.password));
        if body.password != body.password_confirmation {
            errors.push("Password confirmation does not match".to_string());
        }
    }

    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
            error: "Validation failed".to_string(),
            details: Some(errors.join("; ")),
        }));
    }

    let conn = pool.get()?;
    let email = body.email.trim();
    if user::email_taken(&conn, email, Some(user_id))? {
        return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
            error: "Email is already registered".to_string(),
            details: None,
        }));
    }

    user::update_profile(&conn, user_id, body.name.trim(), email)?;

    if !body.password.is_empty() {
        let hashed = password::hash_password(&body.password).map_err(AppError::Hash)?;
        user::update_password(&conn, user_id, &hashed)?;
    }

    let _ = session.insert("username", body.name.trim());

    let display = user::find_display_by_id(&conn, user_id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(display))
}
