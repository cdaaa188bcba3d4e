use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::auth::session::require_user_id;
use crate::auth::{password, rate_limit::RateLimiter, validate};
use crate::db::DbPool;
use crate::errors::{ApiErrorResponse, AppError};
use crate::models::user;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Serialize)]
struct AuthResponse {
    message: String,
    user: user::UserDisplay,
}

pub async fn login(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        return Ok(HttpResponse::TooManyRequests().json(ApiErrorResponse {
            error: "Too many failed login attempts. Please try again later.".to_string(),
            details: None,
        }));
    }

    let conn = pool.get()?;
    let found = user::find_by_email(&conn, body.email.trim())?;

    match found {
        Some(u) if matches!(password::verify_password(&body.password, &u.password), Ok(true)) => {
            limiter.clear(ip);
            session.renew();
            let _ = session.insert("user_id", u.id);
            let _ = session.insert("username", &u.name);

            let display = user::find_display_by_id(&conn, u.id)?.ok_or(AppError::NotFound)?;
            Ok(HttpResponse::Ok().json(AuthResponse {
                message: "Logged in".to_string(),
                user: display,
            }))
        }
        _ => {
            limiter.record_failure(ip);
            Ok(HttpResponse::Unauthorized().json(ApiErrorResponse {
                error: "Invalid credentials".to_string(),
                details: None,
            }))
        }
    }
}

pub async fn register(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_name(&body.name));
    errors.extend(validate::validate_email(&body.email));
    errors.extend(validate::validate_password(&body.password));
    if body.password != body.password_confirmation {
        errors.push("Password confirmation does not match".to_string());
    }

    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
            error: "Validation failed".to_string(),
            details: Some(errors.join("; ")),
        }));
    }

    let conn = pool.get()?;
    let email = body.email.trim().to_string();
    if user::email_taken(&conn, &email, None)? {
        return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
            error: "Email is already registered".to_string(),
            details: None,
        }));
    }

    let hashed = password::hash_password(&body.password).map_err(AppError::Hash)?;
    let new_user = user::NewUser {
        name: body.name.trim().to_string(),
        email,
        password: hashed,
    };
    let created_id = user::create(&conn, &new_user)?;

    // Registration doubles as login, as the SPA expects.
    session.renew();
    let _ = session.insert("user_id", created_id);
    let _ = session.insert("username", &new_user.name);

    let display = user::find_display_by_id(&conn, created_id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(AuthResponse {
        message: "Registered".to_string(),
        user: display,
    }))
}

pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out" })))
}

/// GET /api/user — the current session user.
pub async fn current_user(
    pool: web::Data<DbPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let conn = pool.get()?;
    let display = user::find_display_by_id(&conn, user_id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(display))
}
