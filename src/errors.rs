use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// JSON error body returned by every failing endpoint.
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    Io(std::io::Error),
    Hash(String),
    Session(String),
    /// Uploaded document could not be read or parsed. User-correctable.
    Document(String),
    /// The content generator never produced a usable slide list.
    Generator(String),
    /// Writing the output deck failed.
    Render(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Io(e) => write!(f, "I/O error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Document(e) => write!(f, "Document error: {e}"),
            AppError::Generator(e) => write!(f, "Generator error: {e}"),
            AppError::Render(e) => write!(f, "Render error: {e}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(ApiErrorResponse {
                error: "Not found".to_string(),
                details: None,
            }),
            AppError::Document(msg) => HttpResponse::BadRequest().json(ApiErrorResponse {
                error: msg.clone(),
                details: None,
            }),
            AppError::Generator(msg) => {
                log::error!("{self}");
                HttpResponse::InternalServerError().json(ApiErrorResponse {
                    error: msg.clone(),
                    details: None,
                })
            }
            AppError::Render(msg) => {
                log::error!("{self}");
                HttpResponse::InternalServerError().json(ApiErrorResponse {
                    error: msg.clone(),
                    details: None,
                })
            }
            AppError::Session(_) => HttpResponse::Unauthorized().json(ApiErrorResponse {
                error: "Authentication required".to_string(),
                details: None,
            }),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().json(ApiErrorResponse {
                    error: "Internal Server Error".to_string(),
                    details: None,
                })
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}
