use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::auth::session::require_user_id;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::{ApiErrorResponse, AppError};
use crate::generate::{self, docx, request};
use crate::models::presentation;

pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Multipart body of POST /generate-presentation. The uploaded file is
/// buffered to a temp file that is removed when the form drops, on every
/// exit path.
#[derive(MultipartForm)]
pub struct GenerateForm {
    pub topic: Option<Text<String>>,
    pub slides: Option<Text<i64>>,
    pub template: Option<Text<String>>,
    pub docx_file: Option<TempFile>,
}

pub async fn generate(
    pool: web::Data<DbPool>,
    cfg: web::Data<AppConfig>,
    http: web::Data<reqwest::Client>,
    session: Session,
    MultipartForm(form): MultipartForm<GenerateForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;

    let raw = request::RawGenerationRequest {
        topic: form.topic.as_ref().map(|t| t.0.clone()),
        slides: form.slides.as_ref().map(|s| s.0),
        template: form.template.as_ref().map(|t| t.0.clone()),
        document: form.docx_file.as_ref().map(|f| request::UploadedDocument {
            filename: f.file_name.clone(),
            content_type: f.content_type.as_ref().map(|m| m.essence_str().to_string()),
            size: f.size,
        }),
    };

    // Everything after this point works on normalized values; field failures
    // never reach the generator.
    let validated = match request::validate(&cfg, &raw) {
        Ok(v) => v,
        Err(errors) => {
            return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.join("; ")),
            }));
        }
    };

    let document_text = match &form.docx_file {
        Some(f) => {
            // Temp-file loss is a server-side failure, not a bad upload.
            let bytes = std::fs::read(f.file.path())?;
            match docx::extract_text(&bytes) {
                Ok(text) => {
                    log::info!(
                        "Extracted {} chars of document content for the generator",
                        text.len()
                    );
                    Some(text)
                }
                Err(e) => {
                    log::error!("Invalid DOCX upload: {e}");
                    return Err(AppError::Document(
                        "The uploaded file is not a valid .docx document.".to_string(),
                    ));
                }
            }
        }
        None => None,
    };

    let outcome =
        generate::run(&cfg, &http, &pool, user_id, &validated, document_text.as_deref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Presentation generated successfully",
        "file": outcome.filename,
    })))
}

/// GET /download-presentation/{filename} — streams the binary deck.
/// The filename is reduced to its base component, so traversal segments
/// never escape the storage directory.
pub async fn download(
    cfg: web::Data<AppConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let file_path = cfg.presentation_path(&path.into_inner());
    let data = std::fs::read(&file_path).map_err(|_| AppError::NotFound)?;

    Ok(HttpResponse::Ok()
        .content_type(PPTX_CONTENT_TYPE)
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"presentation.pptx\"",
        ))
        .body(data))
}

/// GET /api/my-presentations — the caller's records, newest first.
pub async fn my_presentations(
    pool: web::Data<DbPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let conn = pool.get()?;
    let records = presentation::find_by_user(&conn, user_id)?;
    Ok(HttpResponse::Ok().json(records))
}

#[derive(Serialize)]
struct TemplateInfo {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

/// GET /api/templates — the fixed template set for the picker.
pub async fn templates(cfg: web::Data<AppConfig>) -> Result<HttpResponse, AppError> {
    let list: Vec<TemplateInfo> = cfg
        .templates
        .iter()
        .map(|t| TemplateInfo {
            id: t.id,
            name: t.name,
            description: t.description,
        })
        .collect();
    Ok(HttpResponse::Ok().json(list))
}
