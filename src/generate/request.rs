use crate::config::{AppConfig, Template};

pub const MIN_SLIDES: i64 = 1;
pub const MAX_SLIDES: i64 = 20;
pub const DEFAULT_SLIDES: u8 = 5;

pub const DEFAULT_TOPIC: &str = "AI in Healthcare";
pub const UPLOAD_TOPIC: &str = "Presentation based on uploaded document";
pub const DEFAULT_TEMPLATE: &str = "default";

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Raw request fields as they arrive from the multipart form, before any
/// defaulting or checking.
#[derive(Debug, Default)]
pub struct RawGenerationRequest {
    pub topic: Option<String>,
    pub slides: Option<i64>,
    pub template: Option<String>,
    pub document: Option<UploadedDocument>,
}

/// Validation-relevant view of an uploaded file.
#[derive(Debug)]
pub struct UploadedDocument {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Normalized request: defaults applied, template resolved, document checked.
#[derive(Debug)]
pub struct GenerationRequest {
    pub topic: String,
    pub slide_count: u8,
    pub template: &'static Template,
    pub has_document: bool,
}

/// Check field constraints and apply defaults. Returns every violated field
/// at once so the client can fix them in one round.
pub fn validate(cfg: &AppConfig, raw: &RawGenerationRequest) -> Result<GenerationRequest, Vec<String>> {
    let mut errors = Vec::new();

    let slide_count = match raw.slides {
        None => DEFAULT_SLIDES,
        Some(n) if (MIN_SLIDES..=MAX_SLIDES).contains(&n) => n as u8,
        Some(n) => {
            errors.push(format!(
                "Slide count must be between {MIN_SLIDES} and {MAX_SLIDES} (got {n})"
            ));
            DEFAULT_SLIDES
        }
    };

    let template_id = raw
        .template
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TEMPLATE);
    let template = match cfg.find_template(template_id) {
        Some(t) => t,
        None => {
            errors.push(format!(
                "The selected design template '{template_id}' is not available"
            ));
            // placeholder; errors is non-empty so it is never used
            &cfg.templates[0]
        }
    };

    if let Some(doc) = &raw.document {
        if doc.size > cfg.max_upload_bytes {
            errors.push("File size cannot exceed 5MB.".to_string());
        }
        if !is_docx(doc) {
            errors.push("Uploaded file must be a .docx document".to_string());
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let topic = raw
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            if raw.document.is_some() {
                UPLOAD_TOPIC.to_string()
            } else {
                DEFAULT_TOPIC.to_string()
            }
        });

    Ok(GenerationRequest {
        topic,
        slide_count,
        template,
        has_document: raw.document.is_some(),
    })
}

/// Accept the docx content type, or the .docx extension when the client sent
/// a generic octet-stream.
fn is_docx(doc: &UploadedDocument) -> bool {
    if doc.content_type.as_deref() == Some(DOCX_CONTENT_TYPE) {
        return true;
    }
    let generic = matches!(
        doc.content_type.as_deref(),
        None | Some("application/octet-stream")
    );
    generic
        && doc
            .filename
            .as_deref()
            .is_some_and(|n| n.to_ascii_lowercase().ends_with(".docx"))
}
