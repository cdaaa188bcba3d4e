//! Request validator tests — field constraints, defaults, and the
//! filename sanitization used by the download endpoint.

use presently::config::AppConfig;
use presently::generate::request::{
    self, DEFAULT_TOPIC, DOCX_CONTENT_TYPE, RawGenerationRequest, UPLOAD_TOPIC, UploadedDocument,
};

fn test_config() -> AppConfig {
    AppConfig::from_env()
}

fn docx_upload(size: usize) -> UploadedDocument {
    UploadedDocument {
        filename: Some("notes.docx".to_string()),
        content_type: Some(DOCX_CONTENT_TYPE.to_string()),
        size,
    }
}

#[test]
fn test_defaults_applied() {
    let cfg = test_config();
    let raw = RawGenerationRequest::default();

    let validated = request::validate(&cfg, &raw).expect("Validation failed");
    assert_eq!(validated.topic, DEFAULT_TOPIC);
    assert_eq!(validated.slide_count, 5);
    assert_eq!(validated.template.id, "default");
    assert!(!validated.has_document);
}

#[test]
fn test_topic_defaults_to_upload_label_with_document() {
    let cfg = test_config();
    let raw = RawGenerationRequest {
        topic: Some("   ".to_string()),
        document: Some(docx_upload(1024)),
        ..Default::default()
    };

    let validated = request::validate(&cfg, &raw).expect("Validation failed");
    assert_eq!(validated.topic, UPLOAD_TOPIC);
    assert!(validated.has_document);
}

#[test]
fn test_slide_count_bounds() {
    let cfg = test_config();

    for n in [1, 5, 20] {
        let raw = RawGenerationRequest { slides: Some(n), ..Default::default() };
        let validated = request::validate(&cfg, &raw).expect("Validation failed");
        assert_eq!(validated.slide_count as i64, n);
    }

    for n in [0, -3, 21, 500] {
        let raw = RawGenerationRequest { slides: Some(n), ..Default::default() };
        let errors = request::validate(&cfg, &raw).expect_err("Out-of-range count accepted");
        assert!(errors.iter().any(|e| e.contains("Slide count")), "{errors:?}");
    }
}

#[test]
fn test_unknown_template_rejected() {
    let cfg = test_config();
    let raw = RawGenerationRequest {
        template: Some("neon-disco".to_string()),
        ..Default::default()
    };

    let errors = request::validate(&cfg, &raw).expect_err("Unknown template accepted");
    assert!(errors.iter().any(|e| e.contains("neon-disco")), "{errors:?}");
}

#[test]
fn test_known_templates_resolve() {
    let cfg = test_config();
    for id in ["default", "modern", "corporate", "vibrant", "minimalist", "professional", "creative", "light"] {
        let raw = RawGenerationRequest {
            template: Some(id.to_string()),
            ..Default::default()
        };
        let validated = request::validate(&cfg, &raw).expect("Validation failed");
        assert_eq!(validated.template.id, id);
    }
}

#[test]
fn test_oversized_upload_rejected() {
    let cfg = test_config();
    let raw = RawGenerationRequest {
        document: Some(docx_upload(cfg.max_upload_bytes + 1)),
        ..Default::default()
    };

    let errors = request::validate(&cfg, &raw).expect_err("Oversized upload accepted");
    assert!(errors.iter().any(|e| e.contains("5MB")), "{errors:?}");
}

#[test]
fn test_wrong_content_type_rejected() {
    let cfg = test_config();
    let raw = RawGenerationRequest {
        document: Some(UploadedDocument {
            filename: Some("notes.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            size: 1024,
        }),
        ..Default::default()
    };

    let errors = request::validate(&cfg, &raw).expect_err("Wrong content type accepted");
    assert!(errors.iter().any(|e| e.contains(".docx")), "{errors:?}");
}

#[test]
fn test_octet_stream_with_docx_extension_accepted() {
    let cfg = test_config();
    let raw = RawGenerationRequest {
        document: Some(UploadedDocument {
            filename: Some("Notes.DOCX".to_string()),
            content_type: Some("application/octet-stream".to_string()),
            size: 1024,
        }),
        ..Default::default()
    };

    let validated = request::validate(&cfg, &raw).expect("Validation failed");
    assert!(validated.has_document);
}

#[test]
fn test_all_violations_reported_together() {
    let cfg = test_config();
    let raw = RawGenerationRequest {
        slides: Some(99),
        template: Some("missing".to_string()),
        document: Some(UploadedDocument {
            filename: Some("big.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            size: cfg.max_upload_bytes + 1,
        }),
        ..Default::default()
    };

    let errors = request::validate(&cfg, &raw).expect_err("Invalid request accepted");
    assert_eq!(errors.len(), 3, "{errors:?}");
}

#[test]
fn test_download_path_traversal_sanitized() {
    let cfg = test_config();

    let safe = cfg.presentation_path("presentation_1.pptx");
    assert!(safe.starts_with(&cfg.presentations_dir));

    let traversal = cfg.presentation_path("../../etc/passwd");
    assert!(traversal.starts_with(&cfg.presentations_dir));
    assert!(traversal.ends_with("passwd"));

    let nested = cfg.presentation_path("/var/tmp/presentation_2.pptx");
    assert_eq!(nested, cfg.presentations_dir.join("presentation_2.pptx"));
}
