//! Download endpoint tests — a generated deck streams back with the pptx
//! content type; unknown or traversal-shaped names never leave the storage
//! directory.

use actix_web::{App, test, web};
use tempfile::TempDir;

use presently::config::{AppConfig, TEMPLATES};
use presently::generate::deck::{Deck, SlideContent};
use presently::generate::pptx::render_deck;
use presently::handlers::presentation_handlers::{self, PPTX_CONTENT_TYPE};

fn config_with_storage(dir: &TempDir) -> AppConfig {
    let mut cfg = AppConfig::from_env();
    cfg.presentations_dir = dir.path().to_path_buf();
    cfg
}

fn render_fixture(cfg: &AppConfig, filename: &str) {
    let deck = Deck {
        topic: "Download Check".to_string(),
        slides: vec![SlideContent {
            title: "Only Slide".to_string(),
            bullets: vec!["One point".to_string()],
            note: None,
        }],
        style: TEMPLATES[0].style,
    };
    render_deck(&deck, &cfg.presentation_path(filename)).expect("Render failed");
}

#[actix_rt::test]
async fn test_download_returns_deck_with_content_type() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let cfg = config_with_storage(&dir);
    render_fixture(&cfg, "presentation_dl.pptx");

    let app = test::init_service(
        App::new().app_data(web::Data::new(cfg.clone())).route(
            "/download-presentation/{filename}",
            web::get().to(presentation_handlers::download),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/download-presentation/presentation_dl.pptx")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("content-type").expect("No content type"),
        PPTX_CONTENT_TYPE
    );

    let body = test::read_body(resp).await;
    // OPC packages are zip files
    assert!(body.starts_with(b"PK"));
}

#[actix_rt::test]
async fn test_download_unknown_filename_is_404() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let cfg = config_with_storage(&dir);

    let app = test::init_service(
        App::new().app_data(web::Data::new(cfg)).route(
            "/download-presentation/{filename}",
            web::get().to(presentation_handlers::download),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/download-presentation/missing.pptx")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_download_traversal_stays_in_storage_dir() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let cfg = config_with_storage(&dir);
    render_fixture(&cfg, "presentation_safe.pptx");

    let app = test::init_service(
        App::new().app_data(web::Data::new(cfg)).route(
            "/download-presentation/{filename}",
            web::get().to(presentation_handlers::download),
        ),
    )
    .await;

    // Encoded traversal segments resolve to the base component only, which
    // does not exist in the storage directory.
    let req = test::TestRequest::get()
        .uri("/download-presentation/..%2F..%2Fetc%2Fpasswd")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
