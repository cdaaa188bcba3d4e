//! The generation pipeline: validate → (extract) → prompt → generate →
//! render → record. Each stage short-circuits to an error response; there is
//! no resumption or partial-progress persistence across requests.

pub mod client;
pub mod deck;
pub mod docx;
pub mod pptx;
pub mod prompt;
pub mod request;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::presentation;

use deck::Deck;
use request::GenerationRequest;

pub struct GenerationOutcome {
    pub filename: String,
    pub title: String,
}

/// Run the pipeline for an already-validated request. Document extraction
/// happens in the handler (it owns the uploaded temp file); everything from
/// prompt building onwards lives here.
pub async fn run(
    cfg: &AppConfig,
    http: &reqwest::Client,
    pool: &DbPool,
    user_id: i64,
    req: &GenerationRequest,
    document_text: Option<&str>,
) -> Result<GenerationOutcome, AppError> {
    let prompt = prompt::build_prompt(&req.topic, req.slide_count, document_text);
    let slides = client::fetch_slides(http, &cfg.generator, &prompt).await?;

    let deck = Deck {
        topic: req.topic.clone(),
        slides,
        style: req.template.style,
    };

    let filename = make_filename();
    let path = cfg.presentation_path(&filename);
    if let Err(e) = pptx::render_deck(&deck, &path) {
        // A failure response must never reference a half-written file.
        let _ = std::fs::remove_file(&path);
        return Err(e);
    }

    let conn = pool.get()?;
    presentation::create(&conn, user_id, &req.topic, &filename)?;

    log::info!("Generated {} ({} slides) for user {user_id}", filename, deck.slides.len());
    Ok(GenerationOutcome {
        filename,
        title: req.topic.clone(),
    })
}

/// Timestamped output name with a short random suffix so two requests in the
/// same second cannot collide.
fn make_filename() -> String {
    use rand::Rng;
    let ts = chrono::Utc::now().timestamp();
    let mut rng = rand::rng();
    let bytes: [u8; 2] = rng.random();
    format!("presentation_{ts}_{}.pptx", hex::encode(bytes))
}
