//! Client for the local content-generation service (Ollama-style API).
//!
//! The service accepts `{model, prompt, system, format, stream}` and answers
//! with `{response: <string>}` where the string should itself be JSON but is
//! not guaranteed to be. The full request+parse cycle runs up to
//! `max_attempts` times; the first attempt yielding a non-empty slide list
//! wins.

use serde::{Deserialize, Serialize};

use super::deck::SlideContent;
use super::prompt::Prompt;
use crate::config::GeneratorConfig;
use crate::errors::AppError;

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    format: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateEnvelope {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct SlidePayload {
    slides: Vec<SlideContent>,
}

/// Build the shared HTTP client. Generation is slow, so the timeout is on
/// the order of minutes (configured).
pub fn build_client(cfg: &GeneratorConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(cfg.timeout)
        .build()
        .expect("Failed to build HTTP client")
}

/// Sequential bounded retry: up to `cfg.max_attempts` request+parse cycles.
/// Exhaustion is terminal; nothing above this retries again.
pub async fn fetch_slides(
    client: &reqwest::Client,
    cfg: &GeneratorConfig,
    prompt: &Prompt,
) -> Result<Vec<SlideContent>, AppError> {
    for attempt in 1..=cfg.max_attempts {
        match request_once(client, cfg, prompt).await {
            Ok(slides) => {
                log::info!("Generator produced {} slides on attempt {attempt}", slides.len());
                return Ok(slides);
            }
            Err(reason) => {
                log::warn!("Generator attempt {attempt}/{} failed: {reason}", cfg.max_attempts);
            }
        }
    }
    Err(AppError::Generator("Could not obtain valid slides data.".to_string()))
}

async fn request_once(
    client: &reqwest::Client,
    cfg: &GeneratorConfig,
    prompt: &Prompt,
) -> Result<Vec<SlideContent>, String> {
    let body = GenerateBody {
        model: &cfg.model,
        prompt: &prompt.user,
        system: &prompt.system,
        format: "json",
        stream: false,
    };

    let response = client
        .post(&cfg.endpoint)
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("generator returned HTTP {}", response.status()));
    }

    let envelope: GenerateEnvelope = response
        .json()
        .await
        .map_err(|e| format!("unreadable response envelope: {e}"))?;

    parse_slides(&envelope.response)
        .ok_or_else(|| "no usable slide list in generator output".to_string())
}

/// Parse the inner payload: direct JSON parse first, then a salvage pass for
/// JSON-with-noise. Only a non-empty `slides` list is accepted.
pub fn parse_slides(raw: &str) -> Option<Vec<SlideContent>> {
    if let Ok(payload) = serde_json::from_str::<SlidePayload>(raw) {
        if !payload.slides.is_empty() {
            return Some(payload.slides);
        }
    }

    let salvaged = salvage_json(raw)?;
    match serde_json::from_str::<SlidePayload>(&salvaged) {
        Ok(payload) if !payload.slides.is_empty() => Some(payload.slides),
        _ => None,
    }
}

/// Take the substring between the first `{` and the last `}` and strip
/// trailing commas before a closing bracket — the two defects generators
/// actually produce.
fn salvage_json(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    let slice = &raw[start..=end];

    let mut out = String::with_capacity(slice.len());
    for (idx, c) in slice.char_indices() {
        if c == ',' {
            let rest = slice[idx + c.len_utf8()..].trim_start();
            if rest.starts_with('}') || rest.starts_with(']') {
                continue;
            }
        }
        out.push(c);
    }
    Some(out)
}
