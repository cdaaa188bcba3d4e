use std::fmt::Write;

pub const SYSTEM_PROMPT: &str =
    "You are a JSON generator. Always output only valid JSON as specified in the prompt.";

/// Instruction pair sent to the content generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub user: String,
    pub system: String,
}

/// Pure function: (topic, slide count, extracted text or none) → prompt.
/// The generator is asked for a fixed JSON shape so the client can parse the
/// reply without scraping prose.
pub fn build_prompt(topic: &str, slide_count: u8, document_text: Option<&str>) -> Prompt {
    let mut user = String::from("Generate a detailed presentation outline");

    match document_text {
        Some(text) => {
            let _ = write!(
                user,
                " based on the following document content:\n\n{text}\n\n\
                 Summarize and structure the key points from the document into exactly {slide_count} slides."
            );
        }
        None => {
            let _ = write!(user, " for '{topic}' with exactly {slide_count} slides.");
        }
    }

    user.push_str(
        "\nFor each slide, provide: a concise but engaging title, and 3-5 informative bullet points (use full sentences).\n\
         Ensure the output is complete and valid JSON.\n\
         Output ONLY the JSON object in this exact format: {\"slides\": [{\"title\": \"\", \"bullets\": [\"\"]}]}.",
    );

    Prompt {
        user,
        system: SYSTEM_PROMPT.to_string(),
    }
}
