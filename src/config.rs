use std::path::{Path, PathBuf};
use std::time::Duration;

/// Background/title/body color triple applied by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateStyle {
    pub background: &'static str,
    pub title_color: &'static str,
    pub body_color: &'static str,
}

/// A selectable deck template. The set is fixed; requests naming anything
/// else are rejected before the generator is invoked.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub style: TemplateStyle,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        id: "default",
        name: "Default (Clean White)",
        description: "White background, black text",
        style: TemplateStyle { background: "FFFFFF", title_color: "000000", body_color: "1A1A1A" },
    },
    Template {
        id: "modern",
        name: "Modern (Image Focused)",
        description: "Light gray background, dark text",
        style: TemplateStyle { background: "E8ECEF", title_color: "1F2933", body_color: "343D46" },
    },
    Template {
        id: "corporate",
        name: "Corporate (Gray Tones)",
        description: "Deep green background, white text",
        style: TemplateStyle { background: "14532D", title_color: "FFFFFF", body_color: "E5E7EB" },
    },
    Template {
        id: "vibrant",
        name: "Vibrant (Orange Energy)",
        description: "Bright orange background, dark text",
        style: TemplateStyle { background: "F97316", title_color: "1F2937", body_color: "262626" },
    },
    Template {
        id: "minimalist",
        name: "Minimalist",
        description: "Shapes on background, black text",
        style: TemplateStyle { background: "FAFAFA", title_color: "000000", body_color: "1F1F1F" },
    },
    Template {
        id: "professional",
        name: "Professional (Navy Blue)",
        description: "Navy blue background, white text",
        style: TemplateStyle { background: "1E3A5F", title_color: "FFFFFF", body_color: "D9E2EC" },
    },
    Template {
        id: "creative",
        name: "Creative (Purple Innovation)",
        description: "Vivid purple background, light text",
        style: TemplateStyle { background: "6D28D9", title_color: "FFFFFF", body_color: "EDE9FE" },
    },
    Template {
        id: "light",
        name: "Cozy (Light Beige)",
        description: "Light background, black text",
        style: TemplateStyle { background: "F5F0E6", title_color: "2B2B2B", body_color: "3F3F3F" },
    },
];

/// Connection settings for the local content-generation service.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model: String,
    /// Generation is slow; the whole request blocks on this.
    pub timeout: Duration,
    pub max_attempts: u32,
}

/// Immutable application configuration, built once at startup and passed
/// explicitly to the handlers, the generator client, and the renderer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub data_dir: PathBuf,
    pub presentations_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub templates: &'static [Template],
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(env_or("DATA_DIR", "data"));
        let presentations_dir = data_dir.join("presentations");

        let timeout_secs = env_or("GENERATOR_TIMEOUT_SECS", "240")
            .parse::<u64>()
            .unwrap_or(240);

        AppConfig {
            generator: GeneratorConfig {
                endpoint: env_or("GENERATOR_URL", "http://127.0.0.1:11434/api/generate"),
                model: env_or("GENERATOR_MODEL", "llama3.1"),
                timeout: Duration::from_secs(timeout_secs),
                max_attempts: 3,
            },
            data_dir,
            presentations_dir,
            max_upload_bytes: 5 * 1024 * 1024,
            templates: TEMPLATES,
        }
    }

    pub fn find_template(&self, id: &str) -> Option<&'static Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Resolve a generated filename inside the presentations directory.
    /// The name is reduced to its base component first, so traversal
    /// segments in the request can never escape the directory.
    pub fn presentation_path(&self, filename: &str) -> PathBuf {
        let base = Path::new(filename)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        self.presentations_dir.join(base)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
