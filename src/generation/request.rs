use serde::Serialize;

use crate::paper::PaperData;

pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
pub const DEFAULT_IMAGE_QUALITY: &str = "standard";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

pub(crate) const VISUALS_MAX_TOKENS: u32 = 500;
pub(crate) const VISUALS_TEMPERATURE: f64 = 0.8;

/// Overrides for an image request. Unset fields use the defaults; a set
/// field is sent as given, zero included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOptions {
    pub model: Option<String>,
    pub size: Option<String>,
    pub quality: Option<String>,
    pub count: Option<u32>,
}

/// Overrides for a text request.
///
/// Only `None` falls back to a default. An explicit `temperature` of `0.0`
/// (deterministic sampling) or a `max_tokens` of `0` is sent unchanged
/// rather than being replaced like a falsy value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

impl TextOptions {
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Body of `POST /images/generations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
    pub size: &'a str,
    pub quality: &'a str,
    pub n: u32,
}

impl<'a> ImageRequest<'a> {
    pub fn new(prompt: &'a str, options: &'a ImageOptions) -> Self {
        Self {
            prompt,
            model: options.model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL),
            size: options.size.as_deref().unwrap_or(DEFAULT_IMAGE_SIZE),
            quality: options.quality.as_deref().unwrap_or(DEFAULT_IMAGE_QUALITY),
            n: options.count.unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl<'a> ChatRequest<'a> {
    pub fn new(prompt: &'a str, options: &'a TextOptions) -> Self {
        Self {
            model: options.model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        }
    }
}

/// Instructional prompt asking for presentation ideas for a paper.
///
/// The text is sent verbatim, including its leading newline and four-space
/// line indentation.
pub fn research_visuals_prompt(paper: &PaperData) -> String {
    format!(
        "\n    Create visual storytelling suggestions for a research paper titled \"{title}\".\n    \
         Abstract: {abstract_text}\n    \
         Keywords: {keywords}\n    \
         \n    \
         Generate:\n    \
         1. A compelling visual narrative outline\n    \
         2. Suggested image descriptions for key concepts\n    \
         3. Animation/transition ideas for presentations\n    \
         4. Color palette suggestions\n    \
         \n    \
         Focus on making complex HCI/AR/VR concepts accessible and engaging.\n    ",
        title = paper.title,
        abstract_text = paper.abstract_text,
        keywords = paper.keywords_line(),
    )
}
