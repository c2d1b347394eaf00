//! Client for the remote image and text generation API.
//!
//! Each call sends one authenticated JSON request and returns the parsed
//! response body as an untyped [`serde_json::Value`].

mod client;
mod error;
mod request;

pub use client::{API_KEY_ENV, ClientConfig, DEFAULT_BASE_URL, GenerationClient, api_key_from_env};
pub use error::GenerationError;
pub use request::{
    ChatMessage, ChatRequest, DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_QUALITY, DEFAULT_IMAGE_SIZE,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TEXT_MODEL, ImageOptions, ImageRequest,
    TextOptions, research_visuals_prompt,
};
