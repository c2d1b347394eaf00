// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. modal::ModalSession)
    clippy::module_name_repetitions
)]

//! # Showcase
//!
//! Presentation logic for a research portfolio page, plus a small client
//! for an image and text generation API.
//!
//! The controller handles:
//! - Lazy loading of images and videos as they approach the viewport
//! - One-shot scroll animations
//! - Gallery and topic modals with delayed removal
//! - Progressive image load states
//!
//! ## Architecture
//!
//! The controller uses The Elm Architecture (TEA) pattern:
//! - **Model**: Controller state over an owned [`dom::Document`]
//! - **Message**: Host events (scroll, click, key, media, clock)
//! - **Update**: Pure state transitions
//! - **Host**: A [`app::HostEvents`] source feeding messages in
//!
//! ## Modules
//!
//! - [`app`]: Controller state, messages and the event loop
//! - [`dom`]: Arena document the controller reads and mutates
//! - [`viewport`]: Scroll position and visible bounds
//! - [`observer`]: Intersection watches
//! - [`modal`]: Modal construction and the session registry
//! - [`visuals`]: Research theme detection and paper cards
//! - [`styles`]: Shared modal stylesheet
//! - [`generation`]: Generation API client
//! - [`config`]: Defaults file handling
//! - [`demo`]: Sample page and scripted visit

pub mod app;
pub mod config;
pub mod demo;
pub mod dom;
pub mod generation;
pub mod modal;
pub mod observer;
pub mod paper;
pub mod styles;
pub mod viewport;
pub mod visuals;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, update};
    pub use crate::dom::{Document, NodeId, Selector, Tag};
    pub use crate::generation::{GenerationClient, GenerationError};
    pub use crate::paper::PaperData;
    pub use crate::viewport::Viewport;
}
