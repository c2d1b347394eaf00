//! Presentation controller.
//!
//! This module follows The Elm Architecture (TEA):
//! - [`Model`]: The complete controller state for one document
//! - [`Message`]: Every host event the controller reacts to
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Feeds host events into `update`

mod event_loop;
mod model;
mod update;

pub use event_loop::{HostEvents, ScriptedHost, content_height};
pub use model::{
    ControllerOptions, GalleryItem, LAZY_SRC_ATTR, Model, ProgressiveImage, ProgressiveState,
    Registrations,
};
pub use update::{Key, Message, update};

use std::time::Duration;

/// Hosting entry point: builds controllers and drives them.
#[derive(Debug, Clone)]
pub struct App {
    viewport_height: f64,
    options: ControllerOptions,
}

impl App {
    /// Create an app for a viewport of the given height in pixels.
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            options: ControllerOptions::default(),
        }
    }

    /// Replace all controller options.
    #[must_use]
    pub const fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the delay between hiding and removing a modal.
    #[must_use]
    pub const fn with_close_delay(mut self, delay: Duration) -> Self {
        self.options.close_delay = delay;
        self
    }

    pub const fn options(&self) -> &ControllerOptions {
        &self.options
    }
}
