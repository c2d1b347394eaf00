use std::collections::VecDeque;

use crate::app::{App, Message, Model, update};
use crate::dom::Document;
use crate::viewport::Viewport;

/// Source of host events.
///
/// The host owns the real input (browser events, a test script, a CLI
/// demo) and hands the controller one message at a time.
pub trait HostEvents {
    /// Next message, or `None` when the host is done.
    fn next_message(&mut self, model: &Model) -> Option<Message>;
}

/// Replays a fixed list of messages.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    messages: VecDeque<Message>,
}

impl ScriptedHost {
    pub fn new(messages: impl IntoIterator<Item = Message>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
        }
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push_back(msg);
    }

    pub fn remaining(&self) -> usize {
        self.messages.len()
    }
}

impl HostEvents for ScriptedHost {
    fn next_message(&mut self, _model: &Model) -> Option<Message> {
        self.messages.pop_front()
    }
}

impl App {
    /// Attach a controller to `document`, sizing the viewport from its layout.
    pub fn attach(&self, document: Document) -> Model {
        let total_height = content_height(&document);
        let viewport = Viewport::new(self.viewport_height, total_height);
        Model::attach(document, viewport, self.options)
    }

    /// Feed host messages into `update` until the host runs out.
    pub fn run(&self, mut model: Model, host: &mut impl HostEvents) -> Model {
        let mut handled = 0usize;
        while let Some(msg) = host.next_message(&model) {
            tracing::trace!(?msg, "event");
            model = update(model, msg);
            handled += 1;
        }
        tracing::debug!(handled, "event_loop.done");
        model
    }
}

/// Bottom edge of the lowest element in `body`.
pub fn content_height(document: &Document) -> f64 {
    document
        .descendants(document.body())
        .into_iter()
        .map(|id| document.element(id).layout().bottom())
        .fold(0.0, f64::max)
}
