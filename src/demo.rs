//! A sample portfolio page and a scripted visit to it.
//!
//! Used by the `demo` command and the setup benchmark.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::app::{HostEvents, Key, LAZY_SRC_ATTR, Message, Model};
use crate::dom::{Document, NodeId, Tag};
use crate::paper::PaperData;
use crate::visuals;

const SECTION_HEIGHT: f64 = 400.0;

/// Interactive elements of the sample page.
#[derive(Debug, Clone, Default)]
pub struct DemoPage {
    pub gallery_items: Vec<NodeId>,
    pub topic_cards: Vec<NodeId>,
    pub progressive_images: Vec<NodeId>,
}

/// Append `sections` repetitions of the sample content to `doc`'s body.
///
/// Each section holds a lazy hero image, an animated paper visual, a
/// gallery with one image and one video, a progressive image and a topic
/// card, stacked `SECTION_HEIGHT` pixels apart.
pub fn build_sample_page(doc: &mut Document, sections: usize) -> DemoPage {
    let body = doc.body();
    let mut page = DemoPage::default();
    let papers = [
        PaperData::new(
            "Mid-air Haptic Feedback for VR Menus",
            "We compare ultrasound haptic feedback with visual-only feedback for menu selection in virtual reality.",
        )
        .with_keywords(["haptics", "virtual reality"]),
        PaperData::new(
            "Annotating Physical Spaces",
            "An augmented reality toolkit for leaving anchored notes in shared workspaces.",
        )
        .with_keywords(["AR", "collaboration"]),
    ];

    for index in 0..sections {
        #[allow(clippy::cast_precision_loss)]
        let top = index as f64 * SECTION_HEIGHT * 4.0;
        let section = doc
            .build(Tag::Div)
            .class("section")
            .layout(top, SECTION_HEIGHT * 4.0)
            .child_of(body)
            .finish();

        let _hero = doc
            .build(Tag::Img)
            .attr(LAZY_SRC_ATTR, &format!("images/hero-{index}.jpg"))
            .layout(top, SECTION_HEIGHT)
            .child_of(section)
            .finish();

        let paper = &papers[index % papers.len()];
        let visual = visuals::paper_visual(doc, paper);
        doc.add_class(visual, "animate-on-scroll");
        doc.set_layout(visual, top + SECTION_HEIGHT, SECTION_HEIGHT / 2.0);
        if let Err(err) = doc.append_child(section, visual) {
            tracing::warn!(error = %err, "demo.append_failed");
        }

        let gallery_top = top + SECTION_HEIGHT * 1.5;
        let photo = doc
            .build(Tag::Div)
            .class("gallery-item")
            .layout(gallery_top, SECTION_HEIGHT / 2.0)
            .child_of(section)
            .finish();
        let _photo_img = doc
            .build(Tag::Img)
            .attr("src", &format!("gallery/lab-{index}.jpg"))
            .complete()
            .child_of(photo)
            .finish();
        let overlay = doc
            .build(Tag::Div)
            .class("gallery-overlay")
            .child_of(photo)
            .finish();
        let _caption = doc
            .build(Tag::H5)
            .text("In the lab")
            .child_of(overlay)
            .finish();

        let clip = doc
            .build(Tag::Div)
            .class("gallery-item")
            .layout(gallery_top + SECTION_HEIGHT / 2.0, SECTION_HEIGHT / 2.0)
            .child_of(section)
            .finish();
        let _clip_video = doc
            .build(Tag::Video)
            .attr(LAZY_SRC_ATTR, &format!("videos/demo-{index}.mp4"))
            .layout(gallery_top + SECTION_HEIGHT / 2.0, SECTION_HEIGHT / 2.0)
            .child_of(clip)
            .finish();
        page.gallery_items.extend([photo, clip]);

        let container = doc
            .build(Tag::Div)
            .class("progressive-image")
            .layout(top + SECTION_HEIGHT * 2.5, SECTION_HEIGHT / 2.0)
            .child_of(section)
            .finish();
        let image = doc
            .build(Tag::Img)
            .attr("src", &format!("images/poster-{index}.jpg"))
            .child_of(container)
            .finish();
        page.progressive_images.push(image);

        let card = doc
            .build(Tag::Div)
            .class("topic-card")
            .layout(top + SECTION_HEIGHT * 3.0, SECTION_HEIGHT / 2.0)
            .child_of(section)
            .finish();
        let _title = doc
            .build(Tag::H5)
            .text(&paper.title)
            .child_of(card)
            .finish();
        let _summary = doc
            .build(Tag::P)
            .text(&paper.abstract_text)
            .child_of(card)
            .finish();
        page.topic_cards.push(card);
    }
    page
}

enum Step {
    Send(Message),
    /// Press Escape on whatever has focus
    EscapeFocused,
}

/// Event source for a short visit: scroll through the page, open and close
/// both modal kinds, preview a video and let the posters finish loading.
pub struct VisitHost {
    steps: VecDeque<Step>,
}

impl VisitHost {
    pub fn new(page: &DemoPage, start: Instant, close_delay: Duration) -> Self {
        let mut steps = VecDeque::from([
            Step::Send(Message::ScrollTo(SECTION_HEIGHT)),
            Step::Send(Message::ScrollTo(SECTION_HEIGHT * 3.0)),
        ]);
        let mut clock = start;
        let mut wait = |steps: &mut VecDeque<Step>, step: Duration| {
            clock += step;
            steps.push_back(Step::Send(Message::Tick(clock)));
        };

        if let Some(&item) = page.gallery_items.first() {
            steps.push_back(Step::Send(Message::KeyDown(item, Key::Enter)));
            wait(&mut steps, Duration::from_millis(500));
            steps.push_back(Step::EscapeFocused);
            wait(&mut steps, Duration::from_millis(16));
            wait(&mut steps, close_delay);
        }
        if let Some(&video_item) = page.gallery_items.get(1) {
            steps.push_back(Step::Send(Message::PointerEnter(video_item)));
            steps.push_back(Step::Send(Message::PointerLeave(video_item)));
        }
        if let Some(&card) = page.topic_cards.first() {
            steps.push_back(Step::Send(Message::Click(card)));
            wait(&mut steps, Duration::from_millis(500));
        }
        for &image in &page.progressive_images {
            steps.push_back(Step::Send(Message::MediaLoaded(image)));
        }
        Self { steps }
    }
}

impl HostEvents for VisitHost {
    fn next_message(&mut self, model: &Model) -> Option<Message> {
        loop {
            match self.steps.pop_front()? {
                Step::Send(msg) => return Some(msg),
                Step::EscapeFocused => {
                    if let Some(focused) = model.document.focused() {
                        return Some(Message::KeyDown(focused, Key::Escape));
                    }
                }
            }
        }
    }
}
