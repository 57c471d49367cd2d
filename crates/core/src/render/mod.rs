use serde::{Deserialize, Serialize};

use crate::{engine::Transition, theme::Backdrop};

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Rendering backend abstraction. The engine talks to the surface only
/// through this trait: it resets the surface, presents a transition, or
/// clears it when no line is active.
pub trait RenderTarget {
    /// Drops whatever the previous transition left behind.
    fn reset(&mut self) {}

    fn present(&mut self, transition: &Transition);

    /// Blanks the surface; `at` is the playback position that caused it.
    fn clear(&mut self, at: f64);
}

/// One entry of a rendered session, as recorded by [`TranscriptTarget`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Playback position at which the change was observed.
    pub at: f64,
    /// `None` when the surface was cleared.
    pub index: Option<usize>,
    pub text: String,
    pub effect: Option<String>,
    pub style: Option<String>,
    pub available_duration: Option<f64>,
    pub animation_seconds: Option<f64>,
    pub backdrop: Option<Backdrop>,
}

/// Render target that records every presented change instead of drawing.
#[derive(Debug, Default)]
pub struct TranscriptTarget {
    cues: Vec<Cue>,
    resets: usize,
}

impl TranscriptTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn into_cues(self) -> Vec<Cue> {
        self.cues
    }

    pub fn last(&self) -> Option<&Cue> {
        self.cues.last()
    }

    /// How many times the surface was reset before a transition.
    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl RenderTarget for TranscriptTarget {
    fn reset(&mut self) {
        self.resets += 1;
    }

    fn present(&mut self, transition: &Transition) {
        self.cues.push(Cue {
            at: transition.at,
            index: Some(transition.index),
            text: transition.text.clone(),
            effect: Some(transition.effect.id.to_string()),
            style: Some(transition.style.id.to_string()),
            available_duration: transition.available_duration,
            animation_seconds: Some(transition.timeline.duration()),
            backdrop: transition.backdrop.clone(),
        });
    }

    fn clear(&mut self, at: f64) {
        self.cues.push(Cue {
            at,
            index: None,
            text: String::new(),
            effect: None,
            style: None,
            available_duration: None,
            animation_seconds: None,
            backdrop: None,
        });
    }
}

/// Font size that lets `text` fill most of the viewport: the square root
/// of 80% of the area per character, capped at half the height.
pub fn fit_font_size(viewport: Viewport, text: &str) -> f64 {
    let characters = text.chars().count().max(1) as f64;
    let area = viewport.width * viewport.height * 0.8;
    (area / (characters * 0.7)).sqrt().min(viewport.height * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_are_capped_by_height() {
        let viewport = Viewport::default();
        assert_eq!(fit_font_size(viewport, "hi"), 360.0);
    }

    #[test]
    fn long_lines_shrink() {
        let viewport = Viewport::default();
        let long = "a".repeat(400);
        let size = fit_font_size(viewport, &long);
        assert!(size < 60.0 && size > 30.0);
    }

    #[test]
    fn clear_records_an_empty_cue() {
        let mut target = TranscriptTarget::new();
        target.clear(3.5);

        let cue = target.last().unwrap();
        assert_eq!(cue.index, None);
        assert_eq!(cue.at, 3.5);
        assert!(cue.text.is_empty());
    }
}
