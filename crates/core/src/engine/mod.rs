//! Timing engine: maps the playback position onto the active lyric line.
//!
//! [`LyricEngine::update`] is called on every position notification from the
//! player, which fires far more often than lines change. Resolving the same
//! line again is a no-op; only a change of the active index selects an effect
//! and style and reaches the render target.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    animation::Timeline,
    config::{AppConfig, EngineConfig},
    effects::{self, catalogue, AnimationEffect, EffectContext},
    lyrics::LyricTrack,
    render::{RenderTarget, Viewport},
    styles::{self, StyleVariation},
    theme::{Backdrop, Session},
};

/// What to show for positions before the first line's timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StartBoundary {
    /// Blank before the first line, except at (or before) position zero,
    /// where the first line shows immediately.
    #[default]
    ShowAtZero,
    /// Blank for every position before the first line.
    Uniform,
}

/// Coarse engine state for a playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No lyrics loaded.
    Idle,
    /// Playback has not reached the first line yet.
    BeforeFirst,
    Active(usize),
    /// At or past the last line, which stays on screen.
    AfterLast,
}

/// The line currently on screen. Only the engine mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActiveLyricState {
    active_index: Option<usize>,
    active_text: String,
    previous_index: Option<usize>,
}

impl ActiveLyricState {
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Text on screen; empty when nothing is active.
    pub fn active_text(&self) -> &str {
        &self.active_text
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.previous_index
    }
}

/// Everything the renderer needs to show a newly active line.
#[derive(Debug, Clone)]
pub struct Transition {
    pub index: usize,
    /// Playback position that triggered the change.
    pub at: f64,
    pub text: String,
    pub effect: &'static AnimationEffect,
    pub style: &'static StyleVariation,
    /// Seconds until the next line; `None` for the last line.
    pub available_duration: Option<f64>,
    pub timeline: Timeline,
    pub backdrop: Option<Backdrop>,
}

/// Outcome of one position update.
#[derive(Debug, Clone)]
pub enum Update {
    /// Same line as before; nothing was rendered.
    Unchanged,
    /// No line is active any more and the target was cleared.
    Cleared,
    Transitioned(Box<Transition>),
}

impl Update {
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            Update::Transitioned(transition) => Some(transition),
            _ => None,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Update::Unchanged)
    }
}

/// Effect and style choice: an explicit id when configured and known,
/// otherwise a fresh uniform pick for every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub effect_id: Option<String>,
    pub style_id: Option<String>,
}

impl Selection {
    pub fn new(effect_id: Option<String>, style_id: Option<String>) -> Self {
        let selection = Self {
            effect_id,
            style_id,
        };
        selection.warn_unknown();
        selection
    }

    pub fn effect<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static AnimationEffect {
        self.effect_id
            .as_deref()
            .and_then(effects::animation_effect_by_id)
            .or_else(|| effects::animation_effects().pick_random_with(rng))
            .unwrap_or(&catalogue::FADE_IN_UP)
    }

    pub fn style<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static StyleVariation {
        self.style_id
            .as_deref()
            .and_then(styles::style_variation_by_id)
            .or_else(|| styles::style_variations().pick_random_with(rng))
            .unwrap_or(&styles::DEFAULT)
    }

    fn warn_unknown(&self) {
        if let Some(id) = self.effect_id.as_deref() {
            if effects::animation_effect_by_id(id).is_none() {
                tracing::warn!(id, "unknown effect id, falling back to random effects");
            }
        }
        if let Some(id) = self.style_id.as_deref() {
            if styles::style_variation_by_id(id).is_none() {
                tracing::warn!(id, "unknown style id, falling back to random styles");
            }
        }
    }
}

/// Lyric timing state machine for one playback session.
#[derive(Debug)]
pub struct LyricEngine {
    track: LyricTrack,
    state: ActiveLyricState,
    selection: Selection,
    boundary: StartBoundary,
    viewport: Viewport,
    session: Session,
    rng: StdRng,
}

impl Default for LyricEngine {
    fn default() -> Self {
        Self::new(LyricTrack::default())
    }
}

impl LyricEngine {
    pub fn new(track: LyricTrack) -> Self {
        Self {
            track,
            state: ActiveLyricState::default(),
            selection: Selection::default(),
            boundary: StartBoundary::default(),
            viewport: Viewport::default(),
            session: Session::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Builds an engine from the application configuration.
    pub fn from_config(track: LyricTrack, config: &AppConfig) -> Self {
        let EngineConfig {
            effect_id,
            style_id,
            start_boundary,
        } = config.engine.clone();

        Self::new(track)
            .with_selection(Selection::new(effect_id, style_id))
            .with_start_boundary(start_boundary)
            .with_viewport(config.viewport)
            .with_session(Session::new(config.theme))
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_start_boundary(mut self, boundary: StartBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Makes random effect, style and backdrop picks reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn track(&self) -> &LyricTrack {
        &self.track
    }

    pub fn state(&self) -> &ActiveLyricState {
        &self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        selection.warn_unknown();
        self.selection = selection;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Replaces the loaded track and forgets the active line.
    pub fn load_track(&mut self, track: LyricTrack) {
        tracing::debug!(lines = track.len(), "loading lyric track");
        self.track = track;
        self.state = ActiveLyricState::default();
    }

    /// Index of the line that should be showing at `current_time`.
    /// `None` means blank. NaN resolves to `None`.
    pub fn resolve(&self, current_time: f64) -> Option<usize> {
        self.locate(current_time, 0)
    }

    /// Coarse state at `current_time`.
    pub fn phase(&self, current_time: f64) -> Phase {
        let Some(last_time) = self.track.last_time() else {
            return Phase::Idle;
        };

        match self.resolve(current_time) {
            None => Phase::BeforeFirst,
            Some(index) if index + 1 == self.track.len() && current_time >= last_time => {
                Phase::AfterLast
            }
            Some(index) => Phase::Active(index),
        }
    }

    /// Handles one position notification from the player.
    pub fn update<T>(&mut self, current_time: f64, target: &mut T) -> Update
    where
        T: RenderTarget + ?Sized,
    {
        if self.track.is_empty() || current_time.is_nan() {
            return Update::Unchanged;
        }

        let hint = self.state.active_index.unwrap_or(0);
        let next = self.locate(current_time, hint);
        if next == self.state.active_index {
            return Update::Unchanged;
        }

        self.state.previous_index = self.state.active_index;
        self.state.active_index = next;

        match next {
            None => {
                self.state.active_text.clear();
                tracing::debug!(at = current_time, "lyric cleared");
                target.clear(current_time);
                Update::Cleared
            }
            Some(index) => {
                let transition = self.transition(index, current_time);
                self.state.active_text.clone_from(&transition.text);
                target.reset();
                target.present(&transition);
                Update::Transitioned(Box::new(transition))
            }
        }
    }

    /// Plays the active line's transition again with a fresh selection.
    pub fn replay<T>(&mut self, current_time: f64, target: &mut T) -> Option<Transition>
    where
        T: RenderTarget + ?Sized,
    {
        let index = self.state.active_index?;
        let transition = self.transition(index, current_time);
        target.reset();
        target.present(&transition);
        Some(transition)
    }

    /// The single place where effect and style are chosen.
    fn transition(&mut self, index: usize, at: f64) -> Transition {
        let text = self
            .track
            .get(index)
            .map(|line| line.text.clone())
            .unwrap_or_default();
        let available_duration = self.track.duration_after(index);
        let effect = self.selection.effect(&mut self.rng);
        let style = self.selection.style(&mut self.rng);

        let timeline = {
            let mut ctx = EffectContext {
                text: &text,
                available: available_duration,
                viewport: self.viewport,
                rng: &mut self.rng,
            };
            effect.animate(&mut ctx)
        };
        let backdrop = self.session.next_backdrop(&mut self.rng);

        tracing::debug!(
            index,
            effect = effect.name,
            style = style.name,
            duration = ?available_duration,
            "applied lyric transition"
        );

        Transition {
            index,
            at,
            text,
            effect,
            style,
            available_duration,
            timeline,
            backdrop,
        }
    }

    /// Finds the active index, walking from `hint` instead of the start.
    fn locate(&self, current_time: f64, hint: usize) -> Option<usize> {
        let lines = self.track.lines();
        let first = lines.first()?;
        if current_time.is_nan() {
            return None;
        }

        if current_time < first.time {
            return match self.boundary {
                StartBoundary::ShowAtZero if current_time <= 0.0 => Some(0),
                _ => None,
            };
        }

        let mut index = hint.min(lines.len() - 1);
        while index > 0 && lines[index].time > current_time {
            index -= 1;
        }
        while index + 1 < lines.len() && lines[index + 1].time <= current_time {
            index += 1;
        }
        Some(index)
    }
}
