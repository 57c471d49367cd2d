//! Core library for the Lyric Player application.
//!
//! The crate turns timestamped LRC lyrics and a playback position into a
//! stream of animated line transitions. Each module owns one concern
//! (parsing, effect and style catalogues, timelines, the timing engine,
//! session theming) and renderers plug in through [`RenderTarget`].

pub mod animation;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod lyrics;
pub mod playback;
pub mod registry;
pub mod render;
pub mod styles;
pub mod theme;

pub use animation::{Ease, Property, Timeline, Tween};
pub use config::{AppConfig, EngineConfig, PlayerConfig};
pub use effects::{AnimationEffect, EffectContext};
pub use engine::{ActiveLyricState, LyricEngine, Phase, Selection, StartBoundary, Transition, Update};
pub use error::{LyricError, Result};
pub use lyrics::{parse_lrc, LyricLine, LyricTrack};
pub use playback::{PlaybackClock, PlaybackSource, PlaybackState};
pub use registry::{Entry, Registry};
pub use render::{Cue, RenderTarget, TranscriptTarget, Viewport};
pub use styles::{StyleVariation, TextPresentation};
pub use theme::{Backdrop, Session, Theme};
