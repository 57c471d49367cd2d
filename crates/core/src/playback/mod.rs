//! Playback position sources.
//!
//! The real media element lives outside this crate; the engine only needs
//! the current position. [`PlaybackClock`] is an in-memory stand-in used by
//! the command line simulator and by tests.

use serde::{Deserialize, Serialize};

/// Snapshot of the external player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_time: f64,
    pub is_playing: bool,
}

/// Contract the media element fulfils for the engine.
pub trait PlaybackSource {
    /// Current position in seconds.
    fn current_time(&self) -> f64;

    fn is_playing(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    /// Moves the playback position.
    fn seek(&mut self, seconds: f64);

    /// Sets the output volume, clamped to `0.0..=1.0`.
    fn set_volume(&mut self, volume: f64);

    fn state(&self) -> PlaybackState {
        PlaybackState {
            current_time: self.current_time(),
            is_playing: self.is_playing(),
        }
    }
}

pub const DEFAULT_VOLUME: f64 = 0.5;

/// Deterministic playback clock advanced manually.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    time_seconds: f64,
    playing: bool,
    volume: f64,
    duration: Option<f64>,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self {
            time_seconds: 0.0,
            playing: false,
            volume: DEFAULT_VOLUME,
            duration: None,
        }
    }
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock for media of a known length.
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: (duration.is_finite() && duration > 0.0).then_some(duration),
            ..Self::default()
        }
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Advances by `delta` seconds while playing. Reaching the end pauses
    /// and rewinds to the start. Returns `true` when the end was reached.
    pub fn advance(&mut self, delta: f64) -> bool {
        if !self.playing || !delta.is_finite() {
            return false;
        }

        self.time_seconds = (self.time_seconds + delta).max(0.0);
        match self.duration {
            Some(duration) if self.time_seconds >= duration => {
                self.playing = false;
                self.time_seconds = 0.0;
                tracing::debug!(duration, "playback ended");
                true
            }
            _ => false,
        }
    }
}

impl PlaybackSource for PlaybackClock {
    fn current_time(&self) -> f64 {
        self.time_seconds
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.time_seconds = match self.duration {
            Some(duration) => seconds.min(duration),
            None => seconds,
        };
    }

    fn set_volume(&mut self, volume: f64) {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_while_playing() {
        let mut clock = PlaybackClock::new();
        clock.advance(1.0);
        assert_eq!(clock.current_time(), 0.0);

        clock.play();
        clock.advance(1.5);
        assert_eq!(clock.state(), PlaybackState { current_time: 1.5, is_playing: true });
    }

    #[test]
    fn ending_pauses_and_rewinds() {
        let mut clock = PlaybackClock::with_duration(2.0);
        clock.play();

        assert!(!clock.advance(1.0));
        assert!(clock.advance(1.5));
        assert!(!clock.is_playing());
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn seek_and_volume_are_clamped() {
        let mut clock = PlaybackClock::with_duration(10.0);
        clock.seek(42.0);
        assert_eq!(clock.current_time(), 10.0);
        clock.seek(-3.0);
        assert_eq!(clock.current_time(), 0.0);

        assert_eq!(clock.volume(), DEFAULT_VOLUME);
        clock.set_volume(1.7);
        assert_eq!(clock.volume(), 1.0);
        clock.set_volume(-0.2);
        assert_eq!(clock.volume(), 0.0);
    }
}
