//! Render-agnostic animation timelines.
//!
//! Effects describe a transition as a set of layers (the whole line, single
//! words, scrolling rows, cubes) and tweens over their visual properties. A
//! renderer samples the timeline every frame with [`Timeline::sample`].

use serde::{Deserialize, Serialize};

/// Share of the available window a fitted timeline may use.
pub const FIT_RATIO: f64 = 0.95;
/// Shortest transition worth showing, in seconds.
pub const MIN_VISIBLE_SECONDS: f64 = 2.0;

/// Easing curves used by the built-in effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    /// Polynomial ease-in of the given power (1 = quad, 2 = cubic, ...).
    PowerIn(u8),
    PowerOut(u8),
    PowerInOut(u8),
    /// Overshooting ease-out with the given overshoot amount.
    BackOut(f64),
}

impl Ease {
    /// Maps linear progress in `[0, 1]` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::PowerIn(power) => t.powi(i32::from(power) + 1),
            Ease::PowerOut(power) => 1.0 - (1.0 - t).powi(i32::from(power) + 1),
            Ease::PowerInOut(power) => {
                let exp = i32::from(power) + 1;
                if t < 0.5 {
                    (2.0 * t).powi(exp) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(exp) / 2.0
                }
            }
            Ease::BackOut(overshoot) => {
                let u = t - 1.0;
                u * u * ((overshoot + 1.0) * u + overshoot) + 1.0
            }
        }
    }
}

/// Visual property a tween drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    Opacity,
    /// Horizontal offset in pixels.
    X,
    /// Vertical offset in pixels.
    Y,
    Scale,
    /// In-plane rotation in degrees.
    Rotation,
    /// Rotation around the horizontal axis in degrees.
    RotationX,
    /// Rotation around the vertical axis in degrees.
    RotationY,
    /// Blur radius in pixels.
    Blur,
    /// Stacking order.
    ZIndex,
}

/// What a layer represents inside the rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    Line,
    Word,
    Row,
    Cube,
    Container,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repeat {
    Once,
    /// Loops forever; `yoyo` reverses direction on every other cycle.
    Forever { yoyo: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub layer: usize,
    pub property: Property,
    pub from: f64,
    pub to: f64,
    pub start: f64,
    pub duration: f64,
    pub ease: Ease,
    pub repeat: Repeat,
}

impl Tween {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    fn value_at(&self, t: f64) -> Option<f64> {
        if t < self.start {
            return None;
        }

        let elapsed = t - self.start;
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            match self.repeat {
                Repeat::Once => elapsed / self.duration,
                Repeat::Forever { yoyo } => {
                    let cycle = (elapsed / self.duration).floor();
                    let within = elapsed / self.duration - cycle;
                    if yoyo && cycle as u64 % 2 == 1 {
                        1.0 - within
                    } else {
                        within
                    }
                }
            }
        };

        Some(self.from + (self.to - self.from) * self.ease.apply(progress))
    }
}

/// Resolved visual state of one layer at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    pub opacity: f64,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation: f64,
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub blur: f64,
    pub z_index: f64,
}

impl LayerState {
    pub fn identity() -> Self {
        Self {
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            blur: 0.0,
            z_index: 0.0,
        }
    }

    fn set(&mut self, property: Property, value: f64) {
        match property {
            Property::Opacity => self.opacity = value,
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::Scale => self.scale = value,
            Property::Rotation => self.rotation = value,
            Property::RotationX => self.rotation_x = value,
            Property::RotationY => self.rotation_y = value,
            Property::Blur => self.blur = value,
            Property::ZIndex => self.z_index = value,
        }
    }
}

/// Layers plus the tweens that animate them.
///
/// Tween times are stored unscaled; [`Timeline::time_scale`] speeds playback
/// up (> 1) or slows it down (< 1) the same way for every tween.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    layers: Vec<Layer>,
    initial: Vec<LayerState>,
    tweens: Vec<Tween>,
    time_scale: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            initial: Vec::new(),
            tweens: Vec::new(),
            time_scale: 1.0,
        }
    }

    /// Adds a layer in its resting state and returns its index.
    pub fn add_layer(&mut self, kind: LayerKind, text: impl Into<String>) -> usize {
        self.layers.push(Layer {
            kind,
            text: text.into(),
        });
        self.initial.push(LayerState::identity());
        self.layers.len() - 1
    }

    /// Overrides a layer's state before any tween starts.
    pub fn set_initial(&mut self, layer: usize, property: Property, value: f64) {
        if let Some(state) = self.initial.get_mut(layer) {
            state.set(property, value);
        }
    }

    /// Adds a one-shot tween.
    #[allow(clippy::too_many_arguments)]
    pub fn tween(
        &mut self,
        layer: usize,
        property: Property,
        from: f64,
        to: f64,
        start: f64,
        duration: f64,
        ease: Ease,
    ) -> &mut Self {
        self.push(Tween {
            layer,
            property,
            from,
            to,
            start,
            duration,
            ease,
            repeat: Repeat::Once,
        })
    }

    /// Instantly sets a property at `at`.
    pub fn set_at(&mut self, layer: usize, property: Property, value: f64, at: f64) -> &mut Self {
        self.tween(layer, property, value, value, at, 0.0, Ease::Linear)
    }

    pub fn push(&mut self, tween: Tween) -> &mut Self {
        self.tweens.push(tween);
        self
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.time_scale = scale;
        }
    }

    /// Length of one pass through the timeline, ignoring `time_scale`.
    /// Looping tweens contribute a single cycle.
    pub fn raw_duration(&self) -> f64 {
        self.tweens.iter().map(Tween::end).fold(0.0, f64::max)
    }

    /// Wall-clock length of one pass.
    pub fn duration(&self) -> f64 {
        self.raw_duration() / self.time_scale
    }

    /// Whether any tween keeps running after [`Timeline::duration`].
    pub fn loops(&self) -> bool {
        self.tweens
            .iter()
            .any(|tween| matches!(tween.repeat, Repeat::Forever { .. }))
    }

    /// Scales playback so one pass lasts exactly `window` seconds.
    pub fn fit_to(&mut self, window: f64) {
        let raw = self.raw_duration();
        if raw > 0.0 && window > 0.0 {
            self.time_scale = raw / window;
        }
    }

    /// Speeds playback up when one pass would exceed `window` seconds.
    pub fn cap_to(&mut self, window: f64) {
        if window > 0.0 && self.duration() > window {
            self.fit_to(window);
        }
    }

    /// Evaluates every layer at wall-clock time `t` since the transition
    /// started. Later tweens on the same property win.
    pub fn sample(&self, t: f64) -> Vec<LayerState> {
        let local = t.max(0.0) * self.time_scale;
        let mut states = self.initial.clone();

        for tween in &self.tweens {
            let Some(state) = states.get_mut(tween.layer) else {
                continue;
            };
            if let Some(value) = tween.value_at(local) {
                state.set(tween.property, value);
            }
        }

        states
    }
}

/// Window a duration-aware effect should fill: 95% of the available time,
/// never below the minimum visible duration. `None` when no hint is given.
pub fn fitted_window(available: Option<f64>) -> Option<f64> {
    available
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
        .map(|seconds| (seconds * FIT_RATIO).max(MIN_VISIBLE_SECONDS))
}

/// Upper bound for timelines that only ever compress: 95% of the hint.
pub fn cap_window(available: Option<f64>) -> Option<f64> {
    available
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
        .map(|seconds| seconds * FIT_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn eases_hit_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::PowerIn(2),
            Ease::PowerOut(1),
            Ease::PowerInOut(3),
            Ease::BackOut(1.7),
        ] {
            assert!(approx(ease.apply(0.0), 0.0), "{ease:?} at 0");
            assert!(approx(ease.apply(1.0), 1.0), "{ease:?} at 1");
        }
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BackOut(1.7).apply(i as f64 / 100.0))
            .fold(0.0, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn samples_initial_and_final_states() {
        let mut timeline = Timeline::new();
        let line = timeline.add_layer(LayerKind::Line, "hello");
        timeline.set_initial(line, Property::Opacity, 0.0);
        timeline.tween(line, Property::Opacity, 0.0, 1.0, 0.5, 1.0, Ease::Linear);

        assert!(approx(timeline.sample(0.0)[line].opacity, 0.0));
        assert!(approx(timeline.sample(1.0)[line].opacity, 0.5));
        assert!(approx(timeline.sample(5.0)[line].opacity, 1.0));
    }

    #[test]
    fn fit_to_stretches_and_compresses() {
        let mut timeline = Timeline::new();
        let line = timeline.add_layer(LayerKind::Line, "x");
        timeline.tween(line, Property::Scale, 1.0, 2.0, 0.0, 2.0, Ease::Linear);

        timeline.fit_to(4.0);
        assert!(approx(timeline.duration(), 4.0));

        timeline.fit_to(1.0);
        assert!(approx(timeline.duration(), 1.0));
        assert!(approx(timeline.sample(0.5)[line].scale, 1.5));
    }

    #[test]
    fn cap_to_only_compresses() {
        let mut timeline = Timeline::new();
        let line = timeline.add_layer(LayerKind::Line, "x");
        timeline.tween(line, Property::X, 0.0, 10.0, 0.0, 2.0, Ease::Linear);

        timeline.cap_to(5.0);
        assert!(approx(timeline.duration(), 2.0));

        timeline.cap_to(1.0);
        assert!(approx(timeline.duration(), 1.0));
    }

    #[test]
    fn yoyo_tweens_reverse() {
        let mut timeline = Timeline::new();
        let cube = timeline.add_layer(LayerKind::Cube, "x");
        timeline.push(Tween {
            layer: cube,
            property: Property::Rotation,
            from: -15.0,
            to: 15.0,
            start: 0.0,
            duration: 4.0,
            ease: Ease::Linear,
            repeat: Repeat::Forever { yoyo: true },
        });

        assert!(timeline.loops());
        assert!(approx(timeline.sample(2.0)[cube].rotation, 0.0));
        assert!(approx(timeline.sample(5.0)[cube].rotation, 7.5));
    }

    #[test]
    fn windows_respect_minimum_and_ratio() {
        assert_eq!(fitted_window(None), None);
        assert!(approx(fitted_window(Some(10.0)).unwrap(), 9.5));
        assert!(approx(fitted_window(Some(1.0)).unwrap(), MIN_VISIBLE_SECONDS));
        assert!(approx(cap_window(Some(1.0)).unwrap(), 0.95));
        assert_eq!(cap_window(Some(0.0)), None);
    }
}
