//! The built-in transition effects.

use rand::Rng;

use super::{AnimationEffect, EffectContext};
use crate::animation::{
    cap_window, fitted_window, Ease, LayerKind, Property, Repeat, Timeline, Tween,
};

/// Rough glyph advance relative to the font size.
const GLYPH_WIDTH: f64 = 0.6;
/// Share of the viewport height given to the lyric area.
const LYRIC_AREA: f64 = 0.7;
const MAX_CUBES: usize = 19;
const GRID_ROWS: usize = 10;
const GRID_COPIES: usize = 3;

pub const FADE_IN_UP: AnimationEffect = AnimationEffect::new(
    "fadeInUp",
    "Fade In Up",
    Some("Text fades in while moving up from below"),
    fade_in_up,
);

pub const SCALE_UP: AnimationEffect = AnimationEffect::new(
    "scaleUp",
    "Scale Up",
    Some("Words scale up based on lyrics timing"),
    scale_up,
);

pub const SCALE_DOWN: AnimationEffect = AnimationEffect::new(
    "scaleDown",
    "Scale Down",
    Some("Words scale down from large to normal size and stay on screen"),
    scale_down,
);

pub const ROTATE_IN: AnimationEffect = AnimationEffect::new(
    "rotateIn",
    "Rotate In",
    Some("Text rotates in from a slight angle"),
    rotate_in,
);

pub const TYPEWRITER: AnimationEffect = AnimationEffect::new(
    "typewriter",
    "Typewriter",
    Some("Words appear with random rotation and bounce effect"),
    typewriter,
);

pub const BLUR_IN: AnimationEffect = AnimationEffect::new(
    "blurIn",
    "Blur In",
    Some("Text comes into focus from a blurred state"),
    blur_in,
);

pub const GLITCH_IN: AnimationEffect = AnimationEffect::new(
    "glitchIn",
    "Glitch In",
    Some("Text appears with a digital glitch effect"),
    glitch_in,
);

pub const FLIP_3D: AnimationEffect = AnimationEffect::new(
    "flip3D",
    "3D Flip",
    Some("Text flips in with a 3D perspective"),
    flip_3d,
);

pub const CUBE_3D: AnimationEffect = AnimationEffect::new(
    "cube3D",
    "3D Cube",
    Some("Words appear on rotating 3D cubes with each word on its own line"),
    cube_3d,
);

pub const TRAIN: AnimationEffect = AnimationEffect::new(
    "train",
    "Train Scroll",
    Some("Text scrolls from right to left like a train, filling the screen width"),
    train,
);

pub const GRID_EXPAND: AnimationEffect = AnimationEffect::new(
    "gridExpand",
    "Grid Expand",
    Some("Lyrics appear in slanted rows moving in opposite directions"),
    grid_expand,
);

pub const WORD_APPEAR: AnimationEffect = AnimationEffect::new(
    "wordAppear",
    "Word Appear",
    Some("Words appear in center with a smooth fade-in effect"),
    word_appear,
);

/// Every built-in effect, in catalogue order.
pub const ALL: [AnimationEffect; 12] = [
    FADE_IN_UP,
    SCALE_UP,
    SCALE_DOWN,
    ROTATE_IN,
    TYPEWRITER,
    BLUR_IN,
    GLITCH_IN,
    FLIP_3D,
    CUBE_3D,
    TRAIN,
    GRID_EXPAND,
    WORD_APPEAR,
];

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Compresses short entrance effects that would overrun a tiny window.
fn capped(mut timeline: Timeline, available: Option<f64>) -> Timeline {
    if let Some(window) = cap_window(available) {
        timeline.cap_to(window);
    }
    timeline
}

/// Single-layer entrance: every `(property, from, to)` runs over `duration`.
fn entrance(
    ctx: &EffectContext<'_>,
    props: &[(Property, f64, f64)],
    duration: f64,
    ease: Ease,
) -> Timeline {
    let mut timeline = Timeline::new();
    let line = timeline.add_layer(LayerKind::Line, ctx.text);

    for &(property, from, to) in props {
        timeline.set_initial(line, property, from);
        timeline.tween(line, property, from, to, 0.0, duration, ease);
    }

    capped(timeline, ctx.available)
}

fn fade_in_up(ctx: &mut EffectContext<'_>) -> Timeline {
    entrance(
        ctx,
        &[(Property::Opacity, 0.0, 1.0), (Property::Y, 50.0, 0.0)],
        0.7,
        Ease::PowerOut(2),
    )
}

fn rotate_in(ctx: &mut EffectContext<'_>) -> Timeline {
    entrance(
        ctx,
        &[
            (Property::Opacity, 0.0, 1.0),
            (Property::Rotation, -5.0, 0.0),
            (Property::X, -30.0, 0.0),
        ],
        0.7,
        Ease::PowerOut(1),
    )
}

fn blur_in(ctx: &mut EffectContext<'_>) -> Timeline {
    entrance(
        ctx,
        &[(Property::Opacity, 0.0, 1.0), (Property::Blur, 10.0, 0.0)],
        0.8,
        Ease::PowerOut(2),
    )
}

fn flip_3d(ctx: &mut EffectContext<'_>) -> Timeline {
    entrance(
        ctx,
        &[(Property::Opacity, 0.0, 1.0), (Property::RotationX, 90.0, 0.0)],
        0.8,
        Ease::BackOut(1.2),
    )
}

fn glitch_in(ctx: &mut EffectContext<'_>) -> Timeline {
    // (opacity, x offset, seconds)
    const STEPS: [(f64, f64, f64); 5] = [
        (0.3, -10.0, 0.1),
        (0.6, 5.0, 0.1),
        (0.2, -5.0, 0.1),
        (0.8, 10.0, 0.1),
        (1.0, 0.0, 0.2),
    ];

    let mut timeline = Timeline::new();
    let line = timeline.add_layer(LayerKind::Line, ctx.text);
    timeline.set_initial(line, Property::Opacity, 0.0);

    let (mut opacity, mut x, mut at) = (0.0, 0.0, 0.0);
    for (next_opacity, next_x, duration) in STEPS {
        timeline
            .tween(line, Property::Opacity, opacity, next_opacity, at, duration, Ease::PowerOut(1))
            .tween(line, Property::X, x, next_x, at, duration, Ease::PowerOut(1));
        opacity = next_opacity;
        x = next_x;
        at += duration;
    }

    capped(timeline, ctx.available)
}

fn typewriter(ctx: &mut EffectContext<'_>) -> Timeline {
    const STAGGER: f64 = 0.15;
    const DURATION: f64 = 0.7;

    let mut timeline = Timeline::new();
    for (index, word) in words(ctx.text).into_iter().enumerate() {
        let layer = timeline.add_layer(LayerKind::Word, word);
        let rotation: f64 = ctx.rng.gen_range(-60.0..=60.0);
        let start = index as f64 * STAGGER;

        for (property, from, to) in [
            (Property::Y, -50.0, 0.0),
            (Property::Opacity, 0.0, 1.0),
            (Property::Rotation, rotation, 0.0),
        ] {
            timeline.set_initial(layer, property, from);
            timeline.tween(layer, property, from, to, start, DURATION, Ease::BackOut(1.7));
        }
    }

    capped(timeline, ctx.available)
}

/// Per-word slot length: the budget split across words, clamped.
fn word_slot(total: f64, count: usize, min: f64, max: f64) -> f64 {
    (total / count.max(1) as f64).clamp(min, max)
}

fn scale_up(ctx: &mut EffectContext<'_>) -> Timeline {
    let words = words(ctx.text);
    let slot = word_slot(ctx.available.unwrap_or(2.5), words.len(), 0.3, 1.2);

    let mut timeline = Timeline::new();
    for (index, word) in words.into_iter().enumerate() {
        let layer = timeline.add_layer(LayerKind::Word, word);
        let start = index as f64 * slot;
        let grow = slot * 0.9;

        timeline.set_initial(layer, Property::Opacity, 0.0);
        timeline
            .set_at(layer, Property::Opacity, 1.0, start)
            .set_at(layer, Property::ZIndex, 10.0, start)
            .tween(layer, Property::Scale, 1.0, 20.0, start, grow, Ease::PowerIn(2))
            .tween(layer, Property::Opacity, 1.0, 0.0, start, grow, Ease::PowerIn(2))
            .set_at(layer, Property::ZIndex, 1.0, start + grow);
    }

    if let Some(window) = fitted_window(ctx.available) {
        timeline.fit_to(window);
    }
    timeline
}

fn scale_down(ctx: &mut EffectContext<'_>) -> Timeline {
    let words = words(ctx.text);
    let slot = word_slot(ctx.available.unwrap_or(5.0), words.len(), 0.2, 0.8);

    let mut timeline = Timeline::new();
    for (index, word) in words.into_iter().enumerate() {
        let layer = timeline.add_layer(LayerKind::Word, word);
        let start = index as f64 * slot;

        timeline.set_initial(layer, Property::Opacity, 0.0);
        timeline.set_initial(layer, Property::Scale, 5.0);
        timeline
            .tween(layer, Property::Scale, 5.0, 1.0, start, slot * 0.7, Ease::PowerOut(2))
            .tween(layer, Property::Opacity, 0.0, 1.0, start, slot * 0.7, Ease::PowerOut(2));
    }

    if let Some(window) = fitted_window(ctx.available) {
        timeline.fit_to(window);
    }
    timeline
}

fn cube_3d(ctx: &mut EffectContext<'_>) -> Timeline {
    let mut timeline = Timeline::new();
    let tray = timeline.add_layer(LayerKind::Container, "");
    let sway = -0.03 * ctx.viewport.height * LYRIC_AREA;

    for (property, from, to, duration, ease) in [
        (Property::Y, sway, 0.0, 2.0, Ease::PowerInOut(0)),
        (Property::Rotation, -15.0, 15.0, 4.0, Ease::PowerInOut(0)),
        (Property::Scale, 1.0, 1.2, 2.0, Ease::PowerInOut(2)),
    ] {
        timeline.set_initial(tray, property, from);
        timeline.push(Tween {
            layer: tray,
            property,
            from,
            to,
            start: 0.0,
            duration,
            ease,
            repeat: Repeat::Forever { yoyo: true },
        });
    }

    for (index, word) in words(ctx.text).into_iter().take(MAX_CUBES).enumerate() {
        let cube = timeline.add_layer(LayerKind::Cube, word);
        let delay = 0.1 * index as f64;

        timeline.set_initial(cube, Property::Opacity, 0.0);
        timeline.tween(cube, Property::Opacity, 0.0, 1.0, delay, 0.5, Ease::PowerInOut(0));
        timeline.push(Tween {
            layer: cube,
            property: Property::RotationY,
            from: 0.0,
            to: 360.0,
            start: delay,
            duration: 4.0,
            ease: Ease::PowerInOut(1),
            repeat: Repeat::Forever { yoyo: false },
        });
    }

    capped(timeline, ctx.available)
}

fn train(ctx: &mut EffectContext<'_>) -> Timeline {
    let viewport = ctx.viewport;
    let font_size = (viewport.height * LYRIC_AREA * 0.8).min(120.0) * 1.5;
    let text_width = ctx.text.chars().count() as f64 * font_size * GLYPH_WIDTH;
    let distance = text_width + viewport.width;

    let duration = match ctx.available {
        Some(available) => (distance / 500.0).min(available * 0.95).max(2.0),
        None => (distance / 200.0).max(5.0),
    };

    let mut timeline = Timeline::new();
    let span = timeline.add_layer(LayerKind::Line, ctx.text);
    timeline.set_initial(span, Property::X, viewport.width);
    timeline.tween(span, Property::X, viewport.width, -text_width, 0.0, duration, Ease::Linear);
    timeline.set_at(span, Property::Opacity, 0.0, duration);

    capped(timeline, ctx.available)
}

fn grid_expand(ctx: &mut EffectContext<'_>) -> Timeline {
    let viewport = ctx.viewport;
    let duration = fitted_window(ctx.available).unwrap_or(5.0);
    let row_text = ctx.text.to_uppercase();
    let font_size = viewport.width * 0.04;
    // Wide letter spacing plus the gap between repeated copies.
    let text_width = row_text.chars().count() as f64 * font_size * (GLYPH_WIDTH + 0.2) + 100.0;

    let mut timeline = Timeline::new();
    let grid = timeline.add_layer(LayerKind::Container, "");
    timeline.set_initial(grid, Property::Rotation, -20.0);

    for index in 0..GRID_ROWS {
        let row = timeline.add_layer(LayerKind::Row, vec![row_text.as_str(); GRID_COPIES].join(" "));
        let (start, end) = if index % 2 == 0 {
            (viewport.width, -text_width)
        } else {
            (-text_width - viewport.width, viewport.width)
        };

        timeline.set_initial(row, Property::Y, index as f64 * viewport.height / GRID_ROWS as f64);
        timeline.set_initial(row, Property::X, start);
        timeline.tween(row, Property::X, start, end, 0.0, duration, Ease::Linear);
    }

    capped(timeline, ctx.available)
}

fn word_appear(ctx: &mut EffectContext<'_>) -> Timeline {
    const STAGGER: f64 = 0.05;

    let duration = fitted_window(ctx.available).unwrap_or(4.0);
    let words = words(ctx.text);
    let reveal = duration * 0.3;

    let mut timeline = Timeline::new();
    let stage = timeline.add_layer(LayerKind::Container, "");

    for (index, word) in words.iter().enumerate() {
        let layer = timeline.add_layer(LayerKind::Word, *word);
        let rotation: f64 = ctx.rng.gen_range(-20.0..=20.0);
        let start = index as f64 * STAGGER;

        for (property, from, to) in [
            (Property::Opacity, 0.0, 1.0),
            (Property::Scale, 0.5, 1.0),
            (Property::Rotation, rotation, 0.0),
        ] {
            timeline.set_initial(layer, property, from);
            timeline.tween(layer, property, from, to, start, reveal, Ease::PowerOut(1));
        }
    }

    // Hold the revealed words for the rest of the window.
    let held_from = reveal + words.len().saturating_sub(1) as f64 * STAGGER;
    timeline.tween(stage, Property::Opacity, 1.0, 1.0, held_from, duration * 0.7, Ease::Linear);

    capped(timeline, ctx.available)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{animation::MIN_VISIBLE_SECONDS, render::Viewport};

    fn run(effect: &AnimationEffect, text: &str, available: Option<f64>) -> Timeline {
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = EffectContext {
            text,
            available,
            viewport: Viewport::default(),
            rng: &mut rng,
        };
        effect.animate(&mut ctx)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn every_effect_handles_missing_duration() {
        for effect in ALL.iter() {
            let timeline = run(effect, "hello there world", None);
            assert!(!timeline.layers().is_empty(), "{} built no layers", effect.id);
            assert!(timeline.duration() > 0.0, "{} has no duration", effect.id);
        }
    }

    #[test]
    fn every_effect_stays_within_the_window() {
        for effect in ALL.iter() {
            for available in [0.5, 1.5, 3.0, 12.0] {
                let timeline = run(effect, "one two three four five", Some(available));
                let limit = (available * 0.95).max(MIN_VISIBLE_SECONDS);
                assert!(
                    timeline.duration() <= limit + 1e-9,
                    "{} ran {}s in a {}s window",
                    effect.id,
                    timeline.duration(),
                    available
                );
            }
        }
    }

    #[test]
    fn scale_effects_fill_the_window() {
        for effect in [&SCALE_UP, &SCALE_DOWN] {
            let timeline = run(effect, "a b c", Some(10.0));
            assert!(approx(timeline.duration(), 9.5), "{}", effect.id);
        }
    }

    #[test]
    fn scale_effects_keep_minimum_visibility() {
        let timeline = run(&SCALE_UP, "quick", Some(1.0));
        assert!(approx(timeline.duration(), MIN_VISIBLE_SECONDS));
    }

    #[test]
    fn word_effects_split_on_whitespace() {
        let timeline = run(&TYPEWRITER, "  spaced   out words ", None);
        let words: Vec<&str> = timeline.layers().iter().map(|layer| layer.text.as_str()).collect();
        assert_eq!(words, vec!["spaced", "out", "words"]);
    }

    #[test]
    fn cube_effect_limits_cube_count() {
        let text = (0..40).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let timeline = run(&CUBE_3D, &text, None);
        let cubes = timeline
            .layers()
            .iter()
            .filter(|layer| layer.kind == LayerKind::Cube)
            .count();

        assert_eq!(cubes, MAX_CUBES);
        assert!(timeline.loops());
    }

    #[test]
    fn word_appear_uses_default_without_hint() {
        let timeline = run(&WORD_APPEAR, "one", None);
        assert!(approx(timeline.duration(), 4.0));
    }

    #[test]
    fn entrances_end_fully_visible() {
        for effect in [&FADE_IN_UP, &ROTATE_IN, &BLUR_IN, &FLIP_3D, &GLITCH_IN] {
            let timeline = run(effect, "line", Some(5.0));
            let end = timeline.sample(timeline.duration());
            assert!(approx(end[0].opacity, 1.0), "{}", effect.id);
            assert!(approx(end[0].x, 0.0), "{}", effect.id);
        }
    }

    #[test]
    fn train_crosses_the_screen() {
        let viewport = Viewport::default();
        let timeline = run(&TRAIN, "choo choo", Some(20.0));

        let start = timeline.sample(0.0);
        assert!(approx(start[0].x, viewport.width));
        let end = timeline.sample(timeline.duration() - 1e-9);
        assert!(end[0].x < 0.0);
    }
}
