//! Catalogue of lyric transition effects.
//!
//! An effect turns the incoming line into an [`animation::Timeline`]. Effects
//! own their sub-layers (words, rows, cubes) and fit their timeline to the
//! time available before the next line, when the engine knows it.

use std::{fmt, sync::LazyLock};

use rand::RngCore;

use crate::{
    animation::Timeline,
    registry::{Entry, Registry},
    render::Viewport,
};

pub mod catalogue;

/// Inputs handed to an effect behaviour for one transition.
pub struct EffectContext<'a> {
    pub text: &'a str,
    /// Seconds until the next line, if there is one.
    pub available: Option<f64>,
    pub viewport: Viewport,
    pub rng: &'a mut dyn RngCore,
}

impl fmt::Debug for EffectContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectContext")
            .field("text", &self.text)
            .field("available", &self.available)
            .field("viewport", &self.viewport)
            .finish()
    }
}

/// Builds the transition timeline for one line.
pub type Behavior = fn(&mut EffectContext<'_>) -> Timeline;

/// A named lyric transition.
#[derive(Clone, Copy)]
pub struct AnimationEffect {
    pub id: &'static str,
    pub name: &'static str,
    pub description: Option<&'static str>,
    behavior: Behavior,
}

impl AnimationEffect {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        description: Option<&'static str>,
        behavior: Behavior,
    ) -> Self {
        Self {
            id,
            name,
            description,
            behavior,
        }
    }

    /// Runs the effect's behaviour for the given line.
    pub fn animate(&self, ctx: &mut EffectContext<'_>) -> Timeline {
        (self.behavior)(ctx)
    }
}

impl Entry for AnimationEffect {
    const KIND: &'static str = "effect";

    fn id(&self) -> &str {
        self.id
    }
}

impl fmt::Debug for AnimationEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationEffect")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

impl PartialEq for AnimationEffect {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

static ANIMATION_EFFECTS: LazyLock<Registry<AnimationEffect>> = LazyLock::new(|| {
    match Registry::new(catalogue::ALL.to_vec()) {
        Ok(registry) => registry,
        Err(err) => panic!("built-in effect catalogue is invalid: {err}"),
    }
});

/// The built-in effect registry.
pub fn animation_effects() -> &'static Registry<AnimationEffect> {
    &ANIMATION_EFFECTS
}

pub fn animation_effect_by_id(id: &str) -> Option<&'static AnimationEffect> {
    animation_effects().get(id)
}

pub fn all_animation_effects() -> &'static [AnimationEffect] {
    animation_effects().all()
}

/// Picks a built-in effect uniformly at random. Re-rolled on every call.
pub fn random_animation_effect() -> &'static AnimationEffect {
    animation_effects()
        .pick_random()
        .unwrap_or(&catalogue::FADE_IN_UP)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalogue_has_twelve_unique_effects() {
        let ids: HashSet<&str> = animation_effects().ids().collect();
        assert_eq!(all_animation_effects().len(), 12);
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn looks_up_known_and_unknown_ids() {
        let effect = animation_effect_by_id("train").expect("train is registered");
        assert_eq!(effect.name, "Train Scroll");
        assert!(animation_effect_by_id("doesNotExist").is_none());
    }

    #[test]
    fn random_effect_is_registered() {
        for _ in 0..50 {
            let effect = random_animation_effect();
            assert!(animation_effect_by_id(effect.id).is_some());
        }
    }
}
