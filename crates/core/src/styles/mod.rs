//! Text style variations applied to the active lyric line.

use std::sync::LazyLock;

use serde::Serialize;

use crate::registry::{Entry, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextCase {
    AsWritten,
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tracking {
    Normal,
    Wide,
    Tight,
}

/// Opaque presentation token handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPresentation {
    /// CSS colour of the text.
    pub color: &'static str,
    pub bold: bool,
    pub italic: bool,
    pub case: TextCase,
    pub tracking: Tracking,
    pub glow: bool,
    /// Utility class list for web renderers.
    pub class_name: &'static str,
}

impl TextPresentation {
    const fn plain(color: &'static str, class_name: &'static str) -> Self {
        Self {
            color,
            bold: true,
            italic: false,
            case: TextCase::AsWritten,
            tracking: Tracking::Normal,
            glow: false,
            class_name,
        }
    }

    /// Applies the case transform to `text`.
    pub fn transform(&self, text: &str) -> String {
        match self.case {
            TextCase::AsWritten => text.to_string(),
            TextCase::Upper => text.to_uppercase(),
            TextCase::Lower => text.to_lowercase(),
        }
    }
}

/// A named text style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StyleVariation {
    pub id: &'static str,
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub presentation: TextPresentation,
}

impl Entry for StyleVariation {
    const KIND: &'static str = "style";

    fn id(&self) -> &str {
        self.id
    }
}

const WHITE: &str = "#ffffff";

pub const DEFAULT: StyleVariation = StyleVariation {
    id: "default",
    name: "Default",
    description: Some("Default white text"),
    presentation: TextPresentation::plain(WHITE, "text-white font-bold"),
};

/// Every built-in style, in catalogue order.
pub const ALL: [StyleVariation; 10] = [
    DEFAULT,
    StyleVariation {
        id: "blue",
        name: "Blue",
        description: Some("Blue text"),
        presentation: TextPresentation::plain("#60a5fa", "text-blue-400 font-bold"),
    },
    StyleVariation {
        id: "purple",
        name: "Purple",
        description: Some("Purple text"),
        presentation: TextPresentation::plain("#c084fc", "text-purple-400 font-bold"),
    },
    StyleVariation {
        id: "green",
        name: "Green",
        description: Some("Green text"),
        presentation: TextPresentation::plain("#4ade80", "text-green-400 font-bold"),
    },
    StyleVariation {
        id: "yellow",
        name: "Yellow",
        description: Some("Yellow text"),
        presentation: TextPresentation::plain("#fde047", "text-yellow-300 font-bold"),
    },
    StyleVariation {
        id: "pink",
        name: "Pink",
        description: Some("Pink text"),
        presentation: TextPresentation::plain("#f472b6", "text-pink-400 font-bold"),
    },
    StyleVariation {
        id: "boldItalic",
        name: "Bold Italic",
        description: Some("Bold italic text"),
        presentation: TextPresentation {
            italic: true,
            ..TextPresentation::plain(WHITE, "text-white font-bold italic")
        },
    },
    StyleVariation {
        id: "uppercase",
        name: "Uppercase",
        description: Some("Uppercase text"),
        presentation: TextPresentation {
            case: TextCase::Upper,
            tracking: Tracking::Wide,
            ..TextPresentation::plain(WHITE, "text-white uppercase tracking-wide font-bold")
        },
    },
    StyleVariation {
        id: "lowercase",
        name: "Lowercase",
        description: Some("Lowercase text"),
        presentation: TextPresentation {
            case: TextCase::Lower,
            tracking: Tracking::Tight,
            ..TextPresentation::plain(WHITE, "text-white lowercase tracking-tight font-bold")
        },
    },
    StyleVariation {
        id: "glow",
        name: "Glow",
        description: Some("Text with glowing effect"),
        presentation: TextPresentation {
            glow: true,
            ..TextPresentation::plain(WHITE, "text-white font-bold text-shadow-glow")
        },
    },
];

static STYLE_VARIATIONS: LazyLock<Registry<StyleVariation>> =
    LazyLock::new(|| match Registry::new(ALL.to_vec()) {
        Ok(registry) => registry,
        Err(err) => panic!("built-in style catalogue is invalid: {err}"),
    });

/// The built-in style registry.
pub fn style_variations() -> &'static Registry<StyleVariation> {
    &STYLE_VARIATIONS
}

pub fn style_variation_by_id(id: &str) -> Option<&'static StyleVariation> {
    style_variations().get(id)
}

pub fn all_style_variations() -> &'static [StyleVariation] {
    style_variations().all()
}

/// Picks a built-in style uniformly at random. Re-rolled on every call.
pub fn random_style_variation() -> &'static StyleVariation {
    style_variations().pick_random().unwrap_or(&DEFAULT)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn catalogue_has_ten_unique_styles() {
        let ids: HashSet<&str> = style_variations().ids().collect();
        assert_eq!(all_style_variations().len(), 10);
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn unknown_style_is_not_found() {
        assert!(style_variation_by_id("neon").is_none());
        assert_eq!(style_variation_by_id("glow").map(|s| s.name), Some("Glow"));
    }

    #[test]
    fn case_transforms_follow_presentation() {
        let upper = style_variation_by_id("uppercase").unwrap();
        let lower = style_variation_by_id("lowercase").unwrap();

        assert_eq!(upper.presentation.transform("Hello"), "HELLO");
        assert_eq!(lower.presentation.transform("Hello"), "hello");
        assert_eq!(DEFAULT.presentation.transform("Hello"), "Hello");
    }

    #[test]
    fn random_styles_reach_every_entry() {
        let mut rng = StdRng::seed_from_u64(3);
        let seen: HashSet<&str> = (0..500)
            .filter_map(|_| style_variations().pick_random_with(&mut rng))
            .map(|style| style.id)
            .collect();

        assert_eq!(seen.len(), style_variations().len());
    }
}
