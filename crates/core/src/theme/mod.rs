//! Session-scoped presentation context: colour theme and backdrop rotation.

use std::collections::VecDeque;

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

/// Backdrop colours rotated through as lines change.
pub const BACKDROP_COLORS: [&str; 13] = [
    "#1a1a2e", "#16213e", "#0f3460", "#541690", "#4a0e5c", "#7a0bc0", "#270082", "#7b113a",
    "#1e5128", "#04293a", "#3d0000", "#150050", "#000000",
];

/// Gradient presets used by the colour theme.
pub const BACKDROP_GRADIENTS: [&str; 5] = [
    "linear-gradient(111.45deg, rgb(255, 135, 9) 19.42%, rgb(247, 189, 248) 73.08%)",
    "linear-gradient(166.9deg, rgb(10, 228, 72) 53.19%, rgb(0, 133, 208) 107.69%)",
    "linear-gradient(131.77deg, rgb(10, 21, 122) 30.82%, rgb(21, 191, 228) 81.82%)",
    "linear-gradient(153.58deg, rgb(247, 189, 248) 32.25%, rgb(47, 60, 192) 92.68%)",
    "linear-gradient(144.02deg, rgb(0, 186, 226) 4.56%, rgb(254, 197, 251) 72.98%)",
];

/// How many recent colours are avoided when picking the next one.
const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    Color,
    #[default]
    BlackAndWhite,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Color => Theme::BlackAndWhite,
            Theme::BlackAndWhite => Theme::Color,
        }
    }
}

/// Background change requested alongside a lyric transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backdrop {
    pub color: String,
    pub gradient: String,
}

/// Picks backdrop colours without repeating any of the last few.
#[derive(Debug, Clone, Default)]
pub struct BackdropPicker {
    recent: VecDeque<&'static str>,
}

impl BackdropPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colours picked most recently, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().copied()
    }

    pub fn next_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Backdrop {
        let available: Vec<&'static str> = BACKDROP_COLORS
            .iter()
            .copied()
            .filter(|color| !self.recent.contains(color))
            .collect();
        let pool: &[&'static str] = if available.is_empty() {
            &BACKDROP_COLORS
        } else {
            &available
        };

        let color = pool.choose(rng).copied().unwrap_or(BACKDROP_COLORS[0]);
        self.recent.push_back(color);
        while self.recent.len() > RECENT_LIMIT {
            self.recent.pop_front();
        }

        let gradient = BACKDROP_GRADIENTS
            .choose(rng)
            .copied()
            .unwrap_or(BACKDROP_GRADIENTS[0]);

        Backdrop {
            color: color.to_string(),
            gradient: gradient.to_string(),
        }
    }
}

/// Presentation state that lives for one playback session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    theme: Theme,
    backdrops: BackdropPicker,
}

impl Session {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            backdrops: BackdropPicker::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        tracing::info!(theme = ?self.theme, "theme toggled");
        self.theme
    }

    /// Backdrop for the next transition. The black-and-white theme keeps a
    /// plain black background, so it never asks for one.
    pub fn next_backdrop<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Backdrop> {
        match self.theme {
            Theme::Color => Some(self.backdrops.next_with(rng)),
            Theme::BlackAndWhite => None,
        }
    }
}
