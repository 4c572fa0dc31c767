//! Reel timing profiles

use std::time::Duration;

use serde::{Deserialize, Serialize};

use mb_core::Category;

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Regular play
    #[default]
    Normal,
    /// Short spins
    Turbo,
    /// No animation (tests, scripted play)
    Instant,
    /// Derived via [`ReelTiming::scaled`]
    Custom,
}

/// Per-machine reel timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelTiming {
    pub profile: TimingProfile,

    /// Deceleration length, identical for every reel (ms)
    pub animation_ms: u64,

    /// Start delay per reel, in reel order (ms)
    pub stagger_ms: [u64; 4],

    /// Fewest full strip cycles before landing
    pub min_rotations: u32,

    /// Number of distinct rotation counts above the minimum
    pub rotation_spread: u32,

    /// Height of one strip cell (px)
    pub item_height_px: f64,
}

impl ReelTiming {
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            animation_ms: 3500,
            stagger_ms: [0, 200, 400, 600],
            min_rotations: 12,
            rotation_spread: 6,
            item_height_px: 60.0,
        }
    }

    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            animation_ms: 900,
            stagger_ms: [0, 80, 160, 240],
            min_rotations: 4,
            rotation_spread: 3,
            item_height_px: 60.0,
        }
    }

    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            animation_ms: 0,
            stagger_ms: [0; 4],
            min_rotations: 1,
            rotation_spread: 1,
            item_height_px: 60.0,
        }
    }

    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal | TimingProfile::Custom => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
        }
    }

    /// Scale all durations by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        let scale = |ms: u64| (ms as f64 * factor).round() as u64;
        Self {
            profile: TimingProfile::Custom,
            animation_ms: scale(self.animation_ms),
            stagger_ms: self.stagger_ms.map(scale),
            ..self.clone()
        }
    }

    pub fn start_delay(&self, category: Category) -> Duration {
        Duration::from_millis(self.stagger_ms[category.index()])
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Time from spin start until the reel reports completion
    pub fn landing_time(&self, category: Category) -> Duration {
        self.start_delay(category) + self.animation()
    }

    /// Time until the last reel lands
    pub fn total_spin_duration(&self) -> Duration {
        Category::ALL
            .iter()
            .map(|c| self.landing_time(*c))
            .max()
            .unwrap_or_default()
    }

    /// Rotation count range, inclusive
    pub fn rotation_range(&self) -> (u32, u32) {
        let spread = self.rotation_spread.max(1);
        (self.min_rotations, self.min_rotations + spread - 1)
    }
}

impl Default for ReelTiming {
    fn default() -> Self {
        Self::normal()
    }
}
