//! Reel unit — one category's strip, its landing path and timer

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use mb_core::Category;

use crate::coordinator::CycleId;
use crate::easing::REEL_DECELERATION;
use crate::timing::ReelTiming;

/// Completion report from one reel, tagged with the cycle it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReelReport {
    pub cycle: CycleId,
    pub reel: Category,
}

/// One planned spin of one reel. Pure data; sampling has no side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelMotion {
    pub reel: Category,
    pub target_index: usize,
    pub reel_len: usize,
    pub rotations: u32,
    pub item_height_px: f64,
    /// Strip offset when the spin starts (px)
    pub start_offset_px: f64,
    /// Strip offset when the reel lands (px); aligned on `target_index`
    pub final_offset_px: f64,
    pub delay: Duration,
    pub duration: Duration,
}

impl ReelMotion {
    /// When the reel reports completion, relative to the spin start
    pub fn landing_time(&self) -> Duration {
        self.delay + self.duration
    }

    /// Strip offset at `elapsed` since the spin started
    pub fn offset_at(&self, elapsed: Duration) -> f64 {
        if elapsed <= self.delay {
            return self.start_offset_px;
        }
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed - self.delay).as_secs_f64() / self.duration.as_secs_f64()
        };
        let eased = REEL_DECELERATION.evaluate(progress);
        self.start_offset_px + (self.final_offset_px - self.start_offset_px) * eased
    }

    /// Item in the window at `elapsed`
    pub fn index_at(&self, elapsed: Duration) -> usize {
        if self.reel_len == 0 || self.item_height_px <= 0.0 {
            return 0;
        }
        if self.is_landed_at(elapsed) {
            return self.target_index;
        }
        let cell = (self.offset_at(elapsed) / self.item_height_px).round() as usize;
        cell % self.reel_len
    }

    pub fn is_landed_at(&self, elapsed: Duration) -> bool {
        elapsed >= self.landing_time()
    }

    /// Spawn the reel's timer: `on_start` after the start delay, `on_land`
    /// once the animation has run its full length. Aborting the handle
    /// cancels whichever callback has not fired yet.
    pub fn spawn_timer<S, L>(&self, on_start: S, on_land: L) -> JoinHandle<()>
    where
        S: FnOnce() + Send + 'static,
        L: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_start();
            tokio::time::sleep(duration).await;
            on_land();
        })
    }
}

/// One reel. Remembers where it came to rest so the next spin resumes from there.
#[derive(Debug, Clone)]
pub struct ReelUnit {
    reel: Category,
    reel_len: usize,
    rest_index: usize,
}

impl ReelUnit {
    pub fn new(reel: Category, reel_len: usize) -> Self {
        Self {
            reel,
            reel_len,
            rest_index: 0,
        }
    }

    pub fn reel(&self) -> Category {
        self.reel
    }

    pub fn len(&self) -> usize {
        self.reel_len
    }

    pub fn is_empty(&self) -> bool {
        self.reel_len == 0
    }

    /// Item currently in the window between spins
    pub fn rest_index(&self) -> usize {
        self.rest_index
    }

    /// Plan a spin onto `target_index` with `rotations` full strip cycles
    pub fn plan_spin(
        &mut self,
        target_index: usize,
        rotations: u32,
        timing: &ReelTiming,
    ) -> ReelMotion {
        let height = timing.item_height_px;
        let target_cell = rotations as usize * self.reel_len + target_index;
        let motion = ReelMotion {
            reel: self.reel,
            target_index,
            reel_len: self.reel_len,
            rotations,
            item_height_px: height,
            start_offset_px: self.rest_index as f64 * height,
            final_offset_px: target_cell as f64 * height,
            delay: timing.start_delay(self.reel),
            duration: timing.animation(),
        };
        log::trace!(
            "[Reel] {} -> #{} ({} rotations, lands at {:?})",
            self.reel.tag(),
            target_index,
            rotations,
            motion.landing_time()
        );
        self.rest_index = target_index;
        motion
    }
}
