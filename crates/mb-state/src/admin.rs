//! Hidden admin gesture — repeated taps on the header badge

/// Taps needed to flip the admin override
pub const ADMIN_TAP_THRESHOLD: u32 = 7;

/// Counts badge taps; fires once every `threshold` taps
#[derive(Debug, Clone)]
pub struct AdminGesture {
    taps: u32,
    threshold: u32,
}

impl Default for AdminGesture {
    fn default() -> Self {
        Self::new(ADMIN_TAP_THRESHOLD)
    }
}

impl AdminGesture {
    pub fn new(threshold: u32) -> Self {
        Self {
            taps: 0,
            threshold: threshold.max(1),
        }
    }

    /// Register one tap. Returns true when the gesture completes,
    /// after which the counter starts over.
    pub fn tap(&mut self) -> bool {
        self.taps += 1;
        if self.taps >= self.threshold {
            self.taps = 0;
            true
        } else {
            false
        }
    }

    /// Taps registered toward the next toggle
    pub fn taps(&self) -> u32 {
        self.taps
    }
}
