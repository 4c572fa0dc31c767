//! Daily usage guard
//!
//! Tracks attempts per calendar day and gates new spins once the daily
//! limit is reached. The admin override lifts the gate and stops
//! attempts from being counted.
//!
//! Invariant, re-established after every mutation:
//! `limit_reached == !admin_override && attempts_today >= limit`

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::store::{KEY_ADMIN_MODE, KEY_USAGE_COUNT, KEY_USAGE_DATE, SharedStore};

/// Spins allowed per calendar day
pub const DAILY_LIMIT: u32 = 5;

/// Snapshot of the usage counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageState {
    pub date: NaiveDate,
    pub attempts_today: u32,
    pub limit_reached: bool,
    pub admin_override: bool,
}

/// Owner of [`UsageState`]; all usage mutations go through here
pub struct UsageGuard {
    state: UsageState,
    limit: u32,
    store: SharedStore,
    clock: Arc<dyn Clock>,
}

impl UsageGuard {
    /// Load with the standard daily limit
    pub fn load(store: SharedStore, clock: Arc<dyn Clock>) -> Self {
        Self::load_with_limit(store, clock, DAILY_LIMIT)
    }

    /// Load persisted counters, resetting them if the stored day is stale
    pub fn load_with_limit(store: SharedStore, clock: Arc<dyn Clock>, limit: u32) -> Self {
        let today = clock.today();
        let stored_date = store
            .get(KEY_USAGE_DATE)
            .and_then(|s| s.parse::<NaiveDate>().ok());
        let admin_override = store.get(KEY_ADMIN_MODE).as_deref() == Some("true");

        let mut guard = Self {
            state: UsageState {
                date: today,
                attempts_today: 0,
                limit_reached: false,
                admin_override,
            },
            limit,
            store,
            clock,
        };

        if stored_date == Some(today) {
            guard.state.attempts_today = guard
                .store
                .get(KEY_USAGE_COUNT)
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(0);
        } else {
            log::info!("[Usage] New day {}, counter reset", today);
            guard.persist(KEY_USAGE_DATE, &today.to_string());
            guard.persist(KEY_USAGE_COUNT, "0");
        }

        guard.recompute();
        guard
    }

    /// Current counters
    pub fn state(&self) -> UsageState {
        self.state
    }

    /// Configured daily limit
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Spins left today (never negative)
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.state.attempts_today)
    }

    pub fn is_admin(&self) -> bool {
        self.state.admin_override
    }

    /// Whether a new spin may start. Applies the day-rollover check first.
    pub fn can_spin(&mut self) -> bool {
        self.rollover();
        self.state.admin_override || !self.state.limit_reached
    }

    /// Count one attempt (no-op while the admin override is active).
    /// Returns the attempts recorded today.
    pub fn record_attempt(&mut self) -> u32 {
        self.rollover();
        if self.state.admin_override {
            log::debug!("[Usage] Admin override active, attempt not counted");
            return self.state.attempts_today;
        }

        self.state.attempts_today = self.state.attempts_today.saturating_add(1);
        self.persist(KEY_USAGE_COUNT, &self.state.attempts_today.to_string());
        self.recompute();

        if self.state.limit_reached {
            log::info!(
                "[Usage] Daily limit reached ({}/{})",
                self.state.attempts_today,
                self.limit
            );
        }
        self.state.attempts_today
    }

    /// Flip the admin override. Enabling it clears the gate immediately
    /// without touching the counter. Returns the new flag.
    pub fn toggle_admin(&mut self) -> bool {
        self.state.admin_override = !self.state.admin_override;
        let flag = if self.state.admin_override { "true" } else { "false" };
        self.persist(KEY_ADMIN_MODE, flag);
        self.recompute();
        log::info!("[Usage] Admin override {}", flag);
        self.state.admin_override
    }

    /// Reset the counter if the calendar day changed. Returns true on reset.
    pub fn rollover(&mut self) -> bool {
        let today = self.clock.today();
        if today == self.state.date {
            return false;
        }

        log::info!(
            "[Usage] Day changed {} -> {}, counter reset",
            self.state.date,
            today
        );
        self.state.date = today;
        self.state.attempts_today = 0;
        self.persist(KEY_USAGE_DATE, &today.to_string());
        self.persist(KEY_USAGE_COUNT, "0");
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        self.state.limit_reached =
            !self.state.admin_override && self.state.attempts_today >= self.limit;
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log::warn!("[Usage] Failed to persist {}: {}", key, e);
        }
    }
}

impl std::fmt::Debug for UsageGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageGuard")
            .field("state", &self.state)
            .field("limit", &self.limit)
            .finish()
    }
}
