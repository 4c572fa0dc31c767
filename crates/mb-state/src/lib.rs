//! # mb-state — Mood Blossom persisted state
//!
//! The only state that survives a reload: the daily attempt counter, the
//! admin override flag and the selected language. Everything is routed
//! through explicit owners instead of ad hoc storage reads:
//!
//! - [`UsageGuard`] owns [`UsageState`] (day, attempts, limit, admin)
//! - [`SessionConfig`] owns the display language
//! - [`KeyValueStore`] is the opaque backing storage both write through

pub mod admin;
pub mod clock;
pub mod session;
pub mod store;
pub mod usage;

pub use admin::*;
pub use clock::*;
pub use session::*;
pub use store::*;
pub use usage::*;
