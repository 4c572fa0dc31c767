//! # mb-reels — Reel synchronization & resolution
//!
//! Four reels spin on independent, staggered timers and converge on one
//! "all reels landed" event per spin cycle.
//!
//! ## Layers
//!
//! - [`ReelUnit`] / [`ReelMotion`]: one reel's deceleration path and timer
//! - [`SpinCoordinator`]: synchronous state machine (Idle → Spinning →
//!   Finished), cycle-tagged report tally, result derivation
//! - [`SlotMachine`]: tokio driver that owns the timers, runs the
//!   recommendation fetch and broadcasts [`MachineEvent`]s
//!
//! ## Staleness
//!
//! Every spin gets a fresh [`CycleId`]. Reel reports and recommendation
//! answers carry the cycle they were issued for and are dropped if the
//! coordinator has moved on.

pub mod coordinator;
pub mod easing;
pub mod machine;
pub mod random;
pub mod reel;
pub mod timing;

pub use coordinator::*;
pub use easing::*;
pub use machine::*;
pub use random::*;
pub use reel::*;
pub use timing::*;
