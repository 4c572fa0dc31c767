//! # mb-oracle — Lucky-item recommendations
//!
//! Boundary to the external generative service that proposes one
//! shopping item for a finished ritual, plus the local fallback chain
//! that guarantees a recommendation always reaches the display layer.
//!
//! ## Fallback tiers
//!
//! ```text
//! Curator::recommend(request)
//!     │
//!     ├── no credential ──────────────> fallback::offline(lang)
//!     │
//!     └── RecommendationService::fetch
//!             ├── Ok(item) ───────────> item
//!             └── Err(_) ─────────────> fallback::failure(lang)
//! ```
//!
//! The service gets exactly one attempt per call; retrying is left to the
//! next spin.

pub mod config;
pub mod curator;
pub mod fallback;
pub mod gemini;
pub mod service;
pub mod shop;
pub mod types;

pub use config::*;
pub use curator::*;
pub use gemini::*;
pub use service::*;
pub use shop::*;
pub use types::*;
