//! # mb-core — Mood Blossom core data
//!
//! Static ritual data shared by every other crate in the workspace.
//!
//! ## Contents
//!
//! - **Catalog**: four ordered item lists (tea, activity, perfume, flower)
//!   loaded once from a JSON document
//! - **Commentary**: exact-match combination lookup with a guaranteed
//!   per-language default
//! - **Labels**: localized UI strings for the front end
//! - **MoodResult**: the immutable outcome of one finished spin
//!
//! ## Architecture
//!
//! ```text
//! ritual_data.json ──> Catalog ──select([usize; 4])──> Selections
//!                                                        │
//!                         commentary::resolve(ids, lang) │
//!                                                        v
//!                                                    MoodResult
//! ```

pub mod catalog;
pub mod commentary;
pub mod i18n;
pub mod language;
pub mod result;

pub use catalog::*;
pub use commentary::*;
pub use i18n::*;
pub use language::*;
pub use result::*;
