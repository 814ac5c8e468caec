//! basegfx - base graphics set loading for a tile-based transport game
//!
//! This crate parses GRF sprite containers, fills a fixed-capacity sprite
//! table from a base graphics set, verifies set files by MD5 and picks the
//! blitter that fits the loaded content.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,

    // Future compatibility
    future_incompatible,
)]
#![warn(
    // Rust 2018 idioms
    rust_2018_idioms,
    unreachable_pub,

    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::wildcard_imports))]

pub mod api;
pub mod baseset;
pub mod blitter;
pub mod checksums;
pub mod exceptions;
pub mod exit_codes;
pub mod extension;
pub mod gfxinit;
pub mod grf;
pub mod host;
pub mod landscape;
pub mod logger;
pub mod sprites;
pub mod version;

// Re-export main API functions
pub use api::{LoadOptions, LoadResult, SetKind, load_set, verify_set};
pub use exceptions::{GfxError, Result};

// Re-export the types hosts plug into
pub use baseset::{GraphicsSet, Palette, SoundsSet};
pub use blitter::{BlitterRequirements, SwitchOutcome, select_blitter};
pub use gfxinit::{Gfx, GfxSettings, Support8bpp};
pub use host::{DisplayHooks, VideoDriver};
pub use landscape::Landscape;
