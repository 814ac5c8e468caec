//! Hooks into the parts of the game that live outside this crate
//!
//! The video driver, font and sprite caches, window layout, palettes and
//! cursor all react to what the loader and blitter switcher do, but are not
//! owned by them.

use log::{info, warn};

use crate::blitter::BlitterInfo;

/// Display side effects triggered by loading and blitter switches.
/// Every hook defaults to doing nothing except `show_info`, which logs.
pub trait DisplayHooks {
    /// Show a non-fatal message to the user
    fn show_info(&mut self, message: &str) {
        warn!("{}", message);
    }

    fn clear_font_cache(&mut self) {}

    fn clear_sprite_cache(&mut self) {}

    /// Force every window to lay itself out again
    fn reinit_all_windows(&mut self) {}

    fn init_palettes(&mut self) {}

    fn update_cursor_size(&mut self) {}

    /// Build the Unicode character to glyph sprite mapping
    fn init_unicode_glyph_map(&mut self) {}
}

/// The active video output
pub trait VideoDriver {
    /// Adapt the output to a freshly activated blitter. Returns false when
    /// the driver cannot work with it.
    fn after_blitter_change(&mut self, blitter: &BlitterInfo) -> bool;
}

/// Hooks that only log, for tools without a user interface
#[derive(Debug, Default)]
pub struct LogHooks;

impl DisplayHooks for LogHooks {}

/// Driver without output; accepts every blitter
#[derive(Debug, Default)]
pub struct NullDriver;

impl VideoDriver for NullDriver {
    fn after_blitter_change(&mut self, blitter: &BlitterInfo) -> bool {
        info!(target: "misc", "Video output now uses the {} blitter", blitter.name);
        true
    }
}
