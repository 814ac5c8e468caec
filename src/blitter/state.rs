// basegfx/src/blitter/state.rs
// Active blitter and the begin/commit/rollback switch guard

use log::debug;
use std::fmt;

use crate::exceptions::{GfxError, Result};

/// A blitter the video driver can be asked to use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitterInfo {
    pub name: &'static str,
    /// Bits per pixel of the screen; 0 for the null blitter
    pub screen_depth: u8,
    pub description: &'static str,
}

const fn info(name: &'static str, screen_depth: u8, description: &'static str) -> BlitterInfo {
    BlitterInfo {
        name,
        screen_depth,
        description,
    }
}

/// Every known blitter
pub const BLITTERS: &[BlitterInfo] = &[
    info("null", 0, "Null Blitter (does nothing)"),
    info("8bpp-simple", 8, "8bpp Simple Blitter (relative slow, but never wrong)"),
    info("8bpp-optimized", 8, "8bpp Optimized Blitter (compression + all-ZoomLevel cache)"),
    info("32bpp-simple", 32, "32bpp Simple Blitter (no palette animation)"),
    info("32bpp-optimized", 32, "32bpp Optimized Blitter (no palette animation)"),
    info("32bpp-anim", 32, "32bpp Animation Blitter (palette animation)"),
    info("32bpp-sse2", 32, "32bpp SSE2 Blitter (no palette animation)"),
    info("32bpp-ssse3", 32, "32bpp SSSE3 Blitter (no palette animation)"),
    info("32bpp-sse4", 32, "32bpp SSE4 Blitter (no palette animation)"),
    info("32bpp-sse4-anim", 32, "32bpp SSE4 Blitter (palette animation)"),
];

/// Blitter used when none is configured
pub const DEFAULT_BLITTER: &str = "8bpp-optimized";

pub fn find_blitter(name: &str) -> Option<&'static BlitterInfo> {
    BLITTERS.iter().find(|b| b.name == name)
}

/// The active blitter and whether it may be switched automatically
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlitterState {
    active: &'static BlitterInfo,
    autodetected: bool,
}

impl fmt::Debug for BlitterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlitterState")
            .field("active", &self.active.name)
            .field("autodetected", &self.autodetected)
            .finish()
    }
}

impl BlitterState {
    pub fn new(active: &'static BlitterInfo, autodetected: bool) -> Self {
        Self {
            active,
            autodetected,
        }
    }

    /// A configured name pins the blitter; none autodetects starting from
    /// the default
    pub fn from_config(name: Option<&str>) -> Result<Self> {
        let autodetected = name.is_none();
        let name = name.unwrap_or(DEFAULT_BLITTER);
        let active = find_blitter(name)
            .ok_or_else(|| GfxError::Config(format!("unknown blitter '{}'", name)))?;
        Ok(Self::new(active, autodetected))
    }

    pub fn current(&self) -> &'static BlitterInfo {
        self.active
    }

    pub fn is_user_pinned(&self) -> bool {
        !self.autodetected
    }

    /// Make `to` active until the returned guard is committed; dropping or
    /// rolling back the guard restores the previous blitter.
    pub fn begin_switch(&mut self, to: &'static BlitterInfo) -> PendingSwitch<'_> {
        debug!(target: "misc", "Blitter {} -> {} pending", self.active.name, to.name);
        let previous = std::mem::replace(&mut self.active, to);
        PendingSwitch {
            state: self,
            previous,
            done: false,
        }
    }
}

/// Switch in progress
#[derive(Debug)]
pub struct PendingSwitch<'a> {
    state: &'a mut BlitterState,
    previous: &'static BlitterInfo,
    done: bool,
}

impl PendingSwitch<'_> {
    pub fn previous(&self) -> &'static BlitterInfo {
        self.previous
    }

    pub fn commit(mut self) {
        self.done = true;
    }

    /// Restore the previous blitter and return it
    pub fn rollback(mut self) -> &'static BlitterInfo {
        self.state.active = self.previous;
        self.done = true;
        self.previous
    }
}

impl Drop for PendingSwitch<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.state.active = self.previous;
        }
    }
}
