//! Blitter selection and switching
//!
//! Which blitter fits depends on the loaded content: the base set's depth,
//! the extensions' depth and whether full animation is on. After content
//! changes the active blitter is re-evaluated and, unless the user pinned
//! one, switched with the video driver's cooperation.

pub mod select;
pub mod state;

pub use select::{BlitterCandidate, BlitterRequirements, Capability, candidates, select_blitter};
pub use state::{BLITTERS, BlitterInfo, BlitterState, PendingSwitch, find_blitter};

use log::{debug, warn};

use crate::exceptions::{GfxError, Result};
use crate::host::VideoDriver;

/// What [`switch_blitter`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    Unchanged,
    Switched {
        from: &'static str,
        to: &'static str,
    },
    /// The driver refused the new blitter and is back on the old one
    RolledBack {
        attempted: &'static str,
        kept: &'static str,
    },
}

impl SwitchOutcome {
    /// Whether caches tied to the blitter must be rebuilt
    pub fn changed(self) -> bool {
        !matches!(self, SwitchOutcome::Unchanged)
    }
}

/// Move to the blitter that best fits `req`.
///
/// Nothing happens when the user pinned the blitter, when output is headless
/// (screen depth 0) or when the best fit is already active. If the driver
/// cannot adapt to the new blitter the previous one is restored; if it cannot
/// adapt to that either the switch fails fatally.
pub fn switch_blitter(
    state: &mut BlitterState,
    req: &BlitterRequirements,
    driver: &mut dyn VideoDriver,
) -> Result<SwitchOutcome> {
    if state.is_user_pinned() {
        return Ok(SwitchOutcome::Unchanged);
    }
    let current = state.current();
    if current.screen_depth == 0 {
        return Ok(SwitchOutcome::Unchanged);
    }

    let wanted = select_blitter(req);
    if wanted.name == current.name {
        return Ok(SwitchOutcome::Unchanged);
    }
    let target = find_blitter(wanted.name)
        .ok_or_else(|| GfxError::Generic(format!("blitter '{}' is not available", wanted.name)))?;

    debug!(target: "misc", "Switching blitter from '{}' to '{}'... ", current.name, target.name);
    let pending = state.begin_switch(target);

    if driver.after_blitter_change(target) {
        pending.commit();
        debug!(target: "misc", "Successfully switched to {}.", target.name);
        return Ok(SwitchOutcome::Switched {
            from: current.name,
            to: target.name,
        });
    }

    let kept = pending.rollback();
    if !driver.after_blitter_change(kept) {
        return Err(GfxError::VideoReinitFailed);
    }
    warn!(
        target: "misc",
        "⚠️ Video driver rejected blitter '{}', staying on '{}'",
        target.name, kept.name
    );
    Ok(SwitchOutcome::RolledBack {
        attempted: target.name,
        kept: kept.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Driver answering from a script and recording what it was asked
    struct ScriptedDriver {
        answers: Vec<bool>,
        calls: Vec<&'static str>,
    }

    impl ScriptedDriver {
        fn new(answers: &[bool]) -> Self {
            Self {
                answers: answers.to_vec(),
                calls: Vec::new(),
            }
        }
    }

    impl VideoDriver for ScriptedDriver {
        fn after_blitter_change(&mut self, blitter: &BlitterInfo) -> bool {
            self.calls.push(blitter.name);
            if self.answers.is_empty() {
                true
            } else {
                self.answers.remove(0)
            }
        }
    }

    fn state(name: &str, autodetected: bool) -> BlitterState {
        BlitterState::new(find_blitter(name).unwrap(), autodetected)
    }

    const WANTS_32BPP: BlitterRequirements = BlitterRequirements {
        base_wants_32bpp: false,
        content_wants_32bpp: true,
        animation_wanted: true,
    };

    #[test]
    fn test_every_candidate_is_registered() {
        for c in candidates() {
            assert!(find_blitter(c.name).is_some(), "{}", c.name);
        }
    }

    #[test]
    fn test_noop_cases() {
        let mut driver = ScriptedDriver::new(&[]);

        let mut pinned = state("8bpp-optimized", false);
        let out = switch_blitter(&mut pinned, &WANTS_32BPP, &mut driver).unwrap();
        assert_eq!(out, SwitchOutcome::Unchanged);
        assert_eq!(pinned.current().name, "8bpp-optimized");

        let mut headless = state("null", true);
        assert!(!switch_blitter(&mut headless, &WANTS_32BPP, &mut driver).unwrap().changed());
        assert_eq!(headless.current().name, "null");

        let mut same = state("32bpp-anim", true);
        assert!(!switch_blitter(&mut same, &WANTS_32BPP, &mut driver).unwrap().changed());

        assert!(driver.calls.is_empty());
    }

    #[test]
    fn test_switch_success() {
        let mut s = state("8bpp-optimized", true);
        let mut driver = ScriptedDriver::new(&[true]);
        let out = switch_blitter(&mut s, &WANTS_32BPP, &mut driver).unwrap();

        assert_eq!(
            out,
            SwitchOutcome::Switched {
                from: "8bpp-optimized",
                to: "32bpp-anim"
            }
        );
        assert_eq!(s.current().name, "32bpp-anim");
        assert_eq!(driver.calls, vec!["32bpp-anim"]);
    }

    #[test]
    fn test_switch_rolls_back() {
        let mut s = state("8bpp-optimized", true);
        let mut driver = ScriptedDriver::new(&[false, true]);
        let out = switch_blitter(&mut s, &WANTS_32BPP, &mut driver).unwrap();

        assert!(matches!(out, SwitchOutcome::RolledBack { kept: "8bpp-optimized", .. }));
        assert!(out.changed());
        assert_eq!(s.current().name, "8bpp-optimized");
        assert_eq!(driver.calls, vec!["32bpp-anim", "8bpp-optimized"]);
    }

    #[test]
    fn test_switch_fails_when_rollback_fails() {
        let mut s = state("8bpp-optimized", true);
        let mut driver = ScriptedDriver::new(&[false, false]);
        let err = switch_blitter(&mut s, &WANTS_32BPP, &mut driver).unwrap_err();

        assert!(matches!(err, GfxError::VideoReinitFailed));
        assert_eq!(
            err.to_string(),
            "Failed to reinitialize video driver. Specify a fixed blitter in the config"
        );
        assert_eq!(s.current().name, "8bpp-optimized");
    }
}
