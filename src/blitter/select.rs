// basegfx/src/blitter/select.rs
// Blitter selection - priority-ordered rule table checked against content needs

/// Support of a blitter for one feature
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Capability {
    /// Only without the feature
    Without = 0,
    /// Only with the feature
    With = 1,
    Either = 2,
}

impl Capability {
    pub const fn accepts(self, wanted: bool) -> bool {
        match self {
            Capability::Without => !wanted,
            Capability::With => wanted,
            Capability::Either => true,
        }
    }
}

/// Entry of the selection table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitterCandidate {
    pub name: &'static str,
    pub animation: Capability,
    /// 32bpp support for the base set's sprites
    pub base_depth: Capability,
    /// 32bpp support for extension sprites
    pub content_depth: Capability,
}

impl BlitterCandidate {
    const fn new(
        name: &'static str,
        animation: Capability,
        base_depth: Capability,
        content_depth: Capability,
    ) -> Self {
        Self {
            name,
            animation,
            base_depth,
            content_depth,
        }
    }

    pub const fn matches(&self, req: &BlitterRequirements) -> bool {
        self.animation.accepts(req.animation_wanted)
            && self.base_depth.accepts(req.base_wants_32bpp)
            && self.content_depth.accepts(req.content_wants_32bpp)
    }
}

/// What the loaded content asks of the blitter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlitterRequirements {
    /// The used base set prefers 32bpp
    pub base_wants_32bpp: bool,
    /// Some active extension needs 32bpp, or 8bpp output is unsupported
    pub content_wants_32bpp: bool,
    /// Full animation is turned on
    pub animation_wanted: bool,
}

impl BlitterRequirements {
    /// Requirements for bit pattern `bits`: animation, base, content
    const fn from_bits(bits: u8) -> Self {
        Self {
            animation_wanted: bits & 1 != 0,
            base_wants_32bpp: bits & 2 != 0,
            content_wants_32bpp: bits & 4 != 0,
        }
    }
}

use Capability::{Either, With, Without};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const SIMD: &[BlitterCandidate] = &[
    BlitterCandidate::new("32bpp-sse4", Without, With, Either),
    BlitterCandidate::new("32bpp-ssse3", Without, With, Either),
    BlitterCandidate::new("32bpp-sse2", Without, With, Either),
    BlitterCandidate::new("32bpp-sse4-anim", With, With, Either),
];

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
const SIMD: &[BlitterCandidate] = &[];

const PORTABLE: &[BlitterCandidate] = &[BlitterCandidate::new(
    "8bpp-optimized",
    Either,
    Without,
    Without,
)];

/// Last entries; between them they accept every input
const FALLBACK: &[BlitterCandidate] = &[
    BlitterCandidate::new("32bpp-optimized", Without, Either, Either),
    BlitterCandidate::new("32bpp-anim", With, Either, Either),
];

const fn covers_every_input(tail: &[BlitterCandidate]) -> bool {
    let mut bits = 0;
    while bits < 8 {
        let req = BlitterRequirements::from_bits(bits);
        let mut i = 0;
        let mut found = false;
        while i < tail.len() {
            if tail[i].matches(&req) {
                found = true;
            }
            i += 1;
        }
        if !found {
            return false;
        }
        bits += 1;
    }
    true
}

const _: () = assert!(covers_every_input(FALLBACK));

/// Every candidate in priority order
pub fn candidates() -> impl Iterator<Item = &'static BlitterCandidate> {
    SIMD.iter().chain(PORTABLE).chain(FALLBACK)
}

/// First candidate compatible with `req`
pub fn select_blitter(req: &BlitterRequirements) -> &'static BlitterCandidate {
    candidates()
        .find(|c| c.matches(req))
        // Unreachable: FALLBACK accepts every input
        .unwrap_or(&FALLBACK[FALLBACK.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::Capability::{Either, With, Without};
    use super::*;

    const X86: bool = cfg!(any(target_arch = "x86", target_arch = "x86_64"));

    fn select(base: bool, content: bool, animation: bool) -> &'static str {
        select_blitter(&BlitterRequirements {
            base_wants_32bpp: base,
            content_wants_32bpp: content,
            animation_wanted: animation,
        })
        .name
    }

    #[test]
    fn test_capability_rules() {
        assert!(Without.accepts(false));
        assert!(!Without.accepts(true));
        assert!(With.accepts(true));
        assert!(!With.accepts(false));
        assert!(Either.accepts(true) && Either.accepts(false));
        assert_eq!(Without as u8, 0);
        assert_eq!(With as u8, 1);
        assert_eq!(Either as u8, 2);
    }

    #[test]
    fn test_plain_8bpp_content() {
        assert_eq!(select(false, false, false), "8bpp-optimized");
        assert_eq!(select(false, false, true), "8bpp-optimized");
    }

    #[test]
    fn test_32bpp_animated() {
        let expected = if X86 { "32bpp-sse4-anim" } else { "32bpp-anim" };
        assert_eq!(select(true, true, true), expected);
        assert_eq!(select(false, true, true), "32bpp-anim");
    }

    #[test]
    fn test_32bpp_static() {
        let expected = if X86 { "32bpp-sse4" } else { "32bpp-optimized" };
        assert_eq!(select(true, false, false), expected);
        assert_eq!(select(true, true, false), expected);
        assert_eq!(select(false, true, false), "32bpp-optimized");
    }

    #[test]
    fn test_selection_is_total_and_compatible() {
        for bits in 0..8 {
            let req = BlitterRequirements::from_bits(bits);
            let chosen = select_blitter(&req);
            assert!(chosen.matches(&req), "{} for {:?}", chosen.name, req);
            let first = candidates().position(|c| c.name == chosen.name).unwrap();
            assert!(candidates().take(first).all(|c| !c.matches(&req)));
        }
    }

    #[test]
    fn test_fallback_closes_the_list() {
        let names: Vec<&str> = candidates().map(|c| c.name).collect();
        assert_eq!(&names[names.len() - 2..], ["32bpp-optimized", "32bpp-anim"]);
        assert_eq!(names.len(), if X86 { 7 } else { 3 });
        assert!(covers_every_input(FALLBACK));
        assert!(!covers_every_input(PORTABLE));
    }
}
