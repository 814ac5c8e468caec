//! Climates and the base sprites each one replaces

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::baseset::GraphicsRole;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Landscape {
    #[default]
    Temperate,
    Arctic,
    Tropic,
    Toyland,
}

/// Base sprite indices replaced by the arctic file
pub const ARCTIC_SPRITE_RANGES: &[RangeInclusive<u32>] = &[
    0xF67..=0xF9F,
    0x10DC..=0x10E3,
    0x1108..=0x110B,
    0x1149..=0x1159,
    0x1219..=0x123C,
];

/// Base sprite indices replaced by the tropical file
pub const TROPIC_SPRITE_RANGES: &[RangeInclusive<u32>] = &[
    0xF67..=0xF9F,
    0x10DC..=0x10E3,
    0x1108..=0x110B,
    0x1149..=0x1159,
    0x1219..=0x1246,
];

/// Base sprite indices replaced by the toyland file
pub const TOYLAND_SPRITE_RANGES: &[RangeInclusive<u32>] = &[
    0xF67..=0xF9F,
    0x10DC..=0x10E3,
    0x1127..=0x1130,
    0x1219..=0x1224,
];

impl Landscape {
    pub const ALL: [Landscape; 4] = [
        Landscape::Temperate,
        Landscape::Arctic,
        Landscape::Tropic,
        Landscape::Toyland,
    ];

    /// File of the graphics set holding this climate's replacement sprites,
    /// together with the indices they replace. Temperate has none.
    pub fn replacement(self) -> Option<(GraphicsRole, &'static [RangeInclusive<u32>])> {
        match self {
            Landscape::Temperate => None,
            Landscape::Arctic => Some((GraphicsRole::Arctic, ARCTIC_SPRITE_RANGES)),
            Landscape::Tropic => Some((GraphicsRole::Tropical, TROPIC_SPRITE_RANGES)),
            Landscape::Toyland => Some((GraphicsRole::Toyland, TOYLAND_SPRITE_RANGES)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Landscape::Temperate => "temperate",
            Landscape::Arctic => "arctic",
            Landscape::Tropic => "tropic",
            Landscape::Toyland => "toyland",
        }
    }
}

impl fmt::Display for Landscape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Landscape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Landscape::ALL
            .into_iter()
            .find(|l| l.name() == lower || (lower == "tropical" && *l == Landscape::Tropic))
            .ok_or_else(|| format!("unknown landscape '{}'", s))
    }
}

/// Number of sprites a range table replaces
pub fn sprites_in(ranges: &[RangeInclusive<u32>]) -> u32 {
    ranges.iter().map(|r| r.end() - r.start() + 1).sum()
}
