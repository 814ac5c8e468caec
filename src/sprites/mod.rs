//! In-memory sprite table and the loaders that fill it

pub mod loader;

pub use loader::SpriteCache;

use crate::exceptions::{GfxError, Result};
use crate::grf::SpriteKind;

/// Default number of sprite slots
pub const MAX_SPRITES: u32 = 64000;

/// A sprite as recorded in the table. Pixel data is not decoded here; the
/// slot and file position say where to find it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteEntry {
    pub kind: SpriteKind,
    /// File slot the sprite was loaded from
    pub file_slot: usize,
    pub file_pos: u64,
    /// Sprite number within its own file
    pub file_sprite_id: u32,
    pub container_version: u8,
    /// Whether the slot's palette needs remapping to DOS
    pub remap_palette: bool,
    pub recolour: Option<Vec<u8>>,
}

/// Fixed-capacity indexed sprite store shared by every file of a load pass
pub struct SpriteTable {
    capacity: u32,
    entries: Vec<Option<SpriteEntry>>,
}

impl std::fmt::Debug for SpriteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteTable")
            .field("capacity", &self.capacity)
            .field("loaded", &self.loaded())
            .finish()
    }
}

impl Default for SpriteTable {
    fn default() -> Self {
        Self::new(MAX_SPRITES)
    }
}

impl SpriteTable {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Store `entry` at `index`, replacing whatever was there
    pub fn insert(&mut self, index: u32, entry: SpriteEntry) -> Result<()> {
        if index >= self.capacity {
            return Err(GfxError::TooManySprites {
                capacity: self.capacity,
            });
        }
        let slot = index as usize;
        if self.entries.len() <= slot {
            self.entries.resize(slot + 1, None);
        }
        self.entries[slot] = Some(entry);
        Ok(())
    }

    pub fn get(&self, index: u32) -> Option<&SpriteEntry> {
        self.entries.get(index as usize).and_then(Option::as_ref)
    }

    /// Number of occupied indices
    pub fn loaded(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Occupied indices with their entries, in index order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &SpriteEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i as u32, e)))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
