//! Sequential and indexed sprite loading

use log::{debug, trace};
use std::ops::RangeInclusive;

use super::{SpriteEntry, SpriteTable};
use crate::exceptions::{GfxError, Result};
use crate::grf::fio::MAX_FILE_SLOTS;
use crate::grf::{FilePool, RawSprite, SearchPaths, SpriteReader};

/// Sprite table together with the file slots and per-slot palette flags
/// its entries refer to
#[derive(Debug)]
pub struct SpriteCache {
    files: FilePool,
    table: SpriteTable,
    palette_remap: Vec<bool>,
}

impl SpriteCache {
    pub fn new(search: SearchPaths, capacity: u32) -> Self {
        Self {
            files: FilePool::new(search),
            table: SpriteTable::new(capacity),
            palette_remap: vec![false; MAX_FILE_SLOTS],
        }
    }

    pub fn table(&self) -> &SpriteTable {
        &self.table
    }

    pub fn files(&self) -> &FilePool {
        &self.files
    }

    pub fn search(&self) -> &SearchPaths {
        self.files.search()
    }

    /// Drop every loaded sprite and slot assignment
    pub fn init_sprite_mem(&mut self) {
        self.table.clear();
        self.files.clear();
    }

    pub fn clear_palette_remap(&mut self) {
        self.palette_remap.iter_mut().for_each(|r| *r = false);
    }

    pub fn set_palette_remap(&mut self, slot: usize, remap: bool) -> Result<()> {
        let flag = self
            .palette_remap
            .get_mut(slot)
            .ok_or(GfxError::InvalidSlot(slot))?;
        *flag = remap;
        Ok(())
    }

    pub fn palette_remap(&self, slot: usize) -> bool {
        self.palette_remap.get(slot).copied().unwrap_or(false)
    }

    fn store(&mut self, index: u32, raw: RawSprite, slot: usize, version: u8) -> Result<()> {
        trace!(target: "sprite", "Sprite {} <- slot {} #{}", index, slot, raw.file_sprite_id);
        let entry = SpriteEntry {
            kind: raw.kind,
            file_slot: slot,
            file_pos: raw.file_pos,
            file_sprite_id: raw.file_sprite_id,
            container_version: version,
            remap_palette: self.palette_remap(slot),
            recolour: raw.recolour,
        };
        self.table.insert(index, entry)
    }

    /// Load every sprite of `filename` at consecutive indices from
    /// `load_index`, returning how many were loaded.
    ///
    /// Fails once the running index reaches the table capacity.
    pub fn load_grf_file(&mut self, filename: &str, load_index: u32, slot: usize) -> Result<u32> {
        let stream = self.files.open(slot, filename)?;
        debug!(target: "sprite", "Reading grf-file '{}'", filename);

        let mut reader = SpriteReader::open(stream)?;
        let version = reader.version();

        let mut index = load_index;
        let mut sprite_id = 0;
        while let Some(raw) = reader.next_sprite(sprite_id)? {
            self.store(index, raw, slot, version)?;
            index += 1;
            sprite_id += 1;
            if index >= self.table.capacity() {
                return Err(GfxError::TooManySprites {
                    capacity: self.table.capacity(),
                });
            }
        }
        debug!(target: "sprite", "Currently {} sprites are loaded", index);

        Ok(index - load_index)
    }

    /// Load `filename` into the given index ranges, in order. The file must
    /// hold at least as many sprites as the ranges cover.
    pub fn load_grf_file_indexed(
        &mut self,
        filename: &str,
        ranges: &[RangeInclusive<u32>],
        slot: usize,
    ) -> Result<u32> {
        let stream = self.files.open(slot, filename)?;
        debug!(target: "sprite", "Reading indexed grf-file '{}'", filename);

        let mut reader = SpriteReader::open(stream)?;
        let version = reader.version();

        let mut sprite_id = 0;
        for range in ranges {
            for index in range.clone() {
                let raw = reader.next_sprite(sprite_id)?.ok_or_else(|| {
                    GfxError::IndexedRangeTruncated {
                        filename: filename.to_string(),
                        index,
                    }
                })?;
                self.store(index, raw, slot, version)?;
                sprite_id += 1;
            }
        }

        Ok(sprite_id)
    }
}
