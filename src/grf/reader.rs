// basegfx/src/grf/reader.rs
// GRF sprite reader - walks the data section one record at a time

use log::{debug, trace};
use std::io::{Read, Seek};

use super::constants::{
    CONTAINER_V2, INLINE_SPRITE_HEADER, INLINE_SPRITE_OVERHEAD, RECOLOUR_SPRITE_SIZE,
    SPRITE_REF_SIZE, TYPE_FLAG_CHUNKED, TYPE_RECOLOUR, TYPE_SPRITE_REF,
};
use super::container::ContainerHeader;
use super::fio::GrfStream;
use crate::exceptions::{GfxError, Result};

/// What a sprite record turned out to be
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    /// Real sprite whose pixels are decoded later from `file_pos`
    Normal,
    /// Recolour table, read eagerly
    Recolour,
    /// Broken pixel data or a reference to a sprite id that does not exist
    Invalid,
}

/// One record as read from a container
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSprite {
    pub kind: SpriteKind,
    /// Where decoding of this sprite starts within the file
    pub file_pos: u64,
    /// Running sprite number within its file
    pub file_sprite_id: u32,
    /// Recolour table, padded with zeroes to 257 bytes
    pub recolour: Option<Vec<u8>>,
}

/// Reader over the data section of one container
#[derive(Debug)]
pub struct SpriteReader<R> {
    stream: GrfStream<R>,
    header: ContainerHeader,
}

impl<R: Read + Seek> SpriteReader<R> {
    /// Parse the container header and position at the first record
    pub fn open(mut stream: GrfStream<R>) -> Result<Self> {
        let header = ContainerHeader::read(&mut stream)?;
        Ok(Self { stream, header })
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn version(&self) -> u8 {
        self.header.version
    }

    pub fn name(&self) -> &str {
        self.stream.name()
    }

    /// Size field of the next record; `None` at end of stream
    fn read_size(&mut self) -> Result<Option<u32>> {
        let size = if self.header.version >= CONTAINER_V2 {
            self.stream.read_dword().map(Some)
        } else {
            self.stream.read_word().map(|w| Some(w as u32))
        };
        match size {
            Err(GfxError::Corrupt(_)) => Ok(None),
            other => other,
        }
    }

    /// Read the next sprite, numbering it `file_sprite_id`.
    ///
    /// Returns `Ok(None)` at the end of the data section. An empty recolour
    /// sprite, a malformed sprite section reference, an inline sprite whose
    /// pixel data overruns its record and an inline sprite in a v2 container
    /// also end the data section.
    pub fn next_sprite(&mut self, file_sprite_id: u32) -> Result<Option<RawSprite>> {
        let file_pos = self.stream.pos()?;

        let size = match self.read_size()? {
            None | Some(0) => return Ok(None),
            Some(size) => size,
        };
        let grf_type = self.stream.read_byte()?;

        if grf_type == TYPE_RECOLOUR {
            if size == 1 {
                self.stream.read_byte()?;
                trace!(target: "sprite", "Empty recolour sprite {} ends '{}'", file_sprite_id, self.name());
                return Ok(None);
            }
            let data = self.read_recolour(size as usize)?;
            return Ok(Some(RawSprite {
                kind: SpriteKind::Recolour,
                file_pos,
                file_sprite_id,
                recolour: Some(data),
            }));
        }

        if self.header.version >= CONTAINER_V2 && grf_type == TYPE_SPRITE_REF {
            if size != SPRITE_REF_SIZE {
                debug!(target: "sprite", "Invalid sprite section include in '{}', ignoring", self.name());
                self.stream.skip(size as u64)?;
                return Ok(None);
            }
            let id = self.stream.read_dword()?;
            let (kind, file_pos) = match self.header.sprite_offset(id) {
                Some(pos) => (SpriteKind::Normal, pos),
                None => {
                    debug!(target: "sprite", "Sprite id {} missing from sprite section of '{}'", id, self.name());
                    (SpriteKind::Invalid, file_pos)
                }
            };
            return Ok(Some(RawSprite {
                kind,
                file_pos,
                file_sprite_id,
                recolour: None,
            }));
        }

        self.stream.skip(INLINE_SPRITE_HEADER)?;
        let valid = self.skip_sprite_data(grf_type, size.saturating_sub(INLINE_SPRITE_OVERHEAD))?;

        if !valid {
            debug!(target: "sprite", "Sprite {} of '{}' overruns its record, stopping", file_sprite_id, self.name());
            return Ok(None);
        }
        if self.header.version >= CONTAINER_V2 {
            debug!(target: "sprite", "Inline sprite in v2 data section of '{}'", self.name());
            return Ok(None);
        }

        Ok(Some(RawSprite {
            kind: SpriteKind::Normal,
            file_pos,
            file_sprite_id,
            recolour: None,
        }))
    }

    fn read_recolour(&mut self, size: usize) -> Result<Vec<u8>> {
        let mut data = vec![0u8; size.max(RECOLOUR_SPRITE_SIZE)];
        self.stream.read_block(&mut data[..size])?;
        Ok(data)
    }

    /// Skip over inline pixel data of `num` decoded bytes. Returns false
    /// when a literal run overshoots the declared size.
    fn skip_sprite_data(&mut self, grf_type: u8, mut num: u32) -> Result<bool> {
        if grf_type & TYPE_FLAG_CHUNKED != 0 {
            self.stream.skip(num as u64)?;
            return Ok(true);
        }

        while num > 0 {
            let control = self.stream.read_byte()? as i8;
            if control >= 0 {
                let run = if control == 0 { 0x80 } else { control as u32 };
                if run > num {
                    return Ok(false);
                }
                num -= run;
                self.stream.skip(run as u64)?;
            } else {
                let copied = -(control >> 3) as u32;
                num = num.saturating_sub(copied);
                self.stream.read_byte()?;
            }
        }
        Ok(true)
    }
}


// 🖼️📖🧩🎨
