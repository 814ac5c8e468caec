// basegfx/src/grf/container.rs
// GRF container header - version detection, sprite section offsets, compression

use log::{debug, trace, warn};
use std::collections::HashMap;
use std::io::{Read, Seek};

use super::constants::{
    COMPRESSION_NONE, CONTAINER_INVALID, CONTAINER_V1, CONTAINER_V2, GRF_CONT_V2_SIG,
    GRF_V2_HEADER_LEN, MAX_PLAUSIBLE_DATA_OFFSET,
};
use super::fio::GrfStream;
use crate::exceptions::{GfxError, Result};

/// Detect the container version at the current stream position.
///
/// Version 1 has no header at all, so the stream is rewound to where it
/// started. Returns 0 when the file opens with a zero word but not the v2
/// signature, or is too short to tell.
pub fn container_version<R: Read + Seek>(stream: &mut GrfStream<R>) -> Result<u8> {
    let start = stream.pos()?;

    let first = match stream.read_word() {
        Ok(word) => word,
        Err(GfxError::Corrupt(_)) => return Ok(CONTAINER_INVALID),
        Err(e) => return Err(e),
    };

    if first != 0 {
        stream.seek_to(start)?;
        return Ok(CONTAINER_V1);
    }

    for expected in GRF_CONT_V2_SIG {
        match stream.read_byte() {
            Ok(byte) if byte == expected => {}
            Ok(_) | Err(GfxError::Corrupt(_)) => return Ok(CONTAINER_INVALID),
            Err(e) => return Err(e),
        }
    }
    Ok(CONTAINER_V2)
}

/// Parsed container header
#[derive(Debug, Clone, Default)]
pub struct ContainerHeader {
    pub version: u8,
    /// Compression byte, present from version 2 on
    pub compression: Option<u8>,
    /// File offset of the first sprite section entry for each sprite id
    pub sprite_offsets: HashMap<u32, u64>,
}

impl ContainerHeader {
    /// Read the header of `stream`, leaving it positioned at the first
    /// data section record.
    pub fn read<R: Read + Seek>(stream: &mut GrfStream<R>) -> Result<Self> {
        let version = container_version(stream)?;
        if version == CONTAINER_INVALID {
            return Err(GfxError::Corrupt(stream.name().to_string()));
        }
        trace!("Container version {} for '{}'", version, stream.name());

        let sprite_offsets = read_sprite_offsets(stream, version)?;

        let compression = if version >= CONTAINER_V2 {
            let compression = stream.read_byte()?;
            if compression != COMPRESSION_NONE {
                return Err(GfxError::UnsupportedCompression(compression));
            }
            Some(compression)
        } else {
            None
        };

        Ok(Self {
            version,
            compression,
            sprite_offsets,
        })
    }

    /// Offset of the sprite section entry for `id`, if there is one
    pub fn sprite_offset(&self, id: u32) -> Option<u64> {
        self.sprite_offsets.get(&id).copied()
    }
}

/// Walk the sprite section of a v2 container and note where each id starts.
/// The stream is left right after the data offset field.
fn read_sprite_offsets<R: Read + Seek>(
    stream: &mut GrfStream<R>,
    version: u8,
) -> Result<HashMap<u32, u64>> {
    let mut offsets = HashMap::new();
    if version < CONTAINER_V2 {
        return Ok(offsets);
    }

    let data_offset = stream.read_dword()? as u64;
    let old_pos = stream.pos()?;
    stream.seek_to(old_pos + data_offset)?;

    let mut prev_id = 0;
    loop {
        let entry_pos = stream.pos()?;
        let id = stream.read_dword()?;
        if id == 0 {
            break;
        }
        if id != prev_id {
            offsets.insert(id, entry_pos);
        }
        prev_id = id;
        let size = stream.read_dword()? as u64;
        stream.skip(size)?;
    }
    debug!(
        target: "grf",
        "Sprite section of '{}' holds {} sprite ids",
        stream.name(),
        offsets.len()
    );

    stream.seek_to(old_pos)?;
    Ok(offsets)
}

/// Size of the part of a container covered by its content hash: for v2
/// containers everything before the sprite section, otherwise `None`
/// (the whole file). Reads from the current position.
pub fn data_section_size<R: Read>(mut reader: R) -> Option<u64> {
    let mut data = [0u8; GRF_V2_HEADER_LEN as usize];
    reader.read_exact(&mut data).ok()?;

    if data[0] != 0 || data[1] != 0 || data[2..10] != GRF_CONT_V2_SIG {
        return None;
    }

    let offset = u32::from_le_bytes([data[10], data[11], data[12], data[13]]) as u64;
    if offset >= MAX_PLAUSIBLE_DATA_OFFSET {
        warn!(target: "grf", "Unexpectedly large offset for NewGRF");
        return None;
    }
    Some(GRF_V2_HEADER_LEN + offset)
}


// 🖼️🧾🔍🎨
