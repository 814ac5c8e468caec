//! GRF sprite container format

pub mod constants;
pub mod container;
pub mod fio;
pub mod reader;

#[cfg(test)]
pub(crate) mod testutil;

pub use container::{ContainerHeader, container_version, data_section_size};
pub use fio::{FilePool, FileStream, GrfStream, SearchPaths};
pub use reader::{RawSprite, SpriteKind, SpriteReader};

use crate::exceptions::{GfxError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Summary of a container file, as shown by `basegfx inspect`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub version: u8,
    pub sprites: u32,
    pub recolour_sprites: u32,
    pub invalid_sprites: u32,
    pub sprite_section_ids: usize,
    /// Bytes covered by the content hash, `None` for the whole file
    pub data_section_size: Option<u64>,
}

/// Read every record of the container at `path`
pub fn inspect_container(path: &Path) -> Result<ContainerSummary> {
    log::trace!("Inspecting container {:?}", path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| GfxError::FileNotFound(path.display().to_string()))?;

    let data_section_size = data_section_size(BufReader::new(File::open(path)?));

    let stream = GrfStream::new(BufReader::new(File::open(path)?), name);
    let mut reader = SpriteReader::open(stream)?;

    let mut summary = ContainerSummary {
        version: reader.version(),
        sprites: 0,
        recolour_sprites: 0,
        invalid_sprites: 0,
        sprite_section_ids: reader.header().sprite_offsets.len(),
        data_section_size,
    };

    while let Some(sprite) = reader.next_sprite(summary.sprites)? {
        summary.sprites += 1;
        match sprite.kind {
            SpriteKind::Recolour => summary.recolour_sprites += 1,
            SpriteKind::Invalid => summary.invalid_sprites += 1,
            SpriteKind::Normal => {}
        }
    }

    Ok(summary)
}
