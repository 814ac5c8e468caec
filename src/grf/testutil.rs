// basegfx/src/grf/testutil.rs
// Builders for container files used by the tests

use std::path::Path;

use super::constants::{
    CONTAINER_V1, CONTAINER_V2, GRF_CONT_V2_SIG, TYPE_FLAG_CHUNKED, TYPE_RECOLOUR,
    TYPE_SPRITE_REF,
};

/// One data section record
#[derive(Debug, Clone)]
pub(crate) enum SpriteRecord {
    Recolour(Vec<u8>),
    Reference(u32),
    /// Type byte, then the payload exactly as written; `size` is the record size field
    Inline { type_byte: u8, size: u32, payload: Vec<u8> },
}

impl SpriteRecord {
    pub(crate) fn recolour(data: Vec<u8>) -> Self {
        SpriteRecord::Recolour(data)
    }

    pub(crate) fn reference(id: u32) -> Self {
        SpriteRecord::Reference(id)
    }

    /// Inline sprite whose pixel data is stored verbatim
    pub(crate) fn chunked(pixels: usize) -> Self {
        let mut payload = vec![4, 8, 0, 0, 0, 0, 0];
        payload.extend(std::iter::repeat_n(0x5A, pixels));
        SpriteRecord::Inline {
            type_byte: TYPE_FLAG_CHUNKED | 0x01,
            size: 8 + pixels as u32,
            payload,
        }
    }

    /// Inline sprite using the run-length encoding, all literal runs
    pub(crate) fn literal(pixels: usize) -> Self {
        let mut payload = vec![4, 8, 0, 0, 0, 0, 0];
        let mut remaining = pixels;
        while remaining > 0 {
            let run = remaining.min(127);
            payload.push(run as u8);
            payload.extend(std::iter::repeat_n(0x33, run));
            remaining -= run;
        }
        SpriteRecord::Inline {
            type_byte: 0x01,
            size: 8 + pixels as u32,
            payload,
        }
    }

    fn encode(&self, version: u8, out: &mut Vec<u8>) {
        let (size, type_byte, payload): (u32, u8, Vec<u8>) = match self {
            SpriteRecord::Recolour(data) => (data.len() as u32, TYPE_RECOLOUR, data.clone()),
            SpriteRecord::Reference(id) => (4, TYPE_SPRITE_REF, id.to_le_bytes().to_vec()),
            SpriteRecord::Inline {
                type_byte,
                size,
                payload,
            } => (*size, *type_byte, payload.clone()),
        };
        write_size(version, size, out);
        out.push(type_byte);
        out.extend_from_slice(&payload);
    }
}

fn write_size(version: u8, size: u32, out: &mut Vec<u8>) {
    if version >= CONTAINER_V2 {
        out.extend_from_slice(&size.to_le_bytes());
    } else {
        out.extend_from_slice(&(size as u16).to_le_bytes());
    }
}

/// Assembles a container file in memory
#[derive(Debug, Clone)]
pub(crate) struct ContainerBuilder {
    version: u8,
    compression: u8,
    records: Vec<SpriteRecord>,
    sprite_section: Vec<(u32, Vec<u8>)>,
    trailer: Vec<u8>,
}

impl ContainerBuilder {
    pub(crate) fn v1() -> Self {
        Self::new(CONTAINER_V1)
    }

    pub(crate) fn v2() -> Self {
        Self::new(CONTAINER_V2)
    }

    fn new(version: u8) -> Self {
        Self {
            version,
            compression: 0,
            records: Vec::new(),
            sprite_section: Vec::new(),
            trailer: Vec::new(),
        }
    }

    pub(crate) fn compression(mut self, compression: u8) -> Self {
        self.compression = compression;
        self
    }

    pub(crate) fn record(mut self, record: SpriteRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Append `count` recolour sprites whose first byte is their position
    pub(crate) fn recolours(mut self, count: usize) -> Self {
        for i in 0..count {
            let mut data = vec![0u8; 257];
            data[0] = i as u8;
            data[1] = (i >> 8) as u8;
            self.records.push(SpriteRecord::Recolour(data));
        }
        self
    }

    pub(crate) fn sprite_section_entry(mut self, id: u32, data: Vec<u8>) -> Self {
        self.sprite_section.push((id, data));
        self
    }

    /// Bytes appended after the end-of-data marker (v1) or sprite section (v2)
    pub(crate) fn trailer(mut self, bytes: &[u8]) -> Self {
        self.trailer.extend_from_slice(bytes);
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for record in &self.records {
            record.encode(self.version, &mut data);
        }
        write_size(self.version, 0, &mut data);

        let mut out = Vec::new();
        if self.version >= CONTAINER_V2 {
            out.extend_from_slice(&[0, 0]);
            out.extend_from_slice(&GRF_CONT_V2_SIG);
            let data_offset = 1 + data.len() as u32;
            out.extend_from_slice(&data_offset.to_le_bytes());
            out.push(self.compression);
            out.extend_from_slice(&data);
            for (id, entry) in &self.sprite_section {
                out.extend_from_slice(&id.to_le_bytes());
                out.extend_from_slice(&(entry.len() as u32).to_le_bytes());
                out.extend_from_slice(entry);
            }
            out.extend_from_slice(&0u32.to_le_bytes());
        } else {
            out.extend_from_slice(&data);
        }
        out.extend_from_slice(&self.trailer);
        out
    }

    pub(crate) fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}
