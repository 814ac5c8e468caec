//! JSON set descriptors

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{
    BlitterDepth, FileMap, FileRole, GraphicsRole, GraphicsSet, Palette, ResourceFile,
    ResourceSet, SoundRole, SoundsSet,
};
use crate::checksums::parse_digest;
use crate::exceptions::{GfxError, Result};

/// One file entry of a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub md5: String,
    #[serde(default)]
    pub missing: String,
}

/// Serialized form of a graphics or sounds set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blitter: Option<String>,
    pub files: BTreeMap<String, FileDescriptor>,
}

impl SetDescriptor {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn resources<R: FileRole>(&self) -> Result<ResourceSet<R>> {
        let mut entries = Vec::with_capacity(self.files.len());
        for (role_name, file) in &self.files {
            let role = R::from_name(role_name).ok_or_else(|| {
                GfxError::Config(format!(
                    "set '{}' has unknown file role '{}'",
                    self.name, role_name
                ))
            })?;
            let hash = parse_digest(&file.md5)
                .map_err(|e| GfxError::Config(format!("set '{}': {}", self.name, e)))?;
            entries.push((
                role,
                ResourceFile {
                    filename: file.name.clone(),
                    hash,
                    missing_warning: file.missing.clone(),
                },
            ));
        }

        let files = FileMap::from_entries(entries)
            .map_err(|e| GfxError::Config(format!("set '{}': {}", self.name, e)))?;
        Ok(ResourceSet {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version,
            files,
        })
    }

    pub fn to_graphics_set(&self) -> Result<GraphicsSet> {
        let palette = self.palette.as_deref().ok_or_else(|| {
            GfxError::Config(format!(
                "graphics set '{}' is missing metadata 'palette'",
                self.name
            ))
        })?;
        Ok(GraphicsSet {
            resources: self.resources::<GraphicsRole>()?,
            palette: Palette::from_metadata(palette),
            blitter: BlitterDepth::from_metadata(self.blitter.as_deref()),
        })
    }

    pub fn to_sounds_set(&self) -> Result<SoundsSet> {
        Ok(SoundsSet {
            resources: self.resources::<SoundRole>()?,
        })
    }
}

/// Every configured set, as read from a catalog file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCatalog {
    #[serde(default)]
    pub graphics: Vec<SetDescriptor>,
    #[serde(default)]
    pub sounds: Vec<SetDescriptor>,
}

impl SetCatalog {
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("📖 Reading set catalog {:?}", path);
        let content = std::fs::read_to_string(path)
            .map_err(|e| GfxError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn graphics_sets(&self) -> Result<Vec<GraphicsSet>> {
        self.graphics.iter().map(SetDescriptor::to_graphics_set).collect()
    }

    pub fn sounds_sets(&self) -> Result<Vec<SoundsSet>> {
        self.sounds.iter().map(SetDescriptor::to_sounds_set).collect()
    }
}
