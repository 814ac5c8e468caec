//! Extension files loaded on top of the base set
//!
//! Only the configuration list and the loading seam live here. Processing
//! extension actions is the host's business: it plugs in through
//! [`ExtensionPipeline`]. [`DirectSpriteLoader`] is the fallback pipeline
//! that appends each file's sprites unchanged.

use log::{debug, info, warn};

use crate::baseset::Palette;
use crate::exceptions::Result;
use crate::grf::SearchPaths;
use crate::sprites::SpriteCache;

/// Lifecycle state of an extension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExtensionStatus {
    /// Details not read yet
    #[default]
    Unknown,
    /// Turned off by the user or by another extension
    Disabled,
    /// The file could not be found
    NotFound,
    /// Found, but not active in the current game
    Inactive,
    Activated,
}

/// Configuration of one extension file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionConfig {
    pub filename: String,
    /// Palette the file was drawn for, if known
    pub palette: Option<Palette>,
    /// Content needs a 32bpp blitter
    pub wants_32bpp: bool,
    /// Only runs during initialisation; its content is never shown
    pub init_only: bool,
    pub status: ExtensionStatus,
}

impl ExtensionConfig {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            palette: None,
            wants_32bpp: false,
            init_only: false,
            status: ExtensionStatus::Unknown,
        }
    }

    /// Whether this extension's content requirements affect blitter choice
    pub fn affects_blitter(&self) -> bool {
        !self.init_only
            && !matches!(
                self.status,
                ExtensionStatus::Disabled | ExtensionStatus::NotFound
            )
    }

    /// Sprites drawn for the Windows palette are remapped at load time
    pub fn needs_palette_remap(&self) -> bool {
        self.palette == Some(Palette::Windows)
    }
}

/// The user-visible, ordered extension configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtensionList {
    configs: Vec<ExtensionConfig>,
}

impl ExtensionList {
    pub fn new(configs: Vec<ExtensionConfig>) -> Self {
        Self { configs }
    }

    pub fn push(&mut self, config: ExtensionConfig) {
        self.configs.push(config);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtensionConfig> {
        self.configs.iter()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// True when any extension that counts for blitter choice declares
    /// 32bpp content
    pub fn wants_32bpp(&self) -> bool {
        self.configs
            .iter()
            .any(|c| c.affects_blitter() && c.wants_32bpp)
    }
}

/// Loads extension files into the sprite table
pub trait ExtensionPipeline {
    /// Read the file's own metadata into `config`. May override any field,
    /// the palette included.
    fn fill_details(&mut self, config: &mut ExtensionConfig, search: &SearchPaths);

    /// Load every extension of `chain` in order, starting at sprite index
    /// `first_sprite` and file slot `first_slot`. Returns the number of
    /// sprites loaded.
    fn load(
        &mut self,
        chain: &[&ExtensionConfig],
        cache: &mut SpriteCache,
        first_sprite: u32,
        first_slot: usize,
    ) -> Result<u32>;
}

/// Pipeline that appends each extension's sprites without interpreting them
#[derive(Debug, Default)]
pub struct DirectSpriteLoader;

impl ExtensionPipeline for DirectSpriteLoader {
    fn fill_details(&mut self, config: &mut ExtensionConfig, search: &SearchPaths) {
        config.status = match search.locate(&config.filename) {
            Some(path) => {
                debug!("Found extension {} at {:?}", config.filename, path);
                ExtensionStatus::Inactive
            }
            None => ExtensionStatus::NotFound,
        };
    }

    fn load(
        &mut self,
        chain: &[&ExtensionConfig],
        cache: &mut SpriteCache,
        first_sprite: u32,
        first_slot: usize,
    ) -> Result<u32> {
        let mut index = first_sprite;
        let mut slot = first_slot;

        for config in chain {
            match config.status {
                ExtensionStatus::Disabled => continue,
                ExtensionStatus::NotFound => {
                    warn!("⚠️ Extension {} not found, skipping", config.filename);
                    continue;
                }
                _ => {}
            }

            cache.set_palette_remap(slot, config.needs_palette_remap())?;
            let count = cache.load_grf_file(&config.filename, index, slot)?;
            info!(
                "🧩 Loaded {} sprites of {} at {} (slot {})",
                count, config.filename, index, slot
            );
            index += count;
            slot += 1;
        }

        Ok(index - first_sprite)
    }
}

/// Extension built from the base set's `extra` file. It is loaded once ahead
/// of the visible list and never becomes part of it.
#[derive(Debug)]
pub struct InlineExtension {
    config: ExtensionConfig,
}

impl InlineExtension {
    /// Palette defaults to the base set's until the file says otherwise
    pub fn new(filename: impl Into<String>, set_palette: Palette) -> Self {
        let mut config = ExtensionConfig::new(filename);
        config.palette = Some(set_palette);
        Self { config }
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    pub fn fill_details(
        mut self,
        pipeline: &mut dyn ExtensionPipeline,
        search: &SearchPaths,
    ) -> Self {
        pipeline.fill_details(&mut self.config, search);
        self.config.init_only = false;
        self
    }

    /// Load this extension followed by `visible`, consuming the builder
    pub fn load(
        self,
        pipeline: &mut dyn ExtensionPipeline,
        visible: &ExtensionList,
        cache: &mut SpriteCache,
        first_sprite: u32,
        first_slot: usize,
    ) -> Result<u32> {
        let chain: Vec<&ExtensionConfig> =
            std::iter::once(&self.config).chain(visible.iter()).collect();
        pipeline.load(&chain, cache, first_sprite, first_slot)
    }
}
