//! High-level API for basegfx operations

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::baseset::{BaseMedia, IncompletenessReport, MediaSet, SetCatalog};
use crate::blitter::BlitterState;
use crate::exceptions::{GfxError, Result};
use crate::extension::{DirectSpriteLoader, ExtensionConfig, ExtensionPipeline};
use crate::gfxinit::{Gfx, GfxSettings, LoadSummary};
use crate::grf::SearchPaths;
use crate::host::{LogHooks, NullDriver};

/// Kind of set a catalog entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetKind {
    #[default]
    Graphics,
    Sounds,
}

/// Options for a full load pass
#[derive(Debug, Default)]
pub struct LoadOptions {
    /// Graphics set to use, empty for the best available
    pub set_name: String,
    pub settings: GfxSettings,
    /// Blitter to pin; `None` lets the loaded content decide
    pub blitter: Option<String>,
    /// Extension configuration, loaded after the base extension
    pub extensions: Vec<ExtensionConfig>,
}

/// Outcome of [`load_set`]
#[derive(Debug)]
pub struct LoadResult {
    pub set_name: String,
    pub summary: LoadSummary,
    /// Occupied sprite table entries
    pub sprites_loaded: usize,
    pub blitter: &'static str,
    pub report: Option<IncompletenessReport>,
}

fn select_and_check<S: MediaSet>(
    sets: Vec<S>,
    name: &str,
    search: &SearchPaths,
) -> Result<IncompletenessReport> {
    let mut media = BaseMedia::new(sets);
    match media.select(name, search, &mut LogHooks) {
        Some(report) => Ok(report.clone()),
        None => Err(GfxError::Config(format!(
            "no {} set named '{}'",
            S::SET_TYPE,
            name
        ))),
    }
}

/// Select a set from the catalog and verify every one of its files
pub fn verify_set(
    catalog_path: &Path,
    search_dirs: &[PathBuf],
    kind: SetKind,
    set_name: &str,
) -> Result<IncompletenessReport> {
    let catalog = SetCatalog::from_path(catalog_path)?;
    let search = SearchPaths::new(search_dirs);
    debug!("🔍 Verifying {:?} set '{}'", kind, set_name);

    match kind {
        SetKind::Graphics => select_and_check(catalog.graphics_sets()?, set_name, &search),
        SetKind::Sounds => select_and_check(catalog.sounds_sets()?, set_name, &search),
    }
}

/// Select a graphics set and run a complete sprite load with a headless
/// video driver
pub fn load_set(
    catalog_path: &Path,
    search_dirs: &[PathBuf],
    options: LoadOptions,
) -> Result<LoadResult> {
    let catalog = SetCatalog::from_path(catalog_path)?;
    let search = SearchPaths::new(search_dirs);
    let blitter = BlitterState::from_config(options.blitter.as_deref())?;

    let mut gfx = Gfx::new(search, options.settings, blitter);
    for set in catalog.graphics_sets()? {
        gfx.graphics_mut().add(set);
    }

    let mut hooks = LogHooks;
    let mut pipeline = DirectSpriteLoader;
    if !gfx.set_graphics_set(&options.set_name, &mut hooks) {
        return Err(GfxError::Config(format!(
            "no graphics set named '{}'",
            options.set_name
        )));
    }

    for mut config in options.extensions {
        pipeline.fill_details(&mut config, gfx.search());
        gfx.extensions_mut().push(config);
    }

    let summary = gfx.load_sprites(&mut NullDriver, &mut hooks, &mut pipeline)?;
    let result = LoadResult {
        set_name: gfx
            .graphics()
            .used_set()
            .map(|s| s.name().to_string())
            .unwrap_or_default(),
        summary,
        sprites_loaded: gfx.sprites().table().loaded(),
        blitter: gfx.active_blitter().name,
        report: gfx.graphics().report().cloned(),
    };
    info!(
        "✅ Loaded {} sprites from '{}' using {}",
        result.sprites_loaded, result.set_name, result.blitter
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseset::tests::digest_of;
    use crate::baseset::{FileRole, GraphicsRole};
    use crate::checksums::digest_to_hex;
    use crate::grf::testutil::ContainerBuilder;
    use tempfile::TempDir;

    /// Write one graphics set and one sounds set plus a catalog naming them
    fn install(dir: &TempDir) -> PathBuf {
        let mut files = Vec::new();
        for &role in GraphicsRole::ALL {
            let name = format!("{}.grf", role.name());
            let bytes = ContainerBuilder::v1().recolours(4).build();
            std::fs::write(dir.path().join(&name), &bytes).unwrap();
            files.push(format!(
                r#""{}": {{"name": "{}", "md5": "{}", "missing": "get it"}}"#,
                role.name(),
                name,
                digest_to_hex(&digest_of(&bytes))
            ));
        }
        std::fs::write(dir.path().join("sample.cat"), b"samples").unwrap();

        let catalog = format!(
            r#"{{
                "graphics": [{{"name": "orig", "palette": "DOS", "files": {{{}}}}}],
                "sounds": [{{"name": "orig_snd", "files": {{"samples": {{"name": "sample.cat", "md5": "{}"}}}}}}]
            }}"#,
            files.join(","),
            digest_to_hex(&digest_of(b"samples"))
        );
        let path = dir.path().join("sets.json");
        std::fs::write(&path, catalog).unwrap();
        path
    }

    #[test]
    fn test_verify_graphics_and_sounds() {
        let dir = TempDir::new().unwrap();
        let catalog = install(&dir);
        let dirs = vec![dir.path().to_path_buf()];

        let report = verify_set(&catalog, &dirs, SetKind::Graphics, "").unwrap();
        assert!(report.is_complete());
        assert_eq!(report.set_name(), "orig");

        std::fs::write(dir.path().join("sample.cat"), b"other").unwrap();
        let report = verify_set(&catalog, &dirs, SetKind::Sounds, "orig_snd").unwrap();
        assert!(!report.is_complete());
        let message = report.message().unwrap();
        assert!(message.starts_with("Trying to load sound set 'orig_snd', but it is incomplete."));
        assert!(message.contains("sample.cat is corrupt"));

        assert!(matches!(
            verify_set(&catalog, &dirs, SetKind::Graphics, "nope"),
            Err(GfxError::Config(_))
        ));
    }

    #[test]
    fn test_load_set_headless() {
        let dir = TempDir::new().unwrap();
        let catalog = install(&dir);
        let dirs = vec![dir.path().to_path_buf()];

        let result = load_set(&catalog, &dirs, LoadOptions::default()).unwrap();
        assert_eq!(result.set_name, "orig");
        assert_eq!(result.summary.base, 4);
        assert_eq!(result.sprites_loaded, 12);
        assert_eq!(result.blitter, "8bpp-optimized");
        assert!(result.report.unwrap().is_complete());
    }

    #[test]
    fn test_load_set_with_32bpp_extension_switches_blitter() {
        let dir = TempDir::new().unwrap();
        let catalog = install(&dir);
        ContainerBuilder::v1()
            .recolours(1)
            .write_to(&dir.path().join("hd.grf"));
        let mut hd = ExtensionConfig::new("hd.grf");
        hd.wants_32bpp = true;

        let options = LoadOptions {
            extensions: vec![hd],
            ..LoadOptions::default()
        };
        let result = load_set(&catalog, &[dir.path().to_path_buf()], options).unwrap();
        assert_eq!(result.blitter, "32bpp-anim");
        assert_eq!(result.summary.extensions, 5);
    }

    #[test]
    fn test_load_set_pinned_blitter() {
        let dir = TempDir::new().unwrap();
        let catalog = install(&dir);
        let options = LoadOptions {
            blitter: Some("32bpp-simple".into()),
            ..LoadOptions::default()
        };
        let result = load_set(&catalog, &[dir.path().to_path_buf()], options).unwrap();
        assert_eq!(result.blitter, "32bpp-simple");
    }
}
