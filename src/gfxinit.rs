//! Loading the base graphics into the sprite table and keeping the blitter
//! in line with what was loaded
//!
//! [`Gfx`] owns every piece of state involved: the set registries, the
//! sprite cache, the active blitter and the extension list. Callers hand in
//! the host side ([`VideoDriver`], [`DisplayHooks`], [`ExtensionPipeline`])
//! per call.

use log::{debug, info};

use crate::baseset::{BaseMedia, BlitterDepth, GraphicsRole, GraphicsSet, Palette, SoundsSet};
use crate::blitter::{BlitterInfo, BlitterRequirements, BlitterState, SwitchOutcome, switch_blitter};
use crate::exceptions::{GfxError, Result};
use crate::extension::{ExtensionList, ExtensionPipeline, InlineExtension};
use crate::grf::SearchPaths;
use crate::grf::fio::FIRST_GRF_SLOT;
use crate::host::{DisplayHooks, VideoDriver};
use crate::landscape::Landscape;
use crate::sprites::{MAX_SPRITES, SpriteCache};

/// Index of the first logo sprite
pub const LOGOS_SPRITE_BASE: u32 = 4793;

/// Index the base extension and user extensions are loaded from
pub const EXTENSION_SPRITE_BASE: u32 = 4896;

/// How well the video output handles 8bpp
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Support8bpp {
    /// No 8bpp output at all; everything needs a 32bpp blitter
    None,
    /// Emulated by the system
    #[default]
    System,
    Hardware,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GfxSettings {
    pub landscape: Landscape,
    pub full_animation: bool,
    pub support_8bpp: Support8bpp,
    pub sprite_capacity: u32,
}

impl Default for GfxSettings {
    fn default() -> Self {
        Self {
            landscape: Landscape::Temperate,
            full_animation: true,
            support_8bpp: Support8bpp::default(),
            sprite_capacity: MAX_SPRITES,
        }
    }
}

/// Sprites loaded per stage of [`Gfx::load_sprite_tables`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub base: u32,
    pub logos: u32,
    pub landscape: u32,
    pub extensions: u32,
}

impl LoadSummary {
    pub fn total(&self) -> u32 {
        self.base + self.logos + self.landscape + self.extensions
    }
}

pub struct Gfx {
    settings: GfxSettings,
    graphics: BaseMedia<GraphicsSet>,
    sounds: BaseMedia<SoundsSet>,
    cache: SpriteCache,
    blitter: BlitterState,
    extensions: ExtensionList,
}

impl std::fmt::Debug for Gfx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gfx")
            .field("landscape", &self.settings.landscape)
            .field("graphics_set", &self.graphics.used_set().map(|s| s.resources.name.as_str()))
            .field("blitter", &self.blitter.current().name)
            .field("sprites", self.cache.table())
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

impl Gfx {
    pub fn new(search: SearchPaths, settings: GfxSettings, blitter: BlitterState) -> Self {
        let cache = SpriteCache::new(search, settings.sprite_capacity);
        Self {
            settings,
            graphics: BaseMedia::default(),
            sounds: BaseMedia::default(),
            cache,
            blitter,
            extensions: ExtensionList::default(),
        }
    }

    pub fn settings(&self) -> &GfxSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GfxSettings {
        &mut self.settings
    }

    pub fn search(&self) -> &SearchPaths {
        self.cache.search()
    }

    pub fn graphics(&self) -> &BaseMedia<GraphicsSet> {
        &self.graphics
    }

    pub fn graphics_mut(&mut self) -> &mut BaseMedia<GraphicsSet> {
        &mut self.graphics
    }

    pub fn sounds(&self) -> &BaseMedia<SoundsSet> {
        &self.sounds
    }

    pub fn sounds_mut(&mut self) -> &mut BaseMedia<SoundsSet> {
        &mut self.sounds
    }

    /// Select the graphics set by name, empty for the best available
    pub fn set_graphics_set(&mut self, name: &str, hooks: &mut dyn DisplayHooks) -> bool {
        self.graphics.set_set(name, self.cache.search(), hooks)
    }

    /// Select the sounds set by name, empty for the best available
    pub fn set_sounds_set(&mut self, name: &str, hooks: &mut dyn DisplayHooks) -> bool {
        self.sounds.set_set(name, self.cache.search(), hooks)
    }

    pub fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }

    pub fn sprites(&self) -> &SpriteCache {
        &self.cache
    }

    pub fn active_blitter(&self) -> &'static BlitterInfo {
        self.blitter.current()
    }

    pub fn blitter_state(&self) -> &BlitterState {
        &self.blitter
    }

    fn used_set(&self) -> Result<&GraphicsSet> {
        self.graphics
            .used_set()
            .ok_or_else(|| GfxError::Config("no base graphics set selected".into()))
    }

    /// What the used set, the extensions and the settings ask of the blitter
    pub fn blitter_requirements(&self) -> Result<BlitterRequirements> {
        let base_wants_32bpp = self.used_set()?.blitter == BlitterDepth::Bpp32;
        let content_wants_32bpp =
            self.settings.support_8bpp == Support8bpp::None || self.extensions.wants_32bpp();
        Ok(BlitterRequirements {
            base_wants_32bpp,
            content_wants_32bpp,
            animation_wanted: self.settings.full_animation,
        })
    }

    fn switch_blitter(&mut self, driver: &mut dyn VideoDriver) -> Result<SwitchOutcome> {
        let req = self.blitter_requirements()?;
        switch_blitter(&mut self.blitter, &req, driver)
    }

    /// Load the used set's base, logo and climate sprites, then the base
    /// extension ahead of the configured extensions.
    ///
    /// Any file that cannot be opened or parsed aborts the whole load.
    pub fn load_sprite_tables(
        &mut self,
        hooks: &mut dyn DisplayHooks,
        pipeline: &mut dyn ExtensionPipeline,
    ) -> Result<LoadSummary> {
        let set = self.used_set()?.clone();
        let remap = set.palette != Palette::Dos;
        let mut summary = LoadSummary::default();
        let mut slot = FIRST_GRF_SLOT;

        self.cache.clear_palette_remap();

        self.cache.set_palette_remap(slot, remap)?;
        summary.base = self
            .cache
            .load_grf_file(&set.file(GraphicsRole::Base).filename, 0, slot)?;
        slot += 1;

        // Fewer logos than the region holds is fine; DOS sets ship fewer
        self.cache.set_palette_remap(slot, remap)?;
        summary.logos = self.cache.load_grf_file(
            &set.file(GraphicsRole::Logos).filename,
            LOGOS_SPRITE_BASE,
            slot,
        )?;
        slot += 1;

        if let Some((role, ranges)) = self.settings.landscape.replacement() {
            self.cache.set_palette_remap(slot, remap)?;
            summary.landscape =
                self.cache
                    .load_grf_file_indexed(&set.file(role).filename, ranges, slot)?;
            slot += 1;
        }

        hooks.init_unicode_glyph_map();

        let inline = InlineExtension::new(&set.file(GraphicsRole::Extra).filename, set.palette)
            .fill_details(pipeline, self.cache.search());
        summary.extensions = inline.load(
            pipeline,
            &self.extensions,
            &mut self.cache,
            EXTENSION_SPRITE_BASE,
            slot,
        )?;

        info!(
            target: "sprite",
            "🖼️ Loaded {} sprites from '{}' ({})",
            summary.total(),
            set.resources.name,
            self.settings.landscape
        );
        Ok(summary)
    }

    /// Full sprite (re)load: pick the blitter, reset the caches and load
    /// every table
    pub fn load_sprites(
        &mut self,
        driver: &mut dyn VideoDriver,
        hooks: &mut dyn DisplayHooks,
        pipeline: &mut dyn ExtensionPipeline,
    ) -> Result<LoadSummary> {
        debug!(target: "sprite", "Loading sprite set {}", self.settings.landscape);

        self.switch_blitter(driver)?;
        hooks.clear_font_cache();
        self.cache.init_sprite_mem();
        let summary = self.load_sprite_tables(hooks, pipeline)?;
        hooks.init_palettes();
        hooks.update_cursor_size();

        Ok(summary)
    }

    /// Re-evaluate the blitter after settings or extensions changed,
    /// rebuilding whatever depends on it when it moved
    pub fn check_blitter(
        &mut self,
        driver: &mut dyn VideoDriver,
        hooks: &mut dyn DisplayHooks,
    ) -> Result<SwitchOutcome> {
        let outcome = self.switch_blitter(driver)?;
        if outcome.changed() {
            hooks.clear_font_cache();
            hooks.clear_sprite_cache();
            hooks.reinit_all_windows();
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseset::tests::write_graphics_set_with;
    use crate::blitter::find_blitter;
    use crate::extension::{DirectSpriteLoader, ExtensionConfig, ExtensionStatus};
    use crate::grf::testutil::ContainerBuilder;
    use crate::landscape::{TOYLAND_SPRITE_RANGES, sprites_in};
    use crate::sprites::SpriteEntry;
    use tempfile::TempDir;

    const BASE_SPRITES: usize = 40;
    const LOGO_SPRITES: usize = 5;
    const EXTRA_SPRITES: usize = 7;

    #[derive(Default)]
    struct Hooks {
        calls: Vec<&'static str>,
        messages: Vec<String>,
    }

    impl DisplayHooks for Hooks {
        fn show_info(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
        fn clear_font_cache(&mut self) {
            self.calls.push("font");
        }
        fn clear_sprite_cache(&mut self) {
            self.calls.push("sprites");
        }
        fn reinit_all_windows(&mut self) {
            self.calls.push("windows");
        }
        fn init_palettes(&mut self) {
            self.calls.push("palettes");
        }
        fn update_cursor_size(&mut self) {
            self.calls.push("cursor");
        }
        fn init_unicode_glyph_map(&mut self) {
            self.calls.push("glyphs");
        }
    }

    struct Driver(bool);

    impl VideoDriver for Driver {
        fn after_blitter_change(&mut self, _blitter: &BlitterInfo) -> bool {
            self.0
        }
    }

    fn sprite_count(role: GraphicsRole) -> usize {
        match role {
            GraphicsRole::Base => BASE_SPRITES,
            GraphicsRole::Logos => LOGO_SPRITES,
            GraphicsRole::Extra => EXTRA_SPRITES,
            GraphicsRole::Arctic | GraphicsRole::Tropical | GraphicsRole::Toyland => {
                let (_, ranges) = match role {
                    GraphicsRole::Arctic => Landscape::Arctic,
                    GraphicsRole::Tropical => Landscape::Tropic,
                    _ => Landscape::Toyland,
                }
                .replacement()
                .unwrap();
                sprites_in(ranges) as usize
            }
        }
    }

    fn setup(landscape: Landscape, palette: Palette) -> (TempDir, Gfx) {
        let dir = TempDir::new().unwrap();
        let mut set = write_graphics_set_with(&dir, "orig", |role| {
            ContainerBuilder::v1().recolours(sprite_count(role)).build()
        });
        set.palette = palette;

        let settings = GfxSettings {
            landscape,
            ..GfxSettings::default()
        };
        let search = SearchPaths::new([dir.path()]);
        let mut gfx = Gfx::new(search, settings, BlitterState::from_config(None).unwrap());
        gfx.graphics_mut().add(set);
        assert!(gfx.set_graphics_set("orig", &mut Hooks::default()));
        (dir, gfx)
    }

    fn entry(gfx: &Gfx, index: u32) -> &SpriteEntry {
        gfx.sprites().table().get(index).unwrap()
    }

    #[test]
    fn test_temperate_load_order_and_slots() {
        let (_dir, mut gfx) = setup(Landscape::Temperate, Palette::Windows);
        let mut hooks = Hooks::default();
        let summary = gfx
            .load_sprite_tables(&mut hooks, &mut DirectSpriteLoader)
            .unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                base: BASE_SPRITES as u32,
                logos: LOGO_SPRITES as u32,
                landscape: 0,
                extensions: EXTRA_SPRITES as u32,
            }
        );
        assert_eq!(entry(&gfx, 0).file_slot, FIRST_GRF_SLOT);
        assert_eq!(entry(&gfx, LOGOS_SPRITE_BASE).file_slot, FIRST_GRF_SLOT + 1);
        assert_eq!(entry(&gfx, EXTENSION_SPRITE_BASE).file_slot, FIRST_GRF_SLOT + 2);
        assert!(entry(&gfx, 0).remap_palette);
        assert!(entry(&gfx, LOGOS_SPRITE_BASE).remap_palette);
        assert!(entry(&gfx, EXTENSION_SPRITE_BASE).remap_palette);
        assert!(gfx.sprites().table().get(LOGOS_SPRITE_BASE + LOGO_SPRITES as u32).is_none());
        assert_eq!(hooks.calls, vec!["glyphs"]);
        assert!(gfx.extensions().is_empty());
    }

    #[test]
    fn test_climate_overrides_base_sprites() {
        let (_dir, mut gfx) = setup(Landscape::Toyland, Palette::Dos);
        let summary = gfx
            .load_sprite_tables(&mut Hooks::default(), &mut DirectSpriteLoader)
            .unwrap();

        assert_eq!(summary.landscape, sprites_in(TOYLAND_SPRITE_RANGES));
        for range in TOYLAND_SPRITE_RANGES {
            for index in range.clone() {
                let e = entry(&gfx, index);
                assert_eq!(e.file_slot, FIRST_GRF_SLOT + 2);
                assert!(!e.remap_palette);
            }
        }
        assert_eq!(entry(&gfx, EXTENSION_SPRITE_BASE).file_slot, FIRST_GRF_SLOT + 3);
        let first = TOYLAND_SPRITE_RANGES[0].start();
        assert_eq!(entry(&gfx, *first).file_sprite_id, 0);
    }

    #[test]
    fn test_short_climate_file_aborts() {
        let (dir, mut gfx) = setup(Landscape::Arctic, Palette::Dos);
        ContainerBuilder::v1()
            .recolours(10)
            .write_to(&dir.path().join("orig_arctic.grf"));

        let err = gfx
            .load_sprite_tables(&mut Hooks::default(), &mut DirectSpriteLoader)
            .unwrap_err();
        assert!(matches!(err, GfxError::IndexedRangeTruncated { .. }));
    }

    #[test]
    fn test_missing_base_file_aborts() {
        let (dir, mut gfx) = setup(Landscape::Temperate, Palette::Dos);
        std::fs::remove_file(dir.path().join("orig_base.grf")).unwrap();
        assert!(matches!(
            gfx.load_sprite_tables(&mut Hooks::default(), &mut DirectSpriteLoader),
            Err(GfxError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_user_extensions_follow_base_extension() {
        let (dir, mut gfx) = setup(Landscape::Temperate, Palette::Dos);
        ContainerBuilder::v1()
            .recolours(2)
            .write_to(&dir.path().join("user.grf"));
        let mut user = ExtensionConfig::new("user.grf");
        user.status = ExtensionStatus::Activated;
        gfx.extensions_mut().push(user);

        let summary = gfx
            .load_sprite_tables(&mut Hooks::default(), &mut DirectSpriteLoader)
            .unwrap();
        assert_eq!(summary.extensions, EXTRA_SPRITES as u32 + 2);
        let user_start = EXTENSION_SPRITE_BASE + EXTRA_SPRITES as u32;
        assert_eq!(entry(&gfx, user_start).file_slot, FIRST_GRF_SLOT + 3);
        assert_eq!(gfx.extensions().len(), 1);
    }

    #[test]
    fn test_load_sprites_sequence() {
        let (_dir, mut gfx) = setup(Landscape::Temperate, Palette::Dos);
        let mut hooks = Hooks::default();
        gfx.load_sprites(&mut Driver(true), &mut hooks, &mut DirectSpriteLoader)
            .unwrap();
        assert_eq!(hooks.calls, vec!["font", "glyphs", "palettes", "cursor"]);

        // A reload starts from an empty table
        gfx.load_sprites(&mut Driver(true), &mut hooks, &mut DirectSpriteLoader)
            .unwrap();
        assert_eq!(
            gfx.sprites().table().loaded(),
            BASE_SPRITES + LOGO_SPRITES + EXTRA_SPRITES
        );
    }

    #[test]
    fn test_requirements_follow_content() {
        let (_dir, mut gfx) = setup(Landscape::Temperate, Palette::Dos);
        let req = gfx.blitter_requirements().unwrap();
        assert!(!req.base_wants_32bpp && !req.content_wants_32bpp && req.animation_wanted);

        let mut hd = ExtensionConfig::new("hd.grf");
        hd.wants_32bpp = true;
        gfx.extensions_mut().push(hd);
        assert!(gfx.blitter_requirements().unwrap().content_wants_32bpp);

        gfx.extensions_mut().push(ExtensionConfig::new("plain.grf"));
        gfx.settings_mut().support_8bpp = Support8bpp::None;
        assert!(gfx.blitter_requirements().unwrap().content_wants_32bpp);
    }

    #[test]
    fn test_check_blitter_rebuilds_on_change() {
        let (_dir, mut gfx) = setup(Landscape::Temperate, Palette::Dos);
        let mut hooks = Hooks::default();

        let outcome = gfx.check_blitter(&mut Driver(true), &mut hooks).unwrap();
        assert_eq!(outcome, SwitchOutcome::Unchanged);
        assert!(hooks.calls.is_empty());

        gfx.settings_mut().support_8bpp = Support8bpp::None;
        let outcome = gfx.check_blitter(&mut Driver(true), &mut hooks).unwrap();
        assert!(outcome.changed());
        assert_eq!(gfx.active_blitter().name, "32bpp-anim");
        assert_eq!(hooks.calls, vec!["font", "sprites", "windows"]);
    }

    #[test]
    fn test_check_blitter_respects_pinned_blitter() {
        let (_dir, mut gfx) = setup(Landscape::Temperate, Palette::Dos);
        gfx.blitter = BlitterState::new(find_blitter("8bpp-simple").unwrap(), false);
        gfx.settings_mut().support_8bpp = Support8bpp::None;

        let outcome = gfx.check_blitter(&mut Driver(false), &mut Hooks::default()).unwrap();
        assert_eq!(outcome, SwitchOutcome::Unchanged);
        assert_eq!(gfx.active_blitter().name, "8bpp-simple");
    }

    #[test]
    fn test_requires_selected_set() {
        let dir = TempDir::new().unwrap();
        let mut gfx = Gfx::new(
            SearchPaths::new([dir.path()]),
            GfxSettings::default(),
            BlitterState::from_config(None).unwrap(),
        );
        assert!(matches!(gfx.blitter_requirements(), Err(GfxError::Config(_))));
        assert!(
            gfx.load_sprite_tables(&mut Hooks::default(), &mut DirectSpriteLoader)
                .is_err()
        );
    }
}
