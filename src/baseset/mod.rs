//! Base media sets: the graphics and sound files a game needs, with the
//! digests they are expected to have

pub mod descriptor;
pub mod report;

pub use descriptor::{FileDescriptor, SetCatalog, SetDescriptor};
pub use report::{IncompletenessReport, ReportEntry};

use log::{debug, info};
use std::fmt;
use std::io::{Seek, SeekFrom};
use std::marker::PhantomData;

use crate::checksums::{ChecksumResult, Md5Digest, check_md5};
use crate::exceptions::{GfxError, Result};
use crate::grf::{SearchPaths, data_section_size};
use crate::host::DisplayHooks;

/// Closed set of file roles for one kind of media set
pub trait FileRole: Copy + Eq + fmt::Debug + 'static {
    /// Every role, in storage order
    const ALL: &'static [Self];

    /// Name used for this role in set descriptors
    fn name(self) -> &'static str;

    /// Position of this role in [`FileRole::ALL`]
    fn index(self) -> usize;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|role| role.name() == name)
    }
}

/// Files of a graphics set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphicsRole {
    Base,
    Logos,
    Arctic,
    Tropical,
    Toyland,
    Extra,
}

impl FileRole for GraphicsRole {
    const ALL: &'static [Self] = &[
        GraphicsRole::Base,
        GraphicsRole::Logos,
        GraphicsRole::Arctic,
        GraphicsRole::Tropical,
        GraphicsRole::Toyland,
        GraphicsRole::Extra,
    ];

    fn name(self) -> &'static str {
        match self {
            GraphicsRole::Base => "base",
            GraphicsRole::Logos => "logos",
            GraphicsRole::Arctic => "arctic",
            GraphicsRole::Tropical => "tropical",
            GraphicsRole::Toyland => "toyland",
            GraphicsRole::Extra => "extra",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Files of a sounds set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundRole {
    Samples,
}

impl FileRole for SoundRole {
    const ALL: &'static [Self] = &[SoundRole::Samples];

    fn name(self) -> &'static str {
        "samples"
    }

    fn index(self) -> usize {
        0
    }
}

/// A file belonging to a set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceFile {
    /// Logical name, resolved through the search paths
    pub filename: String,
    pub hash: Md5Digest,
    /// Hint shown to the user when the file is missing or corrupt
    pub missing_warning: String,
}

impl ResourceFile {
    /// Hash the whole file and compare against the expected digest
    pub fn check_md5(&self, search: &SearchPaths) -> ChecksumResult {
        let Some((file, size)) = search.open(&self.filename) else {
            return ChecksumResult::NoFile;
        };
        if check_md5(file, &self.hash, size) {
            ChecksumResult::Match
        } else {
            ChecksumResult::Mismatch
        }
    }
}

/// One file per role, every role present
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileMap<R: FileRole> {
    files: Vec<ResourceFile>,
    _role: PhantomData<R>,
}

impl<R: FileRole> FileMap<R> {
    /// Build the map, failing on a missing or repeated role
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (R, ResourceFile)>,
    {
        let mut slots: Vec<Option<ResourceFile>> = vec![None; R::ALL.len()];
        for (role, file) in entries {
            if slots[role.index()].replace(file).is_some() {
                return Err(GfxError::Config(format!(
                    "file role '{}' given more than once",
                    role.name()
                )));
            }
        }

        let files = R::ALL
            .iter()
            .zip(slots)
            .map(|(role, file)| {
                file.ok_or_else(|| {
                    GfxError::Config(format!("no file given for role '{}'", role.name()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            files,
            _role: PhantomData,
        })
    }

    pub fn get(&self, role: R) -> &ResourceFile {
        &self.files[role.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (R, &ResourceFile)> {
        R::ALL.iter().copied().zip(self.files.iter())
    }
}

impl<R: FileRole> std::ops::Index<R> for FileMap<R> {
    type Output = ResourceFile;

    fn index(&self, role: R) -> &ResourceFile {
        self.get(role)
    }
}

/// Named bundle of required files
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceSet<R: FileRole> {
    pub name: String,
    pub description: String,
    pub version: u32,
    pub files: FileMap<R>,
}

/// Palette convention the set's art was drawn for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Dos,
    Windows,
}

impl Palette {
    /// "D..." or "d..." is DOS, anything else Windows
    pub fn from_metadata(value: &str) -> Self {
        match value.chars().next() {
            Some('D') | Some('d') => Palette::Dos,
            _ => Palette::Windows,
        }
    }
}

/// Blitter depth a graphics set prefers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlitterDepth {
    #[default]
    Bpp8,
    Bpp32,
}

impl BlitterDepth {
    /// "3..." is 32bpp, anything else 8bpp
    pub fn from_metadata(value: Option<&str>) -> Self {
        match value.and_then(|v| v.chars().next()) {
            Some('3') => BlitterDepth::Bpp32,
            _ => BlitterDepth::Bpp8,
        }
    }
}

/// Common behaviour of graphics and sounds sets
pub trait MediaSet {
    type Role: FileRole;

    /// Word used for this kind of set in log lines and errors
    const SET_TYPE: &'static str;

    /// Word used for this kind of set in the incompleteness message
    const MESSAGE_NAME: &'static str;

    fn resources(&self) -> &ResourceSet<Self::Role>;

    fn name(&self) -> &str {
        &self.resources().name
    }

    /// Verify one file of this kind of set
    fn check_file(file: &ResourceFile, search: &SearchPaths) -> ChecksumResult {
        file.check_md5(search)
    }

    /// Verify every file independently
    fn check_files(&self, search: &SearchPaths) -> Vec<(Self::Role, ChecksumResult)> {
        self.resources()
            .files
            .iter()
            .map(|(role, file)| (role, Self::check_file(file, search)))
            .collect()
    }

    fn num_invalid(&self, search: &SearchPaths) -> usize {
        self.check_files(search)
            .iter()
            .filter(|(_, result)| *result != ChecksumResult::Match)
            .count()
    }
}

/// Base graphics set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphicsSet {
    pub resources: ResourceSet<GraphicsRole>,
    pub palette: Palette,
    pub blitter: BlitterDepth,
}

impl GraphicsSet {
    pub fn file(&self, role: GraphicsRole) -> &ResourceFile {
        &self.resources.files[role]
    }
}

impl MediaSet for GraphicsSet {
    type Role = GraphicsRole;

    const SET_TYPE: &'static str = "graphics";
    const MESSAGE_NAME: &'static str = "graphics";

    fn resources(&self) -> &ResourceSet<GraphicsRole> {
        &self.resources
    }

    /// Containers are only hashed up to the end of their data section so
    /// that trailing sprite data does not affect the digest.
    fn check_file(file: &ResourceFile, search: &SearchPaths) -> ChecksumResult {
        let Some((mut f, size)) = search.open(&file.filename) else {
            return ChecksumResult::NoFile;
        };

        let bound = match data_section_size(&mut f) {
            Some(data_size) => size.min(data_size),
            None => size,
        };
        if f.seek(SeekFrom::Start(0)).is_err() {
            return ChecksumResult::Mismatch;
        }

        if check_md5(f, &file.hash, bound) {
            ChecksumResult::Match
        } else {
            ChecksumResult::Mismatch
        }
    }
}

/// Base sounds set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoundsSet {
    pub resources: ResourceSet<SoundRole>,
}

impl MediaSet for SoundsSet {
    type Role = SoundRole;

    const SET_TYPE: &'static str = "sounds";
    const MESSAGE_NAME: &'static str = "sound";

    fn resources(&self) -> &ResourceSet<SoundRole> {
        &self.resources
    }
}

/// Registry of configured sets of one kind, with at most one in use
#[derive(Debug)]
pub struct BaseMedia<S> {
    sets: Vec<S>,
    used: Option<usize>,
    report: Option<IncompletenessReport>,
}

impl<S> Default for BaseMedia<S> {
    fn default() -> Self {
        Self {
            sets: Vec::new(),
            used: None,
            report: None,
        }
    }
}

impl<S: MediaSet> BaseMedia<S> {
    pub fn new(sets: Vec<S>) -> Self {
        Self {
            sets,
            ..Self::default()
        }
    }

    pub fn add(&mut self, set: S) {
        self.sets.push(set);
    }

    pub fn sets(&self) -> &[S] {
        &self.sets
    }

    pub fn find(&self, name: &str) -> Option<&S> {
        self.sets.iter().find(|s| s.name() == name)
    }

    pub fn used_set(&self) -> Option<&S> {
        self.used.map(|i| &self.sets[i])
    }

    /// Report produced by the last successful [`BaseMedia::set_set`]
    pub fn report(&self) -> Option<&IncompletenessReport> {
        self.report.as_ref()
    }

    /// First set whose files all verify, else the first set
    fn best_set(&self, search: &SearchPaths) -> Option<usize> {
        if self.sets.is_empty() {
            return None;
        }
        let complete = self
            .sets
            .iter()
            .position(|set| set.num_invalid(search) == 0);
        Some(complete.unwrap_or(0))
    }

    /// Select the set to use. An empty name picks the best available set.
    ///
    /// Every file of the selected set is verified; when any is corrupt or
    /// missing the user gets one message listing them, but the set stays
    /// selected. Returns false when no set by that name exists.
    pub fn set_set(
        &mut self,
        name: &str,
        search: &SearchPaths,
        hooks: &mut dyn DisplayHooks,
    ) -> bool {
        self.select(name, search, hooks).is_some()
    }

    /// [`BaseMedia::set_set`], handing back the verification report of the
    /// selected set
    pub fn select(
        &mut self,
        name: &str,
        search: &SearchPaths,
        hooks: &mut dyn DisplayHooks,
    ) -> Option<&IncompletenessReport> {
        let index = if name.is_empty() {
            self.best_set(search)
        } else {
            self.sets.iter().position(|s| s.name() == name)
        };
        let Some(index) = index else {
            debug!(target: "grf", "No {} set named '{}'", S::SET_TYPE, name);
            return None;
        };

        self.used = Some(index);
        let set = &self.sets[index];
        info!(target: "grf", "Using the {} base {} set", set.name(), S::SET_TYPE);

        let report = IncompletenessReport::check(set, search);
        if let Some(message) = report.message() {
            hooks.show_info(&message);
        }
        Some(&*self.report.insert(report))
    }
}
