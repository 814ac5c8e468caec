// basegfx/src/grf/fio.rs
// File access for containers - search paths, slot pool and byte stream

use log::{debug, trace};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::exceptions::{GfxError, Result};

/// Number of file slots available to sprite loading
pub const MAX_FILE_SLOTS: usize = 128;

/// First slot used for graphics files (lower slots are config and sound)
pub const FIRST_GRF_SLOT: usize = 2;

/// Ordered list of directories that logical file names are resolved against
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolve a logical name to the first existing file
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_absolute() {
            return direct.is_file().then(|| direct.to_path_buf());
        }

        for dir in &self.dirs {
            let candidate = dir.join(name);
            if candidate.is_file() {
                trace!("📂 Resolved '{}' to {:?}", name, candidate);
                return Some(candidate);
            }
        }
        trace!("📂 '{}' not found in {} search paths", name, self.dirs.len());
        None
    }

    /// Open a logical name, returning the file and its size
    pub fn open(&self, name: &str) -> Option<(File, u64)> {
        let path = self.locate(name)?;
        let file = File::open(&path).ok()?;
        let size = file.metadata().ok()?.len();
        Some((file, size))
    }
}

/// Byte stream over a container with the little-endian primitives the
/// parser needs. End-of-stream inside a read is reported as corruption of
/// the named file.
#[derive(Debug)]
pub struct GrfStream<R> {
    inner: R,
    name: String,
}

/// Stream over an opened file
pub type FileStream = GrfStream<BufReader<File>>;

impl<R: Read + Seek> GrfStream<R> {
    pub fn new(inner: R, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pos(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek_to(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn map_eof(&self, err: io::Error) -> GfxError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            GfxError::Corrupt(self.name.clone())
        } else {
            GfxError::IoError(err)
        }
    }

    pub fn read_block(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf).map_err(|e| self.map_eof(e))
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_block(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_word(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_block(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_dword(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_block(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Skip `count` bytes, failing if the stream ends first
    pub fn skip(&mut self, count: u64) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(count), &mut io::sink())?;
        if skipped != count {
            return Err(GfxError::Corrupt(self.name.clone()));
        }
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// What a file slot refers to
#[derive(Debug, Clone)]
pub struct SlotInfo {
    pub name: String,
    pub path: PathBuf,
}

/// Bounded pool of numbered file slots.
///
/// A slot remembers which file it was last opened with so sprite entries
/// can refer back to their origin by slot number. The handle returned by
/// [`FilePool::open`] is owned by the caller and closed when dropped.
#[derive(Debug)]
pub struct FilePool {
    search: SearchPaths,
    slots: Vec<Option<SlotInfo>>,
}

impl FilePool {
    pub fn new(search: SearchPaths) -> Self {
        Self {
            search,
            slots: vec![None; MAX_FILE_SLOTS],
        }
    }

    pub fn search(&self) -> &SearchPaths {
        &self.search
    }

    /// Open `name` into `slot`, replacing whatever the slot referred to
    pub fn open(&mut self, slot: usize, name: &str) -> Result<FileStream> {
        if slot >= MAX_FILE_SLOTS {
            return Err(GfxError::InvalidSlot(slot));
        }
        let path = self
            .search
            .locate(name)
            .ok_or_else(|| GfxError::FileNotFound(name.to_string()))?;
        let file = File::open(&path)?;
        debug!("📂 Slot {} -> {}", slot, path.display());

        self.slots[slot] = Some(SlotInfo {
            name: name.to_string(),
            path,
        });
        Ok(GrfStream::new(BufReader::new(file), name))
    }

    /// Open the file a slot was last used for
    pub fn reopen(&self, slot: usize) -> Result<FileStream> {
        let info = self
            .slot(slot)
            .ok_or(GfxError::InvalidSlot(slot))?;
        let file = File::open(&info.path)?;
        Ok(GrfStream::new(BufReader::new(file), info.name.clone()))
    }

    pub fn slot(&self, slot: usize) -> Option<&SlotInfo> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn slot_name(&self, slot: usize) -> Option<&str> {
        self.slot(slot).map(|info| info.name.as_str())
    }

    /// Forget every slot assignment
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}


// 🖼️📂🔢🎨
