//! Temporary storage for downloaded bytes.
//!
//! A [`TemporaryArtifact`] is an anonymous file owned by exactly one pipeline
//! run. It is written once by the fetcher and read twice afterwards: once to
//! hash it and once to copy or unpack it. Both readers share the same position,
//! so callers must [`rewind`](TemporaryArtifact::rewind) before each pass.
//!
//! The backing file is removed either by [`release`](TemporaryArtifact::release),
//! which reports deletion failures, or silently when the artifact is dropped.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

const PREFIX: &str = "fetchurl-";

/// Exclusively owned handle to downloaded bytes on local storage.
#[derive(Debug)]
pub struct TemporaryArtifact {
    file: NamedTempFile,
    name: String,
}

impl TemporaryArtifact {
    /// Allocates an empty artifact in the system temporary directory.
    ///
    /// `name` is the file name the content had at its origin; it is only used
    /// as a hint to detect the archive format.
    pub fn allocate(name: impl Into<String>) -> io::Result<Self> {
        Self::allocate_in(None, name)
    }

    /// Allocates an empty artifact in `dir`, or in the system temporary
    /// directory when `dir` is `None`.
    pub fn allocate_in(dir: Option<&Path>, name: impl Into<String>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX);
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        debug!("Allocated temporary file {:?}", file.path());

        Ok(Self {
            file,
            name: name.into(),
        })
    }

    /// The original file name of the content.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of bytes currently stored.
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.as_file().metadata()?.len())
    }

    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Moves the shared read position back to the first byte.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Opens a second, independently positioned handle for writing.
    pub fn writer(&self) -> io::Result<File> {
        self.file.reopen()
    }

    /// Deletes the backing file.
    pub fn release(self) -> io::Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        debug!("Removed temporary file {:?}", path);
        Ok(())
    }
}

impl Read for TemporaryArtifact {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for TemporaryArtifact {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
