//! Materialization of verified content.
//!
//! Once the pipeline has checked the digest, the [`Materializer`] either copies
//! the bytes verbatim to a file ([`Materializer::store`]) or hands them to an
//! [`Unpacker`] which extracts them into a directory ([`Materializer::unpack`]).
//! Both operations rewind their source first, so they can follow a hashing pass
//! over the same stream.
//!
//! # Examples
//!
//! ```rust
//! use fetchurl::materialize::Materializer;
//! use std::io::Cursor;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let destination = dir.path().join("out");
//!
//! let materializer = Materializer::default();
//! materializer.store(&mut Cursor::new(b"hello"), &destination)?;
//! assert_eq!(std::fs::read(&destination)?, b"hello");
//! # Ok(())
//! # }
//! ```

pub mod archive;

pub use archive::{ArchiveFormat, ArchiveUnpacker, ReadSeek, TarCompression, Unpacker};

use crate::error::UnpackError;

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Writes verified content to its destination.
#[derive(Clone)]
pub struct Materializer {
    unpacker: Arc<dyn Unpacker>,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(ArchiveUnpacker)
    }
}

impl fmt::Debug for Materializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Materializer").finish_non_exhaustive()
    }
}

impl Materializer {
    /// Creates a materializer that extracts archives with `unpacker`.
    pub fn new(unpacker: impl Unpacker + 'static) -> Self {
        Self {
            unpacker: Arc::new(unpacker),
        }
    }

    /// Copies the full content of `source` to the file at `destination`.
    ///
    /// Missing parent directories are created and an existing file is
    /// truncated. Returns the number of bytes written.
    pub fn store<R: Read + Seek>(&self, source: &mut R, destination: &Path) -> io::Result<u64> {
        source.rewind()?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                debug!("Creating destination directory {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }

        debug!("Creating destination file {:?}", destination);
        let mut file = File::create(destination)?;
        let written = io::copy(source, &mut file)?;
        file.flush()?;

        Ok(written)
    }

    /// Extracts `source` into the directory `destination`.
    ///
    /// The format is picked from `name`, or from the leading bytes of
    /// `source` when the unpacker supports that. When no supported format matches,
    /// [`UnpackError::UnsupportedFormat`] is returned before the destination
    /// is touched.
    pub fn unpack<R: Read + Seek>(
        &self,
        source: &mut R,
        name: &str,
        destination: &Path,
    ) -> Result<ArchiveFormat, UnpackError> {
        source.rewind()?;
        let format = self
            .unpacker
            .detect(name, source)?
            .ok_or_else(|| UnpackError::UnsupportedFormat {
                name: name.to_string(),
            })?;

        source.rewind()?;

        debug!("Creating destination directory {:?}", destination);
        fs::create_dir_all(destination)?;

        self.unpacker.extract(format, source, destination)?;
        Ok(format)
    }
}
