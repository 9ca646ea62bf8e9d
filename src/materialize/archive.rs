//! Archive format detection and extraction.
//!
//! The materializer only knows the [`Unpacker`] interface: "which format is
//! this content" and "extract this stream into that directory". The bundled
//! [`ArchiveUnpacker`] implements it for zip and for tar with the usual
//! compression wrappers. It trusts the file name first and falls back to the
//! leading bytes of the content when the name carries no known suffix.

use crate::error::UnpackError;

use std::fmt;
use std::io::{self, Read, Seek};
use std::path::Path;
use tracing::debug;

/// A readable, seekable byte source.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Compression wrapped around a tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TarCompression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Lz4,
    Snappy,
}

impl TarCompression {
    /// Wraps `reader` in the matching decompressor.
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Self::None => Box::new(reader),
            Self::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Self::Lz4 => Box::new(lz4_flex::frame::FrameDecoder::new(reader)),
            Self::Snappy => Box::new(snap::read::FrameDecoder::new(reader)),
        }
    }
}

/// Archive formats understood by [`ArchiveUnpacker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar(TarCompression),
}

/// File name suffixes and the formats they select. Longer suffixes come first.
const SUFFIXES: &[(&str, ArchiveFormat)] = &[
    (".tar.gz", ArchiveFormat::Tar(TarCompression::Gzip)),
    (".tgz", ArchiveFormat::Tar(TarCompression::Gzip)),
    (".tar.bz2", ArchiveFormat::Tar(TarCompression::Bzip2)),
    (".tbz2", ArchiveFormat::Tar(TarCompression::Bzip2)),
    (".tar.xz", ArchiveFormat::Tar(TarCompression::Xz)),
    (".txz", ArchiveFormat::Tar(TarCompression::Xz)),
    (".tar.lz4", ArchiveFormat::Tar(TarCompression::Lz4)),
    (".tlz4", ArchiveFormat::Tar(TarCompression::Lz4)),
    (".tar.sz", ArchiveFormat::Tar(TarCompression::Snappy)),
    (".tsz", ArchiveFormat::Tar(TarCompression::Snappy)),
    (".tar", ArchiveFormat::Tar(TarCompression::None)),
    (".zip", ArchiveFormat::Zip),
];

impl ArchiveFormat {
    /// Detects the format from a file name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix))
            .map(|(_, format)| *format)
    }

    /// Detects the format from the leading bytes of the content.
    ///
    /// Compressed streams are assumed to hold a tarball. Plain tar is only
    /// recognized when at least [`SNIFF_LEN`] bytes are given.
    pub fn from_magic(data: &[u8]) -> Option<Self> {
        match data {
            [0x50, 0x4B, 0x03, 0x04, ..] => Some(ArchiveFormat::Zip),
            [0x1F, 0x8B, ..] => Some(ArchiveFormat::Tar(TarCompression::Gzip)),
            [b'B', b'Z', b'h', ..] => Some(ArchiveFormat::Tar(TarCompression::Bzip2)),
            [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => Some(ArchiveFormat::Tar(TarCompression::Xz)),
            [0x04, 0x22, 0x4D, 0x18, ..] => Some(ArchiveFormat::Tar(TarCompression::Lz4)),
            [0xFF, 0x06, 0x00, 0x00, b's', b'N', b'a', b'P', b'p', b'Y', ..] => {
                Some(ArchiveFormat::Tar(TarCompression::Snappy))
            }
            _ if is_tar_header(data) => Some(ArchiveFormat::Tar(TarCompression::None)),
            _ => None,
        }
    }

    /// Reads the leading bytes of `source` and detects the format from them.
    ///
    /// The read position is restored to the start afterwards.
    pub fn sniff(source: &mut dyn ReadSeek) -> io::Result<Option<Self>> {
        source.rewind()?;
        let mut head = Vec::with_capacity(SNIFF_LEN);
        (&mut *source).take(SNIFF_LEN as u64).read_to_end(&mut head)?;
        source.rewind()?;
        Ok(Self::from_magic(&head))
    }
}

/// Number of leading bytes inspected by [`ArchiveFormat::sniff`].
pub const SNIFF_LEN: usize = 512;

/// POSIX and GNU tar headers both carry `ustar` at offset 257.
fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= SNIFF_LEN && data[257..262] == *b"ustar"
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Tar(TarCompression::None) => "tar",
            ArchiveFormat::Tar(TarCompression::Gzip) => "tar.gz",
            ArchiveFormat::Tar(TarCompression::Bzip2) => "tar.bz2",
            ArchiveFormat::Tar(TarCompression::Xz) => "tar.xz",
            ArchiveFormat::Tar(TarCompression::Lz4) => "tar.lz4",
            ArchiveFormat::Tar(TarCompression::Snappy) => "tar.sz",
        };
        f.write_str(name)
    }
}

/// Capability to recognize and extract archives.
pub trait Unpacker: Send + Sync {
    /// Returns the format of the content named `name`, or `None` if it is not
    /// supported. Implementations may read from `source` but must leave it
    /// rewound.
    fn detect(&self, name: &str, source: &mut dyn ReadSeek) -> io::Result<Option<ArchiveFormat>>;

    /// Extracts the whole of `source` into `destination`, which already exists.
    fn extract(
        &self,
        format: ArchiveFormat,
        source: &mut dyn ReadSeek,
        destination: &Path,
    ) -> Result<(), UnpackError>;
}

/// Default [`Unpacker`] backed by the `zip` and `tar` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveUnpacker;

impl Unpacker for ArchiveUnpacker {
    fn detect(&self, name: &str, source: &mut dyn ReadSeek) -> io::Result<Option<ArchiveFormat>> {
        match ArchiveFormat::from_name(name) {
            Some(format) => Ok(Some(format)),
            None => {
                let sniffed = ArchiveFormat::sniff(source)?;
                if let Some(format) = sniffed {
                    debug!("Detected {} archive from the content of {:?}", format, name);
                }
                Ok(sniffed)
            }
        }
    }

    fn extract(
        &self,
        format: ArchiveFormat,
        source: &mut dyn ReadSeek,
        destination: &Path,
    ) -> Result<(), UnpackError> {
        let failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            UnpackError::ExtractionFailed { format, source }
        };

        debug!("Extracting {} archive into {:?}", format, destination);
        match format {
            ArchiveFormat::Zip => {
                let mut archive = zip::ZipArchive::new(source).map_err(|e| failed(e.into()))?;
                archive.extract(destination).map_err(|e| failed(e.into()))
            }
            ArchiveFormat::Tar(compression) => {
                let mut archive = tar::Archive::new(compression.decoder(source));
                archive.unpack(destination).map_err(|e| failed(e.into()))
            }
        }
    }
}
