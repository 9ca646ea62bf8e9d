use fetchurl::{Pipeline, PipelineBuilder};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HELLO: &[u8] = b"hello";
pub const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Pipeline without progress output or proxies, allocating artifacts in `temp_dir`.
pub fn create_test_pipeline(temp_dir: &Path) -> Pipeline {
    PipelineBuilder::hidden()
        .system_proxy(false)
        .temp_dir(temp_dir)
        .build()
        .expect("Failed to build pipeline")
}

/// Lists the entries of a directory.
pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|entry| entry.unwrap().path())
        .collect()
}

/// Asserts that no temporary artifact was left behind in `dir`.
pub fn assert_dir_empty(dir: &Path) {
    let entries = dir_entries(dir);
    assert!(entries.is_empty(), "Leftover files in {:?}: {:?}", dir, entries);
}

/// Builds a gzip compressed tarball holding `entries`.
pub fn create_tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Builds a zip archive holding `entries`.
pub fn create_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (path, data) in entries {
        writer
            .start_file(*path, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// SHA-256 of `data` as lowercase hex.
pub fn sha256_of(data: &[u8]) -> String {
    fetchurl::digest::sha256_bytes(data)
}
