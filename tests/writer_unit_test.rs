//! Unit tests for the fixture output writer

use flate2::read::GzDecoder;
use infomark_tools::writer::{Compression, OutputWriter};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_compression_from_path() {
    assert_eq!(Compression::from_path(Path::new("seed.sql")), Compression::None);
    assert_eq!(Compression::from_path(Path::new("seed.sql.gz")), Compression::Gzip);
    assert_eq!(Compression::from_path(Path::new("SEED.SQL.GZ")), Compression::Gzip);
    assert_eq!(Compression::from_path(Path::new("seed")), Compression::None);
    assert_eq!(Compression::Gzip.to_string(), "gzip");
}

#[test]
fn test_plain_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("seed.sql");

    let mut out = OutputWriter::create(Some(&path)).unwrap();
    writeln!(out, "BEGIN;").unwrap();
    writeln!(out, "COMMIT;").unwrap();
    out.finish().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "BEGIN;\nCOMMIT;\n");
}

#[test]
fn test_gzip_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("seed.sql.gz");

    let mut out = OutputWriter::create(Some(&path)).unwrap();
    writeln!(out, "DELETE FROM users;").unwrap();
    out.finish().unwrap();

    let compressed = std::fs::read(&path).unwrap();
    assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

    let mut content = String::new();
    GzDecoder::new(&compressed[..])
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "DELETE FROM users;\n");
}

#[test]
fn test_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("seed.sql");

    assert!(OutputWriter::create(Some(&path)).is_err());
}
