#![allow(dead_code)]
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Temp working directory holding `proj/` with the given files.
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let td = tempfile::tempdir().unwrap();
    fs::create_dir_all(td.path().join("proj")).unwrap();
    for (rel, body) in files {
        write(&td.path().join("proj").join(rel), body.as_bytes());
    }
    td
}

pub fn write(path: &Path, body: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

pub fn separator() -> String {
    ":".repeat(80)
}
