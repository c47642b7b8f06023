#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory for a single test case, removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` under the workspace and returns the file path.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.temp_dir.path().join(name)).expect("read temp file")
    }
}

/// A small dataset covering every kind the engine distinguishes.
pub const ORDERS_CSV: &str = "\
id,customer,amount,shipped,ordered_at,prep_time,balance,notes
1,Alice,42.5,yes,2024-01-01 08:30:00,00:15:00,-100,
2,Bob,13.37,no,2024-01-03 17:05:00,01:02:03,1000,NA
3,Carol,1000000.5,yes,2024-02-10 00:00:00,00:00:45,-5,rush
";
