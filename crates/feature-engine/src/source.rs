//! Feature File Discovery

use std::io;
use std::path::{Path, PathBuf};

/// Lists the feature files that make up one modality
pub trait FileSource {
    /// Files to load for `dir`, in the order they should be collected
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Regular files directly inside the directory, sorted by file name
#[derive(Debug, Clone, Copy, Default)]
pub struct SortedDirectory;

impl FileSource for SortedDirectory {
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Caller-supplied file order; the directory argument is ignored
#[derive(Debug, Clone, Default)]
pub struct FileList(pub Vec<PathBuf>);

impl FileSource for FileList {
    fn list(&self, _dir: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self.0.clone())
    }
}
