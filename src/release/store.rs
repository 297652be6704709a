//! Where POM documents are read from and written to

use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;
use tracing::info;

/// Trait for loading and persisting POM documents
#[cfg_attr(test, automock)]
pub trait DocumentStore {
    fn load(&self, path: &Path) -> io::Result<String>;

    fn save(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Reads and writes POMs in place on the filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDocumentStore;

impl DocumentStore for FsDocumentStore {
    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn save(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Reads POMs from the filesystem but only reports what would be written
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunStore;

impl DocumentStore for DryRunStore {
    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn save(&self, path: &Path, contents: &str) -> io::Result<()> {
        info!("Dry run: would write {} bytes to {:?}", contents.len(), path);
        Ok(())
    }
}
