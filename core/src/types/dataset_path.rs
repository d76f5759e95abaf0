use super::{Entities, FileExtension, RunIndex, SessionKey};
use std::fmt;
use std::path::{Path, PathBuf};

/// A dataset file together with its parsed entities
///
/// Ordered by path, so collections of dataset paths iterate
/// deterministically regardless of filesystem order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct DatasetPath {
    /// Path to the file (root-joined, as found during traversal)
    pub path: PathBuf,

    /// Entities parsed from the path
    pub entities: Entities,
}

impl DatasetPath {
    /// Creates a dataset path from a file under `root`
    ///
    /// Entities are parsed from the portion of `path` below `root` only.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not under `root` or its entities
    /// cannot be parsed.
    pub fn from_root(root: &Path, path: PathBuf) -> Result<Self, String> {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| format!("{} is not under {}", path.display(), root.display()))?;
        let entities = Entities::parse_relative(relative)?;
        Ok(Self { path, entities })
    }

    /// Creates a dataset path whose entities come from the file name alone
    pub fn from_file_name(path: PathBuf) -> Result<Self, String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| format!("Invalid file name in '{}'", path.display()))?;
        let entities = Entities::parse_file_name(name)?;
        Ok(Self { path, entities })
    }

    pub fn subject(&self) -> &str {
        &self.entities.subject
    }

    pub fn session(&self) -> Option<&str> {
        self.entities.session.as_deref()
    }

    pub fn session_key(&self) -> SessionKey {
        self.entities.session_key()
    }

    pub fn run(&self) -> Option<&RunIndex> {
        self.entities.run.as_ref()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.entities.suffix.as_deref()
    }

    pub fn extension(&self) -> FileExtension {
        self.entities.extension
    }

    /// File name component of the path
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for DatasetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl AsRef<Path> for DatasetPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
