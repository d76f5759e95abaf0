//! Entity-path classification
//!
//! Walks a dataset root and sorts image files into anatomical and PET
//! candidates by the modality folder they live in.

use crate::error::Result;
use crate::types::{DatasetPath, Modality};
use log::{debug, warn};
use std::path::Path;
use walkdir::WalkDir;

/// Anatomical and PET candidates found under a dataset root
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ClassifiedPaths {
    /// Images in `anat/` folders
    pub anat: Vec<DatasetPath>,

    /// Images in `pet/` folders
    pub pet: Vec<DatasetPath>,
}

impl ClassifiedPaths {
    /// Total number of classified images
    pub fn len(&self) -> usize {
        self.anat.len() + self.pet.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anat.is_empty() && self.pet.is_empty()
    }
}

/// Classifies every image under `root` as anatomical or PET
///
/// Files outside `anat/`/`pet/` folders, non-image files and files with no
/// parsable subject in either their name or a `sub-` folder are skipped.
/// Both sequences are sorted by path.
///
/// # Errors
///
/// Returns an error if `root` itself cannot be read. Unreadable entries
/// below the root are logged and skipped.
pub fn classify(root: &Path) -> Result<ClassifiedPaths> {
    let mut classified = ClassifiedPaths::default();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some((modality, dataset_path)) = classify_file(root, entry.path()) {
            match modality {
                Modality::Anat => classified.anat.push(dataset_path),
                Modality::Pet => classified.pet.push(dataset_path),
            }
        }
    }

    classified.anat.sort();
    classified.pet.sort();

    debug!(
        "Classified {} anatomical and {} PET images under {}",
        classified.anat.len(),
        classified.pet.len(),
        root.display()
    );

    Ok(classified)
}

/// Classifies a single file under `root`
///
/// Returns `None` when the file is not an image in a modality folder or
/// its entities cannot be parsed.
pub fn classify_file(root: &Path, path: &Path) -> Option<(Modality, DatasetPath)> {
    let modality = modality_of(path)?;

    let dataset_path = match DatasetPath::from_root(root, path.to_path_buf()) {
        Ok(dp) => dp,
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };

    if !dataset_path.extension().is_image() {
        return None;
    }

    Some((modality, dataset_path))
}

/// Modality of the folder directly containing `path`
pub fn modality_of(path: &Path) -> Option<Modality> {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .and_then(Modality::from_dir_name)
}
