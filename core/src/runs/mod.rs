//! Run collapsing
//!
//! Groups PET images and their sidecars that share every entity except the
//! run index, so a multi-run series can be handled as one unit.

mod group;

pub use group::{RunGroup, RunGroups};

use crate::classify::modality_of;
use crate::error::{PetPairError, Result};
use crate::types::{
    parse_entity, DatasetPath, FileExtension, Modality, PairingConfig, RunTokenPolicy,
};
use log::{debug, warn};
use std::path::Path;
use walkdir::WalkDir;

/// Placeholder substituted for the run value in templated keys
pub const RUN_PLACEHOLDER: &str = "XX";

/// Groups PET files under `root` by run with the default configuration
pub fn group_by_run(root: &Path) -> Result<RunGroups> {
    group_by_run_with_config(root, &PairingConfig::default())
}

/// Groups PET files (`.nii`, `.nii.gz`, `.json`) under `root` by run
///
/// Files with a `run-` entity are keyed by their path with the run value
/// replaced by [`RUN_PLACEHOLDER`]; files without one form singleton
/// groups keyed by their literal path. Images and sidecars never share a
/// group since the extension is part of the key.
///
/// # Errors
///
/// Returns an error if `root` cannot be read, or, under
/// [`RunTokenPolicy::Strict`], if a run value is not a non-negative integer.
pub fn group_by_run_with_config(root: &Path, config: &PairingConfig) -> Result<RunGroups> {
    let mut groups = RunGroups::default();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || modality_of(entry.path()) != Some(Modality::Pet) {
            continue;
        }

        let dataset_path = match DatasetPath::from_root(root, entry.path().to_path_buf()) {
            Ok(dp) => dp,
            Err(e) => {
                debug!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        if let Some(run) = dataset_path.run() {
            if config.run_tokens == RunTokenPolicy::Strict && !run.is_numeric() {
                return Err(PetPairError::MalformedRunToken {
                    path: dataset_path.path.clone(),
                    token: run.to_string(),
                });
            }
        }

        groups.add(template_key(&dataset_path), dataset_path);
    }

    groups.sort_groups();

    debug!(
        "Collected {} run groups ({} multi-run) under {}",
        groups.len(),
        groups.multi_run().count(),
        root.display()
    );

    Ok(groups)
}

/// Templated key for a dataset path
///
/// The value of the `run-` segment in the file name becomes
/// [`RUN_PLACEHOLDER`]; everything else is kept. Paths without a run are
/// returned as written.
pub fn template_key(path: &DatasetPath) -> String {
    if path.run().is_none() {
        return path.path.display().to_string();
    }

    let file_name = path.file_name();
    let stem = FileExtension::split(file_name)
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let segments: Vec<String> = stem
        .split('_')
        .map(|segment| match parse_entity(segment) {
            Some(("run", _)) => format!("run-{}", RUN_PLACEHOLDER),
            _ => segment.to_string(),
        })
        .collect();
    let templated = format!("{}{}", segments.join("_"), path.extension());

    match path.path.parent() {
        Some(parent) => parent.join(templated).display().to_string(),
        None => templated,
    }
}
