use crate::classify::{classify, ClassifiedPaths};
use crate::error::Result;
use crate::resolve::{resolve_with_config, Pairing, Pairings};
use crate::runs::{group_by_run_with_config, RunGroup, RunGroups};
use crate::types::{DatasetPath, PairingConfig};
use log::info;
use std::path::{Path, PathBuf};

/// Pairs every PET image under `root` with its anatomical
///
/// Shortcut for [`classify`] followed by [`crate::resolve::resolve`].
pub fn collect_anat_and_pet(root: &Path) -> Result<Pairings> {
    let classified = classify(root)?;
    crate::resolve::resolve(&classified.anat, &classified.pet)
}

/// Groups PET images and sidecars under `root` by run
pub fn collect_runs(root: &Path) -> Result<RunGroups> {
    crate::runs::group_by_run(root)
}

/// Snapshot of one dataset: classified images, pairings and run groups
///
/// Built by a single scan; call [`DatasetIndex::scan`] again to pick up
/// changes on disk.
///
/// # Example
///
/// ```no_run
/// use petpair_core::DatasetIndex;
/// use std::path::Path;
///
/// let index = DatasetIndex::scan(Path::new("/data/study")).unwrap();
/// for (subject, pairing) in index.pairings() {
///     for (pet, paired) in pairing.iter() {
///         println!("sub-{}: {} -> {} ({})", subject, pet, paired.anat, paired.rule);
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    root: PathBuf,
    classified: ClassifiedPaths,
    pairings: Pairings,
    run_groups: RunGroups,
}

impl DatasetIndex {
    /// Scans `root` with the default configuration
    pub fn scan(root: &Path) -> Result<Self> {
        Self::scan_with_config(root, &PairingConfig::default())
    }

    /// Scans `root`, resolving pairings and run groups under `config`
    ///
    /// # Errors
    ///
    /// Propagates classifier, resolver and run collapser errors unchanged.
    pub fn scan_with_config(root: &Path, config: &PairingConfig) -> Result<Self> {
        let classified = classify(root)?;
        let pairings = resolve_with_config(&classified.anat, &classified.pet, config)?;
        let run_groups = group_by_run_with_config(root, config)?;

        info!(
            "Indexed {}: {} subjects with PET, {} run groups",
            root.display(),
            pairings.len(),
            run_groups.len()
        );

        Ok(Self {
            root: root.to_path_buf(),
            classified,
            pairings,
            run_groups,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Anatomical and PET candidates
    pub fn classified(&self) -> &ClassifiedPaths {
        &self.classified
    }

    /// Per-subject pairings
    pub fn pairings(&self) -> &Pairings {
        &self.pairings
    }

    pub fn run_groups(&self) -> &RunGroups {
        &self.run_groups
    }

    /// Pairing for a PET image, looked up across subjects
    pub fn pairing_for(&self, pet: &DatasetPath) -> Option<&Pairing> {
        self.pairings.get(pet.subject())?.get(pet)
    }

    /// Anatomical paired with a PET image
    pub fn anatomical_for(&self, pet: &DatasetPath) -> Option<&DatasetPath> {
        self.pairing_for(pet).map(|p| &p.anat)
    }

    /// Run group a PET image belongs to
    pub fn run_group_for(&self, pet: &DatasetPath) -> Option<&RunGroup> {
        self.run_groups.group_for(pet)
    }
}
