use crate::types::DatasetPath;
use std::collections::BTreeMap;

/// Files of one series that differ only in their run index
///
/// The sequence is never empty and is ordered by ascending run index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RunGroup {
    template: String,
    paths: Vec<DatasetPath>,
}

impl RunGroup {
    pub(crate) fn new(template: String, first: DatasetPath) -> Self {
        Self {
            template,
            paths: vec![first],
        }
    }

    pub(crate) fn push(&mut self, path: DatasetPath) {
        self.paths.push(path);
    }

    pub(crate) fn sort(&mut self) {
        self.paths
            .sort_by(|a, b| a.run().cmp(&b.run()).then_with(|| a.path.cmp(&b.path)));
    }

    /// Templated key (`run-XX`), or the literal path for files without a run
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Member files in run order
    pub fn paths(&self) -> &[DatasetPath] {
        &self.paths
    }

    /// First run of the series
    pub fn first(&self) -> &DatasetPath {
        // never empty: constructed with one member
        &self.paths[0]
    }

    /// Returns whether the series has more than one file
    pub fn is_multi_run(&self) -> bool {
        self.paths.len() > 1
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Run groups keyed by templated key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct RunGroups {
    groups: BTreeMap<String, RunGroup>,
}

impl RunGroups {
    pub(crate) fn add(&mut self, template: String, path: DatasetPath) {
        match self.groups.get_mut(&template) {
            Some(group) => group.push(path),
            None => {
                self.groups
                    .insert(template.clone(), RunGroup::new(template, path));
            }
        }
    }

    pub(crate) fn sort_groups(&mut self) {
        for group in self.groups.values_mut() {
            group.sort();
        }
    }

    /// Group stored under `template`
    pub fn get(&self, template: &str) -> Option<&RunGroup> {
        self.groups.get(template)
    }

    /// Group that `path` belongs to
    pub fn group_for(&self, path: &DatasetPath) -> Option<&RunGroup> {
        self.groups.get(&super::template_key(path))
    }

    /// Iterates groups in key order
    pub fn iter(&self) -> impl Iterator<Item = &RunGroup> {
        self.groups.values()
    }

    /// Templated keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Groups holding more than one run
    pub fn multi_run(&self) -> impl Iterator<Item = &RunGroup> {
        self.groups.values().filter(|g| g.is_multi_run())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
