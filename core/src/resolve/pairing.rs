use crate::types::DatasetPath;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Rule that produced a PET → anatomical match
///
/// Variants are listed in the order the resolver tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum MatchRule {
    /// Anatomical in the same session as the PET scan
    SameSession,
    /// Subject-level anatomical inherited into the PET session
    SubjectLevel,
    /// The subject's only anatomical session, placed in another session
    SingleAnatomical,
    /// Ambiguity tie-break: earliest session id
    EarliestSession,
}

impl MatchRule {
    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            MatchRule::SameSession => "same-session",
            MatchRule::SubjectLevel => "subject-level",
            MatchRule::SingleAnatomical => "single-anatomical",
            MatchRule::EarliestSession => "earliest-session",
        }
    }

    /// Returns whether the match crossed a session boundary
    pub fn is_inherited(&self) -> bool {
        !matches!(self, MatchRule::SameSession)
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Anatomical chosen for one PET scan
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Pairing {
    pub anat: DatasetPath,
    pub rule: MatchRule,
}

/// PET → anatomical mapping for one subject
///
/// Every PET scan of the subject appears exactly once as a key; one
/// anatomical may serve many PET scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPairing {
    subject: String,
    pairs: BTreeMap<DatasetPath, Pairing>,
}

impl SubjectPairing {
    pub(crate) fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            pairs: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, pet: DatasetPath, pairing: Pairing) {
        self.pairs.insert(pet, pairing);
    }

    /// Subject id
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Anatomical paired with `pet`
    pub fn anatomical_for(&self, pet: &DatasetPath) -> Option<&DatasetPath> {
        self.pairs.get(pet).map(|p| &p.anat)
    }

    /// Full pairing (anatomical and rule) for `pet`
    pub fn get(&self, pet: &DatasetPath) -> Option<&Pairing> {
        self.pairs.get(pet)
    }

    /// Iterates PET scans in path order with their pairings
    pub fn iter(&self) -> impl Iterator<Item = (&DatasetPath, &Pairing)> {
        self.pairs.iter()
    }

    /// PET scans of this subject
    pub fn pet_paths(&self) -> impl Iterator<Item = &DatasetPath> {
        self.pairs.keys()
    }

    /// Distinct anatomicals used by this subject's pairings
    pub fn anatomicals(&self) -> BTreeSet<&DatasetPath> {
        self.pairs.values().map(|p| &p.anat).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
