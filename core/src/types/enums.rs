use std::cmp::Ordering;
use std::fmt;

/// Session placement of a file within its subject
///
/// `NoSession` models a subject-level file (no `ses-` folder or entity),
/// which anatomical inheritance relies on. Ordering puts `NoSession` first,
/// then sessions by id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum SessionKey {
    NoSession,
    Session(String),
}

impl SessionKey {
    /// Builds a key from an optional session id
    pub fn from_session(session: Option<&str>) -> Self {
        match session {
            Some(id) => SessionKey::Session(id.to_string()),
            None => SessionKey::NoSession,
        }
    }

    /// Returns whether this is the subject-level key
    pub fn is_subject_level(&self) -> bool {
        matches!(self, SessionKey::NoSession)
    }

    /// Session id, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            SessionKey::NoSession => None,
            SessionKey::Session(id) => Some(id),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKey::NoSession => write!(f, "(subject level)"),
            SessionKey::Session(id) => write!(f, "ses-{}", id),
        }
    }
}

/// Run index taken from a `run-<token>` entity
///
/// The raw token is kept so `run-01` displays as written. Numeric tokens
/// compare as integers (`2 < 10`); non-numeric labels sort after every
/// numeric index and compare lexicographically among themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct RunIndex(String);

impl RunIndex {
    /// Creates a run index from the token following `run-`
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token as written in the file name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the token is a non-negative integer (ASCII digits only)
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// Digits of a numeric token with leading zeros trimmed
    ///
    /// Compared by length first, then lexically, this orders tokens by
    /// integer value without any width limit.
    fn magnitude(&self) -> Option<&str> {
        self.is_numeric().then(|| self.0.trim_start_matches('0'))
    }
}

impl PartialOrd for RunIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RunIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.magnitude(), other.magnitude()) {
            (Some(a), Some(b)) => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.cmp(b))
                .then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl fmt::Display for RunIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// File extensions recognized in a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum FileExtension {
    /// `.nii`
    Nii,
    /// `.nii.gz`
    NiiGz,
    /// `.json` sidecar
    Json,
}

impl FileExtension {
    /// Splits a file name into stem and extension
    ///
    /// Returns `None` for any extension outside the dataset convention.
    pub fn split(file_name: &str) -> Option<(&str, FileExtension)> {
        // .nii.gz must be tried before .nii
        if let Some(stem) = file_name.strip_suffix(".nii.gz") {
            Some((stem, FileExtension::NiiGz))
        } else if let Some(stem) = file_name.strip_suffix(".nii") {
            Some((stem, FileExtension::Nii))
        } else {
            file_name
                .strip_suffix(".json")
                .map(|stem| (stem, FileExtension::Json))
        }
    }

    /// Extension including the leading dot
    pub fn as_str(&self) -> &'static str {
        match self {
            FileExtension::Nii => ".nii",
            FileExtension::NiiGz => ".nii.gz",
            FileExtension::Json => ".json",
        }
    }

    /// Returns whether this is a NIfTI image extension
    pub fn is_image(&self) -> bool {
        matches!(self, FileExtension::Nii | FileExtension::NiiGz)
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Modality folder a file lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Modality {
    Anat,
    Pet,
}

impl Modality {
    /// Parses a modality from a folder name (ASCII case-insensitive)
    pub fn from_dir_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("anat") {
            Some(Modality::Anat)
        } else if name.eq_ignore_ascii_case("pet") {
            Some(Modality::Pet)
        } else {
            None
        }
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            Modality::Anat => "anat",
            Modality::Pet => "pet",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
