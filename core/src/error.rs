use std::path::PathBuf;
use thiserror::Error;

/// Result type for petpair operations
pub type Result<T> = std::result::Result<T, PetPairError>;

/// Error types for petpair operations
#[derive(Error, Debug)]
pub enum PetPairError {
    /// Several sessions hold anatomicals and none of them covers the PET scan
    #[error(
        "ambiguous anatomical match for subject {subject}: {} could pair with any of {}",
        .pet.display(),
        display_paths(.candidates)
    )]
    AmbiguousAnatomicalMatch {
        subject: String,
        pet: PathBuf,
        candidates: Vec<PathBuf>,
    },

    /// Subject has PET data but no anatomical image anywhere
    #[error("no anatomical image found for subject {subject} (needed by {})", .pet.display())]
    NoAnatomicalFound { subject: String, pet: PathBuf },

    /// Run entity whose value is not a non-negative integer
    #[error("malformed run token 'run-{token}' in {}", .path.display())]
    MalformedRunToken { path: PathBuf, token: String },

    /// Directory traversal error
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl PetPairError {
    /// Subject the error refers to, if any
    pub fn subject(&self) -> Option<&str> {
        match self {
            PetPairError::AmbiguousAnatomicalMatch { subject, .. }
            | PetPairError::NoAnatomicalFound { subject, .. } => Some(subject),
            _ => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
