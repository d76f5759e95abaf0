//! Core type definitions for dataset entities
//!
//! This module provides the fundamental types used throughout the petpair library:
//! - [`Entities`]: Typed record of the `sub-`/`ses-`/`run-` entities and suffix of a file
//! - [`DatasetPath`]: A file path paired with its parsed entities
//! - [`SessionKey`]: Subject-level vs. per-session placement
//! - [`RunIndex`]: Run token with integer ordering
//! - [`FileExtension`] and [`Modality`]: Recognized extensions and modality folders
//! - [`PairingConfig`]: Resolver and run collapser policies

mod config;
mod dataset_path;
mod entities;
mod enums;

pub use config::{AmbiguityPolicy, PairingConfig, RunTokenPolicy};
pub use dataset_path::DatasetPath;
pub use entities::{parse_entity, Entities};
pub use enums::{FileExtension, Modality, RunIndex, SessionKey};
