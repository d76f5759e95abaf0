pub mod api;
pub mod classify;
pub mod cli;
pub mod error;
pub mod resolve;
pub mod runs;
pub mod types;

pub use api::{collect_anat_and_pet, collect_runs, DatasetIndex};
pub use classify::{classify, ClassifiedPaths};
pub use cli::report::{PathsReport, TextReport};
pub use error::{PetPairError, Result};
pub use resolve::{resolve, resolve_with_config, MatchRule, Pairing, Pairings, SubjectPairing};
pub use runs::{group_by_run, group_by_run_with_config, RunGroup, RunGroups, RUN_PLACEHOLDER};
pub use types::*;
