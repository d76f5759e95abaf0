pub mod report;

use crate::types::{AmbiguityPolicy, PairingConfig, RunTokenPolicy};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for petpair
#[derive(Parser, Debug)]
#[command(name = "petpair")]
#[command(about = "Pair PET scans with their anatomical reference and group multi-run series")]
#[command(version)]
pub struct Cli {
    /// Root of the BIDS-style dataset
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// What to do when no rule narrows a PET scan to one anatomical
    #[arg(long, default_value = "reject")]
    pub on_ambiguity: AmbiguityArg,

    /// Do not pair PET scans with an anatomical stored in another session,
    /// even when it is the subject's only one
    #[arg(long)]
    pub no_single_anatomical_fallback: bool,

    /// Fail on run values that are not integers instead of sorting them last
    #[arg(long)]
    pub strict_runs: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Pairing configuration selected by the flags
    pub fn pairing_config(&self) -> PairingConfig {
        let run_tokens = if self.strict_runs {
            RunTokenPolicy::Strict
        } else {
            RunTokenPolicy::Lexicographic
        };

        PairingConfig::default()
            .with_ambiguity_policy(self.on_ambiguity.clone().into())
            .single_anatomical_fallback(!self.no_single_anatomical_fallback)
            .with_run_token_policy(run_tokens)
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// Tab-separated PET and anatomical paths (one pair per line)
    Paths,
}

/// Ambiguity handling options
#[derive(Debug, Clone, ValueEnum)]
pub enum AmbiguityArg {
    /// Report the ambiguity as an error
    Reject,
    /// Use the anatomical with the earliest session id
    EarliestSession,
}

impl From<AmbiguityArg> for AmbiguityPolicy {
    fn from(arg: AmbiguityArg) -> Self {
        match arg {
            AmbiguityArg::Reject => AmbiguityPolicy::Reject,
            AmbiguityArg::EarliestSession => AmbiguityPolicy::EarliestSession,
        }
    }
}
