/// What the resolver does when no rule narrows a PET scan to one anatomical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum AmbiguityPolicy {
    /// Return `AmbiguousAnatomicalMatch` to the caller
    #[default]
    Reject,

    /// Pick the anatomical with the lexicographically earliest session id
    EarliestSession,
}

/// How the run collapser treats `run-` values that are not integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum RunTokenPolicy {
    /// Sort non-numeric runs after numeric ones, lexicographically
    #[default]
    Lexicographic,

    /// Fail with `MalformedRunToken`
    Strict,
}

/// Configuration for pairing and run grouping
///
/// # Example
///
/// ```
/// use petpair_core::{AmbiguityPolicy, PairingConfig, RunTokenPolicy};
///
/// let config = PairingConfig::default()
///     .with_ambiguity_policy(AmbiguityPolicy::EarliestSession)
///     .single_anatomical_fallback(false)
///     .with_run_token_policy(RunTokenPolicy::Strict);
///
/// assert_eq!(config.ambiguity, AmbiguityPolicy::EarliestSession);
/// assert!(!config.single_anatomical_fallback);
/// assert_eq!(config.run_tokens, RunTokenPolicy::Strict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct PairingConfig {
    /// Policy applied once every fallback has failed
    pub ambiguity: AmbiguityPolicy,

    /// Pair with the subject's only anatomical even when it sits in another
    /// session (anatomical stored in the first session folder but covering
    /// all sessions)
    pub single_anatomical_fallback: bool,

    /// Handling of non-numeric run tokens during run grouping
    pub run_tokens: RunTokenPolicy,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            ambiguity: AmbiguityPolicy::Reject,
            single_anatomical_fallback: true,
            run_tokens: RunTokenPolicy::Lexicographic,
        }
    }
}

impl PairingConfig {
    /// Builder: Set the ambiguity policy
    pub fn with_ambiguity_policy(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    /// Builder: Enable or disable the single-anatomical fallback
    pub fn single_anatomical_fallback(mut self, enabled: bool) -> Self {
        self.single_anatomical_fallback = enabled;
        self
    }

    /// Builder: Set the run token policy
    pub fn with_run_token_policy(mut self, policy: RunTokenPolicy) -> Self {
        self.run_tokens = policy;
        self
    }
}
