//! Anatomical/PET pairing
//!
//! Pairs every PET scan of a subject with the anatomical that covers it,
//! following BIDS inheritance: same session first, then a subject-level
//! anatomical, then the subject's only anatomical session, and finally the
//! configured ambiguity policy.

mod pairing;

pub use pairing::{MatchRule, Pairing, SubjectPairing};

use crate::error::{PetPairError, Result};
use crate::types::{AmbiguityPolicy, DatasetPath, PairingConfig, RunIndex, SessionKey};
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-subject pairings keyed by subject id
pub type Pairings = BTreeMap<String, SubjectPairing>;

/// Resolves PET → anatomical pairings with the default configuration
pub fn resolve(anat: &[DatasetPath], pet: &[DatasetPath]) -> Result<Pairings> {
    resolve_with_config(anat, pet, &PairingConfig::default())
}

/// Resolves PET → anatomical pairings for every subject with PET data
///
/// Subjects without PET scans are omitted from the result.
///
/// # Errors
///
/// - `NoAnatomicalFound` if a subject has PET scans but no anatomical
/// - `AmbiguousAnatomicalMatch` if no rule narrows a PET scan to one
///   anatomical and the policy is [`AmbiguityPolicy::Reject`]
pub fn resolve_with_config(
    anat: &[DatasetPath],
    pet: &[DatasetPath],
    config: &PairingConfig,
) -> Result<Pairings> {
    let mut anat_by_subject: BTreeMap<&str, Vec<&DatasetPath>> = BTreeMap::new();
    for path in anat {
        anat_by_subject.entry(path.subject()).or_default().push(path);
    }

    let mut pet_by_subject: BTreeMap<&str, Vec<&DatasetPath>> = BTreeMap::new();
    for path in pet {
        pet_by_subject.entry(path.subject()).or_default().push(path);
    }

    let mut pairings = Pairings::new();
    for (subject, mut pets) in pet_by_subject {
        pets.sort();
        pets.dedup();

        let sessions = AnatomicalSessions::new(
            anat_by_subject.get(subject).map(Vec::as_slice).unwrap_or(&[]),
        );

        let mut subject_pairing = SubjectPairing::new(subject);
        for pet in pets {
            let pairing = sessions.match_pet(subject, pet, config)?;
            debug!(
                "Paired {} -> {} ({})",
                pet.path.display(),
                pairing.anat.path.display(),
                pairing.rule
            );
            subject_pairing.insert(pet.clone(), pairing);
        }
        pairings.insert(subject.to_string(), subject_pairing);
    }

    Ok(pairings)
}

/// One representative anatomical per session key of a subject
struct AnatomicalSessions<'a> {
    by_session: BTreeMap<SessionKey, &'a DatasetPath>,
    all: Vec<&'a DatasetPath>,
}

impl<'a> AnatomicalSessions<'a> {
    fn new(anat: &[&'a DatasetPath]) -> Self {
        let mut grouped: BTreeMap<SessionKey, Vec<&'a DatasetPath>> = BTreeMap::new();
        for path in anat {
            grouped.entry(path.session_key()).or_default().push(*path);
        }

        let by_session = grouped
            .into_iter()
            .filter_map(|(key, candidates)| {
                select_representative(&candidates).map(|anat| (key, anat))
            })
            .collect();

        let mut all = anat.to_vec();
        all.sort();

        Self { by_session, all }
    }

    fn match_pet(
        &self,
        subject: &str,
        pet: &DatasetPath,
        config: &PairingConfig,
    ) -> Result<Pairing> {
        // 1. Same session
        if let Some(anat) = self.by_session.get(&pet.session_key()) {
            return Ok(pair(anat, MatchRule::SameSession));
        }

        // 2. Subject-level anatomical inherited into every session
        if let Some(anat) = self.by_session.get(&SessionKey::NoSession) {
            return Ok(pair(anat, MatchRule::SubjectLevel));
        }

        if self.by_session.is_empty() {
            return Err(PetPairError::NoAnatomicalFound {
                subject: subject.to_string(),
                pet: pet.path.clone(),
            });
        }

        // 3. Only one session holds anatomicals
        if config.single_anatomical_fallback && self.by_session.len() == 1 {
            if let Some((session, anat)) = self.by_session.iter().next() {
                info!(
                    "Pairing {} with the only anatomical of subject {} ({})",
                    pet.path.display(),
                    subject,
                    session
                );
                return Ok(pair(anat, MatchRule::SingleAnatomical));
            }
        }

        // 4. Ambiguous
        match config.ambiguity {
            AmbiguityPolicy::Reject => Err(PetPairError::AmbiguousAnatomicalMatch {
                subject: subject.to_string(),
                pet: pet.path.clone(),
                candidates: self.all.iter().map(|a| a.path.clone()).collect(),
            }),
            AmbiguityPolicy::EarliestSession => {
                let (session, anat) = self
                    .by_session
                    .iter()
                    .next()
                    .ok_or_else(|| PetPairError::NoAnatomicalFound {
                        subject: subject.to_string(),
                        pet: pet.path.clone(),
                    })?;
                info!(
                    "Ambiguous anatomical for {}; choosing earliest session {}",
                    pet.path.display(),
                    session
                );
                Ok(pair(anat, MatchRule::EarliestSession))
            }
        }
    }
}

fn pair(anat: &DatasetPath, rule: MatchRule) -> Pairing {
    Pairing {
        anat: anat.clone(),
        rule,
    }
}

/// Picks the anatomical that represents a session
///
/// Prefers a `T1w` suffix, then the lowest run (no run first), then the
/// lowest path.
pub fn select_representative<'a>(candidates: &[&'a DatasetPath]) -> Option<&'a DatasetPath> {
    candidates
        .iter()
        .copied()
        .min_by(|a, b| representative_key(a).cmp(&representative_key(b)))
}

fn representative_key(path: &DatasetPath) -> (bool, Option<&RunIndex>, &Path) {
    (path.suffix() != Some("T1w"), path.run(), path.path.as_path())
}
