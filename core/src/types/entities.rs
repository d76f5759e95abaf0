use super::{FileExtension, RunIndex, SessionKey};
use regex::Regex;
use std::path::{Component, Path};
use std::sync::OnceLock;

fn entity_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+)-([A-Za-z0-9]+)$").expect("Failed to compile regex")
    })
}

fn suffix_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9]+$").expect("Failed to compile regex"))
}

/// Splits a `key-value` segment, enforcing the alphanumeric token grammar
pub fn parse_entity(segment: &str) -> Option<(&str, &str)> {
    let caps = entity_regex().captures(segment)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Entities parsed from a dataset path
///
/// Only the fixed vocabulary is interpreted: `sub`, `ses`, `run` and the
/// trailing modality suffix. Other well-formed `key-value` segments (e.g.
/// `acq-`, `trc-`) are accepted but not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Entities {
    /// Subject id (token after `sub-`)
    pub subject: String,

    /// Session id (token after `ses-`), absent for subject-level files
    pub session: Option<String>,

    /// Run index (token after `run-`), absent for single-run series
    pub run: Option<RunIndex>,

    /// Modality suffix such as `T1w` or `pet`
    pub suffix: Option<String>,

    /// File extension
    pub extension: FileExtension,
}

impl Entities {
    /// Parses entities from a bare file name
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unknown, a segment violates the
    /// entity grammar, an entity repeats, or no `sub-` entity is present.
    pub fn parse_file_name(file_name: &str) -> Result<Self, String> {
        let mut parsed = NameEntities::parse(file_name)?;
        let subject = parsed
            .subject
            .take()
            .ok_or_else(|| format!("No subject entity in '{}'", file_name))?;
        Ok(parsed.into_entities(subject))
    }

    /// Parses entities from a path relative to the dataset root
    ///
    /// File name entities take precedence; `sub-` and `ses-` folders fill in
    /// whatever the file name leaves out. A file name subject or session
    /// that contradicts its folder is rejected, as is a file with no subject
    /// in either place.
    pub fn parse_relative(relative: &Path) -> Result<Self, String> {
        let file_name = relative
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| format!("Invalid file name in '{}'", relative.display()))?;

        let mut parsed = NameEntities::parse(file_name)?;

        let mut dir_subject = None;
        let mut dir_session = None;
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                let Component::Normal(name) = component else {
                    continue;
                };
                match name.to_str().and_then(parse_entity) {
                    Some(("sub", value)) => dir_subject = Some(value),
                    Some(("ses", value)) => dir_session = Some(value),
                    _ => {}
                }
            }
        }

        let subject = match (parsed.subject.take(), dir_subject) {
            (Some(own), Some(dir)) if own != dir => {
                return Err(format!(
                    "Subject '{}' in '{}' contradicts folder sub-{}",
                    own,
                    relative.display(),
                    dir
                ));
            }
            (Some(own), _) => own,
            (None, Some(dir)) => dir.to_string(),
            (None, None) => {
                return Err(format!("No subject entity in '{}'", relative.display()));
            }
        };

        if let Some(dir_session) = dir_session {
            if let Some(own) = &parsed.session {
                if own != dir_session {
                    return Err(format!(
                        "Session '{}' in '{}' contradicts folder ses-{}",
                        own,
                        relative.display(),
                        dir_session
                    ));
                }
            } else {
                parsed.session = Some(dir_session.to_string());
            }
        }

        Ok(parsed.into_entities(subject))
    }

    /// Session key used to partition a subject's files
    pub fn session_key(&self) -> SessionKey {
        SessionKey::from_session(self.session.as_deref())
    }
}

/// File name entities before the subject is settled
struct NameEntities {
    subject: Option<String>,
    session: Option<String>,
    run: Option<String>,
    suffix: Option<String>,
    extension: FileExtension,
}

impl NameEntities {
    fn parse(file_name: &str) -> Result<Self, String> {
        let (stem, extension) = FileExtension::split(file_name)
            .ok_or_else(|| format!("Unrecognized extension in '{}'", file_name))?;

        let mut subject = None;
        let mut session = None;
        let mut run = None;
        let mut suffix = None;

        let segments: Vec<&str> = stem.split('_').collect();
        let last = segments.len() - 1;

        for (i, segment) in segments.iter().enumerate() {
            if let Some((key, value)) = parse_entity(segment) {
                let slot = match key {
                    "sub" => &mut subject,
                    "ses" => &mut session,
                    "run" => &mut run,
                    _ => continue,
                };
                if slot.replace(value.to_string()).is_some() {
                    return Err(format!("Duplicate '{}' entity in '{}'", key, file_name));
                }
            } else if i == last && suffix_regex().is_match(segment) {
                suffix = Some(segment.to_string());
            } else {
                return Err(format!(
                    "Segment '{}' of '{}' is not a valid entity",
                    segment, file_name
                ));
            }
        }

        Ok(Self {
            subject,
            session,
            run,
            suffix,
            extension,
        })
    }

    fn into_entities(self, subject: String) -> Entities {
        Entities {
            subject,
            session: self.session,
            run: self.run.map(RunIndex::new),
            suffix: self.suffix,
            extension: self.extension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[test]
    fn test_parse_full_name() {
        let e = Entities::parse_file_name("sub-01_ses-baseline_run-02_pet.nii.gz").unwrap();
        assert_eq!(e.subject, "01");
        assert_eq!(e.session.as_deref(), Some("baseline"));
        assert_eq!(e.run, Some(RunIndex::new("02")));
        assert_eq!(e.suffix.as_deref(), Some("pet"));
        assert_eq!(e.extension, FileExtension::NiiGz);
    }

    #[test]
    fn test_parse_subject_level_name() {
        let e = Entities::parse_file_name("sub-01_T1w.nii").unwrap();
        assert_eq!(e.subject, "01");
        assert!(e.session.is_none());
        assert!(e.run.is_none());
        assert_eq!(e.session_key(), SessionKey::NoSession);
    }

    #[test]
    fn test_parse_ignores_other_entities() {
        let e = Entities::parse_file_name("sub-01_ses-1_trc-FDG_rec-acdyn_pet.json").unwrap();
        assert_eq!(e.session.as_deref(), Some("1"));
        assert_eq!(e.suffix.as_deref(), Some("pet"));
        assert_eq!(e.extension, FileExtension::Json);
    }

    #[rstest]
    #[case("ses-01_pet.nii.gz")]
    #[case("T1w.nii.gz")]
    #[case("sub-01_ses-a_ses-b_pet.nii.gz")]
    #[case("sub-0.1_pet.nii.gz")]
    #[case("sub-01_pet_extra.nii.gz")]
    #[case("sub-01_pet.txt")]
    #[case("sub-01_run-_pet.nii.gz")]
    fn test_parse_rejects(#[case] name: &str) {
        assert!(Entities::parse_file_name(name).is_err(), "{} should be rejected", name);
    }

    #[test]
    fn test_parse_relative_fills_session_from_folder() {
        let rel = PathBuf::from("sub-01/ses-baseline/anat/sub-01_T1w.nii.gz");
        let e = Entities::parse_relative(&rel).unwrap();
        assert_eq!(e.session.as_deref(), Some("baseline"));
    }

    #[test]
    fn test_parse_relative_takes_subject_from_folder() {
        let rel = PathBuf::from("sub-01/ses-baseline/pet/ses-baseline_pet.nii.gz");
        let e = Entities::parse_relative(&rel).unwrap();
        assert_eq!(e.subject, "01");
        assert_eq!(e.session.as_deref(), Some("baseline"));

        let rel = PathBuf::from("sub-01/anat/T1w.nii.gz");
        let e = Entities::parse_relative(&rel).unwrap();
        assert_eq!(e.subject, "01");
        assert_eq!(e.suffix.as_deref(), Some("T1w"));
    }

    #[test]
    fn test_parse_relative_requires_some_subject() {
        let rel = PathBuf::from("ses-baseline/pet/ses-baseline_pet.nii.gz");
        assert!(Entities::parse_relative(&rel).is_err());
    }

    #[test]
    fn test_parse_relative_rejects_contradicting_subject() {
        let rel = PathBuf::from("sub-02/anat/sub-01_T1w.nii.gz");
        assert!(Entities::parse_relative(&rel).is_err());
    }

    #[test]
    fn test_parse_relative_rejects_contradicting_session() {
        let rel = PathBuf::from("sub-01/ses-second/pet/sub-01_ses-baseline_pet.nii.gz");
        assert!(Entities::parse_relative(&rel).is_err());
    }

    #[test]
    fn test_parse_relative_ignores_unrelated_folders() {
        // folder names containing "t1" or "anat" text must not leak into entities
        let rel = PathBuf::from("t1_backup/sub-01/anat/sub-01_T1w.nii.gz");
        let e = Entities::parse_relative(&rel).unwrap();
        assert_eq!(e.subject, "01");
        assert!(e.session.is_none());
    }
}
