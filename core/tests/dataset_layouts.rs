use petpair_core::{
    classify, collect_anat_and_pet, collect_runs, group_by_run, resolve, resolve_with_config,
    AmbiguityPolicy, DatasetIndex, MatchRule, PairingConfig, PetPairError, SessionKey,
};
use rstest::{fixture, rstest};
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;

/// Dataset shapes encountered in practice
#[derive(Debug, Clone, Copy)]
enum Layout {
    /// Anatomical at subject level, PET in a session folder
    AnatAtSubjectLevel,
    /// Anatomical and PET in the same (only) session folder
    AnatInFirstSession,
    /// Anatomical in the first session, PET in two sessions
    AnatInFirstSessionMultiSession,
    /// Anatomical and PET in each of two sessions
    AnatInEachSession,
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    File::create(path).unwrap();
}

fn add_pet(root: &Path, session: &str, multi_run: bool) {
    let dir = format!("sub-01/ses-{0}/pet/sub-01_ses-{0}", session);
    if multi_run {
        for run in ["01", "02"] {
            touch(root, &format!("{}_run-{}_pet.nii.gz", dir, run));
            touch(root, &format!("{}_run-{}_pet.json", dir, run));
        }
    } else {
        touch(root, &format!("{}_pet.nii.gz", dir));
        touch(root, &format!("{}_pet.json", dir));
    }
}

fn add_session_anat(root: &Path, session: &str) {
    touch(
        root,
        &format!("sub-01/ses-{0}/anat/sub-01_ses-{0}_T1w.nii.gz", session),
    );
    touch(
        root,
        &format!("sub-01/ses-{0}/anat/sub-01_ses-{0}_T1w.json", session),
    );
}

fn build(layout: Layout, multi_run: bool) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    match layout {
        Layout::AnatAtSubjectLevel => {
            touch(root, "sub-01/anat/sub-01_T1w.nii.gz");
            touch(root, "sub-01/anat/sub-01_T1w.json");
            add_pet(root, "baseline", multi_run);
        }
        Layout::AnatInFirstSession => {
            add_session_anat(root, "baseline");
            add_pet(root, "baseline", multi_run);
        }
        Layout::AnatInFirstSessionMultiSession => {
            add_session_anat(root, "baseline");
            add_pet(root, "baseline", multi_run);
            add_pet(root, "second", multi_run);
        }
        Layout::AnatInEachSession => {
            add_session_anat(root, "baseline");
            add_session_anat(root, "second");
            add_pet(root, "baseline", multi_run);
            add_pet(root, "second", multi_run);
        }
    }

    temp_dir
}

#[fixture]
fn multi_run_pet_scans() -> TempDir {
    build(Layout::AnatInFirstSession, true)
}

#[rstest]
#[case(Layout::AnatAtSubjectLevel)]
#[case(Layout::AnatInFirstSession)]
#[case(Layout::AnatInFirstSessionMultiSession)]
#[case(Layout::AnatInEachSession)]
fn every_pet_image_is_paired_once(#[case] layout: Layout, #[values(false, true)] multi_run: bool) {
    let dataset = build(layout, multi_run);

    let classified = classify(dataset.path()).unwrap();
    let pairings = resolve(&classified.anat, &classified.pet).unwrap();

    let paired: usize = pairings.values().map(|p| p.len()).sum();
    assert_eq!(paired, classified.pet.len());
    for pet in &classified.pet {
        let subject_pairing = &pairings[pet.subject()];
        let anat = subject_pairing.anatomical_for(pet).unwrap();
        assert_eq!(anat.subject(), pet.subject());
        assert!(anat.extension().is_image());
    }
}

#[rstest]
fn anat_at_subject_level_is_inherited(#[values(false, true)] multi_run: bool) {
    let dataset = build(Layout::AnatAtSubjectLevel, multi_run);

    let pairings = collect_anat_and_pet(dataset.path()).unwrap();

    for (pet, paired) in pairings["01"].iter() {
        assert!(pet.path.components().count() > paired.anat.path.components().count());
        assert_eq!(paired.anat.session_key(), SessionKey::NoSession);
        assert!(pet.session().is_some());
        assert_eq!(paired.rule, MatchRule::SubjectLevel);
    }
}

#[rstest]
fn anat_in_first_session_folder(#[values(false, true)] multi_run: bool) {
    let dataset = build(Layout::AnatInFirstSession, multi_run);

    let pairings = collect_anat_and_pet(dataset.path()).unwrap();
    let pairing = &pairings["01"];

    assert_eq!(pairing.anatomicals().len(), 1);
    assert_eq!(pairing.len(), if multi_run { 2 } else { 1 });
    for (pet, paired) in pairing.iter() {
        assert_eq!(pet.session(), paired.anat.session());
        assert_eq!(paired.rule, MatchRule::SameSession);
    }
}

#[rstest]
fn anat_in_first_session_covers_later_sessions(#[values(false, true)] multi_run: bool) {
    let dataset = build(Layout::AnatInFirstSessionMultiSession, multi_run);

    let pairings = collect_anat_and_pet(dataset.path()).unwrap();
    let pairing = &pairings["01"];

    assert_eq!(pairing.anatomicals().len(), 1);
    assert!(pairing.len() > 1);

    let rules: Vec<_> = pairing.iter().map(|(_, p)| p.rule).collect();
    assert!(rules.contains(&MatchRule::SameSession));
    assert!(rules.contains(&MatchRule::SingleAnatomical));
}

#[rstest]
fn anat_in_each_session_folder(#[values(false, true)] multi_run: bool) {
    let dataset = build(Layout::AnatInEachSession, multi_run);

    let pairings = collect_anat_and_pet(dataset.path()).unwrap();
    let pairing = &pairings["01"];

    assert_eq!(pairing.anatomicals().len(), 2);
    for (pet, paired) in pairing.iter() {
        assert_eq!(
            pet.path.components().count(),
            paired.anat.path.components().count()
        );
        assert_eq!(pet.session(), paired.anat.session());
    }
}

#[test]
fn same_session_wins_over_subject_level() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    touch(root, "sub-01/anat/sub-01_T1w.nii.gz");
    touch(root, "sub-01/ses-a/anat/sub-01_ses-a_T1w.nii.gz");
    touch(root, "sub-01/ses-a/pet/sub-01_ses-a_pet.nii.gz");

    let pairings = collect_anat_and_pet(root).unwrap();
    let (_, paired) = pairings["01"].iter().next().unwrap();

    assert_eq!(paired.anat.session(), Some("a"));
    assert_eq!(paired.rule, MatchRule::SameSession);
}

#[test]
fn ambiguous_third_session_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    add_session_anat(root, "baseline");
    add_session_anat(root, "second");
    add_pet(root, "third", false);

    let err = collect_anat_and_pet(root).unwrap_err();
    match err {
        PetPairError::AmbiguousAnatomicalMatch {
            subject,
            pet,
            candidates,
        } => {
            assert_eq!(subject, "01");
            assert!(pet.ends_with("sub-01_ses-third_pet.nii.gz"));
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected AmbiguousAnatomicalMatch, got {:?}", other),
    }
}

#[test]
fn ambiguous_third_session_tie_break_is_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    add_session_anat(root, "second");
    add_session_anat(root, "baseline");
    add_pet(root, "third", false);

    let config = PairingConfig::default().with_ambiguity_policy(AmbiguityPolicy::EarliestSession);
    let classified = classify(root).unwrap();
    let first = resolve_with_config(&classified.anat, &classified.pet, &config).unwrap();
    let second = resolve_with_config(&classified.anat, &classified.pet, &config).unwrap();

    assert_eq!(first, second);
    let (_, paired) = first["01"].iter().next().unwrap();
    assert_eq!(paired.anat.session(), Some("baseline"));
    assert_eq!(paired.rule, MatchRule::EarliestSession);
}

#[test]
fn pet_without_any_anatomical() {
    let temp_dir = TempDir::new().unwrap();
    add_pet(temp_dir.path(), "baseline", false);

    let err = collect_anat_and_pet(temp_dir.path()).unwrap_err();
    assert!(matches!(err, PetPairError::NoAnatomicalFound { .. }));
}

#[rstest]
fn collect_runs_groups_by_run_pattern(multi_run_pet_scans: TempDir) {
    let grouped = collect_runs(multi_run_pet_scans.path()).unwrap();

    assert_eq!(grouped.len(), 2);
    for group in grouped.iter() {
        assert!(group.template().contains("_run-XX"));
        assert!(group.template().contains("_pet"));

        let runs: Vec<_> = group
            .paths()
            .iter()
            .map(|p| p.run().unwrap().as_str())
            .collect();
        assert_eq!(runs, vec!["01", "02"]);

        for path in group.paths() {
            assert!(path.path.exists());
        }
    }
}

#[rstest]
fn collect_runs_keeps_sidecars_separate(multi_run_pet_scans: TempDir) {
    let grouped = collect_runs(multi_run_pet_scans.path()).unwrap();

    let nii_groups: Vec<_> = grouped.keys().filter(|k| k.ends_with(".nii.gz")).collect();
    let json_groups: Vec<_> = grouped.keys().filter(|k| k.ends_with(".json")).collect();
    assert_eq!(nii_groups.len(), 1);
    assert_eq!(json_groups.len(), 1);

    for group in grouped.iter() {
        let first = group.first().extension();
        assert!(group.paths().iter().all(|p| p.extension() == first));
    }
}

#[test]
fn collect_runs_orders_runs_numerically() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    for run in ["01", "10", "02"] {
        touch(
            root,
            &format!("sub-01/ses-baseline/pet/sub-01_ses-baseline_run-{}_pet.nii.gz", run),
        );
    }

    let grouped = group_by_run(root).unwrap();
    let group = grouped.iter().next().unwrap();
    let names: Vec<_> = group.paths().iter().map(|p| p.file_name()).collect();

    assert_eq!(
        names,
        vec![
            "sub-01_ses-baseline_run-01_pet.nii.gz",
            "sub-01_ses-baseline_run-02_pet.nii.gz",
            "sub-01_ses-baseline_run-10_pet.nii.gz",
        ]
    );
}

#[test]
fn single_run_files_form_literal_singletons() {
    let dataset = build(Layout::AnatInFirstSession, false);

    let grouped = collect_runs(dataset.path()).unwrap();

    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped.multi_run().count(), 0);
    for group in grouped.iter() {
        assert!(!group.template().contains("run-XX"));
        assert_eq!(group.len(), 1);
        assert_eq!(
            group.template(),
            group.first().path.display().to_string()
        );
    }
}

#[test]
fn dataset_index_links_pairings_and_runs() {
    let dataset = build(Layout::AnatInFirstSessionMultiSession, true);

    let index = DatasetIndex::scan(dataset.path()).unwrap();

    assert_eq!(index.classified().pet.len(), 4);
    for pet in &index.classified().pet {
        let group = index.run_group_for(pet).unwrap();
        assert!(group.is_multi_run());
        assert!(group.paths().contains(pet));
        assert_eq!(
            index.anatomical_for(pet).unwrap().session(),
            Some("baseline")
        );
    }
}
