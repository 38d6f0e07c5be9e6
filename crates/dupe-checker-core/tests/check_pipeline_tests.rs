use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use dupe_checker_core::{
    DuplicateChecker, DuplicateObserver, Error, FindingRecorder, Method, ProgressReporter,
    Relocator, SilentReporter,
};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Layout:
///   folder_a/
///     a1.txt      ("alpha")
///     a2.txt      ("alpha")   ← duplicate within folder_a
///     shared.txt  ("shared")
///   folder_b/
///     b1.txt      ("shared")  ← duplicate of folder_a/shared.txt
///     b2.txt      ("beta")
///     b3.txt      ("beta")    ← duplicate within folder_b
///   folder_c/                 (empty)
fn create_test_tree(root: &Path) -> Vec<PathBuf> {
    let folder_a = root.join("folder_a");
    let folder_b = root.join("folder_b");
    let folder_c = root.join("folder_c");

    write(&folder_a, "a1.txt", "alpha");
    write(&folder_a, "a2.txt", "alpha");
    write(&folder_a, "shared.txt", "shared");
    write(&folder_b, "b1.txt", "shared");
    write(&folder_b, "b2.txt", "beta");
    write(&folder_b, "b3.txt", "beta");
    fs::create_dir_all(&folder_c).unwrap();

    vec![folder_a, folder_b, folder_c]
}

#[test]
fn test_full_check_pipeline() {
    let tmp = tempdir().unwrap();
    let folders = create_test_tree(tmp.path());

    let checker = DuplicateChecker::default();
    let report = checker
        .check(&folders, &[], &SilentReporter, &mut [])
        .unwrap();

    assert_eq!(report.folders.len(), 3);
    assert_eq!(report.findings.len(), 3);

    let a = report.folder("folder_a").unwrap();
    assert_eq!(a.file_count, 3);
    assert_eq!(a.total, 2);
    assert_eq!(a.duplicate_files, 1);
    assert_eq!(a.matrix.columns(), ["folder_a", "folder_b", "folder_c"]);
    assert_eq!(a.matrix.get(Method::Checksum, "folder_a"), Some(1));
    assert_eq!(a.matrix.get(Method::Checksum, "folder_b"), Some(1));
    assert_eq!(a.matrix.get(Method::Checksum, "folder_c"), Some(0));

    let b = report.folder("folder_b").unwrap();
    assert_eq!(b.matrix.columns(), ["folder_b", "folder_c"]);
    assert_eq!(b.total, 1);
    assert_eq!(b.duplicate_files, 2);

    let c = report.folder("folder_c").unwrap();
    assert_eq!(c.file_count, 0);
    assert_eq!(c.total, 0);
    assert_eq!(c.matrix.row(Method::Checksum), Some(&[0usize][..]));

    let cross = report
        .findings
        .iter()
        .find(|f| f.duplicate_alias == "folder_b" && f.original_alias == "folder_a")
        .unwrap();
    assert!(cross.duplicate_path.ends_with("b1.txt"));
    assert!(cross.original_path.ends_with("shared.txt"));
    assert_eq!(cross.duplicate_index, 0);
    assert_eq!(cross.original_index, 2);
    assert_eq!(cross.fingerprint.len(), 32);

    let in_b = report
        .findings
        .iter()
        .find(|f| f.duplicate_alias == "folder_b" && f.original_alias == "folder_b")
        .unwrap();
    assert!(in_b.duplicate_path.ends_with("b3.txt"));
    assert!(in_b.original_path.ends_with("b2.txt"));

    assert_eq!(report.total_duplicates(), 3);
}

#[test]
fn test_leftmost_folder_claims_duplicate() {
    let tmp = tempdir().unwrap();
    let x = tmp.path().join("x");
    let y = tmp.path().join("y");
    let z = tmp.path().join("z");
    write(&x, "f.txt", "same");
    write(&y, "f.txt", "same");
    write(&z, "g.txt", "same");

    let report = DuplicateChecker::default()
        .check(&[&x, &y, &z], &[], &SilentReporter, &mut [])
        .unwrap();

    let x_report = report.folder("x").unwrap();
    assert_eq!(x_report.matrix.get(Method::Checksum, "y"), Some(1));
    assert_eq!(x_report.matrix.get(Method::Checksum, "z"), Some(1));
    // z/g.txt was already claimed by x, so y does not count it again
    let y_report = report.folder("y").unwrap();
    assert_eq!(y_report.matrix.get(Method::Checksum, "z"), Some(0));
    assert!(report.findings.iter().all(|f| f.original_alias == "x"));
}

#[test]
fn test_methods_are_independent() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    write(&a, "photo.jpg", "one");
    write(&b, "photo.jpg", "two");

    let checker = DuplicateChecker::new(vec![Method::Checksum, Method::Name]);
    let report = checker
        .check(&[&a, &b], &[], &SilentReporter, &mut [])
        .unwrap();

    let a_report = report.folder("a").unwrap();
    assert_eq!(a_report.matrix.get(Method::Checksum, "b"), Some(0));
    assert_eq!(a_report.matrix.get(Method::Name, "b"), Some(1));
    assert_eq!(report.findings_for(Method::Checksum).count(), 0);
    assert_eq!(report.findings_for(Method::Name).count(), 1);
}

#[test]
fn test_relocation_moves_each_file_once() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    write(&a, "p.jpg", "pixels");
    let dup = write(&b, "p.jpg", "pixels");

    let checker = DuplicateChecker::new(vec![Method::Checksum, Method::Name]);
    let mut relocator = Relocator::default();
    let report = checker
        .check(&[&a, &b], &[], &SilentReporter, &mut [&mut relocator])
        .unwrap();

    // One finding per method, one physical move
    assert_eq!(report.findings.len(), 2);
    let summary = relocator.into_summary();
    assert_eq!(summary.moved.len(), 1);
    assert!(summary.skipped.is_empty());
    assert!(!dup.exists());
    assert!(b.join("duplicated").join("p.jpg").exists());
    assert!(a.join("p.jpg").exists());
    assert!(!a.join("duplicated").exists());
}

#[test]
fn test_relocation_keeps_a_live_copy_across_methods() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    let c = tmp.path().join("c");
    write(&a, "x.txt", "one");
    let same_name = write(&b, "x.txt", "two");
    let same_content = write(&c, "y.txt", "two");

    let checker = DuplicateChecker::new(vec![Method::Checksum, Method::Name]);
    let mut relocator = Relocator::default();
    let report = checker
        .check(&[&a, &b, &c], &[], &SilentReporter, &mut [&mut relocator])
        .unwrap();

    // b/x.txt goes by name, then serves as the checksum original of c/y.txt
    assert_eq!(report.findings.len(), 2);
    let summary = relocator.into_summary();
    assert_eq!(
        summary.moved,
        vec![(same_name, b.join("duplicated").join("x.txt"))]
    );
    assert_eq!(summary.skipped, vec![same_content.clone()]);
    assert_eq!(fs::read_to_string(&same_content).unwrap(), "two");
}

#[test]
fn test_folder_listed_twice_is_not_its_own_duplicate() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let first = write(&a, "one.txt", "1");
    let second = write(&a, "two.txt", "2");

    let mut relocator = Relocator::default();
    let report = DuplicateChecker::new(vec![Method::Checksum, Method::Name])
        .check(&[&a, &a], &[], &SilentReporter, &mut [&mut relocator])
        .unwrap();

    assert!(report.findings.is_empty());
    assert_eq!(report.total_duplicates(), 0);
    assert!(relocator.summary().moved.is_empty());
    assert!(first.exists());
    assert!(second.exists());
}

#[test]
fn test_folder_listed_twice_still_reports_real_duplicates() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    write(&a, "one.txt", "same");
    write(&a, "two.txt", "same");

    let report = DuplicateChecker::default()
        .check(&[&a, &a], &[], &SilentReporter, &mut [])
        .unwrap();

    assert!(report
        .findings
        .iter()
        .all(|f| f.duplicate_path.ends_with("two.txt") && f.original_path.ends_with("one.txt")));
    assert!(!report.findings.is_empty());
}

#[test]
fn test_move_failure_aborts_and_keeps_earlier_moves() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    let c = tmp.path().join("c");
    write(&a, "one.txt", "1");
    write(&a, "two.txt", "2");
    let moved = write(&b, "one.txt", "1");
    let blocked = write(&c, "two.txt", "2");
    // A plain file where c's quarantine folder would go
    write(&c, "duplicated", "not a folder");

    let mut relocator = Relocator::default();
    let err = DuplicateChecker::default()
        .check(&[&a, &b, &c], &[], &SilentReporter, &mut [&mut relocator])
        .unwrap_err();

    assert!(matches!(err, Error::Relocation { ref path, .. } if *path == blocked));
    assert!(!err.is_precondition());
    assert!(!moved.exists());
    assert!(b.join("duplicated").join("one.txt").exists());
    assert!(blocked.exists());
    assert_eq!(relocator.summary().moved.len(), 1);
}

#[test]
fn test_observers_see_every_finding() {
    let tmp = tempdir().unwrap();
    let folders = create_test_tree(tmp.path());

    let mut first = FindingRecorder::default();
    let mut second = FindingRecorder::default();
    let report = DuplicateChecker::default()
        .check(
            &folders,
            &[],
            &SilentReporter,
            &mut [&mut first as &mut dyn DuplicateObserver, &mut second],
        )
        .unwrap();

    assert_eq!(first.findings, report.findings);
    assert_eq!(second.findings, report.findings);
}

#[test]
fn test_file_given_as_folder_fails_before_any_work() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    write(&a, "p.jpg", "pixels");
    let dup = write(&b, "p.jpg", "pixels");
    let not_a_folder = write(tmp.path(), "plain.txt", "text");

    let mut relocator = Relocator::default();
    let err = DuplicateChecker::default()
        .check(
            &[a.clone(), b.clone(), not_a_folder.clone()],
            &[],
            &SilentReporter,
            &mut [&mut relocator],
        )
        .unwrap_err();

    assert!(err.is_precondition());
    assert!(matches!(err, Error::NotADirectory(ref p) if *p == not_a_folder));
    assert!(dup.exists());
    assert!(!b.join("duplicated").exists());
    assert!(relocator.summary().moved.is_empty());
}

#[test]
fn test_missing_folder_is_a_precondition_error() {
    let tmp = tempdir().unwrap();
    let err = DuplicateChecker::default()
        .check(&[tmp.path().join("missing")], &[], &SilentReporter, &mut [])
        .unwrap_err();
    assert!(err.is_precondition());
}

#[test]
fn test_repeated_folder_names_get_distinct_aliases() {
    let tmp = tempdir().unwrap();
    let first = tmp.path().join("x").join("a");
    let second = tmp.path().join("y").join("a");
    let third = tmp.path().join("b");
    for dir in [&first, &second, &third] {
        fs::create_dir_all(dir).unwrap();
    }

    let report = DuplicateChecker::default()
        .check(&[&first, &second, &third], &[], &SilentReporter, &mut [])
        .unwrap();

    let aliases: Vec<&str> = report.folders.iter().map(|f| f.alias.as_str()).collect();
    assert_eq!(aliases, vec!["a", "a(1)", "b"]);
}

#[test]
fn test_alias_count_mismatch() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();

    let err = DuplicateChecker::default()
        .check(&[&a, &b], &["only".to_string()], &SilentReporter, &mut [])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::AliasCountMismatch {
            aliases: 1,
            folders: 2
        }
    ));
}

#[test]
fn test_explicit_aliases_label_the_report() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    write(&a, "x.txt", "same");
    write(&b, "x.txt", "same");

    let aliases = vec!["main".to_string(), "backup".to_string()];
    let report = DuplicateChecker::default()
        .check(&[&a, &b], &aliases, &SilentReporter, &mut [])
        .unwrap();

    assert_eq!(
        report.folder("main").unwrap().matrix.get(Method::Checksum, "backup"),
        Some(1)
    );
    assert_eq!(report.findings[0].duplicate_alias, "backup");
}

#[test]
fn test_empty_folders_produce_zero_matrices() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();

    let report = DuplicateChecker::new(vec![Method::Checksum, Method::Name])
        .check(&[&a, &b], &[], &SilentReporter, &mut [])
        .unwrap();

    assert!(report.findings.is_empty());
    for folder in &report.folders {
        assert_eq!(folder.total, 0);
        assert_eq!(folder.matrix.methods(), [Method::Checksum, Method::Name]);
    }
}

#[test]
fn test_ignore_patterns_and_quarantine_folder_are_skipped() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    write(&a, "cache.tmp", "same");
    write(&b, "cache.tmp", "same");
    // Left over from an earlier run; not part of the listing
    write(&a.join("duplicated"), "old.txt", "old");
    write(&b, "old.txt", "old");

    let report = DuplicateChecker::new(vec![Method::Checksum])
        .with_ignore_patterns(vec!["*.tmp".to_string()])
        .check(&[&a, &b], &[], &SilentReporter, &mut [])
        .unwrap();

    assert_eq!(report.folder("a").unwrap().file_count, 0);
    assert_eq!(report.folder("b").unwrap().file_count, 1);
    assert!(report.findings.is_empty());
}

/// Deletes a file after listing so that fingerprinting it fails.
struct VanishingFile(PathBuf);

impl ProgressReporter for VanishingFile {
    fn on_fingerprint_start(&self, _total_files: usize) {
        fs::remove_file(&self.0).unwrap();
    }
}

#[test]
fn test_unreadable_file_aborts_by_default() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    write(&a, "keep.txt", "k");
    let vanishing = write(&a, "vanish.txt", "v");

    let err = DuplicateChecker::default()
        .check(&[&a], &[], &VanishingFile(vanishing.clone()), &mut [])
        .unwrap_err();
    assert!(matches!(err, Error::Fingerprint { ref path, .. } if *path == vanishing));
}

#[test]
fn test_unreadable_file_is_reported_when_skipping() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a");
    write(&a, "keep1.txt", "k");
    write(&a, "keep2.txt", "k");
    let vanishing = write(&a, "vanish.txt", "v");

    let report = DuplicateChecker::new(vec![Method::Checksum, Method::Name])
        .with_skip_unreadable(true)
        .check(&[&a], &[], &VanishingFile(vanishing.clone()), &mut [])
        .unwrap();

    assert_eq!(report.unreadable, vec![vanishing]);
    let folder = report.folder("a").unwrap();
    assert_eq!(folder.file_count, 2);
    assert_eq!(folder.matrix.get(Method::Checksum, "a"), Some(1));
    assert_eq!(folder.matrix.get(Method::Name, "a"), Some(0));
}

#[test]
fn test_report_json_shape() {
    let tmp = tempdir().unwrap();
    let folders = create_test_tree(tmp.path());

    let report = DuplicateChecker::default()
        .check(&folders, &[], &SilentReporter, &mut [])
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

    assert_eq!(json["folders"][0]["alias"], "folder_a");
    assert_eq!(json["folders"][0]["matrix"]["checksum"]["folder_b"], 1);
    assert_eq!(json["findings"].as_array().unwrap().len(), 3);
    assert_eq!(json["findings"][0]["method"], "checksum");
    assert!(json.get("relocation").is_none());
}
