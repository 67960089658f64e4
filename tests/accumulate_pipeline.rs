//! Accumulation-mode pipeline tests
//!
//! Accumulation copies artifacts and merges build info locally across build
//! steps; the repository client must never be touched, whatever the publish
//! flags say.

mod fixtures;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use buildship::publish::PublishMode;
use buildship::record::load_record;
use buildship::{DeployCandidate, PublisherConfig};
use tempfile::TempDir;

use fixtures::{build_record, candidate, candidate_map, module, offline_publisher};

fn accumulate_config(dir: PathBuf) -> PublisherConfig {
    // Publish flags deliberately set: accumulation must win over them
    PublisherConfig {
        publish_build_info: true,
        publish_artifacts: true,
        repository_url: "https://repo.example.com".to_string(),
        accumulate_dir: Some(dir),
        ..Default::default()
    }
}

#[test]
fn test_accumulation_never_touches_the_network() {
    let dir = TempDir::new().unwrap();
    let acc = dir.path().join("accumulated");
    let entry = candidate(dir.path(), "m1", "a.jar", b"jar bytes");
    let mut record = build_record(vec![module("m1", &["a.jar"])]);

    // offline_publisher panics on any client-factory call
    let publisher = offline_publisher(accumulate_config(acc.clone()));
    let report = publisher
        .run(&mut record, &candidate_map([entry]), false, dir.path())
        .unwrap();

    assert_eq!(report.mode, PublishMode::Accumulated);
    assert_eq!(report.accumulated, 1);
    assert_eq!(report.deployed, 0);
    assert!(!report.build_info_sent);

    // Artifact copied to its repository-relative path, record alongside it
    assert_eq!(
        fs::read(acc.join("org/acme/a.jar")).unwrap(),
        b"jar bytes"
    );
    assert!(acc.join("build-info.json").is_file());
}

#[test]
fn test_first_accumulation_equals_the_exported_record() {
    let dir = TempDir::new().unwrap();
    let acc = dir.path().join("accumulated");
    let entry = candidate(dir.path(), "m1", "a.jar", b"jar bytes");
    let mut record = build_record(vec![module("m1", &["a.jar"])]);

    let publisher = offline_publisher(accumulate_config(acc.clone()));
    let report = publisher
        .run(&mut record, &candidate_map([entry]), false, dir.path())
        .unwrap();

    assert_eq!(
        fs::read_to_string(acc.join("build-info.json")).unwrap(),
        fs::read_to_string(&report.export_path).unwrap()
    );
}

#[test]
fn test_second_step_merges_into_accumulated_record() {
    let dir = TempDir::new().unwrap();
    let acc = dir.path().join("accumulated");
    let publisher = offline_publisher(accumulate_config(acc.clone()));

    let first = candidate(dir.path(), "m1", "a.jar", b"a bytes");
    let mut step_one = build_record(vec![module("m1", &["a.jar"])]);
    publisher
        .run(&mut step_one, &candidate_map([first]), false, dir.path())
        .unwrap();

    let second = candidate(dir.path(), "m2", "b.jar", b"b bytes");
    let mut step_two = build_record(vec![module("m2", &["b.jar"])]);
    publisher
        .run(&mut step_two, &candidate_map([second]), false, dir.path())
        .unwrap();

    let merged = load_record(&acc.join("build-info.json")).unwrap();
    assert_eq!(merged.modules.len(), 2);
    assert_eq!(merged.modules[0].id, "m1");
    assert_eq!(merged.modules[1].id, "m2");
    assert!(acc.join("org/acme/a.jar").is_file());
    assert!(acc.join("org/acme/b.jar").is_file());
}

#[test]
fn test_reaccumulating_the_same_step_is_stable() {
    let dir = TempDir::new().unwrap();
    let acc = dir.path().join("accumulated");
    let publisher = offline_publisher(accumulate_config(acc.clone()));

    let entry = candidate(dir.path(), "m1", "a.jar", b"jar bytes");
    let candidates = candidate_map([entry]);

    let mut once = build_record(vec![module("m1", &["a.jar"])]);
    publisher.run(&mut once, &candidates, false, dir.path()).unwrap();
    let mut again = build_record(vec![module("m1", &["a.jar"])]);
    publisher.run(&mut again, &candidates, false, dir.path()).unwrap();

    let merged = load_record(&acc.join("build-info.json")).unwrap();
    assert_eq!(merged.modules.len(), 1);
    // No duplicate entries under the same artifact name
    assert_eq!(merged.modules[0].artifacts.len(), 1);
}

#[test]
fn test_failed_artifact_copy_is_recoverable() {
    let dir = TempDir::new().unwrap();
    let acc = dir.path().join("accumulated");

    let good = candidate(dir.path(), "m1", "a.jar", b"a bytes");
    let missing = (
        "m1:b.jar".to_string(),
        DeployCandidate {
            artifact_id: "m1:b.jar".to_string(),
            source_file: dir.path().join("vanished.jar"),
            artifact_path: "org/acme/b.jar".to_string(),
            target_repository: "libs-release-local".to_string(),
            properties: BTreeMap::new(),
            md5: None,
            sha1: None,
        },
    );
    let mut record = build_record(vec![module("m1", &["a.jar", "b.jar"])]);

    let publisher = offline_publisher(accumulate_config(acc.clone()));
    let report = publisher
        .run(
            &mut record,
            &candidate_map([good, missing]),
            false,
            dir.path(),
        )
        .unwrap();

    assert_eq!(report.accumulated, 1);
    assert_eq!(report.copy_failures, 1);
    assert!(acc.join("org/acme/a.jar").is_file());
    assert!(!acc.join("org/acme/b.jar").exists());
}
