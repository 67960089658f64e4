//! Shared fixtures for pipeline integration tests
//!
//! Builders for records, on-disk deploy candidates, and publishers wired to
//! the mock repository client.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use buildship::mock::MockRepositoryClient;
use buildship::repository::RepositoryClient;
use buildship::{
    ArtifactDescriptor, BuildRecord, DeployCandidate, Module, Publisher, PublisherConfig,
};

/// A one-build record with fixed identity fields
pub fn build_record(modules: Vec<Module>) -> BuildRecord {
    BuildRecord {
        name: "acme-app".to_string(),
        number: "42".to_string(),
        started: "2024-05-01T12:00:00Z".parse().unwrap(),
        properties: BTreeMap::new(),
        modules,
    }
}

/// A module with artifact descriptors for the given names
pub fn module(id: &str, artifact_names: &[&str]) -> Module {
    Module {
        id: id.to_string(),
        artifacts: artifact_names
            .iter()
            .map(|n| ArtifactDescriptor::new(*n))
            .collect(),
    }
}

/// Write a source file under `dir` and return its keyed deploy candidate
pub fn candidate(
    dir: &Path,
    module_id: &str,
    name: &str,
    contents: &[u8],
) -> (String, DeployCandidate) {
    let source = dir.join(name);
    fs::write(&source, contents).unwrap();
    let id = format!("{module_id}:{name}");
    (
        id.clone(),
        DeployCandidate {
            artifact_id: id,
            source_file: source,
            artifact_path: format!("org/acme/{name}"),
            target_repository: "libs-release-local".to_string(),
            properties: BTreeMap::new(),
            md5: None,
            sha1: None,
        },
    )
}

/// Collect keyed candidates into the map the pipeline consumes
pub fn candidate_map(
    entries: impl IntoIterator<Item = (String, DeployCandidate)>,
) -> HashMap<String, DeployCandidate> {
    entries.into_iter().collect()
}

/// A publisher wired to a shared mock client; inspect the returned handle
/// after the run
pub fn publisher_with_mock(config: PublisherConfig) -> (Publisher, MockRepositoryClient) {
    let mock = MockRepositoryClient::new();
    let handle = mock.clone();
    let publisher = Publisher::new(
        config,
        Box::new(move |_| Ok(Box::new(mock.clone()) as Box<dyn RepositoryClient>)),
    );
    (publisher, handle)
}

/// A publisher whose client factory must never be invoked
pub fn offline_publisher(config: PublisherConfig) -> Publisher {
    Publisher::new(
        config,
        Box::new(|_| panic!("repository client must not be acquired")),
    )
}
