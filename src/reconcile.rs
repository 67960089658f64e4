//! Artifact reconciliation
//!
//! Matches the logical artifacts a build record declares against the
//! physical deploy candidates produced on disk, attaching checksums along
//! the way. The output is the insertion-ordered, deduplicated set of
//! deployable artifacts plus accounting for every skipped item, so callers
//! can assert on skip counts instead of digging through logs.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{debug, error};

use crate::checksum::compute_checksums;
use crate::record::{artifact_id, BuildRecord};

/// A physical file proposed for publishing, keyed by its artifact id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployCandidate {
    /// Composite key: "{module id}:{artifact name}"
    pub artifact_id: String,

    /// File on disk to publish
    pub source_file: PathBuf,

    /// Repository-relative target path
    pub artifact_path: String,

    /// Target repository key
    pub target_repository: String,

    /// Properties attached to the deployed artifact
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Precomputed digests, used only when the source file cannot be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

/// The reconciled, checksum-complete unit handed to transport
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeployableArtifact {
    pub artifact_path: String,
    pub source_file: PathBuf,
    pub md5: Option<String>,
    pub sha1: Option<String>,
    pub properties: BTreeMap<String, String>,
    pub target_repository: String,
}

/// Outcome of one reconciliation pass
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Deployable artifacts in iteration order, full-equality deduplicated
    pub artifacts: IndexSet<DeployableArtifact>,

    /// Artifacts matched to a candidate (before deduplication)
    pub matched: usize,

    /// Artifact ids with no candidate; metadata-only entries, not an error
    pub skipped_no_candidate: Vec<String>,

    /// Candidates whose source file existed but could not be digested
    pub checksum_failures: usize,
}

/// Match build-record artifacts to deploy candidates.
///
/// Iterates modules and artifacts in declared order and looks each one up in
/// `candidates` by its composite id. Matched descriptors get their md5/sha1
/// fields overwritten with freshly computed digests; the record mutation is
/// intentional, since the record is persisted with checksums downstream. A
/// missing source file skips the digest step, and a digest failure is logged
/// and counted without aborting the pass.
pub fn reconcile(
    record: &mut BuildRecord,
    candidates: &HashMap<String, DeployCandidate>,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for module in &mut record.modules {
        for artifact in &mut module.artifacts {
            let id = artifact_id(&module.id, &artifact.name);
            let Some(candidate) = candidates.get(&id) else {
                debug!(artifact = %id, "no deploy candidate, skipping");
                outcome.skipped_no_candidate.push(id);
                continue;
            };

            if candidate.source_file.is_file() {
                match compute_checksums(&candidate.source_file) {
                    Ok(sums) => {
                        artifact.md5 = Some(sums.md5);
                        artifact.sha1 = Some(sums.sha1);
                    }
                    Err(err) => {
                        error!(
                            artifact = %artifact.name,
                            file = %candidate.source_file.display(),
                            "could not set checksums: {err}",
                        );
                        outcome.checksum_failures += 1;
                    }
                }
            }

            outcome.matched += 1;
            outcome.artifacts.insert(DeployableArtifact {
                artifact_path: candidate.artifact_path.clone(),
                source_file: candidate.source_file.clone(),
                md5: artifact.md5.clone().or_else(|| candidate.md5.clone()),
                sha1: artifact.sha1.clone().or_else(|| candidate.sha1.clone()),
                properties: candidate.properties.clone(),
                target_repository: candidate.target_repository.clone(),
            });
        }
    }

    outcome
}
