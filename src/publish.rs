//! Publish pipeline orchestration
//!
//! Top-level coordinator for one build invocation: reconcile the build
//! record against deploy candidates, export the record, then either
//! accumulate everything locally or publish through a repository-client
//! session. Fatal failures abort the run; per-artifact failures are logged
//! and counted in the report.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::PublisherConfig;
use crate::patterns::{IncludeExcludePatterns, PatternError};
use crate::reconcile::{reconcile, DeployCandidate, DeployableArtifact, ReconcileOutcome};
use crate::record::{merge_into, save_record, BuildRecord, PersistError};
use crate::repository::{ClientFactory, RepositoryClient, TransportError};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl PublishError {
    /// Get the stable exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PublishError::Pattern(_) => 2,
            PublishError::Persist(_) => 40,
            PublishError::Transport(_) => 50,
        }
    }
}

/// Which branch a run took after exporting the build record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// Artifacts and build info were accumulated locally
    Accumulated,
    /// A repository-client session was driven
    Published,
    /// Neither accumulation nor publishing configured
    LocalOnly,
}

/// What one run did, including every skipped item
#[derive(Debug)]
pub struct PublishReport {
    pub mode: PublishMode,

    /// Where the build record was exported
    pub export_path: PathBuf,

    /// Size of the reconciled deployable set
    pub artifact_count: usize,

    /// Record artifacts with no deploy candidate
    pub skipped_no_candidate: usize,

    /// Candidates whose digest could not be computed
    pub checksum_failures: usize,

    /// Artifacts actually deployed
    pub deployed: usize,

    /// Artifact paths skipped by the include/exclude patterns
    pub skipped_by_pattern: Vec<String>,

    /// Files copied into the accumulation directory
    pub accumulated: usize,

    /// Accumulation copies that failed (recoverable, logged)
    pub copy_failures: usize,

    /// Whether the build record was sent to the repository
    pub build_info_sent: bool,
}

struct Published {
    deployed: usize,
    skipped: Vec<String>,
    sent: bool,
}

/// Deployment orchestrator for one build invocation
pub struct Publisher {
    config: PublisherConfig,
    connect: ClientFactory,
}

impl Publisher {
    /// Create a publisher with its repository-client factory
    pub fn new(config: PublisherConfig, connect: ClientFactory) -> Self {
        Self { config, connect }
    }

    /// Run the pipeline: reconcile, export, then accumulate or publish.
    ///
    /// The record's artifact descriptors are updated with computed checksums
    /// before export. Aborts on the first fatal failure; the repository
    /// session, once acquired, is shut down on every exit path.
    pub fn run(
        &self,
        record: &mut BuildRecord,
        candidates: &HashMap<String, DeployCandidate>,
        were_there_test_failures: bool,
        base_dir: &Path,
    ) -> Result<PublishReport, PublishError> {
        let outcome = reconcile(record, candidates);

        let export_path = self.config.export_path(base_dir);
        info!(path = %export_path.display(), "saving build info");
        save_record(record, &export_path)?;

        let mut report = PublishReport {
            mode: PublishMode::LocalOnly,
            export_path: export_path.clone(),
            artifact_count: outcome.artifacts.len(),
            skipped_no_candidate: outcome.skipped_no_candidate.len(),
            checksum_failures: outcome.checksum_failures,
            deployed: 0,
            skipped_by_pattern: Vec::new(),
            accumulated: 0,
            copy_failures: 0,
            build_info_sent: false,
        };

        if let Some(accumulate_dir) = &self.config.accumulate_dir {
            // Artifacts and build info accumulate locally; nothing is
            // published even when publish flags are set
            let (accumulated, copy_failures) =
                accumulate(accumulate_dir, &export_path, &outcome.artifacts)?;
            report.mode = PublishMode::Accumulated;
            report.accumulated = accumulated;
            report.copy_failures = copy_failures;
            return Ok(report);
        }

        if self.config.publish_artifacts || self.config.publish_build_info {
            let patterns = IncludeExcludePatterns::new(
                &self.config.include_patterns,
                &self.config.exclude_patterns,
            )?;

            let mut client = (self.connect)(&self.config)?;
            let result =
                self.publish(client.as_mut(), record, &outcome, were_there_test_failures, &patterns);
            // The session is released before any failure propagates
            client.shutdown();
            let published = result?;

            report.mode = PublishMode::Published;
            report.deployed = published.deployed;
            report.skipped_by_pattern = published.skipped;
            report.build_info_sent = published.sent;
            return Ok(report);
        }

        debug!("publishing disabled, build info exported locally only");
        Ok(report)
    }

    fn publish(
        &self,
        client: &mut dyn RepositoryClient,
        record: &BuildRecord,
        outcome: &ReconcileOutcome,
        were_there_test_failures: bool,
        patterns: &IncludeExcludePatterns,
    ) -> Result<Published, PublishError> {
        let stable_enough = self.config.even_unstable || !were_there_test_failures;

        let mut deployed = 0;
        let mut skipped = Vec::new();
        if self.config.publish_artifacts && !outcome.artifacts.is_empty() && stable_enough {
            info!(url = %self.config.repository_url, "deploying artifacts");
            for artifact in &outcome.artifacts {
                if patterns.path_conflicts(&artifact.artifact_path) {
                    info!(
                        path = %artifact.artifact_path,
                        "skipping deployment due to include-exclude patterns",
                    );
                    skipped.push(artifact.artifact_path.clone());
                    continue;
                }
                // First failure aborts: remaining artifacts and the
                // build-info send must not run after a failed deploy
                client.deploy_artifact(artifact)?;
                deployed += 1;
            }
        }

        let mut sent = false;
        if self.config.publish_build_info && stable_enough {
            info!(build = %record.name, number = %record.number, "publishing build info");
            client.send_build_info(record)?;
            sent = true;
        }

        Ok(Published {
            deployed,
            skipped,
            sent,
        })
    }
}

/// Copy the build record and every deployable artifact into the
/// accumulation directory.
///
/// The record merges into `<dir>/build-info.json`; artifacts land at their
/// repository-relative target paths. A failed artifact copy is logged and
/// counted, never fatal; a failed record merge aborts.
fn accumulate(
    accumulate_dir: &Path,
    build_info_file: &Path,
    artifacts: &IndexSet<DeployableArtifact>,
) -> Result<(usize, usize), PublishError> {
    info!(dir = %accumulate_dir.display(), "accumulating artifacts and build info");

    let target = accumulate_dir.join("build-info.json");
    merge_into(build_info_file, &target)?;

    let mut accumulated = 0;
    let mut copy_failures = 0;
    for artifact in artifacts {
        let dst = accumulate_dir.join(&artifact.artifact_path);
        match crate::record::copy_into(&artifact.source_file, &dst) {
            Ok(()) => accumulated += 1,
            Err(err) => {
                error!(
                    file = %artifact.source_file.display(),
                    "could not accumulate artifact: {err}",
                );
                copy_failures += 1;
            }
        }
    }

    Ok((accumulated, copy_failures))
}
