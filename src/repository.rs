//! Repository client contract
//!
//! Abstracts the remote repository for testability. Provides:
//! - RepositoryClient trait: the session interface the pipeline drives
//! - DryRunClient: logs every call without touching a network
//!
//! A real transport (HTTP or otherwise) lives outside this crate; embedders
//! hand the pipeline a factory producing their own implementation.

use std::io;

use tracing::info;

use crate::config::PublisherConfig;
use crate::reconcile::DeployableArtifact;
use crate::record::BuildRecord;

/// Errors raised by a repository-client session
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Deploy of '{path}' failed: {reason}")]
    DeployFailed { path: String, reason: String },

    #[error("Build info publish failed: {0}")]
    PublishFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One session against the remote repository
///
/// `shutdown` must be idempotent; the pipeline calls it on every exit path
/// of the publish branch, including aborts.
pub trait RepositoryClient {
    /// Deploy a single artifact
    fn deploy_artifact(&mut self, artifact: &DeployableArtifact) -> Result<(), TransportError>;

    /// Send the build record
    fn send_build_info(&mut self, record: &BuildRecord) -> Result<(), TransportError>;

    /// Release connections held by this session
    fn shutdown(&mut self);
}

/// Produces a repository-client session for one pipeline invocation
pub type ClientFactory =
    Box<dyn Fn(&PublisherConfig) -> Result<Box<dyn RepositoryClient>, TransportError>>;

/// Client that logs deploys instead of performing them
///
/// Backs the CLI's `--dry-run` mode; every operation succeeds.
#[derive(Debug, Default)]
pub struct DryRunClient;

impl RepositoryClient for DryRunClient {
    fn deploy_artifact(&mut self, artifact: &DeployableArtifact) -> Result<(), TransportError> {
        info!(
            path = %artifact.artifact_path,
            repository = %artifact.target_repository,
            "dry run: would deploy artifact",
        );
        Ok(())
    }

    fn send_build_info(&mut self, record: &BuildRecord) -> Result<(), TransportError> {
        info!(
            build = %record.name,
            number = %record.number,
            "dry run: would publish build info",
        );
        Ok(())
    }

    fn shutdown(&mut self) {}
}
