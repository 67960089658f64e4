//! Recording mock client

use std::sync::{Arc, Mutex};

use super::failure::{ClientOp, FailureConfig, FailureInjector};
use crate::reconcile::DeployableArtifact;
use crate::record::BuildRecord;
use crate::repository::{RepositoryClient, TransportError};

/// One recorded client call, in invocation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    /// Deploy attempt for an artifact path (recorded even when it fails)
    Deploy(String),
    /// Build-info send attempt for a build name
    SendBuildInfo(String),
    Shutdown,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<ClientCall>,
    failures: FailureInjector,
}

/// Mock repository client with a shared call log
///
/// Clones share state, so tests keep one handle and give another to the
/// pipeline's client factory.
#[derive(Debug, Clone, Default)]
pub struct MockRepositoryClient {
    inner: Arc<Mutex<Inner>>,
}

impl MockRepositoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every deploy call
    pub fn fail_deploys(&self, message: impl Into<String>) {
        self.lock().failures.inject(ClientOp::Deploy, FailureConfig::always(message));
    }

    /// Fail only the nth deploy call, 1-based
    pub fn fail_deploy_at(&self, n: u32, message: impl Into<String>) {
        self.lock()
            .failures
            .inject(ClientOp::Deploy, FailureConfig::on_call(n, message));
    }

    /// Fail the build-info send
    pub fn fail_send_build_info(&self, message: impl Into<String>) {
        self.lock()
            .failures
            .inject(ClientOp::SendBuildInfo, FailureConfig::always(message));
    }

    /// All calls recorded so far, in order
    pub fn calls(&self) -> Vec<ClientCall> {
        self.lock().calls.clone()
    }

    /// Number of deploy attempts
    pub fn deploy_count(&self) -> usize {
        self.count(|c| matches!(c, ClientCall::Deploy(_)))
    }

    /// Number of shutdown calls
    pub fn shutdown_count(&self) -> usize {
        self.count(|c| matches!(c, ClientCall::Shutdown))
    }

    /// Whether a build-info send was attempted
    pub fn sent_build_info(&self) -> bool {
        self.count(|c| matches!(c, ClientCall::SendBuildInfo(_))) > 0
    }

    fn count(&self, pred: impl Fn(&ClientCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

impl RepositoryClient for MockRepositoryClient {
    fn deploy_artifact(&mut self, artifact: &DeployableArtifact) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(ClientCall::Deploy(artifact.artifact_path.clone()));
        match inner.failures.check(ClientOp::Deploy) {
            Some(reason) => Err(TransportError::DeployFailed {
                path: artifact.artifact_path.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }

    fn send_build_info(&mut self, record: &BuildRecord) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(ClientCall::SendBuildInfo(record.name.clone()));
        match inner.failures.check(ClientOp::SendBuildInfo) {
            Some(reason) => Err(TransportError::PublishFailed(reason)),
            None => Ok(()),
        }
    }

    fn shutdown(&mut self) {
        self.lock().calls.push(ClientCall::Shutdown);
    }
}
