//! Buildship - build artifact reconciliation and publish pipeline
//!
//! This crate reconciles a build's declared artifact metadata with the files
//! actually produced on disk, attaches md5/sha1 checksums, filters the
//! result against include/exclude deployment patterns, and either publishes
//! the artifact set plus build-info record through a repository client or
//! accumulates both locally across build steps.

pub mod checksum;
pub mod config;
pub mod mock;
pub mod patterns;
pub mod publish;
pub mod reconcile;
pub mod record;
pub mod repository;

pub use config::{ConfigError, PublisherConfig};
pub use patterns::IncludeExcludePatterns;
pub use publish::{PublishError, PublishMode, PublishReport, Publisher};
pub use reconcile::{reconcile, DeployCandidate, DeployableArtifact, ReconcileOutcome};
pub use record::{ArtifactDescriptor, BuildRecord, Module};
pub use repository::{RepositoryClient, TransportError};
