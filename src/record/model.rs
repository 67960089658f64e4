//! Build record data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One build's outputs: identity fields plus an ordered module list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRecord {
    /// Build name, e.g. the project or job name
    pub name: String,

    /// Build number, kept as a string to match upstream CI identifiers
    pub number: String,

    /// When the build started
    pub started: DateTime<Utc>,

    /// Free-form build properties
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,

    /// Modules in declared order
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// One module of a build, holding its artifacts in declared order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module-qualified id, e.g. "org.acme:app:1.0"
    pub id: String,

    /// Artifacts in declared order
    #[serde(default)]
    pub artifacts: Vec<ArtifactDescriptor>,
}

/// A logical artifact declared by a module
///
/// Checksums are optional: reconciliation fills them in once the matching
/// file on disk has been digested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// File name, e.g. "app-1.0.jar"
    pub name: String,

    /// Artifact kind, e.g. "jar" or "pom"
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

/// Composite key matching a module's artifact to its deploy candidate
pub fn artifact_id(module_id: &str, artifact_name: &str) -> String {
    format!("{}:{}", module_id, artifact_name)
}

impl Module {
    /// Create a module with no artifacts
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            artifacts: Vec::new(),
        }
    }
}

impl ArtifactDescriptor {
    /// Create a descriptor with no checksums
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact_type: None,
            md5: None,
            sha1: None,
        }
    }
}
