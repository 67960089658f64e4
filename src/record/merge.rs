//! Accumulation merge for build records
//!
//! Multi-step builds accumulate their build info into one record: each step
//! merges its freshly produced record into the accumulated file. Modules
//! present in both records are combined, with the newer record's entry
//! winning for any artifact of the same name; modules present in only one
//! record pass through unchanged.

use std::path::Path;

use tracing::debug;

use super::model::{BuildRecord, Module};
use super::persist::{copy_into, load_record, save_record, PersistError};

/// Merge `new` into `existing`, returning the combined record.
///
/// The merged record takes the new record's identity fields; module and
/// artifact order follows the existing record, with new-only entries
/// appended.
pub fn merge_records(existing: BuildRecord, new: BuildRecord) -> BuildRecord {
    let mut modules = existing.modules;

    for incoming in new.modules {
        match modules.iter_mut().find(|m| m.id == incoming.id) {
            Some(present) => merge_module(present, incoming),
            None => modules.push(incoming),
        }
    }

    BuildRecord {
        name: new.name,
        number: new.number,
        started: new.started,
        properties: new.properties,
        modules,
    }
}

fn merge_module(present: &mut Module, incoming: Module) {
    for artifact in incoming.artifacts {
        match present.artifacts.iter_mut().find(|a| a.name == artifact.name) {
            Some(slot) => *slot = artifact,
            None => present.artifacts.push(artifact),
        }
    }
}

/// Merge the record at `new_record_file` into `accumulated_file` on disk.
///
/// When no accumulated file exists yet this reduces to a verbatim copy.
/// Read or parse failures on either file abort the accumulation step.
pub fn merge_into(new_record_file: &Path, accumulated_file: &Path) -> Result<(), PersistError> {
    if !accumulated_file.is_file() {
        debug!(
            path = %accumulated_file.display(),
            "no accumulated build info yet, copying",
        );
        return copy_into(new_record_file, accumulated_file)
            .map_err(|e| PersistError::io(accumulated_file, e));
    }

    let existing = load_record(accumulated_file)?;
    let new = load_record(new_record_file)?;
    let merged = merge_records(existing, new);
    save_record(&merged, accumulated_file)
}
