//! Mock repository client
//!
//! Implements a recording, failure-injecting repository client for tests.
//! The mock shares its state behind an `Arc`, so a test can keep a clone,
//! hand another clone to the pipeline's client factory, and inspect the
//! call log after the run.

mod client;
mod failure;

pub use client::{ClientCall, MockRepositoryClient};
pub use failure::{ClientOp, FailureConfig, FailureInjector};
