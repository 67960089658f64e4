//! Failure injection for the mock repository client

use std::collections::HashMap;

/// Client operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientOp {
    Deploy,
    SendBuildInfo,
}

/// Failure configuration for one operation
#[derive(Debug, Clone)]
pub struct FailureConfig {
    /// Error message to return
    pub message: String,

    /// Fail only the nth call, 1-based (None = every call)
    pub on_call: Option<u32>,
}

impl FailureConfig {
    /// Fail every call with the given message
    pub fn always(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            on_call: None,
        }
    }

    /// Fail only the nth call
    pub fn on_call(n: u32, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            on_call: Some(n),
        }
    }
}

/// Per-operation failure injector
#[derive(Debug, Default)]
pub struct FailureInjector {
    configs: HashMap<ClientOp, FailureConfig>,
    call_counts: HashMap<ClientOp, u32>,
}

impl FailureInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a failure for an operation
    pub fn inject(&mut self, op: ClientOp, config: FailureConfig) {
        self.configs.insert(op, config);
        self.call_counts.insert(op, 0);
    }

    /// Record one call and return the failure message if this call fails
    pub fn check(&mut self, op: ClientOp) -> Option<String> {
        let count = self.call_counts.entry(op).or_insert(0);
        *count += 1;

        let config = self.configs.get(&op)?;
        match config.on_call {
            Some(n) if n != *count => None,
            _ => Some(config.message.clone()),
        }
    }
}
