//! Core orchestration layer for opdoc.

use opdoc_config::Config;
use opdoc_ops::{OperationError, Operations};

/// Entry point for higher-level consumers such as the CLI.
pub struct OpDoc {
    ops: Operations,
}

impl OpDoc {
    /// Bootstrap from configuration, loading the configured catalog.
    pub fn bootstrap(config: Config) -> Result<Self, OperationError> {
        Ok(Self {
            ops: Operations::new(config)?,
        })
    }

    /// Access the operation bundle.
    pub fn operations(&self) -> &Operations {
        &self.ops
    }
}
