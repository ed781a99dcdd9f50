//! Engine configuration that downstream crates can serialize/deserialize.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on rows per block produced by leaf sources.
    pub block_capacity: usize,

    /// Interval (microseconds) the driver parks between readiness polls
    /// while waiting on a pending child.
    pub poll_park_micros: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_capacity: 1024,
            poll_park_micros: 100,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.block_capacity == 0 {
            return Err(Error::Config("block_capacity must be positive".into()));
        }
        if self.poll_park_micros == 0 {
            return Err(Error::Config("poll_park_micros must be positive".into()));
        }
        Ok(())
    }

    pub fn poll_park(&self) -> Duration {
        Duration::from_micros(self.poll_park_micros)
    }
}
