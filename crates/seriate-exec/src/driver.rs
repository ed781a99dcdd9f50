//! Cooperative driver: polls one operator tree to completion.
//!
//! Stalls surface as `Readiness::Pending` wake handles; the driver parks
//! on the handle and re-polls. A single tree instance is driven from one
//! thread; many drivers may run concurrently on independent trees.

use thiserror::Error;
use tracing::debug;

use seriate_core::block::Block;
use seriate_core::config::EngineConfig;
use seriate_core::error::Error as CoreError;
use seriate_core::ready::Readiness;
use seriate_operators::traits::{Operator, OperatorError};

use crate::metrics::DriverMetrics;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("engine configuration: {0}")]
    Config(#[source] CoreError),

    #[error(transparent)]
    Operator(#[from] OperatorError),
}

pub struct Driver {
    root: Box<dyn Operator>,
    config: EngineConfig,
    metrics: DriverMetrics,
}

impl Driver {
    pub fn new(root: Box<dyn Operator>, config: EngineConfig) -> Result<Self, DriveError> {
        config.validate().map_err(DriveError::Config)?;
        Ok(Self {
            root,
            config,
            metrics: DriverMetrics::default(),
        })
    }

    pub fn metrics(&self) -> &DriverMetrics {
        &self.metrics
    }

    /// Drive the tree to completion, collecting every non-empty output
    /// block. The root is always closed, succeed or fail; a drive error
    /// takes precedence over a close error.
    pub fn run(&mut self) -> Result<Vec<Block>, DriveError> {
        let outcome = self.drive();
        let closed = self.root.close();
        let blocks = outcome?;
        closed?;
        debug!(
            query = %self.root.context().query_id(),
            batches = self.metrics.batches,
            rows = self.metrics.rows,
            waits = self.metrics.pending_waits,
            "query drained"
        );
        Ok(blocks)
    }

    fn drive(&mut self) -> Result<Vec<Block>, DriveError> {
        let park = self.config.poll_park();
        let mut out = Vec::new();
        while !self.root.is_done() {
            match self.root.is_ready()? {
                Readiness::Pending(signal) => {
                    self.metrics.pending_waits += 1;
                    signal.wait(park);
                    continue;
                }
                Readiness::Ready => {}
            }
            if !self.root.has_next()? {
                break;
            }
            match self.root.next()? {
                Some(block) if !block.is_empty() => {
                    self.metrics.record_batch(block.position_count());
                    out.push(block);
                }
                Some(_) => self.metrics.empty_batches += 1,
                None => self.metrics.yields += 1,
            }
        }
        Ok(out)
    }
}
