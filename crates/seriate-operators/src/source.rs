//! In-memory leaf operator serving pre-staged blocks.
//!
//! The leaves of a production execution tree are series scanners over
//! storage; this source stands in for them in demos, benches, and tests
//! while obeying the same contract.

use std::collections::VecDeque;

use seriate_core::block::Block;
use seriate_core::ready::Readiness;

use crate::traits::{Operator, OperatorContext, OperatorResult};

pub struct BlockSourceOperator {
    ctx: OperatorContext,
    blocks: VecDeque<Block>,
}

impl BlockSourceOperator {
    pub fn new(ctx: OperatorContext, blocks: Vec<Block>) -> Self {
        Self {
            ctx,
            blocks: blocks.into(),
        }
    }
}

impl Operator for BlockSourceOperator {
    fn context(&self) -> &OperatorContext {
        &self.ctx
    }

    fn is_ready(&mut self) -> OperatorResult<Readiness> {
        // everything is already in memory
        Ok(Readiness::Ready)
    }

    fn next(&mut self) -> OperatorResult<Option<Block>> {
        Ok(self.blocks.pop_front())
    }

    fn has_next(&mut self) -> OperatorResult<bool> {
        Ok(!self.blocks.is_empty())
    }

    fn is_done(&mut self) -> bool {
        self.blocks.is_empty()
    }

    fn close(&mut self) -> OperatorResult<()> {
        self.blocks.clear();
        Ok(())
    }
}
