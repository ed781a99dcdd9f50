//! Per-child consumption bookkeeping.

use seriate_core::block::Block;

/// How far one child's buffered block has been consumed.
///
/// `read_index` is the committed cursor. `shadow_index` is the scratch
/// cursor column mergers advance during one merge pass: the operator
/// rewinds every shadow to the committed index before the pass and commits
/// shadow over read only after all mergers of the batch have run, so each
/// merger walks the same starting snapshot.
#[derive(Debug, Default)]
pub struct ChildCursor {
    block: Option<Block>,
    read_index: usize,
    shadow_index: usize,
    exhausted: bool,
}

impl ChildCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing is buffered: no block, or the block fully read.
    pub fn is_consumed(&self) -> bool {
        match &self.block {
            None => true,
            Some(b) => self.read_index == b.position_count(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }

    pub fn shadow_index(&self) -> usize {
        self.shadow_index
    }

    /// Record how far a merger advanced this child during the current
    /// pass. Only the shadow moves; `read_index` is committed by the
    /// operator once the whole batch is assembled.
    pub fn set_shadow_index(&mut self, idx: usize) {
        self.shadow_index = idx;
    }

    /// Buffer a freshly pulled block, rewinding both cursors.
    pub(crate) fn stage(&mut self, block: Block) {
        self.read_index = 0;
        self.shadow_index = 0;
        self.block = Some(block);
    }

    pub(crate) fn mark_exhausted(&mut self) {
        self.exhausted = true;
        self.block = None;
    }

    /// End-time of the buffered block; `None` when consumed.
    pub(crate) fn end_time(&self) -> Option<i64> {
        if self.is_consumed() {
            None
        } else {
            self.block.as_ref().and_then(Block::end_time)
        }
    }

    pub(crate) fn begin_pass(&mut self) {
        self.shadow_index = self.read_index;
    }

    pub(crate) fn commit(&mut self) {
        self.read_index = self.shadow_index;
    }
}
