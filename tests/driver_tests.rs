//! End-to-end: the cooperative driver over a merge tree.


use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use seriate_core::block::Block;
use seriate_core::config::EngineConfig;
use seriate_core::ready::{Readiness, WakeSignal};
use seriate_core::schema::DataType;
use seriate_core::value::Value;
use seriate_exec::{DriveError, Driver};
use seriate_operators::traits::{Operator, OperatorContext, OperatorResult};
use seriate_operators::{
    BlockSourceOperator, DirectMerger, InputLocation, MergeOrder, TimeMergeOperator,
};
use test_support::{i64_block, mk_context};

fn merge_of(children: Vec<Box<dyn Operator>>) -> TimeMergeOperator {
    let mergers = (0..children.len())
        .map(|i| {
            Box::new(DirectMerger::new(InputLocation::new(i, 0)))
                as Box<dyn seriate_operators::ColumnMerger>
        })
        .collect();
    let types = vec![DataType::Int64; children.len()];
    TimeMergeOperator::new(
        mk_context("merge", 0),
        children,
        MergeOrder::Ascending,
        types,
        mergers,
    )
    .expect("construct merge")
}

#[test]
fn test_driver_drains_merge_tree() {
    let child1 = BlockSourceOperator::new(
        mk_context("scan1", 1),
        vec![i64_block(&[(1, 10), (4, 40)]), i64_block(&[(6, 60)])],
    );
    let child2 = BlockSourceOperator::new(
        mk_context("scan2", 2),
        vec![i64_block(&[(2, 20), (5, 50)])],
    );
    let merge = merge_of(vec![Box::new(child1), Box::new(child2)]);

    let mut driver = Driver::new(Box::new(merge), EngineConfig::default()).expect("driver");
    let blocks = driver.run().expect("run");

    let times: Vec<i64> = blocks
        .iter()
        .flat_map(|b| b.timestamps().to_vec())
        .collect();
    assert_eq!(times, vec![1, 2, 4, 5, 6]);

    let metrics = driver.metrics();
    assert_eq!(metrics.batches, blocks.len() as u64);
    assert_eq!(metrics.rows, 5);
}

/// Source whose single block arrives from another thread; until then it is
/// pending and hands out a wake signal.
struct GatedSource {
    ctx: OperatorContext,
    inbox: Arc<Mutex<VecDeque<Block>>>,
    signal: WakeSignal,
    expected: usize,
    delivered: usize,
}

impl GatedSource {
    fn new(id: u64, inbox: Arc<Mutex<VecDeque<Block>>>, signal: WakeSignal, expected: usize) -> Self {
        Self {
            ctx: mk_context("gated", id),
            inbox,
            signal,
            expected,
            delivered: 0,
        }
    }

    fn buffered(&self) -> bool {
        !self.inbox.lock().expect("inbox lock").is_empty()
    }
}

impl Operator for GatedSource {
    fn context(&self) -> &OperatorContext {
        &self.ctx
    }

    fn is_ready(&mut self) -> OperatorResult<Readiness> {
        if self.delivered == self.expected || self.buffered() {
            Ok(Readiness::Ready)
        } else {
            Ok(Readiness::Pending(self.signal.clone()))
        }
    }

    fn next(&mut self) -> OperatorResult<Option<Block>> {
        let block = self.inbox.lock().expect("inbox lock").pop_front();
        if block.is_some() {
            self.delivered += 1;
        }
        Ok(block)
    }

    fn has_next(&mut self) -> OperatorResult<bool> {
        Ok(self.delivered < self.expected)
    }

    fn is_done(&mut self) -> bool {
        self.delivered == self.expected
    }

    fn close(&mut self) -> OperatorResult<()> {
        Ok(())
    }
}

#[test]
fn test_driver_waits_for_late_child() {
    let inbox = Arc::new(Mutex::new(VecDeque::new()));
    let signal = WakeSignal::new();
    let gated = GatedSource::new(1, Arc::clone(&inbox), signal.clone(), 1);
    let steady = BlockSourceOperator::new(
        mk_context("scan", 2),
        vec![i64_block(&[(2, 20), (3, 30)])],
    );
    let merge = merge_of(vec![Box::new(gated), Box::new(steady)]);

    let producer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        inbox
            .lock()
            .expect("inbox lock")
            .push_back(i64_block(&[(1, 100), (3, 300)]));
        signal.notify();
    });

    let mut driver = Driver::new(Box::new(merge), EngineConfig::default()).expect("driver");
    let blocks = driver.run().expect("run");
    producer.join().expect("producer thread");

    let rows: Vec<(i64, Vec<Value>)> = blocks
        .iter()
        .flat_map(|b| {
            (0..b.position_count()).map(move |r| {
                (
                    b.timestamp(r),
                    (0..b.column_count()).map(|c| b.column(c).value(r)).collect(),
                )
            })
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, vec![Value::Int64(100), Value::Null]),
            (2, vec![Value::Null, Value::Int64(20)]),
            (3, vec![Value::Int64(300), Value::Int64(30)]),
        ]
    );
    assert!(driver.metrics().pending_waits >= 1, "driver parked at least once");
}

#[test]
fn test_driver_rejects_invalid_config() {
    let child = BlockSourceOperator::new(mk_context("scan", 1), vec![]);
    let merge = merge_of(vec![Box::new(child)]);
    let cfg = EngineConfig {
        block_capacity: 0,
        ..EngineConfig::default()
    };
    let err = Driver::new(Box::new(merge), cfg).err().expect("invalid config");
    assert!(matches!(err, DriveError::Config(_)));
}
