use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use seriate_core::block::{Block, BlockBuilder};
use seriate_core::config::EngineConfig;
use seriate_core::id::{OperatorId, QueryId};
use seriate_core::schema::DataType;
use seriate_core::value::Value;
use seriate_exec::Driver;
use seriate_operators::{
    BlockSourceOperator, ColumnMerger, DirectMerger, InputLocation, MergeOrder, Operator,
    OperatorContext, TimeMergeOperator,
};

const CHILDREN: usize = 8;
const BLOCKS_PER_CHILD: usize = 16;
const ROWS_PER_BLOCK: usize = 256;

fn ctx(name: &'static str, id: u64) -> OperatorContext {
    OperatorContext::new(OperatorId::new(id), QueryId::generate(), name)
}

/// Child `k` covers timestamps k, k+CHILDREN, k+2*CHILDREN, ... so the
/// merged stream interleaves every child.
fn make_child_blocks(k: usize) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(BLOCKS_PER_CHILD);
    for b in 0..BLOCKS_PER_CHILD {
        let mut builder = BlockBuilder::new(&[DataType::Double]);
        for r in 0..ROWS_PER_BLOCK {
            let t = ((b * ROWS_PER_BLOCK + r) * CHILDREN + k) as i64;
            builder.append_timestamp(t);
            builder
                .column_builder(0)
                .append_value(Value::Double(t as f64))
                .expect("cell");
        }
        blocks.push(builder.build().expect("block"));
    }
    blocks
}

fn bench_time_merge(c: &mut Criterion) {
    let staged: Vec<Vec<Block>> = (0..CHILDREN).map(make_child_blocks).collect();

    c.bench_function("time_merge_8x16x256", |b| {
        b.iter_batched(
            || {
                let children: Vec<Box<dyn Operator>> = staged
                    .iter()
                    .enumerate()
                    .map(|(k, blocks)| {
                        Box::new(BlockSourceOperator::new(
                            ctx("scan", k as u64 + 1),
                            blocks.clone(),
                        )) as Box<dyn Operator>
                    })
                    .collect();
                let mergers: Vec<Box<dyn ColumnMerger>> = (0..CHILDREN)
                    .map(|k| {
                        Box::new(DirectMerger::new(InputLocation::new(k, 0)))
                            as Box<dyn ColumnMerger>
                    })
                    .collect();
                let merge = TimeMergeOperator::new(
                    ctx("merge", 0),
                    children,
                    MergeOrder::Ascending,
                    vec![DataType::Double; CHILDREN],
                    mergers,
                )
                .expect("construct merge");
                Driver::new(Box::new(merge), EngineConfig::default()).expect("driver")
            },
            |mut driver| driver.run().expect("run"),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_time_merge);
criterion_main!(benches);
