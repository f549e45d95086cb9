//! Criterion benchmarks for the graph executor's per-period hot path
//! (§4.4, §10.4: "wall-clock regression is" the thing a benchmark can
//! actually assert; the no-allocation contract itself is a manual review
//! property).
//!
//! Run with: `cargo bench -p filterchain-graph -- executor/`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use filterchain_graph::{GraphBuilder, GraphDescription, GraphPlanner, PeriodIo, PlanParams};
use filterchain_registry::PluginRegistry;

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn plan_graph(json: &str, capture: usize, playback: usize) -> filterchain_graph::Graph {
    let registry = PluginRegistry::new();
    let description: GraphDescription = serde_json::from_str(json).unwrap();
    let draft = GraphBuilder::new(&registry).build(&description).unwrap();
    GraphPlanner::new(&registry)
        .plan(draft, PlanParams { sample_rate: SAMPLE_RATE, capture_channels: capture, playback_channels: playback })
        .unwrap()
}

fn linear_chain_json(n: usize) -> String {
    let nodes: Vec<String> = (0..n).map(|i| format!(r#"{{"type":"builtin","name":"n{i}","label":"copy"}}"#)).collect();
    let links: Vec<String> =
        (0..n - 1).map(|i| format!(r#"{{"output":"n{i}:Out","input":"n{}:In"}}"#, i + 1)).collect();
    format!(
        r#"{{"nodes":[{}],"links":[{}],"inputs":["n0:In"],"outputs":["n{}:Out"]}}"#,
        nodes.join(","),
        links.join(","),
        n - 1
    )
}

fn diamond_json() -> &'static str {
    r#"{
        "nodes": [
            { "type": "builtin", "name": "split", "label": "copy" },
            { "type": "builtin", "name": "lo", "label": "bq_lowpass" },
            { "type": "builtin", "name": "hi", "label": "bq_highpass" },
            { "type": "builtin", "name": "mix", "label": "mixer" }
        ],
        "links": [
            { "output": "split:Out", "input": "lo:In" },
            { "output": "split:Out", "input": "hi:In" },
            { "output": "lo:Out", "input": "mix:In 1" },
            { "output": "hi:Out", "input": "mix:In 2" }
        ],
        "inputs": ["split:In"],
        "outputs": ["mix:Out"]
    }"#
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor/plan");

    group.bench_function("linear_5", |b| {
        let json = linear_chain_json(5);
        b.iter(|| black_box(plan_graph(&json, 1, 1)));
    });

    group.bench_function("linear_20", |b| {
        let json = linear_chain_json(20);
        b.iter(|| black_box(plan_graph(&json, 1, 1)));
    });

    group.bench_function("diamond", |b| {
        b.iter(|| black_box(plan_graph(diamond_json(), 1, 1)));
    });

    group.finish();
}

fn run_one_period(graph: &mut filterchain_graph::Graph, block_size: usize, capture_channels: usize, playback_channels: usize) {
    let capture_data: Vec<Vec<f32>> = (0..capture_channels).map(|_| vec![0.5f32; block_size]).collect();
    let mut playback_data: Vec<Vec<f32>> = (0..playback_channels).map(|_| vec![0.0f32; block_size]).collect();
    let capture: Vec<&[f32]> = capture_data.iter().map(Vec::as_slice).collect();
    let mut playback: Vec<&mut [f32]> = playback_data.iter_mut().map(Vec::as_mut_slice).collect();
    graph.run_period(PeriodIo { capture: &capture, playback: &mut playback });
}

fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor/execute");
    const BLOCK: usize = 256;

    {
        let mut graph = plan_graph(&linear_chain_json(5), 1, 1);
        group.bench_function("linear_5_block256", |b| b.iter(|| run_one_period(&mut graph, BLOCK, 1, 1)));
    }
    {
        let mut graph = plan_graph(&linear_chain_json(20), 1, 1);
        group.bench_function("linear_20_block256", |b| b.iter(|| run_one_period(&mut graph, BLOCK, 1, 1)));
    }
    {
        let mut graph = plan_graph(diamond_json(), 1, 1);
        group.bench_function("diamond_block256", |b| b.iter(|| run_one_period(&mut graph, BLOCK, 1, 1)));
    }
    {
        let mut graph = plan_graph(&linear_chain_json(5), 4, 4);
        group.bench_function("linear_5_nhndl4_block256", |b| b.iter(|| run_one_period(&mut graph, BLOCK, 4, 4)));
    }

    group.finish();
}

fn bench_block_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor/block_sweep");

    for &block_size in BLOCK_SIZES {
        let mut graph = plan_graph(&linear_chain_json(5), 1, 1);
        group.bench_with_input(BenchmarkId::new("linear_5", block_size), &block_size, |b, &block_size| {
            b.iter(|| run_one_period(&mut graph, block_size, 1, 1));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan, bench_execute, bench_block_sweep);
criterion_main!(benches);
