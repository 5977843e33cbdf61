//! Performance benchmarks for the transform and evaluate path
//!
//! Evaluation is quadratic in batch size (silhouette), so the groups sweep
//! batch sizes up to the recommended per-call ceiling.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use privflow_core::extraction::{CodeDeltaEntry, ConversationEntry, FileChangeEntry};
use privflow_core::{
    ExpressivenessEvaluator, PrivacyConfig, SessionRecord, TraceExtractor, TransformationPipeline,
    Workflow,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const INTENTS: [&str; 5] = ["explore", "implement", "debug", "document", "refactor"];

/// Create a synthetic session record
fn create_test_record(i: usize) -> SessionRecord {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::minutes(i as i64);
    SessionRecord {
        id: Some(format!("session-{}", i)),
        start_time: Some(t0),
        end_time: Some(t0 + Duration::seconds(60 + (i as i64 % 17) * 45)),
        intent: Some(INTENTS[i % INTENTS.len()].to_string()),
        outcome: Some(if i % 3 == 0 { "failure" } else { "success" }.to_string()),
        conversations: Some(vec![ConversationEntry {
            timestamp: Some(t0 + Duration::seconds(5)),
            role: "user".to_string(),
            content: format!(
                "Ask Dana Reyes why test {} fails on /srv/app/data_{}.csv",
                i, i
            ),
            tokens: None,
        }]),
        code_deltas: Some(vec![CodeDeltaEntry {
            timestamp: Some(t0 + Duration::seconds(30)),
            file_path: format!("src/module_{}.py", i % 7),
            change_type: "modified".to_string(),
            before: Some("df = load()".to_string()),
            after: Some(format!("df = load(limit={})", i)),
            diff: Some(format!("-df = load()\n+df = load(limit={})", i)),
            line_count: None,
        }]),
        file_changes: Some(vec![FileChangeEntry {
            timestamp: Some(t0 + Duration::seconds(40)),
            file_path: format!("docs/page_{}.md", i % 5),
            change_type: "modified".to_string(),
            line_range: None,
        }]),
    }
}

fn create_test_workflows(n: usize) -> Vec<Workflow> {
    let records: Vec<SessionRecord> = (0..n).map(create_test_record).collect();
    TraceExtractor::new().extract_batch(&records).workflows
}

/// Benchmark 1: Transformation pipeline
fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    let pipeline = TransformationPipeline::new(&PrivacyConfig::default()).unwrap();

    for size in [10, 100, 1000] {
        let workflows = create_test_workflows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &workflows, |b, w| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| pipeline.transform(black_box(w), &mut rng));
        });
    }

    group.finish();
}

/// Benchmark 2: Expressiveness evaluation
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.sample_size(20);
    let pipeline = TransformationPipeline::new(&PrivacyConfig::default()).unwrap();
    let evaluator = ExpressivenessEvaluator::default();

    for size in [10, 100, 1000] {
        let original = create_test_workflows(size);
        let mut rng = StdRng::seed_from_u64(2);
        let transformed = pipeline.transform(&original, &mut rng);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(original, transformed),
            |b, (o, t)| {
                b.iter(|| evaluator.evaluate(black_box(o), black_box(t), &mut rng).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_transform, bench_evaluate);
criterion_main!(benches);
