use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use line_debugger::debugger::{BreakpointManager, DebuggerEngine, ExecutionTrace, RunOutcome};
use line_debugger::source::{LineTable, SourceRegistry};

/// Every third line executable, as in code with comments and closing braces.
fn sparse_table(len: u32) -> LineTable {
    LineTable::new((1..=len).filter(|line| line % 3 == 1).collect()).unwrap()
}

fn synthetic_script(functions: usize) -> String {
    let mut text = String::new();
    for i in 0..functions {
        text.push_str(&format!(
            "function f{i}() {{\n  // body of f{i}\n  var x = {i};\n  return x + 1;\n}}\n"
        ));
    }
    text
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_table_resolve");
    for len in [100u32, 10_000, 1_000_000] {
        let table = sparse_table(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &table, |b, table| {
            b.iter(|| black_box(table.resolve(black_box(len / 2))))
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let text = synthetic_script(1_000);
    c.bench_function("classify_5000_lines", |b| {
        b.iter(|| black_box(LineTable::from_source_text(black_box(&text))))
    });
}

fn bench_breakpoint_lookup(c: &mut Criterion) {
    let mut registry = SourceRegistry::new();
    let actor = registry.register("bench.js", sparse_table(10_000));
    let mut manager = BreakpointManager::new();
    if let Ok(source) = registry.get(actor) {
        for line in (0..10_000).step_by(100) {
            let _ = manager.place(source, line);
        }
    }

    c.bench_function("should_break_100_set", |b| {
        b.iter(|| black_box(manager.should_break(actor, black_box(5_002))))
    });
}

fn bench_run_to_exit(c: &mut Criterion) {
    c.bench_function("run_1000_steps_with_breakpoint", |b| {
        b.iter(|| {
            let mut engine = DebuggerEngine::new();
            let actor = engine.add_source("bench.js", sparse_table(3_000));
            let lines: Vec<u32> = (1..=3_000).filter(|line| line % 3 == 1).collect();
            engine
                .set_debuggee(Box::new(ExecutionTrace::from_lines(actor, &lines, &[])))
                .unwrap();
            engine.set_breakpoint(actor, 1_500).unwrap();
            while engine.resume().unwrap() != RunOutcome::Exited {}
            black_box(engine.pause_count())
        })
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_classify,
    bench_breakpoint_lookup,
    bench_run_to_exit
);
criterion_main!(benches);
