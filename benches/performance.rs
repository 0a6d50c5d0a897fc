use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reqgraph::config::AnalysisConfig;
use reqgraph::formatters::GraphTextFormatter;
use std::path::Path;
use tempfile::TempDir;

fn write_modules(dir: &Path, count: usize) {
    for i in 0..count {
        let base = if i == 0 {
            String::new()
        } else {
            format!("from module_{} import Service{}\n", i - 1, i - 1)
        };
        let parent = if i == 0 {
            String::new()
        } else {
            format!("(Service{})", i - 1)
        };
        let content = format!(
            r#"{base}
class Service{i}{parent}:
    """Service number {i}."""

    def __init__(self, value: int = {i}):
        self.value = value

    def process(self) -> int:
        return self.calculate() * 2

    def calculate(self) -> int:
        return helper_{i}(self.value) + 10


def helper_{i}(value):
    return value


def main():
    instance = Service{i}()
    return instance.process()
"#
        );
        std::fs::write(dir.join(format!("module_{}.py", i)), content).unwrap();
    }
}

fn benchmark_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("codebase_analysis");

    let small = TempDir::new().unwrap();
    write_modules(small.path(), 10);

    group.bench_function("small_codebase", |b| {
        let config = AnalysisConfig::default();
        b.iter(|| {
            let run = reqgraph::run_analysis(black_box(small.path()), &config).unwrap();
            black_box(run)
        });
    });

    let large = TempDir::new().unwrap();
    write_modules(large.path(), 200);

    group.bench_function("large_codebase", |b| {
        let config = AnalysisConfig::default();
        b.iter(|| {
            let run = reqgraph::run_analysis(black_box(large.path()), &config).unwrap();
            black_box(run)
        });
    });

    group.bench_function("large_codebase_sequential", |b| {
        let config = AnalysisConfig {
            parallel: false,
            ..AnalysisConfig::default()
        };
        b.iter(|| {
            let run = reqgraph::run_analysis(black_box(large.path()), &config).unwrap();
            black_box(run)
        });
    });

    group.finish();
}

fn benchmark_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");

    let dir = TempDir::new().unwrap();
    write_modules(dir.path(), 100);
    let run = reqgraph::run_analysis(dir.path(), &AnalysisConfig::default()).unwrap();
    let formatter = GraphTextFormatter::new();

    group.bench_function("graph_text", |b| {
        b.iter(|| black_box(formatter.format_graph(black_box(&run.graph))));
    });

    group.bench_function("graph_dot", |b| {
        b.iter(|| black_box(formatter.format_dot(black_box(&run.graph))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_analysis, benchmark_formatting);
criterion_main!(benches);
