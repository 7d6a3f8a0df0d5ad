use criterion::{black_box, criterion_group, criterion_main, Criterion};
use warden_state::{ResourceVector, SafetyAnalyzer, Snapshot};

/// Synthetic safe snapshot: every process needs one unit of each resource
/// beyond what it holds, and one unit of everything is available
fn synthetic(processes: usize, resources: usize) -> Snapshot {
    let available: ResourceVector = vec![1; resources];
    let maximum: Vec<ResourceVector> = (0..processes)
        .map(|p| vec![(p as u64 % 4) + 1; resources])
        .collect();
    let allocation: Vec<ResourceVector> = (0..processes)
        .map(|p| vec![p as u64 % 4; resources])
        .collect();
    Snapshot::new(available, maximum, allocation).unwrap()
}

fn bench_find_safe_sequence(c: &mut Criterion) {
    let analyzer = SafetyAnalyzer::new();
    for (processes, resources) in [(5, 3), (50, 10), (500, 20)] {
        let snapshot = synthetic(processes, resources);
        c.bench_function(&format!("find_safe_sequence {}x{}", processes, resources), |b| {
            b.iter(|| analyzer.find_safe_sequence(black_box(&snapshot)))
        });
    }
}

fn bench_snapshot_validation(c: &mut Criterion) {
    let template = synthetic(100, 10);
    c.bench_function("Snapshot::new 100x10", |b| {
        b.iter(|| {
            Snapshot::new(
                black_box(template.available().to_vec()),
                black_box(template.maximum().to_vec()),
                black_box(template.allocation().to_vec()),
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_find_safe_sequence, bench_snapshot_validation);
criterion_main!(benches);
