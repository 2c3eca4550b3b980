use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use recoverrs::{ScoringEngine, WorkoutSample};

/// Throughput of the scoring pipeline over growing batches

fn create_sessions(count: usize) -> Vec<WorkoutSample> {
    (0..count)
        .map(|i| WorkoutSample {
            duration_min: 30.0 + (i % 5) as f64 * 15.0,
            avg_hr: Some(120 + (i % 40) as u16),
            max_hr: Some(190),
            sleep_hours: 6.0 + (i % 4) as f64 * 0.5,
            temp_c: Some(18.0 + (i % 12) as f64),
            humidity: Some(40.0 + (i % 30) as f64),
            last7_load: 300.0 + (i % 7) as f64 * 20.0,
            last28_load: 1400.0,
            hi_streak_days: (i % 4) as u32,
            ..WorkoutSample::default()
        })
        .collect()
}

fn bench_predict(c: &mut Criterion) {
    let engine = ScoringEngine::new();
    let mut group = c.benchmark_group("Predict");

    for &size in &[1, 100, 1000] {
        let sessions = create_sessions(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("predict", size), &sessions, |b, sessions| {
            b.iter(|| {
                for sample in sessions {
                    black_box(engine.predict(black_box(sample)));
                }
            });
        });
    }

    group.finish();
}

fn bench_weekly_report(c: &mut Criterion) {
    let engine = ScoringEngine::new();
    let mut group = c.benchmark_group("Weekly Report");

    for &days in &[0, 7, 28] {
        let sessions = create_sessions(days);

        group.bench_with_input(BenchmarkId::new("weekly_report", days), &sessions, |b, sessions| {
            b.iter(|| black_box(engine.weekly_report(black_box(sessions))));
        });
    }

    group.finish();
}

fn bench_roi_curve(c: &mut Criterion) {
    let engine = ScoringEngine::new();

    c.bench_function("roi_for_rest sweep", |b| {
        b.iter(|| {
            for minutes in (0..=600).step_by(15) {
                black_box(engine.roi_for_rest(black_box(72), minutes, 6.5));
            }
        });
    });
}

criterion_group!(benches, bench_predict, bench_weekly_report, bench_roi_curve);
criterion_main!(benches);
