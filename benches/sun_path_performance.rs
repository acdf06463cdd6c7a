use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use glam::DVec3;
use std::hint::black_box;
use sunpath::{
    AnalysisWindow, ConditionMask, HourlySeries, Location, North, SolarPositionEngine, SunPath,
    SunPathRequest, TimeStep, condition, path, sampler, time::TimeInstant,
};

fn engine() -> SolarPositionEngine {
    let location = Location::new(37.7749, -122.4194, -8.0).unwrap().value;
    SolarPositionEngine::new(location, North::Angle(12.0), DVec3::ZERO, 200.0)
}

fn annual_series(name: &str, f: impl Fn(usize) -> f64) -> HourlySeries {
    HourlySeries::annual(name, "-", (0..8760).map(f).collect())
}

fn benchmark_single_position(c: &mut Criterion) {
    let engine = engine();
    let instant = TimeInstant::new(6, 21, 12.5);

    c.bench_function("compute_at_single", |b| {
        b.iter(|| engine.compute_at(black_box(instant)))
    });
}

fn benchmark_whole_year_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("whole_year_sampling");
    let engine = engine();
    let window = AnalysisWindow::whole_year();
    let mask = ConditionMask::all();

    for steps in [1.0, 4.0, 12.0] {
        let step = TimeStep::snap(steps).value;
        group.throughput(Throughput::Elements(8760 * u64::from(step.steps_per_hour())));
        group.bench_with_input(
            BenchmarkId::new("steps_per_hour", step.steps_per_hour()),
            &step,
            |b, &step| b.iter(|| sampler::sample(&engine, black_box(&window), step, &mask)),
        );
    }
    group.finish();
}

fn benchmark_condition_compile(c: &mut Criterion) {
    let series = vec![
        annual_series("Temperature", |h| (h % 40) as f64),
        annual_series("Humidity", |h| (h % 100) as f64),
    ];

    c.bench_function("condition_two_series", |b| {
        b.iter(|| condition::compile(black_box("18<a<23 and b<80"), &series).unwrap())
    });
    c.bench_function("condition_arithmetic", |b| {
        b.iter(|| condition::compile(black_box("(a - b / 4) * 2 > 10 or not a"), &series).unwrap())
    });
}

fn benchmark_curves(c: &mut Criterion) {
    let engine = engine();

    c.bench_function("daily_path", |b| {
        b.iter(|| path::daily_path(&engine, black_box(6), black_box(21)))
    });
    c.bench_function("annual_path", |b| b.iter(|| path::annual_path(black_box(&engine))));
}

fn benchmark_full_computation(c: &mut Criterion) {
    let request = SunPathRequest {
        window: AnalysisWindow::whole_year(),
        condition: Some("a > 25".to_string()),
        series: vec![
            annual_series("Temperature", |h| (h % 40) as f64),
            annual_series("Radiation", |h| ((h % 24) * 50) as f64),
        ],
        annual_path: true,
        ..SunPathRequest::at(37.7749, -122.4194, -8.0)
    };

    c.bench_function("sun_path_whole_year_two_datasets", |b| {
        b.iter(|| SunPath::compute(black_box(&request)).unwrap())
    });
}

criterion_group!(
    benches,
    benchmark_single_position,
    benchmark_whole_year_sampling,
    benchmark_condition_compile,
    benchmark_curves,
    benchmark_full_computation
);
criterion_main!(benches);
