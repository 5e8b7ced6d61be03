use chrono::{FixedOffset, NaiveDate, TimeDelta};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use ticket_chart::core::path::polyline_path;
use ticket_chart::core::{
    BreakSpec, DataPoint, Granularity, Record, Scale, bucket_index_scale, bucketize,
    make_broken_scale, make_linear_scale, project_line,
};

fn generated_records(count: usize) -> Vec<Record> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time");
    (0..count)
        .map(|i| {
            let time = base + TimeDelta::minutes((i as i64 * 37) % (365 * 24 * 60));
            Record::new()
                .with_field("created_at", time.format("%Y-%m-%d %H:%M:%S").to_string())
                .with_field("resolution_time", format!("00:{:02}:00", i % 60))
        })
        .collect()
}

fn bench_bucketize_10k(c: &mut Criterion) {
    let records = generated_records(10_000);
    let kst = FixedOffset::east_opt(9 * 3600).expect("valid offset");

    c.bench_function("bucketize_daily_10k", |b| {
        b.iter(|| {
            let _ = bucketize(
                black_box(&records),
                Granularity::Daily,
                "created_at",
                black_box(&kst),
            );
        })
    });
}

fn bench_broken_scale_map(c: &mut Criterion) {
    let primary = [100.0, 80.0, 5.0, 4.0, 3.0, 2.0];
    let other = [10.0, 12.0, 8.0, 6.0, 5.0, 4.0];
    let scale = make_broken_scale((0.0, 100.0), (300.0, 0.0), &BreakSpec::new(&primary, &[&other]));

    c.bench_function("broken_scale_map_round_trip", |b| {
        b.iter(|| {
            let px = scale.map(black_box(42.5));
            let _ = scale.invert(px);
        })
    });
}

fn bench_line_projection_10k(c: &mut Criterion) {
    let points: Vec<DataPoint> = (0..10_000)
        .map(|i| DataPoint::new(i as f64, 100.0 + (i % 97) as f64))
        .collect();
    let x_scale: Scale = bucket_index_scale(points.len(), (0.0, 1920.0)).into();
    let y_scale = make_linear_scale((0.0, 200.0), (1080.0, 0.0));

    c.bench_function("line_projection_10k", |b| {
        b.iter(|| {
            let _ = project_line(black_box(&points), black_box(&x_scale), black_box(&y_scale));
        })
    });
}

fn bench_path_emission_10k(c: &mut Criterion) {
    let coords: Vec<(f64, f64)> = (0..10_000)
        .map(|i| (i as f64 * 0.192, 540.0 + (i % 113) as f64 * 1.37))
        .collect();

    c.bench_function("polyline_path_10k", |b| {
        b.iter(|| {
            let _ = polyline_path(black_box(coords.iter().copied()));
        })
    });
}

criterion_group!(
    benches,
    bench_bucketize_10k,
    bench_broken_scale_map,
    bench_line_projection_10k,
    bench_path_emission_10k
);
criterion_main!(benches);
