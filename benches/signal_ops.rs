use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xcorrprep::signal_ops::{boxcar_mean, get_top_ions, make_corr_data, peak_extract, smooth};

fn synthetic_raw_data(array_size: usize) -> Vec<f64> {
    (0..array_size)
        .map(|i| {
            let base = (i as f64 * 0.013).sin().abs() * 100.0;
            if i % 37 == 0 {
                base + 400.0
            } else {
                base
            }
        })
        .collect()
}

fn bench_make_corr_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_corr_data");

    for array_size in [2_000usize, 8_000, 20_000] {
        group.throughput(Throughput::Elements(array_size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(array_size),
            &array_size,
            |b, &array_size| {
                let mut raw = synthetic_raw_data(array_size);
                let mut corr = vec![0.0; array_size];
                let highest_ion = array_size as i32 - 1;

                b.iter(|| {
                    let highest_intensity = raw.iter().cloned().fold(0.0f64, f64::max);
                    make_corr_data(
                        black_box(&mut raw),
                        black_box(&mut corr),
                        black_box(highest_ion),
                        black_box(highest_intensity),
                    );
                });
            },
        );
    }

    group.finish();
}

fn bench_boxcar_mean(c: &mut Criterion) {
    let mut group = c.benchmark_group("boxcar_mean");

    for array_size in [2_000usize, 8_000, 20_000] {
        group.throughput(Throughput::Elements(array_size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(array_size),
            &array_size,
            |b, &array_size| {
                let corr = synthetic_raw_data(array_size);
                let mut mean_around = vec![0.0; array_size];

                b.iter(|| {
                    boxcar_mean(black_box(&corr), black_box(&mut mean_around));
                });
            },
        );
    }

    group.finish();
}

fn bench_peak_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("peak_extract");

    for array_size in [2_000usize, 8_000] {
        group.throughput(Throughput::Elements(array_size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(array_size),
            &array_size,
            |b, &array_size| {
                let template = synthetic_raw_data(array_size);
                let mut scratch = vec![0.0; array_size];
                let mut extracted = vec![0.0; array_size];

                b.iter(|| {
                    let mut data = template.clone();
                    smooth(black_box(&mut data), black_box(&mut scratch));
                    extracted.fill(0.0);
                    peak_extract(black_box(&mut data), black_box(&mut extracted));
                });
            },
        );
    }

    group.finish();
}

fn bench_get_top_ions(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_top_ions");

    for array_size in [2_000usize, 8_000, 20_000] {
        group.throughput(Throughput::Elements(array_size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(array_size),
            &array_size,
            |b, &array_size| {
                let raw = synthetic_raw_data(array_size);
                b.iter(|| {
                    black_box(get_top_ions(black_box(&raw)));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_make_corr_data,
    bench_boxcar_mean,
    bench_peak_extract,
    bench_get_top_ions
);
criterion_main!(benches);
