//! # Velocity Limiter Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use drive_lib::vel_limiter::{Params, VelLimiter, Vector};

fn vel_limiter_benchmark(c: &mut Criterion) {
    // ---- Build the limiter ----

    let limiter = VelLimiter::new(Params {
        wheel_separation_m: 0.5,
        has_velocity_limits: true,
        has_acceleration_limits: true,
        vel_x_max_ms: 1.0,
        vel_th_max_rads: 2.0,
        acc_x_max_mss: 0.5,
        acc_x_min_mss: -1.0,
        acc_th_max_radss: 1.5,
    })
    .unwrap();

    // A command needing both stages to limit it
    let vel_cmd = Vector::new(2.0, 1.5);
    let vel_cmd_prev = Vector::new(0.3, -0.2);

    c.bench_function("VelLimiter::limit", |b| {
        b.iter(|| limiter.limit(black_box(vel_cmd), black_box(vel_cmd_prev), black_box(0.01)))
    });

    // A command within all limits
    let vel_cmd = Vector::new(0.301, -0.2);

    c.bench_function("VelLimiter::limit::unlimited", |b| {
        b.iter(|| limiter.limit(black_box(vel_cmd), black_box(vel_cmd_prev), black_box(0.01)))
    });
}

criterion_group!(benches, vel_limiter_benchmark);
criterion_main!(benches);
