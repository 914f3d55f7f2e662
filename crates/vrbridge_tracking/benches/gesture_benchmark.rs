//! # Gesture Tick Benchmark
//!
//! Per-tick cost of the tracking path at display rate:
//! 1. Velocity update for three tracked points
//! 2. Gesture classification (all machines, two shortcut slots)
//! 3. Full pose sample from the mock runtime
//!
//! Target: well under 10µs per tick so the 11ms frame budget is untouched.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vrbridge_core::{MockRuntime, TrackedPointId};
use vrbridge_shared::{Quaternion, Vec3};
use vrbridge_tracking::{GestureClassifier, GestureConfig, GestureInput, Pose, PoseSource, VelocityEstimator};

const DT: f32 = 1.0 / 90.0;

fn tracked(position: Vec3) -> Pose {
    Pose { position, rotation: Quaternion::IDENTITY, valid: true }
}

/// Velocity smoothing over a swinging hand
fn bench_velocity(c: &mut Criterion) {
    let mut est = VelocityEstimator::new();
    let mut t = 0.0_f32;
    c.bench_function("velocity_update_3_points", |b| {
        b.iter(|| {
            t += DT;
            let swing = Vec3::new(t.sin(), 1.0 + t.cos(), 0.3);
            for id in TrackedPointId::ALL {
                est.update(id, black_box(swing), DT);
            }
        });
    });
}

/// Classifier with hands idle vs. constantly swinging
fn bench_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture_update");

    for speed in [0.0_f32, 5.0] {
        let mut gestures = GestureClassifier::new(&GestureConfig::default());
        let mut now = 0.0_f64;
        group.bench_with_input(BenchmarkId::new("hand_speed", speed as u32), &speed, |b, &speed| {
            b.iter(|| {
                now += f64::from(DT);
                let input = GestureInput {
                    now,
                    dt: DT,
                    head: tracked(Vec3::new(0.0, 1.7, 0.0)),
                    left: tracked(Vec3::new(-0.3, 1.1, 0.2)),
                    right: tracked(Vec3::new(0.3, 1.1, 0.2)),
                    left_velocity: Vec3::new(0.0, speed, 0.0),
                    right_velocity: Vec3::new(speed, speed, 0.0),
                    ..GestureInput::default()
                };
                black_box(gestures.update(black_box(&input)));
            });
        });
    }

    group.finish();
}

/// Pose sampling through the runtime trait
fn bench_pose_sample(c: &mut Criterion) {
    let runtime = MockRuntime::new();
    for id in TrackedPointId::ALL {
        runtime.set_pose(id, Vec3::new(0.1, 1.4, 0.2), Quaternion::from_yaw_degrees(25.0));
    }
    let mut source = PoseSource::new();
    c.bench_function("pose_sample_3_points", |b| {
        b.iter(|| black_box(source.sample(black_box(&runtime))));
    });
}

criterion_group!(benches, bench_velocity, bench_classifier, bench_pose_sample);
criterion_main!(benches);
