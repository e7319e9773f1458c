//! Benchmarks for canal-surface meshing and intersection-system
//! construction.
//!
//! Run with: cargo bench -p mesh-canal

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mesh_canal::{CanalMesh, ConstantRadius, LinearCanal, MeshParams};
use mesh_canal::{BezierSpine, CanalSurface};
use nalgebra::Point3;

fn arch_spine() -> BezierSpine {
    BezierSpine::from_control_points(&[
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 4.0, 1.0),
        Point3::new(6.0, 4.0, -1.0),
        Point3::new(8.0, 0.0, 0.0),
    ])
    .unwrap()
}

fn bench_generate_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_mesh");
    for segments in [8u32, 16, 32] {
        let canal = CanalSurface::new(arch_spine(), ConstantRadius::new(0.25));
        let params = MeshParams::default().with_phi_segments(segments);
        group.bench_function(format!("segments_{segments}"), |b| {
            b.iter(|| {
                let mut mesh = CanalMesh::new();
                canal
                    .generate_mesh(black_box(&mut mesh), &params, None, true)
                    .unwrap();
                mesh
            });
        });
    }
    group.finish();
}

fn bench_intersection_systems(c: &mut Criterion) {
    let canal = LinearCanal::new(arch_spine(), 0.25, 0.5);

    c.bench_function("self_intersection_system", |b| {
        b.iter(|| black_box(&canal).self_intersection_system());
    });

    c.bench_function("local_self_intersection_check", |b| {
        b.iter(|| black_box(&canal).local_self_intersection_check(1e-6));
    });
}

criterion_group!(benches, bench_generate_mesh, bench_intersection_systems);
criterion_main!(benches);
