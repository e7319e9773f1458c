//! End-to-end meshing scenarios: regular cylinders, cap fans, and chained
//! segments.

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use mesh_canal::{
    BezierSpine, CanalMesh, CanalSurface, ConstantRadius, Face, MeshParams, StartRing,
};
use nalgebra::Point3;

const N: usize = 8;

/// Collinear, evenly spaced control points: gamma(t) = (3t, 0, 0).
fn straight_spine(x0: f64) -> BezierSpine {
    BezierSpine::from_control_points(&[
        Point3::new(x0, 0.0, 0.0),
        Point3::new(x0 + 1.0, 0.0, 0.0),
        Point3::new(x0 + 2.0, 0.0, 0.0),
        Point3::new(x0 + 3.0, 0.0, 0.0),
    ])
    .unwrap()
}

fn params() -> MeshParams {
    MeshParams::default()
        .with_phi_segments(N as u32)
        .with_triangle_height_factor(1.0)
}

#[test]
fn regular_cylinder_quads_are_uniform() {
    let canal = CanalSurface::new(straight_spine(0.0), ConstantRadius::new(0.5));
    let mut mesh = CanalMesh::new();
    canal.generate_mesh(&mut mesh, &params(), None, true).unwrap();

    // For a constant-radius straight tube the slack redistribution makes
    // every axial spacing identical, so each class of quad edge has a single
    // length.
    let mut ring_edge = None;
    let mut axial_edge = None;
    for face in &mesh.faces {
        if let Face::Quad([a, b, c, d]) = face {
            let va = mesh.vertices[*a as usize];
            let vb = mesh.vertices[*b as usize];
            let vc = mesh.vertices[*c as usize];
            let vd = mesh.vertices[*d as usize];

            let ring = ring_edge.get_or_insert((vb - va).norm());
            assert_relative_eq!((vb - va).norm(), *ring, epsilon = 1e-9);
            assert_relative_eq!((vd - vc).norm(), *ring, epsilon = 1e-9);

            let axial = axial_edge.get_or_insert((vc - vb).norm());
            assert_relative_eq!((vc - vb).norm(), *axial, epsilon = 1e-9);
            assert_relative_eq!((va - vd).norm(), *axial, epsilon = 1e-9);
        }
    }

    // Triangle height factor 1.0 targets equilateral triangles: the skewed
    // axial edge of the offset brick pattern comes out close to the ring
    // chord.
    let ring = ring_edge.unwrap();
    let axial = axial_edge.unwrap();
    assert!(
        (axial - ring).abs() < 0.35 * ring,
        "axial edge {axial} strays too far from ring chord {ring}"
    );
}

#[test]
fn end_caps_are_closed_fans_at_the_endpoints() {
    let canal = CanalSurface::new(straight_spine(0.0), ConstantRadius::new(0.5));
    let mut mesh = CanalMesh::new();
    let joint = canal.generate_mesh(&mut mesh, &params(), None, true).unwrap();

    let cap = joint.end_cap.unwrap();
    assert_relative_eq!(
        mesh.vertices[cap as usize].coords,
        Point3::new(3.0, 0.0, 0.0).coords,
        epsilon = 1e-12
    );

    // Exactly N triangles touch the cap vertex and together they fan over
    // the whole end ring.
    let mut fan_vertices = std::collections::BTreeSet::new();
    let mut fan_count = 0;
    for face in &mesh.faces {
        if let Face::Triangle(vs) = face {
            if vs.contains(&cap) {
                fan_count += 1;
                for &v in vs {
                    if v != cap {
                        fan_vertices.insert(v);
                    }
                }
            }
        }
    }
    assert_eq!(fan_count, N);
    let ring: std::collections::BTreeSet<u32> = joint.end_ring.iter().copied().collect();
    assert_eq!(fan_vertices, ring);
}

#[test]
fn capped_tube_is_a_topological_sphere() {
    let canal = CanalSurface::new(straight_spine(0.0), ConstantRadius::new(0.5));
    let mut mesh = CanalMesh::new();
    canal.generate_mesh(&mut mesh, &params(), None, true).unwrap();
    assert_eq!(mesh.euler_characteristic(), 2);
}

/// Angular offset of a ring, recovered from its first vertex.
///
/// On the straight x-axis spine with reference vector z, the frame is
/// (normal, binormal) = (y, z), so vertex 0 sits at angle `phi_offset` in
/// the yz plane.
fn ring_offset(mesh: &CanalMesh, first_vertex: u32) -> f64 {
    let v = mesh.vertices[first_vertex as usize];
    let dphi = std::f64::consts::TAU / (N as f64);
    v.z.atan2(v.y).rem_euclid(dphi)
}

#[test]
fn chained_segments_keep_the_brick_pattern_continuous() {
    let first = CanalSurface::new(straight_spine(0.0), ConstantRadius::new(0.5));
    let second = CanalSurface::new(straight_spine(3.0), ConstantRadius::new(0.5));
    let p = params();

    let mut mesh = CanalMesh::new();
    let joint = first.generate_mesh(&mut mesh, &p, None, false).unwrap();
    let v1 = mesh.vertex_count();

    let rings1 = first.sample_parameters(&p).unwrap().len();
    let joint2 = second
        .generate_mesh(
            &mut mesh,
            &p,
            Some(&StartRing {
                vertices: &joint.end_ring,
                offset: joint.end_offset,
            }),
            true,
        )
        .unwrap();
    let rings2 = second.sample_parameters(&p).unwrap().len();

    // First vertex handle of every ring, in spine order across both
    // segments. Segment 1: fresh ring at 0, cap at N, then one ring per
    // sample. Segment 2 reuses the joint ring and appends the rest.
    let mut ring_heads = vec![0u32];
    for i in 1..rings1 {
        ring_heads.push((N + 1 + (i - 1) * N) as u32);
    }
    for i in 1..rings2 {
        ring_heads.push((v1 + (i - 1) * N) as u32);
    }

    // The half-step alternation must continue uninterrupted across the
    // shared joint ring.
    let dphi = std::f64::consts::TAU / (N as f64);
    for pair in ring_heads.windows(2) {
        let a = ring_offset(&mesh, pair[0]);
        let b = ring_offset(&mesh, pair[1]);
        let diff = (a - b).abs();
        assert_relative_eq!(
            diff.min(dphi - diff),
            dphi / 2.0,
            epsilon = 1e-9
        );
    }

    // The chained result is still one closed surface.
    assert_eq!(mesh.euler_characteristic(), 2);
    assert!(joint2.end_cap.is_some());
}

#[test]
fn end_offset_feeds_forward_as_specified() {
    let canal = CanalSurface::new(straight_spine(0.0), ConstantRadius::new(0.5));
    let p = params();
    let ntsegments = canal.sample_parameters(&p).unwrap().len() - 1;

    let mut mesh = CanalMesh::new();
    let joint = canal.generate_mesh(&mut mesh, &p, None, false).unwrap();

    // start_offset is false for a fresh ring; XOR with ring-count parity.
    assert_eq!(joint.end_offset, (ntsegments + 1) % 2 == 0);
}
