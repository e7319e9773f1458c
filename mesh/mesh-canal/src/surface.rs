//! Generic canal surfaces and the adaptive ring-mesh generator.

use nalgebra::Vector3;
use tracing::{debug, trace};

use spine_curve::{Point3, SpineCurve};

use crate::error::{CanalError, CanalResult};
use crate::radius::RadiusProfile;
use crate::sink::MeshSink;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hard cap on generated rings; reaching it means the adaptive step has
/// effectively vanished (degenerate radius or spine).
const MAX_RINGS: usize = 100_000;

/// Parameters for canal-surface mesh generation.
///
/// # Example
///
/// ```
/// use mesh_canal::MeshParams;
/// use nalgebra::Vector3;
///
/// let params = MeshParams::default()
///     .with_phi_segments(12)
///     .with_triangle_height_factor(0.8)
///     .with_render_vector(Vector3::y());
/// assert_eq!(params.phi_segments, 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshParams {
    /// Number of angular segments per ring (at least 3).
    pub phi_segments: u32,
    /// Scale on the axial step height; 1.0 targets equilateral triangles.
    pub triangle_height_factor: f64,
    /// Fixed reference vector for the meshing frame. Must not be close to
    /// parallel with the spine tangent anywhere on the domain; validate with
    /// the render-vector check on the Bezier canal.
    pub render_vector: Vector3<f64>,
    /// Base angular offset of every ring.
    pub phi_offset: f64,
    /// Parameter step for the arc-length approximation.
    pub arclen_step: f64,
    /// Keep successive rings angularly aligned instead of alternating the
    /// half-segment offset. Needed where a ring meets a geometric crease
    /// (e.g. a branching joint) and twisted quads would fold visibly.
    pub preserve_crease_edges: bool,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            phi_segments: 16,
            triangle_height_factor: 1.0,
            render_vector: Vector3::z(),
            phi_offset: 0.0,
            arclen_step: 1e-3,
            preserve_crease_edges: false,
        }
    }
}

impl MeshParams {
    /// Set the number of angular segments.
    #[must_use]
    pub fn with_phi_segments(mut self, phi_segments: u32) -> Self {
        self.phi_segments = phi_segments;
        self
    }

    /// Set the triangle height factor.
    #[must_use]
    pub fn with_triangle_height_factor(mut self, factor: f64) -> Self {
        self.triangle_height_factor = factor;
        self
    }

    /// Set the frame reference vector.
    #[must_use]
    pub fn with_render_vector(mut self, render_vector: Vector3<f64>) -> Self {
        self.render_vector = render_vector;
        self
    }

    /// Set the base angular offset.
    #[must_use]
    pub fn with_phi_offset(mut self, phi_offset: f64) -> Self {
        self.phi_offset = phi_offset;
        self
    }

    /// Enable crease-preserving (aligned-ring) mode.
    #[must_use]
    pub fn preserving_crease_edges(mut self) -> Self {
        self.preserve_crease_edges = true;
        self
    }
}

/// The start ring of a chained canal segment: vertex handles produced by the
/// predecessor segment, plus its reported end-offset flag.
///
/// The caller is responsible for having removed the predecessor's end cap so
/// the mesh is open around this ring, and for passing the predecessor's
/// `end_offset` back in unchanged - that is what keeps the brick pattern
/// continuous across the joint.
#[derive(Debug, Clone, Copy)]
pub struct StartRing<'a> {
    /// Handles of the shared ring, exactly `phi_segments` of them.
    pub vertices: &'a [u32],
    /// The predecessor's end-offset flag.
    pub offset: bool,
}

/// Joint data returned by mesh generation, for chaining further segments.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshJoint {
    /// Handles of the final ring, in angular order.
    pub end_ring: Vec<u32>,
    /// Handle of the end-cap centroid vertex, when an end cap was built.
    pub end_cap: Option<u32>,
    /// Offset flag of the final ring; feed into the next segment's
    /// [`StartRing::offset`].
    pub end_offset: bool,
}

/// A canal surface: a spine curve swept by circles of profile-dependent
/// radius, orthogonal to the spine's local frame.
///
/// The surface owns its spine and radius profile by value; instances are
/// independent after construction. `C` is any [`SpineCurve`]; the
/// Bezier-specific analysis lives on [`BezierCanal`](crate::BezierCanal).
#[derive(Debug, Clone)]
pub struct CanalSurface<C, F> {
    pub(crate) spine: C,
    pub(crate) radius: F,
    pub(crate) t0: f64,
    pub(crate) t1: f64,
}

impl<C, F> CanalSurface<C, F>
where
    C: SpineCurve,
    F: RadiusProfile<C>,
{
    /// Create a canal surface; the domain is taken from the spine curve.
    #[must_use]
    pub fn new(spine: C, radius: F) -> Self {
        let (t0, t1) = spine.domain();
        Self {
            spine,
            radius,
            t0,
            t1,
        }
    }

    /// The spine curve.
    #[inline]
    #[must_use]
    pub fn spine(&self) -> &C {
        &self.spine
    }

    /// The radius profile.
    #[inline]
    #[must_use]
    pub fn radius_profile(&self) -> &F {
        &self.radius
    }

    /// The parameter domain `(t0, t1)`.
    #[inline]
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.t0, self.t1)
    }

    /// Spine position at `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.spine.point_at(t)
    }

    /// Radius at `t`.
    #[must_use]
    pub fn radius_at(&self, t: f64) -> f64 {
        self.radius.radius_at(t, &self.spine)
    }

    /// Total spine arc length over the domain, approximated at step `dt`.
    #[must_use]
    pub fn arc_length(&self, dt: f64) -> f64 {
        self.spine.arc_length_between(self.t0, self.t1, dt)
    }

    /// Compute the adaptive parameter samples for mesh generation.
    ///
    /// Starting at `t0`, each step advances by the parameter equivalent of
    /// the target axial triangle height for the local radius; the overshoot
    /// past `t1` is redistributed backwards so the last two rings keep a
    /// reasonable distance while the final sample lands exactly on `t1`.
    ///
    /// The returned sequence is strictly increasing, starts at `t0`, and its
    /// last element equals `t1` exactly. The ring count of the generated
    /// mesh is the length of this sequence.
    ///
    /// # Errors
    ///
    /// - [`CanalError::TooFewSegments`] for fewer than 3 angular segments
    /// - [`CanalError::DegenerateSpine`] when the spine has no length or the
    ///   radius-derived step vanishes
    pub fn sample_parameters(&self, params: &MeshParams) -> CanalResult<Vec<f64>> {
        if params.phi_segments < 3 {
            return Err(CanalError::TooFewSegments {
                min: 3,
                actual: params.phi_segments,
            });
        }

        if self.t1 < self.t0 {
            return Err(CanalError::MalformedInterval {
                t0: self.t0,
                t1: self.t1,
            });
        }

        let dphi = std::f64::consts::TAU / f64::from(params.phi_segments);
        let arclength = self.arc_length(params.arclen_step);
        if arclength <= f64::EPSILON {
            return Err(CanalError::degenerate("spine has zero arc length"));
        }

        // Chord length of one angular segment at the local radius gives the
        // in-ring edge length; the axial step targets the matching triangle
        // height (or the full edge length in crease mode, where the strip is
        // quads without the interleaved diagonal).
        let mut t_values = vec![self.t0];
        let mut t = self.t0;
        while t < self.t1 {
            let r = self.radius_at(t);
            let l = r * (2.0 * (1.0 - dphi.cos())).sqrt();
            let h = if params.preserve_crease_edges {
                params.triangle_height_factor * l
            } else {
                params.triangle_height_factor * l * 3.0_f64.sqrt() / 2.0
            };
            let dt = h / arclength;
            if dt.is_nan() || dt <= 0.0 || t_values.len() > MAX_RINGS {
                return Err(CanalError::degenerate(
                    "adaptive step vanished (zero radius or height factor)",
                ));
            }
            t += dt;
            t_values.push(t);
        }

        // The loop overshoots t1. Pop the overshoot sample and spread the
        // slack backwards over the interior samples so appending t1 does not
        // leave the last two rings pathologically close.
        let slack = t_values[t_values.len() - 1] - self.t1;
        t_values.pop();
        let ntsegments = t_values.len();
        for (i, value) in t_values.iter_mut().enumerate().skip(1) {
            *value -= (i as f64) * slack / (ntsegments as f64);
        }
        t_values.push(self.t1);

        Ok(t_values)
    }

    /// Generate the triangulated tube mesh into `mesh`.
    ///
    /// Rings of `phi_segments` vertices are placed at the adaptive parameter
    /// samples (see [`Self::sample_parameters`]) and joined by quad strips.
    /// Successive rings alternate a half-segment angular offset, interleaving
    /// the strip into a brick pattern with near-equilateral triangles after
    /// quad splitting - unless crease preservation is on, which keeps rings
    /// aligned.
    ///
    /// With `start` set to `None`, a fresh (never offset) start ring is
    /// generated and closed with a triangle fan around a centroid cap
    /// vertex. With a [`StartRing`], those handles are reused verbatim, no
    /// start cap is built, and the supplied offset flag seeds the parity.
    ///
    /// The end is fan-capped the same way when `cap_end` is true; chaining
    /// callers pass `false` and continue from the returned [`MeshJoint`].
    ///
    /// # Errors
    ///
    /// In addition to the [`Self::sample_parameters`] errors,
    /// [`CanalError::RingSizeMismatch`] when a supplied start ring does not
    /// have exactly `phi_segments` vertices.
    pub fn generate_mesh<M: MeshSink>(
        &self,
        mesh: &mut M,
        params: &MeshParams,
        start: Option<&StartRing<'_>>,
        cap_end: bool,
    ) -> CanalResult<MeshJoint> {
        let t_values = self.sample_parameters(params)?;
        let ntsegments = t_values.len() - 1;
        let n = params.phi_segments as usize;
        let dphi = std::f64::consts::TAU / (n as f64);
        let phi_0 = params.phi_offset;

        debug!(
            rings = ntsegments + 1,
            segments = n,
            chained = start.is_some(),
            "generating canal mesh"
        );

        let ring_positions = |t: f64, phi_offset: f64, out: &mut Vec<Point3<f64>>| {
            let p = self.point_at(t);
            let r = self.radius_at(t);
            let frame = self.spine.render_frame(t, params.render_vector);
            out.clear();
            for j in 0..n {
                let phi = (j as f64) * dphi + phi_offset;
                out.push(p + frame.normal * (r * phi.cos()) + frame.binormal * (r * phi.sin()));
            }
        };

        // Offset parity: with an offset start, even rings get the half-step;
        // otherwise odd rings do. Crease mode pins every generated ring to
        // the base offset.
        let start_offset = match start {
            Some(ring) => ring.offset,
            // A fresh start ring is never offset.
            None => false,
        };
        let ring_phi_offset = |i: usize| -> f64 {
            let offset = if start_offset {
                !params.preserve_crease_edges && i % 2 == 0
            } else {
                !params.preserve_crease_edges && i % 2 == 1
            };
            if offset {
                phi_0 + dphi / 2.0
            } else {
                phi_0
            }
        };

        let mut positions = Vec::with_capacity(n);
        let mut current: Vec<u32>;

        match start {
            Some(ring) => {
                if ring.vertices.len() != n {
                    return Err(CanalError::RingSizeMismatch {
                        expected: n,
                        actual: ring.vertices.len(),
                    });
                }
                trace!("reusing supplied start ring");
                current = ring.vertices.to_vec();
            }
            None => {
                ring_positions(self.t0, ring_phi_offset(0), &mut positions);
                current = positions.iter().map(|p| mesh.insert_vertex(*p)).collect();

                // Close the start with a fan around the ring centroid.
                let cap = mesh.insert_vertex(self.point_at(self.t0));
                mesh.insert_triangle(cap, current[0], current[n - 1]);
                for j in 0..n - 1 {
                    mesh.insert_triangle(cap, current[j + 1], current[j]);
                }
            }
        }

        // Interior rings and the final ring at t1, each joined to its
        // predecessor by a quad strip.
        for (i, &t) in t_values.iter().enumerate().skip(1) {
            ring_positions(t, ring_phi_offset(i), &mut positions);
            let last = std::mem::take(&mut current);
            current = positions.iter().map(|p| mesh.insert_vertex(*p)).collect();

            for j in 0..n - 1 {
                mesh.insert_quad(last[j], last[j + 1], current[j + 1], current[j]);
            }
            mesh.insert_quad(last[n - 1], last[0], current[0], current[n - 1]);
        }

        let end_cap = if cap_end {
            let cap = mesh.insert_vertex(self.point_at(self.t1));
            mesh.insert_triangle(cap, current[n - 1], current[0]);
            for j in 0..n - 1 {
                mesh.insert_triangle(cap, current[j], current[j + 1]);
            }
            Some(cap)
        } else {
            None
        };

        // (ntsegments + 1) rings total: an even ring count flips the parity.
        let end_offset = start_offset ^ ((ntsegments + 1) % 2 == 0);

        debug!(end_offset, capped = cap_end, "canal mesh done");

        Ok(MeshJoint {
            end_ring: current,
            end_cap,
            end_offset,
        })
    }
}
