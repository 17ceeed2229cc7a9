// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Audits of the diagram invariants.
//!
//! [`check`] is cheap enough to run after every insertion; it covers the
//! half-edge structure, statuses, bounds and the local geometry of every
//! vertex and edge. [`check_exhaustive`] adds the global nearest-site and
//! empty-circle tests.

use thiserror::Error;

use crate::{
    diagram::{OUTER_RADIUS, VoronoiDiagram},
    geometry::util::polygon_area,
    kernel::orientation::{incircle_sign, orient2d_sign},
    mesh::{EdgeKind, FaceStatus, HalfEdgeGraph, VertexKind, VertexStatus},
    site::Site,
};

/// Relative tolerance of the geometric audits.
pub const AUDIT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantKind {
    HalfEdgeSymmetry,
    FaceClosure,
    Euler,
    Degree,
    NearestSite,
    StatusReset,
    Separator,
    Bounding,
    Equidistance,
    FaceOrientation,
    DelaunayCorrespondence,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?} violated: {detail}")]
pub struct InvariantViolation {
    pub kind: InvariantKind,
    pub detail: String,
}

fn violation(kind: InvariantKind, detail: impl Into<String>) -> InvariantViolation {
    InvariantViolation {
        kind,
        detail: detail.into(),
    }
}

fn ensure(
    cond: bool,
    kind: InvariantKind,
    detail: impl FnOnce() -> String,
) -> Result<(), InvariantViolation> {
    if cond { Ok(()) } else { Err(violation(kind, detail())) }
}

pub fn check<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    let g = vd.graph();
    check_half_edges(g)?;
    check_faces(g)?;
    check_euler(g)?;
    check_degrees(g)?;
    check_statuses(vd)?;
    check_separators(vd)?;
    check_bounds(vd)?;
    check_vertex_clearance(vd)?;
    check_edge_midpoints(vd)?;
    check_face_orientation(vd)?;
    check_dual_orientation(vd)
}

pub fn check_exhaustive<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    check(vd)?;
    check_nearest_site(vd)?;
    check_empty_circles(vd)
}

fn check_half_edges(g: &HalfEdgeGraph) -> Result<(), InvariantViolation> {
    use InvariantKind::HalfEdgeSymmetry as K;
    let n = g.half_edges.len();
    for h in g.live_half_edges() {
        let e = &g.half_edges[h];
        ensure(e.twin < n && e.next < n && e.prev < n, K, || {
            format!("half-edge {h} has unset links")
        })?;
        ensure(
            !g.half_edges[e.twin].removed && !g.half_edges[e.next].removed,
            K,
            || format!("half-edge {h} links to a removed half-edge"),
        )?;
        ensure(g.twin(e.twin) == h, K, || format!("twin of twin of {h} is not {h}"))?;
        ensure(g.target(e.twin) != e.vertex, K, || {
            format!("half-edge {h} and its twin share target {}", e.vertex)
        })?;
        ensure(g.prev(e.next) == h, K, || format!("prev of next of {h} is not {h}"))?;
        ensure(!g.vertices[e.vertex].removed, K, || {
            format!("half-edge {h} points to removed vertex {}", e.vertex)
        })?;
    }
    Ok(())
}

fn check_faces(g: &HalfEdgeGraph) -> Result<(), InvariantViolation> {
    use InvariantKind::FaceClosure as K;
    let mut on_cycles = 0;
    for f in 0..g.faces.len() {
        let start = g.faces[f].half_edge;
        ensure(start < g.half_edges.len() && !g.half_edges[start].removed, K, || {
            format!("face {f} has no live boundary half-edge")
        })?;
        let Some(cycle) = g.cycle_from(start) else {
            return Err(violation(K, format!("boundary of face {f} does not close")));
        };
        for &h in &cycle {
            ensure(g.half_edges[h].face == f, K, || {
                format!(
                    "half-edge {h} on the cycle of face {f} belongs to face {}",
                    g.half_edges[h].face
                )
            })?;
        }
        on_cycles += cycle.len();
    }
    let live = g.live_half_edges().count();
    ensure(on_cycles == live, K, || {
        format!("{live} live half-edges but {on_cycles} on face cycles")
    })
}

fn check_euler(g: &HalfEdgeGraph) -> Result<(), InvariantViolation> {
    let v = g.vertices.iter().filter(|v| v.is_connected()).count() as i64;
    let e = g.live_edge_count() as i64;
    let f = g.faces.len() as i64;
    ensure(v - e + f == 2, InvariantKind::Euler, || {
        format!("V - E + F = {v} - {e} + {f} = {}", v - e + f)
    })
}

fn check_degrees(g: &HalfEdgeGraph) -> Result<(), InvariantViolation> {
    use InvariantKind::Degree as K;
    for v in g.live_vertices() {
        let vertex = &g.vertices[v];
        let degree = g.degree(v);
        let ok = match (vertex.status, vertex.kind) {
            (VertexStatus::PointSite, _) => degree == 0,
            (VertexStatus::Endpoint, _) => degree >= 2,
            (_, VertexKind::Apex | VertexKind::Split) => degree == 2,
            _ => degree == 3,
        };
        ensure(ok, K, || {
            format!(
                "vertex {v} ({} {}) has degree {degree}",
                vertex.status.as_str(),
                vertex.kind.as_str()
            )
        })?;
    }
    Ok(())
}

fn check_statuses<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    use InvariantKind::StatusReset as K;
    let g = vd.graph();
    for v in g.live_vertices() {
        let status = g.vertices[v].status;
        ensure(
            matches!(
                status,
                VertexStatus::Out
                    | VertexStatus::PointSite
                    | VertexStatus::Endpoint
                    | VertexStatus::Outer
            ),
            K,
            || format!("vertex {v} left with status {}", status.as_str()),
        )?;
        ensure(g.vertices[v].kind != VertexKind::Split, K, || {
            format!("split vertex {v} outlived its insertion")
        })?;
    }
    for (f, face) in g.faces.iter().enumerate() {
        ensure(face.status == FaceStatus::NonIncident, K, || {
            format!("face {f} left incident")
        })?;
    }
    ensure(vd.scratch_is_empty(), K, || "insertion buffers not cleared".into())
}

fn check_separators<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    use InvariantKind::Separator as K;
    let g = vd.graph();
    for entry in vd.sites() {
        let Some(endpoints) = entry.endpoints else {
            continue;
        };
        for id in endpoints {
            let Some(v) = vd.sites()[id].vertex else {
                return Err(violation(K, format!("endpoint site {id} has no vertex")));
            };
            ensure(g.vertices[v].status == VertexStatus::Endpoint, K, || {
                format!("endpoint vertex {v} has status {}", g.vertices[v].status.as_str())
            })?;
            let separators = g
                .outgoing_half_edges(v)
                .into_iter()
                .filter(|&h| g.half_edges[h].kind == EdgeKind::Separator)
                .count();
            ensure(separators >= 2, K, || {
                format!("endpoint vertex {v} has {separators} separators")
            })?;
        }
    }
    Ok(())
}

fn check_bounds<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    use InvariantKind::Bounding as K;
    let g = vd.graph();
    let outer = OUTER_RADIUS * vd.far_radius();
    for v in g.live_vertices() {
        let vertex = &g.vertices[v];
        if vertex.status == VertexStatus::Outer {
            continue;
        }
        ensure(vertex.position.norm() < outer, K, || {
            format!("vertex {v} at {} is outside the outer vertices", vertex.position)
        })?;
    }
    let r = vd.far_radius();
    for (id, entry) in vd.sites().iter().enumerate().skip(3) {
        let inside = match &entry.site {
            Site::Point(p) => p.norm() < r,
            Site::Segment(s) => s.a.norm() < r && s.b.norm() < r,
        };
        ensure(inside, K, || format!("site {id} is outside the far radius"))?;
    }
    Ok(())
}

/// Scale of the absolute tolerance for a vertex with clearance `r`.
#[inline]
fn tolerance(vd_radius: f64, r: f64) -> f64 {
    AUDIT_TOLERANCE * (vd_radius + r)
}

fn check_vertex_clearance<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    use InvariantKind::Equidistance as K;
    let g = vd.graph();
    for v in g.live_vertices() {
        let vertex = &g.vertices[v];
        if !vertex.is_connected() || vertex.status == VertexStatus::Outer {
            continue;
        }
        let tol = tolerance(vd.far_radius(), vertex.clearance);
        for f in g.vertex_faces(v) {
            let Some(site) = vd.face_site(f) else {
                continue;
            };
            let d = site.distance_to(&vertex.position);
            ensure((d - vertex.clearance).abs() <= tol, K, || {
                format!(
                    "vertex {v} at {} has clearance {} but face {f} site is at {d}",
                    vertex.position, vertex.clearance
                )
            })?;
        }
    }
    Ok(())
}

fn check_edge_midpoints<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    use InvariantKind::Equidistance as K;
    let g = vd.graph();
    for h in g.live_half_edges() {
        let t = g.twin(h);
        if t < h || g.half_edges[h].kind == EdgeKind::OutEdge {
            continue;
        }
        let (Some(s1), Some(s2)) = (
            vd.face_site(g.half_edges[h].face),
            vd.face_site(g.half_edges[t].face),
        ) else {
            continue;
        };
        let curve = &g.half_edges[h].curve;
        let u0 = curve.param(&g.position(g.source(h)));
        let u1 = curve.param(&g.position(g.target(h)));
        let mid = curve.point(0.5 * (u0 + u1));
        let (d1, d2) = (s1.distance_to(&mid), s2.distance_to(&mid));
        ensure((d1 - d2).abs() <= tolerance(vd.far_radius(), d1), K, || {
            format!("midpoint {mid} of edge {h} is {d1} and {d2} from its sites")
        })?;
    }
    Ok(())
}

fn check_face_orientation<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    let r = vd.far_radius();
    for f in 0..vd.num_faces() {
        if f == vd.outer_face() {
            continue;
        }
        let area = polygon_area(&vd.face_polygon(f, 4));
        ensure(area >= -AUDIT_TOLERANCE * r * r, InvariantKind::FaceOrientation, || {
            format!("face {f} is clockwise, area {area}")
        })?;
    }
    Ok(())
}

/// The point sites around a NORMAL vertex, in counter-clockwise face
/// order, form a counter-clockwise triangle.
fn check_dual_orientation<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    let g = vd.graph();
    for v in g.live_vertices() {
        let vertex = &g.vertices[v];
        if vertex.status != VertexStatus::Out || vertex.kind != VertexKind::Normal {
            continue;
        }
        let pts: Vec<_> = g
            .faces_ccw(v)
            .into_iter()
            .filter_map(|f| vd.face_site(f).and_then(Site::point))
            .collect();
        if pts.len() != 3 {
            continue;
        }
        ensure(
            orient2d_sign(&pts[0], &pts[1], &pts[2]) > 0,
            InvariantKind::DelaunayCorrespondence,
            || format!("sites around vertex {v} are not counter-clockwise"),
        )?;
    }
    Ok(())
}

fn check_nearest_site<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    let g = vd.graph();
    for v in g.live_vertices() {
        let vertex = &g.vertices[v];
        if !vertex.is_connected() || vertex.status == VertexStatus::Outer {
            continue;
        }
        let tol = tolerance(vd.far_radius(), vertex.clearance);
        for (id, entry) in vd.sites().iter().enumerate() {
            let d = entry.site.distance_to(&vertex.position);
            ensure(d >= vertex.clearance - tol, InvariantKind::NearestSite, || {
                format!(
                    "site {id} is {d} from vertex {v}, inside its clearance {}",
                    vertex.clearance
                )
            })?;
        }
    }
    Ok(())
}

fn check_empty_circles<O, P>(vd: &VoronoiDiagram<O, P>) -> Result<(), InvariantViolation> {
    let tri = vd.delaunay();
    for (i, t) in tri.triangles.iter().enumerate() {
        let [a, b, c] = tri.triangle_points(i);
        for (h, p) in tri.points.iter().enumerate() {
            if t.contains(&h) {
                continue;
            }
            ensure(incircle_sign(&a, &b, &c, p) <= 0, InvariantKind::NearestSite, || {
                format!("point handle {h} lies inside the circumcircle of triangle {t:?}")
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::VoronoiConfig, geometry::Point2};

    fn unchecked() -> VoronoiDiagram {
        VoronoiDiagram::with_config(VoronoiConfig::new(1.0, 4).with_check_each_insertion(false))
    }

    #[test]
    fn fresh_and_grown_diagrams_pass() {
        let mut vd = unchecked();
        check_exhaustive(&vd).unwrap();
        for p in [(0.2, 0.1), (-0.3, 0.4), (0.0, -0.5)] {
            vd.insert_point_site(Point2::from(p)).unwrap();
            check_exhaustive(&vd).unwrap();
        }
    }

    #[test]
    fn euler_formula_holds_on_the_initial_graph() {
        let vd = unchecked();
        check_euler(vd.graph()).unwrap();
        check_degrees(vd.graph()).unwrap();
    }

    #[test]
    fn split_vertices_have_degree_two() {
        let mut vd = unchecked();
        vd.insert_point_site(Point2::new(0.2, 0.1)).unwrap();
        let mut g = vd.graph().clone();
        let h = g.live_half_edges().next().unwrap();
        let (a, b) = (g.position(g.source(h)), g.position(g.target(h)));
        let v = g.add_vertex(crate::mesh::Vertex::new(
            a.midpoint(&b),
            0.0,
            VertexStatus::Out,
            VertexKind::Split,
        ));
        g.split_edge(h, v);
        // two edges is what a split vertex may carry
        check_degrees(&g).unwrap();
        assert!(g.join_at(v));
        check_degrees(&g).unwrap();
        check_half_edges(&g).unwrap();
    }
}
