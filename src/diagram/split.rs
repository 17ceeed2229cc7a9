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

//! SPLIT vertices: degree-two vertices that live for one insertion.
//!
//! A segment may claim every vertex of a nearby point site's face. A SPLIT
//! vertex where the ray from that point away from the segment leaves the
//! face is always OUT, so the IN vertices around the face stay a path. A
//! site may also claim only the interior of an edge; a SPLIT vertex there
//! seeds the IN set. Survivors are joined away when the insertion ends.

use tracing::trace;

use crate::{
    diagram::VoronoiDiagram,
    geometry::{Point2, Segment2},
    kernel::PredicateOracle,
    mesh::{EdgeKind, Vertex, VertexKind, VertexStatus},
    positioner::VertexPositioner,
    site::{Site, SiteId},
};

/// Pieces each boundary curve is cut into when looking for ray crossings.
const RAY_SAMPLES: usize = 16;
const BISECTION_STEPS: usize = 64;

/// First boundary point met by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum RayHit {
    Vertex(usize),
    Edge { half_edge: usize, position: Point2 },
}

impl<O: PredicateOracle, P: VertexPositioner> VoronoiDiagram<O, P> {
    /// Nearest point with `t > t_min` where `origin + t * dir` meets the
    /// boundary of one of `faces`, and its `t`.
    pub(super) fn ray_exit(
        &self,
        faces: &[usize],
        origin: Point2,
        dir: Point2,
        t_min: f64,
    ) -> Option<(RayHit, f64)> {
        let side = |x: &Point2| dir.cross(&(*x - origin));
        let mut best: Option<(usize, Point2, f64)> = None;
        for &f in faces {
            for h in self.graph.face_half_edges(f) {
                let curve = self.graph.half_edges[h].curve;
                let p0 = self.graph.position(self.graph.source(h));
                let p1 = self.graph.position(self.graph.target(h));
                if p0 == p1 {
                    continue;
                }
                let (u0, u1) = (curve.param(&p0), curve.param(&p1));
                let at = |i: usize| match i {
                    0 => p0,
                    RAY_SAMPLES => p1,
                    _ => curve.point(u0 + (u1 - u0) * i as f64 / RAY_SAMPLES as f64),
                };
                for i in 0..RAY_SAMPLES {
                    let (xa, xb) = (at(i), at(i + 1));
                    let (sa, sb) = (side(&xa), side(&xb));
                    let x = if sa == 0.0 {
                        xa
                    } else if sa * sb < 0.0 {
                        let mut lo = u0 + (u1 - u0) * i as f64 / RAY_SAMPLES as f64;
                        let mut hi = u0 + (u1 - u0) * (i + 1) as f64 / RAY_SAMPLES as f64;
                        for _ in 0..BISECTION_STEPS {
                            let mid = 0.5 * (lo + hi);
                            if (side(&curve.point(mid)) > 0.0) == (sa > 0.0) {
                                lo = mid;
                            } else {
                                hi = mid;
                            }
                        }
                        curve.point(0.5 * (lo + hi))
                    } else {
                        continue;
                    };
                    let t = dir.dot(&(x - origin));
                    if t > t_min && best.is_none_or(|(_, _, bt)| t < bt) {
                        best = Some((h, x, t));
                    }
                }
            }
        }

        let (h, position, t) = best?;
        let snap = self.config.geometric_tolerance * self.config.far_radius;
        for v in [self.graph.source(h), self.graph.target(h)] {
            if self.graph.position(v).distance_to(&position) <= snap {
                return Some((RayHit::Vertex(v), t));
            }
        }
        Some((
            RayHit::Edge {
                half_edge: h,
                position,
            },
            t,
        ))
    }

    /// Cuts the edge of `h` at `position` with an OUT SPLIT vertex. Edges
    /// on the outer face are never cut.
    pub(super) fn add_split_vertex(&mut self, h: usize, position: Point2) -> Option<usize> {
        if self.graph.half_edges[h].kind == EdgeKind::OutEdge {
            return None;
        }
        let left = self.graph.faces[self.graph.half_edges[h].face].site?;
        let right = self.graph.faces[self.graph.half_edges[self.graph.twin(h)].face].site?;
        let clearance = self.sites[left].site.distance_to(&position);
        let v = self.graph.add_vertex(
            Vertex::new(position, clearance, VertexStatus::Out, VertexKind::Split)
                .with_generators(&[left, right]),
        );
        self.graph.split_edge(h, v);
        self.scratch.splits.push(v);
        trace!(v, edge = h, "split vertex");
        Some(v)
    }

    /// A vertex `site` claims on the boundary of `f`, where the ray from
    /// `origin` along `dir` leaves it; the crossed edge is split if needed.
    fn claimed_exit(
        &mut self,
        site: &Site,
        faces: &[usize],
        origin: Point2,
        dir: Point2,
        t_max: f64,
    ) -> Option<usize> {
        let t_min = self.config.geometric_tolerance * self.config.far_radius;
        let (hit, t) = self.ray_exit(faces, origin, dir, t_min)?;
        if t >= t_max {
            return None;
        }
        let v = match hit {
            RayHit::Vertex(v) => v,
            RayHit::Edge {
                half_edge,
                position,
            } => self.add_split_vertex(half_edge, position)?,
        };
        let vertex = &self.graph.vertices[v];
        if vertex.status.is_fixed() || vertex.status == VertexStatus::In {
            return None;
        }
        (self.in_circle(v, site) > 0.0).then_some(v)
    }

    /// Seed for a point site that claims no vertex of its nearest face:
    /// the point where the ray from `p` away from the face's site leaves
    /// the face is closer to `p` than to that site.
    pub(super) fn seed_on_boundary(&mut self, site: &Site, face: usize) -> Option<usize> {
        let Site::Point(p) = *site else {
            return None;
        };
        let owner = *self.face_site(face)?;
        let dir = (p - owner.closest_point(&p)).normalized()?;
        self.claimed_exit(site, &[face], p, dir, f64::INFINITY)
    }

    /// Seed for a segment: where the segment leaves the faces around its
    /// first endpoint. Every point of the open segment is claimed.
    pub(super) fn seed_along_segment(&mut self, seg: &Segment2, faces: &[usize]) -> Option<usize> {
        let site = Site::Segment(*seg);
        self.claimed_exit(&site, faces, seg.a, seg.direction(), seg.length())
    }

    /// Keeps the IN vertices around the face of an isolated point site a
    /// path: the point where the ray from the site away from the new site
    /// leaves the face is closer to the face's site and gets an OUT SPLIT
    /// vertex. Point insertions only need it around parabolic edges.
    pub(super) fn split_far_side(&mut self, f: usize, site: &Site) {
        let Some(owner_id) = self.graph.faces[f].site else {
            return;
        };
        if !self.is_isolated_point(owner_id) {
            return;
        }
        let owner = self.sites[owner_id].site;
        let Site::Point(q) = owner else {
            return;
        };
        match site {
            Site::Segment(s) if owner.is_endpoint_of(s) => return,
            Site::Point(_) if !self.face_has_parabola(f) => return,
            _ => {}
        }
        let Some(dir) = (q - site.closest_point(&q)).normalized() else {
            return;
        };
        if let Some((RayHit::Edge { half_edge, position }, _)) = self.ray_exit(&[f], q, dir, 0.0) {
            self.add_split_vertex(half_edge, position);
        }
    }

    pub(super) fn is_isolated_point(&self, id: SiteId) -> bool {
        self.sites[id]
            .vertex
            .is_some_and(|v| self.graph.vertices[v].status == VertexStatus::PointSite)
    }

    fn face_has_parabola(&self, f: usize) -> bool {
        self.graph
            .face_half_edges(f)
            .into_iter()
            .any(|h| self.graph.half_edges[h].kind == EdgeKind::Parabola)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_points() -> VoronoiDiagram {
        let mut vd = VoronoiDiagram::new(1.0, 8);
        vd.insert_point_site(Point2::new(-0.3, 0.0)).unwrap();
        vd.insert_point_site(Point2::new(0.3, 0.0)).unwrap();
        vd
    }

    #[test]
    fn ray_leaves_a_point_face_through_the_bisector() {
        let vd = two_points();
        let face = vd.sites[vd.point_site(3).unwrap()].face;
        let (hit, t) = vd
            .ray_exit(&[face], Point2::new(-0.3, 0.0), Point2::new(1.0, 0.0), 0.0)
            .unwrap();
        assert!((t - 0.3).abs() < 1e-9, "{t}");
        let RayHit::Edge { half_edge, position } = hit else {
            panic!("ray ended on a vertex");
        };
        assert!(position.x.abs() < 1e-9 && position.y.abs() < 1e-9);
        let twin_face = vd.graph.half_edges[vd.graph.twin(half_edge)].face;
        assert_eq!(twin_face, vd.sites[vd.point_site(4).unwrap()].face);
    }

    #[test]
    fn split_vertices_are_joined_when_the_insertion_ends() {
        let mut vd = two_points();
        let before = vd.print();
        let h = vd
            .graph
            .live_half_edges()
            .find(|&h| vd.graph.half_edges[h].kind == EdgeKind::Line)
            .unwrap();
        let (a, b) = (vd.graph.source(h), vd.graph.target(h));
        let mid = vd.graph.position(a).midpoint(&vd.graph.position(b));
        let v = vd.add_split_vertex(h, mid).unwrap();
        assert_eq!(vd.graph.degree(v), 2);
        assert_eq!(vd.graph.vertices[v].generators.len(), 2);
        assert!(vd.check().is_err());

        vd.end_insertion();
        assert!(vd.graph.vertices[v].removed);
        assert_eq!(vd.print(), before);
        vd.check_exhaustive().unwrap();
    }

    #[test]
    fn outer_edges_are_never_split() {
        let mut vd = two_points();
        let h = vd
            .graph
            .live_half_edges()
            .find(|&h| vd.graph.half_edges[h].kind == EdgeKind::OutEdge)
            .unwrap();
        let p = vd.graph.position(vd.graph.source(h));
        assert_eq!(vd.add_split_vertex(h, p), None);
        assert!(vd.scratch.splits.is_empty());
    }
}
