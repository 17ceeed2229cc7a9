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

use crate::{
    geometry::{Point2, Segment2},
    kernel::orientation::{
        incircle, incircle_sign, incircle_sign_exact, orient2d, orient2d_sign, orient2d_sign_exact,
    },
    mesh::Vertex,
    site::Site,
};

/// Projection parameters closer than this to 0 or 1 count as outside the
/// slab of a segment.
pub const SLAB_TOLERANCE: f64 = 1e-9;

/// Decides whether a vertex is claimed by a site being inserted.
///
/// `in_circle` returns `d > 0` iff `site` is strictly closer to the vertex
/// than the vertex's clearance. `|d|` orders the work queue; only the sign
/// is trusted.
pub trait PredicateOracle {
    fn in_circle(&self, vertex: &Vertex, generators: &[Site], site: &Site) -> f64;
}

/// Interval-filtered exact predicates for point configurations, plain
/// distance comparison otherwise. The default oracle.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilteredPredicates;

/// Always-exact evaluation for point configurations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactPredicates;

/// Floating point only, no certification.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatPredicates;

impl PredicateOracle for FilteredPredicates {
    fn in_circle(&self, vertex: &Vertex, generators: &[Site], site: &Site) -> f64 {
        point_in_circle(vertex, generators, site, |a, b, c, d| {
            incircle_sign(a, b, c, d) * orient2d_sign(a, b, c)
        })
    }
}

impl PredicateOracle for ExactPredicates {
    fn in_circle(&self, vertex: &Vertex, generators: &[Site], site: &Site) -> f64 {
        point_in_circle(vertex, generators, site, |a, b, c, d| {
            incircle_sign_exact(a, b, c, d) * orient2d_sign_exact(a, b, c)
        })
    }
}

impl PredicateOracle for FloatPredicates {
    fn in_circle(&self, vertex: &Vertex, generators: &[Site], site: &Site) -> f64 {
        point_in_circle(vertex, generators, site, |a, b, c, d| {
            let s = incircle(a, b, c, d) * orient2d(a, b, c);
            if s > 0.0 {
                1
            } else if s < 0.0 {
                -1
            } else {
                0
            }
        })
    }
}

/// Shared body: `sign_of` is consulted when the vertex is defined by three
/// points and the new site is a point; the magnitude always comes from the
/// clearance gap.
fn point_in_circle<F>(vertex: &Vertex, generators: &[Site], site: &Site, sign_of: F) -> f64
where
    F: Fn(&Point2, &Point2, &Point2, &Point2) -> i8,
{
    let Site::Point(p) = site else {
        return geometric_in_circle(vertex, site);
    };
    let gap = vertex.clearance - vertex.position.distance_to(p);
    let pts: Vec<Point2> = generators.iter().filter_map(Site::point).collect();
    if generators.len() != 3 || pts.len() != 3 || orient2d_sign(&pts[0], &pts[1], &pts[2]) == 0 {
        return gap;
    }
    let magnitude = gap.abs().max(f64::MIN_POSITIVE);
    match sign_of(&pts[0], &pts[1], &pts[2], p) {
        s if s > 0 => magnitude,
        s if s < 0 => -magnitude,
        _ => 0.0,
    }
}

/// Clearance gap against the closed site. A segment only claims vertices
/// strictly inside its slab: beyond it the nearest point is an endpoint,
/// which is already a site.
pub fn geometric_in_circle(vertex: &Vertex, site: &Site) -> f64 {
    let gap = vertex.clearance - site.distance_to(&vertex.position);
    if let Site::Segment(s) = site {
        let t = s.param(&vertex.position);
        if t <= SLAB_TOLERANCE || t >= 1.0 - SLAB_TOLERANCE {
            return -gap.abs();
        }
    }
    gap
}

fn within_box(x: &Point2, s: &Segment2) -> bool {
    let (lo, hi) = s.bounds();
    x.x >= lo.x && x.x <= hi.x && x.y >= lo.y && x.y <= hi.y
}

/// True when `x` lies on the closed segment without being one of its
/// endpoints.
pub fn point_inside_segment(x: &Point2, s: &Segment2) -> bool {
    *x != s.a && *x != s.b && orient2d_sign(&s.a, &s.b, x) == 0 && within_box(x, s)
}

/// True when two segments share any point other than a common endpoint:
/// proper crossings, T-junctions and collinear overlaps.
pub fn segments_interfere(p: &Segment2, q: &Segment2) -> bool {
    let o1 = orient2d_sign(&p.a, &p.b, &q.a);
    let o2 = orient2d_sign(&p.a, &p.b, &q.b);
    let o3 = orient2d_sign(&q.a, &q.b, &p.a);
    let o4 = orient2d_sign(&q.a, &q.b, &p.b);
    if o1 * o2 < 0 && o3 * o4 < 0 {
        return true;
    }
    point_inside_segment(&q.a, p)
        || point_inside_segment(&q.b, p)
        || point_inside_segment(&p.a, q)
        || point_inside_segment(&p.b, q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{VertexKind, VertexStatus};

    fn vertex_at(p: Point2, r: f64) -> Vertex {
        Vertex::new(p, r, VertexStatus::Out, VertexKind::Normal)
    }

    #[test]
    fn point_inside_circumcircle_is_positive() {
        let gens = [
            Site::Point(Point2::new(0.5, 0.0)),
            Site::Point(Point2::new(-0.25, 0.433)),
            Site::Point(Point2::new(-0.25, -0.433)),
        ];
        let v = vertex_at(Point2::origin(), 0.5);
        let inside = Site::Point(Point2::new(0.1, 0.1));
        let outside = Site::Point(Point2::new(0.9, 0.0));
        let oracles: [&dyn PredicateOracle; 3] =
            [&FilteredPredicates, &ExactPredicates, &FloatPredicates];
        for oracle in oracles {
            assert!(oracle.in_circle(&v, &gens, &inside) > 0.0);
            assert!(oracle.in_circle(&v, &gens, &outside) < 0.0);
        }
    }

    #[test]
    fn cocircular_point_is_not_in() {
        let gens = [
            Site::Point(Point2::new(0.3, 0.3)),
            Site::Point(Point2::new(-0.3, 0.3)),
            Site::Point(Point2::new(-0.3, -0.3)),
        ];
        let v = vertex_at(Point2::origin(), 0.3 * 2f64.sqrt());
        let d = Site::Point(Point2::new(0.3, -0.3));
        assert_eq!(FilteredPredicates.in_circle(&v, &gens, &d), 0.0);
        assert_eq!(ExactPredicates.in_circle(&v, &gens, &d), 0.0);
    }

    #[test]
    fn segment_claims_only_inside_its_slab() {
        let s = Site::Segment(Segment2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)));
        let gens = [Site::Point(Point2::new(0.5, 1.0))];
        let above = vertex_at(Point2::new(0.5, 0.4), 0.6);
        let beyond = vertex_at(Point2::new(1.5, 0.1), 5.0);
        assert!(FilteredPredicates.in_circle(&above, &gens, &s) > 0.0);
        assert!(FilteredPredicates.in_circle(&beyond, &gens, &s) <= 0.0);
    }

    #[test]
    fn crossing_and_touching_segments_interfere() {
        let h = Segment2::new(Point2::new(-0.5, 0.0), Point2::new(0.5, 0.0));
        let v = Segment2::new(Point2::new(0.0, -0.5), Point2::new(0.0, 0.5));
        assert!(segments_interfere(&h, &v));

        let t = Segment2::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.5));
        assert!(segments_interfere(&h, &t));

        let chained = Segment2::new(Point2::new(0.5, 0.0), Point2::new(0.5, 0.5));
        assert!(!segments_interfere(&h, &chained));

        let overlap = Segment2::new(Point2::new(0.5, 0.0), Point2::new(0.2, 0.0));
        assert!(segments_interfere(&h, &overlap));

        let straight_on = Segment2::new(Point2::new(0.5, 0.0), Point2::new(0.9, 0.0));
        assert!(!segments_interfere(&h, &straight_on));
    }
}
