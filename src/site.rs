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
    geometry::{Curve, Line2, Parabola, Point2, Segment2},
    mesh::half_edge::EdgeKind,
};

/// Index into the diagram's site list.
pub type SiteId = usize;

/// A generator of the diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Site {
    Point(Point2),
    Segment(Segment2),
}

impl Site {
    pub fn is_point(&self) -> bool {
        matches!(self, Site::Point(_))
    }

    pub fn point(&self) -> Option<Point2> {
        match self {
            Site::Point(p) => Some(*p),
            Site::Segment(_) => None,
        }
    }

    pub fn segment(&self) -> Option<&Segment2> {
        match self {
            Site::Point(_) => None,
            Site::Segment(s) => Some(s),
        }
    }

    /// Distance from `p` to the closed site.
    pub fn distance_to(&self, p: &Point2) -> f64 {
        match self {
            Site::Point(q) => q.distance_to(p),
            Site::Segment(s) => s.distance_to(p),
        }
    }

    /// Point of the closed site nearest to `p`.
    pub fn closest_point(&self, p: &Point2) -> Point2 {
        match self {
            Site::Point(q) => *q,
            Site::Segment(s) => s.closest_point(p),
        }
    }

    /// True when this is a point sitting exactly on an endpoint of `seg`.
    pub fn is_endpoint_of(&self, seg: &Segment2) -> bool {
        match self {
            Site::Point(p) => *p == seg.a || *p == seg.b,
            Site::Segment(_) => false,
        }
    }

    /// Lower-left and upper-right corners.
    pub fn bounds(&self) -> (Point2, Point2) {
        match self {
            Site::Point(p) => (*p, *p),
            Site::Segment(s) => s.bounds(),
        }
    }
}

/// Curve and edge kind of the bisector between two sites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisector {
    pub kind: EdgeKind,
    pub curve: Curve,
}

/// Builds the bisector of `s1` and `s2`. `hints` are two points known to lie
/// on the wanted branch; they pick the side for separators and for the
/// angle bisector of two segments.
pub fn bisector(s1: &Site, s2: &Site, hints: [Point2; 2]) -> Bisector {
    match (s1, s2) {
        (Site::Point(p), Site::Point(q)) => Bisector {
            kind: EdgeKind::Line,
            curve: Curve::Line(Line2::bisector(p, q)),
        },
        (Site::Point(p), Site::Segment(s)) | (Site::Segment(s), Site::Point(p)) => {
            point_segment_bisector(p, s, hints)
        }
        (Site::Segment(a), Site::Segment(b)) => segment_segment_bisector(a, b, hints),
    }
}

fn farthest_hint(origin: &Point2, hints: &[Point2; 2]) -> Point2 {
    if hints[0].distance_squared_to(origin) >= hints[1].distance_squared_to(origin) {
        hints[0]
    } else {
        hints[1]
    }
}

fn point_segment_bisector(p: &Point2, s: &Segment2, hints: [Point2; 2]) -> Bisector {
    if *p == s.a || *p == s.b {
        let n = s.normal();
        let far = farthest_hint(p, &hints);
        let dir = if (far - *p).dot(&n) >= 0.0 { n } else { -n };
        return Bisector {
            kind: EdgeKind::Separator,
            curve: Curve::Line(Line2::new(*p, dir)),
        };
    }
    match Parabola::new(p, s) {
        Some(par) => Bisector {
            kind: EdgeKind::Parabola,
            curve: Curve::Parabola(par),
        },
        None => {
            // focus on the supporting line: only the nearer endpoint matters
            let q = if p.distance_squared_to(&s.a) <= p.distance_squared_to(&s.b) {
                s.a
            } else {
                s.b
            };
            Bisector {
                kind: EdgeKind::Line,
                curve: Curve::Line(Line2::bisector(p, &q)),
            }
        }
    }
}

fn segment_segment_bisector(s1: &Segment2, s2: &Segment2, hints: [Point2; 2]) -> Bisector {
    let (n1, n2) = (s1.normal(), s2.normal());
    let (c1, c2) = (n1.dot(&s1.a), n2.dot(&s2.a));
    let weight = |h: &Point2| (n1.dot(h) - c1).abs() + (n2.dot(h) - c2).abs();
    let h = if weight(&hints[0]) >= weight(&hints[1]) {
        hints[0]
    } else {
        hints[1]
    };
    let sign = |d: f64| if d < 0.0 { -1.0 } else { 1.0 };
    let (k1, k2) = (sign(n1.dot(&h) - c1), sign(n2.dot(&h) - c2));
    let normal = n1 * k1 - n2 * k2;
    let offset = c1 * k1 - c2 * k2;
    let len2 = normal.norm_squared();
    let curve = if len2 < 1e-24 {
        Line2::new(hints[0].midpoint(&hints[1]), s1.direction())
    } else {
        let origin = h - normal * ((normal.dot(&h) - offset) / len2);
        Line2::new(origin, normal.perp())
    };
    Bisector {
        kind: EdgeKind::Line,
        curve: Curve::Line(curve),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_and_segment_give_a_separator() {
        let a = Point2::new(0.0, 0.0);
        let s = Segment2::new(a, Point2::new(1.0, 0.0));
        let b = bisector(
            &Site::Point(a),
            &Site::Segment(s),
            [Point2::new(0.0, -0.1), Point2::new(0.0, -0.5)],
        );
        assert_eq!(b.kind, EdgeKind::Separator);
        let far = b.curve.point(1.0);
        assert!(far.y < 0.0);
        assert!(far.x.abs() < 1e-15);
    }

    #[test]
    fn segments_meeting_at_a_corner_bisect_the_angle() {
        let o = Point2::new(0.0, 0.0);
        let s1 = Segment2::new(o, Point2::new(1.0, 0.0));
        let s2 = Segment2::new(o, Point2::new(0.0, 1.0));
        let hint = Point2::new(0.3, 0.3);
        let b = bisector(&Site::Segment(s1), &Site::Segment(s2), [o, hint]);
        assert_eq!(b.kind, EdgeKind::Line);
        let p = b.curve.point(b.curve.param(&Point2::new(0.5, 0.5)) + 0.25);
        assert!((s1.distance_to(&p) - s2.distance_to(&p)).abs() < 1e-12);
        assert!(b.curve.distance_to(&o) < 1e-12);
    }

    #[test]
    fn point_and_distant_segment_give_a_parabola() {
        let s = Segment2::new(Point2::new(-0.5, -0.2), Point2::new(0.5, -0.2));
        let b = bisector(
            &Site::Point(Point2::new(0.0, 0.5)),
            &Site::Segment(s),
            [Point2::origin(), Point2::origin()],
        );
        assert_eq!(b.kind, EdgeKind::Parabola);
    }
}
