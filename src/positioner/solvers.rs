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

//! Closed-form Voronoi vertices for three sites, with segments treated as
//! their supporting lines. Callers validate candidates against the closed
//! sites and the edge being split.

use crate::geometry::{
    Point2, Segment2,
    util::{EPS, solve3, solve_quadratic},
};

/// Supporting line `n · x = c` with unit `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEq {
    pub n: Point2,
    pub c: f64,
}

impl LineEq {
    pub fn of(seg: &Segment2) -> Self {
        let n = seg.normal();
        Self { n, c: n.dot(&seg.a) }
    }

    #[inline]
    pub fn eval(&self, p: &Point2) -> f64 {
        self.n.dot(p) - self.c
    }
}

/// Circumcenter of three points.
pub fn ppp(a: &Point2, b: &Point2, c: &Point2) -> Option<Point2> {
    let ba = *b - *a;
    let ca = *c - *a;
    let d = 2.0 * ba.cross(&ca);
    let scale = ba.norm_squared().max(ca.norm_squared());
    if d.abs() <= EPS * scale {
        return None;
    }
    let (b2, c2) = (ba.norm_squared(), ca.norm_squared());
    let ux = (ca.y * b2 - ba.y * c2) / d;
    let uy = (ba.x * c2 - ca.x * b2) / d;
    Some(*a + Point2::new(ux, uy))
}

/// Points equidistant to `p1`, `p2` and a line: up to two.
pub fn ppl(p1: &Point2, p2: &Point2, line: &LineEq) -> Vec<Point2> {
    let m = p1.midpoint(p2);
    let Some(w) = (*p2 - *p1).perp().normalized() else {
        return Vec::new();
    };
    let q = m.distance_squared_to(p1);
    let a = line.n.dot(&w);
    let b = line.eval(&m);
    solve_quadratic(1.0 - a * a, -2.0 * a * b, q - b * b)
        .into_iter()
        .map(|lambda| m + w * lambda)
        .collect()
}

/// Points equidistant to `p` and two lines, over all side combinations.
pub fn pll(p: &Point2, l1: &LineEq, l2: &LineEq) -> Vec<Point2> {
    let det = l1.n.cross(&l2.n);
    if det.abs() <= EPS {
        return Vec::new();
    }
    let inv = |u: f64, v: f64| {
        Point2::new(
            (u * l2.n.y - v * l1.n.y) / det,
            (v * l1.n.x - u * l2.n.x) / det,
        )
    };
    let x0 = inv(l1.c, l2.c);
    let mut out = Vec::new();
    for k1 in [1.0, -1.0] {
        for k2 in [1.0, -1.0] {
            // x = x0 + r * x1 satisfies both line equations at distance r
            let x1 = inv(k1, k2);
            let rel = x0 - *p;
            let roots = solve_quadratic(
                x1.norm_squared() - 1.0,
                2.0 * x1.dot(&rel),
                rel.norm_squared(),
            );
            out.extend(roots.into_iter().filter(|r| *r >= 0.0).map(|r| x0 + x1 * r));
        }
    }
    out
}

/// Points equidistant to three lines (incenters and excenters).
pub fn lll(l1: &LineEq, l2: &LineEq, l3: &LineEq) -> Vec<Point2> {
    let mut out = Vec::new();
    for k1 in [1.0, -1.0] {
        for k2 in [1.0, -1.0] {
            for k3 in [1.0, -1.0] {
                let m = [
                    [l1.n.x, l1.n.y, -k1],
                    [l2.n.x, l2.n.y, -k2],
                    [l3.n.x, l3.n.y, -k3],
                ];
                if let Some([x, y, r]) = solve3(&m, &[l1.c, l2.c, l3.c]) {
                    if r > 0.0 {
                        out.push(Point2::new(x, y));
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circumcenter_of_right_triangle() {
        let c = ppp(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            &Point2::new(0.0, 2.0),
        )
        .unwrap();
        assert!((c.x - 1.0).abs() < 1e-15 && (c.y - 1.0).abs() < 1e-15);
        assert!(ppp(&Point2::origin(), &Point2::new(1.0, 1.0), &Point2::new(2.0, 2.0)).is_none());
    }

    #[test]
    fn point_point_line_candidates_are_equidistant() {
        let p1 = Point2::new(-0.3, 0.5);
        let p2 = Point2::new(0.4, 0.6);
        let seg = Segment2::new(Point2::new(-1.0, -0.2), Point2::new(1.0, -0.2));
        let line = LineEq::of(&seg);
        let cands = ppl(&p1, &p2, &line);
        assert_eq!(cands.len(), 2);
        for c in cands {
            let d1 = c.distance_to(&p1);
            assert!((d1 - c.distance_to(&p2)).abs() < 1e-12);
            assert!((d1 - line.eval(&c).abs()).abs() < 1e-12);
        }
    }

    #[test]
    fn point_line_line_candidates_are_equidistant() {
        let p = Point2::new(0.5, 0.5);
        let l1 = LineEq::of(&Segment2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)));
        let l2 = LineEq::of(&Segment2::new(Point2::new(0.0, 0.0), Point2::new(0.0, 1.0)));
        let cands = pll(&p, &l1, &l2);
        assert!(!cands.is_empty());
        for c in cands {
            let r = c.distance_to(&p);
            assert!((l1.eval(&c).abs() - r).abs() < 1e-12);
            assert!((l2.eval(&c).abs() - r).abs() < 1e-12);
        }
    }

    #[test]
    fn triangle_incenter_is_among_three_line_candidates() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 0.0);
        let c = Point2::new(0.0, 3.0);
        let lines = [
            LineEq::of(&Segment2::new(a, b)),
            LineEq::of(&Segment2::new(b, c)),
            LineEq::of(&Segment2::new(c, a)),
        ];
        let cands = lll(&lines[0], &lines[1], &lines[2]);
        // 3-4-5 triangle has inradius 1, incenter (1, 1)
        assert!(
            cands
                .iter()
                .any(|p| (p.x - 1.0).abs() < 1e-12 && (p.y - 1.0).abs() < 1e-12)
        );
    }
}
