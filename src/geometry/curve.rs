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

use crate::geometry::{point::Point2, segment::Segment2};

/// Straight bisector `origin + u * dir` with unit `dir`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    pub origin: Point2,
    pub dir: Point2,
}

impl Line2 {
    /// Line through `origin` along `dir`; `dir` is normalized, the zero
    /// vector yields the x axis.
    pub fn new(origin: Point2, dir: Point2) -> Self {
        Self {
            origin,
            dir: dir.normalized().unwrap_or(Point2::new(1.0, 0.0)),
        }
    }

    /// Perpendicular bisector of `p` and `q`.
    pub fn bisector(p: &Point2, q: &Point2) -> Self {
        Self::new(p.midpoint(q), (*q - *p).perp())
    }

    #[inline]
    pub fn point(&self, u: f64) -> Point2 {
        self.origin + self.dir * u
    }

    #[inline]
    pub fn param(&self, p: &Point2) -> f64 {
        (*p - self.origin).dot(&self.dir)
    }

    pub fn distance_to(&self, p: &Point2) -> f64 {
        (*p - self.origin).cross(&self.dir).abs()
    }
}

/// Point/line bisector. Local frame: `u` runs along the directrix from
/// `base`, `h` along `normal` towards the focus at `(fu, fh)`, `fh > 0`.
///
/// `h(u) = ((u - fu)² + fh²) / (2 fh)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola {
    pub base: Point2,
    pub dir: Point2,
    pub normal: Point2,
    pub fu: f64,
    pub fh: f64,
}

impl Parabola {
    /// `None` when the focus lies on the directrix.
    pub fn new(focus: &Point2, directrix: &Segment2) -> Option<Self> {
        let dir = (directrix.b - directrix.a).normalized()?;
        let mut normal = dir.perp();
        let rel = *focus - directrix.a;
        let mut fh = rel.dot(&normal);
        if fh < 0.0 {
            normal = -normal;
            fh = -fh;
        }
        if fh <= f64::EPSILON * (1.0 + rel.norm()) {
            return None;
        }
        Some(Self {
            base: directrix.a,
            dir,
            normal,
            fu: rel.dot(&dir),
            fh,
        })
    }

    pub fn focus(&self) -> Point2 {
        self.base + self.dir * self.fu + self.normal * self.fh
    }

    /// Height above the directrix, equal to the distance to the focus.
    #[inline]
    pub fn height(&self, u: f64) -> f64 {
        let du = u - self.fu;
        (du * du + self.fh * self.fh) / (2.0 * self.fh)
    }

    #[inline]
    pub fn point(&self, u: f64) -> Point2 {
        self.base + self.dir * u + self.normal * self.height(u)
    }

    #[inline]
    pub fn param(&self, p: &Point2) -> f64 {
        (*p - self.base).dot(&self.dir)
    }

    /// Vertical (along `normal`) offset from the curve, a cheap stand-in for
    /// the true distance near the curve.
    pub fn distance_to(&self, p: &Point2) -> f64 {
        let h = (*p - self.base).dot(&self.normal);
        (h - self.height(self.param(p))).abs()
    }

    pub fn apex(&self) -> Point2 {
        self.point(self.fu)
    }
}

/// Geometry carried by a half-edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Line(Line2),
    Parabola(Parabola),
}

impl Curve {
    pub fn point(&self, u: f64) -> Point2 {
        match self {
            Curve::Line(l) => l.point(u),
            Curve::Parabola(p) => p.point(u),
        }
    }

    pub fn param(&self, p: &Point2) -> f64 {
        match self {
            Curve::Line(l) => l.param(p),
            Curve::Parabola(par) => par.param(p),
        }
    }

    pub fn distance_to(&self, p: &Point2) -> f64 {
        match self {
            Curve::Line(l) => l.distance_to(p),
            Curve::Parabola(par) => par.distance_to(p),
        }
    }

    /// `(u, point)` of the parabola apex; lines have none.
    pub fn apex(&self) -> Option<(f64, Point2)> {
        match self {
            Curve::Line(_) => None,
            Curve::Parabola(p) => Some((p.fu, p.apex())),
        }
    }

    /// Polyline through the curve between `from` and `to`, both ends included.
    pub fn sample(&self, from: &Point2, to: &Point2, samples: usize) -> Vec<Point2> {
        match self {
            Curve::Line(_) => vec![*from, *to],
            Curve::Parabola(_) => {
                let n = samples.max(1);
                let (u0, u1) = (self.param(from), self.param(to));
                let mut out = Vec::with_capacity(n + 1);
                out.push(*from);
                for i in 1..n {
                    let u = u0 + (u1 - u0) * (i as f64) / (n as f64);
                    out.push(self.point(u));
                }
                out.push(*to);
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parabola_points_are_equidistant() {
        let focus = Point2::new(0.0, 0.5);
        let dir = Segment2::new(Point2::new(-0.5, -0.2), Point2::new(0.5, -0.2));
        let par = Parabola::new(&focus, &dir).unwrap();
        assert!((par.fh - 0.7).abs() < 1e-15);
        for u in [-1.0, -0.3, 0.0, 0.5, 0.9, 2.0] {
            let p = par.point(u);
            let to_focus = p.distance_to(&focus);
            let to_line = (p.y + 0.2).abs();
            assert!((to_focus - to_line).abs() < 1e-12);
            assert!((par.param(&p) - u).abs() < 1e-12);
        }
        let apex = par.apex();
        assert!((apex.x - 0.0).abs() < 1e-15);
        assert!((apex.y - 0.15).abs() < 1e-12);
    }

    #[test]
    fn focus_on_directrix_has_no_parabola() {
        let s = Segment2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert!(Parabola::new(&Point2::new(2.0, 0.0), &s).is_none());
    }

    #[test]
    fn point_bisector_is_equidistant() {
        let p = Point2::new(0.2, 0.1);
        let q = Point2::new(-0.4, 0.7);
        let l = Line2::bisector(&p, &q);
        for u in [-2.0, 0.0, 3.0] {
            let x = l.point(u);
            assert!((x.distance_to(&p) - x.distance_to(&q)).abs() < 1e-12);
        }
    }
}
