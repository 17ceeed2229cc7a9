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

use crate::geometry::point::Point2;

/// Closed straight segment from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    pub a: Point2,
    pub b: Point2,
}

impl Segment2 {
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance_to(&self.b)
    }

    pub fn midpoint(&self) -> Point2 {
        self.a.midpoint(&self.b)
    }

    /// Unit direction `a -> b`. Zero-length segments fall back to the x axis.
    pub fn direction(&self) -> Point2 {
        (self.b - self.a)
            .normalized()
            .unwrap_or(Point2::new(1.0, 0.0))
    }

    /// Unit normal on the left of `a -> b`.
    pub fn normal(&self) -> Point2 {
        self.direction().perp()
    }

    /// Projection parameter of `p` on the supporting line: 0 at `a`, 1 at `b`.
    pub fn param(&self, p: &Point2) -> f64 {
        let d = self.b - self.a;
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            return 0.0;
        }
        (*p - self.a).dot(&d) / len2
    }

    /// Signed distance to the supporting line, positive on the left.
    pub fn signed_distance(&self, p: &Point2) -> f64 {
        (*p - self.a).dot(&self.normal())
    }

    pub fn closest_point(&self, p: &Point2) -> Point2 {
        let t = self.param(p).clamp(0.0, 1.0);
        self.a.lerp(&self.b, t)
    }

    /// Distance to the closed segment.
    pub fn distance_to(&self, p: &Point2) -> f64 {
        self.closest_point(p).distance_to(p)
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.b, self.a)
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Point2, Point2) {
        (
            Point2::new(self.a.x.min(self.b.x), self.a.y.min(self.b.y)),
            Point2::new(self.a.x.max(self.b.x), self.a.y.max(self.b.y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_uses_the_closed_segment() {
        let s = Segment2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert!((s.distance_to(&Point2::new(0.5, 2.0)) - 2.0).abs() < 1e-15);
        assert!((s.distance_to(&Point2::new(-3.0, 4.0)) - 5.0).abs() < 1e-15);
        assert!((s.param(&Point2::new(2.0, 7.0)) - 2.0).abs() < 1e-15);
    }

    #[test]
    fn normal_points_left() {
        let s = Segment2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
        assert!(s.signed_distance(&Point2::new(1.0, 1.0)) > 0.0);
        assert!(s.reversed().signed_distance(&Point2::new(1.0, 1.0)) < 0.0);
    }
}
