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

//! Placement of NEW vertices on the edges that cross the boundary of the
//! region claimed by an inserted site.

pub mod solvers;

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::trace;

use crate::{
    geometry::{Curve, Point2},
    positioner::solvers::{LineEq, lll, pll, ppl, ppp},
    site::Site,
};

/// Which closed form produced (or was tried for) a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverClass {
    Ppp,
    Ppl,
    Pll,
    Lll,
    /// Start of a segment's slab on the edge.
    Sep,
}

impl SolverClass {
    /// Class of the three sites, by how many are segments.
    pub fn of(sites: &[Site; 3]) -> Self {
        match sites.iter().filter(|s| !s.is_point()).count() {
            0 => SolverClass::Ppp,
            1 => SolverClass::Ppl,
            2 => SolverClass::Pll,
            _ => SolverClass::Lll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("no position found on edge: {0}")]
    NoPosition(&'static str),
}

/// One IN-OUT edge to place a vertex on.
#[derive(Debug, Clone, Copy)]
pub struct PositionRequest {
    pub curve: Curve,
    pub in_position: Point2,
    pub out_position: Point2,
    /// Sites of the two faces along the edge.
    pub sites: [Site; 2],
    pub new_site: Site,
    /// Set when one of the faces belongs to an endpoint of the new segment:
    /// the projection parameter (0 or 1) where its slab begins.
    pub separator: Option<f64>,
    /// Retry counter; non-zero attempts jitter the sampling.
    pub attempt: usize,
    pub tolerance: f64,
    /// Solutions at or beyond this radius are rejected.
    pub bound: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub position: Point2,
    pub clearance: f64,
    pub solver: SolverClass,
}

/// Strategy computing NEW vertex positions.
pub trait VertexPositioner {
    fn position(&mut self, request: &PositionRequest) -> Result<Solution, PositionError>;
}

/// Closed forms first, then bracketed bisection along the edge curve.
#[derive(Debug, Clone)]
pub struct BisectorPositioner {
    rng: StdRng,
    samples: usize,
}

impl Default for BisectorPositioner {
    fn default() -> Self {
        Self::with_seed(0x5eed)
    }
}

const BISECTION_STEPS: usize = 200;

impl BisectorPositioner {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            samples: 64,
        }
    }

    fn scale(req: &PositionRequest) -> f64 {
        1.0 + req.in_position.norm().max(req.out_position.norm())
    }

    /// Acceptance test shared by every candidate.
    fn accept(req: &PositionRequest, p: &Point2, u_range: (f64, f64)) -> Option<f64> {
        if !p.is_finite() {
            return None;
        }
        let tol = req.tolerance * Self::scale(req);
        let u = req.curve.param(p);
        if u < u_range.0 - tol || u > u_range.1 + tol || req.curve.distance_to(p) > tol {
            return None;
        }
        let dn = req.new_site.distance_to(p);
        let r0 = (req.sites[0].distance_to(p) - dn).abs();
        let r1 = (req.sites[1].distance_to(p) - dn).abs();
        let residual = r0.max(r1);
        (residual <= tol).then_some(residual)
    }

    fn closed_form(
        &self,
        req: &PositionRequest,
        u_range: (f64, f64),
    ) -> Option<(Point2, SolverClass)> {
        let sites = [req.sites[0], req.sites[1], req.new_site];
        let class = SolverClass::of(&sites);
        let points: Vec<Point2> = sites.iter().filter_map(Site::point).collect();
        let lines: Vec<LineEq> = sites
            .iter()
            .filter_map(|s| s.segment().map(LineEq::of))
            .collect();
        let candidates = match class {
            SolverClass::Ppp => ppp(&points[0], &points[1], &points[2])
                .into_iter()
                .collect::<Vec<_>>(),
            SolverClass::Ppl => ppl(&points[0], &points[1], &lines[0]),
            SolverClass::Pll => pll(&points[0], &lines[0], &lines[1]),
            _ => lll(&lines[0], &lines[1], &lines[2]),
        };
        candidates
            .into_iter()
            .filter_map(|p| Self::accept(req, &p, u_range).map(|res| (p, res)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| (p, class))
    }

    /// Root of `g` between `u_in` and `u_out`, expecting `g(u_in) > 0`
    /// and `g(u_out) <= 0`.
    fn bisect<G: Fn(f64) -> f64>(g: &G, mut lo: f64, mut hi: f64) -> f64 {
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if mid == lo || mid == hi {
                break;
            }
            if g(mid) > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    /// Brackets a sign change of `g` from the IN end, sampling the edge when
    /// the end values do not bracket one.
    fn find_root<G: Fn(f64) -> f64>(
        &mut self,
        g: &G,
        u_in: f64,
        u_out: f64,
        attempt: usize,
        tol: f64,
    ) -> Option<f64> {
        if g(u_in) > 0.0 && g(u_out) <= 0.0 {
            return Some(Self::bisect(g, u_in, u_out));
        }
        let n = self.samples;
        let jitter = if attempt > 0 {
            self.rng.random_range(0.0..0.5)
        } else {
            0.0
        };
        let mut prev_u = u_in;
        let mut prev_g = g(u_in);
        let mut best = (prev_g.abs(), u_in);
        for i in 1..=n {
            let frac = if i == n {
                1.0
            } else {
                (i as f64 + jitter) / n as f64
            };
            let u = u_in + (u_out - u_in) * frac;
            let gu = g(u);
            if gu.abs() < best.0 {
                best = (gu.abs(), u);
            }
            if prev_g > 0.0 && gu <= 0.0 {
                return Some(Self::bisect(g, prev_u, u));
            }
            prev_u = u;
            prev_g = gu;
        }
        (best.0 <= tol).then_some(best.1)
    }

    fn solution(
        req: &PositionRequest,
        p: Point2,
        solver: SolverClass,
    ) -> Result<Solution, PositionError> {
        if p.norm() >= req.bound {
            return Err(PositionError::NoPosition("outside the outer bound"));
        }
        let clearance = (req.sites[0].distance_to(&p)
            + req.sites[1].distance_to(&p)
            + req.new_site.distance_to(&p))
            / 3.0;
        Ok(Solution {
            position: p,
            clearance,
            solver,
        })
    }
}

impl VertexPositioner for BisectorPositioner {
    fn position(&mut self, req: &PositionRequest) -> Result<Solution, PositionError> {
        let u_in = req.curve.param(&req.in_position);
        let u_out = req.curve.param(&req.out_position);
        let u_range = (u_in.min(u_out), u_in.max(u_out));
        let tol = req.tolerance * Self::scale(req);
        let curve = req.curve;

        if let (Some(t0), Site::Segment(seg)) = (req.separator, req.new_site) {
            let side = if seg.param(&req.in_position) >= t0 { 1.0 } else { -1.0 };
            let g = |u: f64| side * (seg.param(&curve.point(u)) - t0);
            if let Some(u) = self.find_root(&g, u_in, u_out, req.attempt, req.tolerance) {
                trace!(u, "separator vertex");
                return Self::solution(req, curve.point(u), SolverClass::Sep);
            }
        }

        if let Some((p, class)) = self.closed_form(req, u_range) {
            return Self::solution(req, p, class);
        }

        let sites = req.sites;
        let new_site = req.new_site;
        let f = |u: f64| {
            let p = curve.point(u);
            0.5 * (sites[0].distance_to(&p) + sites[1].distance_to(&p)) - new_site.distance_to(&p)
        };
        match self.find_root(&f, u_in, u_out, req.attempt, tol) {
            Some(u) => {
                let class = SolverClass::of(&[sites[0], sites[1], new_site]);
                Self::solution(req, curve.point(u), class)
            }
            None => Err(PositionError::NoPosition("no sign change along the edge")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Line2, Segment2};

    fn request(
        curve: Curve,
        a: Point2,
        b: Point2,
        sites: [Site; 2],
        new_site: Site,
    ) -> PositionRequest {
        PositionRequest {
            curve,
            in_position: a,
            out_position: b,
            sites,
            new_site,
            separator: None,
            attempt: 0,
            tolerance: 1e-9,
            bound: 100.0,
        }
    }

    #[test]
    fn three_points_use_the_circumcenter() {
        let p = Point2::new(-0.5, 0.0);
        let q = Point2::new(0.5, 0.0);
        let s = Point2::new(0.0, 0.5);
        let curve = Curve::Line(Line2::bisector(&p, &q));
        let req = request(
            curve,
            Point2::new(0.0, 1.0),
            Point2::new(0.0, -1.0),
            [Site::Point(p), Site::Point(q)],
            Site::Point(s),
        );
        let sol = BisectorPositioner::default().position(&req).unwrap();
        assert_eq!(sol.solver, SolverClass::Ppp);
        assert!(sol.position.x.abs() < 1e-12);
        // equidistant: y such that 0.25 + y^2 = (0.5 - y)^2  =>  y = 0
        assert!(sol.position.y.abs() < 1e-12);
        assert!((sol.clearance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn separator_mode_stops_at_the_slab() {
        let a = Point2::new(0.0, 0.0);
        let g = Point2::new(0.0, 1.0);
        let seg = Segment2::new(a, Point2::new(1.0, 0.0));
        let curve = Curve::Line(Line2::bisector(&a, &g));
        let mut req = request(
            curve,
            Point2::new(0.4, 0.5),
            Point2::new(-0.4, 0.5),
            [Site::Point(a), Site::Point(g)],
            Site::Segment(seg),
        );
        req.separator = Some(0.0);
        let sol = BisectorPositioner::default().position(&req).unwrap();
        assert_eq!(sol.solver, SolverClass::Sep);
        assert!(sol.position.x.abs() < 1e-12);
        assert!((sol.position.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn missing_sign_change_is_no_position() {
        let p = Point2::new(-0.5, 0.0);
        let q = Point2::new(0.5, 0.0);
        let curve = Curve::Line(Line2::bisector(&p, &q));
        let req = request(
            curve,
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 2.0),
            [Site::Point(p), Site::Point(q)],
            Site::Point(Point2::new(0.0, -5.0)),
        );
        assert!(BisectorPositioner::default().position(&req).is_err());
    }
}
