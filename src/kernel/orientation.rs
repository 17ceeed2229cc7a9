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
    geometry::Point2,
    numeric::{Ball, ExactRational},
};

/// Returns:
/// - >0 if counter-clockwise
/// - <0 if clockwise
/// - =0 if collinear
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn orient2d_ball(a: &Point2, b: &Point2, c: &Point2) -> Ball {
    let (ax, ay) = (Ball::from(a.x), Ball::from(a.y));
    let bx_ax = Ball::from(b.x) - ax;
    let by_ay = Ball::from(b.y) - ay;
    let cx_ax = Ball::from(c.x) - ax;
    let cy_ay = Ball::from(c.y) - ay;
    bx_ax * cy_ay - by_ay * cx_ax
}

fn orient2d_exact(a: &Point2, b: &Point2, c: &Point2) -> ExactRational {
    let (ax, ay) = (ExactRational::from_f64(a.x), ExactRational::from_f64(a.y));
    let bx = &ExactRational::from_f64(b.x) - &ax;
    let by = &ExactRational::from_f64(b.y) - &ay;
    let cx = &ExactRational::from_f64(c.x) - &ax;
    let cy = &ExactRational::from_f64(c.y) - &ay;
    &(&bx * &cy) - &(&by * &cx)
}

/// Certified sign of [`orient2d`]: interval filter first, rationals when the
/// filter cannot decide.
pub fn orient2d_sign(a: &Point2, b: &Point2, c: &Point2) -> i8 {
    match orient2d_ball(a, b, c).sign_if_certain() {
        Some(s) => s,
        None => orient2d_exact(a, b, c).sign(),
    }
}

/// In-circle determinant: >0 iff `d` lies inside the circle through
/// `a, b, c` when those are counter-clockwise (sign flips for clockwise).
pub fn incircle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> f64 {
    let (adx, ady) = (a.x - d.x, a.y - d.y);
    let (bdx, bdy) = (b.x - d.x, b.y - d.y);
    let (cdx, cdy) = (c.x - d.x, c.y - d.y);
    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;
    alift * (bdx * cdy - cdx * bdy)
        + blift * (cdx * ady - adx * cdy)
        + clift * (adx * bdy - bdx * ady)
}

fn incircle_ball(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> Ball {
    let (dx, dy) = (Ball::from(d.x), Ball::from(d.y));
    let (adx, ady) = (Ball::from(a.x) - dx, Ball::from(a.y) - dy);
    let (bdx, bdy) = (Ball::from(b.x) - dx, Ball::from(b.y) - dy);
    let (cdx, cdy) = (Ball::from(c.x) - dx, Ball::from(c.y) - dy);
    let alift = adx.square() + ady.square();
    let blift = bdx.square() + bdy.square();
    let clift = cdx.square() + cdy.square();
    alift * (bdx * cdy - cdx * bdy)
        + blift * (cdx * ady - adx * cdy)
        + clift * (adx * bdy - bdx * ady)
}

fn incircle_exact(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> ExactRational {
    let dx = ExactRational::from_f64(d.x);
    let dy = ExactRational::from_f64(d.y);
    let rel = |p: &Point2| {
        (
            &ExactRational::from_f64(p.x) - &dx,
            &ExactRational::from_f64(p.y) - &dy,
        )
    };
    let (adx, ady) = rel(a);
    let (bdx, bdy) = rel(b);
    let (cdx, cdy) = rel(c);
    let alift = &adx.square() + &ady.square();
    let blift = &bdx.square() + &bdy.square();
    let clift = &cdx.square() + &cdy.square();
    let m1 = &(&bdx * &cdy) - &(&cdx * &bdy);
    let m2 = &(&cdx * &ady) - &(&adx * &cdy);
    let m3 = &(&adx * &bdy) - &(&bdx * &ady);
    &(&(&alift * &m1) + &(&blift * &m2)) + &(&clift * &m3)
}

/// Certified sign of [`incircle`].
pub fn incircle_sign(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> i8 {
    match incircle_ball(a, b, c, d).sign_if_certain() {
        Some(s) => s,
        None => incircle_exact(a, b, c, d).sign(),
    }
}

/// Exact sign, skipping the filter.
pub fn incircle_sign_exact(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> i8 {
    incircle_exact(a, b, c, d).sign()
}

/// Exact sign, skipping the filter.
pub fn orient2d_sign_exact(a: &Point2, b: &Point2, c: &Point2) -> i8 {
    orient2d_exact(a, b, c).sign()
}
