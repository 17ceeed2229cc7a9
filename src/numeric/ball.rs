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

use std::ops::{Add, Mul, Neg, Sub};

/// Midpoint-radius interval: the true value lies in `[m - r, m + r]`.
#[derive(Copy, Clone, Debug)]
pub struct Ball {
    pub m: f64,
    pub r: f64,
}

#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = f64::mul_add(a, b, -p);
    (p, err)
}

impl Ball {
    #[inline]
    pub fn exact(x: f64) -> Self {
        Ball { m: x, r: 0.0 }
    }

    #[inline]
    pub fn unknown() -> Self {
        Ball {
            m: 0.0,
            r: f64::INFINITY,
        }
    }

    #[inline]
    pub fn square(self) -> Self {
        self * self
    }

    /// Sign of every value in the interval, or `None` if it straddles zero.
    #[inline]
    pub fn sign_if_certain(self) -> Option<i8> {
        if !self.r.is_finite() || !self.m.is_finite() {
            return None;
        }
        if self.m > self.r {
            Some(1)
        } else if self.m < -self.r {
            Some(-1)
        } else if self.m == 0.0 && self.r == 0.0 {
            Some(0)
        } else {
            None
        }
    }
}

impl From<f64> for Ball {
    fn from(x: f64) -> Self {
        Ball::exact(x)
    }
}

impl Add for Ball {
    type Output = Ball;

    #[inline]
    fn add(self, o: Ball) -> Ball {
        let (s, e) = two_sum(self.m, o.m);
        // one extra ulp for the rounding of the radius sum itself
        let r = self.r + o.r + e.abs();
        Ball {
            m: s,
            r: r + r * f64::EPSILON,
        }
    }
}

impl Sub for Ball {
    type Output = Ball;

    #[inline]
    fn sub(self, o: Ball) -> Ball {
        self + (-o)
    }
}

impl Neg for Ball {
    type Output = Ball;

    #[inline]
    fn neg(self) -> Ball {
        Ball {
            m: -self.m,
            r: self.r,
        }
    }
}

impl Mul for Ball {
    type Output = Ball;

    #[inline]
    fn mul(self, o: Ball) -> Ball {
        let (p, e) = two_prod(self.m, o.m);
        let r = self.m.abs() * o.r + o.m.abs() * self.r + self.r * o.r + e.abs();
        Ball {
            m: p,
            r: r + r * 2.0 * f64::EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_inputs_stay_certain() {
        let a = Ball::exact(3.0);
        let b = Ball::exact(2.0);
        assert_eq!((a - b).sign_if_certain(), Some(1));
        assert_eq!((b - a).sign_if_certain(), Some(-1));
        assert_eq!((a - a).sign_if_certain(), Some(0));
    }

    #[test]
    fn cancellation_is_uncertain() {
        let tiny = Ball::exact(1e-17);
        let one = Ball::exact(1.0);
        // (1 + 1e-17) - 1 rounds to zero in f64; the error term keeps it honest
        let v = (one + tiny) - one;
        assert!(v.r > 0.0 || v.m > 0.0);
        assert_ne!(v.sign_if_certain(), Some(-1));
    }

    #[test]
    fn unknown_never_certifies() {
        assert_eq!(Ball::unknown().sign_if_certain(), None);
    }
}
