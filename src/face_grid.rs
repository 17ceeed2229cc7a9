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

//! Uniform bin grid answering "which face has the site nearest to p".

use smallvec::SmallVec;

use crate::{geometry::Point2, site::Site};

#[derive(Debug, Clone, Copy)]
struct Entry {
    face: usize,
    site: Site,
}

#[derive(Debug, Clone)]
pub struct FaceGrid {
    far_radius: f64,
    n_bins: usize,
    bin_size: f64,
    bin_inv: f64,
    bins: Vec<SmallVec<[Entry; 2]>>,
    /// Faces whose sites lie outside the grid, checked on every query.
    always: Vec<Entry>,
}

#[inline(always)]
fn floor_sat_i64(x: f64) -> i64 {
    if !x.is_finite() {
        return if x.is_sign_positive() { i64::MAX } else { i64::MIN };
    }
    let i = x as i64;
    i - ((i as f64 > x) as i64)
}

impl FaceGrid {
    pub fn new(far_radius: f64, n_bins: usize) -> Self {
        let n_bins = n_bins.max(1);
        let bin_size = 2.0 * far_radius / n_bins as f64;
        Self {
            far_radius,
            n_bins,
            bin_size,
            bin_inv: 1.0 / bin_size,
            bins: vec![SmallVec::new(); n_bins * n_bins],
            always: Vec::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, x: f64) -> usize {
        let k = floor_sat_i64((x + self.far_radius) * self.bin_inv);
        k.clamp(0, self.n_bins as i64 - 1) as usize
    }

    #[inline]
    fn cell_of(&self, p: &Point2) -> (usize, usize) {
        (self.cell_coord(p.x), self.cell_coord(p.y))
    }

    /// Bins a point site by position and a segment into every bin its
    /// bounding box touches.
    pub fn insert(&mut self, face: usize, site: Site) {
        let (lo, hi) = site.bounds();
        let (i0, j0) = self.cell_of(&lo);
        let (i1, j1) = self.cell_of(&hi);
        for j in j0..=j1 {
            for i in i0..=i1 {
                self.bins[j * self.n_bins + i].push(Entry { face, site });
            }
        }
    }

    /// Registers a face that every query must consider.
    pub fn insert_global(&mut self, face: usize, site: Site) {
        self.always.push(Entry { face, site });
    }

    /// Face whose site is nearest to `p` and that distance.
    pub fn closest_face(&self, p: &Point2) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        let mut consider = |e: &Entry| {
            let d = e.site.distance_to(p);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((e.face, d));
            }
        };
        for e in &self.always {
            consider(e);
        }

        let (ci, cj) = self.cell_of(p);
        let n = self.n_bins as i64;
        let (ci, cj) = (ci as i64, cj as i64);
        let mut local: Option<(usize, f64)> = None;
        for k in 0..=n {
            for j in (cj - k)..=(cj + k) {
                if j < 0 || j >= n {
                    continue;
                }
                let on_edge_row = j == cj - k || j == cj + k;
                let step = if on_edge_row || k == 0 { 1 } else { 2 * k };
                let mut i = ci - k;
                while i <= ci + k {
                    if i >= 0 && i < n {
                        for e in &self.bins[(j * n + i) as usize] {
                            let d = e.site.distance_to(p);
                            if local.is_none_or(|(_, bd)| d < bd) {
                                local = Some((e.face, d));
                            }
                        }
                    }
                    i += step;
                }
            }
            // everything not yet visited is at least k bins away
            if let Some((_, d)) = local {
                if d <= k as f64 * self.bin_size {
                    break;
                }
            }
        }
        if let Some(e) = local {
            match best {
                Some((_, bd)) if bd <= e.1 => {}
                _ => best = Some(e),
            }
        }
        best
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Segment2;

    #[test]
    fn finds_nearest_point_across_bins() {
        let mut grid = FaceGrid::new(1.0, 10);
        grid.insert(0, Site::Point(Point2::new(-0.9, -0.9)));
        grid.insert(1, Site::Point(Point2::new(0.5, 0.5)));
        grid.insert(2, Site::Point(Point2::new(0.95, -0.95)));
        assert_eq!(grid.closest_face(&Point2::new(0.4, 0.45)).map(|f| f.0), Some(1));
        assert_eq!(grid.closest_face(&Point2::new(-0.5, -0.8)).map(|f| f.0), Some(0));
        assert_eq!(grid.closest_face(&Point2::new(0.99, -0.2)).map(|f| f.0), Some(2));
    }

    #[test]
    fn segments_are_found_along_their_length() {
        let mut grid = FaceGrid::new(1.0, 8);
        grid.insert(0, Site::Point(Point2::new(0.0, 0.9)));
        grid.insert(
            1,
            Site::Segment(Segment2::new(Point2::new(-0.8, -0.5), Point2::new(0.8, -0.5))),
        );
        let (f, d) = grid.closest_face(&Point2::new(0.3, -0.4)).unwrap();
        assert_eq!(f, 1);
        assert!((d - 0.1).abs() < 1e-12);
    }

    #[test]
    fn global_faces_are_always_considered() {
        let mut grid = FaceGrid::new(1.0, 4);
        grid.insert_global(7, Site::Point(Point2::new(0.0, 1.5)));
        grid.insert(0, Site::Point(Point2::new(0.0, -0.9)));
        // 0.51 to the global site against 1.89 to the binned one
        assert_eq!(grid.closest_face(&Point2::new(0.0, 0.99)).map(|f| f.0), Some(7));
        assert_eq!(grid.closest_face(&Point2::new(0.0, 0.2)).map(|f| f.0), Some(0));
    }
}
