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

//! Construction parameters for [`crate::diagram::VoronoiDiagram`].

/// Sites closer than this (relative to the far radius) to an existing site
/// are duplicates.
pub const DEFAULT_MERGE_TOLERANCE: f64 = 1e-10;
/// Residual accepted from the vertex positioner, relative to coordinates.
pub const DEFAULT_GEOMETRIC_TOLERANCE: f64 = 1e-9;
pub const DEFAULT_MAX_RETRIES: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiConfig {
    pub far_radius: f64,
    pub n_bins: usize,
    pub merge_tolerance: f64,
    pub geometric_tolerance: f64,
    pub max_retries: usize,
    /// Run the diagram audit after every insertion and panic on failure.
    pub check_each_insertion: bool,
    pub perturbation_seed: u64,
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        Self {
            far_radius: 1.0,
            n_bins: 10,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
            geometric_tolerance: DEFAULT_GEOMETRIC_TOLERANCE,
            max_retries: DEFAULT_MAX_RETRIES,
            check_each_insertion: cfg!(debug_assertions),
            perturbation_seed: 0x5eed,
        }
    }
}

impl VoronoiConfig {
    pub fn new(far_radius: f64, n_bins: usize) -> Self {
        Self::default().with_far_radius(far_radius).with_n_bins(n_bins)
    }

    pub fn with_far_radius(mut self, far_radius: f64) -> Self {
        self.far_radius = far_radius;
        self
    }

    pub fn with_n_bins(mut self, n_bins: usize) -> Self {
        self.n_bins = n_bins;
        self
    }

    pub fn with_merge_tolerance(mut self, tolerance: f64) -> Self {
        self.merge_tolerance = tolerance;
        self
    }

    pub fn with_geometric_tolerance(mut self, tolerance: f64) -> Self {
        self.geometric_tolerance = tolerance;
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_check_each_insertion(mut self, check: bool) -> Self {
        self.check_each_insertion = check;
        self
    }

    pub fn with_perturbation_seed(mut self, seed: u64) -> Self {
        self.perturbation_seed = seed;
        self
    }

    /// Panics on values the diagram cannot be built with.
    pub(crate) fn validate(&self) {
        assert!(
            self.far_radius.is_finite() && self.far_radius > 0.0,
            "far_radius must be positive, got {}",
            self.far_radius
        );
        assert!(self.n_bins > 0, "n_bins must be positive");
        assert!(
            self.merge_tolerance >= 0.0 && self.geometric_tolerance > 0.0,
            "tolerances must be non-negative"
        );
    }

    /// Absolute merge distance.
    pub(crate) fn merge_distance(&self) -> f64 {
        self.merge_tolerance * self.far_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let cfg = VoronoiConfig::new(2.0, 20)
            .with_max_retries(7)
            .with_check_each_insertion(false);
        assert_eq!(cfg.far_radius, 2.0);
        assert_eq!(cfg.n_bins, 20);
        assert_eq!(cfg.max_retries, 7);
        assert!(!cfg.check_each_insertion);
        assert_eq!(cfg.merge_distance(), 2.0 * DEFAULT_MERGE_TOLERANCE);
    }

    #[test]
    #[should_panic]
    fn zero_radius_is_rejected() {
        VoronoiConfig::new(0.0, 4).validate();
    }
}
