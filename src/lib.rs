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

//! Incremental Voronoi diagrams of point and line-segment sites.
//!
//! ```no_run
//! use incremental_voronoi::{Point2, VoronoiDiagram};
//!
//! let mut vd = VoronoiDiagram::new(1.0, 10);
//! let a = vd.insert_point_site(Point2::new(-0.5, -0.2)).unwrap();
//! let b = vd.insert_point_site(Point2::new(0.5, -0.2)).unwrap();
//! vd.insert_point_site(Point2::new(0.0, 0.5)).unwrap();
//! vd.insert_line_site(a, b).unwrap();
//! println!("{}", vd.print());
//! ```

pub mod checker;
pub mod config;
pub mod diagram;
pub mod error;
pub mod face_grid;
pub mod geometry;
pub mod io;
pub mod kernel;
pub mod mesh;
pub mod numeric;
pub mod positioner;
pub mod site;

pub use checker::{InvariantKind, InvariantViolation};
pub use config::VoronoiConfig;
pub use diagram::{SiteEntry, Triangulation, VoronoiDiagram};
pub use error::VoronoiError;
pub use geometry::{Point2, Segment2};
pub use site::{Site, SiteId};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
