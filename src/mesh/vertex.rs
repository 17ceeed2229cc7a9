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

use smallvec::SmallVec;

use crate::{geometry::Point2, site::SiteId};

/// Classification of a vertex with respect to the site being inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexStatus {
    Out,
    In,
    New,
    Undecided,
    Outer,
    PointSite,
    Endpoint,
}

impl VertexStatus {
    /// Statuses that may never be classified IN.
    pub fn is_fixed(&self) -> bool {
        matches!(
            self,
            VertexStatus::Outer | VertexStatus::PointSite | VertexStatus::Endpoint
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VertexStatus::Out => "OUT",
            VertexStatus::In => "IN",
            VertexStatus::New => "NEW",
            VertexStatus::Undecided => "UNDECIDED",
            VertexStatus::Outer => "OUTER",
            VertexStatus::PointSite => "POINTSITE",
            VertexStatus::Endpoint => "ENDPOINT",
        }
    }
}

/// How a vertex came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// Meeting point of three bisectors, or a site vertex.
    Normal,
    /// Apex of a parabolic edge, degree two.
    Apex,
    /// Where a separator meets the rest of the diagram.
    SepPoint,
    /// Degree-two vertex that cuts an edge for the length of one insertion.
    Split,
}

impl VertexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VertexKind::Normal => "NORMAL",
            VertexKind::Apex => "APEX",
            VertexKind::SepPoint => "SEPPOINT",
            VertexKind::Split => "SPLIT",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Point2,
    /// Distance to the defining sites.
    pub clearance: f64,
    pub status: VertexStatus,
    pub kind: VertexKind,
    /// One outgoing half-edge; `None` while the vertex is isolated.
    pub half_edge: Option<usize>,
    pub generators: SmallVec<[SiteId; 3]>,
    pub removed: bool,
}

impl Vertex {
    pub fn new(position: Point2, clearance: f64, status: VertexStatus, kind: VertexKind) -> Self {
        Self {
            position,
            clearance,
            status,
            kind,
            half_edge: None,
            generators: SmallVec::new(),
            removed: false,
        }
    }

    pub fn with_generators(mut self, generators: &[SiteId]) -> Self {
        self.generators = SmallVec::from_slice(generators);
        self
    }

    #[inline]
    pub fn clearance_squared(&self) -> f64 {
        self.clearance * self.clearance
    }

    /// Live and attached to at least one edge.
    #[inline]
    pub fn is_connected(&self) -> bool {
        !self.removed && self.half_edge.is_some()
    }
}
