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

use crate::geometry::{Curve, Line2, Point2};

/// What kind of bisector a half-edge traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Line,
    Parabola,
    Separator,
    /// Reserved: the segment itself is never an edge in this diagram.
    LineSite,
    /// Reserved for circular-arc sites.
    Arc,
    /// Reserved: zero-length connections are ordinary edges here.
    NullEdge,
    OutEdge,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Line => "LINE",
            EdgeKind::Parabola => "PARABOLA",
            EdgeKind::Separator => "SEPARATOR",
            EdgeKind::LineSite => "LINESITE",
            EdgeKind::Arc => "ARC",
            EdgeKind::NullEdge => "NULLEDGE",
            EdgeKind::OutEdge => "OUTEDGE",
        }
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub vertex: usize, // target vertex
    pub face: usize,
    pub next: usize,
    pub prev: usize,
    pub twin: usize,
    pub kind: EdgeKind,
    pub curve: Curve,
    pub removed: bool,
}

impl HalfEdge {
    pub fn new(vertex: usize, face: usize, kind: EdgeKind, curve: Curve) -> Self {
        Self {
            vertex,
            face,
            next: usize::MAX,
            prev: usize::MAX,
            twin: usize::MAX,
            kind,
            curve,
            removed: false,
        }
    }

    /// Placeholder geometry for edges whose curve is assigned later.
    pub fn straight(vertex: usize, face: usize, kind: EdgeKind, from: Point2, to: Point2) -> Self {
        Self::new(vertex, face, kind, Curve::Line(Line2::new(from, to - from)))
    }
}
