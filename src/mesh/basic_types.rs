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

use crate::mesh::{face::Face, half_edge::HalfEdge, vertex::Vertex};

/// Planar half-edge graph. Entities are tombstoned rather than dropped so
/// indices held elsewhere stay valid.
///
/// The vectors only grow: every insertion leaves its removed vertices and
/// half-edges behind, roughly a constant number per site. Iterate with
/// `live_vertices`/`live_half_edges` and count with `is_connected` or
/// `live_edge_count`; `vertices.len()` is not the size of the diagram.
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeGraph {
    pub vertices: Vec<Vertex>,
    pub half_edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
}

/// Result of splitting an edge pair at a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSplit {
    /// New half-edge leaving the split vertex along the original direction.
    pub forward: usize,
    /// New half-edge leaving the split vertex along the twin's direction.
    pub backward: usize,
}
