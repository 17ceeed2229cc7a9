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

use crate::{geometry::Point2, mesh::basic_types::HalfEdgeGraph};

impl HalfEdgeGraph {
    #[inline]
    pub fn target(&self, h: usize) -> usize {
        self.half_edges[h].vertex
    }

    #[inline]
    pub fn source(&self, h: usize) -> usize {
        self.half_edges[self.half_edges[h].twin].vertex
    }

    #[inline]
    pub fn twin(&self, h: usize) -> usize {
        self.half_edges[h].twin
    }

    #[inline]
    pub fn next(&self, h: usize) -> usize {
        self.half_edges[h].next
    }

    #[inline]
    pub fn prev(&self, h: usize) -> usize {
        self.half_edges[h].prev
    }

    #[inline]
    pub fn position(&self, v: usize) -> Point2 {
        self.vertices[v].position
    }

    /// Half-edges of the cycle starting at `start`, or `None` if the cycle
    /// does not close within the number of stored half-edges.
    pub fn cycle_from(&self, start: usize) -> Option<Vec<usize>> {
        let limit = self.half_edges.len() + 1;
        let mut result = Vec::new();
        let mut cur = start;
        loop {
            if cur == usize::MAX || result.len() > limit {
                return None;
            }
            result.push(cur);
            cur = self.half_edges[cur].next;
            if cur == start {
                return Some(result);
            }
        }
    }

    /// Boundary half-edges of `f` in `next` order.
    pub fn face_half_edges(&self, f: usize) -> Vec<usize> {
        let start = self.faces[f].half_edge;
        if start == usize::MAX {
            return Vec::new();
        }
        self.cycle_from(start).unwrap_or_default()
    }

    /// Boundary vertices of `f` in traversal order (targets of the cycle).
    pub fn face_vertices(&self, f: usize) -> Vec<usize> {
        self.face_half_edges(f)
            .into_iter()
            .map(|h| self.half_edges[h].vertex)
            .collect()
    }

    /// Outgoing half-edges of `v`, rotating with `twin(h).next`.
    pub fn outgoing_half_edges(&self, v: usize) -> SmallVec<[usize; 4]> {
        let mut result = SmallVec::new();
        let Some(start) = self.vertices[v].half_edge else {
            return result;
        };
        let limit = self.half_edges.len() + 1;
        let mut h = start;
        loop {
            result.push(h);
            let t = self.half_edges[h].twin;
            h = self.half_edges[t].next;
            if h == start || h == usize::MAX || result.len() > limit {
                break;
            }
        }
        result
    }

    pub fn neighbors(&self, v: usize) -> SmallVec<[usize; 4]> {
        self.outgoing_half_edges(v)
            .into_iter()
            .map(|h| self.half_edges[h].vertex)
            .collect()
    }

    /// Faces around `v`, one per outgoing half-edge.
    pub fn vertex_faces(&self, v: usize) -> SmallVec<[usize; 4]> {
        let mut faces: SmallVec<[usize; 4]> = SmallVec::new();
        for h in self.outgoing_half_edges(v) {
            let f = self.half_edges[h].face;
            if !faces.contains(&f) {
                faces.push(f);
            }
        }
        faces
    }

    /// Faces around `v` in counter-clockwise order, one per outgoing
    /// half-edge.
    pub fn faces_ccw(&self, v: usize) -> SmallVec<[usize; 4]> {
        let mut result = SmallVec::new();
        let Some(start) = self.vertices[v].half_edge else {
            return result;
        };
        let limit = self.half_edges.len() + 1;
        let mut h = start;
        loop {
            result.push(self.half_edges[h].face);
            h = self.half_edges[self.half_edges[h].prev].twin;
            if h == start || h == usize::MAX || result.len() > limit {
                break;
            }
        }
        result
    }

    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.outgoing_half_edges(v).len()
    }

    pub fn live_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.vertices.len()).filter(|&v| !self.vertices[v].removed)
    }

    pub fn live_half_edges(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.half_edges.len()).filter(|&h| !self.half_edges[h].removed)
    }

    pub fn live_edge_count(&self) -> usize {
        self.live_half_edges().count() / 2
    }

    /// Sampled outline of face `f`; parabolic edges contribute `samples`
    /// pieces each.
    pub fn face_polygon(&self, f: usize, samples: usize) -> Vec<Point2> {
        let mut out = Vec::new();
        for h in self.face_half_edges(f) {
            let from = self.position(self.source(h));
            let to = self.position(self.target(h));
            let pts = self.half_edges[h].curve.sample(&from, &to, samples);
            out.extend_from_slice(&pts[..pts.len() - 1]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        geometry::{Curve, Line2, Point2},
        mesh::{
            basic_types::HalfEdgeGraph,
            half_edge::EdgeKind,
            vertex::{Vertex, VertexKind, VertexStatus},
        },
    };

    /// Triangle a, b, c with an inner (ccw) and outer face.
    fn triangle() -> HalfEdgeGraph {
        let mut g = HalfEdgeGraph::new();
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let vs: Vec<usize> = pts
            .iter()
            .map(|p| g.add_vertex(Vertex::new(*p, 0.0, VertexStatus::Out, VertexKind::Normal)))
            .collect();
        let inner = g.add_face(Some(0));
        let outer = g.add_face(None);
        let mut fwd = Vec::new();
        let mut back = Vec::new();
        for i in 0..3 {
            let (a, b) = (vs[i], vs[(i + 1) % 3]);
            let curve = Curve::Line(Line2::new(pts[i], pts[(i + 1) % 3] - pts[i]));
            let (h, t) = g.add_edge_pair(a, b, inner, outer, EdgeKind::Line, curve);
            fwd.push(h);
            back.push(t);
        }
        for i in 0..3 {
            g.set_next(fwd[i], fwd[(i + 1) % 3]);
            g.set_next(back[(i + 1) % 3], back[i]);
        }
        g
    }

    #[test]
    fn face_cycles_close() {
        let g = triangle();
        assert_eq!(g.face_vertices(0), vec![1, 2, 0]);
        assert_eq!(g.face_half_edges(1).len(), 3);
    }

    #[test]
    fn vertex_star() {
        let g = triangle();
        for v in 0..3 {
            assert_eq!(g.degree(v), 2);
            assert_eq!(g.vertex_faces(v).len(), 2);
        }
        let mut n = g.neighbors(0).to_vec();
        n.sort();
        assert_eq!(n, vec![1, 2]);
    }

    #[test]
    fn polygon_of_straight_face() {
        let g = triangle();
        let poly = g.face_polygon(0, 8);
        assert_eq!(poly.len(), 3);
        assert!(crate::geometry::util::polygon_area(&poly) > 0.0);
    }
}
