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
    geometry::Curve,
    mesh::{
        basic_types::{EdgeSplit, HalfEdgeGraph},
        face::Face,
        half_edge::{EdgeKind, HalfEdge},
        vertex::Vertex,
    },
    site::SiteId,
};

impl HalfEdgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let idx = self.vertices.len();
        self.vertices.push(vertex);
        idx
    }

    /// Adds a face with no boundary yet; set `half_edge` once edges exist.
    pub fn add_face(&mut self, site: Option<SiteId>) -> usize {
        let idx = self.faces.len();
        self.faces.push(Face::new(usize::MAX, site));
        idx
    }

    /// Adds `src -> dst` on `left` and its twin `dst -> src` on `right`.
    /// `next`/`prev` are left unset.
    pub fn add_edge_pair(
        &mut self,
        src: usize,
        dst: usize,
        left: usize,
        right: usize,
        kind: EdgeKind,
        curve: Curve,
    ) -> (usize, usize) {
        let h = self.half_edges.len();
        let t = h + 1;
        let mut he = HalfEdge::new(dst, left, kind, curve);
        let mut tw = HalfEdge::new(src, right, kind, curve);
        he.twin = t;
        tw.twin = h;
        self.half_edges.push(he);
        self.half_edges.push(tw);

        if self.vertices[src].half_edge.is_none() {
            self.vertices[src].half_edge = Some(h);
        }
        if self.vertices[dst].half_edge.is_none() {
            self.vertices[dst].half_edge = Some(t);
        }
        if self.faces[left].half_edge == usize::MAX {
            self.faces[left].half_edge = h;
        }
        if self.faces[right].half_edge == usize::MAX {
            self.faces[right].half_edge = t;
        }
        (h, t)
    }

    #[inline]
    pub fn set_next(&mut self, h: usize, next: usize) {
        self.half_edges[h].next = next;
        self.half_edges[next].prev = h;
    }

    /// Splits `h: a -> b` and its twin at vertex `v`.
    ///
    /// Afterwards `h: a -> v`, `forward: v -> b`, `twin(h): b -> v`,
    /// `backward: v -> a`, with `h <-> backward` and `forward <-> twin(h)`
    /// paired. Both face cycles stay closed.
    pub fn split_edge(&mut self, h: usize, v: usize) -> EdgeSplit {
        let t = self.half_edges[h].twin;
        let b = self.half_edges[h].vertex;
        let a = self.half_edges[t].vertex;
        let (h_next, t_next) = (self.half_edges[h].next, self.half_edges[t].next);

        let forward = self.half_edges.len();
        let backward = forward + 1;

        let mut fwd = self.half_edges[h].clone();
        fwd.vertex = b;
        fwd.twin = t;
        let mut bwd = self.half_edges[t].clone();
        bwd.vertex = a;
        bwd.twin = h;
        self.half_edges.push(fwd);
        self.half_edges.push(bwd);

        self.half_edges[h].vertex = v;
        self.half_edges[h].twin = backward;
        self.half_edges[t].vertex = v;
        self.half_edges[t].twin = forward;

        self.set_next(h, forward);
        if h_next != usize::MAX {
            self.set_next(forward, h_next);
        }
        self.set_next(t, backward);
        if t_next != usize::MAX {
            self.set_next(backward, t_next);
        }

        if self.vertices[v].half_edge.is_none() {
            self.vertices[v].half_edge = Some(forward);
        }
        EdgeSplit { forward, backward }
    }

    /// Undoes [`Self::split_edge`] at the degree-two vertex `v`: both
    /// half-edges entering `v` are stretched over it, the two leaving it are
    /// removed along with `v`. Returns `false`, changing nothing, when `v`
    /// does not have degree two.
    pub fn join_at(&mut self, v: usize) -> bool {
        let out = self.outgoing_half_edges(v);
        if out.len() != 2 {
            return false;
        }
        let (o1, o2) = (out[0], out[1]);
        let (i1, i2) = (self.half_edges[o1].twin, self.half_edges[o2].twin);
        let (n1, n2) = (self.half_edges[o1].next, self.half_edges[o2].next);

        self.half_edges[i1].vertex = self.half_edges[o2].vertex;
        self.half_edges[i2].vertex = self.half_edges[o1].vertex;
        self.half_edges[i1].twin = i2;
        self.half_edges[i2].twin = i1;
        self.set_next(i1, n2);
        self.set_next(i2, n1);

        for (gone, keep) in [(o1, i2), (o2, i1)] {
            let f = self.half_edges[gone].face;
            if self.faces[f].half_edge == gone {
                self.faces[f].half_edge = keep;
            }
            self.remove_half_edge(gone);
        }
        self.remove_vertex(v);
        true
    }

    pub fn remove_half_edge(&mut self, h: usize) {
        self.half_edges[h].removed = true;
    }

    pub fn remove_vertex(&mut self, v: usize) {
        let vertex = &mut self.vertices[v];
        vertex.removed = true;
        vertex.half_edge = None;
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

    fn line() -> Curve {
        Curve::Line(Line2::new(Point2::origin(), Point2::new(1.0, 0.0)))
    }

    fn vertex(x: f64) -> Vertex {
        Vertex::new(Point2::new(x, 0.0), 0.0, VertexStatus::Out, VertexKind::Normal)
    }

    /// A single edge pair forming two degenerate faces `0 -> 1 -> 0`.
    fn digon() -> (HalfEdgeGraph, usize, usize) {
        let mut g = HalfEdgeGraph::new();
        let a = g.add_vertex(vertex(0.0));
        let b = g.add_vertex(vertex(1.0));
        let f0 = g.add_face(None);
        let f1 = g.add_face(None);
        let (h, t) = g.add_edge_pair(a, b, f0, f1, EdgeKind::Line, line());
        g.set_next(h, h);
        g.set_next(t, t);
        (g, h, t)
    }

    #[test]
    fn split_keeps_twins_and_cycles() {
        let (mut g, h, t) = digon();
        let v = g.add_vertex(vertex(0.5));
        let split = g.split_edge(h, v);

        assert_eq!(g.half_edges[h].vertex, v);
        assert_eq!(g.half_edges[split.forward].vertex, 1);
        assert_eq!(g.half_edges[t].vertex, v);
        assert_eq!(g.half_edges[split.backward].vertex, 0);

        for e in [h, t, split.forward, split.backward] {
            let tw = g.half_edges[e].twin;
            assert_eq!(g.half_edges[tw].twin, e);
            assert_eq!(g.half_edges[g.half_edges[e].next].prev, e);
        }
        assert_eq!(g.half_edges[h].next, split.forward);
        assert_eq!(g.half_edges[split.forward].next, h);
        assert_eq!(g.half_edges[t].next, split.backward);
        assert_eq!(g.vertices[v].half_edge, Some(split.forward));
    }

    #[test]
    fn join_restores_the_split_edge() {
        let (mut g, h, t) = digon();
        let before: Vec<_> = [h, t]
            .iter()
            .map(|&e| (g.half_edges[e].vertex, g.half_edges[e].twin, g.half_edges[e].next))
            .collect();
        let v = g.add_vertex(vertex(0.5));
        let split = g.split_edge(h, v);
        assert!(g.join_at(v));

        let after: Vec<_> = [h, t]
            .iter()
            .map(|&e| (g.half_edges[e].vertex, g.half_edges[e].twin, g.half_edges[e].next))
            .collect();
        assert_eq!(before, after);
        assert!(g.vertices[v].removed);
        assert!(g.half_edges[split.forward].removed && g.half_edges[split.backward].removed);
        assert_eq!(g.live_edge_count(), 1);
    }

    #[test]
    fn join_refuses_other_degrees() {
        let (mut g, _, _) = digon();
        let lone = g.add_vertex(vertex(2.0));
        assert!(!g.join_at(lone));
        assert!(!g.vertices[lone].removed);
    }
}
