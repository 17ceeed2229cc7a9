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

use ahash::AHashMap;

use crate::{
    diagram::{SiteEntry, VoronoiDiagram, classify::Placement},
    geometry::{Curve, util::EPS},
    kernel::PredicateOracle,
    mesh::{EdgeKind, Vertex, VertexKind, VertexStatus},
    positioner::{SolverClass, VertexPositioner},
    site::{Site, SiteId, bisector},
};

/// Where a face's boundary enters or leaves the IN region: the NEW vertex
/// and the surviving half-edge next to it.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    vertex: usize,
    half_edge: usize,
}

impl<O: PredicateOracle, P: VertexPositioner> VoronoiDiagram<O, P> {
    /// Splits the IN -> OUT edges, sews in the new face and removes the IN
    /// set. Every IN arc of an incident face is replaced by one new edge.
    /// Infallible: `placements` has been validated.
    pub(super) fn rebuild(
        &mut self,
        site: Site,
        endpoints: Option<[SiteId; 2]>,
        placements: &[Placement],
    ) -> SiteId {
        let site_id = self.sites.len();
        let new_face = self.graph.add_face(Some(site_id));
        let point_vertex = site.point().map(|p| {
            self.graph.add_vertex(
                Vertex::new(p, 0.0, VertexStatus::PointSite, VertexKind::Normal)
                    .with_generators(&[site_id]),
            )
        });
        self.sites.push(SiteEntry {
            site,
            face: new_face,
            vertex: point_vertex,
            endpoints,
        });

        let mut entries: Vec<(usize, Crossing)> = Vec::new();
        let mut exits: AHashMap<usize, Crossing> = AHashMap::new();
        for placement in placements {
            let kind = if placement.solution.solver == SolverClass::Sep {
                VertexKind::SepPoint
            } else {
                VertexKind::Normal
            };
            let v = self.graph.add_vertex(
                Vertex::new(
                    placement.solution.position,
                    placement.solution.clearance,
                    VertexStatus::New,
                    kind,
                )
                .with_generators(&placement.generators),
            );
            self.scratch.modified.push(v);
            let h = placement.edge;
            let t = self.graph.twin(h);
            let split = self.graph.split_edge(h, v);
            // h: IN -> v and t: OUT -> v afterwards; exits are keyed by the
            // surviving half-edge leaving v
            exits.insert(
                split.forward,
                Crossing {
                    vertex: v,
                    half_edge: split.forward,
                },
            );
            entries.push((
                self.graph.half_edges[t].face,
                Crossing {
                    vertex: v,
                    half_edge: t,
                },
            ));
        }

        // each entry is paired with the exit that ends its IN arc
        let limit = self.graph.half_edges.len();
        let mut arcs: Vec<(usize, Crossing, Crossing)> = Vec::new();
        for &(f, entry) in &entries {
            let mut h = self.graph.next(entry.half_edge);
            for _ in 0..limit {
                if let Some(&exit) = exits.get(&h) {
                    arcs.push((f, entry, exit));
                    break;
                }
                h = self.graph.next(h);
            }
        }

        let mut doomed = Vec::new();
        for &v in &self.scratch.v0 {
            for h in self.graph.outgoing_half_edges(v) {
                doomed.push(h);
                doomed.push(self.graph.twin(h));
            }
        }

        // half-edges of the new face, keyed by their source vertex
        let mut ring: AHashMap<usize, usize> = AHashMap::new();
        let mut parabolas = Vec::new();
        for (f, entry, exit) in arcs {
            let Some(face_site_id) = self.graph.faces[f].site else {
                continue;
            };
            let face_site = self.sites[face_site_id].site;
            let (n_in, n_out) = (entry.vertex, exit.vertex);
            let endpoint_vertex = self.sites[face_site_id].vertex.filter(|&a| {
                endpoints.is_some_and(|e| e.contains(&face_site_id))
                    && self.graph.vertices[a].status == VertexStatus::PointSite
            });

            if let Some(a) = endpoint_vertex {
                // separators n_in -> a -> n_out through the endpoint
                let a_pos = self.graph.position(a);
                let to_in = bisector(&face_site, &site, [a_pos, self.graph.position(n_in)]);
                let to_out = bisector(&face_site, &site, [a_pos, self.graph.position(n_out)]);
                let (g1, g1_twin) = self.graph.add_edge_pair(
                    n_in,
                    a,
                    f,
                    new_face,
                    EdgeKind::Separator,
                    to_in.curve,
                );
                let (g2, g2_twin) = self.graph.add_edge_pair(
                    a,
                    n_out,
                    f,
                    new_face,
                    EdgeKind::Separator,
                    to_out.curve,
                );
                self.graph.set_next(entry.half_edge, g1);
                self.graph.set_next(g1, g2);
                self.graph.set_next(g2, exit.half_edge);
                ring.insert(a, g1_twin);
                ring.insert(n_out, g2_twin);
                self.graph.vertices[a].status = VertexStatus::Endpoint;
                self.graph.faces[f].half_edge = g1;
            } else {
                let hints = [self.graph.position(n_in), self.graph.position(n_out)];
                let b = bisector(&face_site, &site, hints);
                let (g, g_twin) = self.graph.add_edge_pair(
                    n_in,
                    n_out,
                    f,
                    new_face,
                    b.kind,
                    b.curve,
                );
                self.graph.set_next(entry.half_edge, g);
                self.graph.set_next(g, exit.half_edge);
                ring.insert(n_out, g_twin);
                self.graph.faces[f].half_edge = g;
                if b.kind == EdgeKind::Parabola {
                    parabolas.push((g, face_site_id));
                }
            }
        }

        for (_, &h) in ring.iter() {
            let target = self.graph.target(h);
            if let Some(&next) = ring.get(&target) {
                self.graph.set_next(h, next);
            }
        }
        if let Some(&h) = ring.values().next() {
            self.graph.faces[new_face].half_edge = h;
        }

        for (g, face_site_id) in parabolas {
            self.split_at_apex(g, face_site_id, site_id);
        }

        for h in doomed {
            self.graph.remove_half_edge(h);
        }
        for &v in &self.scratch.v0 {
            self.graph.remove_vertex(v);
        }
        self.grid.insert(new_face, site);
        site_id
    }

    /// Splits a new parabolic edge at its apex when the apex lies strictly
    /// inside it, so every edge is monotone in clearance.
    fn split_at_apex(&mut self, g: usize, face_site: SiteId, new_site: SiteId) {
        let curve = self.graph.half_edges[g].curve;
        let Some((u_apex, apex)) = curve.apex() else {
            return;
        };
        let u0 = curve.param(&self.graph.position(self.graph.source(g)));
        let u1 = curve.param(&self.graph.position(self.graph.target(g)));
        let (lo, hi) = (u0.min(u1), u0.max(u1));
        let margin = EPS * (1.0 + hi.abs().max(lo.abs()));
        if u_apex <= lo + margin || u_apex >= hi - margin {
            return;
        }
        let clearance = match curve {
            Curve::Parabola(p) => p.focus().distance_to(&apex),
            Curve::Line(_) => return,
        };
        let v = self.graph.add_vertex(
            Vertex::new(apex, clearance, VertexStatus::New, VertexKind::Apex)
                .with_generators(&[face_site, new_site]),
        );
        self.scratch.modified.push(v);
        self.graph.split_edge(g, v);
    }
}
