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

use std::fmt;

use ahash::AHashMap;
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::{
    diagram::{OUTER_RADIUS, VoronoiDiagram},
    error::VoronoiError,
    kernel::PredicateOracle,
    mesh::{FaceStatus, VertexKind, VertexStatus},
    positioner::{PositionRequest, Solution, VertexPositioner},
    site::{Site, SiteId},
};

/// A NEW vertex to be placed on the IN -> OUT half-edge `edge`.
#[derive(Debug, Clone, Copy)]
pub(super) struct Placement {
    pub edge: usize,
    pub solution: Solution,
    pub generators: [SiteId; 3],
}

/// Why the current IN set cannot be sewn in yet.
#[derive(Debug, Clone, PartialEq)]
enum Flaw {
    /// Surgery on this face would not give a proper face.
    Face { face: usize, reason: &'static str },
    /// No NEW vertex could be placed on this IN -> OUT half-edge.
    Edge(usize),
    /// This IN -> OUT half-edge has the same face on both sides.
    Loop(usize),
}

impl fmt::Display for Flaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flaw::Face { face, reason } => write!(f, "face {face} {reason}"),
            Flaw::Edge(h) => write!(f, "no position for a new vertex on edge {h}"),
            Flaw::Loop(h) => write!(f, "edge {h} has one face on both sides"),
        }
    }
}

impl<O: PredicateOracle, P: VertexPositioner> VoronoiDiagram<O, P> {
    fn generator_sites(&self, v: usize) -> SmallVec<[Site; 3]> {
        self.graph.vertices[v]
            .generators
            .iter()
            .map(|&s| self.sites[s].site)
            .collect()
    }

    pub(super) fn in_circle(&self, v: usize, site: &Site) -> f64 {
        let generators = self.generator_sites(v);
        self.oracle
            .in_circle(&self.graph.vertices[v], &generators, site)
    }

    fn set_status(&mut self, v: usize, status: VertexStatus) {
        self.graph.vertices[v].status = status;
        self.scratch.modified.push(v);
    }

    /// First IN vertex. A segment starts where it leaves the faces around
    /// its first endpoint; a point takes the vertex of its face it claims
    /// most strongly, then the edge its region cuts, then widens once to
    /// the neighbouring faces.
    pub(super) fn select_seed(
        &mut self,
        site: &Site,
        faces: &[usize],
    ) -> Result<usize, VoronoiError> {
        match site {
            Site::Segment(seg) => {
                if let Some(v) = self.seed_along_segment(seg, faces) {
                    return Ok(v);
                }
            }
            Site::Point(_) => {
                if let Some(v) = self.best_vertex(site, faces) {
                    return Ok(v);
                }
                if let Some(v) = faces.first().and_then(|&f| self.seed_on_boundary(site, f)) {
                    trace!(v, "seeding on a split edge");
                    return Ok(v);
                }
            }
        }
        let mut wider: Vec<usize> = Vec::new();
        for &f in faces {
            for h in self.graph.face_half_edges(f) {
                let g = self.graph.half_edges[self.graph.twin(h)].face;
                if !wider.contains(&g) && !faces.contains(&g) {
                    wider.push(g);
                }
            }
        }
        trace!(faces = wider.len(), "widening seed search");
        self.best_vertex(site, &wider)
            .ok_or_else(|| VoronoiError::Degeneracy("no seed vertex for the new site".into()))
    }

    fn best_vertex(&self, site: &Site, faces: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &f in faces {
            for v in self.graph.face_vertices(f) {
                if self.graph.vertices[v].status.is_fixed() {
                    continue;
                }
                let d = self.in_circle(v, site);
                if d > 0.0 && best.is_none_or(|(_, bd)| d > bd) {
                    best = Some((v, d));
                }
            }
        }
        best.map(|(v, _)| v)
    }

    /// Marks `v` IN and its faces incident. Point faces that become
    /// incident get their far-side SPLIT vertex first.
    pub(super) fn mark_in(&mut self, v: usize, site: &Site) {
        self.set_status(v, VertexStatus::In);
        self.scratch.v0.push(v);
        for f in self.graph.vertex_faces(v) {
            if self.graph.faces[f].status == FaceStatus::NonIncident {
                self.graph.faces[f].status = FaceStatus::Incident;
                self.scratch.incident_faces.push(f);
                self.split_far_side(f, site);
            }
        }
    }

    pub(super) fn push_neighbors(&mut self, v: usize, site: &Site) {
        for w in self.graph.neighbors(v) {
            if self.graph.vertices[w].status == VertexStatus::Out {
                let d = self.in_circle(w, site);
                self.set_status(w, VertexStatus::Undecided);
                self.scratch.queue.push(w, d);
            }
        }
    }

    /// Grows the IN set from the seed in order of decreasing `|in_circle|`.
    pub(super) fn grow_in_set(&mut self, site: &Site) {
        while let Some((v, _)) = self.scratch.queue.pop() {
            if self.graph.vertices[v].status != VertexStatus::Undecided {
                continue;
            }
            let d = self.in_circle(v, site);
            if d > 0.0 && self.can_mark_in(v) {
                trace!(v, d, "IN");
                self.mark_in(v, site);
                self.push_neighbors(v, site);
            } else {
                trace!(v, d, "OUT");
                self.set_status(v, VertexStatus::Out);
            }
        }
    }

    /// Marks `v` IN and resumes growing from it.
    fn promote(&mut self, v: usize, site: &Site) {
        trace!(v, "promoting to IN");
        self.mark_in(v, site);
        self.push_neighbors(v, site);
        self.grow_in_set(site);
    }

    /// Guards for turning `v` IN: it keeps the IN set a tree and every face
    /// around it keeps a vertex outside the set. Among points only, each
    /// face also loses a single arc.
    pub(super) fn can_mark_in(&self, v: usize) -> bool {
        let vertex = &self.graph.vertices[v];
        if vertex.removed
            || vertex.status.is_fixed()
            || vertex.status == VertexStatus::In
            || vertex.kind == VertexKind::Split
        {
            return false;
        }
        let in_neighbours = self
            .graph
            .neighbors(v)
            .into_iter()
            .filter(|&w| self.graph.vertices[w].status == VertexStatus::In)
            .count();
        if in_neighbours != 1 {
            return false;
        }
        self.graph
            .vertex_faces(v)
            .into_iter()
            .all(|f| match self.in_arcs(f, Some(v)) {
                Some(arcs) => arcs <= 1 || self.scratch.many_arcs,
                None => false,
            })
    }

    /// Number of contiguous arcs of IN vertices on face `f`, with `extra`
    /// counted as IN; `None` when the whole boundary would be IN.
    fn in_arcs(&self, f: usize, extra: Option<usize>) -> Option<usize> {
        let verts = self.graph.face_vertices(f);
        let is_in =
            |w: usize| Some(w) == extra || self.graph.vertices[w].status == VertexStatus::In;
        let n = verts.len();
        if n == 0 || verts.iter().all(|&w| is_in(w)) {
            return None;
        }
        Some(
            (0..n)
                .filter(|&i| !is_in(verts[i]) && is_in(verts[(i + 1) % n]))
                .count(),
        )
    }

    /// IN -> OUT half-edges, leaving from the IN side.
    fn in_out_edges(&self) -> Vec<usize> {
        let mut edges = Vec::new();
        for &v in &self.scratch.v0 {
            for h in self.graph.outgoing_half_edges(v) {
                if self.graph.vertices[self.graph.target(h)].status != VertexStatus::In {
                    edges.push(h);
                }
            }
        }
        edges
    }

    /// Checks that surgery on the current IN set yields proper faces: each
    /// incident face is left and re-entered once per IN arc, and the face of
    /// an unconnected endpoint is reached and loses exactly one arc.
    fn find_flaw(&self, endpoints: Option<[SiteId; 2]>) -> Option<Flaw> {
        let mut crossings: AHashMap<usize, [usize; 2]> = AHashMap::new();
        for h in self.in_out_edges() {
            let left = self.graph.half_edges[h].face;
            let right = self.graph.half_edges[self.graph.twin(h)].face;
            if left == right {
                return Some(Flaw::Loop(h));
            }
            crossings.entry(left).or_default()[0] += 1;
            crossings.entry(right).or_default()[1] += 1;
        }
        let endpoint_faces: SmallVec<[usize; 2]> = endpoints
            .into_iter()
            .flatten()
            .filter(|&id| self.is_isolated_point(id))
            .map(|id| self.sites[id].face)
            .collect();
        for &face in &endpoint_faces {
            if self.graph.faces[face].status != FaceStatus::Incident {
                return Some(Flaw::Face {
                    face,
                    reason: "is an endpoint face the segment does not reach",
                });
            }
        }
        for &face in &self.scratch.incident_faces {
            let Some(arcs) = self.in_arcs(face, None) else {
                return Some(Flaw::Face {
                    face,
                    reason: "would lose its whole boundary",
                });
            };
            if arcs > 1 && (!self.scratch.many_arcs || endpoint_faces.contains(&face)) {
                return Some(Flaw::Face {
                    face,
                    reason: "would lose more than one boundary arc",
                });
            }
            if crossings.get(&face) != Some(&[arcs, arcs]) {
                return Some(Flaw::Face {
                    face,
                    reason: "is not crossed twice per IN arc",
                });
            }
        }
        None
    }

    /// Positions a NEW vertex on every IN -> OUT edge. A rejected IN set or
    /// a failed placement is retried a bounded number of times: a flawed
    /// face promotes its most strongly claimed vertex next to the IN set,
    /// a failed edge first jitters the bracket and then promotes its OUT
    /// end.
    pub(super) fn place_new_vertices(
        &mut self,
        site: &Site,
        endpoints: Option<[SiteId; 2]>,
    ) -> Result<Vec<Placement>, VoronoiError> {
        let mut attempt = 0;
        loop {
            let flaw = match self.find_flaw(endpoints) {
                Some(flaw @ Flaw::Loop(_)) => {
                    return Err(VoronoiError::Degeneracy(flaw.to_string()));
                }
                Some(flaw) => flaw,
                None => match self.position_all(site, endpoints, attempt) {
                    Ok(placements) => return Ok(placements),
                    Err(h) => Flaw::Edge(h),
                },
            };
            attempt += 1;
            if attempt > self.config.max_retries {
                return Err(VoronoiError::Degeneracy(format!(
                    "{flaw} after {} retries",
                    self.config.max_retries
                )));
            }
            warn!(attempt, %flaw, "IN set not accepted, retrying");
            match flaw {
                Flaw::Face { face, .. } => {
                    if let Some(w) = self.best_promotable(face, site) {
                        self.promote(w, site);
                    }
                }
                Flaw::Edge(h) if attempt > 1 => {
                    let w = self.graph.target(h);
                    if self.can_mark_in(w) {
                        self.promote(w, site);
                    }
                }
                Flaw::Edge(_) | Flaw::Loop(_) => {}
            }
        }
    }

    /// Vertex of `f` with the largest positive `in_circle` that may join
    /// the IN set.
    fn best_promotable(&self, f: usize, site: &Site) -> Option<usize> {
        self.graph
            .face_vertices(f)
            .into_iter()
            .filter(|&v| self.can_mark_in(v))
            .map(|v| (v, self.in_circle(v, site)))
            .filter(|&(_, d)| d > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(v, _)| v)
    }

    /// All placements, or the first half-edge that could not be placed on.
    fn position_all(
        &mut self,
        site: &Site,
        endpoints: Option<[SiteId; 2]>,
        attempt: usize,
    ) -> Result<Vec<Placement>, usize> {
        let new_id = self.sites.len();
        let bound = OUTER_RADIUS * self.config.far_radius;
        let mut placements = Vec::new();
        for h in self.in_out_edges() {
            let t = self.graph.twin(h);
            let (Some(s1), Some(s2)) = (
                self.graph.faces[self.graph.half_edges[h].face].site,
                self.graph.faces[self.graph.half_edges[t].face].site,
            ) else {
                return Err(h);
            };
            let separator = endpoints.and_then(|[a, b]| {
                if s1 == a || s2 == a {
                    Some(0.0)
                } else if s1 == b || s2 == b {
                    Some(1.0)
                } else {
                    None
                }
            });
            let request = PositionRequest {
                curve: self.graph.half_edges[h].curve,
                in_position: self.graph.position(self.graph.source(h)),
                out_position: self.graph.position(self.graph.target(h)),
                sites: [self.sites[s1].site, self.sites[s2].site],
                new_site: *site,
                separator,
                attempt,
                tolerance: self.config.geometric_tolerance,
                bound,
            };
            match self.positioner.position(&request) {
                Ok(solution) => placements.push(Placement {
                    edge: h,
                    solution,
                    generators: [s1, s2, new_id],
                }),
                Err(e) => {
                    trace!(edge = h, error = %e, "positioner failed");
                    return Err(h);
                }
            }
        }
        Ok(placements)
    }
}
