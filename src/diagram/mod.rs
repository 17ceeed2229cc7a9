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

//! Incremental Voronoi diagram of point and segment sites.
//!
//! The diagram lives in a [`HalfEdgeGraph`]. Each insertion finds the set of
//! vertices the new site claims (the IN set), places a NEW vertex on every
//! edge leaving that set, sews in the new face and drops the IN set.

mod classify;
pub mod dual;
mod queue;
mod split;
mod surgery;

pub use dual::Triangulation;
pub use queue::VertexQueue;

use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use tracing::{debug, warn};

use crate::{
    checker::{self, InvariantViolation},
    config::VoronoiConfig,
    error::VoronoiError,
    face_grid::FaceGrid,
    geometry::{Curve, Line2, Point2, Segment2},
    kernel::{
        FilteredPredicates, PredicateOracle,
        predicates::{point_inside_segment, segments_interfere},
    },
    mesh::{EdgeKind, FaceStatus, HalfEdgeGraph, Vertex, VertexKind, VertexStatus},
    positioner::{BisectorPositioner, VertexPositioner},
    site::{Site, SiteId},
};

/// Radius of the three generator sites, in units of the far radius.
pub const GENERATOR_RADIUS: f64 = 3.0;
/// Radius of the OUTER vertices, in units of the far radius.
pub const OUTER_RADIUS: f64 = 18.0;

/// A site and the diagram entities it owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteEntry {
    pub site: Site,
    pub face: usize,
    /// Vertex of a user point site; `None` for generators and segments.
    pub vertex: Option<usize>,
    /// Point sites at the two ends of a segment site.
    pub endpoints: Option<[SiteId; 2]>,
}

/// Per-insertion working state.
#[derive(Debug, Default)]
struct Scratch {
    queue: VertexQueue,
    /// IN vertices, in the order they were marked.
    v0: Vec<usize>,
    modified: Vec<usize>,
    incident_faces: Vec<usize>,
    /// SPLIT vertices added by this insertion, oldest first.
    splits: Vec<usize>,
    /// Incident faces may lose more than one arc of their boundary.
    many_arcs: bool,
}

impl Scratch {
    fn is_empty(&self) -> bool {
        self.queue.is_empty()
            && self.v0.is_empty()
            && self.modified.is_empty()
            && self.incident_faces.is_empty()
            && self.splits.is_empty()
    }
}

#[derive(Debug)]
pub struct VoronoiDiagram<O = FilteredPredicates, P = BisectorPositioner> {
    config: VoronoiConfig,
    graph: HalfEdgeGraph,
    grid: FaceGrid,
    sites: Vec<SiteEntry>,
    /// Point handle to site id; handles 0..3 are the generators.
    point_handles: Vec<SiteId>,
    outer_face: usize,
    oracle: O,
    positioner: P,
    scratch: Scratch,
}

impl VoronoiDiagram {
    /// Empty diagram for sites inside the disk of radius `far_radius`,
    /// with an `n_bins × n_bins` face grid.
    ///
    /// # Panics
    /// If `far_radius` is not positive or `n_bins` is zero.
    pub fn new(far_radius: f64, n_bins: usize) -> Self {
        Self::with_config(VoronoiConfig::new(far_radius, n_bins))
    }

    pub fn with_config(config: VoronoiConfig) -> Self {
        let positioner = BisectorPositioner::with_seed(config.perturbation_seed);
        Self::with_strategies(config, FilteredPredicates, positioner)
    }
}

impl<O, P> VoronoiDiagram<O, P> {
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    #[inline]
    pub fn far_radius(&self) -> f64 {
        self.config.far_radius
    }

    pub fn config(&self) -> &VoronoiConfig {
        &self.config
    }

    pub fn graph(&self) -> &HalfEdgeGraph {
        &self.graph
    }

    /// Every site, generators first.
    pub fn sites(&self) -> &[SiteEntry] {
        &self.sites
    }

    pub fn site(&self, id: SiteId) -> Option<&SiteEntry> {
        self.sites.get(id)
    }

    /// Site id behind a point handle.
    pub fn point_site(&self, handle: usize) -> Option<SiteId> {
        self.point_handles.get(handle).copied()
    }

    /// Number of point handles, generators included.
    pub fn num_point_sites(&self) -> usize {
        self.point_handles.len()
    }

    pub fn num_segment_sites(&self) -> usize {
        self.sites.iter().filter(|s| !s.site.is_point()).count()
    }

    pub fn outer_face(&self) -> usize {
        self.outer_face
    }

    /// Vertices attached to the diagram (isolated point-site vertices are
    /// not counted).
    pub fn num_vertices(&self) -> usize {
        self.graph.vertices.iter().filter(|v| v.is_connected()).count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.live_edge_count()
    }

    pub fn num_faces(&self) -> usize {
        self.graph.faces.len()
    }

    /// Face whose site is nearest to `q`.
    pub fn locate(&self, q: &Point2) -> Option<usize> {
        self.grid.closest_face(q).map(|(f, _)| f)
    }

    /// Site nearest to `q`.
    pub fn closest_site(&self, q: &Point2) -> Option<SiteId> {
        self.locate(q).and_then(|f| self.graph.faces[f].site)
    }

    /// Boundary of face `f`, parabolic edges sampled with `samples` pieces.
    pub fn face_polygon(&self, f: usize, samples: usize) -> Vec<Point2> {
        self.graph.face_polygon(f, samples.max(1))
    }

    /// Human-readable listing of the whole diagram.
    pub fn print(&self) -> String {
        self.to_string()
    }

    pub fn check(&self) -> Result<(), InvariantViolation> {
        checker::check(self)
    }

    /// [`Self::check`] plus the global nearest-site and empty-circle audits.
    pub fn check_exhaustive(&self) -> Result<(), InvariantViolation> {
        checker::check_exhaustive(self)
    }

    pub(crate) fn scratch_is_empty(&self) -> bool {
        self.scratch.is_empty()
    }

    /// Site generating face `f`.
    pub(crate) fn face_site(&self, f: usize) -> Option<&Site> {
        self.graph.faces[f].site.map(|s| &self.sites[s].site)
    }

    /// Restores statuses, joins the surviving SPLIT vertices and clears the
    /// scratch buffers. After a failed insertion the graph is back to its
    /// state before the insertion, half-edge indices included.
    fn end_insertion(&mut self) {
        for &v in &self.scratch.modified {
            let status = &mut self.graph.vertices[v].status;
            if matches!(
                status,
                VertexStatus::In | VertexStatus::Undecided | VertexStatus::New
            ) {
                *status = VertexStatus::Out;
            }
        }
        for &f in &self.scratch.incident_faces {
            self.graph.faces[f].status = FaceStatus::NonIncident;
        }
        for &v in self.scratch.splits.iter().rev() {
            if !self.graph.vertices[v].removed && !self.graph.join_at(v) {
                warn!(v, "split vertex left in place");
            }
        }
        self.scratch.splits.clear();
        self.scratch.many_arcs = false;
        self.scratch.modified.clear();
        self.scratch.v0.clear();
        self.scratch.incident_faces.clear();
        self.scratch.queue.clear();
    }
}

/// Keeps a diagram borrowed for one insertion and cleans up its working
/// state on every exit path.
struct InsertionScope<'a, O, P> {
    diagram: &'a mut VoronoiDiagram<O, P>,
}

impl<'a, O, P> InsertionScope<'a, O, P> {
    fn new(diagram: &'a mut VoronoiDiagram<O, P>) -> Self {
        Self { diagram }
    }
}

impl<O, P> Deref for InsertionScope<'_, O, P> {
    type Target = VoronoiDiagram<O, P>;

    fn deref(&self) -> &Self::Target {
        self.diagram
    }
}

impl<O, P> DerefMut for InsertionScope<'_, O, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.diagram
    }
}

impl<O, P> Drop for InsertionScope<'_, O, P> {
    fn drop(&mut self) {
        self.diagram.end_insertion();
    }
}

impl<O: PredicateOracle, P: VertexPositioner> VoronoiDiagram<O, P> {
    /// Diagram with caller-supplied predicate and positioning strategies.
    ///
    /// # Panics
    /// If the configuration is invalid.
    pub fn with_strategies(config: VoronoiConfig, oracle: O, positioner: P) -> Self {
        config.validate();
        let grid = FaceGrid::new(config.far_radius, config.n_bins);
        let mut diagram = Self {
            config,
            graph: HalfEdgeGraph::new(),
            grid,
            sites: Vec::new(),
            point_handles: Vec::new(),
            outer_face: 0,
            oracle,
            positioner,
            scratch: Scratch::default(),
        };
        diagram.initialize();
        diagram
    }

    /// Three generator sites around the disk, their Voronoi vertex at the
    /// origin, three OUTER vertices on its rays and the outer face.
    fn initialize(&mut self) {
        let r = self.config.far_radius;
        let angles = [90.0_f64, 210.0, 330.0].map(f64::to_radians);
        let generators = angles.map(|a| Point2::from_angle(a) * (GENERATOR_RADIUS * r));

        let mut faces = [0usize; 3];
        for (k, g) in generators.iter().enumerate() {
            let site = Site::Point(*g);
            let face = self.graph.add_face(Some(k));
            faces[k] = face;
            self.sites.push(SiteEntry {
                site,
                face,
                vertex: None,
                endpoints: None,
            });
            self.point_handles.push(k);
            self.grid.insert_global(face, site);
        }
        self.outer_face = self.graph.add_face(None);

        let center = self.graph.add_vertex(
            Vertex::new(
                Point2::origin(),
                GENERATOR_RADIUS * r,
                VertexStatus::Out,
                VertexKind::Normal,
            )
            .with_generators(&[0, 1, 2]),
        );
        // each outer vertex lies on the ray opposite its generator, at
        // distance sqrt(18² + 3² - 18·3) from the other two
        let outer_clearance = (OUTER_RADIUS.powi(2) + GENERATOR_RADIUS.powi(2)
            - OUTER_RADIUS * GENERATOR_RADIUS)
            .sqrt()
            * r;
        let outer = angles.map(|a| Point2::from_angle(a) * (-OUTER_RADIUS * r));
        let mut outer_v = [0usize; 3];
        for k in 0..3 {
            outer_v[k] = self.graph.add_vertex(
                Vertex::new(
                    outer[k],
                    outer_clearance,
                    VertexStatus::Outer,
                    VertexKind::Normal,
                )
                .with_generators(&[(k + 1) % 3, (k + 2) % 3]),
            );
        }

        // ray k separates the faces of generators k+2 (left) and k+1
        let mut rays = [(0usize, 0usize); 3];
        for k in 0..3 {
            let (left, right) = (faces[(k + 2) % 3], faces[(k + 1) % 3]);
            let curve = Curve::Line(Line2::bisector(
                &generators[(k + 1) % 3],
                &generators[(k + 2) % 3],
            ));
            rays[k] = self.graph.add_edge_pair(
                center,
                outer_v[k],
                left,
                right,
                EdgeKind::Line,
                curve,
            );
        }
        let mut rim = [(0usize, 0usize); 3];
        for k in 0..3 {
            let (a, b) = (outer_v[(k + 1) % 3], outer_v[(k + 2) % 3]);
            let (from, to) = (outer[(k + 1) % 3], outer[(k + 2) % 3]);
            let curve = Curve::Line(Line2::new(from, to - from));
            rim[k] = self.graph.add_edge_pair(
                a,
                b,
                faces[k],
                self.outer_face,
                EdgeKind::OutEdge,
                curve,
            );
        }
        for k in 0..3 {
            let out_ray = rays[(k + 1) % 3].0;
            let back_ray = rays[(k + 2) % 3].1;
            self.graph.set_next(out_ray, rim[k].0);
            self.graph.set_next(rim[k].0, back_ray);
            self.graph.set_next(back_ray, out_ray);
            self.graph.set_next(rim[k].1, rim[(k + 2) % 3].1);
        }
        debug!(far_radius = r, "diagram initialized");
    }

    /// Inserts a point site and returns its handle.
    pub fn insert_point_site(&mut self, p: Point2) -> Result<usize, VoronoiError> {
        let r = self.config.far_radius;
        if !p.is_finite() || p.norm() >= r {
            return Err(VoronoiError::OutOfBounds {
                x: p.x,
                y: p.y,
                far_radius: r,
            });
        }
        let tol = self.config.merge_distance();
        let Some((face, dist)) = self.grid.closest_face(&p) else {
            return Err(VoronoiError::Degeneracy("no face near the site".into()));
        };
        if dist <= tol {
            match self.face_site(face) {
                Some(Site::Segment(s))
                    if s.a.distance_to(&p) > tol && s.b.distance_to(&p) > tol =>
                {
                    return Err(VoronoiError::Crossing(format!(
                        "point {p} lies on segment {} - {}",
                        s.a, s.b
                    )));
                }
                _ => return Err(VoronoiError::Duplicate(format!("point {p}"))),
            }
        }

        debug!(x = p.x, y = p.y, "inserting point site");
        let id = self.insert_site(Site::Point(p), &[face], None)?;
        self.point_handles.push(id);
        Ok(self.point_handles.len() - 1)
    }

    /// Inserts the segment between two existing point sites.
    pub fn insert_line_site(&mut self, h1: usize, h2: usize) -> Result<(), VoronoiError> {
        let a_id = self.user_point(h1)?;
        let b_id = self.user_point(h2)?;
        if h1 == h2 {
            return Err(VoronoiError::Duplicate(format!("segment {h1} - {h2} has zero length")));
        }
        let (Some(a), Some(b)) = (self.sites[a_id].site.point(), self.sites[b_id].site.point())
        else {
            return Err(VoronoiError::UnknownHandle(h1));
        };
        let seg = Segment2::new(a, b);
        let tol = self.config.merge_distance();
        for entry in &self.sites {
            match &entry.site {
                Site::Segment(s) => {
                    if let Some([x, y]) = entry.endpoints {
                        if (x == a_id && y == b_id) || (x == b_id && y == a_id) {
                            return Err(VoronoiError::Duplicate(format!("segment {h1} - {h2}")));
                        }
                    }
                    if segments_interfere(&seg, s) {
                        return Err(VoronoiError::Crossing(format!(
                            "segment {a} - {b} meets segment {} - {}",
                            s.a, s.b
                        )));
                    }
                }
                Site::Point(p) => {
                    let on_segment = *p != a
                        && *p != b
                        && (point_inside_segment(p, &seg)
                            || (seg.distance_to(p) <= tol
                                && p.distance_to(&a) > tol
                                && p.distance_to(&b) > tol));
                    if on_segment {
                        return Err(VoronoiError::Crossing(format!(
                            "point {p} lies on segment {a} - {b}"
                        )));
                    }
                }
            }
        }

        let mut seed_faces = vec![self.sites[a_id].face, self.sites[b_id].face];
        for id in [a_id, b_id] {
            if let Some(v) = self.sites[id].vertex {
                if self.graph.vertices[v].status == VertexStatus::Endpoint {
                    seed_faces.extend(self.graph.vertex_faces(v));
                }
            }
        }
        seed_faces.sort_unstable();
        seed_faces.dedup();

        debug!(h1, h2, "inserting line site");
        self.insert_site(Site::Segment(seg), &seed_faces, Some([a_id, b_id]))?;
        Ok(())
    }

    /// Site id of a user point handle.
    fn user_point(&self, handle: usize) -> Result<SiteId, VoronoiError> {
        if handle < 3 {
            return Err(VoronoiError::UnknownHandle(handle));
        }
        self.point_site(handle)
            .ok_or(VoronoiError::UnknownHandle(handle))
    }

    fn insert_site(
        &mut self,
        site: Site,
        seed_faces: &[usize],
        endpoints: Option<[SiteId; 2]>,
    ) -> Result<SiteId, VoronoiError> {
        let id = {
            let mut scope = InsertionScope::new(self);
            scope.run_insertion(site, seed_faces, endpoints)
        }?;
        if self.config.check_each_insertion {
            if let Err(violation) = self.check() {
                panic!("diagram audit failed after inserting site {id}: {violation}");
            }
        }
        Ok(id)
    }

    /// Classification, positioning and surgery. Everything that can fail
    /// happens before the graph is touched.
    fn run_insertion(
        &mut self,
        site: Site,
        seed_faces: &[usize],
        endpoints: Option<[SiteId; 2]>,
    ) -> Result<SiteId, VoronoiError> {
        self.scratch.many_arcs = !site.is_point() || self.num_segment_sites() > 0;
        let seed = self.select_seed(&site, seed_faces)?;
        self.mark_in(seed, &site);
        self.push_neighbors(seed, &site);
        self.grow_in_set(&site);
        let placements = self.place_new_vertices(&site, endpoints)?;
        let id = self.rebuild(site, endpoints, &placements);
        debug!(
            site = id,
            removed = self.scratch.v0.len(),
            created = placements.len(),
            "site inserted"
        );
        Ok(id)
    }
}

impl<O, P> fmt::Display for VoronoiDiagram<O, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "VoronoiDiagram far_radius={} n_bins={}",
            self.config.far_radius,
            self.grid.n_bins()
        )?;
        writeln!(
            f,
            "sites: {} points, {} segments; vertices: {}; edges: {}; faces: {}",
            self.num_point_sites(),
            self.num_segment_sites(),
            self.num_vertices(),
            self.num_edges(),
            self.num_faces()
        )?;
        for (i, s) in self.sites.iter().enumerate() {
            match &s.site {
                Site::Point(p) => writeln!(f, "s{i}: point {p} face {}", s.face)?,
                Site::Segment(seg) => {
                    writeln!(f, "s{i}: segment {} - {} face {}", seg.a, seg.b, s.face)?
                }
            }
        }
        for v in self.graph.live_vertices() {
            let vert = &self.graph.vertices[v];
            writeln!(
                f,
                "v{v}: {} r={} {} {} degree {}",
                vert.position,
                vert.clearance,
                vert.status.as_str(),
                vert.kind.as_str(),
                self.graph.degree(v)
            )?;
        }
        for h in self.graph.live_half_edges() {
            let e = &self.graph.half_edges[h];
            writeln!(
                f,
                "e{h}: {} -> {} {} face {} twin {}",
                self.graph.source(h),
                e.vertex,
                e.kind.as_str(),
                e.face,
                e.twin
            )?;
        }
        for (i, face) in self.graph.faces.iter().enumerate() {
            let edges = self.graph.face_half_edges(i).len();
            match face.site {
                Some(s) => writeln!(f, "f{i}: site {s}, {edges} edges")?,
                None => writeln!(f, "f{i}: outer, {edges} edges")?,
            }
        }
        Ok(())
    }
}
