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

//! Delaunay triangulation of the point sites, read off the diagram.

use ahash::AHashMap;

use crate::{
    diagram::VoronoiDiagram,
    geometry::Point2,
    kernel::orientation::orient2d_sign,
    mesh::{VertexKind, VertexStatus},
    site::{Site, SiteId},
};

/// Counter-clockwise triangles over point handles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    /// Position of every point handle, generators included.
    pub points: Vec<Point2>,
    pub triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_points(&self, t: usize) -> [Point2; 3] {
        self.triangles[t].map(|i| self.points[i])
    }

    /// Distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        let mut edges: Vec<(usize, usize)> = self
            .triangles
            .iter()
            .flat_map(|t| (0..3).map(move |i| (t[i].min(t[(i + 1) % 3]), t[i].max(t[(i + 1) % 3]))))
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges.len()
    }
}

impl<O, P> VoronoiDiagram<O, P> {
    /// One triangle per NORMAL vertex whose three faces belong to point
    /// sites. Vertices joined by a zero-length edge give the triangles of
    /// an arbitrary split of the cocircular polygon.
    pub fn delaunay(&self) -> Triangulation {
        let handle_of: AHashMap<SiteId, usize> = self
            .point_handles
            .iter()
            .enumerate()
            .map(|(h, &s)| (s, h))
            .collect();
        let points = self
            .point_handles
            .iter()
            .filter_map(|&s| self.sites[s].site.point())
            .collect();
        let mut tri = Triangulation {
            points,
            triangles: Vec::new(),
        };
        for v in self.graph.live_vertices() {
            let vertex = &self.graph.vertices[v];
            if vertex.status != VertexStatus::Out
                || vertex.kind != VertexKind::Normal
                || !vertex.is_connected()
            {
                continue;
            }
            let faces = self.graph.faces_ccw(v);
            if faces.len() != 3 {
                continue;
            }
            let mut t = [0usize; 3];
            let mut all_points = true;
            for (i, &f) in faces.iter().enumerate() {
                match self.graph.faces[f].site {
                    Some(s) if matches!(self.sites[s].site, Site::Point(_)) => t[i] = handle_of[&s],
                    _ => all_points = false,
                }
            }
            if !all_points {
                continue;
            }
            let [a, b, c] = t.map(|i| tri.points[i]);
            if orient2d_sign(&a, &b, &c) < 0 {
                t.swap(1, 2);
            }
            tri.triangles.push(t);
        }
        tri
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::VoronoiConfig, diagram::VoronoiDiagram, geometry::Point2};

    #[test]
    fn generators_alone_form_one_triangle() {
        let vd = VoronoiDiagram::new(1.0, 4);
        let tri = vd.delaunay();
        assert_eq!(tri.len(), 1);
        assert_eq!(tri.edge_count(), 3);
        let mut t = tri.triangles[0];
        t.sort();
        assert_eq!(t, [0, 1, 2]);
    }

    #[test]
    fn each_point_adds_two_triangles() {
        let mut vd =
            VoronoiDiagram::with_config(VoronoiConfig::new(1.0, 4).with_check_each_insertion(true));
        for p in [(0.1, 0.2), (-0.4, 0.3), (0.5, -0.5), (-0.2, -0.6)] {
            vd.insert_point_site(Point2::from(p)).unwrap();
        }
        let tri = vd.delaunay();
        assert_eq!(tri.len(), 2 * 4 + 1);
        for i in 0..tri.len() {
            let [a, b, c] = tri.triangle_points(i);
            assert!(crate::kernel::orientation::orient2d(&a, &b, &c) > 0.0);
        }
    }
}
