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

use incremental_voronoi::{
    Point2, VoronoiConfig, VoronoiDiagram, VoronoiError,
    geometry::util::winding_number,
    mesh::{VertexKind, VertexStatus},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Uniform points in the disk of radius `radius`.
fn random_points(n: usize, radius: f64, seed: u64) -> Vec<Point2> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(n);
    while points.len() < n {
        let p = Point2::new(
            rng.random_range(-radius..radius),
            rng.random_range(-radius..radius),
        );
        if p.norm() < radius {
            points.push(p);
        }
    }
    points
}

fn build(points: &[Point2], check_each: bool) -> VoronoiDiagram {
    let config = VoronoiConfig::new(1.0, 20).with_check_each_insertion(check_each);
    let mut vd = VoronoiDiagram::with_config(config);
    for &p in points {
        vd.insert_point_site(p).unwrap();
    }
    vd
}

fn normal_positions(vd: &VoronoiDiagram) -> Vec<Point2> {
    let g = vd.graph();
    g.live_vertices()
        .filter(|&v| {
            g.vertices[v].kind == VertexKind::Normal && g.vertices[v].status == VertexStatus::Out
        })
        .map(|v| g.position(v))
        .collect()
}

#[test]
fn hundred_points_pass_the_exhaustive_audit() {
    let points = random_points(100, 0.9, 7);
    let vd = build(&points, true);
    vd.check_exhaustive().unwrap();
    // the three generators count as point sites
    assert_eq!(vd.num_point_sites(), 3 + 100);
    assert_eq!(vd.num_faces(), 100 + 3 + 1);
}

#[test]
fn thousand_points() {
    let points = random_points(1000, 0.9, 1000);
    let vd = build(&points, false);
    vd.check().unwrap();
    vd.check_exhaustive().unwrap();
    assert_eq!(vd.delaunay().len(), 2 * 1000 + 1);
    // three outer vertices, one vertex per Delaunay triangle
    assert_eq!(vd.num_vertices(), 3 + 2 * 1000 + 1);
    assert_eq!(vd.num_edges(), 3 * (2 * 1000 + 1 + 3) / 2);
}

#[test]
fn every_query_lies_in_the_face_of_its_nearest_site() {
    let points = random_points(300, 0.9, 11);
    let vd = build(&points, false);
    let queries = random_points(500, 0.95, 12);
    for q in queries {
        let (nearest, best) = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance_to(&q)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        let second = points
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != nearest)
            .map(|(_, p)| p.distance_to(&q))
            .fold(f64::INFINITY, f64::min);
        if second - best < 1e-9 {
            continue;
        }
        let id = vd.point_site(nearest + 3).unwrap();
        assert_eq!(vd.closest_site(&q), Some(id));
        let face = vd.site(id).unwrap().face;
        let polygon = vd.face_polygon(face, 4);
        assert_ne!(winding_number(&polygon, &q), 0, "query {q} outside its face");
    }
}

#[test]
fn delaunay_triangles_have_empty_circumcircles() {
    let points = random_points(200, 0.9, 21);
    let vd = build(&points, false);
    let tri = vd.delaunay();
    assert_eq!(tri.len(), 2 * 200 + 1);
    assert_eq!(tri.edge_count(), 3 * (200 + 3) - 3 - 3);
    for t in 0..tri.len() {
        let [a, b, c] = tri.triangle_points(t);
        assert!((b - a).cross(&(c - a)) > 0.0);
    }
}

#[test]
fn insertion_order_does_not_change_the_vertices() {
    let points = random_points(150, 0.9, 31);
    let forward = build(&points, false);
    let mut shuffled = points.clone();
    let mut rng = StdRng::seed_from_u64(32);
    for i in (1..shuffled.len()).rev() {
        shuffled.swap(i, rng.random_range(0..=i));
    }
    let backward = build(&shuffled, false);

    let a = normal_positions(&forward);
    let b = normal_positions(&backward);
    assert_eq!(a.len(), b.len());
    for p in &a {
        let closest = b
            .iter()
            .map(|q| q.distance_to(p))
            .fold(f64::INFINITY, f64::min);
        assert!(closest < 1e-9, "vertex {p} has no counterpart");
    }
}

#[test]
fn rejected_points_leave_the_diagram_untouched() {
    let points = random_points(50, 0.9, 41);
    let mut vd = build(&points, true);
    let before = vd.print();

    let err = vd.insert_point_site(points[17]).unwrap_err();
    assert!(matches!(err, VoronoiError::Duplicate(_)), "{err}");
    let err = vd.insert_point_site(Point2::new(0.8, 0.8)).unwrap_err();
    assert!(matches!(err, VoronoiError::OutOfBounds { .. }), "{err}");
    let err = vd.insert_point_site(Point2::new(f64::NAN, 0.0)).unwrap_err();
    assert!(matches!(err, VoronoiError::OutOfBounds { .. }), "{err}");

    assert_eq!(vd.print(), before);
    vd.check_exhaustive().unwrap();
}
