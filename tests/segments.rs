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

use std::{cell::Cell, rc::Rc};

use incremental_voronoi::{
    Point2, Site, VoronoiConfig, VoronoiDiagram, VoronoiError,
    io::save_diagram,
    kernel::{ExactPredicates, FilteredPredicates, FloatPredicates},
    mesh::{EdgeKind, VertexStatus},
    positioner::{BisectorPositioner, PositionError, PositionRequest, Solution, VertexPositioner},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn checked_diagram() -> VoronoiDiagram {
    VoronoiDiagram::with_config(VoronoiConfig::new(1.0, 10).with_check_each_insertion(true))
}

fn point_status(vd: &VoronoiDiagram, handle: usize) -> VertexStatus {
    let entry = vd.site(vd.point_site(handle).unwrap()).unwrap();
    vd.graph().vertices[entry.vertex.unwrap()].status
}

#[test]
fn connected_segments_share_an_endpoint() {
    let mut vd = checked_diagram();
    let a = vd.insert_point_site(Point2::new(-0.4, 0.0)).unwrap();
    let b = vd.insert_point_site(Point2::new(0.4, 0.0)).unwrap();
    let c = vd.insert_point_site(Point2::new(0.1, 0.5)).unwrap();
    vd.insert_line_site(a, b).unwrap();
    assert_eq!(point_status(&vd, c), VertexStatus::PointSite);
    vd.insert_line_site(b, c).unwrap();
    vd.check_exhaustive().unwrap();

    for h in [a, b, c] {
        assert_eq!(point_status(&vd, h), VertexStatus::Endpoint);
    }
    assert_eq!(vd.num_segment_sites(), 2);

    // the shared endpoint is where both segments' separators start
    let g = vd.graph();
    let bv = vd.site(vd.point_site(b).unwrap()).unwrap().vertex.unwrap();
    let separators = g
        .outgoing_half_edges(bv)
        .into_iter()
        .filter(|&h| g.half_edges[h].kind == EdgeKind::Separator)
        .count();
    assert_eq!(separators, g.degree(bv));
    assert!(separators >= 2);
}

#[test]
fn segment_amid_scattered_points() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut vd = checked_diagram();
    let a = vd.insert_point_site(Point2::new(-0.5, 0.0)).unwrap();
    let b = vd.insert_point_site(Point2::new(0.5, 0.05)).unwrap();
    let mut inserted = 0;
    while inserted < 30 {
        let p = Point2::new(rng.random_range(-0.9..0.9), rng.random_range(-0.9..0.9));
        if p.norm() < 0.9 && p.y.abs() > 0.25 {
            vd.insert_point_site(p).unwrap();
            inserted += 1;
        }
    }
    vd.insert_line_site(a, b).unwrap();
    vd.check_exhaustive().unwrap();

    // the strip along the segment is its own
    let below = Point2::new(0.0, 0.02);
    let id = vd.closest_site(&below).unwrap();
    assert!(matches!(vd.site(id).unwrap().site, Site::Segment(_)));
}

#[test]
fn segment_handles_are_checked_before_any_work() {
    let mut vd = checked_diagram();
    let a = vd.insert_point_site(Point2::new(-0.3, 0.1)).unwrap();
    let b = vd.insert_point_site(Point2::new(0.3, 0.1)).unwrap();
    let m = vd.insert_point_site(Point2::new(0.0, 0.1)).unwrap();
    let before = vd.print();

    assert_eq!(vd.insert_line_site(0, b), Err(VoronoiError::UnknownHandle(0)));
    assert_eq!(vd.insert_line_site(a, 99), Err(VoronoiError::UnknownHandle(99)));
    assert!(matches!(vd.insert_line_site(a, a), Err(VoronoiError::Duplicate(_))));
    // m lies in the middle of a - b
    assert!(matches!(vd.insert_line_site(a, b), Err(VoronoiError::Crossing(_))));
    assert_eq!(vd.print(), before);

    vd.insert_line_site(a, m).unwrap();
    assert!(matches!(vd.insert_line_site(m, a), Err(VoronoiError::Duplicate(_))));
    vd.check_exhaustive().unwrap();
}

#[test]
fn exact_and_float_oracles_agree_on_points() {
    let config = VoronoiConfig::new(1.0, 8).with_check_each_insertion(true);
    let positioner = BisectorPositioner::default;
    let mut exact = VoronoiDiagram::with_strategies(config.clone(), ExactPredicates, positioner());
    let mut float = VoronoiDiagram::with_strategies(config, FloatPredicates, positioner());
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..40 {
        let p = Point2::new(rng.random_range(-0.6..0.6), rng.random_range(-0.6..0.6));
        exact.insert_point_site(p).unwrap();
        float.insert_point_site(p).unwrap();
    }
    exact.check_exhaustive().unwrap();
    float.check_exhaustive().unwrap();
    assert_eq!(exact.num_vertices(), float.num_vertices());
    assert_eq!(exact.delaunay().len(), float.delaunay().len());
}

#[test]
fn diagram_is_saved_as_text() {
    let mut vd = checked_diagram();
    let a = vd.insert_point_site(Point2::new(-0.2, -0.2)).unwrap();
    let b = vd.insert_point_site(Point2::new(0.3, 0.1)).unwrap();
    vd.insert_line_site(a, b).unwrap();

    let path = std::env::temp_dir().join(format!("voronoi-{}.txt", std::process::id()));
    save_diagram(&vd, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(text.starts_with("# incremental-voronoi"));
    assert_eq!(text.lines().filter(|l| l.starts_with("s ")).count(), 6);
    assert_eq!(
        text.lines().filter(|l| l.starts_with("e ")).count(),
        vd.num_edges()
    );
}

/// Face of `handle` has a parabolic edge, i.e. it borders a segment.
fn borders_a_segment(vd: &VoronoiDiagram, handle: usize) -> bool {
    let g = vd.graph();
    let face = vd.site(vd.point_site(handle).unwrap()).unwrap().face;
    g.face_half_edges(face)
        .into_iter()
        .any(|h| g.half_edges[h].kind == EdgeKind::Parabola)
}

#[test]
fn segment_passing_close_to_a_point() {
    let mut vd = checked_diagram();
    let a = vd.insert_point_site(Point2::new(-0.1059, -0.7385)).unwrap();
    let b = vd.insert_point_site(Point2::new(-0.4659, 0.6530)).unwrap();
    // about 0.0096 from the segment a - b
    let p = vd.insert_point_site(Point2::new(-0.2376, -0.2664)).unwrap();
    vd.insert_line_site(a, b).unwrap();
    vd.check_exhaustive().unwrap();

    assert!(borders_a_segment(&vd, p));
    let seg = vd.sites().iter().find_map(|e| e.site.segment().copied()).unwrap();
    let beside = Point2::new(-0.2376, -0.2664) + seg.normal() * -0.004;
    assert_eq!(vd.closest_site(&beside), vd.point_site(p));
}

#[test]
fn points_close_to_an_existing_segment() {
    let mut vd = checked_diagram();
    let a = vd.insert_point_site(Point2::new(-0.5, 0.0)).unwrap();
    let b = vd.insert_point_site(Point2::new(0.5, 0.0)).unwrap();
    vd.insert_line_site(a, b).unwrap();

    let near = [
        (0.2622, -0.0171),
        (0.0, 0.005),
        (-0.3, 0.01),
        (0.1, -0.02),
        (0.4, 0.05),
        (-0.45, -0.05),
    ];
    for (x, y) in near {
        let h = vd.insert_point_site(Point2::new(x, y)).unwrap();
        vd.check_exhaustive().unwrap();
        assert!(borders_a_segment(&vd, h), "point ({x}, {y})");
        assert_eq!(vd.closest_site(&Point2::new(x, y)), vd.point_site(h));
    }
    assert_eq!(vd.num_segment_sites(), 1);
}

#[test]
fn scattered_points_and_segments() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut vd = checked_diagram();
    let mut points = Vec::new();
    while points.len() < 40 {
        let p = Point2::new(rng.random_range(-0.9..0.9), rng.random_range(-0.9..0.9));
        if p.norm() < 0.9 {
            points.push((vd.insert_point_site(p).unwrap(), p));
        }
    }

    let mut segments = 0;
    for _ in 0..60 {
        let (h1, p1) = points[rng.random_range(0..points.len())];
        let (h2, p2) = points[rng.random_range(0..points.len())];
        if h1 == h2 || p1.distance_to(&p2) > 0.5 {
            continue;
        }
        match vd.insert_line_site(h1, h2) {
            Ok(()) => segments += 1,
            Err(VoronoiError::Crossing(_) | VoronoiError::Duplicate(_)) => {}
            Err(e) => panic!("segment {p1} - {p2}: {e}"),
        }
    }
    assert!(segments > 5, "only {segments} segments inserted");
    vd.check_exhaustive().unwrap();

    // points arriving after the segments
    let mut late = 0;
    while late < 20 {
        let p = Point2::new(rng.random_range(-0.9..0.9), rng.random_range(-0.9..0.9));
        if p.norm() >= 0.9 {
            continue;
        }
        match vd.insert_point_site(p) {
            Ok(_) => late += 1,
            Err(VoronoiError::Crossing(_)) => {}
            Err(e) => panic!("point {p}: {e}"),
        }
    }
    vd.check_exhaustive().unwrap();
    assert_eq!(vd.num_segment_sites(), segments);
}

/// Delegates to [`BisectorPositioner`] until told to refuse.
struct Switchable {
    inner: BisectorPositioner,
    refuse: Rc<Cell<bool>>,
}

impl VertexPositioner for Switchable {
    fn position(&mut self, request: &PositionRequest) -> Result<Solution, PositionError> {
        if self.refuse.get() {
            return Err(PositionError::NoPosition("refused"));
        }
        self.inner.position(request)
    }
}

#[test]
fn degenerate_insertions_leave_the_diagram_untouched() {
    let refuse = Rc::new(Cell::new(false));
    let positioner = Switchable {
        inner: BisectorPositioner::default(),
        refuse: Rc::clone(&refuse),
    };
    let config = VoronoiConfig::new(1.0, 10).with_check_each_insertion(true);
    let mut vd = VoronoiDiagram::with_strategies(config, FilteredPredicates, positioner);
    let a = vd.insert_point_site(Point2::new(-0.5, 0.0)).unwrap();
    let b = vd.insert_point_site(Point2::new(0.5, 0.0)).unwrap();
    let c = vd.insert_point_site(Point2::new(0.0, 0.4)).unwrap();
    vd.insert_point_site(Point2::new(0.1, -0.3)).unwrap();
    vd.insert_line_site(a, b).unwrap();

    refuse.set(true);
    let before = vd.print();
    for p in [Point2::new(0.2, 0.01), Point2::new(-0.3, 0.5)] {
        let err = vd.insert_point_site(p).unwrap_err();
        assert!(matches!(err, VoronoiError::Degeneracy(_)), "{err}");
        assert_eq!(vd.print(), before);
    }
    let err = vd.insert_line_site(b, c).unwrap_err();
    assert!(matches!(err, VoronoiError::Degeneracy(_)), "{err}");
    assert_eq!(vd.print(), before);
    vd.check_exhaustive().unwrap();

    refuse.set(false);
    vd.insert_point_site(Point2::new(0.2, 0.01)).unwrap();
    vd.insert_line_site(b, c).unwrap();
    vd.check_exhaustive().unwrap();
}
