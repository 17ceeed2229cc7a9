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

//! Line-oriented text dump of a diagram: sites, live vertices, edges (one
//! line per twin pair) and faces, with index references into the graph.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{diagram::VoronoiDiagram, site::Site};

pub fn write_diagram<O, P, W: Write>(vd: &VoronoiDiagram<O, P>, mut out: W) -> io::Result<()> {
    let g = vd.graph();
    writeln!(out, "# incremental-voronoi {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "far_radius {:?}", vd.far_radius())?;

    for (i, entry) in vd.sites().iter().enumerate() {
        match &entry.site {
            Site::Point(p) => writeln!(out, "s {i} point {:?} {:?} {}", p.x, p.y, entry.face)?,
            Site::Segment(s) => {
                let [a, b] = entry.endpoints.unwrap_or([usize::MAX; 2]);
                writeln!(
                    out,
                    "s {i} segment {:?} {:?} {:?} {:?} {} {a} {b}",
                    s.a.x, s.a.y, s.b.x, s.b.y, entry.face
                )?
            }
        }
    }

    for v in g.live_vertices() {
        let vertex = &g.vertices[v];
        writeln!(
            out,
            "v {v} {:?} {:?} {:?} {} {}",
            vertex.position.x,
            vertex.position.y,
            vertex.clearance,
            vertex.status.as_str(),
            vertex.kind.as_str()
        )?;
    }

    for h in g.live_half_edges() {
        let t = g.twin(h);
        if t < h {
            continue;
        }
        let e = &g.half_edges[h];
        writeln!(
            out,
            "e {h} {} {} {} {} {}",
            g.source(h),
            e.vertex,
            e.kind.as_str(),
            e.face,
            g.half_edges[t].face
        )?;
    }

    for (f, face) in g.faces.iter().enumerate() {
        match face.site {
            Some(s) => writeln!(out, "f {f} {s} {}", face.half_edge)?,
            None => writeln!(out, "f {f} - {}", face.half_edge)?,
        }
    }
    out.flush()
}

pub fn save_diagram<O, P, Q: AsRef<Path>>(vd: &VoronoiDiagram<O, P>, path: Q) -> io::Result<()> {
    let file = File::create(path)?;
    write_diagram(vd, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;

    #[test]
    fn dump_lists_every_entity() {
        let mut vd = VoronoiDiagram::new(1.0, 4);
        let a = vd.insert_point_site(Point2::new(-0.3, 0.1)).unwrap();
        let b = vd.insert_point_site(Point2::new(0.4, 0.0)).unwrap();
        vd.insert_line_site(a, b).unwrap();

        let mut buf = Vec::new();
        write_diagram(&vd, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("s "), vd.sites().len());
        assert_eq!(count("e "), vd.num_edges());
        assert_eq!(count("f "), vd.num_faces());
        assert!(text.contains(" segment "));
        assert!(text.contains("SEPARATOR"));
    }
}
