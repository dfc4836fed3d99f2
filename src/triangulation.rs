use crate::types::SubPolygon;
use anyhow::{anyhow, Result};
use geo::algorithm::contains::Contains;
use geo::{Coord, Point, Polygon};
use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation};

/// Subdivides one outline into triangles that exactly tile its interior.
///
/// The combined vertex set is indexed sample-points-first, then boundary
/// vertices; every boundary edge is added as a constraint, so no triangle
/// crosses the outline. Triangles of the convex hull that fall outside the
/// outline (concave pockets) are discarded by a centroid containment test,
/// which is exact here because constraint edges keep every triangle entirely
/// on one side of the boundary.
///
/// With no sample points the outline is returned unchanged as a single
/// polygon. Malformed outlines (self-intersections, duplicate consecutive
/// vertices, non-finite coordinates) surface as errors for the caller to
/// skip.
pub fn triangulate_outline(
    outline: &Polygon<f64>,
    samples: &[Point<f64>],
) -> Result<Vec<SubPolygon>> {
    let mut ring: Vec<Coord<f64>> = outline.exterior().0.clone();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(anyhow!("Outline has fewer than 3 distinct vertices"));
    }

    if samples.is_empty() {
        return Ok(vec![ring]);
    }

    let mut cdt = ConstrainedDelaunayTriangulation::<Point2<f64>>::new();

    for point in samples {
        cdt.insert(Point2::new(point.x(), point.y()))
            .map_err(|e| anyhow!("Failed to insert sample point: {:?}", e))?;
    }

    let mut boundary_handles = Vec::with_capacity(ring.len());
    for coord in &ring {
        let handle = cdt
            .insert(Point2::new(coord.x, coord.y))
            .map_err(|e| anyhow!("Failed to insert boundary vertex: {:?}", e))?;
        boundary_handles.push(handle);
    }

    for i in 0..boundary_handles.len() {
        let from = boundary_handles[i];
        let to = boundary_handles[(i + 1) % boundary_handles.len()];
        if from == to {
            return Err(anyhow!("Duplicate consecutive boundary vertices"));
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(anyhow!("Boundary edges intersect; outline is not a simple ring"));
        }
        cdt.add_constraint(from, to);
    }

    let mut triangles = Vec::new();
    for face in cdt.inner_faces() {
        let [a, b, c] = face.positions();
        let centroid = Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0);
        if outline.contains(&centroid) {
            triangles.push(vec![
                Coord { x: a.x, y: a.y },
                Coord { x: b.x, y: b.y },
                Coord { x: c.x, y: c.y },
            ]);
        }
    }

    Ok(triangles)
}
