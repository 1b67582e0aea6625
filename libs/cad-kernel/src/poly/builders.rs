//! # Shape Builders
//!
//! Constructors for polyhedral kernel shapes.
//!
//! ## Example
//!
//! ```rust
//! use cad_kernel::builders::{make_polygon_face, make_compound};
//! use glam::DVec3;
//!
//! let tri = make_polygon_face(&[DVec3::ZERO, DVec3::X, DVec3::Y]);
//! let both = make_compound(vec![tri.clone(), tri]);
//! ```

use std::f64::consts::TAU;

use glam::DVec3;

use super::curve::Curve;
use super::{Shape, TShape};

/// Creates a vertex.
pub fn make_vertex(position: DVec3) -> Shape {
    Shape::new(TShape::Vertex(position))
}

/// Creates a straight edge.
pub fn make_line(start: DVec3, end: DVec3) -> Shape {
    Shape::new(TShape::Edge(Curve::Line { start, end }))
}

/// Creates an arc edge counter-clockwise around `normal`.
///
/// # Arguments
///
/// * `center` - Circle center
/// * `radius` - Circle radius
/// * `normal` - Normal of the circle plane
/// * `start_angle` / `end_angle` - Angular range in radians, measured from
///   an arbitrary direction orthogonal to `normal`
pub fn make_arc(center: DVec3, radius: f64, normal: DVec3, start_angle: f64, end_angle: f64) -> Shape {
    let normal = normal.normalize_or_zero();
    let normal = if normal == DVec3::ZERO { DVec3::Z } else { normal };
    let x_dir = if normal.abs_diff_eq(DVec3::Z, 1e-12) {
        DVec3::X
    } else {
        normal.any_orthonormal_vector()
    };
    Shape::new(TShape::Edge(Curve::Arc {
        center,
        radius,
        x_dir,
        normal,
        start_angle,
        end_angle,
    }))
}

/// Creates a full circle edge.
pub fn make_circle(center: DVec3, radius: f64, normal: DVec3) -> Shape {
    make_arc(center, radius, normal, 0.0, TAU)
}

/// Creates a wire from connected edges, in order.
pub fn make_wire(edges: Vec<Shape>) -> Shape {
    Shape::new(TShape::Wire(edges))
}

/// Creates a closed polygonal wire through `points`.
pub fn make_polygon(points: &[DVec3]) -> Shape {
    let edges = (0..points.len())
        .map(|i| make_line(points[i], points[(i + 1) % points.len()]))
        .collect();
    make_wire(edges)
}

/// Creates a face bounded by a closed wire.
pub fn make_face(wire: Shape) -> Shape {
    Shape::new(TShape::Face(wire))
}

/// Creates a convex polygonal face.
pub fn make_polygon_face(points: &[DVec3]) -> Shape {
    make_face(make_polygon(points))
}

/// Creates a disk face.
pub fn make_disk(center: DVec3, radius: f64, normal: DVec3) -> Shape {
    make_face(make_wire(vec![make_circle(center, radius, normal)]))
}

/// Creates a shell from faces.
pub fn make_shell(faces: Vec<Shape>) -> Shape {
    Shape::new(TShape::Shell(faces))
}

/// Creates a solid from shells.
pub fn make_solid(shells: Vec<Shape>) -> Shape {
    Shape::new(TShape::Solid(shells))
}

/// Creates a compound.
pub fn make_compound(shapes: Vec<Shape>) -> Shape {
    Shape::new(TShape::Compound(shapes))
}

/// Creates an axis aligned box with one corner at the origin. Adjacent
/// faces share their edges.
///
/// # Example
///
/// ```rust
/// use cad_kernel::{builders::make_box, GeometryKernel, PolyKernel, TopoKind};
///
/// let cube = make_box(1.0, 1.0, 1.0);
/// assert_eq!(PolyKernel.sub_shapes(&cube, TopoKind::Edge).len(), 12);
/// ```
pub fn make_box(dx: f64, dy: f64, dz: f64) -> Shape {
    let corners = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(dx, 0.0, 0.0),
        DVec3::new(dx, dy, 0.0),
        DVec3::new(0.0, dy, 0.0),
        DVec3::new(0.0, 0.0, dz),
        DVec3::new(dx, 0.0, dz),
        DVec3::new(dx, dy, dz),
        DVec3::new(0.0, dy, dz),
    ];
    const EDGES: [(usize, usize); 12] = [
        (0, 1), (1, 2), (2, 3), (3, 0),
        (4, 5), (5, 6), (6, 7), (7, 4),
        (0, 4), (1, 5), (2, 6), (3, 7),
    ];
    const FACES: [[usize; 4]; 6] = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];

    let edges = EDGES
        .iter()
        .map(|&(a, b)| make_line(corners[a], corners[b]))
        .collect::<Vec<_>>();
    let edge_between = |a: usize, b: usize| {
        EDGES
            .iter()
            .position(|&(s, e)| (s, e) == (a, b) || (s, e) == (b, a))
            .map(|i| edges[i].clone())
    };

    let faces = FACES
        .iter()
        .map(|corners| {
            let wire = (0..4)
                .filter_map(|i| edge_between(corners[i], corners[(i + 1) % 4]))
                .collect();
            make_face(make_wire(wire))
        })
        .collect();

    make_solid(vec![make_shell(faces)])
}
