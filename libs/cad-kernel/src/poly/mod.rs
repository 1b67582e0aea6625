//! # Polyhedral Reference Kernel
//!
//! A small boundary-representation kernel: vertices, line and arc edges,
//! wires, planar faces, shells, solids and compounds, each carrying its own
//! placement. Sub-shapes are shared through `Arc`, so a shape moved to a
//! new placement keeps pointing at the same underlying geometry.
//!
//! ## Limitations
//!
//! - Faces are planar and convex (fan triangulation)
//! - A face has a single outer wire, no holes
//!
//! ## Example
//!
//! ```rust
//! use cad_kernel::{builders, GeometryKernel, PolyKernel, TopoKind};
//!
//! let kernel = PolyKernel;
//! let cube = builders::make_box(1.0, 2.0, 3.0);
//! assert_eq!(kernel.sub_shapes(&cube, TopoKind::Face).len(), 6);
//! assert_eq!(kernel.bounding_box(&cube, None, true), Some([0.0, 1.0, 0.0, 2.0, 0.0, 3.0]));
//! ```

pub mod builders;
pub mod curve;

#[cfg(test)]
mod tests;

use std::collections::hash_map::DefaultHasher;
use std::f64::consts::FRAC_PI_4;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use config::constants::{EPSILON, FAST_BOX_GAP};
use glam::DVec3;

use crate::error::{KernelError, KernelResult};
use crate::kernel::{BoxExtents, ContentHash, GeometryKernel, MeshRequest, TopoKind};
use crate::mesh::{EdgeMesh, ShapeMesh};
use crate::placement::Placement;

pub use curve::Curve;

/// Largest angular step of a discretized wireframe arc.
const MAX_EDGE_STEP: f64 = FRAC_PI_4;

/// Distance under which two points are the same vertex.
const VERTEX_TOLERANCE: f64 = 1e-9;

// =============================================================================
// SHAPE
// =============================================================================

/// Underlying geometry of a shape, independent of its placement.
#[derive(Debug, PartialEq)]
pub enum TShape {
    /// A point
    Vertex(DVec3),
    /// A curve
    Edge(Curve),
    /// Ordered, connected edges
    Wire(Vec<Shape>),
    /// Planar region bounded by a closed wire
    Face(Shape),
    /// Faces
    Shell(Vec<Shape>),
    /// Shells enclosing a volume
    Solid(Vec<Shape>),
    /// Anything
    Compound(Vec<Shape>),
}

impl TShape {
    fn kind(&self) -> TopoKind {
        match self {
            TShape::Vertex(_) => TopoKind::Vertex,
            TShape::Edge(_) => TopoKind::Edge,
            TShape::Wire(_) => TopoKind::Wire,
            TShape::Face(_) => TopoKind::Face,
            TShape::Shell(_) => TopoKind::Shell,
            TShape::Solid(_) => TopoKind::Solid,
            TShape::Compound(_) => TopoKind::Compound,
        }
    }

    fn children(&self) -> &[Shape] {
        match self {
            TShape::Wire(children)
            | TShape::Shell(children)
            | TShape::Solid(children)
            | TShape::Compound(children) => children,
            TShape::Face(wire) => std::slice::from_ref(wire),
            TShape::Vertex(_) | TShape::Edge(_) => &[],
        }
    }
}

/// A placed shape handle. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Shape {
    tshape: Arc<TShape>,
    location: Placement,
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
            && (Arc::ptr_eq(&self.tshape, &other.tshape) || self.tshape == other.tshape)
    }
}

impl Shape {
    /// Wraps geometry at the identity placement.
    pub fn new(tshape: TShape) -> Self {
        Self {
            tshape: Arc::new(tshape),
            location: Placement::IDENTITY,
        }
    }

    /// Topological kind.
    pub fn kind(&self) -> TopoKind {
        self.tshape.kind()
    }

    /// Placement of the shape.
    pub fn location(&self) -> Placement {
        self.location
    }

    /// Underlying geometry.
    pub fn tshape(&self) -> &TShape {
        &self.tshape
    }

    /// Same geometry with placement `placement * location`.
    pub fn moved(&self, placement: &Placement) -> Shape {
        Shape {
            tshape: Arc::clone(&self.tshape),
            location: placement.compose(&self.location),
        }
    }

    /// Same geometry at exactly `placement`.
    pub fn located(&self, placement: Placement) -> Shape {
        Shape {
            tshape: Arc::clone(&self.tshape),
            location: placement,
        }
    }

    fn shares_geometry(&self, other: &Shape) -> bool {
        Arc::ptr_eq(&self.tshape, &other.tshape)
            && self.location.abs_diff_eq(&other.location, EPSILON)
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        let (t, q) = self.location.to_tq();
        out.push(self.kind() as u8);
        for value in t.iter().chain(q.iter()) {
            out.extend_from_slice(&value.to_bits().to_le_bytes());
        }
        match self.tshape.as_ref() {
            TShape::Vertex(p) => curve::write_vec(out, *p),
            TShape::Edge(c) => c.write_bytes(out),
            tshape => {
                out.extend_from_slice(&(tshape.children().len() as u64).to_le_bytes());
                for child in tshape.children() {
                    child.write_bytes(out);
                }
            }
        }
    }
}

// =============================================================================
// EXPLORATION
// =============================================================================

/// Collects the unique sub-shapes of `kind`, each carrying its world
/// placement.
fn explore(shape: &Shape, kind: TopoKind, parent: &Placement, out: &mut Vec<Shape>) {
    let world = parent.compose(&shape.location);

    // Vertices are unique by position, whether explicit or edge endpoints
    if kind == TopoKind::Vertex {
        match shape.tshape.as_ref() {
            TShape::Vertex(p) => {
                push_vertex(out, world.transform_point(*p));
                return;
            }
            TShape::Edge(curve) => {
                for point in [curve.start(), curve.end()] {
                    push_vertex(out, world.transform_point(point));
                }
                return;
            }
            _ => {}
        }
    }

    if shape.kind() == kind {
        let placed = shape.located(world);
        if !out.iter().any(|s| s.shares_geometry(&placed)) {
            out.push(placed);
        }
        return;
    }

    for child in shape.tshape.children() {
        explore(child, kind, &world, out);
    }
}

fn push_vertex(out: &mut Vec<Shape>, position: DVec3) {
    let known = out.iter().any(|v| match v.tshape.as_ref() {
        TShape::Vertex(p) => v.location.transform_point(*p).distance(position) < VERTEX_TOLERANCE,
        _ => false,
    });
    if !known {
        out.push(Shape::new(TShape::Vertex(position)));
    }
}

/// World space curves of all edges, with an extra placement on top.
fn world_curves(shape: &Shape, placement: &Placement) -> Vec<Curve> {
    let mut edges = Vec::new();
    explore(shape, TopoKind::Edge, placement, &mut edges);
    edges
        .iter()
        .filter_map(|edge| match edge.tshape.as_ref() {
            TShape::Edge(curve) => Some(curve.transformed(&edge.location)),
            _ => None,
        })
        .collect()
}

fn world_vertices(shape: &Shape, placement: &Placement) -> Vec<DVec3> {
    let mut vertices = Vec::new();
    explore(shape, TopoKind::Vertex, placement, &mut vertices);
    vertices
        .iter()
        .filter_map(|v| match v.tshape.as_ref() {
            TShape::Vertex(p) => Some(v.location.transform_point(*p)),
            _ => None,
        })
        .collect()
}

// =============================================================================
// FACE OUTLINES
// =============================================================================

/// Chains the discretized edges of a face's wire into a closed outline.
fn face_outline(face: &Shape, deflection: f64, max_angle: f64) -> KernelResult<Vec<DVec3>> {
    let wire = match face.tshape.as_ref() {
        TShape::Face(wire) => wire.moved(&face.location),
        _ => {
            return Err(KernelError::UnexpectedShape {
                expected: TopoKind::Face,
                found: face.kind(),
            })
        }
    };

    let polylines = wire
        .tshape
        .children()
        .iter()
        .filter_map(|edge| match edge.tshape.as_ref() {
            TShape::Edge(curve) => Some(
                curve
                    .transformed(&wire.location.compose(&edge.location))
                    .discretize(deflection, max_angle),
            ),
            _ => None,
        })
        .collect::<Vec<_>>();

    let mut outline: Vec<DVec3> = Vec::new();
    for (index, polyline) in polylines.iter().enumerate() {
        if index == 0 {
            let connects_forward = polylines.get(1).map_or(true, |next| {
                let end = polyline[polyline.len() - 1];
                end.distance(next[0]) < VERTEX_TOLERANCE
                    || end.distance(next[next.len() - 1]) < VERTEX_TOLERANCE
            });
            if connects_forward {
                outline.extend(polyline.iter().copied());
            } else {
                outline.extend(polyline.iter().rev().copied());
            }
            continue;
        }
        let last = outline[outline.len() - 1];
        if last.distance(polyline[0]) < VERTEX_TOLERANCE {
            outline.extend(polyline.iter().skip(1).copied());
        } else if last.distance(polyline[polyline.len() - 1]) < VERTEX_TOLERANCE {
            outline.extend(polyline.iter().rev().skip(1).copied());
        } else {
            outline.extend(polyline.iter().copied());
        }
    }

    if outline.len() > 1 && outline[0].distance(outline[outline.len() - 1]) < VERTEX_TOLERANCE {
        outline.pop();
    }
    if outline.len() < 3 {
        return Err(KernelError::degenerate_face(format!(
            "outline has {} points",
            outline.len()
        )));
    }
    Ok(outline)
}

/// Newell normal of a closed polygon.
fn newell_normal(outline: &[DVec3]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

// =============================================================================
// KERNEL
// =============================================================================

/// The polyhedral reference kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolyKernel;

impl GeometryKernel for PolyKernel {
    type Shape = Shape;

    fn topo_kind(&self, shape: &Shape) -> TopoKind {
        shape.kind()
    }

    fn explode(&self, shape: &Shape) -> Vec<Shape> {
        match shape.tshape.as_ref() {
            TShape::Compound(children) => children.iter().map(|c| c.moved(&shape.location)).collect(),
            _ => vec![shape.clone()],
        }
    }

    fn sub_shapes(&self, shape: &Shape, kind: TopoKind) -> Vec<Shape> {
        let mut out = Vec::new();
        explore(shape, kind, &Placement::IDENTITY, &mut out);
        out
    }

    fn make_compound(&self, shapes: &[Shape]) -> Shape {
        builders::make_compound(shapes.to_vec())
    }

    fn bounding_box(
        &self,
        shape: &Shape,
        placement: Option<&Placement>,
        exact: bool,
    ) -> Option<BoxExtents> {
        let placement = placement.copied().unwrap_or(Placement::IDENTITY);
        let mut points = world_vertices(shape, &placement);
        for curve in world_curves(shape, &placement) {
            points.extend(curve.extent_points(exact));
        }
        let first = points.first()?;
        let (mut min, mut max) = (*first, *first);
        for p in &points {
            min = min.min(*p);
            max = max.max(*p);
        }
        if !exact {
            min -= DVec3::splat(FAST_BOX_GAP);
            max += DVec3::splat(FAST_BOX_GAP);
        }
        Some([min.x, max.x, min.y, max.y, min.z, max.z])
    }

    fn center_of_mass(&self, shape: &Shape) -> DVec3 {
        let points = world_vertices(shape, &Placement::IDENTITY);
        if points.is_empty() {
            return shape.location.translation;
        }
        points.iter().copied().sum::<DVec3>() / points.len() as f64
    }

    fn location(&self, shape: &Shape) -> Placement {
        shape.location
    }

    fn moved(&self, shape: &Shape, placement: &Placement) -> Shape {
        shape.moved(placement)
    }

    fn is_same(&self, a: &Shape, b: &Shape) -> bool {
        a == b
    }

    fn content_hash(&self, shape: &Shape) -> ContentHash {
        let mut bytes = Vec::new();
        shape.write_bytes(&mut bytes);
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        ContentHash(hasher.finish().to_be_bytes().to_vec())
    }

    fn mesh(&self, shape: &Shape, request: &MeshRequest) -> KernelResult<ShapeMesh> {
        let mut mesh = ShapeMesh::new();
        for face in self.sub_shapes(shape, TopoKind::Face) {
            let outline = face_outline(&face, request.deflection, request.angular_tolerance)?;
            let normal = newell_normal(&outline);
            if normal.length() < EPSILON {
                return Err(KernelError::degenerate_face("outline encloses no area"));
            }
            mesh.push_face(&outline, normal.normalize());
        }
        if request.compute_edges {
            let edges = self.sub_shapes(shape, TopoKind::Edge);
            mesh.edges = Some(self.discretize_edges(&edges, request.edge_deflection)?);
        }
        for point in world_vertices(shape, &Placement::IDENTITY) {
            mesh.push_obj_vertex(point);
        }
        Ok(mesh)
    }

    fn discretize_edges(&self, edges: &[Shape], deflection: f64) -> KernelResult<EdgeMesh> {
        let mut mesh = EdgeMesh::new();
        for edge in edges {
            match edge.tshape.as_ref() {
                TShape::Edge(curve) => mesh.push_polyline(
                    &curve
                        .transformed(&edge.location)
                        .discretize(deflection, MAX_EDGE_STEP),
                ),
                _ => {
                    return Err(KernelError::UnexpectedShape {
                        expected: TopoKind::Edge,
                        found: edge.kind(),
                    })
                }
            }
        }
        Ok(mesh)
    }

    fn vertex_points(&self, vertices: &[Shape]) -> KernelResult<Vec<DVec3>> {
        vertices
            .iter()
            .map(|vertex| match vertex.tshape.as_ref() {
                TShape::Vertex(p) => Ok(vertex.location.transform_point(*p)),
                _ => Err(KernelError::UnexpectedShape {
                    expected: TopoKind::Vertex,
                    found: vertex.kind(),
                }),
            })
            .collect()
    }
}
