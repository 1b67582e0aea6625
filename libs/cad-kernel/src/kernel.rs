//! # Geometry Kernel Boundary
//!
//! The capabilities the scene converter and the tessellation orchestrator
//! consume from a boundary-representation kernel. Everything geometric
//! (shape typing, compounds, placements, boxes, hashing, meshing) is asked
//! of a [`GeometryKernel`]; the core never inspects shapes itself.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, KernelResult};
use crate::mesh::{EdgeMesh, ShapeMesh};
use crate::placement::Placement;

/// Axis-aligned extents as `[xmin, xmax, ymin, ymax, zmin, zmax]`.
pub type BoxExtents = [f64; 6];

/// Topological kind of a shape.
///
/// Kinds are ordered from the lowest to the highest dimension, with
/// compounds last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TopoKind {
    /// A point
    Vertex,
    /// A curve segment
    Edge,
    /// A chain of edges
    Wire,
    /// A bounded surface patch
    Face,
    /// A set of connected faces
    Shell,
    /// A closed volume
    Solid,
    /// An arbitrary collection of shapes
    Compound,
}

impl TopoKind {
    /// Human readable type name, as used in default node names.
    pub fn type_name(self) -> &'static str {
        match self {
            TopoKind::Vertex => "Vertex",
            TopoKind::Edge => "Edge",
            TopoKind::Wire => "Wire",
            TopoKind::Face => "Face",
            TopoKind::Shell => "Shell",
            TopoKind::Solid => "Solid",
            TopoKind::Compound => "Compound",
        }
    }
}

impl fmt::Display for TopoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Stable content digest of a shape.
///
/// Used as a fast index by the instance cache and as a change detection
/// key by downstream mesh caches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(pub Vec<u8>);

impl ContentHash {
    /// Lowercase hexadecimal rendering of the digest.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cad_kernel::ContentHash;
    ///
    /// assert_eq!(ContentHash(vec![0x0a, 0xff]).to_hex(), "0aff");
    /// ```
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parameters of a single mesh computation.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRequest {
    /// Content hash of the shape, usable by kernels that memoize meshes
    pub cache_key: ContentHash,
    /// Linear deflection for faces
    pub deflection: f64,
    /// Linear deflection for wireframe edges
    pub edge_deflection: f64,
    /// Angular deflection in radians
    pub angular_tolerance: f64,
    /// Whether wireframe edges are computed alongside the faces
    pub compute_edges: bool,
}

/// A boundary-representation kernel.
///
/// Implementations must be shareable across threads: the tessellation pass
/// may mesh instances concurrently.
///
/// ## Placement semantics
///
/// Every shape carries a [`Placement`]. `moved(shape, p)` returns the same
/// geometry with placement `p * location(shape)`, so
/// `moved(shape, &location(shape).inverse())` yields the canonical
/// (unplaced) form.
pub trait GeometryKernel: Sync {
    /// Shape handle type.
    type Shape: Clone + fmt::Debug + Send + Sync;

    /// Topological kind of a shape.
    fn topo_kind(&self, shape: &Self::Shape) -> TopoKind;

    /// Renderable kind of a single, non compound shape.
    fn shape_kind(&self, shape: &Self::Shape) -> KernelResult<TopoKind> {
        match self.topo_kind(shape) {
            TopoKind::Compound => Err(KernelError::UnknownShapeKind {
                kind: TopoKind::Compound,
            }),
            kind => Ok(kind),
        }
    }

    /// Direct elements of a compound. Any other shape yields itself.
    fn explode(&self, shape: &Self::Shape) -> Vec<Self::Shape>;

    /// Unique sub-shapes of the given kind, in world placement.
    fn sub_shapes(&self, shape: &Self::Shape, kind: TopoKind) -> Vec<Self::Shape>;

    /// Builds a compound from shapes.
    fn make_compound(&self, shapes: &[Self::Shape]) -> Self::Shape;

    /// Bounding box of the shape, optionally moved by `placement` first.
    ///
    /// Returns `None` when the shape has no extent at all.
    fn bounding_box(
        &self,
        shape: &Self::Shape,
        placement: Option<&Placement>,
        exact: bool,
    ) -> Option<BoxExtents>;

    /// Center of mass, used to place substitute boxes of void geometry.
    fn center_of_mass(&self, shape: &Self::Shape) -> DVec3;

    /// Current placement of a shape.
    fn location(&self, shape: &Self::Shape) -> Placement;

    /// Returns the shape moved by `placement` on top of its own location.
    fn moved(&self, shape: &Self::Shape, placement: &Placement) -> Self::Shape;

    /// Translation and `[x, y, z, w]` rotation of a shape's placement.
    fn decompose_placement(&self, shape: &Self::Shape) -> ([f64; 3], [f64; 4]) {
        self.location(shape).to_tq()
    }

    /// Geometric identity, including placement.
    fn is_same(&self, a: &Self::Shape, b: &Self::Shape) -> bool;

    /// Stable digest of the shape's geometry.
    fn content_hash(&self, shape: &Self::Shape) -> ContentHash;

    /// Triangulates all faces of a shape.
    fn mesh(&self, shape: &Self::Shape, request: &MeshRequest) -> KernelResult<ShapeMesh>;

    /// Discretizes edges into polylines.
    fn discretize_edges(&self, edges: &[Self::Shape], deflection: f64) -> KernelResult<EdgeMesh>;

    /// World positions of vertices.
    fn vertex_points(&self, vertices: &[Self::Shape]) -> KernelResult<Vec<DVec3>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order() {
        assert!(TopoKind::Vertex < TopoKind::Edge);
        assert!(TopoKind::Solid < TopoKind::Compound);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TopoKind::Shell.to_string(), "Shell");
    }

    #[test]
    fn test_hash_display_is_hex() {
        let hash = ContentHash(vec![1, 2, 254]);
        assert_eq!(hash.to_string(), "0102fe");
    }
}
