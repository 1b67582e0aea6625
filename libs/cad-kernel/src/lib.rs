//! # CAD Kernel
//!
//! The geometry kernel boundary consumed by the scene pipeline.
//!
//! ## Architecture
//!
//! ```text
//! cad-scene (convert, tessellate) → GeometryKernel trait → PolyKernel
//! ```
//!
//! The scene pipeline is generic over [`GeometryKernel`]. This crate also
//! ships [`PolyKernel`], a small polyhedral kernel that implements the
//! trait so the pipeline can be exercised end to end.
//!
//! ## Usage
//!
//! ```rust
//! use cad_kernel::{builders, GeometryKernel, Placement, PolyKernel};
//! use glam::DVec3;
//!
//! let kernel = PolyKernel;
//! let part = builders::make_box(1.0, 1.0, 1.0);
//! let placed = kernel.moved(&part, &Placement::from_translation(DVec3::X));
//! assert_eq!(kernel.decompose_placement(&placed).0, [1.0, 0.0, 0.0]);
//! ```

pub mod error;
pub mod kernel;
pub mod mesh;
pub mod placement;
pub mod poly;

pub use error::{KernelError, KernelResult};
pub use kernel::{BoxExtents, ContentHash, GeometryKernel, MeshRequest, TopoKind};
pub use mesh::{EdgeMesh, ShapeMesh};
pub use placement::Placement;
pub use poly::{builders, Curve, PolyKernel, Shape, TShape};
