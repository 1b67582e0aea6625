//! # Kernel Errors
//!
//! Error types raised across the geometry kernel boundary.
//!
//! ## Error Policy
//!
//! - Kernel failures are explicit, never silently replaced
//! - Void bounding boxes are not errors; they are reported as `None`

use thiserror::Error;

use crate::kernel::TopoKind;

/// Errors that can occur inside a geometry kernel.
///
/// ## Example
///
/// ```rust
/// use cad_kernel::{KernelError, TopoKind};
///
/// let err = KernelError::UnknownShapeKind { kind: TopoKind::Compound };
/// assert!(err.to_string().contains("Compound"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// The shape cannot be reduced to a renderable kind.
    #[error("Unknown shape kind: {kind:?}")]
    UnknownShapeKind {
        /// Topological kind that was found
        kind: TopoKind,
    },

    /// An operation received a shape of the wrong topological kind.
    #[error("Expected {expected:?}, found {found:?}")]
    UnexpectedShape {
        /// Kind the operation works on
        expected: TopoKind,
        /// Kind that was passed in
        found: TopoKind,
    },

    /// A face has no usable area.
    #[error("Degenerate face: {0}")]
    DegenerateFace(String),

    /// Mesh generation failed for another reason.
    #[error("Meshing failed: {0}")]
    Meshing(String),
}

impl KernelError {
    /// Creates a degenerate face error.
    pub fn degenerate_face(message: impl Into<String>) -> Self {
        Self::DegenerateFace(message.into())
    }
}

/// Result type alias for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;
