//! # Scene Errors
//!
//! Fatal errors of the conversion and tessellation passes.
//!
//! ## Error Policy
//!
//! - Classification, arity and compound errors abort the whole conversion
//! - A failed instance mesh aborts the whole tessellation
//! - Void geometry and skipped values are not errors; they are reported
//!   through [`crate::Diagnostics`]

use cad_kernel::KernelError;
use config::tessellation::ConfigError;
use thiserror::Error;

/// Errors that can occur while building or tessellating a scene.
///
/// ## Example
///
/// ```rust
/// use cad_scene::SceneError;
///
/// let err = SceneError::arity_mismatch("names", 3, 2);
/// assert!(err.to_string().contains("names"));
/// ```
#[derive(Error, Debug)]
pub enum SceneError {
    /// A value matches no recognized CAD capability.
    #[error("Unknown object type: {type_name}{}", slot_suffix(.slot))]
    ShapeClassification {
        /// Type of the offending value
        type_name: String,
        /// Name the value was converted under, if any
        slot: Option<String>,
    },

    /// A per-object argument list has the wrong length.
    #[error("Length of {argument} ({actual}) does not match the number of objects ({expected})")]
    ArityMismatch {
        /// Argument name
        argument: &'static str,
        /// Number of objects
        expected: usize,
        /// Length of the argument list
        actual: usize,
    },

    /// A compound's elements cannot be reduced to one renderable kind.
    #[error("Unsupported compound '{name}': mixed kinds {kinds}")]
    UnsupportedCompound {
        /// Name of the compound
        name: String,
        /// Kinds that were found
        kinds: String,
    },

    /// Meshing of one instance failed.
    #[error("Mesh computation failed for instance {index}: {source}")]
    MeshComputation {
        /// Position in the instance table
        index: usize,
        /// Kernel failure
        #[source]
        source: KernelError,
    },

    /// The description met an inline leaf without its discretized payload.
    #[error("No inline payload for leaf '{id}'")]
    MissingInlinePayload {
        /// Path of the leaf
        id: String,
    },

    /// Any other kernel failure.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// Invalid tessellation settings.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

fn slot_suffix(slot: &Option<String>) -> String {
    slot.as_ref()
        .map(|name| format!(" (name: '{name}')"))
        .unwrap_or_default()
}

impl SceneError {
    /// Creates a classification error.
    pub fn classification(type_name: impl Into<String>, slot: Option<&str>) -> Self {
        Self::ShapeClassification {
            type_name: type_name.into(),
            slot: slot.map(str::to_string),
        }
    }

    /// Creates an arity error.
    pub fn arity_mismatch(argument: &'static str, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            argument,
            expected,
            actual,
        }
    }

    /// Creates an unsupported compound error.
    pub fn unsupported_compound(name: impl Into<String>, kinds: impl Into<String>) -> Self {
        Self::UnsupportedCompound {
            name: name.into(),
            kinds: kinds.into(),
        }
    }
}

/// Result type alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_message() {
        let err = SceneError::classification("Builder", Some("part"));
        assert_eq!(err.to_string(), "Unknown object type: Builder (name: 'part')");

        let err = SceneError::classification("Compound", None);
        assert_eq!(err.to_string(), "Unknown object type: Compound");
    }

    #[test]
    fn test_mesh_error_keeps_source() {
        let err = SceneError::MeshComputation {
            index: 3,
            source: KernelError::degenerate_face("flat"),
        };
        assert!(err.to_string().contains("instance 3"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_payload_message() {
        let err = SceneError::MissingInlinePayload {
            id: "/Group/rail".to_string(),
        };
        assert_eq!(err.to_string(), "No inline payload for leaf '/Group/rail'");
    }

    #[test]
    fn test_from_config_error() {
        let err: SceneError = ConfigError::InvalidDeviation(0.0).into();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SceneError>();
    }
}
