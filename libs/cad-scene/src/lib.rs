//! # CAD Scene
//!
//! Converts heterogeneous CAD values into a scene graph ready for a web
//! viewer.
//!
//! ## Pipeline
//!
//! ```text
//! CadValue forest ──convert──▶ scene tree + instance table
//!                 ──tessellate_all──▶ meshes + inline payloads + volume
//!                 ──SceneDescription::new──▶ JSON
//! ```
//!
//! ## Modules
//!
//! - [`input`]: the closed set of accepted values
//! - [`convert`]: ordered classification and dispatch
//! - [`instance`]: deduplication of geometry repeated at several placements
//! - [`node`]: groups and leaves of the scene tree
//! - [`tessellate`]: per instance meshing and the scene volume
//! - [`description`]: serializable output
//! - [`bounds`], [`color`], [`diagnostics`], [`progress`], [`error`]
//!
//! ## Example
//!
//! ```rust
//! use cad_kernel::{builders, GeometryKernel, Placement, PolyKernel};
//! use cad_scene::{render_scene, CadValue, ConvertOptions};
//! use config::tessellation::TessellationConfig;
//! use glam::DVec3;
//!
//! let kernel = PolyKernel;
//! let bolt = builders::make_box(1.0, 1.0, 4.0);
//! let values: Vec<_> = (0..3)
//!     .map(|i| {
//!         let placed = kernel.moved(&bolt, &Placement::from_translation(DVec3::new(i as f64 * 3.0, 0.0, 0.0)));
//!         CadValue::shape(placed)
//!     })
//!     .collect();
//!
//! let scene = render_scene(&kernel, &values, &ConvertOptions::default(), &TessellationConfig::default()).unwrap();
//! assert_eq!(scene.parts.len(), 3);
//! assert_eq!(scene.instances.len(), 1);
//! ```

pub mod bounds;
pub mod color;
pub mod convert;
pub mod description;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod instance;
pub mod node;
pub mod progress;
pub mod tessellate;

pub use bounds::{BoundingBox, BoundsRecord};
pub use color::Rgba;
pub use convert::{convert, Conversion, ConvertOptions, Converter};
pub use description::SceneDescription;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{SceneError, SceneResult};
pub use input::{Assembly, Axis, Builder, CadShape, CadValue, Frame, ScalarValue, Selected, ShapeList, ShapeListOrigin, Sketch};
pub use instance::{Instance, InstanceCache, ObjectRef};
pub use node::{Geometry, Group, Kind, Marker, Object, SceneNode};
pub use progress::{ConsoleProgress, Progress};
pub use tessellate::{tessellate_all, InlineMesh, Tessellation};

use cad_kernel::GeometryKernel;
use config::tessellation::TessellationConfig;

/// Converts, tessellates and describes values in one call.
///
/// # Errors
///
/// Any error of [`convert`], [`tessellate_all`] or [`SceneDescription::new`].
pub fn render_scene<K: GeometryKernel>(
    kernel: &K,
    values: &[CadValue<K::Shape>],
    options: &ConvertOptions,
    config: &TessellationConfig,
) -> SceneResult<SceneDescription> {
    let conversion = convert(kernel, values, options)?;
    let tessellation = tessellate_all(
        kernel,
        &conversion.root,
        &conversion.instances,
        config,
        &conversion.diagnostics,
        None,
    )?;
    Ok(SceneDescription::new(&conversion.root, tessellation)?.with_diagnostics(conversion.diagnostics.into_entries()))
}
