//! # Configuration Constants
//!
//! Centralized constants for the CAD scene pipeline. Tessellation presets,
//! rendering defaults and bounding box tolerances are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Tessellation**: Default deviation, angular tolerance, quality heuristic
//! - **Rendering**: Colors, line widths, helper marker sizes
//! - **Limits**: Recursion stack sizing

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used when deciding whether a placement is the identity or whether two
/// coordinates coincide.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Half width of the substitute box used when a bounding box is void.
///
/// Degenerate geometry (an empty compound, a shape without points) has no
/// extent. It is replaced by a cube of this half width centered at the
/// geometry's center of mass.
pub const VOID_BOX_HALF_WIDTH: f64 = 1e-6;

/// Per-axis extent below which a bounding box counts as empty.
pub const EMPTY_BOX_EXTENT: f64 = 0.01;

/// Enlargement applied by the fast (non exact) bounding box computation.
pub const FAST_BOX_GAP: f64 = 1e-7;

// =============================================================================
// TESSELLATION CONSTANTS
// =============================================================================

/// Default linear deviation driving tessellation coarseness.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_DEVIATION;
/// assert!(DEFAULT_DEVIATION > 0.0);
/// ```
pub const DEFAULT_DEVIATION: f64 = 0.1;

/// Default angular tolerance (radians) for curvature sampling.
pub const DEFAULT_ANGULAR_TOLERANCE: f64 = 0.2;

/// Whether wireframe edges are computed alongside faces by default.
pub const DEFAULT_RENDER_EDGES: bool = true;

/// Divisor applied to the summed box extents in the quality heuristic.
pub const QUALITY_SIZE_DIVISOR: f64 = 300.0;

/// Divisor turning a face quality into an edge discretization deflection.
pub const EDGE_DEFLECTION_DIVISOR: f64 = 100.0;

/// Lower bound of the quality heuristic.
///
/// Keeps tiny or degenerate shapes from requesting a zero deflection.
pub const MIN_QUALITY: f64 = 1e-5;

/// Significant digits kept by the quality heuristic.
///
/// Rounding keeps the quality stable for shapes of nearly equal size, which
/// keeps downstream tessellation caches warm.
pub const QUALITY_SIGNIFICANT_DIGITS: i32 = 2;

// =============================================================================
// RENDERING CONSTANTS
// =============================================================================

/// Default RGB color for solids (`#e8b024`).
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_COLOR;
/// assert_eq!(DEFAULT_COLOR, [232, 176, 36]);
/// ```
pub const DEFAULT_COLOR: [u8; 3] = [232, 176, 36];

/// Default RGB color for edges, wires and vertices (`MediumOrchid`).
pub const DEFAULT_EDGE_COLOR: [u8; 3] = [186, 85, 211];

/// Default RGB color for faces and shells (`Violet`).
pub const DEFAULT_FACE_COLOR: [u8; 3] = [238, 130, 238];

/// Stroke width used for edge objects.
pub const LINE_WIDTH: f64 = 2.0;

/// Point size used for vertex objects.
pub const POINT_SIZE: f64 = 4.0;

/// Default size of coordinate system and axis markers.
pub const DEFAULT_HELPER_SCALE: f64 = 1.0;

/// Sketch markers are sized to `max extent / SKETCH_HELPER_DIVISOR`.
pub const SKETCH_HELPER_DIVISOR: f64 = 20.0;

/// Alpha used for the local (unplaced) copy of a builder sketch.
pub const SKETCH_LOCAL_ALPHA: f32 = 0.2;

/// Version tag written into the output scene description.
pub const SCENE_FORMAT_VERSION: u32 = 3;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Bytes of stack space reserved when growing recursion limits using the
/// `stacker` crate during recursive dispatch.
///
/// # Example
///
/// ```rust
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which recursive dispatch switches to a freshly
/// allocated segment of [`STACKER_STACK_SIZE_BYTES`].
pub const STACKER_RED_ZONE_BYTES: usize = 128 * 1024;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Computes the adaptive tessellation quality for a shape.
///
/// The quality grows linearly with the summed extents of the shape's
/// bounding box, scaled by `deviation`, rounded to
/// [`QUALITY_SIGNIFICANT_DIGITS`] and bounded below by [`MIN_QUALITY`].
///
/// # Arguments
///
/// * `sizes` - Bounding box extents along x, y and z
/// * `deviation` - Linear deviation preset
///
/// # Example
///
/// ```rust
/// use config::constants::compute_quality;
///
/// let quality = compute_quality([10.0, 10.0, 10.0], 0.1);
/// assert!((quality - 0.01).abs() < 1e-12);
///
/// // Larger objects get coarser tessellation.
/// assert!(compute_quality([100.0, 100.0, 100.0], 0.1) > quality);
/// ```
pub fn compute_quality(sizes: [f64; 3], deviation: f64) -> f64 {
    let raw = (sizes[0] + sizes[1] + sizes[2]) / QUALITY_SIZE_DIVISOR * deviation;
    round_significant(raw, QUALITY_SIGNIFICANT_DIGITS).max(MIN_QUALITY)
}

/// Rounds a value to the given number of significant digits.
///
/// # Example
///
/// ```rust
/// use config::constants::round_significant;
///
/// assert_eq!(round_significant(0.012345, 2), 0.012);
/// assert_eq!(round_significant(0.0, 2), 0.0);
/// ```
pub fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    (value * factor).round() / factor
}

