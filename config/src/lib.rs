//! # Config Crate
//!
//! Centralized configuration for the CAD scene pipeline. Tessellation
//! presets, default colors, line widths and the bounding box heuristics live
//! here so the kernel adapter and the scene converter agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{compute_quality, DEFAULT_DEVIATION};
//! use config::tessellation::TessellationConfig;
//!
//! let quality = compute_quality([10.0, 10.0, 10.0], DEFAULT_DEVIATION);
//! assert!(quality > 0.0);
//!
//! let cfg = TessellationConfig::default();
//! assert_eq!(cfg.deviation, DEFAULT_DEVIATION);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No Dependencies**: Pure values and small pure functions
//! - **Validated Settings**: Runtime settings go through `TessellationConfig::new`

pub mod constants;
pub mod tessellation;
