//! # Input Values
//!
//! The closed set of values the converter accepts. Callers translate
//! their modeling library's objects into a [`CadValue`] forest; the
//! converter then classifies each value with a single ordered match.
//!
//! ## Example
//!
//! ```rust
//! use cad_kernel::{builders, Placement};
//! use cad_scene::{Assembly, CadValue};
//! use glam::DVec3;
//!
//! let bolt = CadValue::shape(builders::make_box(1.0, 1.0, 4.0)).with_label("bolt");
//! let assembly = CadValue::Assembly(Assembly {
//!     label: Some("fixture".to_string()),
//!     placement: Placement::from_translation(DVec3::new(0.0, 0.0, 5.0)),
//!     children: vec![bolt],
//! });
//! assert_eq!(assembly.label(), Some("fixture"));
//! ```

use cad_kernel::Placement;
use glam::DVec3;

use crate::color::Rgba;

/// Plain values that are never rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// A member of some enumeration
    Enum(String),
    Color(Rgba),
}

/// Where a shape list came from. Only affects default names and compound
/// flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeListOrigin {
    /// A plain list of shapes
    ShapeList,
    /// The result stack of a workplane; compounds on it are flattened
    Workplane,
}

impl ShapeListOrigin {
    pub fn type_name(self) -> &'static str {
        match self {
            ShapeListOrigin::ShapeList => "ShapeList",
            ShapeListOrigin::Workplane => "Workplane",
        }
    }
}

/// A homogeneous list of kernel shapes.
#[derive(Debug, Clone)]
pub struct ShapeList<S> {
    pub items: Vec<S>,
    pub origin: ShapeListOrigin,
    pub label: Option<String>,
    pub color: Option<Rgba>,
}

/// A placed node holding children.
#[derive(Debug, Clone)]
pub struct Assembly<S> {
    pub label: Option<String>,
    pub placement: Placement,
    pub children: Vec<CadValue<S>>,
}

/// An object under construction. Exactly one of `part`, `sketch` and
/// `line` is expected; the first present one wins.
#[derive(Debug, Clone)]
pub struct Builder<S> {
    pub label: Option<String>,
    /// Current solid of a part builder
    pub part: Option<S>,
    /// Current faces of a sketch builder, placed
    pub sketch: Option<S>,
    /// Faces of a sketch builder in the sketch's own plane
    pub sketch_local: Option<S>,
    /// Current edges of a line builder
    pub line: Option<S>,
}

impl<S> Builder<S> {
    /// Name of the builder type.
    pub fn type_name(&self) -> &'static str {
        if self.part.is_some() {
            "BuildPart"
        } else if self.sketch.is_some() {
            "BuildSketch"
        } else if self.line.is_some() {
            "BuildLine"
        } else {
            "Builder"
        }
    }
}

/// A single kernel shape with optional metadata.
#[derive(Debug, Clone)]
pub struct CadShape<S> {
    pub shape: S,
    pub label: Option<String>,
    pub color: Option<Rgba>,
}

/// An element of a sketch selection.
#[derive(Debug, Clone)]
pub enum Selected<S> {
    Shape(S),
    Location(Placement),
}

/// A 2D sketch: categories of shapes plus the locations they are
/// instantiated at.
#[derive(Debug, Clone)]
pub struct Sketch<S> {
    pub label: Option<String>,
    pub faces: Vec<S>,
    pub edges: Vec<S>,
    pub wires: Vec<S>,
    pub selection: Vec<Selected<S>>,
    /// One location per element of each category
    pub locations: Vec<Placement>,
}

/// Something that defines a coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    Location(Placement),
    Plane {
        origin: DVec3,
        x_dir: DVec3,
        z_dir: DVec3,
    },
    Workplane {
        origin: DVec3,
        x_dir: DVec3,
        z_dir: DVec3,
    },
}

impl Frame {
    pub fn type_name(&self) -> &'static str {
        match self {
            Frame::Location(_) => "Location",
            Frame::Plane { .. } => "Plane",
            Frame::Workplane { .. } => "Workplane",
        }
    }

    /// Origin, x direction and z direction of the frame.
    pub fn coordinates(&self) -> (DVec3, DVec3, DVec3) {
        match self {
            Frame::Location(placement) => (placement.origin(), placement.x_dir(), placement.z_dir()),
            Frame::Plane {
                origin,
                x_dir,
                z_dir,
            }
            | Frame::Workplane {
                origin,
                x_dir,
                z_dir,
            } => (*origin, *x_dir, *z_dir),
        }
    }
}

/// An axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: Option<String>,
    pub origin: DVec3,
    pub direction: DVec3,
}

/// Any value handed to the converter.
#[derive(Debug, Clone)]
pub enum CadValue<S> {
    Scalar(ScalarValue),
    /// A value of a type the converter knows nothing about
    Unrecognized { type_name: String },
    List(Vec<CadValue<S>>),
    /// Insertion ordered key/value pairs
    Mapping(Vec<(String, CadValue<S>)>),
    Assembly(Assembly<S>),
    ShapeList(ShapeList<S>),
    Builder(Builder<S>),
    Shape(CadShape<S>),
    Sketch(Sketch<S>),
    Frame(Frame),
    Axis(Axis),
}

impl<S> CadValue<S> {
    /// A bare shape without label or color.
    pub fn shape(shape: S) -> Self {
        CadValue::Shape(CadShape {
            shape,
            label: None,
            color: None,
        })
    }

    /// Own label of the value, if it carries one.
    pub fn label(&self) -> Option<&str> {
        let label = match self {
            CadValue::Assembly(v) => &v.label,
            CadValue::ShapeList(v) => &v.label,
            CadValue::Builder(v) => &v.label,
            CadValue::Shape(v) => &v.label,
            CadValue::Sketch(v) => &v.label,
            CadValue::Axis(v) => &v.label,
            _ => return None,
        };
        label.as_deref().filter(|l| !l.is_empty())
    }

    /// Own declared color of the value, if it carries one.
    pub fn color(&self) -> Option<Rgba> {
        match self {
            CadValue::ShapeList(v) => v.color,
            CadValue::Shape(v) => v.color,
            _ => None,
        }
    }

    /// Sets the label of values that carry one; others are unchanged.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = Some(label.into());
        match &mut self {
            CadValue::Assembly(v) => v.label = label,
            CadValue::ShapeList(v) => v.label = label,
            CadValue::Builder(v) => v.label = label,
            CadValue::Shape(v) => v.label = label,
            CadValue::Sketch(v) => v.label = label,
            CadValue::Axis(v) => v.label = label,
            _ => {}
        }
        self
    }

    /// Sets the color of values that carry one; others are unchanged.
    pub fn with_color(mut self, color: Rgba) -> Self {
        match &mut self {
            CadValue::ShapeList(v) => v.color = Some(color),
            CadValue::Shape(v) => v.color = Some(color),
            _ => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let v: CadValue<u8> = CadValue::shape(1).with_label("x");
        assert_eq!(v.label(), Some("x"));
        let empty: CadValue<u8> = CadValue::shape(1).with_label("");
        assert_eq!(empty.label(), None);
        let list: CadValue<u8> = CadValue::List(Vec::new()).with_label("ignored");
        assert_eq!(list.label(), None);
    }

    #[test]
    fn test_colors() {
        let red = Rgba::from_rgb8([255, 0, 0]);
        let v: CadValue<u8> = CadValue::shape(1).with_color(red);
        assert_eq!(v.color(), Some(red));
        let frame: CadValue<u8> = CadValue::Frame(Frame::Location(Placement::IDENTITY)).with_color(red);
        assert_eq!(frame.color(), None);
    }

    #[test]
    fn test_frame_coordinates() {
        let frame = Frame::Location(Placement::from_translation(DVec3::new(1.0, 2.0, 3.0)));
        let (origin, x_dir, z_dir) = frame.coordinates();
        assert_eq!(origin, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(x_dir, DVec3::X);
        assert_eq!(z_dir, DVec3::Z);
        assert_eq!(frame.type_name(), "Location");
    }

    #[test]
    fn test_builder_type_names() {
        let builder: Builder<u8> = Builder {
            label: None,
            part: None,
            sketch: Some(1),
            sketch_local: None,
            line: None,
        };
        assert_eq!(builder.type_name(), "BuildSketch");
    }
}
