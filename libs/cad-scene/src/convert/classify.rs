//! Ordered classification of input values.

use std::collections::BTreeSet;

use cad_kernel::{GeometryKernel, TopoKind};

use crate::error::{SceneError, SceneResult};
use crate::input::{Assembly, Axis, Builder, CadShape, CadValue, Frame, ScalarValue, ShapeList, Sketch};
use crate::node::Kind;

/// Handler selected for a value, borrowing its payload.
#[derive(Debug)]
pub(crate) enum Classified<'a, S> {
    Skip(&'a ScalarValue),
    Unrecognized(&'a str),
    List(&'a [CadValue<S>]),
    /// A shape that is a mixed (or forcibly unrolled) compound
    Compound(&'a CadShape<S>),
    Mapping(&'a [(String, CadValue<S>)]),
    Assembly(&'a Assembly<S>),
    ShapeList(&'a ShapeList<S>),
    Builder(&'a Builder<S>),
    Shape(&'a CadShape<S>),
    Sketch(&'a Sketch<S>),
    Frame(&'a Frame),
    Axis(&'a Axis),
}

/// Picks the handler of a value. Compounds are only split into groups
/// when they are mixed or `unroll` is set; otherwise they are shapes.
pub(crate) fn classify<'a, K: GeometryKernel>(
    kernel: &K,
    value: &'a CadValue<K::Shape>,
    unroll: bool,
) -> Classified<'a, K::Shape> {
    match value {
        CadValue::Scalar(scalar) => Classified::Skip(scalar),
        CadValue::Unrecognized { type_name } => Classified::Unrecognized(type_name),
        CadValue::List(items) => Classified::List(items),
        CadValue::Shape(shape)
            if kernel.topo_kind(&shape.shape) == TopoKind::Compound
                && (unroll || is_mixed_compound(kernel, &shape.shape)) =>
        {
            Classified::Compound(shape)
        }
        CadValue::Mapping(entries) => Classified::Mapping(entries),
        CadValue::Assembly(assembly) => Classified::Assembly(assembly),
        CadValue::ShapeList(list) => Classified::ShapeList(list),
        CadValue::Builder(builder) => Classified::Builder(builder),
        CadValue::Shape(shape) => Classified::Shape(shape),
        CadValue::Sketch(sketch) => Classified::Sketch(sketch),
        CadValue::Frame(frame) => Classified::Frame(frame),
        CadValue::Axis(axis) => Classified::Axis(axis),
    }
}

/// Renderable kind of a compound element; nested compounds are typed by
/// their content.
fn element_kind<K: GeometryKernel>(kernel: &K, shape: &K::Shape) -> Option<Kind> {
    match kernel.topo_kind(shape) {
        TopoKind::Compound => compound_type(kernel, shape).ok().and_then(Kind::from_topo),
        kind => Kind::from_topo(kind),
    }
}

/// Whether the direct elements of a compound reduce to more than one
/// renderable kind.
///
/// # Example
///
/// ```rust
/// use cad_kernel::{builders, PolyKernel};
/// use cad_scene::convert::is_mixed_compound;
/// use glam::DVec3;
///
/// let kernel = PolyKernel;
/// let solid = builders::make_box(1.0, 1.0, 1.0);
/// let edge = builders::make_line(DVec3::ZERO, DVec3::X);
///
/// assert!(is_mixed_compound(&kernel, &builders::make_compound(vec![solid.clone(), edge])));
/// assert!(!is_mixed_compound(&kernel, &builders::make_compound(vec![solid.clone(), solid])));
/// ```
pub fn is_mixed_compound<K: GeometryKernel>(kernel: &K, shape: &K::Shape) -> bool {
    let kinds = kernel
        .explode(shape)
        .iter()
        .filter_map(|element| element_kind(kernel, element))
        .collect::<BTreeSet<_>>();
    kinds.len() > 1
}

/// Topological type of a compound: the first non-empty of solids, faces,
/// wires, edges and vertices among its sub-shapes.
///
/// # Errors
///
/// [`SceneError::ShapeClassification`] when the compound holds nothing.
pub fn compound_type<K: GeometryKernel>(kernel: &K, shape: &K::Shape) -> SceneResult<TopoKind> {
    [
        TopoKind::Solid,
        TopoKind::Face,
        TopoKind::Wire,
        TopoKind::Edge,
        TopoKind::Vertex,
    ]
    .into_iter()
    .find(|&kind| !kernel.sub_shapes(shape, kind).is_empty())
    .ok_or_else(|| SceneError::classification("Compound (empty)", None))
}
