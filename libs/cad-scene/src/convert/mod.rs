//! # Conversion
//!
//! Turns a forest of [`CadValue`]s into a scene tree and an instance table.
//!
//! ## Dispatch Order
//!
//! Each value is classified once (see [`classify`](self::classify)) and the
//! first matching variant decides its handler:
//!
//! | # | Variant | Result |
//! |---|---------|--------|
//! | 1 | scalar | dropped silently |
//! | 2 | unrecognized | dropped, `SkippedValue` diagnostic |
//! | 3 | list | group of converted elements |
//! | 4 | mixed or unrolled compound | group of converted elements |
//! | 5 | mapping | group, keys become names |
//! | 6 | assembly | placed group |
//! | 7 | shape list | one leaf |
//! | 8 | builder | one leaf (or sketch + local sketch group) |
//! | 9 | shape | one leaf |
//! | 10 | sketch | group of re-placed elements |
//! | 11 | frame | coordinate system marker |
//! | 12 | axis | axis marker |
//!
//! Face and solid leaves are registered in the [`InstanceCache`]; edge and
//! vertex leaves carry their shapes inline.

mod assembly;
mod classify;
mod collections;
mod helpers;
mod shapes;
mod sketch;


use cad_kernel::{GeometryKernel, Placement};
use config::constants::{DEFAULT_HELPER_SCALE, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;

use crate::color::Rgba;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{SceneError, SceneResult};
use crate::input::CadValue;
use crate::instance::{Instance, InstanceCache};
use crate::node::{make_unique, Group, SceneNode};
use crate::progress::Progress;

use self::classify::{classify, Classified};

pub use self::classify::{compound_type, is_mixed_compound};

/// Name of the root group.
pub const ROOT_NAME: &str = "Group";

// =============================================================================
// OPTIONS
// =============================================================================

/// Per-call settings of [`Converter::convert`].
///
/// `names`, `colors` and `alphas`, when given, hold one entry per top
/// level value.
///
/// # Example
///
/// ```rust
/// use cad_scene::{ConvertOptions, Rgba};
///
/// let options = ConvertOptions::default()
///     .with_names(["base", "lid"])
///     .with_colors(vec![None, Rgba::named("red")])
///     .with_helper_scale(5.0);
/// assert_eq!(options.names.as_ref().map(Vec::len), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub names: Option<Vec<String>>,
    pub colors: Option<Vec<Option<Rgba>>>,
    pub alphas: Option<Vec<Option<f32>>>,
    /// Placement of the root group
    pub placement: Option<Placement>,
    /// Color of solids without an explicit or declared color
    pub default_color: Option<Rgba>,
    /// Size of coordinate system and axis markers
    pub helper_scale: f64,
    /// Convert every compound into a group, mixed or not
    pub unroll_compounds: bool,
    /// Show the unplaced copy of builder sketches
    pub show_sketch_local: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            names: None,
            colors: None,
            alphas: None,
            placement: None,
            default_color: None,
            helper_scale: DEFAULT_HELPER_SCALE,
            unroll_compounds: false,
            show_sketch_local: true,
        }
    }
}

impl ConvertOptions {
    pub fn with_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_colors(mut self, colors: Vec<Option<Rgba>>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_alphas(mut self, alphas: Vec<Option<f32>>) -> Self {
        self.alphas = Some(alphas);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn with_default_color(mut self, color: Rgba) -> Self {
        self.default_color = Some(color);
        self
    }

    pub fn with_helper_scale(mut self, scale: f64) -> Self {
        self.helper_scale = scale;
        self
    }

    pub fn with_unroll_compounds(mut self, unroll: bool) -> Self {
        self.unroll_compounds = unroll;
        self
    }

    pub fn with_sketch_local(mut self, show: bool) -> Self {
        self.show_sketch_local = show;
        self
    }

    /// Fails when a per-object list does not have one entry per object.
    pub fn check_arity(&self, count: usize) -> SceneResult<()> {
        let lengths = [
            ("names", self.names.as_ref().map(Vec::len)),
            ("colors", self.colors.as_ref().map(Vec::len)),
            ("alphas", self.alphas.as_ref().map(Vec::len)),
        ];
        for (argument, length) in lengths {
            if let Some(actual) = length {
                if actual != count {
                    return Err(SceneError::arity_mismatch(argument, count, actual));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// CONVERTER
// =============================================================================

/// Result of a conversion.
#[derive(Debug)]
pub struct Conversion<S> {
    /// Scene tree
    pub root: Group<S>,
    /// Unique face and solid geometry, indexed by leaf references
    pub instances: Vec<Instance<S>>,
    /// Recoverable conditions met on the way
    pub diagnostics: Diagnostics,
}

/// Context of one value being converted.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    /// Name given by the caller or the parent
    pub name: Option<String>,
    /// Explicit color, or the value's declared one
    pub color: Option<Rgba>,
    pub alpha: Option<f32>,
    pub helper_scale: f64,
    /// Nesting depth, for logging
    pub level: usize,
}

impl Slot {
    /// Slot of a nested value inheriting color, alpha and helper scale.
    pub fn child(&self, name: Option<String>) -> Slot {
        Slot {
            name,
            color: self.color,
            alpha: self.alpha,
            helper_scale: self.helper_scale,
            level: self.level + 1,
        }
    }

    /// Caller name, else the value's own label, else `default`.
    pub fn name_or(&self, label: Option<&str>, default: impl Into<String>) -> String {
        self.name
            .clone()
            .or_else(|| label.map(str::to_string))
            .unwrap_or_else(|| default.into())
    }

    fn trace(&self, handler: &str) {
        log::debug!(
            "{}{} ({})",
            "  ".repeat(self.level),
            handler,
            self.name.as_deref().unwrap_or("-")
        );
    }
}

/// Dispatch context: kernel, instance cache, diagnostics and settings.
///
/// The converter is single writer: the cache is scanned and appended
/// without locking, so one converter must not be shared across threads.
///
/// # Example
///
/// ```rust
/// use cad_kernel::{builders, GeometryKernel, Placement, PolyKernel};
/// use cad_scene::{CadValue, ConvertOptions, Converter};
/// use glam::DVec3;
///
/// let kernel = PolyKernel;
/// let part = builders::make_box(1.0, 1.0, 1.0);
/// let copy = kernel.moved(&part, &Placement::from_translation(DVec3::new(10.0, 0.0, 0.0)));
///
/// let conversion = Converter::new(&kernel)
///     .convert(&[CadValue::shape(part), CadValue::shape(copy)], &ConvertOptions::default())
///     .unwrap();
/// assert_eq!(conversion.instances.len(), 1);
/// assert_eq!(conversion.root.len(), 2);
/// ```
pub struct Converter<'k, K: GeometryKernel> {
    kernel: &'k K,
    cache: InstanceCache<K::Shape>,
    diagnostics: Diagnostics,
    progress: Option<&'k dyn Progress>,
    default_color: Rgba,
    unroll_compounds: bool,
    show_sketch_local: bool,
}

impl<'k, K: GeometryKernel> Converter<'k, K> {
    /// Creates a converter with an empty instance cache.
    pub fn new(kernel: &'k K) -> Self {
        Self {
            kernel,
            cache: InstanceCache::new(),
            diagnostics: Diagnostics::new(),
            progress: None,
            default_color: Rgba::default(),
            unroll_compounds: false,
            show_sketch_local: true,
        }
    }

    /// Reports cache hits to `progress`.
    pub fn with_progress(mut self, progress: &'k dyn Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Converts top level values into a scene tree.
    ///
    /// Argument lengths are validated before any value is looked at. The
    /// root group is named [`ROOT_NAME`] and placed at `options.placement`;
    /// when it would only wrap a single group, that group becomes the root.
    ///
    /// # Errors
    ///
    /// - [`SceneError::ArityMismatch`] for per-object lists of the wrong length
    /// - [`SceneError::ShapeClassification`] for values that cannot be typed
    /// - [`SceneError::UnsupportedCompound`] for shape lists mixing kinds
    pub fn convert(
        mut self,
        values: &[CadValue<K::Shape>],
        options: &ConvertOptions,
    ) -> SceneResult<Conversion<K::Shape>> {
        options.check_arity(values.len())?;
        self.default_color = options.default_color.unwrap_or_default();
        self.unroll_compounds = options.unroll_compounds;
        self.show_sketch_local = options.show_sketch_local;

        let names = options.names.as_deref().map(make_unique);
        let mut root = Group::new(ROOT_NAME, options.placement);

        for (index, value) in values.iter().enumerate() {
            let slot = Slot {
                name: names.as_ref().map(|n| n[index].clone()),
                color: options.colors.as_ref().and_then(|c| c[index]),
                alpha: options.alphas.as_ref().and_then(|a| a[index]),
                helper_scale: options.helper_scale,
                level: 0,
            };
            if let Some(node) = self.convert_value(value, slot)? {
                root.add(node);
            }
        }

        root.make_unique_names();
        let root = root.cleanup();
        log::debug!(
            "converted {} values into {} instances",
            values.len(),
            self.cache.len()
        );

        Ok(Conversion {
            root,
            instances: self.cache.into_instances(),
            diagnostics: self.diagnostics,
        })
    }

    /// Converts one value. `None` means the value was dropped.
    pub(crate) fn convert_value(
        &mut self,
        value: &CadValue<K::Shape>,
        mut slot: Slot,
    ) -> SceneResult<Option<SceneNode<K::Shape>>> {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            slot.color = slot.color.or_else(|| value.color());

            match classify(self.kernel, value, self.unroll_compounds) {
                Classified::Skip(scalar) => {
                    log::trace!("skipping scalar {scalar:?}");
                    Ok(None)
                }
                Classified::Unrecognized(type_name) => {
                    let message = match &slot.name {
                        Some(name) => format!("Skipping object '{name}' of type {type_name}"),
                        None => format!("Skipping object of type {type_name}"),
                    };
                    self.diagnostics
                        .push(Diagnostic::skipped_value(message, slot.name.clone()));
                    Ok(None)
                }
                Classified::List(items) => self
                    .handle_list(items, &slot)
                    .map(|g| Some(SceneNode::Group(g))),
                Classified::Compound(shape) => self
                    .handle_compound(shape, &slot)
                    .map(|g| Some(SceneNode::Group(g))),
                Classified::Mapping(entries) => self
                    .handle_mapping(entries, &slot)
                    .map(|g| Some(SceneNode::Group(g))),
                Classified::Assembly(assembly) => self
                    .handle_assembly(assembly, &slot)
                    .map(|g| Some(SceneNode::Group(g))),
                Classified::ShapeList(list) => self.handle_shape_list(list, &slot),
                Classified::Builder(builder) => self.handle_builder(builder, &slot).map(Some),
                Classified::Shape(shape) => self
                    .handle_shape(shape, &slot)
                    .map(|o| Some(SceneNode::Object(o))),
                Classified::Sketch(sketch) => self
                    .handle_sketch(sketch, &slot)
                    .map(|g| Some(SceneNode::Group(g))),
                Classified::Frame(frame) => {
                    Ok(Some(SceneNode::Object(self.handle_frame(frame, &slot))))
                }
                Classified::Axis(axis) => Ok(Some(SceneNode::Object(self.handle_axis(axis, &slot)))),
            }
        })
    }

    /// Default name of a value when its parent gives it none.
    pub(crate) fn type_name(&self, value: &CadValue<K::Shape>) -> String {
        match value {
            CadValue::Scalar(_) => "Scalar".to_string(),
            CadValue::Unrecognized { type_name } => type_name.clone(),
            CadValue::List(_) => "List".to_string(),
            CadValue::Mapping(_) => "Dict".to_string(),
            CadValue::Assembly(_) => "Assembly".to_string(),
            CadValue::ShapeList(list) => list.origin.type_name().to_string(),
            CadValue::Builder(builder) => builder.type_name().to_string(),
            CadValue::Shape(shape) => self.kernel.topo_kind(&shape.shape).type_name().to_string(),
            CadValue::Sketch(_) => "Sketch".to_string(),
            CadValue::Frame(frame) => frame.type_name().to_string(),
            CadValue::Axis(_) => "Axis".to_string(),
        }
    }
}

/// Collapses single group chains of a converted child.
pub(crate) fn cleaned<S>(node: SceneNode<S>) -> SceneNode<S> {
    match node {
        SceneNode::Group(group) => SceneNode::Group(group.cleanup()),
        object => object,
    }
}

/// Converts values with a fresh [`Converter`].
pub fn convert<K: GeometryKernel>(
    kernel: &K,
    values: &[CadValue<K::Shape>],
    options: &ConvertOptions,
) -> SceneResult<Conversion<K::Shape>> {
    Converter::new(kernel).convert(values, options)
}
