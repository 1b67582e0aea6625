//! Shape lists, builders, bare shapes and helper markers.

use std::collections::BTreeSet;

use cad_kernel::{GeometryKernel, TopoKind};
use config::constants::{LINE_WIDTH, SKETCH_LOCAL_ALPHA};

use crate::color::Rgba;
use crate::diagnostics::Diagnostic;
use crate::error::{SceneError, SceneResult};
use crate::input::{Axis, Builder, CadShape, Frame, ShapeList, ShapeListOrigin};
use crate::node::{Geometry, Group, Kind, Marker, Object, SceneNode};

use super::{compound_type, Converter, Slot};

impl<K: GeometryKernel> Converter<'_, K> {
    /// Converts a homogeneous shape list into one leaf.
    ///
    /// Workplane results have their compounds flattened first. Lists of
    /// wires are converted into their edges. An empty list is dropped.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnsupportedCompound`] when the items are of different
    /// renderable kinds.
    pub(crate) fn handle_shape_list(
        &mut self,
        list: &ShapeList<K::Shape>,
        slot: &Slot,
    ) -> SceneResult<Option<SceneNode<K::Shape>>> {
        slot.trace(list.origin.type_name());

        let items = match list.origin {
            ShapeListOrigin::Workplane => list
                .items
                .iter()
                .flat_map(|item| self.kernel.explode(item))
                .collect::<Vec<_>>(),
            ShapeListOrigin::ShapeList => list.items.clone(),
        };

        let Some(first) = items.first() else {
            let name = slot.name_or(list.label.as_deref(), list.origin.type_name());
            self.diagnostics.push(Diagnostic::skipped_value(
                format!("Skipping empty {} '{name}'", list.origin.type_name()),
                Some(name),
            ));
            return Ok(None);
        };

        let (typ, shapes) = if self.kernel.topo_kind(first) == TopoKind::Wire {
            let edges = items
                .iter()
                .flat_map(|wire| self.kernel.sub_shapes(wire, TopoKind::Edge))
                .collect();
            (TopoKind::Wire, edges)
        } else {
            (self.list_kind(&items, slot)?, items)
        };

        let name = slot.name_or(
            list.label.as_deref(),
            format!("{}({})", list.origin.type_name(), typ),
        );
        let kind = renderable(typ, slot)?;
        Ok(Some(SceneNode::Object(self.unify(shapes, kind, name, slot))))
    }

    /// Common topological kind of list items.
    fn list_kind(&self, items: &[K::Shape], slot: &Slot) -> SceneResult<TopoKind> {
        let kinds = items
            .iter()
            .map(|item| {
                self.kernel
                    .shape_kind(item)
                    .map_err(|_| SceneError::classification("Compound", slot.name.as_deref()))
            })
            .collect::<SceneResult<BTreeSet<_>>>()?;

        let renderable_kinds = kinds
            .iter()
            .filter_map(|&kind| Kind::from_topo(kind))
            .collect::<BTreeSet<_>>();
        if renderable_kinds.len() > 1 {
            let names = kinds.iter().map(|k| k.type_name()).collect::<Vec<_>>();
            return Err(SceneError::unsupported_compound(
                slot.name.clone().unwrap_or_else(|| "ShapeList".to_string()),
                names.join(", "),
            ));
        }
        kinds
            .into_iter()
            .next()
            .ok_or_else(|| SceneError::classification("ShapeList", slot.name.as_deref()))
    }

    /// Converts the current object of a builder.
    ///
    /// Part builders yield their solid, sketch builders their only face (or
    /// the whole sketch), line builders their edges. With sketch local
    /// display enabled, a sketch builder yields a group of the placed
    /// `sketch` and a translucent `sketch_local`.
    pub(crate) fn handle_builder(
        &mut self,
        builder: &Builder<K::Shape>,
        slot: &Slot,
    ) -> SceneResult<SceneNode<K::Shape>> {
        slot.trace(builder.type_name());

        let (typ, shapes) = if let Some(part) = &builder.part {
            (TopoKind::Solid, vec![part.clone()])
        } else if let Some(sketch) = &builder.sketch {
            (TopoKind::Face, self.sketch_faces(sketch))
        } else if let Some(line) = &builder.line {
            (TopoKind::Edge, self.kernel.sub_shapes(line, TopoKind::Edge))
        } else {
            return Err(SceneError::classification(
                builder.type_name(),
                slot.name.as_deref(),
            ));
        };

        let name = slot.name_or(builder.label.as_deref(), typ.type_name());
        let kind = renderable(typ, slot)?;
        let mut object = self.unify(shapes, kind, name.clone(), slot);

        let local = match (&builder.part, &builder.sketch, &builder.sketch_local) {
            (None, Some(_), Some(local)) if self.show_sketch_local => local,
            _ => return Ok(SceneNode::Object(object)),
        };

        object.name = "sketch".to_string();
        let mut group = Group::new(name, None);
        group.add(SceneNode::Object(object));

        let local_slot = Slot {
            alpha: Some(SKETCH_LOCAL_ALPHA),
            ..slot.clone()
        };
        let local_faces = self.sketch_faces(local);
        let local_object = self.unify(local_faces, Kind::Face, "sketch_local".to_string(), &local_slot);
        group.add(SceneNode::Object(local_object));
        Ok(SceneNode::Group(group))
    }

    /// The only face of a sketch, else the sketch itself.
    fn sketch_faces(&self, sketch: &K::Shape) -> Vec<K::Shape> {
        let mut faces = self.kernel.sub_shapes(sketch, TopoKind::Face);
        if faces.len() == 1 {
            faces
        } else {
            faces.clear();
            faces.push(sketch.clone());
            faces
        }
    }

    /// Converts a single shape into one leaf.
    ///
    /// Wires, and compounds whose content is wires, are converted into
    /// their edges.
    pub(crate) fn handle_shape(
        &mut self,
        shape: &CadShape<K::Shape>,
        slot: &Slot,
    ) -> SceneResult<Object<K::Shape>> {
        let topo = self.kernel.topo_kind(&shape.shape);
        slot.trace(topo.type_name());

        let (typ, shapes) = match topo {
            TopoKind::Wire => (
                TopoKind::Wire,
                self.kernel.sub_shapes(&shape.shape, TopoKind::Edge),
            ),
            TopoKind::Compound => match compound_type(self.kernel, &shape.shape)? {
                TopoKind::Wire => (
                    TopoKind::Wire,
                    self.kernel.sub_shapes(&shape.shape, TopoKind::Edge),
                ),
                typ => (typ, vec![shape.shape.clone()]),
            },
            typ => (typ, vec![shape.shape.clone()]),
        };

        let name = slot.name_or(shape.label.as_deref(), typ.type_name());
        let kind = renderable(typ, slot)?;
        Ok(self.unify(shapes, kind, name, slot))
    }

    /// Coordinate system marker of a frame.
    pub(crate) fn handle_frame(&self, frame: &Frame, slot: &Slot) -> Object<K::Shape> {
        slot.trace(frame.type_name());
        let (origin, x_dir, z_dir) = frame.coordinates();
        self.marker(
            slot.name_or(None, frame.type_name()),
            Marker::CoordSystem {
                origin,
                x_dir,
                z_dir,
                size: slot.helper_scale,
            },
        )
    }

    /// Axis marker.
    pub(crate) fn handle_axis(&self, axis: &Axis, slot: &Slot) -> Object<K::Shape> {
        slot.trace("axis");
        self.marker(
            slot.name_or(axis.label.as_deref(), "Axis"),
            Marker::CoordAxis {
                origin: axis.origin,
                dir: axis.direction,
                size: slot.helper_scale,
            },
        )
    }

    fn marker(&self, name: String, marker: Marker) -> Object<K::Shape> {
        Object {
            name,
            kind: Kind::Edge,
            geometry: Geometry::Marker(marker),
            loc: None,
            color: Rgba::for_kind(Kind::Edge, self.default_color),
            width: Some(LINE_WIDTH),
        }
    }
}

fn renderable(typ: TopoKind, slot: &Slot) -> SceneResult<Kind> {
    Kind::from_topo(typ).ok_or_else(|| SceneError::classification(typ.type_name(), slot.name.as_deref()))
}
