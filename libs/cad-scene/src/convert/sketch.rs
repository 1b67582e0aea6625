//! 2D sketches.

use cad_kernel::{GeometryKernel, Placement};
use config::constants::SKETCH_HELPER_DIVISOR;

use crate::bounds::BoundingBox;
use crate::error::SceneResult;
use crate::input::{CadValue, Frame, Selected, Sketch};
use crate::node::Group;

use super::{Converter, Slot};

impl<K: GeometryKernel> Converter<'_, K> {
    /// Flattens a sketch into a group of its placed elements.
    ///
    /// Faces, edges, wires and the selection are each paired with the
    /// sketch's locations and moved there. A selection of locations is
    /// kept as is and shown as coordinate system markers, sized from the
    /// extent of the sketch's shapes.
    pub(crate) fn handle_sketch(
        &mut self,
        sketch: &Sketch<K::Shape>,
        slot: &Slot,
    ) -> SceneResult<Group<K::Shape>> {
        slot.trace("sketch");

        let mut shapes = Vec::new();
        for category in [&sketch.faces, &sketch.edges, &sketch.wires] {
            shapes.extend(
                category
                    .iter()
                    .zip(&sketch.locations)
                    .map(|(shape, location)| self.kernel.moved(shape, location)),
            );
        }

        let mut frames = Vec::new();
        match sketch.selection.first() {
            Some(Selected::Location(_)) => {
                for selected in &sketch.selection {
                    match selected {
                        Selected::Location(placement) => frames.push(*placement),
                        Selected::Shape(shape) => shapes.push(shape.clone()),
                    }
                }
            }
            Some(Selected::Shape(_)) => {
                for (selected, location) in sketch.selection.iter().zip(&sketch.locations) {
                    match selected {
                        Selected::Shape(shape) => shapes.push(self.kernel.moved(shape, location)),
                        Selected::Location(placement) => frames.push(*placement),
                    }
                }
            }
            None => {}
        }

        let helper_scale = self.sketch_helper_scale(&shapes).unwrap_or(slot.helper_scale);
        let values = shapes
            .into_iter()
            .map(CadValue::shape)
            .chain(frames.into_iter().map(|p: Placement| CadValue::Frame(Frame::Location(p))))
            .collect::<Vec<_>>();

        let list_slot = Slot {
            name: Some(slot.name_or(sketch.label.as_deref(), "Sketch")),
            helper_scale,
            ..slot.clone()
        };
        self.handle_list(&values, &list_slot)
    }

    /// Marker size derived from the largest extent of `shapes`.
    fn sketch_helper_scale(&self, shapes: &[K::Shape]) -> Option<f64> {
        if shapes.is_empty() {
            return None;
        }
        let compound = self.kernel.make_compound(shapes);
        let bb = BoundingBox::from_geometry(self.kernel, &compound, None, true, &self.diagnostics);
        let size = bb.sizes().into_iter().fold(0.0, f64::max);
        (size > 0.0).then_some(size / SKETCH_HELPER_DIVISOR)
    }
}
