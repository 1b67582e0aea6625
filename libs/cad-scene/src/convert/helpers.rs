//! Leaf construction shared by the shape handlers.

use cad_kernel::{GeometryKernel, TopoKind};
use config::constants::{LINE_WIDTH, POINT_SIZE};

use crate::color::Rgba;
use crate::node::{Geometry, Kind, Object};
use crate::progress::CACHE_HIT;

use super::{Converter, Slot};

/// Shapes reduced by [`Converter::unify`].
enum Unified<S> {
    Single(S),
    Many(Vec<S>),
}

impl<K: GeometryKernel> Converter<'_, K> {
    /// Resolved color of a leaf: slot color, else the kind's default, with
    /// the slot's alpha applied on top.
    pub(crate) fn leaf_color(&self, kind: Kind, slot: &Slot) -> Rgba {
        let color = slot
            .color
            .unwrap_or_else(|| Rgba::for_kind(kind, self.default_color));
        match slot.alpha {
            Some(alpha) => color.with_alpha(alpha),
            None => color,
        }
    }

    /// Reduces shapes of one kind to a single leaf.
    ///
    /// - One compound is exploded; a single element replaces it, and edge
    ///   or vertex elements stay a list
    /// - Several faces or solids are merged into one compound
    /// - Several edges or vertices stay a list
    ///
    /// Faces and solids are registered in the instance cache and the leaf
    /// takes their placement. Edges and vertices stay inline in world
    /// placement.
    pub(crate) fn unify(
        &mut self,
        mut shapes: Vec<K::Shape>,
        kind: Kind,
        name: String,
        slot: &Slot,
    ) -> Object<K::Shape> {
        let cache_id = match shapes.as_slice() {
            [single] => self.kernel.content_hash(single),
            many => self.kernel.content_hash(&self.kernel.make_compound(many)),
        };

        let unified = if shapes.len() == 1 {
            let shape = shapes.remove(0);
            if self.kernel.topo_kind(&shape) == TopoKind::Compound {
                let mut elements = self.kernel.explode(&shape);
                if elements.len() == 1 {
                    Unified::Single(elements.remove(0))
                } else if kind.is_instanced() {
                    Unified::Single(shape)
                } else {
                    Unified::Many(elements)
                }
            } else {
                Unified::Single(shape)
            }
        } else if kind.is_instanced() {
            Unified::Single(self.kernel.make_compound(&shapes))
        } else {
            Unified::Many(shapes)
        };

        let color = self.leaf_color(kind, slot);

        if kind.is_instanced() {
            let shape = match unified {
                Unified::Single(shape) => shape,
                Unified::Many(shapes) => self.kernel.make_compound(&shapes),
            };
            let interned = self.cache.intern(self.kernel, &shape);
            if !interned.is_new {
                log::trace!("instance {} reused for '{name}'", interned.reference);
                if let Some(progress) = self.progress {
                    progress.update(CACHE_HIT);
                }
            }
            Object {
                name,
                kind,
                geometry: Geometry::Instance {
                    reference: interned.reference,
                    cache_id,
                },
                loc: Some(interned.placement),
                color,
                width: None,
            }
        } else {
            let shapes = match unified {
                Unified::Single(shape) => vec![shape],
                Unified::Many(shapes) => shapes,
            };
            Object {
                name,
                kind,
                geometry: Geometry::Inline(shapes),
                loc: None,
                color,
                width: Some(if kind == Kind::Edge { LINE_WIDTH } else { POINT_SIZE }),
            }
        }
    }
}
