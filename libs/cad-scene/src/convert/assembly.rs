//! Placed assemblies.

use cad_kernel::GeometryKernel;

use crate::error::SceneResult;
use crate::input::Assembly;
use crate::node::{Group, SceneNode};

use super::{Converter, Slot};

impl<K: GeometryKernel> Converter<'_, K> {
    /// Converts an assembly into a group at the assembly's placement.
    ///
    /// Children are named by their own label, made unique among siblings,
    /// and do not inherit color or alpha. A child that converts into a group with a single member is
    /// replaced by that member, with the dropped group's placement
    /// composed into it.
    pub(crate) fn handle_assembly(
        &mut self,
        assembly: &Assembly<K::Shape>,
        slot: &Slot,
    ) -> SceneResult<Group<K::Shape>> {
        slot.trace("assembly");
        let name = slot.name_or(assembly.label.as_deref(), "Assembly");
        let mut group = Group::new(name, Some(assembly.placement));

        for child in &assembly.children {
            let child_slot = Slot {
                name: child.label().map(str::to_string),
                color: None,
                alpha: None,
                helper_scale: slot.helper_scale,
                level: slot.level + 1,
            };
            let Some(node) = self.convert_value(child, child_slot)? else {
                continue;
            };
            group.add(collapse_single(node));
        }
        group.make_unique_names();
        Ok(group)
    }
}

/// Replaces a group holding exactly one node by that node.
fn collapse_single<S>(node: SceneNode<S>) -> SceneNode<S> {
    match node {
        SceneNode::Group(mut group) if group.children.len() == 1 => match group.children.pop() {
            Some(mut only) => {
                only.compose_outer(group.loc);
                only
            }
            None => SceneNode::Group(group),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cad_kernel::Placement;
    use glam::DVec3;

    #[test]
    fn test_collapse_single_composes_placement() {
        let mut group: Group<()> = Group::new("wrapper", Some(Placement::from_translation(DVec3::X)));
        group.add(SceneNode::Group(Group::new(
            "inner",
            Some(Placement::from_translation(DVec3::Y)),
        )));

        let node = collapse_single(SceneNode::Group(group));
        assert_eq!(node.name(), "inner");
        let origin = node.loc().unwrap().transform_point(DVec3::ZERO);
        assert!((origin - DVec3::new(1.0, 1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_collapse_keeps_larger_groups() {
        let mut group: Group<()> = Group::new("pair", None);
        group.add(SceneNode::Group(Group::new("a", None)));
        group.add(SceneNode::Group(Group::new("b", None)));
        assert_eq!(collapse_single(SceneNode::Group(group)).name(), "pair");
    }
}
