//! Lists, unrolled compounds and mappings.

use cad_kernel::GeometryKernel;

use crate::error::SceneResult;
use crate::input::{CadShape, CadValue};
use crate::node::Group;

use super::{cleaned, Converter, Slot};

impl<K: GeometryKernel> Converter<'_, K> {
    /// Converts every element into a child of a new group.
    ///
    /// Elements take the slot name of the list, else their type name, and
    /// are made unique afterwards; color and alpha of the slot pass down.
    pub(crate) fn handle_list(
        &mut self,
        items: &[CadValue<K::Shape>],
        slot: &Slot,
    ) -> SceneResult<Group<K::Shape>> {
        slot.trace("list");
        let mut group = Group::new(slot.name_or(None, "List"), None);
        for item in items {
            let name = slot.name.clone().unwrap_or_else(|| self.type_name(item));
            if let Some(node) = self.convert_value(item, slot.child(Some(name)))? {
                group.add(cleaned(node));
            }
        }
        group.make_unique_names();
        Ok(group.cleanup())
    }

    /// Splits a compound into one child per direct element.
    pub(crate) fn handle_compound(
        &mut self,
        compound: &CadShape<K::Shape>,
        slot: &Slot,
    ) -> SceneResult<Group<K::Shape>> {
        slot.trace("compound");
        let mut group = Group::new(slot.name_or(compound.label.as_deref(), "Compound"), None);
        for element in self.kernel.explode(&compound.shape) {
            let element = CadValue::shape(element);
            if let Some(node) = self.convert_value(&element, slot.child(None))? {
                group.add(cleaned(node));
            }
        }
        group.make_unique_names();
        Ok(group)
    }

    /// Converts every entry into a child named by its key.
    pub(crate) fn handle_mapping(
        &mut self,
        entries: &[(String, CadValue<K::Shape>)],
        slot: &Slot,
    ) -> SceneResult<Group<K::Shape>> {
        slot.trace("mapping");
        let mut group = Group::new(slot.name_or(None, "Dict"), None);
        for (key, value) in entries {
            if let Some(node) = self.convert_value(value, slot.child(Some(key.clone())))? {
                group.add(cleaned(node));
            }
        }
        group.make_unique_names();
        Ok(group)
    }
}
