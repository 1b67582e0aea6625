//! # Instance Cache
//!
//! Deduplicates geometry that appears at several placements so each
//! distinct shape is meshed once.
//!
//! ## Algorithm
//!
//! 1. Remove the shape's placement (canonical form)
//! 2. Hash the canonical form
//! 3. Compare against every entry of that hash with the kernel's equality,
//!    so colliding hashes never merge distinct geometry
//! 4. Reuse the matching entry or append a new one

use std::collections::HashMap;

use cad_kernel::{ContentHash, GeometryKernel, Placement};

/// Index into the instance table.
pub type ObjectRef = usize;

/// One entry of the instance table.
#[derive(Debug, Clone)]
pub struct Instance<S> {
    /// Geometry in its own local frame
    pub shape: S,
    /// Content hash of `shape`
    pub hash: ContentHash,
}

/// Outcome of [`InstanceCache::intern`].
#[derive(Debug, Clone, PartialEq)]
pub struct Interned {
    /// Instance table index
    pub reference: ObjectRef,
    /// Whether the entry was appended by this call
    pub is_new: bool,
    /// The placement that was removed from the shape
    pub placement: Placement,
}

/// Append-only table of unique, placement-free geometry.
///
/// Single writer: `intern` scans and appends without synchronization.
///
/// # Example
///
/// ```rust
/// use cad_kernel::{builders, GeometryKernel, Placement, PolyKernel};
/// use cad_scene::InstanceCache;
/// use glam::DVec3;
///
/// let kernel = PolyKernel;
/// let part = builders::make_box(1.0, 1.0, 1.0);
/// let copy = kernel.moved(&part, &Placement::from_translation(DVec3::X));
///
/// let mut cache = InstanceCache::new();
/// let first = cache.intern(&kernel, &part);
/// let second = cache.intern(&kernel, &copy);
/// assert_eq!(first.reference, second.reference);
/// assert!(!second.is_new);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug)]
pub struct InstanceCache<S> {
    instances: Vec<Instance<S>>,
    by_hash: HashMap<ContentHash, Vec<ObjectRef>>,
}

impl<S> Default for InstanceCache<S> {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
            by_hash: HashMap::new(),
        }
    }
}

impl<S: Clone> InstanceCache<S> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a shape, returning the entry of its canonical form.
    pub fn intern<K>(&mut self, kernel: &K, shape: &S) -> Interned
    where
        K: GeometryKernel<Shape = S>,
    {
        let placement = kernel.location(shape);
        let canonical = kernel.moved(shape, &placement.inverse());
        let hash = kernel.content_hash(&canonical);

        let existing = self.by_hash.get(&hash).and_then(|candidates| {
            candidates
                .iter()
                .copied()
                .find(|&index| kernel.is_same(&self.instances[index].shape, &canonical))
        });

        if let Some(reference) = existing {
            return Interned {
                reference,
                is_new: false,
                placement,
            };
        }

        let reference = self.instances.len();
        self.by_hash.entry(hash.clone()).or_default().push(reference);
        self.instances.push(Instance {
            shape: canonical,
            hash,
        });
        Interned {
            reference,
            is_new: true,
            placement,
        }
    }

    /// Number of unique instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Entry at `reference`.
    pub fn get(&self, reference: ObjectRef) -> Option<&Instance<S>> {
        self.instances.get(reference)
    }

    /// The table, in registration order.
    pub fn instances(&self) -> &[Instance<S>] {
        &self.instances
    }

    /// Freezes the cache into its table.
    pub fn into_instances(self) -> Vec<Instance<S>> {
        self.instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cad_kernel::builders::{make_box, make_polygon_face};
    use cad_kernel::PolyKernel;
    use glam::{DQuat, DVec3};

    #[test]
    fn test_distinct_geometry_gets_distinct_refs() {
        let kernel = PolyKernel;
        let mut cache = InstanceCache::new();
        let a = cache.intern(&kernel, &make_box(1.0, 1.0, 1.0));
        let b = cache.intern(&kernel, &make_box(2.0, 1.0, 1.0));
        assert_ne!(a.reference, b.reference);
        assert!(a.is_new && b.is_new);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_placement_is_returned_and_removed() {
        let kernel = PolyKernel;
        let placement = Placement::new(DVec3::new(0.0, 4.0, 0.0), DQuat::from_rotation_x(1.0));
        let face = kernel.moved(&make_polygon_face(&[DVec3::ZERO, DVec3::X, DVec3::Y]), &placement);

        let mut cache = InstanceCache::new();
        let interned = cache.intern(&kernel, &face);
        assert!(interned.placement.abs_diff_eq(&placement, 1e-12));

        let stored = &cache.get(interned.reference).unwrap().shape;
        assert_eq!(kernel.location(stored), Placement::IDENTITY);
    }

    #[test]
    fn test_rotated_copies_share_entry() {
        let kernel = PolyKernel;
        let part = make_box(1.0, 2.0, 3.0);
        let mut cache = InstanceCache::new();
        for i in 0..5 {
            let p = Placement::new(
                DVec3::new(i as f64, 0.0, 0.0),
                DQuat::from_rotation_z(i as f64 * 0.3),
            );
            cache.intern(&kernel, &kernel.moved(&part, &p));
        }
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.into_instances().len(), 1);
    }
}
