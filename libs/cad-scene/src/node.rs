//! # Scene Nodes
//!
//! The output tree of the conversion pass: [`Group`] nodes holding ordered
//! children, and [`Object`] leaves referencing geometry.
//!
//! ## Invariants
//!
//! - Sibling names are unique after [`Group::make_unique_names`]
//! - Only face and solid leaves reference the instance table
//! - After [`Group::cleanup`] the root never holds a single group child

use std::collections::HashSet;

use cad_kernel::{ContentHash, Placement, TopoKind};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::instance::ObjectRef;

/// Renderable classification of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Vertex,
    Edge,
    Face,
    Solid,
}

impl Kind {
    /// Renderable kind of a topological kind. Wires render as edges,
    /// shells as faces; compounds have no kind of their own.
    pub fn from_topo(kind: TopoKind) -> Option<Kind> {
        match kind {
            TopoKind::Vertex => Some(Kind::Vertex),
            TopoKind::Edge | TopoKind::Wire => Some(Kind::Edge),
            TopoKind::Face | TopoKind::Shell => Some(Kind::Face),
            TopoKind::Solid => Some(Kind::Solid),
            TopoKind::Compound => None,
        }
    }

    /// Whether leaves of this kind go through the instance cache.
    pub fn is_instanced(self) -> bool {
        matches!(self, Kind::Face | Kind::Solid)
    }
}

/// Coordinate helpers drawn as small axis triads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marker {
    /// A coordinate frame
    CoordSystem {
        origin: DVec3,
        x_dir: DVec3,
        z_dir: DVec3,
        size: f64,
    },
    /// A single axis
    CoordAxis { origin: DVec3, dir: DVec3, size: f64 },
}

/// Geometry carried by a leaf.
#[derive(Debug, Clone)]
pub enum Geometry<S> {
    /// Reference into the instance table
    Instance {
        reference: ObjectRef,
        /// Content hash of the shape before its placement was removed
        cache_id: ContentHash,
    },
    /// Edges or vertices, never deduplicated
    Inline(Vec<S>),
    /// A helper marker
    Marker(Marker),
}

/// A leaf of the scene tree.
#[derive(Debug, Clone)]
pub struct Object<S> {
    pub name: String,
    pub kind: Kind,
    pub geometry: Geometry<S>,
    pub loc: Option<Placement>,
    pub color: Rgba,
    /// Stroke width of edges, point size of vertices
    pub width: Option<f64>,
}

impl<S> Object<S> {
    /// Instance table reference, if any.
    pub fn reference(&self) -> Option<ObjectRef> {
        match &self.geometry {
            Geometry::Instance { reference, .. } => Some(*reference),
            _ => None,
        }
    }
}

/// An inner node of the scene tree.
#[derive(Debug, Clone)]
pub struct Group<S> {
    pub name: String,
    pub loc: Option<Placement>,
    pub children: Vec<SceneNode<S>>,
}

/// A node of the scene tree.
#[derive(Debug, Clone)]
pub enum SceneNode<S> {
    Group(Group<S>),
    Object(Object<S>),
}

impl<S> SceneNode<S> {
    pub fn name(&self) -> &str {
        match self {
            SceneNode::Group(group) => &group.name,
            SceneNode::Object(object) => &object.name,
        }
    }

    pub fn set_name(&mut self, name: String) {
        match self {
            SceneNode::Group(group) => group.name = name,
            SceneNode::Object(object) => object.name = name,
        }
    }

    pub fn loc(&self) -> Option<Placement> {
        match self {
            SceneNode::Group(group) => group.loc,
            SceneNode::Object(object) => object.loc,
        }
    }

    pub fn set_loc(&mut self, loc: Option<Placement>) {
        match self {
            SceneNode::Group(group) => group.loc = loc,
            SceneNode::Object(object) => object.loc = loc,
        }
    }

    /// Places the node inside a parent frame: `loc = outer * loc`.
    pub fn compose_outer(&mut self, outer: Option<Placement>) {
        let composed = compose(outer, self.loc());
        self.set_loc(composed);
    }

    pub fn as_group(&self) -> Option<&Group<S>> {
        match self {
            SceneNode::Group(group) => Some(group),
            SceneNode::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object<S>> {
        match self {
            SceneNode::Object(object) => Some(object),
            SceneNode::Group(_) => None,
        }
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            SceneNode::Group(group) => group.children.iter().map(SceneNode::leaf_count).sum(),
            SceneNode::Object(_) => 1,
        }
    }
}

/// Composes two optional placements, `None` meaning identity.
pub fn compose(outer: Option<Placement>, inner: Option<Placement>) -> Option<Placement> {
    match (outer, inner) {
        (Some(outer), Some(inner)) => Some(outer * inner),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

impl<S> Group<S> {
    /// Creates an empty group.
    pub fn new(name: impl Into<String>, loc: Option<Placement>) -> Self {
        Self {
            name: name.into(),
            loc,
            children: Vec::new(),
        }
    }

    /// Appends a child.
    pub fn add(&mut self, node: SceneNode<S>) {
        self.children.push(node);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Suffixes repeated child names with `_1`, `_2`, ... in encounter
    /// order. First occurrences keep their name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cad_scene::Group;
    ///
    /// let mut group: Group<()> = Group::new("root", None);
    /// for name in ["a", "b", "a", "a"] {
    ///     group.add(cad_scene::SceneNode::Group(Group::new(name, None)));
    /// }
    /// group.make_unique_names();
    /// let names: Vec<_> = group.children.iter().map(|c| c.name()).collect();
    /// assert_eq!(names, ["a", "b", "a_1", "a_2"]);
    /// ```
    pub fn make_unique_names(&mut self) -> &mut Self {
        let names = self
            .children
            .iter()
            .map(|child| child.name().to_string())
            .collect::<Vec<_>>();
        for (child, name) in self.children.iter_mut().zip(make_unique(&names)) {
            child.set_name(name);
        }
        self
    }

    /// Collapses a chain of single group children into the innermost group,
    /// composing every discarded placement into the survivor.
    pub fn cleanup(mut self) -> Self {
        while self.children.len() == 1 && matches!(self.children[0], SceneNode::Group(_)) {
            let outer = self.loc;
            match self.children.pop() {
                Some(SceneNode::Group(mut inner)) => {
                    inner.loc = compose(outer, inner.loc);
                    self = inner;
                }
                Some(node) => {
                    self.children.push(node);
                    break;
                }
                None => break,
            }
        }
        self
    }
}

/// Makes a list of names unique, keeping first occurrences unchanged.
///
/// Suffixes skip names that are already taken, so `["a", "a_1", "a"]`
/// becomes `["a", "a_1", "a_2"]`.
pub fn make_unique(names: &[String]) -> Vec<String> {
    let mut taken = names.iter().cloned().collect::<HashSet<_>>();
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name.clone();
            }
            let mut suffix = 1;
            loop {
                let candidate = format!("{name}_{suffix}");
                if taken.insert(candidate.clone()) {
                    seen.insert(candidate.clone());
                    return candidate;
                }
                suffix += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
