//! Tests for scene nodes, name uniquification and cleanup.

use super::*;
use glam::DQuat;

fn leaf(name: &str, loc: Option<Placement>) -> SceneNode<()> {
    SceneNode::Object(Object {
        name: name.to_string(),
        kind: Kind::Solid,
        geometry: Geometry::Instance {
            reference: 0,
            cache_id: ContentHash(vec![0]),
        },
        loc,
        color: Rgba::default(),
        width: None,
    })
}

fn group(name: &str, loc: Option<Placement>, children: Vec<SceneNode<()>>) -> Group<()> {
    Group {
        name: name.to_string(),
        loc,
        children,
    }
}

fn shift(x: f64) -> Placement {
    Placement::from_translation(DVec3::new(x, 0.0, 0.0))
}

// =============================================================================
// NAMES
// =============================================================================

#[test]
fn test_unique_names_are_distinct_and_ordered() {
    let input = ["Solid", "Solid", "Face", "Solid", "Face", "Solid_1"]
        .map(String::from)
        .to_vec();
    let out = make_unique(&input);

    let distinct = out.iter().collect::<HashSet<_>>();
    assert_eq!(distinct.len(), out.len());
    assert_eq!(out[0], "Solid");
    assert_eq!(out[2], "Face");
    assert_eq!(out[1], "Solid_2");
    assert_eq!(out[5], "Solid_1");
}

#[test]
fn test_unique_names_idempotent() {
    let mut g = group("g", None, vec![leaf("a", None), leaf("a", None), leaf("b", None)]);
    g.make_unique_names();
    let once = g.children.iter().map(|c| c.name().to_string()).collect::<Vec<_>>();
    g.make_unique_names();
    let twice = g.children.iter().map(|c| c.name().to_string()).collect::<Vec<_>>();
    assert_eq!(once, ["a", "a_1", "b"]);
    assert_eq!(once, twice);
}

// =============================================================================
// CLEANUP
// =============================================================================

#[test]
fn test_cleanup_collapses_group_chain() {
    let inner = group("inner", Some(shift(2.0)), vec![leaf("part", None), leaf("other", None)]);
    let middle = group("middle", Some(shift(1.0)), vec![SceneNode::Group(inner)]);
    let outer = group("outer", None, vec![SceneNode::Group(middle)]);

    let cleaned = outer.cleanup();
    assert_eq!(cleaned.name, "inner");
    assert_eq!(cleaned.len(), 2);
    assert_eq!(cleaned.loc, Some(shift(3.0)));
}

#[test]
fn test_cleanup_stops_at_objects() {
    let g = group("g", Some(shift(1.0)), vec![leaf("only", Some(shift(1.0)))]);
    let cleaned = g.cleanup();
    assert_eq!(cleaned.name, "g");
    assert_eq!(cleaned.children[0].loc(), Some(shift(1.0)));
}

#[test]
fn test_cleanup_idempotent() {
    let inner = group("inner", Some(shift(2.0)), vec![leaf("a", None), leaf("b", None)]);
    let outer = group("outer", Some(shift(5.0)), vec![SceneNode::Group(inner)]);
    let once = outer.cleanup();
    let twice = once.clone().cleanup();
    assert_eq!(once.name, twice.name);
    assert_eq!(once.loc, twice.loc);
    assert_eq!(once.len(), twice.len());
}

#[test]
fn test_compose_outer_order() {
    let rotate = Placement::from_rotation(DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2));
    let mut node = leaf("p", Some(shift(1.0)));
    node.compose_outer(Some(rotate));
    let origin = node.loc().unwrap().transform_point(DVec3::ZERO);
    assert!((origin - DVec3::Y).length() < 1e-12);
}

#[test]
fn test_compose_options() {
    assert_eq!(compose(None, None), None);
    assert_eq!(compose(Some(shift(1.0)), None), Some(shift(1.0)));
    assert_eq!(compose(None, Some(shift(2.0))), Some(shift(2.0)));
}

#[test]
fn test_kind_mapping() {
    assert_eq!(Kind::from_topo(TopoKind::Wire), Some(Kind::Edge));
    assert_eq!(Kind::from_topo(TopoKind::Shell), Some(Kind::Face));
    assert_eq!(Kind::from_topo(TopoKind::Compound), None);
    assert!(Kind::Solid.is_instanced());
    assert!(!Kind::Edge.is_instanced());
}

#[test]
fn test_leaf_count() {
    let inner = group("inner", None, vec![leaf("a", None), leaf("b", None)]);
    let root = SceneNode::Group(group("root", None, vec![SceneNode::Group(inner), leaf("c", None)]));
    assert_eq!(root.leaf_count(), 3);
    assert_eq!(root.as_group().unwrap().children[1].as_object().unwrap().reference(), Some(0));
}

#[test]
fn test_kinds_order_by_dimension() {
    let kinds = [Kind::Solid, Kind::Vertex, Kind::Face, Kind::Edge, Kind::Face]
        .into_iter()
        .collect::<std::collections::BTreeSet<_>>();
    assert_eq!(kinds.into_iter().collect::<Vec<_>>(), [Kind::Vertex, Kind::Edge, Kind::Face, Kind::Solid]);
}
