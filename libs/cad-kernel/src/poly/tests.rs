//! Tests for the polyhedral reference kernel.

use super::builders::*;
use super::*;
use approx::assert_relative_eq;
use glam::DQuat;

fn request(deflection: f64, compute_edges: bool) -> MeshRequest {
    MeshRequest {
        cache_key: ContentHash(Vec::new()),
        deflection,
        edge_deflection: deflection / 100.0,
        angular_tolerance: 0.2,
        compute_edges,
    }
}

// =============================================================================
// TOPOLOGY
// =============================================================================

#[test]
fn test_box_topology() {
    let kernel = PolyKernel;
    let cube = make_box(2.0, 3.0, 4.0);
    assert_eq!(kernel.topo_kind(&cube), TopoKind::Solid);
    assert_eq!(kernel.sub_shapes(&cube, TopoKind::Face).len(), 6);
    assert_eq!(kernel.sub_shapes(&cube, TopoKind::Edge).len(), 12);
    assert_eq!(kernel.sub_shapes(&cube, TopoKind::Vertex).len(), 8);
    assert_eq!(kernel.sub_shapes(&cube, TopoKind::Wire).len(), 6);
    assert!(kernel.sub_shapes(&cube, TopoKind::Compound).is_empty());
}

#[test]
fn test_shape_kind_rejects_compound() {
    let kernel = PolyKernel;
    let compound = make_compound(vec![make_box(1.0, 1.0, 1.0)]);
    assert!(matches!(
        kernel.shape_kind(&compound),
        Err(KernelError::UnknownShapeKind { .. })
    ));
    assert_eq!(kernel.shape_kind(&make_box(1.0, 1.0, 1.0)), Ok(TopoKind::Solid));
}

#[test]
fn test_explode_carries_compound_location() {
    let kernel = PolyKernel;
    let shift = Placement::from_translation(DVec3::new(5.0, 0.0, 0.0));
    let compound = make_compound(vec![make_box(1.0, 1.0, 1.0), make_vertex(DVec3::ZERO)]).moved(&shift);

    let parts = kernel.explode(&compound);
    assert_eq!(parts.len(), 2);
    assert_eq!(kernel.location(&parts[0]), shift);
    assert_eq!(kernel.vertex_points(&parts[1..]).unwrap(), vec![DVec3::new(5.0, 0.0, 0.0)]);
}

// =============================================================================
// PLACEMENT
// =============================================================================

#[test]
fn test_normalization_snaps_to_identity() {
    let kernel = PolyKernel;
    let placement = Placement::new(
        DVec3::new(3.0, -1.0, 2.0),
        DQuat::from_rotation_y(0.4),
    );
    let placed = kernel.moved(&make_box(1.0, 1.0, 1.0), &placement);
    let loc = kernel.location(&placed);
    let canonical = kernel.moved(&placed, &loc.inverse());
    assert_eq!(kernel.location(&canonical), Placement::IDENTITY);
}

#[test]
fn test_re_place_round_trip_keeps_bounds() {
    let kernel = PolyKernel;
    let placement = Placement::new(DVec3::new(1.0, 2.0, 3.0), DQuat::from_rotation_z(0.3));
    let shape = kernel.moved(&make_box(1.0, 2.0, 3.0), &placement);
    let back = kernel.moved(&kernel.moved(&shape, &placement.inverse()), &placement);

    let a = kernel.bounding_box(&shape, None, true).unwrap();
    let b = kernel.bounding_box(&back, None, true).unwrap();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-9);
    }
}

#[test]
fn test_identical_geometry_is_same_regardless_of_arc() {
    let kernel = PolyKernel;
    let a = make_box(1.0, 1.0, 1.0);
    let b = make_box(1.0, 1.0, 1.0);
    assert!(kernel.is_same(&a, &b));
    assert!(!kernel.is_same(&a, &make_box(1.0, 1.0, 2.0)));
    let moved = kernel.moved(&a, &Placement::from_translation(DVec3::X));
    assert!(!kernel.is_same(&a, &moved));
}

// =============================================================================
// BOUNDING BOXES
// =============================================================================

#[test]
fn test_box_bounds() {
    let kernel = PolyKernel;
    let cube = make_box(2.0, 3.0, 4.0);
    assert_eq!(kernel.bounding_box(&cube, None, true), Some([0.0, 2.0, 0.0, 3.0, 0.0, 4.0]));

    let fast = kernel.bounding_box(&cube, None, false).unwrap();
    assert!(fast[0] < 0.0 && fast[1] > 2.0);

    let shift = Placement::from_translation(DVec3::new(10.0, 0.0, 0.0));
    let placed = kernel.bounding_box(&cube, Some(&shift), true).unwrap();
    assert_eq!(placed[0], 10.0);
    assert_eq!(placed[1], 12.0);
}

#[test]
fn test_disk_bounds() {
    let kernel = PolyKernel;
    let disk = make_disk(DVec3::ZERO, 2.0, DVec3::Z);
    let exact = kernel.bounding_box(&disk, None, true).unwrap();
    assert_relative_eq!(exact[0], -2.0, epsilon = 1e-4);
    assert_relative_eq!(exact[3], 2.0, epsilon = 1e-4);
    assert_relative_eq!(exact[4], 0.0, epsilon = 1e-12);
    assert_relative_eq!(exact[5], 0.0, epsilon = 1e-12);

    let fast = kernel.bounding_box(&disk, None, false).unwrap();
    assert!(fast[0] <= -2.0 && fast[1] >= 2.0);
}

#[test]
fn test_empty_compound_has_no_box() {
    let kernel = PolyKernel;
    let empty = make_compound(Vec::new());
    assert_eq!(kernel.bounding_box(&empty, None, false), None);
    assert_eq!(kernel.center_of_mass(&empty), DVec3::ZERO);
}

// =============================================================================
// HASHING
// =============================================================================

#[test]
fn test_hash_is_deterministic() {
    let kernel = PolyKernel;
    let a = kernel.content_hash(&make_box(1.0, 2.0, 3.0));
    let b = kernel.content_hash(&make_box(1.0, 2.0, 3.0));
    let c = kernel.content_hash(&make_box(1.0, 2.0, 3.5));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.0.len(), 8);
}

// =============================================================================
// MESHING
// =============================================================================

#[test]
fn test_box_mesh() {
    let kernel = PolyKernel;
    let mesh = kernel
        .mesh(&make_box(1.0, 1.0, 1.0), &request(0.01, true))
        .unwrap();
    assert_eq!(mesh.face_count(), 6);
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.obj_vertices.len(), 8 * 3);
    let edges = mesh.edges.unwrap();
    assert_eq!(edges.edge_count(), 12);
    assert_eq!(edges.segments_per_edge, vec![1; 12]);
}

#[test]
fn test_mesh_without_edges() {
    let kernel = PolyKernel;
    let mesh = kernel
        .mesh(&make_box(1.0, 1.0, 1.0), &request(0.01, false))
        .unwrap();
    assert!(mesh.edges.is_none());
}

#[test]
fn test_box_face_normals_point_outward() {
    let kernel = PolyKernel;
    let mesh = kernel
        .mesh(&make_box(1.0, 1.0, 1.0), &request(0.01, false))
        .unwrap();
    let center = DVec3::splat(0.5);
    for (p, n) in mesh.vertices.chunks_exact(3).zip(mesh.normals.chunks_exact(3)) {
        let p = DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64);
        let n = DVec3::new(n[0] as f64, n[1] as f64, n[2] as f64);
        assert!((p - center).dot(n) > 0.0);
    }
}

#[test]
fn test_degenerate_face() {
    let kernel = PolyKernel;
    let line = make_polygon_face(&[DVec3::ZERO, DVec3::X, DVec3::new(2.0, 0.0, 0.0)]);
    let result = kernel.mesh(&line, &request(0.1, false));
    assert!(matches!(result, Err(KernelError::DegenerateFace(_))));
}

#[test]
fn test_coarser_deflection_gives_fewer_segments() {
    let kernel = PolyKernel;
    let circle = make_circle(DVec3::ZERO, 10.0, DVec3::Z);
    let fine = kernel.discretize_edges(&[circle.clone()], 0.01).unwrap();
    let coarse = kernel.discretize_edges(&[circle], 1.0).unwrap();
    assert!(coarse.segments_per_edge[0] < fine.segments_per_edge[0]);
}

#[test]
fn test_discretize_rejects_faces() {
    let kernel = PolyKernel;
    let face = make_polygon_face(&[DVec3::ZERO, DVec3::X, DVec3::Y]);
    assert!(matches!(
        kernel.discretize_edges(&[face], 0.1),
        Err(KernelError::UnexpectedShape { expected: TopoKind::Edge, .. })
    ));
}
