//! End to end scenarios: convert, tessellate and describe with the
//! polyhedral kernel.

use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_relative_eq;
use cad_kernel::builders::{make_box, make_polygon_face};
use cad_kernel::{
    BoxExtents, ContentHash, EdgeMesh, GeometryKernel, KernelResult, MeshRequest, Placement, PolyKernel, Shape,
    ShapeMesh, TopoKind,
};
use cad_scene::{
    convert, render_scene, tessellate_all, Assembly, CadValue, ConvertOptions, DiagnosticKind, SceneError,
    SceneNode,
};
use config::tessellation::TessellationConfig;
use glam::{DQuat, DVec3};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Polyhedral kernel with a constant content hash and a mesh counter.
#[derive(Default)]
struct CollidingKernel {
    meshed: AtomicUsize,
}

impl GeometryKernel for CollidingKernel {
    type Shape = Shape;

    fn topo_kind(&self, shape: &Shape) -> TopoKind {
        PolyKernel.topo_kind(shape)
    }

    fn explode(&self, shape: &Shape) -> Vec<Shape> {
        PolyKernel.explode(shape)
    }

    fn sub_shapes(&self, shape: &Shape, kind: TopoKind) -> Vec<Shape> {
        PolyKernel.sub_shapes(shape, kind)
    }

    fn make_compound(&self, shapes: &[Shape]) -> Shape {
        PolyKernel.make_compound(shapes)
    }

    fn bounding_box(&self, shape: &Shape, placement: Option<&Placement>, exact: bool) -> Option<BoxExtents> {
        PolyKernel.bounding_box(shape, placement, exact)
    }

    fn center_of_mass(&self, shape: &Shape) -> DVec3 {
        PolyKernel.center_of_mass(shape)
    }

    fn location(&self, shape: &Shape) -> Placement {
        PolyKernel.location(shape)
    }

    fn moved(&self, shape: &Shape, placement: &Placement) -> Shape {
        PolyKernel.moved(shape, placement)
    }

    fn is_same(&self, a: &Shape, b: &Shape) -> bool {
        PolyKernel.is_same(a, b)
    }

    fn content_hash(&self, _shape: &Shape) -> ContentHash {
        ContentHash(vec![0; 8])
    }

    fn mesh(&self, shape: &Shape, request: &MeshRequest) -> KernelResult<ShapeMesh> {
        self.meshed.fetch_add(1, Ordering::SeqCst);
        PolyKernel.mesh(shape, request)
    }

    fn discretize_edges(&self, edges: &[Shape], deflection: f64) -> KernelResult<EdgeMesh> {
        PolyKernel.discretize_edges(edges, deflection)
    }

    fn vertex_points(&self, vertices: &[Shape]) -> KernelResult<Vec<DVec3>> {
        PolyKernel.vertex_points(vertices)
    }
}

fn shift(x: f64, y: f64, z: f64) -> Placement {
    Placement::from_translation(DVec3::new(x, y, z))
}

#[test]
fn test_repeated_part_is_meshed_once() {
    init_logging();
    let kernel = CollidingKernel::default();
    let part = make_box(1.0, 1.0, 1.0);
    let values = [
        CadValue::shape(part.clone()),
        CadValue::shape(kernel.moved(&part, &shift(10.0, 0.0, 0.0))),
    ];

    let scene = render_scene(&kernel, &values, &ConvertOptions::default(), &TessellationConfig::default()).unwrap();

    assert_eq!(scene.instances.len(), 1);
    assert_eq!(kernel.meshed.load(Ordering::SeqCst), 1);
    let bb = scene.bb.unwrap();
    assert_relative_eq!(bb.xmin, 0.0);
    assert_relative_eq!(bb.xmax, 11.0);
}

#[test]
fn test_colliding_hashes_keep_distinct_geometry() {
    init_logging();
    let kernel = CollidingKernel::default();
    let values = [
        CadValue::shape(make_box(1.0, 1.0, 1.0)),
        CadValue::shape(make_box(2.0, 2.0, 2.0)),
        CadValue::shape(make_box(1.0, 1.0, 1.0)),
    ];

    let conversion = convert(&kernel, &values, &ConvertOptions::default()).unwrap();
    let refs = conversion
        .root
        .children
        .iter()
        .map(|c| c.as_object().and_then(|o| o.reference()))
        .collect::<Vec<_>>();
    assert_eq!(refs, [Some(0), Some(1), Some(0)]);
    assert_eq!(conversion.instances.len(), 2);
}

#[test]
fn test_arity_error_precedes_any_meshing() {
    init_logging();
    let kernel = CollidingKernel::default();
    let values = [CadValue::shape(make_box(1.0, 1.0, 1.0))];
    let options = ConvertOptions::default().with_names(["a", "b"]);

    let err = render_scene(&kernel, &values, &options, &TessellationConfig::default()).unwrap_err();
    assert!(matches!(err, SceneError::ArityMismatch { .. }));
    assert_eq!(kernel.meshed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_nested_assembly_world_placement() {
    init_logging();
    let kernel = PolyKernel;
    let a = Placement::new(DVec3::new(5.0, 0.0, 0.0), DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2));
    let b = shift(0.0, 2.0, 0.0);
    let p = shift(0.0, 0.0, 3.0);

    let part = kernel.moved(&make_box(1.0, 1.0, 1.0), &p);
    let inner = CadValue::Assembly(Assembly {
        label: Some("inner".to_string()),
        placement: b,
        children: vec![CadValue::shape(part).with_label("part")],
    });
    let outer = CadValue::Assembly(Assembly {
        label: Some("outer".to_string()),
        placement: a,
        children: vec![inner, CadValue::shape(make_box(1.0, 1.0, 1.0)).with_label("base")],
    });

    let conversion = convert(&kernel, &[outer], &ConvertOptions::default()).unwrap();
    let root = &conversion.root;
    let leaf = match &root.children[0] {
        SceneNode::Object(object) => object,
        SceneNode::Group(group) => panic!("expected the collapsed leaf, got group {}", group.name),
    };

    let world = root.loc.unwrap() * leaf.loc.unwrap();
    assert!(world.abs_diff_eq(&(a * b * p), 1e-12));
}

#[test]
fn test_unrecognized_values_are_reported() {
    init_logging();
    let values = [
        CadValue::Unrecognized {
            type_name: "Sphere".to_string(),
        },
        CadValue::shape(make_polygon_face(&[DVec3::ZERO, DVec3::X, DVec3::Y])),
    ];

    let scene = render_scene(&PolyKernel, &values, &ConvertOptions::default(), &TessellationConfig::default()).unwrap();
    assert_eq!(scene.parts.len(), 1);
    assert_eq!(scene.diagnostics.len(), 1);
    assert_eq!(scene.diagnostics[0].kind, DiagnosticKind::SkippedValue);
}

#[test]
fn test_parallel_pass_is_deterministic() {
    init_logging();
    let kernel = PolyKernel;
    let values = (1..=8)
        .map(|i| CadValue::shape(make_box(i as f64, 1.0, 0.5)))
        .collect::<Vec<_>>();
    let conversion = convert(&kernel, &values, &ConvertOptions::default()).unwrap();
    let config = TessellationConfig::default().with_max_workers(4).unwrap();

    let first = tessellate_all(&kernel, &conversion.root, &conversion.instances, &config, &conversion.diagnostics, None)
        .unwrap();
    let second = tessellate_all(
        &kernel,
        &conversion.root,
        &conversion.instances,
        &TessellationConfig::default(),
        &conversion.diagnostics,
        None,
    )
    .unwrap();

    assert_eq!(first.meshes, second.meshes);
    assert_relative_eq!(first.bounds.unwrap().xmax, 8.0);
}
