//! # Tessellation Orchestrator
//!
//! Meshes every instance once and folds the placed bounding boxes of all
//! leaves into one scene volume.
//!
//! ## Phases
//!
//! 1. Per instance: fast box, quality from the box, mesh (optionally on a
//!    bounded rayon pool, results kept in instance order)
//! 2. Per leaf, depth first: the leaf's placed box from its mesh positions
//!    (or its geometry), merged into the scene volume
//!
//! Inline edge and vertex leaves are discretized during phase 2 with their
//! own quality.

use std::time::Instant;

use cad_kernel::{EdgeMesh, GeometryKernel, MeshRequest, Placement, ShapeMesh, TopoKind};
use config::constants::{compute_quality, EDGE_DEFLECTION_DIVISOR, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use config::tessellation::TessellationConfig;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use stacker::maybe_grow;

use crate::bounds::BoundingBox;
use crate::diagnostics::Diagnostics;
use crate::error::{SceneError, SceneResult};
use crate::instance::Instance;
use crate::node::{Geometry, Group, Kind, Object, SceneNode};
use crate::progress::{Progress, TESSELLATED};

// =============================================================================
// TYPES
// =============================================================================

/// Discretized payload of an inline leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InlineMesh {
    /// Polylines of edge leaves
    Edges(EdgeMesh),
    /// Flat `[x, y, z, ...]` positions of vertex leaves
    Vertices(Vec<f32>),
}

/// Output of [`tessellate_all`].
#[derive(Debug, Clone)]
pub struct Tessellation {
    /// One mesh per instance, in instance order
    pub meshes: Vec<ShapeMesh>,
    /// Inline payloads with their leaf paths, in depth first leaf order
    pub inline: Vec<(String, InlineMesh)>,
    /// Union of all placed leaf boxes; `None` for a scene without geometry
    pub bounds: Option<BoundingBox>,
}

/// Path of a child below `parent`.
pub fn child_path(parent: &str, name: &str) -> String {
    format!("{parent}/{name}")
}

// =============================================================================
// INSTANCES
// =============================================================================

/// Meshes instances and computes the scene volume.
///
/// # Arguments
///
/// * `kernel` - Kernel doing the geometric work
/// * `root` - Converted scene tree
/// * `instances` - Instance table of the conversion
/// * `config` - Deviation, tolerances and worker bound
/// * `diagnostics` - Receives void geometry warnings
/// * `progress` - Optional observer, one mark per meshed instance
///
/// # Errors
///
/// [`SceneError::MeshComputation`] with the index of the first instance
/// whose meshing failed; [`SceneError::Kernel`] for inline payloads.
///
/// # Example
///
/// ```rust
/// use cad_kernel::{builders, PolyKernel};
/// use cad_scene::{convert, tessellate_all, CadValue, ConvertOptions};
/// use config::tessellation::TessellationConfig;
///
/// let kernel = PolyKernel;
/// let values = [CadValue::shape(builders::make_box(2.0, 1.0, 1.0))];
/// let conversion = convert(&kernel, &values, &ConvertOptions::default()).unwrap();
/// let result = tessellate_all(
///     &kernel,
///     &conversion.root,
///     &conversion.instances,
///     &TessellationConfig::default(),
///     &conversion.diagnostics,
///     None,
/// )
/// .unwrap();
/// assert_eq!(result.meshes.len(), 1);
/// assert_eq!(result.bounds.unwrap().sizes(), [2.0, 1.0, 1.0]);
/// ```
pub fn tessellate_all<K: GeometryKernel>(
    kernel: &K,
    root: &Group<K::Shape>,
    instances: &[Instance<K::Shape>],
    config: &TessellationConfig,
    diagnostics: &Diagnostics,
    progress: Option<&dyn Progress>,
) -> SceneResult<Tessellation> {
    let mesh_one = |(index, instance): (usize, &Instance<K::Shape>)| {
        mesh_instance(kernel, index, instance, config, diagnostics, progress)
    };

    let results: Vec<SceneResult<ShapeMesh>> = match config.max_workers {
        Some(workers) if instances.len() > 1 => match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| instances.par_iter().enumerate().map(mesh_one).collect()),
            Err(err) => {
                log::warn!("worker pool unavailable ({err}), tessellating sequentially");
                instances.iter().enumerate().map(mesh_one).collect()
            }
        },
        _ => instances.iter().enumerate().map(mesh_one).collect(),
    };
    let meshes = results.into_iter().collect::<SceneResult<Vec<_>>>()?;

    let mut fold = BoundsFold {
        kernel,
        config,
        diagnostics,
        instances,
        meshes: &meshes,
        inline: Vec::new(),
    };
    let bounds = fold.group(root, &child_path("", &root.name), Placement::IDENTITY)?;
    let inline = fold.inline;

    Ok(Tessellation {
        meshes,
        inline,
        bounds,
    })
}

fn mesh_instance<K: GeometryKernel>(
    kernel: &K,
    index: usize,
    instance: &Instance<K::Shape>,
    config: &TessellationConfig,
    diagnostics: &Diagnostics,
    progress: Option<&dyn Progress>,
) -> SceneResult<ShapeMesh> {
    let start = Instant::now();
    // Location is irrelevant for the quality estimate
    let bb = BoundingBox::from_geometry(kernel, &instance.shape, None, false, diagnostics);
    let quality = compute_quality(bb.sizes(), config.deviation);
    log::debug!("instance({index}) compute quality: {:?} ({quality})", start.elapsed());

    let request = MeshRequest {
        cache_key: instance.hash.clone(),
        deflection: quality,
        edge_deflection: config
            .edge_accuracy
            .unwrap_or(quality / EDGE_DEFLECTION_DIVISOR),
        angular_tolerance: config.angular_tolerance,
        compute_edges: config.render_edges,
    };

    let start = Instant::now();
    let mesh = kernel
        .mesh(&instance.shape, &request)
        .map_err(|source| SceneError::MeshComputation { index, source })?;
    log::debug!(
        "instance({index}) tessellate: {:?} (quality {quality:.4}, angular tolerance {:.2})",
        start.elapsed(),
        config.angular_tolerance
    );

    if let Some(progress) = progress {
        progress.update(TESSELLATED);
    }
    Ok(mesh)
}

// =============================================================================
// BOUNDS
// =============================================================================

/// Depth first fold of placed leaf boxes.
struct BoundsFold<'a, K: GeometryKernel> {
    kernel: &'a K,
    config: &'a TessellationConfig,
    diagnostics: &'a Diagnostics,
    instances: &'a [Instance<K::Shape>],
    meshes: &'a [ShapeMesh],
    inline: Vec<(String, InlineMesh)>,
}

impl<K: GeometryKernel> BoundsFold<'_, K> {
    fn group(
        &mut self,
        group: &Group<K::Shape>,
        path: &str,
        parent: Placement,
    ) -> SceneResult<Option<BoundingBox>> {
        let world = group.loc.map_or(parent, |loc| parent * loc);
        let mut bounds: Option<BoundingBox> = None;
        for child in &group.children {
            let id = child_path(path, child.name());
            let bb = maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match child {
                SceneNode::Group(inner) => self.group(inner, &id, world),
                SceneNode::Object(object) => self.object(object, &id, world),
            })?;
            if let Some(bb) = bb {
                bounds = Some(match bounds {
                    Some(acc) => acc.union(&bb),
                    None => bb,
                });
            }
        }
        Ok(bounds)
    }

    fn object(
        &mut self,
        object: &Object<K::Shape>,
        path: &str,
        parent: Placement,
    ) -> SceneResult<Option<BoundingBox>> {
        match &object.geometry {
            Geometry::Instance { reference, .. } => {
                let world = object.loc.map_or(parent, |loc| parent * loc);
                let placed = self
                    .meshes
                    .get(*reference)
                    .and_then(|mesh| BoundingBox::from_points(mesh.positions().map(|p| world.transform_point(p))));
                let bb = match placed {
                    Some(bb) => bb,
                    None => match self.instances.get(*reference) {
                        Some(instance) => BoundingBox::from_geometry(
                            self.kernel,
                            &instance.shape,
                            Some(&world),
                            true,
                            self.diagnostics,
                        ),
                        None => return Ok(None),
                    },
                };
                Ok(Some(bb))
            }
            Geometry::Inline(shapes) => self.inline(object.kind, shapes, path, parent).map(Some),
            Geometry::Marker(_) => Ok(None),
        }
    }

    /// Discretizes an inline leaf and returns its placed box.
    fn inline(
        &mut self,
        kind: Kind,
        shapes: &[K::Shape],
        path: &str,
        parent: Placement,
    ) -> SceneResult<BoundingBox> {
        let compound = self.kernel.make_compound(shapes);
        let mesh = match kind {
            Kind::Vertex => {
                let vertices = self.kernel.sub_shapes(&compound, TopoKind::Vertex);
                let points = self.kernel.vertex_points(&vertices)?;
                InlineMesh::Vertices(
                    points
                        .iter()
                        .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
                        .collect(),
                )
            }
            _ => {
                let start = Instant::now();
                let bb = BoundingBox::from_geometry(self.kernel, &compound, None, true, self.diagnostics);
                let quality = compute_quality(bb.sizes(), self.config.deviation);
                let deflection = self
                    .config
                    .edge_accuracy
                    .unwrap_or(quality / EDGE_DEFLECTION_DIVISOR);
                let edges = self.kernel.sub_shapes(&compound, TopoKind::Edge);
                let mesh = self.kernel.discretize_edges(&edges, deflection)?;
                log::debug!("{path} discretize: {:?} (deflection {deflection})", start.elapsed());
                InlineMesh::Edges(mesh)
            }
        };
        self.inline.push((path.to_string(), mesh));

        Ok(BoundingBox::from_geometry(
            self.kernel,
            &compound,
            Some(&parent),
            true,
            self.diagnostics,
        ))
    }
}
