//! # Scene Description
//!
//! Serializable rendering of a converted and tessellated scene.
//!
//! ## Layout
//!
//! ```text
//! { version, name, id, loc, parts: [...], instances: [...], bb }
//!
//! group        { type: "group", name, id, loc, parts }
//! shapes       { type: "shapes", name, id, kind, loc, color, width, shape }
//! coordsystem  { type: "coordsystem", name, id, origin, x_dir, z_dir, size, color, width }
//! coordaxis    { type: "coordaxis", name, id, origin, dir, size, color, width }
//! ```
//!
//! `shape` is `{ "ref": n }` for instanced leaves and the discretized
//! payload for inline leaves. Ids are `/` separated paths of sibling
//! unique names.

use std::collections::BTreeMap;

use cad_kernel::{Placement, ShapeMesh};
use config::constants::SCENE_FORMAT_VERSION;
use glam::DVec3;
use serde::Serialize;

use crate::bounds::BoundsRecord;
use crate::diagnostics::Diagnostic;
use crate::error::{SceneError, SceneResult};
use crate::node::{Geometry, Group, Kind, Marker, Object, SceneNode};
use crate::tessellate::{child_path, InlineMesh, Tessellation};

/// Translation and `[x, y, z, w]` rotation of a placement.
pub type LocRecord = ([f64; 3], [f64; 4]);

/// Face and edge visibility of a leaf as shown by a viewer tree.
pub type ViewState = [u8; 2];

/// Leaf shown with faces and edges.
pub const STATE_SHAPE: ViewState = [1, 1];
/// Leaf without faces.
pub const STATE_LINES: ViewState = [3, 1];

fn loc_record(loc: Option<Placement>) -> Option<LocRecord> {
    loc.map(|p| p.to_tq())
}

/// Geometry of a `shapes` record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ShapePayload {
    Ref {
        #[serde(rename = "ref")]
        reference: usize,
    },
    Inline(InlineMesh),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRecord {
    pub name: String,
    pub id: String,
    pub loc: Option<LocRecord>,
    pub parts: Vec<PartRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeRecord {
    pub name: String,
    pub id: String,
    pub kind: Kind,
    pub loc: Option<LocRecord>,
    pub color: [f32; 4],
    pub width: Option<f64>,
    /// Content digest of an instanced leaf, hex encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_id: Option<String>,
    pub shape: ShapePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordSystemRecord {
    pub name: String,
    pub id: String,
    pub origin: DVec3,
    pub x_dir: DVec3,
    pub z_dir: DVec3,
    pub size: f64,
    pub color: [f32; 4],
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordAxisRecord {
    pub name: String,
    pub id: String,
    pub origin: DVec3,
    pub dir: DVec3,
    pub size: f64,
    pub color: [f32; 4],
    pub width: Option<f64>,
}

/// A node of the description tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PartRecord {
    Group(GroupRecord),
    Shapes(ShapeRecord),
    CoordSystem(CoordSystemRecord),
    CoordAxis(CoordAxisRecord),
}

impl PartRecord {
    pub fn id(&self) -> &str {
        match self {
            PartRecord::Group(r) => &r.id,
            PartRecord::Shapes(r) => &r.id,
            PartRecord::CoordSystem(r) => &r.id,
            PartRecord::CoordAxis(r) => &r.id,
        }
    }
}

/// The complete scene as handed to a viewer.
///
/// # Example
///
/// ```rust
/// use cad_kernel::{builders, PolyKernel};
/// use cad_scene::{render_scene, CadValue, ConvertOptions};
/// use config::tessellation::TessellationConfig;
///
/// let values = [CadValue::shape(builders::make_box(1.0, 1.0, 1.0)).with_label("cube")];
/// let scene = render_scene(&PolyKernel, &values, &ConvertOptions::default(), &TessellationConfig::default())
///     .unwrap();
///
/// assert_eq!(scene.states()["/Group/cube"], [1, 1]);
/// let json = scene.to_json().unwrap();
/// assert!(json.contains(r#""type":"shapes""#));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDescription {
    pub version: u32,
    pub name: String,
    pub id: String,
    pub loc: Option<LocRecord>,
    pub parts: Vec<PartRecord>,
    pub instances: Vec<ShapeMesh>,
    pub bb: Option<BoundsRecord>,
    /// Recoverable conditions met while building the scene
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl SceneDescription {
    /// Builds the description of a tessellated scene tree.
    ///
    /// # Errors
    ///
    /// [`SceneError::MissingInlinePayload`] if the tessellation does not
    /// carry the payload of an inline leaf of `root`, in leaf order.
    pub fn new<S>(root: &Group<S>, tessellation: Tessellation) -> SceneResult<Self> {
        let Tessellation {
            meshes,
            inline,
            bounds,
        } = tessellation;
        let mut payloads = InlinePayloads(inline.into_iter());
        let root = group_record(root, "", &mut payloads)?;
        Ok(Self {
            version: SCENE_FORMAT_VERSION,
            name: root.name,
            id: root.id,
            loc: root.loc,
            parts: root.parts,
            instances: meshes,
            bb: bounds.map(|bb| bb.to_record()),
            diagnostics: Vec::new(),
        })
    }

    /// Attaches the diagnostics of the run.
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// View state of every leaf, keyed by id.
    pub fn states(&self) -> BTreeMap<String, ViewState> {
        let mut states = BTreeMap::new();
        collect_states(&self.parts, &mut states);
        states
    }

    /// Compact JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Indented JSON rendering.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn collect_states(parts: &[PartRecord], states: &mut BTreeMap<String, ViewState>) {
    for part in parts {
        let state = match part {
            PartRecord::Group(group) => {
                collect_states(&group.parts, states);
                continue;
            }
            PartRecord::Shapes(shape) if matches!(shape.kind, Kind::Face | Kind::Solid) => STATE_SHAPE,
            _ => STATE_LINES,
        };
        states.insert(part.id().to_string(), state);
    }
}

/// Inline payloads consumed in the depth first leaf order they were made in.
struct InlinePayloads(std::vec::IntoIter<(String, InlineMesh)>);

impl InlinePayloads {
    fn take(&mut self, id: &str) -> SceneResult<InlineMesh> {
        match self.0.next() {
            Some((path, mesh)) if path == id => Ok(mesh),
            _ => Err(SceneError::MissingInlinePayload { id: id.to_string() }),
        }
    }
}

fn group_record<S>(group: &Group<S>, parent: &str, inline: &mut InlinePayloads) -> SceneResult<GroupRecord> {
    let id = child_path(parent, &group.name);
    let parts = group
        .children
        .iter()
        .map(|child| match child {
            SceneNode::Group(inner) => group_record(inner, &id, inline).map(PartRecord::Group),
            SceneNode::Object(object) => object_record(object, &id, inline),
        })
        .collect::<SceneResult<Vec<_>>>()?;
    Ok(GroupRecord {
        name: group.name.clone(),
        id,
        loc: loc_record(group.loc),
        parts,
    })
}

fn object_record<S>(object: &Object<S>, parent: &str, inline: &mut InlinePayloads) -> SceneResult<PartRecord> {
    let id = child_path(parent, &object.name);
    let name = object.name.clone();
    let color = object.color.to_array();
    let width = object.width;

    let record = match &object.geometry {
        Geometry::Instance { reference, cache_id } => PartRecord::Shapes(ShapeRecord {
            name,
            id,
            kind: object.kind,
            loc: loc_record(object.loc),
            color,
            width,
            cache_id: Some(cache_id.to_hex()),
            shape: ShapePayload::Ref {
                reference: *reference,
            },
        }),
        Geometry::Inline(_) => {
            let payload = inline.take(&id)?;
            PartRecord::Shapes(ShapeRecord {
                name,
                id,
                kind: object.kind,
                loc: loc_record(object.loc),
                color,
                width,
                cache_id: None,
                shape: ShapePayload::Inline(payload),
            })
        }
        Geometry::Marker(Marker::CoordSystem {
            origin,
            x_dir,
            z_dir,
            size,
        }) => PartRecord::CoordSystem(CoordSystemRecord {
            name,
            id,
            origin: *origin,
            x_dir: *x_dir,
            z_dir: *z_dir,
            size: *size,
            color,
            width,
        }),
        Geometry::Marker(Marker::CoordAxis { origin, dir, size }) => PartRecord::CoordAxis(CoordAxisRecord {
            name,
            id,
            origin: *origin,
            dir: *dir,
            size: *size,
            color,
            width,
        }),
    };
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{convert, ConvertOptions};
    use crate::input::{Assembly, Axis, CadValue, Frame};
    use crate::tessellate::tessellate_all;
    use cad_kernel::builders::{make_box, make_line};
    use cad_kernel::PolyKernel;
    use config::tessellation::TessellationConfig;
    use serde_json::Value;

    fn describe(values: &[CadValue<cad_kernel::Shape>]) -> SceneDescription {
        let kernel = PolyKernel;
        let conversion = convert(&kernel, values, &ConvertOptions::default()).unwrap();
        let tessellation = tessellate_all(
            &kernel,
            &conversion.root,
            &conversion.instances,
            &TessellationConfig::default(),
            &conversion.diagnostics,
            None,
        )
        .unwrap();
        SceneDescription::new(&conversion.root, tessellation).unwrap()
    }

    #[test]
    fn test_records_and_states() {
        let scene = describe(&[
            CadValue::shape(make_box(1.0, 1.0, 1.0)),
            CadValue::shape(make_line(DVec3::ZERO, DVec3::X)),
            CadValue::Frame(Frame::Location(Placement::IDENTITY)),
            CadValue::Axis(Axis {
                label: None,
                origin: DVec3::ZERO,
                direction: DVec3::Z,
            }),
        ]);

        assert_eq!(scene.version, SCENE_FORMAT_VERSION);
        assert_eq!(scene.id, "/Group");
        assert_eq!(scene.instances.len(), 1);

        let states = scene.states();
        assert_eq!(states["/Group/Solid"], STATE_SHAPE);
        assert_eq!(states["/Group/Edge"], STATE_LINES);
        assert_eq!(states["/Group/Location"], STATE_LINES);
        assert_eq!(states["/Group/Axis"], STATE_LINES);
    }

    #[test]
    fn test_json_layout() {
        let scene = describe(&[
            CadValue::shape(make_box(1.0, 1.0, 1.0)).with_label("cube"),
            CadValue::List(vec![CadValue::shape(make_line(DVec3::ZERO, DVec3::Y))]),
        ]);
        let json: Value = serde_json::from_str(&scene.to_json().unwrap()).unwrap();

        let cube = &json["parts"][0];
        assert_eq!(cube["type"], "shapes");
        assert_eq!(cube["kind"], "solid");
        assert_eq!(cube["shape"]["ref"], 0);
        assert_eq!(cube["loc"][0], serde_json::json!([0.0, 0.0, 0.0]));
        assert_eq!(cube["loc"][1], serde_json::json!([0.0, 0.0, 0.0, 1.0]));

        let list = &json["parts"][1];
        assert_eq!(list["type"], "group");
        assert_eq!(list["id"], "/Group/List");
        let edge = &list["parts"][0];
        assert_eq!(edge["id"], "/Group/List/Edge");
        assert_eq!(edge["shape"]["segments_per_edge"], serde_json::json!([1]));
        assert!(json["bb"]["xmax"].as_f64().unwrap() >= 1.0);
    }

    fn inline_edges(part: &PartRecord) -> &[f32] {
        match part {
            PartRecord::Shapes(ShapeRecord {
                shape: ShapePayload::Inline(InlineMesh::Edges(mesh)),
                ..
            }) => &mesh.edges,
            other => panic!("expected inline edges, got {other:?}"),
        }
    }

    #[test]
    fn test_same_named_leaves_keep_their_own_payload() {
        let scene = describe(&[CadValue::Assembly(Assembly {
            label: Some("asm".to_string()),
            placement: Placement::IDENTITY,
            children: vec![
                CadValue::shape(make_line(DVec3::ZERO, DVec3::X)).with_label("rail"),
                CadValue::shape(make_line(DVec3::ZERO, DVec3::new(0.0, 5.0, 0.0))).with_label("rail"),
                CadValue::shape(make_box(1.0, 1.0, 1.0)).with_label("bolt"),
                CadValue::shape(make_box(2.0, 1.0, 1.0)).with_label("bolt"),
            ],
        })]);

        let ids = scene.parts.iter().map(PartRecord::id).collect::<Vec<_>>();
        assert_eq!(ids, ["/asm/rail", "/asm/rail_1", "/asm/bolt", "/asm/bolt_1"]);
        assert_eq!(scene.states().len(), 4);

        assert_eq!(inline_edges(&scene.parts[0]), [0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(inline_edges(&scene.parts[1]), [0.0, 0.0, 0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_missing_inline_payload_is_an_error() {
        let kernel = PolyKernel;
        let values = [CadValue::shape(make_line(DVec3::ZERO, DVec3::X)).with_label("rail")];
        let conversion = convert(&kernel, &values, &ConvertOptions::default()).unwrap();
        let mut tessellation = tessellate_all(
            &kernel,
            &conversion.root,
            &conversion.instances,
            &TessellationConfig::default(),
            &conversion.diagnostics,
            None,
        )
        .unwrap();
        tessellation.inline.clear();

        let err = SceneDescription::new(&conversion.root, tessellation).unwrap_err();
        assert!(matches!(err, SceneError::MissingInlinePayload { ref id } if id == "/Group/rail"));
    }
}
