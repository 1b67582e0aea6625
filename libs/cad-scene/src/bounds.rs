//! # Bounding Volume
//!
//! Axis-aligned boxes used to size tessellation and to report the extent of
//! a whole scene.
//!
//! Void geometry never fails: it is replaced by a micro box centered at the
//! geometry's center of mass, and a warning is recorded.

use cad_kernel::{BoxExtents, GeometryKernel, Placement};
use config::constants::{EMPTY_BOX_EXTENT, VOID_BOX_HALF_WIDTH};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Diagnostics};

/// Axis-aligned bounding box.
///
/// # Example
///
/// ```rust
/// use cad_scene::BoundingBox;
///
/// let mut a = BoundingBox::from_extents([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
/// a.merge(&BoundingBox::from_extents([2.0, 3.0, 0.0, 1.0, 0.0, 1.0]), false);
/// assert_eq!(a.xmax, 3.0);
/// assert_eq!(a.sizes(), [3.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

/// Serialized form of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsRecord {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl BoundingBox {
    /// Creates a box from `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub fn from_extents(extents: BoxExtents) -> Self {
        let [xmin, xmax, ymin, ymax, zmin, zmax] = extents;
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin,
            zmax,
        }
    }

    /// Cube of half width `half_width` around `center`.
    pub fn around(center: DVec3, half_width: f64) -> Self {
        Self::from_extents([
            center.x - half_width,
            center.x + half_width,
            center.y - half_width,
            center.y + half_width,
            center.z - half_width,
            center.z + half_width,
        ])
    }

    /// Box of a shape, optionally moved by `placement`.
    ///
    /// # Arguments
    ///
    /// * `kernel` - Kernel computing the box
    /// * `shape` - Geometry
    /// * `placement` - Extra placement applied on top of the shape's own
    /// * `exact` - Exact box or a fast, possibly larger one
    /// * `diagnostics` - Receives a warning when the geometry is void
    pub fn from_geometry<K: GeometryKernel>(
        kernel: &K,
        shape: &K::Shape,
        placement: Option<&Placement>,
        exact: bool,
        diagnostics: &Diagnostics,
    ) -> Self {
        match kernel.bounding_box(shape, placement, exact) {
            Some(extents) => Self::from_extents(extents),
            None => {
                let center = kernel.center_of_mass(shape);
                let center = placement.map_or(center, |p| p.transform_point(center));
                diagnostics.push(Diagnostic::void_geometry(format!(
                    "Void bounding box, using a micro box at [{:.3}, {:.3}, {:.3}]",
                    center.x, center.y, center.z
                )));
                Self::around(center, VOID_BOX_HALF_WIDTH)
            }
        }
    }

    /// Box of a point set; `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_extents([min.x, max.x, min.y, max.y, min.z, max.z]))
    }

    /// Widens (or, with `minimize`, narrows) every axis interval with
    /// `other`'s.
    pub fn merge(&mut self, other: &BoundingBox, minimize: bool) {
        let (lower, upper): (fn(f64, f64) -> f64, fn(f64, f64) -> f64) = if minimize {
            (f64::max, f64::min)
        } else {
            (f64::min, f64::max)
        };
        self.xmin = lower(self.xmin, other.xmin);
        self.xmax = upper(self.xmax, other.xmax);
        self.ymin = lower(self.ymin, other.ymin);
        self.ymax = upper(self.ymax, other.ymax);
        self.zmin = lower(self.zmin, other.zmin);
        self.zmax = upper(self.zmax, other.zmax);
    }

    /// Union of two boxes.
    pub fn union(mut self, other: &BoundingBox) -> Self {
        self.merge(other, false);
        self
    }

    /// Returns true when every axis is shorter than `epsilon`.
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.sizes().iter().all(|size| size.abs() < epsilon)
    }

    /// [`Self::is_degenerate`] with the default empty extent.
    pub fn is_empty(&self) -> bool {
        self.is_degenerate(EMPTY_BOX_EXTENT)
    }

    pub fn center(&self) -> DVec3 {
        DVec3::new(
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
            (self.zmin + self.zmax) / 2.0,
        )
    }

    /// Extents along x, y and z.
    pub fn sizes(&self) -> [f64; 3] {
        [
            self.xmax - self.xmin,
            self.ymax - self.ymin,
            self.zmax - self.zmin,
        ]
    }

    /// Largest absolute coordinate.
    pub fn max(&self) -> f64 {
        [self.xmin, self.xmax, self.ymin, self.ymax, self.zmin, self.zmax]
            .iter()
            .fold(0.0, |acc: f64, v| acc.max(v.abs()))
    }

    fn corners(&self) -> [DVec3; 8] {
        let (x, y, z) = ([self.xmin, self.xmax], [self.ymin, self.ymax], [self.zmin, self.zmax]);
        [
            DVec3::new(x[0], y[0], z[0]),
            DVec3::new(x[1], y[0], z[0]),
            DVec3::new(x[0], y[1], z[0]),
            DVec3::new(x[1], y[1], z[0]),
            DVec3::new(x[0], y[0], z[1]),
            DVec3::new(x[1], y[0], z[1]),
            DVec3::new(x[0], y[1], z[1]),
            DVec3::new(x[1], y[1], z[1]),
        ]
    }

    /// Distance from the center to the farthest corner.
    pub fn max_radius_from_center(&self) -> f64 {
        let center = self.center();
        self.corners()
            .iter()
            .map(|c| c.distance(center))
            .fold(0.0, f64::max)
    }

    /// Distance from the origin to the farthest corner.
    pub fn max_radius_from_origin(&self) -> f64 {
        self.corners().iter().map(|c| c.length()).fold(0.0, f64::max)
    }

    pub fn to_record(&self) -> BoundsRecord {
        BoundsRecord {
            xmin: self.xmin,
            xmax: self.xmax,
            ymin: self.ymin,
            ymax: self.ymax,
            zmin: self.zmin,
            zmax: self.zmax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use approx::assert_relative_eq;
    use cad_kernel::{builders, PolyKernel};

    fn unit() -> BoundingBox {
        BoundingBox::from_extents([0.0, 1.0, 0.0, 1.0, 0.0, 1.0])
    }

    #[test]
    fn test_merge_with_itself_is_noop() {
        let mut b = BoundingBox::from_extents([-1.0, 2.0, 0.5, 3.0, -4.0, 4.0]);
        let copy = b;
        b.merge(&copy, false);
        assert_eq!(b, copy);
        b.merge(&copy, true);
        assert_eq!(b, copy);
    }

    #[test]
    fn test_minimize_intersects() {
        let mut b = unit();
        b.merge(&BoundingBox::from_extents([0.5, 2.0, -1.0, 0.5, 0.0, 1.0]), true);
        assert_eq!(b, BoundingBox::from_extents([0.5, 1.0, 0.0, 0.5, 0.0, 1.0]));
    }

    #[test]
    fn test_union_is_componentwise() {
        let boxes = [
            BoundingBox::from_extents([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]),
            BoundingBox::from_extents([-3.0, -2.0, 5.0, 6.0, 0.0, 0.5]),
            BoundingBox::from_extents([0.0, 0.1, 0.0, 0.1, -7.0, 0.0]),
        ];
        let folded = boxes[1..].iter().fold(boxes[0], |acc, b| acc.union(b));
        assert_eq!(folded, BoundingBox::from_extents([-3.0, 1.0, 0.0, 6.0, -7.0, 1.0]));
    }

    #[test]
    fn test_radii() {
        let b = BoundingBox::from_extents([0.0, 2.0, 0.0, 2.0, 0.0, 2.0]);
        assert_relative_eq!(b.max_radius_from_center(), 3f64.sqrt());
        assert_relative_eq!(b.max_radius_from_origin(), 12f64.sqrt());
        assert_eq!(b.max(), 2.0);
        assert_eq!(b.center(), DVec3::ONE);
    }

    #[test]
    fn test_degenerate() {
        let point = BoundingBox::around(DVec3::ZERO, 1e-6);
        assert!(point.is_degenerate(1e-3));
        assert!(point.is_empty());
        assert!(!unit().is_empty());
    }

    #[test]
    fn test_void_geometry_is_replaced() {
        let diagnostics = Diagnostics::new();
        let empty = builders::make_compound(Vec::new());
        let b = BoundingBox::from_geometry(&PolyKernel, &empty, None, false, &diagnostics);
        assert!(b.is_degenerate(1e-5));
        assert_eq!(b.center(), DVec3::ZERO);
        assert_eq!(diagnostics.count(DiagnosticKind::VoidGeometry), 1);
    }

    #[test]
    fn test_geometry_box() {
        let diagnostics = Diagnostics::new();
        let cube = builders::make_box(1.0, 2.0, 3.0);
        let shift = Placement::from_translation(DVec3::new(0.0, 0.0, 10.0));
        let b = BoundingBox::from_geometry(&PolyKernel, &cube, Some(&shift), true, &diagnostics);
        assert_eq!(b, BoundingBox::from_extents([0.0, 1.0, 0.0, 2.0, 10.0, 13.0]));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_from_points() {
        assert!(BoundingBox::from_points(Vec::new()).is_none());
        let b = BoundingBox::from_points(vec![DVec3::new(1.0, -1.0, 0.0), DVec3::new(-1.0, 1.0, 2.0)]).unwrap();
        assert_eq!(b.to_record().zmax, 2.0);
        assert_eq!(b.xmin, -1.0);
    }
}
