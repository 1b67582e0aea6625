//! # Placement
//!
//! Rigid transforms (translation + unit rotation quaternion) positioning a
//! shape in world space. All placement algebra of the pipeline goes through
//! this type so composition order is defined in exactly one place.

use std::ops::Mul;

use config::constants::EPSILON;
use glam::{DMat3, DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// A rigid transform: rotate by `rotation`, then translate by `translation`.
///
/// `a * b` applies `b` first and `a` second, so a child placement is
/// composed into its parent frame as `parent * child`.
///
/// # Example
///
/// ```rust
/// use cad_kernel::Placement;
/// use glam::DVec3;
///
/// let parent = Placement::from_translation(DVec3::new(10.0, 0.0, 0.0));
/// let child = Placement::from_translation(DVec3::new(0.0, 5.0, 0.0));
/// let world = parent * child;
/// assert_eq!(world.transform_point(DVec3::ZERO), DVec3::new(10.0, 5.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Translation part
    pub translation: DVec3,
    /// Unit rotation quaternion
    pub rotation: DQuat,
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Placement {
    /// The identity placement.
    pub const IDENTITY: Placement = Placement {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Creates a placement, normalizing the rotation.
    pub fn new(translation: DVec3, rotation: DQuat) -> Self {
        Self {
            translation,
            rotation: rotation.normalize(),
        }
    }

    /// Creates a pure translation.
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Creates a pure rotation.
    pub fn from_rotation(rotation: DQuat) -> Self {
        Self::new(DVec3::ZERO, rotation)
    }

    /// Creates the placement of a frame given its origin, x direction and
    /// z direction. The y direction completes a right handed frame.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cad_kernel::Placement;
    /// use glam::DVec3;
    ///
    /// let frame = Placement::from_frame(DVec3::ZERO, DVec3::Y, DVec3::Z);
    /// assert!((frame.x_dir() - DVec3::Y).length() < 1e-12);
    /// assert!((frame.z_dir() - DVec3::Z).length() < 1e-12);
    /// ```
    pub fn from_frame(origin: DVec3, x_dir: DVec3, z_dir: DVec3) -> Self {
        let z = z_dir.normalize_or_zero();
        let z = if z == DVec3::ZERO { DVec3::Z } else { z };
        let y = z.cross(x_dir).normalize_or_zero();
        let y = if y == DVec3::ZERO {
            z.any_orthonormal_vector()
        } else {
            y
        };
        let x = y.cross(z);
        let rotation = DQuat::from_mat3(&DMat3::from_cols(x, y, z));
        Self::new(origin, rotation)
    }

    /// Builds a placement from a translation triple and an `[x, y, z, w]`
    /// quaternion.
    pub fn from_tq(translation: [f64; 3], quaternion: [f64; 4]) -> Self {
        Self::new(
            DVec3::from_array(translation),
            DQuat::from_xyzw(quaternion[0], quaternion[1], quaternion[2], quaternion[3]),
        )
    }

    /// Decomposes into a translation triple and an `[x, y, z, w]` quaternion.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cad_kernel::Placement;
    ///
    /// let p = Placement::from_tq([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0]);
    /// assert_eq!(p.to_tq(), ([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0]));
    /// ```
    pub fn to_tq(&self) -> ([f64; 3], [f64; 4]) {
        let q = self.rotation;
        (self.translation.to_array(), [q.x, q.y, q.z, q.w])
    }

    /// Returns the inverse placement.
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            translation: -(rotation * self.translation),
            rotation,
        }
    }

    /// Applies the placement to a point.
    #[inline]
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Applies the rotation part to a direction.
    #[inline]
    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.rotation * vector
    }

    /// Origin of the placed frame.
    pub fn origin(&self) -> DVec3 {
        self.translation
    }

    /// X direction of the placed frame.
    pub fn x_dir(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// Z direction of the placed frame.
    pub fn z_dir(&self) -> DVec3 {
        self.rotation * DVec3::Z
    }

    /// Returns the 4×4 affine matrix of this placement.
    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.translation)
    }

    /// Returns true when the placement moves nothing within `tolerance`.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.abs_diff_eq(&Self::IDENTITY, tolerance)
    }

    /// Compares two placements. `q` and `-q` describe the same rotation.
    pub fn abs_diff_eq(&self, other: &Placement, tolerance: f64) -> bool {
        let same_rotation = self.rotation.abs_diff_eq(other.rotation, tolerance)
            || self.rotation.abs_diff_eq(-other.rotation, tolerance);
        same_rotation && self.translation.abs_diff_eq(other.translation, tolerance)
    }

    /// Composes `self * rhs`, snapping the result to the exact identity when
    /// the two cancel out numerically.
    pub fn compose(&self, rhs: &Placement) -> Placement {
        let composed = Placement {
            translation: self.rotation * rhs.translation + self.translation,
            rotation: (self.rotation * rhs.rotation).normalize(),
        };
        if composed.is_identity(EPSILON) {
            Placement::IDENTITY
        } else {
            composed
        }
    }
}

impl Mul for Placement {
    type Output = Placement;

    fn mul(self, rhs: Placement) -> Placement {
        self.compose(&rhs)
    }
}

impl Mul<&Placement> for &Placement {
    type Output = Placement;

    fn mul(self, rhs: &Placement) -> Placement {
        self.compose(rhs)
    }
}
