//! Edge geometry of the polyhedral kernel: straight segments and circular
//! arcs.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use crate::placement::Placement;

/// Angular step used when sampling arcs for exact bounding boxes.
const EXACT_SAMPLE_STEP: f64 = PI / 720.0;

/// Curve carried by an edge, expressed in the edge's local frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// Straight segment
    Line {
        /// First point
        start: DVec3,
        /// Last point
        end: DVec3,
    },
    /// Circular arc, counter-clockwise around `normal`
    Arc {
        /// Circle center
        center: DVec3,
        /// Circle radius
        radius: f64,
        /// Unit direction of angle zero
        x_dir: DVec3,
        /// Unit normal of the circle plane
        normal: DVec3,
        /// Start angle in radians
        start_angle: f64,
        /// End angle in radians, greater than `start_angle`
        end_angle: f64,
    },
}

impl Curve {
    /// Point at parameter `angle` of an arc, or the start of a line.
    pub fn point_at(&self, angle: f64) -> DVec3 {
        match self {
            Curve::Line { start, .. } => *start,
            Curve::Arc {
                center,
                radius,
                x_dir,
                normal,
                ..
            } => {
                let y_dir = normal.cross(*x_dir);
                *center + *radius * (angle.cos() * *x_dir + angle.sin() * y_dir)
            }
        }
    }

    /// First point of the curve.
    pub fn start(&self) -> DVec3 {
        match self {
            Curve::Line { start, .. } => *start,
            Curve::Arc { start_angle, .. } => self.point_at(*start_angle),
        }
    }

    /// Last point of the curve.
    pub fn end(&self) -> DVec3 {
        match self {
            Curve::Line { end, .. } => *end,
            Curve::Arc { end_angle, .. } => self.point_at(*end_angle),
        }
    }

    /// Returns true when start and end coincide.
    pub fn is_closed(&self) -> bool {
        self.start().distance(self.end()) < 1e-9
    }

    /// Polyline approximation. Arcs are split so that the sagitta stays
    /// below `deflection` and no step exceeds `max_angle`.
    pub fn discretize(&self, deflection: f64, max_angle: f64) -> Vec<DVec3> {
        match self {
            Curve::Line { start, end } => vec![*start, *end],
            Curve::Arc {
                radius,
                start_angle,
                end_angle,
                ..
            } => {
                let span = end_angle - start_angle;
                let step = sagitta_step(*radius, deflection).min(max_angle).max(1e-6);
                let segments = (span / step).ceil().max(1.0) as usize;
                (0..=segments)
                    .map(|i| self.point_at(start_angle + span * i as f64 / segments as f64))
                    .collect()
            }
        }
    }

    /// Points whose box bounds the curve. `exact` samples arcs finely,
    /// otherwise arcs are bounded by their full circle.
    pub fn extent_points(&self, exact: bool) -> Vec<DVec3> {
        match self {
            Curve::Line { start, end } => vec![*start, *end],
            Curve::Arc { .. } if exact => self.discretize(0.0, EXACT_SAMPLE_STEP),
            Curve::Arc {
                center,
                radius,
                normal,
                ..
            } => {
                let reach = DVec3::new(
                    (1.0 - normal.x * normal.x).max(0.0).sqrt(),
                    (1.0 - normal.y * normal.y).max(0.0).sqrt(),
                    (1.0 - normal.z * normal.z).max(0.0).sqrt(),
                ) * *radius;
                vec![*center - reach, *center + reach]
            }
        }
    }

    /// The same curve expressed through `placement`.
    pub fn transformed(&self, placement: &Placement) -> Curve {
        match self {
            Curve::Line { start, end } => Curve::Line {
                start: placement.transform_point(*start),
                end: placement.transform_point(*end),
            },
            Curve::Arc {
                center,
                radius,
                x_dir,
                normal,
                start_angle,
                end_angle,
            } => Curve::Arc {
                center: placement.transform_point(*center),
                radius: *radius,
                x_dir: placement.transform_vector(*x_dir),
                normal: placement.transform_vector(*normal),
                start_angle: *start_angle,
                end_angle: *end_angle,
            },
        }
    }

    /// Appends a canonical byte form of the curve.
    pub(crate) fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            Curve::Line { start, end } => {
                out.push(b'L');
                write_vec(out, *start);
                write_vec(out, *end);
            }
            Curve::Arc {
                center,
                radius,
                x_dir,
                normal,
                start_angle,
                end_angle,
            } => {
                out.push(b'A');
                write_vec(out, *center);
                for value in [*radius, *start_angle, *end_angle] {
                    out.extend_from_slice(&value.to_bits().to_le_bytes());
                }
                write_vec(out, *x_dir);
                write_vec(out, *normal);
            }
        }
    }
}

/// Largest angular step whose chord stays within `deflection` of the arc.
fn sagitta_step(radius: f64, deflection: f64) -> f64 {
    if radius <= 0.0 || deflection <= 0.0 || deflection >= radius {
        return TAU;
    }
    2.0 * (1.0 - deflection / radius).acos()
}

pub(crate) fn write_vec(out: &mut Vec<u8>, v: DVec3) {
    for value in v.to_array() {
        out.extend_from_slice(&value.to_bits().to_le_bytes());
    }
}
