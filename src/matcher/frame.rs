use crate::spherical::{cartesian_to_radec, radec_to_cartesian, rodrigues_rotation};
use crate::Vector3;

/// Reference point every tile center is rotated onto, `(ra, dec)` degrees.
pub const REFERENCE_POINT: (f64, f64) = (180.0, 0.0);

/// Rigid rotation taking a tile center onto [`REFERENCE_POINT`].
///
/// After the rotation the tile sits astride the equator, far from both the
/// poles and the RA seam, so rotated `(ra, dec)` pairs can be searched as
/// flat coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    axis: Vector3,
    angle: f64,
}

impl LocalFrame {
    pub fn new(center_ra: f64, center_dec: f64) -> Self {
        let center = radec_to_cartesian(center_ra, center_dec);
        let target = radec_to_cartesian(REFERENCE_POINT.0, REFERENCE_POINT.1);
        let cos_angle = center.dot(&target).clamp(-1.0, 1.0);
        let axis = center.cross(&target);
        let norm = axis.norm();

        if norm > 1e-12 {
            Self {
                axis: axis / norm,
                angle: cos_angle.acos().to_degrees(),
            }
        } else if cos_angle > 0.0 {
            // Already on the reference point
            Self {
                axis: Vector3::z(),
                angle: 0.0,
            }
        } else {
            // Antipodal: any axis through the poles works
            Self {
                axis: Vector3::z(),
                angle: 180.0,
            }
        }
    }

    /// Rotation angle in degrees; equals the distance from the tile center to
    /// the reference point.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Rotated `[ra, dec]` of a sky position.
    pub fn project(&self, ra: f64, dec: f64) -> [f64; 2] {
        if self.angle == 0.0 {
            return [ra, dec];
        }
        let v = rodrigues_rotation(&radec_to_cartesian(ra, dec), &self.axis, self.angle);
        let (ra, dec) = cartesian_to_radec(&v);
        [ra, dec]
    }
}
