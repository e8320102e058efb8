use core::fmt;

use super::vector::{Vector3, det3};

/// Relative size below which the system determinant counts as zero
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// The points do not span 3-space (coplanar or collinear)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DegenerateGeometry;

impl fmt::Display for DegenerateGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("points are coplanar or collinear, sphere center is undefined")
    }
}

/// Center of the sphere passing through four points
///
/// Every point `p_i` (i = 1..3) gives a bisector plane with point `p0`:
/// normal `n_i = p_i - p0` through the midpoint `m_i`, i.e.
/// `n_i · Q = n_i · m_i`. The 3x3 system is solved with Cramer's rule.
///
/// # Errors
///
/// Returns [`DegenerateGeometry`] when the system determinant is zero or
/// negligible relative to the product of the normal lengths.
pub fn sphere_center(points: &[Vector3; 4]) -> Result<Vector3, DegenerateGeometry> {
    let p0 = points[0];
    let normals = [points[1] - p0, points[2] - p0, points[3] - p0];
    let d = Vector3::new(
        normals[0].dot(points[1].midpoint(p0)),
        normals[1].dot(points[2].midpoint(p0)),
        normals[2].dot(points[3].midpoint(p0)),
    );

    // Columns of the coefficient matrix
    let cx = Vector3::new(normals[0].x, normals[1].x, normals[2].x);
    let cy = Vector3::new(normals[0].y, normals[1].y, normals[2].y);
    let cz = Vector3::new(normals[0].z, normals[1].z, normals[2].z);

    let w = det3(cx, cy, cz);
    // |W| is bounded by the product of the row lengths
    let bound = normals.iter().map(|n| n.length()).product::<f64>();
    if !w.is_finite() || bound == 0.0 || w.abs() <= SINGULAR_TOLERANCE * bound {
        return Err(DegenerateGeometry);
    }

    Ok(Vector3::new(
        det3(d, cy, cz) / w,
        det3(cx, d, cz) / w,
        det3(cx, cy, d) / w,
    ))
}
