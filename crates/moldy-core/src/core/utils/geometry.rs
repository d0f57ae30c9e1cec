use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use thiserror::Error;

/// Norms and sines below this value are treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Blend factor applied to the summed vector lengths in [`slerp`].
const ARC_RADIUS_FACTOR: f64 = 0.45;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("Cannot normalize a vector of near-zero length (norm = {norm:e})")]
    DegenerateVector { norm: f64 },
    #[error("Spherical interpolation is undefined for directions {angle_degrees:.3} degrees apart")]
    DegenerateAngle { angle_degrees: f64 },
}

/// Returns `v / |v|`, failing when the vector has (numerically) zero length.
pub fn unit_vector(v: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
    let norm = v.norm();
    if norm < EPSILON {
        return Err(GeometryError::DegenerateVector { norm });
    }
    Ok(v / norm)
}

/// Builds the Euler–Rodrigues rotation for `angle` radians about `axis`.
///
/// The axis may have any non-zero length. The quaternion parameters are
/// `a = cos(angle / 2)` and `(b, c, d) = -axis_unit * sin(angle / 2)`, so applying the
/// result to a vector turns it clockwise when looking down the axis (equivalently,
/// it rotates the coordinate frame counter-clockwise). The Z-matrix builder relies on
/// exactly this handedness for its dihedral sign convention.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateVector`] if `axis` has near-zero length.
pub fn rotation_matrix(axis: &Vector3<f64>, angle: f64) -> Result<Rotation3<f64>, GeometryError> {
    let axis = unit_vector(axis)?;
    let half = angle / 2.0;
    let a = half.cos();
    let (b, c, d) = {
        let s = -half.sin();
        (axis.x * s, axis.y * s, axis.z * s)
    };

    #[rustfmt::skip]
    let matrix = Matrix3::new(
        a * a + b * b - c * c - d * d, 2.0 * (b * c - a * d),         2.0 * (b * d + a * c),
        2.0 * (b * c + a * d),         a * a + c * c - b * b - d * d, 2.0 * (c * d - a * b),
        2.0 * (b * d - a * c),         2.0 * (c * d + a * b),         a * a + d * d - b * b - c * c,
    );
    Ok(Rotation3::from_matrix_unchecked(matrix))
}

/// Angle in radians at `vertex` between the rays towards `a` and `b`.
pub fn bond_angle(
    vertex: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
) -> Result<f64, GeometryError> {
    let to_a = unit_vector(&(a - vertex))?;
    let to_b = unit_vector(&(b - vertex))?;
    Ok(to_a.dot(&to_b).clamp(-1.0, 1.0).acos())
}

/// Signed dihedral angle in radians for the chain `p0 - p1 - p2 - p3`.
///
/// The magnitude is the angle between the normals of the planes `(p0, p1, p2)` and
/// `(p1, p2, p3)`. The angle is negated when `(n1 x n2) . unit(p1 - p2)` is positive,
/// which yields the IUPAC sign and matches the dihedrals placed by the Z-matrix builder.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateVector`] when three consecutive points are
/// collinear or coincide, leaving a plane normal undefined.
pub fn dihedral_angle(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> Result<f64, GeometryError> {
    let q = p0 - p1;
    let r = p1 - p2;
    let s = p2 - p3;

    let r_unit = unit_vector(&r)?;
    let plane1 = q.cross(&r);
    let plane2 = r.cross(&s);
    let n1 = unit_vector(&plane1)?;
    let n2 = unit_vector(&plane2)?;

    let dihedral = n1.dot(&n2).clamp(-1.0, 1.0).acos();
    if plane1.cross(&plane2).dot(&r_unit) > 0.0 {
        Ok(-dihedral)
    } else {
        Ok(dihedral)
    }
}

/// Spherical linear interpolation between the directions of `q` and `r`.
///
/// The returned point lies on the great-circle arc from `q` (at `t = 0`) to `r` (at
/// `t = 1`) with radius `0.45 * (|q| + |r|)`. It is meant for drawing angle arcs
/// around a shared vertex, not for coordinate conversion.
///
/// # Errors
///
/// - [`GeometryError::DegenerateVector`] if either input has near-zero length.
/// - [`GeometryError::DegenerateAngle`] if the directions are parallel or
///   anti-parallel, where `sin(angle)` vanishes.
pub fn slerp(q: &Vector3<f64>, r: &Vector3<f64>, t: f64) -> Result<Vector3<f64>, GeometryError> {
    let radius = (q.norm() + r.norm()) * ARC_RADIUS_FACTOR;
    let q_unit = unit_vector(q)?;
    let r_unit = unit_vector(r)?;

    let angle = q_unit.dot(&r_unit).clamp(-1.0, 1.0).acos();
    let sin_angle = angle.sin();
    if sin_angle.abs() < EPSILON {
        return Err(GeometryError::DegenerateAngle {
            angle_degrees: angle.to_degrees(),
        });
    }

    let weight_q = ((1.0 - t) * angle).sin() / sin_angle * radius;
    let weight_r = (t * angle).sin() / sin_angle * radius;
    Ok(q_unit * weight_q + r_unit * weight_r)
}

/// Mass-weighted mean of `positions`, or `None` when the total mass is zero.
pub fn mass_weighted_center(positions: &[Point3<f64>], masses: &[f64]) -> Option<Point3<f64>> {
    let total_mass: f64 = masses.iter().sum();
    if total_mass.abs() < EPSILON {
        return None;
    }
    let weighted = positions
        .iter()
        .zip(masses)
        .fold(Vector3::zeros(), |acc, (p, &m)| acc + p.coords * m);
    Some(Point3::from(weighted / total_mass))
}

/// Largest absolute difference between corresponding inter-atomic distances of two
/// geometries.
///
/// The measure is invariant under rigid rotation and translation, so it compares two
/// structures without aligning them first. Returns `None` when the slices differ in
/// length or are empty.
pub fn max_pairwise_distance_deviation(
    coords1: &[Point3<f64>],
    coords2: &[Point3<f64>],
) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let mut max_deviation = 0.0f64;
    for i in 0..coords1.len() {
        for j in (i + 1)..coords1.len() {
            let d1 = nalgebra::distance(&coords1[i], &coords1[j]);
            let d2 = nalgebra::distance(&coords2[i], &coords2[j]);
            max_deviation = max_deviation.max((d1 - d2).abs());
        }
    }
    Some(max_deviation)
}

/// Root-mean-square deviation after superimposing `coords1` onto `coords2`.
///
/// Both sets are centered on their centroids and `coords1` is rotated by the Kabsch
/// rotation (proper rotations only, no reflection). Returns `None` when the slices
/// differ in length or are empty.
pub fn aligned_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let centroid = |coords: &[Point3<f64>]| {
        coords.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / n
    };
    let c1 = centroid(coords1);
    let c2 = centroid(coords2);

    let covariance = coords1
        .iter()
        .zip(coords2)
        .fold(Matrix3::zeros(), |acc: Matrix3<f64>, (p1, p2)| {
            acc + (p1.coords - c1) * (p2.coords - c2).transpose()
        });
    let svd = covariance.svd(true, true);
    let (u, v_t) = svd.u.zip(svd.v_t)?;

    let mut rotation = v_t.transpose() * u.transpose();
    if rotation.determinant() < 0.0 {
        let mut v_t = v_t;
        v_t.row_mut(2).neg_mut();
        rotation = v_t.transpose() * u.transpose();
    }

    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2)
        .map(|(p1, p2)| (rotation * (p1.coords - c1) - (p2.coords - c2)).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}
