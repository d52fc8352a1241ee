use nalgebra::Point3;

/// Euclidean distance between two points.
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

/// Bond angle at `vertex` formed by `a` and `c`, in degrees.
///
/// The cosine is clamped to `[-1, 1]` before the inverse cosine so that
/// rounding noise on (anti)parallel vectors cannot produce `NaN`.
///
/// # Return
///
/// The angle in `[0, 180]`. Returns `0.0` when either arm has zero length.
pub fn bond_angle(a: &Point3<f64>, vertex: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let v1 = a - vertex;
    let v2 = c - vertex;
    let norms = v1.norm() * v2.norm();
    if norms == 0.0 {
        return 0.0;
    }
    (v1.dot(&v2) / norms).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Signed dihedral angle defined by four points, in degrees.
///
/// Uses the `atan2` formulation on the three bond vectors `b1 = p2 - p1`,
/// `b2 = p3 - p2`, `b3 = p4 - p3`, which is numerically stable over the whole
/// range and yields a value in `(-180, 180]`.
///
/// # Arguments
///
/// * `p1`, `p2`, `p3`, `p4` - The four points in chain order; `p2`-`p3` is the axis.
pub fn torsion_angle(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);
    wrap_degrees(y.atan2(x).to_degrees())
}

/// Reduces an angle in degrees modulo 360 and reflects it into `(-180, 180]`.
pub fn wrap_degrees(value: f64) -> f64 {
    let reduced = value % 360.0;
    if reduced > 180.0 {
        reduced - 360.0
    } else if reduced <= -180.0 {
        reduced + 360.0
    } else {
        reduced
    }
}
