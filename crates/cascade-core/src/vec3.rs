//! Three-vector helpers for positions, directions, and momenta.
//!
//! Directions are plain `[f64; 3]` unit vectors. The helpers here cover the
//! handful of operations the transport loop and the samplers need: dot
//! products, normalization, building a vector from spherical angles, and
//! rotating a locally-sampled direction into the frame of a reference axis.

/// A three-vector in the native unit system.
pub type Real3 = [f64; 3];

/// Soft tolerance for unit-vector checks.
pub const UNIT_TOLERANCE: f64 = 1e-6;

/// Dot product of two vectors.
pub fn dot(a: &Real3, b: &Real3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean norm.
pub fn norm(v: &Real3) -> f64 {
    dot(v, v).sqrt()
}

/// Scale a vector by a constant.
pub fn scaled(v: &Real3, factor: f64) -> Real3 {
    [v[0] * factor, v[1] * factor, v[2] * factor]
}

/// Component-wise sum.
pub fn added(a: &Real3, b: &Real3) -> Real3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Normalize a vector to unit length.
///
/// # Panics
///
/// Panics in debug builds if the input has (near-)zero norm; a zero vector
/// here is a programming error in the caller, not a runtime condition.
pub fn make_unit_vector(v: &Real3) -> Real3 {
    let n = norm(v);
    debug_assert!(n > 0.0, "cannot normalize zero vector");
    scaled(v, 1.0 / n)
}

/// Whether a vector is unit length within [`UNIT_TOLERANCE`].
pub fn is_soft_unit(v: &Real3) -> bool {
    (norm(v) - 1.0).abs() <= UNIT_TOLERANCE
}

/// Build a unit vector from the cosine of the polar angle and the azimuth,
/// relative to the +z axis.
pub fn from_spherical(costheta: f64, phi: f64) -> Real3 {
    debug_assert!((-1.0..=1.0).contains(&costheta));
    let sintheta = (1.0 - costheta * costheta).sqrt();
    [sintheta * phi.cos(), sintheta * phi.sin(), costheta]
}

/// Rotate a vector expressed relative to the +z axis into the frame whose
/// polar axis is the unit vector `axis`.
///
/// This is the standard "rotateUz" construction: sampling routines draw a
/// direction relative to z and then reorient it around the incident track
/// direction. When `axis` is (anti)parallel to z the rotation degenerates
/// to the identity (or a flip).
pub fn rotate(v: &Real3, axis: &Real3) -> Real3 {
    debug_assert!(is_soft_unit(axis));
    let [ux, uy, uz] = *axis;
    let up = (ux * ux + uy * uy).sqrt();
    if up > 0.0 {
        [
            (ux * uz * v[0] - uy * v[1]) / up + ux * v[2],
            (uy * uz * v[0] + ux * v[1]) / up + uy * v[2],
            -up * v[0] + uz * v[2],
        ]
    } else if uz > 0.0 {
        *v
    } else {
        [-v[0], v[1], -v[2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_soft_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn dot_and_norm() {
        let a = [1.0, 2.0, 2.0];
        assert_soft_eq(dot(&a, &a), 9.0);
        assert_soft_eq(norm(&a), 3.0);
    }

    #[test]
    fn unit_vector_from_arbitrary() {
        let u = make_unit_vector(&[3.0, 0.0, 4.0]);
        assert!(is_soft_unit(&u));
        assert_soft_eq(u[0], 0.6);
        assert_soft_eq(u[2], 0.8);
    }

    #[test]
    fn spherical_poles_and_equator() {
        let up = from_spherical(1.0, 0.3);
        assert_soft_eq(up[2], 1.0);

        let eq = from_spherical(0.0, 0.0);
        assert_soft_eq(eq[0], 1.0);
        assert_soft_eq(eq[2], 0.0);
        assert!(is_soft_unit(&eq));
    }

    #[test]
    fn rotate_about_z_is_identity() {
        let v = from_spherical(0.5, 1.0);
        let r = rotate(&v, &[0.0, 0.0, 1.0]);
        assert_soft_eq(r[0], v[0]);
        assert_soft_eq(r[1], v[1]);
        assert_soft_eq(r[2], v[2]);
    }

    #[test]
    fn rotate_about_negative_z_flips() {
        let v = [0.1, 0.2, 0.97];
        let r = rotate(&v, &[0.0, 0.0, -1.0]);
        assert_soft_eq(r[0], -0.1);
        assert_soft_eq(r[1], 0.2);
        assert_soft_eq(r[2], -0.97);
    }

    #[test]
    fn rotate_preserves_polar_angle() {
        // A vector at polar angle theta from z must end up at angle theta
        // from the new axis.
        let costheta = 0.8;
        let v = from_spherical(costheta, 2.1);
        let axis = make_unit_vector(&[1.0, -2.0, 0.5]);
        let r = rotate(&v, &axis);
        assert!(is_soft_unit(&r));
        assert!((dot(&r, &axis) - costheta).abs() < 1e-12);
    }

    #[test]
    fn rotate_preserves_length() {
        let v = scaled(&from_spherical(-0.3, 0.7), 2.5);
        let axis = make_unit_vector(&[0.2, 0.9, -0.4]);
        let r = rotate(&v, &axis);
        assert!((norm(&r) - 2.5).abs() < 1e-12);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rotation_is_rigid(
                costheta in -1.0f64..=1.0,
                phi in 0.0f64..6.28,
                ax in -1.0f64..1.0,
                ay in -1.0f64..1.0,
                az in -1.0f64..1.0,
            ) {
                prop_assume!(ax * ax + ay * ay + az * az > 1e-6);
                let axis = make_unit_vector(&[ax, ay, az]);
                let v = from_spherical(costheta, phi);
                let r = rotate(&v, &axis);
                prop_assert!((norm(&r) - 1.0).abs() < 1e-9);
                prop_assert!((dot(&r, &axis) - costheta).abs() < 1e-9);
            }
        }
    }
}
