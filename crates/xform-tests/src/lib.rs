//! Integration tests for xform crates.
//!
//! This crate contains end-to-end tests that chain vectors, matrices and
//! quaternions into full transform pipelines, and cross-check the
//! hand-derived algorithms in `xform-math` against `glam`.
//!
//! Run with `RUST_LOG=xform_math=trace` to see the fallback diagnostics.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
    use tracing_subscriber::EnvFilter;
    use xform_core::tolerance::DEFAULT_EPSILON;
    use xform_math::{Error, Mat4, Quat, Vec3, Vec4};

    /// Installs a test-writer subscriber once; later calls are no-ops.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn non_symmetric() -> Mat4 {
        Mat4::from_rows([
            [2.0, 3.0, 1.0, 5.0],
            [1.0, 0.0, 3.0, 1.0],
            [0.0, 2.0, -3.0, 2.0],
            [0.0, 2.0, 3.0, 1.0],
        ])
    }

    fn affine() -> Mat4 {
        Mat4::translate(1.5, -2.0, 4.0)
            * Mat4::rotate_axis(Vec3::new(1.0, 2.0, 2.0).normalize(), 0.8)
            * Mat4::scale(2.0, 0.5, 3.0)
    }

    // ------------------------------------------------------------------
    // Matrix properties
    // ------------------------------------------------------------------

    #[test]
    fn test_matrix_multiplication_not_commutative() {
        let a = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        let b = non_symmetric();
        assert!(!(a * b).equals_within(&(b * a), DEFAULT_EPSILON));
    }

    #[test]
    fn test_inversion_roundtrip() {
        init_tracing();
        for m in [non_symmetric(), affine(), Mat4::rotate_euler(0.1, 0.2, 0.3)] {
            assert_abs_diff_eq!(m.inverse().inverse(), m, epsilon = DEFAULT_EPSILON);
            assert_abs_diff_eq!(m * m.inverse(), Mat4::IDENTITY, epsilon = DEFAULT_EPSILON);
            assert_abs_diff_eq!(m.inverse() * m, Mat4::IDENTITY, epsilon = DEFAULT_EPSILON);
        }
    }

    #[test]
    fn test_transpose_involution() {
        let m = affine();
        assert_eq!(m.transpose().transpose(), m);

        let mut t = m;
        t.transpose_mut();
        assert_eq!(t, m.transpose());
        t.transpose_mut();
        assert_eq!(t, m);
    }

    #[test]
    fn test_singular_determinant_and_inverse() {
        init_tracing();
        let m = Mat4::from_array([
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        ]);
        assert_eq!(m.determinant(), 0.0);
        // Degenerate result is propagated, not replaced
        assert!(!m.inverse().is_finite());
        assert!(!m.inverse().is_identity());
    }

    #[test]
    fn test_rotation_sanity() {
        let v = Vec4::new(3.0, 4.0, 5.0, 1.0);
        let eps = DEFAULT_EPSILON;
        assert_abs_diff_eq!(Mat4::rotate_x(PI) * v, Vec4::new(3.0, -4.0, -5.0, 1.0), epsilon = eps);
        assert_abs_diff_eq!(Mat4::rotate_y(PI) * v, Vec4::new(-3.0, 4.0, -5.0, 1.0), epsilon = eps);
        assert_abs_diff_eq!(Mat4::rotate_z(PI) * v, Vec4::new(-3.0, -4.0, 5.0, 1.0), epsilon = eps);
        assert_eq!(Mat4::rotate_axis(Vec3::X, PI) * v, Mat4::rotate_x(PI) * v);
    }

    #[test]
    fn test_orthographic_corner() {
        let m = Mat4::orthographic_rh(0.0, 10.0, 0.0, 10.0, -1.0, 1.0);
        let corner = m * Vec4::new(10.0, 10.0, 1.0, 1.0);
        assert_abs_diff_eq!(corner, Vec4::new(1.0, 1.0, -1.0, 1.0), epsilon = DEFAULT_EPSILON);
    }

    #[test]
    fn test_perspective_rejections() {
        init_tracing();
        let cases: [(Result<Mat4, Error>, &str); 6] = [
            (Mat4::perspective_rh(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0), "near"),
            (Mat4::perspective_rh(-1.0, 1.0, -1.0, 1.0, 1.0, -10.0), "far"),
            (Mat4::perspective_rh(-1.0, 1.0, -1.0, 1.0, 10.0, 1.0), "near"),
            (Mat4::perspective_fov_rh(0.0, 1.0, 0.1, 10.0), "fovy"),
            (Mat4::perspective_fov_rh(PI + 0.01, 1.0, 0.1, 10.0), "fovy"),
            (Mat4::perspective_fov_rh(1.0, -1.0, 0.1, 10.0), "aspect"),
        ];
        for (result, expected) in cases {
            match result {
                Err(Error::InvalidProjection { parameter, .. }) => assert_eq!(parameter, expected),
                other => panic!("expected {expected} rejection, got {other:?}"),
            }
        }
        assert!(Mat4::perspective_fov_rh(PI, 1.0, 0.1, 10.0).is_ok());
    }

    // ------------------------------------------------------------------
    // Quaternion properties
    // ------------------------------------------------------------------

    #[test]
    fn test_slerp_half_turn_arc() {
        init_tracing();
        let a = Quat::rotate_axis(Vec3::Z, PI);
        let b = Quat::rotate_axis(Vec3::Z, 2.0 * PI);
        let eps = DEFAULT_EPSILON;

        assert_abs_diff_eq!(a.slerp(b, 0.0), a, epsilon = eps);
        assert_abs_diff_eq!(a.slerp(b, 1.0), b, epsilon = eps);
        assert_abs_diff_eq!(
            a.slerp(b, 0.5) * Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(4.0, -3.0, 0.0),
            epsilon = eps
        );
    }

    #[test]
    fn test_interpolation_unit_length() {
        let a = Quat::rotate_axis(Vec3::Z, PI);
        let b = Quat::rotate_axis(Vec3::Z, 2.0 * PI);
        assert!(a.nlerp(b, 0.5).is_normalized());
        assert!(a.slerp(b, 0.5).is_normalized());
        assert!(!a.lerp(b, 0.5).is_normalized());
    }

    #[test]
    fn test_normalize_invariant() {
        init_tracing();
        let vectors = [Vec3::new(3.0, 4.0, 0.0), Vec3::new(-1e-2, 5e-3, 2e-3), Vec3::splat(1e4)];
        for v in vectors {
            assert!(v.normalize().is_normalized(), "{v}");
        }
        let quats = [Quat::new(1.0, 2.0, 3.0, 4.0), Quat::new(0.0, 0.0, 0.0, -0.5)];
        for q in quats {
            assert!(q.normalize().is_normalized(), "{q}");
        }

        // Zero-length inputs take the fixed fallback, which is a half turn
        // about X for quaternions rather than the identity.
        assert_eq!(Vec3::ZERO.normalize(), Vec3::X);
        assert_eq!(Vec4::ZERO.normalize(), Vec4::X);
        assert_eq!(Quat::ZERO.normalize(), Quat::new(1.0, 0.0, 0.0, 0.0));
        assert_ne!(Quat::ZERO.normalize(), Quat::IDENTITY);
    }

    #[test]
    fn test_euler_composition() {
        let (x, y, z) = (0.3, -1.2, 2.0);
        let v = Vec3::new(1.0, -2.0, 0.5);

        let stepwise = Mat4::rotate_z(z) * (Mat4::rotate_y(y) * (Mat4::rotate_x(x) * v.extend(0.0)));
        let by_matrix = Mat4::rotate_euler(x, y, z).transform_vector(v);
        let by_quat = Quat::rotate_euler(x, y, z).transform(v);

        assert_abs_diff_eq!(by_matrix, stepwise.truncate(), epsilon = 1e-5);
        assert_abs_diff_eq!(by_quat, by_matrix, epsilon = 1e-5);
        assert_abs_diff_eq!(Quat::rotate_euler(x, y, z).to_mat4(), Mat4::rotate_euler(x, y, z), epsilon = 1e-5);
    }

    #[test]
    fn test_quat_matrix_homomorphism() {
        let a = Quat::rotate_axis(Vec3::new(0.0, 0.6, -0.8), 2.1);
        let b = Quat::rotate_euler(0.5, 0.25, -0.75);
        assert_abs_diff_eq!((a * b).to_mat4(), a.to_mat4() * b.to_mat4(), epsilon = 1e-5);
        assert_abs_diff_eq!((b * a).to_mat4(), b.to_mat4() * a.to_mat4(), epsilon = 1e-5);
        assert!(!(a * b).equals_within(b * a, DEFAULT_EPSILON));
    }

    // ------------------------------------------------------------------
    // Pipelines
    // ------------------------------------------------------------------

    #[test]
    fn test_model_view_projection_pipeline() {
        let model = Mat4::translate(0.0, 0.0, -5.0) * Quat::rotate_y(FRAC_PI_2).to_mat4();
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_fov_rh(FRAC_PI_2, 1.0, 1.0, 20.0).unwrap();

        // Model X axis rotates onto -Z, then moves 5 back: world (0, 0, -6).
        let world = model.transform_point(Vec3::X);
        assert_abs_diff_eq!(world, Vec3::new(0.0, 0.0, -6.0), epsilon = 1e-5);

        // Camera at z = 5 looking at the origin: view-space depth 11.
        let eye = view.transform_point(world);
        assert_abs_diff_eq!(eye, Vec3::new(0.0, 0.0, -11.0), epsilon = 1e-5);

        let mvp = proj * view * model;
        let ndc = mvp.transform_point(Vec3::X);
        assert_abs_diff_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);

        // Clip-space depth extremes of the same frustum
        let near = (proj * Vec4::new(0.0, 0.0, -1.0, 1.0)).project();
        let far = (proj * Vec4::new(0.0, 0.0, -20.0, 1.0)).project();
        assert_abs_diff_eq!(near.z, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pipeline_undo() {
        let m = affine() * Quat::rotate_euler(0.4, 0.1, -0.6).to_mat4();
        let p = Vec3::new(-3.0, 7.5, 0.25);
        let back = m.inverse().transform_point(m.transform_point(p));
        assert_abs_diff_eq!(back, p, epsilon = 1e-4);
    }

    #[test]
    fn test_quat_chain_matches_matrix_chain() {
        let steps = [
            Quat::rotate_x(0.3),
            Quat::rotate_axis(Vec3::new(1.0, 1.0, 0.0).normalize(), -1.1),
            Quat::rotate_z(FRAC_PI_4),
            Quat::rotate_y(2.5),
        ];
        let (q, m) = steps
            .iter()
            .fold((Quat::IDENTITY, Mat4::IDENTITY), |(q, m), s| (*s * q, s.to_mat4() * m));

        let v = Vec3::new(0.5, -1.0, 2.0);
        assert_abs_diff_eq!(q.transform(v), m.transform_vector(v), epsilon = 1e-5);
        assert!(q.is_normalized());
    }

    #[test]
    fn test_axis_angle_through_matrix() {
        let axis = Vec3::new(-2.0, 1.0, 2.0).normalize();
        let m = Mat4::rotate_axis(axis, 1.75);
        let (a, angle) = Quat::from_mat4(&m).normalize().axis_angle();

        // from_mat4 may return -q, which flips both axis and angle
        let (a, angle) = if angle > PI { (-a, 2.0 * PI - angle) } else { (a, angle) };
        assert_abs_diff_eq!(a, axis, epsilon = 1e-4);
        assert_abs_diff_eq!(angle, 1.75, epsilon = 1e-4);
    }

    // ------------------------------------------------------------------
    // glam oracle
    // ------------------------------------------------------------------

    #[test]
    fn test_glam_matrix_conversion() {
        let m = affine();
        let g = m.to_glam();
        // glam is column-major: translation lives in the last column
        assert_eq!(g.w_axis.x, m.m[0][3]);
        assert_eq!(g.w_axis.y, m.m[1][3]);
        assert_eq!(g.w_axis.z, m.m[2][3]);
        assert_eq!(Mat4::from_glam(g), m);
        assert_eq!(Mat4::from(glam::Mat4::from(m)), m);
    }

    #[test]
    fn test_glam_determinant_and_inverse() {
        for m in [non_symmetric(), affine(), Mat4::rotate_euler(1.0, -0.5, 0.25)] {
            let g = m.to_glam();
            assert_abs_diff_eq!(m.determinant(), g.determinant(), epsilon = 1e-4);
            assert_abs_diff_eq!(m.inverse(), Mat4::from_glam(g.inverse()), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_glam_product_and_transform() {
        let a = affine();
        let b = non_symmetric();
        assert_abs_diff_eq!(a * b, Mat4::from_glam(a.to_glam() * b.to_glam()), epsilon = 1e-4);

        let v = Vec4::new(1.0, -2.0, 3.0, 1.0);
        assert_abs_diff_eq!(a * v, Vec4::from_glam(a.to_glam() * v.to_glam()), epsilon = 1e-4);

        let p = Vec3::new(0.5, 0.25, -1.0);
        assert_abs_diff_eq!(
            a.transform_point(p),
            Vec3::from_glam(a.to_glam().transform_point3(p.to_glam())),
            epsilon = 1e-4
        );
        assert_abs_diff_eq!(
            a.transform_vector(p),
            Vec3::from_glam(a.to_glam().transform_vector3(p.to_glam())),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_glam_affine_factories() {
        let g = glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Mat4::translate(1.0, 2.0, 3.0), Mat4::from_glam(g));

        let g = glam::Mat4::from_scale(glam::Vec3::new(2.0, -1.0, 0.5));
        assert_eq!(Mat4::scale(2.0, -1.0, 0.5), Mat4::from_glam(g));

        for angle in [-2.0, 0.3, FRAC_PI_2, 3.0] {
            let eps = 1e-6;
            assert_abs_diff_eq!(Mat4::rotate_x(angle), Mat4::from_glam(glam::Mat4::from_rotation_x(angle)), epsilon = eps);
            assert_abs_diff_eq!(Mat4::rotate_y(angle), Mat4::from_glam(glam::Mat4::from_rotation_y(angle)), epsilon = eps);
            assert_abs_diff_eq!(Mat4::rotate_z(angle), Mat4::from_glam(glam::Mat4::from_rotation_z(angle)), epsilon = eps);

            let axis = Vec3::new(3.0, -1.0, 2.0).normalize();
            let g = glam::Mat4::from_axis_angle(axis.to_glam(), angle);
            assert_abs_diff_eq!(Mat4::rotate_axis(axis, angle), Mat4::from_glam(g), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_glam_projections() {
        let ours = Mat4::orthographic_rh(-4.0, 6.0, -2.0, 3.0, 0.5, 40.0);
        let theirs = glam::Mat4::orthographic_rh_gl(-4.0, 6.0, -2.0, 3.0, 0.5, 40.0);
        assert_abs_diff_eq!(ours, Mat4::from_glam(theirs), epsilon = 1e-6);

        let ours = Mat4::perspective_fov_rh(1.1, 1.5, 0.1, 250.0).unwrap();
        let theirs = glam::Mat4::perspective_rh_gl(1.1, 1.5, 0.1, 250.0);
        assert_abs_diff_eq!(ours, Mat4::from_glam(theirs), epsilon = 1e-5);

        let eye = Vec3::new(3.0, 2.0, -4.0);
        let target = Vec3::new(-1.0, 0.5, 2.0);
        let ours = Mat4::look_at_rh(eye, target, Vec3::Y);
        let theirs = glam::Mat4::look_at_rh(eye.to_glam(), target.to_glam(), glam::Vec3::Y);
        assert_abs_diff_eq!(ours, Mat4::from_glam(theirs), epsilon = 1e-5);
    }

    #[test]
    fn test_glam_quaternion_algebra() {
        let axis = Vec3::new(1.0, -3.0, 2.0).normalize();
        let a = Quat::rotate_axis(axis, 0.9);
        let ga = glam::Quat::from_axis_angle(axis.to_glam(), 0.9);
        assert_abs_diff_eq!(a, Quat::from_glam(ga), epsilon = 1e-6);

        let b = Quat::rotate_x(-0.4) * Quat::rotate_z(1.3);
        let gb = glam::Quat::from_rotation_x(-0.4) * glam::Quat::from_rotation_z(1.3);
        assert_abs_diff_eq!(b, Quat::from_glam(gb), epsilon = 1e-6);

        assert_abs_diff_eq!(a * b, Quat::from_glam(ga * gb), epsilon = 1e-6);
        assert_abs_diff_eq!(a.inverse(), Quat::from_glam(ga.inverse()), epsilon = 1e-6);

        let v = Vec3::new(2.0, 0.5, -1.0);
        assert_abs_diff_eq!(a * v, Vec3::from_glam(ga * v.to_glam()), epsilon = 1e-5);
        assert_abs_diff_eq!(a.to_mat4(), Mat4::from_glam(glam::Mat4::from_quat(ga)), epsilon = 1e-6);
        assert_eq!(glam::Quat::from(a), a.to_glam());
    }

    #[test]
    fn test_glam_quaternion_interpolation() {
        // Same hemisphere, so glam's shortest-path flip does not engage
        let a = Quat::rotate_euler(0.1, 0.2, 0.3);
        let b = Quat::rotate_euler(-0.4, 0.9, 1.2);
        assert!(a.dot(b) > 0.0);

        for t in [0.0, 0.2, 0.5, 0.9, 1.0] {
            let ours = a.slerp(b, t);
            let theirs = a.to_glam().slerp(b.to_glam(), t);
            assert_abs_diff_eq!(ours, Quat::from_glam(theirs), epsilon = 1e-5);

            let ours = a.lerp(b, t);
            let theirs = a.to_glam().lerp(b.to_glam(), t);
            assert_abs_diff_eq!(ours.normalize(), Quat::from_glam(theirs), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_glam_from_mat4() {
        for q in [
            Quat::rotate_euler(0.2, 2.9, -1.0),
            Quat::rotate_x(3.0),
            Quat::rotate_y(-3.0),
            Quat::rotate_z(3.1),
        ] {
            let m = q.to_mat4();
            let ours = Quat::from_mat4(&m);
            let theirs = Quat::from_glam(glam::Quat::from_mat4(&m.to_glam()));
            // Either sign is the same rotation
            let theirs = if ours.dot(theirs) < 0.0 { -theirs } else { theirs };
            assert_abs_diff_eq!(ours, theirs, epsilon = 1e-5);
        }
    }
}
