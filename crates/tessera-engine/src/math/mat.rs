use core::ops::Mul;

use bytemuck::{Pod, Zeroable};

use super::vec::Vec3;

/// Flat index of element `(col, row)`.
#[inline]
pub const fn idx(col: usize, row: usize) -> usize {
    col + row * 4
}

/// 4x4 `f32` matrix.
///
/// Storage is 16 floats where element `(col, row)` lives at `col + row * 4`.
/// Read as a row-major grid, translation sits in the last column: `translate`
/// writes `x`, `y`, `z` to `(3, 0)`, `(3, 1)`, `(3, 2)`.
///
/// The array is uploaded to shaders verbatim. WGSL reads it column-major, so
/// shaders apply it as `v * m` (see `gfx/shaders/default.wgsl`).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    pub d: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        d: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn from_array(d: [f32; 16]) -> Self {
        Self { d }
    }

    #[inline]
    pub fn as_array(&self) -> &[f32; 16] {
        &self.d
    }

    #[inline]
    pub fn at(&self, col: usize, row: usize) -> f32 {
        self.d[idx(col, row)]
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut m = Self::identity();
        m.d[idx(0, 0)] = sx;
        m.d[idx(1, 1)] = sy;
        m.d[idx(2, 2)] = sz;
        m
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.d[idx(3, 0)] = x;
        m.d[idx(3, 1)] = y;
        m.d[idx(3, 2)] = z;
        m
    }

    pub fn rotate_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m.d[idx(1, 1)] = c;
        m.d[idx(2, 1)] = -s;
        m.d[idx(1, 2)] = s;
        m.d[idx(2, 2)] = c;
        m
    }

    pub fn rotate_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m.d[idx(0, 0)] = c;
        m.d[idx(2, 0)] = s;
        m.d[idx(0, 2)] = -s;
        m.d[idx(2, 2)] = c;
        m
    }

    pub fn rotate_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m.d[idx(0, 0)] = c;
        m.d[idx(1, 0)] = -s;
        m.d[idx(0, 1)] = s;
        m.d[idx(1, 1)] = c;
        m
    }

    /// `result(col, row) = Σ_i a(col, i) * b(i, row)`.
    ///
    /// Not commutative. `multiply(a, b)` applies `a` first, then `b`: the view
    /// matrix is `multiply(translate(-pos), rotation)`.
    pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for i in 0..4 {
                    sum += a.d[idx(col, i)] * b.d[idx(i, row)];
                }
                out[idx(col, row)] = sum;
            }
        }
        Mat4 { d: out }
    }

    /// Symmetric perspective projection.
    ///
    /// `fov` is the vertical field of view in radians. Depth maps to the
    /// `[-w, w]` clip range; the default vertex shader remaps it to wgpu's
    /// `[0, w]`.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let t = (fov / 2.0).tan();
        let depth = near - far;
        let mut d = [0.0f32; 16];
        d[idx(0, 0)] = 1.0 / (t * aspect);
        d[idx(1, 1)] = 1.0 / t;
        d[idx(2, 2)] = (near + far) / depth;
        d[idx(3, 2)] = 2.0 * near * far / depth;
        d[idx(2, 3)] = -1.0;
        Mat4 { d }
    }

    pub fn transpose(&self) -> Self {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[idx(col, row)] = self.d[idx(row, col)];
            }
        }
        Mat4 { d: out }
    }

    /// Extracts `(pitch, yaw, roll)` from a pure rotation.
    ///
    /// Inverse of `multiply(multiply(rotate_y(yaw), rotate_x(pitch)), rotate_z(roll))`:
    /// pitch in `[-π/2, π/2]`, yaw and roll in `(-π, π]`. At the poles yaw and
    /// roll are indistinguishable; roll is reported as 0.
    pub fn to_euler(&self) -> (f32, f32, f32) {
        let sin_pitch = self.at(1, 2).clamp(-1.0, 1.0);
        let pitch = sin_pitch.asin();

        if sin_pitch.abs() < 1.0 - 1e-6 {
            let yaw = (-self.at(0, 2)).atan2(self.at(2, 2));
            let roll = (-self.at(1, 0)).atan2(self.at(1, 1));
            (pitch, yaw, roll)
        } else {
            let yaw = self.at(2, 0).atan2(self.at(0, 0));
            (pitch, yaw, 0.0)
        }
    }

    pub fn approx_eq(&self, other: &Mat4, eps: f32) -> bool {
        self.d.iter().zip(other.d.iter()).all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    #[inline]
    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::multiply(&self, &rhs)
    }
}

/// See [`Mat4::to_euler`].
#[inline]
pub fn rotation_to_euler(m: &Mat4) -> (f32, f32, f32) {
    m.to_euler()
}

/// Row vector times the upper 3x3 block: `result[j] = Σ_i v[i] * m(j, i)`.
///
/// Rotates a direction. Translation is ignored.
pub fn vector_times_matrix(v: Vec3, m: &Mat4) -> Vec3 {
    let v = v.to_array();
    let mut out = [0.0f32; 3];
    for (j, o) in out.iter_mut().enumerate() {
        *o = (0..3).map(|i| v[i] * m.d[idx(j, i)]).sum();
    }
    Vec3::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f32 = 1e-5;

    fn sample() -> Mat4 {
        let mut d = [0.0f32; 16];
        for (i, v) in d.iter_mut().enumerate() {
            *v = i as f32 * 0.5 - 3.0;
        }
        Mat4::from_array(d)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn identity_is_neutral_on_both_sides() {
        let m = sample();
        assert_eq!(Mat4::multiply(&Mat4::identity(), &m), m);
        assert_eq!(Mat4::multiply(&m, &Mat4::identity()), m);
    }

    #[test]
    fn rotate_z_inverts() {
        for theta in [0.0, FRAC_PI_4, FRAC_PI_2, PI] {
            let m = Mat4::multiply(&Mat4::rotate_z(theta), &Mat4::rotate_z(-theta));
            assert!(m.approx_eq(&Mat4::identity(), EPS), "theta = {theta}");
        }
    }

    #[test]
    fn translate_layout() {
        let m = Mat4::translate(1.0, 2.0, 3.0);
        assert_eq!(m.d[3], 1.0);
        assert_eq!(m.d[7], 2.0);
        assert_eq!(m.d[11], 3.0);
        assert_eq!(m.d[15], 1.0);
    }

    #[test]
    fn multiply_applies_left_operand_first() {
        // Scale then translate: translation is not scaled.
        let m = Mat4::multiply(&Mat4::scale(2.0, 2.0, 2.0), &Mat4::translate(1.0, 0.0, 0.0));
        assert_eq!(m.at(3, 0), 1.0);
        assert_eq!(m.at(0, 0), 2.0);

        // Translate then scale: translation is scaled.
        let m = Mat4::multiply(&Mat4::translate(1.0, 0.0, 0.0), &Mat4::scale(2.0, 2.0, 2.0));
        assert_eq!(m.at(3, 0), 2.0);
    }

    #[test]
    fn mul_operator_matches_multiply() {
        let a = Mat4::rotate_x(0.3);
        let b = Mat4::translate(1.0, -2.0, 0.5);
        assert_eq!(a * b, Mat4::multiply(&a, &b));
    }

    #[test]
    fn transpose_twice_is_identity_op() {
        let m = sample();
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().at(1, 0), m.at(0, 1));
    }

    #[test]
    fn perspective_entries() {
        let (fov, aspect, n, f) = (FRAC_PI_2, 2.0, 0.1, 100.0);
        let m = Mat4::perspective(fov, aspect, n, f);
        assert!(close(m.d[0], 0.5));
        assert!(close(m.d[5], 1.0));
        assert!(close(m.d[10], (n + f) / (n - f)));
        assert!(close(m.d[11], 2.0 * n * f / (n - f)));
        assert_eq!(m.d[14], -1.0);
        assert_eq!(m.d[15], 0.0);
    }

    #[test]
    fn euler_of_pure_yaw_covers_full_range() {
        for yaw in [-3.0, -FRAC_PI_2, -0.5, 0.0, 0.7, FRAC_PI_2, 2.5, 3.1] {
            let (p, y, r) = Mat4::rotate_y(yaw).to_euler();
            assert!(close(p, 0.0) && close(y, yaw) && close(r, 0.0), "yaw = {yaw}: ({p}, {y}, {r})");
        }
    }

    #[test]
    fn euler_round_trips_yaw_then_pitch() {
        for (pitch, yaw) in [(0.3, 1.2), (-0.9, -2.4), (1.2, 0.1), (-0.2, 3.0)] {
            let m = Mat4::multiply(&Mat4::rotate_y(yaw), &Mat4::rotate_x(pitch));
            let (p, y, r) = rotation_to_euler(&m);
            assert!(close(p, pitch), "pitch {pitch} -> {p}");
            assert!(close(y, yaw), "yaw {yaw} -> {y}");
            assert!(close(r, 0.0));
        }
    }

    #[test]
    fn euler_recovers_roll() {
        let m = Mat4::multiply(
            &Mat4::multiply(&Mat4::rotate_y(0.4), &Mat4::rotate_x(-0.3)),
            &Mat4::rotate_z(0.8),
        );
        let (p, y, r) = m.to_euler();
        assert!(close(p, -0.3) && close(y, 0.4) && close(r, 0.8));
    }

    #[test]
    fn euler_gimbal_reports_zero_roll() {
        let m = Mat4::multiply(&Mat4::rotate_y(0.6), &Mat4::rotate_x(FRAC_PI_2));
        let (p, y, r) = m.to_euler();
        assert!(close(p, FRAC_PI_2));
        assert!(close(y, 0.6));
        assert_eq!(r, 0.0);
    }

    #[test]
    fn vector_times_identity_is_unchanged() {
        let v = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(vector_times_matrix(v, &Mat4::identity()), v);
    }

    #[test]
    fn vector_times_matrix_ignores_translation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(vector_times_matrix(v, &Mat4::translate(5.0, 5.0, 5.0)), v);
    }

    #[test]
    fn forward_step_follows_yaw() {
        // A quarter turn right sends "forward" (-Z) to +X.
        let ds = vector_times_matrix(Vec3::new(0.0, 0.0, -1.0), &Mat4::rotate_y(FRAC_PI_2));
        assert!(close(ds.x, 1.0) && close(ds.y, 0.0) && close(ds.z, 0.0), "{ds:?}");
    }
}
