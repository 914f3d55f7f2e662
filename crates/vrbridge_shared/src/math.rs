//! Mathematical types shared by tracking, rig and rendering.
//!
//! Engine convention: left-handed, Y up, +Z forward, +X right.
//! Quaternions follow the Hamilton product; `a * b` applies `b` first.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Squared length below which a direction is considered degenerate.
pub const DEGENERATE_EPSILON_SQ: f32 = 1e-3;

/// 3D Vector - position, velocity, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector (right)
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector (up)
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector (forward)
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Distance squared (avoids sqrt)
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    #[must_use]
    pub fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Linear interpolation, `t = 0` gives `self`, `t = 1` gives `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Projects onto the horizontal plane (drops Y).
    #[must_use]
    pub const fn flatten(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    /// Heading of this direction around +Y in degrees, 0 = +Z, 90 = +X.
    #[must_use]
    pub fn yaw_degrees(self) -> f32 {
        self.x.atan2(self.z).to_degrees()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// 2D Vector - thumbstick deflection, texture coords
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Quaternion for rotations
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Quaternion {
    /// Creates a new quaternion
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Rotation of `angle_rad` around a unit `axis`.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, angle_rad: f32) -> Self {
        let (s, c) = (angle_rad * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Rotation of `degrees` around +Y. Positive turns +Z toward +X.
    #[must_use]
    pub fn from_yaw_degrees(degrees: f32) -> Self {
        Self::from_axis_angle(Vec3::Y, degrees.to_radians())
    }

    /// Rotation whose forward axis is `forward` and whose up axis is as
    /// close to `up` as possible.
    ///
    /// A zero `forward` yields identity. When `up` is parallel to
    /// `forward`, +X or +Z is used as the secondary axis.
    #[must_use]
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let f = forward.normalize_or_zero();
        if f == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let mut r = up.cross(f);
        if r.length_squared() < 1e-8 {
            let alt = if f.y.abs() < 0.99 { Vec3::Y } else { Vec3::Z };
            r = alt.cross(f);
        }
        let r = r.normalize_or_zero();
        let u = f.cross(r);
        Self::from_basis(r, u, f)
    }

    /// Builds a quaternion from orthonormal right/up/forward columns.
    #[must_use]
    fn from_basis(r: Vec3, u: Vec3, f: Vec3) -> Self {
        let (m00, m01, m02) = (r.x, u.x, f.x);
        let (m10, m11, m12) = (r.y, u.y, f.y);
        let (m20, m21, m22) = (r.z, u.z, f.z);
        let trace = m00 + m11 + m22;

        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        };
        q.normalize()
    }

    /// Unit-length copy; identity for a zero quaternion.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if len > f32::EPSILON {
            let inv = 1.0 / len;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Inverse of a unit quaternion.
    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Rotates a vector.
    #[must_use]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    /// Local +Z expressed in world space.
    #[must_use]
    pub fn forward(self) -> Vec3 {
        self.rotate(Vec3::Z)
    }

    /// Local +Y expressed in world space.
    #[must_use]
    pub fn up(self) -> Vec3 {
        self.rotate(Vec3::Y)
    }

    /// Local +X expressed in world space.
    #[must_use]
    pub fn right(self) -> Vec3 {
        self.rotate(Vec3::X)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Quaternion {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

/// Transform - position + rotation + scale
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Transform {
    /// Position
    pub position: Vec3,
    /// Scale (uniform)
    pub scale: f32,
    /// Rotation
    pub rotation: Quaternion,
}

impl Transform {
    /// Creates a new transform
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quaternion, scale: f32) -> Self {
        Self { position, scale, rotation }
    }

    /// Unit-scale transform from a position and rotation.
    #[must_use]
    pub const fn from_pose(position: Vec3, rotation: Quaternion) -> Self {
        Self::new(position, rotation, 1.0)
    }

    /// Identity transform
    pub const IDENTITY: Self = Self::new(Vec3::ZERO, Quaternion::IDENTITY, 1.0);

    /// Maps a local-space point into the parent space.
    #[must_use]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation.rotate(local * self.scale)
    }

    /// Composes `self` (parent) with `child` (local to parent).
    #[must_use]
    pub fn compose(&self, child: &Self) -> Self {
        Self::new(
            self.transform_point(child.position),
            self.rotation * child.rotation,
            self.scale * child.scale,
        )
    }

    /// Forward axis of this transform.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation.forward()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Column-major 4x4 matrix in engine convention.
///
/// `cols[c][r]` is the element at row `r`, column `c`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    /// Matrix columns.
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Element at `row`, `col`.
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> f32 {
        self.cols[col][row]
    }

    /// Left-handed perspective projection with a depth range of 0..1.
    ///
    /// Used for the eye cameras until the runtime has reported a projection.
    #[must_use]
    pub fn perspective_lh(fov_y_rad: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y_rad * 0.5).tan();
        let range = far / (far - near);
        Self {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, range, 1.0],
                [0.0, 0.0, -range * near, 0.0],
            ],
        }
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 7.0);
        assert_eq!(sum.z, 9.0);

        let dot = a.dot(b);
        assert_eq!(dot, 32.0); // 1*4 + 2*5 + 3*6
    }

    #[test]
    fn test_vec3_bytemuck() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 12); // 3 * 4 bytes
    }

    #[test]
    fn test_cross_is_left_handed_basis() {
        // up x forward = right
        assert!(approx(Vec3::Y.cross(Vec3::Z), Vec3::X));
    }

    #[test]
    fn test_yaw_rotation_turns_forward_right() {
        let q = Quaternion::from_yaw_degrees(90.0);
        assert!(approx(q.forward(), Vec3::X));
        assert!((q.forward().yaw_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_look_rotation_reproduces_axes() {
        let forward = Vec3::new(1.0, 0.0, 1.0).normalize_or_zero();
        let q = Quaternion::look_rotation(forward, Vec3::Y);
        assert!(approx(q.forward(), forward));
        assert!(approx(q.up(), Vec3::Y));
    }

    #[test]
    fn test_look_rotation_zero_forward_is_identity() {
        assert_eq!(Quaternion::look_rotation(Vec3::ZERO, Vec3::Y), Quaternion::IDENTITY);
    }

    #[test]
    fn test_look_rotation_backward() {
        let q = Quaternion::look_rotation(-Vec3::Z, Vec3::Y);
        assert!(approx(q.forward(), -Vec3::Z));
        assert!(approx(q.right(), -Vec3::X));
    }

    #[test]
    fn test_quaternion_mul_composes() {
        let a = Quaternion::from_yaw_degrees(30.0);
        let b = Quaternion::from_yaw_degrees(60.0);
        let c = a * b;
        assert!(approx(c.forward(), Vec3::X));
    }

    #[test]
    fn test_transform_point() {
        let t = Transform::from_pose(Vec3::new(0.0, 1.0, 0.0), Quaternion::from_yaw_degrees(90.0));
        // local forward 1m ends up 1m along +X
        assert!(approx(t.transform_point(Vec3::Z), Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_mat4_accessor_is_column_major() {
        let mut m = Mat4::IDENTITY;
        m.cols[3][0] = 5.0;
        assert_eq!(m.get(0, 3), 5.0);
    }
}
