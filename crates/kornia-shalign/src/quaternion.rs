use crate::AlignError;

/// Rotation quaternion with the scalar part first, i.e. `(w, x, y, z)`.
///
/// The solver does not fix the sign: `q` and `-q` encode the same rotation.
/// Use [`Quaternion::canonical`] or [`Quaternion::aligned_with`] before comparing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    /// Scalar part.
    pub w: f64,
    /// First imaginary component.
    pub x: f64,
    /// Second imaginary component.
    pub y: f64,
    /// Third imaginary component.
    pub z: f64,
}

impl Quaternion {
    /// Identity rotation.
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new quaternion from w, x, y, z components.
    #[inline]
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Create a quaternion from a `[w, x, y, z]` array.
    #[inline]
    pub fn from_array(q: [f64; 4]) -> Self {
        Self::new(q[0], q[1], q[2], q[3])
    }

    /// Return the components as a `[w, x, y, z]` array.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Compute the quaternion from an axis and angle.
    ///
    /// # Arguments
    ///
    /// * `axis` - The axis of rotation, it does not need to be normalized.
    /// * `angle` - The angle of rotation in radians.
    ///
    /// Example:
    ///
    /// ```
    /// use kornia_shalign::Quaternion;
    ///
    /// let q = Quaternion::from_axis_angle(&[0.0, 0.0, 2.0], std::f64::consts::PI).unwrap();
    /// assert!(q.w.abs() < 1e-12);
    /// assert!((q.z - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_axis_angle(axis: &[f64; 3], angle: f64) -> Result<Self, AlignError> {
        let magnitude = (axis[0].powi(2) + axis[1].powi(2) + axis[2].powi(2)).sqrt();
        if magnitude < 1e-10 {
            return Err(AlignError::ZeroRotationAxis);
        }

        let (s, c) = (angle / 2.0).sin_cos();
        let k = s / magnitude;

        Ok(Self::new(c, axis[0] * k, axis[1] * k, axis[2] * k))
    }

    /// Dot product of the two quaternions seen as 4-vectors.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean norm of the quaternion.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scale the quaternion to unit norm.
    ///
    /// Returns `None` if the norm is zero or not finite.
    pub fn normalize(&self) -> Option<Self> {
        let norm = self.norm();
        if !norm.is_finite() || norm <= f64::MIN_POSITIVE {
            return None;
        }
        Some(Self::new(
            self.w / norm,
            self.x / norm,
            self.y / norm,
            self.z / norm,
        ))
    }

    /// Conjugate quaternion, the inverse rotation for unit quaternions.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Flip the sign so that the first non-zero component, in `w, x, y, z` order, is positive.
    pub fn canonical(&self) -> Self {
        let first = self
            .to_array()
            .into_iter()
            .find(|v| *v != 0.0)
            .unwrap_or(0.0);
        if first < 0.0 {
            -*self
        } else {
            *self
        }
    }

    /// Flip the sign so that the quaternion lies in the same hemisphere as `reference`.
    pub fn aligned_with(&self, reference: &Self) -> Self {
        if self.dot(reference) < 0.0 {
            -*self
        } else {
            *self
        }
    }

    /// Angle in radians of the relative rotation between `self` and `other`.
    ///
    /// The result does not depend on the sign of either quaternion.
    pub fn angular_distance(&self, other: &Self) -> f64 {
        let denom = self.norm() * other.norm();
        if denom <= f64::MIN_POSITIVE {
            return 0.0;
        }
        let cos_half = (self.dot(other).abs() / denom).min(1.0);
        2.0 * cos_half.acos()
    }

    /// Row-major rotation matrix of the quaternion.
    ///
    /// PRECONDITION: the quaternion has unit norm.
    pub fn to_rotation_matrix(&self) -> [[f64; 3]; 3] {
        let Self { w, x, y, z } = *self;

        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);

        [
            [1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy)],
            [2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx)],
            [2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy)],
        ]
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn neg(self) -> Self::Output {
        Quaternion::new(-self.w, -self.x, -self.y, -self.z)
    }
}

// Hamilton product
impl std::ops::Mul<Quaternion> for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn mul(self, rhs: Quaternion) -> Self::Output {
        Quaternion::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

impl From<Quaternion> for nalgebra::Quaternion<f64> {
    #[inline]
    fn from(q: Quaternion) -> Self {
        nalgebra::Quaternion::new(q.w, q.x, q.y, q.z)
    }
}

impl From<nalgebra::Quaternion<f64>> for Quaternion {
    #[inline]
    fn from(q: nalgebra::Quaternion<f64>) -> Self {
        Quaternion::new(q.w, q.i, q.j, q.k)
    }
}

impl From<Quaternion> for nalgebra::UnitQuaternion<f64> {
    #[inline]
    fn from(q: Quaternion) -> Self {
        nalgebra::UnitQuaternion::from_quaternion(q.into())
    }
}

impl From<nalgebra::UnitQuaternion<f64>> for Quaternion {
    #[inline]
    fn from(q: nalgebra::UnitQuaternion<f64>) -> Self {
        q.into_inner().into()
    }
}
