//! Small 3D Cartesian vector used by the flat model.
//!
//! `Vector3` is a `Copy` value: every operation returns a new vector and the
//! receiver is never mutated, so chained calls cannot alias each other.
//! Rotations are right-handed and applied in call order, i.e.
//! `v.rotate_x(a).rotate_z(b)` is `R_z(b) · R_x(a) · v`.

use std::fmt;
use std::ops::{Add, Mul, Neg};

use nalgebra::{Rotation3, Unit, Vector3 as NaVector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm; zero for the zero vector.
    pub fn length(self) -> f64 {
        self.to_na().norm()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn try_normalize(self) -> Option<Self> {
        self.to_na().try_normalize(0.0).map(Self::from)
    }

    pub fn dot(self, other: Vector3) -> f64 {
        self.to_na().dot(&other.to_na())
    }

    pub fn rotate_x(self, angle: f64) -> Self {
        self.rotate(NaVector3::x_axis(), angle)
    }

    pub fn rotate_y(self, angle: f64) -> Self {
        self.rotate(NaVector3::y_axis(), angle)
    }

    pub fn rotate_z(self, angle: f64) -> Self {
        self.rotate(NaVector3::z_axis(), angle)
    }

    fn rotate(self, axis: Unit<NaVector3<f64>>, angle: f64) -> Self {
        Self::from(Rotation3::from_axis_angle(&axis, angle) * self.to_na())
    }

    fn to_na(self) -> NaVector3<f64> {
        NaVector3::new(self.x, self.y, self.z)
    }
}

impl From<NaVector3<f64>> for Vector3 {
    fn from(v: NaVector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for NaVector3<f64> {
    fn from(v: Vector3) -> Self {
        v.to_na()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, scale: f64) -> Vector3 {
        Vector3::new(self.x * scale, self.y * scale, self.z * scale)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        self * -1.0
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{},{}>", self.x, self.y, self.z)
    }
}
