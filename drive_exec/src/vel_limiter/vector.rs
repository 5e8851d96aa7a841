//! Body and wheel frame quantities used by VelLimiter

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

use util::maths::saturate;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A body frame velocity or acceleration.
///
/// Units: meters/second and radians/second for a velocity, meters/second^2 and
///        radians/second^2 for an acceleration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Forward component
    pub x: f64,

    /// Angular component, positive turning left
    pub th: f64,
}

/// A pair of per-wheel values (speeds or forces) for the left and right wheels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelPair {
    pub left: f64,
    pub right: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Vector {
    /// The zero vector, which as a command means "stop now".
    pub const ZERO: Vector = Vector { x: 0.0, th: 0.0 };

    pub fn new(x: f64, th: f64) -> Self {
        Self { x, th }
    }

    /// True if this is exactly the zero vector.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.th == 0.0
    }

    /// True if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.th.is_finite()
    }

    /// Saturate both components into the finite range.
    pub fn saturate(self) -> Self {
        Self::new(saturate(self.x), saturate(self.th))
    }

    /// Convert a body velocity into the linear speeds of the two wheels.
    pub fn to_wheels(&self, wheel_separation_m: f64) -> WheelPair {
        let half_diff = self.th * wheel_separation_m * 0.5;

        WheelPair {
            left: self.x - half_diff,
            right: self.x + half_diff,
        }
    }
}

impl WheelPair {
    /// Saturate both wheels into the finite range.
    pub fn saturate(self) -> Self {
        Self {
            left: saturate(self.left),
            right: saturate(self.right),
        }
    }

    /// Convert wheel linear speeds back into a body velocity.
    ///
    /// Inverse of `Vector::to_wheels`.
    pub fn to_body(&self, wheel_separation_m: f64) -> Vector {
        Vector {
            x: 0.5 * (self.left + self.right),
            th: (self.right - self.left) / wheel_separation_m,
        }
    }
}

impl std::ops::Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.th + rhs.th)
    }
}

impl std::ops::Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.th - rhs.th)
    }
}

impl std::ops::Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.th * rhs)
    }
}

impl std::ops::Div<f64> for Vector {
    type Output = Vector;

    fn div(self, rhs: f64) -> Vector {
        Vector::new(self.x / rhs, self.th / rhs)
    }
}
