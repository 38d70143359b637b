use std::{fmt, ops};

use serde::{Deserialize, Serialize};

use crate::{Duration, Speed};

/// An acceleration, in meters per second squared. Negative values brake, positive values speed
/// up. Always finite; construction from NaN or an infinity panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Acceleration(f64);

impl Acceleration {
    pub const ZERO: Acceleration = Acceleration::const_meters_per_sec_squared(0.0);

    pub fn meters_per_sec_squared(value: f64) -> Acceleration {
        if !value.is_finite() {
            panic!("Bad Acceleration {}", value);
        }
        Acceleration(value)
    }

    pub const fn const_meters_per_sec_squared(value: f64) -> Acceleration {
        Acceleration(value)
    }

    pub fn inner_meters_per_sec_squared(self) -> f64 {
        self.0
    }

    /// True if the value lies in the range accepted from the outside world: [-1000, 1000] m/s².
    pub fn within_input_range(self) -> bool {
        Acceleration::const_meters_per_sec_squared(-1000.0) <= self
            && self <= Acceleration::const_meters_per_sec_squared(1000.0)
    }
}

impl fmt::Display for Acceleration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m/s^2", self.0)
    }
}

impl ops::Neg for Acceleration {
    type Output = Acceleration;

    fn neg(self) -> Acceleration {
        Acceleration(-self.0)
    }
}

impl ops::Mul<f64> for Acceleration {
    type Output = Acceleration;

    fn mul(self, scalar: f64) -> Acceleration {
        Acceleration::meters_per_sec_squared(self.0 * scalar)
    }
}

impl ops::Mul<Acceleration> for f64 {
    type Output = Acceleration;

    fn mul(self, other: Acceleration) -> Acceleration {
        Acceleration::meters_per_sec_squared(self * other.0)
    }
}

impl ops::Mul<Duration> for Acceleration {
    type Output = Speed;

    fn mul(self, duration: Duration) -> Speed {
        Speed::meters_per_sec(self.0 * duration.inner_seconds())
    }
}
