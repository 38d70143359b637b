use std::{fmt, ops};

use serde::{Deserialize, Serialize};

use crate::{Duration, Speed};

/// A distance, in meters. Always a finite number; constructing one from NaN or an infinity
/// panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Distance(f64);

impl Distance {
    pub const ZERO: Distance = Distance::const_meters(0.0);

    pub fn meters(value: f64) -> Distance {
        if !value.is_finite() {
            panic!("Bad Distance {}", value);
        }
        Distance(value)
    }

    pub const fn const_meters(value: f64) -> Distance {
        Distance(value)
    }

    pub fn inner_meters(self) -> f64 {
        self.0
    }

    pub fn abs(self) -> Distance {
        Distance(self.0.abs())
    }

    pub fn max(self, other: Distance) -> Distance {
        if self >= other {
            self
        } else {
            other
        }
    }

    pub fn min(self, other: Distance) -> Distance {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// True if the value lies in the range accepted from the outside world: [0, 10^6] meters.
    pub fn within_input_range(self) -> bool {
        Distance::ZERO <= self && self <= Distance::const_meters(1_000_000.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl ops::Add<Distance> for Distance {
    type Output = Distance;

    fn add(self, other: Distance) -> Distance {
        Distance::meters(self.0 + other.0)
    }
}

impl ops::AddAssign<Distance> for Distance {
    fn add_assign(&mut self, other: Distance) {
        *self = *self + other;
    }
}

impl ops::Sub<Distance> for Distance {
    type Output = Distance;

    fn sub(self, other: Distance) -> Distance {
        Distance::meters(self.0 - other.0)
    }
}

impl ops::Neg for Distance {
    type Output = Distance;

    fn neg(self) -> Distance {
        Distance(-self.0)
    }
}

impl ops::Mul<f64> for Distance {
    type Output = Distance;

    fn mul(self, scalar: f64) -> Distance {
        Distance::meters(self.0 * scalar)
    }
}

impl ops::Mul<Distance> for f64 {
    type Output = Distance;

    fn mul(self, other: Distance) -> Distance {
        Distance::meters(self * other.0)
    }
}

impl ops::Div<Speed> for Distance {
    type Output = Duration;

    fn div(self, speed: Speed) -> Duration {
        if speed == Speed::ZERO {
            panic!("Can't divide {} by {}", self, speed);
        }
        Duration::seconds(self.0 / speed.inner_meters_per_sec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_range() {
        assert!(Distance::ZERO.within_input_range());
        assert!(Distance::meters(1_000_000.0).within_input_range());
        assert!(!Distance::meters(-0.1).within_input_range());
        assert!(!Distance::meters(1_000_000.1).within_input_range());
    }

    #[test]
    #[should_panic]
    fn reject_nan() {
        Distance::meters(f64::NAN);
    }
}
