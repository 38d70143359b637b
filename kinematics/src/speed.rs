use std::{fmt, ops};

use serde::{Deserialize, Serialize};

use crate::{Acceleration, Distance, Duration};

/// A speed, in meters per second. Positive means moving along the axis the caller measures
/// against; lateral speeds are signed, longitudinal speeds are normally non-negative. Always
/// finite; construction from NaN or an infinity panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Speed(f64);

impl Speed {
    pub const ZERO: Speed = Speed::const_meters_per_sec(0.0);

    pub fn meters_per_sec(value: f64) -> Speed {
        if !value.is_finite() {
            panic!("Bad Speed {}", value);
        }
        Speed(value)
    }

    pub const fn const_meters_per_sec(value: f64) -> Speed {
        Speed(value)
    }

    pub fn inner_meters_per_sec(self) -> f64 {
        self.0
    }

    pub fn abs(self) -> Speed {
        Speed(self.0.abs())
    }

    pub fn max(self, other: Speed) -> Speed {
        if self >= other {
            self
        } else {
            other
        }
    }

    pub fn min(self, other: Speed) -> Speed {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// True if the value lies in the range accepted from the outside world: [-100, 100] m/s.
    pub fn within_input_range(self) -> bool {
        Speed::const_meters_per_sec(-100.0) <= self && self <= Speed::const_meters_per_sec(100.0)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m/s", self.0)
    }
}

impl ops::Add<Speed> for Speed {
    type Output = Speed;

    fn add(self, other: Speed) -> Speed {
        Speed::meters_per_sec(self.0 + other.0)
    }
}

impl ops::Sub<Speed> for Speed {
    type Output = Speed;

    fn sub(self, other: Speed) -> Speed {
        Speed::meters_per_sec(self.0 - other.0)
    }
}

impl ops::Neg for Speed {
    type Output = Speed;

    fn neg(self) -> Speed {
        Speed(-self.0)
    }
}

impl ops::Mul<f64> for Speed {
    type Output = Speed;

    fn mul(self, scalar: f64) -> Speed {
        Speed::meters_per_sec(self.0 * scalar)
    }
}

impl ops::Mul<Speed> for f64 {
    type Output = Speed;

    fn mul(self, other: Speed) -> Speed {
        Speed::meters_per_sec(self * other.0)
    }
}

impl ops::Mul<Duration> for Speed {
    type Output = Distance;

    fn mul(self, duration: Duration) -> Distance {
        Distance::meters(self.0 * duration.inner_seconds())
    }
}

impl ops::Div<Acceleration> for Speed {
    type Output = Duration;

    fn div(self, accel: Acceleration) -> Duration {
        if accel == Acceleration::ZERO {
            panic!("Can't divide {} by {}", self, accel);
        }
        Duration::seconds(self.0 / accel.inner_meters_per_sec_squared())
    }
}
