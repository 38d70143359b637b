use std::{fmt, ops};

use serde::{Deserialize, Serialize};

/// A duration, in seconds. Always finite; construction from NaN or an infinity panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration(f64);

impl Duration {
    pub const ZERO: Duration = Duration::const_seconds(0.0);
    /// An effectively infinite duration, expressing that something never happens. Code compares
    /// against this exactly; no arithmetic is ever done on it.
    pub const MAX: Duration = Duration::const_seconds(f64::MAX);

    pub fn seconds(value: f64) -> Duration {
        if !value.is_finite() {
            panic!("Bad Duration {}", value);
        }
        Duration(value)
    }

    pub const fn const_seconds(value: f64) -> Duration {
        Duration(value)
    }

    pub fn inner_seconds(self) -> f64 {
        self.0
    }

    pub fn max(self, other: Duration) -> Duration {
        if self >= other {
            self
        } else {
            other
        }
    }

    pub fn min(self, other: Duration) -> Duration {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// True if the value lies in the range accepted from the outside world: [0, 100] seconds.
    pub fn within_input_range(self) -> bool {
        Duration::ZERO <= self && self <= Duration::const_seconds(100.0)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Duration::MAX {
            write!(f, "forever")
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

impl ops::Add<Duration> for Duration {
    type Output = Duration;

    fn add(self, other: Duration) -> Duration {
        Duration::seconds(self.0 + other.0)
    }
}

impl ops::Sub<Duration> for Duration {
    type Output = Duration;

    fn sub(self, other: Duration) -> Duration {
        Duration::seconds(self.0 - other.0)
    }
}

impl ops::Mul<f64> for Duration {
    type Output = Duration;

    fn mul(self, scalar: f64) -> Duration {
        Duration::seconds(self.0 * scalar)
    }
}

impl ops::Mul<Duration> for f64 {
    type Output = Duration;

    fn mul(self, other: Duration) -> Duration {
        Duration::seconds(self * other.0)
    }
}
