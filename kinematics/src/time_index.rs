use std::fmt;

use serde::{Deserialize, Serialize};

/// An externally chosen counter identifying one evaluation step. Callers bump it monotonically;
/// the kernel only ever compares indices for equality to detect a new step. 0 is reserved to
/// mean "no step seen yet".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeIndex(pub u64);

impl TimeIndex {
    pub const UNSET: TimeIndex = TimeIndex(0);

    pub fn is_set(self) -> bool {
        self.0 != 0
    }

    /// True if the value is acceptable from the outside world; callers may never pass the
    /// reserved 0.
    pub fn within_input_range(self) -> bool {
        self.is_set()
    }
}

impl fmt::Display for TimeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t#{}", self.0)
    }
}
