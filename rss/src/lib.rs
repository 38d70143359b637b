//! Decides whether a pairwise driving situation is safe under the Responsibility-Sensitive
//! Safety (RSS) rules, and which braking response the ego vehicle owes when it isn't. The
//! interesting part is intersections: the checker remembers per situation *why* things were
//! last safe, and softens the required response for one step based on that rationale.
//!
//! This is a pure library: the caller extracts `Situation`s from its world model, feeds them in
//! with a monotonically increasing `TimeIndex`, and gets back one `RssState` per situation (or
//! a `ProperResponse` folded over all of them). No I/O, no clocks, no threads.

#[macro_use]
extern crate log;

mod formulas;
mod intersection;
mod response;
mod situation;
mod situation_checking;
mod state;

pub use crate::formulas::{
    check_safe_lateral_distance, check_safe_longitudinal_distance_opposite_direction,
    check_safe_longitudinal_distance_same_direction, check_stop_in_front_intersection,
    SafetyCheck,
};
pub use crate::intersection::{
    check_intersection_safe, check_lateral_intersect, IntersectionOutcome, IntersectionState,
    RssIntersectionChecker,
};
pub use crate::response::{combine_rss_states, ProperResponse};
pub use crate::situation::{
    AccelerationRestriction, LateralRelativePosition, LongitudinalRelativePosition, ObjectId,
    RelativePosition, Situation, SituationId, SituationType, SpeedRange, VehicleDynamics,
    VehicleState, VelocityRange,
};
pub use crate::situation_checking::{
    calculate_opposite_direction, calculate_same_direction, RssSituationChecking,
};
pub use crate::state::{
    LateralResponse, LateralRssState, LongitudinalResponse, LongitudinalRssState, RssState,
    RssStateEvaluator, RssStateInformation,
};
