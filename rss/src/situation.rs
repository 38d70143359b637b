//! The input model: one `Situation` describes the ego vehicle and one other road user at a
//! single evaluation step, reduced to the distances and kinematic envelopes the safety rules
//! reason about. The surrounding world-model extraction produces these; this crate only
//! consumes them.
//!
//! Every type carries a `within_input_range` predicate checking the value ranges and structural
//! invariants accepted from the outside world. Callers validate on ingress; the evaluation
//! itself doesn't re-check.

use kinematics::{Acceleration, Distance, Duration, Speed};
use serde::{Deserialize, Serialize};

/// Identifies one pairwise ego-versus-other evaluation context across evaluation steps. The
/// caller must keep this stable while the same conflict persists; the per-situation memory is
/// keyed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SituationId(pub u64);

/// Identifies the other road user a situation refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// A range of possible speeds, expressing measurement uncertainty. The safety rules pick
/// whichever bound is worst for the question at hand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub minimum: Speed,
    pub maximum: Speed,
}

impl SpeedRange {
    /// A range collapsed to one exactly known speed.
    pub fn fixed(speed: Speed) -> SpeedRange {
        SpeedRange {
            minimum: speed,
            maximum: speed,
        }
    }

    pub fn within_input_range(&self) -> bool {
        self.minimum.within_input_range()
            && self.maximum.within_input_range()
            && self.minimum <= self.maximum
    }
}

/// The acceleration envelope promised (or assumed) along one axis. All four values are
/// magnitudes; the formulas supply the sign.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccelerationRestriction {
    /// The worst acceleration to assume during the response time.
    pub accel_max: Acceleration,
    /// The hardest braking the other party might apply.
    pub brake_max: Acceleration,
    /// The braking this vehicle promises to at least apply when it must.
    pub brake_min: Acceleration,
    /// The gentler minimum braking allowed while driving in the correct lane.
    pub brake_min_correct: Acceleration,
}

impl AccelerationRestriction {
    pub fn within_input_range(&self) -> bool {
        self.accel_max.within_input_range()
            && self.brake_max.within_input_range()
            && self.brake_min.within_input_range()
            && self.brake_min_correct.within_input_range()
            && self.accel_max >= Acceleration::ZERO
            && self.brake_max >= self.brake_min
            && self.brake_min >= self.brake_min_correct
            && self.brake_min_correct > Acceleration::ZERO
    }
}

/// The per-vehicle parameters the safety rules depend on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleDynamics {
    /// Worst-case delay before the vehicle's controller begins the intended braking maneuver.
    pub response_time: Duration,
    pub alpha_lon: AccelerationRestriction,
    pub alpha_lat: AccelerationRestriction,
    /// Lateral wobble the vehicle can't avoid even when driving straight.
    pub lateral_fluctuation_margin: Distance,
}

impl VehicleDynamics {
    pub fn within_input_range(&self) -> bool {
        self.response_time.within_input_range()
            && self.response_time >= Duration::ZERO
            && self.alpha_lon.within_input_range()
            && self.alpha_lat.within_input_range()
            && self.lateral_fluctuation_margin.within_input_range()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VelocityRange {
    pub speed_lon: SpeedRange,
    pub speed_lat: SpeedRange,
}

impl VelocityRange {
    pub fn within_input_range(&self) -> bool {
        self.speed_lon.within_input_range() && self.speed_lat.within_input_range()
    }
}

/// One vehicle's kinematic snapshot, as seen by the safety rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub dynamics: VehicleDynamics,
    pub velocity: VelocityRange,
    /// Along the vehicle's own path.
    pub distance_to_enter_intersection: Distance,
    /// Also along the vehicle's own path; never smaller than the distance to enter.
    pub distance_to_leave_intersection: Distance,
    /// Right-of-way at the intersection. At most one of the two vehicles in a situation may
    /// claim this.
    pub has_priority: bool,
    pub is_in_correct_lane: bool,
}

impl VehicleState {
    pub fn within_input_range(&self) -> bool {
        self.dynamics.within_input_range()
            && self.velocity.within_input_range()
            && self.distance_to_enter_intersection.within_input_range()
            && self.distance_to_leave_intersection.within_input_range()
            && self.distance_to_enter_intersection <= self.distance_to_leave_intersection
    }
}

/// Where the ego vehicle sits along the driving direction, relative to the other vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LongitudinalRelativePosition {
    InFront,
    AtBack,
    Overlap,
}

/// Where the ego vehicle sits across the driving direction, relative to the other vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LateralRelativePosition {
    /// Fully to the left, but the gap is partly consumed by overlap.
    OverlapLeft,
    /// Fully to the left with clear separation.
    AtLeft,
    Overlap,
    /// Fully to the right with clear separation.
    AtRight,
    /// Fully to the right, but the gap is partly consumed by overlap.
    OverlapRight,
}

/// The geometric relation between the two vehicles. Distances are edge-to-edge and never
/// negative; overlap positions carry a zero distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelativePosition {
    pub longitudinal_position: LongitudinalRelativePosition,
    pub longitudinal_distance: Distance,
    pub lateral_position: LateralRelativePosition,
    pub lateral_distance: Distance,
}

impl RelativePosition {
    pub fn within_input_range(&self) -> bool {
        self.longitudinal_distance.within_input_range()
            && self.lateral_distance.within_input_range()
            && self.longitudinal_distance >= Distance::ZERO
            && self.lateral_distance >= Distance::ZERO
    }
}

/// Which family of safety rules applies to a situation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SituationType {
    /// The other road user can't conflict with the ego vehicle at all.
    NotRelevant,
    SameDirection,
    OppositeDirection,
    IntersectionEgoHasPriority,
    IntersectionObjectHasPriority,
    IntersectionSamePriority,
}

/// A single pairwise ego-versus-other evaluation context at one evaluation step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Situation {
    pub situation_id: SituationId,
    /// The other road user this situation describes, for aggregating responses over all
    /// situations afterwards.
    pub object_id: ObjectId,
    pub situation_type: SituationType,
    pub ego_vehicle_state: VehicleState,
    pub other_vehicle_state: VehicleState,
    pub relative_position: RelativePosition,
}

impl Situation {
    pub fn within_input_range(&self) -> bool {
        self.ego_vehicle_state.within_input_range()
            && self.other_vehicle_state.within_input_range()
            && self.relative_position.within_input_range()
    }
}

#[cfg(test)]
mod tests {
    use kinematics::{Acceleration, Distance, Duration, Speed};

    use super::*;

    fn standard_restriction() -> AccelerationRestriction {
        AccelerationRestriction {
            accel_max: Acceleration::meters_per_sec_squared(2.0),
            brake_max: Acceleration::meters_per_sec_squared(8.0),
            brake_min: Acceleration::meters_per_sec_squared(4.0),
            brake_min_correct: Acceleration::meters_per_sec_squared(4.0),
        }
    }

    #[test]
    fn speed_range_ordering() {
        assert!(!SpeedRange {
            minimum: Speed::meters_per_sec(5.0),
            maximum: Speed::meters_per_sec(3.0),
        }
        .within_input_range());
        assert!(SpeedRange::fixed(Speed::meters_per_sec(5.0)).within_input_range());
    }

    #[test]
    fn restriction_ordering() {
        assert!(standard_restriction().within_input_range());

        let mut bad = standard_restriction();
        bad.brake_min = Acceleration::meters_per_sec_squared(9.0);
        assert!(!bad.within_input_range());

        let mut zero_brake = standard_restriction();
        zero_brake.brake_min_correct = Acceleration::ZERO;
        assert!(!zero_brake.within_input_range());
    }

    #[test]
    fn vehicle_must_enter_before_leaving() {
        let vehicle = VehicleState {
            dynamics: VehicleDynamics {
                response_time: Duration::seconds(1.0),
                alpha_lon: standard_restriction(),
                alpha_lat: standard_restriction(),
                lateral_fluctuation_margin: Distance::ZERO,
            },
            velocity: VelocityRange {
                speed_lon: SpeedRange::fixed(Speed::meters_per_sec(10.0)),
                speed_lat: SpeedRange::fixed(Speed::ZERO),
            },
            distance_to_enter_intersection: Distance::meters(20.0),
            distance_to_leave_intersection: Distance::meters(10.0),
            has_priority: false,
            is_in_correct_lane: true,
        };
        assert!(!vehicle.within_input_range());
    }
}
