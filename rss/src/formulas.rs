//! The situation-level safety predicates: thin wrappers picking the worst-case bound from each
//! vehicle's speed range and dynamics, then comparing against the actual geometry. Safety is
//! always strict; a gap exactly equal to the required one doesn't count.

use anyhow::Result;

use kinematics::{math, Distance};

use crate::situation::VehicleState;

/// The outcome of one predicate: the margin the rule demands, and whether the current geometry
/// clears it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafetyCheck {
    pub is_safe: bool,
    pub safe_distance: Distance,
}

/// Can this vehicle still come to a standstill before entering the intersection, even when it
/// accelerates through its whole response time first?
pub fn check_stop_in_front_intersection(vehicle: &VehicleState) -> Result<SafetyCheck> {
    let safe_distance = math::worst_case_stopping_distance(
        vehicle.velocity.speed_lon.maximum,
        vehicle.dynamics.response_time,
        vehicle.dynamics.alpha_lon.accel_max,
        vehicle.dynamics.alpha_lon.brake_min,
    )?;
    Ok(SafetyCheck {
        is_safe: safe_distance < vehicle.distance_to_enter_intersection,
        safe_distance,
    })
}

/// Is the gap between a leader and its follower big enough that the follower can always avoid
/// rear-ending the leader? Worst case for the leader is its slowest speed (it stops soonest);
/// worst case for the follower is its fastest.
pub fn check_safe_longitudinal_distance_same_direction(
    leader: &VehicleState,
    follower: &VehicleState,
    current_distance: Distance,
) -> Result<SafetyCheck> {
    let safe_distance = math::safe_longitudinal_distance_same_direction(
        leader.velocity.speed_lon.minimum,
        follower.velocity.speed_lon.maximum,
        follower.dynamics.response_time,
        follower.dynamics.alpha_lon.accel_max,
        follower.dynamics.alpha_lon.brake_min,
        leader.dynamics.alpha_lon.brake_max,
    )?;
    Ok(SafetyCheck {
        is_safe: current_distance > safe_distance,
        safe_distance,
    })
}

/// Is the gap between two vehicles driving towards each other big enough for both to stop?
/// In its correct lane the ego may count on its gentler `brake_min_correct`.
pub fn check_safe_longitudinal_distance_opposite_direction(
    ego: &VehicleState,
    other: &VehicleState,
    current_distance: Distance,
) -> Result<SafetyCheck> {
    let ego_brake = if ego.is_in_correct_lane {
        ego.dynamics.alpha_lon.brake_min_correct
    } else {
        ego.dynamics.alpha_lon.brake_min
    };
    let safe_distance = math::safe_longitudinal_distance_opposite_direction(
        ego.velocity.speed_lon.maximum,
        ego.dynamics.response_time,
        ego.dynamics.alpha_lon.accel_max,
        ego_brake,
        other.velocity.speed_lon.maximum,
        other.dynamics.response_time,
        other.dynamics.alpha_lon.accel_max,
        other.dynamics.alpha_lon.brake_min,
    )?;
    Ok(SafetyCheck {
        is_safe: current_distance > safe_distance,
        safe_distance,
    })
}

/// Is the lateral gap between a left and a right vehicle big enough? Worst case, the left
/// vehicle drifts right as fast as it might and the right vehicle drifts left; both fluctuation
/// margins apply.
pub fn check_safe_lateral_distance(
    left: &VehicleState,
    right: &VehicleState,
    current_distance: Distance,
) -> Result<SafetyCheck> {
    // The evaluation is pairwise, so a shared response time: whoever reacts slower bounds both.
    let response_time = left.dynamics.response_time.max(right.dynamics.response_time);
    let safe_distance = math::safe_lateral_distance(
        left.velocity.speed_lat.maximum,
        left.dynamics.alpha_lat.accel_max,
        left.dynamics.alpha_lat.brake_min,
        right.velocity.speed_lat.minimum,
        right.dynamics.alpha_lat.accel_max,
        right.dynamics.alpha_lat.brake_min,
        response_time,
        left.dynamics.lateral_fluctuation_margin + right.dynamics.lateral_fluctuation_margin,
    )?;
    Ok(SafetyCheck {
        is_safe: current_distance > safe_distance,
        safe_distance,
    })
}

#[cfg(test)]
mod tests {
    use kinematics::{Acceleration, Distance, Duration, Speed};

    use crate::situation::{
        AccelerationRestriction, SpeedRange, VehicleDynamics, VehicleState, VelocityRange,
    };

    use super::*;

    fn standard_vehicle(speed_lon: f64, enter: f64, leave: f64) -> VehicleState {
        let restriction = AccelerationRestriction {
            accel_max: Acceleration::meters_per_sec_squared(2.0),
            brake_max: Acceleration::meters_per_sec_squared(8.0),
            brake_min: Acceleration::meters_per_sec_squared(4.0),
            brake_min_correct: Acceleration::meters_per_sec_squared(4.0),
        };
        VehicleState {
            dynamics: VehicleDynamics {
                response_time: Duration::seconds(1.0),
                alpha_lon: restriction,
                alpha_lat: restriction,
                lateral_fluctuation_margin: Distance::ZERO,
            },
            velocity: VelocityRange {
                speed_lon: SpeedRange::fixed(Speed::meters_per_sec(speed_lon)),
                speed_lat: SpeedRange::fixed(Speed::ZERO),
            },
            distance_to_enter_intersection: Distance::meters(enter),
            distance_to_leave_intersection: Distance::meters(leave),
            has_priority: false,
            is_in_correct_lane: true,
        }
    }

    #[test]
    fn stop_in_front_compares_strictly() {
        // 5m/s with the standard dynamics needs exactly 12.125m to halt
        let can_stop = check_stop_in_front_intersection(&standard_vehicle(5.0, 40.0, 50.0))
            .unwrap();
        assert!(can_stop.is_safe);
        assert_eq!(can_stop.safe_distance, Distance::meters(12.125));

        // A margin exactly equal to the stopping distance isn't good enough
        let exact = check_stop_in_front_intersection(&standard_vehicle(5.0, 12.125, 50.0))
            .unwrap();
        assert!(!exact.is_safe);
    }

    #[test]
    fn same_direction_compares_strictly() {
        let leader = standard_vehicle(10.0, 0.0, 0.0);
        let follower = standard_vehicle(10.0, 0.0, 0.0);

        let far = check_safe_longitudinal_distance_same_direction(
            &leader,
            &follower,
            Distance::meters(100.0),
        )
        .unwrap();
        assert!(far.is_safe);
        assert_eq!(far.safe_distance, Distance::meters(22.75));

        let exact = check_safe_longitudinal_distance_same_direction(
            &leader,
            &follower,
            Distance::meters(22.75),
        )
        .unwrap();
        assert!(!exact.is_safe);
    }

    #[test]
    fn opposite_direction_uses_correct_lane_brake() {
        let mut ego = standard_vehicle(10.0, 0.0, 0.0);
        let other = standard_vehicle(10.0, 0.0, 0.0);

        let correct = check_safe_longitudinal_distance_opposite_direction(
            &ego,
            &other,
            Distance::meters(60.0),
        )
        .unwrap();
        assert_eq!(correct.safe_distance, Distance::meters(58.0));
        assert!(correct.is_safe);

        // Off its lane, the ego must assume only the harder brake_min... which happens to be
        // equal in the standard dynamics, so soften brake_min_correct first to see an effect.
        ego.dynamics.alpha_lon.brake_min_correct = Acceleration::meters_per_sec_squared(2.0);
        let gentler = check_safe_longitudinal_distance_opposite_direction(
            &ego,
            &other,
            Distance::meters(60.0),
        )
        .unwrap();
        // Braking gentler means travelling further: 11m response + 36m to stop from 12m/s
        assert_eq!(gentler.safe_distance, Distance::meters(11.0 + 36.0 + 29.0));
        assert!(!gentler.is_safe);

        ego.is_in_correct_lane = false;
        let off_lane = check_safe_longitudinal_distance_opposite_direction(
            &ego,
            &other,
            Distance::meters(60.0),
        )
        .unwrap();
        assert_eq!(off_lane.safe_distance, Distance::meters(58.0));
    }

    #[test]
    fn lateral_distance_includes_both_margins() {
        let mut left = standard_vehicle(10.0, 0.0, 0.0);
        let mut right = standard_vehicle(10.0, 0.0, 0.0);
        left.dynamics.lateral_fluctuation_margin = Distance::meters(0.25);
        right.dynamics.lateral_fluctuation_margin = Distance::meters(0.25);
        // Neither vehicle is drifting; the bound reduces to the response-time closure
        let check =
            check_safe_lateral_distance(&left, &right, Distance::meters(10.0)).unwrap();
        assert!(check.is_safe);
        // Each side accelerates to 2m/s laterally during response: 1m travelled, then 0.5m to
        // stop, plus the two margins
        assert_eq!(check.safe_distance, Distance::meters(0.5 + 2.0 * 1.5));
    }
}
