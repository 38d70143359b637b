//! Applies the safety rules to whole situations, whatever their geometry. Same-direction and
//! opposite-direction situations are plain compositions of the distance predicates;
//! intersections delegate to the stateful checker.

use anyhow::{bail, Result};

use kinematics::{Distance, TimeIndex};

use crate::formulas::{
    check_safe_lateral_distance, check_safe_longitudinal_distance_opposite_direction,
    check_safe_longitudinal_distance_same_direction, SafetyCheck,
};
use crate::intersection::RssIntersectionChecker;
use crate::situation::{
    LateralRelativePosition, LongitudinalRelativePosition, Situation, SituationType,
};
use crate::state::{
    LateralResponse, LateralRssState, LongitudinalResponse, LongitudinalRssState, RssState,
    RssStateEvaluator, RssStateInformation,
};

fn longitudinal_state(
    check: SafetyCheck,
    current_distance: Distance,
    evaluator: RssStateEvaluator,
    response_when_unsafe: LongitudinalResponse,
) -> LongitudinalRssState {
    LongitudinalRssState {
        is_safe: check.is_safe,
        response: if check.is_safe {
            LongitudinalResponse::None
        } else {
            response_when_unsafe
        },
        rss_state_information: RssStateInformation {
            safe_distance: check.safe_distance,
            current_distance,
            evaluator,
        },
    }
}

fn lateral_state(check: SafetyCheck, current_distance: Distance) -> LateralRssState {
    LateralRssState {
        is_safe: check.is_safe,
        response: if check.is_safe {
            LateralResponse::None
        } else {
            LateralResponse::BrakeMin
        },
        rss_state_information: RssStateInformation {
            safe_distance: check.safe_distance,
            current_distance,
            evaluator: RssStateEvaluator::LateralDistance,
        },
    }
}

/// The lateral verdict pair for a situation: the side facing the other vehicle gets the real
/// distance check, the far side is trivially clear. Vehicles already overlapping laterally
/// can't restore the gap, so both sides are unsafe and lateral motion has to stop.
fn calculate_lateral_states(situation: &Situation) -> Result<(LateralRssState, LateralRssState)> {
    let ego = &situation.ego_vehicle_state;
    let other = &situation.other_vehicle_state;
    let lateral_distance = situation.relative_position.lateral_distance;

    match situation.relative_position.lateral_position {
        LateralRelativePosition::AtLeft => {
            let check = check_safe_lateral_distance(ego, other, lateral_distance)?;
            Ok((
                LateralRssState::clear_side(),
                lateral_state(check, lateral_distance),
            ))
        }
        LateralRelativePosition::AtRight => {
            let check = check_safe_lateral_distance(other, ego, lateral_distance)?;
            Ok((
                lateral_state(check, lateral_distance),
                LateralRssState::clear_side(),
            ))
        }
        LateralRelativePosition::OverlapLeft
        | LateralRelativePosition::Overlap
        | LateralRelativePosition::OverlapRight => {
            let overlapping = LateralRssState {
                is_safe: false,
                response: LateralResponse::BrakeMin,
                rss_state_information: RssStateInformation::empty(
                    RssStateEvaluator::LateralDistance,
                ),
            };
            Ok((overlapping, overlapping))
        }
    }
}

/// The verdict for two vehicles moving the same direction in neighboring or shared lanes.
pub fn calculate_same_direction(situation: &Situation) -> Result<RssState> {
    let current_distance = situation.relative_position.longitudinal_distance;
    let check = if situation.relative_position.longitudinal_position
        == LongitudinalRelativePosition::InFront
    {
        check_safe_longitudinal_distance_same_direction(
            &situation.ego_vehicle_state,
            &situation.other_vehicle_state,
            current_distance,
        )?
    } else {
        check_safe_longitudinal_distance_same_direction(
            &situation.other_vehicle_state,
            &situation.ego_vehicle_state,
            current_distance,
        )?
    };

    let (lateral_state_left, lateral_state_right) = calculate_lateral_states(situation)?;
    Ok(RssState {
        longitudinal_state: longitudinal_state(
            check,
            current_distance,
            RssStateEvaluator::LongitudinalDistance,
            LongitudinalResponse::BrakeMin,
        ),
        lateral_state_left,
        lateral_state_right,
    })
}

/// The verdict for two vehicles driving towards each other. An ego in its correct lane only
/// owes its gentler correct-lane braking when the gap collapses.
pub fn calculate_opposite_direction(situation: &Situation) -> Result<RssState> {
    let current_distance = situation.relative_position.longitudinal_distance;
    let check = check_safe_longitudinal_distance_opposite_direction(
        &situation.ego_vehicle_state,
        &situation.other_vehicle_state,
        current_distance,
    )?;

    let (evaluator, response_when_unsafe) = if situation.ego_vehicle_state.is_in_correct_lane {
        (
            RssStateEvaluator::LongitudinalDistanceOppositeDirectionEgoCorrectLane,
            LongitudinalResponse::BrakeMinCorrect,
        )
    } else {
        (
            RssStateEvaluator::LongitudinalDistanceOppositeDirection,
            LongitudinalResponse::BrakeMin,
        )
    };

    let (lateral_state_left, lateral_state_right) = calculate_lateral_states(situation)?;
    Ok(RssState {
        longitudinal_state: longitudinal_state(
            check,
            current_distance,
            evaluator,
            response_when_unsafe,
        ),
        lateral_state_left,
        lateral_state_right,
    })
}

/// Evaluates any situation, step by step. This is the crate's main entry point; it owns the
/// intersection memory and validates everything coming in from the outside world.
pub struct RssSituationChecking {
    intersection_checker: RssIntersectionChecker,
}

impl RssSituationChecking {
    pub fn new() -> RssSituationChecking {
        RssSituationChecking {
            intersection_checker: RssIntersectionChecker::new(),
        }
    }

    pub fn check_situation(
        &mut self,
        time_index: TimeIndex,
        situation: &Situation,
    ) -> Result<RssState> {
        if !time_index.within_input_range() {
            bail!("time index 0 is reserved for \"unset\"");
        }
        if !situation.within_input_range() {
            warn!(
                "situation {:?} rejected: input out of range",
                situation.situation_id
            );
            bail!("situation input out of range");
        }

        match situation.situation_type {
            SituationType::NotRelevant => Ok(RssState::all_safe()),
            SituationType::SameDirection => calculate_same_direction(situation),
            SituationType::OppositeDirection => calculate_opposite_direction(situation),
            SituationType::IntersectionEgoHasPriority
            | SituationType::IntersectionObjectHasPriority
            | SituationType::IntersectionSamePriority => self
                .intersection_checker
                .calculate_rss_state_intersection(time_index, situation),
        }
    }
}

impl Default for RssSituationChecking {
    fn default() -> Self {
        RssSituationChecking::new()
    }
}

#[cfg(test)]
mod tests {
    use kinematics::{Acceleration, Duration, Speed};

    use crate::situation::{
        AccelerationRestriction, ObjectId, RelativePosition, SituationId, SpeedRange,
        VehicleDynamics, VehicleState, VelocityRange,
    };

    use super::*;

    fn vehicle(speed_lon: f64, speed_lat: f64) -> VehicleState {
        let restriction = AccelerationRestriction {
            accel_max: Acceleration::meters_per_sec_squared(2.0),
            brake_max: Acceleration::meters_per_sec_squared(8.0),
            brake_min: Acceleration::meters_per_sec_squared(4.0),
            brake_min_correct: Acceleration::meters_per_sec_squared(3.0),
        };
        VehicleState {
            dynamics: VehicleDynamics {
                response_time: Duration::seconds(1.0),
                alpha_lon: restriction,
                alpha_lat: restriction,
                lateral_fluctuation_margin: Distance::meters(0.1),
            },
            velocity: VelocityRange {
                speed_lon: SpeedRange::fixed(Speed::meters_per_sec(speed_lon)),
                speed_lat: SpeedRange::fixed(Speed::meters_per_sec(speed_lat)),
            },
            distance_to_enter_intersection: Distance::ZERO,
            distance_to_leave_intersection: Distance::ZERO,
            has_priority: false,
            is_in_correct_lane: true,
        }
    }

    fn situation(
        situation_type: SituationType,
        ego: VehicleState,
        other: VehicleState,
        longitudinal_position: LongitudinalRelativePosition,
        longitudinal_distance: f64,
        lateral_position: LateralRelativePosition,
        lateral_distance: f64,
    ) -> Situation {
        Situation {
            situation_id: SituationId(1),
            object_id: ObjectId(7),
            situation_type,
            ego_vehicle_state: ego,
            other_vehicle_state: other,
            relative_position: RelativePosition {
                longitudinal_position,
                longitudinal_distance: Distance::meters(longitudinal_distance),
                lateral_position,
                lateral_distance: Distance::meters(lateral_distance),
            },
        }
    }

    #[test]
    fn same_direction_leader_follower_by_position() {
        // Ego in front with plenty of room
        let sit = situation(
            SituationType::SameDirection,
            vehicle(10.0, 0.0),
            vehicle(10.0, 0.0),
            LongitudinalRelativePosition::InFront,
            100.0,
            LateralRelativePosition::AtLeft,
            5.0,
        );
        let state = calculate_same_direction(&sit).unwrap();
        assert!(state.longitudinal_state.is_safe);
        assert_eq!(
            state.longitudinal_state.rss_state_information.evaluator,
            RssStateEvaluator::LongitudinalDistance
        );
        // Conflict side is the ego's right; the left is clear
        assert!(state.lateral_state_left.is_safe);
        assert_eq!(
            state.lateral_state_left.rss_state_information.evaluator,
            RssStateEvaluator::None
        );
        assert_eq!(
            state.lateral_state_right.rss_state_information.evaluator,
            RssStateEvaluator::LateralDistance
        );

        // Too close from behind: brake
        let sit = situation(
            SituationType::SameDirection,
            vehicle(10.0, 0.0),
            vehicle(10.0, 0.0),
            LongitudinalRelativePosition::AtBack,
            5.0,
            LateralRelativePosition::AtLeft,
            5.0,
        );
        let state = calculate_same_direction(&sit).unwrap();
        assert!(!state.longitudinal_state.is_safe);
        assert_eq!(
            state.longitudinal_state.response,
            LongitudinalResponse::BrakeMin
        );
    }

    #[test]
    fn lateral_overlap_stops_lateral_motion() {
        let sit = situation(
            SituationType::SameDirection,
            vehicle(10.0, 0.0),
            vehicle(10.0, 0.0),
            LongitudinalRelativePosition::AtBack,
            5.0,
            LateralRelativePosition::Overlap,
            0.0,
        );
        let state = calculate_same_direction(&sit).unwrap();
        assert!(!state.lateral_state_left.is_safe);
        assert!(!state.lateral_state_right.is_safe);
        assert_eq!(state.lateral_state_left.response, LateralResponse::BrakeMin);
        assert_eq!(
            state.lateral_state_right.response,
            LateralResponse::BrakeMin
        );
    }

    #[test]
    fn opposite_direction_response_depends_on_lane() {
        // Head-on, both at 10m/s, ego in its correct lane: brake_min_correct = 3, so the ego
        // travels 11 + 144/6 = 35m worst case, the other 11 + 18 = 29m
        let close = situation(
            SituationType::OppositeDirection,
            vehicle(10.0, 0.0),
            vehicle(10.0, 0.0),
            LongitudinalRelativePosition::InFront,
            60.0,
            LateralRelativePosition::AtLeft,
            5.0,
        );
        let state = calculate_opposite_direction(&close).unwrap();
        assert!(!state.longitudinal_state.is_safe);
        assert_eq!(
            state.longitudinal_state.rss_state_information.safe_distance,
            Distance::meters(64.0)
        );
        assert_eq!(
            state.longitudinal_state.rss_state_information.evaluator,
            RssStateEvaluator::LongitudinalDistanceOppositeDirectionEgoCorrectLane
        );
        assert_eq!(
            state.longitudinal_state.response,
            LongitudinalResponse::BrakeMinCorrect
        );

        let mut off_lane = close;
        off_lane.ego_vehicle_state.is_in_correct_lane = false;
        let state = calculate_opposite_direction(&off_lane).unwrap();
        // Off its lane the ego must promise the harder brake, which shrinks the bound below
        // the current gap
        assert_eq!(
            state.longitudinal_state.rss_state_information.safe_distance,
            Distance::meters(58.0)
        );
        assert_eq!(
            state.longitudinal_state.rss_state_information.evaluator,
            RssStateEvaluator::LongitudinalDistanceOppositeDirection
        );
        assert!(state.longitudinal_state.is_safe);
        assert_eq!(
            state.longitudinal_state.response,
            LongitudinalResponse::None
        );
    }

    #[test]
    fn not_relevant_is_all_safe() {
        let mut checking = RssSituationChecking::new();
        let sit = situation(
            SituationType::NotRelevant,
            vehicle(10.0, 0.0),
            vehicle(10.0, 0.0),
            LongitudinalRelativePosition::InFront,
            100.0,
            LateralRelativePosition::AtLeft,
            5.0,
        );
        let state = checking.check_situation(TimeIndex(1), &sit).unwrap();
        assert!(state.is_safe());
        assert_eq!(
            state.longitudinal_state.response,
            LongitudinalResponse::None
        );
    }

    #[test]
    fn ingress_validation() {
        let mut checking = RssSituationChecking::new();
        let sit = situation(
            SituationType::SameDirection,
            vehicle(10.0, 0.0),
            vehicle(10.0, 0.0),
            LongitudinalRelativePosition::InFront,
            100.0,
            LateralRelativePosition::AtLeft,
            5.0,
        );
        assert!(checking.check_situation(TimeIndex::UNSET, &sit).is_err());

        let mut out_of_range = sit;
        out_of_range.ego_vehicle_state.velocity.speed_lon =
            SpeedRange::fixed(Speed::meters_per_sec(150.0));
        assert!(checking.check_situation(TimeIndex(1), &out_of_range).is_err());
    }
}
