//! Safety rules for two paths crossing at an intersection, and the small per-situation memory
//! that decides which braking response an unsafe step requires.
//!
//! The evaluation cascades through three rules, cheapest first, and remembers *how* a situation
//! was last safe. When the margin is lost, the remembered rationale softens the response for
//! exactly one step: a vehicle that could stop, or that was leading with a safe gap, isn't
//! forced to slam the brakes the instant a bound is crossed; one whose safety rested only on
//! time separation is.

use std::collections::BTreeMap;

use anyhow::{bail, Result};

use kinematics::{math, Distance, Duration, TimeIndex};

use crate::formulas::{
    check_safe_longitudinal_distance_same_direction, check_stop_in_front_intersection,
};
use crate::situation::{LongitudinalRelativePosition, Situation, SituationId};
use crate::state::{
    LateralRssState, LongitudinalResponse, LongitudinalRssState, RssState, RssStateEvaluator,
    RssStateInformation,
};

/// Why an intersection situation counted as safe. Remembered per situation for one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntersectionState {
    /// A vehicle without priority can still stop in front of the intersection.
    NonPrioAbleToBreak,
    /// The gap between the vehicles along the path is a safe following distance.
    SafeLongitudinalDistance,
    /// One vehicle is guaranteed gone before the other can possibly arrive.
    NoTimeOverlap,
}

/// Whether a situation is safe, which rule decided, and what that rule compared.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionOutcome {
    /// `Some` exactly when the situation is safe.
    pub safe_state: Option<IntersectionState>,
    pub information: RssStateInformation,
}

/// True if in every admissible future one vehicle has left the intersection before the other
/// one can arrive at it. Arrival is bounded by the fastest speed under the stated braking
/// pattern; leaving is bounded by the slowest speed under full braking through the response
/// time, with only the hard brake available to move afterwards.
pub fn check_lateral_intersect(situation: &Situation) -> Result<bool> {
    let ego = &situation.ego_vehicle_state;
    let other = &situation.other_vehicle_state;

    let time_to_reach_ego = math::time_to_cover_distance(
        ego.velocity.speed_lon.maximum,
        ego.dynamics.response_time,
        ego.dynamics.alpha_lon.accel_max,
        -ego.dynamics.alpha_lon.brake_min,
        ego.distance_to_enter_intersection,
    )?;
    let time_to_reach_other = math::time_to_cover_distance(
        other.velocity.speed_lon.maximum,
        other.dynamics.response_time,
        other.dynamics.alpha_lon.accel_max,
        -other.dynamics.alpha_lon.brake_min,
        other.distance_to_enter_intersection,
    )?;
    let time_to_leave_ego = math::time_to_cover_distance(
        ego.velocity.speed_lon.minimum,
        ego.dynamics.response_time,
        -ego.dynamics.alpha_lon.brake_max,
        ego.dynamics.alpha_lon.brake_max,
        ego.distance_to_leave_intersection,
    )?;
    let time_to_leave_other = math::time_to_cover_distance(
        other.velocity.speed_lon.minimum,
        other.dynamics.response_time,
        -other.dynamics.alpha_lon.brake_max,
        other.dynamics.alpha_lon.brake_max,
        other.distance_to_leave_intersection,
    )?;

    // Lateral overlap inside the intersection is always assumed, so time separation is the only
    // thing that can make this safe.
    Ok(time_to_reach_ego > time_to_leave_other
        || time_to_reach_other > time_to_leave_ego
        || (time_to_reach_ego == Duration::MAX && time_to_reach_other == Duration::MAX))
}

/// The three-tier cascade. Each tier only runs when the previous one came up unsafe; the
/// returned diagnostics describe whichever tier decided last.
pub fn check_intersection_safe(situation: &Situation) -> Result<IntersectionOutcome> {
    let ego = &situation.ego_vehicle_state;
    let other = &situation.other_vehicle_state;

    if ego.distance_to_leave_intersection < ego.distance_to_enter_intersection
        || other.distance_to_leave_intersection < other.distance_to_enter_intersection
    {
        warn!(
            "situation {:?}: distance to leave the intersection is smaller than the distance to \
             enter it",
            situation.situation_id
        );
        bail!("a vehicle can't leave the intersection before entering it");
    }

    let mut information = RssStateInformation::empty(RssStateEvaluator::None);

    // A vehicle without priority is safe as long as it can still stop short of the
    // intersection. The evaluator is named after the party holding priority over the other.
    let mut safe = false;
    if !ego.has_priority {
        information.evaluator = RssStateEvaluator::IntersectionOtherPriorityEgoAbleToStop;
        information.current_distance = ego.distance_to_enter_intersection;
        let check = check_stop_in_front_intersection(ego)?;
        information.safe_distance = check.safe_distance;
        safe = check.is_safe;
    }
    if !safe && !other.has_priority {
        information.evaluator = RssStateEvaluator::IntersectionEgoPriorityOtherAbleToStop;
        information.current_distance = other.distance_to_enter_intersection;
        let check = check_stop_in_front_intersection(other)?;
        information.safe_distance = check.safe_distance;
        safe = check.is_safe;
    }
    if safe {
        return Ok(IntersectionOutcome {
            safe_state: Some(IntersectionState::NonPrioAbleToBreak),
            information,
        });
    }

    // Nobody can stop anymore; maybe the vehicles simply follow each other with a safe gap
    // along the path.
    information.current_distance = situation.relative_position.longitudinal_distance;
    let check = if situation.relative_position.longitudinal_position
        == LongitudinalRelativePosition::InFront
    {
        information.evaluator = RssStateEvaluator::IntersectionEgoInFront;
        check_safe_longitudinal_distance_same_direction(
            ego,
            other,
            situation.relative_position.longitudinal_distance,
        )?
    } else {
        // Longitudinal overlap deliberately lands here: treat the ego as the follower
        information.evaluator = RssStateEvaluator::IntersectionOtherInFront;
        check_safe_longitudinal_distance_same_direction(
            other,
            ego,
            situation.relative_position.longitudinal_distance,
        )?
    };
    information.safe_distance = check.safe_distance;
    if check.is_safe {
        return Ok(IntersectionOutcome {
            safe_state: Some(IntersectionState::SafeLongitudinalDistance),
            information,
        });
    }

    // Last resort: pure time separation. No distances to report by convention.
    information.evaluator = RssStateEvaluator::IntersectionOverlap;
    information.current_distance = Distance::ZERO;
    information.safe_distance = Distance::ZERO;
    if check_lateral_intersect(situation)? {
        return Ok(IntersectionOutcome {
            safe_state: Some(IntersectionState::NoTimeOverlap),
            information,
        });
    }

    Ok(IntersectionOutcome {
        safe_state: None,
        information,
    })
}

/// Evaluates intersection situations step by step, remembering per situation why it was last
/// safe. The memory spans exactly two evaluation steps: what the current step learns becomes
/// the previous step's knowledge as soon as a new time index shows up.
pub struct RssIntersectionChecker {
    current_time_index: TimeIndex,
    last_safe_state: BTreeMap<SituationId, IntersectionState>,
    current_safe_state: BTreeMap<SituationId, IntersectionState>,
}

impl RssIntersectionChecker {
    pub fn new() -> RssIntersectionChecker {
        RssIntersectionChecker {
            current_time_index: TimeIndex::UNSET,
            last_safe_state: BTreeMap::new(),
            current_safe_state: BTreeMap::new(),
        }
    }

    /// Rotate the memory when a new evaluation step begins. Skipping indices just ages out
    /// history faster; even an index moving backwards only discards it, never fails.
    fn rotate_to(&mut self, time_index: TimeIndex) {
        if time_index != self.current_time_index {
            std::mem::swap(&mut self.last_safe_state, &mut self.current_safe_state);
            self.current_safe_state.clear();
            self.current_time_index = time_index;
        }
    }

    /// The full verdict for one intersection situation at one evaluation step. Intersections
    /// never demand a lateral response, only a longitudinal one; on an unsafe step the response
    /// is softened when the previous step knew a safe rationale that still excuses the ego.
    pub fn calculate_rss_state_intersection(
        &mut self,
        time_index: TimeIndex,
        situation: &Situation,
    ) -> Result<RssState> {
        if situation.ego_vehicle_state.has_priority && situation.other_vehicle_state.has_priority {
            warn!(
                "situation {:?} claims priority for both vehicles",
                situation.situation_id
            );
            bail!("both vehicles can't have priority over each other at the same time");
        }

        self.rotate_to(time_index);

        let outcome = check_intersection_safe(situation)?;

        let mut longitudinal_state = LongitudinalRssState {
            is_safe: outcome.safe_state.is_some(),
            response: LongitudinalResponse::BrakeMin,
            rss_state_information: outcome.information,
        };

        if let Some(intersection_state) = outcome.safe_state {
            longitudinal_state.response = LongitudinalResponse::None;
            self.current_safe_state
                .insert(situation.situation_id, intersection_state);
        } else if let Some(previous) = self.last_safe_state.get(&situation.situation_id).copied() {
            longitudinal_state.response = match previous {
                IntersectionState::NonPrioAbleToBreak => {
                    // The party that could stop was the one without priority; an ego holding
                    // priority isn't the one that must react.
                    if situation.ego_vehicle_state.has_priority {
                        LongitudinalResponse::None
                    } else {
                        LongitudinalResponse::BrakeMin
                    }
                }
                IntersectionState::SafeLongitudinalDistance => {
                    if situation.relative_position.longitudinal_position
                        == LongitudinalRelativePosition::InFront
                    {
                        LongitudinalResponse::None
                    } else {
                        LongitudinalResponse::BrakeMin
                    }
                }
                // Safety by time separation alone leaves no excuse once it's gone
                IntersectionState::NoTimeOverlap => LongitudinalResponse::BrakeMin,
            };
            // A momentarily unsafe step must not erase why the situation used to be safe
            self.current_safe_state
                .insert(situation.situation_id, previous);
        }
        // Unsafe with no history: the BrakeMin default stands, and nothing is remembered.

        Ok(RssState {
            longitudinal_state,
            lateral_state_left: LateralRssState::unsafe_no_response(),
            lateral_state_right: LateralRssState::unsafe_no_response(),
        })
    }
}

impl Default for RssIntersectionChecker {
    fn default() -> Self {
        RssIntersectionChecker::new()
    }
}
