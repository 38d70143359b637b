//! The output model: per-situation safety verdicts and the braking response the ego vehicle
//! owes, with enough diagnostic detail to reconstruct which rule decided and what it compared.

use kinematics::Distance;
use serde::{Deserialize, Serialize};

/// What the ego vehicle must do along the driving direction. Ordered by severity, so combining
/// responses over several situations is a plain `max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LongitudinalResponse {
    None,
    /// Brake with at least `brake_min_correct`; enough when the ego is in its correct lane.
    BrakeMinCorrect,
    BrakeMin,
}

/// What the ego vehicle must do across the driving direction. Ordered by severity like
/// `LongitudinalResponse`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LateralResponse {
    None,
    BrakeMin,
}

/// Which rule produced a verdict. Purely diagnostic; downstream code must never branch on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RssStateEvaluator {
    None,
    LongitudinalDistance,
    LongitudinalDistanceOppositeDirection,
    LongitudinalDistanceOppositeDirectionEgoCorrectLane,
    LateralDistance,
    IntersectionEgoInFront,
    IntersectionOtherInFront,
    IntersectionOverlap,
    /// The ego has priority and the other vehicle can still stop in front of the intersection.
    IntersectionEgoPriorityOtherAbleToStop,
    /// The other vehicle has priority and the ego can still stop in front of the intersection.
    IntersectionOtherPriorityEgoAbleToStop,
}

/// What a verdict compared: the margin the deciding rule demanded and the one actually present.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RssStateInformation {
    pub safe_distance: Distance,
    pub current_distance: Distance,
    pub evaluator: RssStateEvaluator,
}

impl RssStateInformation {
    /// For verdicts that never compared any distances.
    pub fn empty(evaluator: RssStateEvaluator) -> RssStateInformation {
        RssStateInformation {
            safe_distance: Distance::ZERO,
            current_distance: Distance::ZERO,
            evaluator,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LongitudinalRssState {
    pub is_safe: bool,
    pub response: LongitudinalResponse,
    pub rss_state_information: RssStateInformation,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LateralRssState {
    pub is_safe: bool,
    pub response: LateralResponse,
    pub rss_state_information: RssStateInformation,
}

impl LateralRssState {
    /// The placeholder for evaluations that reason about one side only, or not laterally at
    /// all. Intersections always flag lateral as unsafe but never demand a lateral response.
    pub fn unsafe_no_response() -> LateralRssState {
        LateralRssState {
            is_safe: false,
            response: LateralResponse::None,
            rss_state_information: RssStateInformation::empty(RssStateEvaluator::LateralDistance),
        }
    }

    /// The side away from the other vehicle, where no conflict is possible.
    pub fn clear_side() -> LateralRssState {
        LateralRssState {
            is_safe: true,
            response: LateralResponse::None,
            rss_state_information: RssStateInformation::empty(RssStateEvaluator::None),
        }
    }
}

/// The full verdict for one situation at one evaluation step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RssState {
    pub longitudinal_state: LongitudinalRssState,
    pub lateral_state_left: LateralRssState,
    pub lateral_state_right: LateralRssState,
}

impl RssState {
    /// The verdict for situations with no possible conflict.
    pub fn all_safe() -> RssState {
        RssState {
            longitudinal_state: LongitudinalRssState {
                is_safe: true,
                response: LongitudinalResponse::None,
                rss_state_information: RssStateInformation::empty(RssStateEvaluator::None),
            },
            lateral_state_left: LateralRssState::clear_side(),
            lateral_state_right: LateralRssState::clear_side(),
        }
    }

    /// Safe in every direction at once.
    pub fn is_safe(&self) -> bool {
        self.longitudinal_state.is_safe
            && self.lateral_state_left.is_safe
            && self.lateral_state_right.is_safe
    }

    /// A situation only turns dangerous when no direction is safe anymore; safety in a single
    /// direction is enough to rule a collision out. Intersections flag both lateral sides
    /// unsafe precisely so that losing the longitudinal argument makes them dangerous.
    pub fn is_dangerous(&self) -> bool {
        !self.longitudinal_state.is_safe
            && !self.lateral_state_left.is_safe
            && !self.lateral_state_right.is_safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_ordering() {
        assert!(LongitudinalResponse::BrakeMin > LongitudinalResponse::BrakeMinCorrect);
        assert!(LongitudinalResponse::BrakeMinCorrect > LongitudinalResponse::None);
        assert!(LateralResponse::BrakeMin > LateralResponse::None);
    }
}
