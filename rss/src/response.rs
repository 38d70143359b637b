//! Folds the per-situation verdicts of one evaluation step into the single response the ego
//! vehicle actually has to execute: the worst required braking in each direction, plus the
//! list of road users that made the step unsafe.

use serde::{Deserialize, Serialize};

use kinematics::TimeIndex;

use crate::situation::ObjectId;
use crate::state::{LateralResponse, LongitudinalResponse, RssState};

/// The overall response for one evaluation step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProperResponse {
    pub time_index: TimeIndex,
    /// True as long as no situation is dangerous.
    pub is_safe: bool,
    /// The road users behind the dangerous situations, in first-seen order.
    pub dangerous_objects: Vec<ObjectId>,
    pub longitudinal_response: LongitudinalResponse,
    pub lateral_response_left: LateralResponse,
    pub lateral_response_right: LateralResponse,
}

/// Combine all situations of one step. Only dangerous situations demand anything; their
/// responses escalate monotonically, and one of them is enough to flip the step.
pub fn combine_rss_states(
    time_index: TimeIndex,
    states: &[(ObjectId, RssState)],
) -> ProperResponse {
    let mut response = ProperResponse {
        time_index,
        is_safe: true,
        dangerous_objects: Vec::new(),
        longitudinal_response: LongitudinalResponse::None,
        lateral_response_left: LateralResponse::None,
        lateral_response_right: LateralResponse::None,
    };

    for (object, state) in states {
        if !state.is_dangerous() {
            continue;
        }
        response.is_safe = false;
        if !response.dangerous_objects.contains(object) {
            response.dangerous_objects.push(*object);
        }
        response.longitudinal_response = response
            .longitudinal_response
            .max(state.longitudinal_state.response);
        response.lateral_response_left = response
            .lateral_response_left
            .max(state.lateral_state_left.response);
        response.lateral_response_right = response
            .lateral_response_right
            .max(state.lateral_state_right.response);
    }

    response
}
