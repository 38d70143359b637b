//! Closed-form worst-case motion formulas. They all model the same two-phase pattern: a vehicle
//! keeps (or worsens) its current acceleration for the whole response time, and only then
//! applies the braking it promised.
//!
//! Comparisons are exact on the underlying floats; no epsilon anywhere. The only failure mode
//! is a physically meaningless input (a non-positive deceleration where braking is required),
//! which surfaces as an error instead of producing an infinity.

use anyhow::{bail, Result};

use crate::{Acceleration, Distance, Duration, Speed};

/// The distance needed to come to a standstill from `current_speed` by braking with
/// `deceleration` (a positive magnitude). A vehicle rolling backwards needs the same distance
/// as one rolling forwards at the same rate.
pub fn stopping_distance(current_speed: Speed, deceleration: Acceleration) -> Result<Distance> {
    if deceleration <= Acceleration::ZERO {
        bail!("can't stop with deceleration {}", deceleration);
    }
    // v^2 / 2a: the average speed while braking is half the initial one
    let time_to_stop = current_speed.abs() / deceleration;
    Ok(0.5 * current_speed.abs() * time_to_stop)
}

/// The speed at the end of the response time, when `accel` applies throughout it. Longitudinal
/// motion clamps at zero; a braking vehicle stands still rather than rolling backwards.
fn speed_after_response_time(
    current_speed: Speed,
    response_time: Duration,
    accel: Acceleration,
) -> Speed {
    (current_speed + accel * response_time).max(Speed::ZERO)
}

/// The distance covered during the response time, when `accel` applies throughout it. Like
/// `speed_after_response_time`, motion stops when the speed hits zero.
fn distance_after_response_time(
    current_speed: Speed,
    response_time: Duration,
    accel: Acceleration,
) -> Distance {
    let moving_time = if accel < Acceleration::ZERO {
        response_time.min(current_speed.max(Speed::ZERO) / -accel)
    } else {
        response_time
    };
    current_speed * moving_time + 0.5 * (accel * moving_time) * moving_time
}

/// The distance covered by a vehicle that accelerates with `accel_max` for its whole response
/// time and only then brakes to a standstill with `brake_min`. This is the stated worst-case
/// braking pattern underlying all the safe distance bounds.
pub fn worst_case_stopping_distance(
    current_speed: Speed,
    response_time: Duration,
    accel_max: Acceleration,
    brake_min: Acceleration,
) -> Result<Distance> {
    let response_distance = distance_after_response_time(current_speed, response_time, accel_max);
    let response_speed = speed_after_response_time(current_speed, response_time, accel_max);
    Ok(response_distance + stopping_distance(response_speed, brake_min)?)
}

/// How long a body starting at `speed` under constant `accel` takes to first cover `distance`.
/// `Duration::MAX` if it never does, because it stops or moves away first.
fn time_for_distance(speed: Speed, accel: Acceleration, distance: Distance) -> Result<Duration> {
    if distance < Distance::ZERO {
        bail!("can't cover negative distance {}", distance);
    }
    if distance == Distance::ZERO {
        return Ok(Duration::ZERO);
    }
    if accel == Acceleration::ZERO {
        if speed <= Speed::ZERO {
            return Ok(Duration::MAX);
        }
        return Ok(distance / speed);
    }
    // Solve d = v*t + a*t^2 / 2 for the first nonnegative root
    let v = speed.inner_meters_per_sec();
    let a = accel.inner_meters_per_sec_squared();
    let radicand = v * v + 2.0 * a * distance.inner_meters();
    if radicand < 0.0 {
        // Braking wins; the body halts short of the target
        return Ok(Duration::MAX);
    }
    let t = (-v + radicand.sqrt()) / a;
    if t < 0.0 {
        // Moving away from the target and never coming back
        return Ok(Duration::MAX);
    }
    Ok(Duration::seconds(t))
}

/// The time needed to cover `distance` under the two-phase pattern: `accel_during_response`
/// applies for the whole `response_time`, then `accel_after_response` (usually a brake) takes
/// over. `Duration::MAX` means the distance is never covered. An error means the input was
/// contradictory: the distance is provably covered within the response phase, yet the quadratic
/// for that phase has no solution.
pub fn time_to_cover_distance(
    current_speed: Speed,
    response_time: Duration,
    accel_during_response: Acceleration,
    accel_after_response: Acceleration,
    distance: Distance,
) -> Result<Duration> {
    let response_distance =
        distance_after_response_time(current_speed, response_time, accel_during_response);
    if response_distance >= distance {
        let time = time_for_distance(current_speed, accel_during_response, distance)?;
        if time == Duration::MAX {
            bail!(
                "{} is covered within the response time, but the quadratic disagrees",
                distance
            );
        }
        return Ok(time);
    }

    let response_speed =
        speed_after_response_time(current_speed, response_time, accel_during_response);
    if response_speed == Speed::ZERO && accel_after_response <= Acceleration::ZERO {
        // Standing still after the response time with no way to speed up again
        return Ok(Duration::MAX);
    }
    let time = time_for_distance(
        response_speed,
        accel_after_response,
        distance - response_distance,
    )?;
    if time == Duration::MAX {
        return Ok(Duration::MAX);
    }
    Ok(response_time + time)
}

/// The minimum gap a follower must keep to a leader moving the same direction: the follower may
/// accelerate with `follower_accel_max` through its response time and then brakes with
/// `follower_brake_min`, while the leader brakes as hard as `leader_brake_max`. Clamped to
/// zero; a slow follower far behind a fast leader needs no gap at all.
pub fn safe_longitudinal_distance_same_direction(
    leader_speed: Speed,
    follower_speed: Speed,
    follower_response_time: Duration,
    follower_accel_max: Acceleration,
    follower_brake_min: Acceleration,
    leader_brake_max: Acceleration,
) -> Result<Distance> {
    let follower_travel = worst_case_stopping_distance(
        follower_speed,
        follower_response_time,
        follower_accel_max,
        follower_brake_min,
    )?;
    let leader_travel = stopping_distance(leader_speed, leader_brake_max)?;
    Ok((follower_travel - leader_travel).max(Distance::ZERO))
}

/// The minimum gap between two vehicles driving towards each other. Both are assumed to keep
/// accelerating towards the other through their response time and then brake to a stop; the
/// bound is the sum of both worst-case travels. The caller picks `ego_brake` depending on
/// whether the ego is in its correct lane.
pub fn safe_longitudinal_distance_opposite_direction(
    ego_speed: Speed,
    ego_response_time: Duration,
    ego_accel_max: Acceleration,
    ego_brake: Acceleration,
    other_speed: Speed,
    other_response_time: Duration,
    other_accel_max: Acceleration,
    other_brake_min: Acceleration,
) -> Result<Distance> {
    let ego_travel =
        worst_case_stopping_distance(ego_speed, ego_response_time, ego_accel_max, ego_brake)?;
    let other_travel = worst_case_stopping_distance(
        other_speed,
        other_response_time,
        other_accel_max,
        other_brake_min,
    )?;
    Ok((ego_travel + other_travel).max(Distance::ZERO))
}

/// The minimum lateral gap between a left and a right vehicle. Positive lateral speed points
/// from the left vehicle towards the right one. Worst case, each vehicle accelerates towards
/// the other for the whole response time, then brakes its lateral motion to zero;
/// `fluctuation_margin` covers the lateral wobble neither vehicle can avoid.
pub fn safe_lateral_distance(
    left_speed: Speed,
    left_accel_max: Acceleration,
    left_brake_min: Acceleration,
    right_speed: Speed,
    right_accel_max: Acceleration,
    right_brake_min: Acceleration,
    response_time: Duration,
    fluctuation_margin: Distance,
) -> Result<Distance> {
    // Lateral speeds are signed and cross zero freely, so no clamping here.
    let left_response_speed = left_speed + left_accel_max * response_time;
    let right_response_speed = right_speed - right_accel_max * response_time;

    let left_travel = 0.5 * (left_speed + left_response_speed) * response_time
        + stopping_distance(left_response_speed, left_brake_min)?;
    let right_travel = 0.5 * (right_speed + right_response_speed) * response_time
        - stopping_distance(right_response_speed, right_brake_min)?;

    Ok((fluctuation_margin + left_travel - right_travel).max(Distance::ZERO))
}
