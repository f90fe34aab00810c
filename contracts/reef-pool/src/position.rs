// Position store: open/close lifecycle and the owed-accrual arithmetic.
//
// A position's owed amount for any dimension is
// floor((growth_inside_now - snapshot) * liquidity / 2^64) + previously_owed,
// with the growth delta taken wrapping mod 2^128.

use crate::error::PoolError;
use crate::storage::{get_position, next_position_id, remove_position, set_position};
use reef_math::full_math::mul_div;
use reef_types::{PositionInfo, Q64, MAX_TICK, MIN_TICK};
use soroban_sdk::{panic_with_error, Address, Env, Vec};

/// Open a zero-liquidity position over a validated tick range
pub fn open(env: &Env, owner: Address, tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> u64 {
    if tick_lower >= tick_upper
        || tick_lower < MIN_TICK
        || tick_upper > MAX_TICK
        || tick_lower.rem_euclid(tick_spacing) != 0
        || tick_upper.rem_euclid(tick_spacing) != 0
    {
        panic_with_error!(env, PoolError::InvalidTickRange);
    }

    let position_id = next_position_id(env);
    let position = PositionInfo::new(env, owner, tick_lower, tick_upper);
    set_position(env, position_id, &position);
    position_id
}

/// Close a position; fails unless liquidity and every owed amount are zero
pub fn close(env: &Env, position_id: u64) {
    let position = require_position(env, position_id);
    if position.is_staked {
        panic_with_error!(env, PoolError::PositionIsStaked);
    }
    if !position.is_empty() {
        panic_with_error!(env, PoolError::ZeroLiquidity);
    }
    remove_position(env, position_id);
}

/// Load a position or fail with PositionPoolIdMismatch
pub fn require_position(env: &Env, position_id: u64) -> PositionInfo {
    match get_position(env, position_id) {
        Some(position) => position,
        None => panic_with_error!(env, PoolError::PositionPoolIdMismatch),
    }
}

/// Accrue owed fees from the current growth-inside snapshot
pub fn accrue_fees(env: &Env, position: &mut PositionInfo, inside_a: u128, inside_b: u128) {
    if position.liquidity > 0 {
        let delta_a = inside_a.wrapping_sub(position.fee_growth_inside_a);
        let delta_b = inside_b.wrapping_sub(position.fee_growth_inside_b);
        position.fee_owed_a = add_owed(env, position.fee_owed_a, delta_a, position.liquidity);
        position.fee_owed_b = add_owed(env, position.fee_owed_b, delta_b, position.liquidity);
    }
    position.fee_growth_inside_a = inside_a;
    position.fee_growth_inside_b = inside_b;
}

/// Accrue owed rewards, growing the position's slot vectors to match the
/// rewarder count. New slots are seeded at the current inside value so a
/// rewarder added after the position opened accrues only from now on.
pub fn accrue_rewards(env: &Env, position: &mut PositionInfo, inside: &Vec<u128>) {
    ensure_reward_slots(env, position, inside);

    for (i, inside_value) in inside.iter().enumerate() {
        let slot = i as u32;
        let snapshot = position.reward_growths_inside.get(slot).unwrap_or(0);
        if position.liquidity > 0 {
            let delta = inside_value.wrapping_sub(snapshot);
            let owed = add_owed(
                env,
                position.rewards_owed.get(slot).unwrap_or(0),
                delta,
                position.liquidity,
            );
            position.rewards_owed.set(slot, owed);
        }
        position.reward_growths_inside.set(slot, inside_value);
    }
}

/// Accrue the points score
pub fn accrue_points(env: &Env, position: &mut PositionInfo, inside: u128) {
    if position.liquidity > 0 {
        let delta = inside.wrapping_sub(position.points_growth_inside);
        let earned = mul_div(env, delta, position.liquidity, Q64);
        position.points_owed = match position.points_owed.checked_add(earned) {
            Some(points) => points,
            None => panic_with_error!(env, PoolError::FeeAmountOverflow),
        };
    }
    position.points_growth_inside = inside;
}

/// Accrue owed gauge emission; only staked positions earn the stream
pub fn accrue_emission(env: &Env, position: &mut PositionInfo, inside: u128) {
    if !position.is_staked {
        return;
    }
    if position.liquidity > 0 {
        let delta = inside.wrapping_sub(position.emission_growth_inside);
        position.emission_owed = add_owed(env, position.emission_owed, delta, position.liquidity);
    }
    position.emission_growth_inside = inside;
}

/// Grow the reward slot vectors to the rewarder count, seeding snapshots
/// at the current inside value
pub fn ensure_reward_slots(env: &Env, position: &mut PositionInfo, inside: &Vec<u128>) {
    while position.reward_growths_inside.len() < inside.len() {
        let slot = position.reward_growths_inside.len();
        position
            .reward_growths_inside
            .push_back(inside.get(slot).unwrap_or(0));
        position.rewards_owed.push_back(0);
    }
}

fn add_owed(env: &Env, owed: u64, growth_delta: u128, liquidity: u128) -> u64 {
    let earned = mul_div(env, growth_delta, liquidity, Q64);
    let earned: u64 = match earned.try_into() {
        Ok(earned) => earned,
        Err(_) => panic_with_error!(env, PoolError::FeeAmountOverflow),
    };
    match owed.checked_add(earned) {
        Some(owed) => owed,
        None => panic_with_error!(env, PoolError::FeeAmountOverflow),
    }
}
