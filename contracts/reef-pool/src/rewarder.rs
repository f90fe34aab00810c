// Rewarder manager: an append-only list of per-second reward streams plus
// the points stream, all settled over active liquidity.

use crate::error::PoolError;
use crate::storage::{get_rewarders, set_rewarders};
use reef_math::full_math::mul_div;
use reef_types::{Rewarder, RewarderState, MAX_REWARDERS, POINTS_PER_SECOND_X64};
use soroban_sdk::{panic_with_error, Address, Env, Vec};

/// Settle every reward stream and the points stream up to `now` against
/// the given active liquidity, write the state back, and return it.
///
/// Seconds with zero active liquidity release nothing; only the
/// settlement timestamp advances.
pub fn settle(env: &Env, liquidity: u128, now: u64) -> RewarderState {
    let mut state = get_rewarders(env);
    let elapsed = now.saturating_sub(state.last_updated);
    if elapsed == 0 {
        return state;
    }

    if liquidity > 0 {
        let mut settled = Vec::new(env);
        for rewarder in state.rewarders.iter() {
            let growth = mul_div(
                env,
                rewarder.emissions_per_second_x64,
                elapsed as u128,
                liquidity,
            );
            settled.push_back(Rewarder {
                token: rewarder.token,
                emissions_per_second_x64: rewarder.emissions_per_second_x64,
                growth_global_x64: rewarder.growth_global_x64.wrapping_add(growth),
            });
        }
        state.rewarders = settled;

        let points_growth = mul_div(env, POINTS_PER_SECOND_X64, elapsed as u128, liquidity);
        state.points_growth_global = state.points_growth_global.wrapping_add(points_growth);
    }

    state.last_updated = now;
    set_rewarders(env, &state);
    state
}

/// The reward growth globals as a positional vector
pub fn reward_growths_global(env: &Env, state: &RewarderState) -> Vec<u128> {
    let mut growths = Vec::new(env);
    for rewarder in state.rewarders.iter() {
        growths.push_back(rewarder.growth_global_x64);
    }
    growths
}

/// Append a new reward stream; slots are positional and never removed
pub fn add_rewarder(env: &Env, liquidity: u128, now: u64, token: Address) -> u32 {
    let mut state = settle(env, liquidity, now);

    if state.rewarders.len() >= MAX_REWARDERS || state.rewarder_index(&token).is_some() {
        panic_with_error!(env, PoolError::RewarderIndexNotFound);
    }

    let slot = state.rewarders.len();
    state.rewarders.push_back(Rewarder {
        token,
        emissions_per_second_x64: 0,
        growth_global_x64: 0,
    });
    set_rewarders(env, &state);
    slot
}

/// Re-rate an existing reward stream, settling the old rate first
pub fn update_emission(
    env: &Env,
    liquidity: u128,
    now: u64,
    token: &Address,
    emissions_per_second_x64: u128,
) {
    let mut state = settle(env, liquidity, now);

    let slot = match state.rewarder_index(token) {
        Some(slot) => slot,
        None => panic_with_error!(env, PoolError::RewarderIndexNotFound),
    };

    let mut rewarder = state.rewarders.get(slot).unwrap();
    rewarder.emissions_per_second_x64 = emissions_per_second_x64;
    state.rewarders.set(slot, rewarder);
    set_rewarders(env, &state);
}
