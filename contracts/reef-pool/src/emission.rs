// Gauge emission stream: a time-based reward over staked liquidity with a
// reserve, a rate, a finish timestamp and a rollover bucket for seconds
// when nothing is staked.

use crate::error::PoolError;
use crate::events;
use crate::position;
use crate::storage::{
    get_emission, get_gauge, get_state, set_emission, set_position,
};
use crate::tick;
use reef_math::full_math::mul_div;
use reef_types::{EmissionState, GaugeInfo, Q64};
use soroban_sdk::{panic_with_error, Env};

/// Accrue the emission stream up to `now`; returns the distributed amount
///
/// ```text
/// dt = now - last_updated
/// distributed = min(reserve, rate * dt / 2^64)
/// staked > 0  -> growth_global += distributed * 2^64 / staked  (wrapping)
/// staked == 0 -> rollover += distributed
/// ```
pub fn update_growth(env: &Env, emission: &mut EmissionState, now: u64) -> u64 {
    let elapsed = now.saturating_sub(emission.last_updated);
    if elapsed == 0 {
        return 0;
    }

    let mut distributed: u64 = 0;
    if emission.reserve > 0 {
        let released = mul_div(env, emission.rate_x64, elapsed as u128, Q64);
        distributed = released.min(emission.reserve as u128) as u64;
        emission.reserve -= distributed;

        if emission.staked_liquidity > 0 {
            let growth = mul_div(env, distributed as u128, Q64, emission.staked_liquidity);
            emission.growth_global_x64 = emission.growth_global_x64.wrapping_add(growth);
        } else {
            emission.rollover = match emission.rollover.checked_add(distributed) {
                Some(rollover) => rollover,
                None => panic_with_error!(env, PoolError::FeeAmountOverflow),
            };
        }
    }

    emission.last_updated = now;
    distributed
}

/// Gauge binding required for every emission entry point
pub fn require_gauge(env: &Env) -> GaugeInfo {
    match get_gauge(env) {
        Some(gauge) => gauge,
        None => panic_with_error!(env, PoolError::GaugerIdNotFound),
    }
}

/// Re-rate the stream. Accrues up to now first so the old rate applies to
/// the past interval, then overwrites rate, reserve and finish.
pub fn sync(env: &Env, rate_x64: u128, reserve: u64, period_finish: u64) -> u64 {
    let gauge = require_gauge(env);
    gauge.gauge.require_auth();

    let now = env.ledger().timestamp();
    if period_finish < now {
        panic_with_error!(env, PoolError::InvalidSyncEmissionTime);
    }

    let mut emission = get_emission(env);
    let distributed = update_growth(env, &mut emission, now);

    emission.rate_x64 = rate_x64;
    emission.reserve = reserve;
    emission.period_finish = period_finish;
    set_emission(env, &emission);

    events::emit_sync_emission(env, rate_x64, reserve, period_finish, distributed);
    distributed
}

/// Stake a position into the gauge
///
/// Settles the stream, snapshots the position's emission dimension so
/// accrual starts now, and registers the liquidity on the staked side of
/// the register and both endpoint ticks.
pub fn stake(env: &Env, position_id: u64) {
    let gauge = require_gauge(env);
    gauge.gauge.require_auth();

    let mut pos = position::require_position(env, position_id);
    if pos.is_staked {
        panic_with_error!(env, PoolError::StakeAlreadyStaked);
    }

    let state = get_state(env);
    let now = env.ledger().timestamp();
    let mut emission = get_emission(env);
    update_growth(env, &mut emission, now);

    let inside = tick::get_emission_growth_inside(
        env,
        pos.tick_lower,
        pos.tick_upper,
        state.tick,
        emission.growth_global_x64,
    );
    pos.emission_growth_inside = inside;
    pos.is_staked = true;

    if pos.liquidity > 0 {
        let delta: i128 = match pos.liquidity.try_into() {
            Ok(delta) => delta,
            Err(_) => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
        };
        if pos.tick_lower <= state.tick && state.tick < pos.tick_upper {
            emission.staked_liquidity = match emission.staked_liquidity.checked_add(pos.liquidity)
            {
                Some(staked) => staked,
                None => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
            };
        }
        tick::update_stake(env, pos.tick_lower, delta, false);
        tick::update_stake(env, pos.tick_upper, delta, true);
    }

    set_position(env, position_id, &pos);
    set_emission(env, &emission);
    events::emit_stake_position(env, position_id, emission.staked_liquidity);
}

/// Unstake a position, accruing its owed emission first
pub fn unstake(env: &Env, position_id: u64) {
    let gauge = require_gauge(env);
    gauge.gauge.require_auth();

    let mut pos = position::require_position(env, position_id);
    if !pos.is_staked {
        panic_with_error!(env, PoolError::UnstakeNotStaked);
    }

    let state = get_state(env);
    let now = env.ledger().timestamp();
    let mut emission = get_emission(env);
    update_growth(env, &mut emission, now);

    let inside = tick::get_emission_growth_inside(
        env,
        pos.tick_lower,
        pos.tick_upper,
        state.tick,
        emission.growth_global_x64,
    );
    position::accrue_emission(env, &mut pos, inside);
    pos.is_staked = false;

    if pos.liquidity > 0 {
        let delta: i128 = match pos.liquidity.try_into() {
            Ok(delta) => delta,
            Err(_) => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
        };
        if pos.tick_lower <= state.tick && state.tick < pos.tick_upper {
            emission.staked_liquidity = match emission.staked_liquidity.checked_sub(pos.liquidity)
            {
                Some(staked) => staked,
                None => panic_with_error!(env, PoolError::InsufficientStakedLiquidity),
            };
        }
        tick::update_stake(env, pos.tick_lower, -delta, false);
        tick::update_stake(env, pos.tick_upper, -delta, true);
    }

    set_position(env, position_id, &pos);
    set_emission(env, &emission);
    events::emit_unstake_position(env, position_id, emission.staked_liquidity);
}

/// Recovery hatch: recompute (active, staked) from the tick nets at the
/// current tick, assert the active register matches, and overwrite the
/// staked register.
pub fn restore_staked_liquidity(env: &Env) -> u128 {
    let state = get_state(env);
    let config = crate::storage::get_config(env);

    let (net, staked_net) = tick::sum_nets_at_or_below(env, config.tick_spacing, state.tick);

    let recomputed: u128 = match net.try_into() {
        Ok(liquidity) => liquidity,
        Err(_) => panic_with_error!(env, PoolError::LiquidityMismatch),
    };
    if recomputed != state.liquidity {
        panic_with_error!(env, PoolError::LiquidityMismatch);
    }

    let staked: u128 = match staked_net.try_into() {
        Ok(staked) => staked,
        Err(_) => panic_with_error!(env, PoolError::InsufficientStakedLiquidity),
    };
    if staked > state.liquidity {
        panic_with_error!(env, PoolError::InsufficientStakedLiquidity);
    }

    let mut emission = get_emission(env);
    let now = env.ledger().timestamp();
    update_growth(env, &mut emission, now);
    emission.staked_liquidity = staked;
    set_emission(env, &emission);

    events::emit_restore_staked_liquidity(env, staked);
    staked
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    fn fresh_emission() -> EmissionState {
        EmissionState {
            rate_x64: 0,
            reserve: 0,
            period_finish: 0,
            rollover: 0,
            last_updated: 0,
            staked_liquidity: 0,
            growth_global_x64: 0,
        }
    }

    #[test]
    fn test_update_growth_noop_at_same_second() {
        let env = Env::default();
        let mut emission = fresh_emission();
        emission.rate_x64 = 10 * Q64;
        emission.reserve = 1000;
        assert_eq!(update_growth(&env, &mut emission, 0), 0);
        assert_eq!(emission.reserve, 1000);
    }

    #[test]
    fn test_update_growth_rollover_when_nothing_staked() {
        let env = Env::default();
        let mut emission = fresh_emission();
        emission.rate_x64 = 10 * Q64;
        emission.reserve = 10_000;

        let distributed = update_growth(&env, &mut emission, 100);
        assert_eq!(distributed, 1000);
        assert_eq!(emission.reserve, 9_000);
        assert_eq!(emission.rollover, 1000);
        assert_eq!(emission.growth_global_x64, 0, "no growth while nothing staked");
        assert_eq!(emission.last_updated, 100);
    }

    #[test]
    fn test_update_growth_with_staked_liquidity() {
        let env = Env::default();
        let mut emission = fresh_emission();
        emission.rate_x64 = 10 * Q64;
        emission.reserve = 10_000;
        emission.staked_liquidity = 1_000_000;

        let distributed = update_growth(&env, &mut emission, 100);
        assert_eq!(distributed, 1000);
        assert_eq!(emission.rollover, 0);
        assert_eq!(emission.growth_global_x64, 1000 * Q64 / 1_000_000);
    }

    #[test]
    fn test_update_growth_capped_by_reserve() {
        let env = Env::default();
        let mut emission = fresh_emission();
        emission.rate_x64 = 10 * Q64;
        emission.reserve = 500;
        emission.staked_liquidity = 100;

        let distributed = update_growth(&env, &mut emission, 1000);
        assert_eq!(distributed, 500, "release capped at the reserve");
        assert_eq!(emission.reserve, 0);
    }

    #[test]
    fn test_update_growth_reserve_monotone() {
        let env = Env::default();
        let mut emission = fresh_emission();
        emission.rate_x64 = Q64;
        emission.reserve = 1000;
        emission.staked_liquidity = 10;

        let mut last_reserve = emission.reserve;
        for now in [10u64, 20, 30, 40, 2000] {
            update_growth(&env, &mut emission, now);
            assert!(emission.reserve <= last_reserve);
            last_reserve = emission.reserve;
        }
        assert_eq!(emission.reserve, 0);
    }

    #[test]
    fn test_update_growth_fractional_rate() {
        let env = Env::default();
        let mut emission = fresh_emission();
        // Half a token per second
        emission.rate_x64 = Q64 / 2;
        emission.reserve = 100;
        emission.staked_liquidity = 1;

        update_growth(&env, &mut emission, 3);
        // floor(1.5) = 1 token released
        assert_eq!(emission.reserve, 99);
    }
}
