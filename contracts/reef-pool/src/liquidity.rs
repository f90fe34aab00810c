// Liquidity operations: position lifecycle, deposits against a
// hot-potato receipt, withdrawals, and the collect family.
//
// Every deposit path settles the rewarder and emission streams first,
// updates the endpoint ticks, then snapshots growth-inside and folds the
// wrapped delta into the position's owed amounts.

use crate::emission;
use crate::error::PoolError;
use crate::events;
use crate::position;
use crate::rewarder;
use crate::storage::{
    clear_pending_add_liquidity, get_config, get_emission, get_pending_add_liquidity,
    get_pending_flash_swap, get_state, set_emission, set_pending_add_liquidity, set_position,
    set_state,
};
use crate::tick::{self, GrowthGlobals};
use reef_math::liquidity_math::{get_amounts_for_liquidity, get_liquidity_by_amount, try_add_delta};
use reef_math::tick_math::get_sqrt_price_at_tick;
use reef_types::{AddLiquidityReceipt, PoolState, PositionInfo, RewarderState};
use soroban_sdk::{panic_with_error, token, Address, Env, Vec};

/// An unconsumed hot-potato receipt wedges every mutating entry point
/// except its repay call, so a transaction that skips repayment cannot
/// commit useful work
pub fn assert_no_outstanding_receipt(env: &Env) {
    if get_pending_flash_swap(env).is_some() || get_pending_add_liquidity(env).is_some() {
        panic_with_error!(env, PoolError::OutstandingReceipt);
    }
}

/// Every mutating operation except unpause and the repay calls asserts
/// this
pub fn assert_mutable(env: &Env) {
    if get_state(env).paused {
        panic_with_error!(env, PoolError::PoolPaused);
    }
    assert_no_outstanding_receipt(env);
}

pub fn open_position(env: &Env, owner: Address, tick_lower: i32, tick_upper: i32) -> u64 {
    assert_mutable(env);
    owner.require_auth();

    let config = get_config(env);
    let position_id = position::open(env, owner.clone(), tick_lower, tick_upper, config.tick_spacing);
    events::emit_open_position(env, position_id, &owner, tick_lower, tick_upper);
    position_id
}

pub fn close_position(env: &Env, caller: Address, position_id: u64) {
    assert_mutable(env);
    caller.require_auth();

    let pos = position::require_position(env, position_id);
    if pos.owner != caller {
        panic_with_error!(env, PoolError::NotOwner);
    }
    position::close(env, position_id);
    events::emit_close_position(env, position_id);
}

/// Deposit a fixed amount of liquidity; amounts are derived from the
/// range and the current price, rounded toward the pool
pub fn add_liquidity(env: &Env, position_id: u64, liquidity: u128) -> AddLiquidityReceipt {
    assert_mutable(env);
    if liquidity == 0 {
        panic_with_error!(env, PoolError::ZeroLiquidity);
    }

    let state = get_state(env);
    let pos = position::require_position(env, position_id);
    let (amount_a, amount_b) = get_amounts_for_liquidity(
        env,
        state.sqrt_price,
        get_sqrt_price_at_tick(env, pos.tick_lower),
        get_sqrt_price_at_tick(env, pos.tick_upper),
        liquidity,
        true,
    );

    add_liquidity_internal(
        env,
        position_id,
        liquidity,
        amount_to_u64(env, amount_a),
        amount_to_u64(env, amount_b),
    )
}

/// Deposit a fixed amount of one token; liquidity is solved from the
/// fixed side and the other amount derived
pub fn add_liquidity_fix_coin(
    env: &Env,
    position_id: u64,
    amount: u64,
    fix_a: bool,
) -> AddLiquidityReceipt {
    assert_mutable(env);
    if amount == 0 {
        panic_with_error!(env, PoolError::ZeroAmount);
    }

    let state = get_state(env);
    let pos = position::require_position(env, position_id);
    let (liquidity, amount_a, amount_b) = get_liquidity_by_amount(
        env,
        state.sqrt_price,
        get_sqrt_price_at_tick(env, pos.tick_lower),
        get_sqrt_price_at_tick(env, pos.tick_upper),
        amount as u128,
        fix_a,
    );
    if liquidity == 0 {
        panic_with_error!(env, PoolError::ZeroLiquidity);
    }

    add_liquidity_internal(
        env,
        position_id,
        liquidity,
        amount_to_u64(env, amount_a),
        amount_to_u64(env, amount_b),
    )
}

fn amount_to_u64(env: &Env, amount: u128) -> u64 {
    match amount.try_into() {
        Ok(amount) => amount,
        Err(_) => panic_with_error!(env, PoolError::AmountInOverflow),
    }
}

/// Settle streams, apply the liquidity delta to ticks, position and the
/// active register, and issue the deposit receipt
fn add_liquidity_internal(
    env: &Env,
    position_id: u64,
    liquidity: u128,
    amount_a: u64,
    amount_b: u64,
) -> AddLiquidityReceipt {
    let mut state = get_state(env);
    let mut pos = position::require_position(env, position_id);
    if pos.is_staked {
        panic_with_error!(env, PoolError::PositionIsStaked);
    }

    let delta: i128 = match liquidity.try_into() {
        Ok(delta) => delta,
        Err(_) => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
    };

    let (_rewarders, globals) = settle_streams(env, &state);
    apply_tick_updates(env, &pos, &state, delta, &globals);
    accrue_position(env, &mut pos, &state, &globals);

    pos.liquidity = match pos.liquidity.checked_add(liquidity) {
        Some(liquidity) => liquidity,
        None => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
    };
    set_position(env, position_id, &pos);

    if pos.tick_lower <= state.tick && state.tick < pos.tick_upper {
        state.liquidity = match try_add_delta(state.liquidity, delta) {
            Some(liquidity) => liquidity,
            None => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
        };
        set_state(env, &state);
    }

    let receipt = AddLiquidityReceipt {
        pool: env.current_contract_address(),
        position_id,
        amount_a,
        amount_b,
    };
    set_pending_add_liquidity(env, &receipt);

    events::emit_add_liquidity(env, position_id, liquidity, amount_a, amount_b);
    receipt
}

/// Consume an add-liquidity receipt by paying the owed amounts in
pub fn repay_add_liquidity(env: &Env, payer: Address, receipt: AddLiquidityReceipt) {
    payer.require_auth();

    let pending = match get_pending_add_liquidity(env) {
        Some(pending) => pending,
        None => panic_with_error!(env, PoolError::OutstandingReceipt),
    };
    if receipt.pool != env.current_contract_address() {
        panic_with_error!(env, PoolError::PoolIdMismatch);
    }
    if receipt != pending {
        panic_with_error!(env, PoolError::InvalidPoolOrPartnerId);
    }

    let config = get_config(env);
    let contract = env.current_contract_address();
    if receipt.amount_a > 0 {
        token::Client::new(env, &config.token_a).transfer(
            &payer,
            &contract,
            &(receipt.amount_a as i128),
        );
    }
    if receipt.amount_b > 0 {
        token::Client::new(env, &config.token_b).transfer(
            &payer,
            &contract,
            &(receipt.amount_b as i128),
        );
    }

    let mut state = get_state(env);
    state.reserve_a = match state.reserve_a.checked_add(receipt.amount_a) {
        Some(reserve) => reserve,
        None => panic_with_error!(env, PoolError::AmountInOverflow),
    };
    state.reserve_b = match state.reserve_b.checked_add(receipt.amount_b) {
        Some(reserve) => reserve,
        None => panic_with_error!(env, PoolError::AmountInOverflow),
    };
    set_state(env, &state);

    clear_pending_add_liquidity(env);
    events::emit_repay_add_liquidity(env, receipt.position_id, receipt.amount_a, receipt.amount_b);
}

/// Withdraw liquidity; amounts are rounded toward the pool and paid to
/// the position owner immediately
pub fn remove_liquidity(
    env: &Env,
    caller: Address,
    position_id: u64,
    liquidity: u128,
) -> (u64, u64) {
    assert_mutable(env);
    caller.require_auth();

    let mut state = get_state(env);
    let mut pos = position::require_position(env, position_id);
    if pos.owner != caller {
        panic_with_error!(env, PoolError::NotOwner);
    }
    if pos.is_staked {
        panic_with_error!(env, PoolError::PositionIsStaked);
    }
    if liquidity == 0 {
        panic_with_error!(env, PoolError::ZeroLiquidity);
    }
    if pos.liquidity < liquidity {
        panic_with_error!(env, PoolError::InsufficientLiquidity);
    }

    let delta: i128 = match liquidity.try_into() {
        Ok(delta) => delta,
        Err(_) => panic_with_error!(env, PoolError::InsufficientLiquidity),
    };

    let (_rewarders, globals) = settle_streams(env, &state);
    apply_tick_updates(env, &pos, &state, -delta, &globals);
    accrue_position(env, &mut pos, &state, &globals);

    pos.liquidity -= liquidity;
    set_position(env, position_id, &pos);

    let (amount_a, amount_b) = get_amounts_for_liquidity(
        env,
        state.sqrt_price,
        get_sqrt_price_at_tick(env, pos.tick_lower),
        get_sqrt_price_at_tick(env, pos.tick_upper),
        liquidity,
        false,
    );
    let amount_a = match amount_a.try_into() {
        Ok(amount) => amount,
        Err(_) => panic_with_error!(env, PoolError::AmountOutOverflow),
    };
    let amount_b: u64 = match amount_b.try_into() {
        Ok(amount) => amount,
        Err(_) => panic_with_error!(env, PoolError::AmountOutOverflow),
    };

    if pos.tick_lower <= state.tick && state.tick < pos.tick_upper {
        state.liquidity = match try_add_delta(state.liquidity, -delta) {
            Some(liquidity) => liquidity,
            None => panic_with_error!(env, PoolError::InsufficientLiquidity),
        };
    }
    state.reserve_a = match state.reserve_a.checked_sub(amount_a) {
        Some(reserve) => reserve,
        None => panic_with_error!(env, PoolError::InsufficientAmount),
    };
    state.reserve_b = match state.reserve_b.checked_sub(amount_b) {
        Some(reserve) => reserve,
        None => panic_with_error!(env, PoolError::InsufficientAmount),
    };
    set_state(env, &state);

    let config = get_config(env);
    let contract = env.current_contract_address();
    if amount_a > 0 {
        token::Client::new(env, &config.token_a).transfer(&contract, &caller, &(amount_a as i128));
    }
    if amount_b > 0 {
        token::Client::new(env, &config.token_b).transfer(&contract, &caller, &(amount_b as i128));
    }

    events::emit_remove_liquidity(env, position_id, liquidity, amount_a, amount_b);
    (amount_a, amount_b)
}

/// Collect a position's accrued swap fees
pub fn collect_fee(env: &Env, caller: Address, position_id: u64, update_growth: bool) -> (u64, u64) {
    assert_mutable(env);
    caller.require_auth();

    let mut pos = position::require_position(env, position_id);
    if pos.owner != caller {
        panic_with_error!(env, PoolError::NotOwner);
    }

    if update_growth && pos.liquidity != 0 {
        let state = get_state(env);
        let (inside_a, inside_b) = tick::get_fee_growth_inside(
            env,
            pos.tick_lower,
            pos.tick_upper,
            state.tick,
            state.fee_growth_global_a,
            state.fee_growth_global_b,
        );
        position::accrue_fees(env, &mut pos, inside_a, inside_b);
    }

    let amount_a = pos.fee_owed_a;
    let amount_b = pos.fee_owed_b;
    pos.fee_owed_a = 0;
    pos.fee_owed_b = 0;
    set_position(env, position_id, &pos);

    let mut state = get_state(env);
    state.reserve_a = match state.reserve_a.checked_sub(amount_a) {
        Some(reserve) => reserve,
        None => panic_with_error!(env, PoolError::InsufficientAmount),
    };
    state.reserve_b = match state.reserve_b.checked_sub(amount_b) {
        Some(reserve) => reserve,
        None => panic_with_error!(env, PoolError::InsufficientAmount),
    };
    set_state(env, &state);

    let config = get_config(env);
    let contract = env.current_contract_address();
    if amount_a > 0 {
        token::Client::new(env, &config.token_a).transfer(&contract, &caller, &(amount_a as i128));
    }
    if amount_b > 0 {
        token::Client::new(env, &config.token_b).transfer(&contract, &caller, &(amount_b as i128));
    }

    events::emit_collect_fee(env, position_id, amount_a, amount_b);
    (amount_a, amount_b)
}

/// Collect a position's accrued rewards for one reward token
pub fn collect_reward(env: &Env, caller: Address, position_id: u64, reward_token: Address) -> u64 {
    assert_mutable(env);
    caller.require_auth();

    let mut pos = position::require_position(env, position_id);
    if pos.owner != caller {
        panic_with_error!(env, PoolError::NotOwner);
    }

    let state = get_state(env);
    let now = env.ledger().timestamp();
    let rewarders = rewarder::settle(env, state.liquidity, now);
    let slot = match rewarders.rewarder_index(&reward_token) {
        Some(slot) => slot,
        None => panic_with_error!(env, PoolError::RewarderIndexNotFound),
    };

    let globals = rewarder::reward_growths_global(env, &rewarders);
    let inside = tick::get_reward_growths_inside(
        env,
        pos.tick_lower,
        pos.tick_upper,
        state.tick,
        &globals,
    );
    position::accrue_rewards(env, &mut pos, &inside);

    let amount = pos.rewards_owed.get(slot).unwrap_or(0);
    pos.rewards_owed.set(slot, 0);
    set_position(env, position_id, &pos);

    if amount > 0 {
        token::Client::new(env, &reward_token).transfer(
            &env.current_contract_address(),
            &caller,
            &(amount as i128),
        );
    }

    events::emit_collect_reward(env, position_id, &reward_token, amount);
    amount
}

/// Collect a staked position's accrued gauge emission
pub fn collect_emission(env: &Env, caller: Address, position_id: u64) -> u64 {
    assert_mutable(env);
    caller.require_auth();

    let gauge = emission::require_gauge(env);
    let mut pos = position::require_position(env, position_id);
    if pos.owner != caller {
        panic_with_error!(env, PoolError::NotOwner);
    }

    let state = get_state(env);
    let now = env.ledger().timestamp();
    let mut emission_state = get_emission(env);
    emission::update_growth(env, &mut emission_state, now);
    set_emission(env, &emission_state);

    if pos.is_staked {
        let inside = tick::get_emission_growth_inside(
            env,
            pos.tick_lower,
            pos.tick_upper,
            state.tick,
            emission_state.growth_global_x64,
        );
        position::accrue_emission(env, &mut pos, inside);
    }

    let amount = pos.emission_owed;
    pos.emission_owed = 0;
    set_position(env, position_id, &pos);

    if amount > 0 {
        token::Client::new(env, &gauge.emission_token).transfer(
            &env.current_contract_address(),
            &caller,
            &(amount as i128),
        );
    }

    events::emit_collect_emission(env, position_id, amount);
    amount
}

/// Fund reward or emission payouts
pub fn deposit_reward(env: &Env, from: Address, token: Address, amount: u64) {
    assert_mutable(env);
    from.require_auth();
    if amount == 0 {
        panic_with_error!(env, PoolError::ZeroAmount);
    }
    token::Client::new(env, &token).transfer(
        &from,
        &env.current_contract_address(),
        &(amount as i128),
    );
    events::emit_deposit_reward(env, &token, amount);
}

/// Settle the rewarder and emission streams to now and capture every
/// growth global for tick seeding
fn settle_streams(env: &Env, state: &PoolState) -> (RewarderState, GrowthGlobals) {
    let now = env.ledger().timestamp();
    let rewarders = rewarder::settle(env, state.liquidity, now);
    let mut emission_state = get_emission(env);
    emission::update_growth(env, &mut emission_state, now);
    set_emission(env, &emission_state);

    let globals = GrowthGlobals {
        fee_a: state.fee_growth_global_a,
        fee_b: state.fee_growth_global_b,
        rewards: rewarder::reward_growths_global(env, &rewarders),
        points: rewarders.points_growth_global,
        emission: emission_state.growth_global_x64,
    };
    (rewarders, globals)
}

fn apply_tick_updates(
    env: &Env,
    pos: &PositionInfo,
    state: &PoolState,
    delta: i128,
    globals: &GrowthGlobals,
) {
    let config = get_config(env);
    let flipped_lower = tick::update(env, pos.tick_lower, state.tick, delta, globals, false);
    let flipped_upper = tick::update(env, pos.tick_upper, state.tick, delta, globals, true);
    if flipped_lower {
        tick::flip_tick(env, pos.tick_lower, config.tick_spacing);
    }
    if flipped_upper {
        tick::flip_tick(env, pos.tick_upper, config.tick_spacing);
    }
}

/// Refresh the fee, reward and points dimensions from the post-update
/// tick state
fn accrue_position(env: &Env, pos: &mut PositionInfo, state: &PoolState, globals: &GrowthGlobals) {
    let (inside_a, inside_b) = tick::get_fee_growth_inside(
        env,
        pos.tick_lower,
        pos.tick_upper,
        state.tick,
        globals.fee_a,
        globals.fee_b,
    );
    position::accrue_fees(env, pos, inside_a, inside_b);

    let rewards_inside: Vec<u128> = tick::get_reward_growths_inside(
        env,
        pos.tick_lower,
        pos.tick_upper,
        state.tick,
        &globals.rewards,
    );
    position::accrue_rewards(env, pos, &rewards_inside);

    let points_inside = tick::get_points_growth_inside(
        env,
        pos.tick_lower,
        pos.tick_upper,
        state.tick,
        globals.points,
    );
    position::accrue_points(env, pos, points_inside);
}
