// Pool events module
// Every mutating entry point publishes exactly one event; ordering of
// events matches operation ordering.

use soroban_sdk::{Address, Env, String, Symbol};

/// Emitted when the pool is initialized
/// Topics: ("init_pool",)
/// Data: (token_a, token_b, index, tick_spacing, fee_rate, sqrt_price)
pub fn emit_init_pool(
    env: &Env,
    token_a: &Address,
    token_b: &Address,
    index: u32,
    tick_spacing: i32,
    fee_rate: u64,
    sqrt_price: u128,
) {
    env.events().publish(
        (Symbol::new(env, "init_pool"),),
        (
            token_a.clone(),
            token_b.clone(),
            index,
            tick_spacing,
            fee_rate,
            sqrt_price,
        ),
    );
}

/// Topics: ("open_position",)
/// Data: (position_id, owner, tick_lower, tick_upper)
pub fn emit_open_position(
    env: &Env,
    position_id: u64,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
) {
    env.events().publish(
        (Symbol::new(env, "open_position"),),
        (position_id, owner.clone(), tick_lower, tick_upper),
    );
}

/// Topics: ("close_position",)
/// Data: (position_id,)
pub fn emit_close_position(env: &Env, position_id: u64) {
    env.events()
        .publish((Symbol::new(env, "close_position"),), (position_id,));
}

/// Topics: ("add_liquidity",)
/// Data: (position_id, liquidity, amount_a, amount_b)
pub fn emit_add_liquidity(
    env: &Env,
    position_id: u64,
    liquidity: u128,
    amount_a: u64,
    amount_b: u64,
) {
    env.events().publish(
        (Symbol::new(env, "add_liquidity"),),
        (position_id, liquidity, amount_a, amount_b),
    );
}

/// Topics: ("repay_add_liquidity",)
/// Data: (position_id, amount_a, amount_b)
pub fn emit_repay_add_liquidity(env: &Env, position_id: u64, amount_a: u64, amount_b: u64) {
    env.events().publish(
        (Symbol::new(env, "repay_add_liquidity"),),
        (position_id, amount_a, amount_b),
    );
}

/// Topics: ("remove_liquidity",)
/// Data: (position_id, liquidity, amount_a, amount_b)
pub fn emit_remove_liquidity(
    env: &Env,
    position_id: u64,
    liquidity: u128,
    amount_a: u64,
    amount_b: u64,
) {
    env.events().publish(
        (Symbol::new(env, "remove_liquidity"),),
        (position_id, liquidity, amount_a, amount_b),
    );
}

/// Topics: ("swap",)
/// Data: (a2b, amount_in, amount_out, fee_amount, sqrt_price_before, sqrt_price_after, steps)
pub fn emit_swap(
    env: &Env,
    a2b: bool,
    amount_in: u64,
    amount_out: u64,
    fee_amount: u64,
    sqrt_price_before: u128,
    sqrt_price_after: u128,
    steps: u32,
) {
    env.events().publish(
        (Symbol::new(env, "swap"),),
        (
            a2b,
            amount_in,
            amount_out,
            fee_amount,
            sqrt_price_before,
            sqrt_price_after,
            steps,
        ),
    );
}

/// Topics: ("flash_swap",)
/// Data: (a2b, amount_out, pay_amount, fee_amount)
pub fn emit_flash_swap(env: &Env, a2b: bool, amount_out: u64, pay_amount: u64, fee_amount: u64) {
    env.events().publish(
        (Symbol::new(env, "flash_swap"),),
        (a2b, amount_out, pay_amount, fee_amount),
    );
}

/// Topics: ("repay_flash_swap",)
/// Data: (a2b, pay_amount, ref_fee_amount)
pub fn emit_repay_flash_swap(env: &Env, a2b: bool, pay_amount: u64, ref_fee_amount: u64) {
    env.events().publish(
        (Symbol::new(env, "repay_flash_swap"),),
        (a2b, pay_amount, ref_fee_amount),
    );
}

/// Topics: ("collect_protocol_fee",)
/// Data: (recipient, amount_a, amount_b)
pub fn emit_collect_protocol_fee(env: &Env, recipient: &Address, amount_a: u64, amount_b: u64) {
    env.events().publish(
        (Symbol::new(env, "collect_protocol_fee"),),
        (recipient.clone(), amount_a, amount_b),
    );
}

/// Topics: ("collect_fee",)
/// Data: (position_id, amount_a, amount_b)
pub fn emit_collect_fee(env: &Env, position_id: u64, amount_a: u64, amount_b: u64) {
    env.events().publish(
        (Symbol::new(env, "collect_fee"),),
        (position_id, amount_a, amount_b),
    );
}

/// Topics: ("collect_reward",)
/// Data: (position_id, reward_token, amount)
pub fn emit_collect_reward(env: &Env, position_id: u64, reward_token: &Address, amount: u64) {
    env.events().publish(
        (Symbol::new(env, "collect_reward"),),
        (position_id, reward_token.clone(), amount),
    );
}

/// Topics: ("collect_emission",)
/// Data: (position_id, amount)
pub fn emit_collect_emission(env: &Env, position_id: u64, amount: u64) {
    env.events()
        .publish((Symbol::new(env, "collect_emission"),), (position_id, amount));
}

/// Topics: ("collect_gauge_fee",)
/// Data: (recipient, amount_a, amount_b)
pub fn emit_collect_gauge_fee(env: &Env, recipient: &Address, amount_a: u64, amount_b: u64) {
    env.events().publish(
        (Symbol::new(env, "collect_gauge_fee"),),
        (recipient.clone(), amount_a, amount_b),
    );
}

/// Topics: ("deposit_reward",)
/// Data: (token, amount)
pub fn emit_deposit_reward(env: &Env, token: &Address, amount: u64) {
    env.events()
        .publish((Symbol::new(env, "deposit_reward"),), (token.clone(), amount));
}

/// Topics: ("update_fee_rate",)
/// Data: (old_fee_rate, new_fee_rate)
pub fn emit_update_fee_rate(env: &Env, old_fee_rate: u64, new_fee_rate: u64) {
    env.events().publish(
        (Symbol::new(env, "update_fee_rate"),),
        (old_fee_rate, new_fee_rate),
    );
}

/// Topics: ("update_unstaked_fee_rate",)
/// Data: (old_rate, new_rate)
pub fn emit_update_unstaked_fee_rate(env: &Env, old_rate: u64, new_rate: u64) {
    env.events().publish(
        (Symbol::new(env, "update_unstaked_fee_rate"),),
        (old_rate, new_rate),
    );
}

/// Topics: ("update_pool_url",)
/// Data: (url,)
pub fn emit_update_pool_url(env: &Env, url: &String) {
    env.events()
        .publish((Symbol::new(env, "update_pool_url"),), (url.clone(),));
}

/// Topics: ("pause",) / ("unpause",)
pub fn emit_pause(env: &Env) {
    env.events().publish((Symbol::new(env, "pause"),), ());
}

pub fn emit_unpause(env: &Env) {
    env.events().publish((Symbol::new(env, "unpause"),), ());
}

/// Topics: ("add_rewarder",)
/// Data: (token, slot)
pub fn emit_add_rewarder(env: &Env, token: &Address, slot: u32) {
    env.events()
        .publish((Symbol::new(env, "add_rewarder"),), (token.clone(), slot));
}

/// Topics: ("update_rewarder_emission",)
/// Data: (token, emissions_per_second_x64)
pub fn emit_update_rewarder_emission(env: &Env, token: &Address, emissions_per_second_x64: u128) {
    env.events().publish(
        (Symbol::new(env, "update_rewarder_emission"),),
        (token.clone(), emissions_per_second_x64),
    );
}

/// Topics: ("init_gauge",)
/// Data: (gauge, emission_token)
pub fn emit_init_gauge(env: &Env, gauge: &Address, emission_token: &Address) {
    env.events().publish(
        (Symbol::new(env, "init_gauge"),),
        (gauge.clone(), emission_token.clone()),
    );
}

/// Topics: ("sync_emission",)
/// Data: (rate_x64, reserve, period_finish, distributed)
pub fn emit_sync_emission(
    env: &Env,
    rate_x64: u128,
    reserve: u64,
    period_finish: u64,
    distributed: u64,
) {
    env.events().publish(
        (Symbol::new(env, "sync_emission"),),
        (rate_x64, reserve, period_finish, distributed),
    );
}

/// Topics: ("stake_position",) / ("unstake_position",)
/// Data: (position_id, staked_liquidity)
pub fn emit_stake_position(env: &Env, position_id: u64, staked_liquidity: u128) {
    env.events().publish(
        (Symbol::new(env, "stake_position"),),
        (position_id, staked_liquidity),
    );
}

pub fn emit_unstake_position(env: &Env, position_id: u64, staked_liquidity: u128) {
    env.events().publish(
        (Symbol::new(env, "unstake_position"),),
        (position_id, staked_liquidity),
    );
}

/// Topics: ("restore_staked_liquidity",)
/// Data: (staked_liquidity,)
pub fn emit_restore_staked_liquidity(env: &Env, staked_liquidity: u128) {
    env.events().publish(
        (Symbol::new(env, "restore_staked_liquidity"),),
        (staked_liquidity,),
    );
}

/// Topics: ("register_partner",)
/// Data: (partner, ref_fee_rate, start_time, end_time)
pub fn emit_register_partner(
    env: &Env,
    partner: &Address,
    ref_fee_rate: u64,
    start_time: u64,
    end_time: u64,
) {
    env.events().publish(
        (Symbol::new(env, "register_partner"),),
        (partner.clone(), ref_fee_rate, start_time, end_time),
    );
}

/// Topics: ("claim_ref_fee",)
/// Data: (partner, amount_a, amount_b)
pub fn emit_claim_ref_fee(env: &Env, partner: &Address, amount_a: u64, amount_b: u64) {
    env.events().publish(
        (Symbol::new(env, "claim_ref_fee"),),
        (partner.clone(), amount_a, amount_b),
    );
}
