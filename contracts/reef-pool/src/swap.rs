// Swap engine: multi-step price traversal along the tick grid.
//
// One step loop serves both the committing execution and the read-only
// preview; `commit` gates every storage write. Each step splits the fee
// into referral, protocol, gauge and LP shares in that order, credits the
// LP share to fee growth, and crosses the boundary tick when the step
// reaches it. The emission stream accrues between the tick-index update
// and the cross.

use crate::error::PoolError;
use crate::events;
use crate::partner;
use crate::rewarder;
use crate::storage::{
    clear_pending_flash_swap, get_config, get_emission, get_pending_flash_swap, get_rewarders,
    get_state, get_tick, set_emission, set_pending_flash_swap, set_state,
};
use crate::tick::{self, GrowthGlobals};
use crate::{emission as emission_stream, liquidity::assert_mutable};
use reef_math::liquidity_math::try_add_delta;
use reef_math::mul_div_rounding_up;
use reef_math::swap_math::compute_swap_step;
use reef_math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use reef_types::{
    CalculatedSwapResult, FlashSwapReceipt, SwapResult, FEE_RATE_DENOM, MAX_SQRT_PRICE,
    MAX_TICK, MIN_SQRT_PRICE, MIN_TICK, UNSTAKED_FEE_DENOM, UNSTAKED_FEE_RATE_DEFAULT,
};
use soroban_sdk::{panic_with_error, token, Address, Env};

/// Outcome of one swap engine run
pub struct SwapOutcome {
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub protocol_fee_amount: u64,
    pub ref_fee_amount: u64,
    pub gauge_fee_amount: u64,
    pub steps: u32,
    pub sqrt_price_before: u128,
    pub sqrt_price_after: u128,
    pub is_exceed: bool,
}

/// The pool's unstaked fee rate, resolving the inherit sentinel against
/// the configured default
pub fn resolve_unstaked_fee_rate(unstaked_fee_rate: u64, default_rate: u64) -> u64 {
    if unstaked_fee_rate == UNSTAKED_FEE_RATE_DEFAULT {
        default_rate
    } else {
        unstaked_fee_rate
    }
}

/// Split one step's fee into (referral, protocol, gauge, lp) shares
///
/// Ordered: referral off the top, protocol off the remainder, then the
/// gauge split over the post-protocol amount. When every active unit is
/// staked the whole remainder goes to the gauge and nothing reaches LP
/// growth.
fn split_fee(
    env: &Env,
    fee: u64,
    ref_fee_rate: u64,
    protocol_fee_rate: u64,
    unstaked_fee_rate: u64,
    liquidity: u128,
    staked_liquidity: u128,
) -> (u64, u64, u64, u64) {
    if fee == 0 {
        return (0, 0, 0, 0);
    }

    let ref_fee = mul_div_rounding_up(
        env,
        fee as u128,
        ref_fee_rate as u128,
        FEE_RATE_DENOM as u128,
    ) as u64;
    let remaining_fee = fee - ref_fee;

    let protocol_fee = mul_div_rounding_up(
        env,
        remaining_fee as u128,
        protocol_fee_rate as u128,
        FEE_RATE_DENOM as u128,
    ) as u64;
    let after_protocol = remaining_fee - protocol_fee;

    let gauge_fee = if staked_liquidity >= liquidity {
        after_protocol
    } else if staked_liquidity > 0 {
        let staked_share = mul_div_rounding_up(
            env,
            after_protocol as u128,
            staked_liquidity,
            liquidity,
        );
        mul_div_rounding_up(
            env,
            staked_share,
            unstaked_fee_rate as u128,
            UNSTAKED_FEE_DENOM as u128,
        ) as u64
    } else {
        mul_div_rounding_up(
            env,
            after_protocol as u128,
            unstaked_fee_rate as u128,
            UNSTAKED_FEE_DENOM as u128,
        ) as u64
    };

    (ref_fee, protocol_fee, gauge_fee, after_protocol - gauge_fee)
}

fn to_u64(env: &Env, value: u128, overflow: PoolError) -> u64 {
    match value.try_into() {
        Ok(value) => value,
        Err(_) => panic_with_error!(env, overflow),
    }
}

fn checked_add_u64(env: &Env, a: u64, b: u64, overflow: PoolError) -> u64 {
    match a.checked_add(b) {
        Some(sum) => sum,
        None => panic_with_error!(env, overflow),
    }
}

/// Run the swap engine
///
/// The loop terminates when the remaining amount drains or the price
/// reaches the limit. A missing next tick aborts a committing run with
/// NextTickNotFound; a simulation reports the partial result with
/// `is_exceed` set instead.
pub fn swap_in_pool(
    env: &Env,
    a2b: bool,
    by_amount_in: bool,
    sqrt_price_limit: u128,
    amount: u64,
    unstaked_fee_rate: u64,
    protocol_fee_rate: u64,
    ref_fee_rate: u64,
    commit: bool,
) -> SwapOutcome {
    let config = get_config(env);
    let mut state = get_state(env);

    if amount == 0 {
        panic_with_error!(env, PoolError::ZeroAmount);
    }
    if ref_fee_rate > FEE_RATE_DENOM {
        panic_with_error!(env, PoolError::InvalidRefFeeRate);
    }
    if a2b {
        if sqrt_price_limit >= state.sqrt_price || sqrt_price_limit < MIN_SQRT_PRICE {
            panic_with_error!(env, PoolError::InvalidPriceLimit);
        }
    } else {
        if sqrt_price_limit <= state.sqrt_price || sqrt_price_limit > MAX_SQRT_PRICE {
            panic_with_error!(env, PoolError::InvalidPriceLimit);
        }
    }

    let now = env.ledger().timestamp();
    let mut emission = get_emission(env);
    let rewarders = if commit {
        rewarder::settle(env, state.liquidity, now)
    } else {
        get_rewarders(env)
    };
    let reward_globals = rewarder::reward_growths_global(env, &rewarders);

    let sqrt_price_before = state.sqrt_price;
    let mut sqrt_price = state.sqrt_price;
    let mut current_tick = state.tick;
    let mut liquidity = state.liquidity;
    let mut staked_liquidity = emission.staked_liquidity;
    let mut fee_growth_global = if a2b {
        state.fee_growth_global_a
    } else {
        state.fee_growth_global_b
    };

    let mut remaining = amount;
    let mut amount_in: u64 = 0;
    let mut amount_out: u64 = 0;
    let mut fee_amount: u64 = 0;
    let mut protocol_fee_amount: u64 = 0;
    let mut ref_fee_amount: u64 = 0;
    let mut gauge_fee_amount: u64 = 0;
    let mut steps: u32 = 0;

    while remaining > 0 && sqrt_price != sqrt_price_limit {
        let tick_next = match tick::next_initialized_tick(env, current_tick, config.tick_spacing, a2b)
        {
            Some(tick_next) => tick_next.clamp(MIN_TICK, MAX_TICK),
            None => {
                if commit {
                    panic_with_error!(env, PoolError::NextTickNotFound);
                }
                break;
            }
        };

        let sqrt_price_next = get_sqrt_price_at_tick(env, tick_next);

        let sqrt_price_target = if a2b {
            sqrt_price_limit.max(sqrt_price_next)
        } else {
            sqrt_price_limit.min(sqrt_price_next)
        };

        let step = compute_swap_step(
            env,
            sqrt_price,
            sqrt_price_target,
            liquidity,
            remaining,
            config.fee_rate,
            by_amount_in,
        );
        steps += 1;

        let step_in = to_u64(env, step.amount_in, PoolError::AmountInOverflow);
        let step_out = to_u64(env, step.amount_out, PoolError::AmountOutOverflow);
        let step_fee = to_u64(env, step.fee_amount, PoolError::FeeAmountOverflow);

        amount_in = checked_add_u64(env, amount_in, step_in, PoolError::AmountInOverflow);
        amount_out = checked_add_u64(env, amount_out, step_out, PoolError::AmountOutOverflow);
        fee_amount = checked_add_u64(env, fee_amount, step_fee, PoolError::FeeAmountOverflow);

        if by_amount_in {
            let consumed = checked_add_u64(env, step_in, step_fee, PoolError::AmountInOverflow);
            remaining = match remaining.checked_sub(consumed) {
                Some(remaining) => remaining,
                None => panic_with_error!(env, PoolError::InsufficientAmount),
            };
        } else {
            remaining = match remaining.checked_sub(step_out) {
                Some(remaining) => remaining,
                None => panic_with_error!(env, PoolError::InsufficientAmount),
            };
        }

        let (step_ref, step_protocol, step_gauge, step_lp) = split_fee(
            env,
            step_fee,
            ref_fee_rate,
            protocol_fee_rate,
            unstaked_fee_rate,
            liquidity,
            staked_liquidity,
        );
        ref_fee_amount = checked_add_u64(env, ref_fee_amount, step_ref, PoolError::FeeAmountOverflow);
        protocol_fee_amount =
            checked_add_u64(env, protocol_fee_amount, step_protocol, PoolError::FeeAmountOverflow);
        gauge_fee_amount =
            checked_add_u64(env, gauge_fee_amount, step_gauge, PoolError::FeeAmountOverflow);

        if liquidity > 0 && step_lp > 0 {
            fee_growth_global = fee_growth_global.wrapping_add(((step_lp as u128) << 64) / liquidity);
        }

        if step.sqrt_price_next == sqrt_price_next {
            // Reached the boundary tick: move past it and cross
            sqrt_price = sqrt_price_next;
            current_tick = if a2b { tick_next - 1 } else { tick_next };

            let (net, staked_net) = if commit {
                emission_stream::update_growth(env, &mut emission, now);
                let globals = GrowthGlobals {
                    fee_a: if a2b {
                        fee_growth_global
                    } else {
                        state.fee_growth_global_a
                    },
                    fee_b: if a2b {
                        state.fee_growth_global_b
                    } else {
                        fee_growth_global
                    },
                    rewards: reward_globals.clone(),
                    points: rewarders.points_growth_global,
                    emission: emission.growth_global_x64,
                };
                tick::cross(env, tick_next, &globals)
            } else {
                let info = get_tick(env, tick_next);
                (info.liquidity_net, info.staked_liquidity_net)
            };

            let (net, staked_net) = if a2b {
                let negated = net.checked_neg().zip(staked_net.checked_neg());
                match negated {
                    Some(deltas) => deltas,
                    None => panic_with_error!(env, PoolError::InsufficientLiquidity),
                }
            } else {
                (net, staked_net)
            };

            liquidity = match try_add_delta(liquidity, net) {
                Some(liquidity) => liquidity,
                None => panic_with_error!(env, PoolError::InsufficientLiquidity),
            };
            staked_liquidity = match try_add_delta(staked_liquidity, staked_net) {
                Some(staked) => staked,
                None => panic_with_error!(env, PoolError::InsufficientStakedLiquidity),
            };
        } else if step.sqrt_price_next != sqrt_price {
            // Price moved but stayed within the tick range
            sqrt_price = step.sqrt_price_next;
            current_tick = get_tick_at_sqrt_price(env, sqrt_price);
        }
    }

    if commit {
        state.sqrt_price = sqrt_price;
        state.tick = current_tick;
        state.liquidity = liquidity;
        if a2b {
            state.fee_growth_global_a = fee_growth_global;
            state.protocol_fee_a = checked_add_u64(
                env,
                state.protocol_fee_a,
                protocol_fee_amount,
                PoolError::FeeAmountOverflow,
            );
            state.gauge_fee_a = checked_add_u64(
                env,
                state.gauge_fee_a,
                gauge_fee_amount,
                PoolError::FeeAmountOverflow,
            );
        } else {
            state.fee_growth_global_b = fee_growth_global;
            state.protocol_fee_b = checked_add_u64(
                env,
                state.protocol_fee_b,
                protocol_fee_amount,
                PoolError::FeeAmountOverflow,
            );
            state.gauge_fee_b = checked_add_u64(
                env,
                state.gauge_fee_b,
                gauge_fee_amount,
                PoolError::FeeAmountOverflow,
            );
        }
        emission.staked_liquidity = staked_liquidity;
        set_emission(env, &emission);
        set_state(env, &state);
    }

    SwapOutcome {
        amount_in,
        amount_out,
        fee_amount,
        protocol_fee_amount,
        ref_fee_amount,
        gauge_fee_amount,
        steps,
        sqrt_price_before,
        sqrt_price_after: sqrt_price,
        is_exceed: remaining > 0,
    }
}

/// Resolve the three live fee rates for a swap
fn live_fee_rates(env: &Env, referral: Option<&Address>) -> (u64, u64, u64) {
    let config = get_config(env);
    let unstaked =
        resolve_unstaked_fee_rate(config.unstaked_fee_rate, config.default_unstaked_fee_rate);
    let ref_rate = match referral {
        Some(address) => {
            let info = partner::require_partner(env, address);
            info.current_ref_fee_rate(env.ledger().timestamp())
        }
        None => 0,
    };
    (unstaked, config.protocol_fee_rate, ref_rate)
}

/// Execute a swap, settling both transfers in one call
pub fn execute_swap(
    env: &Env,
    payer: Address,
    a2b: bool,
    by_amount_in: bool,
    amount: u64,
    sqrt_price_limit: u128,
    referral: Option<Address>,
) -> SwapResult {
    assert_mutable(env);
    payer.require_auth();

    let (unstaked_rate, protocol_rate, ref_rate) = live_fee_rates(env, referral.as_ref());
    let outcome = swap_in_pool(
        env,
        a2b,
        by_amount_in,
        sqrt_price_limit,
        amount,
        unstaked_rate,
        protocol_rate,
        ref_rate,
        true,
    );

    if outcome.amount_out == 0 {
        panic_with_error!(env, PoolError::ZeroOutputAmount);
    }

    let pay_amount = checked_add_u64(
        env,
        outcome.amount_in,
        outcome.fee_amount,
        PoolError::AmountInOverflow,
    );
    settle_input(env, &payer, a2b, pay_amount, &outcome, referral.as_ref());

    let config = get_config(env);
    let token_out = if a2b { config.token_b } else { config.token_a };
    let mut state = get_state(env);
    let reserve_out = if a2b {
        &mut state.reserve_b
    } else {
        &mut state.reserve_a
    };
    *reserve_out = match reserve_out.checked_sub(outcome.amount_out) {
        Some(reserve) => reserve,
        None => panic_with_error!(env, PoolError::InsufficientAmount),
    };
    set_state(env, &state);
    token::Client::new(env, &token_out).transfer(
        &env.current_contract_address(),
        &payer,
        &(outcome.amount_out as i128),
    );

    events::emit_swap(
        env,
        a2b,
        outcome.amount_in,
        outcome.amount_out,
        outcome.fee_amount,
        outcome.sqrt_price_before,
        outcome.sqrt_price_after,
        outcome.steps,
    );

    SwapResult {
        amount_in: outcome.amount_in,
        amount_out: outcome.amount_out,
        fee_amount: outcome.fee_amount,
        protocol_fee_amount: outcome.protocol_fee_amount,
        ref_fee_amount: outcome.ref_fee_amount,
        gauge_fee_amount: outcome.gauge_fee_amount,
        steps: outcome.steps,
    }
}

/// Pull the input payment and book it: escrows were already credited by
/// the engine, the referral share goes to the partner, the rest joins the
/// reserve.
fn settle_input(
    env: &Env,
    payer: &Address,
    a2b: bool,
    pay_amount: u64,
    outcome: &SwapOutcome,
    referral: Option<&Address>,
) {
    let config = get_config(env);
    let token_in = if a2b { config.token_a } else { config.token_b };
    token::Client::new(env, &token_in).transfer(
        payer,
        &env.current_contract_address(),
        &(pay_amount as i128),
    );

    let retained = pay_amount
        - outcome.protocol_fee_amount
        - outcome.ref_fee_amount
        - outcome.gauge_fee_amount;

    let mut state = get_state(env);
    let reserve_in = if a2b {
        &mut state.reserve_a
    } else {
        &mut state.reserve_b
    };
    *reserve_in = checked_add_u64(env, *reserve_in, retained, PoolError::AmountInOverflow);
    set_state(env, &state);

    if let Some(address) = referral {
        partner::credit_ref_fee(env, address, a2b, outcome.ref_fee_amount);
    }
}

/// Execute the swap and hand out the output immediately; payment is owed
/// against the returned receipt
pub fn flash_swap(
    env: &Env,
    recipient: Address,
    a2b: bool,
    by_amount_in: bool,
    amount: u64,
    sqrt_price_limit: u128,
    referral: Option<Address>,
) -> (u64, FlashSwapReceipt) {
    assert_mutable(env);

    let (unstaked_rate, protocol_rate, ref_rate) = live_fee_rates(env, referral.as_ref());
    let outcome = swap_in_pool(
        env,
        a2b,
        by_amount_in,
        sqrt_price_limit,
        amount,
        unstaked_rate,
        protocol_rate,
        ref_rate,
        true,
    );

    if outcome.amount_out == 0 {
        panic_with_error!(env, PoolError::ZeroOutputAmount);
    }

    let pay_amount = checked_add_u64(
        env,
        outcome.amount_in,
        outcome.fee_amount,
        PoolError::AmountInOverflow,
    );

    let config = get_config(env);
    let token_out = if a2b { config.token_b } else { config.token_a };
    let mut state = get_state(env);
    let reserve_out = if a2b {
        &mut state.reserve_b
    } else {
        &mut state.reserve_a
    };
    *reserve_out = match reserve_out.checked_sub(outcome.amount_out) {
        Some(reserve) => reserve,
        None => panic_with_error!(env, PoolError::InsufficientAmount),
    };
    set_state(env, &state);
    token::Client::new(env, &token_out).transfer(
        &env.current_contract_address(),
        &recipient,
        &(outcome.amount_out as i128),
    );

    let receipt = FlashSwapReceipt {
        pool: env.current_contract_address(),
        a2b,
        partner: referral,
        pay_amount,
        fee_amount: outcome.fee_amount,
        protocol_fee_amount: outcome.protocol_fee_amount,
        ref_fee_amount: outcome.ref_fee_amount,
        gauge_fee_amount: outcome.gauge_fee_amount,
    };
    set_pending_flash_swap(env, &receipt);

    events::emit_flash_swap(env, a2b, outcome.amount_out, pay_amount, outcome.fee_amount);
    (outcome.amount_out, receipt)
}

/// Consume a flash swap receipt by paying the owed input amount
pub fn repay_flash_swap(
    env: &Env,
    payer: Address,
    receipt: FlashSwapReceipt,
    referral: Option<Address>,
) {
    payer.require_auth();

    let pending = match get_pending_flash_swap(env) {
        Some(pending) => pending,
        None => panic_with_error!(env, PoolError::OutstandingReceipt),
    };

    if receipt.pool != env.current_contract_address() {
        panic_with_error!(env, PoolError::PoolIdMismatch);
    }
    if receipt.partner != referral {
        panic_with_error!(env, PoolError::PartnerIdMismatch);
    }
    if referral.is_none() {
        if pending.partner.is_some() {
            panic_with_error!(env, PoolError::PartnerIdNotEmpty);
        }
        if receipt.ref_fee_amount != 0 {
            panic_with_error!(env, PoolError::InvalidRefFeeAmount);
        }
    }
    if receipt != pending {
        panic_with_error!(env, PoolError::InvalidPoolOrPartnerId);
    }

    let outcome = SwapOutcome {
        amount_in: receipt.pay_amount - receipt.fee_amount,
        amount_out: 0,
        fee_amount: receipt.fee_amount,
        protocol_fee_amount: receipt.protocol_fee_amount,
        ref_fee_amount: receipt.ref_fee_amount,
        gauge_fee_amount: receipt.gauge_fee_amount,
        steps: 0,
        sqrt_price_before: 0,
        sqrt_price_after: 0,
        is_exceed: false,
    };
    settle_input(env, &payer, receipt.a2b, receipt.pay_amount, &outcome, referral.as_ref());

    clear_pending_flash_swap(env);
    events::emit_repay_flash_swap(env, receipt.a2b, receipt.pay_amount, receipt.ref_fee_amount);
}

/// Read-only simulation of the swap engine
pub fn calculate_swap_result(
    env: &Env,
    a2b: bool,
    by_amount_in: bool,
    amount: u64,
    sqrt_price_limit: u128,
) -> CalculatedSwapResult {
    let (unstaked_rate, protocol_rate, _) = live_fee_rates(env, None);
    let outcome = swap_in_pool(
        env,
        a2b,
        by_amount_in,
        sqrt_price_limit,
        amount,
        unstaked_rate,
        protocol_rate,
        0,
        false,
    );

    CalculatedSwapResult {
        amount_in: outcome.amount_in,
        amount_out: outcome.amount_out,
        fee_amount: outcome.fee_amount,
        protocol_fee_amount: outcome.protocol_fee_amount,
        ref_fee_amount: outcome.ref_fee_amount,
        gauge_fee_amount: outcome.gauge_fee_amount,
        after_sqrt_price: outcome.sqrt_price_after,
        is_exceed: outcome.is_exceed,
        steps: outcome.steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    // === split_fee tests ===

    #[test]
    fn test_split_fee_no_staking_default_rates() {
        let env = Env::default();
        // fee 1000, no referral, 20% protocol, gauge rate 0
        let (ref_fee, protocol, gauge, lp) = split_fee(&env, 1000, 0, 200_000, 0, 1_000_000, 0);
        assert_eq!(ref_fee, 0);
        assert_eq!(protocol, 200);
        assert_eq!(gauge, 0);
        assert_eq!(lp, 800);
    }

    #[test]
    fn test_split_fee_ordered_referral_first() {
        let env = Env::default();
        // 10% referral off the top, then 20% protocol off the remainder
        let (ref_fee, protocol, gauge, lp) =
            split_fee(&env, 1000, 100_000, 200_000, 0, 1_000_000, 0);
        assert_eq!(ref_fee, 100);
        assert_eq!(protocol, 180);
        assert_eq!(gauge, 0);
        assert_eq!(lp, 720);
        assert_eq!(ref_fee + protocol + gauge + lp, 1000);
    }

    #[test]
    fn test_split_fee_fully_staked_routes_to_gauge() {
        let env = Env::default();
        let (ref_fee, protocol, gauge, lp) =
            split_fee(&env, 1000, 0, 200_000, 3000, 1_000_000, 1_000_000);
        assert_eq!(ref_fee, 0);
        assert_eq!(protocol, 200);
        assert_eq!(gauge, 800, "all post-protocol fee goes to the gauge");
        assert_eq!(lp, 0);
    }

    #[test]
    fn test_split_fee_partially_staked() {
        let env = Env::default();
        // Half staked, unstaked rate 30% of UNSTAKED_FEE_DENOM
        let (_, protocol, gauge, lp) =
            split_fee(&env, 1000, 0, 200_000, 3000, 1_000_000, 500_000);
        assert_eq!(protocol, 200);
        // staked share = ceil(800 * 0.5) = 400; gauge = ceil(400 * 0.3) = 120
        assert_eq!(gauge, 120);
        assert_eq!(lp, 680);
    }

    #[test]
    fn test_split_fee_nothing_staked_rate_applies_to_whole() {
        let env = Env::default();
        let (_, protocol, gauge, lp) = split_fee(&env, 1000, 0, 200_000, 3000, 1_000_000, 0);
        assert_eq!(protocol, 200);
        // gauge = ceil(800 * 0.3) = 240
        assert_eq!(gauge, 240);
        assert_eq!(lp, 560);
    }

    #[test]
    fn test_split_fee_conserves_total() {
        let env = Env::default();
        for fee in [1u64, 3, 999, 1000, 12345] {
            let (ref_fee, protocol, gauge, lp) =
                split_fee(&env, fee, 50_000, 150_000, 2500, 1_000_000, 700_000);
            assert_eq!(ref_fee + protocol + gauge + lp, fee);
        }
    }

    #[test]
    fn test_split_fee_zero() {
        let env = Env::default();
        assert_eq!(split_fee(&env, 0, 100_000, 200_000, 3000, 1, 1), (0, 0, 0, 0));
    }

    // === resolve_unstaked_fee_rate tests ===

    #[test]
    fn test_resolve_unstaked_fee_rate() {
        assert_eq!(resolve_unstaked_fee_rate(UNSTAKED_FEE_RATE_DEFAULT, 2000), 2000);
        assert_eq!(resolve_unstaked_fee_rate(500, 2000), 500);
        assert_eq!(resolve_unstaked_fee_rate(0, 2000), 0);
    }
}
