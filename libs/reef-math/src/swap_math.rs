use crate::full_math::{mul_div, mul_div_rounding_up};
use crate::sqrt_price_math::{
    get_amount_a_delta, get_amount_b_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use reef_types::FEE_RATE_DENOM;
use soroban_sdk::Env;

/// Result of a single swap step computation
#[derive(Clone, Debug)]
pub struct SwapStepResult {
    /// The sqrt price after this step
    pub sqrt_price_next: u128,
    /// Amount of input token consumed, net of fee
    pub amount_in: u128,
    /// Amount of output token produced
    pub amount_out: u128,
    /// Fee amount taken from the gross input
    pub fee_amount: u128,
}

/// Compute the result of swapping within a single tick range
///
/// Chooses the smaller of "reach the target price" and "consume the
/// remaining amount". For exact input the remaining amount is gross of
/// fee; when the target is not reached the whole remainder is consumed
/// and the difference over the net input is the fee.
///
/// # Arguments
/// * `sqrt_price_current` - Current sqrt price (Q64.64)
/// * `sqrt_price_target` - Next tick boundary or price limit (Q64.64)
/// * `liquidity` - Active liquidity in this range
/// * `amount_remaining` - Remaining amount to swap
/// * `fee_rate` - Fee rate over FEE_RATE_DENOM
/// * `by_amount_in` - True when `amount_remaining` is input, false when output
pub fn compute_swap_step(
    env: &Env,
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_remaining: u64,
    fee_rate: u64,
    by_amount_in: bool,
) -> SwapStepResult {
    let a2b = sqrt_price_current >= sqrt_price_target;
    let remaining = amount_remaining as u128;

    let sqrt_price_next: u128;
    let mut amount_in: u128 = 0;
    let mut amount_out: u128 = 0;

    if by_amount_in {
        let amount_remaining_less_fee = mul_div(
            env,
            remaining,
            (FEE_RATE_DENOM - fee_rate) as u128,
            FEE_RATE_DENOM as u128,
        );

        // Max input to reach the target
        amount_in = if a2b {
            get_amount_a_delta(env, sqrt_price_target, sqrt_price_current, liquidity, true)
        } else {
            get_amount_b_delta(env, sqrt_price_current, sqrt_price_target, liquidity, true)
        };

        if amount_remaining_less_fee >= amount_in {
            sqrt_price_next = sqrt_price_target;
        } else {
            sqrt_price_next = get_next_sqrt_price_from_input(
                env,
                sqrt_price_current,
                liquidity,
                amount_remaining_less_fee,
                a2b,
            );
        }
    } else {
        // Max output to reach the target
        amount_out = if a2b {
            get_amount_b_delta(env, sqrt_price_target, sqrt_price_current, liquidity, false)
        } else {
            get_amount_a_delta(env, sqrt_price_current, sqrt_price_target, liquidity, false)
        };

        if remaining >= amount_out {
            sqrt_price_next = sqrt_price_target;
        } else {
            sqrt_price_next = get_next_sqrt_price_from_output(
                env,
                sqrt_price_current,
                liquidity,
                remaining,
                a2b,
            );
        }
    }

    let max = sqrt_price_target == sqrt_price_next;

    // Recompute the side that was not pinned above
    if a2b {
        if !max || !by_amount_in {
            amount_in =
                get_amount_a_delta(env, sqrt_price_next, sqrt_price_current, liquidity, true);
        }
        if !max || by_amount_in {
            amount_out =
                get_amount_b_delta(env, sqrt_price_next, sqrt_price_current, liquidity, false);
        }
    } else {
        if !max || !by_amount_in {
            amount_in =
                get_amount_b_delta(env, sqrt_price_current, sqrt_price_next, liquidity, true);
        }
        if !max || by_amount_in {
            amount_out =
                get_amount_a_delta(env, sqrt_price_current, sqrt_price_next, liquidity, false);
        }
    }

    // Cap output at remaining for exact output swaps
    if !by_amount_in && amount_out > remaining {
        amount_out = remaining;
    }

    let fee_amount = if by_amount_in && sqrt_price_next != sqrt_price_target {
        // Didn't reach target - the rest of the remainder is the fee
        remaining - amount_in
    } else {
        mul_div_rounding_up(
            env,
            amount_in,
            fee_rate as u128,
            (FEE_RATE_DENOM - fee_rate) as u128,
        )
    };

    SwapStepResult {
        sqrt_price_next,
        amount_in,
        amount_out,
        fee_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_types::Q64;
    use soroban_sdk::Env;

    const LIQ: u128 = 1_000_000_000_000_000_000;

    // === Exact input tests ===

    #[test]
    fn test_exact_in_b2a() {
        let env = Env::default();
        let result = compute_swap_step(&env, Q64, Q64 * 101 / 100, LIQ, 1_000_000_000, 3000, true);

        assert!(result.amount_in > 0);
        assert!(result.amount_out > 0);
        assert!(result.fee_amount > 0);
        assert!(result.sqrt_price_next > Q64, "price should increase for b2a");
        assert!(result.sqrt_price_next <= Q64 * 101 / 100);
    }

    #[test]
    fn test_exact_in_a2b() {
        let env = Env::default();
        let result = compute_swap_step(&env, Q64, Q64 * 99 / 100, LIQ, 1_000_000_000, 3000, true);

        assert!(result.amount_in > 0);
        assert!(result.amount_out > 0);
        assert!(result.fee_amount > 0);
        assert!(result.sqrt_price_next < Q64, "price should decrease for a2b");
        assert!(result.sqrt_price_next >= Q64 * 99 / 100);
    }

    #[test]
    fn test_exact_in_reaches_target() {
        let env = Env::default();
        // Moving 0.01% in sqrt price on this liquidity needs ~1e14 input
        let target = Q64 * 9999 / 10000;
        let result = compute_swap_step(&env, Q64, target, LIQ, 1_000_000_000_000_000, 3000, true);
        assert_eq!(result.sqrt_price_next, target, "large amount should reach target");
    }

    #[test]
    fn test_exact_in_partial_fill_consumes_everything() {
        let env = Env::default();
        let target = Q64 * 8 / 10; // far target
        let amount = 1_000_000u64;
        let result = compute_swap_step(&env, Q64, target, LIQ, amount, 3000, true);

        assert!(result.sqrt_price_next > target, "small amount cannot reach far target");
        assert_eq!(
            result.amount_in + result.fee_amount,
            amount as u128,
            "input should be fully consumed when the target is not reached"
        );
    }

    #[test]
    fn test_exact_in_fee_is_remainder_fraction() {
        let env = Env::default();
        // 1000 in at 0.3%: 997 net, 3 fee, target not reached
        let result = compute_swap_step(&env, Q64, Q64 * 8 / 10, LIQ, 1000, 3000, true);
        assert_eq!(result.amount_in, 997);
        assert_eq!(result.fee_amount, 3);
    }

    // === Exact output tests ===

    #[test]
    fn test_exact_out_a2b() {
        let env = Env::default();
        let result = compute_swap_step(&env, Q64, Q64 * 99 / 100, LIQ, 1_000_000_000, 3000, false);

        assert!(result.amount_in > 0);
        assert!(result.amount_out > 0);
        assert!(result.sqrt_price_next < Q64);
        assert!(result.amount_out <= 1_000_000_000);
    }

    #[test]
    fn test_exact_out_b2a() {
        let env = Env::default();
        let result = compute_swap_step(&env, Q64, Q64 * 101 / 100, LIQ, 1_000_000_000, 3000, false);

        assert!(result.amount_in > 0);
        assert!(result.amount_out > 0);
        assert!(result.sqrt_price_next > Q64);
    }

    #[test]
    fn test_exact_out_capped_at_remaining() {
        let env = Env::default();
        let requested = 500u64;
        let result = compute_swap_step(&env, Q64, Q64 * 99 / 100, LIQ, requested, 3000, false);
        assert!(result.amount_out <= requested as u128);
    }

    // === Fee behaviour ===

    #[test]
    fn test_higher_fee_more_fee_less_output() {
        let env = Env::default();
        let target = Q64 * 5 / 10; // never reached
        let low = compute_swap_step(&env, Q64, target, LIQ, 1_000_000_000, 500, true);
        let mid = compute_swap_step(&env, Q64, target, LIQ, 1_000_000_000, 3000, true);
        let high = compute_swap_step(&env, Q64, target, LIQ, 1_000_000_000, 10000, true);

        assert!(mid.fee_amount > low.fee_amount);
        assert!(high.fee_amount > mid.fee_amount);
        assert!(low.amount_out >= mid.amount_out);
        assert!(mid.amount_out >= high.amount_out);
    }

    #[test]
    fn test_zero_fee() {
        let env = Env::default();
        let result = compute_swap_step(&env, Q64, Q64 * 99 / 100, LIQ, 1_000_000_000, 0, true);
        assert_eq!(result.fee_amount, 0);
        assert!(result.amount_in > 0);
        assert!(result.amount_out > 0);
    }

    #[test]
    fn test_fee_charged_on_gross_input_when_target_reached() {
        let env = Env::default();
        let target = Q64 * 9999 / 10000;
        let result = compute_swap_step(&env, Q64, target, LIQ, u64::MAX, 3000, true);
        assert_eq!(result.sqrt_price_next, target);
        // fee = ceil(amount_in * rate / (denom - rate))
        let expected =
            mul_div_rounding_up(&env, result.amount_in, 3000, (FEE_RATE_DENOM - 3000) as u128);
        assert_eq!(result.fee_amount, expected);
    }

    // === Edge cases ===

    #[test]
    fn test_zero_amount() {
        let env = Env::default();
        let result = compute_swap_step(&env, Q64, Q64 * 99 / 100, LIQ, 0, 3000, true);
        assert_eq!(result.amount_in, 0);
        assert_eq!(result.amount_out, 0);
        assert_eq!(result.fee_amount, 0);
    }

    #[test]
    fn test_at_target() {
        let env = Env::default();
        let result = compute_swap_step(&env, Q64, Q64, LIQ, 1000, 3000, true);
        assert_eq!(result.sqrt_price_next, Q64);
        assert_eq!(result.amount_out, 0);
    }

    #[test]
    fn test_zero_liquidity_advances_to_target() {
        let env = Env::default();
        let target = Q64 * 99 / 100;
        let result = compute_swap_step(&env, Q64, target, 0, 1000, 3000, true);
        assert_eq!(result.sqrt_price_next, target);
        assert_eq!(result.amount_in, 0);
        assert_eq!(result.amount_out, 0);
        assert_eq!(result.fee_amount, 0);
    }

    #[test]
    fn test_high_liquidity_less_slippage() {
        let env = Env::default();
        let target = Q64 * 99 / 100;
        let low = compute_swap_step(&env, Q64, target, LIQ / 1_000_000, 1_000_000_000, 3000, true);
        let high = compute_swap_step(&env, Q64, target, LIQ, 1_000_000_000, 3000, true);

        assert!(high.amount_out >= low.amount_out);
        let move_low = Q64 - low.sqrt_price_next;
        let move_high = Q64 - high.sqrt_price_next;
        assert!(move_high <= move_low);
    }
}
