use crate::full_math::mul_div;
use crate::sqrt_price_math::{get_amount_a_delta, get_amount_b_delta};
use reef_types::Q64;
use soroban_sdk::{Env, U256};

/// Add a signed liquidity delta to unsigned liquidity, panicking on
/// overflow. Used where the caller has already validated the delta.
pub fn add_delta(liquidity: u128, delta: i128) -> u128 {
    match try_add_delta(liquidity, delta) {
        Some(result) => result,
        None => {
            if delta < 0 {
                panic!("Liquidity underflow");
            } else {
                panic!("Liquidity overflow");
            }
        }
    }
}

/// Add a signed liquidity delta to unsigned liquidity, returning None on
/// overflow or underflow
pub fn try_add_delta(liquidity: u128, delta: i128) -> Option<u128> {
    if delta < 0 {
        liquidity.checked_sub(delta.unsigned_abs())
    } else {
        liquidity.checked_add(delta as u128)
    }
}

/// Calculate liquidity from token amounts for a price range
pub fn get_liquidity_for_amounts(
    env: &Env,
    sqrt_price: u128,
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    amount_a: u128,
    amount_b: u128,
) -> u128 {
    let (sqrt_price_lower, sqrt_price_upper) = sort_prices(sqrt_price_a, sqrt_price_b);

    if sqrt_price <= sqrt_price_lower {
        // Current price below range - all token A
        get_liquidity_for_amount_a(env, sqrt_price_lower, sqrt_price_upper, amount_a)
    } else if sqrt_price < sqrt_price_upper {
        // Current price in range - both tokens
        let liquidity_a = get_liquidity_for_amount_a(env, sqrt_price, sqrt_price_upper, amount_a);
        let liquidity_b = get_liquidity_for_amount_b(env, sqrt_price_lower, sqrt_price, amount_b);
        liquidity_a.min(liquidity_b)
    } else {
        // Current price above range - all token B
        get_liquidity_for_amount_b(env, sqrt_price_lower, sqrt_price_upper, amount_b)
    }
}

/// Solve liquidity and both deposit amounts from a fixed amount on one
/// side. The derived side rounds up (owed to the pool).
///
/// Returns (liquidity, amount_a, amount_b).
pub fn get_liquidity_by_amount(
    env: &Env,
    sqrt_price: u128,
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    amount: u128,
    fix_a: bool,
) -> (u128, u128, u128) {
    let (sqrt_price_lower, sqrt_price_upper) = sort_prices(sqrt_price_a, sqrt_price_b);

    if fix_a {
        if sqrt_price >= sqrt_price_upper {
            // No token A component above the range
            return (0, 0, 0);
        }
        let lower = sqrt_price.max(sqrt_price_lower);
        let liquidity = get_liquidity_for_amount_a(env, lower, sqrt_price_upper, amount);
        let amount_b = if sqrt_price > sqrt_price_lower {
            get_amount_b_delta(env, sqrt_price_lower, lower, liquidity, true)
        } else {
            0
        };
        (liquidity, amount, amount_b)
    } else {
        if sqrt_price <= sqrt_price_lower {
            // No token B component below the range
            return (0, 0, 0);
        }
        let upper = sqrt_price.min(sqrt_price_upper);
        let liquidity = get_liquidity_for_amount_b(env, sqrt_price_lower, upper, amount);
        let amount_a = if sqrt_price < sqrt_price_upper {
            get_amount_a_delta(env, upper, sqrt_price_upper, liquidity, true)
        } else {
            0
        };
        (liquidity, amount_a, amount)
    }
}

/// Get deposit/withdrawal amounts for a liquidity over a price range.
/// `round_up` is set for deposits (amounts owed to the pool) and clear for
/// withdrawals (amounts returned to the owner).
pub fn get_amounts_for_liquidity(
    env: &Env,
    sqrt_price: u128,
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: u128,
    round_up: bool,
) -> (u128, u128) {
    let (sqrt_price_lower, sqrt_price_upper) = sort_prices(sqrt_price_a, sqrt_price_b);

    if sqrt_price <= sqrt_price_lower {
        // Below range - all token A
        let amount_a =
            get_amount_a_delta(env, sqrt_price_lower, sqrt_price_upper, liquidity, round_up);
        (amount_a, 0)
    } else if sqrt_price < sqrt_price_upper {
        // In range - both tokens
        let amount_a = get_amount_a_delta(env, sqrt_price, sqrt_price_upper, liquidity, round_up);
        let amount_b = get_amount_b_delta(env, sqrt_price_lower, sqrt_price, liquidity, round_up);
        (amount_a, amount_b)
    } else {
        // Above range - all token B
        let amount_b =
            get_amount_b_delta(env, sqrt_price_lower, sqrt_price_upper, liquidity, round_up);
        (0, amount_b)
    }
}

/// Calculate liquidity from amount A
/// L = amount_a * sqrt_pl * sqrt_pu / (2^64 * (sqrt_pu - sqrt_pl))
fn get_liquidity_for_amount_a(
    env: &Env,
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    amount_a: u128,
) -> u128 {
    let (sqrt_price_lower, sqrt_price_upper) = sort_prices(sqrt_price_a, sqrt_price_b);

    let numerator = U256::from_u128(env, amount_a)
        .mul(&U256::from_u128(env, sqrt_price_lower))
        .mul(&U256::from_u128(env, sqrt_price_upper));
    let denominator = U256::from_u128(env, Q64)
        .mul(&U256::from_u128(env, sqrt_price_upper - sqrt_price_lower));

    numerator.div(&denominator).to_u128().expect("liquidity overflow")
}

/// Calculate liquidity from amount B
/// L = amount_b * 2^64 / (sqrt_pu - sqrt_pl)
fn get_liquidity_for_amount_b(
    env: &Env,
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    amount_b: u128,
) -> u128 {
    let (sqrt_price_lower, sqrt_price_upper) = sort_prices(sqrt_price_a, sqrt_price_b);

    mul_div(env, amount_b, Q64, sqrt_price_upper - sqrt_price_lower)
}

fn sort_prices(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    // === add_delta tests ===

    #[test]
    fn test_add_delta_positive() {
        assert_eq!(add_delta(100, 50), 150);
    }

    #[test]
    fn test_add_delta_negative() {
        assert_eq!(add_delta(100, -50), 50);
    }

    #[test]
    fn test_add_delta_to_zero() {
        assert_eq!(add_delta(100, -100), 0);
    }

    #[test]
    #[should_panic(expected = "Liquidity underflow")]
    fn test_add_delta_underflow() {
        add_delta(50, -100);
    }

    #[test]
    #[should_panic(expected = "Liquidity overflow")]
    fn test_add_delta_overflow() {
        add_delta(u128::MAX, 1);
    }

    #[test]
    fn test_try_add_delta() {
        assert_eq!(try_add_delta(100, 50), Some(150));
        assert_eq!(try_add_delta(100, -100), Some(0));
        assert_eq!(try_add_delta(0, -1), None);
        assert_eq!(try_add_delta(u128::MAX, 1), None);
        assert_eq!(try_add_delta(0, i128::MIN), None);
    }

    // === get_liquidity_for_amounts tests ===

    #[test]
    fn test_get_liquidity_for_amounts_in_range() {
        let env = Env::default();
        let liquidity = get_liquidity_for_amounts(
            &env,
            Q64,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_000,
            1_000_000_000,
        );
        assert!(liquidity > 0);
    }

    #[test]
    fn test_get_liquidity_for_amounts_below_range() {
        let env = Env::default();
        // Only token A matters below the range
        let liquidity = get_liquidity_for_amounts(
            &env,
            Q64 * 8 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_000,
            0,
        );
        assert!(liquidity > 0);

        let with_b = get_liquidity_for_amounts(
            &env,
            Q64 * 8 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_000,
            1_000_000_000,
        );
        assert_eq!(liquidity, with_b);
    }

    #[test]
    fn test_get_liquidity_for_amounts_above_range() {
        let env = Env::default();
        // Only token B matters above the range
        let liquidity = get_liquidity_for_amounts(
            &env,
            Q64 * 12 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            0,
            1_000_000_000,
        );
        assert!(liquidity > 0);

        let with_a = get_liquidity_for_amounts(
            &env,
            Q64 * 12 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_000,
            1_000_000_000,
        );
        assert_eq!(liquidity, with_a);
    }

    #[test]
    fn test_get_liquidity_for_amounts_order_independent() {
        let env = Env::default();
        let ab = get_liquidity_for_amounts(
            &env,
            Q64,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_000,
            1_000_000_000,
        );
        let ba = get_liquidity_for_amounts(
            &env,
            Q64,
            Q64 * 11 / 10,
            Q64 * 9 / 10,
            1_000_000_000,
            1_000_000_000,
        );
        assert_eq!(ab, ba);
    }

    // === get_liquidity_by_amount tests ===

    #[test]
    fn test_get_liquidity_by_amount_fix_a_in_range() {
        let env = Env::default();
        let (liquidity, amount_a, amount_b) =
            get_liquidity_by_amount(&env, Q64, Q64 * 9 / 10, Q64 * 11 / 10, 1_000_000, true);
        assert!(liquidity > 0);
        assert_eq!(amount_a, 1_000_000);
        assert!(amount_b > 0, "in range a fixed deposit also needs token B");
    }

    #[test]
    fn test_get_liquidity_by_amount_fix_b_in_range() {
        let env = Env::default();
        let (liquidity, amount_a, amount_b) =
            get_liquidity_by_amount(&env, Q64, Q64 * 9 / 10, Q64 * 11 / 10, 1_000_000, false);
        assert!(liquidity > 0);
        assert!(amount_a > 0);
        assert_eq!(amount_b, 1_000_000);
    }

    #[test]
    fn test_get_liquidity_by_amount_fix_a_below_range() {
        let env = Env::default();
        let (liquidity, amount_a, amount_b) = get_liquidity_by_amount(
            &env,
            Q64 * 8 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000,
            true,
        );
        assert!(liquidity > 0);
        assert_eq!(amount_a, 1_000_000);
        assert_eq!(amount_b, 0, "below range takes no token B");
    }

    #[test]
    fn test_get_liquidity_by_amount_fix_a_above_range() {
        let env = Env::default();
        let (liquidity, amount_a, amount_b) = get_liquidity_by_amount(
            &env,
            Q64 * 12 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000,
            true,
        );
        assert_eq!((liquidity, amount_a, amount_b), (0, 0, 0));
    }

    #[test]
    fn test_get_liquidity_by_amount_consistent_with_fixed_liquidity() {
        let env = Env::default();
        let (liquidity, amount_a, amount_b) =
            get_liquidity_by_amount(&env, Q64, Q64 * 9 / 10, Q64 * 11 / 10, 1_000_000, true);

        // Re-deriving the deposit from the solved liquidity must not need
        // more than the fixed side
        let (check_a, check_b) = get_amounts_for_liquidity(
            &env,
            Q64,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            liquidity,
            true,
        );
        assert!(check_a <= amount_a);
        assert!(check_b <= amount_b + 1);
    }

    // === get_amounts_for_liquidity tests ===

    #[test]
    fn test_get_amounts_for_liquidity_in_range() {
        let env = Env::default();
        let (amount_a, amount_b) = get_amounts_for_liquidity(
            &env,
            Q64,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_000_000,
            false,
        );
        assert!(amount_a > 0);
        assert!(amount_b > 0);
    }

    #[test]
    fn test_get_amounts_for_liquidity_below_range() {
        let env = Env::default();
        let (amount_a, amount_b) = get_amounts_for_liquidity(
            &env,
            Q64 * 8 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_000_000,
            false,
        );
        assert!(amount_a > 0);
        assert_eq!(amount_b, 0);
    }

    #[test]
    fn test_get_amounts_for_liquidity_above_range() {
        let env = Env::default();
        let (amount_a, amount_b) = get_amounts_for_liquidity(
            &env,
            Q64 * 12 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_000_000,
            false,
        );
        assert_eq!(amount_a, 0);
        assert!(amount_b > 0);
    }

    #[test]
    fn test_deposit_rounds_up_withdrawal_rounds_down() {
        let env = Env::default();
        let (dep_a, dep_b) = get_amounts_for_liquidity(
            &env,
            Q64,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_007,
            true,
        );
        let (wd_a, wd_b) = get_amounts_for_liquidity(
            &env,
            Q64,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            1_000_000_007,
            false,
        );
        assert!(wd_a <= dep_a);
        assert!(wd_b <= dep_b);
        assert!(dep_a - wd_a <= 1);
        assert!(dep_b - wd_b <= 1);
    }

    #[test]
    fn test_amounts_proportional_to_liquidity() {
        let env = Env::default();
        let (a1, b1) =
            get_amounts_for_liquidity(&env, Q64, Q64 * 9 / 10, Q64 * 11 / 10, 1_000_000_000, false);
        let (a2, b2) =
            get_amounts_for_liquidity(&env, Q64, Q64 * 9 / 10, Q64 * 11 / 10, 2_000_000_000, false);
        assert!(a2 >= a1 * 2 && a2 <= a1 * 2 + 1);
        assert!(b2 >= b1 * 2 && b2 <= b1 * 2 + 1);
    }

    // === Roundtrip ===

    #[test]
    fn test_liquidity_amounts_roundtrip() {
        let env = Env::default();
        let initial = 1_000_000_000_000_000u128;
        let (amount_a, amount_b) = get_amounts_for_liquidity(
            &env,
            Q64 * 12 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            initial,
            false,
        );
        assert_eq!(amount_a, 0);

        let recovered = get_liquidity_for_amounts(
            &env,
            Q64 * 12 / 10,
            Q64 * 9 / 10,
            Q64 * 11 / 10,
            amount_a,
            amount_b,
        );
        let diff = if recovered > initial {
            recovered - initial
        } else {
            initial - recovered
        };
        assert!(diff <= 10, "token B liquidity should roundtrip closely");
    }
}
