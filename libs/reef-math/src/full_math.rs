// 256-bit multiply-divide behind the pool's Q64.64 arithmetic.
//
// Rounding direction is part of the contract: floor backs growth accrual
// and amounts paid out of the pool, ceiling backs every fee split and any
// amount owed to the pool. Products of two Q64.64 operands (a price pair,
// or a growth delta against liquidity) do not fit in u128, so both
// variants run the full product through U256 before dividing.

use soroban_sdk::{Env, U256};

/// floor(a * b / denominator)
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    let (quotient, _) = mul_div_inner(env, a, b, denominator);
    quotient
}

/// ceil(a * b / denominator)
pub fn mul_div_rounding_up(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    let (quotient, exact) = mul_div_inner(env, a, b, denominator);
    if exact {
        quotient
    } else {
        quotient + 1
    }
}

/// Shared core: the floor quotient plus whether the division was exact
fn mul_div_inner(env: &Env, a: u128, b: u128, denominator: u128) -> (u128, bool) {
    if denominator == 0 {
        panic!("Division by zero");
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let denominator = U256::from_u128(env, denominator);
    let quotient = product.div(&denominator);
    let exact = quotient.mul(&denominator) == product;

    match quotient.to_u128() {
        Some(quotient) => (quotient, exact),
        None => panic!("quotient exceeds u128"),
    }
}

/// ceil(a / b) without a widening multiply
pub fn div_rounding_up(a: u128, b: u128) -> u128 {
    if b == 0 {
        panic!("Division by zero");
    }
    if a == 0 {
        return 0;
    }
    (a - 1) / b + 1
}
