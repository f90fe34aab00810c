use crate::full_math::{div_rounding_up, mul_div, mul_div_rounding_up};
use reef_types::Q64;
use soroban_sdk::{Env, U256};

/// Calculate the token A amount for a price move between two sqrt prices
/// delta_a = L * (sqrt_pu - sqrt_pl) / (sqrt_pl * sqrt_pu)
///
/// The product of two Q64.64 prices can exceed u128, so the whole
/// computation runs in U256.
pub fn get_amount_a_delta(
    env: &Env,
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: u128,
    round_up: bool,
) -> u128 {
    let (sqrt_price_lower, sqrt_price_upper) = if sqrt_price_a > sqrt_price_b {
        (sqrt_price_b, sqrt_price_a)
    } else {
        (sqrt_price_a, sqrt_price_b)
    };

    if sqrt_price_lower == 0 {
        panic!("sqrt price lower cannot be zero");
    }

    let numerator = U256::from_u128(env, liquidity)
        .mul(&U256::from_u128(env, sqrt_price_upper - sqrt_price_lower))
        .mul(&U256::from_u128(env, Q64));
    let denominator =
        U256::from_u128(env, sqrt_price_upper).mul(&U256::from_u128(env, sqrt_price_lower));

    let result = if round_up {
        div_rounding_up_u256(env, &numerator, &denominator)
    } else {
        numerator.div(&denominator)
    };

    result.to_u128().expect("amount overflow")
}

/// Calculate the token B amount for a price move between two sqrt prices
/// delta_b = L * (sqrt_pu - sqrt_pl) / 2^64
pub fn get_amount_b_delta(
    env: &Env,
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: u128,
    round_up: bool,
) -> u128 {
    let (sqrt_price_lower, sqrt_price_upper) = if sqrt_price_a > sqrt_price_b {
        (sqrt_price_b, sqrt_price_a)
    } else {
        (sqrt_price_a, sqrt_price_b)
    };

    if round_up {
        mul_div_rounding_up(env, liquidity, sqrt_price_upper - sqrt_price_lower, Q64)
    } else {
        mul_div(env, liquidity, sqrt_price_upper - sqrt_price_lower, Q64)
    }
}

/// Get the next sqrt price from an input amount of token A or token B
pub fn get_next_sqrt_price_from_input(
    env: &Env,
    sqrt_price: u128,
    liquidity: u128,
    amount_in: u128,
    a2b: bool,
) -> u128 {
    if sqrt_price == 0 || liquidity == 0 {
        panic!("Invalid inputs");
    }

    if a2b {
        get_next_sqrt_price_from_amount_a_rounding_up(env, sqrt_price, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount_b_rounding_down(env, sqrt_price, liquidity, amount_in, true)
    }
}

/// Get the next sqrt price from an output amount
pub fn get_next_sqrt_price_from_output(
    env: &Env,
    sqrt_price: u128,
    liquidity: u128,
    amount_out: u128,
    a2b: bool,
) -> u128 {
    if sqrt_price == 0 || liquidity == 0 {
        panic!("Invalid inputs");
    }

    if a2b {
        get_next_sqrt_price_from_amount_b_rounding_down(env, sqrt_price, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount_a_rounding_up(env, sqrt_price, liquidity, amount_out, false)
    }
}

/// Calculate the next sqrt price given a token A amount
/// sqrt_price_next = L * sqrt_price / (L + amount * sqrt_price / 2^64)  [add]
/// sqrt_price_next = L * sqrt_price / (L - amount * sqrt_price / 2^64)  [remove]
///
/// Rounds the result up: for a2b input this understates the price drop,
/// for b2a output it overstates the price rise, both against the user.
fn get_next_sqrt_price_from_amount_a_rounding_up(
    env: &Env,
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> u128 {
    if amount == 0 {
        return sqrt_price;
    }

    let numerator1 = U256::from_u128(env, liquidity).mul(&U256::from_u128(env, Q64));
    let product = U256::from_u128(env, amount).mul(&U256::from_u128(env, sqrt_price));

    let denominator = if add {
        numerator1.add(&product)
    } else {
        if product >= numerator1 {
            panic!("Denominator underflow");
        }
        numerator1.sub(&product)
    };

    let result = div_rounding_up_u256(env, &numerator1.mul(&U256::from_u128(env, sqrt_price)), &denominator);
    result.to_u128().expect("sqrt price overflow")
}

/// Calculate the next sqrt price given a token B amount
/// sqrt_price_next = sqrt_price + amount * 2^64 / L  [add]
/// sqrt_price_next = sqrt_price - amount * 2^64 / L  [remove]
fn get_next_sqrt_price_from_amount_b_rounding_down(
    env: &Env,
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> u128 {
    if add {
        let quotient = if amount <= u128::MAX >> 64 {
            (amount << 64) / liquidity
        } else {
            mul_div(env, amount, Q64, liquidity)
        };
        sqrt_price.checked_add(quotient).expect("sqrt price overflow")
    } else {
        let quotient = if amount <= u128::MAX >> 64 {
            div_rounding_up(amount << 64, liquidity)
        } else {
            mul_div_rounding_up(env, amount, Q64, liquidity)
        };
        if sqrt_price <= quotient {
            panic!("sqrt price underflow");
        }
        sqrt_price - quotient
    }
}

fn div_rounding_up_u256(env: &Env, numerator: &U256, denominator: &U256) -> U256 {
    let quotient = numerator.div(denominator);
    let remainder = numerator.rem_euclid(denominator);
    if remainder.gt(&U256::from_u32(env, 0)) {
        quotient.add(&U256::from_u32(env, 1))
    } else {
        quotient
    }
}
