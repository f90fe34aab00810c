use reef_types::{MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK, Q64};
use soroban_sdk::{Env, U256};

// Q128 constant: 2^128 represented as U256
fn q128(env: &Env) -> U256 {
    U256::from_u128(env, 1u128 << 64).mul(&U256::from_u128(env, 1u128 << 64))
}

// Precomputed sqrt(1.0001^-(2^i)) in Q128 format
const SQRT_1_0001_1: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;
const SQRT_1_0001_2: u128 = 0xfff97272373d413259a46990580e213a;
const SQRT_1_0001_4: u128 = 0xfff2e50f5f656932ef12357cf3c7fdcc;
const SQRT_1_0001_8: u128 = 0xffe5caca7e10e4e61c3624eaa0941cd0;
const SQRT_1_0001_16: u128 = 0xffcb9843d60f6159c9db58835c926644;
const SQRT_1_0001_32: u128 = 0xff973b41fa98c081472e6896dfb254c0;
const SQRT_1_0001_64: u128 = 0xff2ea16466c96a3843ec78b326b52861;
const SQRT_1_0001_128: u128 = 0xfe5dee046a99a2a811c461f1969c3053;
const SQRT_1_0001_256: u128 = 0xfcbe86c7900a88aedcffc83b479aa3a4;
const SQRT_1_0001_512: u128 = 0xf987a7253ac413176f2b074cf7815e54;
const SQRT_1_0001_1024: u128 = 0xf3392b0822b70005940c7a398e4b70f3;
const SQRT_1_0001_2048: u128 = 0xe7159475a2c29b7443b29c7fa6e889d9;
const SQRT_1_0001_4096: u128 = 0xd097f3bdfd2022b8845ad8f792aa5825;
const SQRT_1_0001_8192: u128 = 0xa9f746462d870fdf8a65dc1f90e061e5;
const SQRT_1_0001_16384: u128 = 0x70d869a156d2a1b890bb3df62baf32f7;
const SQRT_1_0001_32768: u128 = 0x31be135f97d08fd981231505542fcfa6;
const SQRT_1_0001_65536: u128 = 0x9aa508b5b7a84e1c677de54f3e99bc9;
const SQRT_1_0001_131072: u128 = 0x5d6af8dedb81196699c329225ee604;
const SQRT_1_0001_262144: u128 = 0x2216e584f5fa1ea926041bedfe98;

/// Calculate sqrt(1.0001^tick) * 2^64
///
/// The multiplier chain computes the ratio for a negative tick in Q128;
/// positive ticks invert, and the final shift re-bases to Q64.64.
/// `MIN_SQRT_PRICE` / `MAX_SQRT_PRICE` are exactly the outputs of this
/// function at the tick bounds.
pub fn get_sqrt_price_at_tick(env: &Env, tick: i32) -> u128 {
    if tick < MIN_TICK || tick > MAX_TICK {
        panic!("Tick out of bounds");
    }

    let abs_tick = tick.unsigned_abs();

    let mut ratio = q128(env);

    if abs_tick & 0x1 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_1);
    }
    if abs_tick & 0x2 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_2);
    }
    if abs_tick & 0x4 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_4);
    }
    if abs_tick & 0x8 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_8);
    }
    if abs_tick & 0x10 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_16);
    }
    if abs_tick & 0x20 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_32);
    }
    if abs_tick & 0x40 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_64);
    }
    if abs_tick & 0x80 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_128);
    }
    if abs_tick & 0x100 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_256);
    }
    if abs_tick & 0x200 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_512);
    }
    if abs_tick & 0x400 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_1024);
    }
    if abs_tick & 0x800 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_2048);
    }
    if abs_tick & 0x1000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_4096);
    }
    if abs_tick & 0x2000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_8192);
    }
    if abs_tick & 0x4000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_16384);
    }
    if abs_tick & 0x8000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_32768);
    }
    if abs_tick & 0x10000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_65536);
    }
    if abs_tick & 0x20000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_131072);
    }
    if abs_tick & 0x40000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_262144);
    }

    // The chain computed the ratio for -abs_tick; invert for positive ticks
    if tick > 0 {
        let max_u256 = u256_max(env);
        ratio = max_u256.div(&ratio);
    }

    // Q128 -> Q64.64
    let shift_64 = U256::from_u128(env, Q64);
    let result = ratio.div(&shift_64);

    result.to_u128().unwrap()
}

/// Get the tick corresponding to a sqrt price
///
/// Returns the largest tick whose sqrt price is at most `sqrt_price`, so
/// `get_tick_at_sqrt_price(get_sqrt_price_at_tick(t)) == t` for every
/// valid tick.
pub fn get_tick_at_sqrt_price(env: &Env, sqrt_price: u128) -> i32 {
    if sqrt_price < MIN_SQRT_PRICE || sqrt_price > MAX_SQRT_PRICE {
        panic!("sqrt price out of bounds");
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;

    while low < high {
        let mid = (low + high + 1) / 2;
        let sqrt_at_mid = get_sqrt_price_at_tick(env, mid);

        if sqrt_at_mid <= sqrt_price {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    low
}

/// Helper: multiply by u128 and right shift by 128 bits
fn mul_shift_128(env: &Env, x: &U256, y: u128) -> U256 {
    let y_256 = U256::from_u128(env, y);
    let product = x.mul(&y_256);
    let divisor = q128(env);
    product.div(&divisor)
}

/// Helper: get U256 max value (2^256 - 1)
fn u256_max(env: &Env) -> U256 {
    let high = U256::from_u128(env, u128::MAX);
    let q128_val = q128(env);
    high.mul(&q128_val).add(&U256::from_u128(env, u128::MAX))
}
