#![no_std]

pub mod full_math;
pub mod liquidity_math;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_math;

pub use full_math::{div_rounding_up, mul_div, mul_div_rounding_up};
pub use liquidity_math::{
    add_delta, get_amounts_for_liquidity, get_liquidity_by_amount, get_liquidity_for_amounts,
    try_add_delta,
};
pub use sqrt_price_math::{
    get_amount_a_delta, get_amount_b_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
pub use swap_math::{compute_swap_step, SwapStepResult};
pub use tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
