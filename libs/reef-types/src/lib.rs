#![no_std]

mod pool;
mod position;
mod rewarder;
mod tick;

pub use pool::*;
pub use position::*;
pub use rewarder::*;
pub use tick::*;

/// Q64 constant (2^64) for fixed-point math
pub const Q64: u128 = 1 << 64;

/// Minimum tick index
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (Q64.64, value of the tick bijection at MIN_TICK)
pub const MIN_SQRT_PRICE: u128 = 4295048016;

/// Maximum sqrt price (Q64.64, value of the tick bijection at MAX_TICK)
pub const MAX_SQRT_PRICE: u128 = 79226673515401279992447579061;

/// Denominator for the swap fee rate, the protocol fee split and the
/// referral fee split. 3000 = 0.3%.
pub const FEE_RATE_DENOM: u64 = 1_000_000;

/// Maximum swap fee rate (20%)
pub const MAX_FEE_RATE: u64 = 200_000;

/// Denominator for the unstaked-liquidity fee rate (gauge split)
pub const UNSTAKED_FEE_DENOM: u64 = 10_000;

/// Maximum unstaked-liquidity fee rate (100%)
pub const MAX_UNSTAKED_FEE_RATE: u64 = 10_000;

/// Sentinel unstaked-liquidity fee rate: inherit the config default at
/// swap time
pub const UNSTAKED_FEE_RATE_DEFAULT: u64 = u64::MAX;

/// Maximum number of rewarders a pool can carry
pub const MAX_REWARDERS: u32 = 3;

/// Points emitted per second, Q64.64
pub const POINTS_PER_SECOND_X64: u128 = 1_000_000u128 << 64;
