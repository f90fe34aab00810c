// ============================================================================
// INVARIANTS MODULE
// ============================================================================
//
// Checkable predicates over pool state, used by the integration suites
// after every operation:
//
// 1. PRICE INVARIANTS
//    - sqrt price within the tick bijection bounds
//    - tick consistent with the sqrt price
//
// 2. LIQUIDITY INVARIANTS
//    - the active register equals the sum of tick nets at or below the
//      current tick
//    - staked liquidity never exceeds active liquidity
//
// 3. RESERVE INVARIANTS
//    - escrows are covered by the pool's token balances
//
// ============================================================================

use reef_types::{EmissionState, PoolState, MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK};

/// Invariant: sqrt_price stays within the representable price range
pub fn price_in_bounds(state: &PoolState) -> bool {
    state.sqrt_price >= MIN_SQRT_PRICE && state.sqrt_price <= MAX_SQRT_PRICE
}

/// Invariant: tick stays within the tick range
pub fn tick_in_bounds(state: &PoolState) -> bool {
    state.tick >= MIN_TICK && state.tick <= MAX_TICK
}

/// Invariant: the stored tick matches the tick computed from the stored
/// sqrt price
///
/// A swap that stops exactly on a downward-crossed boundary stores
/// `boundary - 1` while the bijection answers `boundary`, so one tick of
/// slack is allowed.
pub fn tick_consistent_with_price(tick: i32, computed_tick_from_price: i32) -> bool {
    (tick - computed_tick_from_price).abs() <= 1
}

/// Invariant: the active-liquidity register equals the recomputed sum of
/// liquidity_net over initialized ticks at or below the current tick
pub fn liquidity_register_consistent(state: &PoolState, recomputed_net: i128) -> bool {
    recomputed_net >= 0 && state.liquidity == recomputed_net as u128
}

/// Invariant: staked liquidity is a subset of active liquidity
pub fn staked_within_active(state: &PoolState, emission: &EmissionState) -> bool {
    emission.staked_liquidity <= state.liquidity
}

/// Invariant: escrows and reserves are covered by actual balances
pub fn reserves_cover_escrows(
    state: &PoolState,
    balance_a: i128,
    balance_b: i128,
) -> bool {
    let owed_a =
        state.reserve_a as i128 + state.protocol_fee_a as i128 + state.gauge_fee_a as i128;
    let owed_b =
        state.reserve_b as i128 + state.protocol_fee_b as i128 + state.gauge_fee_b as i128;
    balance_a >= owed_a && balance_b >= owed_b
}
