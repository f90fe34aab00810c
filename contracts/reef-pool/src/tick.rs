// ============================================================================
// TICK MODULE
// ============================================================================
//
// Sparse tick grid with a word/bit bitmap over spacing-compressed ticks.
//
// 1. PURE BITMAP FUNCTIONS:
//    - tick_to_bitmap_position / bitmap_position_to_tick
//    - create_mask_at_or_below / create_mask_at_or_above
//    - find_most_significant_bit / find_least_significant_bit
//
// 2. PURE GROWTH FUNCTIONS:
//    - growth_inside: the below/above/inside wrapping pattern shared by
//      fees, rewards, points and emission
//
// 3. SIDE EFFECT FUNCTIONS (storage):
//    - update: apply a liquidity delta to a tick, seeding growth-outside
//      on first initialization at or below the current tick
//    - cross: flip every growth-outside to global - outside
//    - update_stake: adjust staked_liquidity_net on a range endpoint
//    - flip_tick / next_initialized_tick: bitmap maintenance and search
//    - sum_nets_at_or_below: recompute the liquidity register from storage
//
// ============================================================================

use crate::error::PoolError;
use crate::storage::{get_tick, get_tick_bitmap_word, set_tick, set_tick_bitmap_word};
use reef_types::{MAX_TICK, MIN_TICK};
use soroban_sdk::{panic_with_error, Env, Vec};

/// Snapshot of every global growth accumulator, taken when a tick is
/// seeded or crossed
pub struct GrowthGlobals {
    pub fee_a: u128,
    pub fee_b: u128,
    pub rewards: Vec<u128>,
    pub points: u128,
    pub emission: u128,
}

// ============================================================================
// PURE BITMAP FUNCTIONS
// ============================================================================

/// Convert a tick index to bitmap position (pure)
/// Returns (word_position, bit_position)
pub fn tick_to_bitmap_position(tick: i32, tick_spacing: i32) -> (i32, u8) {
    let compressed = tick.div_euclid(tick_spacing);
    let word_pos = compressed >> 7; // divide by 128
    let bit_pos = (compressed.rem_euclid(128)) as u8;
    (word_pos, bit_pos)
}

/// Convert bitmap position back to tick (pure)
pub fn bitmap_position_to_tick(word_pos: i32, bit: i32, tick_spacing: i32) -> i32 {
    ((word_pos * 128) + bit) * tick_spacing
}

/// Mask for all bits at or below a given position (pure)
pub fn create_mask_at_or_below(bit_pos: u8) -> u128 {
    (1u128 << bit_pos) - 1 + (1u128 << bit_pos)
}

/// Mask for all bits at or above a given position (pure)
pub fn create_mask_at_or_above(bit_pos: u8) -> u128 {
    !((1u128 << bit_pos) - 1)
}

/// Highest set bit in a word, None if the word is 0 (pure)
pub fn find_most_significant_bit(word: u128) -> Option<u8> {
    if word == 0 {
        None
    } else {
        Some(127 - word.leading_zeros() as u8)
    }
}

/// Lowest set bit in a word, None if the word is 0 (pure)
pub fn find_least_significant_bit(word: u128) -> Option<u8> {
    if word == 0 {
        None
    } else {
        Some(word.trailing_zeros() as u8)
    }
}

// ============================================================================
// PURE GROWTH FUNCTIONS
// ============================================================================

/// Growth inside a tick range for one accumulator dimension (pure)
///
/// Growth-outside always stores growth on the side opposite the current
/// tick; all arithmetic is wrapping mod 2^128.
pub fn growth_inside(
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    global: u128,
    outside_lower: u128,
    outside_upper: u128,
) -> u128 {
    let below = if tick_current >= tick_lower {
        outside_lower
    } else {
        global.wrapping_sub(outside_lower)
    };
    let above = if tick_current < tick_upper {
        outside_upper
    } else {
        global.wrapping_sub(outside_upper)
    };
    global.wrapping_sub(below).wrapping_sub(above)
}

// ============================================================================
// SIDE EFFECT FUNCTIONS
// ============================================================================

/// Apply a liquidity delta to a tick (side effect)
///
/// On the first initialization of a tick at or below the current tick,
/// every growth-outside is seeded to the current global so that all past
/// growth is attributed to the other side. Returns true when the tick
/// flipped between initialized and uninitialized.
pub fn update(
    env: &Env,
    tick: i32,
    tick_current: i32,
    liquidity_delta: i128,
    globals: &GrowthGlobals,
    upper: bool,
) -> bool {
    let mut info = get_tick(env, tick);

    let gross_before = info.liquidity_gross;
    let gross_after = if liquidity_delta < 0 {
        match gross_before.checked_sub(liquidity_delta.unsigned_abs()) {
            Some(gross) => gross,
            None => panic_with_error!(env, PoolError::InsufficientLiquidity),
        }
    } else {
        match gross_before.checked_add(liquidity_delta as u128) {
            Some(gross) => gross,
            None => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
        }
    };

    let flipped = (gross_after == 0) != (gross_before == 0);

    if gross_before == 0 {
        if tick <= tick_current {
            info.fee_growth_outside_a = globals.fee_a;
            info.fee_growth_outside_b = globals.fee_b;
            info.reward_growths_outside = globals.rewards.clone();
            info.points_growth_outside = globals.points;
            info.emission_growth_outside = globals.emission;
        }
        info.initialized = true;
    }

    info.liquidity_gross = gross_after;
    info.liquidity_net = {
        let applied = if upper {
            liquidity_delta.checked_neg()
        } else {
            Some(liquidity_delta)
        };
        match applied.and_then(|delta| info.liquidity_net.checked_add(delta)) {
            Some(net) => net,
            None => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
        }
    };

    set_tick(env, tick, &info);

    flipped
}

/// Cross a tick during a swap (side effect)
///
/// Flips every growth-outside to `global - outside` and returns the
/// signed (liquidity_net, staked_liquidity_net) deltas for the crossing.
pub fn cross(env: &Env, tick: i32, globals: &GrowthGlobals) -> (i128, i128) {
    let mut info = get_tick(env, tick);

    info.fee_growth_outside_a = globals.fee_a.wrapping_sub(info.fee_growth_outside_a);
    info.fee_growth_outside_b = globals.fee_b.wrapping_sub(info.fee_growth_outside_b);

    let mut rewards = Vec::new(env);
    for (i, global) in globals.rewards.iter().enumerate() {
        let outside = info.reward_growths_outside.get(i as u32).unwrap_or(0);
        rewards.push_back(global.wrapping_sub(outside));
    }
    info.reward_growths_outside = rewards;

    info.points_growth_outside = globals.points.wrapping_sub(info.points_growth_outside);
    info.emission_growth_outside = globals.emission.wrapping_sub(info.emission_growth_outside);

    set_tick(env, tick, &info);

    (info.liquidity_net, info.staked_liquidity_net)
}

/// Adjust staked_liquidity_net on a range endpoint (side effect)
///
/// A stake of `delta` adds on the lower tick and subtracts on the upper,
/// mirroring the liquidity_net convention; an unstake passes a negative
/// delta.
pub fn update_stake(env: &Env, tick: i32, delta: i128, upper: bool) {
    let mut info = get_tick(env, tick);

    let applied = if upper { delta.checked_neg() } else { Some(delta) };
    info.staked_liquidity_net = match applied
        .and_then(|delta| info.staked_liquidity_net.checked_add(delta))
    {
        Some(net) => net,
        None => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
    };

    set_tick(env, tick, &info);
}

/// Fee growth inside a tick range (side effect - reads storage)
///
/// An uninitialized boundary tick contributes zero growth-outside.
pub fn get_fee_growth_inside(
    env: &Env,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_a: u128,
    fee_growth_global_b: u128,
) -> (u128, u128) {
    let lower = get_tick(env, tick_lower);
    let upper = get_tick(env, tick_upper);

    (
        growth_inside(
            tick_lower,
            tick_upper,
            tick_current,
            fee_growth_global_a,
            lower.fee_growth_outside_a,
            upper.fee_growth_outside_a,
        ),
        growth_inside(
            tick_lower,
            tick_upper,
            tick_current,
            fee_growth_global_b,
            lower.fee_growth_outside_b,
            upper.fee_growth_outside_b,
        ),
    )
}

/// Reward growth inside a tick range, one slot per rewarder
pub fn get_reward_growths_inside(
    env: &Env,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    reward_growths_global: &Vec<u128>,
) -> Vec<u128> {
    let lower = get_tick(env, tick_lower);
    let upper = get_tick(env, tick_upper);

    let mut inside = Vec::new(env);
    for (i, global) in reward_growths_global.iter().enumerate() {
        let outside_lower = lower.reward_growths_outside.get(i as u32).unwrap_or(0);
        let outside_upper = upper.reward_growths_outside.get(i as u32).unwrap_or(0);
        inside.push_back(growth_inside(
            tick_lower,
            tick_upper,
            tick_current,
            global,
            outside_lower,
            outside_upper,
        ));
    }
    inside
}

/// Points growth inside a tick range
pub fn get_points_growth_inside(
    env: &Env,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    points_growth_global: u128,
) -> u128 {
    let lower = get_tick(env, tick_lower);
    let upper = get_tick(env, tick_upper);

    growth_inside(
        tick_lower,
        tick_upper,
        tick_current,
        points_growth_global,
        lower.points_growth_outside,
        upper.points_growth_outside,
    )
}

/// Gauge emission growth inside a tick range
pub fn get_emission_growth_inside(
    env: &Env,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    emission_growth_global: u128,
) -> u128 {
    let lower = get_tick(env, tick_lower);
    let upper = get_tick(env, tick_upper);

    growth_inside(
        tick_lower,
        tick_upper,
        tick_current,
        emission_growth_global,
        lower.emission_growth_outside,
        upper.emission_growth_outside,
    )
}

/// Flip a tick in the bitmap (side effect)
pub fn flip_tick(env: &Env, tick: i32, tick_spacing: i32) {
    if tick.rem_euclid(tick_spacing) != 0 {
        panic!("Tick not on spacing");
    }

    let (word_pos, bit_pos) = tick_to_bitmap_position(tick, tick_spacing);
    let mask = 1u128 << bit_pos;
    let word = get_tick_bitmap_word(env, word_pos);
    set_tick_bitmap_word(env, word_pos, word ^ mask);
}

/// Find the next initialized tick in the swap direction (side effect)
///
/// `lte` searches at-or-below `tick` (price falling), otherwise strictly
/// above. Walks bitmap words until the tick bound; None when no
/// initialized tick remains in the direction.
pub fn next_initialized_tick(
    env: &Env,
    tick: i32,
    tick_spacing: i32,
    lte: bool,
) -> Option<i32> {
    let min_word = (MIN_TICK.div_euclid(tick_spacing)) >> 7;
    let max_word = (MAX_TICK.div_euclid(tick_spacing)) >> 7;

    if lte {
        let (mut word_pos, mut bit_pos) = tick_to_bitmap_position(tick, tick_spacing);
        while word_pos >= min_word {
            let word = get_tick_bitmap_word(env, word_pos);
            let masked = word & create_mask_at_or_below(bit_pos);
            if let Some(msb) = find_most_significant_bit(masked) {
                return Some(bitmap_position_to_tick(word_pos, msb as i32, tick_spacing));
            }
            word_pos -= 1;
            bit_pos = 127;
        }
        None
    } else {
        let compressed = tick.div_euclid(tick_spacing) + 1;
        let mut word_pos = compressed >> 7;
        let mut bit_pos = compressed.rem_euclid(128) as u8;
        while word_pos <= max_word {
            let word = get_tick_bitmap_word(env, word_pos);
            let masked = word & create_mask_at_or_above(bit_pos);
            if let Some(lsb) = find_least_significant_bit(masked) {
                return Some(bitmap_position_to_tick(word_pos, lsb as i32, tick_spacing));
            }
            word_pos += 1;
            bit_pos = 0;
        }
        None
    }
}

/// Sum liquidity_net and staked_liquidity_net over every initialized tick
/// at or below `tick_current` (side effect - reads storage)
///
/// Recomputes the active-liquidity register from first principles; used by
/// the staked-liquidity recovery hatch and the invariant checks.
pub fn sum_nets_at_or_below(env: &Env, tick_spacing: i32, tick_current: i32) -> (i128, i128) {
    let min_word = (MIN_TICK.div_euclid(tick_spacing)) >> 7;
    let cur_word = (tick_current.div_euclid(tick_spacing)) >> 7;

    let mut net: i128 = 0;
    let mut staked_net: i128 = 0;

    let mut word_pos = min_word;
    while word_pos <= cur_word {
        let mut word = get_tick_bitmap_word(env, word_pos);
        while word != 0 {
            let bit = word.trailing_zeros() as i32;
            let tick = bitmap_position_to_tick(word_pos, bit, tick_spacing);
            if tick <= tick_current {
                let info = get_tick(env, tick);
                net = match net.checked_add(info.liquidity_net) {
                    Some(net) => net,
                    None => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
                };
                staked_net = match staked_net.checked_add(info.staked_liquidity_net) {
                    Some(staked) => staked,
                    None => panic_with_error!(env, PoolError::LiquidityAdditionOverflow),
                };
            }
            word &= word - 1;
        }
        word_pos += 1;
    }

    (net, staked_net)
}

// ============================================================================
// TESTS
// ============================================================================
