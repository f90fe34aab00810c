mod common;

use common::{open_with_liquidity, setup_pool};
use reef_pool::invariants;
use reef_types::MIN_SQRT_PRICE;
use soroban_sdk::Env;

// === Deposit / withdraw round-trip ===

#[test]
fn test_add_remove_round_trip() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);

    let position_id = pool.client.open_position(&pool.user, &-120, &120);
    let receipt = pool.client.add_liquidity(&position_id, &1_000_000_000u128);
    let (deposited_a, deposited_b) = (receipt.amount_a, receipt.amount_b);
    assert!(deposited_a > 0 && deposited_b > 0, "in-range deposit takes both sides");
    pool.client.repay_add_liquidity(&pool.user, &receipt);

    assert_eq!(pool.client.liquidity(), 1_000_000_000);

    let (returned_a, returned_b) =
        pool.client
            .remove_liquidity(&pool.user, &position_id, &1_000_000_000u128);

    // Rounding is toward the pool: at most one unit is retained per side
    assert!(returned_a <= deposited_a && deposited_a - returned_a <= 1);
    assert!(returned_b <= deposited_b && deposited_b - returned_b <= 1);

    assert_eq!(pool.client.liquidity(), 0);

    // Both endpoint ticks were pruned
    let lower = pool.client.get_tick(&-120);
    let upper = pool.client.get_tick(&120);
    assert_eq!(lower.liquidity_gross, 0);
    assert_eq!(upper.liquidity_gross, 0);
    assert!(!lower.initialized);
    assert!(!upper.initialized);

    // Empty position can now close
    pool.client.close_position(&pool.user, &position_id);
}

#[test]
fn test_add_liquidity_out_of_range_single_sided() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);

    // Entirely above the current price: token A only
    let above = pool.client.open_position(&pool.user, &60, &120);
    let receipt = pool.client.add_liquidity(&above, &1_000_000u128);
    assert!(receipt.amount_a > 0);
    assert_eq!(receipt.amount_b, 0);
    pool.client.repay_add_liquidity(&pool.user, &receipt);

    // Entirely below: token B only
    let below = pool.client.open_position(&pool.user, &-120, &-60);
    let receipt = pool.client.add_liquidity(&below, &1_000_000u128);
    assert_eq!(receipt.amount_a, 0);
    assert!(receipt.amount_b > 0);
    pool.client.repay_add_liquidity(&pool.user, &receipt);

    // Neither is in range, so the active register is untouched
    assert_eq!(pool.client.liquidity(), 0);
}

#[test]
fn test_add_liquidity_fix_coin() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);

    let position_id = pool.client.open_position(&pool.user, &-60, &60);
    let receipt = pool
        .client
        .add_liquidity_fix_coin(&position_id, &1_000_000u64, &true);
    assert_eq!(receipt.amount_a, 1_000_000, "the fixed side is taken exactly");
    assert!(receipt.amount_b > 0, "the derived side is owed too");
    pool.client.repay_add_liquidity(&pool.user, &receipt);

    let position = pool.client.get_position(&position_id);
    assert!(position.liquidity > 0);
    assert_eq!(pool.client.liquidity(), position.liquidity);
}

#[test]
fn test_repay_funds_reserves() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);

    let position_id = pool.client.open_position(&pool.user, &-60, &60);
    let receipt = pool.client.add_liquidity(&position_id, &1_000_000u128);
    pool.client.repay_add_liquidity(&pool.user, &receipt);

    let state = pool.client.get_state();
    assert_eq!(state.reserve_a, receipt.amount_a);
    assert_eq!(state.reserve_b, receipt.amount_b);
    assert!(invariants::reserves_cover_escrows(
        &state,
        common::balance(&env, &pool.token_a, &pool.pool_id),
        common::balance(&env, &pool.token_b, &pool.pool_id),
    ));
}

// === Receipt discipline ===

#[test]
#[should_panic(expected = "Error(Contract, #34)")]
fn test_second_deposit_blocked_while_receipt_outstanding() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);

    let position_id = pool.client.open_position(&pool.user, &-60, &60);
    pool.client.add_liquidity(&position_id, &1_000_000u128);
    // The first receipt was never repaid
    pool.client.add_liquidity(&position_id, &1_000_000u128);
}

#[test]
#[should_panic(expected = "Error(Contract, #34)")]
fn test_repay_without_receipt() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);

    let position_id = pool.client.open_position(&pool.user, &-60, &60);
    let receipt = pool.client.add_liquidity(&position_id, &1_000_000u128);
    pool.client.repay_add_liquidity(&pool.user, &receipt);
    pool.client.repay_add_liquidity(&pool.user, &receipt);
}

#[test]
#[should_panic(expected = "Error(Contract, #34)")]
fn test_flash_swap_blocked_while_add_receipt_outstanding() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    open_with_liquidity(&pool, -60, 60, 1_000_000);

    let position_id = pool.client.open_position(&pool.user, &-120, &120);
    pool.client.add_liquidity(&position_id, &1_000_000u128);
    // The deposit receipt wedges the swap side too
    pool.client
        .flash_swap(&pool.user, &true, &true, &1000u64, &MIN_SQRT_PRICE);
}

#[test]
#[should_panic(expected = "Error(Contract, #34)")]
fn test_collect_fee_blocked_while_add_receipt_outstanding() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    let position_id = open_with_liquidity(&pool, -60, 60, 1_000_000);

    pool.client.add_liquidity(&position_id, &1_000u128);
    pool.client.collect_fee(&pool.user, &position_id, &true);
}

#[test]
#[should_panic(expected = "Error(Contract, #33)")]
fn test_repay_with_forged_receipt() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);

    let position_id = pool.client.open_position(&pool.user, &-60, &60);
    let mut receipt = pool.client.add_liquidity(&position_id, &1_000_000u128);
    receipt.amount_a = receipt.amount_a.saturating_sub(1);
    pool.client.repay_add_liquidity(&pool.user, &receipt);
}

// === Validation ===

#[test]
#[should_panic(expected = "Error(Contract, #2)")]
fn test_add_zero_liquidity() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    let position_id = pool.client.open_position(&pool.user, &-60, &60);
    pool.client.add_liquidity(&position_id, &0u128);
}

#[test]
#[should_panic(expected = "Error(Contract, #15)")]
fn test_open_position_unaligned() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    pool.client.open_position(&pool.user, &-61, &60);
}

#[test]
#[should_panic(expected = "Error(Contract, #5)")]
fn test_remove_more_than_position_has() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    let position_id = open_with_liquidity(&pool, -60, 60, 1_000_000);
    pool.client
        .remove_liquidity(&pool.user, &position_id, &2_000_000u128);
}

#[test]
#[should_panic(expected = "Error(Contract, #32)")]
fn test_remove_by_non_owner() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    let position_id = open_with_liquidity(&pool, -60, 60, 1_000_000);
    pool.client
        .remove_liquidity(&pool.admin, &position_id, &1_000_000u128);
}

#[test]
#[should_panic(expected = "Error(Contract, #21)")]
fn test_unknown_position_id() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    pool.client.add_liquidity(&77u64, &1_000u128);
}

#[test]
#[should_panic(expected = "Error(Contract, #2)")]
fn test_close_position_with_liquidity_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    let position_id = open_with_liquidity(&pool, -60, 60, 1_000_000);
    pool.client.close_position(&pool.user, &position_id);
}

// === Fee collection ===

#[test]
fn test_collect_fee_after_swaps() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    let position_id = open_with_liquidity(&pool, -600, 600, 10_000_000);

    pool.client
        .swap(&pool.user, &true, &true, &100_000u64, &MIN_SQRT_PRICE);

    let balance_before = common::balance(&env, &pool.token_a, &pool.user);
    let (fee_a, fee_b) = pool.client.collect_fee(&pool.user, &position_id, &true);
    assert!(fee_a > 0, "the a2b swap paid fees in token A");
    assert_eq!(fee_b, 0);
    assert_eq!(
        common::balance(&env, &pool.token_a, &pool.user),
        balance_before + fee_a as i128
    );

    // A second collect with no new growth pays nothing
    let (fee_a, fee_b) = pool.client.collect_fee(&pool.user, &position_id, &true);
    assert_eq!((fee_a, fee_b), (0, 0));
}

#[test]
fn test_fee_growth_only_inside_range() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);
    let in_range = open_with_liquidity(&pool, -600, 600, 10_000_000);
    // This range sits entirely above the traversed prices
    let out_of_range = open_with_liquidity(&pool, 6000, 6060, 10_000_000);

    pool.client
        .swap(&pool.user, &true, &true, &100_000u64, &MIN_SQRT_PRICE);

    let (in_a, _) = pool.client.collect_fee(&pool.user, &in_range, &true);
    let (out_a, out_b) = pool.client.collect_fee(&pool.user, &out_of_range, &true);
    assert!(in_a > 0);
    assert_eq!((out_a, out_b), (0, 0), "no growth outside the traversed range");
}

// === Round-trip with price at Q64 keeps invariants ===

#[test]
fn test_register_invariant_through_liquidity_ops() {
    let env = Env::default();
    env.mock_all_auths();
    let pool = setup_pool(&env);

    let first = open_with_liquidity(&pool, -120, 120, 500_000);
    let _second = open_with_liquidity(&pool, -60, 180, 700_000);

    let state = pool.client.get_state();
    let (net, _) = pool.client.liquidity_register();
    assert!(invariants::liquidity_register_consistent(&state, net));
    assert_eq!(state.liquidity, 1_200_000);

    pool.client.remove_liquidity(&pool.user, &first, &500_000u128);
    let state = pool.client.get_state();
    let (net, _) = pool.client.liquidity_register();
    assert!(invariants::liquidity_register_consistent(&state, net));
    assert_eq!(state.liquidity, 700_000);
}
