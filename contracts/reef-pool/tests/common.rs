#![allow(dead_code)]

use reef_pool::{ReefPool, ReefPoolClient};
use reef_types::Q64;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{Address, Env, String};

// Test constants
pub const TICK_SPACING: i32 = 60;
pub const FEE_RATE: u64 = 3000; // 0.30%
pub const PROTOCOL_FEE_RATE: u64 = 200_000; // 20% of the fee
pub const DEFAULT_UNSTAKED_FEE_RATE: u64 = 3000; // 30% of UNSTAKED_FEE_DENOM
pub const MINT_AMOUNT: i128 = 1_000_000_000_000;

pub struct TestPool<'a> {
    pub client: ReefPoolClient<'a>,
    pub pool_id: Address,
    pub admin: Address,
    pub fee_claimer: Address,
    pub token_a: Address,
    pub token_b: Address,
    pub user: Address,
}

/// Register a pool at price 1.0 with two funded stellar asset contracts
pub fn setup_pool(env: &Env) -> TestPool<'_> {
    setup_pool_with_price(env, Q64)
}

pub fn setup_pool_with_price(env: &Env, sqrt_price: u128) -> TestPool<'_> {
    let admin = Address::generate(env);
    let fee_claimer = Address::generate(env);
    let user = Address::generate(env);

    let token_a = create_token(env, &admin);
    let token_b = create_token(env, &admin);
    let (token_a, token_b) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };

    let pool_id = env.register(ReefPool, ());
    let client = ReefPoolClient::new(env, &pool_id);

    client.initialize(
        &admin,
        &fee_claimer,
        &token_a,
        &token_b,
        &0u32,
        &TICK_SPACING,
        &FEE_RATE,
        &PROTOCOL_FEE_RATE,
        &DEFAULT_UNSTAKED_FEE_RATE,
        &sqrt_price,
        &String::from_str(env, "https://reef.example/pool/0"),
    );

    mint_tokens(env, &token_a, &user, MINT_AMOUNT);
    mint_tokens(env, &token_b, &user, MINT_AMOUNT);

    TestPool {
        client,
        pool_id,
        admin,
        fee_claimer,
        token_a,
        token_b,
        user,
    }
}

/// Create a test token
pub fn create_token(env: &Env, admin: &Address) -> Address {
    env.register_stellar_asset_contract_v2(admin.clone()).address()
}

/// Mint tokens to an address
pub fn mint_tokens(env: &Env, token: &Address, to: &Address, amount: i128) {
    StellarAssetClient::new(env, token).mint(to, &amount);
}

pub fn balance(env: &Env, token: &Address, holder: &Address) -> i128 {
    TokenClient::new(env, token).balance(holder)
}

/// Open a position, deposit liquidity and repay the receipt
pub fn open_with_liquidity(pool: &TestPool, tick_lower: i32, tick_upper: i32, liquidity: u128) -> u64 {
    let position_id = pool.client.open_position(&pool.user, &tick_lower, &tick_upper);
    let receipt = pool.client.add_liquidity(&position_id, &liquidity);
    pool.client.repay_add_liquidity(&pool.user, &receipt);
    position_id
}

/// Jump the ledger clock to an absolute timestamp
pub fn set_time(env: &Env, timestamp: u64) {
    env.ledger().with_mut(|ledger| ledger.timestamp = timestamp);
}
