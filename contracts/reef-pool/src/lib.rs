#![no_std]

mod emission;
mod error;
mod events;
pub mod invariants;
mod liquidity;
mod partner;
mod position;
mod rewarder;
mod storage;
mod swap;
mod tick;

pub use error::PoolError;

use reef_math::tick_math::get_tick_at_sqrt_price;
use reef_types::{
    AddLiquidityReceipt, CalculatedSwapResult, EmissionState, FlashSwapReceipt, GaugeInfo,
    PartnerInfo, PoolConfig, PoolState, PositionInfo, RewarderState, SwapResult, TickInfo,
    FEE_RATE_DENOM, MAX_FEE_RATE, MAX_UNSTAKED_FEE_RATE, UNSTAKED_FEE_RATE_DEFAULT,
};
use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Env, String};

#[contract]
pub struct ReefPool;

#[contractimpl]
impl ReefPool {
    /// Initialize a new pool over a token pair
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        admin: Address,
        fee_claimer: Address,
        token_a: Address,
        token_b: Address,
        index: u32,
        tick_spacing: i32,
        fee_rate: u64,
        protocol_fee_rate: u64,
        default_unstaked_fee_rate: u64,
        initial_sqrt_price: u128,
        url: String,
    ) {
        if storage::is_initialized(&env) {
            panic!("Already initialized");
        }
        if token_a >= token_b {
            panic!("token_a must be less than token_b");
        }
        if tick_spacing <= 0 {
            panic!("tick spacing must be positive");
        }
        if fee_rate > MAX_FEE_RATE {
            panic_with_error!(&env, PoolError::InvalidFeeRate);
        }
        if protocol_fee_rate > FEE_RATE_DENOM {
            panic_with_error!(&env, PoolError::InvalidFeeRate);
        }
        if default_unstaked_fee_rate > MAX_UNSTAKED_FEE_RATE {
            panic_with_error!(&env, PoolError::InvalidFeeRate);
        }

        let tick = get_tick_at_sqrt_price(&env, initial_sqrt_price);
        let now = env.ledger().timestamp();

        let config = PoolConfig {
            admin,
            fee_claimer,
            token_a: token_a.clone(),
            token_b: token_b.clone(),
            fee_rate,
            protocol_fee_rate,
            unstaked_fee_rate: UNSTAKED_FEE_RATE_DEFAULT,
            default_unstaked_fee_rate,
            tick_spacing,
            index,
        };
        storage::set_config(&env, &config);
        storage::set_state(&env, &PoolState::new(initial_sqrt_price, tick));
        storage::set_emission(&env, &EmissionState::new(now));
        storage::set_rewarders(&env, &RewarderState::new(&env, now));
        storage::set_url(&env, &url);

        events::emit_init_pool(
            &env,
            &token_a,
            &token_b,
            index,
            tick_spacing,
            fee_rate,
            initial_sqrt_price,
        );
    }

    // === Position lifecycle ===

    /// Open a zero-liquidity position
    pub fn open_position(env: Env, owner: Address, tick_lower: i32, tick_upper: i32) -> u64 {
        liquidity::open_position(&env, owner, tick_lower, tick_upper)
    }

    /// Close an empty position
    pub fn close_position(env: Env, caller: Address, position_id: u64) {
        liquidity::close_position(&env, caller, position_id)
    }

    // === Liquidity ===

    /// Deposit liquidity; returns the receipt that must be repaid with
    /// `repay_add_liquidity` in the same transaction
    pub fn add_liquidity(env: Env, position_id: u64, liquidity: u128) -> AddLiquidityReceipt {
        liquidity::add_liquidity(&env, position_id, liquidity)
    }

    /// Deposit a fixed amount of one side; liquidity is solved from it
    pub fn add_liquidity_fix_coin(
        env: Env,
        position_id: u64,
        amount: u64,
        fix_a: bool,
    ) -> AddLiquidityReceipt {
        liquidity::add_liquidity_fix_coin(&env, position_id, amount, fix_a)
    }

    /// Consume an add-liquidity receipt by paying the owed amounts
    pub fn repay_add_liquidity(env: Env, payer: Address, receipt: AddLiquidityReceipt) {
        liquidity::repay_add_liquidity(&env, payer, receipt)
    }

    /// Withdraw liquidity to the position owner
    pub fn remove_liquidity(
        env: Env,
        caller: Address,
        position_id: u64,
        liquidity: u128,
    ) -> (u64, u64) {
        liquidity::remove_liquidity(&env, caller, position_id, liquidity)
    }

    /// Collect a position's accrued swap fees
    pub fn collect_fee(
        env: Env,
        caller: Address,
        position_id: u64,
        update_growth: bool,
    ) -> (u64, u64) {
        liquidity::collect_fee(&env, caller, position_id, update_growth)
    }

    /// Collect a position's accrued rewards for one reward token
    pub fn collect_reward(
        env: Env,
        caller: Address,
        position_id: u64,
        reward_token: Address,
    ) -> u64 {
        liquidity::collect_reward(&env, caller, position_id, reward_token)
    }

    /// Collect a staked position's accrued gauge emission
    pub fn collect_emission(env: Env, caller: Address, position_id: u64) -> u64 {
        liquidity::collect_emission(&env, caller, position_id)
    }

    /// Fund reward or emission payouts
    pub fn deposit_reward(env: Env, from: Address, token: Address, amount: u64) {
        liquidity::deposit_reward(&env, from, token, amount)
    }

    // === Swaps ===

    /// Execute a swap, settling both transfers in one call
    pub fn swap(
        env: Env,
        payer: Address,
        a2b: bool,
        by_amount_in: bool,
        amount: u64,
        sqrt_price_limit: u128,
    ) -> SwapResult {
        swap::execute_swap(&env, payer, a2b, by_amount_in, amount, sqrt_price_limit, None)
    }

    /// Execute a swap crediting the referral share to a partner
    #[allow(clippy::too_many_arguments)]
    pub fn swap_with_partner(
        env: Env,
        payer: Address,
        partner: Address,
        a2b: bool,
        by_amount_in: bool,
        amount: u64,
        sqrt_price_limit: u128,
    ) -> SwapResult {
        swap::execute_swap(
            &env,
            payer,
            a2b,
            by_amount_in,
            amount,
            sqrt_price_limit,
            Some(partner),
        )
    }

    /// Swap and hand out the output immediately; payment is owed against
    /// the returned receipt
    pub fn flash_swap(
        env: Env,
        recipient: Address,
        a2b: bool,
        by_amount_in: bool,
        amount: u64,
        sqrt_price_limit: u128,
    ) -> (u64, FlashSwapReceipt) {
        swap::flash_swap(&env, recipient, a2b, by_amount_in, amount, sqrt_price_limit, None)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn flash_swap_with_partner(
        env: Env,
        recipient: Address,
        partner: Address,
        a2b: bool,
        by_amount_in: bool,
        amount: u64,
        sqrt_price_limit: u128,
    ) -> (u64, FlashSwapReceipt) {
        swap::flash_swap(
            &env,
            recipient,
            a2b,
            by_amount_in,
            amount,
            sqrt_price_limit,
            Some(partner),
        )
    }

    /// Consume a flash swap receipt by paying the owed input amount
    pub fn repay_flash_swap(env: Env, payer: Address, receipt: FlashSwapReceipt) {
        swap::repay_flash_swap(&env, payer, receipt, None)
    }

    pub fn repay_flash_swap_with_partner(
        env: Env,
        payer: Address,
        partner: Address,
        receipt: FlashSwapReceipt,
    ) {
        swap::repay_flash_swap(&env, payer, receipt, Some(partner))
    }

    /// Read-only simulation of a swap
    pub fn calculate_swap_result(
        env: Env,
        a2b: bool,
        by_amount_in: bool,
        amount: u64,
        sqrt_price_limit: u128,
    ) -> CalculatedSwapResult {
        swap::calculate_swap_result(&env, a2b, by_amount_in, amount, sqrt_price_limit)
    }

    // === Rewarders ===

    /// Register a new reward stream (admin)
    pub fn add_rewarder(env: Env, token: Address) -> u32 {
        liquidity::assert_mutable(&env);
        let config = storage::get_config(&env);
        config.admin.require_auth();

        let state = storage::get_state(&env);
        let now = env.ledger().timestamp();
        let slot = rewarder::add_rewarder(&env, state.liquidity, now, token.clone());
        events::emit_add_rewarder(&env, &token, slot);
        slot
    }

    /// Re-rate a reward stream (admin)
    pub fn update_rewarder_emission(env: Env, token: Address, emissions_per_second_x64: u128) {
        liquidity::assert_mutable(&env);
        let config = storage::get_config(&env);
        config.admin.require_auth();

        let state = storage::get_state(&env);
        let now = env.ledger().timestamp();
        rewarder::update_emission(&env, state.liquidity, now, &token, emissions_per_second_x64);
        events::emit_update_rewarder_emission(&env, &token, emissions_per_second_x64);
    }

    // === Gauge emission ===

    /// Bind the gauge and its emission token (admin, once)
    pub fn init_gauge(env: Env, gauge: Address, emission_token: Address) {
        liquidity::assert_mutable(&env);
        let config = storage::get_config(&env);
        config.admin.require_auth();

        if storage::get_gauge(&env).is_some() {
            panic_with_error!(&env, PoolError::InvalidGaugeCap);
        }
        storage::set_gauge(
            &env,
            &GaugeInfo {
                gauge: gauge.clone(),
                emission_token: emission_token.clone(),
            },
        );
        events::emit_init_gauge(&env, &gauge, &emission_token);
    }

    /// Re-rate the emission stream (gauge); accrues up to now first
    pub fn sync_emission(env: Env, rate_x64: u128, reserve: u64, period_finish: u64) -> u64 {
        liquidity::assert_mutable(&env);
        emission::sync(&env, rate_x64, reserve, period_finish)
    }

    /// Stake a position into the gauge (gauge)
    pub fn stake_position(env: Env, position_id: u64) {
        liquidity::assert_mutable(&env);
        emission::stake(&env, position_id)
    }

    /// Unstake a position from the gauge (gauge)
    pub fn unstake_position(env: Env, position_id: u64) {
        liquidity::assert_mutable(&env);
        emission::unstake(&env, position_id)
    }

    /// Recompute the registers from tick storage and overwrite the staked
    /// register (admin recovery hatch)
    pub fn restore_staked_liquidity(env: Env) -> u128 {
        liquidity::assert_mutable(&env);
        let config = storage::get_config(&env);
        config.admin.require_auth();
        emission::restore_staked_liquidity(&env)
    }

    // === Partners ===

    /// Register a referral partner (admin)
    pub fn register_partner(
        env: Env,
        partner: Address,
        ref_fee_rate: u64,
        start_time: u64,
        end_time: u64,
    ) {
        liquidity::assert_mutable(&env);
        partner::register_partner(&env, partner, ref_fee_rate, start_time, end_time)
    }

    /// Pay out a partner's accrued referral fees
    pub fn claim_ref_fee(env: Env, partner: Address) -> (u64, u64) {
        liquidity::assert_mutable(&env);
        partner::claim_ref_fee(&env, partner)
    }

    // === Protocol controls ===

    /// Pause the pool (admin)
    pub fn pause(env: Env) {
        liquidity::assert_no_outstanding_receipt(&env);
        let config = storage::get_config(&env);
        config.admin.require_auth();

        let mut state = storage::get_state(&env);
        if state.paused {
            panic_with_error!(&env, PoolError::PoolAlreadyPaused);
        }
        state.paused = true;
        storage::set_state(&env, &state);
        events::emit_pause(&env);
    }

    /// Unpause the pool (admin)
    pub fn unpause(env: Env) {
        let config = storage::get_config(&env);
        config.admin.require_auth();

        let mut state = storage::get_state(&env);
        if !state.paused {
            panic_with_error!(&env, PoolError::PoolNotPaused);
        }
        state.paused = false;
        storage::set_state(&env, &state);
        events::emit_unpause(&env);
    }

    /// Move the protocol fee escrows out (fee claimer)
    pub fn collect_protocol_fee(env: Env, recipient: Address) -> (u64, u64) {
        liquidity::assert_mutable(&env);
        let config = storage::get_config(&env);
        config.fee_claimer.require_auth();

        let mut state = storage::get_state(&env);
        let amount_a = state.protocol_fee_a;
        let amount_b = state.protocol_fee_b;
        state.protocol_fee_a = 0;
        state.protocol_fee_b = 0;
        storage::set_state(&env, &state);

        let contract = env.current_contract_address();
        if amount_a > 0 {
            soroban_sdk::token::Client::new(&env, &config.token_a).transfer(
                &contract,
                &recipient,
                &(amount_a as i128),
            );
        }
        if amount_b > 0 {
            soroban_sdk::token::Client::new(&env, &config.token_b).transfer(
                &contract,
                &recipient,
                &(amount_b as i128),
            );
        }

        events::emit_collect_protocol_fee(&env, &recipient, amount_a, amount_b);
        (amount_a, amount_b)
    }

    /// Move the gauge fee escrows out (gauge)
    pub fn collect_gauge_fee(env: Env, recipient: Address) -> (u64, u64) {
        liquidity::assert_mutable(&env);
        let gauge = emission::require_gauge(&env);
        gauge.gauge.require_auth();

        let config = storage::get_config(&env);
        let mut state = storage::get_state(&env);
        let amount_a = state.gauge_fee_a;
        let amount_b = state.gauge_fee_b;
        state.gauge_fee_a = 0;
        state.gauge_fee_b = 0;
        storage::set_state(&env, &state);

        let contract = env.current_contract_address();
        if amount_a > 0 {
            soroban_sdk::token::Client::new(&env, &config.token_a).transfer(
                &contract,
                &recipient,
                &(amount_a as i128),
            );
        }
        if amount_b > 0 {
            soroban_sdk::token::Client::new(&env, &config.token_b).transfer(
                &contract,
                &recipient,
                &(amount_b as i128),
            );
        }

        events::emit_collect_gauge_fee(&env, &recipient, amount_a, amount_b);
        (amount_a, amount_b)
    }

    /// Change the swap fee rate (admin)
    pub fn update_fee_rate(env: Env, new_fee_rate: u64) {
        liquidity::assert_mutable(&env);
        let mut config = storage::get_config(&env);
        config.admin.require_auth();

        if new_fee_rate == config.fee_rate || new_fee_rate > MAX_FEE_RATE {
            panic_with_error!(&env, PoolError::InvalidFeeRate);
        }
        let old = config.fee_rate;
        config.fee_rate = new_fee_rate;
        storage::set_config(&env, &config);
        events::emit_update_fee_rate(&env, old, new_fee_rate);
    }

    /// Change the unstaked-liquidity fee rate; the sentinel inherits the
    /// config default at swap time (admin)
    pub fn update_unstaked_liquidity_fee_rate(env: Env, new_rate: u64) {
        liquidity::assert_mutable(&env);
        let mut config = storage::get_config(&env);
        config.admin.require_auth();

        if new_rate != UNSTAKED_FEE_RATE_DEFAULT && new_rate > MAX_UNSTAKED_FEE_RATE {
            panic_with_error!(&env, PoolError::InvalidFeeRate);
        }
        let old = config.unstaked_fee_rate;
        config.unstaked_fee_rate = new_rate;
        storage::set_config(&env, &config);
        events::emit_update_unstaked_fee_rate(&env, old, new_rate);
    }

    /// Change the pool metadata URL (admin)
    pub fn update_pool_url(env: Env, url: String) {
        liquidity::assert_mutable(&env);
        let config = storage::get_config(&env);
        config.admin.require_auth();

        storage::set_url(&env, &url);
        events::emit_update_pool_url(&env, &url);
    }

    // === Views ===

    pub fn get_config(env: Env) -> PoolConfig {
        storage::get_config(&env)
    }

    pub fn get_state(env: Env) -> PoolState {
        storage::get_state(&env)
    }

    pub fn get_emission(env: Env) -> EmissionState {
        storage::get_emission(&env)
    }

    pub fn get_rewarders(env: Env) -> RewarderState {
        storage::get_rewarders(&env)
    }

    pub fn get_url(env: Env) -> String {
        storage::get_url(&env)
    }

    pub fn get_tick(env: Env, tick: i32) -> TickInfo {
        storage::get_tick(&env, tick)
    }

    pub fn get_position(env: Env, position_id: u64) -> PositionInfo {
        position::require_position(&env, position_id)
    }

    pub fn get_partner(env: Env, partner: Address) -> PartnerInfo {
        partner::require_partner(&env, &partner)
    }

    pub fn sqrt_price(env: Env) -> u128 {
        storage::get_state(&env).sqrt_price
    }

    pub fn current_tick(env: Env) -> i32 {
        storage::get_state(&env).tick
    }

    pub fn liquidity(env: Env) -> u128 {
        storage::get_state(&env).liquidity
    }

    pub fn staked_liquidity(env: Env) -> u128 {
        storage::get_emission(&env).staked_liquidity
    }

    /// Recompute (liquidity_net, staked_liquidity_net) sums at or below
    /// the current tick from tick storage
    pub fn liquidity_register(env: Env) -> (i128, i128) {
        let config = storage::get_config(&env);
        let state = storage::get_state(&env);
        tick::sum_nets_at_or_below(&env, config.tick_spacing, state.tick)
    }
}
