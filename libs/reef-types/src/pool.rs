use soroban_sdk::{contracttype, Address};

/// Pool configuration - set at initialization, fee rates mutable by admin
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Pool manager (pause, fee rates, rewarders, partners, gauge binding)
    pub admin: Address,
    /// Role allowed to collect the protocol fee escrow
    pub fee_claimer: Address,
    /// Token A address
    pub token_a: Address,
    /// Token B address
    pub token_b: Address,
    /// Swap fee rate over FEE_RATE_DENOM
    pub fee_rate: u64,
    /// Protocol share of the swap fee, over FEE_RATE_DENOM
    pub protocol_fee_rate: u64,
    /// Gauge split rate over UNSTAKED_FEE_DENOM, or the inherit sentinel
    pub unstaked_fee_rate: u64,
    /// Default gauge split applied when unstaked_fee_rate is the sentinel
    pub default_unstaked_fee_rate: u64,
    /// Tick spacing for this pool
    pub tick_spacing: i32,
    /// Pool index assigned by the deployer
    pub index: u32,
}

/// Current pool state
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolState {
    /// Current sqrt(price) as Q64.64
    pub sqrt_price: u128,
    /// Current tick index
    pub tick: i32,
    /// Liquidity currently in range
    pub liquidity: u128,
    /// Fee growth global for token A (Q64.64, wrapping)
    pub fee_growth_global_a: u128,
    /// Fee growth global for token B (Q64.64, wrapping)
    pub fee_growth_global_b: u128,
    /// Protocol fee escrow, token A
    pub protocol_fee_a: u64,
    /// Protocol fee escrow, token B
    pub protocol_fee_b: u64,
    /// Gauge fee escrow, token A
    pub gauge_fee_a: u64,
    /// Gauge fee escrow, token B
    pub gauge_fee_b: u64,
    /// Token A reserve backing liquidity and owed LP fees
    pub reserve_a: u64,
    /// Token B reserve backing liquidity and owed LP fees
    pub reserve_b: u64,
    /// Pause flag
    pub paused: bool,
}

impl PoolState {
    pub fn new(sqrt_price: u128, tick: i32) -> Self {
        Self {
            sqrt_price,
            tick,
            liquidity: 0,
            fee_growth_global_a: 0,
            fee_growth_global_b: 0,
            protocol_fee_a: 0,
            protocol_fee_b: 0,
            gauge_fee_a: 0,
            gauge_fee_b: 0,
            reserve_a: 0,
            reserve_b: 0,
            paused: false,
        }
    }
}

/// Gauge emission stream state
///
/// `reserve` drains into `growth_global_x64` at `rate_x64` tokens/second
/// while staked liquidity is non-zero; whole seconds with zero staked
/// liquidity accrue into `rollover` instead.
#[contracttype]
#[derive(Clone, Debug)]
pub struct EmissionState {
    /// Emission rate, tokens per second, Q64.64
    pub rate_x64: u128,
    /// Undistributed emission reserve
    pub reserve: u64,
    /// Timestamp after which the stream stops being re-rated
    pub period_finish: u64,
    /// Emission accrued while nothing was staked
    pub rollover: u64,
    /// Last settlement timestamp
    pub last_updated: u64,
    /// Subset of active liquidity earning the emission stream
    pub staked_liquidity: u128,
    /// Emission growth per unit of staked liquidity (Q64.64, wrapping)
    pub growth_global_x64: u128,
}

impl EmissionState {
    pub fn new(now: u64) -> Self {
        Self {
            rate_x64: 0,
            reserve: 0,
            period_finish: 0,
            rollover: 0,
            last_updated: now,
            staked_liquidity: 0,
            growth_global_x64: 0,
        }
    }
}

/// Gauge binding for the emission stream
#[contracttype]
#[derive(Clone, Debug)]
pub struct GaugeInfo {
    /// Address allowed to sync emission and stake/unstake positions
    pub gauge: Address,
    /// Token the emission stream pays out
    pub emission_token: Address,
}

/// Referral partner record
#[contracttype]
#[derive(Clone, Debug)]
pub struct PartnerInfo {
    /// Referral share of the swap fee, over FEE_RATE_DENOM
    pub ref_fee_rate: u64,
    /// Window start (inclusive)
    pub start_time: u64,
    /// Window end (exclusive)
    pub end_time: u64,
    /// Accrued referral fees, token A
    pub balance_a: u64,
    /// Accrued referral fees, token B
    pub balance_b: u64,
}

impl PartnerInfo {
    /// The rate in force at `now`; zero outside the partner's window
    pub fn current_ref_fee_rate(&self, now: u64) -> u64 {
        if now >= self.start_time && now < self.end_time {
            self.ref_fee_rate
        } else {
            0
        }
    }
}

/// Result of an executed swap
#[contracttype]
#[derive(Clone, Debug)]
pub struct SwapResult {
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub protocol_fee_amount: u64,
    pub ref_fee_amount: u64,
    pub gauge_fee_amount: u64,
    pub steps: u32,
}

/// Result of a read-only swap simulation
#[contracttype]
#[derive(Clone, Debug)]
pub struct CalculatedSwapResult {
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub protocol_fee_amount: u64,
    pub ref_fee_amount: u64,
    pub gauge_fee_amount: u64,
    pub after_sqrt_price: u128,
    /// True when the tick iterator ran out before the amount drained
    pub is_exceed: bool,
    pub steps: u32,
}

/// Hot-potato receipt for a flash swap; must be consumed by the matching
/// repay call in the same transaction
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashSwapReceipt {
    pub pool: Address,
    pub a2b: bool,
    pub partner: Option<Address>,
    /// amount_in + fee_amount, owed on the input side
    pub pay_amount: u64,
    pub fee_amount: u64,
    pub protocol_fee_amount: u64,
    pub ref_fee_amount: u64,
    pub gauge_fee_amount: u64,
}

/// Hot-potato receipt for a liquidity deposit; must be consumed by
/// repay_add_liquidity
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddLiquidityReceipt {
    pub pool: Address,
    pub position_id: u64,
    pub amount_a: u64,
    pub amount_b: u64,
}
