use soroban_sdk::contracterror;

/// Pool contract errors
///
/// Codes are stable: each kind maps 1-to-1 to its numeric code and the
/// mapping never changes. Growth accumulators wrap by design and never
/// raise; token amounts, liquidity and fees use checked arithmetic and
/// raise the matching overflow kind.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolError {
    /// Amount argument must be non-zero
    ZeroAmount = 1,
    /// Liquidity argument must be non-zero, or position must be empty
    ZeroLiquidity = 2,
    /// Swap produced no output
    ZeroOutputAmount = 3,
    /// Checked subtraction of an amount failed
    InsufficientAmount = 4,
    /// Active liquidity underflow when crossing a tick
    InsufficientLiquidity = 5,
    /// Staked liquidity underflow when crossing a tick or unstaking
    InsufficientStakedLiquidity = 6,
    /// Liquidity addition overflowed
    LiquidityAdditionOverflow = 7,
    /// Accumulated input amount overflowed u64
    AmountInOverflow = 8,
    /// Accumulated output amount overflowed u64
    AmountOutOverflow = 9,
    /// Accumulated fee amount overflowed u64
    FeeAmountOverflow = 10,
    /// Fee rate outside the allowed range, or unchanged
    InvalidFeeRate = 11,
    /// Referral fee rate above FEE_RATE_DENOM
    InvalidRefFeeRate = 12,
    /// Non-partner repayment carried a referral fee
    InvalidRefFeeAmount = 13,
    /// Price limit on the wrong side of the current price or out of bounds
    InvalidPriceLimit = 14,
    /// Tick range empty, unaligned or out of bounds
    InvalidTickRange = 15,
    /// Emission sync with a finish timestamp in the past
    InvalidSyncEmissionTime = 16,
    /// Gauge already bound
    InvalidGaugeCap = 17,
    /// Receipt was issued by a different pool
    PoolIdMismatch = 18,
    /// Receipt partner does not match the repayment partner
    PartnerIdMismatch = 19,
    /// Partner repayment required for this receipt
    PartnerIdNotEmpty = 20,
    /// Position id is not known to this pool
    PositionPoolIdMismatch = 21,
    /// Staked positions cannot change liquidity
    PositionIsStaked = 22,
    /// Position is already staked
    StakeAlreadyStaked = 23,
    /// Position is not staked
    UnstakeNotStaked = 24,
    /// Pool is paused
    PoolPaused = 25,
    /// Pool is already paused
    PoolAlreadyPaused = 26,
    /// Pool is not paused
    PoolNotPaused = 27,
    /// No initialized tick remains in the swap direction
    NextTickNotFound = 28,
    /// Reward token is not registered, or no rewarder slot is free
    RewarderIndexNotFound = 29,
    /// No gauge is bound to this pool
    GaugerIdNotFound = 30,
    /// Recomputed liquidity does not match the active register
    LiquidityMismatch = 31,
    /// Caller does not own the position
    NotOwner = 32,
    /// Unknown pool or partner id
    InvalidPoolOrPartnerId = 33,
    /// A hot-potato receipt is outstanding, or a repayment has none to
    /// consume
    OutstandingReceipt = 34,
}
