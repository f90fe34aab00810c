// Referral partner registry: time-windowed referral fee rates and the
// accrued balances swaps credit to them.

use crate::error::PoolError;
use crate::events;
use crate::storage::{get_config, get_partner, set_partner};
use reef_types::{PartnerInfo, FEE_RATE_DENOM};
use soroban_sdk::{panic_with_error, token, Address, Env};

/// Register a partner with a referral window (admin)
pub fn register_partner(
    env: &Env,
    partner: Address,
    ref_fee_rate: u64,
    start_time: u64,
    end_time: u64,
) {
    let config = get_config(env);
    config.admin.require_auth();

    if ref_fee_rate > FEE_RATE_DENOM {
        panic_with_error!(env, PoolError::InvalidRefFeeRate);
    }
    if start_time >= end_time {
        panic_with_error!(env, PoolError::InvalidSyncEmissionTime);
    }
    if get_partner(env, &partner).is_some() {
        panic_with_error!(env, PoolError::InvalidPoolOrPartnerId);
    }

    let info = PartnerInfo {
        ref_fee_rate,
        start_time,
        end_time,
        balance_a: 0,
        balance_b: 0,
    };
    set_partner(env, &partner, &info);
    events::emit_register_partner(env, &partner, ref_fee_rate, start_time, end_time);
}

/// Load a partner or fail
pub fn require_partner(env: &Env, partner: &Address) -> PartnerInfo {
    match get_partner(env, partner) {
        Some(info) => info,
        None => panic_with_error!(env, PoolError::InvalidPoolOrPartnerId),
    }
}

/// Credit a referral fee taken on the swap input side
pub fn credit_ref_fee(env: &Env, partner: &Address, a2b: bool, amount: u64) {
    if amount == 0 {
        return;
    }
    let mut info = require_partner(env, partner);
    if a2b {
        info.balance_a = match info.balance_a.checked_add(amount) {
            Some(balance) => balance,
            None => panic_with_error!(env, PoolError::FeeAmountOverflow),
        };
    } else {
        info.balance_b = match info.balance_b.checked_add(amount) {
            Some(balance) => balance,
            None => panic_with_error!(env, PoolError::FeeAmountOverflow),
        };
    }
    set_partner(env, partner, &info);
}

/// Pay out a partner's accrued referral fees
pub fn claim_ref_fee(env: &Env, partner: Address) -> (u64, u64) {
    partner.require_auth();

    let config = get_config(env);
    let mut info = require_partner(env, &partner);

    let amount_a = info.balance_a;
    let amount_b = info.balance_b;
    info.balance_a = 0;
    info.balance_b = 0;
    set_partner(env, &partner, &info);

    let contract = env.current_contract_address();
    if amount_a > 0 {
        token::Client::new(env, &config.token_a).transfer(&contract, &partner, &(amount_a as i128));
    }
    if amount_b > 0 {
        token::Client::new(env, &config.token_b).transfer(&contract, &partner, &(amount_b as i128));
    }

    events::emit_claim_ref_fee(env, &partner, amount_a, amount_b);
    (amount_a, amount_b)
}
