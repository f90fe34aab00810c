use reef_types::{
    AddLiquidityReceipt, EmissionState, FlashSwapReceipt, GaugeInfo, PartnerInfo, PoolConfig,
    PoolState, PositionInfo, RewarderState, TickInfo,
};
use soroban_sdk::{contracttype, Address, Env, String};

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Pool configuration (Instance storage)
    Config,
    /// Current pool state (Instance storage)
    State,
    /// Gauge emission stream state (Instance storage)
    Emission,
    /// Rewarder manager state (Instance storage)
    Rewarders,
    /// Gauge binding (Instance storage)
    Gauge,
    /// Pool metadata URL (Instance storage)
    Url,
    /// Next position id (Instance storage)
    PositionCount,
    /// Position data: position_id -> PositionInfo (Persistent storage)
    Position(u64),
    /// Tick data: tick_index -> TickInfo (Persistent storage)
    Tick(i32),
    /// Tick bitmap: word_position -> u128 bitmap (Persistent storage)
    TickBitmap(i32),
    /// Partner record: address -> PartnerInfo (Persistent storage)
    Partner(Address),
    /// Outstanding flash swap receipt (Temporary storage)
    PendingFlashSwap,
    /// Outstanding add-liquidity receipt (Temporary storage)
    PendingAddLiquidity,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> PoolConfig {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("Pool not initialized")
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn get_state(env: &Env) -> PoolState {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("Pool not initialized")
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Emission ===

pub fn get_emission(env: &Env) -> EmissionState {
    env.storage()
        .instance()
        .get(&DataKey::Emission)
        .expect("Pool not initialized")
}

pub fn set_emission(env: &Env, emission: &EmissionState) {
    env.storage().instance().set(&DataKey::Emission, emission);
}

// === Rewarders ===

pub fn get_rewarders(env: &Env) -> RewarderState {
    env.storage()
        .instance()
        .get(&DataKey::Rewarders)
        .expect("Pool not initialized")
}

pub fn set_rewarders(env: &Env, rewarders: &RewarderState) {
    env.storage().instance().set(&DataKey::Rewarders, rewarders);
}

// === Gauge ===

pub fn get_gauge(env: &Env) -> Option<GaugeInfo> {
    env.storage().instance().get(&DataKey::Gauge)
}

pub fn set_gauge(env: &Env, gauge: &GaugeInfo) {
    env.storage().instance().set(&DataKey::Gauge, gauge);
}

// === Url ===

pub fn get_url(env: &Env) -> String {
    env.storage()
        .instance()
        .get(&DataKey::Url)
        .expect("Pool not initialized")
}

pub fn set_url(env: &Env, url: &String) {
    env.storage().instance().set(&DataKey::Url, url);
}

// === Positions ===

pub fn next_position_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::PositionCount)
        .unwrap_or(0)
        + 1;
    env.storage().instance().set(&DataKey::PositionCount, &id);
    id
}

pub fn get_position(env: &Env, position_id: u64) -> Option<PositionInfo> {
    env.storage().persistent().get(&DataKey::Position(position_id))
}

pub fn set_position(env: &Env, position_id: u64, position: &PositionInfo) {
    let key = DataKey::Position(position_id);
    env.storage().persistent().set(&key, position);
    extend_persistent_ttl(env, &key);
}

pub fn remove_position(env: &Env, position_id: u64) {
    env.storage()
        .persistent()
        .remove(&DataKey::Position(position_id));
}

// === Ticks ===

pub fn get_tick(env: &Env, tick: i32) -> TickInfo {
    let key = DataKey::Tick(tick);
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| TickInfo::new(env))
}

pub fn set_tick(env: &Env, tick: i32, info: &TickInfo) {
    let key = DataKey::Tick(tick);
    if info.liquidity_gross == 0 {
        // Remove empty tick
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, info);
        extend_persistent_ttl(env, &key);
    }
}

// === Tick bitmap ===

pub fn get_tick_bitmap_word(env: &Env, word_pos: i32) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::TickBitmap(word_pos))
        .unwrap_or(0)
}

pub fn set_tick_bitmap_word(env: &Env, word_pos: i32, word: u128) {
    let key = DataKey::TickBitmap(word_pos);
    if word == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &word);
        extend_persistent_ttl(env, &key);
    }
}

// === Partners ===

pub fn get_partner(env: &Env, partner: &Address) -> Option<PartnerInfo> {
    env.storage().persistent().get(&DataKey::Partner(partner.clone()))
}

pub fn set_partner(env: &Env, partner: &Address, info: &PartnerInfo) {
    let key = DataKey::Partner(partner.clone());
    env.storage().persistent().set(&key, info);
    extend_persistent_ttl(env, &key);
}

// === Outstanding receipts ===

pub fn get_pending_flash_swap(env: &Env) -> Option<FlashSwapReceipt> {
    env.storage().temporary().get(&DataKey::PendingFlashSwap)
}

pub fn set_pending_flash_swap(env: &Env, receipt: &FlashSwapReceipt) {
    env.storage()
        .temporary()
        .set(&DataKey::PendingFlashSwap, receipt);
}

pub fn clear_pending_flash_swap(env: &Env) {
    env.storage().temporary().remove(&DataKey::PendingFlashSwap);
}

pub fn get_pending_add_liquidity(env: &Env) -> Option<AddLiquidityReceipt> {
    env.storage().temporary().get(&DataKey::PendingAddLiquidity)
}

pub fn set_pending_add_liquidity(env: &Env, receipt: &AddLiquidityReceipt) {
    env.storage()
        .temporary()
        .set(&DataKey::PendingAddLiquidity, receipt);
}

pub fn clear_pending_add_liquidity(env: &Env) {
    env.storage()
        .temporary()
        .remove(&DataKey::PendingAddLiquidity);
}
