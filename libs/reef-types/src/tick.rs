use soroban_sdk::{contracttype, Env, Vec};

/// Information stored for each initialized tick
///
/// Every growth-outside accumulator stores growth on the side opposite the
/// current tick and is flipped to `global - outside` when the tick is
/// crossed.
#[contracttype]
#[derive(Clone, Debug)]
pub struct TickInfo {
    /// Total liquidity referencing this tick
    pub liquidity_gross: u128,
    /// Net liquidity change when the tick is crossed left-to-right
    pub liquidity_net: i128,
    /// Net staked-liquidity change when the tick is crossed left-to-right
    pub staked_liquidity_net: i128,
    /// Fee growth on the token A side (Q64.64, wrapping)
    pub fee_growth_outside_a: u128,
    /// Fee growth on the token B side (Q64.64, wrapping)
    pub fee_growth_outside_b: u128,
    /// Reward growth per rewarder slot (Q64.64, wrapping)
    pub reward_growths_outside: Vec<u128>,
    /// Points growth (Q64.64, wrapping)
    pub points_growth_outside: u128,
    /// Gauge emission growth (Q64.64, wrapping)
    pub emission_growth_outside: u128,
    /// True once the tick has been initialized
    pub initialized: bool,
}

impl TickInfo {
    pub fn new(env: &Env) -> Self {
        Self {
            liquidity_gross: 0,
            liquidity_net: 0,
            staked_liquidity_net: 0,
            fee_growth_outside_a: 0,
            fee_growth_outside_b: 0,
            reward_growths_outside: Vec::new(env),
            points_growth_outside: 0,
            emission_growth_outside: 0,
            initialized: false,
        }
    }
}
