use soroban_sdk::{contracttype, Address, Env, Vec};

/// Position info stored in the pool contract, keyed by position id
#[contracttype]
#[derive(Clone, Debug)]
pub struct PositionInfo {
    /// Position owner
    pub owner: Address,
    /// Lower tick boundary
    pub tick_lower: i32,
    /// Upper tick boundary
    pub tick_upper: i32,
    /// Liquidity in this position
    pub liquidity: u128,
    /// Fee growth inside at last update, token A
    pub fee_growth_inside_a: u128,
    /// Fee growth inside at last update, token B
    pub fee_growth_inside_b: u128,
    /// Uncollected token A fees
    pub fee_owed_a: u64,
    /// Uncollected token B fees
    pub fee_owed_b: u64,
    /// Reward growth inside at last update, one slot per rewarder
    pub reward_growths_inside: Vec<u128>,
    /// Uncollected rewards, one slot per rewarder
    pub rewards_owed: Vec<u64>,
    /// Points growth inside at last update
    pub points_growth_inside: u128,
    /// Accrued points score
    pub points_owed: u128,
    /// Emission growth inside at last update
    pub emission_growth_inside: u128,
    /// Uncollected gauge emission
    pub emission_owed: u64,
    /// True while the position is staked in the gauge
    pub is_staked: bool,
}

impl PositionInfo {
    pub fn new(env: &Env, owner: Address, tick_lower: i32, tick_upper: i32) -> Self {
        Self {
            owner,
            tick_lower,
            tick_upper,
            liquidity: 0,
            fee_growth_inside_a: 0,
            fee_growth_inside_b: 0,
            fee_owed_a: 0,
            fee_owed_b: 0,
            reward_growths_inside: Vec::new(env),
            rewards_owed: Vec::new(env),
            points_growth_inside: 0,
            points_owed: 0,
            emission_growth_inside: 0,
            emission_owed: 0,
            is_staked: false,
        }
    }

    /// True when the position holds no liquidity and nothing is owed
    pub fn is_empty(&self) -> bool {
        if self.liquidity != 0 || self.fee_owed_a != 0 || self.fee_owed_b != 0 {
            return false;
        }
        if self.emission_owed != 0 {
            return false;
        }
        for owed in self.rewards_owed.iter() {
            if owed != 0 {
                return false;
            }
        }
        true
    }
}
