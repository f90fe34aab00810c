use soroban_sdk::{contracttype, Address, Env, Vec};

/// A single reward stream settled over active liquidity
#[contracttype]
#[derive(Clone, Debug)]
pub struct Rewarder {
    /// Reward token
    pub token: Address,
    /// Emission rate, tokens per second, Q64.64
    pub emissions_per_second_x64: u128,
    /// Reward growth per unit of active liquidity (Q64.64, wrapping)
    pub growth_global_x64: u128,
}

/// Rewarder manager state: an append-only list of reward streams plus the
/// points stream
#[contracttype]
#[derive(Clone, Debug)]
pub struct RewarderState {
    pub rewarders: Vec<Rewarder>,
    /// Points growth per unit of active liquidity (Q64.64, wrapping)
    pub points_growth_global: u128,
    /// Last settlement timestamp
    pub last_updated: u64,
}

impl RewarderState {
    pub fn new(env: &Env, now: u64) -> Self {
        Self {
            rewarders: Vec::new(env),
            points_growth_global: 0,
            last_updated: now,
        }
    }

    /// Slot index of the rewarder for `token`, if registered
    pub fn rewarder_index(&self, token: &Address) -> Option<u32> {
        for (i, rewarder) in self.rewarders.iter().enumerate() {
            if rewarder.token == *token {
                return Some(i as u32);
            }
        }
        None
    }
}
