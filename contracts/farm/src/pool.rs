use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ContractError;

const POOL: Symbol = symbol_short!("POOL");

/// Upper bound on reward assets per farm; keeps every settlement loop small.
pub const MAX_REWARD_TOKENS: u32 = 8;

/// Aggregate state of the farm.
///
/// Every per-asset vector has exactly `reward_tokens.len()` entries, in the
/// same order as `reward_tokens`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub staked_token: Address,
    pub reward_tokens: Vec<Address>,
    /// Reward units emitted per second, shared by all stakers.
    pub reward_rates: Vec<i128>,
    /// Cumulative reward per staked unit, scaled by `rewards::PRECISION`.
    pub acc_reward_per_share: Vec<i128>,
    pub total_staked: i128,
    pub last_update: u64,
    /// Reward credited to the accumulator while the pool was non-empty.
    pub total_emitted: Vec<i128>,
    /// Reward transferred out through `claim`.
    pub total_claimed: Vec<i128>,
}

impl Pool {
    /// Build a fresh pool: zero rates, zero accumulators, nothing staked.
    pub fn new(
        env: &Env,
        staked_token: Address,
        reward_tokens: Vec<Address>,
        now: u64,
    ) -> Result<Self, ContractError> {
        let count = reward_tokens.len();
        if count == 0 || count > MAX_REWARD_TOKENS {
            return Err(ContractError::InvalidInput);
        }
        for i in 0..count {
            let token = reward_tokens.get(i).ok_or(ContractError::InvalidInput)?;
            if token == staked_token {
                return Err(ContractError::InvalidInput);
            }
            for j in (i + 1)..count {
                if reward_tokens.get(j) == Some(token.clone()) {
                    return Err(ContractError::InvalidInput);
                }
            }
        }

        Ok(Pool {
            staked_token,
            reward_tokens,
            reward_rates: zeroes(env, count),
            acc_reward_per_share: zeroes(env, count),
            total_staked: 0,
            last_update: now,
            total_emitted: zeroes(env, count),
            total_claimed: zeroes(env, count),
        })
    }

    pub fn reward_count(&self) -> u32 {
        self.reward_tokens.len()
    }

    pub fn reward_token(&self, index: u32) -> Result<Address, ContractError> {
        self.reward_tokens
            .get(index)
            .ok_or(ContractError::InvalidInput)
    }
}

/// A per-asset vector of `count` zeroes.
pub fn zeroes(env: &Env, count: u32) -> Vec<i128> {
    let mut values = Vec::new(env);
    for _ in 0..count {
        values.push_back(0i128);
    }
    values
}

/// Read entry `index` of a per-asset vector.
pub fn entry(values: &Vec<i128>, index: u32) -> Result<i128, ContractError> {
    values.get(index).ok_or(ContractError::InvalidInput)
}

pub fn has(env: &Env) -> bool {
    env.storage().instance().has(&POOL)
}

pub fn load(env: &Env) -> Result<Pool, ContractError> {
    env.storage()
        .instance()
        .get(&POOL)
        .ok_or(ContractError::NotInitialized)
}

pub fn save(env: &Env, pool: &Pool) {
    env.storage().instance().set(&POOL, pool);
}
