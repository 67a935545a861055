//! Stake ledger: one `Position` per participant.
//!
//! `reward_debt[i]` is the value of accumulator `i` at the participant's last
//! settlement. Reward accrued since then is `amount × (acc − reward_debt)`,
//! floored, so each settlement can lose dust to the pool but never pays more
//! than the participant's exact share.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::pool::{entry, zeroes, Pool};
use crate::rewards::{acc_at, Scaled};
use crate::ContractError;

const POSITION: Symbol = symbol_short!("POS");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub amount: i128,
    /// Accumulator snapshot per reward asset, scaled like the accumulator.
    pub reward_debt: Vec<i128>,
    /// Settled reward not yet transferred, per reward asset.
    pub pending: Vec<i128>,
}

impl Position {
    pub fn empty(env: &Env, reward_count: u32) -> Self {
        Position {
            amount: 0,
            reward_debt: zeroes(env, reward_count),
            pending: zeroes(env, reward_count),
        }
    }

    /// No principal and nothing owed.
    pub fn is_empty(&self) -> bool {
        self.amount == 0 && self.pending.iter().all(|p| p == 0)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.iter().any(|p| p > 0)
    }
}

/// Credit everything accrued since the last settlement to `pending` and move
/// the snapshot to the current accumulator.
///
/// The pool must already be updated to the current time. Settling twice
/// against the same accumulators credits nothing the second time.
pub fn settle(position: &mut Position, pool: &Pool) -> Result<(), ContractError> {
    for i in 0..pool.reward_count() {
        let acc = acc_at(pool, i)?;
        let since = acc
            .raw()
            .checked_sub(entry(&position.reward_debt, i)?)
            .ok_or(ContractError::ArithmeticOverflow)?;
        // Accumulators only grow; a snapshot ahead of the pool is corrupt.
        if since < 0 {
            return Err(ContractError::ArithmeticOverflow);
        }
        let accrued = Scaled::from_raw(since).of(position.amount)?;
        let pending = entry(&position.pending, i)?
            .checked_add(accrued)
            .ok_or(ContractError::ArithmeticOverflow)?;
        position.pending.set(i, pending);
        position.reward_debt.set(i, acc.raw());
    }
    Ok(())
}

/// Apply `delta` to the principal.
///
/// Must follow `settle` in the same operation; otherwise the accrual since
/// the previous snapshot would be credited at the new amount.
pub fn adjust_amount(position: &mut Position, delta: i128) -> Result<(), ContractError> {
    let amount = position
        .amount
        .checked_add(delta)
        .ok_or(ContractError::ArithmeticOverflow)?;
    if amount < 0 {
        return Err(ContractError::InsufficientBalance);
    }
    position.amount = amount;
    Ok(())
}

/// Reward owed to `position` at `pool`'s accumulators, without mutating it.
pub fn pending(position: &Position, pool: &Pool) -> Result<Vec<i128>, ContractError> {
    let mut preview = position.clone();
    settle(&mut preview, pool)?;
    Ok(preview.pending)
}

// ── Storage ─────────────────────────────────────────────────────────────────

fn position_key(participant: &Address) -> (Symbol, Address) {
    (POSITION, participant.clone())
}

/// Load a participant's position; unknown participants read as empty.
pub fn load(env: &Env, participant: &Address, reward_count: u32) -> Position {
    let key = position_key(participant);
    match env.storage().persistent().get::<_, Position>(&key) {
        Some(position) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            position
        }
        None => Position::empty(env, reward_count),
    }
}

/// Persist a position, dropping the entry once it is empty.
pub fn store(env: &Env, participant: &Address, position: &Position) {
    let key = position_key(participant);
    if position.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
