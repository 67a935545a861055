//! Reward accrual engine.
//!
//! Rewards are tracked with the accumulator scheme: each reward asset keeps a
//! running "reward per staked unit" value, advanced every time the pool is
//! touched:
//!
//! ```text
//! Δacc = rate × elapsed × PRECISION / total_staked
//! ```
//!
//! A participant's share of any window is then `amount × Δacc / PRECISION`,
//! which the stake ledger settles on every interaction.

use crate::pool::{entry, Pool};
use crate::ContractError;

/// Fixed-point scaling factor for accumulator values (12 decimal places).
///
/// Each refresh floors `rate × elapsed × PRECISION / total_staked`, so a
/// window loses less than `total_staked / PRECISION` units of emission to
/// truncation. Below `PRECISION` staked base units that is under one unit per
/// refresh. Once `total_staked` exceeds `rate × elapsed × PRECISION` the whole
/// window's emission is lost, although it still counts in `total_emitted`.
pub const PRECISION: i128 = 1_000_000_000_000;

/// A non-negative fixed-point number with `PRECISION` fractional scale.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Scaled(i128);

impl Scaled {
    pub const ZERO: Scaled = Scaled(0);

    pub const fn from_raw(raw: i128) -> Self {
        Scaled(raw)
    }

    pub const fn raw(self) -> i128 {
        self.0
    }

    /// `reward / total` as a scaled value, floored.
    pub fn per_share(reward: i128, total: i128) -> Result<Self, ContractError> {
        if total <= 0 || reward < 0 {
            return Err(ContractError::InvalidInput);
        }
        reward
            .checked_mul(PRECISION)
            .map(|scaled| Scaled(scaled / total))
            .ok_or(ContractError::ArithmeticOverflow)
    }

    pub fn checked_add(self, other: Scaled) -> Result<Self, ContractError> {
        self.0
            .checked_add(other.0)
            .map(Scaled)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    /// `amount × self`, floored to whole units.
    ///
    /// Split into integer and fractional parts so `amount × raw` never has to
    /// fit in an `i128` on its own.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn of(self, amount: i128) -> Result<i128, ContractError> {
        let whole = self.0 / PRECISION;
        let frac = self.0 % PRECISION;
        let whole_part = amount
            .checked_mul(whole)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let frac_part = amount
            .checked_mul(frac)
            .ok_or(ContractError::ArithmeticOverflow)?
            / PRECISION;
        whole_part
            .checked_add(frac_part)
            .ok_or(ContractError::ArithmeticOverflow)
    }
}

/// Accumulator value of reward asset `index`.
pub fn acc_at(pool: &Pool, index: u32) -> Result<Scaled, ContractError> {
    entry(&pool.acc_reward_per_share, index).map(Scaled::from_raw)
}

/// Return `pool` advanced to `now` without touching the original.
pub fn accrue(pool: &Pool, now: u64) -> Result<Pool, ContractError> {
    if now < pool.last_update {
        return Err(ContractError::InvalidTime);
    }
    let elapsed = now - pool.last_update;
    if elapsed == 0 {
        return Ok(pool.clone());
    }

    let mut next = pool.clone();
    next.last_update = now;

    // Nobody to credit: the window's emission is simply not distributed.
    if pool.total_staked <= 0 {
        return Ok(next);
    }

    for i in 0..pool.reward_count() {
        let rate = entry(&pool.reward_rates, i)?;
        if rate == 0 {
            continue;
        }
        let emitted = rate
            .checked_mul(i128::from(elapsed))
            .ok_or(ContractError::ArithmeticOverflow)?;
        let acc = acc_at(pool, i)?.checked_add(Scaled::per_share(emitted, pool.total_staked)?)?;
        next.acc_reward_per_share.set(i, acc.raw());

        let total_emitted = entry(&pool.total_emitted, i)?
            .checked_add(emitted)
            .ok_or(ContractError::ArithmeticOverflow)?;
        next.total_emitted.set(i, total_emitted);
    }

    Ok(next)
}

/// Bring every accumulator of `pool` up to `now`.
///
/// Calling twice with the same `now` is a no-op the second time. On error the
/// pool is left untouched.
pub fn update_accumulators(pool: &mut Pool, now: u64) -> Result<(), ContractError> {
    *pool = accrue(pool, now)?;
    Ok(())
}

/// Best-effort view of `pool` at `now`; falls back to the stored state when
/// the accrual cannot be computed.
pub fn project(pool: &Pool, now: u64) -> Pool {
    accrue(pool, now).unwrap_or_else(|_| pool.clone())
}
