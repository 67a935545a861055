//! Circuit breaker for the reward-accounting entry points.
//!
//! While paused, `stake`, `unstake` and `claim` revert. `emergency_withdraw`
//! is never gated.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::{events, ownership, ContractError};

const PAUSED: Symbol = symbol_short!("PAUSED");

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&PAUSED).unwrap_or(false)
}

pub fn require_not_paused(env: &Env) -> Result<(), ContractError> {
    if is_paused(env) {
        return Err(ContractError::Paused);
    }
    Ok(())
}

pub fn set_paused(env: &Env, caller: &Address, paused: bool) -> Result<(), ContractError> {
    ownership::require_owner(env, caller)?;
    if is_paused(env) == paused {
        return Ok(());
    }
    env.storage().instance().set(&PAUSED, &paused);

    if paused {
        events::publish_paused(env, caller.clone());
    } else {
        events::publish_unpaused(env, caller.clone());
    }
    Ok(())
}
