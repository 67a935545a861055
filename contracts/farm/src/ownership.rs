use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::{events, ContractError};

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
}

pub fn get_owner(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&OWNER)
        .ok_or(ContractError::NotInitialized)
}

pub fn get_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OWNER)
}

/// Guard: revert unless `caller` is the stored owner.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
    if *caller != get_owner(env)? {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// First step of an ownership transfer. Replaces any earlier proposal.
pub fn propose(env: &Env, current: &Address, proposed: &Address) -> Result<(), ContractError> {
    require_owner(env, current)?;
    env.storage().instance().set(&PENDING_OWNER, proposed);
    events::publish_owner_transfer_proposed(env, current.clone(), proposed.clone());
    Ok(())
}

/// Second step: the proposed address takes over.
pub fn accept(env: &Env, proposed: &Address) -> Result<(), ContractError> {
    let pending = get_pending_owner(env).ok_or(ContractError::InvalidInput)?;
    if *proposed != pending {
        return Err(ContractError::Unauthorized);
    }
    let previous = get_owner(env)?;

    set_owner(env, proposed);
    env.storage().instance().remove(&PENDING_OWNER);

    events::publish_owner_transfer_accepted(env, previous, proposed.clone());
    Ok(())
}

pub fn cancel(env: &Env, current: &Address) -> Result<(), ContractError> {
    require_owner(env, current)?;
    let pending = get_pending_owner(env).ok_or(ContractError::InvalidInput)?;
    env.storage().instance().remove(&PENDING_OWNER);
    events::publish_owner_transfer_cancelled(env, current.clone(), pending);
    Ok(())
}
