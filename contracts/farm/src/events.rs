#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Vec};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the farm is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub staked_token: Address,
    pub reward_tokens: Vec<Address>,
    pub timestamp: u64,
}

/// Fired when a participant deposits principal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub participant: Address,
    pub amount: i128,
    pub total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a participant withdraws principal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakedEvent {
    pub participant: Address,
    pub amount: i128,
    pub total_staked: i128,
    pub timestamp: u64,
}

/// Fired when reward is paid out; `amounts` follows the reward-token order.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimedEvent {
    pub participant: Address,
    pub amounts: Vec<i128>,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateUpdatedEvent {
    pub index: u32,
    pub new_rate: i128,
    pub timestamp: u64,
}

/// Fired when principal leaves through the emergency path.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawnEvent {
    pub participant: Address,
    pub amount: i128,
    pub forfeited: Vec<i128>,
    pub total_staked: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsFundedEvent {
    pub funder: Address,
    pub index: u32,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseChangedEvent {
    pub caller: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferCancelledEvent {
    pub owner: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    staked_token: Address,
    reward_tokens: Vec<Address>,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            staked_token,
            reward_tokens,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, participant: Address, amount: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), participant.clone()),
        StakedEvent {
            participant,
            amount,
            total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unstaked(env: &Env, participant: Address, amount: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("UNSTAKED"), participant.clone()),
        UnstakedEvent {
            participant,
            amount,
            total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_claimed(env: &Env, participant: Address, amounts: Vec<i128>) {
    env.events().publish(
        (symbol_short!("CLAIMED"), participant.clone()),
        ClaimedEvent {
            participant,
            amounts,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_rate_updated(env: &Env, index: u32, new_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE_UPD"), index),
        RewardRateUpdatedEvent {
            index,
            new_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdrawn(
    env: &Env,
    participant: Address,
    amount: i128,
    forfeited: Vec<i128>,
    total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), participant.clone()),
        EmergencyWithdrawnEvent {
            participant,
            amount,
            forfeited,
            total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_funded(env: &Env, funder: Address, index: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), index),
        RewardsFundedEvent {
            funder,
            index,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_paused(env: &Env, caller: Address) {
    env.events().publish(
        (symbol_short!("PAUSED"),),
        PauseChangedEvent {
            caller,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unpaused(env: &Env, caller: Address) {
    env.events().publish(
        (symbol_short!("UNPAUSED"),),
        PauseChangedEvent {
            caller,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerTransferProposedEvent {
            current_owner,
            proposed_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerTransferAcceptedEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_cancelled(env: &Env, owner: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), owner.clone()),
        OwnerTransferCancelledEvent {
            owner,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}
