extern crate std;

use soroban_sdk::{testutils::Address as _, vec, Address, Env};

use crate::{ContractError, FarmContract, FarmContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, FarmContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let staked_token = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let reward_token = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let contract_id = env.register(FarmContract, ());
    let client = FarmContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(
        &owner,
        &staked_token.address(),
        &vec![&env, reward_token.address()],
    );

    (env, client, owner)
}

// ── Two-step transfer ────────────────────────────────────────────────────────

#[test]
fn test_propose_and_accept_owner() {
    let (env, client, owner) = setup();
    let next = Address::generate(&env);

    client.propose_owner(&owner, &next);
    assert_eq!(client.get_pending_owner(), Some(next.clone()));
    // Nothing changes until the proposal is accepted.
    assert_eq!(client.get_owner(), owner);

    client.accept_owner(&next);
    assert_eq!(client.get_owner(), next);
    assert_eq!(client.get_pending_owner(), None);
}

#[test]
fn test_new_owner_controls_rates() {
    let (env, client, owner) = setup();
    let next = Address::generate(&env);

    client.propose_owner(&owner, &next);
    client.accept_owner(&next);

    client.set_reward_rate(&next, &0, &42);
    assert_eq!(client.get_reward_rates(), vec![&env, 42i128]);

    let result = client.try_set_reward_rate(&owner, &0, &1);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_accept_by_wrong_address_fails() {
    let (env, client, owner) = setup();
    let next = Address::generate(&env);
    let intruder = Address::generate(&env);

    client.propose_owner(&owner, &next);

    let result = client.try_accept_owner(&intruder);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_owner(), owner);
}

#[test]
fn test_accept_without_proposal_fails() {
    let (env, client, _owner) = setup();
    let next = Address::generate(&env);

    let result = client.try_accept_owner(&next);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}

#[test]
fn test_non_owner_cannot_propose() {
    let (env, client, _owner) = setup();
    let intruder = Address::generate(&env);

    let result = client.try_propose_owner(&intruder, &intruder);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_pending_owner(), None);
}

#[test]
fn test_cancel_owner_transfer() {
    let (env, client, owner) = setup();
    let next = Address::generate(&env);

    client.propose_owner(&owner, &next);
    client.cancel_owner_transfer(&owner);
    assert_eq!(client.get_pending_owner(), None);

    let result = client.try_accept_owner(&next);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}

#[test]
fn test_cancel_without_proposal_fails() {
    let (_env, client, owner) = setup();

    let result = client.try_cancel_owner_transfer(&owner);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}

#[test]
fn test_non_owner_cannot_cancel() {
    let (env, client, owner) = setup();
    let next = Address::generate(&env);
    client.propose_owner(&owner, &next);

    let result = client.try_cancel_owner_transfer(&next);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_pending_owner(), Some(next));
}
