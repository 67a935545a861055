#![no_std]

pub mod errors;
pub mod events;
pub mod ledger;
pub mod ownership;
pub mod pause;
pub mod pool;
pub mod rewards;

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};

pub use errors::ContractError;
pub use ledger::Position;
pub use pool::{Pool, MAX_REWARD_TOKENS};
pub use rewards::PRECISION;

// ── Contract ─────────────────────────────────────────────────────────────────

/// Single-pool farm: stake one token, earn several reward tokens.
#[contract]
pub struct FarmContract;

#[contractimpl]
impl FarmContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the farm.
    ///
    /// * `owner`         – may change reward rates, pause, and hand over ownership.
    /// * `staked_token`  – token participants stake.
    /// * `reward_tokens` – tokens paid out as rewards; their count is fixed here.
    ///
    /// All reward rates start at zero.
    pub fn initialize(
        env: Env,
        owner: Address,
        staked_token: Address,
        reward_tokens: Vec<Address>,
    ) -> Result<(), ContractError> {
        if pool::has(&env) {
            return Err(ContractError::AlreadyInitialized);
        }

        let pool = Pool::new(
            &env,
            staked_token.clone(),
            reward_tokens.clone(),
            env.ledger().timestamp(),
        )?;
        pool::save(&env, &pool);
        ownership::set_owner(&env, &owner);

        events::publish_initialized(&env, owner, staked_token, reward_tokens);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` of the staked token.
    ///
    /// The farm pulls the tokens with `transfer_from`, so `participant` must
    /// have approved the farm for at least `amount` beforehand.
    pub fn stake(env: Env, participant: Address, amount: i128) -> Result<(), ContractError> {
        let mut pool = Self::synced_pool(&env)?;
        participant.require_auth();
        pause::require_not_paused(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut position = ledger::load(&env, &participant, pool.reward_count());
        ledger::settle(&mut position, &pool)?;
        ledger::adjust_amount(&mut position, amount)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        pool::save(&env, &pool);
        ledger::store(&env, &participant, &position);

        Self::pull(&env, &pool.staked_token, &participant, amount)?;

        events::publish_staked(&env, participant, amount, pool.total_staked);

        Ok(())
    }

    /// Withdraw `amount` of principal and pay out all pending reward.
    ///
    /// Reward is settled at the old amount before the principal shrinks.
    /// Returns the reward paid, one entry per reward token.
    pub fn unstake(
        env: Env,
        participant: Address,
        amount: i128,
    ) -> Result<Vec<i128>, ContractError> {
        let mut pool = Self::synced_pool(&env)?;
        participant.require_auth();
        pause::require_not_paused(&env)?;

        let mut position = ledger::load(&env, &participant, pool.reward_count());
        if amount <= 0 || amount > position.amount {
            return Err(ContractError::InsufficientBalance);
        }

        ledger::settle(&mut position, &pool)?;
        ledger::adjust_amount(&mut position, -amount)?;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let paid = Self::take_pending(&env, &mut pool, &mut position)?;

        pool::save(&env, &pool);
        ledger::store(&env, &participant, &position);

        Self::push(&env, &pool.staked_token, &participant, amount)?;
        Self::pay_rewards(&env, &pool, &participant, &paid)?;

        events::publish_unstaked(&env, participant.clone(), amount, pool.total_staked);
        if paid.iter().any(|p| p > 0) {
            events::publish_claimed(&env, participant, paid.clone());
        }

        Ok(paid)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out every pending reward, one entry per reward token.
    ///
    /// With nothing pending this is a no-op that returns zeros.
    pub fn claim(env: Env, participant: Address) -> Result<Vec<i128>, ContractError> {
        Self::claim_pending(&env, participant, false)
    }

    /// Same as `claim`, but reverts with `NothingToClaim` when nothing is
    /// pending.
    pub fn claim_strict(env: Env, participant: Address) -> Result<Vec<i128>, ContractError> {
        Self::claim_pending(&env, participant, true)
    }

    /// Return all principal immediately and forfeit pending reward.
    ///
    /// Not affected by `pause`. Accrual is brought up to date when possible
    /// but never blocks the withdrawal.
    pub fn emergency_withdraw(env: Env, participant: Address) -> Result<i128, ContractError> {
        let stored = pool::load(&env)?;
        participant.require_auth();

        let mut pool = match rewards::accrue(&stored, env.ledger().timestamp()) {
            Ok(pool) => pool,
            Err(e) => {
                let code = e as u32;
                log!(&env, "emergency withdraw without accrual", code);
                stored
            }
        };

        let position = ledger::load(&env, &participant, pool.reward_count());
        if position.amount <= 0 {
            return Err(ContractError::InsufficientBalance);
        }
        let amount = position.amount;
        let forfeited =
            ledger::pending(&position, &pool).unwrap_or_else(|_| position.pending.clone());

        pool.total_staked = pool.total_staked.saturating_sub(amount);
        pool::save(&env, &pool);
        ledger::store(
            &env,
            &participant,
            &Position::empty(&env, pool.reward_count()),
        );

        Self::push(&env, &pool.staked_token, &participant, amount)?;

        events::publish_emergency_withdrawn(&env, participant, amount, forfeited, pool.total_staked);

        Ok(amount)
    }

    /// Top up the farm's balance of reward token `index`.
    ///
    /// Funding does not change emission; rates are set separately by the owner.
    pub fn fund_rewards(
        env: Env,
        funder: Address,
        index: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        let pool = pool::load(&env)?;
        funder.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let reward_token = pool.reward_token(index)?;

        let farm = env.current_contract_address();
        match token::Client::new(&env, &reward_token).try_transfer(&funder, &farm, &amount) {
            Ok(Ok(())) => {}
            _ => return Err(ContractError::TransferFailed),
        }

        events::publish_rewards_funded(&env, funder, index, amount);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        pool::has(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        ownership::get_owner(&env)
    }

    /// Pool state as of the last accrual.
    pub fn get_pool(env: Env) -> Result<Pool, ContractError> {
        pool::load(&env)
    }

    /// Pool state projected to the current ledger time.
    pub fn get_pool_at_now(env: Env) -> Result<Pool, ContractError> {
        Ok(rewards::project(&pool::load(&env)?, env.ledger().timestamp()))
    }

    /// Stored position; pending reward reflects the last settlement only.
    pub fn get_position(env: Env, participant: Address) -> Result<Position, ContractError> {
        let pool = pool::load(&env)?;
        Ok(ledger::load(&env, &participant, pool.reward_count()))
    }

    pub fn get_staked(env: Env, participant: Address) -> i128 {
        Self::get_position(env, participant)
            .map(|p| p.amount)
            .unwrap_or(0)
    }

    pub fn get_total_staked(env: Env) -> i128 {
        pool::load(&env).map(|p| p.total_staked).unwrap_or(0)
    }

    pub fn get_reward_tokens(env: Env) -> Result<Vec<Address>, ContractError> {
        pool::load(&env).map(|p| p.reward_tokens)
    }

    pub fn get_reward_rates(env: Env) -> Result<Vec<i128>, ContractError> {
        pool::load(&env).map(|p| p.reward_rates)
    }

    pub fn reward_token_count(env: Env) -> u32 {
        pool::load(&env).map(|p| p.reward_count()).unwrap_or(0)
    }

    /// Real-time pending reward per reward token, without mutating state.
    pub fn pending_rewards(env: Env, participant: Address) -> Result<Vec<i128>, ContractError> {
        let pool = rewards::project(&pool::load(&env)?, env.ledger().timestamp());
        let position = ledger::load(&env, &participant, pool.reward_count());
        ledger::pending(&position, &pool)
    }

    pub fn is_paused(env: Env) -> bool {
        pause::is_paused(&env)
    }

    // ── Owner functions ──────────────────────────────────────────────────────

    /// Change the emission rate of reward token `index`.
    ///
    /// Accrual up to now is closed out at the old rate first.
    pub fn set_reward_rate(
        env: Env,
        caller: Address,
        index: u32,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        let mut pool = pool::load(&env)?;
        caller.require_auth();
        ownership::require_owner(&env, &caller)?;

        if index >= pool.reward_count() || new_rate < 0 {
            return Err(ContractError::InvalidInput);
        }

        rewards::update_accumulators(&mut pool, env.ledger().timestamp())?;
        pool.reward_rates.set(index, new_rate);
        pool::save(&env, &pool);

        events::publish_reward_rate_updated(&env, index, new_rate);

        Ok(())
    }

    pub fn pause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        pause::set_paused(&env, &caller, true)
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        pause::set_paused(&env, &caller, false)
    }

    // ── Ownership transfer (two-step) ───────────────────────────────────────

    /// Propose a new owner. The proposed address must call `accept_owner`.
    pub fn propose_owner(
        env: Env,
        current_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        ownership::propose(&env, &current_owner, &new_owner)
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();
        ownership::accept(&env, &new_owner)
    }

    pub fn cancel_owner_transfer(env: Env, current_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        ownership::cancel(&env, &current_owner)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        ownership::get_pending_owner(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !pool::has(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Load the pool with its accumulators advanced to the current ledger time.
    fn synced_pool(env: &Env) -> Result<Pool, ContractError> {
        let mut pool = pool::load(env)?;
        rewards::update_accumulators(&mut pool, env.ledger().timestamp())?;
        Ok(pool)
    }

    fn claim_pending(
        env: &Env,
        participant: Address,
        strict: bool,
    ) -> Result<Vec<i128>, ContractError> {
        let mut pool = Self::synced_pool(env)?;
        participant.require_auth();
        pause::require_not_paused(env)?;

        let mut position = ledger::load(env, &participant, pool.reward_count());
        ledger::settle(&mut position, &pool)?;

        if !position.has_pending() {
            if strict {
                return Err(ContractError::NothingToClaim);
            }
            log!(env, "claim with nothing pending", participant);
            pool::save(env, &pool);
            return Ok(position.pending);
        }

        let amounts = Self::take_pending(env, &mut pool, &mut position)?;

        pool::save(env, &pool);
        ledger::store(env, &participant, &position);

        Self::pay_rewards(env, &pool, &participant, &amounts)?;

        events::publish_claimed(env, participant, amounts.clone());

        Ok(amounts)
    }

    /// Zero the position's pending reward and book it as claimed.
    ///
    /// Returns the amounts that must be transferred once state is persisted.
    fn take_pending(
        env: &Env,
        pool: &mut Pool,
        position: &mut Position,
    ) -> Result<Vec<i128>, ContractError> {
        let amounts = position.pending.clone();
        for i in 0..pool.reward_count() {
            let paid = pool::entry(&amounts, i)?;
            let claimed = pool::entry(&pool.total_claimed, i)?
                .checked_add(paid)
                .ok_or(ContractError::ArithmeticOverflow)?;
            pool.total_claimed.set(i, claimed);
        }
        position.pending = pool::zeroes(env, pool.reward_count());
        Ok(amounts)
    }

    fn pay_rewards(
        env: &Env,
        pool: &Pool,
        participant: &Address,
        amounts: &Vec<i128>,
    ) -> Result<(), ContractError> {
        for i in 0..pool.reward_count() {
            let paid = pool::entry(amounts, i)?;
            if paid > 0 {
                Self::push(env, &pool.reward_token(i)?, participant, paid)?;
            }
        }
        Ok(())
    }

    /// Pull `amount` from `from` using the allowance granted to the farm.
    fn pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), ContractError> {
        let farm = env.current_contract_address();
        match token::Client::new(env, token).try_transfer_from(&farm, from, &farm, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }

    fn push(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
        let farm = env.current_contract_address();
        match token::Client::new(env, token).try_transfer(&farm, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_ownership;
