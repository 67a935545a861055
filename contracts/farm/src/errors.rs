/// Error codes returned by every farm entry point.
///
/// Codes are part of the contract ABI and must stay stable once deployed.
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Caller is not the farm owner.
    Unauthorized = 3,
    InvalidInput = 4,
    /// Requested principal exceeds the participant's position.
    InsufficientBalance = 5,
    /// Ledger timestamp is older than the pool's last accrual.
    InvalidTime = 6,
    /// The token contract rejected a transfer (allowance, balance, ...).
    TransferFailed = 7,
    ArithmeticOverflow = 8,
    Paused = 9,
    /// Only returned by `claim_strict`; `claim` treats this as a no-op.
    NothingToClaim = 10,
}
