/// Interfaces of the systems the exchange settles through. Token contracts,
/// signature schemes and supply feeds live outside this crate.
use near_sdk::AccountId;

use dubiex_sdk_dex_errors::Result;
use dubiex_sdk_dex_types::*;

/// Classifies currencies and moves balances on behalf of the exchange.
///
/// Implementations report refusals with
/// [DexError::SettlementFailure](dubiex_sdk_dex_errors::DexError::SettlementFailure).
/// For non-fungible currencies `amount` is the token id.
pub trait CurrencyRegistry {
    /// Whether the contract can be traded as the given kind.
    fn is_valid(&self, currency: &Currency) -> bool;

    /// Move `amount` from `owner` into the exchange's escrow. Never called
    /// for the native coin, which arrives attached to the call.
    fn deposit(&mut self, owner: &AccountId, currency: &Currency, amount: u128) -> Result<()>;

    /// Pay `amount` out of the exchange's escrow to `recipient`.
    fn withdraw(&mut self, recipient: &AccountId, currency: &Currency, amount: u128)
        -> Result<()>;

    /// Move `amount` directly between two accounts. Never called for the
    /// native coin.
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        currency: &Currency,
        amount: u128,
    ) -> Result<()>;

    /// Charge `fuel` to `signer` and credit it to `relayer`. `principal` is the
    /// currency and value the signer trades in the same intent; intrinsic
    /// fuel is drawn from that token.
    fn debit_fuel(
        &mut self,
        signer: &AccountId,
        relayer: &AccountId,
        fuel: &Fuel,
        principal: &Currency,
        principal_value: u128,
    ) -> Result<()>;

    /// Return unspent attached native coin to `recipient`.
    fn refund_native(&mut self, recipient: &AccountId, amount: u128) -> Result<()>;
}

/// Recovers the account that signed a digest.
pub trait SignatureRecovery {
    fn recover(&self, digest: &[u8; 32], signature: &[u8]) -> Option<AccountId>;
}

/// Reports token supplies watched by the circuit breaker.
pub trait SupplyOracle {
    fn total_supply(&self, token: &AccountId) -> u128;
}
