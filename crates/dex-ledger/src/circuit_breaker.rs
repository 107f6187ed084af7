/// One-way emergency switch.
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::AccountId;

use dubiex_sdk_dex_errors::{DexError, Result};
use dubiex_sdk_macros::*;

use crate::SupplyOracle;

/// Once active, new trades are refused and any account may cancel any
/// order. There is no way back to inactive.
#[derive(Clone, Copy, Debug, Default, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct CircuitBreaker {
    active: bool,
}

impl CircuitBreaker {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Gate for create, update and fill paths.
    pub fn ensure_inactive(&self) -> Result<()> {
        ensure!(!self.active, DexError::CircuitBreakerActive);
        Ok(())
    }

    /// Trip the breaker if any monitored supply reached `threshold`.
    pub fn activate<O: SupplyOracle>(
        &mut self,
        oracle: &O,
        monitored: &[AccountId],
        threshold: u128,
    ) -> Result<()> {
        ensure!(!self.active, DexError::CircuitBreakerAlreadyOn);

        let tripped = monitored
            .iter()
            .any(|token| oracle.total_supply(token) >= threshold);
        ensure!(tripped, DexError::SupplyBelowThreshold);

        self.active = true;
        debug_log!("circuit breaker activated");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_activate_below_threshold() {
        let oracle = FixedSupplyOracle::default();
        let mut breaker = CircuitBreaker::default();
        assert_eq!(
            breaker.activate(&oracle, &monitored(), 100),
            Err(DexError::SupplyBelowThreshold)
        );
        assert!(!breaker.is_active());
        assert!(breaker.ensure_inactive().is_ok());
    }

    #[test]
    fn test_activate_at_threshold_on_either_token() {
        for token in monitored().iter() {
            let mut oracle = FixedSupplyOracle::default();
            oracle.set(token, 100);
            let mut breaker = CircuitBreaker::default();
            breaker.activate(&oracle, &monitored(), 100).unwrap();
            assert!(breaker.is_active());
            assert_eq!(breaker.ensure_inactive(), Err(DexError::CircuitBreakerActive));
        }
    }

    #[test]
    fn test_activate_twice_fails() {
        let mut oracle = FixedSupplyOracle::default();
        oracle.set(&monitored()[0], 1_000);
        let mut breaker = CircuitBreaker::default();
        breaker.activate(&oracle, &monitored(), 100).unwrap();
        assert_eq!(
            breaker.activate(&oracle, &monitored(), 100),
            Err(DexError::CircuitBreakerAlreadyOn)
        );
        assert!(breaker.is_active());
    }
}
