/// Implements the currency kinds that can be traded on the exchange.
use std::fmt;

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::AccountId;
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[cfg(test)]
use proptest_derive::Arbitrary;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[serde(crate = "near_sdk::serde", rename_all = "snake_case")]
#[cfg_attr(test, derive(Arbitrary))]
#[repr(u8)]
pub enum CurrencyKind {
    /// The chain's native coin. Paid by attaching it to the call.
    Native,
    /// Plain fungible token.
    Fungible,
    /// Fungible token with fuel support. Can pay relayers out of the signer's
    /// balance.
    BoostableFungible,
    /// One-of-a-kind token. The order value of a non-fungible leg is the token
    /// id.
    NonFungible,
}

impl CurrencyKind {
    pub fn is_fungible(&self) -> bool {
        !matches!(self, CurrencyKind::NonFungible)
    }

    pub fn is_native(&self) -> bool {
        matches!(self, CurrencyKind::Native)
    }
}

impl fmt::Display for CurrencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Fungible => write!(f, "fungible"),
            Self::BoostableFungible => write!(f, "boostable_fungible"),
            Self::NonFungible => write!(f, "non_fungible"),
        }
    }
}

/// One leg of a trade: a token contract and how to treat it.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
#[serde(crate = "near_sdk::serde")]
pub struct Currency {
    pub contract: AccountId,
    pub kind: CurrencyKind,
}

impl Currency {
    pub fn new(contract: AccountId, kind: CurrencyKind) -> Self {
        Self { contract, kind }
    }

    pub fn key(&self) -> String {
        format!("{}:{}", self.kind, self.contract)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::convert::TryFrom;

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_kind_u8_round_trip(kind: CurrencyKind) {
            let raw: u8 = kind.into();
            prop_assert_eq!(CurrencyKind::try_from(raw).unwrap(), kind);
        }
    }

    #[test]
    fn test_only_non_fungible_is_not_fungible() {
        assert!(CurrencyKind::Native.is_fungible());
        assert!(CurrencyKind::Fungible.is_fungible());
        assert!(CurrencyKind::BoostableFungible.is_fungible());
        assert!(!CurrencyKind::NonFungible.is_fungible());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(CurrencyKind::try_from(4u8).is_err());
    }

    #[test]
    fn test_key() {
        let c = Currency::new(
            AccountId::new_unchecked("usdc.near".to_string()),
            CurrencyKind::Fungible,
        );
        assert_eq!(c.key(), "fungible:usdc.near");
    }
}
