/// Relayer compensation attached to a signed intent.
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};

/// Which fungible balance of the signer pays the fuel.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(crate = "near_sdk::serde", rename_all = "snake_case")]
pub enum FuelKind {
    /// Freely transferable balance of the boostable token.
    Unlocked,
    /// Locked balance of the boostable token.
    Locked,
    /// Balance of the reward token.
    Reward,
}

/// Exactly one fuel source per intent.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
#[serde(crate = "near_sdk::serde", tag = "type", rename_all = "snake_case")]
pub enum Fuel {
    /// Debited from one of the signer's fungible balances.
    Fungible { kind: FuelKind, amount: U128 },
    /// Debited from the fuel meter built into the non-fungible token being
    /// traded.
    Intrinsic { amount: U128 },
}

impl Fuel {
    pub fn amount(&self) -> u128 {
        match self {
            Fuel::Fungible { amount, .. } | Fuel::Intrinsic { amount } => amount.0,
        }
    }

    pub fn debits_fungible_balance(&self) -> bool {
        matches!(self, Fuel::Fungible { .. })
    }
}
