/// Off-chain signed order intents submitted by relayers.
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::{Base64VecU8, U128};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::AccountId;
use sha3::{Digest, Keccak256};

use crate::*;

/// Common surface of the intents a relayer can forward.
pub trait Intent: BorshSerialize {
    /// Domain separator mixed into the digest so that a signature over one
    /// intent type can never be replayed as another.
    const DOMAIN: &'static [u8];

    /// The account that must have signed the intent.
    fn signer(&self) -> &AccountId;

    fn nonce(&self) -> u64;

    fn fuel(&self) -> Option<&Fuel>;

    /// keccak256(domain || exchange_id || borsh(intent))
    ///
    /// `exchange_id` names the deployment the intent is meant for, so a
    /// signature collected for one exchange is worthless on any other.
    fn digest(&self, exchange_id: &AccountId) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(Self::DOMAIN);
        hasher.update(exchange_id.as_bytes());
        hasher.update(
            self.try_to_vec()
                .unwrap_or_else(|_| near_sdk::env::panic_str("unserializable intent")),
        );
        hasher.finalize().into()
    }
}

#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct CreateOrderIntent {
    pub maker: AccountId,
    pub pair: OrderPair,
    pub maker_value: U128,
    pub taker_value: U128,
    pub ancestor_order_id: OrderId,
    pub nonce: u64,
    pub fuel: Option<Fuel>,
}

#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct FillOrderIntent {
    pub taker: AccountId,
    pub maker: AccountId,
    pub order_id: OrderId,
    pub taker_fill: U128,
    /// Highest order ratio the taker accepts, scaled by [RATIO_SCALE].
    pub max_ratio: U128,
    pub nonce: u64,
    pub fuel: Option<Fuel>,
}

#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct CancelOrderIntent {
    pub maker: AccountId,
    pub order_id: OrderId,
    pub nonce: u64,
    pub fuel: Option<Fuel>,
}

impl Intent for CreateOrderIntent {
    const DOMAIN: &'static [u8] = b"dubiex:create_order";

    fn signer(&self) -> &AccountId {
        &self.maker
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn fuel(&self) -> Option<&Fuel> {
        self.fuel.as_ref()
    }
}

impl Intent for FillOrderIntent {
    const DOMAIN: &'static [u8] = b"dubiex:fill_order";

    fn signer(&self) -> &AccountId {
        &self.taker
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn fuel(&self) -> Option<&Fuel> {
        self.fuel.as_ref()
    }
}

impl Intent for CancelOrderIntent {
    const DOMAIN: &'static [u8] = b"dubiex:cancel_order";

    fn signer(&self) -> &AccountId {
        &self.maker
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn fuel(&self) -> Option<&Fuel> {
        self.fuel.as_ref()
    }
}

/// An intent together with its detached signature.
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct Signed<T> {
    pub intent: T,
    pub signature: Base64VecU8,
}

impl<T: Intent> Signed<T> {
    pub fn new(intent: T, signature: Vec<u8>) -> Self {
        Self {
            intent,
            signature: Base64VecU8(signature),
        }
    }
}
