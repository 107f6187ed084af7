/// Implements order pairs and their content hashes.
use std::convert::TryFrom;
use std::fmt::Display;
use std::ops::Deref;

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use near_sdk::{bs58, AccountId};
use sha3::{Digest, Keccak256};

use crate::*;

/// Compact integer standing in for an [OrderPair] in orders and logs. Zero
/// means unknown.
pub type PairAlias = u32;

/// Pair hashes are keccak256 hashes of the borsh-serialized pair.
#[derive(
    Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, BorshDeserialize, BorshSerialize,
)]
pub struct PairHash(pub [u8; 32]);

impl PairHash {
    pub fn new_unchecked(data: &[u8]) -> Self {
        let mut buf: [u8; 32] = Default::default();
        buf.copy_from_slice(&data[..32]);
        Self(buf)
    }
}

impl TryFrom<&[u8]> for PairHash {
    type Error = ();

    fn try_from(d: &[u8]) -> Result<Self, Self::Error> {
        if d.len() != 32 {
            Err(())
        } else {
            Ok(PairHash::new_unchecked(d))
        }
    }
}

impl Display for PairHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PairHash<{}>", bs58::encode(&self.0).into_string())
    }
}

impl Deref for PairHash {
    type Target = [u8; 32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for PairHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&bs58::encode(&self.0).into_string())
    }
}

impl<'de> Deserialize<'de> for PairHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let bytes = bs58::decode(s.as_str())
            .into_vec()
            .map_err(de::Error::custom)?;
        PairHash::try_from(bytes.as_slice())
            .map_err(|_| de::Error::custom("pair hash must be 32 bytes"))
    }
}

/// The two currencies an order trades. The maker gives the maker currency and
/// receives the taker currency.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
#[serde(crate = "near_sdk::serde")]
pub struct OrderPair {
    pub maker_contract: AccountId,
    pub taker_contract: AccountId,
    pub maker_kind: CurrencyKind,
    pub taker_kind: CurrencyKind,
}

impl OrderPair {
    pub fn new(maker: Currency, taker: Currency) -> Self {
        Self {
            maker_contract: maker.contract,
            taker_contract: taker.contract,
            maker_kind: maker.kind,
            taker_kind: taker.kind,
        }
    }

    pub fn maker_currency(&self) -> Currency {
        Currency::new(self.maker_contract.clone(), self.maker_kind)
    }

    pub fn taker_currency(&self) -> Currency {
        Currency::new(self.taker_contract.clone(), self.taker_kind)
    }

    /// True when neither side is one-of-a-kind, ie the order can be
    /// partially filled and re-priced.
    pub fn is_fungible(&self) -> bool {
        self.maker_kind.is_fungible() && self.taker_kind.is_fungible()
    }

    pub fn hash(&self) -> PairHash {
        let encoded = self
            .try_to_vec()
            .unwrap_or_else(|_| near_sdk::env::panic_str("unserializable order pair"));
        PairHash::new_unchecked(&Keccak256::digest(&encoded))
    }
}
