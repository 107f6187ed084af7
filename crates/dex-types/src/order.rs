use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::AccountId;

use crate::*;

/// Per-maker sequential order id. Ids start at 1; 0 means "no order".
pub type OrderId = u32;

/// Location of an order in the flat order table.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct OrderKey {
    pub maker: AccountId,
    pub id: OrderId,
}

impl OrderKey {
    pub fn new(maker: &AccountId, id: OrderId) -> Self {
        Self {
            maker: maker.clone(),
            id,
        }
    }
}

/// A resting order. Both values are bounded to 96 bits.
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Order {
    /// Remaining amount (or token id) the maker gives.
    pub maker_value: u128,
    /// Remaining amount (or token id) the maker wants in return.
    pub taker_value: u128,
    pub pair_alias: PairAlias,
    pub ancestor_order_id: OrderId,
    pub successor_order_id: OrderId,
    /// Hidden orders wait for their ancestor to be filled and cannot be
    /// taken.
    pub is_hidden: bool,
}

impl Order {
    pub fn has_successor(&self) -> bool {
        self.successor_order_id != 0
    }

    /// Current price in taker units per maker unit, scaled by
    /// [RATIO_SCALE].
    pub fn ratio(&self) -> U256 {
        if self.maker_value == 0 {
            return U256::MAX;
        }
        U256::from(self.taker_value) * U256::from(RATIO_SCALE) / U256::from(self.maker_value)
    }

    pub fn into_view(self, maker: AccountId, id: OrderId) -> OrderView {
        OrderView {
            maker,
            id,
            maker_value: U128(self.maker_value),
            taker_value: U128(self.taker_value),
            pair_alias: self.pair_alias,
            ancestor_order_id: self.ancestor_order_id,
            successor_order_id: self.successor_order_id,
            is_hidden: self.is_hidden,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct OrderView {
    pub maker: AccountId,
    pub id: OrderId,
    pub maker_value: U128,
    pub taker_value: U128,
    pub pair_alias: PairAlias,
    pub ancestor_order_id: OrderId,
    pub successor_order_id: OrderId,
    pub is_hidden: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ratio() {
        let order = Order {
            maker_value: 100,
            taker_value: 50,
            ..Default::default()
        };
        assert_eq!(order.ratio(), U256::from(RATIO_SCALE / 2));
    }

    #[test]
    fn test_ratio_of_max_values() {
        let order = Order {
            maker_value: 1,
            taker_value: MAX_U96,
            ..Default::default()
        };
        assert_eq!(
            order.ratio(),
            U256::from(MAX_U96) * U256::from(RATIO_SCALE)
        );
    }

    #[test]
    fn test_view_json_uses_strings() {
        let view = Order {
            maker_value: 7,
            taker_value: 9,
            pair_alias: 1,
            ..Default::default()
        }
        .into_view(AccountId::new_unchecked("alice.near".to_string()), 1);
        let json = near_sdk::serde_json::to_value(&view).unwrap();
        assert_eq!(json["maker_value"], "7");
        assert_eq!(json["taker_value"], "9");
    }
}
