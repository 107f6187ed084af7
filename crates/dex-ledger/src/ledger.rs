/// Implements the per-account order table.
use std::collections::HashMap;

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::AccountId;

use dubiex_sdk_dex_errors::{DexError, Result};
use dubiex_sdk_dex_types::*;
use dubiex_sdk_macros::*;

use crate::math;

/// Internal struct representing a validated order ready to be stored.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub maker_value: u128,
    pub taker_value: u128,
    pub pair_alias: PairAlias,
    /// Zero for a standalone order.
    pub ancestor_order_id: OrderId,
}

/// Result of a fill, used to settle balances and emit events.
#[derive(Clone, Debug, PartialEq)]
pub struct Fill {
    pub filled_maker: u128,
    pub filled_taker: u128,
    pub pair_alias: PairAlias,
    /// True if the fill exhausted the order and it was removed.
    pub order_removed: bool,
    /// Successor made visible by this fill, if any.
    pub revealed_successor: Option<OrderId>,
}

/// Flat table of orders keyed by `(maker, id)`, plus the last id handed out
/// to each maker.
#[derive(Clone, Debug, Default, BorshSerialize, BorshDeserialize)]
pub struct OrderLedger {
    orders: HashMap<OrderKey, Order>,
    last_order_ids: HashMap<AccountId, OrderId>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an order, hidden or not.
    pub fn get_order(&self, maker: &AccountId, id: OrderId) -> Option<&Order> {
        if id == 0 {
            return None;
        }
        self.orders.get(&OrderKey::new(maker, id))
    }

    /// Fetch an order that can be taken. Hidden orders are reported as
    /// missing.
    pub fn get_visible_order(&self, maker: &AccountId, id: OrderId) -> Result<&Order> {
        match self.get_order(maker, id) {
            Some(order) if !order.is_hidden => Ok(order),
            _ => Err(DexError::NotFound),
        }
    }

    pub fn last_order_id(&self, maker: &AccountId) -> OrderId {
        self.last_order_ids.get(maker).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Store a new order for `maker` and return its id. An order chained to
    /// an ancestor starts hidden and becomes the ancestor's successor.
    pub fn create_order(&mut self, maker: &AccountId, order: NewOrder) -> Result<OrderId> {
        ensure!(order.maker_value > 0, DexError::InvalidInput("zero maker value"));
        ensure!(order.taker_value > 0, DexError::InvalidInput("zero taker value"));
        ensure!(
            order.maker_value <= MAX_U96 && order.taker_value <= MAX_U96,
            DexError::Overflow { bits: 96 }
        );

        let is_hidden = order.ancestor_order_id != 0;
        if is_hidden {
            let ancestor = require_some!(
                self.get_order(maker, order.ancestor_order_id),
                DexError::NotFound
            );
            ensure!(!ancestor.has_successor(), DexError::ChainConflict);
        }

        let id = self
            .last_order_id(maker)
            .checked_add(1)
            .ok_or(DexError::Overflow { bits: 32 })?;
        self.last_order_ids.insert(maker.clone(), id);

        if is_hidden {
            if let Some(ancestor) = self
                .orders
                .get_mut(&OrderKey::new(maker, order.ancestor_order_id))
            {
                ancestor.successor_order_id = id;
            }
        }

        self.orders.insert(
            OrderKey::new(maker, id),
            Order {
                maker_value: order.maker_value,
                taker_value: order.taker_value,
                pair_alias: order.pair_alias,
                ancestor_order_id: order.ancestor_order_id,
                successor_order_id: 0,
                is_hidden,
            },
        );

        Ok(id)
    }

    /// Re-price an order at `ratio`, keeping its maker value. Returns the new
    /// taker value.
    pub fn update_order_ratio(
        &mut self,
        maker: &AccountId,
        id: OrderId,
        ratio: u128,
        pair: &OrderPair,
    ) -> Result<u128> {
        ensure!(pair.is_fungible(), DexError::ImmutableAssetUpdate);

        let key = OrderKey::new(maker, id);
        let order = require_some!(self.orders.get_mut(&key), DexError::NotFound);
        let taker_value = math::taker_value_for_ratio(order.maker_value, ratio)?;
        ensure!(taker_value > 0, DexError::InvalidInput("zero taker value"));

        order.taker_value = taker_value;
        Ok(taker_value)
    }

    /// Take up to `requested_taker_fill` of an order. Removes the order when
    /// its taker value is exhausted and reveals its successor if it still
    /// exists.
    pub fn fill_order(
        &mut self,
        maker: &AccountId,
        id: OrderId,
        requested_taker_fill: u128,
        max_ratio: u128,
        pair: &OrderPair,
    ) -> Result<Fill> {
        let order = self.get_visible_order(maker, id)?;
        math::ensure_ratio_within(order, max_ratio)?;
        let (filled_maker, filled_taker) =
            math::fill_amounts(order, requested_taker_fill, pair.is_fungible())?;

        let key = OrderKey::new(maker, id);
        let mut order = require_some!(self.orders.remove(&key), DexError::NotFound);
        order.maker_value -= filled_maker;
        order.taker_value -= filled_taker;

        let pair_alias = order.pair_alias;
        if order.taker_value > 0 {
            self.orders.insert(key, order);
            return Ok(Fill {
                filled_maker,
                filled_taker,
                pair_alias,
                order_removed: false,
                revealed_successor: None,
            });
        }

        let revealed_successor = self.reveal_successor(maker, order.successor_order_id);
        Ok(Fill {
            filled_maker,
            filled_taker,
            pair_alias,
            order_removed: true,
            revealed_successor,
        })
    }

    /// Remove an order and return what was left of it.
    pub fn cancel_order(&mut self, maker: &AccountId, id: OrderId) -> Result<Order> {
        if id == 0 {
            return Err(DexError::NotFound);
        }
        self.orders
            .remove(&OrderKey::new(maker, id))
            .ok_or(DexError::NotFound)
    }

    /// The successor link is only an id: the successor may have been
    /// cancelled in the meantime, in which case nothing happens.
    fn reveal_successor(&mut self, maker: &AccountId, successor_id: OrderId) -> Option<OrderId> {
        if successor_id == 0 {
            return None;
        }
        match self.orders.get_mut(&OrderKey::new(maker, successor_id)) {
            Some(successor) => {
                successor.is_hidden = false;
                Some(successor_id)
            }
            None => {
                debug_log!("successor {} of {} no longer exists", successor_id, maker);
                None
            }
        }
    }
}
