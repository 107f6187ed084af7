/// Public entry points of the exchange.
///
/// Every mutating entry point runs to completion or leaves no trace: state,
/// registry balances and buffered events are snapshotted before the call and
/// restored if it fails. Events are only written to the log once the call
/// commits.
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::AccountId;

use dubiex_sdk_dex_errors::{DexError, Result};
use dubiex_sdk_dex_events::*;
use dubiex_sdk_dex_types::*;
use dubiex_sdk_macros::*;

use crate::*;

/// Who is calling and how much native coin they attached.
#[derive(Clone, Debug, PartialEq)]
pub struct CallContext {
    pub caller: AccountId,
    pub attached_native: u128,
}

impl CallContext {
    pub fn new(caller: AccountId) -> Self {
        Self {
            caller,
            attached_native: 0,
        }
    }

    pub fn with_native(mut self, amount: u128) -> Self {
        self.attached_native = amount;
        self
    }
}

/// Request to create an order (`order_id == 0`) or re-price an existing one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct OrderRequest {
    pub pair: OrderPair,
    pub maker_value: U128,
    pub taker_value: U128,
    #[serde(default)]
    pub order_id: OrderId,
    #[serde(default)]
    pub ancestor_order_id: OrderId,
    /// New price for updates, taker units per maker unit scaled by
    /// [RATIO_SCALE]. Ignored on create.
    #[serde(default = "zero_u128")]
    pub ratio: U128,
}

fn zero_u128() -> U128 {
    U128(0)
}

impl OrderRequest {
    pub fn create(pair: OrderPair, maker_value: u128, taker_value: u128) -> Self {
        Self {
            pair,
            maker_value: U128(maker_value),
            taker_value: U128(taker_value),
            order_id: 0,
            ancestor_order_id: 0,
            ratio: U128(0),
        }
    }

    pub fn after(mut self, ancestor_order_id: OrderId) -> Self {
        self.ancestor_order_id = ancestor_order_id;
        self
    }

    /// Only the order id and ratio matter for an update.
    pub fn update(pair: OrderPair, order_id: OrderId, ratio: u128) -> Self {
        Self {
            pair,
            maker_value: U128(0),
            taker_value: U128(0),
            order_id,
            ancestor_order_id: 0,
            ratio: U128(ratio),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct FillRequest {
    pub maker: AccountId,
    pub order_id: OrderId,
    pub taker_fill: U128,
    /// Highest order ratio the taker accepts, scaled by [RATIO_SCALE].
    pub max_ratio: U128,
}

impl FillRequest {
    pub fn new(maker: AccountId, order_id: OrderId, taker_fill: u128, max_ratio: u128) -> Self {
        Self {
            maker,
            order_id,
            taker_fill: U128(taker_fill),
            max_ratio: U128(max_ratio),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct CancelRequest {
    pub maker: AccountId,
    pub order_id: OrderId,
}

impl CancelRequest {
    pub fn new(maker: AccountId, order_id: OrderId) -> Self {
        Self { maker, order_id }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct FillResult {
    pub filled_maker: U128,
    pub filled_taker: U128,
}

/// Persistent state owned by the exchange.
#[derive(Clone, Debug, Default, BorshSerialize, BorshDeserialize)]
pub struct ExchangeState {
    pub ledger: OrderLedger,
    pub pairs: PairRegistry,
    pub nonces: NonceTable,
    pub breaker: CircuitBreaker,
}

/// Native coin attached to the current call that has not been spent yet.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct NativeBudget {
    remaining: u128,
}

impl NativeBudget {
    fn new(attached: u128) -> Self {
        Self {
            remaining: attached,
        }
    }

    fn spend(&mut self, amount: u128) -> Result<()> {
        self.remaining = self.remaining.checked_sub(amount).ok_or_else(|| {
            DexError::SettlementFailure("insufficient attached native coin".to_string())
        })?;
        Ok(())
    }

    fn take_remaining(&mut self) -> u128 {
        std::mem::take(&mut self.remaining)
    }
}

pub struct Exchange<R, S, O> {
    pub config: ExchangeConfig,
    pub(crate) state: ExchangeState,
    pub(crate) registry: R,
    pub(crate) signatures: S,
    pub(crate) oracle: O,
    native: NativeBudget,
    pending_events: Vec<Event>,
    committed_events: Vec<Event>,
}

impl<R, S, O> Exchange<R, S, O>
where
    R: CurrencyRegistry + Clone,
    S: SignatureRecovery,
    O: SupplyOracle,
{
    pub fn new(config: ExchangeConfig, registry: R, signatures: S, oracle: O) -> Self {
        Self::from_state(config, ExchangeState::default(), registry, signatures, oracle)
    }

    /// Resume from previously persisted state.
    pub fn from_state(
        config: ExchangeConfig,
        state: ExchangeState,
        registry: R,
        signatures: S,
        oracle: O,
    ) -> Self {
        Self {
            config,
            state,
            registry,
            signatures,
            oracle,
            native: NativeBudget::default(),
            pending_events: vec![],
            committed_events: vec![],
        }
    }

    pub fn state(&self) -> &ExchangeState {
        &self.state
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Events committed since the last call to this method. Always empty
    /// unless [ExchangeConfig::retain_events] is set.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.committed_events)
    }

    ////////////////
    // entry points
    ////////////////

    pub fn create_or_update_order(
        &mut self,
        ctx: &CallContext,
        request: OrderRequest,
    ) -> Result<OrderId> {
        self.call(ctx, |ex| ex.create_or_update_as(&ctx.caller, request))
    }

    pub fn fill_order(&mut self, ctx: &CallContext, request: FillRequest) -> Result<FillResult> {
        self.call(ctx, |ex| ex.fill_as(&ctx.caller, request))
    }

    pub fn cancel_order(&mut self, ctx: &CallContext, request: CancelRequest) -> Result<()> {
        self.call(ctx, |ex| {
            ex.cancel_as(&ctx.caller, &request.maker, request.order_id)
        })
    }

    /// Permissionless. Trips the breaker if a monitored supply reached the
    /// configured threshold.
    pub fn activate_circuit_breaker(&mut self) -> Result<()> {
        let ExchangeConfig {
            monitored_supplies,
            supply_threshold,
            ..
        } = &self.config;
        self.state
            .breaker
            .activate(&self.oracle, monitored_supplies, supply_threshold.0)?;
        self.record(EventType::CircuitBreakerActivated);
        self.commit_events();
        Ok(())
    }

    /////////
    // views
    /////////

    pub fn get_order(&self, maker: &AccountId, id: OrderId) -> Option<OrderView> {
        self.state
            .ledger
            .get_order(maker, id)
            .map(|order| order.clone().into_view(maker.clone(), id))
    }

    pub fn get_order_pair_by_alias(&self, alias: PairAlias) -> Option<OrderPair> {
        self.state.pairs.pair_by_alias(alias).cloned()
    }

    pub fn get_order_pair_by_hash(&self, hash: &PairHash) -> Option<OrderPair> {
        self.state.pairs.pair_by_hash(hash).cloned()
    }

    pub fn get_nonce(&self, signer: &AccountId) -> u64 {
        self.state.nonces.get(signer)
    }

    pub fn is_circuit_breaker_active(&self) -> bool {
        self.state.breaker.is_active()
    }

    ///////////////////////
    // call and rollback
    ///////////////////////

    /// Run a top-level call: set up the native budget, apply `f` atomically,
    /// refund unspent native coin and commit events.
    pub(crate) fn call<T>(
        &mut self,
        ctx: &CallContext,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.native = NativeBudget::new(ctx.attached_native);
        let result = self.transact(|ex| {
            let value = f(ex)?;
            let unspent = ex.native.take_remaining();
            if unspent > 0 {
                ex.registry.refund_native(&ctx.caller, unspent)?;
            }
            Ok(value)
        });
        match result {
            Ok(_) => self.commit_events(),
            Err(ref err) => {
                debug_log!("call by {} failed: {}", ctx.caller, err);
                self.pending_events.clear();
            }
        }
        self.native = NativeBudget::default();
        result
    }

    /// Apply `f`, restoring state, registry, native budget and buffered
    /// events if it fails.
    pub(crate) fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let state = self.state.clone();
        let registry = self.registry.clone();
        let native = self.native;
        let events = self.pending_events.len();

        let result = f(self);
        if result.is_err() {
            self.state = state;
            self.registry = registry;
            self.native = native;
            self.pending_events.truncate(events);
        }
        result
    }

    fn record(&mut self, data: EventType) {
        self.pending_events.push(data.into());
    }

    fn commit_events(&mut self) {
        for event in self.pending_events.drain(..) {
            emit_event(&event);
            if self.config.retain_events {
                self.committed_events.push(event);
            }
        }
    }

    //////////////////////
    // ledger operations
    //////////////////////

    pub(crate) fn create_or_update_as(
        &mut self,
        maker: &AccountId,
        request: OrderRequest,
    ) -> Result<OrderId> {
        if request.order_id == 0 {
            self.create_as(
                maker,
                &request.pair,
                request.maker_value.0,
                request.taker_value.0,
                request.ancestor_order_id,
            )
        } else {
            self.update_as(maker, request.order_id, request.ratio.0)?;
            Ok(request.order_id)
        }
    }

    pub(crate) fn create_as(
        &mut self,
        maker: &AccountId,
        pair: &OrderPair,
        maker_value: u128,
        taker_value: u128,
        ancestor_order_id: OrderId,
    ) -> Result<OrderId> {
        self.state.breaker.ensure_inactive()?;

        let maker_currency = pair.maker_currency();
        ensure!(
            self.registry.is_valid(&maker_currency)
                && self.registry.is_valid(&pair.taker_currency()),
            DexError::IncompatiblePair
        );

        let pair_alias = self.state.pairs.resolve(pair)?;
        let order_id = self.state.ledger.create_order(
            maker,
            NewOrder {
                maker_value,
                taker_value,
                pair_alias,
                ancestor_order_id,
            },
        )?;

        self.record(EventType::OrderCreated(OrderCreatedEvent {
            maker: maker.clone(),
            order_id,
            packed_data: pack_order_data(maker_value, taker_value, pair_alias),
        }));

        if maker_currency.kind.is_native() {
            self.native.spend(maker_value)?;
        } else {
            self.registry.deposit(maker, &maker_currency, maker_value)?;
        }

        Ok(order_id)
    }

    pub(crate) fn update_as(
        &mut self,
        maker: &AccountId,
        order_id: OrderId,
        ratio: u128,
    ) -> Result<()> {
        self.state.breaker.ensure_inactive()?;

        let pair_alias = require_some!(
            self.state.ledger.get_order(maker, order_id),
            DexError::NotFound
        )
        .pair_alias;
        let pair = require_some!(
            self.state.pairs.pair_by_alias(pair_alias).cloned(),
            DexError::NotFound
        );
        self.state
            .ledger
            .update_order_ratio(maker, order_id, ratio, &pair)?;

        self.record(EventType::OrderUpdated(OrderUpdatedEvent {
            maker: maker.clone(),
            order_id,
        }));
        Ok(())
    }

    pub(crate) fn fill_as(
        &mut self,
        taker: &AccountId,
        request: FillRequest,
    ) -> Result<FillResult> {
        self.state.breaker.ensure_inactive()?;

        let FillRequest {
            maker,
            order_id,
            taker_fill,
            max_ratio,
        } = request;
        let pair = self.pair_of_order(&maker, order_id)?;
        let fill = self.state.ledger.fill_order(
            &maker,
            order_id,
            taker_fill.0,
            max_ratio.0,
            &pair,
        )?;
        if fill.order_removed {
            debug_log!(
                "order {} of {} filled, revealed {:?}",
                order_id,
                maker,
                fill.revealed_successor
            );
        }

        self.record(EventType::OrderFilled(OrderFilledEvent {
            maker: maker.clone(),
            order_id,
            taker: taker.clone(),
            packed_data: pack_order_data(fill.filled_maker, fill.filled_taker, fill.pair_alias),
        }));

        // taker pays the maker
        let taker_currency = pair.taker_currency();
        if taker_currency.kind.is_native() {
            self.native.spend(fill.filled_taker)?;
            self.registry
                .withdraw(&maker, &taker_currency, fill.filled_taker)?;
        } else {
            self.registry
                .transfer(taker, &maker, &taker_currency, fill.filled_taker)?;
        }
        // escrow pays the taker
        self.registry
            .withdraw(taker, &pair.maker_currency(), fill.filled_maker)?;

        Ok(FillResult {
            filled_maker: U128(fill.filled_maker),
            filled_taker: U128(fill.filled_taker),
        })
    }

    /// Cancel `maker`'s order on behalf of `caller`. Only the maker may cancel
    /// unless the circuit breaker is active.
    pub(crate) fn cancel_as(
        &mut self,
        caller: &AccountId,
        maker: &AccountId,
        order_id: OrderId,
    ) -> Result<()> {
        let pair = self.pair_of_any_order(maker, order_id)?;
        ensure!(
            caller == maker || self.state.breaker.is_active(),
            DexError::Unauthorized
        );

        let order = self.state.ledger.cancel_order(maker, order_id)?;
        self.record(EventType::OrderCancelled(OrderCancelledEvent {
            maker: maker.clone(),
            order_id,
        }));
        self.registry
            .withdraw(maker, &pair.maker_currency(), order.maker_value)?;
        Ok(())
    }

    /// Pair of a visible order.
    pub(crate) fn pair_of_order(&self, maker: &AccountId, order_id: OrderId) -> Result<OrderPair> {
        let order = self.state.ledger.get_visible_order(maker, order_id)?;
        self.pair_by_alias(order.pair_alias)
    }

    /// Pair of an order, hidden or not.
    pub(crate) fn pair_of_any_order(
        &self,
        maker: &AccountId,
        order_id: OrderId,
    ) -> Result<OrderPair> {
        let order = require_some!(
            self.state.ledger.get_order(maker, order_id),
            DexError::NotFound
        );
        self.pair_by_alias(order.pair_alias)
    }

    fn pair_by_alias(&self, alias: PairAlias) -> Result<OrderPair> {
        self.state
            .pairs
            .pair_by_alias(alias)
            .cloned()
            .ok_or(DexError::NotFound)
    }
}
