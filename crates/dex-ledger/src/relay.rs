/// Relayed entry points: a whitelisted relayer submits intents signed by
/// their actual owners and gets paid in fuel.
use std::collections::HashMap;

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::AccountId;

use dubiex_sdk_dex_errors::{DexError, Result};
use dubiex_sdk_dex_types::*;
use dubiex_sdk_macros::*;

use crate::*;

/// Per-signer replay counters. A signer's next intent must carry exactly the
/// stored nonce.
#[derive(Clone, Debug, Default, BorshSerialize, BorshDeserialize)]
pub struct NonceTable {
    nonces: HashMap<AccountId, u64>,
}

impl NonceTable {
    pub fn get(&self, signer: &AccountId) -> u64 {
        self.nonces.get(signer).copied().unwrap_or_default()
    }

    pub fn check(&self, signer: &AccountId, nonce: u64) -> Result<()> {
        ensure!(self.get(signer) == nonce, DexError::ReplayRejected);
        Ok(())
    }

    pub fn increment(&mut self, signer: &AccountId) -> Result<()> {
        let next = self
            .get(signer)
            .checked_add(1)
            .ok_or(DexError::Overflow { bits: 64 })?;
        self.nonces.insert(signer.clone(), next);
        Ok(())
    }
}

impl<R, S, O> Exchange<R, S, O>
where
    R: CurrencyRegistry + Clone,
    S: SignatureRecovery,
    O: SupplyOracle,
{
    pub fn relayed_create_order(
        &mut self,
        ctx: &CallContext,
        signed: Signed<CreateOrderIntent>,
    ) -> Result<OrderId> {
        self.call(ctx, |ex| ex.relayed_create_as(&ctx.caller, signed))
    }

    /// All or nothing, like [Exchange::create_or_update_orders].
    pub fn relayed_create_orders(
        &mut self,
        ctx: &CallContext,
        batch: Vec<Signed<CreateOrderIntent>>,
    ) -> Result<Vec<OrderId>> {
        self.call(ctx, |ex| {
            ensure!(!batch.is_empty(), DexError::InvalidInput("empty batch"));
            batch
                .into_iter()
                .map(|signed| ex.relayed_create_as(&ctx.caller, signed))
                .collect()
        })
    }

    pub fn relayed_fill_order(
        &mut self,
        ctx: &CallContext,
        signed: Signed<FillOrderIntent>,
    ) -> Result<FillResult> {
        self.call(ctx, |ex| ex.relayed_fill_as(&ctx.caller, signed))
    }

    pub fn relayed_fill_orders(
        &mut self,
        ctx: &CallContext,
        batch: Vec<Signed<FillOrderIntent>>,
    ) -> Result<Vec<ItemOutcome<FillResult>>> {
        self.call(ctx, |ex| {
            ensure!(!batch.is_empty(), DexError::InvalidInput("empty batch"));
            ex.state.breaker.ensure_inactive()?;
            Ok(ex.run_isolated(batch, |ex, signed| {
                ex.relayed_fill_as(&ctx.caller, signed)
            }))
        })
    }

    pub fn relayed_cancel_order(
        &mut self,
        ctx: &CallContext,
        signed: Signed<CancelOrderIntent>,
    ) -> Result<()> {
        self.call(ctx, |ex| ex.relayed_cancel_as(&ctx.caller, signed))
    }

    pub fn relayed_cancel_orders(
        &mut self,
        ctx: &CallContext,
        batch: Vec<Signed<CancelOrderIntent>>,
    ) -> Result<Vec<ItemOutcome<()>>> {
        self.call(ctx, |ex| {
            ensure!(!batch.is_empty(), DexError::InvalidInput("empty batch"));
            Ok(ex.run_isolated(batch, |ex, signed| {
                ex.relayed_cancel_as(&ctx.caller, signed)
            }))
        })
    }

    fn relayed_create_as(
        &mut self,
        relayer: &AccountId,
        signed: Signed<CreateOrderIntent>,
    ) -> Result<OrderId> {
        self.authorize(relayer, &signed)?;
        let intent = signed.intent;
        let principal = intent.pair.maker_currency();
        check_fuel_source(&principal, intent.fuel.as_ref(), true)?;
        self.consume_nonce(&intent.maker, &principal, true, intent.fuel.as_ref())?;

        let order_id = self.create_as(
            &intent.maker,
            &intent.pair,
            intent.maker_value.0,
            intent.taker_value.0,
            intent.ancestor_order_id,
        )?;
        self.forward_fuel(
            &intent.maker,
            relayer,
            intent.fuel.as_ref(),
            &principal,
            intent.maker_value.0,
        )?;
        Ok(order_id)
    }

    fn relayed_fill_as(
        &mut self,
        relayer: &AccountId,
        signed: Signed<FillOrderIntent>,
    ) -> Result<FillResult> {
        self.authorize(relayer, &signed)?;
        let intent = signed.intent;
        let principal = self
            .pair_of_order(&intent.maker, intent.order_id)?
            .taker_currency();
        check_fuel_source(&principal, intent.fuel.as_ref(), true)?;
        self.consume_nonce(&intent.taker, &principal, true, intent.fuel.as_ref())?;

        let result = self.fill_as(
            &intent.taker,
            FillRequest {
                maker: intent.maker.clone(),
                order_id: intent.order_id,
                taker_fill: intent.taker_fill,
                max_ratio: intent.max_ratio,
            },
        )?;
        self.forward_fuel(
            &intent.taker,
            relayer,
            intent.fuel.as_ref(),
            &principal,
            result.filled_taker.0,
        )?;
        Ok(result)
    }

    /// The relayer cannot cancel on anyone's behalf, even with the circuit
    /// breaker active: the maker's signature is always required.
    fn relayed_cancel_as(
        &mut self,
        relayer: &AccountId,
        signed: Signed<CancelOrderIntent>,
    ) -> Result<()> {
        self.authorize(relayer, &signed)?;
        let intent = signed.intent;
        let principal = self
            .pair_of_any_order(&intent.maker, intent.order_id)?
            .maker_currency();
        let principal_value = self
            .state
            .ledger
            .get_order(&intent.maker, intent.order_id)
            .map(|order| order.maker_value)
            .unwrap_or_default();
        check_fuel_source(&principal, intent.fuel.as_ref(), false)?;
        self.consume_nonce(&intent.maker, &principal, false, intent.fuel.as_ref())?;

        self.cancel_as(&intent.maker, &intent.maker, intent.order_id)?;
        self.forward_fuel(
            &intent.maker,
            relayer,
            intent.fuel.as_ref(),
            &principal,
            principal_value,
        )?;
        Ok(())
    }

    /// Relayer whitelist, signature, replay and fuel cap checks shared by all
    /// relayed operations.
    fn authorize<T: Intent>(&self, relayer: &AccountId, signed: &Signed<T>) -> Result<()> {
        ensure!(self.config.is_relayer(relayer), DexError::Unauthorized);

        let intent = &signed.intent;
        let recovered = self
            .signatures
            .recover(&intent.digest(&self.config.exchange_id), &signed.signature.0);
        ensure!(
            recovered.as_ref() == Some(intent.signer()),
            DexError::Unauthorized
        );

        self.state.nonces.check(intent.signer(), intent.nonce())?;

        if let Some(fuel) = intent.fuel() {
            ensure!(
                fuel.amount() <= self.config.max_fuel.0,
                DexError::InvalidInput("fuel above maximum")
            );
        }
        Ok(())
    }

    /// Bump the signer's nonce if the intent moves any of their fungible
    /// balances, either through the principal leg or through fuel.
    fn consume_nonce(
        &mut self,
        signer: &AccountId,
        principal: &Currency,
        debits_principal: bool,
        fuel: Option<&Fuel>,
    ) -> Result<()> {
        let fungible_principal = debits_principal && principal.kind.is_fungible();
        let fungible_fuel = fuel.map_or(false, Fuel::debits_fungible_balance);
        if fungible_principal || fungible_fuel {
            self.state.nonces.increment(signer)?;
        } else {
            debug_log!("nonce of {} left at {}", signer, self.state.nonces.get(signer));
        }
        Ok(())
    }

    fn forward_fuel(
        &mut self,
        signer: &AccountId,
        relayer: &AccountId,
        fuel: Option<&Fuel>,
        principal: &Currency,
        principal_value: u128,
    ) -> Result<()> {
        match fuel {
            Some(fuel) => {
                self.registry
                    .debit_fuel(signer, relayer, fuel, principal, principal_value)
            }
            None => Ok(()),
        }
    }
}

/// Relayed calls carry no native coin of the signer, and intrinsic fuel can
/// only come out of a non-fungible token traded in the same intent.
fn check_fuel_source(
    principal: &Currency,
    fuel: Option<&Fuel>,
    debits_principal: bool,
) -> Result<()> {
    ensure!(
        !(debits_principal && principal.kind.is_native()),
        DexError::InvalidInput("native leg in relayed intent")
    );
    if let Some(Fuel::Intrinsic { .. }) = fuel {
        ensure!(
            !principal.kind.is_fungible(),
            DexError::InvalidInput("intrinsic fuel needs a non-fungible leg")
        );
    }
    Ok(())
}
