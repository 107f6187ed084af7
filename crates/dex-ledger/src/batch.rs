/// Multi-item entry points.
///
/// Order creation is all or nothing. Fills and cancels are isolated: a failing
/// item is rolled back on its own and reported, and the rest of the batch
/// still goes through.
use dubiex_sdk_dex_errors::{DexError, Result};
use dubiex_sdk_dex_types::*;
use dubiex_sdk_macros::*;

use crate::*;

/// Outcome of one item of an isolated batch.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemOutcome<T> {
    Applied(T),
    Skipped(DexError),
}

impl<T> ItemOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, ItemOutcome::Applied(_))
    }

    pub fn applied(&self) -> Option<&T> {
        match self {
            ItemOutcome::Applied(value) => Some(value),
            ItemOutcome::Skipped(_) => None,
        }
    }

    pub fn error(&self) -> Option<&DexError> {
        match self {
            ItemOutcome::Applied(_) => None,
            ItemOutcome::Skipped(err) => Some(err),
        }
    }
}

impl<T> From<Result<T>> for ItemOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => ItemOutcome::Applied(value),
            Err(err) => ItemOutcome::Skipped(err),
        }
    }
}

impl<R, S, O> Exchange<R, S, O>
where
    R: CurrencyRegistry + Clone,
    S: SignatureRecovery,
    O: SupplyOracle,
{
    pub fn create_or_update_orders(
        &mut self,
        ctx: &CallContext,
        requests: Vec<OrderRequest>,
    ) -> Result<Vec<OrderId>> {
        self.call(ctx, |ex| {
            ensure!(!requests.is_empty(), DexError::InvalidInput("empty batch"));
            requests
                .into_iter()
                .map(|request| ex.create_or_update_as(&ctx.caller, request))
                .collect()
        })
    }

    /// Fails as a whole only for an empty batch or an active circuit breaker.
    pub fn fill_orders(
        &mut self,
        ctx: &CallContext,
        requests: Vec<FillRequest>,
    ) -> Result<Vec<ItemOutcome<FillResult>>> {
        self.call(ctx, |ex| {
            ensure!(!requests.is_empty(), DexError::InvalidInput("empty batch"));
            ex.state.breaker.ensure_inactive()?;
            Ok(ex.run_isolated(requests, |ex, request| ex.fill_as(&ctx.caller, request)))
        })
    }

    pub fn cancel_orders(
        &mut self,
        ctx: &CallContext,
        requests: Vec<CancelRequest>,
    ) -> Result<Vec<ItemOutcome<()>>> {
        self.call(ctx, |ex| {
            ensure!(!requests.is_empty(), DexError::InvalidInput("empty batch"));
            Ok(ex.run_isolated(requests, |ex, request| {
                ex.cancel_as(&ctx.caller, &request.maker, request.order_id)
            }))
        })
    }

    /// Apply `f` to every item inside its own rollback boundary.
    pub(crate) fn run_isolated<I, T>(
        &mut self,
        items: Vec<I>,
        mut f: impl FnMut(&mut Self, I) -> Result<T>,
    ) -> Vec<ItemOutcome<T>> {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let result = self.transact(|ex| f(ex, item));
            if let Err(ref err) = result {
                debug_log!("skipping batch item: {}", err);
            }
            outcomes.push(result.into());
        }
        outcomes
    }
}
