/// Pricing arithmetic for ratio updates and fills. All products go through a
/// 256-bit intermediate so that 96-bit values never lose precision.
use dubiex_sdk_dex_errors::{DexError, Result};
use dubiex_sdk_dex_types::*;
use dubiex_sdk_macros::*;

/// Taker value implied by re-pricing `maker_value` at `ratio` (taker units
/// per maker unit, scaled by [RATIO_SCALE]).
pub fn taker_value_for_ratio(maker_value: u128, ratio: u128) -> Result<u128> {
    ensure!(ratio > 0, DexError::InvalidInput("zero ratio"));
    to_u96(mul_div(maker_value, ratio, RATIO_SCALE)?)
}

/// Fail if the order is priced above what the taker agreed to pay.
pub fn ensure_ratio_within(order: &Order, max_ratio: u128) -> Result<()> {
    ensure!(max_ratio > 0, DexError::InvalidInput("zero ratio"));
    ensure!(order.ratio() <= U256::from(max_ratio), DexError::RatioExceeded);
    Ok(())
}

/// Amounts exchanged by a fill: `(filled_maker, filled_taker)`.
///
/// Orders with a one-of-a-kind leg only trade whole, so the request must
/// name the exact taker value. Fungible orders take at most the remaining
/// taker value and pay out the proportional maker value, rounded down.
pub fn fill_amounts(
    order: &Order,
    requested_taker_fill: u128,
    fungible: bool,
) -> Result<(u128, u128)> {
    ensure!(requested_taker_fill > 0, DexError::InvalidInput("zero fill"));

    if !fungible {
        ensure!(
            requested_taker_fill == order.taker_value,
            DexError::InvalidInput("non-fungible orders fill whole")
        );
        return Ok((order.maker_value, order.taker_value));
    }

    let filled_taker = requested_taker_fill.min(order.taker_value);
    let filled_maker = to_u96(mul_div(order.maker_value, filled_taker, order.taker_value)?)?;
    ensure!(filled_maker > 0, DexError::InvalidInput("fill too small"));

    Ok((filled_maker, filled_taker))
}
