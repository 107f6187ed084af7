/// Wide integer arithmetic for order math.
///
/// Order values are bounded to 96 bits so that products of two values (or of
/// a value and an 18-decimal ratio) always fit in 256 bits without
/// intermediate truncation.
use dubiex_sdk_dex_errors::{DexError, Result};
use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

/// Largest value an order side may hold (2^96 - 1).
pub const MAX_U96: u128 = (1u128 << 96) - 1;

/// Fixed-point scale of ratios (18 decimals).
pub const RATIO_SCALE: u128 = 1_000_000_000_000_000_000;

/// `a * b / denominator` with a 256-bit intermediate, rounded down.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<U256> {
    if denominator == 0 {
        return Err(DexError::InvalidInput("division by zero"));
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(DexError::Overflow { bits: 256 })?;
    Ok(product / U256::from(denominator))
}

/// Narrow a wide value to an order value, failing above 2^96 - 1.
pub fn to_u96(v: U256) -> Result<u128> {
    if v > U256::from(MAX_U96) {
        return Err(DexError::Overflow { bits: 96 });
    }
    Ok(v.low_u128())
}
