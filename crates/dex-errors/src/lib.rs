/// Error taxonomy of the exchange. The `Display` output of each variant
/// starts with a stable code that user-facing clients can parse to show
/// friendly error messages.
use thiserror::Error;

pub type Result<T, E = DexError> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DexError {
    /////////////////////////////
    // miscellaneous errors (E0X)
    /////////////////////////////
    #[error("E01: invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("E02: value does not fit in {bits} bits")]
    Overflow { bits: u32 },

    ///////////////////////////////////
    // pair and settlement errors (E1X)
    ///////////////////////////////////
    #[error("E11: incompatible currency pair")]
    IncompatiblePair,
    #[error("E12: settlement failed: {0}")]
    SettlementFailure(String),

    /////////////////////
    // order errors (E2X)
    /////////////////////
    #[error("E21: order not found")]
    NotFound,
    #[error("E22: non-fungible orders cannot be re-priced")]
    ImmutableAssetUpdate,
    #[error("E23: ancestor order already has a successor")]
    ChainConflict,
    #[error("E24: order ratio exceeds the taker's maximum")]
    RatioExceeded,

    ///////////////////////////////
    // authorization errors (E3X)
    ///////////////////////////////
    #[error("E31: unauthorized")]
    Unauthorized,
    #[error("E32: nonce mismatch")]
    ReplayRejected,

    /////////////////////////////////
    // circuit breaker errors (E4X)
    /////////////////////////////////
    #[error("E41: circuit breaker is active")]
    CircuitBreakerActive,
    #[error("E42: circuit breaker already on")]
    CircuitBreakerAlreadyOn,
    #[error("E43: monitored supply below threshold")]
    SupplyBelowThreshold,
}

impl DexError {
    /// Short code prefix of the message, eg `E21`.
    pub fn code(&self) -> &'static str {
        match self {
            DexError::InvalidInput(_) => "E01",
            DexError::Overflow { .. } => "E02",
            DexError::IncompatiblePair => "E11",
            DexError::SettlementFailure(_) => "E12",
            DexError::NotFound => "E21",
            DexError::ImmutableAssetUpdate => "E22",
            DexError::ChainConflict => "E23",
            DexError::RatioExceeded => "E24",
            DexError::Unauthorized => "E31",
            DexError::ReplayRejected => "E32",
            DexError::CircuitBreakerActive => "E41",
            DexError::CircuitBreakerAlreadyOn => "E42",
            DexError::SupplyBelowThreshold => "E43",
        }
    }
}
