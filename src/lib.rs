pub use dubiex_sdk_dex_errors as errors;
pub use dubiex_sdk_dex_events as events;
pub use dubiex_sdk_dex_ledger as ledger;
pub use dubiex_sdk_dex_types as types;
pub use dubiex_sdk_macros as macros;

pub mod prelude {
    pub use crate::errors::{DexError, Result};
    pub use crate::events::*;
    pub use crate::ledger::*;
    pub use crate::types::*;
}
