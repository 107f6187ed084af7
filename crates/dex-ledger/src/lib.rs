pub mod batch;
pub mod circuit_breaker;
pub mod collaborators;
pub mod config;
pub mod exchange;
pub mod ledger;
pub mod math;
pub mod pair_registry;
pub mod relay;

pub use batch::*;
pub use circuit_breaker::*;
pub use collaborators::*;
pub use config::*;
pub use exchange::*;
pub use ledger::*;
pub use pair_registry::*;
pub use relay::*;

#[cfg(test)]
pub(crate) mod test_utils;
