use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::AccountId;

/// Upper bound on the fuel a single relayed intent may pay.
pub const DEFAULT_MAX_FUEL: u128 = 10 * 10u128.pow(18);

/// Supply at which the circuit breaker may be tripped.
pub const DEFAULT_SUPPLY_THRESHOLD: u128 = 1_000_000_000 * 10u128.pow(18);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct ExchangeConfig {
    /// Account of this deployment. Signed intents commit to it.
    pub exchange_id: AccountId,
    /// Accounts allowed to submit signed intents on behalf of users.
    #[serde(default)]
    pub relayers: Vec<AccountId>,
    #[serde(default = "default_max_fuel")]
    pub max_fuel: U128,
    #[serde(default = "default_supply_threshold")]
    pub supply_threshold: U128,
    /// The two token supplies the circuit breaker watches.
    pub monitored_supplies: [AccountId; 2],
    /// Keep committed events around for [crate::Exchange::drain_events].
    /// Off by default: the log lines are the record.
    #[serde(default)]
    pub retain_events: bool,
}

fn default_max_fuel() -> U128 {
    U128(DEFAULT_MAX_FUEL)
}

fn default_supply_threshold() -> U128 {
    U128(DEFAULT_SUPPLY_THRESHOLD)
}

impl ExchangeConfig {
    pub fn new(exchange_id: AccountId, monitored_supplies: [AccountId; 2]) -> Self {
        Self {
            exchange_id,
            relayers: vec![],
            max_fuel: default_max_fuel(),
            supply_threshold: default_supply_threshold(),
            monitored_supplies,
            retain_events: false,
        }
    }

    pub fn with_relayer(mut self, relayer: AccountId) -> Self {
        self.relayers.push(relayer);
        self
    }

    pub fn with_retained_events(mut self) -> Self {
        self.retain_events = true;
        self
    }

    pub fn is_relayer(&self, account_id: &AccountId) -> bool {
        self.relayers.contains(account_id)
    }
}
