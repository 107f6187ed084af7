use std::collections::{HashMap, HashSet};

pub use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
pub use near_sdk::json_types::U128;
pub use near_sdk::AccountId;

pub use dubiex_sdk_dex_errors::{DexError, Result};
pub use dubiex_sdk_dex_events::*;
pub use dubiex_sdk_dex_types::*;

pub use crate::*;

pub type TestExchange = Exchange<MemoryRegistry, EchoSignatures, FixedSupplyOracle>;

fn account(name: &str) -> AccountId {
    AccountId::new_unchecked(name.to_string())
}

pub fn alice() -> AccountId {
    account("alice.near")
}

pub fn bob() -> AccountId {
    account("bob.near")
}

pub fn carol() -> AccountId {
    account("carol.near")
}

pub fn relayer() -> AccountId {
    account("relayer.near")
}

/// Escrow account of the exchange in [MemoryRegistry].
pub fn exchange_account() -> AccountId {
    account("dubiex.near")
}

pub fn monitored() -> [AccountId; 2] {
    [account("stake.near"), account("reward.near")]
}

pub fn ft_a() -> Currency {
    Currency::new(account("a.near"), CurrencyKind::Fungible)
}

pub fn ft_b() -> Currency {
    Currency::new(account("b.near"), CurrencyKind::Fungible)
}

pub fn nft() -> Currency {
    Currency::new(account("nft.near"), CurrencyKind::NonFungible)
}

pub fn native() -> Currency {
    Currency::new(account("near"), CurrencyKind::Native)
}

pub fn boost() -> Currency {
    Currency::new(account("boost.near"), CurrencyKind::BoostableFungible)
}

pub fn ft_pair() -> OrderPair {
    OrderPair::new(ft_a(), ft_b())
}

pub fn nft_for_ft_pair() -> OrderPair {
    OrderPair::new(nft(), ft_b())
}

pub fn ft_for_nft_pair() -> OrderPair {
    OrderPair::new(ft_a(), nft())
}

pub fn native_for_ft_pair() -> OrderPair {
    OrderPair::new(native(), ft_b())
}

pub fn ft_for_native_pair() -> OrderPair {
    OrderPair::new(ft_a(), native())
}

pub fn boostable_pair() -> OrderPair {
    OrderPair::new(boost(), ft_a())
}

/// Ledger of token balances kept in memory. Fungible balances, including
/// native coin paid out by the exchange, live in `balances`; non-fungible
/// tokens are tracked by owner. Native coin held by the exchange itself is not
/// tracked since it only ever arrives attached to calls.
#[derive(Clone, Debug, Default)]
pub struct MemoryRegistry {
    pub valid: HashSet<Currency>,
    pub balances: HashMap<(AccountId, Currency), u128>,
    pub nft_owners: HashMap<(Currency, u128), AccountId>,
    pub fuel: HashMap<(AccountId, FuelKind), u128>,
    /// Fuel meters built into non-fungible tokens, by token id.
    pub intrinsic_fuel: HashMap<(Currency, u128), u128>,
    pub fuel_earned: HashMap<AccountId, u128>,
}

impl MemoryRegistry {
    pub fn with_currencies(currencies: Vec<Currency>) -> Self {
        Self {
            valid: currencies.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn balance(&self, owner: &AccountId, currency: &Currency) -> u128 {
        self.balances
            .get(&(owner.clone(), currency.clone()))
            .copied()
            .unwrap_or_default()
    }

    pub fn owner_of(&self, currency: &Currency, token_id: u128) -> Option<&AccountId> {
        self.nft_owners.get(&(currency.clone(), token_id))
    }

    pub fn mint(&mut self, owner: &AccountId, currency: &Currency, amount: u128) {
        if currency.kind.is_fungible() {
            *self
                .balances
                .entry((owner.clone(), currency.clone()))
                .or_default() += amount;
        } else {
            self.nft_owners
                .insert((currency.clone(), amount), owner.clone());
        }
    }

    pub fn add_fuel(&mut self, owner: &AccountId, kind: FuelKind, amount: u128) {
        *self.fuel.entry((owner.clone(), kind)).or_default() += amount;
    }

    pub fn fuel_of(&self, owner: &AccountId, kind: FuelKind) -> u128 {
        self.fuel
            .get(&(owner.clone(), kind))
            .copied()
            .unwrap_or_default()
    }

    pub fn fuel_earned(&self, relayer: &AccountId) -> u128 {
        self.fuel_earned.get(relayer).copied().unwrap_or_default()
    }

    fn move_value(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        currency: &Currency,
        amount: u128,
    ) -> Result<()> {
        if currency.kind.is_fungible() {
            let from_balance = self
                .balances
                .entry((from.clone(), currency.clone()))
                .or_default();
            *from_balance = from_balance.checked_sub(amount).ok_or_else(|| {
                DexError::SettlementFailure(format!("{} has too little {}", from, currency))
            })?;
            *self
                .balances
                .entry((to.clone(), currency.clone()))
                .or_default() += amount;
        } else {
            let owner = self
                .nft_owners
                .get_mut(&(currency.clone(), amount))
                .filter(|owner| *owner == from)
                .ok_or_else(|| {
                    DexError::SettlementFailure(format!("{} does not own {}", from, currency))
                })?;
            *owner = to.clone();
        }
        Ok(())
    }
}

impl CurrencyRegistry for MemoryRegistry {
    fn is_valid(&self, currency: &Currency) -> bool {
        self.valid.contains(currency)
    }

    fn deposit(&mut self, owner: &AccountId, currency: &Currency, amount: u128) -> Result<()> {
        assert!(!currency.kind.is_native(), "native coin is never deposited");
        self.move_value(owner, &exchange_account(), currency, amount)
    }

    fn withdraw(&mut self, recipient: &AccountId, currency: &Currency, amount: u128) -> Result<()> {
        if currency.kind.is_native() {
            self.mint(recipient, currency, amount);
            return Ok(());
        }
        self.move_value(&exchange_account(), recipient, currency, amount)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        currency: &Currency,
        amount: u128,
    ) -> Result<()> {
        assert!(!currency.kind.is_native(), "native coin is never transferred");
        self.move_value(from, to, currency, amount)
    }

    fn debit_fuel(
        &mut self,
        signer: &AccountId,
        relayer: &AccountId,
        fuel: &Fuel,
        principal: &Currency,
        principal_value: u128,
    ) -> Result<()> {
        let meter = match fuel {
            Fuel::Fungible { kind, .. } => self.fuel.entry((signer.clone(), *kind)).or_default(),
            Fuel::Intrinsic { .. } => self
                .intrinsic_fuel
                .entry((principal.clone(), principal_value))
                .or_default(),
        };
        *meter = meter
            .checked_sub(fuel.amount())
            .ok_or_else(|| DexError::SettlementFailure("out of fuel".to_string()))?;
        *self.fuel_earned.entry(relayer.clone()).or_default() += fuel.amount();
        Ok(())
    }

    fn refund_native(&mut self, recipient: &AccountId, amount: u128) -> Result<()> {
        self.mint(recipient, &native(), amount);
        Ok(())
    }
}

/// Test signature scheme: a signature is the borsh encoding of the claimed
/// signer and the digest, so it verifies only for the exact intent it was
/// made for.
#[derive(Clone, Debug, Default)]
pub struct EchoSignatures;

impl SignatureRecovery for EchoSignatures {
    fn recover(&self, digest: &[u8; 32], signature: &[u8]) -> Option<AccountId> {
        let (signer, signed_digest) = <(AccountId, [u8; 32])>::try_from_slice(signature).ok()?;
        if &signed_digest == digest {
            Some(signer)
        } else {
            None
        }
    }
}

/// Sign `intent` as `signer` for the deployment at `exchange_id`.
pub fn sign_for<T: Intent>(intent: T, signer: &AccountId, exchange_id: &AccountId) -> Signed<T> {
    let signature = (signer.clone(), intent.digest(exchange_id))
        .try_to_vec()
        .unwrap();
    Signed::new(intent, signature)
}

pub fn sign_as<T: Intent>(intent: T, signer: &AccountId) -> Signed<T> {
    sign_for(intent, signer, &exchange_account())
}

pub fn sign<T: Intent>(intent: T) -> Signed<T> {
    let signer = intent.signer().clone();
    sign_as(intent, &signer)
}

#[derive(Clone, Debug, Default)]
pub struct FixedSupplyOracle {
    supplies: HashMap<AccountId, u128>,
}

impl FixedSupplyOracle {
    pub fn set(&mut self, token: &AccountId, supply: u128) {
        self.supplies.insert(token.clone(), supply);
    }
}

impl SupplyOracle for FixedSupplyOracle {
    fn total_supply(&self, token: &AccountId) -> u128 {
        self.supplies.get(token).copied().unwrap_or_default()
    }
}

/// Exchange with every test currency registered, [relayer] whitelisted and
/// committed events retained.
pub fn new_exchange() -> TestExchange {
    new_exchange_with(
        ExchangeConfig::new(exchange_account(), monitored())
            .with_relayer(relayer())
            .with_retained_events(),
    )
}

pub fn new_exchange_with(config: ExchangeConfig) -> TestExchange {
    let registry = MemoryRegistry::with_currencies(vec![ft_a(), ft_b(), nft(), native(), boost()]);
    Exchange::new(config, registry, EchoSignatures, FixedSupplyOracle::default())
}

pub fn ctx(caller: &AccountId) -> CallContext {
    CallContext::new(caller.clone())
}

/// Trip the breaker of `ex` through its oracle.
pub fn trip_breaker(ex: &mut TestExchange) {
    let threshold = ex.config.supply_threshold.0;
    ex.oracle_mut().set(&monitored()[1], threshold);
    ex.activate_circuit_breaker().unwrap();
}

/// Mint `maker_value` of the maker currency to `maker` and place an order.
pub fn place(
    ex: &mut TestExchange,
    maker: &AccountId,
    pair: &OrderPair,
    maker_value: u128,
    taker_value: u128,
) -> OrderId {
    ex.registry_mut().mint(maker, &pair.maker_currency(), maker_value);
    ex.create_or_update_order(
        &ctx(maker),
        OrderRequest::create(pair.clone(), maker_value, taker_value),
    )
    .unwrap()
}
