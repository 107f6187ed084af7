/// Deduplicates order pairs and hands out compact aliases.
use std::collections::HashMap;

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};

use dubiex_sdk_dex_errors::{DexError, Result};
use dubiex_sdk_dex_types::*;
use dubiex_sdk_macros::*;

#[derive(Clone, Debug, Default, BorshSerialize, BorshDeserialize)]
pub struct PairRegistry {
    pairs: HashMap<PairHash, OrderPair>,
    aliases: HashMap<PairHash, PairAlias>,
    hashes_by_alias: HashMap<PairAlias, PairHash>,
    /// Last alias handed out. Aliases start at 1.
    last_alias: PairAlias,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the alias of a pair, registering it on first use.
    pub fn resolve(&mut self, pair: &OrderPair) -> Result<PairAlias> {
        let hash = pair.hash();
        if let Some(alias) = self.aliases.get(&hash) {
            return Ok(*alias);
        }

        let alias = self
            .last_alias
            .checked_add(1)
            .ok_or(DexError::Overflow { bits: 32 })?;
        self.last_alias = alias;

        self.pairs.insert(hash, pair.clone());
        self.aliases.insert(hash, alias);
        self.hashes_by_alias.insert(alias, hash);
        debug_log!("registered pair {} as alias {}", hash, alias);

        Ok(alias)
    }

    pub fn pair_by_alias(&self, alias: PairAlias) -> Option<&OrderPair> {
        self.hashes_by_alias
            .get(&alias)
            .and_then(|hash| self.pairs.get(hash))
    }

    pub fn pair_by_hash(&self, hash: &PairHash) -> Option<&OrderPair> {
        self.pairs.get(hash)
    }

    pub fn alias_of(&self, hash: &PairHash) -> Option<PairAlias> {
        self.aliases.get(hash).copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
