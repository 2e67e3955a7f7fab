//! In-memory account store, optionally seeded from a JSON file.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use crate::accounts::store::{AccountStore, StoreError, StoreResult};
use crate::accounts::types::{Account, DebitCard, LifecycleStatus, OverdraftInstruction};

/// Overdraft instruction as stored: the overdraft account is referenced by number
/// and joined on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionRow {
    pub account_number: String,
    pub overdraft_account_number: String,
    pub lifecycle_status: LifecycleStatus,
    pub sequence: u32,
    pub effective_start: DateTime<Utc>,
    #[serde(default)]
    pub effective_end: Option<DateTime<Utc>>,
}

/// Layout of the seed file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSeed {
    pub accounts: Vec<Account>,
    pub debit_cards: Vec<DebitCard>,
    pub overdraft_instructions: Vec<InstructionRow>,
}

/// A thread-safe account store backed by concurrent maps.
///
/// Cloning is cheap; clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<DashMap<String, Account>>,
    debit_cards: Arc<DashMap<String, DebitCard>>,
    instructions: Arc<DashMap<String, Vec<InstructionRow>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an already parsed seed.
    pub fn from_seed(seed: AccountSeed) -> Self {
        let store = Self::new();
        for account in seed.accounts {
            store.insert_account(account);
        }
        for card in seed.debit_cards {
            store.insert_debit_card(card);
        }
        for row in seed.overdraft_instructions {
            store.insert_instruction(row);
        }
        store
    }

    /// Load from a JSON seed file.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let seed: AccountSeed = serde_json::from_reader(BufReader::new(file))?;
        let store = Self::from_seed(seed);
        tracing::info!(
            path = %path.display(),
            accounts = store.accounts.len(),
            debit_cards = store.debit_cards.len(),
            "Loaded account seed"
        );
        Ok(store)
    }

    pub fn insert_account(&self, account: Account) {
        self.accounts.insert(account.account_number.clone(), account);
    }

    pub fn insert_debit_card(&self, card: DebitCard) {
        self.debit_cards.insert(card.debit_card_number.clone(), card);
    }

    /// Add an instruction, keeping the per-account list ordered by sequence.
    pub fn insert_instruction(&self, row: InstructionRow) {
        let mut rows = self.instructions.entry(row.account_number.clone()).or_default();
        rows.push(row);
        rows.sort_by_key(|r| r.sequence);
    }

    fn join_instruction(&self, row: &InstructionRow) -> StoreResult<OverdraftInstruction> {
        let overdraft_account = self
            .accounts
            .get(&row.overdraft_account_number)
            .map(|r| r.value().clone())
            .ok_or_else(|| {
                StoreError::Invalid(format!(
                    "overdraft instruction {} -> {} references an unknown account",
                    row.account_number, row.overdraft_account_number
                ))
            })?;

        Ok(OverdraftInstruction {
            account_number: row.account_number.clone(),
            overdraft_account,
            lifecycle_status: row.lifecycle_status.clone(),
            sequence: row.sequence,
            effective_start: row.effective_start,
            effective_end: row.effective_end,
        })
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get_account(&self, account_number: &str) -> StoreResult<Account> {
        tracing::debug!(account_number, "get_account");
        self.accounts
            .get(account_number)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::NotFound(format!("Account {}", account_number)))
    }

    async fn get_debit_card_and_account(
        &self,
        debit_card_number: &str,
    ) -> StoreResult<(DebitCard, Account)> {
        tracing::debug!(debit_card_number, "get_debit_card_and_account");
        let card = self
            .debit_cards
            .get(debit_card_number)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::NotFound(format!("Debit card {}", debit_card_number)))?;

        let account = self
            .accounts
            .get(&card.account_number)
            .map(|r| r.value().clone())
            .ok_or_else(|| {
                StoreError::Invalid(format!(
                    "debit card {} is linked to unknown account {}",
                    debit_card_number, card.account_number
                ))
            })?;

        Ok((card, account))
    }

    async fn get_overdraft_instructions(
        &self,
        account_number: &str,
    ) -> StoreResult<Vec<OverdraftInstruction>> {
        let rows = self
            .instructions
            .get(account_number)
            .map(|r| r.value().clone())
            .unwrap_or_default();

        if rows.is_empty() {
            return Err(StoreError::NotFound(format!(
                "Overdraft instructions for account {}",
                account_number
            )));
        }

        let instructions = rows
            .iter()
            .map(|row| self.join_instruction(row))
            .collect::<StoreResult<Vec<_>>>()?;

        tracing::debug!(account_number, count = instructions.len(), "get_overdraft_instructions");
        Ok(instructions)
    }
}
