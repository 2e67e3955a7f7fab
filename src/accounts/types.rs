//! Account, debit card and overdraft instruction snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle code that marks an account, card or instruction as usable.
pub const EFFECTIVE_CODE: &str = "EF";

/// Lifecycle state of an account, card or overdraft instruction.
///
/// Only the effective code counts as good standing; every other code is carried
/// verbatim so it can be logged, but is never usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LifecycleStatus {
    Effective,
    Other(String),
}

impl LifecycleStatus {
    pub fn is_good_standing(&self) -> bool {
        matches!(self, LifecycleStatus::Effective)
    }

    pub fn code(&self) -> &str {
        match self {
            LifecycleStatus::Effective => EFFECTIVE_CODE,
            LifecycleStatus::Other(code) => code,
        }
    }
}

impl From<String> for LifecycleStatus {
    fn from(code: String) -> Self {
        if code == EFFECTIVE_CODE {
            LifecycleStatus::Effective
        } else {
            LifecycleStatus::Other(code)
        }
    }
}

impl From<&str> for LifecycleStatus {
    fn from(code: &str) -> Self {
        LifecycleStatus::from(code.to_string())
    }
}

impl From<LifecycleStatus> for String {
    fn from(status: LifecycleStatus) -> Self {
        status.code().to_string()
    }
}

impl std::fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A bank account as seen by the reservation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_number: String,
    pub lifecycle_status: LifecycleStatus,
}

impl Account {
    pub fn in_good_standing(&self) -> bool {
        self.lifecycle_status.is_good_standing()
    }
}

/// A debit card. Each card maps to exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitCard {
    pub debit_card_number: String,
    pub lifecycle_status: LifecycleStatus,
    pub account_number: String,
}

impl DebitCard {
    pub fn in_good_standing(&self) -> bool {
        self.lifecycle_status.is_good_standing()
    }
}

/// A configured fallback account for a primary account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdraftInstruction {
    /// Account the instruction protects.
    pub account_number: String,
    /// Account drawn from when the protected account is short.
    pub overdraft_account: Account,
    pub lifecycle_status: LifecycleStatus,
    /// Cascade order, ascending.
    pub sequence: u32,
    pub effective_start: DateTime<Utc>,
    /// `None` means the instruction never expires.
    pub effective_end: Option<DateTime<Utc>>,
}

impl OverdraftInstruction {
    /// Whether the instruction may be tried at `now`.
    ///
    /// The instruction must be effective, inside its validity window
    /// (start inclusive, end exclusive), and point at an account in good standing.
    pub fn is_eligible(&self, now: DateTime<Utc>) -> bool {
        self.lifecycle_status.is_good_standing()
            && now >= self.effective_start
            && self.effective_end.map_or(true, |end| now < end)
            && self.overdraft_account.in_good_standing()
    }
}
