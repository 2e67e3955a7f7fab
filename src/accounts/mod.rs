//! Account data subsystem.
//!
//! # Data Flow
//! ```text
//! ReserveFundsRequest target (account number | debit card number)
//!     → resolver.rs (lookup via AccountStore, good-standing checks)
//!     → canonical account number
//!
//! Overdraft scan:
//!     → store.rs AccountStore::get_overdraft_instructions (ordered by sequence)
//!     → types.rs OverdraftInstruction::is_eligible
//! ```
//!
//! # Design Decisions
//! - The store is read-only; nothing in this service writes account data
//! - Good standing is a single lifecycle code, anything else is unusable
//! - memory.rs backs the store with concurrent maps loaded from a JSON seed

pub mod memory;
pub mod resolver;
pub mod store;
pub mod types;

pub use memory::InMemoryAccountStore;
pub use resolver::{AccountResolver, AccountTarget};
pub use store::{AccountStore, StoreError};
pub use types::{Account, DebitCard, LifecycleStatus, OverdraftInstruction};
