//! Value-transfer abstraction over the hosting ledger.

mod memory;
mod traits;

pub use memory::InMemoryLedger;
pub use traits::{Ledger, LedgerError};
