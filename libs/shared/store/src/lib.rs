pub mod collection;
pub mod ledger;

pub use collection::Collection;
pub use ledger::{SlotLedgerStore, StoreError};
