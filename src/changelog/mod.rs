//! Per-project change log
//!
//! Records which metadata edits happened under which change reference,
//! with conjunctive search over the recorded fields.

pub mod filter;
pub mod record;
pub mod store;

pub use filter::{filter_changes, ChangeFilter};
pub use record::{ChangeEntry, ChangeRecord, ChangeType};
pub use store::ChangeLogStore;
