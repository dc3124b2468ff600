// src/sync/mod.rs
pub mod selection;
pub mod state;
pub mod synchronizer;

pub use selection::{reconcile_selection, Reconciliation};
pub use state::{DashboardState, PollSnapshot, SharedState};
pub use synchronizer::{fetch_snapshot, SyncCommand, SyncHandle, Synchronizer};
