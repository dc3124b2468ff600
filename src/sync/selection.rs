// src/sync/selection.rs - Which trade's logs are on screen
use tokio::sync::watch;

use crate::types::{Trade, TradeId};

/// Outcome of checking the current selection against a fresh active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Unchanged,
    /// Nothing was selected; the first active trade is picked.
    Initial(TradeId),
    /// The selected trade left the active set (sold or stopped).
    Reassigned { from: TradeId, to: TradeId },
    /// No active trades left. Logs must be emptied right away.
    Cleared,
}

impl Reconciliation {
    pub fn selected(&self, current: Option<TradeId>) -> Option<TradeId> {
        match *self {
            Reconciliation::Unchanged => current,
            Reconciliation::Initial(id) => Some(id),
            Reconciliation::Reassigned { to, .. } => Some(to),
            Reconciliation::Cleared => None,
        }
    }
}

/// Branch order matters: reassignment is only considered for a non-empty set,
/// an empty set always clears.
pub fn reconcile_selection(current: Option<TradeId>, active: &[Trade]) -> Reconciliation {
    match (current, active.first()) {
        (None, Some(first)) => Reconciliation::Initial(first.id),
        (Some(selected), Some(first)) if !active.iter().any(|t| t.id == selected) => {
            Reconciliation::Reassigned {
                from: selected,
                to: first.id,
            }
        }
        (_, None) => Reconciliation::Cleared,
        _ => Reconciliation::Unchanged,
    }
}

/// The only handle that can change the selection. Owned by the trades loop.
pub struct SelectionWriter {
    tx: watch::Sender<Option<TradeId>>,
}

/// Read side of the selection. Cheap to clone; `changed` wakes on every new
/// value.
#[derive(Clone)]
pub struct SelectionReader {
    rx: watch::Receiver<Option<TradeId>>,
}

pub fn selection_channel() -> (SelectionWriter, SelectionReader) {
    let (tx, rx) = watch::channel(None);
    (SelectionWriter { tx }, SelectionReader { rx })
}

impl SelectionWriter {
    pub fn get(&self) -> Option<TradeId> {
        *self.tx.borrow()
    }

    /// Returns true when the value actually changed. Readers are only woken
    /// for real changes.
    pub fn set(&self, selected: Option<TradeId>) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == selected {
                false
            } else {
                *current = selected;
                true
            }
        })
    }

    pub fn subscribe(&self) -> SelectionReader {
        SelectionReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl SelectionReader {
    pub fn current(&self) -> Option<TradeId> {
        *self.rx.borrow()
    }

    /// Reads the value and marks it seen, so `changed` only fires for later
    /// writes.
    pub fn mark_seen(&mut self) -> Option<TradeId> {
        *self.rx.borrow_and_update()
    }

    /// Waits for the next write. False once the writer is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
