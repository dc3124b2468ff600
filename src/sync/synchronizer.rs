// src/sync/synchronizer.rs - The two poll loops behind the dashboard
//
// Trades loop: price + active + history every interval, applied together,
// then selection reconciliation. It is the only writer of the selection.
// Logs loop: logs of the selected trade every interval, restarted whenever
// the selection changes.
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::api::TradeApi;
use crate::errors::ApiError;
use crate::sync::selection::{
    reconcile_selection, selection_channel, Reconciliation, SelectionReader, SelectionWriter,
};
use crate::sync::state::{DashboardState, PollSnapshot, SharedState};
use crate::types::TradeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    /// User picked an active trade.
    Select(TradeId),
    /// Poll price/active/history now instead of waiting for the timer.
    Refresh,
}

/// Fetches the three batch resources concurrently. Any failure fails the
/// whole batch.
pub async fn fetch_snapshot(api: &dyn TradeApi) -> Result<PollSnapshot, ApiError> {
    let (price, active_trades, history_trades) = tokio::try_join!(
        api.live_price(),
        api.active_trades(),
        api.trade_history()
    )?;

    Ok(PollSnapshot {
        price,
        active_trades,
        history_trades,
    })
}

pub struct Synchronizer {
    api: Arc<dyn TradeApi>,
    state: SharedState,
    interval: Duration,
}

impl Synchronizer {
    pub fn new(api: Arc<dyn TradeApi>, interval: Duration) -> Self {
        Self {
            api,
            state: DashboardState::shared(),
            interval,
        }
    }

    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Spawns both loops. The first poll of each happens right away.
    pub fn start(self) -> SyncHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (writer, reader) = selection_channel();

        log::info!(
            "Starting dashboard sync, polling every {}ms",
            self.interval.as_millis()
        );

        let logs_loop = LogsLoop {
            api: self.api.clone(),
            state: self.state.clone(),
            interval: self.interval,
        };
        let logs_task = tokio::spawn(logs_loop.run(writer.subscribe(), shutdown_rx.clone()));

        let trades_loop = TradesLoop {
            api: self.api,
            state: self.state.clone(),
            selection: writer,
            interval: self.interval,
        };
        let trades_task = tokio::spawn(trades_loop.run(command_rx, shutdown_rx));

        SyncHandle {
            state: self.state,
            selection: reader,
            commands: command_tx,
            shutdown: shutdown_tx,
            tasks: vec![trades_task, logs_task],
        }
    }
}

/// Owner-side handle of the running loops. Dropping it stops them.
pub struct SyncHandle {
    state: SharedState,
    selection: SelectionReader,
    commands: mpsc::UnboundedSender<SyncCommand>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl SyncHandle {
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    pub fn selected_trade_id(&self) -> Option<TradeId> {
        self.selection.current()
    }

    pub fn select(&self, trade_id: TradeId) {
        self.send(SyncCommand::Select(trade_id));
    }

    pub fn refresh(&self) {
        self.send(SyncCommand::Refresh);
    }

    fn send(&self, command: SyncCommand) {
        if self.commands.send(command).is_err() {
            log::warn!("Sync loop is gone, dropping {:?}", command);
        }
    }

    /// Stops both timers. Requests already in flight are left to finish and
    /// their results are thrown away.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    /// Stops the loops and waits until both tasks have exited.
    pub async fn shutdown(mut self) {
        self.stop();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                log::error!("Sync task ended abnormally: {}", e);
            }
        }
        log::info!("Dashboard sync stopped");
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

struct TradesLoop {
    api: Arc<dyn TradeApi>,
    state: SharedState,
    selection: SelectionWriter,
    interval: Duration,
}

impl TradesLoop {
    async fn run(
        self,
        mut commands: mpsc::UnboundedReceiver<SyncCommand>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                command = commands.recv() => match command {
                    Some(SyncCommand::Select(trade_id)) => self.select(trade_id).await,
                    Some(SyncCommand::Refresh) => {
                        self.tick(&shutdown).await;
                        ticker.reset();
                    }
                    None => break,
                },
                _ = ticker.tick() => self.tick(&shutdown).await,
            }
        }
        log::debug!("Trades poll loop exited");
    }

    async fn tick(&self, shutdown: &watch::Receiver<bool>) {
        let result = fetch_snapshot(self.api.as_ref()).await;
        if *shutdown.borrow() {
            log::debug!("Discarding trades poll that finished after shutdown");
            return;
        }

        match result {
            Ok(snapshot) => self.apply(snapshot).await,
            Err(e) => {
                // Stale data stays on screen.
                log::warn!("Dashboard poll failed: {}", e);
                self.state.write().await.last_error = Some(e.to_string());
            }
        }
    }

    async fn apply(&self, snapshot: PollSnapshot) {
        let mut state = self.state.write().await;
        let current = self.selection.get();
        let reconciliation = reconcile_selection(current, &snapshot.active_trades);

        state.apply_snapshot(snapshot, Local::now());

        match reconciliation {
            Reconciliation::Unchanged => {}
            Reconciliation::Initial(id) => log::info!("Selected trade {}", id),
            Reconciliation::Reassigned { from, to } => {
                log::info!("Trade {} left the active set, now following {}", from, to)
            }
            Reconciliation::Cleared => {
                if current.is_some() {
                    log::info!("No active trades left, clearing selection");
                }
                state.logs.clear();
            }
        }

        let selected = reconciliation.selected(current);
        state.selected_trade_id = selected;
        self.selection.set(selected);
    }

    /// Manual pick. Ignored unless the trade is in the last applied active
    /// set, so the selection never points outside it.
    async fn select(&self, trade_id: TradeId) {
        let mut state = self.state.write().await;
        if !state.is_active(trade_id) {
            log::debug!("Ignoring selection of trade {} (not active)", trade_id);
            return;
        }
        state.selected_trade_id = Some(trade_id);
        if self.selection.set(Some(trade_id)) {
            log::info!("Selected trade {}", trade_id);
        }
    }
}

struct LogsLoop {
    api: Arc<dyn TradeApi>,
    state: SharedState,
    interval: Duration,
}

impl LogsLoop {
    async fn run(self, mut selection: SelectionReader, mut shutdown: watch::Receiver<bool>) {
        'session: loop {
            // A fresh timer per selection: the first tick fires immediately.
            let selected = selection.mark_seen();
            let mut ticker = time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.changed() => break 'session,
                    alive = selection.changed() => {
                        if !alive {
                            break 'session;
                        }
                        continue 'session;
                    }
                    _ = ticker.tick() => self.tick(selected, &selection, &shutdown).await,
                }
            }
        }
        log::debug!("Logs poll loop exited");
    }

    /// Requests run on their own task so the loop keeps watching the
    /// selection while one is in flight.
    async fn tick(
        &self,
        selected: Option<TradeId>,
        selection: &SelectionReader,
        shutdown: &watch::Receiver<bool>,
    ) {
        let Some(trade_id) = selected else {
            self.state.write().await.logs.clear();
            return;
        };

        let fetch = LogsFetch {
            api: self.api.clone(),
            state: self.state.clone(),
            selection: selection.clone(),
            shutdown: shutdown.clone(),
        };
        tokio::spawn(fetch.run(trade_id));
    }
}

struct LogsFetch {
    api: Arc<dyn TradeApi>,
    state: SharedState,
    selection: SelectionReader,
    shutdown: watch::Receiver<bool>,
}

impl LogsFetch {
    async fn run(self, trade_id: TradeId) {
        let result = self.api.trade_logs(trade_id).await;
        if *self.shutdown.borrow() {
            log::debug!("Discarding logs for trade {} after shutdown", trade_id);
            return;
        }

        // The trades loop changes the selection only while holding this lock.
        let mut state = self.state.write().await;
        if self.selection.current() != Some(trade_id) {
            log::debug!("Discarding logs for trade {}, selection moved on", trade_id);
            return;
        }

        match result {
            Ok(logs) => state.logs = logs,
            Err(e) => log::warn!("Log poll for trade {} failed: {}", trade_id, e),
        }
    }
}
