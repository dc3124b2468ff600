// src/bin/dashboard/app.rs - App state and key handling for the trade dashboard
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use trade_dashboard::api::TradeApi;
use trade_dashboard::config::DashboardConfig;
use trade_dashboard::sync::{DashboardState, SyncHandle, Synchronizer};
use trade_dashboard::trade_form::TradeForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

pub struct App {
    api: Arc<dyn TradeApi>,
    sync: SyncHandle,
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub user_id: i64,

    /// Copy of the synchronizer state taken before each draw.
    pub view: DashboardState,
    pub form: TradeForm,
    pub mode: InputMode,
    /// In-flight submission. It owns a copy of the form and hands it back
    /// with the outcome filled in.
    submission: Option<JoinHandle<TradeForm>>,
}

impl App {
    /// Starts polling immediately.
    pub fn new(api: Arc<dyn TradeApi>, config: &DashboardConfig) -> Self {
        let sync = Synchronizer::new(api.clone(), config.poll_interval).start();

        Self {
            api,
            sync,
            api_base_url: config.api_base_url.clone(),
            poll_interval: config.poll_interval,
            user_id: config.user_id,
            view: DashboardState::default(),
            form: TradeForm::new(),
            mode: InputMode::Browse,
            submission: None,
        }
    }

    pub async fn refresh_view(&mut self) {
        let state = self.sync.state();
        let snapshot = state.read().await.clone();
        self.view = snapshot;
        self.poll_submission().await;
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_some()
    }

    pub fn select_next_trade(&mut self) {
        if let Some(id) = self.view.neighbour_of_selection(1) {
            self.sync.select(id);
        }
    }

    pub fn select_previous_trade(&mut self) {
        if let Some(id) = self.view.neighbour_of_selection(-1) {
            self.sync.select(id);
        }
    }

    /// Starts a submission without waiting for the backend. The form stays
    /// read-only until `poll_submission` picks up the result.
    pub fn submit_form(&mut self) {
        if self.submission.is_some() {
            return;
        }
        self.form.error = None;
        self.form.success = None;

        let mut form = self.form.clone();
        let api = self.api.clone();
        let user_id = self.user_id;
        self.submission = Some(tokio::spawn(async move {
            // Outcome lands in form.error / form.success.
            let _ = form.submit(api.as_ref(), user_id).await;
            form
        }));
    }

    pub async fn poll_submission(&mut self) {
        let finished = matches!(&self.submission, Some(task) if task.is_finished());
        if !finished {
            return;
        }
        let Some(task) = self.submission.take() else {
            return;
        };
        match task.await {
            Ok(form) => {
                let focus = self.form.focus;
                self.form = form;
                self.form.focus = focus;
            }
            Err(e) => {
                log::error!("Trade submission task failed: {}", e);
                self.form.error = Some(format!("Submission failed: {}", e));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }

        match self.mode {
            InputMode::Browse => match key.code {
                KeyCode::Char('q') => return AppAction::Quit,
                KeyCode::Char('r') => self.sync.refresh(),
                KeyCode::Up | KeyCode::Char('k') => self.select_previous_trade(),
                KeyCode::Down | KeyCode::Char('j') => self.select_next_trade(),
                KeyCode::Char('f') | KeyCode::Tab => self.mode = InputMode::Form,
                _ => {}
            },
            InputMode::Form if self.is_submitting() => {
                if key.code == KeyCode::Esc {
                    self.mode = InputMode::Browse;
                }
            }
            InputMode::Form => match key.code {
                KeyCode::Esc => self.mode = InputMode::Browse,
                KeyCode::Tab => self.form.focus_next(),
                KeyCode::BackTab => self.form.focus_previous(),
                KeyCode::Enter => self.submit_form(),
                KeyCode::Backspace => self.form.backspace(),
                KeyCode::Char(c) => self.form.input_char(c),
                _ => {}
            },
        }

        AppAction::Continue
    }

    pub fn shutdown(&self) {
        self.sync.stop();
    }
}
