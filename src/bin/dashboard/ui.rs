// src/bin/dashboard/ui.rs - Rendering for the trade dashboard
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use trade_dashboard::format::{
    format_date_time, format_optional_usd, format_percent, format_signed_usd, format_time,
    format_usd,
};
use trade_dashboard::trade_form::FormField;
use trade_dashboard::types::{Direction as PriceDirection, TradeStatus};

use crate::app::{App, InputMode};

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(7),  // Price + form
            Constraint::Min(8),     // Active trades + logs
            Constraint::Length(10), // History
            Constraint::Length(3),  // Controls
        ])
        .split(size);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[2]);

    render_header(f, app, rows[0]);
    render_price_card(f, app, top[0]);
    render_trade_form(f, app, top[1]);
    render_active_trades(f, app, middle[0]);
    render_logs(f, app, middle[1]);
    render_history(f, app, rows[3]);
    render_help(f, app, rows[4]);
}

fn status_color(status: TradeStatus) -> Color {
    match status {
        TradeStatus::Pending => Color::Yellow,
        TradeStatus::Bought => Color::Blue,
        TradeStatus::Sold => Color::Green,
        TradeStatus::Stopped => Color::Red,
        TradeStatus::Unknown => Color::Gray,
    }
}

fn pnl_color(value: Option<f64>) -> Color {
    match value {
        Some(v) if v > 0.0 => Color::Green,
        Some(v) if v < 0.0 => Color::Red,
        _ => Color::Gray,
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header_block = Block::default()
        .borders(Borders::ALL)
        .title("🤖 Crypto Bot Platform")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan));

    let cadence = app.poll_interval.as_secs_f64();
    let mut spans = vec![
        Span::styled(
            format!("API: {} | ", app.api_base_url),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Smart Polling • {}s", cadence),
            Style::default().fg(Color::Gray),
        ),
    ];

    if let Some(updated) = app.view.last_updated {
        spans.push(Span::styled(
            format!(
                " | Updated: {} | Updates: {}",
                updated.format("%H:%M:%S"),
                app.view.update_count
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(error) = &app.view.last_error {
        spans.push(Span::styled(
            format!(" | ⚠ {}", error),
            Style::default().fg(Color::Red),
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(header_block)
        .alignment(Alignment::Center);

    f.render_widget(header, area);
}

fn render_price_card(f: &mut Frame, app: &App, area: Rect) {
    let label = app
        .view
        .price
        .as_ref()
        .and_then(|p| p.symbol.clone())
        .unwrap_or_else(|| "BTC / USD".to_string());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("💰 {}", label))
        .border_style(Style::default().fg(Color::Green));

    let mut lines = Vec::new();

    match &app.view.price {
        Some(price) => {
            lines.push(Line::from(Span::styled(
                format!("${}", format_usd(price.price)),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));

            match price.day_change() {
                Some(change) => {
                    let (arrow, color) = match change.direction {
                        PriceDirection::Up => ("▲", Color::Green),
                        PriceDirection::Down => ("▼", Color::Red),
                        PriceDirection::Flat => ("•", Color::Gray),
                    };
                    lines.push(Line::from(Span::styled(
                        format!(
                            "{} 24h: {} ({})",
                            arrow,
                            format_signed_usd(change.change),
                            format_percent(change.percent)
                        ),
                        Style::default().fg(color),
                    )));
                }
                None => lines.push(Line::from(Span::styled(
                    "24h change unavailable",
                    Style::default().fg(Color::DarkGray),
                ))),
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Gray),
        ))),
    }

    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, area);
}

fn render_trade_form(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == InputMode::Form;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(if app.is_submitting() {
            "📝 Trade Setup (submitting...)"
        } else if editing {
            "📝 Trade Setup (editing)"
        } else {
            "📝 Trade Setup"
        })
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::Gray }));

    let mut field_spans = Vec::new();
    for field in FormField::ALL {
        let focused = editing && app.form.focus == field;
        let value = app.form.draft.field(field);
        let shown = if focused {
            format!("{}▏", value)
        } else if value.is_empty() {
            "…".to_string()
        } else {
            value.to_string()
        };

        let style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        field_spans.push(Span::styled(
            format!("{}: ", field.label()),
            Style::default().fg(Color::Gray),
        ));
        field_spans.push(Span::styled(format!("[{}]", shown), style));
        field_spans.push(Span::raw("  "));
    }

    let mut lines = vec![Line::from(field_spans), Line::from("")];

    if let Some(error) = &app.form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(success) = &app.form.success {
        lines.push(Line::from(Span::styled(
            success.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_active_trades(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("📈 Active Trades ({})", app.view.active_trades.len()))
        .border_style(Style::default().fg(Color::Blue));

    if app.view.active_trades.is_empty() {
        let empty = Paragraph::new("No active trades")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        "", "ID", "Symbol", "Current", "Status", "Buy", "TP", "SL", "Unrealized",
    ])
    .style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .view
        .active_trades
        .iter()
        .map(|t| {
            let selected = app.view.selected_trade_id == Some(t.id);
            let row = Row::new(vec![
                Cell::from(if selected { "▶" } else { "" }),
                Cell::from(t.id.to_string()),
                Cell::from(t.symbol.clone()),
                Cell::from(format_optional_usd(t.current_price)),
                Cell::from(t.status.text().to_string())
                    .style(Style::default().fg(status_color(t.status))),
                Cell::from(format_usd(t.buy_price)),
                Cell::from(format_optional_usd(t.sell_price)),
                Cell::from(format_optional_usd(t.stop_loss)),
                Cell::from(format_optional_usd(t.unrealized_pnl))
                    .style(Style::default().fg(pnl_color(t.unrealized_pnl))),
            ]);

            if selected {
                row.style(Style::default().bg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows)
        .header(header)
        .block(block)
        .widths(&widths);

    f.render_widget(table, area);
}

fn render_logs(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.view.selected_trade_id {
        Some(id) => format!("📜 Live Logs (trade {})", id),
        None => "📜 Live Logs".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Magenta));

    if app.view.selected_trade_id.is_none() {
        let hint = Paragraph::new("Select a trade to view logs")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, area);
        return;
    }

    // Newest entries are last; keep the tail that fits.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = app.view.logs.len().saturating_sub(visible);

    let lines: Vec<Line> = app
        .view
        .logs
        .iter()
        .skip(skip)
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", format_time(&entry.timestamp)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  @ {}", format_optional_usd(entry.price)),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, area);
}

fn render_history(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("📚 Trade History ({})", app.view.history_trades.len()))
        .border_style(Style::default().fg(Color::Gray));

    if app.view.history_trades.is_empty() {
        let empty = Paragraph::new("No completed trades yet")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["ID", "Symbol", "Status", "Buy", "Exit", "P&L", "Time"]).style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .view
        .history_trades
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(t.symbol.clone()),
                Cell::from(t.status.text().to_string())
                    .style(Style::default().fg(status_color(t.status))),
                Cell::from(format_usd(t.buy_price)),
                Cell::from(format_optional_usd(t.exit_price)),
                Cell::from(format_optional_usd(t.pnl)).style(Style::default().fg(pnl_color(t.pnl))),
                Cell::from(format_date_time(&t.created_at)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Min(19),
    ];

    let table = Table::new(rows)
        .header(header)
        .block(block)
        .widths(&widths);

    f.render_widget(table, area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let help_block = Block::default()
        .borders(Borders::ALL)
        .title("🔧 Controls")
        .border_style(Style::default().fg(Color::Gray));

    let help_text = match app.mode {
        InputMode::Browse => {
            "'q' quit | 'r' refresh | ↑↓ select trade | 'f'/Tab edit trade form"
        }
        InputMode::Form => {
            "Tab/Shift-Tab next/prev field | Enter submit | Backspace delete | Esc back"
        }
    };

    let help = Paragraph::new(help_text)
        .block(help_block)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(help, area);
}
