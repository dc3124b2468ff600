// src/bin/dashboard/main.rs - Trade dashboard entry point
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenv::dotenv;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use trade_dashboard::api::HttpTradeApi;
use trade_dashboard::config::DashboardConfig;

mod app;
mod ui;

use app::{App, AppAction};
use ui::ui;

#[derive(Parser, Debug)]
#[command(name = "trade_dashboard")]
#[command(about = "Live price, active trades, logs and history from the trading bot backend")]
struct Args {
    /// Backend base URL (overrides TRADE_API_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Poll interval in milliseconds (overrides POLL_INTERVAL_MS)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// The terminal belongs to the UI, so logs go to a file.
fn setup_file_logging(path: &Path, debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:<5} {t} - {m}{n}",
        )))
        .build(path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .logger(Logger::builder().build("hyper", LevelFilter::Warn))
        .logger(Logger::builder().build("reqwest", LevelFilter::Warn))
        .build(Root::builder().appender("logfile").build(level))?;

    log4rs::init_config(config)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        app.refresh_view().await;
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key) == AppAction::Quit {
                    break;
                }
            }
        }
    }

    app.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let args = Args::parse();

    // No backend, no dashboard: fail before touching the terminal.
    let config = match DashboardConfig::from_env(args.api_url.as_deref())
        .and_then(|c| c.with_overrides(None, args.interval_ms))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            eprintln!("Set TRADE_API_BASE_URL (or pass --api-url), e.g. http://127.0.0.1:5000");
            std::process::exit(2);
        }
    };

    setup_file_logging(&config.log_file, args.debug)?;
    log::info!(
        "Trade dashboard starting: api={} interval={}ms user_id={}",
        config.api_base_url,
        config.poll_interval.as_millis(),
        config.user_id
    );

    let api = Arc::new(HttpTradeApi::new(&config.api_base_url, config.request_timeout)?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(api, &config);
    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("Dashboard terminated: {}", err);
        println!("{:?}", err)
    }

    log::info!("Trade dashboard stopped");
    Ok(())
}
