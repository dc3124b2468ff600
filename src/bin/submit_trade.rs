// src/bin/submit_trade.rs - Submit a single trade without the dashboard
use clap::Parser;
use dotenv::dotenv;

use trade_dashboard::api::HttpTradeApi;
use trade_dashboard::config::DashboardConfig;
use trade_dashboard::trade_form::{TradeForm, TradeFormDraft, DEFAULT_QUANTITY, DEFAULT_SYMBOL};

#[derive(Parser, Debug)]
#[command(name = "submit_trade")]
#[command(about = "Validate and submit one trade to the trading bot backend")]
struct Args {
    /// Buy (entry) price
    #[arg(long)]
    buy_price: String,

    /// Take-profit price
    #[arg(long)]
    sell_price: String,

    /// Stop-loss price, must be below the buy price
    #[arg(long)]
    stop_loss: String,

    #[arg(long, default_value = DEFAULT_QUANTITY)]
    quantity: String,

    #[arg(long, default_value = DEFAULT_SYMBOL)]
    symbol: String,

    /// Backend base URL (overrides TRADE_API_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn setup_logging(debug: bool) {
    use env_logger::{Builder, Target};
    use log::LevelFilter;

    let mut builder = Builder::from_default_env();
    builder.target(Target::Stderr);

    if debug {
        builder.filter_level(LevelFilter::Debug);
    } else {
        builder.filter_level(LevelFilter::Warn);
    }

    builder.init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let args = Args::parse();
    setup_logging(args.debug);

    let config = match DashboardConfig::from_env(args.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let api = HttpTradeApi::new(&config.api_base_url, config.request_timeout)?;

    let mut form = TradeForm::new();
    form.draft = TradeFormDraft {
        symbol: args.symbol,
        buy_price: args.buy_price,
        sell_price: args.sell_price,
        stop_loss: args.stop_loss,
        quantity: args.quantity,
    };

    match form.submit(&api, config.user_id).await {
        Ok(_) => {
            if let Some(message) = form.success {
                println!("✅ {}", message);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
