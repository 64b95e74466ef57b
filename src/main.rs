use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::Settings;
use executor::{BracketParams, LegResult, OcoParams, OrderExecutor, RetryPolicy, TwapParams};
use journal::{export_csv, FileJournal, Journal};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Azimuth order CLI.
#[tokio::main]
async fn main() {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();
    init_logging();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = match configuration::load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Market(args) => handle_market(args, &settings).await,
        Commands::Limit(args) => handle_limit(args, &settings).await,
        Commands::StopLimit(args) => handle_stop_limit(args, &settings).await,
        Commands::Bracket(args) => handle_bracket(args, &settings).await,
        Commands::Oco(args) => handle_oco(args, &settings).await,
        Commands::Twap(args) => handle_twap(args, &settings).await,
        Commands::Export(args) => handle_export(args, &settings),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Order execution CLI for Binance USDT-M futures.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a MARKET order.
    Market(MarketArgs),
    /// Place a LIMIT order (GTC).
    Limit(LimitArgs),
    /// Place a stop-limit order (STOP with trigger and limit prices).
    StopLimit(StopLimitArgs),
    /// Place an entry order plus take-profit and stop-loss exits.
    Bracket(BracketArgs),
    /// Place an emulated OCO pair: take-profit plus stop-loss.
    Oco(OcoArgs),
    /// Execute a quantity as evenly paced market-order slices.
    Twap(TwapArgs),
    /// Export the audit journal to a CSV file.
    Export(ExportArgs),
}

#[derive(Parser)]
struct MarketArgs {
    /// Symbol to trade, e.g. BTCUSDT (defaults to DEFAULT_SYMBOL).
    #[arg(long)]
    symbol: Option<String>,

    /// BUY or SELL.
    side: String,

    /// Order quantity.
    quantity: String,
}

#[derive(Parser)]
struct LimitArgs {
    /// Symbol to trade, e.g. BTCUSDT (defaults to DEFAULT_SYMBOL).
    #[arg(long)]
    symbol: Option<String>,

    /// BUY or SELL.
    side: String,

    /// Order quantity.
    quantity: String,

    /// Limit price.
    price: String,
}

#[derive(Parser)]
struct StopLimitArgs {
    /// Symbol to trade, e.g. BTCUSDT (defaults to DEFAULT_SYMBOL).
    #[arg(long)]
    symbol: Option<String>,

    /// BUY or SELL.
    side: String,

    /// Order quantity.
    quantity: String,

    /// Trigger price.
    #[arg(long)]
    stop_price: String,

    /// Limit price used once the stop triggers.
    #[arg(long)]
    limit_price: String,

    /// Time in force.
    #[arg(long, default_value = "GTC", value_parser = ["GTC", "IOC", "FOK"])]
    time_in_force: String,
}

#[derive(Parser)]
struct BracketArgs {
    /// Symbol to trade, e.g. BTCUSDT (defaults to DEFAULT_SYMBOL).
    #[arg(long)]
    symbol: Option<String>,

    /// BUY or SELL for the entry side.
    side: String,

    /// Total entry quantity.
    quantity: String,

    /// Entry order type.
    #[arg(long, default_value = "MARKET", value_parser = ["MARKET", "LIMIT"])]
    entry_type: String,

    /// Entry limit price, required when --entry-type LIMIT.
    #[arg(long)]
    price: Option<String>,

    /// Take-profit price.
    #[arg(long)]
    take_profit: String,

    /// Stop-loss trigger price.
    #[arg(long)]
    stop_price: String,

    /// Optional stop-loss limit price; omitted means a STOP_MARKET leg.
    #[arg(long)]
    stop_limit_price: Option<String>,
}

#[derive(Parser)]
struct OcoArgs {
    /// Symbol to trade, e.g. BTCUSDT (defaults to DEFAULT_SYMBOL).
    #[arg(long)]
    symbol: Option<String>,

    /// BUY or SELL for the exit side.
    side: String,

    /// Order quantity.
    quantity: String,

    /// Take-profit price.
    #[arg(long)]
    take_profit: String,

    /// Stop-loss trigger price.
    #[arg(long)]
    stop_price: String,

    /// Optional stop-loss limit price; omitted means a STOP_MARKET leg.
    #[arg(long)]
    stop_limit_price: Option<String>,
}

#[derive(Parser)]
struct TwapArgs {
    /// Symbol to trade, e.g. BTCUSDT (defaults to DEFAULT_SYMBOL).
    #[arg(long)]
    symbol: Option<String>,

    /// BUY or SELL.
    side: String,

    /// Total quantity to execute.
    quantity: String,

    /// Number of slices.
    #[arg(long, default_value_t = 5)]
    slices: u32,

    /// Seconds between slices.
    #[arg(long, default_value_t = 10)]
    interval_sec: u64,
}

#[derive(Parser)]
struct ExportArgs {
    /// Destination CSV file.
    #[arg(long, default_value = "trades.csv")]
    out: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Wires the journal, the mode-matching client, and the retry policy into
/// an executor.
fn build_executor(settings: &Settings) -> anyhow::Result<OrderExecutor> {
    let journal: Arc<dyn Journal> = Arc::new(
        FileJournal::create(&settings.journal_path).with_context(|| {
            format!(
                "Failed to open the journal at {}",
                settings.journal_path.display()
            )
        })?,
    );
    let client = api_client::build_client(settings, journal.clone());
    if client.is_dry_run() {
        tracing::info!("dry-run mode: orders are simulated, nothing reaches the exchange");
    }
    Ok(OrderExecutor::new(
        client,
        journal,
        RetryPolicy::from_settings(settings),
    ))
}

fn resolve_symbol(arg: Option<&str>, settings: &Settings) -> String {
    arg.unwrap_or(&settings.default_symbol).trim().to_uppercase()
}

/// Maps executor failures to the messages printed for single orders.
fn order_error(e: executor::ExecutorError) -> anyhow::Error {
    match e {
        executor::ExecutorError::Validation(e) => anyhow::anyhow!("{}", e),
        executor::ExecutorError::Api(e) => anyhow::anyhow!("Order failed: {}", e),
    }
}

async fn handle_market(args: MarketArgs, settings: &Settings) -> anyhow::Result<()> {
    let executor = build_executor(settings)?;
    let symbol = resolve_symbol(args.symbol.as_deref(), settings);
    let side = args.side.trim().to_uppercase();

    let ack = executor
        .place_market(&symbol, &args.side, &args.quantity)
        .await
        .map_err(order_error)?;

    println!(
        "OK: MARKET {} {} {}, orderId={}",
        side, args.quantity, symbol, ack.order_id
    );
    Ok(())
}

async fn handle_limit(args: LimitArgs, settings: &Settings) -> anyhow::Result<()> {
    let executor = build_executor(settings)?;
    let symbol = resolve_symbol(args.symbol.as_deref(), settings);
    let side = args.side.trim().to_uppercase();

    let ack = executor
        .place_limit(&symbol, &args.side, &args.quantity, &args.price)
        .await
        .map_err(order_error)?;

    println!(
        "OK: LIMIT {} {} {} @ {}, orderId={}",
        side, args.quantity, symbol, args.price, ack.order_id
    );
    Ok(())
}

async fn handle_stop_limit(args: StopLimitArgs, settings: &Settings) -> anyhow::Result<()> {
    let executor = build_executor(settings)?;
    let symbol = resolve_symbol(args.symbol.as_deref(), settings);
    let side = args.side.trim().to_uppercase();

    let ack = executor
        .place_stop_limit(
            &symbol,
            &args.side,
            &args.quantity,
            &args.stop_price,
            &args.limit_price,
            &args.time_in_force,
        )
        .await
        .map_err(order_error)?;

    println!(
        "OK: STOP-LIMIT {} {} {}, stop={}, limit={}, tif={}, orderId={}",
        side, args.quantity, symbol, args.stop_price, args.limit_price, args.time_in_force,
        ack.order_id
    );
    Ok(())
}

async fn handle_bracket(args: BracketArgs, settings: &Settings) -> anyhow::Result<()> {
    let executor = build_executor(settings)?;
    let params = BracketParams {
        symbol: resolve_symbol(args.symbol.as_deref(), settings),
        side: args.side,
        quantity: args.quantity,
        entry_kind: args.entry_type,
        entry_price: args.price,
        take_profit: args.take_profit,
        stop_price: args.stop_price,
        stop_limit_price: args.stop_limit_price,
    };

    let report = executor.place_bracket(&params).await.map_err(|e| match e {
        executor::ExecutorError::Validation(e) => anyhow::anyhow!("{}", e),
        executor::ExecutorError::Api(e) => anyhow::anyhow!("Entry failed: {}", e),
    })?;

    println!(
        "OK: Entry placed ({}) orderId={}, linkId={}",
        report.entry_kind.label(),
        report.entry_order_id,
        report.link_id
    );
    match &report.take_profit {
        LegResult::Placed { order_id } => println!("OK: TP placed orderId={}", order_id),
        LegResult::Failed { error } => println!("TP failed: {}", error),
    }
    match &report.stop_loss {
        LegResult::Placed { order_id } => println!("OK: SL placed orderId={}", order_id),
        LegResult::Failed { error } => println!("SL failed: {}", error),
    }
    println!("Note: auto-cancel on fill is not implemented; exit legs stay working until filled or cancelled.");
    Ok(())
}

async fn handle_oco(args: OcoArgs, settings: &Settings) -> anyhow::Result<()> {
    let executor = build_executor(settings)?;
    let params = OcoParams {
        symbol: resolve_symbol(args.symbol.as_deref(), settings),
        side: args.side,
        quantity: args.quantity,
        take_profit: args.take_profit,
        stop_price: args.stop_price,
        stop_limit_price: args.stop_limit_price,
    };

    let report = executor.place_oco(&params).await.map_err(|e| match e {
        executor::ExecutorError::Validation(e) => anyhow::anyhow!("{}", e),
        executor::ExecutorError::Api(e) => anyhow::anyhow!("OCO failed: {}", e),
    })?;

    println!(
        "OK: OCO linkId={} TP orderId={} SL orderId={}",
        report.link_id, report.tp_order_id, report.sl_order_id
    );
    println!("Note: auto-cancel on fill is not implemented; filling one leg leaves the other working.");
    Ok(())
}

async fn handle_twap(args: TwapArgs, settings: &Settings) -> anyhow::Result<()> {
    let executor = build_executor(settings)?;
    let params = TwapParams {
        symbol: resolve_symbol(args.symbol.as_deref(), settings),
        side: args.side.trim().to_uppercase(),
        quantity: args.quantity,
        slices: args.slices,
        interval_sec: args.interval_sec,
    };

    // Ctrl+C stops the run at the next inter-slice wait.
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handler_token.cancel();
        }
    });

    println!(
        "Starting TWAP: {} {} {} over {} slices, {}s apart",
        params.quantity, params.symbol, params.side, params.slices, params.interval_sec
    );

    let report = executor
        .place_twap(&params, cancel)
        .await
        .map_err(order_error)?;

    if report.cancelled {
        println!(
            "TWAP cancelled: {}/{} executed, linkId={}",
            report.executed_qty, report.total_qty, report.link_id
        );
    } else {
        println!(
            "TWAP complete: {}/{} executed, linkId={}",
            report.executed_qty, report.total_qty, report.link_id
        );
    }
    Ok(())
}

fn handle_export(args: ExportArgs, settings: &Settings) -> anyhow::Result<()> {
    if !settings.journal_path.exists() {
        println!("Log not found: {}", settings.journal_path.display());
        return Ok(());
    }

    let count = export_csv(&settings.journal_path, &args.out).with_context(|| {
        format!(
            "Failed to export {} to {}",
            settings.journal_path.display(),
            args.out.display()
        )
    })?;

    if count == 0 {
        println!("No log entries to export.");
    } else {
        println!("Exported {} records to {}", count, args.out.display());
    }
    Ok(())
}
