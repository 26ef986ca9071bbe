//! checkout-runner: headless driver for the storefront checkout risk core.
//!
//! Usage:
//!   checkout-runner --orders orders.json [--data-dir ./data]
//!   checkout-runner --ipc-mode [--data-dir ./data]

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use storefront_core::{
    config::CheckoutConfig,
    fraud::FraudEvaluator,
    geo::TableGeoResolver,
    history::InMemoryOrderHistory,
    payments::PaymentDispatcher,
    types::{CardDetails, OrderSnapshot, PaymentRequest, RiskLevel},
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    EvaluateOrder {
        order: OrderSnapshot,
    },
    ReviewOrder {
        order: OrderSnapshot,
    },
    ProcessPayment {
        method: String,
        request: PaymentRequest,
        #[serde(default)]
        card: Option<CardDetails>,
    },
    CheckLogin {
        buyer_id: String,
        ip: String,
        user_agent: String,
        at: chrono::DateTime<chrono::Utc>,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");
    let orders_path = args
        .windows(2)
        .find(|w| w[0] == "--orders")
        .map(|w| w[1].to_string());

    let mut config = CheckoutConfig::load(data_dir)?;
    config.payments.apply_env();
    log::info!(
        "loaded config from {data_dir}: {} high-risk countries, {} blocked BINs",
        config.fraud.high_risk_countries.len(),
        config.fraud.bin_blocklist.len()
    );

    let history = Arc::new(InMemoryOrderHistory::new(chrono::Duration::hours(
        config.fraud.velocity_window_hours,
    )));
    let geo = Arc::new(TableGeoResolver::new(config.geo_table.clone()));
    let evaluator = FraudEvaluator::new(config.fraud.clone(), history, geo);
    let dispatcher = PaymentDispatcher::new(config.payments.clone());

    if ipc_mode {
        run_ipc_loop(&evaluator, &dispatcher)
    } else if let Some(path) = orders_path {
        run_batch(&evaluator, &path)
    } else {
        eprintln!("usage: checkout-runner --orders <file> | --ipc-mode [--data-dir <dir>]");
        std::process::exit(2);
    }
}

/// Evaluate a JSON array of order snapshots, one verdict per line, then a
/// tally by risk level.
fn run_batch(evaluator: &FraudEvaluator, path: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    let orders: Vec<OrderSnapshot> = serde_json::from_str(&content)?;

    let mut counts = [0usize; 3];
    for order in &orders {
        let verdict = evaluator.evaluate(order);
        counts[verdict.risk_level as usize] += 1;
        println!("{}", serde_json::to_string(&verdict)?);
    }

    println!();
    println!("=== BATCH SUMMARY ===");
    println!("  orders: {}", orders.len());
    println!("  low:    {}", counts[RiskLevel::Low as usize]);
    println!("  medium: {}", counts[RiskLevel::Medium as usize]);
    println!("  high:   {}", counts[RiskLevel::High as usize]);
    Ok(())
}

/// Newline-delimited JSON command loop on stdin/stdout. Malformed input is
/// answered with an error object and the loop continues.
fn run_ipc_loop(evaluator: &FraudEvaluator, dispatcher: &PaymentDispatcher) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::EvaluateOrder { order } => {
                let verdict = evaluator.evaluate(&order);
                writeln!(stdout, "{}", serde_json::to_string(&verdict)?)?;
            }
            IpcCommand::ReviewOrder { order } => {
                let decision = evaluator.review_decision(&order);
                writeln!(stdout, "{}", serde_json::to_string(&decision)?)?;
            }
            IpcCommand::ProcessPayment {
                method,
                request,
                card,
            } => {
                let outcome = dispatcher.process_payment(&method, &request, card.as_ref());
                writeln!(stdout, "{}", serde_json::to_string(&outcome)?)?;
            }
            IpcCommand::CheckLogin {
                buyer_id,
                ip,
                user_agent,
                at,
            } => {
                let check = evaluator.check_login_attempt(&buyer_id, &ip, &user_agent, at);
                writeln!(stdout, "{}", serde_json::to_string(&check)?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}
