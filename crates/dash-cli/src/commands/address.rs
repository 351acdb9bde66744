//! Address commands: balance, history, validation.

use anyhow::{bail, Context, Result};
use chain_btc::address::{parse_address, validate_address};
use clap::Subcommand;
use explorer::HistoryProvider;
use tracing::info;

use crate::context::AppContext;
use crate::output;

#[derive(Subcommand)]
pub enum AddressAction {
    /// Current balance, from the first explorer that answers.
    Balance { address: String },
    /// Transaction history (blockchain.info, mainnet only).
    History {
        address: String,
        /// Show at most this many transactions.
        #[arg(long, default_value = "25")]
        limit: usize,
    },
    /// Check that an address is well formed and belongs to the network.
    Validate { address: String },
}

pub async fn run(action: AddressAction, ctx: &AppContext) -> Result<()> {
    match action {
        AddressAction::Balance { address } => balance(&address, ctx).await,
        AddressAction::History { address, limit } => history(&address, limit, ctx).await,
        AddressAction::Validate { address } => validate(&address, ctx),
    }
}

async fn balance(address: &str, ctx: &AppContext) -> Result<()> {
    let address = address.trim();
    parse_address(address, ctx.network())?;

    let chain = ctx.balance_chain();
    let sat = chain
        .balance(address)
        .await
        .with_context(|| format!("failed to fetch balance of {address}"))?;
    info!(%address, sat, "fetched balance");

    if ctx.json {
        output::print_value(
            &serde_json::json!({
                "address": address,
                "balance_sat": sat,
                "balance_btc": explorer::sat_to_btc(sat as i64),
            }),
            true,
        );
    } else {
        output::print_kv("Address", address);
        output::print_kv("Balance", &output::format_sat(sat as i64));
    }
    Ok(())
}

async fn history(address: &str, limit: usize, ctx: &AppContext) -> Result<()> {
    let address = address.trim();
    parse_address(address, ctx.network())?;

    let Some(client) = ctx.blockchain_info() else {
        bail!("address history is only available on mainnet");
    };
    let mut txs = client
        .fetch_history(address)
        .await
        .with_context(|| format!("failed to fetch history of {address}"))?;
    txs.truncate(limit);

    if ctx.json {
        output::print_value(&txs, true);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = txs
        .iter()
        .map(|tx| {
            vec![
                tx.hash.clone(),
                tx.time.clone(),
                format!("{:+.8}", tx.amount_btc()),
                tx.fee_sat.to_string(),
            ]
        })
        .collect();
    output::print_table(&["Hash", "Time", "Amount (BTC)", "Fee (sat)"], &rows);
    Ok(())
}

fn validate(address: &str, ctx: &AppContext) -> Result<()> {
    let network = ctx.network();
    let address = address.trim();
    if !validate_address(address, network) {
        let reason = parse_address(address, network)
            .err()
            .map(|e| format!(" ({e})"))
            .unwrap_or_default();
        bail!("{address} is not a {network} address{reason}");
    }
    output::print_success(&format!("{address} is a valid {network} address"), ctx.json);
    Ok(())
}
