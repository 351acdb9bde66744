//! Transaction commands: create and sign a payment, decode by hex or txid.

use anyhow::{Context, Result};
use chain_btc::decode::DecodedTransaction;
use chain_btc::transaction::SpendScript;
use clap::Subcommand;
use crypto_utils::ZeroizingString;
use wallet_core::{
    create_transaction, export_transaction_json, lookup_transaction, resolve_fee,
    CreateTransactionRequest, CreatedTransaction, FeeSummary,
};

use crate::context::AppContext;
use crate::output;

#[derive(Subcommand)]
pub enum TxAction {
    /// Build and sign a payment. Nothing is broadcast.
    Create {
        /// Signing key in WIF.
        #[arg(long, env = "BTCDASH_WIF", hide_env_values = true)]
        wif: String,
        /// Destination address.
        #[arg(long)]
        to: String,
        /// Amount in satoshis.
        #[arg(long)]
        amount: u64,
        /// Absolute fee in satoshis.
        #[arg(long)]
        fee: u64,
        /// Spend from the key's native SegWit address instead of its legacy one.
        #[arg(long)]
        segwit: bool,
        /// Also write the transaction to a JSON file in the export directory.
        #[arg(long)]
        export: bool,
    },
    /// Decode a raw transaction, or fetch one by txid and decode it.
    Decode {
        /// Raw transaction hex or a 64-character txid.
        query: String,
        /// Look up the spent outputs and report the fee.
        #[arg(long)]
        with_fee: bool,
        /// Address the inputs were paid to, used to speed up the fee lookup.
        #[arg(long, requires = "with_fee")]
        address: Option<String>,
    },
}

pub async fn run(action: TxAction, ctx: &AppContext) -> Result<()> {
    match action {
        TxAction::Create {
            wif,
            to,
            amount,
            fee,
            segwit,
            export,
        } => {
            let request = CreateTransactionRequest {
                wif: ZeroizingString::new(wif),
                dest_address: to,
                amount_sat: amount,
                fee_sat: fee,
                spend: if segwit {
                    SpendScript::P2wpkh
                } else {
                    SpendScript::P2pkh
                },
            };
            create(request, export, ctx).await
        }
        TxAction::Decode {
            query,
            with_fee,
            address,
        } => decode(&query, with_fee, address.as_deref(), ctx).await,
    }
}

async fn create(request: CreateTransactionRequest, export: bool, ctx: &AppContext) -> Result<()> {
    let source = ctx.esplora();
    let created = create_transaction(&source, &request, ctx.network())
        .await
        .context("transaction creation failed")?;

    show_created(&created, ctx.json);

    if export {
        let path = export_transaction_json(&created, &ctx.settings.export_dir)
            .context("failed to export transaction")?;
        output::print_success(&format!("transaction saved to {}", path.display()), ctx.json);
    }
    Ok(())
}

fn show_created(created: &CreatedTransaction, json: bool) {
    if json {
        output::print_value(created, true);
        return;
    }
    output::print_success("transaction created", false);
    output::print_kv("Txid", &created.txid);
    output::print_kv("From", &created.from_address);
    output::print_kv("Inputs", &created.selected_utxos.len().to_string());
    output::print_kv("Fee", &output::format_sat(created.fee as i64));
    output::print_kv("Change", &output::format_sat(created.change as i64));
    output::print_kv("Hex", &created.hex);
}

async fn decode(query: &str, with_fee: bool, address: Option<&str>, ctx: &AppContext) -> Result<()> {
    let source = ctx.esplora();
    let decoded = lookup_transaction(query, &source, ctx.network())
        .await
        .context("transaction lookup failed")?;

    let fee = if with_fee {
        let providers = ctx.prev_output_chain();
        Some(
            resolve_fee(&decoded, &providers, address)
                .await
                .context("fee lookup failed")?,
        )
    } else {
        None
    };

    if ctx.json {
        output::print_value(
            &serde_json::json!({ "transaction": decoded, "fee": fee }),
            true,
        );
    } else {
        show_decoded(&decoded, fee.as_ref());
    }
    Ok(())
}

fn show_decoded(tx: &DecodedTransaction, fee: Option<&FeeSummary>) {
    output::print_kv("Txid", &tx.txid);
    if tx.wtxid != tx.txid {
        output::print_kv("Wtxid", &tx.wtxid);
    }
    output::print_kv("Version", &tx.version.to_string());
    output::print_kv("Locktime", &tx.locktime.to_string());
    output::print_kv(
        "Size",
        &format!("{} bytes, {} vbytes, {} WU", tx.size, tx.vsize, tx.weight),
    );
    if let Some(fee) = fee {
        output::print_kv("Fee", &output::format_sat(fee.fee as i64));
    }

    println!();
    let inputs: Vec<Vec<String>> = tx
        .inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let value = fee
                .and_then(|f| f.input_values.get(i))
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".into());
            vec![
                i.to_string(),
                format!("{}:{}", input.txid, input.vout),
                value,
                format!("{:#010x}", input.sequence),
            ]
        })
        .collect();
    output::print_table(&["#", "Outpoint", "Value (sat)", "Sequence"], &inputs);

    println!();
    let outputs: Vec<Vec<String>> = tx
        .outputs
        .iter()
        .enumerate()
        .map(|(i, out)| {
            vec![
                i.to_string(),
                out.value.to_string(),
                out.address.clone().unwrap_or_else(|| "unknown".into()),
                out.script_type
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    output::print_table(&["#", "Value (sat)", "Address", "Type"], &outputs);
}
