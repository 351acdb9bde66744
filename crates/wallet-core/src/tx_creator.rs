use chain_btc::keys::parse_wif;
use chain_btc::network::BtcNetwork;
use chain_btc::transaction::{build_transaction, sender_address, sign_transaction, to_hex, SpendScript};
use chain_btc::utxo::{select_utxos, Utxo};
use crypto_utils::ZeroizingString;
use explorer::UtxoSource;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::WalletError;

/// Everything needed to create and sign a payment.
#[derive(Debug, Clone)]
pub struct CreateTransactionRequest {
    pub wif: ZeroizingString,
    pub dest_address: String,
    pub amount_sat: u64,
    pub fee_sat: u64,
    pub spend: SpendScript,
}

/// A signed transaction ready to broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedTransaction {
    pub hex: String,
    pub txid: String,
    /// Sender address the inputs were taken from.
    pub from_address: String,
    pub fee: u64,
    /// Zero when the selection matched amount + fee exactly.
    pub change: u64,
    pub selected_utxos: Vec<Utxo>,
}

/// Build and sign a payment from the address controlled by `request.wif`.
///
/// UTXOs are fetched from `source`, selected first-fit in the order the
/// source returns them, and every selected input is signed with the one key.
/// Nothing is broadcast.
pub async fn create_transaction(
    source: &dyn UtxoSource,
    request: &CreateTransactionRequest,
    network: BtcNetwork,
) -> Result<CreatedTransaction, WalletError> {
    if request.wif.trim().is_empty() {
        return Err(WalletError::InvalidPrivateKey("WIF is required".into()));
    }
    if request.dest_address.trim().is_empty() {
        return Err(WalletError::InvalidAddress("destination address is required".into()));
    }

    let key = parse_wif(&request.wif, network)?;
    let from = sender_address(&key, request.spend, network)?;
    let from_address = from.to_string();

    debug!(address = %from_address, provider = source.name(), "fetching UTXOs");
    let utxos = source.fetch_utxos(&from_address).await?;

    let selection = select_utxos(&utxos, request.amount_sat, request.fee_sat)?;
    let unsigned = build_transaction(
        &selection,
        request.dest_address.trim(),
        request.amount_sat,
        request.fee_sat,
        &from,
        network,
    )?;
    let signed = sign_transaction(&unsigned, &key, request.spend)?;

    let created = CreatedTransaction {
        hex: to_hex(&signed),
        txid: signed.compute_txid().to_string(),
        from_address,
        fee: unsigned.fee_sat,
        change: unsigned.change_sat,
        selected_utxos: selection.selected,
    };
    info!(
        txid = %created.txid,
        inputs = created.selected_utxos.len(),
        fee = created.fee,
        change = created.change,
        "created transaction"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chain_btc::decode::decode_transaction;
    use chain_btc::utxo::UtxoStatus;
    use explorer::{ExplorerError, Provider};
    use std::sync::Mutex;

    /// WIF of private key 1, compressed.
    const KEY_ONE_WIF: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";
    const KEY_ONE_P2PKH: &str = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";
    const KEY_ONE_P2WPKH: &str = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
    const DEST: &str = "3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN";

    struct FakeUtxos {
        utxos: Vec<Utxo>,
        queried: Mutex<Vec<String>>,
    }

    impl FakeUtxos {
        fn new(values: &[u64]) -> Self {
            let utxos = values
                .iter()
                .enumerate()
                .map(|(i, v)| Utxo {
                    txid: format!("{:064x}", i + 1),
                    vout: i as u32,
                    amount_sat: *v,
                    status: UtxoStatus::default(),
                })
                .collect();
            Self {
                utxos,
                queried: Mutex::new(Vec::new()),
            }
        }
    }

    impl Provider for FakeUtxos {
        fn name(&self) -> &str {
            "fake"
        }
    }

    #[async_trait]
    impl UtxoSource for FakeUtxos {
        async fn fetch_utxos(&self, address: &str) -> Result<Vec<Utxo>, ExplorerError> {
            self.queried.lock().unwrap().push(address.to_string());
            Ok(self.utxos.clone())
        }
    }

    struct DownSource;

    impl Provider for DownSource {
        fn name(&self) -> &str {
            "down"
        }
    }

    #[async_trait]
    impl UtxoSource for DownSource {
        async fn fetch_utxos(&self, address: &str) -> Result<Vec<Utxo>, ExplorerError> {
            Err(ExplorerError::Request {
                url: format!("https://example.invalid/address/{address}/utxo"),
                message: "connection refused".into(),
            })
        }
    }

    fn request(amount_sat: u64, fee_sat: u64, spend: SpendScript) -> CreateTransactionRequest {
        CreateTransactionRequest {
            wif: KEY_ONE_WIF.into(),
            dest_address: DEST.into(),
            amount_sat,
            fee_sat,
            spend,
        }
    }

    #[tokio::test]
    async fn single_utxo_with_change() {
        let source = FakeUtxos::new(&[150_000]);
        let tx = create_transaction(&source, &request(100_000, 1_000, SpendScript::P2pkh), BtcNetwork::Mainnet)
            .await
            .unwrap();

        assert_eq!(tx.fee, 1_000);
        assert_eq!(tx.change, 49_000);
        assert_eq!(tx.selected_utxos.len(), 1);
        assert_eq!(tx.from_address, KEY_ONE_P2PKH);
        assert_eq!(source.queried.lock().unwrap().as_slice(), [KEY_ONE_P2PKH.to_string()]);

        let decoded = decode_transaction(&tx.hex, BtcNetwork::Mainnet).unwrap();
        assert_eq!(decoded.txid, tx.txid);
        assert_eq!(decoded.outputs.len(), 2);
        assert_eq!(decoded.outputs[0].value, 100_000);
        assert_eq!(decoded.outputs[0].address.as_deref(), Some(DEST));
        assert_eq!(decoded.outputs[1].value, 49_000);
        assert_eq!(decoded.outputs[1].address.as_deref(), Some(KEY_ONE_P2PKH));
    }

    #[tokio::test]
    async fn exact_selection_has_no_change_output() {
        let source = FakeUtxos::new(&[60_000, 41_000, 5_000]);
        let tx = create_transaction(&source, &request(100_000, 1_000, SpendScript::P2pkh), BtcNetwork::Mainnet)
            .await
            .unwrap();

        assert_eq!(tx.change, 0);
        assert_eq!(tx.selected_utxos.len(), 2);
        let decoded = decode_transaction(&tx.hex, BtcNetwork::Mainnet).unwrap();
        assert_eq!(decoded.inputs.len(), 2);
        assert_eq!(decoded.outputs.len(), 1);
    }

    #[tokio::test]
    async fn segwit_spend_queries_bech32_address() {
        let source = FakeUtxos::new(&[150_000]);
        let tx = create_transaction(&source, &request(100_000, 1_000, SpendScript::P2wpkh), BtcNetwork::Mainnet)
            .await
            .unwrap();

        assert_eq!(tx.from_address, KEY_ONE_P2WPKH);
        let decoded = decode_transaction(&tx.hex, BtcNetwork::Mainnet).unwrap();
        assert_eq!(decoded.inputs[0].witness.len(), 2);
        assert!(decoded.inputs[0].script_sig.is_empty());
    }

    #[tokio::test]
    async fn insufficient_funds_reports_shortfall() {
        let source = FakeUtxos::new(&[200, 300]);
        let err = create_transaction(&source, &request(100_000, 1_000, SpendScript::P2pkh), BtcNetwork::Mainnet)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WalletError::InsufficientFunds { have: 500, need: 101_000 }
        ));
    }

    #[tokio::test]
    async fn fetch_failure_is_network_error() {
        let err = create_transaction(&DownSource, &request(1_000, 100, SpendScript::P2pkh), BtcNetwork::Mainnet)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::Network(_)));
    }

    #[tokio::test]
    async fn bad_inputs_rejected_before_fetching() {
        let source = FakeUtxos::new(&[150_000]);

        let mut req = request(1_000, 100, SpendScript::P2pkh);
        req.wif = "".into();
        assert!(matches!(
            create_transaction(&source, &req, BtcNetwork::Mainnet).await,
            Err(WalletError::InvalidPrivateKey(_))
        ));

        let mut req = request(1_000, 100, SpendScript::P2pkh);
        req.wif = "not-a-wif".into();
        assert!(matches!(
            create_transaction(&source, &req, BtcNetwork::Mainnet).await,
            Err(WalletError::InvalidPrivateKey(_))
        ));

        let mut req = request(1_000, 100, SpendScript::P2pkh);
        req.dest_address = " ".into();
        assert!(matches!(
            create_transaction(&source, &req, BtcNetwork::Mainnet).await,
            Err(WalletError::InvalidAddress(_))
        ));

        assert!(source.queried.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn destination_on_wrong_network_rejected() {
        let source = FakeUtxos::new(&[150_000]);
        let mut req = request(1_000, 100, SpendScript::P2pkh);
        req.dest_address = "tb1q8gk5z3dy7zv9ywe7synlrk58elz4hrne29cpdj".into();
        assert!(matches!(
            create_transaction(&source, &req, BtcNetwork::Mainnet).await,
            Err(WalletError::InvalidAddress(_))
        ));
    }
}
