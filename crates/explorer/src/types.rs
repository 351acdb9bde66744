use serde::{Deserialize, Serialize};

/// Satoshis per bitcoin.
pub const SAT_PER_BTC: u64 = 100_000_000;

/// Convert satoshis to BTC for display. Not for arithmetic.
pub fn sat_to_btc(sat: i64) -> f64 {
    sat as f64 / SAT_PER_BTC as f64
}

/// One entry of an address's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressTransaction {
    pub hash: String,
    /// Block (or first-seen) time, RFC 3339 in UTC.
    pub time: String,
    /// Net effect on the queried address in satoshis (negative when sending).
    pub result_sat: i64,
    pub fee_sat: u64,
    pub inputs: Vec<TxEndpoint>,
    pub outputs: Vec<TxEndpoint>,
}

impl AddressTransaction {
    pub fn amount_btc(&self) -> f64 {
        sat_to_btc(self.result_sat)
    }

    pub fn fee_btc(&self) -> f64 {
        sat_to_btc(self.fee_sat as i64)
    }
}

/// Address and value on one side of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEndpoint {
    pub address: Option<String>,
    pub value_sat: u64,
}
