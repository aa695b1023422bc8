//! Types associated with the verbose `getrawtransaction` RPC request, and their
//! normalisation into [`Tx`].

use serde::{Deserialize, Serialize};

use crate::{
    chain::{
        error::ParseError,
        types::{ScriptPubKey, ScriptSig, Tx, Vin, Vout},
    },
    jsonrpsee::response::common::amount::DecimalAmount,
};

/// Response to a verbose `getrawtransaction` RPC request, as served by the node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetRawTransactionResponse {
    /// Raw transaction, hex encoded.
    #[serde(default)]
    pub hex: String,
    /// Transaction id.
    pub txid: String,
    /// Transaction version.
    #[serde(default)]
    pub version: i32,
    /// Lock time.
    #[serde(rename = "locktime", default)]
    pub lock_time: u32,
    /// Inputs.
    #[serde(default)]
    pub vin: Vec<VinResponse>,
    /// Outputs.
    #[serde(default)]
    pub vout: Vec<VoutResponse>,
    /// Hash of the containing block, absent for mempool transactions.
    #[serde(rename = "blockhash", default)]
    pub block_hash: Option<String>,
    /// Confirmations, absent for mempool transactions.
    #[serde(default)]
    pub confirmations: u32,
    /// Transaction time.
    #[serde(default)]
    pub time: i64,
    /// Time of the containing block.
    #[serde(rename = "blocktime", default)]
    pub block_time: i64,
}

/// Input of a verbose transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VinResponse {
    /// Coinbase script, hex encoded.
    #[serde(default)]
    pub coinbase: Option<String>,
    /// Spent transaction id.
    #[serde(default)]
    pub txid: Option<String>,
    /// Spent output index.
    #[serde(default)]
    pub vout: Option<u32>,
    /// Unlocking script.
    #[serde(rename = "scriptSig", default)]
    pub script_sig: Option<ScriptSig>,
    /// Sequence number.
    #[serde(default)]
    pub sequence: u32,
    /// Addresses of the spent output.
    #[serde(default)]
    pub addresses: Option<Vec<String>>,
}

/// Output of a verbose transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoutResponse {
    /// Value in coins, as reported.
    #[serde(default)]
    pub value: DecimalAmount,
    /// Output index.
    pub n: u32,
    /// Locking script.
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKeyResponse,
}

/// Locking script of a verbose output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptPubKeyResponse {
    /// Script bytes, hex encoded.
    #[serde(default)]
    pub hex: String,
    /// Destination addresses. Absent or null for non-standard scripts.
    #[serde(default)]
    pub addresses: Option<Vec<String>>,
    /// Single destination address, reported by newer bitcoind releases instead of `addresses`.
    #[serde(default)]
    pub address: Option<String>,
}

impl ScriptPubKeyResponse {
    /// Reported `addresses`, empty when the node sent none.
    pub fn into_addresses(self) -> Vec<String> {
        self.addresses.unwrap_or_default()
    }

    /// Reported `addresses`, falling back to the single `address` field.
    pub fn into_any_addresses(self) -> Vec<String> {
        match (self.addresses, self.address) {
            (Some(addresses), _) => addresses,
            (None, Some(address)) => vec![address],
            (None, None) => Vec::new(),
        }
    }
}

impl GetRawTransactionResponse {
    /// Converts the node's transaction object into a [`Tx`].
    ///
    /// Output values are converted from coins to smallest units using `decimals`
    /// fractional digits, `addresses` picks the destination list of each output.
    pub fn into_tx(
        self,
        decimals: u32,
        addresses: fn(ScriptPubKeyResponse) -> Vec<String>,
    ) -> Result<Tx, ParseError> {
        let vout = self
            .vout
            .into_iter()
            .map(|out| {
                let value_sat = out.value.to_amount(decimals).map_err(|e| {
                    ParseError::MalformedTxJson(format!("tx {} vout {}: {e}", self.txid, out.n))
                })?;
                Ok(Vout {
                    value_sat,
                    n: out.n,
                    script_pub_key: ScriptPubKey {
                        hex: out.script_pub_key.hex.clone(),
                        addresses: addresses(out.script_pub_key),
                    },
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        let vin = self
            .vin
            .into_iter()
            .map(|input| Vin {
                coinbase: input.coinbase.unwrap_or_default(),
                txid: input.txid.unwrap_or_default(),
                vout: input.vout.unwrap_or_default(),
                script_sig: input.script_sig.unwrap_or_default(),
                sequence: input.sequence,
                addresses: input.addresses.unwrap_or_default(),
            })
            .collect();

        Ok(Tx {
            hex: self.hex,
            txid: self.txid,
            version: self.version,
            lock_time: self.lock_time,
            vin,
            vout,
            block_hash: self.block_hash.unwrap_or_default(),
            confirmations: self.confirmations,
            time: self.time,
            block_time: self.block_time,
        })
    }
}

/// Parses a verbose `getrawtransaction` object into a [`Tx`].
///
/// Every output value becomes an exact integer of smallest units and every output
/// carries an address list, empty when the node reported none.
pub fn normalize_tx(raw: &[u8], decimals: u32) -> Result<Tx, ParseError> {
    let response: GetRawTransactionResponse = serde_json::from_slice(raw)?;
    response.into_tx(decimals, ScriptPubKeyResponse::into_addresses)
}

/// [`normalize_tx`] for a transaction object already embedded in a larger response.
pub fn normalize_tx_value(value: serde_json::Value, decimals: u32) -> Result<Tx, ParseError> {
    let response: GetRawTransactionResponse = serde_json::from_value(value)?;
    response.into_tx(decimals, ScriptPubKeyResponse::into_addresses)
}
