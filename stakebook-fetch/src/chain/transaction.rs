//! Transaction deserialization in the Bitcoin wire layout, with segregated witness support.

use std::io::Cursor;

use crate::chain::{
    error::ParseError,
    utils::{
        display_hash, double_sha256, read_bytes, read_hash, read_i32, read_u32, read_u64,
        CompactSize, ParseFromSlice,
    },
};

/// Previous output index used by coinbase inputs.
const COINBASE_PREV_INDEX: u32 = u32::MAX;

/// Txin format as described in <https://en.bitcoin.it/wiki/Transaction>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    /// Hash of the transaction holding the spent output, in internal byte order.
    ///
    /// Size\[bytes\]: 32
    prev_txid: [u8; 32],
    /// Index of the spent output.
    ///
    /// Size\[bytes\]: 4
    prev_index: u32,
    /// CompactSize-prefixed, could be a pubkey or a script
    ///
    /// Size\[bytes\]: CompactSize
    script_sig: Vec<u8>,
    /// Size\[bytes\]: 4
    sequence: u32,
}

impl TxIn {
    /// Hash of the spent transaction in internal byte order.
    pub fn prev_txid(&self) -> &[u8; 32] {
        &self.prev_txid
    }

    /// Index of the spent output.
    pub fn prev_index(&self) -> u32 {
        self.prev_index
    }

    /// Unlocking script.
    pub fn script_sig(&self) -> &[u8] {
        &self.script_sig
    }

    /// Sequence number.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// True for the null outpoint a coinbase input spends.
    pub fn is_coinbase(&self) -> bool {
        self.prev_index == COINBASE_PREV_INDEX && self.prev_txid == [0; 32]
    }
}

impl ParseFromSlice for TxIn {
    fn parse_from_slice(data: &[u8]) -> Result<(&[u8], Self), ParseError> {
        let mut cursor = Cursor::new(data);

        let prev_txid = read_hash(&mut cursor, "Error reading TxIn::PrevTxHash")?;
        let prev_index = read_u32(&mut cursor, "Error reading TxIn::PrevTxOutIndex")?;
        let script_sig = {
            let compact_length =
                CompactSize::read(&mut cursor, "Error reading TxIn::ScriptSigLength")?;
            read_bytes(
                &mut cursor,
                compact_length as usize,
                "Error reading TxIn::ScriptSig",
            )?
        };
        let sequence = read_u32(&mut cursor, "Error reading TxIn::SequenceNumber")?;

        Ok((
            &data[cursor.position() as usize..],
            TxIn {
                prev_txid,
                prev_index,
                script_sig,
                sequence,
            },
        ))
    }
}

/// Txout format as described in <https://en.bitcoin.it/wiki/Transaction>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    /// Non-negative int giving the number of smallest units to be transferred
    ///
    /// Size\[bytes\]: 8
    value: u64,
    /// Size\[bytes\]: CompactSize
    script_pub_key: Vec<u8>,
}

impl TxOut {
    /// Output value in smallest units.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Locking script.
    pub fn script_pub_key(&self) -> &[u8] {
        &self.script_pub_key
    }
}

impl ParseFromSlice for TxOut {
    fn parse_from_slice(data: &[u8]) -> Result<(&[u8], Self), ParseError> {
        let mut cursor = Cursor::new(data);

        let value = read_u64(&mut cursor, "Error reading TxOut::Value")?;
        let script_pub_key = {
            let compact_length =
                CompactSize::read(&mut cursor, "Error reading TxOut::ScriptPubKeyLength")?;
            read_bytes(
                &mut cursor,
                compact_length as usize,
                "Error reading TxOut::ScriptPubKey",
            )?
        };

        Ok((
            &data[cursor.position() as usize..],
            TxOut {
                value,
                script_pub_key,
            },
        ))
    }
}

/// Reads a CompactSize-counted list of `T`, advancing `cursor` past it.
fn parse_list<T: ParseFromSlice>(
    data: &[u8],
    cursor: &mut Cursor<&[u8]>,
    error_msg: &str,
) -> Result<Vec<T>, ParseError> {
    let count = CompactSize::read(cursor, error_msg)?;
    // Every entry is at least one byte long.
    let mut items = Vec::with_capacity(count.min(data.len() as u64) as usize);
    for _ in 0..count {
        let (remaining_data, item) = T::parse_from_slice(&data[cursor.position() as usize..])?;
        items.push(item);
        cursor.set_position(data.len() as u64 - remaining_data.len() as u64);
    }
    Ok(items)
}

/// Reads the witness stack of a single input.
fn parse_witness(cursor: &mut Cursor<&[u8]>) -> Result<Vec<Vec<u8>>, ParseError> {
    let item_count = CompactSize::read(cursor, "Error reading Witness::ItemCount")?;
    let mut items = Vec::with_capacity(item_count.min(cursor.get_ref().len() as u64) as usize);
    for _ in 0..item_count {
        let item_length = CompactSize::read(cursor, "Error reading Witness::ItemLength")?;
        items.push(read_bytes(
            cursor,
            item_length as usize,
            "Error reading Witness::Item",
        )?);
    }
    Ok(items)
}

/// Full transaction decoded with witness encoding.
///
/// Transactions without the segwit marker decode the same way as with the legacy
/// encoding; nothing is stripped from those that carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTransaction {
    /// Size\[bytes\]: 4
    version: i32,
    /// Size\[bytes\]: Vec<40+CompactSize>
    inputs: Vec<TxIn>,
    /// Size\[bytes\]: Vec<8+CompactSize>
    outputs: Vec<TxOut>,
    /// One witness stack per input, empty when the transaction has no segwit marker.
    witnesses: Vec<Vec<Vec<u8>>>,
    /// Size\[bytes\]: 4
    lock_time: u32,
    /// Raw transaction bytes, witness included.
    raw_bytes: Vec<u8>,
    /// Double SHA-256 of the witness-stripped serialization.
    txid: [u8; 32],
}

impl ParseFromSlice for FullTransaction {
    fn parse_from_slice(data: &[u8]) -> Result<(&[u8], Self), ParseError> {
        let mut cursor = Cursor::new(data);

        let version = read_i32(&mut cursor, "Error reading FullTransaction::Version")?;

        // A zero input count is the segwit marker when reading with witness encoding.
        let mut segwit = false;
        if data.get(cursor.position() as usize) == Some(&0x00) {
            let flag = data.get(cursor.position() as usize + 1).copied().ok_or_else(|| {
                ParseError::TruncatedInput("Error reading FullTransaction::SegwitFlag".to_string())
            })?;
            if flag != 0x01 {
                return Err(ParseError::InvalidData(format!(
                    "witness tx but flag byte is {flag:#04x}"
                )));
            }
            segwit = true;
            cursor.set_position(cursor.position() + 2);
        }

        let io_start = cursor.position() as usize;
        let inputs: Vec<TxIn> =
            parse_list(data, &mut cursor, "Error reading FullTransaction::TxInCount")?;
        let outputs: Vec<TxOut> =
            parse_list(data, &mut cursor, "Error reading FullTransaction::TxOutCount")?;
        let io_end = cursor.position() as usize;

        let mut witnesses = Vec::new();
        if segwit {
            witnesses.reserve(inputs.len());
            for _ in 0..inputs.len() {
                witnesses.push(parse_witness(&mut cursor)?);
            }
        }

        let lock_time = read_u32(&mut cursor, "Error reading FullTransaction::LockTime")?;
        let end = cursor.position() as usize;

        let mut stripped = Vec::with_capacity(8 + io_end - io_start);
        stripped.extend_from_slice(&data[..4]);
        stripped.extend_from_slice(&data[io_start..io_end]);
        stripped.extend_from_slice(&data[end - 4..end]);

        Ok((
            &data[end..],
            FullTransaction {
                version,
                inputs,
                outputs,
                witnesses,
                lock_time,
                raw_bytes: data[..end].to_vec(),
                txid: double_sha256(&stripped),
            },
        ))
    }
}

impl FullTransaction {
    /// Returns the transaction version.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Returns the transaction inputs.
    pub fn inputs(&self) -> &[TxIn] {
        &self.inputs
    }

    /// Returns the transaction outputs.
    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    /// Returns the witness stacks, one per input, or an empty slice for non-segwit transactions.
    pub fn witnesses(&self) -> &[Vec<Vec<u8>>] {
        &self.witnesses
    }

    /// Returns true if the transaction was serialized with the segwit marker.
    pub fn has_witness(&self) -> bool {
        !self.witnesses.is_empty()
    }

    /// Returns the lock time.
    pub fn lock_time(&self) -> u32 {
        self.lock_time
    }

    /// Returns the transaction as raw bytes.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// Returns the txid in internal byte order.
    pub fn txid_bytes(&self) -> [u8; 32] {
        self.txid
    }

    /// Returns the txid as displayed by the node.
    pub fn txid(&self) -> String {
        display_hash(&self.txid)
    }

    /// Returns true for a coinbase transaction.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_coinbase()
    }
}
