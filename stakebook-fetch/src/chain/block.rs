//! Block header deserialization, for both the plain Bitcoin layout and the
//! proof-of-stake extended layout, and the height-prefixed block payload.

use std::io::Cursor;

use crate::chain::{
    error::ParseError,
    transaction::FullTransaction,
    utils::{
        display_hash, double_sha256, read_hash, read_i32, read_u32, skip_bytes, CompactSize,
        ParseFromSlice,
    },
};

/// Size of a serialized standard block header.
pub const BLOCK_HEADER_LEN: usize = 80;

/// Size of the fixed proof-of-stake fields following the standard header.
///
/// hashStateRoot (32) + hashUTXORoot (32) + prevoutStake hash (32) + prevoutStake n (4).
pub const STAKE_FIELDS_LEN: usize = 100;

/// Size of the height prefix of a [`HeightPrefixedPayload`].
pub const HEIGHT_PREFIX_LEN: usize = 8;

/// Standard block header, as described in <https://en.bitcoin.it/wiki/Block_hashing_algorithm>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Size\[bytes\]: 4
    version: i32,
    /// Size\[bytes\]: 32
    prev_block_hash: [u8; 32],
    /// Size\[bytes\]: 32
    merkle_root: [u8; 32],
    /// Seconds since the Unix epoch.
    ///
    /// Size\[bytes\]: 4
    time: u32,
    /// Difficulty target in compact form.
    ///
    /// Size\[bytes\]: 4
    bits: u32,
    /// Size\[bytes\]: 4
    nonce: u32,
    /// Double SHA-256 of the 80 serialized bytes.
    hash: [u8; 32],
}

impl ParseFromSlice for BlockHeader {
    fn parse_from_slice(data: &[u8]) -> Result<(&[u8], Self), ParseError> {
        let mut cursor = Cursor::new(data);

        let version = read_i32(&mut cursor, "Error reading BlockHeader::Version")?;
        let prev_block_hash = read_hash(&mut cursor, "Error reading BlockHeader::PrevBlockHash")?;
        let merkle_root = read_hash(&mut cursor, "Error reading BlockHeader::MerkleRoot")?;
        let time = read_u32(&mut cursor, "Error reading BlockHeader::Time")?;
        let bits = read_u32(&mut cursor, "Error reading BlockHeader::Bits")?;
        let nonce = read_u32(&mut cursor, "Error reading BlockHeader::Nonce")?;

        Ok((
            &data[BLOCK_HEADER_LEN..],
            BlockHeader {
                version,
                prev_block_hash,
                merkle_root,
                time,
                bits,
                nonce,
                hash: double_sha256(&data[..BLOCK_HEADER_LEN]),
            },
        ))
    }
}

impl BlockHeader {
    /// Returns the block version.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Returns the previous block hash as displayed by the node.
    pub fn prev_block_hash(&self) -> String {
        display_hash(&self.prev_block_hash)
    }

    /// Returns the merkle root as displayed by the node.
    pub fn merkle_root(&self) -> String {
        display_hash(&self.merkle_root)
    }

    /// Returns the block timestamp in seconds since the Unix epoch.
    pub fn time(&self) -> i64 {
        self.time as i64
    }

    /// Returns the compact difficulty target.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns the nonce.
    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    /// Returns the hash of the standard header as displayed by the node.
    ///
    /// For extended headers this is not the block hash, which also commits to the
    /// stake fields.
    pub fn hash(&self) -> String {
        display_hash(&self.hash)
    }
}

/// Block header of the proof-of-stake layout used from the fork height onwards.
///
/// The stake fields are skipped, not validated: the decoder only has to leave the
/// input positioned at the transaction count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeBlockHeader {
    /// Standard header fields.
    header: BlockHeader,
    // HashStateRoot \[IGNORED\] - Size\[bytes\]: 32
    // HashUTXORoot \[IGNORED\] - Size\[bytes\]: 32
    // PrevoutStakeHash \[IGNORED\] - Size\[bytes\]: 32
    // PrevoutStakeN \[IGNORED\] - Size\[bytes\]: 4
    // BlockSig \[IGNORED\] - Size\[bytes\]: CompactSize
    /// Number of bytes the header occupied.
    encoded_len: usize,
}

impl ParseFromSlice for StakeBlockHeader {
    fn parse_from_slice(data: &[u8]) -> Result<(&[u8], Self), ParseError> {
        let (remaining, header) = BlockHeader::parse_from_slice(data)?;
        let mut cursor = Cursor::new(remaining);

        skip_bytes(
            &mut cursor,
            STAKE_FIELDS_LEN,
            "Error skipping StakeBlockHeader::StakeFields",
        )?;
        let sig_len: usize =
            CompactSize::read_t(&mut cursor, "Error reading StakeBlockHeader::BlockSigLength")?;
        skip_bytes(&mut cursor, sig_len, "Error skipping StakeBlockHeader::BlockSig")?;

        let consumed = cursor.position() as usize;
        Ok((
            &remaining[consumed..],
            StakeBlockHeader {
                header,
                encoded_len: BLOCK_HEADER_LEN + consumed,
            },
        ))
    }
}

impl StakeBlockHeader {
    /// Returns the standard header fields.
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Consumes self, returning the standard header fields.
    pub fn into_header(self) -> BlockHeader {
        self.header
    }

    /// Returns the number of bytes the header occupied on the wire.
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }
}

/// Reads a CompactSize-counted list of witness-encoded transactions.
///
/// Bytes after the last transaction are ignored.
pub fn parse_transactions(data: &[u8]) -> Result<Vec<FullTransaction>, ParseError> {
    let mut cursor = Cursor::new(data);
    let tx_count = CompactSize::read(&mut cursor, "Error reading Block::TxCount")?;

    // Every transaction is at least ten bytes long.
    let mut transactions = Vec::with_capacity(tx_count.min(data.len() as u64 / 10) as usize);
    let mut remaining = &data[cursor.position() as usize..];
    for _ in 0..tx_count {
        let (rest, tx) = FullTransaction::parse_from_slice(remaining)?;
        transactions.push(tx);
        remaining = rest;
    }
    Ok(transactions)
}

/// A raw block prefixed with the height it was fetched at.
///
/// The block source knows the height of a block it fetches by hash, the raw bytes do
/// not carry it. Both travel together as one byte sequence:
///
/// ┌─ bytes 0..4 ─┬─ bytes 4..8 ─┬──────── bytes 8.. ────────┐
/// │ height (BE)  │  zero pad    │     raw node block        │
/// └──────────────┴──────────────┴───────────────────────────┘
///
/// The height is a big-endian u32 in the first four bytes of the prefix; the last
/// four are padding and are not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightPrefixedPayload<'a> {
    height: u32,
    block: &'a [u8],
    len: usize,
}

impl<'a> HeightPrefixedPayload<'a> {
    /// Prefixes `block` with `height`.
    pub fn encode(height: u32, block: &[u8]) -> Vec<u8> {
        let mut payload = Vec::with_capacity(HEIGHT_PREFIX_LEN + block.len());
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&[0; HEIGHT_PREFIX_LEN - 4]);
        payload.extend_from_slice(block);
        payload
    }

    /// Splits a payload into its height and raw block.
    pub fn decode(payload: &'a [u8]) -> Result<Self, ParseError> {
        if payload.len() < HEIGHT_PREFIX_LEN {
            return Err(ParseError::TruncatedInput(
                "Error reading HeightPrefixedPayload::Height".to_string(),
            ));
        }
        let mut height = [0; 4];
        height.copy_from_slice(&payload[..4]);

        Ok(HeightPrefixedPayload {
            height: u32::from_be_bytes(height),
            block: &payload[HEIGHT_PREFIX_LEN..],
            len: payload.len(),
        })
    }

    /// Height the block was fetched at.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw block bytes, without the prefix.
    pub fn block(&self) -> &'a [u8] {
        self.block
    }

    /// Length of the whole payload, prefix included.
    pub fn payload_len(&self) -> usize {
        self.len
    }

    /// True if the payload carries block bytes after the prefix.
    pub fn has_block(&self) -> bool {
        !self.block.is_empty()
    }
}
