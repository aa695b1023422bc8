//! Blockchain parsing utility functions.

use std::io::{Cursor, Read, Write};

use sha2::{Digest, Sha256};

use crate::chain::error::ParseError;

/// Used for decoding byte slices into structures.
pub trait ParseFromSlice {
    /// Reads data from a bytestring, consuming data read, and returns an instance of self
    /// along with the remaining data in the bytestring given.
    fn parse_from_slice(data: &[u8]) -> Result<(&[u8], Self), ParseError>
    where
        Self: Sized;
}

/// Bytes left between the cursor position and the end of its slice.
fn remaining(cursor: &Cursor<&[u8]>) -> u64 {
    let len = cursor.get_ref().len() as u64;
    len - cursor.position().min(len)
}

/// Skips the next n bytes in cursor, returns error message given if eof is reached.
pub(crate) fn skip_bytes(
    cursor: &mut Cursor<&[u8]>,
    n: usize,
    error_msg: &str,
) -> Result<(), ParseError> {
    if remaining(cursor) < n as u64 {
        return Err(ParseError::TruncatedInput(error_msg.to_string()));
    }
    cursor.set_position(cursor.position() + n as u64);
    Ok(())
}

/// Reads the next n bytes from cursor into a `Vec<u8>`, returns error message given if eof is reached.
pub(crate) fn read_bytes(
    cursor: &mut Cursor<&[u8]>,
    n: usize,
    error_msg: &str,
) -> Result<Vec<u8>, ParseError> {
    if remaining(cursor) < n as u64 {
        return Err(ParseError::TruncatedInput(error_msg.to_string()));
    }
    let mut buf = vec![0; n];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| ParseError::TruncatedInput(error_msg.to_string()))?;
    Ok(buf)
}

/// Reads the next 32 bytes from cursor into an array.
pub(crate) fn read_hash(
    cursor: &mut Cursor<&[u8]>,
    error_msg: &str,
) -> Result<[u8; 32], ParseError> {
    let mut buf = [0; 32];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| ParseError::TruncatedInput(error_msg.to_string()))?;
    Ok(buf)
}

/// Reads the next 8 bytes from cursor into a u64, returns error message given if eof is reached.
pub(crate) fn read_u64(cursor: &mut Cursor<&[u8]>, error_msg: &str) -> Result<u64, ParseError> {
    let mut buf = [0; 8];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| ParseError::TruncatedInput(error_msg.to_string()))?;
    Ok(u64::from_le_bytes(buf))
}

/// Reads the next 4 bytes from cursor into a u32, returns error message given if eof is reached.
pub(crate) fn read_u32(cursor: &mut Cursor<&[u8]>, error_msg: &str) -> Result<u32, ParseError> {
    let mut buf = [0; 4];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| ParseError::TruncatedInput(error_msg.to_string()))?;
    Ok(u32::from_le_bytes(buf))
}

/// Reads the next 4 bytes from cursor into an i32, returns error message given if eof is reached.
pub(crate) fn read_i32(cursor: &mut Cursor<&[u8]>, error_msg: &str) -> Result<i32, ParseError> {
    let mut buf = [0; 4];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| ParseError::TruncatedInput(error_msg.to_string()))?;
    Ok(i32::from_le_bytes(buf))
}

/// Double SHA-256, the hash used for block and transaction ids.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Renders an internal byte order hash as the reversed hex string nodes display.
pub fn display_hash(hash: &[u8; 32]) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

/// A bitcoin CompactSize, a form of variable-length integer
pub struct CompactSize;

impl CompactSize {
    /// Reads an integer encoded in compact form.
    ///
    /// The length itself is not bounded here; callers that size a buffer from it read
    /// through [`read_bytes`], which refuses lengths past the end of the input.
    pub fn read(cursor: &mut Cursor<&[u8]>, error_msg: &str) -> Result<u64, ParseError> {
        let truncated = || ParseError::TruncatedInput(error_msg.to_string());

        let mut flag_bytes = [0; 1];
        cursor.read_exact(&mut flag_bytes).map_err(|_| truncated())?;
        let flag = flag_bytes[0];

        if flag < 253 {
            Ok(flag as u64)
        } else if flag == 253 {
            let mut bytes = [0; 2];
            cursor.read_exact(&mut bytes).map_err(|_| truncated())?;
            match u16::from_le_bytes(bytes) {
                n if n < 253 => Err(ParseError::InvalidData(format!(
                    "non-canonical CompactSize: {error_msg}"
                ))),
                n => Ok(n as u64),
            }
        } else if flag == 254 {
            let mut bytes = [0; 4];
            cursor.read_exact(&mut bytes).map_err(|_| truncated())?;
            match u32::from_le_bytes(bytes) {
                n if n < 0x10000 => Err(ParseError::InvalidData(format!(
                    "non-canonical CompactSize: {error_msg}"
                ))),
                n => Ok(n as u64),
            }
        } else {
            let mut bytes = [0; 8];
            cursor.read_exact(&mut bytes).map_err(|_| truncated())?;
            match u64::from_le_bytes(bytes) {
                n if n < 0x1_0000_0000 => Err(ParseError::InvalidData(format!(
                    "non-canonical CompactSize: {error_msg}"
                ))),
                n => Ok(n),
            }
        }
    }

    /// Reads an integer encoded in compact form and performs checked conversion
    /// to the target type.
    pub fn read_t<T: TryFrom<u64>>(
        cursor: &mut Cursor<&[u8]>,
        error_msg: &str,
    ) -> Result<T, ParseError> {
        let n = Self::read(cursor, error_msg)?;
        <T>::try_from(n).map_err(|_| {
            ParseError::InvalidData(format!("CompactSize value {n} out of range: {error_msg}"))
        })
    }

    /// Writes the provided `usize` value to the provided Writer in compact form.
    pub fn write<W: Write>(mut writer: W, size: usize) -> std::io::Result<()> {
        match size {
            s if s < 253 => writer.write_all(&[s as u8]),
            s if s <= 0xFFFF => {
                writer.write_all(&[253])?;
                writer.write_all(&(s as u16).to_le_bytes())
            }
            s if s <= 0xFFFFFFFF => {
                writer.write_all(&[254])?;
                writer.write_all(&(s as u32).to_le_bytes())
            }
            s => {
                writer.write_all(&[255])?;
                writer.write_all(&(s as u64).to_le_bytes())
            }
        }
    }

    /// Number of bytes `size` occupies in compact form.
    pub fn encoded_len(size: u64) -> usize {
        match size {
            s if s < 253 => 1,
            s if s <= 0xFFFF => 3,
            s if s <= 0xFFFF_FFFF => 5,
            _ => 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_size_reads_every_width() {
        for value in [0usize, 252, 253, 0xFFFF, 0x10000, 0xFFFF_FFFF, 0x1_0000_0000] {
            let mut buf = Vec::new();
            CompactSize::write(&mut buf, value).unwrap();
            assert_eq!(buf.len(), CompactSize::encoded_len(value as u64));

            let mut cursor = Cursor::new(buf.as_slice());
            assert_eq!(CompactSize::read(&mut cursor, "value").unwrap(), value as u64);
            assert_eq!(cursor.position() as usize, buf.len());
        }
    }

    #[test]
    fn compact_size_rejects_non_canonical() {
        let data = [253u8, 0x10, 0x00];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            CompactSize::read(&mut cursor, "count"),
            Err(ParseError::InvalidData(_))
        ));
    }

    #[test]
    fn compact_size_reports_truncation() {
        let data = [254u8, 0x01];
        let mut cursor = Cursor::new(&data[..]);
        match CompactSize::read(&mut cursor, "Error reading signature length") {
            Err(ParseError::TruncatedInput(msg)) => {
                assert_eq!(msg, "Error reading signature length")
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn read_bytes_refuses_lengths_past_input() {
        let data = [1u8, 2, 3];
        let mut cursor = Cursor::new(&data[..]);
        assert!(read_bytes(&mut cursor, usize::MAX, "huge").is_err());
        assert_eq!(read_bytes(&mut cursor, 3, "all").unwrap(), vec![1, 2, 3]);
        assert!(skip_bytes(&mut cursor, 1, "past end").is_err());
    }

    #[test]
    fn display_hash_is_reversed() {
        let mut hash = [0u8; 32];
        hash[0] = 0xab;
        let shown = display_hash(&hash);
        assert!(shown.ends_with("ab"));
        assert!(shown.starts_with("00"));
    }
}
