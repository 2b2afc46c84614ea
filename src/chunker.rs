// Splits a byte sequence into fixed-size big-endian-integer chunks and
// reassembles them. Grounded in `common::slice::pad_to_length_bytes` for the
// zero-left-pad-to-fixed-width half of reassembly, and in the split/rejoin
// shape of `homomorphic.py`'s `encrypt_bytes`/`decrypt_bytes` (including its
// "last chunk may be short, trim to the recorded original length on the way
// back" edge case).

use crate::common::slice::pad_to_length_bytes;
use num_bigint_dig::{BigInt, Sign};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkerError {
    #[error("chunk_size * 8 must be less than the modulus bit length, got chunk_size={chunk_size} bits(n)={n_bits}")]
    ChunkSizeTooLarge { chunk_size: usize, n_bits: u64 },
}

/// `chunk_size * 8 < bits(n)` must hold so every chunk value is representable
/// mod n with headroom for mask arithmetic.
pub fn validate_chunk_size(chunk_size: usize, n: &BigInt) -> Result<(), ChunkerError> {
    let n_bits = n.bits();
    if (chunk_size as u64) * 8 >= n_bits {
        return Err(ChunkerError::ChunkSizeTooLarge { chunk_size, n_bits });
    }
    Ok(())
}

/// Splits `data` into `ceil(len / chunk_size)` big-endian integers, the
/// final chunk possibly shorter than `chunk_size` bytes.
pub fn split(data: &[u8], chunk_size: usize) -> Vec<BigInt> {
    if data.is_empty() {
        return Vec::new();
    }
    data.chunks(chunk_size)
        .map(|bytes| BigInt::from_bytes_be(Sign::Plus, bytes))
        .collect()
}

/// Converts each integer back to its original per-chunk byte length (left-
/// padded with zeros) and concatenates. Every chunk but the last is exactly
/// `chunk_size` bytes; the last is `original_len - chunk_size * (n - 1)`
/// bytes, which may be shorter. Padding each value to its own chunk's width
/// (rather than padding every value to `chunk_size` and truncating the
/// concatenation from the front) keeps the real bytes of a short chunk,
/// since they sit at the end of `v`'s big-endian encoding, not the front.
pub fn reassemble(values: &[BigInt], chunk_size: usize, original_len: usize) -> Vec<u8> {
    if values.is_empty() {
        return Vec::new();
    }
    let last = values.len() - 1;
    let mut out = Vec::with_capacity(original_len);
    for (i, v) in values.iter().enumerate() {
        let expected_len = if i == last {
            original_len - chunk_size * last
        } else {
            chunk_size
        };
        let bytes = v.to_bytes_be().1;
        out.extend(pad_to_length_bytes(&bytes, expected_len));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_and_reassemble_roundtrip() {
        let data = b"hello world, this spans multiple chunks!";
        let chunks = split(data, 8);
        assert_eq!(chunks.len(), (data.len() + 7) / 8);
        let back = reassemble(&chunks, 8, data.len());
        assert_eq!(back, data);
    }

    #[test]
    fn single_short_chunk() {
        let data = b"hi";
        let chunks = split(data, 64);
        assert_eq!(chunks.len(), 1);
        let back = reassemble(&chunks, 64, data.len());
        assert_eq!(back, data);
    }

    #[test]
    fn empty_input() {
        let chunks = split(b"", 64);
        assert!(chunks.is_empty());
        assert_eq!(reassemble(&chunks, 64, 0), Vec::<u8>::new());
    }

    #[test]
    fn leading_zero_bytes_preserved_on_reassembly() {
        let data = vec![0x00, 0x00, 0x01, 0x02];
        let chunks = split(&data, 64);
        let back = reassemble(&chunks, 64, data.len());
        assert_eq!(back, data);
    }

    #[test]
    fn chunk_size_validation() {
        let n = BigInt::from(1u64) << 512;
        assert!(validate_chunk_size(64, &n).is_ok());
        assert!(validate_chunk_size(64, &(BigInt::from(1u64) << 400)).is_err());
    }
}
