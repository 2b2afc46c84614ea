// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

// Translation of tss-lib-go/common/slice.go, trimmed to the one function
// this crate's chunker actually calls; the BigInt<->multi-byte-slice
// conversions and non-empty guards existed to support the teacher's TSS
// message marshaling and have no counterpart here.

/// Prepends zero bytes to `src` until it reaches `length`.
/// Returns a new Vec; does not modify the input slice `src`.
/// If `src` is already >= `length`, a copy of `src` is returned.
pub fn pad_to_length_bytes(src: &[u8], length: usize) -> Vec<u8> {
    let src_len = src.len();
    if src_len >= length {
        src.to_vec()
    } else {
        let padding_len = length - src_len;
        let mut result = Vec::with_capacity(length);
        result.resize(padding_len, 0u8); // Prepend zeros
        result.extend_from_slice(src);
        result
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_to_length_bytes() {
        let src1 = vec![1, 2, 3];
        let len1 = 5;
        let padded1 = pad_to_length_bytes(&src1, len1);
        assert_eq!(padded1, vec![0, 0, 1, 2, 3]);
        assert_eq!(padded1.len(), len1);

        let src2 = vec![1, 2, 3, 4, 5];
        let len2 = 5;
        let padded2 = pad_to_length_bytes(&src2, len2);
        assert_eq!(padded2, src2); // No padding needed
        assert_eq!(padded2.len(), len2);

        let src3 = vec![1, 2, 3, 4, 5, 6];
        let len3 = 5;
        let padded3 = pad_to_length_bytes(&src3, len3);
        assert_eq!(padded3, src3); // Src longer, returns copy
        assert_eq!(padded3.len(), src3.len());

        let src4 = vec![];
        let len4 = 3;
        let padded4 = pad_to_length_bytes(&src4, len4);
        assert_eq!(padded4, vec![0, 0, 0]);
        assert_eq!(padded4.len(), len4);

         let src5 = vec![1, 2];
         let len5 = 2;
         let padded5 = pad_to_length_bytes(&src5, len5);
         assert_eq!(padded5, src5);
         assert_eq!(padded5.len(), len5);
    }

} 