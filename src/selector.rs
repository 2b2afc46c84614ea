// Deterministic key-to-stream-label mapping via five independent
// predicates over SHA-256(key), majority vote. Other candidate selectors
// (bit-ratio/hash-parity/fibonacci/chaos/elliptic-curve composites, or
// filename-based heuristics) are deliberately not implemented; this
// five-predicate rule is the sole selector.

use sha2::{Digest, Sha256};

const KEY_MIN_LEN: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    A,
    B,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::A => "A",
            Label::B => "B",
        }
    }
}

/// Zero-pads keys shorter than 16 bytes, truncates keys longer.
fn normalize_key(key: &[u8]) -> Vec<u8> {
    if key.len() < KEY_MIN_LEN {
        let mut padded = key.to_vec();
        padded.resize(KEY_MIN_LEN, 0);
        padded
    } else {
        key[..KEY_MIN_LEN].to_vec()
    }
}

/// Maps `key` deterministically to label A or B. Balanced ~50/50 over
/// uniformly random keys; not parameterized by any artifact field.
pub fn select(key: &[u8]) -> Label {
    let normalized = normalize_key(key);
    let h = Sha256::digest(&normalized);

    let p1 = count_set_bits(&h) as f64 / (h.len() * 8) as f64 > 0.48;
    let p2 = h[31] < 128;
    let p3 = h[1] > 0x7F;
    let hh = Sha256::digest(&h[..]);
    let p4 = hh[0] % 2 == 0;
    let p5 = h[16] % 2 == 0;

    let votes = [p1, p2, p3, p4, p5].iter().filter(|&&v| v).count();
    if votes >= 3 {
        Label::A
    } else {
        Label::B
    }
}

fn count_set_bits(bytes: &[u8]) -> u32 {
    bytes.iter().map(|b| b.count_ones()).sum()
}
