// Serialized form of the dual-stream transformer's output: a stable,
// length-padded structure that carries both streams under neutral labels
// with no field ranking them by operational role. Grounded in the pack's
// broad and consistent use of `serde` + `serde_json` for wire formats;
// big integers as decimal strings and byte fields as base64, per this
// spec's explicit redesign note against native JSON numbers.

use crate::paillier::PublicKey;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint_dig::{BigInt, Sign};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FORMAT_TAG: &str = "homomorphic_masked";
pub const VERSION: &str = "1.0";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaskMetadata {
    pub label: String,
    #[serde(with = "base64_bytes")]
    pub seed: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndistinguishabilityMetadata {
    #[serde(with = "base64_bytes")]
    pub shuffle_seed: Vec<u8>,
    pub shuffle_permutation: Vec<usize>,
    pub noise_deltas_a: Vec<String>,
    pub noise_deltas_b: Vec<String>,
    pub redundancy_factor: usize,
    pub original_indices_a: Vec<usize>,
    pub original_indices_b: Vec<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamArtifact {
    pub format_tag: String,
    pub version: String,
    pub public_key: PublicKey,
    pub chunk_size: usize,
    pub length_a: usize,
    pub length_b: usize,
    pub stream_a: Vec<String>,
    pub stream_b: Vec<String>,
    pub mask_metadata_a: MaskMetadata,
    pub mask_metadata_b: MaskMetadata,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub indistinguishability_metadata: Option<IndistinguishabilityMetadata>,
}

impl StreamArtifact {
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("StreamArtifact is always serializable")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: StreamArtifact = serde_json::from_slice(bytes)
            .map_err(|e| ArtifactError::InvalidArtifact(format!("malformed JSON: {e}")))?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_tag != FORMAT_TAG {
            return Err(ArtifactError::InvalidArtifact(format!(
                "unexpected format_tag {:?}",
                self.format_tag
            )));
        }
        if self.version != VERSION {
            return Err(ArtifactError::InvalidArtifact(format!(
                "unsupported version {:?}",
                self.version
            )));
        }
        if self.indistinguishability_metadata.is_none() && self.stream_a.len() != self.stream_b.len()
        {
            return Err(ArtifactError::InvalidArtifact(
                "stream_a and stream_b lengths differ".into(),
            ));
        }
        let n_square = &self.public_key.n * &self.public_key.n;
        for hex in self.stream_a.iter().chain(self.stream_b.iter()) {
            let c = hex_to_bigint(hex)
                .map_err(|e| ArtifactError::InvalidArtifact(format!("malformed ciphertext: {e}")))?;
            if c.sign() == Sign::Minus || c >= n_square {
                return Err(ArtifactError::InvalidArtifact(
                    "ciphertext out of range [0, n^2)".into(),
                ));
            }
        }
        if self.mask_metadata_a.seed.len() != 32 || self.mask_metadata_b.seed.len() != 32 {
            return Err(ArtifactError::InvalidArtifact(
                "seed must be 32 bytes".into(),
            ));
        }
        if self.mask_metadata_a.seed != self.mask_metadata_b.seed {
            return Err(ArtifactError::InvalidArtifact(
                "mask_metadata_a and mask_metadata_b must share the same seed".into(),
            ));
        }
        Ok(())
    }
}

pub fn bigint_to_hex(value: &BigInt) -> String {
    format!("0x{}", value.to_str_radix(16))
}

pub fn hex_to_bigint(s: &str) -> Result<BigInt, String> {
    let stripped = s.strip_prefix("0x").ok_or_else(|| format!("missing 0x prefix in {s:?}"))?;
    BigInt::parse_bytes(stripped.as_bytes(), 16)
        .ok_or_else(|| format!("invalid hex integer {s:?}"))
}

mod base64_bytes {
    use super::{STANDARD, Engine as _};
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD
            .decode(&s)
            .map_err(|e| DeError::custom(format!("invalid base64: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::generate_keypair;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sample_artifact() -> StreamArtifact {
        let mut rng = ChaCha20Rng::seed_from_u64(20);
        let (pk, _sk) = generate_keypair(&mut rng, 128).unwrap();
        let c = pk.encrypt(&mut rng, &BigInt::from(5)).unwrap();
        StreamArtifact {
            format_tag: FORMAT_TAG.to_string(),
            version: VERSION.to_string(),
            public_key: pk,
            chunk_size: 64,
            length_a: 5,
            length_b: 5,
            stream_a: vec![bigint_to_hex(&c)],
            stream_b: vec![bigint_to_hex(&c)],
            mask_metadata_a: MaskMetadata {
                label: "A".to_string(),
                seed: vec![0u8; 32],
            },
            mask_metadata_b: MaskMetadata {
                label: "B".to_string(),
                seed: vec![0u8; 32],
            },
            indistinguishability_metadata: None,
        }
    }

    #[test]
    fn roundtrip_through_json() {
        let artifact = sample_artifact();
        let bytes = artifact.to_bytes();
        let parsed = StreamArtifact::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.length_a, artifact.length_a);
        assert_eq!(parsed.stream_a, artifact.stream_a);
    }

    #[test]
    fn rejects_bad_format_tag() {
        let mut artifact = sample_artifact();
        artifact.format_tag = "something_else".to_string();
        let bytes = artifact.to_bytes();
        assert!(matches!(
            StreamArtifact::from_bytes(&bytes),
            Err(ArtifactError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn rejects_mismatched_stream_lengths() {
        let mut artifact = sample_artifact();
        artifact.stream_b.push(artifact.stream_a[0].clone());
        let bytes = artifact.to_bytes();
        assert!(StreamArtifact::from_bytes(&bytes).is_err());
    }

    #[test]
    fn allows_mismatched_stream_lengths_under_indistinguishability_metadata() {
        // After the indistinguishability wrapper runs, stream_b is emptied and
        // stream_a holds the interleaved combination of both original streams.
        let mut artifact = sample_artifact();
        artifact.stream_b.clear();
        artifact.indistinguishability_metadata = Some(IndistinguishabilityMetadata {
            shuffle_seed: vec![0u8; 16],
            shuffle_permutation: vec![0],
            noise_deltas_a: vec!["1".to_string()],
            noise_deltas_b: vec!["1".to_string()],
            redundancy_factor: 1,
            original_indices_a: vec![0],
            original_indices_b: vec![],
        });
        let bytes = artifact.to_bytes();
        assert!(StreamArtifact::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn rejects_short_seed() {
        let mut artifact = sample_artifact();
        artifact.mask_metadata_a.seed = vec![0u8; 16];
        let bytes = artifact.to_bytes();
        assert!(StreamArtifact::from_bytes(&bytes).is_err());
    }

    #[test]
    fn hex_roundtrip() {
        let n = BigInt::from(123456789u64);
        let hex = bigint_to_hex(&n);
        assert_eq!(hex_to_bigint(&hex).unwrap(), n);
    }

    #[test]
    fn hex_encoding_matches_independent_encoder() {
        // Cross-check the hand-rolled `0x`-prefixed hex encoding against the
        // `hex` crate's independent implementation of the same byte layout.
        let n = BigInt::from(0xDEADBEEFu64);
        let (_, bytes) = n.to_bytes_be();
        let expected = format!("0x{}", hex::encode(&bytes));
        assert_eq!(bigint_to_hex(&n), expected);
    }
}
