// Orchestrates the Paillier engine, chunker, and mask generator into the
// dual-plaintext interleaving protocol: encrypt A and B independently,
// mask each under its own label, pad the shorter stream, emit one
// artifact. New orchestration module (no single teacher file plays this
// role); built directly from this spec's component table.

use crate::artifact::{bigint_to_hex, hex_to_bigint, ArtifactError, MaskMetadata, StreamArtifact};
use crate::chunker::{self, ChunkerError};
use crate::mask::{self, MaskError};
use crate::paillier::{PaillierError, PrivateKey, PublicKey};
use crate::selector::{self, Label};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DualStreamError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    Paillier(#[from] PaillierError),
    #[error(transparent)]
    Mask(#[from] MaskError),
    #[error(transparent)]
    Chunker(#[from] ChunkerError),
    #[error("decryption failed: {0}")]
    DecryptionError(String),
}

/// Encrypts `plaintext_a`/`plaintext_b` under `pk`, masking each stream
/// with parameters derived from `seed`, and pads the shorter stream by
/// repeating its last masked ciphertext.
pub fn encrypt_pair<R: CryptoRng + RngCore>(
    rng: &mut R,
    plaintext_a: &[u8],
    plaintext_b: &[u8],
    pk: &PublicKey,
    chunk_size: usize,
    seed: [u8; 32],
) -> Result<StreamArtifact, DualStreamError> {
    chunker::validate_chunk_size(chunk_size, &pk.n)?;

    let mut chunks_a = chunker::split(plaintext_a, chunk_size);
    let mut chunks_b = chunker::split(plaintext_b, chunk_size);
    // An empty plaintext yields zero chunks, which `pad_to_equal_length`
    // cannot pad (there is no last ciphertext to repeat); give it one
    // zero-valued chunk so the invariant |stream_A| = |stream_B| still holds.
    if chunks_a.is_empty() && !chunks_b.is_empty() {
        chunks_a.push(num_bigint_dig::BigInt::from(0));
    }
    if chunks_b.is_empty() && !chunks_a.is_empty() {
        chunks_b.push(num_bigint_dig::BigInt::from(0));
    }

    let ciphertexts_a: Vec<_> = chunks_a
        .iter()
        .map(|m| pk.encrypt(rng, m))
        .collect::<Result<_, _>>()?;
    let ciphertexts_b: Vec<_> = chunks_b
        .iter()
        .map(|m| pk.encrypt(rng, m))
        .collect::<Result<_, _>>()?;

    let params_a = mask::derive_mask_parameters(&seed, "A", &pk.n);
    let params_b = mask::derive_mask_parameters(&seed, "B", &pk.n);

    let mut masked_a = mask::apply_mask(pk, &ciphertexts_a, &params_a)?;
    let mut masked_b = mask::apply_mask(pk, &ciphertexts_b, &params_b)?;

    pad_to_equal_length(&mut masked_a, &mut masked_b);

    Ok(StreamArtifact {
        format_tag: crate::artifact::FORMAT_TAG.to_string(),
        version: crate::artifact::VERSION.to_string(),
        public_key: pk.clone(),
        chunk_size,
        length_a: plaintext_a.len(),
        length_b: plaintext_b.len(),
        stream_a: masked_a.iter().map(bigint_to_hex).collect(),
        stream_b: masked_b.iter().map(bigint_to_hex).collect(),
        mask_metadata_a: MaskMetadata {
            label: "A".to_string(),
            seed: seed.to_vec(),
        },
        mask_metadata_b: MaskMetadata {
            label: "B".to_string(),
            seed: seed.to_vec(),
        },
        indistinguishability_metadata: None,
    })
}

/// Pads the shorter of `a`/`b` by repeating its last entry until lengths match.
fn pad_to_equal_length(a: &mut Vec<num_bigint_dig::BigInt>, b: &mut Vec<num_bigint_dig::BigInt>) {
    use std::cmp::Ordering;
    match a.len().cmp(&b.len()) {
        Ordering::Less => {
            let last = a.last().cloned();
            if let Some(last) = last {
                while a.len() < b.len() {
                    a.push(last.clone());
                }
            }
        }
        Ordering::Greater => {
            let last = b.last().cloned();
            if let Some(last) = last {
                while b.len() < a.len() {
                    b.push(last.clone());
                }
            }
        }
        Ordering::Equal => {}
    }
}

/// Runs the stream selector on `key`, extracts the selected stream, removes
/// its mask, decrypts, and reassembles the original bytes. Decryption with
/// a key whose selector yields the other label is not an error: it
/// silently returns the other plaintext.
pub fn decrypt_stream(
    artifact: &StreamArtifact,
    key: &[u8],
    sk: &PrivateKey,
) -> Result<Vec<u8>, DualStreamError> {
    let label = selector::select(key);
    decrypt_explicit(artifact, label, sk)
}

/// Bypasses the selector and decrypts the named stream directly. Exposed
/// for testing only; production callers must route through [`decrypt_stream`].
pub fn decrypt_explicit(
    artifact: &StreamArtifact,
    label: Label,
    sk: &PrivateKey,
) -> Result<Vec<u8>, DualStreamError> {
    if sk.n != artifact.public_key.n {
        return Err(DualStreamError::DecryptionError(
            "private key does not correspond to artifact's public key".to_string(),
        ));
    }

    let (stream_hex, mask_label, original_len) = match label {
        Label::A => (&artifact.stream_a, "A", artifact.length_a),
        Label::B => (&artifact.stream_b, "B", artifact.length_b),
    };

    let seed_bytes = match label {
        Label::A => &artifact.mask_metadata_a.seed,
        Label::B => &artifact.mask_metadata_b.seed,
    };
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&seed_bytes[..32]);

    let masked: Vec<_> = stream_hex
        .iter()
        .map(|hex| hex_to_bigint(hex))
        .collect::<Result<_, _>>()
        .map_err(ArtifactError::InvalidArtifact)?;

    let params = mask::derive_mask_parameters(&seed, mask_label, &sk.public_key.n);
    let unmasked = mask::remove_mask(&sk.public_key, &masked, &params)?;

    let plaintexts: Vec<_> = unmasked
        .iter()
        .map(|c| {
            sk.decrypt(c)
                .map_err(|e| DualStreamError::DecryptionError(e.to_string()))
        })
        .collect::<Result<_, _>>()?;

    Ok(chunker::reassemble(&plaintexts, artifact.chunk_size, original_len))
}
