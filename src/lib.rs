//! Indistinguishable homomorphic masking: two plaintexts, one artifact,
//! two keys. Two distinct plaintexts are jointly encrypted into a single
//! Paillier-based ciphertext artifact; which of the two keys an operator
//! treats as "the real one" is not recoverable from the artifact or
//! source code alone.

pub mod adapter;
pub mod artifact;
pub mod chunker;
pub mod common;
pub mod dualstream;
pub mod error;
pub mod indist;
pub mod mask;
pub mod paillier;
pub mod selector;

pub use error::Error;

use artifact::StreamArtifact;
use paillier::{PrivateKey, PublicKey};
use rand::{CryptoRng, RngCore};
use selector::Label;

/// Recommended modulus size for production use; smaller sizes (e.g. 1024)
/// are accepted for test harnesses.
pub const RECOMMENDED_KEY_BITS: usize = 2048;

/// `opts` contract for [`encrypt_pair`].
#[derive(Clone, Debug)]
pub struct EncryptOptions {
    pub chunk_size: usize,
    pub use_indistinguishability: bool,
    pub noise_scale: f64,
    pub redundancy_factor: usize,
}

impl Default for EncryptOptions {
    fn default() -> Self {
        EncryptOptions {
            chunk_size: 64,
            use_indistinguishability: false,
            noise_scale: 1e-4,
            redundancy_factor: 1,
        }
    }
}

/// Generates a Paillier keypair with `bits`-bit modulus. Prime generation
/// retries internally on collision; fails only if `bits` is invalid.
pub fn generate_keypair<R: CryptoRng + RngCore>(
    rng: &mut R,
    bits: usize,
) -> Result<(PublicKey, PrivateKey), Error> {
    paillier::generate_keypair(rng, bits).map_err(Error::from)
}

/// Jointly encrypts `bytes_a` and `bytes_b` under `pk` into a single
/// serialized artifact. A fresh 32-byte seed is drawn for this call.
pub fn encrypt_pair<R: CryptoRng + RngCore>(
    rng: &mut R,
    bytes_a: &[u8],
    bytes_b: &[u8],
    pk: &PublicKey,
    opts: &EncryptOptions,
) -> Result<Vec<u8>, Error> {
    let mut seed = [0u8; 32];
    rng.fill_bytes(&mut seed);

    let artifact =
        dualstream::encrypt_pair(rng, bytes_a, bytes_b, pk, opts.chunk_size, seed)?;

    let artifact = if opts.use_indistinguishability {
        let indist_opts = indist::IndistOptions {
            noise_scale: opts.noise_scale,
            redundancy_factor: opts.redundancy_factor,
        };
        indist::wrap(rng, pk, artifact, &indist_opts).map_err(Error::from)?
    } else {
        artifact
    };

    Ok(artifact.to_bytes())
}

/// Selects a stream from `key` and decrypts it. Decryption with a key
/// whose selector yields the other label is not an error — it silently
/// returns the other plaintext; this is the indistinguishability property.
pub fn decrypt(artifact_bytes: &[u8], key: &[u8], sk: &PrivateKey) -> Result<Vec<u8>, Error> {
    let artifact = parse_and_unwrap(artifact_bytes, &sk.public_key)?;
    dualstream::decrypt_stream(&artifact, key, sk).map_err(Error::from)
}

/// Bypasses the selector and decrypts the named stream directly. For
/// testing only; production callers must not expose this.
pub fn decrypt_explicit(
    artifact_bytes: &[u8],
    label: Label,
    sk: &PrivateKey,
) -> Result<Vec<u8>, Error> {
    let artifact = parse_and_unwrap(artifact_bytes, &sk.public_key)?;
    dualstream::decrypt_explicit(&artifact, label, sk).map_err(Error::from)
}

fn parse_and_unwrap(artifact_bytes: &[u8], pk: &PublicKey) -> Result<StreamArtifact, Error> {
    let artifact = StreamArtifact::from_bytes(artifact_bytes)?;
    if artifact.indistinguishability_metadata.is_some() {
        Ok(indist::unwrap(pk, &artifact).map_err(Error::from)?)
    } else {
        Ok(artifact)
    }
}
