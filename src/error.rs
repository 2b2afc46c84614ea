// Top-level error enum unifying the per-module errors at the public API
// boundary (`generate_keypair`, `encrypt_pair`, `decrypt`,
// `decrypt_explicit`). `NotCoprime` never reaches this enum — it is caught
// and retried internally within `common::int`/`paillier`.

use crate::artifact::ArtifactError;
use crate::chunker::ChunkerError;
use crate::dualstream::DualStreamError;
use crate::mask::MaskError;
use crate::paillier::PaillierError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),
    #[error("invalid ciphertext")]
    InvalidCiphertext,
    #[error("mask removal failed")]
    MaskRemovalError,
    #[error("decryption failed: {0}")]
    DecryptionError(String),
    #[error("key generation failed: {0}")]
    KeyGenFailure(String),
    #[error("chunk size too large: {0}")]
    ChunkSizeTooLarge(String),
}

impl From<ArtifactError> for Error {
    fn from(e: ArtifactError) -> Self {
        match e {
            ArtifactError::InvalidArtifact(msg) => Error::InvalidArtifact(msg),
        }
    }
}

impl From<PaillierError> for Error {
    fn from(e: PaillierError) -> Self {
        match e {
            PaillierError::MessageOutOfRange => {
                Error::InvalidArtifact("message out of range".to_string())
            }
            PaillierError::InvalidCiphertext => Error::InvalidCiphertext,
            PaillierError::KeyGenFailure(msg) => Error::KeyGenFailure(msg),
            PaillierError::DecryptionFailure(msg) => Error::DecryptionError(msg),
        }
    }
}

impl From<MaskError> for Error {
    fn from(e: MaskError) -> Self {
        match e {
            MaskError::MaskRemovalError => Error::MaskRemovalError,
        }
    }
}

impl From<ChunkerError> for Error {
    fn from(e: ChunkerError) -> Self {
        match e {
            ChunkerError::ChunkSizeTooLarge { .. } => Error::ChunkSizeTooLarge(e.to_string()),
        }
    }
}

impl From<DualStreamError> for Error {
    fn from(e: DualStreamError) -> Self {
        match e {
            DualStreamError::Artifact(inner) => inner.into(),
            DualStreamError::Paillier(inner) => inner.into(),
            DualStreamError::Mask(inner) => inner.into(),
            DualStreamError::Chunker(inner) => inner.into(),
            DualStreamError::DecryptionError(msg) => Error::DecryptionError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_coprime_never_surfaces() {
        // crate::common::int::IntError::NotCoprime has no From impl into
        // Error and is never constructed outside common::int/paillier.
        let err: Error = PaillierError::InvalidCiphertext.into();
        assert_eq!(err, Error::InvalidCiphertext);
    }
}
