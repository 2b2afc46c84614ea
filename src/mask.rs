// Keyed affine mask layer: rewrites a ciphertext of `m` into a ciphertext
// of `alpha*m + beta mod n`, invertibly, using only the public key.
// Grounded in `crypto_mask.py::generate_mask_params` for the
// derive-from-seed-and-label shape, resolved to the affine-only
// construction (polynomial/substitution variants in that source are not
// carried forward — see the crate's design notes). Per-index derivation
// uses `hmac::Hmac<Sha256>` keyed by the seed, rather than a bare hash of
// seed-plus-message (HMAC is the right primitive once the seed is acting
// as a PRF key rather than hashed data).

use crate::common::int;
use crate::paillier::PublicKey;
use hmac::{Hmac, Mac};
use num_bigint_dig::{BigInt, Sign};
use num_traits::{One, Zero};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Number of per-stream (alpha, beta) pairs; position `j` in a stream uses
/// the pair at index `j mod K`.
pub const K: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    #[error("mask removal failed: alpha is not invertible mod n")]
    MaskRemovalError,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskParameters {
    pub additive: [BigInt; K],
    pub multiplicative: [BigInt; K],
}

fn hmac_to_bigint(seed: &[u8; 32], label: &str, tag: &str, index: usize, counter: u32) -> BigInt {
    let mut mac = HmacSha256::new_from_slice(seed).expect("HMAC accepts any key length");
    mac.update(label.as_bytes());
    mac.update(tag.as_bytes());
    mac.update(&(index as u32).to_le_bytes());
    if counter > 0 {
        mac.update(&counter.to_le_bytes());
    }
    let digest = mac.finalize().into_bytes();
    BigInt::from_bytes_be(Sign::Plus, &digest)
}

/// Derives the K-entry (alpha, beta) parameter set for `label` from `seed`
/// and modulus `n`. Multiplicative entries are rehashed with a counter
/// until nonzero and coprime with `n`.
pub fn derive_mask_parameters(seed: &[u8; 32], label: &str, n: &BigInt) -> MaskParameters {
    let mut additive: Vec<BigInt> = Vec::with_capacity(K);
    let mut multiplicative: Vec<BigInt> = Vec::with_capacity(K);

    for i in 0..K {
        let beta = int::modpow(&hmac_to_bigint(seed, label, "add", i, 0), &BigInt::one(), n);
        additive.push(beta);

        let mut counter = 0u32;
        loop {
            let candidate = int::modpow(
                &hmac_to_bigint(seed, label, "mul", i, counter),
                &BigInt::one(),
                n,
            );
            if !candidate.is_zero() && int::gcd(&candidate, n) == BigInt::one() {
                multiplicative.push(candidate);
                break;
            }
            counter += 1;
        }
    }

    MaskParameters {
        additive: additive.try_into().expect("K entries pushed"),
        multiplicative: multiplicative.try_into().expect("K entries pushed"),
    }
}

/// `c' = (c^alpha_i * g^beta_i) mod n^2` for `c` at position `j`, `i = j mod K`.
/// Decrypting `c'` yields `alpha_i * m + beta_i mod n`.
pub fn apply_mask(
    pk: &PublicKey,
    ciphertexts: &[BigInt],
    params: &MaskParameters,
) -> Result<Vec<BigInt>, crate::paillier::PaillierError> {
    ciphertexts
        .iter()
        .enumerate()
        .map(|(j, c)| {
            let i = j % K;
            let scaled = pk.multiply_constant(c, &params.multiplicative[i])?;
            pk.add_constant(&scaled, &params.additive[i])
        })
        .collect()
}

/// Inverse of [`apply_mask`]: `c = (c' * g^-beta_i)^{alpha_i^-1} mod n^2`.
pub fn remove_mask(
    pk: &PublicKey,
    masked: &[BigInt],
    params: &MaskParameters,
) -> Result<Vec<BigInt>, MaskError> {
    let mut alpha_inverses = Vec::with_capacity(K);
    for alpha in &params.multiplicative {
        match int::modinv(alpha, &pk.n) {
            Ok(inv) => alpha_inverses.push(inv),
            Err(_) => return Err(MaskError::MaskRemovalError),
        }
    }

    masked
        .iter()
        .enumerate()
        .map(|(j, c_prime)| {
            let i = j % K;
            let neg_beta = int::modpow(&(-&params.additive[i]), &BigInt::one(), &pk.n);
            let unshifted = pk
                .add_constant(c_prime, &neg_beta)
                .map_err(|_| MaskError::MaskRemovalError)?;
            pk.multiply_constant(&unshifted, &alpha_inverses[i])
                .map_err(|_| MaskError::MaskRemovalError)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::generate_keypair;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn mask_and_remove_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let (pk, sk) = generate_keypair(&mut rng, 128).unwrap();
        let seed = [0x42u8; 32];
        let params = derive_mask_parameters(&seed, "A", &pk.n);

        let plaintexts: Vec<BigInt> = (0..(K as u64 * 2)).map(BigInt::from).collect();
        let ciphertexts: Vec<BigInt> = plaintexts
            .iter()
            .map(|m| pk.encrypt(&mut rng, m).unwrap())
            .collect();

        let masked = apply_mask(&pk, &ciphertexts, &params).unwrap();
        let unmasked = remove_mask(&pk, &masked, &params).unwrap();

        for (c, m) in unmasked.iter().zip(plaintexts.iter()) {
            assert_eq!(&sk.decrypt(c).unwrap(), m);
        }
    }

    #[test]
    fn mask_produces_expected_affine_image() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let (pk, sk) = generate_keypair(&mut rng, 128).unwrap();
        let seed = [0x00u8; 32];
        let params = derive_mask_parameters(&seed, "A", &pk.n);

        let m = BigInt::from(100);
        let c = pk.encrypt(&mut rng, &m).unwrap();
        let masked = apply_mask(&pk, &[c.clone()], &params).unwrap();
        let decrypted_masked = sk.decrypt(&masked[0]).unwrap();

        let expected =
            int::modpow(&(&params.multiplicative[0] * &m + &params.additive[0]), &BigInt::one(), &pk.n);
        assert_eq!(decrypted_masked, expected);

        let unmasked = remove_mask(&pk, &masked, &params).unwrap();
        assert_eq!(sk.decrypt(&unmasked[0]).unwrap(), m);
    }

    #[test]
    fn different_labels_give_different_parameters() {
        let seed = [0x11u8; 32];
        let n = BigInt::from(1_000_003u64);
        let a = derive_mask_parameters(&seed, "A", &n);
        let b = derive_mask_parameters(&seed, "B", &n);
        assert_ne!(a.additive, b.additive);
    }

    #[test]
    fn multiplicative_entries_are_units() {
        let seed = [0x77u8; 32];
        let n = BigInt::from(1_000_003u64);
        let params = derive_mask_parameters(&seed, "A", &n);
        for alpha in &params.multiplicative {
            assert!(!alpha.is_zero());
            assert_eq!(int::gcd(alpha, &n), BigInt::one());
        }
    }
}
