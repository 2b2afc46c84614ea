// Paillier cryptosystem: key generation, encryption, decryption, and the
// homomorphic operations the mask layer and indistinguishability layer
// build on. Generalized from `crypto/paillier/paillier.rs`'s safe-prime,
// ZK-proof-carrying keygen down to the plain "two random same-size primes,
// resample on collision" contract this crate needs; the Gennaro proof
// machinery there is TSS-specific and has no counterpart here.

use crate::common::int::{self, IntError};
use crate::common::random;
use log::debug;
use num_bigint_dig::BigInt;
use num_traits::{One, Signed};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::common::bigint_decimal;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaillierError {
    #[error("message out of range [0, n)")]
    MessageOutOfRange,
    #[error("ciphertext out of range [0, n^2)")]
    InvalidCiphertext,
    #[error("key generation failed: {0}")]
    KeyGenFailure(String),
    #[error("decryption failed: {0}")]
    DecryptionFailure(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    #[serde(with = "bigint_decimal")]
    pub n: BigInt,
    #[serde(with = "bigint_decimal")]
    pub g: BigInt,
}

impl PublicKey {
    fn n_square(&self) -> BigInt {
        &self.n * &self.n
    }

    /// `0 <= m < n`. Draws fresh randomness `r` coprime to `n` and returns
    /// `c = g^m * r^n mod n^2`.
    pub fn encrypt<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        m: &BigInt,
    ) -> Result<BigInt, PaillierError> {
        if !int::is_in_interval(m, &self.n) {
            return Err(PaillierError::MessageOutOfRange);
        }
        let n2 = self.n_square();
        let r = random::get_random_positive_relatively_prime_int(rng, &self.n)
            .expect("self.n is positive");
        let gm = int::modpow(&self.g, m, &n2);
        let rn = int::modpow(&r, &self.n, &n2);
        Ok(int::modpow(&(gm * rn), &BigInt::one(), &n2))
    }

    /// `c1 * c2 mod n^2`, decrypting to `m1 + m2 mod n`.
    pub fn add(&self, c1: &BigInt, c2: &BigInt) -> Result<BigInt, PaillierError> {
        let n2 = self.n_square();
        self.check_ciphertext(c1, &n2)?;
        self.check_ciphertext(c2, &n2)?;
        Ok(int::modpow(&(c1 * c2), &BigInt::one(), &n2))
    }

    /// `c * g^k mod n^2`, decrypting to `m + k mod n`.
    pub fn add_constant(&self, c: &BigInt, k: &BigInt) -> Result<BigInt, PaillierError> {
        let n2 = self.n_square();
        self.check_ciphertext(c, &n2)?;
        let k_mod = int::modpow(k, &BigInt::one(), &self.n);
        let gk = int::modpow(&self.g, &k_mod, &n2);
        Ok(int::modpow(&(c * gk), &BigInt::one(), &n2))
    }

    /// `c^k mod n^2`, decrypting to `k*m mod n`.
    pub fn multiply_constant(&self, c: &BigInt, k: &BigInt) -> Result<BigInt, PaillierError> {
        let n2 = self.n_square();
        self.check_ciphertext(c, &n2)?;
        let k_mod = int::modpow(k, &BigInt::one(), &self.n);
        Ok(int::modpow(c, &k_mod, &n2))
    }

    /// `c * r^n mod n^2` with fresh `r`: same plaintext, new ciphertext.
    pub fn randomize<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        c: &BigInt,
    ) -> Result<BigInt, PaillierError> {
        let n2 = self.n_square();
        self.check_ciphertext(c, &n2)?;
        let r = random::get_random_positive_relatively_prime_int(rng, &self.n)
            .expect("self.n is positive");
        let rn = int::modpow(&r, &self.n, &n2);
        Ok(int::modpow(&(c * rn), &BigInt::one(), &n2))
    }

    fn check_ciphertext(&self, c: &BigInt, n2: &BigInt) -> Result<(), PaillierError> {
        if c.is_negative() || c >= n2 {
            return Err(PaillierError::InvalidCiphertext);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[serde(with = "bigint_decimal")]
    pub lambda: BigInt,
    #[serde(with = "bigint_decimal")]
    pub mu: BigInt,
    #[serde(with = "bigint_decimal")]
    pub p: BigInt,
    #[serde(with = "bigint_decimal")]
    pub q: BigInt,
    #[serde(with = "bigint_decimal")]
    pub n: BigInt,
    #[serde(skip)]
    #[zeroize(skip)]
    pub public_key: PublicKey,
}

impl PrivateKey {
    /// `m = L(c^lambda mod n^2) * mu mod n` where `L(x) = (x-1)/n`.
    pub fn decrypt(&self, c: &BigInt) -> Result<BigInt, PaillierError> {
        let n2 = self.n.clone() * &self.n;
        if c.is_negative() || c >= &n2 {
            return Err(PaillierError::InvalidCiphertext);
        }
        let cl = int::modpow(c, &self.lambda, &n2);
        let l_val = l_function(&cl, &self.n);
        Ok(int::modpow(&(l_val * &self.mu), &BigInt::one(), &self.n))
    }
}

/// `L(x) = (x - 1) / n`.
fn l_function(x: &BigInt, n: &BigInt) -> BigInt {
    (x - BigInt::one()) / n
}

/// Generates a keypair with `bits`-bit modulus (primes of `bits/2` length
/// each, resampled on collision, restarted if `gcd(lambda, n) != 1`).
pub fn generate_keypair<R: CryptoRng + RngCore>(
    rng: &mut R,
    bits: usize,
) -> Result<(PublicKey, PrivateKey), PaillierError> {
    if bits < 8 || bits % 2 != 0 {
        return Err(PaillierError::KeyGenFailure(format!(
            "bits must be even and >= 8, got {bits}"
        )));
    }
    let half = bits / 2;
    loop {
        let p = int::random_prime(rng, half);
        let mut q = int::random_prime(rng, half);
        while q == p {
            q = int::random_prime(rng, half);
        }
        let n = &p * &q;
        let p_minus_1 = &p - BigInt::one();
        let q_minus_1 = &q - BigInt::one();
        let lambda = int::lcm(&p_minus_1, &q_minus_1);
        if int::gcd(&lambda, &n) != BigInt::one() {
            debug!("paillier keygen: gcd(lambda, n) != 1, resampling");
            continue;
        }
        let g = &n + BigInt::one();
        let n2 = &n * &n;
        let gl = int::modpow(&g, &lambda, &n2);
        let l_val = l_function(&gl, &n);
        let mu = match int::modinv(&l_val, &n) {
            Ok(mu) => mu,
            Err(IntError::NotCoprime) => {
                debug!("paillier keygen: L(g^lambda) not invertible mod n, resampling");
                continue;
            }
            Err(e) => return Err(PaillierError::KeyGenFailure(e.to_string())),
        };
        let public_key = PublicKey { n: n.clone(), g };
        let private_key = PrivateKey {
            lambda,
            mu,
            p,
            q,
            n,
            public_key: public_key.clone(),
        };
        return Ok((public_key, private_key));
    }
}
