// Translation of tss-lib-go/common/int.go, generalized beyond its
// ModInt-only scope into the free-function contract the rest of this
// crate's cryptographic machinery (Paillier, mask generator) is specified
// against: modpow, modinv, gcd, lcm, random_prime, random_below.

use crate::common::random;
use num_bigint_dig::{BigInt, ModInverse, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

/// Minimum Miller-Rabin witness count for any prime this crate generates.
pub const MIN_PRIME_WITNESSES: usize = 40;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntError {
    #[error("no modular inverse exists (not coprime)")]
    NotCoprime,
    #[error("modulus must be positive, got {0}")]
    InvalidModulus(String),
}

/// `base^exp mod modulus`, result in `[0, modulus)`. `modulus == 1` returns 0.
pub fn modpow(base: &BigInt, exp: &BigInt, modulus: &BigInt) -> BigInt {
    if modulus.is_one() {
        return BigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Extended-Euclid modular inverse. Fails with `NotCoprime` when
/// `gcd(a, m) != 1`, and `InvalidModulus` when `m <= 0`.
pub fn modinv(a: &BigInt, m: &BigInt) -> Result<BigInt, IntError> {
    if m.sign() != Sign::Plus {
        return Err(IntError::InvalidModulus(m.to_string()));
    }
    let a_mod = modpow(a, &BigInt::one(), m);
    a_mod.mod_inverse(m).ok_or(IntError::NotCoprime)
}

/// `gcd(a, b)`.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    a.gcd(b)
}

/// `lcm(a, b)`.
pub fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
    a.lcm(b)
}

/// A probable prime in `[2^(bits-1), 2^bits)`, Miller-Rabin tested with at
/// least `MIN_PRIME_WITNESSES` rounds, drawn from a CSPRNG.
pub fn random_prime<R: CryptoRng + RngCore>(rng: &mut R, bits: usize) -> BigInt {
    random::get_random_prime_int(rng, bits).expect("bits is checked positive by callers")
}

/// Uniform random value in `[0, n)` from a CSPRNG.
pub fn random_below<R: CryptoRng + RngCore>(rng: &mut R, n: &BigInt) -> BigInt {
    rng.gen_bigint_range(&BigInt::zero(), n)
}

/// `0 <= b < bound`.
pub fn is_in_interval(b: &BigInt, bound: &BigInt) -> bool {
    !b.is_negative() && b < bound
}

/// Appends the big-endian byte representation of `appended` to `initial_bytes`.
pub fn append_bigint_to_bytes_slice(initial_bytes: &[u8], appended: &BigInt) -> Vec<u8> {
    let appended_bytes = appended.to_bytes_be().1;
    let mut result = Vec::with_capacity(initial_bytes.len() + appended_bytes.len());
    result.extend_from_slice(initial_bytes);
    result.extend_from_slice(&appended_bytes);
    result
}

/// A modulus paired with the operations performed against it repeatedly
/// (Paillier's plaintext ring `Z_n` and ciphertext ring `Z_n^2`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModInt {
    modulus: BigInt,
}

impl ModInt {
    pub fn new(modulus: BigInt) -> Self {
        assert!(modulus.sign() == Sign::Plus, "modulus must be positive");
        ModInt { modulus }
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    pub fn add(&self, x: &BigInt, y: &BigInt) -> BigInt {
        modpow(&(x + y), &BigInt::one(), &self.modulus)
    }

    pub fn sub(&self, x: &BigInt, y: &BigInt) -> BigInt {
        modpow(&(x - y), &BigInt::one(), &self.modulus)
    }

    pub fn mul(&self, x: &BigInt, y: &BigInt) -> BigInt {
        modpow(&(x * y), &BigInt::one(), &self.modulus)
    }

    pub fn exp(&self, base: &BigInt, exponent: &BigInt) -> BigInt {
        modpow(base, exponent, &self.modulus)
    }

    pub fn mod_inverse(&self, g: &BigInt) -> Result<BigInt, IntError> {
        modinv(g, &self.modulus)
    }

    pub fn div(&self, x: &BigInt, y: &BigInt) -> Result<BigInt, IntError> {
        self.mod_inverse(y).map(|y_inv| self.mul(x, &y_inv))
    }
}
