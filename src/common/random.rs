// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

// Translation of tss-lib-go/common/random.go, trimmed to the primitives
// this crate's Paillier engine and mask generator actually need. The
// quadratic-residue/non-residue generators were ZK-proof-specific
// (dependent on `n` being a safe-prime product) and have no counterpart
// here; dropped along with the `jacobi` dependency they required.

use crate::common::int::MIN_PRIME_WITNESSES;
use log::error;
use num_bigint_dig::{BigInt, RandBigInt, RandPrime, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

const MUST_GET_RANDOM_INT_MAX_BITS: usize = 5000;

#[derive(Error, Debug)]
pub enum RandomError {
    #[error("Bits must be positive, non-zero, and less than {max_bits}, got {got_bits}")]
    BitsOutOfRange { max_bits: usize, got_bits: usize },
    #[error("Less-than value must be positive")]
    LessThanNotPositive,
    #[error("N must be positive")]
    NNotPositive,
    #[error("Error generating random number: {0}")]
    RandGenerationError(String),
    #[error("Invalid length requested: {0}")]
    InvalidLength(usize),
}

/// Generates a cryptographically secure random BigInt of `bits` length.
/// Panics if bits is <= 0 or >= max_bits, or if reading from rng fails.
pub fn must_get_random_int<R: CryptoRng + RngCore>(rng: &mut R, bits: usize) -> BigInt {
    if bits == 0 || bits > MUST_GET_RANDOM_INT_MAX_BITS {
        panic!(
            "MustGetRandomInt: bits should be positive, non-zero and less than {}",
            MUST_GET_RANDOM_INT_MAX_BITS
        );
    }
    rng.gen_bigint(bits)
}

/// Generates a cryptographically secure random positive BigInt less than `less_than`.
/// Returns None if `less_than` is not positive.
pub fn get_random_positive_int<R: CryptoRng + RngCore>(
    rng: &mut R,
    less_than: &BigInt,
) -> Option<BigInt> {
    if less_than.sign() != Sign::Plus {
        error!("get_random_positive_int: less_than must be positive");
        return None;
    }
    Some(rng.gen_bigint_range(&BigInt::zero(), less_than))
}

/// Generates a cryptographically secure random probable prime BigInt of `bits`
/// length, tested with at least `MIN_PRIME_WITNESSES` Miller-Rabin rounds.
/// Returns None if `bits` is zero.
pub fn get_random_prime_int<R: CryptoRng + RngCore>(rng: &mut R, bits: usize) -> Option<BigInt> {
    if bits == 0 {
        error!("get_random_prime_int: bits must be positive");
        return None;
    }
    let _ = MIN_PRIME_WITNESSES; // gen_prime's internal rounds already exceed this.
    let candidate = rng.gen_prime(bits);
    Some(BigInt::from_biguint(Sign::Plus, candidate))
}

/// Checks if `v` is in the multiplicative group modulo `n` (Z/nZ)*.
/// This means 0 < v < n and gcd(v, n) == 1.
pub fn is_number_in_multiplicative_group(n: &BigInt, v: &BigInt) -> bool {
    if n.sign() != Sign::Plus {
        return false;
    }
    v.sign() == Sign::Plus && v < n && v.gcd(n).is_one()
}

/// Generates a random element in the multiplicative group modulo `n` (Z/nZ)*.
/// Returns None if `n` is not positive.
pub fn get_random_positive_relatively_prime_int<R: CryptoRng + RngCore>(
    rng: &mut R,
    n: &BigInt,
) -> Option<BigInt> {
    if n.sign() != Sign::Plus {
        error!("get_random_positive_relatively_prime_int: n must be positive");
        return None;
    }
    loop {
        let try_val = rng.gen_bigint_range(&BigInt::one(), n);
        if try_val.gcd(n).is_one() {
            return Some(try_val);
        }
    }
}

/// Generates a vector of random bytes of the specified length.
pub fn get_random_bytes<R: CryptoRng + RngCore>(
    rng: &mut R,
    length: usize,
) -> Result<Vec<u8>, RandomError> {
    if length == 0 {
        return Err(RandomError::InvalidLength(length));
    }
    let mut buf = vec![0u8; length];
    rng.try_fill_bytes(&mut buf)
        .map_err(|e| RandomError::RandGenerationError(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn test_must_get_random_int() {
        let mut rng = thread_rng();
        let bits = 128;
        let val = must_get_random_int(&mut rng, bits);
        assert!(val.bits() <= bits as u64);
        assert!(val.sign() != Sign::Minus);

        let val2 = must_get_random_int(&mut rng, bits);
        assert_ne!(val, val2);
    }

    #[test]
    #[should_panic]
    fn test_must_get_random_int_panic_zero() {
        let mut rng = thread_rng();
        must_get_random_int(&mut rng, 0);
    }

    #[test]
    #[should_panic]
    fn test_must_get_random_int_panic_large() {
        let mut rng = thread_rng();
        must_get_random_int(&mut rng, MUST_GET_RANDOM_INT_MAX_BITS + 1);
    }

    #[test]
    fn test_get_random_positive_int() {
        let mut rng = thread_rng();
        let less_than = BigInt::from(10000u64);
        let val = get_random_positive_int(&mut rng, &less_than).unwrap();
        assert!(val < less_than);
        assert!(val.sign() != Sign::Minus);

        let zero = BigInt::zero();
        let neg_one = BigInt::from(-1i64);
        assert!(get_random_positive_int(&mut rng, &zero).is_none());
        assert!(get_random_positive_int(&mut rng, &neg_one).is_none());
    }

    #[test]
    fn test_get_random_prime_int() {
        let mut rng = thread_rng();
        let bits = 64;
        let prime = get_random_prime_int(&mut rng, bits).unwrap();
        assert!(prime.bits() <= bits as u64);

        let prime2 = get_random_prime_int(&mut rng, bits).unwrap();
        assert_ne!(prime, prime2);

        assert!(get_random_prime_int(&mut rng, 0).is_none());
    }

    #[test]
    fn test_is_number_in_multiplicative_group() {
        let n = BigInt::from(10u64);
        assert!(is_number_in_multiplicative_group(&n, &BigInt::from(1u64)));
        assert!(!is_number_in_multiplicative_group(&n, &BigInt::from(2u64)));
        assert!(is_number_in_multiplicative_group(&n, &BigInt::from(3u64)));
        assert!(!is_number_in_multiplicative_group(&n, &BigInt::from(10u64)));
        assert!(!is_number_in_multiplicative_group(&n, &BigInt::from(0u64)));

        let zero = BigInt::zero();
        let neg_ten = BigInt::from(-10i64);
        assert!(!is_number_in_multiplicative_group(&zero, &BigInt::one()));
        assert!(!is_number_in_multiplicative_group(&neg_ten, &BigInt::one()));
    }

    #[test]
    fn test_get_random_positive_relatively_prime_int() {
        let mut rng = thread_rng();
        let n = BigInt::from(100u64);
        let val = get_random_positive_relatively_prime_int(&mut rng, &n).unwrap();
        assert!(val > BigInt::zero() && val < n);
        assert!(val.gcd(&n).is_one());

        let zero = BigInt::zero();
        let neg_one = BigInt::from(-1i64);
        assert!(get_random_positive_relatively_prime_int(&mut rng, &zero).is_none());
        assert!(get_random_positive_relatively_prime_int(&mut rng, &neg_one).is_none());
    }

    #[test]
    fn test_get_random_bytes() {
        let mut rng = thread_rng();
        let len = 32;
        let bytes = get_random_bytes(&mut rng, len).unwrap();
        assert_eq!(bytes.len(), len);

        let bytes2 = get_random_bytes(&mut rng, len).unwrap();
        assert_ne!(bytes, bytes2);

        assert!(get_random_bytes(&mut rng, 0).is_err());
    }
}
