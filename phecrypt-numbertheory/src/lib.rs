#![warn(missing_docs, unused_imports)]

//! _This is a part of **phecrypt**. For more information, head to the
//! [phecrypt](https://crates.io/crates/phecrypt) crate homepage._
//!
//! Number theoretic algorithms on arbitrary-precision integers: primality testing, generation of
//! random (safe) primes with structural constraints, uniform sampling of residues, and modular
//! exponentiation and inversion that report failure instead of panicking.

use phecrypt_traits::randomness::{GeneralRng, SecureRng};
use phecrypt_traits::{Error, Result};
use rug::integer::IsPrime;
use rug::ops::RemRounding;
use rug::Integer;
use tracing::trace;

/// The default certainty (in bits) of primality tests, so a composite is accepted with probability
/// at most $2^{-64}$.
pub const DEFAULT_CERTAINTY: u32 = 64;

/// The maximum number of candidates any rejection-sampling loop draws before giving up. Reaching
/// it means the random source or the requested constraints are broken.
pub const MAX_SAMPLING_ATTEMPTS: u64 = 1 << 24;

/// Returns whether `candidate` is prime, except with probability at most $2^{-certainty}$.
pub fn is_probable_prime(candidate: &Integer, certainty: u32) -> bool {
    // Every Miller-Rabin round lets a composite through with probability at most 1/4.
    let reps = ((certainty + 1) / 2).max(1);
    candidate.is_probably_prime(reps) != IsPrime::No
}

/// Samples a uniformly random integer in $[0, 2^{bit\\_length})$.
pub fn gen_uniform<R: SecureRng>(bit_length: u32, rng: &mut GeneralRng<R>) -> Integer {
    Integer::from(Integer::random_bits(bit_length, &mut rng.rug_rng()))
}

/// Samples a uniformly random integer in $[0, bound)$.
pub fn gen_below<R: SecureRng>(bound: &Integer, rng: &mut GeneralRng<R>) -> Integer {
    Integer::from(bound.random_below_ref(&mut rng.rug_rng()))
}

/// Generates a uniformly random prime number of a given bit length. So, the number contains
/// `bit_length` bits, of which the first and the last bit are always 1.
pub fn gen_prime<R: SecureRng>(bit_length: u32, rng: &mut GeneralRng<R>) -> Result<Integer> {
    if bit_length < 2 {
        return Err(Error::InvalidParameters(format!(
            "primes need at least 2 bits, got {}",
            bit_length
        )));
    }

    for attempts in 1..=MAX_SAMPLING_ATTEMPTS {
        let mut candidate = gen_uniform(bit_length, rng);
        candidate.set_bit(bit_length - 1, true);
        candidate.set_bit(0, true);

        if is_probable_prime(&candidate, DEFAULT_CERTAINTY) {
            trace!(bit_length, attempts, "sampled prime");
            return Ok(candidate);
        }
    }

    Err(Error::SamplingExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}

/// Generates a uniformly random *safe* prime number of a given bit length. This is a prime $p$ of
/// the form $p = 2q + 1$, where $q$ is a smaller prime.
pub fn gen_safe_prime<R: SecureRng>(bit_length: u32, rng: &mut GeneralRng<R>) -> Result<Integer> {
    for attempts in 1..=MAX_SAMPLING_ATTEMPTS {
        let mut candidate = gen_prime(bit_length.saturating_sub(1), rng)?;

        candidate <<= 1;
        candidate += 1;

        // 2q + 1 is a multiple of 3 whenever q = 1 mod 3
        if candidate.mod_u(3) == 0 {
            continue;
        }

        if is_probable_prime(&candidate, DEFAULT_CERTAINTY) {
            trace!(bit_length, attempts, "sampled safe prime");
            return Ok(candidate);
        }
    }

    Err(Error::SamplingExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}

/// Generates a random prime $p$ of a given bit length such that $p = 1 \mod m$, where $m$ is the
/// odd `modulus`. In other words, $m$ divides the order of the multiplicative group modulo $p$.
pub fn gen_prime_one_mod<R: SecureRng>(
    bit_length: u32,
    modulus: &Integer,
    rng: &mut GeneralRng<R>,
) -> Result<Integer> {
    if modulus.is_even() || modulus.significant_bits() + 1 >= bit_length {
        return Err(Error::InvalidParameters(format!(
            "cannot fit a {}-bit prime that is 1 modulo {}",
            bit_length, modulus
        )));
    }

    // Stepping by 2m keeps the candidate odd.
    let mut step = modulus.clone();
    step <<= 1;

    for attempts in 1..=MAX_SAMPLING_ATTEMPTS {
        let mut candidate = gen_uniform(bit_length, rng);
        candidate.set_bit(bit_length - 1, true);

        let remainder = Integer::from((&candidate).rem_euc(&step));
        candidate -= remainder;
        candidate += 1;

        if candidate.significant_bits() != bit_length {
            continue;
        }

        if is_probable_prime(&candidate, DEFAULT_CERTAINTY) {
            trace!(bit_length, attempts, "sampled prime congruent to one");
            return Ok(candidate);
        }
    }

    Err(Error::SamplingExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}

/// Generates a uniformly random coprime $x$ to the `other` integer $y$. This means that
/// $\gcd(x, y) = 1$ and $0 < x < y$, so $x$ is a uniformly random unit modulo $y$.
pub fn gen_coprime<R: SecureRng>(other: &Integer, rng: &mut GeneralRng<R>) -> Result<Integer> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let candidate = gen_below(other, rng);

        if Integer::from(candidate.gcd_ref(other)) == 1 {
            return Ok(candidate);
        }
    }

    Err(Error::SamplingExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}

/// Returns whether `value` lies in $\mathbb{Z}^*_{modulus}$, i.e. $0 \leq value < modulus$ and
/// $\gcd(value, modulus) = 1$.
pub fn is_unit(value: &Integer, modulus: &Integer) -> bool {
    *value >= 0 && value < modulus && Integer::from(value.gcd_ref(modulus)) == 1
}

/// Computes $base^{exponent} \mod modulus$. A negative exponent requires `base` to be invertible,
/// otherwise this fails with [`Error::NonInvertibleElement`].
pub fn mod_pow(base: &Integer, exponent: &Integer, modulus: &Integer) -> Result<Integer> {
    base.pow_mod_ref(exponent, modulus)
        .map(Integer::from)
        .ok_or(Error::NonInvertibleElement)
}

/// Computes the inverse of `value` modulo `modulus`.
pub fn mod_inverse(value: &Integer, modulus: &Integer) -> Result<Integer> {
    value
        .invert_ref(modulus)
        .map(Integer::from)
        .ok_or(Error::NonInvertibleElement)
}
