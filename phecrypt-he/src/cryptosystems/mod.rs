use phecrypt_numbertheory::MAX_SAMPLING_ATTEMPTS;
use phecrypt_traits::{Error, Result};

/// Implementation of the Benaloh cryptosystem.
pub mod benaloh;
/// Implementation of the Boneh-Goh-Nissim (BGN) cryptosystem.
pub mod bgn;
/// Implementation of the Paillier cryptosystem.
pub mod paillier;

/// Repeats `draw` until it yields a candidate, at most `MAX_SAMPLING_ATTEMPTS` times.
pub(crate) fn sample<T>(mut draw: impl FnMut() -> Result<Option<T>>) -> Result<T> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        if let Some(candidate) = draw()? {
            return Ok(candidate);
        }
    }

    Err(Error::SamplingExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}

/// Finds the smallest $i \in [0, bound]$ with $step^i = target$ by walking through the powers of
/// `step` one multiplication at a time.
pub(crate) fn bounded_log<E: PartialEq>(
    target: &E,
    step: &E,
    identity: E,
    bound: u64,
    mul: impl Fn(&E, &E) -> E,
) -> Option<u64> {
    let mut candidate = identity;
    for i in 0..=bound {
        if candidate == *target {
            return Some(i);
        }
        candidate = mul(&candidate, step);
    }

    None
}
