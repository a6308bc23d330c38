//! Randomness for key generation, encryption and blinding.
//!
//! No operation in this workspace draws from a global or thread-local source. Every randomized
//! operation takes a `&mut GeneralRng<R>`, so the caller decides where the randomness comes from:
//! `rand_core::OsRng` in production, or a seeded `rand::rngs::StdRng` when keys and ciphertexts
//! have to be reproducible, as in tests and benchmarks.
use rug::rand::{ThreadRandGen, ThreadRandState};

/// A random number generator that is suitable for cryptographic purposes.
pub trait SecureRng: rand_core::RngCore + rand_core::CryptoRng {}

impl<R: rand_core::RngCore + rand_core::CryptoRng> SecureRng for R {}

/// Feeds one `SecureRng` to both `rand_core` consumers and `rug`'s sampling functions (prime
/// generation, `random_below`), so a single seed determines every value a cryptosystem samples.
pub struct GeneralRng<R: SecureRng> {
    rng_wrapper: RngWrapper<R>,
}

impl<R: SecureRng> GeneralRng<R> {
    /// Wraps `rng`. Requiring `CryptoRng` keeps non-cryptographic generators such as
    /// `rand::rngs::SmallRng` out, while seedable ones like `StdRng` remain usable.
    /// ```
    /// # use phecrypt_traits::randomness::GeneralRng;
    /// # use rand::rngs::StdRng;
    /// # use rand::SeedableRng;
    /// let mut rng = GeneralRng::new(StdRng::seed_from_u64(42));
    /// # let _ = rng.rug_rng();
    /// ```
    pub fn new(rng: R) -> Self {
        GeneralRng {
            rng_wrapper: RngWrapper { rng },
        }
    }

    /// Exposes the underlying RNG.
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng_wrapper.rng
    }

    /// Creates a RNG for the `rug` crate that is only suitable for a single thread. It draws from
    /// the wrapped RNG and advances its state.
    pub fn rug_rng(&mut self) -> ThreadRandState<'_> {
        ThreadRandState::new_custom(&mut self.rng_wrapper)
    }
}

struct RngWrapper<R: SecureRng> {
    rng: R,
}

impl<R: SecureRng> ThreadRandGen for RngWrapper<R> {
    fn gen(&mut self) -> u32 {
        self.rng.next_u32()
    }
}
