//! Here is an example of how to multiply two encrypted values using the pairing.
//! ```
//! use phecrypt_traits::randomness::GeneralRng;
//! use phecrypt_he::cryptosystems::bgn::Bgn;
//! use phecrypt_traits::cryptosystems::{AsymmetricCryptosystem, EncryptionKey};
//! use rand_core::OsRng;
//!
//! let mut rng = GeneralRng::new(OsRng);
//! let (public_key, secret_key) = Bgn::new(32).generate_keys(&mut rng).unwrap();
//!
//! let ciphertext_1 = public_key.encrypt_raw(&5, &mut rng).unwrap();
//! let ciphertext_2 = public_key.encrypt_raw(&6, &mut rng).unwrap();
//!
//! let product = public_key.pairing_mul(&ciphertext_1, &ciphertext_2);
//! assert_eq!(30, secret_key.decrypt_target(&public_key, &product).unwrap());
//! ```

use crate::cryptosystems::{bounded_log, sample};
use phecrypt_numbertheory::gen_below;
use phecrypt_pairing::{TypeA1Generator, TypeA1Group};
use phecrypt_traits::bilinear::{BilinearGroup, CompositeOrderGenerator};
use phecrypt_traits::cryptosystems::{
    Associable, AsymmetricCryptosystem, DecryptionKey, EncryptionKey,
};
use phecrypt_traits::homomorphic::{HomomorphicAddition, SelfBlinding};
use phecrypt_traits::randomness::GeneralRng;
use phecrypt_traits::randomness::SecureRng;
use phecrypt_traits::security::BitsOfSecurity;
use phecrypt_traits::{Error, Result};
use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The largest plaintext that can be encrypted unless another bound is configured.
pub const DEFAULT_PLAINTEXT_BOUND: u64 = 100;

/// The Boneh-Goh-Nissim cryptosystem over a composite-order bilinear group. Ciphertexts can be
/// added any number of times, and multiplied once using the pairing. Plaintexts are small, as
/// decryption searches through $[0, T]$.
#[derive(Clone, Debug)]
pub struct Bgn<G: CompositeOrderGenerator = TypeA1Generator> {
    generator: G,
    plaintext_bound: u64,
}

impl Bgn {
    /// Creates an instance whose group order is the product of two `prime_bits`-bit primes, on
    /// the default pairing backend.
    pub fn new(prime_bits: u32) -> Self {
        Bgn::with_generator(TypeA1Generator::with_prime_bits(prime_bits))
    }
}

impl<G: CompositeOrderGenerator> Bgn<G> {
    /// Creates an instance that draws its bilinear groups from `generator`.
    pub fn with_generator(generator: G) -> Self {
        Bgn {
            generator,
            plaintext_bound: DEFAULT_PLAINTEXT_BOUND,
        }
    }

    /// Replaces the bound $T$ on plaintexts. Decryption takes up to $T$ group operations, and
    /// key generation requires both prime factors of the group order to exceed $T$.
    pub fn with_plaintext_bound(self, plaintext_bound: u64) -> Self {
        Bgn {
            plaintext_bound,
            ..self
        }
    }
}

/// Public key for the BGN cryptosystem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "B: Serialize, B::Element: Serialize",
    deserialize = "B: Deserialize<'de>, B::Element: Deserialize<'de>"
))]
pub struct BgnPK<B: BilinearGroup = TypeA1Group> {
    group: B,
    g: B::Element,
    h: B::Element,
    plaintext_bound: u64,
}

impl<B: BilinearGroup> BgnPK<B> {
    /// The order $n = pq$ of the group
    pub fn n(&self) -> &Integer {
        self.group.order()
    }

    /// The bilinear group the ciphertexts live in
    pub fn group(&self) -> &B {
        &self.group
    }

    /// Generator $g$ of the whole group
    pub fn g(&self) -> &B::Element {
        &self.g
    }

    /// $h = g^q$, which generates the subgroup of order $p$
    pub fn h(&self) -> &B::Element {
        &self.h
    }

    /// The bound $T$; plaintexts lie in $[0, T]$
    pub fn plaintext_bound(&self) -> u64 {
        self.plaintext_bound
    }

    /// Multiplies two ciphertexts using the pairing. The result encrypts the product of both
    /// plaintexts in the target group, where it can be added to but not multiplied again.
    pub fn pairing_mul(
        &self,
        ciphertext_a: &BgnCiphertext<B>,
        ciphertext_b: &BgnCiphertext<B>,
    ) -> BgnTargetCiphertext<B> {
        BgnTargetCiphertext {
            c: self.group.pairing(&ciphertext_a.c, &ciphertext_b.c),
        }
    }

    /// Combines two target group ciphertexts into an encryption of the sum of their plaintexts.
    pub fn add_target(
        &self,
        ciphertext_a: &BgnTargetCiphertext<B>,
        ciphertext_b: &BgnTargetCiphertext<B>,
    ) -> BgnTargetCiphertext<B> {
        BgnTargetCiphertext {
            c: self.group.target_mul(&ciphertext_a.c, &ciphertext_b.c),
        }
    }
}

/// Decryption key for the BGN cryptosystem.
#[derive(Clone)]
pub struct BgnSK {
    p: Integer,
}

impl BgnSK {
    /// The secret prime factor $p$ of the group order.
    pub fn p(&self) -> &Integer {
        &self.p
    }

    /// Decrypts a ciphertext that was produced by [`BgnPK::pairing_mul`], searching for the
    /// $i \in [0, T]$ with $e(g, g)^{pi} = c^p$.
    pub fn decrypt_target<B: BilinearGroup>(
        &self,
        public_key: &BgnPK<B>,
        ciphertext: &BgnTargetCiphertext<B>,
    ) -> Result<u64> {
        let group = &public_key.group;
        if !group.target_contains(&ciphertext.c) {
            return Err(Error::InvalidCiphertext);
        }

        let egg = group.target_pow(&group.pairing(&public_key.g, &public_key.g), &self.p);
        let cp = group.target_pow(&ciphertext.c, &self.p);

        let bound = public_key.plaintext_bound;
        bounded_log(&cp, &egg, group.target_identity(), bound, |a, b| {
            group.target_mul(a, b)
        })
        .ok_or_else(|| {
            debug!(bound, "no BGN plaintext matches the target group ciphertext");
            Error::DecryptionExhausted { bound }
        })
    }
}

/// Ciphertext of the BGN cryptosystem in the source group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "B::Element: Serialize",
    deserialize = "B::Element: Deserialize<'de>"
))]
pub struct BgnCiphertext<B: BilinearGroup = TypeA1Group> {
    /// Encrypted message (Ciphertext)
    pub c: B::Element,
}

impl<B: BilinearGroup> Associable<BgnPK<B>> for BgnCiphertext<B> {}

/// Ciphertext of the BGN cryptosystem in the target group, the result of a pairing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "B::TargetElement: Serialize",
    deserialize = "B::TargetElement: Deserialize<'de>"
))]
pub struct BgnTargetCiphertext<B: BilinearGroup = TypeA1Group> {
    /// Encrypted message (Ciphertext)
    pub c: B::TargetElement,
}

impl<G: CompositeOrderGenerator> AsymmetricCryptosystem for Bgn<G> {
    type PublicKey = BgnPK<G::Group>;
    type SecretKey = BgnSK;

    fn setup(security_param: &BitsOfSecurity) -> Self {
        Bgn::with_generator(G::with_prime_bits(security_param.to_prime_bit_length()))
    }

    /// Generates a fresh BGN keypair, whose secret key is the larger factor $p$ of the group
    /// order. Fails with [`Error::InvalidParameters`] unless both factors exceed the plaintext
    /// bound $T$.
    /// ```
    /// # use phecrypt_traits::randomness::GeneralRng;
    /// # use phecrypt_he::cryptosystems::bgn::Bgn;
    /// # use phecrypt_traits::cryptosystems::AsymmetricCryptosystem;
    /// # use rand_core::OsRng;
    /// let mut rng = GeneralRng::new(OsRng);
    /// let bgn = Bgn::new(32);
    /// let (public_key, secret_key) = bgn.generate_keys(&mut rng).unwrap();
    /// ```
    fn generate_keys<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<(BgnPK<G::Group>, BgnSK)> {
        let (group, p, q) = self.generator.generate(rng)?;
        let (p, q) = if p > q { (p, q) } else { (q, p) };

        // g^p has order q, so plaintexts beyond q would wrap around during decryption.
        if q <= self.plaintext_bound {
            return Err(Error::InvalidParameters(format!(
                "the prime factors of the group order must exceed the plaintext bound {}",
                self.plaintext_bound
            )));
        }

        let identity = group.identity();

        let g = sample(|| {
            let g = group.random_generator(rng)?;
            let full_order = group.pow(&g, &p) != identity && group.pow(&g, &q) != identity;
            Ok(Some(g).filter(|_| full_order))
        })?;
        let h = group.pow(&g, &q);

        debug!(
            order_bits = group.order().significant_bits(),
            plaintext_bound = self.plaintext_bound,
            "generated BGN key pair"
        );

        Ok((
            BgnPK {
                group,
                g,
                h,
                plaintext_bound: self.plaintext_bound,
            },
            BgnSK { p },
        ))
    }
}

impl<B: BilinearGroup> EncryptionKey for BgnPK<B> {
    type Input = u64;
    type Plaintext = u64;
    type Ciphertext = BgnCiphertext<B>;

    /// Encrypts a plaintext in $[0, T]$ as $g^m h^r$ for a random $r \in \mathbb{Z}_n$.
    fn encrypt_raw<R: SecureRng>(
        &self,
        plaintext: &u64,
        rng: &mut GeneralRng<R>,
    ) -> Result<BgnCiphertext<B>> {
        if *plaintext > self.plaintext_bound {
            return Err(Error::InvalidPlaintext);
        }

        let r = gen_below(self.group.order(), rng);
        let first = self.group.pow(&self.g, &Integer::from(*plaintext));
        let second = self.group.pow(&self.h, &r);

        Ok(BgnCiphertext {
            c: self.group.mul(&first, &second),
        })
    }
}

impl<B: BilinearGroup> DecryptionKey<BgnPK<B>> for BgnSK {
    /// Decrypts by searching for the $i \in [0, T]$ with $(g^p)^i = c^p$.
    fn decrypt_raw(&self, public_key: &BgnPK<B>, ciphertext: &BgnCiphertext<B>) -> Result<u64> {
        let group = &public_key.group;
        if !group.contains(&ciphertext.c) {
            return Err(Error::InvalidCiphertext);
        }

        let gp = group.pow(&public_key.g, &self.p);
        let cp = group.pow(&ciphertext.c, &self.p);

        let bound = public_key.plaintext_bound;
        bounded_log(&cp, &gp, group.identity(), bound, |a, b| group.mul(a, b)).ok_or_else(|| {
            debug!(bound, "no BGN plaintext matches the ciphertext");
            Error::DecryptionExhausted { bound }
        })
    }
}

impl<B: BilinearGroup> HomomorphicAddition for BgnPK<B> {
    fn add(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Self::Ciphertext {
        BgnCiphertext {
            c: self.group.mul(&ciphertext_a.c, &ciphertext_b.c),
        }
    }

    fn mul(&self, ciphertext: &Self::Ciphertext, input: &u64) -> Result<Self::Ciphertext> {
        Ok(BgnCiphertext {
            c: self.group.pow(&ciphertext.c, &Integer::from(*input)),
        })
    }
}

impl<B: BilinearGroup> SelfBlinding for BgnPK<B> {
    type Randomness = Integer;

    fn sample_randomness<R: SecureRng>(&self, rng: &mut GeneralRng<R>) -> Result<Integer> {
        Ok(gen_below(self.group.order(), rng))
    }

    /// Multiplies the ciphertext with $h^r$, which vanishes when raised to $p$.
    fn self_blind(&self, ciphertext: &Self::Ciphertext, randomness: &Integer) -> Self::Ciphertext {
        BgnCiphertext {
            c: self
                .group
                .mul(&ciphertext.c, &self.group.pow(&self.h, randomness)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cryptosystems::bgn::{
        Bgn, BgnCiphertext, BgnPK, BgnSK, BgnTargetCiphertext, DEFAULT_PLAINTEXT_BOUND,
    };
    use phecrypt_pairing::{CurvePoint, QuadraticElement};
    use phecrypt_traits::bilinear::BilinearGroup;
    use phecrypt_traits::cryptosystems::{AsymmetricCryptosystem, DecryptionKey, EncryptionKey};
    use phecrypt_traits::homomorphic::{HomomorphicAddition, SelfBlinding};
    use phecrypt_traits::randomness::GeneralRng;
    use phecrypt_traits::Error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rug::Integer;

    fn toy_keys(seed: u64) -> (BgnPK, BgnSK, GeneralRng<StdRng>) {
        let mut rng = GeneralRng::new(StdRng::seed_from_u64(seed));
        let (pk, sk) = Bgn::new(32).generate_keys(&mut rng).unwrap();
        (pk, sk, rng)
    }

    #[test]
    fn test_encrypt_decrypt() {
        let (pk, sk, mut rng) = toy_keys(1);

        for m in [0, 1, 42, DEFAULT_PLAINTEXT_BOUND] {
            let ciphertext = pk.encrypt(&m, &mut rng).unwrap();
            assert_eq!(m, sk.decrypt(&ciphertext).unwrap());
        }
    }

    #[test]
    fn test_key_structure() {
        let (pk, sk, _) = toy_keys(2);
        let group = pk.group();

        assert!(pk.n().is_divisible(sk.p()));
        assert!(*sk.p() > Integer::from(pk.n() / sk.p()));
        assert!(group.contains(pk.g()));
        assert_ne!(group.identity(), *pk.h());
        assert_eq!(group.identity(), group.pow(pk.h(), sk.p()));
        assert_eq!(DEFAULT_PLAINTEXT_BOUND, pk.plaintext_bound());
    }

    #[test]
    fn test_secret_key_is_larger_factor() {
        for seed in 20..30 {
            let (pk, sk, _) = toy_keys(seed);
            let q = Integer::from(pk.n() / sk.p());

            assert!(*sk.p() > q);
            assert_eq!(pk.group().identity(), pk.group().pow(pk.h(), sk.p()));
        }
    }

    #[test]
    fn test_generate_keys_rejects_factors_below_bound() {
        let mut rng = GeneralRng::new(StdRng::seed_from_u64(15));

        // 6-bit primes never exceed the default bound of 100
        assert!(matches!(
            Bgn::new(6).generate_keys(&mut rng),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_small_factors_above_bound_decrypt_exactly() {
        let mut rng = GeneralRng::new(StdRng::seed_from_u64(16));

        // 7-bit primes are at least 64
        let bgn = Bgn::new(7).with_plaintext_bound(63);
        let (pk, sk) = bgn.generate_keys(&mut rng).unwrap();

        for m in 0..=63 {
            let ciphertext = pk.encrypt_raw(&m, &mut rng).unwrap();
            assert_eq!(m, sk.decrypt_raw(&pk, &ciphertext).unwrap());
        }

        // 64 is still below both factors, so it is reported instead of wrapping
        let ciphertext_1 = pk.encrypt_raw(&63, &mut rng).unwrap();
        let ciphertext_2 = pk.encrypt_raw(&1, &mut rng).unwrap();
        assert_eq!(
            Err(Error::DecryptionExhausted { bound: 63 }),
            sk.decrypt_raw(&pk, &pk.add(&ciphertext_1, &ciphertext_2))
        );
    }

    #[test]
    fn test_decrypt_target_rejects_elements_outside_the_group() {
        let (pk, sk, _) = toy_keys(17);

        for c in [
            QuadraticElement {
                re: Integer::from(2),
                im: Integer::new(),
            },
            QuadraticElement {
                re: Integer::from(-1),
                im: Integer::from(1),
            },
        ] {
            assert_eq!(
                Err(Error::InvalidCiphertext),
                sk.decrypt_target(&pk, &BgnTargetCiphertext { c })
            );
        }
    }

    #[test]
    fn test_probabilistic_encryption() {
        let (pk, _, mut rng) = toy_keys(3);

        let ciphertext1 = pk.encrypt_raw(&7, &mut rng).unwrap();
        let ciphertext2 = pk.encrypt_raw(&7, &mut rng).unwrap();

        assert_ne!(ciphertext1, ciphertext2);
    }

    #[test]
    fn test_encrypt_rejects_out_of_range() {
        let (pk, _, mut rng) = toy_keys(4);

        assert_eq!(
            Err(Error::InvalidPlaintext),
            pk.encrypt_raw(&(DEFAULT_PLAINTEXT_BOUND + 1), &mut rng)
        );
    }

    #[test]
    fn test_decrypt_rejects_points_outside_the_group() {
        let (pk, sk, _) = toy_keys(5);
        let off_curve = BgnCiphertext {
            c: CurvePoint::Affine {
                x: Integer::from(1),
                y: Integer::from(1),
            },
        };

        assert_eq!(Err(Error::InvalidCiphertext), sk.decrypt_raw(&pk, &off_curve));
    }

    #[test]
    fn test_homomorphic_add() {
        let (pk, sk, mut rng) = toy_keys(6);

        let ciphertext_a = pk.encrypt(&5, &mut rng).unwrap();
        let ciphertext_b = pk.encrypt(&6, &mut rng).unwrap();

        assert_eq!(11, sk.decrypt(&(ciphertext_a + ciphertext_b)).unwrap());
    }

    #[test]
    fn test_homomorphic_add_beyond_bound_is_exhausted() {
        let (pk, sk, mut rng) = toy_keys(7);

        let ciphertext_a = pk.encrypt(&60, &mut rng).unwrap();
        let ciphertext_b = pk.encrypt(&60, &mut rng).unwrap();

        assert_eq!(
            Err(Error::DecryptionExhausted {
                bound: DEFAULT_PLAINTEXT_BOUND
            }),
            sk.decrypt(&(ciphertext_a + ciphertext_b))
        );
    }

    #[test]
    fn test_homomorphic_scalar_mul() {
        let (pk, sk, mut rng) = toy_keys(8);

        let ciphertext = pk.encrypt(&5, &mut rng).unwrap();

        assert_eq!(30, sk.decrypt(&ciphertext.mul(&6).unwrap()).unwrap());
    }

    #[test]
    fn test_pairing_mul() {
        let (pk, sk, mut rng) = toy_keys(9);

        let ciphertext_a = pk.encrypt_raw(&5, &mut rng).unwrap();
        let ciphertext_b = pk.encrypt_raw(&6, &mut rng).unwrap();
        let product = pk.pairing_mul(&ciphertext_a, &ciphertext_b);

        assert_eq!(30, sk.decrypt_target(&pk, &product).unwrap());
    }

    #[test]
    fn test_pairing_mul_beyond_bound_is_exhausted() {
        let (pk, sk, mut rng) = toy_keys(10);

        let ciphertext_a = pk.encrypt_raw(&20, &mut rng).unwrap();
        let ciphertext_b = pk.encrypt_raw(&20, &mut rng).unwrap();
        let product = pk.pairing_mul(&ciphertext_a, &ciphertext_b);

        assert_eq!(
            Err(Error::DecryptionExhausted {
                bound: DEFAULT_PLAINTEXT_BOUND
            }),
            sk.decrypt_target(&pk, &product)
        );
    }

    #[test]
    fn test_add_target() {
        let (pk, sk, mut rng) = toy_keys(11);

        let c2 = pk.encrypt_raw(&2, &mut rng).unwrap();
        let c3 = pk.encrypt_raw(&3, &mut rng).unwrap();
        let c4 = pk.encrypt_raw(&4, &mut rng).unwrap();
        let c5 = pk.encrypt_raw(&5, &mut rng).unwrap();

        // 2 * 3 + 4 * 5
        let sum = pk.add_target(&pk.pairing_mul(&c2, &c3), &pk.pairing_mul(&c4, &c5));

        assert_eq!(26, sk.decrypt_target(&pk, &sum).unwrap());
    }

    #[test]
    fn test_self_blind() {
        let (pk, sk, mut rng) = toy_keys(12);

        let ciphertext = pk.encrypt_raw(&77, &mut rng).unwrap();
        let blinded_a = pk.randomize(&ciphertext, &mut rng).unwrap();
        let r = pk.sample_randomness(&mut rng).unwrap();
        let blinded_b = pk.self_blind(&ciphertext, &r);

        assert_ne!(blinded_a, blinded_b);
        assert_eq!(77, sk.decrypt_raw(&pk, &blinded_a).unwrap());
        assert_eq!(77, sk.decrypt_raw(&pk, &blinded_b).unwrap());
    }

    #[test]
    fn test_with_plaintext_bound() {
        let mut rng = GeneralRng::new(StdRng::seed_from_u64(13));
        let bgn = Bgn::new(32).with_plaintext_bound(400);
        let (pk, sk) = bgn.generate_keys(&mut rng).unwrap();

        let ciphertext_a = pk.encrypt_raw(&20, &mut rng).unwrap();
        let ciphertext_b = pk.encrypt_raw(&20, &mut rng).unwrap();
        let product = pk.pairing_mul(&ciphertext_a, &ciphertext_b);

        assert_eq!(400, pk.plaintext_bound());
        assert_eq!(400, sk.decrypt_target(&pk, &product).unwrap());
        assert!(pk.encrypt_raw(&401, &mut rng).is_err());
    }

    #[test]
    fn serialize_deserialize() {
        let (pk, _, mut rng) = toy_keys(14);
        let ciphertext = pk.encrypt_raw(&9, &mut rng).unwrap();

        let pk_deserialized: BgnPK = bincode::deserialize(&bincode::serialize(&pk).unwrap()).unwrap();
        let ciphertext_deserialized: BgnCiphertext =
            bincode::deserialize(&bincode::serialize(&ciphertext).unwrap()).unwrap();

        assert_eq!(pk_deserialized, pk);
        assert_eq!(ciphertext_deserialized, ciphertext);
    }
}
