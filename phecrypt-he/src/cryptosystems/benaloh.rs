//! Here is an example of how to generate a key pair and compute a difference under encryption.
//! ```
//! use phecrypt_traits::randomness::GeneralRng;
//! use phecrypt_he::cryptosystems::benaloh::Benaloh;
//! use phecrypt_traits::security::BitsOfSecurity;
//! use phecrypt_traits::cryptosystems::{AsymmetricCryptosystem, DecryptionKey, EncryptionKey};
//! use rand_core::OsRng;
//!
//! let mut rng = GeneralRng::new(OsRng);
//! let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
//! let (public_key, secret_key) = benaloh.generate_keys(&mut rng).unwrap();
//!
//! let ciphertext_1 = public_key.encrypt(&20, &mut rng).unwrap();
//! let ciphertext_2 = public_key.encrypt(&10, &mut rng).unwrap();
//!
//! let difference = ciphertext_1.sub(&ciphertext_2).unwrap();
//! assert_eq!(10, secret_key.decrypt(&difference).unwrap());
//! ```

use crate::cryptosystems::{bounded_log, sample};
use phecrypt_numbertheory::{
    gen_coprime, gen_prime, gen_prime_one_mod, is_probable_prime, is_unit, mod_inverse, mod_pow,
    DEFAULT_CERTAINTY,
};
use phecrypt_traits::cryptosystems::{
    Associable, AsymmetricCryptosystem, DecryptionKey, EncryptionKey,
};
use phecrypt_traits::homomorphic::{HomomorphicAddition, HomomorphicSubtraction, SelfBlinding};
use phecrypt_traits::randomness::GeneralRng;
use phecrypt_traits::randomness::SecureRng;
use phecrypt_traits::security::BitsOfSecurity;
use phecrypt_traits::{Error, Result};
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::ops::Rem;
use tracing::debug;

/// The plaintext modulus $r$ that is used unless another one is configured.
pub const DEFAULT_PLAINTEXT_MODULUS: u64 = 199;

/// The Benaloh cryptosystem, which is additively homomorphic modulo a small prime $r$. Decryption
/// searches through all $r$ possible plaintexts, so $r$ must stay small.
#[derive(Copy, Clone, Debug)]
pub struct Benaloh {
    prime_bits: u32,
    plaintext_modulus: u64,
}

impl Benaloh {
    /// Creates an instance whose modulus is the product of two `prime_bits`-bit primes, with the
    /// default plaintext modulus.
    pub fn new(prime_bits: u32) -> Self {
        Benaloh {
            prime_bits,
            plaintext_modulus: DEFAULT_PLAINTEXT_MODULUS,
        }
    }

    /// Replaces the plaintext modulus, which must be an odd prime.
    pub fn with_plaintext_modulus(self, plaintext_modulus: u64) -> Result<Self> {
        if plaintext_modulus < 3
            || !is_probable_prime(&Integer::from(plaintext_modulus), DEFAULT_CERTAINTY)
        {
            return Err(Error::InvalidParameters(format!(
                "the plaintext modulus must be an odd prime, got {}",
                plaintext_modulus
            )));
        }

        Ok(Benaloh {
            plaintext_modulus,
            ..self
        })
    }
}

/// Public key for the Benaloh cryptosystem.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct BenalohPK {
    n: Integer,
    y: Integer,
    r: u64,
}

impl BenalohPK {
    /// Public modulus n for encryption
    pub fn n(&self) -> &Integer {
        &self.n
    }

    /// Public base y, whose $r$-th residue class encodes the plaintext
    pub fn y(&self) -> &Integer {
        &self.y
    }

    /// The plaintext modulus $r$; plaintexts lie in $[0, r)$
    pub fn plaintext_modulus(&self) -> u64 {
        self.r
    }
}

/// Decryption key for the Benaloh cryptosystem.
#[derive(Clone)]
pub struct BenalohSK {
    phi: Integer,
    x: Integer,
}

impl BenalohSK {
    /// Euler's totient $\phi = (p - 1)(q - 1)$ of the modulus.
    pub fn phi(&self) -> &Integer {
        &self.phi
    }

    /// The element $x = y^{\phi / r} \mod n$ of order $r$, whose powers identify plaintexts.
    pub fn x(&self) -> &Integer {
        &self.x
    }
}

/// Ciphertext of the Benaloh cryptosystem, which is additively homomorphic modulo $r$.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct BenalohCiphertext {
    /// Encrypted message (Ciphertext)
    pub c: Integer,
}

impl Associable<BenalohPK> for BenalohCiphertext {}

impl AsymmetricCryptosystem for Benaloh {
    type PublicKey = BenalohPK;
    type SecretKey = BenalohSK;

    fn setup(security_param: &BitsOfSecurity) -> Self {
        Benaloh::new(security_param.to_prime_bit_length())
    }

    /// Generates a fresh Benaloh keypair. Only $p$ needs $r \mid p - 1$ (with $r^2 \nmid p - 1$);
    /// for $q$ it suffices that $\gcd(q - 1, r) = 1$, which makes $r \| \phi(n)$.
    /// ```
    /// # use phecrypt_traits::randomness::GeneralRng;
    /// # use phecrypt_he::cryptosystems::benaloh::Benaloh;
    /// # use phecrypt_traits::security::BitsOfSecurity;
    /// # use phecrypt_traits::cryptosystems::AsymmetricCryptosystem;
    /// # use rand_core::OsRng;
    /// let mut rng = GeneralRng::new(OsRng);
    /// let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
    /// let (public_key, secret_key) = benaloh.generate_keys(&mut rng).unwrap();
    /// ```
    fn generate_keys<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<(BenalohPK, BenalohSK)> {
        let r = Integer::from(self.plaintext_modulus);

        let p = sample(|| {
            let p = gen_prime_one_mod(self.prime_bits, &r, rng)?;
            let cofactor = Integer::from(&p - 1) / &r;
            Ok(Some(p).filter(|_| Integer::from(cofactor.gcd_ref(&r)) == 1))
        })?;

        let q = sample(|| {
            let q = gen_prime(self.prime_bits, rng)?;
            let q_minus_one = Integer::from(&q - 1);
            Ok(Some(q).filter(|q| *q != p && Integer::from(q_minus_one.gcd_ref(&r)) == 1))
        })?;

        let n = Integer::from(&p * &q);
        let phi = Integer::from(&p - 1) * Integer::from(&q - 1);
        let exponent = Integer::from(phi.div_exact_ref(&r));

        let (y, x) = sample(|| {
            let y = gen_coprime(&n, rng)?;
            let x = Integer::from(y.secure_pow_mod_ref(&exponent, &n));
            Ok(Some((y, x)).filter(|(_, x)| *x != 1))
        })?;

        debug!(
            modulus_bits = n.significant_bits(),
            plaintext_modulus = self.plaintext_modulus,
            "generated Benaloh key pair"
        );

        Ok((
            BenalohPK {
                n,
                y,
                r: self.plaintext_modulus,
            },
            BenalohSK { phi, x },
        ))
    }
}

impl EncryptionKey for BenalohPK {
    type Input = u64;
    type Plaintext = u64;
    type Ciphertext = BenalohCiphertext;

    /// Encrypts a plaintext in $[0, r)$ as $y^m u^r \mod n$ for a random unit $u$.
    fn encrypt_raw<R: SecureRng>(
        &self,
        plaintext: &u64,
        rng: &mut GeneralRng<R>,
    ) -> Result<BenalohCiphertext> {
        if *plaintext >= self.r {
            return Err(Error::InvalidPlaintext);
        }

        let u = gen_coprime(&self.n, rng)?;
        let first = mod_pow(&self.y, &Integer::from(*plaintext), &self.n)?;
        let second = Integer::from(u.secure_pow_mod_ref(&Integer::from(self.r), &self.n));

        Ok(BenalohCiphertext {
            c: (first * second).rem(&self.n),
        })
    }
}

impl DecryptionKey<BenalohPK> for BenalohSK {
    /// Decrypts by computing $a = c^{\phi / r} \mod n$ and searching for the $i < r$ with
    /// $x^i = a$.
    fn decrypt_raw(&self, public_key: &BenalohPK, ciphertext: &BenalohCiphertext) -> Result<u64> {
        if !is_unit(&ciphertext.c, &public_key.n) {
            return Err(Error::InvalidCiphertext);
        }

        let exponent = Integer::from(self.phi.div_exact_ref(&Integer::from(public_key.r)));
        let a = Integer::from(ciphertext.c.secure_pow_mod_ref(&exponent, &public_key.n));

        let bound = public_key.r - 1;
        bounded_log(&a, &self.x, Integer::from(1), bound, |acc, x| {
            Integer::from(acc * x).rem(&public_key.n)
        })
        .ok_or_else(|| {
            debug!(bound, "no Benaloh plaintext matches the ciphertext");
            Error::DecryptionExhausted { bound }
        })
    }
}

impl HomomorphicAddition for BenalohPK {
    fn add(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Self::Ciphertext {
        BenalohCiphertext {
            c: Integer::from(&ciphertext_a.c * &ciphertext_b.c).rem(&self.n),
        }
    }

    fn mul(&self, ciphertext: &Self::Ciphertext, input: &u64) -> Result<Self::Ciphertext> {
        Ok(BenalohCiphertext {
            c: mod_pow(&ciphertext.c, &Integer::from(*input), &self.n)?,
        })
    }
}

impl HomomorphicSubtraction for BenalohPK {
    fn sub(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext> {
        let inverse = mod_inverse(&ciphertext_b.c, &self.n)?;

        Ok(BenalohCiphertext {
            c: (inverse * &ciphertext_a.c).rem(&self.n),
        })
    }
}

impl SelfBlinding for BenalohPK {
    type Randomness = Integer;

    fn sample_randomness<R: SecureRng>(&self, rng: &mut GeneralRng<R>) -> Result<Integer> {
        gen_coprime(&self.n, rng)
    }

    fn self_blind(&self, ciphertext: &Self::Ciphertext, randomness: &Integer) -> Self::Ciphertext {
        let blinding = Integer::from(randomness.secure_pow_mod_ref(&Integer::from(self.r), &self.n));

        BenalohCiphertext {
            c: (blinding * &ciphertext.c).rem(&self.n),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cryptosystems::benaloh::{Benaloh, BenalohCiphertext, DEFAULT_PLAINTEXT_MODULUS};
    use phecrypt_traits::cryptosystems::{AsymmetricCryptosystem, DecryptionKey, EncryptionKey};
    use phecrypt_traits::homomorphic::{HomomorphicSubtraction, SelfBlinding};
    use phecrypt_traits::randomness::GeneralRng;
    use phecrypt_traits::security::BitsOfSecurity;
    use phecrypt_traits::Error;
    use rand_core::OsRng;
    use rug::Integer;

    #[test]
    fn test_encrypt_decrypt() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, sk) = benaloh.generate_keys(&mut rng).unwrap();

        let ciphertext = pk.encrypt(&100, &mut rng).unwrap();

        assert_eq!(100, sk.decrypt(&ciphertext).unwrap());
    }

    #[test]
    fn test_encrypt_decrypt_whole_plaintext_space() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::new(48).with_plaintext_modulus(17).unwrap();
        let (pk, sk) = benaloh.generate_keys(&mut rng).unwrap();

        for m in 0..17 {
            let ciphertext = pk.encrypt(&m, &mut rng).unwrap();
            assert_eq!(m, sk.decrypt(&ciphertext).unwrap());
        }
    }

    #[test]
    fn test_key_structure() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, sk) = benaloh.generate_keys(&mut rng).unwrap();
        let r = Integer::from(DEFAULT_PLAINTEXT_MODULUS);

        assert_eq!(DEFAULT_PLAINTEXT_MODULUS, pk.plaintext_modulus());
        assert!(sk.phi().is_divisible(&r));
        assert!(!sk.phi().is_divisible(&Integer::from(r.square_ref())));
        assert_ne!(1, *sk.x());
        assert_eq!(
            1,
            Integer::from(sk.x().pow_mod_ref(&r, pk.n()).unwrap())
        );
        assert_eq!(
            *sk.x(),
            Integer::from(
                pk.y()
                    .pow_mod_ref(&Integer::from(sk.phi() / &r), pk.n())
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_probabilistic_encryption() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, _) = benaloh.generate_keys(&mut rng).unwrap();

        let ciphertext1 = pk.encrypt(&42, &mut rng).unwrap();
        let ciphertext2 = pk.encrypt(&42, &mut rng).unwrap();

        assert_ne!(ciphertext1, ciphertext2);
    }

    #[test]
    fn test_encrypt_rejects_out_of_range() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, _) = benaloh.generate_keys(&mut rng).unwrap();

        assert_eq!(
            Err(Error::InvalidPlaintext),
            pk.encrypt_raw(&DEFAULT_PLAINTEXT_MODULUS, &mut rng)
        );
        assert!(pk.encrypt_raw(&(DEFAULT_PLAINTEXT_MODULUS - 1), &mut rng).is_ok());
    }

    #[test]
    fn test_decrypt_rejects_invalid_ciphertexts() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, sk) = benaloh.generate_keys(&mut rng).unwrap();

        for c in [Integer::new(), pk.n().clone(), Integer::from(-1)] {
            assert_eq!(
                Err(Error::InvalidCiphertext),
                sk.decrypt_raw(&pk, &BenalohCiphertext { c })
            );
        }
    }

    #[test]
    fn test_decrypt_with_foreign_key_is_exhausted() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, _) = benaloh.generate_keys(&mut rng).unwrap();
        let (_, foreign_sk) = benaloh.generate_keys(&mut rng).unwrap();

        // The foreign x lives modulo another n, so it is all but impossible that one of its
        // powers lands on the decryption intermediate.
        let ciphertext = pk.encrypt_raw(&5, &mut rng).unwrap();

        assert_eq!(
            Err(Error::DecryptionExhausted {
                bound: DEFAULT_PLAINTEXT_MODULUS - 1
            }),
            foreign_sk.decrypt_raw(&pk, &ciphertext)
        );
    }

    #[test]
    fn test_homomorphic_add() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, sk) = benaloh.generate_keys(&mut rng).unwrap();

        let ciphertext_a = pk.encrypt(&10, &mut rng).unwrap();
        let ciphertext_b = pk.encrypt(&20, &mut rng).unwrap();

        assert_eq!(30, sk.decrypt(&(ciphertext_a + ciphertext_b)).unwrap());
    }

    #[test]
    fn test_homomorphic_add_wraps_around_modulus() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, sk) = benaloh.generate_keys(&mut rng).unwrap();

        let ciphertext_a = pk.encrypt(&150, &mut rng).unwrap();
        let ciphertext_b = pk.encrypt(&100, &mut rng).unwrap();

        assert_eq!(51, sk.decrypt(&(ciphertext_a + ciphertext_b)).unwrap());
    }

    #[test]
    fn test_homomorphic_sub() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, sk) = benaloh.generate_keys(&mut rng).unwrap();

        let ciphertext_a = pk.encrypt(&10, &mut rng).unwrap();
        let ciphertext_b = pk.encrypt(&20, &mut rng).unwrap();

        assert_eq!(10, sk.decrypt(&ciphertext_b.sub(&ciphertext_a).unwrap()).unwrap());
        assert_eq!(
            DEFAULT_PLAINTEXT_MODULUS - 10,
            sk.decrypt(&ciphertext_a.sub(&ciphertext_b).unwrap()).unwrap()
        );
    }

    #[test]
    fn test_sub_rejects_non_invertible_operand() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, _) = benaloh.generate_keys(&mut rng).unwrap();

        let ciphertext = pk.encrypt_raw(&10, &mut rng).unwrap();
        let broken = BenalohCiphertext { c: Integer::new() };

        assert_eq!(Err(Error::NonInvertibleElement), pk.sub(&ciphertext, &broken));
    }

    #[test]
    fn test_homomorphic_scalar_mul() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, sk) = benaloh.generate_keys(&mut rng).unwrap();

        let ciphertext = pk.encrypt(&12, &mut rng).unwrap();

        assert_eq!(60, sk.decrypt(&ciphertext.mul(&5).unwrap()).unwrap());
        assert_eq!(
            (12 * 20) % DEFAULT_PLAINTEXT_MODULUS,
            sk.decrypt(&ciphertext.mul(&20).unwrap()).unwrap()
        );
    }

    #[test]
    fn test_self_blind() {
        let mut rng = GeneralRng::new(OsRng);

        let benaloh = Benaloh::setup(&BitsOfSecurity::ToyParameters);
        let (pk, sk) = benaloh.generate_keys(&mut rng).unwrap();

        let ciphertext = pk.encrypt_raw(&77, &mut rng).unwrap();
        let u = pk.sample_randomness(&mut rng).unwrap();
        let blinded = pk.self_blind(&ciphertext, &u);

        assert_ne!(ciphertext, blinded);
        assert_eq!(77, sk.decrypt_raw(&pk, &blinded).unwrap());
    }

    #[test]
    fn test_with_plaintext_modulus_rejects_non_primes() {
        assert!(Benaloh::new(64).with_plaintext_modulus(2).is_err());
        assert!(Benaloh::new(64).with_plaintext_modulus(15).is_err());
        assert!(Benaloh::new(64).with_plaintext_modulus(11).is_ok());
    }
}
