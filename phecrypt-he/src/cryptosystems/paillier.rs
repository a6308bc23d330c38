use phecrypt_numbertheory::{
    gen_coprime, gen_safe_prime, is_unit, mod_inverse, mod_pow, MAX_SAMPLING_ATTEMPTS,
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

/// The Paillier cryptosystem.
#[derive(Copy, Clone, Debug)]
pub struct Paillier {
    prime_bits: u32,
}

impl Paillier {
    /// Creates an instance whose keys are built from safe primes $p = 2p' + 1$ and
    /// $q = 2q' + 1$, where $p'$ and $q'$ are primes of `prime_bits` bits.
    pub fn new(prime_bits: u32) -> Self {
        Paillier { prime_bits }
    }
}

/// Public key for the Paillier cryptosystem.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct PaillierPK {
    n: Integer,
    g: Integer,
}

impl PaillierPK {
    /// Public modulus n for encryption
    pub fn n(&self) -> &Integer {
        &self.n
    }

    /// Public generator g for encryption
    pub fn g(&self) -> &Integer {
        &self.g
    }

    fn n_squared(&self) -> Integer {
        Integer::from(self.n.square_ref())
    }
}

/// Decryption key for the Paillier cryptosystem.
#[derive(Clone)]
pub struct PaillierSK {
    lambda: Integer,
    mu: Integer,
}

impl PaillierSK {
    /// The Carmichael function $\lambda = \mathrm{lcm}(p - 1, q - 1)$ of the modulus.
    pub fn lambda(&self) -> &Integer {
        &self.lambda
    }

    /// The inverse of $L(g^\lambda \mod n^2)$ modulo $n$.
    pub fn mu(&self) -> &Integer {
        &self.mu
    }
}

/// Ciphertext of the Paillier cryptosystem, which is additively homomorphic.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct PaillierCiphertext {
    /// Encrypted message (Ciphertext)
    pub c: Integer,
}

impl Associable<PaillierPK> for PaillierCiphertext {}

/// Paillier's $L(x) = (x - 1) / n$, which is only defined when $n$ divides $x - 1$.
fn l_function(x: &Integer, n: &Integer) -> Result<Integer> {
    let x_minus_one = Integer::from(x - 1);
    if !x_minus_one.is_divisible(n) {
        return Err(Error::InvalidCiphertext);
    }

    Ok(x_minus_one.div_exact(n))
}

impl AsymmetricCryptosystem for Paillier {
    type PublicKey = PaillierPK;
    type SecretKey = PaillierSK;

    fn setup(security_param: &BitsOfSecurity) -> Self {
        Paillier {
            prime_bits: security_param.to_prime_bit_length().saturating_sub(1),
        }
    }

    /// Generates a fresh Paillier keypair.
    /// ```
    /// # use phecrypt_traits::randomness::GeneralRng;
    /// # use phecrypt_he::cryptosystems::paillier::Paillier;
    /// # use phecrypt_traits::security::BitsOfSecurity;
    /// # use phecrypt_traits::cryptosystems::AsymmetricCryptosystem;
    /// # use rand_core::OsRng;
    /// let mut rng = GeneralRng::new(OsRng);
    /// let paillier = Paillier::setup(&BitsOfSecurity::ToyParameters);
    /// let (public_key, secret_key) = paillier.generate_keys(&mut rng).unwrap();
    /// ```
    fn generate_keys<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<(PaillierPK, PaillierSK)> {
        let p = gen_safe_prime(self.prime_bits + 1, rng)?;
        let mut q = gen_safe_prime(self.prime_bits + 1, rng)?;
        let mut attempts = 1;
        while q == p {
            if attempts >= MAX_SAMPLING_ATTEMPTS {
                return Err(Error::SamplingExhausted { attempts });
            }
            q = gen_safe_prime(self.prime_bits + 1, rng)?;
            attempts += 1;
        }

        let n = Integer::from(&p * &q);
        let n_squared = Integer::from(n.square_ref());
        let g = Integer::from(&n + 1);

        // lambda = lcm(2p', 2q') = 2p'q' = (p - 1)(q - 1) / 2
        let lambda = Integer::from(&p - 1) * Integer::from(&q - 1) / 2;
        let g_lambda = Integer::from(g.secure_pow_mod_ref(&lambda, &n_squared));
        let mu = mod_inverse(&l_function(&g_lambda, &n)?, &n)?;

        debug!(
            modulus_bits = n.significant_bits(),
            "generated Paillier key pair"
        );

        Ok((PaillierPK { n, g }, PaillierSK { lambda, mu }))
    }
}

impl EncryptionKey for PaillierPK {
    type Input = Integer;
    type Plaintext = Integer;
    type Ciphertext = PaillierCiphertext;

    /// Encrypts a plaintext integer in $\mathbb{Z}^*_n$ using the Paillier public key.
    /// ```
    /// # use phecrypt_traits::randomness::GeneralRng;
    /// # use phecrypt_he::cryptosystems::paillier::Paillier;
    /// # use phecrypt_traits::security::BitsOfSecurity;
    /// # use phecrypt_traits::cryptosystems::{AsymmetricCryptosystem, EncryptionKey};
    /// # use rug::Integer;
    /// # use rand_core::OsRng;
    /// # let mut rng = GeneralRng::new(OsRng);
    /// # let paillier = Paillier::setup(&BitsOfSecurity::ToyParameters);
    /// # let (public_key, secret_key) = paillier.generate_keys(&mut rng).unwrap();
    /// let ciphertext = public_key.encrypt(&Integer::from(5), &mut rng).unwrap();
    /// ```
    fn encrypt_raw<R: SecureRng>(
        &self,
        plaintext: &Integer,
        rng: &mut GeneralRng<R>,
    ) -> Result<PaillierCiphertext> {
        if !is_unit(plaintext, &self.n) {
            return Err(Error::InvalidPlaintext);
        }

        let n_squared = self.n_squared();
        let r = gen_coprime(&self.n, rng)?;

        // g = n + 1, so g^m = 1 + mn mod n^2
        let first = (Integer::from(plaintext * &self.n) + 1u32).rem(&n_squared);
        let second = Integer::from(r.secure_pow_mod_ref(&self.n, &n_squared));

        Ok(PaillierCiphertext {
            c: (first * second).rem(&n_squared),
        })
    }
}

impl DecryptionKey<PaillierPK> for PaillierSK {
    /// Decrypts an associated Paillier ciphertext using the secret key.
    /// ```
    /// # use phecrypt_traits::randomness::GeneralRng;
    /// # use phecrypt_he::cryptosystems::paillier::Paillier;
    /// # use phecrypt_traits::security::BitsOfSecurity;
    /// # use phecrypt_traits::cryptosystems::{AsymmetricCryptosystem, EncryptionKey, DecryptionKey};
    /// # use rug::Integer;
    /// # use rand_core::OsRng;
    /// # let mut rng = GeneralRng::new(OsRng);
    /// # let paillier = Paillier::setup(&BitsOfSecurity::ToyParameters);
    /// # let (public_key, secret_key) = paillier.generate_keys(&mut rng).unwrap();
    /// # let ciphertext = public_key.encrypt(&Integer::from(5), &mut rng).unwrap();
    /// println!("The decrypted message is {}", secret_key.decrypt(&ciphertext).unwrap());
    /// // Prints: "The decrypted message is 5".
    /// ```
    fn decrypt_raw(
        &self,
        public_key: &PaillierPK,
        ciphertext: &PaillierCiphertext,
    ) -> Result<Integer> {
        let n_squared = public_key.n_squared();
        if !is_unit(&ciphertext.c, &n_squared) {
            return Err(Error::InvalidCiphertext);
        }

        let inner = Integer::from(ciphertext.c.secure_pow_mod_ref(&self.lambda, &n_squared));
        let inner = l_function(&inner, &public_key.n)? * &self.mu;

        Ok(inner.rem(&public_key.n))
    }
}

impl HomomorphicAddition for PaillierPK {
    fn add(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Self::Ciphertext {
        PaillierCiphertext {
            c: Integer::from(&ciphertext_a.c * &ciphertext_b.c).rem(self.n_squared()),
        }
    }

    fn mul(&self, ciphertext: &Self::Ciphertext, input: &Self::Input) -> Result<Self::Ciphertext> {
        Ok(PaillierCiphertext {
            c: mod_pow(&ciphertext.c, input, &self.n_squared())?,
        })
    }
}

impl HomomorphicSubtraction for PaillierPK {
    fn sub(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext> {
        let n_squared = self.n_squared();
        let inverse = mod_inverse(&ciphertext_b.c, &n_squared)?;

        Ok(PaillierCiphertext {
            c: (inverse * &ciphertext_a.c).rem(&n_squared),
        })
    }
}

impl SelfBlinding for PaillierPK {
    type Randomness = Integer;

    fn sample_randomness<R: SecureRng>(&self, rng: &mut GeneralRng<R>) -> Result<Integer> {
        gen_coprime(&self.n, rng)
    }

    /// Multiplies the ciphertext with $r^n \mod n^2$, which encrypts zero.
    fn self_blind(&self, ciphertext: &Self::Ciphertext, randomness: &Integer) -> Self::Ciphertext {
        let n_squared = self.n_squared();
        let blinding = Integer::from(randomness.secure_pow_mod_ref(&self.n, &n_squared));

        PaillierCiphertext {
            c: (blinding * &ciphertext.c).rem(&n_squared),
        }
    }
}
