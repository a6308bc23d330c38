use crate::randomness::GeneralRng;
use crate::randomness::SecureRng;
use crate::security::BitsOfSecurity;
use crate::Result;
use std::fmt::Debug;

/// An asymmetric cryptosystem is a system of methods to encrypt plaintexts into ciphertexts, and
/// decrypt those ciphertexts back into plaintexts. Anyone who has access to the public key can
/// perform encryptions, but only those with the secret key can decrypt.
///
/// The struct that implements an `AsymmetricCryptosystem` will hold the general parameters of that
/// cryptosystem. Depending on the cryptosystem, those parameters could play an important role in
/// deciding the level of security. As such, each cryptosystem should clearly indicate these.
pub trait AsymmetricCryptosystem {
    /// The public key, which can encrypt and operate on ciphertexts.
    type PublicKey: EncryptionKey;
    /// The secret key, which can decrypt ciphertexts of the matching public key.
    type SecretKey: DecryptionKey<Self::PublicKey>;

    /// Sets up an instance of this cryptosystem with parameters satisfying the security parameter.
    fn setup(security_parameter: &BitsOfSecurity) -> Self;

    /// Generate a public and private key pair using a cryptographic RNG. Both keys are derived
    /// from the same primes, so a secret key is only meaningful together with the public key
    /// that was generated alongside it.
    fn generate_keys<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<(Self::PublicKey, Self::SecretKey)>;
}

/// The encryption key.
pub trait EncryptionKey: Sized + Debug + PartialEq {
    /// Scalars that ciphertexts can be multiplied with homomorphically.
    type Input;
    /// The plaintexts that this key can encrypt.
    type Plaintext;
    /// The ciphertexts that this key produces.
    type Ciphertext: Associable<Self>;

    /// Encrypt the plaintext using the public key and a cryptographic RNG and immediately associate it with the public key.
    fn encrypt<'pk, R: SecureRng>(
        &'pk self,
        plaintext: &Self::Plaintext,
        rng: &mut GeneralRng<R>,
    ) -> Result<AssociatedCiphertext<'pk, Self::Ciphertext, Self>> {
        Ok(self.encrypt_raw(plaintext, rng)?.associate(self))
    }

    /// Encrypt the plaintext using the public key and a cryptographic RNG.
    fn encrypt_raw<R: SecureRng>(
        &self,
        plaintext: &Self::Plaintext,
        rng: &mut GeneralRng<R>,
    ) -> Result<Self::Ciphertext>;
}

/// The decryption key.
pub trait DecryptionKey<PK: EncryptionKey> {
    /// Decrypt the associated ciphertext using the secret key.
    fn decrypt(
        &self,
        ciphertext: &AssociatedCiphertext<'_, PK::Ciphertext, PK>,
    ) -> Result<PK::Plaintext> {
        self.decrypt_raw(ciphertext.public_key, &ciphertext.ciphertext)
    }

    /// Decrypt the ciphertext using the secret key and its related public key.
    fn decrypt_raw(&self, public_key: &PK, ciphertext: &PK::Ciphertext) -> Result<PK::Plaintext>;
}

/// A ciphertext together with the public key it was encrypted under.
#[derive(PartialEq, Debug)]
pub struct AssociatedCiphertext<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C>> {
    /// The raw ciphertext.
    pub ciphertext: C,
    /// The public key this ciphertext belongs to.
    pub public_key: &'pk PK,
}

impl<'pk, C: Associable<PK> + Clone, PK: EncryptionKey<Ciphertext = C>> Clone
    for AssociatedCiphertext<'pk, C, PK>
{
    fn clone(&self) -> Self {
        AssociatedCiphertext {
            ciphertext: self.ciphertext.clone(),
            public_key: self.public_key,
        }
    }
}

/// Functionality to easily turn a ciphertext into an associated ciphertext
pub trait Associable<PK: EncryptionKey<Ciphertext = Self>>: Sized {
    /// 'Enriches' a ciphertext by associating it with a corresponding public key. This allows to overload operators for homomorphic operations.
    fn associate(self, public_key: &PK) -> AssociatedCiphertext<'_, Self, PK> {
        AssociatedCiphertext {
            ciphertext: self,
            public_key,
        }
    }
}
