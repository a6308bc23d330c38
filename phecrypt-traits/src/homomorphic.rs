use std::ops::Add;

use crate::cryptosystems::{Associable, AssociatedCiphertext, EncryptionKey};
use crate::randomness::{GeneralRng, SecureRng};
use crate::Result;

/// An encryption key whose ciphertexts can be combined so that the sum of the plaintexts is
/// encrypted, and scaled by a known input so that the product with that input is encrypted.
pub trait HomomorphicAddition: EncryptionKey {
    /// Combines two ciphertexts into an encryption of the sum of their plaintexts.
    fn add(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Self::Ciphertext;

    /// Turns an encryption of a plaintext into an encryption of that plaintext times `input`.
    fn mul(&self, ciphertext: &Self::Ciphertext, input: &Self::Input) -> Result<Self::Ciphertext>;
}

/// An additively homomorphic encryption key that can also subtract plaintexts under encryption.
pub trait HomomorphicSubtraction: HomomorphicAddition {
    /// Combines two ciphertexts into an encryption of the difference between their plaintexts.
    /// Fails when `ciphertext_b` is not invertible in the ciphertext space.
    fn sub(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext>;
}

/// An encryption key that can re-randomize its ciphertexts without changing the plaintext they
/// encrypt. A blinded ciphertext is indistinguishable from a fresh encryption.
pub trait SelfBlinding: EncryptionKey {
    /// The randomness that is folded into a ciphertext.
    type Randomness;

    /// Samples fresh blinding randomness.
    fn sample_randomness<R: SecureRng>(&self, rng: &mut GeneralRng<R>)
        -> Result<Self::Randomness>;

    /// Blinds the ciphertext using the given randomness.
    fn self_blind(
        &self,
        ciphertext: &Self::Ciphertext,
        randomness: &Self::Randomness,
    ) -> Self::Ciphertext;

    /// Blinds the ciphertext using randomness freshly drawn from `rng`.
    fn randomize<R: SecureRng>(
        &self,
        ciphertext: &Self::Ciphertext,
        rng: &mut GeneralRng<R>,
    ) -> Result<Self::Ciphertext> {
        let randomness = self.sample_randomness(rng)?;
        Ok(self.self_blind(ciphertext, &randomness))
    }
}

impl<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C> + HomomorphicAddition> Add
    for &AssociatedCiphertext<'pk, C, PK>
{
    type Output = AssociatedCiphertext<'pk, C, PK>;

    fn add(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.public_key, rhs.public_key);
        self.public_key
            .add(&self.ciphertext, &rhs.ciphertext)
            .associate(self.public_key)
    }
}

impl<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C> + HomomorphicAddition> Add
    for AssociatedCiphertext<'pk, C, PK>
{
    type Output = AssociatedCiphertext<'pk, C, PK>;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C> + HomomorphicAddition>
    AssociatedCiphertext<'pk, C, PK>
{
    /// Computes the ciphertext corresponding to the plaintext multiplied by a known input.
    pub fn mul(&self, input: &PK::Input) -> Result<AssociatedCiphertext<'pk, C, PK>> {
        Ok(self
            .public_key
            .mul(&self.ciphertext, input)?
            .associate(self.public_key))
    }
}

impl<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C> + HomomorphicSubtraction>
    AssociatedCiphertext<'pk, C, PK>
{
    /// Computes the ciphertext corresponding to the difference between both plaintexts.
    pub fn sub(&self, rhs: &Self) -> Result<AssociatedCiphertext<'pk, C, PK>> {
        debug_assert_eq!(self.public_key, rhs.public_key);
        Ok(self
            .public_key
            .sub(&self.ciphertext, &rhs.ciphertext)?
            .associate(self.public_key))
    }
}

impl<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C> + SelfBlinding>
    AssociatedCiphertext<'pk, C, PK>
{
    /// Re-randomizes the ciphertext using fresh randomness.
    pub fn randomize<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<AssociatedCiphertext<'pk, C, PK>> {
        Ok(self
            .public_key
            .randomize(&self.ciphertext, rng)?
            .associate(self.public_key))
    }
}
