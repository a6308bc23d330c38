/// Every way in which an operation of a cryptosystem can fail. All of these are terminal for the
/// given inputs: retrying the same call never succeeds.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The plaintext lies outside of the plaintext space at encryption time.
    #[error("the plaintext is outside of the plaintext space of this public key")]
    InvalidPlaintext,
    /// The ciphertext lies outside of the algebraic domain expected at decryption time.
    #[error("the ciphertext is outside of the ciphertext space of this public key")]
    InvalidCiphertext,
    /// A bounded discrete-log search found no matching exponent. This signals a ciphertext that
    /// was not produced under this key, or a plaintext that exceeds the searchable bound.
    #[error("no plaintext in [0, {bound}] matches the ciphertext")]
    DecryptionExhausted {
        /// The largest plaintext that was tried.
        bound: u64,
    },
    /// An operand lacks the modular inverse that the operation requires.
    #[error("the operand has no modular inverse")]
    NonInvertibleElement,
    /// The cryptosystem was configured with parameters it cannot work with.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// A rejection-sampling loop hit its retry ceiling.
    #[error("no suitable candidate was sampled within {attempts} attempts")]
    SamplingExhausted {
        /// The number of candidates that were rejected.
        attempts: u64,
    },
}

/// The result of a fallible operation of a cryptosystem.
pub type Result<T> = std::result::Result<T, Error>;
