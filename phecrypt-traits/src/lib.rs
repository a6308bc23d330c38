#![warn(missing_docs, unused_imports)]

//! _This is a part of **phecrypt**. For more information, head to the
//! [phecrypt](https://crates.io/crates/phecrypt) crate homepage._
//!
//! General traits for partially homomorphic cryptosystems, such as key generation, encryption,
//! decryption and the homomorphic operators, together with the narrow interface that pairing-based
//! schemes require from a bilinear group.

/// Random number generation that is consistent with the dependencies' requirements.
pub mod randomness;

/// Concepts expressing the security level of a given cryptosystem.
pub mod security;

/// General notion of a cryptosystem
pub mod cryptosystems;

/// Homomorphic operators on ciphertexts.
pub mod homomorphic;

/// Cyclic groups of known order equipped with a bilinear pairing.
pub mod bilinear;

mod error;

pub use error::{Error, Result};
