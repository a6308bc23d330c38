#![warn(missing_docs, unused_imports)]

//! _This is a part of **phecrypt**. For more information, head to the
//! [phecrypt](https://crates.io/crates/phecrypt) crate homepage._
//!
//! Implementations of three partially homomorphic cryptosystems: Paillier and Benaloh, which are
//! additively homomorphic over the integers modulo $n$ and modulo a small prime respectively, and
//! BGN, which additionally supports one level of multiplication through a bilinear pairing.

/// Partially homomorphic cryptosystems with one key.
pub mod cryptosystems;

pub use phecrypt_traits;
