#![doc = include_str!("../README.md")]
#![warn(missing_docs, unused_imports)]

pub use phecrypt_he::cryptosystems;
pub use phecrypt_numbertheory;
pub use phecrypt_pairing;
pub use phecrypt_traits;
