#![warn(missing_docs, unused_imports)]

//! _This is a part of **phecrypt**. For more information, head to the
//! [phecrypt](https://crates.io/crates/phecrypt) crate homepage._
//!
//! A composite-order bilinear group on the supersingular curve $y^2 = x^3 + x$, suitable as the
//! pairing backend of the BGN cryptosystem. Its order $n = pq$ is generated together with its
//! factors, which the group description itself never contains.

mod curve;
mod field;
mod group;

pub use curve::CurvePoint;
pub use field::QuadraticElement;
pub use group::{TypeA1Generator, TypeA1Group};
