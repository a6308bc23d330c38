use rug::ops::RemRounding;
use rug::Integer;
use serde::{Deserialize, Serialize};

/// An element $a + bi$ of the quadratic extension $\mathbb{F}_{q^2} = \mathbb{F}_q[i] / (i^2 + 1)$.
/// Both coordinates are kept reduced modulo $q$, so equal elements compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadraticElement {
    /// The real part $a$.
    pub re: Integer,
    /// The imaginary part $b$.
    pub im: Integer,
}

/// Arithmetic in $\mathbb{F}_{q^2}$ for a prime $q = 3 \mod 4$, so that $-1$ is a non-residue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct QuadraticField {
    modulus: Integer,
}

impl QuadraticField {
    pub(crate) fn new(modulus: Integer) -> Self {
        QuadraticField { modulus }
    }

    pub(crate) fn one(&self) -> QuadraticElement {
        QuadraticElement {
            re: Integer::from(1),
            im: Integer::new(),
        }
    }

    pub(crate) fn element(&self, re: Integer, im: Integer) -> QuadraticElement {
        QuadraticElement {
            re: re.rem_euc(&self.modulus),
            im: im.rem_euc(&self.modulus),
        }
    }

    pub(crate) fn is_reduced(&self, a: &QuadraticElement) -> bool {
        let in_range = |c: &Integer| *c >= 0 && *c < self.modulus;
        in_range(&a.re) && in_range(&a.im)
    }

    pub(crate) fn mul(&self, a: &QuadraticElement, b: &QuadraticElement) -> QuadraticElement {
        let re = Integer::from(&a.re * &b.re) - Integer::from(&a.im * &b.im);
        let im = Integer::from(&a.re * &b.im) + Integer::from(&a.im * &b.re);

        self.element(re, im)
    }

    pub(crate) fn square(&self, a: &QuadraticElement) -> QuadraticElement {
        // (a + bi)^2 = (a + b)(a - b) + 2abi
        let re = Integer::from(&a.re + &a.im) * Integer::from(&a.re - &a.im);
        let im = Integer::from(&a.re * &a.im) * 2;

        self.element(re, im)
    }

    /// Square-and-multiply for a non-negative `exponent`.
    pub(crate) fn pow(&self, base: &QuadraticElement, exponent: &Integer) -> QuadraticElement {
        let mut result = self.one();

        for bit in (0..exponent.significant_bits()).rev() {
            result = self.square(&result);
            if exponent.get_bit(bit) {
                result = self.mul(&result, base);
            }
        }

        result
    }
}
