use crate::curve::{CurvePoint, SupersingularCurve};
use crate::field::{QuadraticElement, QuadraticField};
use phecrypt_numbertheory::{
    gen_below, gen_prime, is_probable_prime, DEFAULT_CERTAINTY, MAX_SAMPLING_ATTEMPTS,
};
use phecrypt_traits::bilinear::{BilinearGroup, CompositeOrderGenerator};
use phecrypt_traits::randomness::{GeneralRng, SecureRng};
use phecrypt_traits::{Error, Result};
use rug::ops::RemRounding;
use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The subgroup of order $n$ of the curve $y^2 = x^3 + x$ over $\mathbb{F}_q$, where
/// $q = 4ln - 1$ is prime. The symmetric pairing into the order-$n$ subgroup of
/// $\mathbb{F}_{q^2}^*$ is the reduced Tate pairing composed with the distortion map
/// $(x, y) \mapsto (-x, iy)$.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeA1Group {
    order: Integer,
    cofactor: Integer,
    curve: SupersingularCurve,
    field: QuadraticField,
    final_exponent: Integer,
    sqrt_exponent: Integer,
}

impl TypeA1Group {
    /// Sets up the group of order `order` on the curve over $\mathbb{F}_q$ with
    /// $q = 4 \cdot$ `multiplier` $\cdot$ `order` $- 1$. Fails unless $q$ is prime and `order` is
    /// odd.
    pub fn new(order: Integer, multiplier: u64) -> Result<Self> {
        if order.is_even() || order <= 1 {
            return Err(Error::InvalidParameters(
                "the group order must be odd and larger than 1".to_string(),
            ));
        }

        let cofactor = Integer::from(multiplier) * 4;
        let modulus = Integer::from(&cofactor * &order) - 1;
        if !is_probable_prime(&modulus, DEFAULT_CERTAINTY) {
            return Err(Error::InvalidParameters(format!(
                "4 * {} * n - 1 is not prime",
                multiplier
            )));
        }

        let final_exponent = (Integer::from(modulus.square_ref()) - 1) / &order;
        let sqrt_exponent = Integer::from(&modulus + 1) >> 2;

        Ok(TypeA1Group {
            order,
            cofactor,
            curve: SupersingularCurve::new(modulus.clone()),
            field: QuadraticField::new(modulus),
            final_exponent,
            sqrt_exponent,
        })
    }

    /// The prime $q$ of the field the curve is defined over.
    pub fn field_modulus(&self) -> &Integer {
        self.curve.modulus()
    }

    fn reduce_exponent(&self, exponent: &Integer) -> Integer {
        Integer::from((&*exponent).rem_euc(&self.order))
    }

    /// Evaluates the line with the given slope through $(x_t, y_t)$ at the distorted point
    /// $(-x_q, i y_q)$.
    fn line(
        &self,
        slope: &Integer,
        xt: &Integer,
        yt: &Integer,
        xq: &Integer,
        yq: &Integer,
    ) -> QuadraticElement {
        let re = Integer::from(xq + xt) * slope - yt;
        self.field.element(re, yq.clone())
    }

    /// Miller's algorithm computing $f_{n, P}(\phi(Q))$. Vertical lines evaluate to elements of
    /// $\mathbb{F}_q$, which the final exponentiation maps to one, so they are skipped.
    fn miller_loop(
        &self,
        xp: &Integer,
        yp: &Integer,
        xq: &Integer,
        yq: &Integer,
    ) -> QuadraticElement {
        let mut f = self.field.one();
        let mut xt = xp.clone();
        let mut yt = yp.clone();

        for bit in (0..self.order.significant_bits() - 1).rev() {
            if yt == 0 {
                break;
            }

            let slope = self.curve.tangent_slope(&xt, &yt);
            f = self.field.square(&f);
            f = self.field.mul(&f, &self.line(&slope, &xt, &yt, xq, yq));
            match self.curve.double(&CurvePoint::Affine { x: xt, y: yt }) {
                CurvePoint::Affine { x, y } => {
                    xt = x;
                    yt = y;
                }
                CurvePoint::Infinity => break,
            }

            if self.order.get_bit(bit) {
                if xt == *xp {
                    // T = -P, which only happens in the final step.
                    break;
                }

                let slope = self.curve.chord_slope(&xt, &yt, xp, yp);
                f = self.field.mul(&f, &self.line(&slope, &xt, &yt, xq, yq));
                match self.curve.add(
                    &CurvePoint::Affine { x: xt, y: yt },
                    &CurvePoint::Affine {
                        x: xp.clone(),
                        y: yp.clone(),
                    },
                ) {
                    CurvePoint::Affine { x, y } => {
                        xt = x;
                        yt = y;
                    }
                    CurvePoint::Infinity => break,
                }
            }
        }

        f
    }
}

impl BilinearGroup for TypeA1Group {
    type Element = CurvePoint;
    type TargetElement = QuadraticElement;

    fn order(&self) -> &Integer {
        &self.order
    }

    fn random_generator<R: SecureRng>(&self, rng: &mut GeneralRng<R>) -> Result<CurvePoint> {
        let modulus = self.curve.modulus();

        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let x = gen_below(modulus, rng);
            let rhs = self.curve.rhs(&x);
            if rhs == 0 || rhs.legendre(modulus) != 1 {
                continue;
            }

            // q = 3 mod 4, so a square root is a single exponentiation.
            let y = Integer::from(rhs.secure_pow_mod_ref(&self.sqrt_exponent, modulus));
            let point = self.curve.mul(&CurvePoint::Affine { x, y }, &self.cofactor);
            if point != CurvePoint::Infinity {
                return Ok(point);
            }
        }

        Err(Error::SamplingExhausted {
            attempts: MAX_SAMPLING_ATTEMPTS,
        })
    }

    fn contains(&self, element: &CurvePoint) -> bool {
        self.curve.is_on_curve(element)
            && self.curve.mul(element, &self.order) == CurvePoint::Infinity
    }

    fn identity(&self) -> CurvePoint {
        CurvePoint::Infinity
    }

    fn pow(&self, element: &CurvePoint, exponent: &Integer) -> CurvePoint {
        self.curve.mul(element, &self.reduce_exponent(exponent))
    }

    fn mul(&self, element_a: &CurvePoint, element_b: &CurvePoint) -> CurvePoint {
        self.curve.add(element_a, element_b)
    }

    fn pairing(&self, element_a: &CurvePoint, element_b: &CurvePoint) -> QuadraticElement {
        match (element_a, element_b) {
            (CurvePoint::Affine { x: xp, y: yp }, CurvePoint::Affine { x: xq, y: yq }) => {
                let f = self.miller_loop(xp, yp, xq, yq);
                self.field.pow(&f, &self.final_exponent)
            }
            _ => self.field.one(),
        }
    }

    fn target_identity(&self) -> QuadraticElement {
        self.field.one()
    }

    fn target_contains(&self, element: &QuadraticElement) -> bool {
        self.field.is_reduced(element) && self.field.pow(element, &self.order) == self.field.one()
    }

    fn target_pow(&self, element: &QuadraticElement, exponent: &Integer) -> QuadraticElement {
        self.field.pow(element, &self.reduce_exponent(exponent))
    }

    fn target_mul(
        &self,
        element_a: &QuadraticElement,
        element_b: &QuadraticElement,
    ) -> QuadraticElement {
        self.field.mul(element_a, element_b)
    }
}

/// Generates [`TypeA1Group`]s whose order is the product of two random primes of equal length.
#[derive(Clone, Copy, Debug)]
pub struct TypeA1Generator {
    prime_bits: u32,
}

impl CompositeOrderGenerator for TypeA1Generator {
    type Group = TypeA1Group;

    fn with_prime_bits(prime_bits: u32) -> Self {
        TypeA1Generator { prime_bits }
    }

    /// Generates a fresh composite-order group.
    /// ```
    /// # use phecrypt_pairing::TypeA1Generator;
    /// # use phecrypt_traits::bilinear::{BilinearGroup, CompositeOrderGenerator};
    /// # use phecrypt_traits::randomness::GeneralRng;
    /// # use rand_core::OsRng;
    /// let mut rng = GeneralRng::new(OsRng);
    /// let (group, p, q) = TypeA1Generator::with_prime_bits(32).generate(&mut rng).unwrap();
    /// assert_eq!(*group.order(), p * q);
    /// ```
    fn generate<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<(TypeA1Group, Integer, Integer)> {
        let p = gen_prime(self.prime_bits, rng)?;
        let mut q = gen_prime(self.prime_bits, rng)?;
        let mut attempts = 1;
        while q == p {
            if attempts >= MAX_SAMPLING_ATTEMPTS {
                return Err(Error::SamplingExhausted { attempts });
            }
            q = gen_prime(self.prime_bits, rng)?;
            attempts += 1;
        }

        let order = Integer::from(&p * &q);
        for multiplier in 1..=MAX_SAMPLING_ATTEMPTS {
            let modulus = Integer::from(&order * multiplier) * 4 - 1;
            if !is_probable_prime(&modulus, DEFAULT_CERTAINTY) {
                continue;
            }

            debug!(
                prime_bits = self.prime_bits,
                multiplier,
                field_bits = modulus.significant_bits(),
                "generated type A1 group"
            );
            return Ok((TypeA1Group::new(order, multiplier)?, p, q));
        }

        Err(Error::SamplingExhausted {
            attempts: MAX_SAMPLING_ATTEMPTS,
        })
    }
}
