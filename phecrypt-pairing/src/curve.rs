use rug::ops::RemRounding;
use rug::Integer;
use serde::{Deserialize, Serialize};

/// A point on the curve $y^2 = x^3 + x$ over $\mathbb{F}_q$.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurvePoint {
    /// The point at infinity, which is the neutral element.
    Infinity,
    /// A point with reduced affine coordinates.
    Affine {
        /// The x-coordinate.
        x: Integer,
        /// The y-coordinate.
        y: Integer,
    },
}

/// The supersingular curve $E: y^2 = x^3 + x$ over a prime field $\mathbb{F}_q$ with
/// $q = 3 \mod 4$. It has exactly $q + 1$ points over $\mathbb{F}_q$.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SupersingularCurve {
    modulus: Integer,
    inversion_exponent: Integer,
}

impl SupersingularCurve {
    pub(crate) fn new(modulus: Integer) -> Self {
        let inversion_exponent = Integer::from(&modulus - 2);

        SupersingularCurve {
            modulus,
            inversion_exponent,
        }
    }

    pub(crate) fn modulus(&self) -> &Integer {
        &self.modulus
    }

    pub(crate) fn reduce(&self, value: Integer) -> Integer {
        value.rem_euc(&self.modulus)
    }

    /// Inverts a non-zero field element using Fermat's little theorem.
    pub(crate) fn invert(&self, value: &Integer) -> Integer {
        Integer::from(value.secure_pow_mod_ref(&self.inversion_exponent, &self.modulus))
    }

    /// Evaluates the right-hand side $x^3 + x$.
    pub(crate) fn rhs(&self, x: &Integer) -> Integer {
        let x_squared_plus_one = Integer::from(x.square_ref()) + 1;
        self.reduce(x_squared_plus_one * x)
    }

    pub(crate) fn is_on_curve(&self, point: &CurvePoint) -> bool {
        match point {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => {
                let in_range = |c: &Integer| *c >= 0 && *c < self.modulus;
                in_range(x)
                    && in_range(y)
                    && self.reduce(Integer::from(y.square_ref())) == self.rhs(x)
            }
        }
    }

    /// The slope of the tangent at $(x, y)$, where $y \neq 0$.
    pub(crate) fn tangent_slope(&self, x: &Integer, y: &Integer) -> Integer {
        let numerator = Integer::from(x.square_ref()) * 3 + 1;
        let denominator = self.invert(&self.reduce(Integer::from(y * 2)));
        self.reduce(numerator * denominator)
    }

    /// The slope of the chord through $(x_1, y_1)$ and $(x_2, y_2)$, where $x_1 \neq x_2$.
    pub(crate) fn chord_slope(
        &self,
        x1: &Integer,
        y1: &Integer,
        x2: &Integer,
        y2: &Integer,
    ) -> Integer {
        let numerator = Integer::from(y2 - y1);
        let denominator = self.invert(&self.reduce(Integer::from(x2 - x1)));
        self.reduce(numerator * denominator)
    }

    /// The third intersection of the line with the given slope through $(x_1, y_1)$ and
    /// $(x_2, y_2)$, reflected in the x-axis.
    fn complete(
        &self,
        slope: &Integer,
        x1: &Integer,
        y1: &Integer,
        x2: &Integer,
    ) -> CurvePoint {
        let x3 = self.reduce(Integer::from(slope.square_ref()) - x1 - x2);
        let y3 = self.reduce(Integer::from(x1 - &x3) * slope - y1);

        CurvePoint::Affine { x: x3, y: y3 }
    }

    pub(crate) fn double(&self, point: &CurvePoint) -> CurvePoint {
        match point {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine { y, .. } if *y == 0 => CurvePoint::Infinity,
            CurvePoint::Affine { x, y } => {
                let slope = self.tangent_slope(x, y);
                self.complete(&slope, x, y, x)
            }
        }
    }

    pub(crate) fn add(&self, a: &CurvePoint, b: &CurvePoint) -> CurvePoint {
        match (a, b) {
            (CurvePoint::Infinity, _) => b.clone(),
            (_, CurvePoint::Infinity) => a.clone(),
            (CurvePoint::Affine { x: x1, y: y1 }, CurvePoint::Affine { x: x2, y: y2 }) => {
                if x1 == x2 {
                    return if y1 == y2 {
                        self.double(a)
                    } else {
                        CurvePoint::Infinity
                    };
                }

                let slope = self.chord_slope(x1, y1, x2, y2);
                self.complete(&slope, x1, y1, x2)
            }
        }
    }

    /// Double-and-add for a non-negative `scalar`.
    pub(crate) fn mul(&self, point: &CurvePoint, scalar: &Integer) -> CurvePoint {
        let mut result = CurvePoint::Infinity;

        for bit in (0..scalar.significant_bits()).rev() {
            result = self.double(&result);
            if scalar.get_bit(bit) {
                result = self.add(&result, point);
            }
        }

        result
    }
}
