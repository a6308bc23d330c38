use crate::randomness::{GeneralRng, SecureRng};
use crate::Result;
use rug::Integer;
use std::fmt::Debug;

/// A cyclic source group $G$ of known (composite) order $n$, together with an admissible bilinear
/// pairing $e: G \times G \to G_T$ into a target group of the same order. Both groups are written
/// multiplicatively.
///
/// The pairing satisfies $e(g^a, g^b) = e(g, g)^{ab}$. Implementations hold only public
/// information; the factorization of the order is never part of the group description.
pub trait BilinearGroup: Clone + Debug + PartialEq {
    /// An element of the source group.
    type Element: Clone + Debug + PartialEq;
    /// An element of the target group.
    type TargetElement: Clone + Debug + PartialEq;

    /// The order $n$ of both groups.
    fn order(&self) -> &Integer;

    /// Samples a uniformly random element of the source group. With overwhelming probability,
    /// this element generates the whole group.
    fn random_generator<R: SecureRng>(&self, rng: &mut GeneralRng<R>) -> Result<Self::Element>;

    /// Returns whether `element` is a member of the source group.
    fn contains(&self, element: &Self::Element) -> bool;

    /// The neutral element of the source group.
    fn identity(&self) -> Self::Element;

    /// Computes `element^exponent` in the source group.
    fn pow(&self, element: &Self::Element, exponent: &Integer) -> Self::Element;

    /// Computes the group operation on two source group elements.
    fn mul(&self, element_a: &Self::Element, element_b: &Self::Element) -> Self::Element;

    /// Evaluates the pairing on two source group elements.
    fn pairing(&self, element_a: &Self::Element, element_b: &Self::Element)
        -> Self::TargetElement;

    /// The neutral element of the target group.
    fn target_identity(&self) -> Self::TargetElement;

    /// Returns whether `element` is a member of the target group, i.e. a well-formed element
    /// whose order divides $n$.
    fn target_contains(&self, element: &Self::TargetElement) -> bool;

    /// Computes `element^exponent` in the target group.
    fn target_pow(&self, element: &Self::TargetElement, exponent: &Integer)
        -> Self::TargetElement;

    /// Computes the group operation on two target group elements.
    fn target_mul(
        &self,
        element_a: &Self::TargetElement,
        element_b: &Self::TargetElement,
    ) -> Self::TargetElement;
}

/// Generates bilinear groups whose order $n = pq$ is the product of two secret primes. The
/// factors are returned alongside the group so that the caller can keep them secret.
pub trait CompositeOrderGenerator {
    /// The kind of group this generator produces.
    type Group: BilinearGroup;

    /// Creates a generator for groups whose order is the product of two `prime_bits`-bit primes.
    fn with_prime_bits(prime_bits: u32) -> Self;

    /// Generates a fresh group of order $n = pq$ and returns it with the factors $(p, q)$.
    fn generate<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<(Self::Group, Integer, Integer)>;
}
