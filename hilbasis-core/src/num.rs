use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// Three-valued sign of a scalar.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

/// Arbitrary-precision signed rational scalar.
///
/// Values are always kept in lowest terms, so equality and hashing agree
/// with mathematical value. Arithmetic never overflows; there is no
/// floating-point path anywhere.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Numeral(BigRational);

impl Numeral {
    #[inline(always)]
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    #[inline(always)]
    pub fn one() -> Self {
        Self(BigRational::one())
    }

    /// `numer / denom` in lowest terms. Panics if `denom` is zero.
    #[inline]
    pub fn ratio(numer: i64, denom: i64) -> Self {
        Self(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline(always)]
    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    #[inline(always)]
    pub fn is_pos(&self) -> bool {
        self.0.is_positive()
    }

    #[inline(always)]
    pub fn is_neg(&self) -> bool {
        self.0.is_negative()
    }

    #[inline(always)]
    pub fn is_nonneg(&self) -> bool {
        !self.0.is_negative()
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        match self.0.numer().sign() {
            num_bigint::Sign::Minus => Sign::Negative,
            num_bigint::Sign::NoSign => Sign::Zero,
            num_bigint::Sign::Plus => Sign::Positive,
        }
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    #[inline]
    pub fn ref_add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    #[inline]
    pub fn ref_sub(&self, other: &Self) -> Self {
        Self(&self.0 - &other.0)
    }

    #[inline]
    pub fn ref_mul(&self, other: &Self) -> Self {
        Self(&self.0 * &other.0)
    }

    #[inline]
    pub fn ref_neg(&self) -> Self {
        Self(-&self.0)
    }

    #[inline(always)]
    pub fn ref_cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }

    #[inline(always)]
    pub fn into_inner(self) -> BigRational {
        self.0
    }
}

impl Default for Numeral {
    #[inline(always)]
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigRational> for Numeral {
    #[inline(always)]
    fn from(value: BigRational) -> Self {
        Self(value)
    }
}

impl From<BigInt> for Numeral {
    #[inline(always)]
    fn from(value: BigInt) -> Self {
        Self(BigRational::from_integer(value))
    }
}

impl From<i64> for Numeral {
    #[inline(always)]
    fn from(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }
}

impl Add for Numeral {
    type Output = Numeral;

    #[inline(always)]
    fn add(self, rhs: Numeral) -> Numeral {
        Numeral(self.0 + rhs.0)
    }
}

impl Add<&Numeral> for &Numeral {
    type Output = Numeral;

    #[inline(always)]
    fn add(self, rhs: &Numeral) -> Numeral {
        self.ref_add(rhs)
    }
}

impl AddAssign<&Numeral> for Numeral {
    #[inline(always)]
    fn add_assign(&mut self, rhs: &Numeral) {
        self.0 += &rhs.0;
    }
}

impl Sub for Numeral {
    type Output = Numeral;

    #[inline(always)]
    fn sub(self, rhs: Numeral) -> Numeral {
        Numeral(self.0 - rhs.0)
    }
}

impl Sub<&Numeral> for &Numeral {
    type Output = Numeral;

    #[inline(always)]
    fn sub(self, rhs: &Numeral) -> Numeral {
        self.ref_sub(rhs)
    }
}

impl Mul for Numeral {
    type Output = Numeral;

    #[inline(always)]
    fn mul(self, rhs: Numeral) -> Numeral {
        Numeral(self.0 * rhs.0)
    }
}

impl Mul<&Numeral> for &Numeral {
    type Output = Numeral;

    #[inline(always)]
    fn mul(self, rhs: &Numeral) -> Numeral {
        self.ref_mul(rhs)
    }
}

impl Neg for Numeral {
    type Output = Numeral;

    #[inline(always)]
    fn neg(self) -> Numeral {
        Numeral(-self.0)
    }
}

impl Neg for &Numeral {
    type Output = Numeral;

    #[inline(always)]
    fn neg(self) -> Numeral {
        self.ref_neg()
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}
