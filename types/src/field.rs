//! Scalar field elements for the audit protocol.
//!
//! All protocol arithmetic happens in the BN254 scalar field — the field
//! consumed by the companion Groth16 circuits and the Poseidon-class hash
//! primitive. The canonical wire representation of an element is the decimal
//! string of its reduced representative; every value is parsed into the
//! field at ingress and all protocol comparisons are field equality, never
//! string comparison.

use ark_bn254::Fr;
use ark_ff::{BigInteger, One, PrimeField, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign};

/// An element of the BN254 scalar field.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(Fr);

/// Error parsing a decimal wire value into a field element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field element: {0}")]
pub struct FieldParseError(String);

impl FieldElement {
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    pub fn one() -> Self {
        Self(Fr::one())
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// Parse the canonical decimal representation. Values at or above the
    /// modulus reduce; anything but ASCII digits is rejected.
    pub fn from_decimal(s: &str) -> Result<Self, FieldParseError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldParseError(format!(
                "expected decimal digits, got {:?}",
                truncate_for_error(s)
            )));
        }
        let ten = Fr::from(10u64);
        let mut acc = Fr::zero();
        for b in s.bytes() {
            acc = acc * ten + Fr::from(u64::from(b - b'0'));
        }
        Ok(Self(acc))
    }

    /// Canonical decimal representation of the reduced representative.
    pub fn to_decimal(&self) -> String {
        self.0.into_bigint().to_string()
    }

    /// Fixed-width big-endian bytes of the reduced representative.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.into_bigint().to_bytes_be()
    }

    /// Reduce arbitrary big-endian bytes into the field.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: FieldElement) -> FieldElement {
        FieldElement(self.0 + rhs.0)
    }
}

impl AddAssign for FieldElement {
    fn add_assign(&mut self, rhs: FieldElement) {
        self.0 += rhs.0;
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: FieldElement) -> FieldElement {
        FieldElement(self.0 * rhs.0)
    }
}

impl MulAssign for FieldElement {
    fn mul_assign(&mut self, rhs: FieldElement) {
        self.0 *= rhs.0;
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dec = self.to_decimal();
        write!(f, "FieldElement({})", truncate_for_error(&dec))
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldVisitor;

        impl Visitor<'_> for FieldVisitor {
            type Value = FieldElement;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal field element string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldElement, E> {
                FieldElement::from_decimal(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldElement, E> {
                Ok(FieldElement::from_u64(v))
            }
        }

        // JSON mixes bare numbers and strings; binary formats like the
        // persisted record encoding carry the decimal string only and do
        // not support self-describing deserialization.
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(FieldVisitor)
        } else {
            deserializer.deserialize_str(FieldVisitor)
        }
    }
}

fn truncate_for_error(s: &str) -> String {
    if s.chars().count() > 16 {
        let head: String = s.chars().take(16).collect();
        format!("{head}…")
    } else {
        s.to_string()
    }
}
