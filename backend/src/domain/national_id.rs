//! National taxpayer identifier with check-digit validation.
//!
//! The identifier is an 11-digit number whose last two digits are a
//! deterministic function of the first nine, using a modulo-11 weighting
//! scheme. Validation accepts punctuated input ("529.982.247-25") and
//! returns the canonical digits-only form, which is the representation that
//! gets persisted. The canonical value is returned explicitly alongside the
//! pass/fail outcome so no state crosses call boundaries.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DIGIT_COUNT: usize = 11;

/// Rejection reasons for a candidate national identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NationalIdError {
    /// The candidate contains alphabetic characters.
    #[error("must not contain letters")]
    Format,
    /// The candidate does not contain exactly eleven digits.
    #[error("must contain exactly 11 digits")]
    Length,
    /// All eleven digits are identical, a structurally valid but known
    /// invalid class of numbers.
    #[error("digits must not all be identical")]
    UniformDigits,
    /// One of the two check digits does not match the modulo-11 formula.
    #[error("check digits do not match")]
    Checksum,
}

/// A validated national taxpayer identifier in canonical digits-only form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    /// Validate a candidate identifier and return its canonical form.
    ///
    /// Punctuation and whitespace are ignored; letters are rejected outright.
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::NationalId;
    ///
    /// let id = NationalId::parse("529.982.247-25").expect("valid identifier");
    /// assert_eq!(id.as_str(), "52998224725");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`NationalIdError`] naming the first rejection branch hit:
    /// letters, digit count, uniform digits, then check-digit mismatches.
    pub fn parse(candidate: &str) -> Result<Self, NationalIdError> {
        if candidate.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(NationalIdError::Format);
        }

        let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != DIGIT_COUNT {
            return Err(NationalIdError::Length);
        }

        if digits.iter().all(|&d| Some(&d) == digits.first()) {
            return Err(NationalIdError::UniformDigits);
        }

        let first = check_digit(digits.iter().take(9).copied(), 10);
        if Some(&first) != digits.get(9) {
            return Err(NationalIdError::Checksum);
        }

        let second = check_digit(digits.iter().take(10).copied(), 11);
        if Some(&second) != digits.get(10) {
            return Err(NationalIdError::Checksum);
        }

        let canonical = digits
            .iter()
            .filter_map(|d| char::from_digit(*d, 10))
            .collect();
        Ok(Self(canonical))
    }

    /// Borrow the canonical digits-only representation.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for NationalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<NationalId> for String {
    fn from(value: NationalId) -> Self {
        value.0
    }
}

/// Weighted modulo-11 check digit over the given digits.
///
/// Weights descend from `start_weight` down to 2, one per digit.
fn check_digit(digits: impl Iterator<Item = u32>, start_weight: u32) -> u32 {
    let sum: u32 = digits
        .zip((2..=start_weight).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();
    sum * 10 % 11 % 10
}
