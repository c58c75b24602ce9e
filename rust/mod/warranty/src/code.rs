//! 16-digit warranty codes.
//!
//! A code is stored and compared as its 16 bare digits; the grouped form
//! (`2378 5612 8442 0001`) is only for display.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in a warranty code.
pub const CODE_LEN: usize = 16;

/// Largest value representable by a 16-digit code.
pub const MAX_CODE: u64 = 9_999_999_999_999_999;

/// Returned when a string does not hold exactly 16 digits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("code must be exactly 16 digits, got {0:?}")]
pub struct InvalidCode(pub String);

/// A validated warranty code: exactly 16 ASCII digits, no separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WarrantyCode(String);

impl WarrantyCode {
    /// Parse a code, ignoring whitespace and `-` separators.
    ///
    /// `"2378 5612 8442 0001"` and `"2378-5612-8442-0001"` both parse to
    /// the key `2378561284420001`.
    pub fn parse(input: &str) -> Result<Self, InvalidCode> {
        let digits: String = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        Self::parse_exact(&digits).map_err(|_| InvalidCode(input.to_string()))
    }

    /// Parse a code that must already be in bare 16-digit form.
    pub fn parse_exact(input: &str) -> Result<Self, InvalidCode> {
        if is_bare_code(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(InvalidCode(input.to_string()))
        }
    }

    /// Build a code from its numeric value, zero-padded to 16 digits.
    /// Returns None if the value needs more than 16 digits.
    pub fn from_u64(value: u64) -> Option<Self> {
        (value <= MAX_CODE).then(|| Self(format!("{:016}", value)))
    }

    /// Numeric value of the code.
    pub fn to_u64(&self) -> u64 {
        // At most 16 digits, so this cannot overflow.
        self.0
            .bytes()
            .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'))
    }

    /// The bare digits, used as the registry key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form: four space-separated groups of four digits.
    pub fn grouped(&self) -> String {
        let mut out = String::with_capacity(CODE_LEN + 3);
        for (i, c) in self.0.chars().enumerate() {
            if i > 0 && i % 4 == 0 {
                out.push(' ');
            }
            out.push(c);
        }
        out
    }
}

/// Whether `input` is exactly 16 ASCII digits with nothing else.
pub fn is_bare_code(input: &str) -> bool {
    input.len() == CODE_LEN && input.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for WarrantyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WarrantyCode {
    type Error = InvalidCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WarrantyCode> for String {
    fn from(code: WarrantyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_separators() {
        let code = WarrantyCode::parse("2378 5612 8442 0001").unwrap();
        assert_eq!(code.as_str(), "2378561284420001");

        let code = WarrantyCode::parse("2378-5612-8442-0001").unwrap();
        assert_eq!(code.as_str(), "2378561284420001");
    }

    #[test]
    fn parse_rejects_wrong_length_and_letters() {
        assert!(WarrantyCode::parse("237856128442000").is_err());
        assert!(WarrantyCode::parse("23785612844200011").is_err());
        assert!(WarrantyCode::parse("2378 5612 8442 000A").is_err());
        assert!(WarrantyCode::parse("").is_err());
        // Non-ASCII digits are not code digits.
        assert!(WarrantyCode::parse("２３７８５６１２８４４２０００１").is_err());
    }

    #[test]
    fn parse_exact_rejects_separators() {
        assert!(WarrantyCode::parse_exact("2378 5612 8442 0001").is_err());
        assert!(WarrantyCode::parse_exact("2378561284420001").is_ok());
    }

    #[test]
    fn grouped_display() {
        let code = WarrantyCode::parse("2378561284420001").unwrap();
        assert_eq!(code.grouped(), "2378 5612 8442 0001");
        assert_eq!(code.to_string(), "2378561284420001");
    }

    #[test]
    fn numeric_conversion_is_exact_beyond_f64_precision() {
        // 2^53 + 1 is not representable as f64.
        let n = 9_007_199_254_740_993u64;
        let code = WarrantyCode::from_u64(n).unwrap();
        assert_eq!(code.as_str(), "9007199254740993");
        assert_eq!(code.to_u64(), n);
    }

    #[test]
    fn from_u64_pads_and_bounds() {
        assert_eq!(WarrantyCode::from_u64(42).unwrap().as_str(), "0000000000000042");
        assert!(WarrantyCode::from_u64(MAX_CODE).is_some());
        assert!(WarrantyCode::from_u64(MAX_CODE + 1).is_none());
    }

    #[test]
    fn serde_uses_bare_digits() {
        let code = WarrantyCode::parse("2378 5612 8442 0001").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"2378561284420001\"");
        let back: WarrantyCode = serde_json::from_str("\"2378 5612 8442 0001\"").unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<WarrantyCode>("\"12\"").is_err());
    }
}
