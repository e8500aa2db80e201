//! Brazilian taxpayer document validation
//!
//! Registration accepts either a CPF (individuals, 11 digits) or a CNPJ
//! (companies, 14 digits). Punctuation such as `529.982.247-25` or
//! `11.222.333/0001-81` is accepted and stripped. Both formats end in two
//! mod-11 check digits; sequences of a single repeated digit pass the
//! arithmetic but are never issued, so they are rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FluxoError, FluxoResult};

/// Which kind of document a number is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Cpf,
    Cnpj,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpf => write!(f, "CPF"),
            Self::Cnpj => write!(f, "CNPJ"),
        }
    }
}

/// A validated CPF or CNPJ, digits only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxDocument {
    kind: DocumentKind,
    digits: String,
}

impl TaxDocument {
    /// Validate a CPF or CNPJ
    pub fn parse(input: &str) -> FluxoResult<Self> {
        let digits = normalize(input).ok_or_else(invalid)?;

        let kind = match digits.len() {
            11 if is_valid_cpf(&digits) => DocumentKind::Cpf,
            14 if is_valid_cnpj(&digits) => DocumentKind::Cnpj,
            _ => return Err(invalid()),
        };

        Ok(Self {
            kind,
            digits: digits.iter().map(|d| char::from(b'0' + d)).collect(),
        })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn into_string(self) -> String {
        self.digits
    }
}

impl fmt::Display for TaxDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.digits;
        match self.kind {
            DocumentKind::Cpf => write!(f, "{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
            DocumentKind::Cnpj => write!(
                f,
                "{}.{}.{}/{}-{}",
                &d[..2],
                &d[2..5],
                &d[5..8],
                &d[8..12],
                &d[12..]
            ),
        }
    }
}

/// True if `input` is a valid CPF or CNPJ
pub fn is_valid(input: &str) -> bool {
    TaxDocument::parse(input).is_ok()
}

fn invalid() -> FluxoError {
    FluxoError::Validation("CPF/CNPJ inválido.".into())
}

// Digits of the input with the usual separators removed; None on any other character
fn normalize(input: &str) -> Option<Vec<u8>> {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/' | ' '))
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect()
}

fn is_repeated(digits: &[u8]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

fn is_valid_cpf(digits: &[u8]) -> bool {
    if is_repeated(digits) {
        return false;
    }

    let check = |len: usize| -> u8 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, &d)| u32::from(d) * (len as u32 + 1 - i as u32))
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            r => r as u8,
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

fn is_valid_cnpj(digits: &[u8]) -> bool {
    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    if is_repeated(digits) {
        return false;
    }

    let check = |weights: &[u32]| -> u8 {
        let sum: u32 = digits
            .iter()
            .zip(weights)
            .map(|(&d, w)| u32::from(d) * w)
            .sum();
        match sum % 11 {
            r if r < 2 => 0,
            r => (11 - r) as u8,
        }
    };

    check(&FIRST) == digits[12] && check(&SECOND) == digits[13]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpf() {
        let doc = TaxDocument::parse("52998224725").unwrap();
        assert_eq!(doc.kind(), DocumentKind::Cpf);
        assert_eq!(doc.as_str(), "52998224725");
    }

    #[test]
    fn test_formatted_cpf() {
        let doc = TaxDocument::parse(" 529.982.247-25 ").unwrap();
        assert_eq!(doc.as_str(), "52998224725");
        assert_eq!(doc.to_string(), "529.982.247-25");
    }

    #[test]
    fn test_valid_cnpj() {
        let doc = TaxDocument::parse("11.222.333/0001-81").unwrap();
        assert_eq!(doc.kind(), DocumentKind::Cnpj);
        assert_eq!(doc.as_str(), "11222333000181");
        assert_eq!(doc.to_string(), "11.222.333/0001-81");
    }

    #[test]
    fn test_cpf_with_zero_check_digit() {
        // First check digit computes to remainder 10
        assert!(is_valid("390.533.447-05"));
        assert!(is_valid("11144477735"));
    }

    #[test]
    fn test_wrong_check_digits() {
        assert!(!is_valid("52998224724"));
        assert!(!is_valid("52998224715"));
        assert!(!is_valid("11222333000182"));
    }

    #[test]
    fn test_repeated_digits_rejected() {
        assert!(!is_valid("00000000000"));
        assert!(!is_valid("11111111111"));
        assert!(!is_valid("00000000000000"));
    }

    #[test]
    fn test_wrong_length_or_characters() {
        for input in ["", "123", "5299822472", "529982247250", "5299822472a", "abc"] {
            assert!(!is_valid(input), "{} should be rejected", input);
        }
    }

    #[test]
    fn test_error_is_validation() {
        let err = TaxDocument::parse("123").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("CPF/CNPJ inválido."));
    }
}
