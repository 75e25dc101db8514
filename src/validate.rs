use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single field-level validation failure, returned to the caller inside
/// the `InvalidInput` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl ToString, message: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

fn digits(s: &str) -> Option<Vec<u32>> {
    if s.is_empty() {
        return None;
    }
    s.chars().map(|c| c.to_digit(10)).collect()
}

/// Validates a CPF (11-digit Brazilian personal tax id) including both
/// check digits. Sequences of a single repeated digit are rejected even
/// though their checksum verifies.
pub fn is_valid_cpf(s: &str) -> bool {
    let ds = match digits(s) {
        Some(ds) if ds.len() == 11 => ds,
        _ => return false,
    };
    if ds.iter().all(|d| *d == ds[0]) {
        return false;
    }

    let dv = |len: usize| -> u32 {
        let sum: u32 = ds[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let rem = (sum * 10) % 11;
        if rem == 10 {
            0
        } else {
            rem
        }
    };

    dv(9) == ds[9] && dv(10) == ds[10]
}

/// Validates a CNPJ (14-digit Brazilian company tax id) including both
/// check digits.
pub fn is_valid_cnpj(s: &str) -> bool {
    let ds = match digits(s) {
        Some(ds) if ds.len() == 14 => ds,
        _ => return false,
    };
    if ds.iter().all(|d| *d == ds[0]) {
        return false;
    }

    const WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let dv = |len: usize| -> u32 {
        let sum: u32 = ds[..len]
            .iter()
            .zip(WEIGHTS[13 - len..].iter())
            .map(|(d, w)| d * w)
            .sum();
        let rem = sum % 11;
        if rem < 2 {
            0
        } else {
            11 - rem
        }
    };

    dv(12) == ds[12] && dv(13) == ds[13]
}

/// Checks the shape of a national tax id: digits only, 11 (CPF) or
/// 14 (CNPJ) long. Client records accept either form.
pub fn is_tax_id(s: &str) -> bool {
    matches!(digits(s), Some(ds) if ds.len() == 11 || ds.len() == 14)
}

/// Checks an ISO date in `YYYY-MM-DD` form.
pub fn is_valid_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpf() {
        assert!(is_valid_cpf("52998224725"));
        assert!(is_valid_cpf("11144477735"));

        assert!(!is_valid_cpf("52998224724")); // wrong check digit
        assert!(!is_valid_cpf("11111111111")); // repeated digits
        assert!(!is_valid_cpf("5299822472")); // too short
        assert!(!is_valid_cpf("529.982.247-25")); // formatted input is rejected
        assert!(!is_valid_cpf(""));
    }

    #[test]
    fn test_cnpj() {
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid_cnpj("11444777000161"));

        assert!(!is_valid_cnpj("11222333000182"));
        assert!(!is_valid_cnpj("00000000000000"));
        assert!(!is_valid_cnpj("112223330001"));
    }

    #[test]
    fn test_tax_id() {
        assert!(is_tax_id("52998224725"));
        assert!(is_tax_id("12345678000190"));

        assert!(!is_tax_id("123"));
        assert!(!is_tax_id("12345678000abc"));
        assert!(!is_tax_id(""));
    }

    #[test]
    fn test_date() {
        assert!(is_valid_date("1990-05-17"));
        assert!(!is_valid_date("1990-13-01"));
        assert!(!is_valid_date("17/05/1990"));
        assert!(!is_valid_date(""));
    }
}
