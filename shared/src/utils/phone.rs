//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{1,14}$").unwrap()
});

// ISO 3166-1 alpha-2 shape
static COUNTRY_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2}$").unwrap()
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is valid (international E.164 format)
pub fn is_valid_international_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    INTERNATIONAL_PHONE_REGEX.is_match(&normalized)
}

/// Check if a value has the shape of a two-letter country code (e.g. US, IN)
pub fn is_country_code(code: &str) -> bool {
    COUNTRY_CODE_REGEX.is_match(code)
}

/// Mask a phone number for display (e.g., +86****5678)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}

/// Mask an opaque token, keeping only the last four characters
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    } else {
        "****".to_string()
    }
}

/// Mask every entry of a comma separated number list
pub fn mask_phone_list(numbers: &str) -> String {
    numbers
        .split(',')
        .map(|n| mask_phone_number(n.trim()))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("+1 (415) 555-2671"), "+14155552671");
        assert_eq!(normalize_phone_number("+86 138 1234 5678"), "+8613812345678");
    }

    #[test]
    fn test_is_valid_international_phone() {
        assert!(is_valid_international_phone("+8613812345678"));
        assert!(is_valid_international_phone("+14155552671"));
        assert!(is_valid_international_phone("+442071838750"));
        assert!(!is_valid_international_phone("13812345678")); // Missing +
        assert!(!is_valid_international_phone("+0123456789")); // Invalid country code
    }

    #[test]
    fn test_is_country_code() {
        assert!(is_country_code("US"));
        assert!(is_country_code("in"));
        assert!(!is_country_code("USA"));
        assert!(!is_country_code("+1"));
        assert!(!is_country_code(""));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("13812345678"), "138****5678");
        assert_eq!(mask_phone_number("+8613812345678"), "+86****5678");
        assert_eq!(mask_phone_number("12345"), "****");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("a1b2c3d4e5f6"), "****e5f6");
        assert_eq!(mask_secret("abc"), "****");
    }

    #[test]
    fn test_mask_phone_list() {
        assert_eq!(
            mask_phone_list("+14155552671, +442071838750"),
            "+14****2671,+44****8750"
        );
    }
}
