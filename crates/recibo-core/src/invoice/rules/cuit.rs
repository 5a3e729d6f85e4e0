//! CUIT (Argentine tax identification number) validation.

/// Validate a CUIT using the modulo-11 check digit.
///
/// CUIT format: 11 digits (`XX-XXXXXXXX-X`) where the last digit is a checksum.
/// Weights: 5, 4, 3, 2, 7, 6, 5, 4, 3, 2
pub fn validate_cuit(cuit: &str) -> bool {
    let digits: Vec<u32> = cuit
        .chars()
        .filter(|c| c.is_ascii_digit())
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 11 {
        return false;
    }

    let weights = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];
    let sum: u32 = digits
        .iter()
        .take(10)
        .zip(weights.iter())
        .map(|(d, w)| d * w)
        .sum();

    let checksum = match 11 - (sum % 11) {
        11 => 0,
        // No single check digit exists; AFIP never issues these.
        10 => return false,
        n => n,
    };

    checksum == digits[10]
}

/// Format CUIT with dashes (XX-XXXXXXXX-X).
pub fn format_cuit(cuit: &str) -> String {
    let digits: String = cuit.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 11 {
        return cuit.to_string();
    }

    format!("{}-{}-{}", &digits[0..2], &digits[2..10], &digits[10..11])
}
