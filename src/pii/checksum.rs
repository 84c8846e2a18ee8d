//! National ID (GB 11643) check character

/// Weights applied to the first 17 digits
const WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];

/// Check character indexed by `weighted sum % 11`
const CHECK_CHARS: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

/// Compute the check character for a 17-digit prefix.
///
/// Returns `None` unless `prefix` is exactly 17 ASCII digits.
pub fn check_char(prefix: &str) -> Option<char> {
    if prefix.len() != WEIGHTS.len() {
        return None;
    }

    let mut sum = 0u32;
    for (byte, weight) in prefix.bytes().zip(WEIGHTS) {
        if !byte.is_ascii_digit() {
            return None;
        }
        sum += u32::from(byte - b'0') * weight;
    }

    Some(CHECK_CHARS[(sum % 11) as usize])
}

/// Whether an 18-character ID number carries a consistent check character.
/// The trailing `x` is accepted in either case.
pub fn validate_id_checksum(candidate: &str) -> bool {
    if candidate.len() != 18 || !candidate.is_ascii() {
        return false;
    }

    let (prefix, last) = candidate.split_at(17);
    let Some(expected) = check_char(prefix) else {
        return false;
    };

    last.chars()
        .next()
        .map(|c| c.to_ascii_uppercase() == expected)
        .unwrap_or(false)
}
