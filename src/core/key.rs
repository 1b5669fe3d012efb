use regex::Regex;
use std::sync::LazyLock;

pub const ACCESS_KEY_LENGTH: usize = 44;

static ACCESS_KEY_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{44}$").expect("access key pattern is valid"));

/// 計算前 43 位數的 mod-11 檢查碼
///
/// Weights run 2..=9 from the rightmost digit and wrap back to 2. Returns
/// `None` when the input is not exactly 43 ASCII digits.
pub fn check_digit(body: &str) -> Option<u8> {
    if body.len() != ACCESS_KEY_LENGTH - 1 || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut weight = 2u32;
    let mut sum = 0u32;
    for b in body.bytes().rev() {
        sum += u32::from(b - b'0') * weight;
        weight += 1;
        if weight > 9 {
            weight = 2;
        }
    }

    let digit = 11 - sum % 11;
    Some(if digit > 9 { 0 } else { digit as u8 })
}

/// Returns whether `key` is a 44-digit access key with a matching check digit.
///
/// Any other shape is simply invalid, never an error.
pub fn is_valid(key: &str) -> bool {
    if !ACCESS_KEY_SHAPE.is_match(key) {
        return false;
    }

    let (body, last) = key.split_at(ACCESS_KEY_LENGTH - 1);
    match check_digit(body) {
        Some(expected) => last.as_bytes()[0] - b'0' == expected,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 來自實際 NFC-e 的 43 位主體
    const BODY: &str = "3520071420016600018755001000000004610000004";

    fn valid_key() -> String {
        let digit = check_digit(BODY).unwrap();
        format!("{}{}", BODY, digit)
    }

    #[test]
    fn test_known_check_digit() {
        // weighted sum 415, 415 % 11 = 8, 11 - 8 = 3
        assert_eq!(check_digit(BODY), Some(3));
        assert!(is_valid("35200714200166000187550010000000046100000043"));
        assert!(!is_valid("35200714200166000187550010000000046100000046"));
    }

    #[test]
    fn test_remainder_zero_or_one_maps_to_zero() {
        // a body of zeros sums to 0, 11 - 0 = 11 -> 0
        let zeros = "0".repeat(43);
        assert_eq!(check_digit(&zeros), Some(0));
        assert!(is_valid(&format!("{}0", zeros)));
        assert!(!is_valid(&format!("{}1", zeros)));
    }

    #[test]
    fn test_single_digit_flip_invalidates() {
        let key = valid_key();
        assert!(is_valid(&key));

        for i in 0..ACCESS_KEY_LENGTH {
            let mut bytes = key.clone().into_bytes();
            let original = bytes[i];
            bytes[i] = if original == b'9' { b'0' } else { original + 1 };
            let flipped = String::from_utf8(bytes).unwrap();

            let coincides = i < ACCESS_KEY_LENGTH - 1
                && check_digit(&flipped[..ACCESS_KEY_LENGTH - 1]) == check_digit(BODY);
            if !coincides {
                assert!(!is_valid(&flipped), "flip at {} should invalidate", i);
            }
        }
    }

    #[test]
    fn test_wrong_shapes_are_invalid() {
        let key = valid_key();
        assert!(!is_valid(&key[..43]));
        assert!(!is_valid(&format!("{}0", key)));
        assert!(!is_valid(&format!("A{}", &key[1..])));
        assert!(!is_valid(""));
        assert!(!is_valid(&format!(" {}", &key[1..])));
        // non-ASCII digits must not pass the shape check
        assert!(!is_valid(&"٣".repeat(44)));
    }

    #[test]
    fn test_deterministic() {
        let key = valid_key();
        assert_eq!(is_valid(&key), is_valid(&key));
        assert_eq!(check_digit(BODY), check_digit(BODY));
    }
}
