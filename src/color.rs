//! Hex color helpers for the palette

use rand::Rng;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Random `#RRGGBB` color (uppercase digits)
pub fn random_hex<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut color = String::with_capacity(7);
    color.push('#');
    for _ in 0..6 {
        color.push(HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())] as char);
    }
    color
}

/// Accepts `#rgb` and `#rrggbb` in either case
pub fn is_hex(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_hex_shape() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            let c = random_hex(&mut rng);
            assert_eq!(c.len(), 7);
            assert!(is_hex(&c));
            assert!(!c.chars().any(|ch| ch.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_is_hex() {
        assert!(is_hex("#fff"));
        assert!(is_hex("#0a0117"));
        assert!(is_hex("#6616D4"));
        assert!(!is_hex("0a0117"));
        assert!(!is_hex("#0a011"));
        assert!(!is_hex("#ggg"));
        assert!(!is_hex("red"));
    }
}
