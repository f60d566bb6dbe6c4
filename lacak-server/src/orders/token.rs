//! Scan Token Generator
//!
//! Produces the opaque token embedded in the receipt barcode. The charset is
//! restricted to uppercase letters and digits so the token encodes cleanly
//! as CODE128 for cheap 1D scanners.

use rand::Rng;

/// Characters safe for 1D barcodes (CODE128): uppercase + digits
const TOKEN_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fixed token length. 36^25 ≈ 2^129, comfortably past the point where a
/// collision or a guessed token is a practical concern.
const TOKEN_LEN: usize = 25;

/// Generate a fresh scan token. Assigned once at order creation and never
/// regenerated afterwards.
pub fn generate_scan_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_CHARS.len());
            TOKEN_CHARS[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_fixed_length_and_barcode_charset() {
        for _ in 0..100 {
            let token = generate_scan_token();
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(
                token
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            );
        }
    }

    #[test]
    fn tokens_do_not_repeat_in_practice() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate_scan_token()));
        }
    }
}
