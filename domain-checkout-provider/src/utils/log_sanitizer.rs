//! Log sanitization utilities
//!
//! Keeps API secrets, signatures and oversized provider bodies out of logs.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters kept visible by [`mask_secret`].
const MASK_VISIBLE_PREFIX: usize = 4;

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a secret-ish value (signature, payment id) keeping only a short prefix.
///
/// `"0f3a9c..."` becomes `"0f3a***"`. Values no longer than the prefix are fully masked.
pub fn mask_secret(s: &str) -> String {
    let visible: String = s.chars().take(MASK_VISIBLE_PREFIX).collect();
    if s.chars().count() <= MASK_VISIBLE_PREFIX {
        "***".to_string()
    } else {
        format!("{visible}***")
    }
}
