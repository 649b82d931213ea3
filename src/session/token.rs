//! Session token generation.

use uuid::Uuid;

/// Mint a fresh opaque session token.
///
/// UUID v4 gives 122 bits of randomness, rendered without hyphens so the
/// cookie value stays a single opaque hex run.
pub fn generate() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
    }

    #[test]
    fn tokens_are_opaque_hex() {
        let token = generate();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
