//! The game server's account credential scheme.
//!
//! The auth database stores `SHA1(UPPER(username) ":" UPPER(password))` as
//! lowercase hex. The scheme is weak by modern standards but is an external
//! compatibility constraint: existing accounts stay valid only if this
//! digest matches the game server bit-for-bit.

use sha1::{Digest, Sha1};

/// Computes the legacy account digest as lowercase hex.
pub fn game_digest(username: &str, password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(username.to_uppercase().as_bytes());
    hasher.update(b":");
    hasher.update(password.to_uppercase().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pinned vectors: these must never change, or every existing game
    // account stops authenticating.
    #[test]
    fn digest_matches_known_vectors() {
        assert_eq!(
            game_digest("thrall", "frostwolf"),
            "982542f3235e78fccb7f773b68f7163ddbd8bec5"
        );
        assert_eq!(
            game_digest("Admin", "Secret123"),
            "ecc5a12cce0c455cc15231a8b89383537259c941"
        );
    }

    #[test]
    fn digest_is_case_folded_on_both_sides() {
        assert_eq!(game_digest("JAINA", "kultiras"), game_digest("jaina", "KULTIRAS"));
        assert_eq!(
            game_digest("jaina", "kultiras"),
            "85d90cff69c96abc9c9148189f54ab2d4c4b5a15"
        );
    }
}
