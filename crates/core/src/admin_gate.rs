//! Shared-secret admin gate.
//!
//! The admin dashboard is unlocked by a single configured password. Once
//! unlocked, the client keeps a non-expiring flag named
//! [`ADMIN_FLAG_NAME`]. The flag value is an HMAC-SHA256 tag of the flag
//! name keyed by the secret, so rotating the secret invalidates old flags.
//!
//! This is a convenience gate, not an authorization boundary.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Name of the persisted client flag (cookie name).
pub const ADMIN_FLAG_NAME: &str = "typing_test_admin_auth";

type HmacSha256 = Hmac<Sha256>;

fn mac_for(key: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length")
}

/// Compare a submitted password with the configured secret.
///
/// Both sides are reduced to fixed-length tags and compared in constant time.
pub fn password_matches(candidate: &str, secret: &str) -> bool {
    let mut expected = mac_for(ADMIN_FLAG_NAME);
    expected.update(secret.as_bytes());
    let expected = expected.finalize().into_bytes();

    let mut mac = mac_for(ADMIN_FLAG_NAME);
    mac.update(candidate.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Produce the flag value stored by an unlocked client.
pub fn issue_flag(secret: &str) -> String {
    let mut mac = mac_for(secret);
    mac.update(ADMIN_FLAG_NAME.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check a flag value previously produced by [`issue_flag`].
pub fn flag_is_valid(value: &str, secret: &str) -> bool {
    let Some(tag) = hex::decode(value) else {
        return false;
    };
    let mut mac = mac_for(secret);
    mac.update(ADMIN_FLAG_NAME.as_bytes());
    mac.verify_slice(&tag).is_ok()
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` on odd length or a non-hex digit.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        assert!(password_matches("letmein", "letmein"));
        assert!(!password_matches("letmeout", "letmein"));
        assert!(!password_matches("", "letmein"));
    }

    #[test]
    fn issued_flag_verifies() {
        let flag = issue_flag("secret");
        assert_eq!(flag.len(), 64);
        assert!(flag_is_valid(&flag, "secret"));
    }

    #[test]
    fn flag_from_another_secret_is_rejected() {
        let flag = issue_flag("old-secret");
        assert!(!flag_is_valid(&flag, "new-secret"));
    }

    #[test]
    fn garbage_flags_are_rejected() {
        assert!(!flag_is_valid("true", "secret"));
        assert!(!flag_is_valid("abc", "secret"));
        assert!(!flag_is_valid("", "secret"));
    }
}
