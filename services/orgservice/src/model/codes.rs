//! Random secrets handed out by the service.
//!
//! # Key invariants
//! - Validation tokens carry 32 bytes of entropy, URL-safe base64 without
//!   padding so they can be embedded in a challenge URL or DNS record.
//! - Verification codes are short uppercase alphanumerics meant for humans.
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use rand::RngCore;

const VERIFICATION_CODE_LEN: usize = 8;
const VERIFICATION_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a domain validation token.
///
/// ```rust
/// use orgservice::model::generate_validation_token;
///
/// let token = generate_validation_token();
/// assert_eq!(token.len(), 43);
/// assert_ne!(token, generate_validation_token());
/// ```
pub fn generate_validation_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a verification code for an email address or phone number.
pub fn generate_verification_code() -> String {
    let mut rng = rand::thread_rng();
    (0..VERIFICATION_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..VERIFICATION_ALPHABET.len());
            VERIFICATION_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_tokens_are_url_safe() {
        let token = generate_validation_token();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn verification_codes_use_alphabet() {
        let code = generate_verification_code();
        assert_eq!(code.len(), VERIFICATION_CODE_LEN);
        assert!(code.bytes().all(|b| VERIFICATION_ALPHABET.contains(&b)));
    }
}
