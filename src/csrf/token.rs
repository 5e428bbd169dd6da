//! # Token Generator
//!
//! Produces the opaque bearer secrets handed out by `/token`: one session
//! identity and one CSRF token per issuance.
//!
//! Tokens are [`TOKEN_LEN`] characters drawn uniformly from printable ASCII
//! (`!`..=`~`) minus characters that are unsafe in headers, JSON or store keys:
//! backslash, backtick, `:` (the store key delimiter) and both quote marks.
//!
//! # Example
//! ```rust
//! use pdf_vault::csrf::token::{generate_token, TOKEN_LEN};
//!
//! let t = generate_token();
//! assert_eq!(t.as_str().len(), TOKEN_LEN);
//! assert!(!t.as_str().contains(':'));
//! ```

use std::fmt;

use rand::Rng;

/// Number of characters in a generated token.
pub const TOKEN_LEN: usize = 32;

/// Characters a token may contain.
pub const ALPHABET: &[u8] =
    b"!#$%&()*+,-./0123456789;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[]^_abcdefghijklmnopqrstuvwxyz{|}~";

/// An opaque bearer secret.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Generates a new random token.
///
/// Uses the thread-local CSPRNG, which is seeded from the operating system.
/// If the OS entropy source is unavailable the generator panics; there is no
/// retry.
pub fn generate_token() -> Token {
    let mut rng = rand::rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();
    Token(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn alphabet_is_printable_ascii_minus_denylist() {
        assert_eq!(ALPHABET.len(), 89);
        for c in ALPHABET {
            assert!((33..=126).contains(c));
        }
        for denied in [b'\\', b'`', b':', b'"', b'\''] {
            assert!(!ALPHABET.contains(&denied), "{}", denied as char);
        }
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), ALPHABET.len());
    }

    #[test]
    fn generated_tokens_have_fixed_length_and_allowed_chars() {
        for _ in 0..200 {
            let t = generate_token();
            assert_eq!(t.as_str().len(), TOKEN_LEN);
            assert!(t.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn generated_tokens_are_unique() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_token().into_string()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn tokens_are_valid_header_values() {
        let t = generate_token();
        assert!(axum::http::HeaderValue::from_str(t.as_str()).is_ok());
    }

    #[test]
    fn debug_does_not_leak_value() {
        let t = Token::from("super-secret-value");
        let dbg = format!("{t:?}");
        assert!(!dbg.contains("super-secret-value"));
    }
}
