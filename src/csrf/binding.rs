//! # Keyed Binding Transform
//!
//! Maps a plaintext token to the representation that is stored and compared:
//! AES-256-CBC with PKCS#7 padding, applied `rounds` times, where each round
//! encrypts the lowercase hex of the previous round's final ciphertext block.
//!
//! ```text
//! r0 = token
//! rN = hex(last_block(AES-256-CBC(key, iv = 0^16, r(N-1))))
//! bind(token) = r(rounds)
//! ```
//!
//! Every round yields exactly [`BOUND_LEN`] hex characters, so the cost of a
//! bind is linear in `rounds` and the stored value has a fixed width. Under
//! CBC the final block depends on every input byte. Keeping only that block
//! discards the rest of the ciphertext, so the transform is one-way even
//! with the key.
//!
//! The transform is deterministic: the same token, key and round count always
//! give the same output. That is what lets a later request's token be compared
//! with the value stored at issuance.
//!
//! ## Fixed IV
//! The IV is all zeros for every round and every token. Randomising it would
//! break equality-based validation, so it stays fixed. The consequence is that
//! equal inputs produce equal outputs under one key. Tokens are random and
//! single-purpose, which keeps this acceptable for this use.
//!
//! # Example
//! ```rust
//! use pdf_vault::csrf::binding::Binder;
//!
//! let binder = Binder::new(*b"0123456789abcdef0123456789abcdef", 2).unwrap();
//! let a = binder.bind("token").unwrap();
//! let b = binder.bind("token").unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.as_str().len(), 32);
//! ```

use std::fmt;

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use subtle::ConstantTimeEq;
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;

const BLOCK_LEN: usize = 16;
const ZERO_IV: [u8; BLOCK_LEN] = [0u8; BLOCK_LEN];

/// Length in hex characters of every bound value.
pub const BOUND_LEN: usize = BLOCK_LEN * 2;

/// Binding failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// The cipher could not be initialised (wrong key length).
    #[error("cipher initialisation failed: key must be 32 bytes, got {0}")]
    Encryption(usize),

    #[error("round count must be at least 1")]
    InvalidRounds,
}

/// The bound (stored/compared) form of a token: lowercase hex.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BoundValue(String);

impl BoundValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &str) -> bool {
        self.0.as_bytes().ct_eq(other.as_bytes()).into()
    }
}

impl From<String> for BoundValue {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // prefix only
        let head: String = self.0.chars().take(8).collect();
        write!(f, "BoundValue({head}…)")
    }
}

/// Keyed, multi-round binder.
#[derive(Clone)]
pub struct Binder {
    key: Vec<u8>,
    rounds: u32,
}

impl Binder {
    /// Creates a binder.
    ///
    /// The key length is checked when binding, so a misconfigured key surfaces
    /// as [`BindError::Encryption`] on the request that uses it.
    ///
    /// # Errors
    /// [`BindError::InvalidRounds`] when `rounds` is 0.
    pub fn new(key: impl Into<Vec<u8>>, rounds: u32) -> Result<Self, BindError> {
        if rounds == 0 {
            return Err(BindError::InvalidRounds);
        }
        Ok(Self {
            key: key.into(),
            rounds,
        })
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Binds `token`.
    ///
    /// # Errors
    /// [`BindError::Encryption`] when the key is not 32 bytes.
    pub fn bind(&self, token: &str) -> Result<BoundValue, BindError> {
        let mut current = token.as_bytes().to_vec();
        for _ in 0..self.rounds {
            let enc = Aes256CbcEnc::new_from_slices(&self.key, &ZERO_IV)
                .map_err(|_| BindError::Encryption(self.key.len()))?;
            let ciphertext = enc.encrypt_padded_vec_mut::<Pkcs7>(&current);
            // PKCS#7 output is never shorter than one block
            let last = &ciphertext[ciphertext.len() - BLOCK_LEN..];
            current = hex::encode(last).into_bytes();
        }
        // hex output is always ASCII
        Ok(BoundValue(String::from_utf8_lossy(&current).into_owned()))
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("key", &"<redacted>")
            .field("rounds", &self.rounds)
            .finish()
    }
}
