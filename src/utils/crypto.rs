//! AES-128-CBC payload decryption.
//!
//! The cipher itself comes from the RustCrypto `aes` and `cbc` crates; this
//! module only checks sizes, runs CBC without built-in unpadding, and hands
//! the result to [`pkcs7_unpad`].

use crate::config::{AES_BLOCK_SIZE, AES_KEY_LEN, IV_LEN};
use crate::error::constants::{ERR_PADDING_NOT_PADDED, ERR_PADDING_NO_DATA};
use crate::error::{InformError, Result};
use crate::utils::padding::pkcs7_unpad;
use aes::Aes128;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use tracing::trace;
use zeroize::Zeroize;

type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Decrypt an AES-128-CBC payload and strip its PKCS7 padding.
///
/// `ciphertext` is copied before decryption; the caller's buffer is never
/// modified.
///
/// # Errors
/// - `InformError::InvalidKey` if `key` is not 16 bytes
/// - `InformError::InvalidIv` if `iv` is not 16 bytes
/// - `InformError::InvalidPadding` if the ciphertext is not block aligned or
///   the decrypted padding is malformed
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if key.len() != AES_KEY_LEN {
        return Err(InformError::InvalidKey);
    }
    if iv.len() != IV_LEN {
        return Err(InformError::InvalidIv(iv.len()));
    }
    if ciphertext.len() % AES_BLOCK_SIZE != 0 {
        return Err(InformError::InvalidPadding(ERR_PADDING_NOT_PADDED));
    }
    if ciphertext.is_empty() {
        return Err(InformError::InvalidPadding(ERR_PADDING_NO_DATA));
    }

    let cipher = Aes128CbcDec::new_from_slices(key, iv).map_err(|_| InformError::InvalidKey)?;

    let mut buf = ciphertext.to_vec();
    let decrypted_len = cipher
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| InformError::InvalidPadding(ERR_PADDING_NOT_PADDED))?
        .len();
    trace!(blocks = decrypted_len / AES_BLOCK_SIZE, "Decrypted payload");

    let plaintext_len = match pkcs7_unpad(&buf) {
        Ok(plaintext) => plaintext.len(),
        Err(e) => {
            // Plaintext with broken padding is still plaintext.
            buf.zeroize();
            return Err(e);
        }
    };
    buf.truncate(plaintext_len);
    Ok(buf)
}
