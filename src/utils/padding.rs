//! PKCS7 padding removal.
//!
//! Pure validation with no cryptographic dependency: the last byte names the
//! pad length `n`, and the final `n` bytes must all equal `n`.

use crate::error::constants::{ERR_PADDING_NOT_PADDED, ERR_PADDING_NO_DATA, ERR_PADDING_STRUCTURE};
use crate::error::{InformError, Result};

/// Strip PKCS7 padding, returning the unpadded prefix of `buf`.
///
/// # Errors
/// Returns `InformError::InvalidPadding` if:
/// - `buf` is empty (`"no data"`)
/// - the pad length is 0 or longer than `buf` (`"data is not padded"`)
/// - any pad byte differs from the pad length (`"structure invalid"`)
pub fn pkcs7_unpad(buf: &[u8]) -> Result<&[u8]> {
    let Some(&last) = buf.last() else {
        return Err(InformError::InvalidPadding(ERR_PADDING_NO_DATA));
    };

    let n = usize::from(last);
    if n == 0 || n > buf.len() {
        return Err(InformError::InvalidPadding(ERR_PADDING_NOT_PADDED));
    }

    let (data, pad) = buf.split_at(buf.len() - n);
    if pad.iter().any(|&b| b != last) {
        return Err(InformError::InvalidPadding(ERR_PADDING_STRUCTURE));
    }

    Ok(data)
}
