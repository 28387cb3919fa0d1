use crate::config::SNAPPY_TRAILER_LEN;
use crate::error::constants::{ERR_DECOMPRESSED_TOO_LARGE, ERR_TRAILER_MISSING};
use crate::error::{InformError, Result};
use tracing::trace;

/// Strip the trailer from a Snappy compressed payload and decompress it.
///
/// Enforces a maximum output size limit to prevent decompression bombs.
/// The trailer content is not inspected.
///
/// # Errors
/// Returns `InformError::DecompressionFailure` if:
/// - The payload is shorter than the trailer (the decoder is not invoked)
/// - The claimed output size exceeds `max_output`
/// - The Snappy stream is malformed
pub fn decompress_snappy(payload: &[u8], max_output: usize) -> Result<Vec<u8>> {
    if payload.len() < SNAPPY_TRAILER_LEN {
        return Err(InformError::DecompressionFailure(
            ERR_TRAILER_MISSING.to_string(),
        ));
    }
    let stream = &payload[..payload.len() - SNAPPY_TRAILER_LEN];

    // The stream starts with its decompressed length; reject before allocating.
    let claimed_size = snap::raw::decompress_len(stream)
        .map_err(|e| InformError::DecompressionFailure(e.to_string()))?;
    if claimed_size > max_output {
        return Err(InformError::DecompressionFailure(format!(
            "{ERR_DECOMPRESSED_TOO_LARGE}: {claimed_size} > {max_output}"
        )));
    }

    let decompressed = snap::raw::Decoder::new()
        .decompress_vec(stream)
        .map_err(|e| InformError::DecompressionFailure(e.to_string()))?;
    trace!(
        compressed = stream.len(),
        decompressed = decompressed.len(),
        "Decompressed snappy payload"
    );
    Ok(decompressed)
}
