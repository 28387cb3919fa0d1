//! # Utility Modules
//!
//! The primitives the payload pipeline is built from.
//!
//! ## Components
//! - **Padding**: PKCS7 padding removal
//! - **Crypto**: AES-128-CBC decryption
//! - **Compression**: Snappy decompression with trailer strip and size limit
//! - **Logging**: Subscriber setup for embedding applications
//!
//! ## Security
//! - Size checks before every allocation driven by wire data
//! - Decompression bomb protection (64MB default limit)
//! - Decrypted buffers are zeroed when padding validation fails

pub mod compression;
pub mod crypto;
pub mod logging;
pub mod padding;
