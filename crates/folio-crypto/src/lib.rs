//! Content hashing for Folio.
//!
//! Every page body is addressed by the SHA-256 digest of its raw bytes,
//! rendered as lowercase hex. There is no domain separation: the address of
//! a blob is exactly `sha256(bytes)`, so it can be reproduced by any external
//! tool (`sha256sum`).

pub mod hasher;

pub use hasher::ContentHasher;
