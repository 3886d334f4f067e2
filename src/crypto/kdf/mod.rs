//! # Key Derivation Functions (KDF)
//!
//! Turn a candidate password into the AES Crypt setup key.
//!
//! - [`ackdf`] - AES Crypt Key Derivation Function (v1–v2 files)
//! - [`pbkdf2`] - PBKDF2-HMAC-SHA512 (v3 files)

pub mod ackdf;
pub mod pbkdf2;
