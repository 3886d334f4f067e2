//! # Secure-Gate Type Aliases
//!
//! Secret-bearing buffers used by the AES Crypt password check, built on
//! [`secure-gate`](https://github.com/Slurp9187/secure-gate). Every type requires an
//! explicit `.expose_secret()` / `.expose_secret_mut()` to reach the bytes.
//!
//! ## Type Categories
//!
//! ### HMAC Primitives
//! - [`HmacSha256`] - session block authenticator
//! - [`HmacSha512`] - PBKDF2 PRF
//!
//! ### Dynamic Secrets
//! - [`PasswordString`] - one candidate password handed to a KDF
//!
//! ### Fixed-Size Secrets
//! - [`Aes256Key32`] - 32-byte setup key derived from a candidate
//! - [`EncryptedSessionBlock48`] - 48-byte encrypted session IV + key
//! - [`Iv16`] - 16-byte public IV (the KDF salt)
//! - [`SessionHmacTag32`] - 32-byte session block HMAC

use secure_gate::dynamic_alias;
use secure_gate::fixed_alias;

use hmac::Hmac;
use sha2::{Sha256, Sha512};

// ─────────────────────────────────────────────────────────────────────────────
// HMAC primitives
// ─────────────────────────────────────────────────────────────────────────────
pub type HmacSha256 = Hmac<Sha256>;
pub type HmacSha512 = Hmac<Sha512>;

// ─────────────────────────────────────────────────────────────────────────────
// Dynamic secrets
// ─────────────────────────────────────────────────────────────────────────────
dynamic_alias!(PasswordString, String);

// ─────────────────────────────────────────────────────────────────────────────
// Fixed-size concrete secrets, alphabetical order
// ─────────────────────────────────────────────────────────────────────────────
fixed_alias!(Aes256Key32, 32); // setup key, HMAC key
fixed_alias!(EncryptedSessionBlock48, 48); // encrypted session IV + key
fixed_alias!(Iv16, 16); // public IV
fixed_alias!(Salt16, 16); // the public IV doubles as KDF salt
fixed_alias!(SessionHmacTag32, 32); // session block HMAC
