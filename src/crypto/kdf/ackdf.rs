//! src/crypto/kdf/ackdf.rs
//! AES Crypt v1–v2 ACKDF: out-param, zero-exposure

use crate::aliases::{Aes256Key32, PasswordString, Salt16};
use crate::consts::ACKDF_ITERATIONS;
use crate::error::RecoveryError;
use crate::utils::utf8_to_utf16le;
use sha2::{Digest, Sha256};

/// Derive the ACKDF key directly into a caller-provided Aes256Key32 buffer
///
/// - 8192 × SHA-256 iterations
/// - UTF-16LE password encoding
/// - 16-byte salt zero-padded into the initial 32-byte hash state
#[inline(always)]
pub fn derive_secure_ackdf_key(
    password: &PasswordString,
    salt: &Salt16,
    out_key: &mut Aes256Key32,
) -> Result<(), RecoveryError> {
    let password_utf16le = utf8_to_utf16le(password.expose_secret());

    let mut hasher = Sha256::new();
    let mut hash = [0u8; 32];
    hash[..16].copy_from_slice(salt.expose_secret());

    for _ in 0..ACKDF_ITERATIONS {
        hasher.update(hash);
        hasher.update(&password_utf16le);
        hash = hasher.finalize_reset().into();
    }

    out_key.expose_secret_mut().copy_from_slice(&hash);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_inputs() {
        let pw = PasswordString::new("Hello".to_string());
        let salt = Salt16::new([0x42; 16]);
        let mut a = Aes256Key32::new([0u8; 32]);
        let mut b = Aes256Key32::new([0u8; 32]);
        derive_secure_ackdf_key(&pw, &salt, &mut a).unwrap();
        derive_secure_ackdf_key(&pw, &salt, &mut b).unwrap();
        assert_eq!(a.expose_secret(), b.expose_secret());
        assert_ne!(a.expose_secret(), &[0u8; 32]);
    }
}
