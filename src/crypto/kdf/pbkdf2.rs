//! src/crypto/kdf/pbkdf2.rs

use crate::aliases::{Aes256Key32, HmacSha512, PasswordString, Salt16};
use crate::error::RecoveryError;

use pbkdf2::pbkdf2;

/// Derive PBKDF2-HMAC-SHA512 directly into an Aes256Key32 buffer
///
/// The password is fed as raw UTF-8, as AES Crypt v3 expects.
#[inline(always)]
pub fn derive_secure_pbkdf2_key(
    password: &PasswordString,
    salt: &Salt16,
    iterations: u32,
    out_key: &mut Aes256Key32,
) -> Result<(), RecoveryError> {
    if iterations == 0 {
        return Err(RecoveryError::Crypto("PBKDF2 iterations must be ≥1".into()));
    }

    pbkdf2::<HmacSha512>(
        password.expose_secret().as_bytes(),
        salt.expose_secret(),
        iterations,
        out_key.expose_secret_mut(),
    )
    .map_err(|e| RecoveryError::Crypto(format!("PBKDF2 failed: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_iterations_rejected() {
        let pw = PasswordString::new("pw".to_string());
        let salt = Salt16::new([0u8; 16]);
        let mut key = Aes256Key32::new([0u8; 32]);
        assert!(derive_secure_pbkdf2_key(&pw, &salt, 0, &mut key).is_err());
    }

    #[test]
    fn distinct_passwords_distinct_keys() {
        let salt = Salt16::new([7u8; 16]);
        let mut a = Aes256Key32::new([0u8; 32]);
        let mut b = Aes256Key32::new([0u8; 32]);
        derive_secure_pbkdf2_key(&PasswordString::new("cat".to_string()), &salt, 2, &mut a).unwrap();
        derive_secure_pbkdf2_key(&PasswordString::new("cab".to_string()), &salt, 2, &mut b).unwrap();
        assert_ne!(a.expose_secret(), b.expose_secret());
    }
}
