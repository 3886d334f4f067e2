//! src/document/aescrypt.rs
//! AES Crypt v1–v3 password check against the session block authenticator
//!
//! The header is parsed once and kept in secure buffers. Each attempt derives
//! the setup key from the candidate and verifies the session HMAC, which is
//! exactly what a full decrypt checks before touching the payload.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use hmac::Mac;

use crate::aliases::{
    Aes256Key32, EncryptedSessionBlock48, HmacSha256, Iv16, PasswordString, SessionHmacTag32,
};
use crate::crypto::kdf::ackdf::derive_secure_ackdf_key;
use crate::crypto::kdf::pbkdf2::derive_secure_pbkdf2_key;
use crate::document::read::{
    consume_all_extensions, read_exact_span, read_file_version, read_kdf_iterations,
    read_reserved_byte,
};
use crate::document::DocumentDecryptor;
use crate::error::RecoveryError;

/// A parsed, read-only AES Crypt document.
#[derive(Debug)]
pub struct AescryptDocument {
    path: Option<PathBuf>,
    version: u8,
    kdf_iterations: u32,
    public_iv: Iv16,
    encrypted_session: EncryptedSessionBlock48,
    session_hmac: SessionHmacTag32,
}

impl AescryptDocument {
    /// Open and parse the header of the file at `path`. The file is closed on return.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecoveryError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut doc = Self::from_reader(BufReader::new(file))?;
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Parse a header from any reader positioned at the start of the file.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, RecoveryError> {
        let version = read_file_version(&mut reader)?;
        read_reserved_byte(&mut reader)?;
        consume_all_extensions(&mut reader, version)?;
        let kdf_iterations = read_kdf_iterations(&mut reader, version)?;

        let public_iv = Iv16::new(read_exact_span(&mut reader)?);
        let encrypted_session = EncryptedSessionBlock48::new(read_exact_span(&mut reader)?);
        let session_hmac = SessionHmacTag32::new(read_exact_span(&mut reader)?);

        Ok(Self {
            path: None,
            version,
            kdf_iterations,
            public_iv,
            encrypted_session,
            session_hmac,
        })
    }

    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    /// PBKDF2 iterations from a v3 header; 0 for v1–v2 (fixed ACKDF).
    #[must_use]
    pub const fn kdf_iterations(&self) -> u32 {
        self.kdf_iterations
    }

    /// Where the document was opened from, if it came from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn derive_setup_key(&self, password: &PasswordString) -> Result<Aes256Key32, RecoveryError> {
        let mut setup_key = Aes256Key32::new([0u8; 32]);
        if self.version <= 2 {
            derive_secure_ackdf_key(password, &self.public_iv, &mut setup_key)?;
        } else {
            derive_secure_pbkdf2_key(
                password,
                &self.public_iv,
                self.kdf_iterations,
                &mut setup_key,
            )?;
        }
        Ok(setup_key)
    }
}

impl DocumentDecryptor for AescryptDocument {
    /// A parsed v1–v3 header always protects its session key with a password.
    fn is_encrypted(&self) -> bool {
        true
    }

    fn try_password(&self, candidate: &str) -> Result<bool, RecoveryError> {
        let password = PasswordString::new(candidate.to_owned());
        let setup_key = self.derive_setup_key(&password)?;

        let mut mac = <HmacSha256 as Mac>::new_from_slice(setup_key.expose_secret())
            .map_err(|e| RecoveryError::Crypto(format!("HMAC key rejected: {e}")))?;
        mac.update(self.encrypted_session.expose_secret());
        if self.version >= 3 {
            mac.update(&[self.version]); // v3: version byte included in session HMAC
        }

        // constant-time comparison
        Ok(mac.verify_slice(self.session_hmac.expose_secret()).is_ok())
    }
}
