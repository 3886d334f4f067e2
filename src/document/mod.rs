//! # Documents
//!
//! The decryption capability the search drives, and pre-flight validation.
//!
//! [`DocumentDecryptor`] is the seam: the search controller only ever asks
//! "does this candidate open the document?". [`AescryptDocument`] answers it for
//! AES Crypt v1–v3 files.

pub mod aescrypt;
pub mod read;

pub use aescrypt::AescryptDocument;

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::RecoveryError;

/// Tests candidate passwords against one open, read-only document.
///
/// Implementations must tolerate any number of sequential attempts without
/// reopening or mutating the document.
pub trait DocumentDecryptor {
    /// Whether the document requires a password at all.
    fn is_encrypted(&self) -> bool;

    /// `Ok(true)` if `candidate` opens the document, or the document needs no
    /// password; `Ok(false)` for a wrong password.
    ///
    /// `Err` is reserved for failures of the attempt itself (I/O, parse); the
    /// search logs it and moves on as if the password were wrong.
    fn try_password(&self, candidate: &str) -> Result<bool, RecoveryError>;
}

impl<D: DocumentDecryptor + ?Sized> DocumentDecryptor for &D {
    fn is_encrypted(&self) -> bool {
        (**self).is_encrypted()
    }

    fn try_password(&self, candidate: &str) -> Result<bool, RecoveryError> {
        (**self).try_password(candidate)
    }
}

impl<D: DocumentDecryptor + ?Sized> DocumentDecryptor for Box<D> {
    fn is_encrypted(&self) -> bool {
        (**self).is_encrypted()
    }

    fn try_password(&self, candidate: &str) -> Result<bool, RecoveryError> {
        (**self).try_password(candidate)
    }
}

impl<D: DocumentDecryptor + ?Sized> DocumentDecryptor for std::sync::Arc<D> {
    fn is_encrypted(&self) -> bool {
        (**self).is_encrypted()
    }

    fn try_password(&self, candidate: &str) -> Result<bool, RecoveryError> {
        (**self).try_password(candidate)
    }
}

/// Outcome of pre-flight validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub reason: String,
}

impl Validation {
    fn ok(reason: impl Into<String>) -> Self {
        Self {
            valid: true,
            reason: reason.into(),
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }

    /// Checks that an already-open document actually needs a password.
    pub fn of<D: DocumentDecryptor + ?Sized>(doc: &D) -> Self {
        if doc.is_encrypted() {
            Self::ok("valid password-protected document")
        } else {
            Self::rejected("document is not password protected")
        }
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Check that `path` exists, parses as AES Crypt, and is password protected.
///
/// Must pass before a search is started against the file.
pub fn validate(path: impl AsRef<Path>) -> Validation {
    validate_and_open(path).0
}

/// [`validate`], also returning the parsed document when it is valid.
pub fn validate_and_open(path: impl AsRef<Path>) -> (Validation, Option<AescryptDocument>) {
    let path = path.as_ref();
    if !path.exists() {
        return (Validation::rejected("file does not exist"), None);
    }

    match AescryptDocument::open(path) {
        Ok(doc) => {
            let verdict = Validation::of(&doc);
            if !verdict.valid {
                return (verdict, None);
            }
            debug!(path = %path.display(), version = doc.version(), "document validated");
            (
                Validation::ok(format!(
                    "valid password-protected AES Crypt v{} document",
                    doc.version()
                )),
                Some(doc),
            )
        }
        Err(RecoveryError::Io(e)) => (Validation::rejected(format!("error: {e}")), None),
        Err(e) => (
            Validation::rejected(format!("invalid AES Crypt file format: {e}")),
            None,
        ),
    }
}
