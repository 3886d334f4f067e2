//! src/document/read.rs
//! Stack-first AES Crypt header parsing, up to and including the session HMAC

use crate::consts::{
    AESCRYPT_LATEST_VERSION, AESCRYPT_MIN_CHECKABLE_VERSION, PBKDF2_MAX_ITER, PBKDF2_MIN_ITER,
};
use crate::error::RecoveryError;
use std::io::{self, Read};

/// Read exactly `N` bytes into a stack-allocated `[u8; N]`.
///
/// A short read is reported as a truncated header rather than a bare I/O error.
#[inline(always)]
pub fn read_exact_span<R, const N: usize>(reader: &mut R) -> Result<[u8; N], RecoveryError>
where
    R: Read,
{
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => RecoveryError::Header("truncated header".into()),
        _ => RecoveryError::Io(e),
    })?;
    Ok(buf)
}

/// Validate file magic `"AES"` + version byte.
///
/// v0 parses as a version but carries no session authenticator, so it is
/// rejected here: a password cannot be checked without decrypting the whole file.
#[inline(always)]
pub fn read_file_version<R>(reader: &mut R) -> Result<u8, RecoveryError>
where
    R: Read,
{
    let header = read_exact_span::<_, 4>(reader)?;
    if header[..3] != *b"AES" {
        return Err(RecoveryError::Header(
            "invalid magic header (expected 'AES')".into(),
        ));
    }
    let version = header[3];
    if version > AESCRYPT_LATEST_VERSION {
        return Err(RecoveryError::UnsupportedVersion(version));
    }
    if version < AESCRYPT_MIN_CHECKABLE_VERSION {
        return Err(RecoveryError::Header(
            "AES Crypt v0 files carry no password authenticator".into(),
        ));
    }
    Ok(version)
}

/// Read the reserved byte; it must be zero from v1 on
#[inline(always)]
pub fn read_reserved_byte<R>(reader: &mut R) -> Result<(), RecoveryError>
where
    R: Read,
{
    if read_exact_span::<_, 1>(reader)?[0] != 0x00 {
        return Err(RecoveryError::Header(
            "invalid header: reserved byte != 0x00".into(),
        ));
    }
    Ok(())
}

/// Consume all v2+ extensions (zero-copy skip)
#[inline(always)]
pub fn consume_all_extensions<R>(reader: &mut R, version: u8) -> Result<(), RecoveryError>
where
    R: Read,
{
    if version < 2 {
        return Ok(());
    }

    loop {
        let len = u16::from_be_bytes(read_exact_span::<_, 2>(reader)?);
        if len == 0 {
            break; // end of extensions
        }

        let mut discard = [0u8; 256];
        let mut remaining = usize::from(len);
        while remaining > 0 {
            let to_read = remaining.min(discard.len());
            reader
                .read_exact(&mut discard[..to_read])
                .map_err(|_| RecoveryError::Header("truncated extension".into()))?;
            remaining -= to_read;
        }
    }
    Ok(())
}

/// Read KDF iterations (v3+ only). Returns 0 for older versions.
#[inline(always)]
pub fn read_kdf_iterations<R>(reader: &mut R, version: u8) -> Result<u32, RecoveryError>
where
    R: Read,
{
    if version < 3 {
        return Ok(0);
    }

    let iterations = u32::from_be_bytes(read_exact_span::<_, 4>(reader)?);
    if iterations < PBKDF2_MIN_ITER {
        return Err(RecoveryError::Header(
            "KDF iterations cannot be zero".into(),
        ));
    }
    if iterations > PBKDF2_MAX_ITER {
        return Err(RecoveryError::Header(
            "KDF iterations unreasonably high (>5M)".into(),
        ));
    }
    Ok(iterations)
}
