//! tests/common.rs
//! Common constants and a minimal AES Crypt writer for building fixtures
//!
//! The writer derives keys with the `pbkdf2`/`sha2` crates directly, so the
//! fixtures do not depend on the crate's own KDF code.

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes256Enc, Block};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use std::path::{Path, PathBuf};

/// Fast iteration count for v3 fixtures - performance testing is in benches/
#[allow(dead_code)] // Used across multiple test files
pub const TEST_ITERATIONS: u32 = 5;

/// Password of the end-to-end fixture; found by a `{3..=3, lowercase}` policy
#[allow(dead_code)] // Used across multiple test files
pub const TEST_PASSWORD: &str = "cat";

/// Password outside every small lowercase policy
#[allow(dead_code)] // Used across multiple test files
pub const OUT_OF_POLICY_PASSWORD: &str = "dog7";

#[allow(dead_code)] // Used across multiple test files
pub const TEST_DATA: &[u8] = b"test data";

const PUBLIC_IV: [u8; 16] = [0x11; 16];
const SESSION_IV: [u8; 16] = [0x22; 16];
const SESSION_KEY: [u8; 32] = [0x33; 32];

/// Serialize a complete AES Crypt v1, v2 or v3 file.
#[allow(dead_code)] // Used across multiple test files
pub fn aescrypt_bytes(version: u8, password: &str, plaintext: &[u8]) -> Vec<u8> {
    assert!((1..=3).contains(&version), "writer supports v1–v3 only");

    let mut out = Vec::new();
    out.extend_from_slice(b"AES");
    out.push(version);
    out.push(0x00);
    if version >= 2 {
        let ext: &[u8] = b"CREATED_BY\0aescrypt-recover tests";
        out.extend_from_slice(&(ext.len() as u16).to_be_bytes());
        out.extend_from_slice(ext);
        out.extend_from_slice(&[0x00, 0x00]);
    }
    if version == 3 {
        out.extend_from_slice(&TEST_ITERATIONS.to_be_bytes());
    }
    out.extend_from_slice(&PUBLIC_IV);

    // session IV + key, encrypted under the password-derived setup key
    let setup_key = setup_key(version, password);
    let setup = Aes256Enc::new_from_slice(&setup_key).unwrap();
    let mut session_plain = [0u8; 48];
    session_plain[..16].copy_from_slice(&SESSION_IV);
    session_plain[16..].copy_from_slice(&SESSION_KEY);
    let session_block = cbc_encrypt(&setup, &PUBLIC_IV, &session_plain);
    out.extend_from_slice(&session_block);

    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&setup_key).unwrap();
    mac.update(&session_block);
    if version >= 3 {
        mac.update(&[version]);
    }
    out.extend_from_slice(&mac.finalize().into_bytes());

    // payload under the session key
    let remainder = plaintext.len() % 16;
    let pad = 16 - remainder;
    let mut padded = plaintext.to_vec();
    if version == 3 || remainder != 0 {
        padded.extend(std::iter::repeat(pad as u8).take(pad));
    }
    let session = Aes256Enc::new_from_slice(&SESSION_KEY).unwrap();
    let payload = cbc_encrypt(&session, &SESSION_IV, &padded);
    out.extend_from_slice(&payload);
    if version < 3 {
        out.push(remainder as u8);
    }
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&SESSION_KEY).unwrap();
    mac.update(&payload);
    out.extend_from_slice(&mac.finalize().into_bytes());

    out
}

/// Write an AES Crypt file holding [`TEST_DATA`] into `dir`.
#[allow(dead_code)] // Used across multiple test files
pub fn write_aescrypt(dir: &Path, name: &str, version: u8, password: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, aescrypt_bytes(version, password, TEST_DATA)).unwrap();
    path
}

/// Write arbitrary bytes into `dir`.
#[allow(dead_code)] // Used across multiple test files
pub fn write_raw(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn setup_key(version: u8, password: &str) -> [u8; 32] {
    let mut key = [0u8; 32];
    if version == 3 {
        pbkdf2::pbkdf2::<Hmac<Sha512>>(password.as_bytes(), &PUBLIC_IV, TEST_ITERATIONS, &mut key)
            .unwrap();
    } else {
        let utf16le: Vec<u8> = password.encode_utf16().flat_map(u16::to_le_bytes).collect();
        key[..16].copy_from_slice(&PUBLIC_IV);
        for _ in 0..8192 {
            let mut hasher = Sha256::new();
            hasher.update(key);
            hasher.update(&utf16le);
            key = hasher.finalize().into();
        }
    }
    key
}

fn cbc_encrypt(cipher: &Aes256Enc, iv: &[u8; 16], data: &[u8]) -> Vec<u8> {
    assert_eq!(data.len() % 16, 0);
    let mut prev = *iv;
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(16) {
        let mut block = Block::default();
        for (b, (p, c)) in block.iter_mut().zip(prev.iter().zip(chunk)) {
            *b = p ^ c;
        }
        cipher.encrypt_block(&mut block);
        prev.copy_from_slice(&block);
        out.extend_from_slice(&block);
    }
    out
}
