// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! AES-256-CBC stage wrapped around the codec.
//!
//! The cipher layer runs *before* encoding and *after* decoding: a random
//! 16-byte IV is generated per message, the payload is CBC-encrypted with
//! PKCS#7 padding, and the wire format is `IV || ciphertext`. The codec
//! then hides that concatenation in Han text. Note this provides
//! confidentiality of the payload only; the encoded text itself is not a
//! cipher.
//!
//! Keys are raw 256-bit values. [`generate_key`] draws a random one;
//! [`derive_key`] derives one from a passphrase with Argon2id and a fixed
//! salt, so both sides reproduce the key from the passphrase alone. Key
//! buffers are zeroized on drop.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use argon2::Argon2;
use rand::RngCore;
use zeroize::Zeroizing;

use super::error::ZenError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;
/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// Fixed salt for passphrase key derivation. Intentionally constant so
/// encoder and decoder derive the same key without exchanging a salt.
const KEY_SALT: &[u8; 16] = b"zencoder-key-v1\0";

/// Draw a random 256-bit key.
pub fn generate_key() -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    rand::thread_rng().fill_bytes(&mut *key);
    key
}

/// Derive a 256-bit key from a passphrase with Argon2id.
///
/// Deterministic given the passphrase; both sides can derive it
/// independently.
pub fn derive_key(passphrase: &str) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    Argon2::default()
        .hash_password_into(passphrase.as_bytes(), KEY_SALT, &mut *key)
        .expect("Argon2 key derivation should not fail");
    key
}

/// Encrypt `plaintext` with AES-256-CBC under a fresh random IV.
///
/// Returns `IV || ciphertext` (ciphertext is PKCS#7-padded, so its length
/// is the next multiple of 16 above the plaintext length).
pub fn encrypt(plaintext: &[u8], key: &[u8; KEY_LEN]) -> Vec<u8> {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext =
        Aes256CbcEnc::new(key.into(), (&iv).into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    out
}

/// Decrypt `IV || ciphertext` produced by [`encrypt`].
///
/// # Errors
/// - [`ZenError::CiphertextTooShort`] if `data` cannot hold an IV.
/// - [`ZenError::DecryptionFailed`] if unpadding fails (wrong key, or the
///   ciphertext is not block-aligned).
pub fn decrypt(data: &[u8], key: &[u8; KEY_LEN]) -> Result<Vec<u8>, ZenError> {
    if data.len() < IV_LEN {
        return Err(ZenError::CiphertextTooShort);
    }
    let (iv, ciphertext) = data.split_at(IV_LEN);
    if ciphertext.is_empty() || ciphertext.len() % 16 != 0 {
        return Err(ZenError::DecryptionFailed);
    }

    let mut iv_arr = [0u8; IV_LEN];
    iv_arr.copy_from_slice(iv);

    Aes256CbcDec::new(key.into(), (&iv_arr).into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| ZenError::DecryptionFailed)
}
