// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! User-level encode/decode entry points.
//!
//! [`Zencoder`] owns a built [`Partitioner`] and exposes two pairs of
//! operations:
//!
//! - `encode_plain` / `decode_plain`: payload bytes ↔ Han text, no
//!   cipher. The text hides the bytes but is readable by anyone holding
//!   the partitioner.
//! - `encode_cipher` / `decode_cipher`: the payload is AES-256-CBC
//!   encrypted first (random IV prepended), then encoded; decoding
//!   reverses both stages.
//!
//! The partitioner is read-only here, so one `Zencoder` may serve many
//! concurrent calls.

pub mod crypto;
pub mod error;

pub use error::ZenError;

use crate::codec::{BitStream, Partitioner};

use crypto::KEY_LEN;

/// Façade tying a [`Partitioner`] to the payload and cipher stages.
#[derive(Debug, Clone)]
pub struct Zencoder {
    partitioner: Partitioner,
}

impl Zencoder {
    pub fn new(partitioner: Partitioner) -> Self {
        Self { partitioner }
    }

    /// The partitioner backing this codec.
    pub fn partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    /// Replace the backing partitioner. Text encoded before the swap can
    /// no longer be decoded here.
    pub fn set_partitioner(&mut self, partitioner: Partitioner) {
        self.partitioner = partitioner;
    }

    /// Encode raw bytes into a string of Han characters.
    pub fn encode_plain(&self, payload: &[u8]) -> String {
        let mut stream = BitStream::from_bytes(payload);
        self.partitioner.encode(&mut stream).into_iter().collect()
    }

    /// Recover the bytes hidden in `text`.
    ///
    /// Returns `None` when any code point of `text` is unknown to every
    /// dictionary — the input was not produced by this partitioner.
    pub fn decode_plain(&self, text: &str) -> Option<Vec<u8>> {
        let words: Vec<char> = text.chars().collect();
        let mut stream = self.partitioner.decode(&words)?;
        Some(stream.to_bytes())
    }

    /// Encrypt `payload` with AES-256-CBC under `key`, then encode the
    /// IV-prefixed ciphertext.
    pub fn encode_cipher(&self, payload: &[u8], key: &[u8; KEY_LEN]) -> String {
        self.encode_plain(&crypto::encrypt(payload, key))
    }

    /// Decode `text` and decrypt the recovered `IV || ciphertext`.
    ///
    /// # Errors
    /// - [`ZenError::UnknownWord`] if `text` was not produced by this
    ///   partitioner.
    /// - [`ZenError::CiphertextTooShort`] / [`ZenError::DecryptionFailed`]
    ///   from the cipher stage.
    pub fn decode_cipher(&self, text: &str, key: &[u8; KEY_LEN]) -> Result<Vec<u8>, ZenError> {
        let data = self.decode_plain(text).ok_or(ZenError::UnknownWord)?;
        crypto::decrypt(&data, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::WordGraph;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sample_codec() -> Zencoder {
        let text: String = "的一是在不了有和人这".repeat(20);
        let graph = WordGraph::from_words(text.chars());
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        Zencoder::new(Partitioner::with_rng(graph, 2, "sample", &mut rng).unwrap())
    }

    #[test]
    fn plain_roundtrip() {
        let codec = sample_codec();
        let payload = b"zen".to_vec();
        let text = codec.encode_plain(&payload);
        assert!(!text.is_empty());
        assert!(text.chars().all(crate::corpus::is_han));
        assert_eq!(codec.decode_plain(&text).unwrap(), payload);
    }

    #[test]
    fn plain_roundtrip_empty() {
        let codec = sample_codec();
        let text = codec.encode_plain(&[]);
        assert_eq!(codec.decode_plain(&text).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decode_rejects_foreign_text() {
        let codec = sample_codec();
        assert!(codec.decode_plain("hello").is_none());
        let mut text = codec.encode_plain(&[0x01]);
        text.push('卜'); // Han, but outside the sample vocabulary
        assert!(codec.decode_plain(&text).is_none());
    }

    #[test]
    fn cipher_roundtrip() {
        let codec = sample_codec();
        let key = crypto::derive_key("passphrase");
        let payload = b"the cargo arrives at dawn";
        let text = codec.encode_cipher(payload, &key);
        assert!(text.chars().all(crate::corpus::is_han));
        assert_eq!(codec.decode_cipher(&text, &key).unwrap(), payload);
    }

    #[test]
    fn cipher_wrong_key_fails() {
        let codec = sample_codec();
        let payload = b"meet at the usual place";
        let text = codec.encode_cipher(payload, &crypto::derive_key("right"));
        match codec.decode_cipher(&text, &crypto::derive_key("wrong")) {
            Ok(out) => assert_ne!(out, payload),
            Err(e) => assert!(matches!(e, ZenError::DecryptionFailed)),
        }
    }

    #[test]
    fn cipher_rejects_unknown_word() {
        let codec = sample_codec();
        let key = crypto::derive_key("k");
        assert!(matches!(
            codec.decode_cipher("not han text", &key),
            Err(ZenError::UnknownWord)
        ));
    }
}
