// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! Error types for the codec layer.
//!
//! [`CodecError`] covers partitioner construction, bit stream misuse, and
//! persistence failures. Decoding an unknown word is *not* an error: the
//! decode paths return `None` so callers can show a validation message.

use std::fmt;
use std::io;

/// Errors from partitioner construction, bit stream access, and persistence.
#[derive(Debug)]
pub enum CodecError {
    /// The corpus produced no Han code points; the word graph is empty.
    CorpusEmpty,
    /// The vocabulary is too small to fill `trees` dictionaries with at
    /// least two leaves each (`words / (trees + 1) - 1 < 2`).
    VocabularyTooSmall { words: usize, trees: usize },
    /// A partitioner with zero Huffman trees was requested.
    InvalidTreeCount(usize),
    /// `pop` or `front` on an empty bit stream.
    BitstreamUnderflow,
    /// Filesystem failure while reading a corpus or a persisted blob.
    Io(io::Error),
    /// A persisted blob is truncated, bit-flipped, or structurally invalid.
    Corrupted(&'static str),
    /// A persisted blob carries a format version this build does not read.
    UnsupportedVersion(u16),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CorpusEmpty => write!(f, "corpus contains no Han code points"),
            Self::VocabularyTooSmall { words, trees } => write!(
                f,
                "vocabulary of {words} words cannot fill {trees} dictionaries"
            ),
            Self::InvalidTreeCount(n) => write!(f, "invalid dictionary count: {n}"),
            Self::BitstreamUnderflow => write!(f, "bit stream underflow"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Corrupted(msg) => write!(f, "corrupted partitioner blob: {msg}"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported blob format version: {v}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
