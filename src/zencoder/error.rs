// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! Error type for the user-facing codec façade.

use std::fmt;

use crate::codec::CodecError;

/// Errors from the [`Zencoder`](crate::Zencoder) entry points.
#[derive(Debug)]
pub enum ZenError {
    /// Failure in the underlying codec layer.
    Codec(CodecError),
    /// The input text contains a character no dictionary knows.
    UnknownWord,
    /// The decoded byte stream is shorter than one IV; this was never
    /// cipher output of this partitioner.
    CiphertextTooShort,
    /// AES-CBC unpadding failed (wrong key or corrupted text).
    DecryptionFailed,
}

impl fmt::Display for ZenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "codec error: {e}"),
            Self::UnknownWord => write!(f, "text contains a character outside every dictionary"),
            Self::CiphertextTooShort => write!(f, "decoded data is shorter than an IV"),
            Self::DecryptionFailed => write!(f, "decryption failed (wrong key?)"),
        }
    }
}

impl std::error::Error for ZenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for ZenError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}
