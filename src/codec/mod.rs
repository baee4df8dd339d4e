// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! The codec layer: bit streams, Huffman dictionaries, and the
//! partitioned ensemble that maps between the two.
//!
//! Encode data flow:
//!
//! ```text
//! payload bytes -> BitStream -> Partitioner::encode -> Han words
//! ```
//!
//! Decode reverses it with a pure lookup, no randomness involved. The
//! [`persist`] module round-trips a built [`Partitioner`] through a
//! self-contained binary blob.

pub mod bitstream;
pub mod error;
pub mod huffman;
pub mod partitioner;
pub mod persist;

pub use bitstream::BitStream;
pub use error::{CodecError, Result};
pub use huffman::HuffmanTree;
pub use partitioner::Partitioner;
