// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! # zen-core
//!
//! Steganographic codec that hides arbitrary byte payloads in sequences
//! of Han characters reading like plausible text, and recovers them
//! losslessly. The scheme combines Huffman coding with a probabilistic
//! draw over a word-to-word transition graph learned from a Han corpus:
//!
//! 1. **Corpus ingestion** (`corpus`): extract Han code points from UTF-8
//!    files and count bigram transitions into a [`WordGraph`].
//! 2. **Partitioning** (`codec`): shuffle the vocabulary into K disjoint
//!    Huffman dictionaries plus a tail reserve on tree 0.
//! 3. **Encoding**: every dictionary offers a candidate for the stream
//!    head; a bigram-weighted draw picks one, so consecutive characters
//!    follow the corpus statistics while spelling out the payload bits.
//! 4. **Decoding**: a pure per-character lookup concatenating bit paths.
//!
//! The encoded text is *not* a cipher — anyone holding the partitioner
//! can decode it. The [`Zencoder`] façade optionally wraps the payload in
//! AES-256-CBC before encoding.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use zen_core::{corpus, Partitioner, Zencoder};
//!
//! let graph = corpus::graph_from_dir("corpus/".as_ref())?;
//! let codec = Zencoder::new(Partitioner::new(graph, 12, "classics")?);
//!
//! let text = codec.encode_plain(b"attack at dawn");
//! assert_eq!(codec.decode_plain(&text).unwrap(), b"attack at dawn");
//! ```

pub mod codec;
pub mod corpus;
pub mod zencoder;

pub use codec::{BitStream, CodecError, HuffmanTree, Partitioner};
pub use corpus::{graph_from_dir, is_han, WordGraph, WordLoader, WordNode};
pub use zencoder::{crypto, ZenError, Zencoder};
