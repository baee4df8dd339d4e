// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! Corpus ingestion: Han word extraction and bigram graph construction.
//!
//! The construction data flow is
//!
//! ```text
//! corpus directory -> WordLoader -> word stream -> WordGraph
//! ```
//!
//! and runs once, before a partitioner is built. Reading is synchronous;
//! the resulting [`WordGraph`] is immutable afterwards.

pub mod graph;
pub mod loader;

pub use graph::{WordGraph, WordNode};
pub use loader::{is_han, WordLoader};

use std::io;
use std::path::Path;

/// Build a bigram graph from every regular file under `root`.
///
/// Consecutive Han code points form edges; file and line boundaries do
/// not break pairing. An unreadable file surfaces as `Err`.
pub fn graph_from_dir(root: &Path) -> io::Result<WordGraph> {
    graph_from_loader(WordLoader::from_dir(root)?)
}

/// Build a bigram graph by draining a [`WordLoader`].
pub fn graph_from_loader(loader: WordLoader) -> io::Result<WordGraph> {
    let mut graph = WordGraph::new();
    let mut last: Option<char> = None;
    for word in loader {
        let word = word?;
        if let Some(prev) = last {
            graph.add_edge(prev, word);
        }
        last = Some(word);
    }
    Ok(graph)
}
