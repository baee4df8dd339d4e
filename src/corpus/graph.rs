// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! Bigram transition graph over corpus words.
//!
//! [`WordGraph`] maps each word to the multiset of words observed
//! immediately after it, with occurrence counts. The encoder reads the
//! counts as draw weights so consecutive output characters follow the
//! corpus statistics; the per-word totals double as Huffman frequencies.
//! After construction the graph is read-only.

use std::collections::HashMap;
use std::fmt;

use log::info;

/// Outgoing edges of a single word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordNode {
    edges: HashMap<char, u64>,
    total: u64,
}

impl WordNode {
    /// Per-successor occurrence counts. Never contains a zero count.
    pub fn edges(&self) -> &HashMap<char, u64> {
        &self.edges
    }

    /// Sum of all edge counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    fn add_edge(&mut self, next: char) {
        *self.edges.entry(next).or_insert(0) += 1;
        self.total += 1;
    }
}

/// Directed, weighted word-to-word transition graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordGraph {
    nodes: HashMap<char, WordNode>,
    connections: u64,
}

impl WordGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `w2` following `w1`.
    ///
    /// Both words are inserted as nodes if absent; `w1`'s edge to `w2`,
    /// `w1`'s total, and the graph-wide connection counter all advance.
    pub fn add_edge(&mut self, w1: char, w2: char) {
        self.nodes.entry(w2).or_default();
        self.nodes.entry(w1).or_default().add_edge(w2);
        self.connections += 1;
    }

    /// Build a graph from a word stream by pairing consecutive words.
    pub fn from_words<I: IntoIterator<Item = char>>(words: I) -> Self {
        let mut graph = Self::new();
        let mut iter = words.into_iter();
        if let Some(mut last) = iter.next() {
            for next in iter {
                graph.add_edge(last, next);
                last = next;
            }
        }
        info!("word graph built: {} words, {} connections", graph.len(), graph.connections);
        graph
    }

    /// Look up a word's outgoing edges.
    pub fn node(&self, word: char) -> Option<&WordNode> {
        self.nodes.get(&word)
    }

    /// Vocabulary size.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of recorded transitions.
    pub fn connections(&self) -> u64 {
        self.connections
    }

    /// Iterate over the vocabulary in unspecified order.
    pub fn words(&self) -> impl Iterator<Item = char> + '_ {
        self.nodes.keys().copied()
    }

    pub(crate) fn insert_node(&mut self, word: char, node: WordNode) {
        self.connections += node.total;
        self.nodes.insert(word, node);
    }

    pub(crate) fn nodes(&self) -> &HashMap<char, WordNode> {
        &self.nodes
    }

    pub(crate) fn from_raw_edges(edges: Vec<(char, Vec<(char, u64)>)>) -> Self {
        let mut graph = Self::new();
        for (word, outgoing) in edges {
            let mut node = WordNode::default();
            for (next, count) in outgoing {
                node.total += count;
                node.edges.insert(next, count);
            }
            graph.insert_node(word, node);
        }
        graph
    }
}

impl fmt::Display for WordGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WordGraph {{ words: {}, connections: {} }}",
            self.nodes.len(),
            self.connections
        )
    }
}
