// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! Binary save/load of a constructed [`Partitioner`].
//!
//! The blob is self-contained: the K tree arenas, their roots and
//! tail-code flags, the partitioner name, and the bigram edge weights the
//! encoder draws from. Layout, all integers big-endian:
//!
//! ```text
//! [4 bytes ] magic "ZENC"
//! [2 bytes ] format version (currently 1)
//! [4 bytes ] tree count K
//! K times:
//!   [4 bytes] node count
//!   [4 bytes] root index
//!   [1 byte ] full_code flag
//!   per node: [4] word scalar (0xFFFF_FFFF if none)
//!             [8] frequency
//!             [4] left index  (0xFFFF_FFFF if none)
//!             [4] right index (0xFFFF_FFFF if none)
//! [2 bytes ] name length, then the name (UTF-8)
//! [4 bytes ] graph node count
//!   per node: [4] word scalar, [4] edge count,
//!             per edge: [4] successor scalar, [8] count
//! [4 bytes ] CRC-32 of everything above
//! ```
//!
//! Parent links, the word reverse indices, per-node totals, and the
//! leaves-per-tree figure are all derivable and rebuilt on load; storing
//! them could only let a blob contradict itself. `load(save(p))` behaves
//! identically to `p` for every later encode/decode call.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::corpus::WordGraph;

use super::error::{CodecError, Result};
use super::huffman::{HuffmanTree, Node};
use super::partitioner::Partitioner;

const MAGIC: &[u8; 4] = b"ZENC";
const VERSION: u16 = 1;
/// On-disk sentinel for an absent index or word.
const NONE: u32 = u32::MAX;

impl Partitioner {
    /// Serialize into a self-contained blob.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&VERSION.to_be_bytes());

        out.extend_from_slice(&(self.trees.len() as u32).to_be_bytes());
        for tree in &self.trees {
            let nodes = tree.nodes();
            out.extend_from_slice(&(nodes.len() as u32).to_be_bytes());
            out.extend_from_slice(&tree.root().to_be_bytes());
            out.push(tree.full_code() as u8);
            for node in nodes {
                put_word(&mut out, node.word);
                out.extend_from_slice(&node.freq.to_be_bytes());
                put_index(&mut out, node.left);
                put_index(&mut out, node.right);
            }
        }

        out.extend_from_slice(&(self.name.len() as u16).to_be_bytes());
        out.extend_from_slice(self.name.as_bytes());

        let graph = self.graph.nodes();
        out.extend_from_slice(&(graph.len() as u32).to_be_bytes());
        // sorted for a canonical blob: same partitioner, same bytes
        let mut words: Vec<char> = graph.keys().copied().collect();
        words.sort_unstable();
        for word in words {
            out.extend_from_slice(&u32::from(word).to_be_bytes());
            let node = &graph[&word];
            out.extend_from_slice(&(node.edges().len() as u32).to_be_bytes());
            let mut edges: Vec<(char, u64)> =
                node.edges().iter().map(|(&w, &c)| (w, c)).collect();
            edges.sort_unstable();
            for (next, count) in edges {
                out.extend_from_slice(&u32::from(next).to_be_bytes());
                out.extend_from_slice(&count.to_be_bytes());
            }
        }

        let crc = crc32fast::hash(&out);
        out.extend_from_slice(&crc.to_be_bytes());
        out
    }

    /// Reconstruct a partitioner from a blob produced by [`Self::to_bytes`].
    ///
    /// # Errors
    /// [`CodecError::Corrupted`] on bad magic, CRC mismatch, truncation,
    /// or structurally invalid content; [`CodecError::UnsupportedVersion`]
    /// on a newer format version.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < MAGIC.len() + 2 + 4 {
            return Err(CodecError::Corrupted("blob too short"));
        }
        if &data[..4] != MAGIC {
            return Err(CodecError::Corrupted("bad magic"));
        }

        let body = &data[..data.len() - 4];
        let stored = u32::from_be_bytes(
            data[data.len() - 4..]
                .try_into()
                .map_err(|_| CodecError::Corrupted("blob too short"))?,
        );
        if crc32fast::hash(body) != stored {
            return Err(CodecError::Corrupted("CRC mismatch"));
        }

        let mut r = Reader { data: &body[4..] };
        let version = r.u16()?;
        if version != VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }

        let tree_count = r.u32()? as usize;
        let mut trees = Vec::with_capacity(tree_count);
        for _ in 0..tree_count {
            let node_count = r.u32()? as usize;
            let root = r.u32()?;
            let full_code = match r.u8()? {
                0 => false,
                1 => true,
                _ => return Err(CodecError::Corrupted("bad full_code flag")),
            };
            if root as usize >= node_count {
                return Err(CodecError::Corrupted("root index out of range"));
            }
            let mut nodes = Vec::with_capacity(node_count);
            for _ in 0..node_count {
                let word = r.word()?;
                let freq = r.u64()?;
                let left = r.index(node_count)?;
                let right = r.index(node_count)?;
                nodes.push(Node { word, freq, parent: None, left, right });
            }
            trees.push(HuffmanTree::from_parts(nodes, root, full_code));
        }
        if trees.is_empty() {
            return Err(CodecError::Corrupted("no trees"));
        }

        let name_len = r.u16()? as usize;
        let name = std::str::from_utf8(r.take(name_len)?)
            .map_err(|_| CodecError::Corrupted("name is not UTF-8"))?
            .to_owned();

        let graph_count = r.u32()? as usize;
        let mut edges = Vec::with_capacity(graph_count);
        for _ in 0..graph_count {
            let word = r.char()?;
            let edge_count = r.u32()? as usize;
            let mut outgoing = Vec::with_capacity(edge_count);
            for _ in 0..edge_count {
                let next = r.char()?;
                let count = r.u64()?;
                outgoing.push((next, count));
            }
            edges.push((word, outgoing));
        }
        if !r.data.is_empty() {
            return Err(CodecError::Corrupted("trailing bytes"));
        }
        let graph = WordGraph::from_raw_edges(edges);

        let per_tree = trees[0]
            .nodes()
            .iter()
            .filter(|n| n.left.is_none() && n.right.is_none())
            .count();

        Ok(Self { trees, graph, name, per_tree })
    }

    /// Write the blob to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes();
        debug!("saving partitioner {} ({} bytes) to {}", self.name, bytes.len(), path.display());
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Write the blob to `dir`, named after the partitioner. Returns the
    /// full path written.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.name);
        self.save_to(&path)?;
        Ok(path)
    }

    /// Load a partitioner blob from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

fn put_word(out: &mut Vec<u8>, word: Option<char>) {
    let scalar = word.map_or(NONE, u32::from);
    out.extend_from_slice(&scalar.to_be_bytes());
}

fn put_index(out: &mut Vec<u8>, index: Option<u32>) {
    out.extend_from_slice(&index.unwrap_or(NONE).to_be_bytes());
}

struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.data.len() < n {
            return Err(CodecError::Corrupted("truncated blob"));
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(u64::from_be_bytes(buf))
    }

    fn char(&mut self) -> Result<char> {
        char::from_u32(self.u32()?).ok_or(CodecError::Corrupted("invalid word scalar"))
    }

    fn word(&mut self) -> Result<Option<char>> {
        let raw = self.u32()?;
        if raw == NONE {
            return Ok(None);
        }
        char::from_u32(raw)
            .map(Some)
            .ok_or(CodecError::Corrupted("invalid word scalar"))
    }

    fn index(&mut self, bound: usize) -> Result<Option<u32>> {
        let raw = self.u32()?;
        if raw == NONE {
            return Ok(None);
        }
        if (raw as usize) < bound {
            Ok(Some(raw))
        } else {
            Err(CodecError::Corrupted("node index out of range"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BitStream;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sample() -> Partitioner {
        let text: String = "的一是在不了有和人这".repeat(20);
        let graph = WordGraph::from_words(text.chars());
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        Partitioner::with_rng(graph, 2, "sample.zen", &mut rng).unwrap()
    }

    #[test]
    fn blob_roundtrip_is_canonical() {
        let p = sample();
        let blob = p.to_bytes();
        let loaded = Partitioner::from_bytes(&blob).unwrap();
        assert_eq!(loaded.to_bytes(), blob);
        assert_eq!(loaded.name(), "sample.zen");
        assert_eq!(loaded.tree_count(), 2);
    }

    #[test]
    fn loaded_partitioner_decodes_original_output() {
        let p = sample();
        let payload = [0x13, 0x37, 0x00, 0xFF];
        let mut stream = BitStream::from_bytes(&payload);
        let words = p.encode(&mut stream);

        let loaded = Partitioner::from_bytes(&p.to_bytes()).unwrap();
        let mut decoded = loaded.decode(&words).unwrap();
        assert_eq!(decoded.to_bytes(), payload);
    }

    #[test]
    fn original_decodes_loaded_output() {
        let p = sample();
        let loaded = Partitioner::from_bytes(&p.to_bytes()).unwrap();
        let payload = [0x42; 7];
        let mut stream = BitStream::from_bytes(&payload);
        let words = loaded.encode(&mut stream);
        let mut decoded = p.decode(&words).unwrap();
        assert_eq!(decoded.to_bytes(), payload);
    }

    #[test]
    fn bad_magic_rejected() {
        let mut blob = sample().to_bytes();
        blob[0] = b'X';
        assert!(matches!(
            Partitioner::from_bytes(&blob),
            Err(CodecError::Corrupted("bad magic"))
        ));
    }

    #[test]
    fn future_version_rejected() {
        let p = sample();
        let mut blob = p.to_bytes();
        blob[5] = 9; // version low byte
        // restore the CRC so the version check itself is what fires
        let body_len = blob.len() - 4;
        let crc = crc32fast::hash(&blob[..body_len]);
        blob[body_len..].copy_from_slice(&crc.to_be_bytes());
        assert!(matches!(
            Partitioner::from_bytes(&blob),
            Err(CodecError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn bit_flip_rejected() {
        let mut blob = sample().to_bytes();
        let mid = blob.len() / 2;
        blob[mid] ^= 0x01;
        assert!(matches!(
            Partitioner::from_bytes(&blob),
            Err(CodecError::Corrupted("CRC mismatch"))
        ));
    }

    #[test]
    fn truncation_rejected() {
        let blob = sample().to_bytes();
        assert!(Partitioner::from_bytes(&blob[..blob.len() - 5]).is_err());
        assert!(Partitioner::from_bytes(&[]).is_err());
        assert!(Partitioner::from_bytes(b"ZENC").is_err());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let p = sample();
        let path = p.save_in(dir.path()).unwrap();
        assert!(path.ends_with("sample.zen"));
        let loaded = Partitioner::load_from(&path).unwrap();
        assert_eq!(loaded.to_bytes(), p.to_bytes());
    }
}
