// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/zencore

//! Lazy Han word extraction from UTF-8 corpus files.
//!
//! [`WordLoader`] yields one Han code point at a time, in file order,
//! within each file in line order, within each line in code-point order.
//! Everything that is not Script=Han (punctuation, whitespace, digits,
//! Latin, kana, …) is skipped silently. File boundaries are invisible to
//! the consumer: the last word of one file and the first word of the next
//! still form a bigram.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use log::debug;

/// Unicode Script=Han membership test.
///
/// Range table over the Han blocks: symbols and ideographic iteration
/// marks from CJK Symbols and Punctuation, Kangxi and CJK radicals, the
/// unified ideographs with extensions A–I, and the compatibility
/// ideograph blocks. Kana, Hangul, and general CJK punctuation are not
/// Han and fall through.
pub fn is_han(c: char) -> bool {
    matches!(u32::from(c),
        0x2E80..=0x2E99          // CJK Radicals Supplement
        | 0x2E9B..=0x2EF3
        | 0x2F00..=0x2FD5        // Kangxi Radicals
        | 0x3005                 // ideographic iteration mark
        | 0x3007                 // ideographic number zero
        | 0x3021..=0x3029        // Hangzhou numerals
        | 0x3038..=0x303B
        | 0x3400..=0x4DBF        // CJK Unified Ideographs Extension A
        | 0x4E00..=0x9FFF        // CJK Unified Ideographs
        | 0xF900..=0xFA6D        // CJK Compatibility Ideographs
        | 0xFA70..=0xFAD9
        | 0x20000..=0x2A6DF      // Extension B
        | 0x2A700..=0x2B739      // Extension C
        | 0x2B740..=0x2B81D      // Extension D
        | 0x2B820..=0x2CEA1      // Extension E
        | 0x2CEB0..=0x2EBE0      // Extension F
        | 0x2EBF0..=0x2EE5D      // Extension I
        | 0x2F800..=0x2FA1D      // CJK Compatibility Ideographs Supplement
        | 0x30000..=0x3134A      // Extension G
        | 0x31350..=0x323AF      // Extension H
    )
}

/// Iterator over the Han code points of an ordered list of files.
///
/// Yields `io::Result<char>`: a read failure surfaces once as `Err` and
/// ends the stream. End of the last file is plain iterator exhaustion.
pub struct WordLoader {
    files: std::vec::IntoIter<PathBuf>,
    lines: Option<Lines<BufReader<File>>>,
    pending: VecDeque<char>,
}

impl WordLoader {
    /// Read the given files in order.
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files: files.into_iter(),
            lines: None,
            pending: VecDeque::new(),
        }
    }

    /// Read every regular file under `root`, recursively, in sorted path
    /// order (stable across runs on the same tree).
    pub fn from_dir(root: &Path) -> io::Result<Self> {
        let mut files = Vec::new();
        collect_files(root, &mut files)?;
        files.sort();
        debug!("corpus at {} has {} files", root.display(), files.len());
        Ok(Self::new(files))
    }

    fn refill(&mut self) -> io::Result<bool> {
        loop {
            if let Some(lines) = self.lines.as_mut() {
                match lines.next() {
                    Some(line) => {
                        let line = line?;
                        self.pending.extend(line.chars().filter(|&c| is_han(c)));
                        if !self.pending.is_empty() {
                            return Ok(true);
                        }
                    }
                    None => self.lines = None,
                }
                continue;
            }
            match self.files.next() {
                Some(path) => {
                    let file = File::open(&path)?;
                    self.lines = Some(BufReader::new(file).lines());
                }
                None => return Ok(false),
            }
        }
    }
}

impl Iterator for WordLoader {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(word) = self.pending.pop_front() {
            return Some(Ok(word));
        }
        match self.refill() {
            Ok(true) => self.pending.pop_front().map(Ok),
            Ok(false) => None,
            Err(e) => {
                // poison the loader so the error is reported once
                self.lines = None;
                self.files = Vec::new().into_iter();
                Some(Err(e))
            }
        }
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let ty = entry.file_type()?;
        if ty.is_dir() {
            collect_files(&path, out)?;
        } else if ty.is_file() {
            out.push(path);
        }
    }
    Ok(())
}
