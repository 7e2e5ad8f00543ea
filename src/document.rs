// SPDX-FileCopyrightText: 2026 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Target file document model.
//!
//! A `.gitignore` file managed by gitig is a sequence of user-owned
//! __junk lines__ interleaved with tagged __template blocks__:
//!
//! ```text
//! *.swp
//! ##gitig-start:Python
//! __pycache__/
//! *.py[cod]
//! ##gitig-end:Python
//! ```
//!
//! Junk lines belong to the user and survive every rewrite byte-for-byte.
//! Block content is owned by gitig, and gets replaced wholesale whenever the
//! corresponding template is added or updated. Blocks are opaque line
//! sequences; gitig makes no attempt to understand ignore-pattern syntax.
//!
//! # Rewrite Model
//!
//! The document is fully rebuilt from the source file when a run starts, and
//! fully flushed back at the very end. Junk lines are emitted first in their
//! original relative order, then every block in insertion order wrapped in
//! start/end tags carrying the template's canonical catalog path. There is no
//! partial persistence, so any fatal error leaves the original file
//! untouched.

use crate::catalog::Catalog;

use indexmap::IndexMap;
use regex::Regex;
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
    sync::LazyLock,
};
use tracing::debug;

/// Start tag line, e.g. `##gitig-start:Global/Redis`.
static START_TAG: LazyLock<Regex> = LazyLock::new(|| tag_regex("start"));

/// End tag line, e.g. `##gitig-end:Global/Redis`.
static END_TAG: LazyLock<Regex> = LazyLock::new(|| tag_regex("end"));

fn tag_regex(tag: &str) -> Regex {
    // Path segments allow printable characters except '/'.
    Regex::new(&format!(
        r"^\s*#+\s*gitig-{tag}:([!-.0-~]+[/\\])*([!-.0-~]+)\s*$"
    ))
    .expect("invalid tag regex")
}

fn render_tag(tag: &str, canonical: &str) -> String {
    format!("##gitig-{tag}:{canonical}\n")
}

/// Parsed target file contents.
///
/// Junk lines and block content lines all keep their trailing newline. Block
/// keys are lowercase template identifiers, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IgnoreFile {
    junk: Vec<String>,
    blocks: IndexMap<String, Vec<String>>,
}

impl IgnoreFile {
    /// Parse raw file text into junk lines and template blocks.
    ///
    /// Lines outside any block accumulate as junk in input order. A start
    /// tag opens a block keyed by the lowercase form of its last path
    /// component; every following line is block content until the end tag
    /// naming the *same* identifier shows up. End tags naming anything else
    /// count as content. An empty input parses to an empty document.
    ///
    /// If the very last line of the input lacks a trailing newline, one is
    /// appended so that rewrites always concatenate cleanly.
    ///
    /// # Errors
    ///
    /// - Return [`DocumentError::DanglingBlock`] if a start tag is never
    ///   matched by its end tag before end of input.
    pub fn parse(text: impl AsRef<str>) -> Result<Self> {
        let mut junk: Vec<String> = Vec::new();
        let mut blocks: IndexMap<String, Vec<String>> = IndexMap::new();

        let mut lines = text.as_ref().split_inclusive('\n');
        while let Some(line) = lines.next() {
            let Some(name) = tag_identifier(&START_TAG, line) else {
                junk.push(line.to_string());
                continue;
            };

            let mut content: Vec<String> = Vec::new();
            let mut closed = false;
            for line in lines.by_ref() {
                match tag_identifier(&END_TAG, line) {
                    Some(end_name) if end_name == name => {
                        closed = true;
                        break;
                    }
                    _ => content.push(line.to_string()),
                }
            }
            if !closed {
                return Err(DocumentError::DanglingBlock { name });
            }

            normalize_last_line(&mut content);
            blocks.insert(name.to_lowercase(), content);
        }

        normalize_last_line(&mut junk);

        Ok(Self { junk, blocks })
    }

    /// Parse the target file at given path.
    ///
    /// # Errors
    ///
    /// - Return [`DocumentError::ReadFile`] if the file cannot be read.
    /// - Return [`DocumentError::DanglingBlock`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = read_to_string(path.as_ref()).map_err(|err| DocumentError::ReadFile {
            source: err,
            path: path.as_ref().to_path_buf(),
        })?;

        Self::parse(text)
    }

    /// Render the document back into file text.
    ///
    /// Junk lines come first, verbatim and in order, then every block in
    /// insertion order wrapped in start/end tags carrying the canonical
    /// catalog path of its identifier.
    ///
    /// # Errors
    ///
    /// - Return [`DocumentError::UnknownTemplates`] if any block key fails
    ///   to resolve against the catalog.
    pub fn render(&self, catalog: &Catalog) -> Result<String> {
        self.validate(catalog)?;

        let mut out = String::new();
        for line in &self.junk {
            out.push_str(line);
        }
        for (name, content) in &self.blocks {
            // Resolution cannot fail past validate.
            let canonical = catalog.resolve(name).unwrap_or(name.as_str());
            out.push_str(&render_tag("start", canonical));
            for line in content {
                out.push_str(line);
            }
            out.push_str(&render_tag("end", canonical));
        }

        Ok(out)
    }

    /// Render and flush the document to the target file in one full rewrite.
    ///
    /// # Errors
    ///
    /// - Return [`DocumentError::UnknownTemplates`] if rendering fails.
    /// - Return [`DocumentError::WriteFile`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>, catalog: &Catalog) -> Result<()> {
        let text = self.render(catalog)?;
        debug!("rewrite {} ({} bytes)", path.as_ref().display(), text.len());
        write(path.as_ref(), text.as_bytes()).map_err(|err| DocumentError::WriteFile {
            source: err,
            path: path.as_ref().to_path_buf(),
        })?;

        Ok(())
    }

    /// Check every block identifier against the catalog.
    ///
    /// Collects *all* unresolvable identifiers before failing, so the caller
    /// can report every bad name in one pass.
    ///
    /// # Errors
    ///
    /// - Return [`DocumentError::UnknownTemplates`] naming every block key
    ///   missing from the catalog.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        let unknown: Vec<String> = self
            .blocks
            .keys()
            .filter(|name| !catalog.contains(name))
            .cloned()
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(DocumentError::UnknownTemplates { names: unknown })
        }
    }

    /// Check if a block is stored under given lowercase identifier.
    pub fn contains_block(&self, name: impl AsRef<str>) -> bool {
        self.blocks.contains_key(name.as_ref())
    }

    /// Content lines of the block stored under given lowercase identifier.
    pub fn block_lines(&self, name: impl AsRef<str>) -> Option<&[String]> {
        self.blocks.get(name.as_ref()).map(Vec::as_slice)
    }

    /// Store block content wholesale, replacing any previous content.
    pub fn insert_block(&mut self, name: impl Into<String>, lines: Vec<String>) {
        self.blocks.insert(name.into(), lines);
    }

    /// Delete the block stored under given lowercase identifier.
    ///
    /// Preserves the relative order of the remaining blocks.
    pub fn remove_block(&mut self, name: impl AsRef<str>) -> bool {
        self.blocks.shift_remove(name.as_ref()).is_some()
    }

    /// Delete every stored block, leaving junk lines alone.
    pub fn clear_blocks(&mut self) {
        self.blocks.clear();
    }

    /// Iterate over stored block identifiers in insertion order.
    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    /// Junk lines in original relative order.
    pub fn junk_lines(&self) -> &[String] {
        &self.junk
    }
}

fn tag_identifier(tag: &Regex, line: &str) -> Option<String> {
    tag.captures(line)
        .and_then(|captures| captures.get(2))
        .map(|m| m.as_str().to_string())
}

fn normalize_last_line(lines: &mut [String]) {
    if let Some(last) = lines.last_mut() {
        if !last.ends_with('\n') {
            last.push('\n');
        }
    }
}

/// Document parsing and persistence error types.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A start tag was never matched by a corresponding end tag.
    #[error("the start tag for \"{name}\" is not matched by a corresponding end tag")]
    DanglingBlock { name: String },

    /// One or more block identifiers are missing from the catalog.
    #[error("unknown templates in file: {}", names.join(", "))]
    UnknownTemplates { names: Vec<String> },

    /// Target file cannot be read from.
    #[error("failed to read target file at {:?}", path.display())]
    ReadFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Target file cannot be written to.
    #[error("failed to write target file at {:?}", path.display())]
    WriteFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = DocumentError> = std::result::Result<T, E>;
